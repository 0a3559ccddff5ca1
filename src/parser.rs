//! A "dumb" XML driver that reads the server document and notifies the state
//! machine of events. All quick-xml specifics stay here; the builder only
//! ever sees [`DocEvent`]s.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event as XmlEvent};

use crate::builder::ResultSetBuilder;
use crate::charset::TextNormalizer;
use crate::error::FmError;
use crate::events::{AttrMap, DocEvent};

/// Drives the parsing process, feeding the builder one event at a time.
pub(crate) fn drive(
    xml: &[u8],
    normalizer: &dyn TextNormalizer,
    builder: &mut ResultSetBuilder,
) -> Result<(), FmError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    loop {
        let pos = reader.buffer_position();
        let line = line_at(xml, pos);
        match reader.read_event_into(&mut buf) {
            Err(e) => {
                return Err(FmError::MalformedXml {
                    message: e.to_string(),
                    line: line_at(xml, reader.buffer_position()),
                });
            }
            Ok(XmlEvent::Start(e)) => {
                let (tag, attrs) = open_parts(&e, normalizer, line)?;
                builder.handle(DocEvent::Open { tag, attrs }, line)?;
            }
            Ok(XmlEvent::Empty(e)) => {
                // Self-closing element: open immediately followed by close.
                let (tag, attrs) = open_parts(&e, normalizer, line)?;
                let close = tag.clone();
                builder.handle(DocEvent::Open { tag, attrs }, line)?;
                builder.handle(DocEvent::Close { tag: close }, line)?;
            }
            Ok(XmlEvent::End(e)) => {
                let tag = name_str(e.local_name().as_ref(), line)?;
                builder.handle(DocEvent::Close { tag }, line)?;
            }
            Ok(XmlEvent::Text(e)) => {
                let raw = std::str::from_utf8(e.as_ref())
                    .map_err(|err| malformed_at(err.to_string(), line))?;
                let text = unescape(raw).map_err(|err| malformed_at(err.to_string(), line))?;
                let text = normalizer.normalize(text);
                builder.handle(DocEvent::Text(text.into_owned()), line)?;
            }
            Ok(XmlEvent::CData(e)) => {
                let raw = std::str::from_utf8(e.as_ref())
                    .map_err(|err| malformed_at(err.to_string(), line))?;
                let text = normalizer.normalize(Cow::Borrowed(raw));
                builder.handle(DocEvent::Text(text.into_owned()), line)?;
            }
            Ok(XmlEvent::Eof) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    Ok(())
}

fn open_parts(
    e: &BytesStart,
    normalizer: &dyn TextNormalizer,
    line: u64,
) -> Result<(String, AttrMap), FmError> {
    let tag = name_str(e.local_name().as_ref(), line)?;
    let mut attrs = AttrMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| malformed_at(err.to_string(), line))?;
        let key = name_str(attr.key.local_name().as_ref(), line)?;
        let raw = std::str::from_utf8(&attr.value)
            .map_err(|err| malformed_at(err.to_string(), line))?;
        let value = unescape(raw).map_err(|err| malformed_at(err.to_string(), line))?;
        attrs.insert(key, normalizer.normalize(value).into_owned());
    }
    Ok((tag, attrs))
}

fn name_str(name: &[u8], line: u64) -> Result<String, FmError> {
    std::str::from_utf8(name)
        .map(str::to_string)
        .map_err(|err| malformed_at(err.to_string(), line))
}

fn malformed_at(message: String, line: u64) -> FmError {
    FmError::MalformedXml { message, line }
}

fn line_at(xml: &[u8], pos: u64) -> u64 {
    let end = (pos as usize).min(xml.len());
    xml[..end].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}
