//! The event-driven state machine.
//!
//! Consumes [`DocEvent`]s in document order and incrementally builds two
//! parallel structures: the raw record tree and the collected schema
//! metadata. All context is held in explicit fields and an owned relation
//! frame, never in shared references, so the machine can be driven by
//! synthetic event sequences in tests.

use indexmap::IndexMap;
use log::trace;

use crate::error::FmError;
use crate::events::{AttrMap, DocEvent};
use crate::version::compare_dotted;

/// A record as it appears in the raw parse tree. Field values are ordered
/// repetition lists; each repetition is the concatenated text of one `data`
/// element. Transient: discarded once the model is assembled.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawRecord {
    pub record_id: String,
    pub mod_id: String,
    pub fields: IndexMap<String, Vec<String>>,
    pub children: IndexMap<String, Vec<RawRecord>>,
}

/// One `field-definition` element, flags decoded but rules not yet derived.
#[derive(Debug, Clone)]
pub(crate) struct RawFieldDef {
    pub name: String,
    pub auto_enter: bool,
    pub global: bool,
    pub not_empty: bool,
    pub numeric_only: bool,
    /// Tri-state: the rule derivation distinguishes `yes`, `no` and absent.
    pub four_digit_year: Option<bool>,
    pub time_of_day: Option<bool>,
    pub max_repeat: u32,
    pub result: String,
    pub field_type: String,
    pub max_characters: Option<u32>,
}

impl RawFieldDef {
    fn from_attrs(attrs: &AttrMap, line: u64) -> Result<Self, FmError> {
        let name = attrs.get("name").ok_or_else(|| {
            malformed("<field-definition> is missing its name attribute", line)
        })?;
        let max_repeat = match attrs.get("max-repeat") {
            Some(raw) => parse_u32(raw, "field-definition", "max-repeat")?,
            None => 0,
        };
        let max_characters = match attrs.get("max-characters") {
            Some(raw) => Some(parse_u32(raw, "field-definition", "max-characters")?),
            None => None,
        };
        Ok(RawFieldDef {
            name: name.to_string(),
            auto_enter: attrs.is_yes("auto-enter"),
            global: attrs.is_yes("global"),
            not_empty: attrs.is_yes("not-empty"),
            numeric_only: attrs.is_yes("numeric-only"),
            four_digit_year: attrs.yes_no("four-digit-year"),
            time_of_day: attrs.yes_no("time-of-day"),
            max_repeat,
            result: attrs.get("result").unwrap_or("").to_string(),
            field_type: attrs.get("type").unwrap_or("").to_string(),
            max_characters,
        })
    }
}

fn parse_u32(raw: &str, element: &'static str, attribute: &'static str) -> Result<u32, FmError> {
    raw.trim().parse().map_err(|_| FmError::InvalidNumber {
        element,
        attribute,
        value: raw.to_string(),
    })
}

fn malformed(message: impl Into<String>, line: u64) -> FmError {
    FmError::MalformedXml {
        message: message.into(),
        line,
    }
}

/// The parent record saved while its portal's child records are parsed.
/// The grammar nests portals exactly one level deep, so at most one frame is
/// ever live; a second `relatedset` opening while a frame exists is rejected
/// rather than misfiling records.
struct RelationFrame {
    table: String,
    parent: RawRecord,
}

/// Everything the state machine collected from one document, after the
/// deferred gates have passed. Head metadata stays optional here: a document
/// may legitimately omit it, and only model assembly insists on it.
#[derive(Debug)]
pub(crate) struct ParsedDocument {
    pub head: Option<AttrMap>,
    pub found_set: Option<AttrMap>,
    pub field_defs: Vec<RawFieldDef>,
    pub related_defs: IndexMap<String, Vec<RawFieldDef>>,
    pub records: Vec<RawRecord>,
    pub server_version: String,
}

#[derive(Default)]
pub(crate) struct ResultSetBuilder {
    error_code: Option<String>,
    product: Option<AttrMap>,
    head: Option<AttrMap>,
    found_set: Option<AttrMap>,
    field_defs: Vec<RawFieldDef>,
    related_defs: IndexMap<String, Vec<RawFieldDef>>,
    current_related_def: Option<String>,
    records: Vec<RawRecord>,
    relation: Option<RelationFrame>,
    current_record: Option<RawRecord>,
    current_field: Option<String>,
    cdata: Option<String>,
}

impl ResultSetBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Dispatches one document event. `line` is only used for diagnostics.
    pub(crate) fn handle(&mut self, event: DocEvent, line: u64) -> Result<(), FmError> {
        match event {
            DocEvent::Open { tag, attrs } => self.open(&tag, attrs, line),
            DocEvent::Close { tag } => self.close(&tag, line),
            DocEvent::Text(chunk) => {
                // Character data only matters inside <data>; anything else is
                // inter-element whitespace.
                if let Some(buf) = self.cdata.as_mut() {
                    buf.push_str(&chunk);
                }
                Ok(())
            }
        }
    }

    fn open(&mut self, tag: &str, attrs: AttrMap, line: u64) -> Result<(), FmError> {
        match tag {
            "error" => {
                self.error_code = attrs.get("code").map(str::to_string);
            }
            "product" => {
                self.product = Some(attrs);
            }
            "datasource" => {
                self.head = Some(attrs);
            }
            "resultset" => {
                self.found_set = Some(attrs);
            }
            "relatedset-definition" => {
                let table = attrs.get("table").ok_or_else(|| {
                    malformed("<relatedset-definition> is missing its table attribute", line)
                })?;
                self.related_defs.insert(table.to_string(), Vec::new());
                self.current_related_def = Some(table.to_string());
            }
            "field-definition" => {
                let def = RawFieldDef::from_attrs(&attrs, line)?;
                match &self.current_related_def {
                    Some(table) => {
                        // The entry was created when the definition scope opened.
                        self.related_defs.entry(table.clone()).or_default().push(def);
                    }
                    None => self.field_defs.push(def),
                }
            }
            "relatedset" => {
                if self.relation.is_some() {
                    return Err(malformed(
                        "<relatedset> nested inside another <relatedset>",
                        line,
                    ));
                }
                let table = attrs.get("table").ok_or_else(|| {
                    malformed("<relatedset> is missing its table attribute", line)
                })?;
                let mut parent = self.current_record.take().ok_or_else(|| {
                    malformed("<relatedset> outside of a <record>", line)
                })?;
                // Even a portal with zero rows shows up in the parent's
                // related-set map.
                parent.children.entry(table.to_string()).or_default();
                self.relation = Some(RelationFrame {
                    table: table.to_string(),
                    parent,
                });
            }
            "record" => {
                if self.current_record.is_some() {
                    return Err(malformed("<record> nested inside another <record>", line));
                }
                self.current_record = Some(RawRecord {
                    record_id: attrs.get("record-id").unwrap_or("").to_string(),
                    mod_id: attrs.get("mod-id").unwrap_or("").to_string(),
                    fields: IndexMap::new(),
                    children: IndexMap::new(),
                });
            }
            "field" => {
                let name = attrs.get("name").ok_or_else(|| {
                    malformed("<field> is missing its name attribute", line)
                })?;
                let record = self.current_record.as_mut().ok_or_else(|| {
                    malformed("<field> outside of a <record>", line)
                })?;
                record.fields.entry(name.to_string()).or_default();
                self.current_field = Some(name.to_string());
            }
            "data" => {
                if self.current_field.is_none() {
                    return Err(malformed("<data> outside of a <field>", line));
                }
                self.cdata = Some(String::new());
            }
            other => trace!("ignoring element <{}>", other),
        }
        Ok(())
    }

    fn close(&mut self, tag: &str, line: u64) -> Result<(), FmError> {
        match tag {
            "relatedset-definition" => {
                self.current_related_def = None;
            }
            "relatedset" => {
                let frame = self.relation.take().ok_or_else(|| {
                    malformed("</relatedset> without a matching open", line)
                })?;
                if self.current_record.is_some() {
                    return Err(malformed(
                        "</relatedset> while a child <record> is still open",
                        line,
                    ));
                }
                self.current_record = Some(frame.parent);
            }
            "record" => {
                let record = self.current_record.take().ok_or_else(|| {
                    malformed("</record> without a matching open", line)
                })?;
                match self.relation.as_mut() {
                    Some(frame) => frame
                        .parent
                        .children
                        .entry(frame.table.clone())
                        .or_default()
                        .push(record),
                    None => self.records.push(record),
                }
            }
            "field" => {
                self.current_field = None;
            }
            "data" => {
                let value = self.cdata.take().ok_or_else(|| {
                    malformed("</data> without a matching open", line)
                })?;
                let field = self.current_field.as_ref().ok_or_else(|| {
                    malformed("</data> outside of a <field>", line)
                })?;
                let record = self.current_record.as_mut().ok_or_else(|| {
                    malformed("</data> outside of a <record>", line)
                })?;
                record.fields.entry(field.clone()).or_default().push(value);
            }
            _ => {}
        }
        Ok(())
    }

    /// Applies the deferred gates once the event stream is exhausted: the
    /// embedded server error code first, then the version floor, then a check
    /// that no record context was left open.
    pub(crate) fn finish(self, min_version: &str) -> Result<ParsedDocument, FmError> {
        if let Some(raw) = &self.error_code {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                let code: i32 = trimmed.parse().map_err(|_| FmError::InvalidNumber {
                    element: "error",
                    attribute: "code",
                    value: raw.clone(),
                })?;
                if code != 0 {
                    return Err(FmError::ServerError(code));
                }
            }
        }
        let found = self
            .product
            .as_ref()
            .and_then(|p| p.get("version"))
            .unwrap_or("");
        if compare_dotted(found, min_version) == std::cmp::Ordering::Less {
            return Err(FmError::UnsupportedServerVersion {
                found: if found.is_empty() {
                    "unknown".to_string()
                } else {
                    found.to_string()
                },
                required: min_version.to_string(),
            });
        }
        if self.current_record.is_some() || self.relation.is_some() || self.cdata.is_some() {
            return Err(malformed("document ended with unclosed elements", 0));
        }
        Ok(ParsedDocument {
            head: self.head,
            found_set: self.found_set,
            field_defs: self.field_defs,
            related_defs: self.related_defs,
            records: self.records,
            server_version: found.to_string(),
        })
    }
}
