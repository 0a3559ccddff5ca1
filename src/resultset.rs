//! The public entry point: one instance per document, one-shot parse, lazy
//! memoized materialization of the layout and the result.

use std::cell::OnceCell;
use std::sync::Arc;

use log::debug;

use crate::assembler::{assemble_layout, assemble_result};
use crate::builder::{ParsedDocument, ResultSetBuilder};
use crate::charset::{TextNormalizer, Utf8Passthrough};
use crate::error::FmError;
use crate::model::{FindResult, Layout, RecordFactory, StandardRecords};
use crate::parser::drive;

/// Oldest server release whose documents this parser accepts, unless the
/// caller configures a different floor.
pub const MIN_SERVER_VERSION: &str = "10.0.0.0";

/// Parse-time configuration: the version floor and the charset hook.
pub struct ParseSettings {
    min_server_version: String,
    normalizer: Box<dyn TextNormalizer>,
}

impl Default for ParseSettings {
    fn default() -> Self {
        ParseSettings {
            min_server_version: MIN_SERVER_VERSION.to_string(),
            normalizer: Box::new(Utf8Passthrough),
        }
    }
}

impl ParseSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_server_version(mut self, version: impl Into<String>) -> Self {
        self.min_server_version = version.into();
        self
    }

    pub fn normalizer(mut self, normalizer: impl TextNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }
}

/// One parsed server response.
///
/// An instance parses at most one document in its lifetime: the internal
/// state machine is consumed by the first [`parse`](Self::parse) call.
/// [`layout`](Self::layout) and [`result`](Self::result) materialize their
/// object graph at most once and hand back the same `Arc` thereafter, so two
/// retrievals can never diverge. After a failed parse no model is ever
/// retrievable; every assembly call reports [`FmError::NotYetParsed`].
pub struct FmResultSet<F: RecordFactory = StandardRecords> {
    settings: ParseSettings,
    factory: F,
    machine: Option<ResultSetBuilder>,
    parsed: Option<ParsedDocument>,
    layout_cell: OnceCell<Arc<Layout>>,
    result_cell: OnceCell<Arc<FindResult<F::Record>>>,
}

impl FmResultSet<StandardRecords> {
    pub fn new() -> Self {
        Self::with_settings(ParseSettings::default())
    }

    pub fn with_settings(settings: ParseSettings) -> Self {
        Self::with_factory(settings, StandardRecords)
    }
}

impl Default for FmResultSet<StandardRecords> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: RecordFactory> FmResultSet<F> {
    /// Builds a parser whose records are produced by the given factory.
    pub fn with_factory(settings: ParseSettings, factory: F) -> Self {
        FmResultSet {
            settings,
            factory,
            machine: Some(ResultSetBuilder::new()),
            parsed: None,
            layout_cell: OnceCell::new(),
            result_cell: OnceCell::new(),
        }
    }

    /// Parses one complete server document.
    ///
    /// Empty input fails with `EmptyDocument` before any XML processing.
    /// Syntax errors fail immediately; on well-formed documents failure is
    /// deferred to the embedded error code, then the version floor.
    pub fn parse(&mut self, xml: &[u8]) -> Result<(), FmError> {
        if xml.is_empty() {
            return Err(FmError::EmptyDocument);
        }
        let mut machine = self.machine.take().ok_or(FmError::AlreadyParsed)?;
        drive(xml, self.settings.normalizer.as_ref(), &mut machine)?;
        let doc = machine.finish(&self.settings.min_server_version)?;
        debug!(
            "parsed result set: {} records, {} field definitions, server version {}",
            doc.records.len(),
            doc.field_defs.len(),
            doc.server_version
        );
        self.parsed = Some(doc);
        Ok(())
    }

    /// Version string the server reported, once a parse has succeeded.
    pub fn server_version(&self) -> Result<&str, FmError> {
        self.parsed
            .as_ref()
            .map(|doc| doc.server_version.as_str())
            .ok_or(FmError::NotYetParsed)
    }

    /// Materializes the layout, at most once; later calls return the same
    /// `Arc`.
    pub fn layout(&self) -> Result<Arc<Layout>, FmError> {
        let doc = self.parsed.as_ref().ok_or(FmError::NotYetParsed)?;
        if let Some(cached) = self.layout_cell.get() {
            return Ok(Arc::clone(cached));
        }
        let layout = assemble_layout(doc)?;
        Ok(Arc::clone(self.layout_cell.get_or_init(|| layout)))
    }

    /// Materializes the found set, at most once; later calls return the same
    /// `Arc`. Materializes the layout first when needed.
    pub fn result(&self) -> Result<Arc<FindResult<F::Record>>, FmError> {
        let doc = self.parsed.as_ref().ok_or(FmError::NotYetParsed)?;
        if let Some(cached) = self.result_cell.get() {
            return Ok(Arc::clone(cached));
        }
        let layout = self.layout()?;
        let result = assemble_result(doc, &layout, &self.factory)?;
        Ok(Arc::clone(self.result_cell.get_or_init(|| Arc::new(result))))
    }
}
