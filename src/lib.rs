//! Streaming parser for the FileMaker Server `fmresultset` XML grammar.
//!
//! One instance of [`FmResultSet`] consumes one complete server response in a
//! single pass, building a raw record tree and the schema metadata as the
//! events arrive. Once parsing succeeds, [`FmResultSet::layout`] and
//! [`FmResultSet::result`] materialize the caller-facing object graph
//! (layout, fields, related sets, records) exactly once each.
//!
//! ```no_run
//! use fmresultset::FmResultSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = std::fs::read("response.xml")?;
//! let mut parsed = FmResultSet::new();
//! parsed.parse(&xml)?;
//! let result = parsed.result()?;
//! for record in result.records() {
//!     println!("{}: {:?}", record.record_id(), record.field("Title")?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod charset;
pub mod error;
pub mod events;
pub mod model;
pub mod resultset;

mod assembler;
mod builder;
mod parser;
mod version;

pub use charset::{TextNormalizer, Utf8Passthrough};
pub use error::FmError;
pub use model::{
    Field, FindResult, Layout, Record, RecordFactory, RecordParts, RelatedSet, StandardRecords,
    ValidationRule,
};
pub use resultset::{FmResultSet, MIN_SERVER_VERSION, ParseSettings};
