//! The assembled, caller-facing object graph: layout schema, records and the
//! found-set wrapper. These outlive the parser; none of them hold a reference
//! back to it.

pub mod field;
pub mod layout;
pub mod record;
pub mod result;

pub use field::{Field, ValidationRule};
pub use layout::{Layout, RelatedSet};
pub use record::{Record, RecordFactory, RecordParts, StandardRecords};
pub use result::FindResult;
