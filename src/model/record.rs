use std::sync::{Arc, Weak};

use indexmap::IndexMap;

use crate::error::FmError;
use crate::model::layout::Layout;

/// Everything the assembler hands a [`RecordFactory`] to build one record.
///
/// `related_sets` is already populated with fully built child records; for a
/// child record, `parent` and `related_set_name` identify where it hangs.
pub struct RecordParts<R> {
    pub record_id: String,
    pub modification_id: String,
    pub fields: IndexMap<String, Vec<String>>,
    pub related_sets: IndexMap<String, Vec<Arc<R>>>,
    pub parent: Option<Weak<R>>,
    pub related_set_name: Option<String>,
}

/// Seam for substituting a caller-defined record type at assembly time, the
/// moral equivalent of passing a record subclass to the original API.
pub trait RecordFactory {
    type Record;

    fn build_record(&self, layout: &Arc<Layout>, parts: RecordParts<Self::Record>) -> Self::Record;
}

/// Default factory producing plain [`Record`]s.
pub struct StandardRecords;

impl RecordFactory for StandardRecords {
    type Record = Record;

    fn build_record(&self, layout: &Arc<Layout>, parts: RecordParts<Record>) -> Record {
        Record::from_parts(Arc::clone(layout), parts)
    }
}

/// One record of the found set, or one related (portal) record.
///
/// Field values are ordered repetition lists. Back-references (to the layout
/// and, for portal records, to the parent record) are non-owning.
pub struct Record {
    layout: Arc<Layout>,
    record_id: String,
    modification_id: String,
    fields: IndexMap<String, Vec<String>>,
    related_sets: IndexMap<String, Vec<Arc<Record>>>,
    parent: Option<Weak<Record>>,
    related_set_name: Option<String>,
}

impl Record {
    pub(crate) fn from_parts(layout: Arc<Layout>, parts: RecordParts<Record>) -> Self {
        Record {
            layout,
            record_id: parts.record_id,
            modification_id: parts.modification_id,
            fields: parts.fields,
            related_sets: parts.related_sets,
            parent: parts.parent,
            related_set_name: parts.related_set_name,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn modification_id(&self) -> &str {
        &self.modification_id
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    /// All repetitions of the named field, in document order.
    pub fn field(&self, name: &str) -> Result<&[String], FmError> {
        self.fields
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FmError::FieldNotFound(name.to_string()))
    }

    /// A single repetition of the named field. `FieldNotFound` when either
    /// the field or the repetition index is absent.
    pub fn field_value(&self, name: &str, repetition: usize) -> Result<&str, FmError> {
        self.field(name)?
            .get(repetition)
            .map(String::as_str)
            .ok_or_else(|| FmError::FieldNotFound(name.to_string()))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn list_fields(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// The child records of the named portal.
    pub fn related_set(&self, name: &str) -> Result<&[Arc<Record>], FmError> {
        self.related_sets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| FmError::RelatedSetNotFound(name.to_string()))
    }

    pub fn related_sets(&self) -> impl Iterator<Item = (&str, &[Arc<Record>])> {
        self.related_sets
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// For a portal record, the record it belongs to.
    pub fn parent(&self) -> Option<Arc<Record>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// For a portal record, the table name of the portal it came from.
    pub fn related_set_name(&self) -> Option<&str> {
        self.related_set_name.as_deref()
    }
}

impl std::fmt::Debug for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("record_id", &self.record_id)
            .field("modification_id", &self.modification_id)
            .field("fields", &self.fields)
            .field("related_set_name", &self.related_set_name)
            .finish_non_exhaustive()
    }
}
