use std::sync::{Arc, Weak};

use indexmap::IndexMap;

use crate::error::FmError;
use crate::model::field::Field;

/// Server-side schema view: which fields and related tables the request
/// context exposed. Field order is the server's declaration order.
#[derive(Debug)]
pub struct Layout {
    name: String,
    database: String,
    fields: IndexMap<String, Field>,
    related_sets: IndexMap<String, RelatedSet>,
}

impl Layout {
    pub(crate) fn new(
        name: String,
        database: String,
        fields: IndexMap<String, Field>,
        related_sets: IndexMap<String, RelatedSet>,
    ) -> Self {
        Layout {
            name,
            database,
            fields,
            related_sets,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn field(&self, name: &str) -> Result<&Field, FmError> {
        self.fields
            .get(name)
            .ok_or_else(|| FmError::FieldNotFound(name.to_string()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn list_fields(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn related_set(&self, name: &str) -> Result<&RelatedSet, FmError> {
        self.related_sets
            .get(name)
            .ok_or_else(|| FmError::RelatedSetNotFound(name.to_string()))
    }

    pub fn related_sets(&self) -> impl Iterator<Item = &RelatedSet> {
        self.related_sets.values()
    }

    pub fn list_related_sets(&self) -> Vec<&str> {
        self.related_sets.keys().map(String::as_str).collect()
    }

    pub(crate) fn has_related_set(&self, name: &str) -> bool {
        self.related_sets.contains_key(name)
    }
}

/// A portal: the schema of one named set of related records on a layout.
/// Holds a non-owning link back to the layout it was declared on.
#[derive(Debug)]
pub struct RelatedSet {
    name: String,
    layout: Weak<Layout>,
    fields: IndexMap<String, Field>,
}

impl RelatedSet {
    pub(crate) fn new(name: String, layout: Weak<Layout>, fields: IndexMap<String, Field>) -> Self {
        RelatedSet {
            name,
            layout,
            fields,
        }
    }

    /// Name of the related table this portal displays records from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layout this portal was declared on, if it is still alive.
    pub fn layout(&self) -> Option<Arc<Layout>> {
        self.layout.upgrade()
    }

    pub fn field(&self, name: &str) -> Result<&Field, FmError> {
        self.fields
            .get(name)
            .ok_or_else(|| FmError::FieldNotFound(name.to_string()))
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn list_fields(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }
}
