use std::sync::Arc;

use crate::model::layout::Layout;
use crate::model::record::Record;

/// The found set returned by one command: the layout shared by all records,
/// the records themselves, and the found-set counters.
pub struct FindResult<R = Record> {
    layout: Arc<Layout>,
    records: Vec<Arc<R>>,
    table_count: u64,
    found_set_count: u64,
    fetch_count: u64,
}

impl<R> FindResult<R> {
    pub(crate) fn new(
        layout: Arc<Layout>,
        records: Vec<Arc<R>>,
        table_count: u64,
        found_set_count: u64,
        fetch_count: u64,
    ) -> Self {
        FindResult {
            layout,
            records,
            table_count,
            found_set_count,
            fetch_count,
        }
    }

    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    pub fn records(&self) -> &[Arc<R>] {
        &self.records
    }

    pub fn first_record(&self) -> Option<&Arc<R>> {
        self.records.first()
    }

    pub fn last_record(&self) -> Option<&Arc<R>> {
        self.records.last()
    }

    /// Number of records in the table that was accessed.
    pub fn table_record_count(&self) -> u64 {
        self.table_count
    }

    /// Number of records matching the query, before any range restriction.
    pub fn found_set_count(&self) -> u64 {
        self.found_set_count
    }

    /// Number of records actually returned in this response. Equal to
    /// `records().len()` unless the server windowed the found set.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count
    }

    pub fn list_fields(&self) -> Vec<&str> {
        self.layout.list_fields()
    }

    pub fn list_related_sets(&self) -> Vec<&str> {
        self.layout.list_related_sets()
    }
}
