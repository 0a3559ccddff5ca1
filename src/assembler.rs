//! Second pass: walks the raw parse tree and schema metadata and materializes
//! the caller-facing object graph. Validation-rule derivation lives here as a
//! pure function of the raw flags.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;

use crate::builder::{ParsedDocument, RawFieldDef};
use crate::error::FmError;
use crate::events::AttrMap;
use crate::model::{
    Field, FindResult, Layout, RecordFactory, RecordParts, RelatedSet, ValidationRule,
};

/// Rule derivation differs between the two schema paths in one place, so the
/// scope is threaded through explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldScope {
    Layout,
    RelatedSet,
}

fn derive_rules(def: &RawFieldDef, scope: FieldScope) -> BTreeSet<ValidationRule> {
    let mut rules = BTreeSet::new();
    if def.not_empty {
        rules.insert(ValidationRule::NotEmpty);
    }
    if def.numeric_only {
        rules.insert(ValidationRule::NumericOnly);
    }
    if def.max_characters.is_some() {
        rules.insert(ValidationRule::MaxCharacters);
    }
    if def.four_digit_year == Some(true) {
        rules.insert(ValidationRule::FourDigitYear);
    }
    // Known inconsistency in the protocol's schema paths: related-set fields
    // also get TimeOfDay for result="time" alone, top-level fields only for
    // the explicit flag. Kept as-is.
    let time_of_day = match scope {
        FieldScope::Layout => def.time_of_day == Some(true),
        FieldScope::RelatedSet => def.time_of_day == Some(true) || def.result == "time",
    };
    if time_of_day {
        rules.insert(ValidationRule::TimeOfDay);
    }
    if def.four_digit_year == Some(false) && def.result == "timestamp" {
        rules.insert(ValidationRule::TimestampField);
    }
    if def.four_digit_year == Some(false) && def.result == "date" {
        rules.insert(ValidationRule::DateField);
    }
    if def.time_of_day == Some(false) && def.result == "time" {
        rules.insert(ValidationRule::TimeField);
    }
    rules
}

fn build_field(def: &RawFieldDef, scope: FieldScope) -> Field {
    Field::new(
        def.name.clone(),
        def.auto_enter,
        def.global,
        def.max_repeat,
        def.result.clone(),
        def.field_type.clone(),
        def.max_characters,
        derive_rules(def, scope),
    )
}

pub(crate) fn assemble_layout(doc: &ParsedDocument) -> Result<Arc<Layout>, FmError> {
    let head = doc
        .head
        .as_ref()
        .ok_or_else(|| FmError::MissingMetadata("datasource".into()))?;
    let name = head.get("layout").unwrap_or("").to_string();
    let database = head.get("database").unwrap_or("").to_string();

    let mut fields = IndexMap::new();
    for def in &doc.field_defs {
        fields.insert(def.name.clone(), build_field(def, FieldScope::Layout));
    }

    // The portals hold a non-owning link back to the layout they sit on.
    Ok(Arc::new_cyclic(|weak| {
        let mut related_sets = IndexMap::new();
        for (table, defs) in &doc.related_defs {
            let mut scoped = IndexMap::new();
            for def in defs {
                scoped.insert(def.name.clone(), build_field(def, FieldScope::RelatedSet));
            }
            related_sets.insert(
                table.clone(),
                RelatedSet::new(table.clone(), weak.clone(), scoped),
            );
        }
        Layout::new(name, database, fields, related_sets)
    }))
}

pub(crate) fn assemble_result<F: RecordFactory>(
    doc: &ParsedDocument,
    layout: &Arc<Layout>,
    factory: &F,
) -> Result<FindResult<F::Record>, FmError> {
    let head = doc
        .head
        .as_ref()
        .ok_or_else(|| FmError::MissingMetadata("datasource".into()))?;
    let found_set = doc
        .found_set
        .as_ref()
        .ok_or_else(|| FmError::MissingMetadata("resultset".into()))?;
    let table_count = required_count(head, "datasource", "total-count")?;
    let found_set_count = required_count(found_set, "resultset", "count")?;
    let fetch_count = required_count(found_set, "resultset", "fetch-size")?;

    let mut records = Vec::with_capacity(doc.records.len());
    for raw in &doc.records {
        // Every relation name a record carries must be declared on the layout.
        for table in raw.children.keys() {
            if !layout.has_related_set(table) {
                return Err(FmError::RelatedSetNotFound(table.clone()));
            }
        }
        let record = Arc::new_cyclic(|weak: &Weak<F::Record>| {
            let mut related_sets = IndexMap::new();
            for (table, child_raws) in &raw.children {
                let children = child_raws
                    .iter()
                    .map(|child| {
                        Arc::new(factory.build_record(
                            layout,
                            RecordParts {
                                record_id: child.record_id.clone(),
                                modification_id: child.mod_id.clone(),
                                fields: child.fields.clone(),
                                related_sets: IndexMap::new(),
                                parent: Some(weak.clone()),
                                related_set_name: Some(table.clone()),
                            },
                        ))
                    })
                    .collect();
                related_sets.insert(table.clone(), children);
            }
            factory.build_record(
                layout,
                RecordParts {
                    record_id: raw.record_id.clone(),
                    modification_id: raw.mod_id.clone(),
                    fields: raw.fields.clone(),
                    related_sets,
                    parent: None,
                    related_set_name: None,
                },
            )
        });
        records.push(record);
    }

    Ok(FindResult::new(
        Arc::clone(layout),
        records,
        table_count,
        found_set_count,
        fetch_count,
    ))
}

fn required_count(
    attrs: &AttrMap,
    element: &'static str,
    attribute: &'static str,
) -> Result<u64, FmError> {
    let raw = attrs
        .get(attribute)
        .ok_or_else(|| FmError::MissingMetadata(format!("{element} {attribute}")))?;
    raw.trim().parse().map_err(|_| FmError::InvalidNumber {
        element,
        attribute,
        value: raw.to_string(),
    })
}
