use super::schema::HeaderSchema;
use crate::domain::{PropertyValue, RawProperties, SortedProperties};
use std::collections::BTreeMap;

/// Accumulates header values line by line; later writes win.
#[derive(Debug, Default)]
pub(crate) struct PropertiesBuilder {
    entries: BTreeMap<String, PropertyValue>,
}

impl PropertiesBuilder {
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.entries.insert(key.into(), value);
    }

    pub(crate) fn mark_scanned(&mut self, key: &str) {
        self.insert(key, PropertyValue::Scanned);
    }

    pub(crate) fn build(self, schema: &HeaderSchema) -> (RawProperties, SortedProperties) {
        let sorted = project_onto_schema(&self.entries, schema);
        (RawProperties::from_entries(self.entries), sorted)
    }
}

fn project_onto_schema(
    entries: &BTreeMap<String, PropertyValue>,
    schema: &HeaderSchema,
) -> SortedProperties {
    SortedProperties::from_ordered(
        schema
            .expected_keys()
            .iter()
            .map(|key| {
                let value = entries.get(key).cloned().unwrap_or(PropertyValue::Unused);
                (key.clone(), value)
            })
            .collect(),
    )
}
