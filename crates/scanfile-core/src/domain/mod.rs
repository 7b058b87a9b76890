pub mod errors;

pub use errors::{ScanError, ScanErrorCategory, ScanResult};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

pub const SCANNED_MARKER: &str = "Scanned";
pub const UNUSED_MARKER: &str = "Unused";

/// One metadata value as it appears in the extracted property maps.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Float(f64),
    Text(String),
    /// The key is the independent variable of this scan.
    Scanned,
    /// The key belongs to the schema but the file never set it.
    Unused,
}

impl PropertyValue {
    pub const fn is_scanned(&self) -> bool {
        matches!(self, Self::Scanned)
    }

    pub const fn is_unused(&self) -> bool {
        matches!(self, Self::Unused)
    }
}

impl Display for PropertyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
            Self::Scanned => f.write_str(SCANNED_MARKER),
            Self::Unused => f.write_str(UNUSED_MARKER),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Text(value) => serializer.serialize_str(value),
            Self::Scanned => serializer.serialize_str(SCANNED_MARKER),
            Self::Unused => serializer.serialize_str(UNUSED_MARKER),
        }
    }
}

/// Every recognised key/value pair found in a header, before schema projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawProperties {
    entries: BTreeMap<String, PropertyValue>,
}

impl RawProperties {
    pub(crate) fn from_entries(entries: BTreeMap<String, PropertyValue>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }
}

/// Schema-ordered view of the header: exactly one entry per expected key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedProperties {
    entries: Vec<(String, PropertyValue)>,
}

impl SortedProperties {
    pub(crate) fn from_ordered(entries: Vec<(String, PropertyValue)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn used_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_unused())
            .count()
    }
}

impl Serialize for SortedProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanVariable {
    pub name: String,
    pub unit: String,
}

/// Corrected scan series. `x_data` and `real_counts` always have equal length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    x_data: Vec<f64>,
    real_counts: Vec<i64>,
    valid: bool,
}

impl Series {
    pub(crate) fn from_corrected(x_data: Vec<f64>, real_counts: Vec<i64>) -> Self {
        debug_assert_eq!(x_data.len(), real_counts.len());
        let valid = !x_data.is_empty();
        Self {
            x_data,
            real_counts,
            valid,
        }
    }

    pub fn invalid() -> Self {
        Self {
            x_data: Vec::new(),
            real_counts: Vec::new(),
            valid: false,
        }
    }

    pub fn x_data(&self) -> &[f64] {
        &self.x_data
    }

    pub fn real_counts(&self) -> &[i64] {
        &self.real_counts
    }

    /// Whether the file held a well-formed 2-D numeric block that survived correction.
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn len(&self) -> usize {
        self.x_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_data.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, i64)> + '_ {
        self.x_data
            .iter()
            .copied()
            .zip(self.real_counts.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanFileName {
    pub prefix: String,
    pub index: u32,
    pub format: String,
}

impl ScanFileName {
    pub fn new(prefix: impl Into<String>, index: u32, format: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            index,
            format: format.into(),
        }
    }

    pub fn file_name(&self) -> String {
        if self.format.is_empty() || self.format.starts_with('.') {
            format!("{}{}{}", self.prefix, self.index, self.format)
        } else {
            format!("{}{}.{}", self.prefix, self.index, self.format)
        }
    }
}

impl Display for ScanFileName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::{PropertyValue, ScanFileName, Series, SortedProperties};

    #[test]
    fn file_name_joins_prefix_index_and_format() {
        assert_eq!(
            ScanFileName::new("15315_000", 12, "dat").file_name(),
            "15315_00012.dat"
        );
        assert_eq!(
            ScanFileName::new("15315_000", 7, ".dat").to_string(),
            "15315_0007.dat"
        );
        assert_eq!(ScanFileName::new("scan", 3, "").file_name(), "scan3");
    }

    #[test]
    fn sorted_properties_serialize_in_schema_order() {
        let sorted = SortedProperties::from_ordered(vec![
            ("info".to_string(), PropertyValue::Text("ascan stt".to_string())),
            ("dct1".to_string(), PropertyValue::Float(12.5)),
            ("stt".to_string(), PropertyValue::Scanned),
            ("ss1_width".to_string(), PropertyValue::Unused),
        ]);

        let rendered = serde_json::to_string(&sorted).expect("properties should serialize");
        assert_eq!(
            rendered,
            r#"{"info":"ascan stt","dct1":12.5,"stt":"Scanned","ss1_width":"Unused"}"#
        );
        assert_eq!(sorted.used_count(), 3);
    }

    #[test]
    fn invalid_series_is_empty() {
        let series = Series::invalid();
        assert!(!series.is_valid());
        assert!(series.is_empty());
        assert_eq!(series.points().count(), 0);
    }

    #[test]
    fn empty_corrected_series_is_invalid() {
        assert!(!Series::from_corrected(Vec::new(), Vec::new()).is_valid());
        assert!(Series::from_corrected(vec![0.0], vec![3]).is_valid());
    }
}
