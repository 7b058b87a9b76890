//! Metadata extraction from the `#` comment header of a scan file.
//!
//! Each candidate line has the shape `# key[_value] : value-text`. Only the
//! first colon separates key from value; device status text routinely embeds
//! more colons (`ms2_status : ok: left_idle`).

mod builder;
pub mod grammar;
pub mod schema;

use crate::common::constants::{
    CANONICAL_CURRENT_UNIT, COMMENT_MARKER, COUNT_TIME, DATA_START, PARAMETER_SUFFIX,
    SCAN_BLOCK_MARKER, SCAN_INFO,
};
use crate::domain::{PropertyValue, RawProperties, ScanVariable, SortedProperties};
use builder::PropertiesBuilder;
use grammar::{FieldParseError, SlitGeometry, parse_scalar, parse_slit};
use schema::{FieldKind, HeaderSchema, SLIT_SUBFIELDS, slit_subfield_key};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Outcome of classifying one comment line body.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderLine {
    Scalar { key: String, value: f64 },
    Slit { slit: String, geometry: SlitGeometry },
    Text { key: String, value: String },
    Malformed { key: String, error: FieldParseError },
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDiagnostic {
    pub line_number: usize,
    pub key: Option<String>,
    pub reason: String,
}

impl Display for HeaderDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.key {
            Some(key) => write!(f, "line {} ({}): {}", self.line_number, key, self.reason),
            None => write!(f, "line {}: {}", self.line_number, self.reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderExtraction {
    raw: RawProperties,
    sorted: SortedProperties,
    scan_variable: Option<ScanVariable>,
    diagnostics: Vec<HeaderDiagnostic>,
}

impl HeaderExtraction {
    pub fn raw(&self) -> &RawProperties {
        &self.raw
    }

    pub fn sorted(&self) -> &SortedProperties {
        &self.sorted
    }

    /// `None` when the file has no `### Scan data` block; no key is then marked as scanned.
    pub fn scan_variable(&self) -> Option<&ScanVariable> {
        self.scan_variable.as_ref()
    }

    pub fn diagnostics(&self) -> &[HeaderDiagnostic] {
        &self.diagnostics
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeaderExtractor {
    schema: HeaderSchema,
}

impl HeaderExtractor {
    pub fn new(schema: HeaderSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &HeaderSchema {
        &self.schema
    }

    pub fn extract_source(&self, source: &str) -> HeaderExtraction {
        let lines: Vec<&str> = source.lines().collect();
        self.extract(&lines)
    }

    pub fn extract<S: AsRef<str>>(&self, lines: &[S]) -> HeaderExtraction {
        let mut builder = PropertiesBuilder::default();
        let mut diagnostics = Vec::new();
        let mut scan_variable = None;

        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let Some(body) = line.strip_prefix(COMMENT_MARKER) else {
                continue;
            };
            let line_number = index + 1;

            if line.starts_with(SCAN_BLOCK_MARKER) && line.contains(DATA_START) {
                match self.scan_variable(lines, index) {
                    Ok(variable) => scan_variable = Some(variable),
                    Err(diagnostic) => {
                        tracing::warn!("{diagnostic}");
                        diagnostics.push(diagnostic);
                    }
                }
            }

            match self.classify(body) {
                HeaderLine::Scalar { key, value } => {
                    builder.insert(key, PropertyValue::Float(value));
                }
                HeaderLine::Slit { slit, geometry } => {
                    for (suffix, value) in SLIT_SUBFIELDS.iter().zip(geometry.values()) {
                        builder.insert(slit_subfield_key(&slit, suffix), PropertyValue::Float(value));
                    }
                }
                HeaderLine::Text { key, value } => {
                    builder.insert(key, PropertyValue::Text(value));
                }
                HeaderLine::Malformed { key, error } => {
                    let diagnostic = HeaderDiagnostic {
                        line_number,
                        key: Some(key),
                        reason: error.to_string(),
                    };
                    tracing::warn!("skipping header {diagnostic}");
                    diagnostics.push(diagnostic);
                }
                HeaderLine::Ignored => {}
            }
        }

        if let Some(variable) = &scan_variable {
            builder.mark_scanned(&variable.name);
        }

        let (raw, sorted) = builder.build(&self.schema);
        HeaderExtraction {
            raw,
            sorted,
            scan_variable,
            diagnostics,
        }
    }

    /// Classifies the text of a comment line with its leading `#` already removed.
    pub fn classify(&self, body: &str) -> HeaderLine {
        let Some((key, value)) = body.split_once(':') else {
            return HeaderLine::Ignored;
        };
        let key = key.trim();
        let value = value.trim();

        if let Some(field) = key.strip_suffix(PARAMETER_SUFFIX) {
            return match self.schema.kind_of(field) {
                Some(kind) if kind.is_scalar() => match parse_scalar(value) {
                    Ok(number) => HeaderLine::Scalar {
                        key: field.to_string(),
                        value: number,
                    },
                    Err(error) => HeaderLine::Malformed {
                        key: field.to_string(),
                        error,
                    },
                },
                Some(FieldKind::Slit) => match parse_slit(value) {
                    Ok(geometry) => HeaderLine::Slit {
                        slit: field.to_string(),
                        geometry,
                    },
                    Err(error) => HeaderLine::Malformed {
                        key: field.to_string(),
                        error,
                    },
                },
                _ => HeaderLine::Ignored,
            };
        }

        if key.contains(COUNT_TIME) || key.contains(SCAN_INFO) {
            return HeaderLine::Text {
                key: key.to_string(),
                value: value.to_string(),
            };
        }

        HeaderLine::Ignored
    }

    fn scan_variable<S: AsRef<str>>(
        &self,
        lines: &[S],
        marker_index: usize,
    ) -> Result<ScanVariable, HeaderDiagnostic> {
        let second_token = |offset: usize, what: &str| {
            lines
                .get(marker_index + offset)
                .and_then(|line| line.as_ref().split_whitespace().nth(1))
                .map(str::to_string)
                .ok_or_else(|| HeaderDiagnostic {
                    line_number: marker_index + 1,
                    key: None,
                    reason: format!("scan data block is missing the scanned variable {what}"),
                })
        };

        let name = second_token(1, "name")?;
        let mut unit = second_token(2, "unit")?;
        if self.schema.is_device_current(&name) && unit != CANONICAL_CURRENT_UNIT {
            tracing::debug!(
                variable = %name,
                unit = %unit,
                "coercing device current unit to {CANONICAL_CURRENT_UNIT}"
            );
            unit = CANONICAL_CURRENT_UNIT.to_string();
        }

        Ok(ScanVariable { name, unit })
    }
}
