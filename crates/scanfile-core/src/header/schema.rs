use crate::common::constants::SCAN_INFO;

pub const SLIT_SUBFIELDS: [&str; 4] = ["centre_x", "centre_y", "width", "height"];

pub const DEVICE_CURRENT_FIELDS: [&str; 6] = ["dct1", "dct2", "dct3", "dct4", "dct5", "dct6"];
pub const SAMPLE_TABLE_ANGLE: &str = "sth_st";
pub const SAMPLE_TABLE_AXES: [&str; 5] = ["stx", "sty", "stz", "sgx", "sgy"];
pub const SCATTERING_ANGLE: &str = "stt";
pub const SLIT_FIELDS: [&str; 2] = ["ss1", "ss2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-text scan description, kept verbatim.
    ScanInfo,
    DeviceCurrent,
    SampleTable,
    ScatteringAngle,
    /// `(x, y) width x height`, expanded into four sub-keys.
    Slit,
}

impl FieldKind {
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::DeviceCurrent | Self::SampleTable | Self::ScatteringAngle
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Output keys this field contributes to the sorted projection.
    pub fn output_keys(&self) -> Vec<String> {
        match self.kind {
            FieldKind::Slit => SLIT_SUBFIELDS
                .iter()
                .map(|suffix| slit_subfield_key(&self.name, suffix))
                .collect(),
            _ => vec![self.name.clone()],
        }
    }
}

pub fn slit_subfield_key(slit: &str, suffix: &str) -> String {
    format!("{slit}_{suffix}")
}

/// Ordered description of every header field a scan file is expected to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSchema {
    fields: Vec<FieldSpec>,
    expected_keys: Vec<String>,
}

impl HeaderSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let expected_keys = fields.iter().flat_map(FieldSpec::output_keys).collect();
        Self {
            fields,
            expected_keys,
        }
    }

    /// The field layout written by the instrument's acquisition software.
    ///
    /// The acquisition dialect records the table angle `sth_st` next to the five
    /// sample-table axes, so the projection has 22 keys rather than 21.
    pub fn instrument() -> Self {
        let mut fields = vec![FieldSpec::new(SCAN_INFO, FieldKind::ScanInfo)];
        fields.extend(
            DEVICE_CURRENT_FIELDS
                .iter()
                .map(|name| FieldSpec::new(*name, FieldKind::DeviceCurrent)),
        );
        fields.push(FieldSpec::new(SAMPLE_TABLE_ANGLE, FieldKind::SampleTable));
        fields.extend(
            SAMPLE_TABLE_AXES
                .iter()
                .map(|name| FieldSpec::new(*name, FieldKind::SampleTable)),
        );
        fields.push(FieldSpec::new(SCATTERING_ANGLE, FieldKind::ScatteringAngle));
        fields.extend(
            SLIT_FIELDS
                .iter()
                .map(|name| FieldSpec::new(*name, FieldKind::Slit)),
        );
        Self::new(fields)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|field| field.kind)
    }

    pub fn expected_keys(&self) -> &[String] {
        &self.expected_keys
    }

    pub fn is_device_current(&self, name: &str) -> bool {
        self.kind_of(name) == Some(FieldKind::DeviceCurrent)
    }
}

impl Default for HeaderSchema {
    fn default() -> Self {
        Self::instrument()
    }
}
