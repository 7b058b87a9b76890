use super::constants::{
    DEFAULT_FILE_FORMAT, DEFAULT_FILE_PREFIX, INCIDENT_WAVE_VECTOR, NORMED_DETECTOR_EFFICIENCY,
    NORMED_DETECTOR_WAVELENGTH, PI2,
};
use crate::domain::ScanFileName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Calibration used to turn monitor counts into incident flux.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CalibrationProfile {
    #[serde(rename = "detectorEfficiency", default = "default_detector_efficiency")]
    pub detector_efficiency: f64,
    #[serde(rename = "referenceWavelength", default = "default_reference_wavelength")]
    pub reference_wavelength: f64,
    #[serde(rename = "incidentWaveVector", default = "default_incident_wave_vector")]
    pub incident_wave_vector: f64,
}

fn default_detector_efficiency() -> f64 {
    NORMED_DETECTOR_EFFICIENCY
}

fn default_reference_wavelength() -> f64 {
    NORMED_DETECTOR_WAVELENGTH
}

fn default_incident_wave_vector() -> f64 {
    INCIDENT_WAVE_VECTOR
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            detector_efficiency: default_detector_efficiency(),
            reference_wavelength: default_reference_wavelength(),
            incident_wave_vector: default_incident_wave_vector(),
        }
    }
}

impl CalibrationProfile {
    pub fn incident_wavelength(&self) -> f64 {
        PI2 / self.incident_wave_vector
    }

    pub fn flux(&self, monitor_counts: f64) -> f64 {
        monitor_counts / self.detector_efficiency * self.incident_wavelength()
            / self.reference_wavelength
    }

    fn validate(self, path: &Path) -> Result<Self, CalibrationProfileError> {
        for (field, value) in [
            ("detectorEfficiency", self.detector_efficiency),
            ("referenceWavelength", self.reference_wavelength),
            ("incidentWaveVector", self.incident_wave_vector),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalibrationProfileError::Invalid {
                    path: path.to_path_buf(),
                    field,
                    value,
                });
            }
        }
        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CalibrationProfileError {
    #[error("failed to read calibration profile '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse calibration profile '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("calibration profile '{}' has non-positive {field} ({value})", path.display())]
    Invalid {
        path: PathBuf,
        field: &'static str,
        value: f64,
    },
}

pub fn load_calibration_profile(
    profile_path: impl AsRef<Path>,
) -> Result<CalibrationProfile, CalibrationProfileError> {
    let profile_path = profile_path.as_ref();
    let source =
        fs::read_to_string(profile_path).map_err(|source| CalibrationProfileError::Read {
            path: profile_path.to_path_buf(),
            source,
        })?;
    let profile: CalibrationProfile =
        serde_json::from_str(&source).map_err(|source| CalibrationProfileError::Parse {
            path: profile_path.to_path_buf(),
            source,
        })?;
    profile.validate(profile_path)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub file_prefix: String,
    pub file_format: String,
    pub calibration: CalibrationProfile,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            file_format: DEFAULT_FILE_FORMAT.to_string(),
            calibration: CalibrationProfile::default(),
        }
    }
}

impl LoaderConfig {
    pub fn file_name(&self, index: u32) -> ScanFileName {
        ScanFileName::new(self.file_prefix.clone(), index, self.file_format.clone())
    }
}
