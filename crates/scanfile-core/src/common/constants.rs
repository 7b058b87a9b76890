//! Instrument calibration constants and the markers of the acquisition header dialect.

pub const PI2: f64 = 6.283_185_307_179_586_476_925_286_766_559_f64;

/// Detector efficiency normalisation factor (counts per unit flux).
pub const NORMED_DETECTOR_EFFICIENCY: f64 = 3.24e4;
/// Reference wavelength of the detector calibration, in metres.
pub const NORMED_DETECTOR_WAVELENGTH: f64 = 1.8e-10;
/// Incident neutron wave vector, in inverse metres.
pub const INCIDENT_WAVE_VECTOR: f64 = 1.4e10;

pub const COMMENT_MARKER: char = '#';
pub const SCAN_BLOCK_MARKER: &str = "###";
pub const DATA_START: &str = "Scan data";
pub const PARAMETER_SUFFIX: &str = "_value";
pub const COUNT_TIME: &str = "det_preset";
pub const SCAN_INFO: &str = "info";

/// Unit every device-current scan variable is reported in.
pub const CANONICAL_CURRENT_UNIT: &str = "A";

/// Two scan positions closer than this are treated as one duplicated tag.
pub const POSITION_TOLERANCE: f64 = 1.0e-3;

pub const DEFAULT_FILE_PREFIX: &str = "15315_000";
pub const DEFAULT_FILE_FORMAT: &str = "dat";
