pub mod config;
pub mod constants;

pub use config::{
    CalibrationProfile, CalibrationProfileError, LoaderConfig, load_calibration_profile,
};
