//! Loader for scattering-instrument scan files.
//!
//! A scan file is a `#` comment header followed by a whitespace-delimited
//! numeric table. [`header::HeaderExtractor`] turns the header into a
//! schema-ordered property map and [`series::SeriesCorrector`] turns the table
//! into a flux-normalised, artifact-corrected count series. The two are
//! independent; [`loader::ScanLoader`] runs both over one read of the file.

pub mod common;
pub mod domain;
pub mod header;
pub mod loader;
pub mod serialization;
pub mod series;

pub use common::{CalibrationProfile, LoaderConfig};
pub use domain::{
    PropertyValue, RawProperties, ScanError, ScanErrorCategory, ScanFileName, ScanResult,
    ScanVariable, Series, SortedProperties,
};
pub use header::{HeaderExtraction, HeaderExtractor};
pub use loader::{LoadedScan, ScanLoader, ScanReport};
pub use series::SeriesCorrector;
