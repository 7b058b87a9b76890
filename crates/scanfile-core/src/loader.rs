use crate::common::config::LoaderConfig;
use crate::domain::{ScanError, ScanResult, ScanVariable, Series, SortedProperties};
use crate::header::schema::HeaderSchema;
use crate::header::{HeaderDiagnostic, HeaderExtraction, HeaderExtractor};
use crate::series::SeriesCorrector;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Header metadata and corrected series of one scan file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedScan {
    source_path: PathBuf,
    header: HeaderExtraction,
    series: Series,
}

impl LoadedScan {
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn header(&self) -> &HeaderExtraction {
        &self.header
    }

    pub fn properties(&self) -> &SortedProperties {
        self.header.sorted()
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn report(&self) -> ScanReport<'_> {
        ScanReport {
            source: self.source_path.display().to_string(),
            properties: self.header.sorted(),
            scan_variable: self.header.scan_variable(),
            series: &self.series,
            diagnostics: self.header.diagnostics(),
        }
    }
}

/// JSON view of a [`LoadedScan`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport<'a> {
    pub source: String,
    pub properties: &'a SortedProperties,
    pub scan_variable: Option<&'a ScanVariable>,
    pub series: &'a Series,
    pub diagnostics: &'a [HeaderDiagnostic],
}

#[derive(Debug, Clone, Default)]
pub struct ScanLoader {
    config: LoaderConfig,
    extractor: HeaderExtractor,
    corrector: SeriesCorrector,
}

impl ScanLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_schema(config, HeaderSchema::instrument())
    }

    pub fn with_schema(config: LoaderConfig, schema: HeaderSchema) -> Self {
        let corrector = SeriesCorrector::new(config.calibration);
        Self {
            config,
            extractor: HeaderExtractor::new(schema),
            corrector,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads `<prefix><index><format>` from `directory`.
    pub fn load_index(&self, directory: &Path, index: u32) -> ScanResult<LoadedScan> {
        let file_name = self.config.file_name(index);
        self.load_path(&directory.join(file_name.file_name()))
    }

    pub fn load_path(&self, path: &Path) -> ScanResult<LoadedScan> {
        let source = fs::read_to_string(path).map_err(|source| {
            ScanError::io_system(
                "IO.SCAN_READ",
                format!("failed to read scan file '{}': {}", path.display(), source),
            )
        })?;
        Ok(self.load_source(path, &source))
    }

    /// Parses already-read file content; `path` is only recorded.
    pub fn load_source(&self, path: &Path, source: &str) -> LoadedScan {
        let lines: Vec<&str> = source.lines().collect();
        let header = self.extractor.extract(&lines);
        let series = self.corrector.process(&lines);

        tracing::debug!(
            path = %path.display(),
            properties = header.sorted().used_count(),
            points = series.len(),
            valid = series.is_valid(),
            "loaded scan file"
        );

        LoadedScan {
            source_path: path.to_path_buf(),
            header,
            series,
        }
    }
}
