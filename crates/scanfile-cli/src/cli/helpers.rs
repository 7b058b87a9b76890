use super::CliError;
use anyhow::Context;
use globset::Glob;
use scanfile_core::common::{
    CalibrationProfile, CalibrationProfileError, LoaderConfig, load_calibration_profile,
};
use scanfile_core::serialization::{render_series_table, write_json_artifact, write_text_artifact};
use scanfile_core::{LoadedScan, ScanError, ScanLoader};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub(super) const BATCH_REPORT_FILE: &str = "batch-report.json";
const DEFAULT_X_LABEL: &str = "x";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum FileSelection {
    Range { first: u32, last: u32 },
    Pattern(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum BatchFileStatus {
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BatchFileEntry {
    pub(super) source: String,
    pub(super) status: BatchFileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) points: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) scan_variable: Option<String>,
    pub(super) diagnostics: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) error: Option<String>,
    pub(super) outputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BatchReport {
    pub(super) directory: String,
    pub(super) output_dir: String,
    pub(super) loaded: usize,
    pub(super) failed: usize,
    pub(super) valid_series: usize,
    pub(super) files: Vec<BatchFileEntry>,
}

pub(super) fn resolve_calibration(path: Option<&Path>) -> Result<CalibrationProfile, CliError> {
    let Some(path) = path else {
        return Ok(CalibrationProfile::default());
    };

    load_calibration_profile(path).map_err(|error| {
        let scan_error = match &error {
            CalibrationProfileError::Read { .. } => {
                ScanError::io_system("IO.CALIBRATION_READ", error.to_string())
            }
            CalibrationProfileError::Parse { .. } | CalibrationProfileError::Invalid { .. } => {
                ScanError::input_validation("INPUT.CALIBRATION", error.to_string())
            }
        };
        CliError::Scan(scan_error)
    })
}

/// Numbered selections name every index in the range, present or not; a missing
/// file is reported as a failed load rather than skipped.
pub(super) fn select_scan_files(
    directory: &Path,
    selection: &FileSelection,
    config: &LoaderConfig,
) -> Result<Vec<PathBuf>, CliError> {
    match selection {
        FileSelection::Range { first, last } => Ok((*first..=*last)
            .map(|index| directory.join(config.file_name(index).file_name()))
            .collect()),
        FileSelection::Pattern(pattern) => {
            let matcher = Glob::new(pattern)
                .map_err(|source| {
                    CliError::Usage(format!("invalid glob pattern '{}': {}", pattern, source))
                })?
                .compile_matcher();

            let read_dir_error = |source: std::io::Error| {
                CliError::Scan(ScanError::io_system(
                    "IO.BATCH_DIR",
                    format!(
                        "failed to read scan directory '{}': {}",
                        directory.display(),
                        source
                    ),
                ))
            };

            let mut files = Vec::new();
            for entry in fs::read_dir(directory).map_err(read_dir_error)? {
                let path = entry.map_err(read_dir_error)?.path();
                if path.is_file()
                    && path
                        .file_name()
                        .is_some_and(|file_name| matcher.is_match(file_name))
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        }
    }
}

pub(super) fn run_batch(
    loader: &ScanLoader,
    files: &[PathBuf],
    directory: &Path,
    output_dir: &Path,
) -> Result<BatchReport, CliError> {
    let mut report = BatchReport {
        directory: directory.display().to_string(),
        output_dir: output_dir.display().to_string(),
        loaded: 0,
        failed: 0,
        valid_series: 0,
        files: Vec::with_capacity(files.len()),
    };

    for path in files {
        match loader.load_path(path) {
            Ok(loaded) => {
                let outputs = write_scan_outputs(output_dir, &loaded)?;
                let series = loaded.series();
                tracing::info!(
                    path = %path.display(),
                    points = series.len(),
                    valid = series.is_valid(),
                    "batch file loaded"
                );

                report.loaded += 1;
                if series.is_valid() {
                    report.valid_series += 1;
                }
                report.files.push(BatchFileEntry {
                    source: path.display().to_string(),
                    status: BatchFileStatus::Loaded,
                    valid: Some(series.is_valid()),
                    points: Some(series.len()),
                    scan_variable: loaded
                        .header()
                        .scan_variable()
                        .map(|variable| variable.name.clone()),
                    diagnostics: loaded.header().diagnostics().len(),
                    error: None,
                    outputs: outputs
                        .iter()
                        .map(|output| output.display().to_string())
                        .collect(),
                });
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), "{}", error.message());
                report.failed += 1;
                report.files.push(BatchFileEntry {
                    source: path.display().to_string(),
                    status: BatchFileStatus::Failed,
                    valid: None,
                    points: None,
                    scan_variable: None,
                    diagnostics: 0,
                    error: Some(error.diagnostic_line()),
                    outputs: Vec::new(),
                });
            }
        }
    }

    let report_path = output_dir.join(BATCH_REPORT_FILE);
    write_json_artifact(&report_path, &report).with_context(|| {
        format!("failed to write batch report '{}'", report_path.display())
    })?;
    Ok(report)
}

/// Writes `<stem>.properties.json` and, for a valid series, `<stem>.series.dat`.
pub(super) fn write_scan_outputs(
    output_dir: &Path,
    loaded: &LoadedScan,
) -> anyhow::Result<Vec<PathBuf>> {
    let stem = loaded
        .source_path()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| {
            format!(
                "scan path '{}' has no file name",
                loaded.source_path().display()
            )
        })?;

    let mut outputs = Vec::with_capacity(2);
    let properties_path = output_dir.join(format!("{stem}.properties.json"));
    write_json_artifact(&properties_path, loaded.properties())
        .with_context(|| format!("failed to write '{}'", properties_path.display()))?;
    outputs.push(properties_path);

    let series = loaded.series();
    if series.is_valid() {
        let x_label = loaded
            .header()
            .scan_variable()
            .map_or(DEFAULT_X_LABEL, |variable| variable.name.as_str());
        let series_path = output_dir.join(format!("{stem}.series.dat"));
        write_text_artifact(&series_path, &render_series_table(series, x_label))
            .with_context(|| format!("failed to write '{}'", series_path.display()))?;
        outputs.push(series_path);
    }

    Ok(outputs)
}

pub(super) fn render_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|source| {
        CliError::Scan(ScanError::internal(
            "INTERNAL.JSON_RENDER",
            format!("failed to render JSON output: {}", source),
        ))
    })
}

pub(super) fn render_scan_summary(loaded: &LoadedScan) -> String {
    let mut rendered = String::new();
    let header = loaded.header();
    let series = loaded.series();

    let _ = writeln!(rendered, "Source: {}", loaded.source_path().display());
    match header.scan_variable() {
        Some(variable) => {
            let _ = writeln!(rendered, "Scan variable: {} ({})", variable.name, variable.unit);
        }
        None => rendered.push_str("Scan variable: none\n"),
    }

    rendered.push_str("Properties:\n");
    for (key, value) in loaded.properties().iter() {
        let _ = writeln!(rendered, "  {key:<14} {value}");
    }

    if series.is_valid() {
        let _ = writeln!(rendered, "Series: {} points", series.len());
        let x_label = header
            .scan_variable()
            .map_or(DEFAULT_X_LABEL, |variable| variable.name.as_str());
        rendered.push_str(&render_series_table(series, x_label));
    } else {
        rendered.push_str("Series: not a scan\n");
    }

    if !header.diagnostics().is_empty() {
        rendered.push_str("Diagnostics:\n");
        for diagnostic in header.diagnostics() {
            let _ = writeln!(rendered, "  {diagnostic}");
        }
    }
    rendered
}

pub(super) fn render_batch_summary(report: &BatchReport) -> String {
    let status = if report.failed == 0 { "PASS" } else { "FAIL" };
    let mut rendered = format!(
        "Batch status: {}\nFiles: {} (loaded {}, failed {}, valid series {})",
        status,
        report.files.len(),
        report.loaded,
        report.failed,
        report.valid_series
    );
    for entry in report
        .files
        .iter()
        .filter(|entry| entry.status == BatchFileStatus::Failed)
    {
        let _ = write!(
            rendered,
            "\n  FAIL {}: {}",
            entry.source,
            entry.error.as_deref().unwrap_or_default()
        );
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::{
        BatchFileStatus, CliError, FileSelection, render_batch_summary, render_json,
        render_scan_summary, run_batch, select_scan_files,
    };
    use scanfile_core::{LoaderConfig, ScanErrorCategory, ScanLoader};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const SCAN: &str = "\
# info : ascan stt 20 21 0.5
# dct1_value : 12.5 A
### Scan data
# xname stt
# xunit deg
20.0 1.0 0 0 1000 500
20.5 1.0 0 0 2000 500
";

    #[test]
    fn range_selection_names_every_index() {
        let files = select_scan_files(
            Path::new("scans"),
            &FileSelection::Range { first: 9, last: 11 },
            &LoaderConfig::default(),
        )
        .expect("range selection should succeed");

        let names: Vec<String> = files
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                Path::new("scans").join("15315_0009.dat").display().to_string(),
                Path::new("scans").join("15315_00010.dat").display().to_string(),
                Path::new("scans").join("15315_00011.dat").display().to_string(),
            ]
        );
    }

    #[test]
    fn pattern_selection_is_sorted_and_matches_file_names_only() {
        let temp = TempDir::new().expect("tempdir should be created");
        for name in ["b.dat", "a.dat", "notes.txt"] {
            fs::write(temp.path().join(name), "").expect("file should be written");
        }
        fs::create_dir(temp.path().join("nested.dat")).expect("dir should be created");

        let files = select_scan_files(
            temp.path(),
            &FileSelection::Pattern("*.dat".to_string()),
            &LoaderConfig::default(),
        )
        .expect("pattern selection should succeed");

        assert_eq!(files, vec![temp.path().join("a.dat"), temp.path().join("b.dat")]);
    }

    #[test]
    fn invalid_glob_is_usage_error() {
        let error = select_scan_files(
            Path::new("."),
            &FileSelection::Pattern("[".to_string()),
            &LoaderConfig::default(),
        )
        .expect_err("invalid glob should fail");
        assert!(matches!(error, CliError::Usage(_)));
    }

    #[test]
    fn unrenderable_json_is_internal_error() {
        let mut value = BTreeMap::new();
        value.insert((12, 13), "tuple keys are not JSON object keys");

        let error = render_json(&value).expect_err("tuple keys should not render");
        let CliError::Scan(scan_error) = error else {
            panic!("render failure should be a scan error");
        };
        assert_eq!(scan_error.category(), ScanErrorCategory::InternalError);
        assert_eq!(scan_error.placeholder(), "INTERNAL.JSON_RENDER");
        assert_eq!(scan_error.exit_code(), 5);
    }

    #[test]
    fn report_renders_as_pretty_json() {
        let loaded = ScanLoader::default().load_source(Path::new("mem.dat"), SCAN);
        let rendered = render_json(&loaded.report()).expect("report should render");
        let parsed: serde_json::Value =
            serde_json::from_str(&rendered).expect("rendered report should parse");
        assert_eq!(parsed["series"]["realCounts"][0], 6497);
    }

    #[test]
    fn batch_records_failures_and_writes_outputs() {
        let temp = TempDir::new().expect("tempdir should be created");
        let input = temp.path().join("in");
        let output = temp.path().join("out");
        fs::create_dir(&input).expect("input dir should be created");
        fs::write(input.join("15315_0001.dat"), SCAN).expect("scan should be written");

        let files = vec![input.join("15315_0001.dat"), input.join("15315_0002.dat")];
        let report = run_batch(&ScanLoader::default(), &files, &input, &output)
            .expect("batch should complete");

        assert_eq!(report.loaded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.valid_series, 1);
        assert_eq!(report.files[1].status, BatchFileStatus::Failed);
        assert!(output.join("15315_0001.properties.json").is_file());
        assert!(output.join("15315_0001.series.dat").is_file());
        assert!(output.join("batch-report.json").is_file());

        let summary = render_batch_summary(&report);
        assert!(summary.starts_with("Batch status: FAIL"));
        assert!(summary.contains("15315_0002.dat"));
    }

    #[test]
    fn scan_summary_lists_schema_properties_and_series() {
        let loaded = ScanLoader::default().load_source(Path::new("mem.dat"), SCAN);
        let summary = render_scan_summary(&loaded);

        assert!(summary.contains("Scan variable: stt (deg)"));
        assert!(summary.contains("  stt            Scanned"));
        assert!(summary.contains("  ss2_height     Unused"));
        assert!(summary.contains("Series: 2 points"));
        assert!(summary.contains("6497"));
        assert!(!summary.contains("Diagnostics:"));
    }
}
