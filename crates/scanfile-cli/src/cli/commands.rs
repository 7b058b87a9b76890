use super::CliError;
use super::helpers::*;
use scanfile_core::common::constants::{DEFAULT_FILE_FORMAT, DEFAULT_FILE_PREFIX};
use scanfile_core::{LoaderConfig, ScanLoader};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct LoadArgs {
    /// Scan file to load
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print a JSON document instead of the human summary
    #[arg(long)]
    json: bool,

    /// JSON calibration profile overriding the instrument constants
    #[arg(long, value_name = "PATH")]
    calibration: Option<PathBuf>,
}

#[derive(clap::Args)]
#[command(group(clap::ArgGroup::new("selection").required(true).args(["first", "pattern"])))]
pub(super) struct BatchArgs {
    /// Directory holding the scan files
    #[arg(long)]
    dir: PathBuf,

    /// File name prefix for numbered selection
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    prefix: String,

    /// File format suffix for numbered selection
    #[arg(long, default_value = DEFAULT_FILE_FORMAT)]
    format: String,

    /// First scan index (inclusive)
    #[arg(long, requires = "last")]
    first: Option<u32>,

    /// Last scan index (inclusive)
    #[arg(long, requires = "first")]
    last: Option<u32>,

    /// Glob matched against file names in --dir
    #[arg(long, conflicts_with_all = ["first", "last"])]
    pattern: Option<String>,

    /// Directory receiving per-file artifacts and batch-report.json
    #[arg(long)]
    output_dir: PathBuf,

    /// JSON calibration profile overriding the instrument constants
    #[arg(long, value_name = "PATH")]
    calibration: Option<PathBuf>,
}

impl BatchArgs {
    fn selection(&self) -> Result<FileSelection, CliError> {
        match (&self.pattern, self.first, self.last) {
            (Some(pattern), _, _) => Ok(FileSelection::Pattern(pattern.clone())),
            (None, Some(first), Some(last)) if first <= last => {
                Ok(FileSelection::Range { first, last })
            }
            (None, Some(first), Some(last)) => Err(CliError::Usage(format!(
                "--first ({first}) must not exceed --last ({last})"
            ))),
            _ => Err(CliError::Usage(
                "batch needs either --first/--last or --pattern".to_string(),
            )),
        }
    }
}

pub(super) fn run_load_command(args: LoadArgs) -> Result<i32, CliError> {
    let config = LoaderConfig {
        calibration: resolve_calibration(args.calibration.as_deref())?,
        ..LoaderConfig::default()
    };
    let loaded = ScanLoader::new(config)
        .load_path(&args.file)
        .map_err(CliError::Scan)?;

    if args.json {
        println!("{}", render_json(&loaded.report())?);
    } else {
        print!("{}", render_scan_summary(&loaded));
    }
    Ok(0)
}

pub(super) fn run_batch_command(args: BatchArgs) -> Result<i32, CliError> {
    let selection = args.selection()?;
    let config = LoaderConfig {
        file_prefix: args.prefix.clone(),
        file_format: args.format.clone(),
        calibration: resolve_calibration(args.calibration.as_deref())?,
    };
    let files = select_scan_files(&args.dir, &selection, &config)?;
    let loader = ScanLoader::new(config);

    let report = run_batch(&loader, &files, &args.dir, &args.output_dir)?;
    println!("{}", render_batch_summary(&report));
    println!(
        "JSON report: {}",
        args.output_dir.join(BATCH_REPORT_FILE).display()
    );

    if report.failed == 0 { Ok(0) } else { Ok(1) }
}
