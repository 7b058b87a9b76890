mod commands;
mod helpers;

use clap::Parser;
use scanfile_core::ScanError;
use tracing_subscriber::EnvFilter;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let scan_error = error.as_scan_error();
            eprintln!("{}", scan_error.diagnostic_line());
            eprintln!("{}", scan_error.fatal_exit_line());
            scan_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let full_args = std::iter::once("scanfile".to_string())
        .chain(args)
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            init_logging(cli.verbose);
            dispatch_parsed(cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, defaulting to warnings.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when `run` is called more than once.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Parser)]
#[command(name = "scanfile", about = "Scan file metadata and count-series loader")]
struct Cli {
    /// Log extraction and correction details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Load one scan file and print its properties and corrected series
    Load(commands::LoadArgs),
    /// Load a numbered range or glob of scan files and write per-file artifacts
    Batch(commands::BatchArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Load(args) => commands::run_load_command(args),
        CliCommand::Batch(args) => commands::run_batch_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Scan(ScanError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_scan_error(&self) -> ScanError {
        match self {
            Self::Usage(message) => ScanError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Scan(error) => error.clone(),
            Self::Internal(error) => ScanError::io_system("IO.CLI", format!("{error:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CliError, run};
    use scanfile_core::ScanErrorCategory;

    #[test]
    fn help_is_not_an_error() {
        assert_eq!(run(["--help"]).expect("help should succeed"), 0);
        assert_eq!(run(["batch", "--help"]).expect("help should succeed"), 0);
    }

    #[test]
    fn unknown_subcommand_is_usage_error() {
        let error = run(["convert"]).expect_err("unknown subcommand should fail");
        assert!(matches!(error, CliError::Usage(_)));

        let mapped = error.as_scan_error();
        assert_eq!(mapped.category(), ScanErrorCategory::InputValidationError);
        assert_eq!(mapped.placeholder(), "INPUT.CLI_USAGE");
        assert_eq!(mapped.exit_code(), 2);
    }

    #[test]
    fn internal_errors_map_to_io_exit_code() {
        let error = CliError::Internal(anyhow::anyhow!("disk full"));
        let mapped = error.as_scan_error();
        assert_eq!(mapped.exit_code(), 3);
        assert_eq!(mapped.diagnostic_line(), "ERROR: [IO.CLI] disk full");
    }
}
