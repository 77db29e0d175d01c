// qmeta - resolve speaker affiliations of conference talks to countries,
// reconcile them across editions and write per-year statistics

mod exit_codes;
mod pipeline;
mod resolve;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use qmeta_config::ConfigError;
use qmeta_io::IoError;

#[derive(Parser)]
#[command(name = "qmeta")]
#[command(about = "Conference talk affiliation resolution and reconciliation")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/qmeta/qmeta.toml when present)
    #[arg(long, global = true, env = "QMETA_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only log warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline over the staged data tree
    #[command(after_help = "\
Reads <data-dir>/raw/<year>/talks.json (or talks.csv) and writes
<output-dir>/<year>/{plenary,parallel,poster,all}_talks.csv,
<output-dir>/<year>/statistics.json and <output-dir>/summary.json.

Examples:
  qmeta run
  qmeta run --data-dir data --year 2019 --year 2022
  qmeta run --mappings fixes.csv --participants participants.csv --json
  qmeta run --unknowns-out unknown_institutes.csv")]
    Run {
        /// Root of the staged data tree
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Where processed files go (default: <data-dir>/processed)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        inputs: InputArgs,

        /// Process only this edition. Repeatable.
        #[arg(long = "year", value_name = "YEAR", value_parser = parse_year)]
        years: Vec<String>,

        /// Write institutes still lacking a country to this CSV template
        #[arg(long, value_name = "FILE")]
        unknowns_out: Option<PathBuf>,

        /// Print the run summary as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Explain how one affiliation resolves
    #[command(after_help = "\
Examples:
  qmeta resolve 'CERN (CH)'
  qmeta resolve 'Dept. of Physics, University of Jyvaskyla, Finland' --json
  qmeta resolve '' --speaker 'Jean-Yves Ollitrault' --participants participants.csv")]
    Resolve {
        /// Affiliation text as written by the speaker
        affiliation: String,

        /// Speaker name, used to look up an empty affiliation in the participants list
        #[arg(long)]
        speaker: Option<String>,

        #[command(flatten)]
        inputs: InputArgs,

        /// Print the resolution as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show the effective lookup tables
    Tables {
        #[command(flatten)]
        mappings: MappingArgs,

        /// Print the full tables as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

/// `--mappings`, accepted by every command that builds lookup tables.
#[derive(clap::Args, Default)]
pub struct MappingArgs {
    /// Extra Institute,Country mapping file. Repeatable; earlier files take precedence.
    #[arg(long = "mappings", value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Lookup inputs shared by `run` and `resolve`.
#[derive(clap::Args, Default)]
pub struct InputArgs {
    #[command(flatten)]
    pub mappings: MappingArgs,

    /// Participants CSV (name, then affiliation and/or country)
    #[arg(long, value_name = "FILE")]
    pub participants: Option<PathBuf>,
}

fn parse_year(s: &str) -> Result<String, String> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        Ok(s.to_string())
    } else {
        Err(format!("'{s}' is not a year"))
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  qmeta-recon ", env!("CARGO_PKG_VERSION"),
    )
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::ConflictingRule { .. } => {
                Some("remove one of the two rules from the mapping file or settings".to_string())
            }
            ConfigError::Parse(_) => Some("check the settings file against qmeta.toml syntax".to_string()),
            _ => None,
        };
        Self { code: EXIT_CONFIG, message: err.to_string(), hint }
    }

    pub fn io(err: IoError) -> Self {
        Self { code: exit_codes::io_exit_code(&err), message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Entry point
// ============================================================================

fn init_logging(quiet: bool) {
    // stderr only: stdout carries --json output
    let default = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("QMETA_LOG", default))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run { data_dir, output_dir, inputs, years, unknowns_out, json } => {
            let overrides = pipeline::Overrides { data_dir, output_dir, inputs, years };
            run::cmd_run(config, overrides, unknowns_out, json)
        }
        Commands::Resolve { affiliation, speaker, inputs, json } => {
            resolve::cmd_resolve(config, inputs, &affiliation, speaker.as_deref(), json)
        }
        Commands::Tables { mappings, json } => {
            let inputs = InputArgs { mappings, participants: None };
            resolve::cmd_tables(config, inputs, json)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Print `value` as one pretty JSON document on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("cannot serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}
