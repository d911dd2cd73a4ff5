use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mdentry")]
#[command(about = "Market data entry - validate and submit market data record batches")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "mdentry.yaml", env = "MDENTRY_CONFIG")]
    pub config: PathBuf,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "mdentry.yaml")]
        output: PathBuf,
    },

    /// Validate the configuration file
    CheckConfig,

    /// Write a batch file of template records to fill in
    Template {
        /// Output batch file (.json or .yaml)
        #[arg(short, long, default_value = "records.yaml")]
        output: PathBuf,

        /// Number of records
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Pre-fill records with demo data regardless of configuration
        #[arg(long)]
        demo: bool,
    },

    /// Validate every record of a batch file without submitting
    Validate {
        /// Batch file (.json or .yaml)
        records: PathBuf,
    },

    /// Validate and submit a batch file
    Submit {
        /// Batch file (.json or .yaml)
        records: PathBuf,

        /// Validate and print the payload without contacting the endpoint
        #[arg(long)]
        dry_run: bool,
    },

    /// Edit records interactively, then submit
    Edit {
        /// Batch file to start from (starts with one template record otherwise)
        records: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
