//! CLI argument definitions for the csvcmp binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

/// Default backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default mapping store directory.
pub const DEFAULT_MAPPINGS_DIR: &str = "mappings";

#[derive(Parser)]
#[command(
    name = "csvcmp",
    version,
    about = "CSV comparison toolkit - map, recommend, and inspect column mappings",
    long_about = "Compare two CSV files column by column.\n\n\
                  Manages saved column mappings, recommends the best saved mapping\n\
                  for a pair of files, guesses column pairings from headers and\n\
                  values, and filters run issue reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank saved mappings against a pair of CSV files.
    Recommend(RecommendArgs),

    /// Guess column pairings between two CSV files.
    Guess(GuessArgs),

    /// Print the header columns discovered for a pair of files.
    Columns(ColumnsArgs),

    /// Manage the saved mapping store.
    Mappings(MappingsArgs),

    /// Filter a run's issue report.
    Issues(IssuesArgs),
}

/// File selection shared by the column-driven commands. Each side is a
/// local file or a backend-known path; local files win when both are given.
#[derive(Args)]
pub struct FileArgs {
    /// Local CSV file for the left side.
    #[arg(long = "left", value_name = "FILE")]
    pub left: Option<PathBuf>,

    /// Local CSV file for the right side.
    #[arg(long = "right", value_name = "FILE")]
    pub right: Option<PathBuf>,

    /// Backend-known path for the left side.
    #[arg(long = "left-path", value_name = "PATH")]
    pub left_path: Option<String>,

    /// Backend-known path for the right side.
    #[arg(long = "right-path", value_name = "PATH")]
    pub right_path: Option<String>,

    /// Backend base URL for server-known paths.
    #[arg(long = "backend", value_name = "URL", default_value = DEFAULT_BACKEND_URL)]
    pub backend: String,
}

#[derive(Args)]
pub struct RecommendArgs {
    #[command(flatten)]
    pub files: FileArgs,

    /// Mapping store directory.
    #[arg(long = "mappings-dir", value_name = "DIR", default_value = DEFAULT_MAPPINGS_DIR)]
    pub mappings_dir: PathBuf,
}

#[derive(Args)]
pub struct GuessArgs {
    #[command(flatten)]
    pub files: FileArgs,

    /// Rows sampled per column for value-based matching.
    #[arg(long = "sample-rows", value_name = "N", default_value_t = 200)]
    pub sample_rows: usize,
}

#[derive(Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub files: FileArgs,
}

#[derive(Args)]
pub struct MappingsArgs {
    #[command(subcommand)]
    pub command: MappingsCommand,

    /// Mapping store directory.
    #[arg(long = "mappings-dir", value_name = "DIR", default_value = DEFAULT_MAPPINGS_DIR, global = true)]
    pub mappings_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum MappingsCommand {
    /// List saved mappings.
    List,

    /// Show one mapping's field rules.
    Show {
        /// Mapping name.
        name: String,
    },

    /// Print a mapping document as indented JSON (the copy surface).
    Export {
        /// Mapping name.
        name: String,

        /// Write to a file instead of stdout.
        #[arg(long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Move a mapping to the store's trash.
    Delete {
        /// Mapping name.
        name: String,
    },
}

#[derive(Args)]
pub struct IssuesArgs {
    /// Issues report CSV (record_key, severity, issue_type, column, message).
    #[arg(value_name = "REPORT")]
    pub report: PathBuf,

    /// Free-text search across all cells, case-insensitive.
    #[arg(long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Keep only issues of this severity.
    #[arg(long = "severity", value_name = "LEVEL")]
    pub severity: Option<String>,

    /// Keep only issues of this type.
    #[arg(long = "kind", value_name = "TYPE")]
    pub kind: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
