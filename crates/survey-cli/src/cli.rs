//! CLI argument definitions for Survey Studio.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "survey-studio",
    version,
    about = "Survey Studio - Compare questionnaire exports against a master baseline",
    long_about = "Compare multilingual questionnaire exports across survey editions.\n\n\
                  Builds a curatable master question set, diffs exports against it,\n\
                  and emits a JSON data document for report rendering."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

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
    /// Merge all exports into the master question file (newest wins).
    Master(MasterArgs),

    /// Compare every export against the master and write the report data.
    Report(ReportArgs),

    /// Compare two exports directly.
    Compare(CompareArgs),
}

#[derive(Parser)]
pub struct MasterArgs {
    /// Directory containing questionnaire JSON exports.
    #[arg(value_name = "EXPORTS_DIR")]
    pub exports_dir: PathBuf,

    /// Output path for the master YAML file.
    #[arg(
        long = "output",
        value_name = "PATH",
        default_value = "master/master.yaml"
    )]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Directory containing questionnaire JSON exports.
    #[arg(value_name = "EXPORTS_DIR")]
    pub exports_dir: PathBuf,

    /// Path to the master YAML file.
    #[arg(
        long = "master",
        value_name = "PATH",
        default_value = "master/master.yaml"
    )]
    pub master: PathBuf,

    /// Output directory for the report data document.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "out")]
    pub output_dir: PathBuf,

    /// Optional YAML file mapping section-name variants to canonical names.
    #[arg(long = "aliases", value_name = "PATH")]
    pub aliases: Option<PathBuf>,

    /// Similarity threshold above which changed texts count as "similar".
    #[arg(long = "threshold", value_name = "RATIO", default_value_t = 0.9)]
    pub threshold: f64,
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Older export file.
    #[arg(value_name = "EXPORT_A")]
    pub export_a: PathBuf,

    /// Newer export file.
    #[arg(value_name = "EXPORT_B")]
    pub export_b: PathBuf,

    /// Similarity threshold above which changed texts count as "similar".
    #[arg(long = "threshold", value_name = "RATIO", default_value_t = 0.9)]
    pub threshold: f64,
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
