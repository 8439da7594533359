use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the throwdoc binary.
#[derive(Parser, Debug)]
#[command(
    name = "throwdoc",
    version,
    about = "Verify that documented exceptions match what bodies can throw"
)]
pub struct CliArgs {
    /// Program dump produced by the front end (JSON).
    pub program: PathBuf,

    /// Adjustment rule files, or directories searched for them.
    ///
    /// Only files named `ExceptionAdjustments*.txt` are read; anything else
    /// is ignored.
    pub inputs: Vec<PathBuf>,

    /// Path to throwdoc.json. Defaults to throwdoc.json in the working
    /// directory when present.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Output format for diagnostics.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Worker threads; defaults to the number of CPUs.
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Skip the built-in adjustment table.
    #[arg(long = "no-builtin-rules")]
    pub no_builtin_rules: bool,

    /// Also print diagnostics whose severity is hidden.
    #[arg(long = "show-hidden")]
    pub show_hidden: bool,

    /// Enable color and formatting in output.
    #[arg(long)]
    pub pretty: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
