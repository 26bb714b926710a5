use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::ReportKind;

#[derive(Parser)]
#[command(name = "ideascope", version, about = "Validate a startup idea with three AI research reports")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn globals(&self) -> GlobalOptions {
        GlobalOptions {
            config: self.config.clone(),
            quiet: self.quiet,
        }
    }
}

/// Flags every handler may need.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a startup idea (validation, market size, competitors)
    Analyze(AnalyzeArgs),
    /// Manage the saved API key
    Key(KeyArgs),
    /// Render a saved API response without calling the API
    Render(RenderArgs),
    /// Validate a configuration file
    CheckConfig(CheckConfigArgs),
    /// Show version and build information
    Version,
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// The solution you want to build
    #[arg(long)]
    pub idea: String,

    /// The problem it solves
    #[arg(long)]
    pub problem: String,

    /// Who the product is for
    #[arg(long)]
    pub audience: Option<String>,

    /// Anything else the analyst should know
    #[arg(long)]
    pub context: Option<String>,

    /// API key for this run only (not saved)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Keep successful reports when another one fails
    #[arg(long)]
    pub partial: bool,

    /// Print the reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Write Markdown reports and raw responses to this directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub action: KeyAction,
}

#[derive(Subcommand, Clone)]
pub enum KeyAction {
    /// Save an API key
    Set {
        /// The API key
        key: String,
    },
    /// Show the saved key, masked
    Show,
    /// Remove the saved key
    Clear,
}

#[derive(Args, Clone)]
pub struct RenderArgs {
    /// File holding a serialized API response
    pub file: PathBuf,

    /// Report kind: validation, market-size, competitor-analysis
    #[arg(short, long)]
    pub kind: ReportKind,

    /// Print the rendered view as JSON
    #[arg(long)]
    pub json: bool,

    /// Print Markdown instead of styled text
    #[arg(long, conflicts_with = "json")]
    pub markdown: bool,
}

#[derive(Args, Clone)]
pub struct CheckConfigArgs {
    /// Config file to validate
    pub file: PathBuf,
}
