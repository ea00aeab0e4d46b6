use clap::{Parser, Subcommand, Args};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (", env!("GIT_HASH"), ", built ", env!("BUILD_TIMESTAMP"), ")"
);

#[derive(Parser)]
#[command(
    name = "trivy-report",
    version,
    long_version = LONG_VERSION,
    about = "Scan container images with a disposable Trivy container and report the findings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress scanner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan one or more images and print the Markdown report
    Scan(ScanArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Image references to scan, in order
    #[arg(required = true)]
    pub images: Vec<String>,

    /// YAML configuration file
    #[arg(short, long, default_value = "./config.yml")]
    pub config: String,

    /// Remove each image after it has been scanned
    #[arg(long)]
    pub remove_image: bool,

    /// Override the scanner timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Write the combined issue text to this file
    #[arg(long)]
    pub issue_out: Option<String>,

    /// Write the cross-image summary table to this file
    #[arg(long)]
    pub summary_out: Option<String>,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "./config.yml")]
    pub config: String,
}
