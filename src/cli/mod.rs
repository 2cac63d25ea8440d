//! Command-line interface for the quarry-server binary

use clap::Parser;
use std::path::PathBuf;

/// Quarry - AI Research Assistant Server
///
/// Runs research jobs in the background and serves progress, rendered
/// reports and downloads over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "quarry-server",
    version,
    about = "Quarry - AI Research Assistant Server",
    after_help = "EXAMPLES:\n    \
                  quarry-server                       # Start with quarry.toml / defaults\n    \
                  quarry-server --config prod.toml    # Use a custom config file\n    \
                  quarry-server --host 0.0.0.0 -p 8080"
)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "QUARRY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overrides config and HOST
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, overrides config and PORT
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    pub verbose: bool,
}
