//! CLI command definitions

use crate::simulate::Scenario;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for simulation results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored transcript and outcome
    #[default]
    Text,
    /// JSON report
    Json,
}

/// CLI arguments for boardroom
#[derive(Parser, Debug)]
#[command(name = "boardroom")]
#[command(author, version, about = "Decision governance orchestrator for a board of agents")]
#[command(long_about = r#"
Boardroom routes proposals to the CEO and DAO, runs C-level advisory
rounds when they disagree, and escalates deadlocks to a human.

Configuration files are loaded from (in priority order):
1. BOARDROOM_* environment variables (e.g. BOARDROOM_SERVER__LISTEN_ADDR)
2. --config <path>          Explicit config file
3. ./boardroom.toml         Project-level config
4. ~/.config/boardroom/config.toml   Global config

Example:
  boardroom serve --listen 0.0.0.0:8080
  boardroom simulate persuaded --title "Open Berlin office"
  boardroom config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the orchestrator with its HTTP API
    Serve {
        /// Listen address (overrides server.listen_addr)
        #[arg(short, long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Run one proposal against scripted board members
    Simulate {
        /// How the CEO and DAO vote
        #[arg(value_enum, default_value = "consensus")]
        scenario: Scenario,

        /// Proposal title
        #[arg(short, long, default_value = "Expand into the EU market")]
        title: String,

        /// Override governance.max_veto_rounds
        #[arg(long, value_name = "N")]
        max_rounds: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show configuration sources, the effective configuration and any issues
    Config,
}
