//! touchline CLI
//!
//! Manual access to the roster snapshot store, the change reporter and every
//! agent tool, without an agent in the loop.

mod commands;
mod config;
mod display;
mod paths;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use touchline_common::Squad;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (default: $XDG_CONFIG_HOME/touchline/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the snapshot files (overrides the configuration)
    #[arg(long, global = true)]
    snapshot_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Team and squad selection shared by the snapshot commands.
#[derive(Args, Debug, Clone, Copy)]
struct Target {
    /// Team id
    #[arg(long = "team")]
    team_id: u64,

    /// Use the U20 youth squad instead of the senior squad
    #[arg(long)]
    youth: bool,
}

impl Target {
    const fn squad(self) -> Squad {
        if self.youth { Squad::Youth } else { Squad::Senior }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save a roster file as the team's snapshot
    Save {
        #[command(flatten)]
        target: Target,
        /// JSON file holding an array of player objects
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the team's stored snapshot
    Load {
        #[command(flatten)]
        target: Target,
    },
    /// Compare a roster file with the stored snapshot and print the change set
    Diff {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        file: PathBuf,
    },
    /// Compare a roster file with the stored snapshot and print the report
    Report {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        file: PathBuf,
        /// Save the roster file as the new snapshot afterwards
        #[arg(long)]
        save: bool,
    },
    /// Fetch the current roster from the API, report changes and save it
    Track {
        #[command(flatten)]
        target: Target,
        /// Keep the stored snapshot unchanged
        #[arg(long)]
        no_save: bool,
    },
    /// List the agent tools
    Tools {
        /// Print the full JSON definitions
        #[arg(long)]
        json: bool,
    },
    /// Execute one agent tool
    Call {
        /// Tool name
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },
}

/// Initializes structured logging with tracing.
///
/// `TOUCHLINE_LOG_FORMAT=json` switches to JSON lines; anything else gives
/// human-readable output. The level comes from `RUST_LOG`. Logs go to stderr
/// so command output on stdout stays machine-readable.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let format = std::env::var("TOUCHLINE_LOG_FORMAT")
        .unwrap_or_else(|_| "pretty".to_string())
        .to_lowercase();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.snapshot_dir {
        config.snapshot_dir = Some(dir);
    }

    match cli.command {
        Command::Save { target, file } => {
            commands::save(&config, target.team_id, target.squad(), &file)
        }
        Command::Load { target } => commands::load(&config, target.team_id, target.squad()),
        Command::Diff { target, file } => {
            commands::diff(&config, target.team_id, target.squad(), &file)
        }
        Command::Report { target, file, save } => {
            commands::report(&config, target.team_id, target.squad(), &file, save)
        }
        Command::Track { target, no_save } => {
            commands::track(&config, target.team_id, target.squad(), !no_save).await
        }
        Command::Tools { json } => commands::list_tools(&config, json),
        Command::Call { tool, args } => commands::call(&config, &tool, &args).await,
    }
}
