use clap::{Parser, Subcommand};

pub mod config;
pub mod init_config;
pub mod logging;
pub mod simulate;
pub mod version;

#[derive(Parser)]
#[command(name = "votebook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the votebook proposal ledger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a TOML scenario against a fresh in-memory ledger
    Simulate {
        /// Path to the scenario file
        scenario: String,

        /// Path to config file (default: ~/.config/votebook/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write the config (default: ~/.config/votebook/config.toml)
        #[arg(long)]
        path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Simulate {
            scenario,
            config,
            json,
        } => simulate::execute(scenario, config, json).await,
        Commands::InitConfig { path, force } => init_config::execute(path, force).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
