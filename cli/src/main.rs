use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

mod commands;
mod logging;
mod utils;

use commands::{config, health, serve};

/// Board CLI - Command line interface for the publishing board
#[derive(Parser)]
#[command(name = "board")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the board HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "BOARD_PORT")]
        port: Option<u16>,

        /// Skip seeding demo users, categories and articles
        #[arg(long)]
        no_seed: bool,
    },

    /// Check system health and status
    Health {
        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the effective configuration
    Config {
        /// Output format (json, yaml, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        // The server installs its own file and console subscriber
        Commands::Serve { port, no_seed } => serve::execute(port, !no_seed, cli.verbose).await,
        Commands::Health { format } => {
            init_console_logging(cli.verbose);
            health::execute(format).await
        }
        Commands::Config { format } => {
            init_console_logging(cli.verbose);
            config::execute(format).await
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_console_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();
}
