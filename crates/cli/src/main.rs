//! PromptPack CLI, the main entry point.
//!
//! Commands:
//! - `assemble`: Build a prompt from a JSON request file
//! - `truncate`: Cut text to a character budget at a word boundary
//! - `config`: Show the effective configuration or its path
//! - `init`: Write a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod request;

#[derive(Parser)]
#[command(
    name = "promptpack",
    about = "PromptPack: budgeted context assembly for LLM prompts",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a prompt from a request file
    Assemble {
        /// JSON request: query, instructions and item pools
        #[arg(short, long)]
        request: PathBuf,

        /// Config file to use instead of ~/.promptpack/config.toml
        #[arg(short, long, env = "PROMPTPACK_CONFIG")]
        config: Option<PathBuf>,

        /// Print the prompt and the assembly report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Truncate text to a character budget
    Truncate {
        /// Maximum number of characters to keep
        #[arg(short, long)]
        budget: usize,

        /// Input file; reads stdin when omitted or `-`
        input: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Print only the config file path
        #[arg(long)]
        path: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pipeable.
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    match cli.command {
        Commands::Assemble {
            request,
            config,
            json,
        } => commands::assemble::run(&request, config.as_deref(), json)?,
        Commands::Truncate { budget, input } => commands::truncate::run(budget, input.as_deref())?,
        Commands::Config { path } => {
            if path {
                commands::config_cmd::path()?
            } else {
                commands::config_cmd::show()?
            }
        }
        Commands::Init { force } => commands::init::run(force)?,
    }

    Ok(())
}
