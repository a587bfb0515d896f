// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Quill - human-in-the-loop drafting service.
//!
//! This is the binary entry point for the Quill service.

mod serve;
mod shutdown;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use quill_config::{ConfigError, QuillConfig};

/// Quill - human-in-the-loop drafting service.
#[derive(Parser, Debug)]
#[command(name = "quill", version, about, long_about = None)]
struct Cli {
    /// Load this config file instead of the standard search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP drafting service (default).
    Serve,
    /// Inspect Quill configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ConfigAction {
    /// Load and validate the configuration.
    Check,
    /// Print the effective configuration with secrets redacted.
    Show,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            quill_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Config {
            action: ConfigAction::Check,
        } => {
            println!("quill: configuration is valid");
        }
        Commands::Config {
            action: ConfigAction::Show,
        } => match show_config(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
    }
}

fn load(path: Option<&Path>) -> Result<QuillConfig, Vec<ConfigError>> {
    match path {
        Some(path) => quill_config::load_and_validate_path(path),
        None => quill_config::load_and_validate(),
    }
}

/// Renders the effective configuration as TOML with secrets redacted.
fn show_config(config: &QuillConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&config.redacted())
}
