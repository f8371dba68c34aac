// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partpal - an electronics parts chat assistant.
//!
//! This is the binary entry point for the partpal CLI.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod render;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use partpal_config::model::PartpalConfig;
use partpal_core::PartpalError;

/// Partpal - an electronics parts chat assistant.
#[derive(Parser, Debug)]
#[command(name = "partpal", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive chat session (the default).
    Shell,
    /// Ask one question and print the reply.
    Ask {
        /// Project idea or question.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Identify the component in a photo and look it up in the catalog.
    Identify {
        /// Path to a PNG, JPEG, GIF or WebP image.
        path: PathBuf,
    },
    /// Print the effective configuration with credentials masked.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let loaded = match &cli.config {
        Some(path) => partpal_config::load_and_validate_path(path),
        None => partpal_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            partpal_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.session.log_level);

    if let Err(e) = run(cli.command, config).await {
        eprintln!("partpal: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Option<Commands>, config: PartpalConfig) -> Result<(), PartpalError> {
    match command {
        None | Some(Commands::Shell) => shell::run_shell(config).await,
        Some(Commands::Ask { text }) => app::run_ask(config, &text.join(" ")).await,
        Some(Commands::Identify { path }) => app::run_identify(config, &path).await,
        Some(Commands::Config) => {
            println!("{}\n", app::collaborator_summary(&config));
            print!("{}", app::redacted_config(&config)?);
            Ok(())
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so they never interleave with rendered turns.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("partpal={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the stats epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = partpal_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.session.name, "partpal");
    }

    #[test]
    fn ask_joins_words() {
        let cli = Cli::parse_from(["partpal", "ask", "pull-up", "resistor?"]);
        match cli.command {
            Some(Commands::Ask { text }) => assert_eq!(text.join(" "), "pull-up resistor?"),
            other => panic!("expected Ask, got {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["partpal", "identify", "chip.jpg", "--config", "p.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("p.toml")));
        assert!(matches!(cli.command, Some(Commands::Identify { .. })));
    }

    #[test]
    fn no_subcommand_defaults_to_shell() {
        let cli = Cli::parse_from(["partpal"]);
        assert!(cli.command.is_none());
    }
}
