//! kleene - Regular expressions and finite automata
//!
//! Converts regular expressions to automata and back.

mod commands;
mod config;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kleene")]
#[command(about = "Conversions between regular expressions and finite automata")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "KLEENE_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Parse an expression and print its operator tree
    Parse {
        /// Regular expression, e.g. "(ab+a)(bb+ba)*"
        expression: String,
    },

    /// Convert an expression through every stage of the construction
    Convert {
        /// Regular expression
        expression: String,

        /// Print only this stage
        #[arg(short, long, value_enum)]
        stage: Option<Stage>,
    },

    /// Test words for membership in an expression's language
    Accepts {
        /// Regular expression
        expression: String,

        /// Words to test ("" for the empty word)
        words: Vec<String>,
    },

    /// Extract a regular expression from an automaton definition
    Extract {
        /// Definition file (JSON or YAML)
        definition: PathBuf,

        /// States to eliminate first, in order
        #[arg(short, long, value_delimiter = ',')]
        order: Option<Vec<String>>,
    },
}

/// A stage of the expression to expression round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Stage {
    /// Thompson epsilon automaton
    Epsilon,
    /// Automaton without epsilon moves
    Nfa,
    /// Deterministic automaton
    Dfa,
    /// Expression extracted by state elimination
    Regex,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => {
            if let Some(path) = &cli.config {
                tracing::info!("Loaded config from {}", path.display());
            }
            c
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    };

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    match commands::execute(cli.command, &config) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }
}
