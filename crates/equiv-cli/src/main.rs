mod commands;
mod formatters;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::compare::{compare_command, CompareOptions};
use commands::cost::{cost_command, CostOptions};
use commands::search::{search_command, SearchOptions};
use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "equiv", version, about = "Structural equivalence and search for source code")]
struct Cli {
    /// Engine config file (default: equiv.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether two files are structurally equivalent
    Compare {
        a: PathBuf,
        b: PathBuf,

        /// Language id, overriding detection by file extension
        #[arg(long)]
        language: Option<String>,

        /// Output format: terminal or json
        #[arg(long, default_value = "terminal")]
        format: String,
    },
    /// Find code matching a template with `$name$` placeholders
    Search {
        /// File holding the search template
        #[arg(long)]
        pattern: PathBuf,

        /// Files to search
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Language id, overriding detection by file extension
        #[arg(long)]
        language: Option<String>,

        /// Output format: terminal or json
        #[arg(long, default_value = "terminal")]
        format: String,
    },
    /// Show the structural cost of a file and its methods
    Cost {
        file: PathBuf,

        /// Language id, overriding detection by file extension
        #[arg(long)]
        language: Option<String>,

        /// Output format: terminal or json
        #[arg(long, default_value = "terminal")]
        format: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = equiv_core::config::load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "loaded engine config");

    match cli.command {
        Commands::Compare {
            a,
            b,
            language,
            format,
        } => compare_command(CompareOptions {
            a,
            b,
            language,
            format: OutputFormat::parse(&format),
            config,
        }),
        Commands::Search {
            pattern,
            files,
            language,
            format,
        } => search_command(SearchOptions {
            pattern,
            files,
            language,
            format: OutputFormat::parse(&format),
            config,
        }),
        Commands::Cost {
            file,
            language,
            format,
        } => cost_command(CostOptions {
            file,
            language,
            format: OutputFormat::parse(&format),
            config,
        }),
    }
}
