use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use punchline_core::MatchMode;
use punchline_etl::Config;

mod commands;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "punchline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Simile CSV file or directory of CSV files (default: ~/.local/share/punchline)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Find similes that compare a word
    ///
    /// Matches the query against what each simile compares (the signified
    /// and signifier columns), or against the whole line for data files
    /// that predate those columns. Matching is case-insensitive.
    ///
    /// Match modes:
    ///
    /// - word-boundary: the query appears as a whole word or phrase (default)
    /// - last-word: the query is the compared term or its final word,
    ///   ignoring a leading "the", "my", etc.
    /// - substring: the query appears anywhere in the line
    /// - expanded: last-word matching over the query plus related words
    ///   from an online thesaurus
    ///
    /// Output: a count line, then one card per simile with the compared
    /// terms highlighted. An empty query shows a random sample instead.
    Search {
        /// Word or phrase to look for
        query: Vec<String>,

        /// Match policy (overrides match_mode from config)
        #[arg(long, short)]
        mode: Option<MatchMode>,

        /// Maximum number of similes to show (0 for all)
        #[arg(long, short)]
        limit: Option<usize>,

        /// Print without highlighting
        #[arg(long, conflicts_with = "html")]
        plain: bool,

        /// Highlight with <mark> tags
        #[arg(long)]
        html: bool,
    },
    /// Show random similes
    Sample {
        /// Number of similes to show
        #[arg(long, short)]
        count: Option<usize>,
    },
    /// Browse similes interactively
    Browse {
        /// Match policy (overrides match_mode from config)
        #[arg(long, short)]
        mode: Option<MatchMode>,
    },
    /// Show statistics about the loaded data
    Stats,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the current effective configuration
    Show,
    /// Get a config value, or print the whole config file
    Get {
        /// Config key (e.g. match_mode, synonyms.enabled)
        key: Option<String>,
    },
    /// Set a config value in the config file
    Set {
        /// Config key (e.g. match_mode, synonyms.enabled)
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match cli.data {
        Some(path) => Config::load_with_data_path(path)?,
        None => Config::load()?,
    };

    twyg::setup(config.logging.clone())
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {e}"))?;
    log::debug!("Data location: {}", config.data_path.display());

    match cli.command {
        Commands::Search {
            query,
            mode,
            limit,
            plain,
            html,
        } => {
            let style = commands::OutputStyle::from_flags(plain, html);
            commands::run_search(&config, &query.join(" "), mode, limit, style).await
        }
        Commands::Sample { count } => commands::run_sample(&config, count),
        Commands::Browse { mode } => commands::run_browse(&config, mode).await,
        Commands::Stats => commands::show_stats(&config),
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => commands::config::show_config(&config)?,
                ConfigAction::Get { key } => commands::config::get_config(&config, key)?,
                ConfigAction::Set { key, value } => commands::config::set_config(&key, &value)?,
                ConfigAction::Path => commands::config::show_path(),
                ConfigAction::Example => commands::config::show_example(),
                ConfigAction::Init => commands::config::init_config()?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
