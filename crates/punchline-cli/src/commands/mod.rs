use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use punchline_core::{MatchMode, SimileRecord};
use punchline_etl::{Catalog, Config};
use punchline_search::{highlight, EngineSettings, Markup};

pub mod browse;
pub mod config;
pub mod sample;
pub mod search;
pub mod stats;

pub use browse::run_browse;
pub use sample::run_sample;
pub use search::run_search;
pub use stats::show_stats;

/// Shown when there is no query yet.
pub const QUERY_PROMPT: &str =
    "Search for a noun (e.g., 'kite'), adjective (e.g., 'high'), or verb...";

/// How cards are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Ansi,
    Plain,
    Html,
}

impl OutputStyle {
    /// `--html` wins, then `--plain`. Otherwise highlight only on a terminal.
    pub fn from_flags(plain: bool, html: bool) -> Self {
        if html {
            Self::Html
        } else if plain || !io::stdout().is_terminal() {
            Self::Plain
        } else {
            Self::Ansi
        }
    }
}

/// Open the configured data and load it once.
///
/// A missing data location is reported here and yields `None`, so commands
/// can exit with a failure status instead of an error trace. The load count
/// goes to stderr so stdout carries only results.
pub fn open_catalog(config: &Config) -> Result<Option<Catalog>> {
    open_catalog_with(config, &mut io::stderr())
}

fn open_catalog_with(config: &Config, status: &mut impl Write) -> Result<Option<Catalog>> {
    let catalog = Catalog::new(config.data_source(), config.load_options());

    match catalog.table() {
        Ok(table) => {
            writeln!(
                status,
                "Loaded {} similes from the database.",
                group_thousands(table.len())
            )?;
            Ok(Some(catalog))
        }
        Err(e) if e.is_not_found() => {
            report_missing_data(config);
            Ok(None)
        }
        Err(e) => Err(e).context("Failed to load simile data"),
    }
}

pub fn report_missing_data(config: &Config) {
    eprintln!("❌ No simile data found at {}", config.data_path.display());
    eprintln!("\nPoint punchline at a CSV file or a directory of CSV files:");
    eprintln!("  punchline --data /path/to/simile_database.csv search ice");
    eprintln!("or set data_path with 'punchline config set data_path <path>'.");
}

/// Engine settings from config, with per-command overrides.
pub fn engine_settings(
    config: &Config,
    mode: Option<MatchMode>,
    limit: Option<usize>,
) -> EngineSettings {
    EngineSettings {
        mode: mode.unwrap_or(config.match_mode),
        result_limit: limit.unwrap_or(config.result_limit),
        sample_size: config.sample_size,
        determiners: config.determiners.clone(),
    }
}

/// Render one simile as a card.
pub fn render_card(record: &SimileRecord, terms: &[&str], style: OutputStyle) -> Result<String> {
    let card = match style {
        OutputStyle::Plain => format!(
            "  {}\n    {}, \"{}\"",
            record.line(),
            record.artist(),
            record.song()
        ),
        OutputStyle::Ansi => format!(
            "  {}\n    \x1b[2m{}, \"{}\"\x1b[0m",
            highlight(record.line(), terms, &Markup::ansi())?,
            record.artist(),
            record.song()
        ),
        OutputStyle::Html => {
            let none: [&str; 0] = [];
            format!(
                "<blockquote>{}<cite>{}, {}</cite></blockquote>",
                highlight(record.line(), terms, &Markup::html())?,
                highlight(record.artist(), none, &Markup::html())?,
                highlight(record.song(), none, &Markup::html())?
            )
        }
    };
    Ok(card)
}

/// Format a count with comma separators: 12345 becomes "12,345".
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
