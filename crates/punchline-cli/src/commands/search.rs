use std::process::ExitCode;

use anyhow::{Context, Result};
use punchline_core::MatchMode;
use punchline_etl::{Config, SynonymExpander};
use punchline_search::{SearchEngine, SearchOutcome, SearchResults};

use super::{engine_settings, open_catalog, render_card, OutputStyle, QUERY_PROMPT};

/// Run one query and print the matches as cards.
///
/// `expanded` mode looks up related words first. A failed lookup only
/// narrows the search to the literal query.
pub async fn run_search(
    config: &Config,
    query: &str,
    mode: Option<MatchMode>,
    limit: Option<usize>,
    style: OutputStyle,
) -> Result<ExitCode> {
    let Some(catalog) = open_catalog(config)? else {
        return Ok(ExitCode::FAILURE);
    };
    let table = catalog.table().context("Failed to load simile data")?;

    let settings = engine_settings(config, mode, limit);
    let expansions = if settings.mode.uses_synonyms() {
        SynonymExpander::from_settings(&config.synonyms)
            .expand(query)
            .await
    } else {
        Vec::new()
    };

    let engine = SearchEngine::new(table, settings);
    match engine.search(query, &expansions) {
        SearchOutcome::Prompt => println!("\n{QUERY_PROMPT}"),
        SearchOutcome::Sample(records) => super::sample::print_sample(&records, style)?,
        SearchOutcome::Matches(results) => {
            print_results(query.trim(), &expansions, &results, style)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_results(
    query: &str,
    expansions: &[String],
    results: &SearchResults<'_>,
    style: OutputStyle,
) -> Result<()> {
    println!("\nFound {} matches for '{}':", results.total(), query);
    if !expansions.is_empty() {
        println!("  (including related words: {})", expansions.join(", "));
    }

    if results.is_empty() {
        println!("\nNo similes found. Try a different word!");
        return Ok(());
    }

    for record in results.records() {
        println!();
        println!("{}", render_card(record, &results.highlight_terms(record), style)?);
    }

    if results.is_truncated() {
        println!(
            "\nShowing the first {} of {}. Use --limit to see more.",
            results.records().len(),
            results.total()
        );
    }

    Ok(())
}
