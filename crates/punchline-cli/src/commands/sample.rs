use std::process::ExitCode;

use anyhow::{Context, Result};
use punchline_core::SimileRecord;
use punchline_etl::Config;
use punchline_search::SearchEngine;

use super::{engine_settings, open_catalog, render_card, OutputStyle, QUERY_PROMPT};

/// Print `count` random similes (the configured sample size by default).
pub fn run_sample(config: &Config, count: Option<usize>) -> Result<ExitCode> {
    let Some(catalog) = open_catalog(config)? else {
        return Ok(ExitCode::FAILURE);
    };
    let table = catalog.table().context("Failed to load simile data")?;

    let engine = SearchEngine::new(table, engine_settings(config, None, None));
    let records = engine.sample(count.unwrap_or(config.sample_size));

    if records.is_empty() {
        println!("\n{QUERY_PROMPT}");
    } else {
        print_sample(&records, OutputStyle::from_flags(false, false))?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Random examples, each with its own compared terms highlighted.
pub fn print_sample(records: &[&SimileRecord], style: OutputStyle) -> Result<()> {
    println!("\nRandom Examples:");
    for record in records {
        let terms: Vec<&str> = record.signified().into_iter().chain(record.signifier()).collect();
        println!();
        println!("{}", render_card(record, &terms, style)?);
    }
    Ok(())
}
