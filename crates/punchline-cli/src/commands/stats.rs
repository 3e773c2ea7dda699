use std::collections::HashSet;
use std::process::ExitCode;

use anyhow::{Context, Result};
use punchline_core::SimileTable;
use punchline_etl::Config;

use super::{group_thousands, open_catalog};

/// Counts describing the loaded table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub records: usize,
    pub with_comparison: usize,
    pub artists: usize,
    pub songs: usize,
    pub sources: usize,
}

impl TableStats {
    pub fn of(table: &SimileTable) -> Self {
        let artists: HashSet<&str> = table.iter().map(|r| r.artist()).collect();
        let songs: HashSet<(&str, &str)> = table.iter().map(|r| (r.artist(), r.song())).collect();
        Self {
            records: table.len(),
            with_comparison: table.comparison_count(),
            artists: artists.len(),
            songs: songs.len(),
            sources: table.sources().len(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn comparison_percent(&self) -> f64 {
        if self.records == 0 {
            0.0
        } else {
            self.with_comparison as f64 * 100.0 / self.records as f64
        }
    }
}

pub fn show_stats(config: &Config) -> Result<ExitCode> {
    let Some(catalog) = open_catalog(config)? else {
        return Ok(ExitCode::FAILURE);
    };
    let table = catalog.table().context("Failed to load simile data")?;
    let stats = TableStats::of(&table);

    println!("\n📊 Punchline Statistics\n");
    println!("  Data: {}", catalog.source().location().display());
    println!("  Similes: {}", group_thousands(stats.records));
    println!(
        "  With signified/signifier: {} ({:.1}%)",
        group_thousands(stats.with_comparison),
        stats.comparison_percent()
    );
    println!("  Artists: {}", group_thousands(stats.artists));
    println!("  Songs: {}", group_thousands(stats.songs));

    println!("\n  Source files ({}):", stats.sources);
    for source in table.sources() {
        println!("    {}", source.display());
    }

    if stats.with_comparison < stats.records {
        println!("\n  Similes without comparison fields are matched on their full line.");
    }

    Ok(ExitCode::SUCCESS)
}
