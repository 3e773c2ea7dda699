use std::process::ExitCode;

use anyhow::{Context, Result};
use punchline_core::MatchMode;
use punchline_etl::{Config, SynonymExpander};
use tokio::runtime::Handle;

use super::{engine_settings, open_catalog};
use crate::tui::{self, App};

/// Open the interactive browser.
///
/// The terminal loop blocks on key events, so it runs on a blocking thread.
/// Synonym lookups from the browser go back through the runtime handle.
pub async fn run_browse(config: &Config, mode: Option<MatchMode>) -> Result<ExitCode> {
    let Some(catalog) = open_catalog(config)? else {
        return Ok(ExitCode::FAILURE);
    };

    let settings = engine_settings(config, mode, None);
    let expander = SynonymExpander::from_settings(&config.synonyms);
    let runtime = Handle::current();

    tokio::task::spawn_blocking(move || {
        let app = App::new(catalog, settings, expander, runtime);
        tui::run_tui(app)
    })
    .await
    .context("Browser thread panicked")??;

    Ok(ExitCode::SUCCESS)
}
