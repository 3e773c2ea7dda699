use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use punchline_core::{MatchMode, SimileRecord};
use punchline_etl::{Catalog, SynonymExpander};
use punchline_search::{EngineSettings, SearchEngine, SearchOutcome};
use ratatui::prelude::*;
use tokio::runtime::Handle;

pub mod results;

/// Rows of results the list scrolls by.
const VISIBLE_HITS: usize = 8;

/// A record to display, with the terms to highlight in its line.
#[derive(Debug, Clone)]
pub struct Hit {
    pub record: SimileRecord,
    pub terms: Vec<String>,
}

impl Hit {
    fn new(record: &SimileRecord, terms: Vec<&str>) -> Self {
        Self {
            record: record.clone(),
            terms: terms.into_iter().map(str::to_string).collect(),
        }
    }

    /// A sampled record highlights its own compared terms.
    fn sampled(record: &SimileRecord) -> Self {
        Self::new(
            record,
            record.signified().into_iter().chain(record.signifier()).collect(),
        )
    }
}

/// What the result pane is showing.
#[derive(Debug, Clone)]
pub enum Listing {
    Prompt,
    Sample(Vec<Hit>),
    Matches {
        query: String,
        total: usize,
        expansions: Vec<String>,
        hits: Vec<Hit>,
    },
}

impl Listing {
    pub fn hits(&self) -> &[Hit] {
        match self {
            Self::Prompt => &[],
            Self::Sample(hits) | Self::Matches { hits, .. } => hits,
        }
    }
}

/// Application state for the browser.
#[derive(Debug)]
pub struct App {
    catalog: Catalog,
    settings: EngineSettings,
    expander: SynonymExpander,
    runtime: Handle,
    pub input: String,
    pub mode: MatchMode,
    pub listing: Listing,
    pub selected: usize,
    pub offset: usize,
    pub status: String,
    pub should_quit: bool,
}

impl App {
    /// Create the browser over an already loaded catalog and show a first
    /// random sample.
    pub fn new(
        catalog: Catalog,
        settings: EngineSettings,
        expander: SynonymExpander,
        runtime: Handle,
    ) -> Self {
        let mode = settings.mode;
        let mut app = Self {
            catalog,
            settings,
            expander,
            runtime,
            input: String::new(),
            mode,
            listing: Listing::Prompt,
            selected: 0,
            offset: 0,
            status: String::new(),
            should_quit: false,
        };
        app.submit();
        app
    }

    pub fn record_count(&self) -> usize {
        self.catalog.table().map(|t| t.len()).unwrap_or(0)
    }

    /// Run the current input as a query.
    pub fn submit(&mut self) {
        match self.run_query() {
            Ok(listing) => {
                self.listing = listing;
                self.selected = 0;
                self.offset = 0;
            }
            Err(e) => self.status = format!("Search failed: {e}"),
        }
    }

    fn run_query(&self) -> Result<Listing> {
        let query = self.input.trim();
        let expansions = if self.mode.uses_synonyms() && !query.is_empty() {
            self.runtime.block_on(self.expander.expand(query))
        } else {
            Vec::new()
        };

        let engine = SearchEngine::new(
            self.catalog.table()?,
            EngineSettings {
                mode: self.mode,
                ..self.settings.clone()
            },
        );

        let listing = match engine.search(query, &expansions) {
            SearchOutcome::Prompt => Listing::Prompt,
            SearchOutcome::Sample(records) => {
                Listing::Sample(records.into_iter().map(Hit::sampled).collect())
            }
            SearchOutcome::Matches(results) => Listing::Matches {
                query: query.to_string(),
                total: results.total(),
                hits: results
                    .records()
                    .iter()
                    .map(|r| Hit::new(r, results.highlight_terms(r)))
                    .collect(),
                expansions,
            },
        };
        Ok(listing)
    }

    /// Re-read the data files and rerun the current query.
    pub fn reload(&mut self) {
        match self.catalog.reload() {
            Ok(table) => {
                self.status = format!("Reloaded {} similes.", table.len());
                self.submit();
            }
            Err(e) => self.status = format!("Reload failed, keeping current data: {e}"),
        }
    }

    fn cycle_mode(&mut self) {
        let idx = MatchMode::ALL
            .iter()
            .position(|m| *m == self.mode)
            .unwrap_or(0);
        self.mode = MatchMode::ALL[(idx + 1) % MatchMode::ALL.len()];
        self.status = format!("Match mode: {}", self.mode);
        if !self.input.trim().is_empty() {
            self.submit();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.reload(),
            KeyCode::Char('u') if ctrl => self.input.clear(),
            KeyCode::Char(c) if !ctrl => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                self.status.clear();
                self.submit();
            }
            KeyCode::Tab => self.cycle_mode(),
            KeyCode::Down => {
                if self.selected + 1 < self.listing.hits().len() {
                    self.selected += 1;
                    if self.selected >= self.offset + VISIBLE_HITS {
                        self.offset = self.selected + 1 - VISIBLE_HITS;
                    }
                }
            }
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    if self.selected < self.offset {
                        self.offset = self.selected;
                    }
                }
            }
            _ => {}
        }
    }
}

/// Run the browser.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| results::render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use punchline_etl::{DataSource, LoadOptions};
    use std::fs;
    use tempfile::TempDir;

    const CSV: &str = "artist,song,line,signified,signifier\n\
                       Jay-Z,A,My heart is cold like ice,my heart,ice\n\
                       Nas,B,Running from the police,me,the police\n\
                       Big L,C,Falling like the maple leaves,i,the maple leaves\n";

    fn app_for(dir: &TempDir, runtime: &tokio::runtime::Runtime) -> App {
        let path = dir.path().join("simile_database.csv");
        fs::write(&path, CSV).unwrap();
        let catalog = Catalog::new(DataSource::File(path), LoadOptions::default());
        catalog.table().unwrap();
        App::new(
            catalog,
            EngineSettings::default(),
            SynonymExpander::disabled(),
            runtime.handle().clone(),
        )
    }

    fn type_query(app: &mut App, query: &str) {
        for c in query.chars() {
            app.handle_key(KeyEvent::from(KeyCode::Char(c)));
        }
        app.handle_key(KeyEvent::from(KeyCode::Enter));
    }

    #[test]
    fn test_starts_with_sample() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let app = app_for(&dir, &runtime);
        assert!(matches!(app.listing, Listing::Sample(ref hits) if hits.len() == 3));
        assert_eq!(app.record_count(), 3);
    }

    #[test]
    fn test_enter_runs_query() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&dir, &runtime);

        type_query(&mut app, "ice");
        match &app.listing {
            Listing::Matches { query, total, hits, .. } => {
                assert_eq!(query, "ice");
                assert_eq!(*total, 1);
                assert_eq!(hits[0].record.artist(), "Jay-Z");
                assert!(hits[0].terms.contains(&"ice".to_string()));
            }
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn test_clearing_query_samples_again() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&dir, &runtime);

        type_query(&mut app, "ice");
        for _ in 0..3 {
            app.handle_key(KeyEvent::from(KeyCode::Backspace));
        }
        app.handle_key(KeyEvent::from(KeyCode::Enter));
        assert!(matches!(app.listing, Listing::Sample(_)));
    }

    #[test]
    fn test_tab_cycles_mode_and_reruns() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&dir, &runtime);
        type_query(&mut app, "ice");
        assert_eq!(app.mode, MatchMode::WordBoundary);

        app.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.mode, MatchMode::Expanded);
        app.handle_key(KeyEvent::from(KeyCode::Tab));
        assert_eq!(app.mode, MatchMode::Substring);
        match &app.listing {
            Listing::Matches { total, .. } => assert_eq!(*total, 2),
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&dir, &runtime);

        app.handle_key(KeyEvent::from(KeyCode::Up));
        assert_eq!(app.selected, 0);
        for _ in 0..10 {
            app.handle_key(KeyEvent::from(KeyCode::Down));
        }
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_reload_picks_up_new_rows() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&dir, &runtime);

        fs::write(
            dir.path().join("simile_database.csv"),
            format!("{CSV}MF DOOM,D,Ice cold like the wolf,ice,the wolf\n"),
        )
        .unwrap();
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(app.record_count(), 4);
        assert_eq!(app.status, "Reloaded 4 similes.");
    }

    #[test]
    fn test_escape_quits() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let mut app = app_for(&dir, &runtime);
        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert!(app.should_quit);
    }
}
