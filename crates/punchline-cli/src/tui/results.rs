use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use punchline_search::{segments, Segment};

use super::{App, Hit, Listing};
use crate::commands::{group_thousands, QUERY_PROMPT};

/// Render the browser: title, query field, results and help bar.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Query field
            Constraint::Min(5),    // Results
            Constraint::Length(3), // Help / status bar
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_query(frame, app, chunks[1]);
    render_results(frame, app, chunks[2]);
    render_help(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(format!(
        "🎤 Punchline    {} similes    mode: {}",
        group_thousands(app.record_count()),
        app.mode
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_query(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.input.is_empty() {
        Span::styled(QUERY_PROMPT, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.input.as_str())
    };
    let query = Paragraph::new(Line::from(vec![Span::raw("> "), text]))
        .block(Block::default().borders(Borders::ALL).title("Search"));
    frame.render_widget(query, area);
}

/// The line with its compared terms in bold yellow.
pub fn highlighted_line<'a>(text: &'a str, terms: &[String]) -> Line<'a> {
    let Ok(parts) = segments(text, terms) else {
        return Line::from(text);
    };
    let spans: Vec<Span<'a>> = parts
        .into_iter()
        .map(|part| match part {
            Segment::Marked(s) => Span::styled(
                s,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Segment::Plain(s) => Span::raw(s),
        })
        .collect();
    Line::from(spans)
}

fn hit_row<'a>(index: usize, hit: &'a Hit, selected: bool) -> Row<'a> {
    let attribution = Line::from(Span::styled(
        format!("{}, \"{}\"", hit.record.artist(), hit.record.song()),
        Style::default().fg(Color::DarkGray),
    ));
    let text = Text::from(vec![
        highlighted_line(hit.record.line(), &hit.terms),
        attribution,
    ]);

    let style = if selected {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default()
    };
    Row::new(vec![Cell::from(format!("{}", index + 1)), Cell::from(text)])
        .height(2)
        .style(style)
}

fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.listing {
        Listing::Prompt => "Results".to_string(),
        Listing::Sample(_) => "Random Examples".to_string(),
        Listing::Matches {
            query,
            total,
            expansions,
            ..
        } if expansions.is_empty() => format!("Found {} matches for '{}'", total, query),
        Listing::Matches {
            query,
            total,
            expansions,
            ..
        } => format!(
            "Found {} matches for '{}' (+ {})",
            total,
            query,
            expansions.join(", ")
        ),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if let Listing::Matches { total: 0, .. } = app.listing {
        let empty = Paragraph::new("No similes found. Try a different word!")
            .style(Style::default().fg(Color::Yellow))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = app
        .listing
        .hits()
        .iter()
        .enumerate()
        .skip(app.offset)
        .map(|(i, hit)| hit_row(i, hit, i == app.selected))
        .collect();

    let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(20)]).block(block);
    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.status.is_empty() {
        "  Enter Search  Tab Mode  \u{2191}/\u{2193} Move  Ctrl-R Reload  Esc Quit".to_string()
    } else {
        format!("  {}", app.status)
    };
    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
