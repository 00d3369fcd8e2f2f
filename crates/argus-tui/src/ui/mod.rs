//! UI rendering.
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.

mod detail;
mod sessions;
mod status;

use argus_client::ViewPhase;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::App;

/// Message shown before the first update has arrived.
const WAITING_MESSAGE: &str = "Waiting for first update...";
/// Message shown when the latest update carried zero sessions.
const NO_SESSIONS_MESSAGE: &str = "No active sessions found.";

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const HEADER_HEIGHT: u16 = 1;
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [header_area, main_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_header(frame, app, *header_area);
    render_main_area(frame, app, *main_area);
    status::render(frame, app, *status_area);
}

/// Render the title/header line.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " Argus - Multi-Server Session Monitor",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", app.endpoint()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the main area: session table plus detail pane, or one of the two
/// empty states.
///
/// The two empty states are deliberately distinct: before the first update
/// the dashboard cannot claim that nothing is playing, only that it has not
/// heard yet.
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const DETAIL_WIDTH: u16 = 38;
    const TABLE_MIN_WIDTH: u16 = 40;

    match app.phase() {
        ViewPhase::Empty => render_empty_state(frame, WAITING_MESSAGE, area),
        ViewPhase::Populated if app.snapshot().is_empty() => {
            render_empty_state(frame, NO_SESSIONS_MESSAGE, area);
        },
        ViewPhase::Populated => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(TABLE_MIN_WIDTH), Constraint::Length(DETAIL_WIDTH)])
                .split(area);

            let [table_area, detail_area] = chunks.as_ref() else {
                return;
            };

            sessions::render(frame, app, *table_area);
            detail::render(frame, app, *detail_area);
        },
    }
}

/// Render a centered single-line empty state.
fn render_empty_state(frame: &mut Frame, message: &str, area: Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

    let [_, line_area, _] = vertical.as_ref() else {
        return;
    };

    let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, *line_area);
}
