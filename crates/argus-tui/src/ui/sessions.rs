//! Session table.
//!
//! One row per active session, in feed order, with the cursor row
//! highlighted.

use argus_client::Session;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Row, Table},
};

use crate::App;

const SELECTED_PREFIX: &str = ">";
const UNSELECTED_PREFIX: &str = " ";

/// Render the session table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["", "Title", "User", "State", "Address", "Stream", "Server"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .snapshot()
        .iter()
        .enumerate()
        .map(|(index, session)| session_row(session, index == app.selected()))
        .collect();

    let widths = [
        Constraint::Length(1),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(9),
        Constraint::Length(15),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let title = format!(" Sessions ({}) ", app.snapshot().len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    frame.render_widget(table, area);
}

/// Build one table row. The selected row carries the cursor prefix and a
/// highlight; playback state gets its own color so a wall of sessions scans
/// at a glance.
fn session_row(session: &Session, selected: bool) -> Row<'static> {
    let prefix = if selected { SELECTED_PREFIX } else { UNSELECTED_PREFIX };
    let style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Row::new([
        prefix.to_owned(),
        session.title.clone(),
        session.user.clone(),
        session.state.clone(),
        session.ip_address.clone(),
        session.transcode_info.clone(),
        session.server.clone().unwrap_or_default(),
    ])
    .style(style)
}
