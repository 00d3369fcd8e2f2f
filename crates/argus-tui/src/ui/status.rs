//! Status bar.
//!
//! Connection status, session/server counts, and the transient status
//! message.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{App, ConnectionState};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection_status = match app.connection_state() {
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Connected => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        ConnectionState::Reconnecting { reason } => Span::styled(
            format!("Reconnecting ({reason})"),
            Style::default().fg(Color::Red),
        ),
    };

    let mut counts = format!(" | Sessions: {}", app.snapshot().len());
    if let Some(servers) = app.server_count() {
        counts.push_str(&format!(" | Servers: {servers}"));
    }

    let mut spans = vec![
        Span::raw(" "),
        connection_status,
        Span::styled(counts, Style::default().fg(Color::Gray)),
    ];
    if let Some(message) = app.status_message() {
        spans.push(Span::styled(
            format!(" | {message}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
