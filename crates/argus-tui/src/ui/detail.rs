//! Detail pane for the selected session.

use argus_client::Session;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::App;

/// Render the detail pane.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");

    let Some(session) = app.selected_session() else {
        frame.render_widget(block, area);
        return;
    };

    let paragraph = Paragraph::new(detail_lines(session)).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn detail_lines(session: &Session) -> Vec<Line<'static>> {
    let label_style = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            session.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field_line(label_style, "User", session.user.clone()),
        field_line(label_style, "State", session.state.clone()),
        field_line(label_style, "Address", session.ip_address.clone()),
        field_line(label_style, "Stream", session.transcode_info.clone()),
    ];

    if let Some(server) = &session.server {
        lines.push(field_line(label_style, "Server", server.clone()));
    }
    if let Some(bandwidth) = session.bandwidth {
        lines.push(field_line(label_style, "Bandwidth", format!("{bandwidth} kbps")));
    }
    if let Some(media_type) = &session.media_type {
        lines.push(field_line(label_style, "Type", media_type.clone()));
    }

    // The poster is never fetched; the URL is shown for operators to follow.
    lines.push(Line::from(""));
    lines.push(field_line(label_style, "Poster", session.poster_url.clone()));

    lines
}

fn field_line(label_style: Style, label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:>9}: "), label_style),
        Span::raw(value),
    ])
}
