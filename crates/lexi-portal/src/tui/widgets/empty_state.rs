// Empty-results placeholder: centered title, description and an optional
// action hint. Stateless.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub const DEFAULT_TITLE: &str = "No results found";
pub const DEFAULT_DESCRIPTION: &str =
    "Try adjusting your search criteria or filters to find what you're looking for.";

/// Build the placeholder lines.
pub fn lines(title: &str, description: &str, action: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            description.to_string(),
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(action) = action {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("[ {action} ]"),
            Style::default().fg(Color::Cyan),
        )));
    }
    lines
}

pub fn render(frame: &mut Frame, area: Rect, title: &str, description: &str, action: Option<&str>) {
    let paragraph = Paragraph::new(lines(title, description, action))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
