// Alert overlay widget.
//
// Renders a centered modal box with a message and a dismiss hint. Displayed
// on top of the main layout while `ViewState::alert` is set.

use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// Maximum width of the dialog.
const DIALOG_MAX_WIDTH: u16 = 60;

/// Render the alert overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, message: &str) {
    let width = dialog_width(message);
    // Border (2) + message lines + blank + hint
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let message_lines = message.chars().count().div_ceil(inner_width).max(1) as u16;
    let dialog_area = centered_rect(width, message_lines + 4, area);

    // Clear the area behind the dialog so it renders cleanly on top
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            " Notice ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" or "),
            Span::styled("Esc", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

/// Dialog width: fits the message plus padding, capped.
fn dialog_width(message: &str) -> u16 {
    let wanted = message.chars().count() as u16 + 6;
    wanted.clamp(24, DIALOG_MAX_WIDTH)
}

/// Compute a centered rectangle of the given size within `area`.
///
/// If the area is too small, the dialog is clamped to the available space.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width);
    let clamped_height = height.min(area.height);

    let vertical = Layout::vertical([Constraint::Length(clamped_height)])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(clamped_width)])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
