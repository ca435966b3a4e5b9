// Header bar: portal title, activity indicator, subtitle.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::LoadingFlags;
use crate::tui::ViewState;

pub const TITLE: &str = "LEXI Assessment Portal";
pub const SUBTITLE: &str = "Legal Case Management System";

/// Render the header into the given area.
///
/// Layout: [title] [activity] ... [subtitle]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        format!(" {TITLE} "),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(text) = activity_label(state.loading) {
        spans.push(Span::styled(
            format!(" {text} "),
            Style::default().fg(Color::Yellow),
        ));
    }

    // Right-align the subtitle when there is room for it.
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let subtitle = format!("{SUBTITLE} ");
    let width = area.width as usize;
    if used + subtitle.chars().count() < width {
        spans.push(Span::raw(" ".repeat(width - used - subtitle.chars().count())));
        spans.push(Span::styled(subtitle, Style::default().fg(Color::Gray)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Short description of what is in flight, if anything.
pub fn activity_label(loading: LoadingFlags) -> Option<&'static str> {
    if loading.searching {
        Some("● searching")
    } else if loading.states || loading.commissions {
        Some("● loading")
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
