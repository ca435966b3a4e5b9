// State and commission selectors.
//
// Each renders as a one-line bordered box showing the current choice
// between ‹ › arrows, a loading message, or the "-- Choose --" prompt.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::model::Descriptor;
use crate::tui::input::Focus;
use crate::tui::ViewState;

pub fn render_state_selector(frame: &mut Frame, area: Rect, state: &ViewState) {
    let content = if state.loading.states {
        loading_line("Loading states...")
    } else {
        choice_line(&state.states, state.selected_state, "-- Choose State --", true)
    };
    render_box(
        frame,
        area,
        "Select State",
        content,
        state.focus == Focus::State,
    );
}

pub fn render_commission_selector(frame: &mut Frame, area: Rect, state: &ViewState) {
    let content = if state.loading.commissions && state.selected_state.is_some() {
        loading_line("Loading commissions...")
    } else {
        choice_line(
            &state.commissions,
            state.selected_commission,
            "-- Choose Commission --",
            state.commission_selector_enabled(),
        )
    };
    render_box(
        frame,
        area,
        "Select Commission",
        content,
        state.focus == Focus::Commission,
    );
}

/// Label of the selected option, or `None` when nothing (or an unknown id)
/// is selected.
pub fn selected_label(options: &[Descriptor], selected: Option<i64>) -> Option<String> {
    let id = selected?;
    options
        .iter()
        .find(|d| d.commission_id == id)
        .map(Descriptor::label)
}

fn loading_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    ))
}

fn choice_line(
    options: &[Descriptor],
    selected: Option<i64>,
    prompt: &str,
    enabled: bool,
) -> Line<'static> {
    if !enabled {
        return Line::from(Span::styled(
            prompt.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let arrow = Style::default().fg(Color::Gray);
    let (text, style) = match selected_label(options, selected) {
        Some(label) => (label, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        None => (prompt.to_string(), Style::default().fg(Color::Gray)),
    };
    Line::from(vec![
        Span::styled("‹ ", arrow),
        Span::styled(text, style),
        Span::styled(" ›", arrow),
    ])
}

fn render_box(frame: &mut Frame, area: Rect, title: &str, content: Line<'static>, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title.to_string()),
    );
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
