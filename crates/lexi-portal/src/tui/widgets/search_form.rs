// Search form: From Date, To Date, Search By, Case Number, and the
// [Search Cases] / [Clear Form] buttons.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::model::search::is_iso_date;
use crate::tui::input::Focus;
use crate::tui::ViewState;

/// Areas of the individual form controls.
#[derive(Debug, Clone, Copy)]
pub struct FormAreas {
    pub from_date: Rect,
    pub to_date: Rect,
    pub search_by: Rect,
    pub case_number: Rect,
    pub buttons: Rect,
}

/// Split the inner form area: two rows of two fields, then the buttons.
pub fn form_areas(inner: Rect) -> FormAreas {
    let [top, bottom, buttons] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(inner);
    let halves = [Constraint::Percentage(50), Constraint::Percentage(50)];
    let [from_date, to_date] = Layout::horizontal(halves).areas(top);
    let [search_by, case_number] = Layout::horizontal(halves).areas(bottom);
    FormAreas {
        from_date,
        to_date,
        search_by,
        case_number,
        buttons,
    }
}

/// Advisory hint for a date field, shown when a non-empty value is not a
/// `YYYY-MM-DD` date. Never blocks submission.
pub fn date_hint(value: &str) -> Option<&'static str> {
    if value.is_empty() || is_iso_date(value) {
        None
    } else {
        Some("expected YYYY-MM-DD")
    }
}

/// Render the search form into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            "Search Cases",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let areas = form_areas(inner);
    let form = &state.form;

    render_field(
        frame,
        areas.from_date,
        "From Date",
        text_value(&form.from_date, "YYYY-MM-DD", state.focus == Focus::FromDate),
        date_hint(&form.from_date),
        state.focus == Focus::FromDate,
    );
    render_field(
        frame,
        areas.to_date,
        "To Date",
        text_value(&form.to_date, "YYYY-MM-DD", state.focus == Focus::ToDate),
        date_hint(&form.to_date),
        state.focus == Focus::ToDate,
    );

    let search_by = match form.search_by {
        Some(by) => Line::from(vec![
            Span::styled("‹ ", Style::default().fg(Color::Gray)),
            Span::styled(by.label(), Style::default().fg(Color::White)),
            Span::styled(" ›", Style::default().fg(Color::Gray)),
        ]),
        None => Line::from(Span::styled(
            "-- Choose field --",
            Style::default().fg(Color::Gray),
        )),
    };
    render_field(
        frame,
        areas.search_by,
        "Search By",
        search_by,
        None,
        state.focus == Focus::SearchBy,
    );
    render_field(
        frame,
        areas.case_number,
        "Case Number",
        text_value(
            &form.case_number,
            "Enter case number",
            state.focus == Focus::CaseNumber,
        ),
        None,
        state.focus == Focus::CaseNumber,
    );

    frame.render_widget(Paragraph::new(button_line(state)), areas.buttons);
}

/// A text field's content, with a placeholder when empty and a cursor when
/// focused.
fn text_value(value: &str, placeholder: &str, focused: bool) -> Line<'static> {
    let mut spans = if value.is_empty() && !focused {
        vec![Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        vec![Span::styled(value.to_string(), Style::default().fg(Color::White))]
    };
    if focused {
        spans.push(Span::styled(
            "_",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    content: Line<'static>,
    hint: Option<&str>,
    focused: bool,
) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let mut title_spans = vec![Span::raw(title.to_string())];
    if let Some(hint) = hint {
        title_spans.push(Span::styled(
            format!(" ({hint})"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::DIM),
        ));
    }
    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Line::from(title_spans)),
    );
    frame.render_widget(paragraph, area);
}

/// `[ Search Cases ]  [ Clear Form ]`, the first reading "Searching..."
/// while a search runs.
pub fn button_line(state: &ViewState) -> Line<'static> {
    let search_label = if state.loading.searching {
        "[ Searching... ]"
    } else {
        "[ Search Cases ]"
    };
    let style_for = |focus: Focus, base: Color| {
        let style = Style::default().fg(base);
        if state.focus == focus {
            style
                .fg(Color::Black)
                .bg(base)
                .add_modifier(Modifier::BOLD)
        } else {
            style
        }
    };
    let search_style = if state.loading.searching {
        Style::default().fg(Color::DarkGray)
    } else {
        style_for(Focus::SearchButton, Color::Green)
    };
    Line::from(vec![
        Span::raw(" "),
        Span::styled(search_label, search_style),
        Span::raw("  "),
        Span::styled("[ Clear Form ]", style_for(Focus::ClearButton, Color::Gray)),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
