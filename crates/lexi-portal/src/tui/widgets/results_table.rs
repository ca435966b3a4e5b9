// Search results table.
//
// Columns: S.No, Filing Date, Status badge, Case Number, Complainant,
// Complainant Advocate, Respondent, Respondent Advocate, Action.
// Scrolls by whole rows; the Action column is inert.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::model::case::or_placeholder;
use crate::model::{status_badge, BadgeStyle, CaseRow};

/// Render the table into the given area, starting at row `scroll`.
pub fn render(frame: &mut Frame, area: Rect, rows: &[CaseRow], scroll: usize) {
    let header = Row::new(vec![
        Cell::from("S.No"),
        Cell::from("Filing Date"),
        Cell::from("Status"),
        Cell::from("Case Number"),
        Cell::from("Complainant"),
        Cell::from("Compl. Advocate"),
        Cell::from("Respondent"),
        Cell::from("Resp. Advocate"),
        Cell::from("Action"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, r)| {
            let badge = status_badge(r.stage.as_deref());
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(or_placeholder(&r.filing_date).to_string()),
                Cell::from(Span::styled(badge.label, badge_style(badge.style))),
                Cell::from(Span::styled(
                    or_placeholder(&r.case_number).to_string(),
                    Style::default().fg(Color::Cyan),
                )),
                Cell::from(or_placeholder(&r.complainant).to_string()),
                Cell::from(or_placeholder(&r.complainant_advocate).to_string()),
                Cell::from(or_placeholder(&r.respondent).to_string()),
                Cell::from(or_placeholder(&r.respondent_advocate).to_string()),
                Cell::from(Span::styled(
                    "View Details",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Min(18),
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Min(12),
        Constraint::Length(12),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title(rows.len())),
        );

    frame.render_widget(table, area);
}

/// "Search Results (N cases found)", singular for one.
pub fn title(count: usize) -> Line<'static> {
    let noun = if count == 1 { "case" } else { "cases" };
    Line::from(format!("Search Results ({count} {noun} found)"))
}

pub fn badge_style(style: BadgeStyle) -> Style {
    match style {
        BadgeStyle::Success => Style::default().fg(Color::Green),
        BadgeStyle::Warning => Style::default().fg(Color::Yellow),
        BadgeStyle::Info => Style::default().fg(Color::Blue),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
