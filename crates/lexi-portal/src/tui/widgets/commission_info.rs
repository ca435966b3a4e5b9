// Commission information panel: contact details for the selected
// commission in two columns.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::case::or_placeholder;
use crate::model::CommissionAddress;

pub fn render(frame: &mut Frame, area: Rect, address: &CommissionAddress) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            "Commission Information",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(inner);

    frame.render_widget(Paragraph::new(left_lines(address)), left);
    frame.render_widget(
        Paragraph::new(right_lines(address)).wrap(Wrap { trim: true }),
        right,
    );
}

/// State, commission and type.
pub fn left_lines(address: &CommissionAddress) -> Vec<Line<'static>> {
    vec![
        field("State", or_placeholder(&address.state_name_en)),
        field("Commission", or_placeholder(&address.commission_name_en)),
        field("Type", or_placeholder(&address.commission_type_en)),
    ]
}

/// Address, PIN, phone, email, and the website only when present.
pub fn right_lines(address: &CommissionAddress) -> Vec<Line<'static>> {
    let mut lines = vec![
        field("Address", or_placeholder(&address.full_address)),
        field("PIN", or_placeholder(&address.postal_pin_code)),
        field("Phone", or_placeholder(&address.phone_number)),
        field("Email", or_placeholder(&address.email_id)),
    ];
    if let Some(site) = &address.web_site_address {
        lines.push(Line::from(vec![
            label("Website"),
            Span::styled(
                site.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
    }
    lines
}

fn label(name: &str) -> Span<'static> {
    Span::styled(format!("{name}: "), Style::default().fg(Color::Gray))
}

fn field(name: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        label(name),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
    ])
}
