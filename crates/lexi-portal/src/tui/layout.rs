// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the portal:
//
// +--------------------------------------------------+
// | Header (1 row)                                    |
// +-------------------------+------------------------+
// | State selector (50%)     | Commission selector    |
// +-------------------------+------------------------+
// | Search form (9 rows)                              |
// +--------------------------------------------------+
// | Stat tiles x4 (4 rows, only with results)         |
// +--------------------------------------------------+
// | Results table / empty state (fill)                |
// +--------------------------------------------------+
// | Commission information (8 rows, only with address)|
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const HEADER_HEIGHT: u16 = 1;
pub const SELECTOR_HEIGHT: u16 = 3;
pub const SEARCH_FORM_HEIGHT: u16 = 9;
pub const STATS_HEIGHT: u16 = 4;
pub const INFO_HEIGHT: u16 = 8;

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: portal title.
    pub header: Rect,
    pub state_selector: Rect,
    pub commission_selector: Rect,
    /// Date range, search-by, case number and the two buttons.
    pub search_form: Rect,
    /// Stat tiles; `None` when there are no results.
    pub stats: Option<Rect>,
    /// Result table or empty-state placeholder.
    pub results: Rect,
    /// Commission contact details; `None` until an address is loaded.
    pub info: Option<Rect>,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the portal layout from the available terminal area.
///
/// Optional zones take no space when hidden; the results zone absorbs
/// whatever is left.
pub fn build_layout(area: Rect, show_stats: bool, show_info: bool) -> AppLayout {
    let mut constraints = vec![
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Length(SELECTOR_HEIGHT),
        Constraint::Length(SEARCH_FORM_HEIGHT),
    ];
    if show_stats {
        constraints.push(Constraint::Length(STATS_HEIGHT));
    }
    constraints.push(Constraint::Min(5));
    if show_info {
        constraints.push(Constraint::Length(INFO_HEIGHT));
    }
    constraints.push(Constraint::Length(1));

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut idx = 0;
    let mut next = || {
        let rect = vertical[idx];
        idx += 1;
        rect
    };

    let header = next();
    let selectors = next();
    let search_form = next();
    let stats = if show_stats { Some(next()) } else { None };
    let results = next();
    let info = if show_info { Some(next()) } else { None };
    let help_bar = next();

    let [state_selector, commission_selector] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(selectors);

    AppLayout {
        header,
        state_selector,
        commission_selector,
        search_form,
        stats,
        results,
        info,
        help_bar,
    }
}

/// Split the stats zone into four equal tiles.
pub fn stat_tile_areas(area: Rect) -> [Rect; 4] {
    Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(area)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
