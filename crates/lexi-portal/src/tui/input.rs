// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into local ViewState edits (focus moves,
// typing, scrolling) and the UserCommand messages that keep the app
// orchestrator in step with them.

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::model::search::{date_window, format_date};
use crate::model::{ResultsView, SearchBy};
use crate::protocol::UserCommand;

/// Rows moved per PageUp/PageDown.
const PAGE_SIZE: usize = 10;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// The focusable controls, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    State,
    Commission,
    FromDate,
    ToDate,
    SearchBy,
    CaseNumber,
    SearchButton,
    ClearButton,
}

impl Focus {
    pub const ORDER: [Focus; 8] = [
        Focus::State,
        Focus::Commission,
        Focus::FromDate,
        Focus::ToDate,
        Focus::SearchBy,
        Focus::CaseNumber,
        Focus::SearchButton,
        Focus::ClearButton,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Focus {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    /// True for the free-text fields.
    pub fn is_text(self) -> bool {
        matches!(self, Focus::FromDate | Focus::ToDate | Focus::CaseNumber)
    }
}

/// Step through `[None, options...]`, wrapping at both ends.
///
/// A current value that is not among `options` is treated as `None`.
pub fn cycle_option<T: Copy + PartialEq>(current: Option<T>, options: &[T], forward: bool) -> Option<T> {
    // Slot 0 is "nothing selected"; slot i + 1 is options[i].
    let slots = options.len() + 1;
    let slot = current
        .and_then(|c| options.iter().position(|o| *o == c))
        .map_or(0, |i| i + 1);
    let next = if forward {
        (slot + 1) % slots
    } else {
        (slot + slots - 1) % slots
    };
    if next == 0 {
        None
    } else {
        Some(options[next - 1])
    }
}

// ---------------------------------------------------------------------------
// Key dispatch
// ---------------------------------------------------------------------------

/// Handle a keyboard event using today's local date for date shortcuts.
///
/// Returns `Some(UserCommand)` when the orchestrator needs to hear about
/// the key press. Local-only effects (focus, scrolling, dismissing an
/// alert) return `None`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    handle_key_at(key_event, view_state, Local::now().date_naive())
}

/// Handle a keyboard event with an explicit "today".
pub fn handle_key_at(
    key_event: KeyEvent,
    view_state: &mut ViewState,
    today: NaiveDate,
) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    // Ctrl+C always quits immediately regardless of mode
    if ctrl && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    // Alert shown: only Enter/Esc dismiss it, everything else blocked
    if view_state.alert.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
            view_state.alert = None;
        }
        return None;
    }

    if ctrl {
        return handle_shortcut(key_event.code, view_state, today);
    }

    match key_event.code {
        KeyCode::Tab => {
            view_state.focus = view_state.focus.next();
            None
        }
        KeyCode::BackTab => {
            view_state.focus = view_state.focus.prev();
            None
        }
        KeyCode::PageUp => {
            view_state.results_scroll = view_state.results_scroll.saturating_sub(PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            let max = view_state.results.len().saturating_sub(1);
            view_state.results_scroll = (view_state.results_scroll + PAGE_SIZE).min(max);
            None
        }
        KeyCode::Enter => handle_enter(view_state),
        KeyCode::Left | KeyCode::Up => cycle_selector(view_state, false),
        KeyCode::Right | KeyCode::Down => cycle_selector(view_state, true),
        KeyCode::Backspace => edit_text(view_state, |text| {
            text.pop();
        }),
        KeyCode::Char(c) => edit_text(view_state, |text| text.push(c)),
        _ => None,
    }
}

/// Ctrl-modified shortcuts.
fn handle_shortcut(code: KeyCode, view_state: &mut ViewState, today: NaiveDate) -> Option<UserCommand> {
    match code {
        KeyCode::Char('l') => clear_form(view_state),
        KeyCode::Char('r') => {
            // Only offered while the empty-results view is visible
            if view_state.results_view() == ResultsView::Empty {
                view_state.form.clear();
                Some(UserCommand::ResetSearch)
            } else {
                None
            }
        }
        KeyCode::Char('t') => {
            let value = format_date(today);
            match view_state.focus {
                Focus::FromDate => {
                    view_state.form.from_date = value.clone();
                    Some(UserCommand::SetFromDate(value))
                }
                Focus::ToDate => {
                    view_state.form.to_date = value.clone();
                    Some(UserCommand::SetToDate(value))
                }
                _ => None,
            }
        }
        KeyCode::Char('w') => {
            let (from, to) = date_window(today, view_state.default_range_days);
            view_state.form.from_date = from.clone();
            view_state.form.to_date = to.clone();
            Some(UserCommand::SetDateRange { from, to })
        }
        _ => None,
    }
}

/// Enter submits the form, or clears it when the Clear button has focus.
///
/// Submission is ignored while a search is running.
fn handle_enter(view_state: &mut ViewState) -> Option<UserCommand> {
    match view_state.focus {
        Focus::ClearButton => clear_form(view_state),
        _ if view_state.loading.searching => None,
        _ => Some(UserCommand::Submit),
    }
}

fn clear_form(view_state: &mut ViewState) -> Option<UserCommand> {
    view_state.form.clear();
    view_state.results_scroll = 0;
    Some(UserCommand::ClearForm)
}

/// Step the focused selector.
///
/// Selection changes are mirrored locally straight away so that rapid
/// key presses step from the latest choice rather than a stale snapshot.
fn cycle_selector(view_state: &mut ViewState, forward: bool) -> Option<UserCommand> {
    match view_state.focus {
        Focus::State => {
            if view_state.loading.states || view_state.states.is_empty() {
                return None;
            }
            let ids: Vec<i64> = view_state.states.iter().map(|s| s.commission_id).collect();
            let next = cycle_option(view_state.selected_state, &ids, forward);
            if next == view_state.selected_state {
                return None;
            }
            view_state.selected_state = next;
            view_state.commissions.clear();
            view_state.selected_commission = None;
            view_state.address = None;
            view_state.selection_seq += 1;
            Some(UserCommand::SelectState(next))
        }
        Focus::Commission => {
            if !view_state.commission_selector_enabled() {
                return None;
            }
            let ids: Vec<i64> = view_state
                .commissions
                .iter()
                .map(|c| c.commission_id)
                .collect();
            let next = cycle_option(view_state.selected_commission, &ids, forward);
            view_state.selected_commission = next;
            // Deselecting keeps the loaded address on screen.
            if next.is_some() {
                view_state.address = None;
            }
            view_state.selection_seq += 1;
            Some(UserCommand::SelectCommission(next))
        }
        Focus::SearchBy => {
            let next = cycle_option(view_state.form.search_by, &SearchBy::ALL, forward);
            view_state.form.search_by = next;
            Some(UserCommand::SetSearchBy(next))
        }
        _ => None,
    }
}

/// Apply `edit` to the focused text field and report the new value.
fn edit_text(view_state: &mut ViewState, edit: impl FnOnce(&mut String)) -> Option<UserCommand> {
    let form = &mut view_state.form;
    match view_state.focus {
        Focus::FromDate => {
            edit(&mut form.from_date);
            Some(UserCommand::SetFromDate(form.from_date.clone()))
        }
        Focus::ToDate => {
            edit(&mut form.to_date);
            Some(UserCommand::SetToDate(form.to_date.clone()))
        }
        Focus::CaseNumber => {
            edit(&mut form.case_number);
            Some(UserCommand::SetCaseNumber(form.case_number.clone()))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
