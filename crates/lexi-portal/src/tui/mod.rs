// TUI: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the controller's data slots plus
// its own copy of the search form. The app orchestrator pushes `UiUpdate`
// messages over an mpsc channel; the TUI applies them to `ViewState` and
// re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::model::{
    decode_rows, results_view, CommissionAddress, Descriptor, ResultsView, SearchForm,
    StatusCounts,
};
use crate::protocol::{AppSnapshot, LoadingFlags, UiUpdate, UserCommand};

use input::Focus;
use layout::{build_layout, AppLayout};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Data slots are replaced by each `StateSnapshot`. The search form is
/// edited locally and each edit is reported to the orchestrator.
pub struct ViewState {
    pub states: Vec<Descriptor>,
    pub selected_state: Option<i64>,
    pub commissions: Vec<Descriptor>,
    pub selected_commission: Option<i64>,
    pub address: Option<CommissionAddress>,
    /// Raw result rows; each render region decodes them on its own.
    pub results: Vec<Value>,
    pub loading: LoadingFlags,
    /// Local copy of the filter fields.
    pub form: SearchForm,
    /// Which control receives key input.
    pub focus: Focus,
    /// Blocking message shown over everything else.
    pub alert: Option<String>,
    /// First visible result row.
    pub results_scroll: usize,
    /// Span of the Ctrl-W date window.
    pub default_range_days: u32,
    /// Selection commands sent to the orchestrator so far.
    pub selection_seq: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            states: Vec::new(),
            selected_state: None,
            commissions: Vec::new(),
            selected_commission: None,
            address: None,
            results: Vec::new(),
            loading: LoadingFlags::default(),
            form: SearchForm::default(),
            focus: Focus::State,
            alert: None,
            results_scroll: 0,
            default_range_days: 30,
            selection_seq: 0,
        }
    }
}

impl ViewState {
    pub fn new(default_range_days: u32) -> Self {
        ViewState {
            default_range_days,
            ..ViewState::default()
        }
    }

    /// Apply a full state snapshot from the app orchestrator.
    ///
    /// The form, focus, alert and scroll position are TUI-owned and left
    /// unchanged, except that the scroll offset is clamped to the new
    /// result count. A snapshot built before the orchestrator saw the
    /// latest selection command leaves the local selection, commission
    /// list and address alone.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.states = snapshot.states;
        if snapshot.selection_seq >= self.selection_seq {
            self.selected_state = snapshot.selected_state;
            self.commissions = snapshot.commissions;
            self.selected_commission = snapshot.selected_commission;
            self.address = snapshot.address;
        }
        self.results = snapshot.results;
        self.loading = snapshot.loading;
        self.results_scroll = self
            .results_scroll
            .min(self.results.len().saturating_sub(1));
    }

    /// Which results region is visible.
    pub fn results_view(&self) -> ResultsView {
        results_view(self.results.len(), self.loading.searching, &self.form)
    }

    /// The commission selector only accepts input once a state is chosen
    /// and its commissions have arrived.
    pub fn commission_selector_enabled(&self) -> bool {
        self.selected_state.is_some() && !self.commissions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::StateSnapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Alert(message) => {
            state.alert = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete portal frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let view = state.results_view();
    let layout = build_layout(
        frame.area(),
        view == ResultsView::Table,
        state.address.is_some(),
    );

    widgets::status_bar::render(frame, layout.header, state);
    widgets::selectors::render_state_selector(frame, layout.state_selector, state);
    widgets::selectors::render_commission_selector(frame, layout.commission_selector, state);
    widgets::search_form::render(frame, layout.search_form, state);
    if let Some(area) = layout.stats {
        render_stats(frame, area, &state.results);
    }
    render_results(frame, &layout, state, view);
    if let (Some(area), Some(address)) = (layout.info, state.address.as_ref()) {
        widgets::commission_info::render(frame, area, address);
    }
    render_help_bar(frame, &layout, state);

    if let Some(ref message) = state.alert {
        widgets::alert::render(frame, frame.area(), message);
    }
}

/// Four stat tiles derived from the current rows, or an inline error when
/// the rows cannot be decoded.
fn render_stats(frame: &mut Frame, area: Rect, results: &[Value]) {
    let rows = match decode_rows(results) {
        Ok(rows) => rows,
        Err(_) => {
            render_section_error(frame, area, "Error loading statistics");
            return;
        }
    };
    let counts = StatusCounts::from_rows(&rows);
    let tiles = [
        ("Total Cases", counts.total, Color::Blue),
        ("Active Cases", counts.active, Color::Green),
        ("Pending Cases", counts.pending, Color::Yellow),
        ("Closed Cases", counts.closed, Color::Magenta),
    ];
    let areas = layout::stat_tile_areas(area);
    for ((title, value, accent), tile_area) in tiles.into_iter().zip(areas.iter()) {
        widgets::stats_card::render(frame, *tile_area, title, value, accent);
    }
}

fn render_results(frame: &mut Frame, layout: &AppLayout, state: &ViewState, view: ResultsView) {
    match view {
        ResultsView::Table => {
            match decode_rows(&state.results) {
                Ok(rows) => {
                    widgets::results_table::render(frame, layout.results, &rows, state.results_scroll)
                }
                Err(_) => {
                    render_section_error(frame, layout.results, "Error loading results table");
                }
            }
        }
        ResultsView::Empty => widgets::empty_state::render(
            frame,
            layout.results,
            "No cases found",
            "No cases match your current search criteria. Try adjusting your search parameters or date range.",
            Some("Ctrl-R: Reset Search"),
        ),
        ResultsView::Hidden => {}
    }
}

fn render_section_error(frame: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(Color::Red),
    )));
    frame.render_widget(paragraph, area);
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let mut text = String::from(
        " Tab:Next | ←/→:Choose | Enter:Search | ^L:Clear | ^T:Today | ^W:Last range",
    );
    if state.results_view() == ResultsView::Empty {
        text.push_str(" | ^R:Reset");
    }
    if !state.results.is_empty() {
        text.push_str(" | PgUp/PgDn:Scroll");
    }
    text.push_str(" | ^C:Quit");
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    default_range_days: u32,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(default_range_days);
    let mut event_stream = EventStream::new();

    // ~30fps
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // Channel closed: app is shutting down
                    None => break Ok(()),
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::new(e).context("terminal input error")),
                    None => break Ok(()),
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    // 4. Restore terminal
    ratatui::restore();

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
