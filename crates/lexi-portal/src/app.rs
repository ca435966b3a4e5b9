// Application state and orchestration logic.
//
// The central event loop that owns every data slot of the portal: the
// state/commission hierarchy, the commission address, the search form, the
// result list and the loading flags. User commands from the TUI drive it,
// spawned fetch tasks report back over a channel, and every change is
// pushed to the TUI as a snapshot.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::PortalApi;
use crate::config::Config;
use crate::model::{CommissionAddress, Descriptor, SearchBy, SearchForm, ValidationError};
use crate::protocol::{AppSnapshot, FetchEvent, LoadingFlags, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// What applying a fetch event did to the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The event updated state; a new snapshot is due.
    Applied,
    /// The event belonged to a retired generation and was dropped.
    Discarded,
    /// The event updated state and the user must be told about a failure.
    Alert(String),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    api: Arc<dyn PortalApi>,
    fetch_tx: mpsc::Sender<FetchEvent>,
    pub states: Vec<Descriptor>,
    pub selected_state: Option<i64>,
    pub commissions: Vec<Descriptor>,
    pub selected_commission: Option<i64>,
    pub address: Option<CommissionAddress>,
    pub form: SearchForm,
    /// Raw rows from the last search; replaced wholesale.
    pub results: Vec<Value>,
    pub loading: LoadingFlags,
    /// Generation of the current commission-list fetch. Incremented on every
    /// state selection; events from older generations are discarded.
    pub commissions_generation: u64,
    /// Generation of the current address fetch. Incremented on every state
    /// or commission selection.
    pub address_generation: u64,
    /// Generation of the current search. Incremented on every submission.
    pub search_generation: u64,
    /// Selection commands processed so far, no-ops included.
    pub selection_seq: u64,
    states_task: Option<JoinHandle<()>>,
    commissions_task: Option<JoinHandle<()>>,
    address_task: Option<JoinHandle<()>>,
    search_task: Option<JoinHandle<()>>,
}

impl AppState {
    pub fn new(config: Config, api: Arc<dyn PortalApi>, fetch_tx: mpsc::Sender<FetchEvent>) -> Self {
        AppState {
            config,
            api,
            fetch_tx,
            states: Vec::new(),
            selected_state: None,
            commissions: Vec::new(),
            selected_commission: None,
            address: None,
            form: SearchForm::default(),
            results: Vec::new(),
            loading: LoadingFlags::default(),
            commissions_generation: 0,
            address_generation: 0,
            search_generation: 0,
            selection_seq: 0,
            states_task: None,
            commissions_task: None,
            address_task: None,
            search_task: None,
        }
    }

    /// Spawn a fetch whose result is forwarded to the orchestrator.
    fn spawn_fetch<F>(&self, fetch: F) -> JoinHandle<()>
    where
        F: Future<Output = FetchEvent> + Send + 'static,
    {
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let event = fetch.await;
            if tx.send(event).await.is_err() {
                debug!("Fetch channel closed, dropping result");
            }
        })
    }

    /// Start the initial state-list fetch.
    pub fn load_states(&mut self) {
        abort_task(&mut self.states_task);
        self.loading.states = true;
        let api = Arc::clone(&self.api);
        self.states_task = Some(self.spawn_fetch(async move {
            let result = api.fetch_states().await.map_err(|e| e.to_string());
            FetchEvent::States { result }
        }));
        info!("Loading states");
    }

    /// Change the selected state.
    ///
    /// Clears the commission list, the selected commission and its address,
    /// retires any in-flight commission or address fetch, then fetches the
    /// new state's commissions. Re-selecting the current state is a no-op.
    pub fn select_state(&mut self, state_id: Option<i64>) {
        self.selection_seq += 1;
        if state_id == self.selected_state {
            return;
        }
        abort_task(&mut self.commissions_task);
        abort_task(&mut self.address_task);
        self.commissions_generation += 1;
        self.address_generation += 1;

        self.selected_state = state_id;
        self.commissions.clear();
        self.selected_commission = None;
        self.address = None;
        self.loading.commissions = false;

        let Some(state_id) = state_id else {
            info!("State selection cleared");
            return;
        };

        self.loading.commissions = true;
        let api = Arc::clone(&self.api);
        let generation = self.commissions_generation;
        self.commissions_task = Some(self.spawn_fetch(async move {
            let result = api
                .fetch_commissions(state_id)
                .await
                .map_err(|e| e.to_string());
            FetchEvent::Commissions {
                generation,
                state_id,
                result,
            }
        }));
        info!("Loading commissions for state {} (gen: {})", state_id, generation);
    }

    /// Change the selected commission and fetch its address.
    ///
    /// Clearing the selection retires any in-flight address fetch but keeps
    /// the address already shown; only a new state selection removes it.
    /// Re-selecting the current commission is a no-op.
    pub fn select_commission(&mut self, commission_id: Option<i64>) {
        self.selection_seq += 1;
        if commission_id == self.selected_commission {
            return;
        }
        abort_task(&mut self.address_task);
        self.address_generation += 1;

        self.selected_commission = commission_id;

        let Some(commission_id) = commission_id else {
            info!("Commission selection cleared, keeping loaded address");
            return;
        };

        self.address = None;

        let api = Arc::clone(&self.api);
        let generation = self.address_generation;
        self.address_task = Some(self.spawn_fetch(async move {
            let result = api
                .fetch_commission_address(commission_id)
                .await
                .map_err(|e| e.to_string());
            FetchEvent::Address {
                generation,
                commission_id,
                result,
            }
        }));
        info!(
            "Loading address for commission {} (gen: {})",
            commission_id, generation
        );
    }

    pub fn set_from_date(&mut self, value: String) {
        self.form.from_date = value;
    }

    pub fn set_to_date(&mut self, value: String) {
        self.form.to_date = value;
    }

    pub fn set_search_by(&mut self, value: Option<SearchBy>) {
        self.form.search_by = value;
    }

    pub fn set_case_number(&mut self, value: String) {
        self.form.case_number = value;
    }

    /// Validate the form and start a search.
    ///
    /// A validation failure leaves every slot untouched and issues no
    /// request. A new submission supersedes any search still in flight.
    pub fn submit_search(&mut self) -> Result<(), ValidationError> {
        let request = self.form.build_request(self.selected_commission)?;

        abort_task(&mut self.search_task);
        self.search_generation += 1;
        self.loading.searching = true;

        debug!(
            "Search payload: {}",
            serde_json::to_string(&request).unwrap_or_default()
        );

        let api = Arc::clone(&self.api);
        let generation = self.search_generation;
        self.search_task = Some(self.spawn_fetch(async move {
            let result = api.search_cases(&request).await.map_err(|e| e.to_string());
            FetchEvent::Search { generation, result }
        }));
        info!("Search submitted (gen: {})", generation);
        Ok(())
    }

    /// Clear the filter fields and the result list.
    ///
    /// A search already in flight is left running and its result still
    /// lands.
    pub fn clear_form(&mut self) {
        self.form.clear();
        self.results.clear();
        info!("Form cleared");
    }

    /// Clear the filter fields, keeping the result list.
    pub fn reset_search(&mut self) {
        self.form.clear();
        info!("Search filters reset");
    }

    /// Apply a completed fetch.
    ///
    /// **Generation check**: dependent fetches carry the generation they were
    /// spawned under. If it no longer matches the slot's current generation
    /// the selection has moved on and the event is dropped, so a late
    /// response never overwrites newer data.
    ///
    /// Auxiliary failures (states, commissions, address) leave the slot
    /// empty and are only logged. A search failure empties the result list
    /// and produces an alert.
    pub fn apply_fetch_event(&mut self, event: FetchEvent) -> FetchOutcome {
        match event {
            FetchEvent::States { result } => {
                self.states_task = None;
                self.loading.states = false;
                match result {
                    Ok(states) => {
                        info!("Loaded {} states", states.len());
                        self.states = states;
                    }
                    Err(e) => {
                        warn!("Error fetching states: {}", e);
                        self.states.clear();
                    }
                }
                FetchOutcome::Applied
            }
            FetchEvent::Commissions {
                generation,
                state_id,
                result,
            } => {
                if generation != self.commissions_generation {
                    debug!(
                        "Discarding stale commissions for state {} (event gen: {}, current gen: {})",
                        state_id, generation, self.commissions_generation
                    );
                    return FetchOutcome::Discarded;
                }
                self.commissions_task = None;
                self.loading.commissions = false;
                match result {
                    Ok(commissions) => {
                        info!(
                            "Loaded {} commissions for state {}",
                            commissions.len(),
                            state_id
                        );
                        self.commissions = commissions;
                    }
                    Err(e) => {
                        warn!("Error fetching commissions for state {}: {}", state_id, e);
                        self.commissions.clear();
                    }
                }
                FetchOutcome::Applied
            }
            FetchEvent::Address {
                generation,
                commission_id,
                result,
            } => {
                if generation != self.address_generation {
                    debug!(
                        "Discarding stale address for commission {} (event gen: {}, current gen: {})",
                        commission_id, generation, self.address_generation
                    );
                    return FetchOutcome::Discarded;
                }
                self.address_task = None;
                match result {
                    Ok(address) => {
                        if address.is_none() {
                            info!("No address on record for commission {}", commission_id);
                        }
                        self.address = address;
                    }
                    Err(e) => {
                        warn!(
                            "Error fetching address for commission {}: {}",
                            commission_id, e
                        );
                        self.address = None;
                    }
                }
                FetchOutcome::Applied
            }
            FetchEvent::Search { generation, result } => {
                if generation != self.search_generation {
                    debug!(
                        "Discarding stale search result (event gen: {}, current gen: {})",
                        generation, self.search_generation
                    );
                    return FetchOutcome::Discarded;
                }
                self.search_task = None;
                self.loading.searching = false;
                match result {
                    Ok(rows) => {
                        info!("Search returned {} rows", rows.len());
                        self.results = rows;
                        FetchOutcome::Applied
                    }
                    Err(e) => {
                        warn!("Search failed: {}", e);
                        self.results.clear();
                        FetchOutcome::Alert(format!("Search failed: {e}"))
                    }
                }
            }
        }
    }

    /// Build a snapshot of the data slots for the TUI.
    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            states: self.states.clone(),
            selected_state: self.selected_state,
            commissions: self.commissions.clone(),
            selected_commission: self.selected_commission,
            address: self.address.clone(),
            results: self.results.clone(),
            loading: self.loading,
            selection_seq: self.selection_seq,
        }
    }

    /// Abort every in-flight fetch.
    pub fn cancel_all_tasks(&mut self) {
        abort_task(&mut self.states_task);
        abort_task(&mut self.commissions_task);
        abort_task(&mut self.address_task);
        abort_task(&mut self.search_task);
    }
}

fn abort_task(task: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = task.take() {
        handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Kicks off the state-list fetch, then listens on two channels using
/// `tokio::select!`:
/// 1. Fetch completions from spawned tasks
/// 2. User commands from the TUI
///
/// Pushes UI updates through `ui_tx` for the TUI render loop.
pub async fn run(
    mut fetch_rx: mpsc::Receiver<FetchEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    state.load_states();
    send_snapshot(&state, &ui_tx).await;

    loop {
        tokio::select! {
            // --- Fetch completions ---
            event = fetch_rx.recv() => {
                match event {
                    Some(event) => {
                        handle_fetch_event(&mut state, event, &ui_tx).await;
                    }
                    None => {
                        warn!("Fetch channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&mut state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
        }
    }

    // Cleanup
    state.cancel_all_tasks();
    info!("Application event loop exiting");
    Ok(())
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::StateSnapshot(Box::new(snapshot))).await;
}

/// Apply a fetch completion and push the result to the TUI.
async fn handle_fetch_event(
    state: &mut AppState,
    event: FetchEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match state.apply_fetch_event(event) {
        FetchOutcome::Applied => send_snapshot(state, ui_tx).await,
        FetchOutcome::Discarded => {}
        FetchOutcome::Alert(message) => {
            send_snapshot(state, ui_tx).await;
            let _ = ui_tx.send(UiUpdate::Alert(message)).await;
        }
    }
}

/// Handle a user command from the TUI.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::SelectState(id) => {
            state.select_state(id);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::SelectCommission(id) => {
            state.select_commission(id);
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::SetFromDate(value) => state.set_from_date(value),
        UserCommand::SetToDate(value) => state.set_to_date(value),
        UserCommand::SetDateRange { from, to } => {
            state.set_from_date(from);
            state.set_to_date(to);
        }
        UserCommand::SetSearchBy(value) => state.set_search_by(value),
        UserCommand::SetCaseNumber(value) => state.set_case_number(value),
        UserCommand::Submit => match state.submit_search() {
            Ok(()) => send_snapshot(state, ui_tx).await,
            Err(e) => {
                info!("Search rejected: {}", e);
                let _ = ui_tx.send(UiUpdate::Alert(e.to_string())).await;
            }
        },
        // The TUI has already cleared its own copy of the form.
        UserCommand::ClearForm => {
            state.clear_form();
            send_snapshot(state, ui_tx).await;
        }
        UserCommand::ResetSearch => state.reset_search(),
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::model::{decode_rows, status_badge, BadgeStyle, SearchRequest, StatusCounts};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const KARNATAKA: i64 = 11290000;
    const KERALA: i64 = 11320000;
    const BANGALORE: i64 = 15290525;
    const ERNAKULAM: i64 = 15320101;

    /// In-memory backend that records calls.
    #[derive(Default)]
    struct MockPortal {
        states: Vec<Descriptor>,
        commissions: HashMap<i64, Vec<Descriptor>>,
        addresses: HashMap<i64, CommissionAddress>,
        search_rows: Vec<Value>,
        search_error: Option<String>,
        commission_calls: AtomicUsize,
        address_calls: AtomicUsize,
        search_calls: AtomicUsize,
        last_search: Mutex<Option<SearchRequest>>,
    }

    #[async_trait]
    impl PortalApi for MockPortal {
        async fn fetch_states(&self) -> Result<Vec<Descriptor>, ApiError> {
            Ok(self.states.clone())
        }

        async fn fetch_commissions(&self, state_id: i64) -> Result<Vec<Descriptor>, ApiError> {
            self.commission_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.commissions.get(&state_id).cloned().unwrap_or_default())
        }

        async fn fetch_commission_address(
            &self,
            commission_id: i64,
        ) -> Result<Option<CommissionAddress>, ApiError> {
            self.address_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.addresses.get(&commission_id).cloned())
        }

        async fn search_cases(&self, request: &SearchRequest) -> Result<Vec<Value>, ApiError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_search.lock().unwrap() = Some(request.clone());
            match &self.search_error {
                Some(detail) => Err(ApiError::Status {
                    status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                    detail: detail.clone(),
                }),
                None => Ok(self.search_rows.clone()),
            }
        }
    }

    fn address(state: &str, commission: &str) -> CommissionAddress {
        CommissionAddress {
            state_name_en: Some(state.to_string()),
            commission_name_en: Some(commission.to_string()),
            ..CommissionAddress::default()
        }
    }

    fn mock_portal() -> MockPortal {
        let mut portal = MockPortal {
            states: vec![
                Descriptor::new(KARNATAKA, "KARNATAKA"),
                Descriptor::new(KERALA, "KERALA"),
            ],
            ..MockPortal::default()
        };
        portal
            .commissions
            .insert(KARNATAKA, vec![Descriptor::new(BANGALORE, "Bangalore 1st")]);
        portal
            .commissions
            .insert(KERALA, vec![Descriptor::new(ERNAKULAM, "Ernakulam")]);
        portal
            .addresses
            .insert(BANGALORE, address("Karnataka", "Bangalore 1st"));
        portal
            .addresses
            .insert(ERNAKULAM, address("Kerala", "Ernakulam"));
        portal
    }

    fn create_test_app_state(
        portal: MockPortal,
    ) -> (AppState, Arc<MockPortal>, mpsc::Receiver<FetchEvent>) {
        let portal = Arc::new(portal);
        let (fetch_tx, fetch_rx) = mpsc::channel(16);
        let api: Arc<dyn PortalApi> = portal.clone();
        let state = AppState::new(Config::default(), api, fetch_tx);
        (state, portal, fetch_rx)
    }

    /// Receive the next fetch event and apply it.
    async fn apply_next(state: &mut AppState, fetch_rx: &mut mpsc::Receiver<FetchEvent>) -> FetchOutcome {
        let event = tokio::time::timeout(Duration::from_secs(5), fetch_rx.recv())
            .await
            .expect("timed out waiting for fetch event")
            .expect("fetch channel closed");
        state.apply_fetch_event(event)
    }

    fn fill_form(state: &mut AppState, case_number: &str) {
        state.set_from_date("2025-01-01".to_string());
        state.set_to_date("2025-08-29".to_string());
        state.set_case_number(case_number.to_string());
    }

    /// Select Karnataka / Bangalore and let both fetches land.
    async fn select_bangalore(state: &mut AppState, fetch_rx: &mut mpsc::Receiver<FetchEvent>) {
        state.select_state(Some(KARNATAKA));
        assert_eq!(apply_next(state, fetch_rx).await, FetchOutcome::Applied);
        state.select_commission(Some(BANGALORE));
        assert_eq!(apply_next(state, fetch_rx).await, FetchOutcome::Applied);
    }

    // -----------------------------------------------------------------------
    // Tests: hierarchy loading
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn load_states_populates_list() {
        let (mut state, _portal, mut fetch_rx) = create_test_app_state(mock_portal());
        state.load_states();
        assert!(state.loading.states);

        assert_eq!(apply_next(&mut state, &mut fetch_rx).await, FetchOutcome::Applied);
        assert!(!state.loading.states);
        assert_eq!(state.states.len(), 2);
        assert_eq!(state.states[0].label(), "KARNATAKA");
    }

    #[tokio::test]
    async fn selecting_state_loads_commissions() {
        let (mut state, portal, mut fetch_rx) = create_test_app_state(mock_portal());
        state.select_state(Some(KARNATAKA));
        assert!(state.loading.commissions);
        assert_eq!(state.commissions_generation, 1);

        apply_next(&mut state, &mut fetch_rx).await;
        assert!(!state.loading.commissions);
        assert_eq!(state.commissions, vec![Descriptor::new(BANGALORE, "Bangalore 1st")]);
        assert_eq!(portal.commission_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reselecting_same_state_is_noop() {
        let (mut state, portal, mut fetch_rx) = create_test_app_state(mock_portal());
        state.select_state(Some(KARNATAKA));
        apply_next(&mut state, &mut fetch_rx).await;

        state.select_state(Some(KARNATAKA));
        assert_eq!(state.commissions_generation, 1);
        assert_eq!(state.commissions.len(), 1);
        assert_eq!(portal.commission_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn selecting_commission_loads_address() {
        let (mut state, _portal, mut fetch_rx) = create_test_app_state(mock_portal());
        select_bangalore(&mut state, &mut fetch_rx).await;
        assert_eq!(state.selected_commission, Some(BANGALORE));
        assert_eq!(
            state.address.as_ref().and_then(|a| a.commission_name_en.as_deref()),
            Some("Bangalore 1st")
        );
    }

    #[tokio::test]
    async fn clearing_commission_keeps_loaded_address() {
        let (mut state, portal, mut fetch_rx) = create_test_app_state(mock_portal());
        select_bangalore(&mut state, &mut fetch_rx).await;
        let address_gen = state.address_generation;

        state.select_commission(None);
        assert!(state.selected_commission.is_none());
        assert_eq!(
            state.address.as_ref().and_then(|a| a.commission_name_en.as_deref()),
            Some("Bangalore 1st")
        );
        assert!(state.address_generation > address_gen);
        assert_eq!(portal.address_calls.load(Ordering::SeqCst), 1);

        // A fresh state selection is what removes it.
        state.select_state(Some(KERALA));
        assert!(state.address.is_none());
    }

    #[test]
    fn selection_seq_counts_every_selection_command() {
        let (fetch_tx, _fetch_rx) = mpsc::channel(4);
        let mut state = AppState::new(Config::default(), Arc::new(MockPortal::default()), fetch_tx);
        assert_eq!(state.build_snapshot().selection_seq, 0);

        state.select_state(None);
        state.select_commission(None);
        assert_eq!(state.selection_seq, 2);
        assert_eq!(state.build_snapshot().selection_seq, 2);
    }

    #[tokio::test]
    async fn new_state_clears_commission_and_address_and_drops_late_events() {
        let (mut state, _portal, mut fetch_rx) = create_test_app_state(mock_portal());
        select_bangalore(&mut state, &mut fetch_rx).await;
        let old_commissions_gen = state.commissions_generation;
        let old_address_gen = state.address_generation;

        state.select_state(Some(KERALA));
        assert!(state.commissions.is_empty());
        assert!(state.selected_commission.is_none());
        assert!(state.address.is_none());

        // Late responses for Karnataka / Bangalore must not land.
        let late_commissions = FetchEvent::Commissions {
            generation: old_commissions_gen,
            state_id: KARNATAKA,
            result: Ok(vec![Descriptor::new(BANGALORE, "Bangalore 1st")]),
        };
        assert_eq!(state.apply_fetch_event(late_commissions), FetchOutcome::Discarded);
        let late_address = FetchEvent::Address {
            generation: old_address_gen,
            commission_id: BANGALORE,
            result: Ok(Some(address("Karnataka", "Bangalore 1st"))),
        };
        assert_eq!(state.apply_fetch_event(late_address), FetchOutcome::Discarded);
        assert!(state.commissions.is_empty());
        assert!(state.address.is_none());

        // Kerala's own commission list still lands.
        assert_eq!(apply_next(&mut state, &mut fetch_rx).await, FetchOutcome::Applied);
        assert_eq!(state.commissions, vec![Descriptor::new(ERNAKULAM, "Ernakulam")]);
    }

    #[tokio::test]
    async fn clearing_state_stops_commission_loading() {
        let (mut state, _portal, _fetch_rx) = create_test_app_state(mock_portal());
        state.select_state(Some(KARNATAKA));
        assert!(state.loading.commissions);

        state.select_state(None);
        assert!(!state.loading.commissions);
        assert!(state.selected_state.is_none());
        assert!(state.commissions.is_empty());
    }

    #[test]
    fn auxiliary_failures_leave_slots_empty_without_alert() {
        let (fetch_tx, _fetch_rx) = mpsc::channel(4);
        let mut state = AppState::new(Config::default(), Arc::new(MockPortal::default()), fetch_tx);
        state.loading.states = true;
        state.states = vec![Descriptor::new(1, "stale")];

        let outcome = state.apply_fetch_event(FetchEvent::States {
            result: Err("Network error: connection refused".to_string()),
        });
        assert_eq!(outcome, FetchOutcome::Applied);
        assert!(state.states.is_empty());
        assert!(!state.loading.states);

        let outcome = state.apply_fetch_event(FetchEvent::Address {
            generation: 0,
            commission_id: 7,
            result: Err("Server returned status 502".to_string()),
        });
        assert_eq!(outcome, FetchOutcome::Applied);
        assert!(state.address.is_none());
    }

    // -----------------------------------------------------------------------
    // Tests: submission
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn submit_without_commission_is_rejected() {
        let (mut state, portal, _fetch_rx) = create_test_app_state(mock_portal());
        fill_form(&mut state, "C1");
        assert_eq!(state.submit_search(), Err(ValidationError::NoCommission));
        assert!(!state.loading.searching);
        assert_eq!(portal.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submit_with_missing_date_is_rejected() {
        let (mut state, portal, mut fetch_rx) = create_test_app_state(mock_portal());
        select_bangalore(&mut state, &mut fetch_rx).await;
        state.set_from_date("2025-01-01".to_string());
        state.set_case_number("C1".to_string());

        let err = state.submit_search().unwrap_err();
        assert_eq!(err.to_string(), "Please select both from and to dates");
        assert_eq!(portal.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_case_number_never_searches_or_touches_results() {
        let (mut state, portal, mut fetch_rx) = create_test_app_state(mock_portal());
        select_bangalore(&mut state, &mut fetch_rx).await;
        state.results = vec![json!({"caseNumber": "earlier"})];
        fill_form(&mut state, "   \t ");
        let generation_before = state.search_generation;

        assert_eq!(state.submit_search(), Err(ValidationError::MissingCaseNumber));
        assert_eq!(state.results, vec![json!({"caseNumber": "earlier"})]);
        assert_eq!(state.search_generation, generation_before);
        assert!(!state.loading.searching);

        // Give any stray task a chance to run.
        tokio::task::yield_now().await;
        assert_eq!(portal.search_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_search_replaces_results() {
        let mut portal = mock_portal();
        portal.search_rows = vec![json!({"caseNumber": "C1", "caseStageName": "Pending Review"})];
        let (mut state, portal, mut fetch_rx) = create_test_app_state(portal);
        select_bangalore(&mut state, &mut fetch_rx).await;
        state.results = vec![json!({"caseNumber": "old-1"}), json!({"caseNumber": "old-2"})];
        fill_form(&mut state, "  C1  ");

        state.submit_search().unwrap();
        assert!(state.loading.searching);
        assert_eq!(apply_next(&mut state, &mut fetch_rx).await, FetchOutcome::Applied);
        assert!(!state.loading.searching);

        let rows = decode_rows(&state.results).unwrap();
        assert_eq!(rows.len(), 1);
        let badge = status_badge(rows[0].stage.as_deref());
        assert_eq!(badge.label, "Pending");
        assert_eq!(badge.style, BadgeStyle::Warning);
        assert_eq!(StatusCounts::from_rows(&rows).pending, 1);

        let sent = portal.last_search.lock().unwrap().clone().unwrap();
        assert_eq!(sent.commission_id, BANGALORE);
        assert_eq!(sent.search_type_value, "C1");
    }

    #[tokio::test]
    async fn failed_search_alerts_and_empties_results() {
        let mut portal = mock_portal();
        portal.search_error = Some("upstream unavailable".to_string());
        let (mut state, _portal, mut fetch_rx) = create_test_app_state(portal);
        select_bangalore(&mut state, &mut fetch_rx).await;
        state.results = vec![json!({"caseNumber": "old"})];
        fill_form(&mut state, "C1");

        state.submit_search().unwrap();
        let outcome = apply_next(&mut state, &mut fetch_rx).await;
        match outcome {
            FetchOutcome::Alert(message) => {
                assert!(message.starts_with("Search failed: "), "{message}");
                assert!(message.contains("upstream unavailable"), "{message}");
            }
            other => panic!("expected Alert, got {other:?}"),
        }
        assert!(state.results.is_empty());
        assert!(!state.loading.searching);
    }

    #[tokio::test]
    async fn resubmitted_search_supersedes_earlier_one() {
        let (mut state, _portal, mut fetch_rx) = create_test_app_state(mock_portal());
        select_bangalore(&mut state, &mut fetch_rx).await;
        fill_form(&mut state, "C1");
        state.submit_search().unwrap();
        let first = state.search_generation;
        state.submit_search().unwrap();
        assert_eq!(state.search_generation, first + 1);

        let stale = FetchEvent::Search {
            generation: first,
            result: Ok(vec![json!({"caseNumber": "stale"})]),
        };
        assert_eq!(state.apply_fetch_event(stale), FetchOutcome::Discarded);
        assert!(state.results.is_empty());
        assert!(state.loading.searching);
    }

    #[tokio::test]
    async fn clear_form_then_same_values_builds_identical_payload() {
        let (mut state, portal, mut fetch_rx) = create_test_app_state(mock_portal());
        select_bangalore(&mut state, &mut fetch_rx).await;
        fill_form(&mut state, "DC/77/CC/104/2025");
        state.submit_search().unwrap();
        apply_next(&mut state, &mut fetch_rx).await;
        let first = portal.last_search.lock().unwrap().clone();

        state.clear_form();
        assert_eq!(state.form, SearchForm::default());
        fill_form(&mut state, "DC/77/CC/104/2025");
        state.submit_search().unwrap();
        apply_next(&mut state, &mut fetch_rx).await;
        let second = portal.last_search.lock().unwrap().clone();

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn clear_form_empties_results_and_reset_keeps_them() {
        let (fetch_tx, _fetch_rx) = mpsc::channel(4);
        let mut state = AppState::new(Config::default(), Arc::new(MockPortal::default()), fetch_tx);
        state.form = SearchForm {
            from_date: "2025-01-01".into(),
            to_date: "2025-01-31".into(),
            search_by: Some(SearchBy::Respondent),
            case_number: "C1".into(),
        };
        state.results = vec![json!({"caseNumber": "C1"})];

        state.reset_search();
        assert_eq!(state.form, SearchForm::default());
        assert_eq!(state.results.len(), 1);

        state.set_case_number("C2".into());
        state.clear_form();
        assert_eq!(state.form, SearchForm::default());
        assert!(state.results.is_empty());
    }

    #[test]
    fn snapshot_mirrors_slots() {
        let (fetch_tx, _fetch_rx) = mpsc::channel(4);
        let mut state = AppState::new(Config::default(), Arc::new(MockPortal::default()), fetch_tx);
        state.states = vec![Descriptor::new(KARNATAKA, "KARNATAKA")];
        state.selected_state = Some(KARNATAKA);
        state.results = vec![json!({"caseNumber": "C1"})];
        state.loading.searching = true;

        let snapshot = state.build_snapshot();
        assert_eq!(snapshot.states, state.states);
        assert_eq!(snapshot.selected_state, Some(KARNATAKA));
        assert!(snapshot.selected_commission.is_none());
        assert_eq!(snapshot.results.len(), 1);
        assert!(snapshot.loading.searching);
    }

    // -----------------------------------------------------------------------
    // Tests: Async event loop
    // -----------------------------------------------------------------------

    async fn next_update(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> UiUpdate {
        tokio::time::timeout(Duration::from_secs(5), ui_rx.recv())
            .await
            .expect("timed out waiting for UI update")
            .expect("UI channel closed")
    }

    /// Skip snapshots until a non-snapshot update arrives.
    async fn next_non_snapshot(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> UiUpdate {
        loop {
            match next_update(ui_rx).await {
                UiUpdate::StateSnapshot(_) => continue,
                other => return other,
            }
        }
    }

    #[tokio::test]
    async fn event_loop_handles_quit_command() {
        let (fetch_tx, fetch_rx) = mpsc::channel(16);
        let state = AppState::new(Config::default(), Arc::new(mock_portal()), fetch_tx);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, _ui_rx) = mpsc::channel(64);

        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state));
        cmd_tx.send(UserCommand::Quit).await.unwrap();

        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn event_loop_loads_states_on_start() {
        let (fetch_tx, fetch_rx) = mpsc::channel(16);
        let state = AppState::new(Config::default(), Arc::new(mock_portal()), fetch_tx);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state));

        // First snapshot: states loading.
        match next_update(&mut ui_rx).await {
            UiUpdate::StateSnapshot(snapshot) => assert!(snapshot.loading.states),
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
        // Second snapshot: states loaded.
        match next_update(&mut ui_rx).await {
            UiUpdate::StateSnapshot(snapshot) => {
                assert!(!snapshot.loading.states);
                assert_eq!(snapshot.states.len(), 2);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn event_loop_alerts_on_validation_failure() {
        let (fetch_tx, fetch_rx) = mpsc::channel(16);
        let state = AppState::new(Config::default(), Arc::new(mock_portal()), fetch_tx);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state));

        cmd_tx.send(UserCommand::Submit).await.unwrap();
        assert_eq!(
            next_non_snapshot(&mut ui_rx).await,
            UiUpdate::Alert("Please select a commission first".to_string())
        );

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn event_loop_runs_search_and_reports_results() {
        let mut portal = mock_portal();
        portal.search_rows = vec![json!({"caseNumber": "C1", "caseStageName": "Closed"})];
        let (fetch_tx, fetch_rx) = mpsc::channel(16);
        let state = AppState::new(Config::default(), Arc::new(portal), fetch_tx);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state));

        for cmd in [
            UserCommand::SelectState(Some(KARNATAKA)),
            UserCommand::SelectCommission(Some(BANGALORE)),
            UserCommand::SetDateRange {
                from: "2025-01-01".into(),
                to: "2025-08-29".into(),
            },
            UserCommand::SetCaseNumber("C1".into()),
            UserCommand::Submit,
        ] {
            cmd_tx.send(cmd).await.unwrap();
        }

        let mut found = false;
        for _ in 0..20 {
            if let UiUpdate::StateSnapshot(snapshot) = next_update(&mut ui_rx).await {
                if !snapshot.results.is_empty() {
                    assert_eq!(snapshot.results[0]["caseNumber"], "C1");
                    assert!(!snapshot.loading.searching);
                    found = true;
                    break;
                }
            }
        }
        assert!(found, "search results never reached the TUI");

        cmd_tx.send(UserCommand::ClearForm).await.unwrap();
        match next_update(&mut ui_rx).await {
            UiUpdate::StateSnapshot(snapshot) => assert!(snapshot.results.is_empty()),
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn typing_after_clear_form_survives_the_clear() {
        use crate::tui::{apply_ui_update, input, ViewState};
        use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

        let key = |code, modifiers| KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };

        let (fetch_tx, fetch_rx) = mpsc::channel(16);
        let state = AppState::new(Config::default(), Arc::new(mock_portal()), fetch_tx);
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(fetch_rx, cmd_rx, ui_tx, state));

        let mut view = ViewState::default();
        view.focus = input::Focus::CaseNumber;
        view.form.case_number = "OLD".to_string();

        // Ctrl-L then "C9" typed before the app answers.
        let mut sent = Vec::new();
        sent.extend(input::handle_key(key(KeyCode::Char('l'), KeyModifiers::CONTROL), &mut view));
        sent.extend(input::handle_key(key(KeyCode::Char('C'), KeyModifiers::SHIFT), &mut view));
        sent.extend(input::handle_key(key(KeyCode::Char('9'), KeyModifiers::NONE), &mut view));
        assert_eq!(
            sent,
            vec![
                UserCommand::ClearForm,
                UserCommand::SetCaseNumber("C".into()),
                UserCommand::SetCaseNumber("C9".into()),
            ]
        );
        for cmd in sent {
            cmd_tx.send(cmd).await.unwrap();
        }
        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();

        // Everything the app pushed back leaves the typed text in place.
        while let Ok(update) = ui_rx.try_recv() {
            apply_ui_update(&mut view, update);
        }
        assert_eq!(view.form.case_number, "C9");
    }
}
