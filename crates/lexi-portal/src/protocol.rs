// Messages exchanged between the orchestrator, its fetch tasks, and the TUI.
//
// `UserCommand` flows TUI -> app, `FetchEvent` flows fetch task -> app, and
// `UiUpdate` flows app -> TUI.

use serde_json::Value;

use crate::model::{CommissionAddress, Descriptor, SearchBy};

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Select a state by id, or clear the selection.
    SelectState(Option<i64>),
    /// Select a commission by id, or clear the selection.
    SelectCommission(Option<i64>),
    SetFromDate(String),
    SetToDate(String),
    /// Set both dates at once (the default-window shortcut).
    SetDateRange { from: String, to: String },
    SetSearchBy(Option<SearchBy>),
    SetCaseNumber(String),
    /// Validate the form and run a case search.
    Submit,
    /// Clear the filter fields and the result list.
    ClearForm,
    /// Clear the filter fields only (offered by the empty-results view).
    ResetSearch,
    Quit,
}

// ---------------------------------------------------------------------------
// Fetch task -> app
// ---------------------------------------------------------------------------

/// Completion events from spawned fetch tasks.
///
/// Dependent fetches carry the generation they were spawned under; the
/// orchestrator drops any event whose generation has since been retired.
/// Errors are carried as display strings.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    States {
        result: Result<Vec<Descriptor>, String>,
    },
    Commissions {
        generation: u64,
        state_id: i64,
        result: Result<Vec<Descriptor>, String>,
    },
    Address {
        generation: u64,
        commission_id: i64,
        result: Result<Option<CommissionAddress>, String>,
    },
    Search {
        generation: u64,
        result: Result<Vec<Value>, String>,
    },
}

// ---------------------------------------------------------------------------
// App -> TUI
// ---------------------------------------------------------------------------

/// Updates sent from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full copy of the controller-owned data slots.
    StateSnapshot(Box<AppSnapshot>),
    /// A blocking message the user must dismiss.
    Alert(String),
}

/// In-flight fetch indicators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub states: bool,
    pub commissions: bool,
    pub searching: bool,
}

/// Snapshot of the controller's data slots for the TUI.
///
/// The form fields are not included: the TUI edits its own copy and
/// reports each change as a `UserCommand`, so its copy is authoritative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    pub states: Vec<Descriptor>,
    pub selected_state: Option<i64>,
    pub commissions: Vec<Descriptor>,
    pub selected_commission: Option<i64>,
    pub address: Option<CommissionAddress>,
    /// Raw result rows, decoded per render region.
    pub results: Vec<Value>,
    pub loading: LoadingFlags,
    /// Number of `SelectState`/`SelectCommission` commands processed when
    /// the snapshot was built. The TUI compares it with the number it has
    /// sent to tell whether the selection fields are already current.
    pub selection_seq: u64,
}
