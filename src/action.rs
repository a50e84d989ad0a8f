use crate::manager::ClearOutcome;
use crate::store::Snapshot;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    PageUp,
    PageDown,
    Select,
    Back,

    // Vim chord
    EnterPendingG,

    // Type filter tabs
    NextFilter,
    PrevFilter,

    // Record actions
    DeleteSelected,
    ClearHistory,
    CopySelected,
    Confirm,

    // UI
    OpenCommandInput,
    OpenSearch,
    CloseOverlay,
    SubmitCommandInput(String),
    SubmitSearch(String),
    UpdateInputBuffer(String),
    ToggleHelp,

    // Data responses
    HistoryChanged(Snapshot),
    HistoryCleared(ClearOutcome),

    // App control
    Quit,
    Tick,
    Notice(String),
    Error(String),
    ClearToast,
}
