//! Action enum — all user-initiated intents flowing from components to the App.

use std::path::PathBuf;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Intake,
    SearchBar,
    RecordList,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),

    // ── Search ───────────────────────────────────────────────────────────────
    OpenSearch,
    CloseSearch,
    /// The search text changed; carries the full current text.  Every change
    /// issues a server-side search — an empty string lists all.
    SearchChanged(String),

    // ── Intake / upload ──────────────────────────────────────────────────────
    /// An accepted audio file, forwarded for upload.  One action per file.
    Upload(PathBuf),
    /// A submitted file failed client-side validation; never uploaded.
    Reject { file_name: String },
    RescanIntake,

    // ── Records ──────────────────────────────────────────────────────────────
    RefreshAll,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
