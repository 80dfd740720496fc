//! AppState — shared read-only data passed to all components during
//! render/event handling.
//!
//! Components read this but never mutate it; the App event-loop is the only
//! writer.  The whole struct is ephemeral — built at startup, discarded on
//! exit, nothing persisted.

use std::path::PathBuf;

use scribe_proto::record::TranscriptionRecord;

use crate::widgets::status_bar::InputMode;

/// One file visible in the intake pane.
#[derive(Debug, Clone)]
pub struct IntakeEntry {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    /// Extension check result, shown as a dim tag.  The authoritative check
    /// happens again at submission time.
    pub is_audio: bool,
}

/// The full shared state of the application.
pub struct AppState {
    // ── Canonical client state ──────────────────────────────────────────────
    /// Displayed record set.  Replaced wholesale on every successful fetch or
    /// search; never merged or patched.
    pub records: Vec<TranscriptionRecord>,
    /// Current search text.  Empty means no filter (equivalent to list-all).
    pub query: String,
    /// True exactly while a list/upload/search request is outstanding.
    pub loading: bool,
    /// Human-readable message from the last failed operation.  Cleared at the
    /// start of every new operation.
    pub error: Option<String>,

    // ── Backend ─────────────────────────────────────────────────────────────
    pub base_url: String,
    /// Whether the last completed request succeeded.
    pub connected: bool,

    // ── Intake ──────────────────────────────────────────────────────────────
    pub intake_dir: PathBuf,
    pub intake_files: Vec<IntakeEntry>,
    /// Uploads still queued or in flight (shown as a pane badge).
    pub uploads_pending: usize,

    // ── UI mode ─────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(base_url: String, intake_dir: PathBuf) -> Self {
        Self {
            records: Vec::new(),
            query: String::new(),
            loading: false,
            error: None,
            base_url,
            connected: false,
            intake_dir,
            intake_files: Vec::new(),
            uploads_pending: 0,
            input_mode: InputMode::Normal,
        }
    }
}
