//! App — component-based event loop and the owner of all client state.
//!
//! Architecture:
//! - `App` owns the components and `AppState` (shared read-only data).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background
//!   tasks; network calls run in spawned tasks and report back as messages,
//!   so the UI never blocks.
//! - Components return `Vec<Action>`; App dispatches each Action.
//!
//! Every API-driven handler follows one shape: mark the operation started
//! (loading on, error cleared), run exactly one API call, apply the outcome,
//! mark it finished.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use scribe_proto::api::{ApiClient, Outcome};
use scribe_proto::config::Config;
use scribe_proto::media;
use scribe_proto::record::{TranscriptionRecord, UploadReply};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, IntakeEntry},
    component::Component,
    components::{intake::Intake, record_list::RecordList, search_bar::SearchBar},
    widgets::{
        status_bar::{self, InputMode},
        toast::{Severity, ToastManager},
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// Full-list fetch finished (startup fetch and post-upload refresh).
    ListLoaded(Outcome<Vec<TranscriptionRecord>>),
    /// A search finished.  `seq` identifies which issued request this answers.
    SearchLoaded {
        seq: u64,
        outcome: Outcome<Vec<TranscriptionRecord>>,
    },
    /// One queued upload finished.
    UploadFinished {
        file_name: String,
        outcome: Outcome<Option<UploadReply>>,
    },
}

// ── Search sequencing ─────────────────────────────────────────────────────────

/// Stamps every search request; responses for anything but the latest stamp
/// are discarded, so a slow earlier response can never overwrite a fresher
/// query's results.
#[derive(Debug, Default)]
struct SearchTracker {
    latest: u64,
}

impl SearchTracker {
    fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

// ── Focus order ───────────────────────────────────────────────────────────────

const FOCUS_ORDER: [ComponentId; 3] = [
    ComponentId::Intake,
    ComponentId::SearchBar,
    ComponentId::RecordList,
];

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    /// Shared state, passed read-only to components.
    pub state: AppState,

    api: Arc<ApiClient>,

    // ── Components ───────────────────────────────────────────────────────────
    intake: Intake,
    search_bar: SearchBar,
    record_list: RecordList,
    focus: ComponentId,

    toast: ToastManager,

    // ── Request bookkeeping ───────────────────────────────────────────────────
    searches: SearchTracker,
    /// Outstanding API requests; `state.loading` is true while nonzero.
    inflight: usize,
    upload_queue: VecDeque<PathBuf>,
    uploading: bool,

    msg_tx: Option<mpsc::Sender<AppMessage>>,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let base_url = config.server.base_url.clone();
        let intake_dir = config.intake.dir.clone();

        let mut state = AppState::new(base_url.clone(), intake_dir.clone());
        state.intake_files = scan_intake_dir(&intake_dir);

        let mut intake = Intake::new();
        intake.sync(&state);

        Self {
            state,
            api: Arc::new(ApiClient::new(&base_url)),
            intake,
            search_bar: SearchBar::new(),
            record_list: RecordList::new(),
            focus: ComponentId::Intake,
            toast: ToastManager::new(),
            searches: SearchTracker::default(),
            inflight: 0,
            upload_queue: VecDeque::new(),
            uploading: false,
            msg_tx: None,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);
        self.msg_tx = Some(tx.clone());

        info!("scribe started, backend {}", self.state.base_url);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Startup fetch ─────────────────────────────────────────────────────
        self.refresh_all();

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut intake_rescan = tokio::time::interval(Duration::from_secs(5));
        intake_rescan.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Toast expiry + spinner animation.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                    // Drain whatever else is already queued before redrawing.
                    while let Ok(next) = rx.try_recv() {
                        needs_redraw |= self.handle_message(next);
                    }
                }

                _ = intake_rescan.tick() => {
                    self.rescan_intake();
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    self.toast.tick();
                    let _ = self.record_list.tick(&self.state);
                    let _ = self.intake.tick(&self.state);
                    let _ = self.search_bar.tick(&self.state);
                    needs_redraw = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Message handler ───────────────────────────────────────────────────────

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                let actions = self.handle_key(key);
                for action in actions {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,

            AppMessage::ListLoaded(outcome) => {
                self.op_finished();
                self.apply_records(outcome);
                true
            }

            AppMessage::SearchLoaded { seq, outcome } => {
                self.op_finished();
                if !self.searches.is_current(seq) {
                    debug!("dropping stale search response (seq {seq})");
                    return false;
                }
                self.apply_records(outcome);
                true
            }

            AppMessage::UploadFinished { file_name, outcome } => {
                self.op_finished();
                self.uploading = false;
                match outcome.error {
                    Some(err) => {
                        // Records stay untouched on upload failure.
                        warn!("upload of {file_name} failed: {err}");
                        self.state.error = Some(err.clone());
                        self.state.connected = false;
                        self.toast.resolve_spinner(Severity::Error, err);
                    }
                    None => {
                        self.state.connected = true;
                        self.toast
                            .resolve_spinner(Severity::Success, format!("{file_name} transcribed"));
                        // The server's list is ground truth — refetch instead
                        // of inserting locally.
                        self.refresh_all();
                    }
                }
                self.start_next_upload();
                self.state.uploads_pending =
                    self.upload_queue.len() + usize::from(self.uploading);
                true
            }
        }
    }

    // ── Key routing ───────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        if self.state.input_mode == InputMode::Search {
            return match key.code {
                KeyCode::Tab => vec![Action::CloseSearch, Action::FocusNext],
                _ => self.search_bar.handle_key(key, &self.state),
            };
        }

        match key.code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Tab => vec![Action::FocusNext],
            KeyCode::BackTab => vec![Action::FocusPrev],
            KeyCode::Char('/') | KeyCode::Char('2') => vec![Action::OpenSearch],
            KeyCode::Char('1') => vec![Action::FocusPane(ComponentId::Intake)],
            KeyCode::Char('3') => vec![Action::FocusPane(ComponentId::RecordList)],
            _ => match self.focus {
                ComponentId::Intake => self.intake.handle_key(key, &self.state),
                ComponentId::RecordList => self.record_list.handle_key(key, &self.state),
                ComponentId::SearchBar => Vec::new(),
            },
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::FocusNext => self.cycle_focus(1),
            Action::FocusPrev => self.cycle_focus(FOCUS_ORDER.len() - 1),
            Action::FocusPane(id) => self.set_focus(id),

            Action::OpenSearch => {
                self.set_focus(ComponentId::SearchBar);
            }
            Action::CloseSearch => {
                self.search_bar.deactivate();
                self.state.input_mode = InputMode::Normal;
                if self.focus == ComponentId::SearchBar {
                    self.focus = ComponentId::RecordList;
                }
            }
            Action::SearchChanged(query) => self.begin_search(query),

            Action::Upload(path) => self.enqueue_upload(path),
            Action::Reject { file_name } => {
                self.toast
                    .error(format!("{file_name}: not an audio file"));
            }
            Action::RescanIntake => {
                self.rescan_intake();
                self.toast.info("intake rescanned");
            }

            Action::RefreshAll => self.refresh_all(),

            Action::Quit => self.should_quit = true,
        }
    }

    fn cycle_focus(&mut self, step: usize) {
        let idx = FOCUS_ORDER
            .iter()
            .position(|&id| id == self.focus)
            .unwrap_or(0);
        let next = FOCUS_ORDER[(idx + step) % FOCUS_ORDER.len()];
        self.set_focus(next);
    }

    fn set_focus(&mut self, id: ComponentId) {
        if self.focus == ComponentId::SearchBar && id != ComponentId::SearchBar {
            self.search_bar.deactivate();
            self.state.input_mode = InputMode::Normal;
        }
        self.focus = id;
        if id == ComponentId::SearchBar {
            self.search_bar.activate();
            self.state.input_mode = InputMode::Search;
        }
    }

    // ── API operations ────────────────────────────────────────────────────────

    /// Mark one API request started: loading on, previous error cleared.
    fn op_started(&mut self) {
        self.inflight += 1;
        self.state.loading = true;
        self.state.error = None;
    }

    /// Mark one API request finished; loading stays on while others remain.
    fn op_finished(&mut self) {
        self.inflight = self.inflight.saturating_sub(1);
        self.state.loading = self.inflight > 0;
    }

    /// Apply a list/search outcome: the displayed set is replaced wholesale.
    fn apply_records(&mut self, outcome: Outcome<Vec<TranscriptionRecord>>) {
        self.state.connected = outcome.is_ok();
        if let Some(ref err) = outcome.error {
            self.toast.error(err.clone());
        }
        self.state.records = outcome.data;
        self.state.error = outcome.error;
        self.record_list.sync(&self.state);
    }

    /// Fetch the full record collection (startup and post-upload refresh).
    fn refresh_all(&mut self) {
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        self.op_started();
        let api = self.api.clone();
        tokio::spawn(async move {
            let outcome = api.list_all().await;
            let _ = tx.send(AppMessage::ListLoaded(outcome)).await;
        });
    }

    /// Update the query synchronously, then search with the full text.
    fn begin_search(&mut self, query: String) {
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };
        self.state.query = query.clone();
        self.op_started();
        let seq = self.searches.begin();
        let api = self.api.clone();
        tokio::spawn(async move {
            let outcome = api.search(&query).await;
            let _ = tx.send(AppMessage::SearchLoaded { seq, outcome }).await;
        });
    }

    fn enqueue_upload(&mut self, path: PathBuf) {
        self.upload_queue.push_back(path);
        if !self.uploading {
            self.start_next_upload();
        }
        self.state.uploads_pending = self.upload_queue.len() + usize::from(self.uploading);
    }

    /// Pop and start the next queued upload, if any.  Uploads run one at a
    /// time, in submission order.
    fn start_next_upload(&mut self) {
        if self.uploading {
            return;
        }
        let Some(path) = self.upload_queue.pop_front() else {
            return;
        };
        let Some(tx) = self.msg_tx.clone() else {
            return;
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.uploading = true;
        self.op_started();
        self.toast.spinner(format!("transcribing {file_name}…"));

        let api = self.api.clone();
        tokio::spawn(async move {
            let outcome = api.upload(&path).await;
            let _ = tx
                .send(AppMessage::UploadFinished { file_name, outcome })
                .await;
        });
    }

    fn rescan_intake(&mut self) {
        self.state.intake_files = scan_intake_dir(&self.state.intake_dir);
        self.intake.sync(&self.state);
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(rows[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(panes[1]);

        self.intake.draw(
            frame,
            panes[0],
            self.focus == ComponentId::Intake,
            &self.state,
        );
        self.search_bar.draw(
            frame,
            right[0],
            self.focus == ComponentId::SearchBar,
            &self.state,
        );
        self.record_list.draw(
            frame,
            right[1],
            self.focus == ComponentId::RecordList,
            &self.state,
        );

        status_bar::draw_separator(frame, rows[1]);
        status_bar::draw_backend_bar(frame, rows[2], &self.state.base_url, self.state.connected);
        status_bar::draw_keys_bar(frame, rows[3], self.state.input_mode);

        self.toast.draw(frame, area);
    }
}

// ── Intake directory scan ─────────────────────────────────────────────────────

/// List regular, non-hidden files in the intake directory, sorted by name.
/// Unreadable directories yield an empty listing rather than an error — the
/// intake pane shows its own hint for that.
fn scan_intake_dir(dir: &Path) -> Vec<IntakeEntry> {
    let mut entries = Vec::new();
    let read = match std::fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            warn!("cannot read intake dir {}: {e}", dir.display());
            return entries;
        }
    };
    for item in read.flatten() {
        let Ok(meta) = item.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let path = item.path();
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => continue,
        };
        if name.starts_with('.') {
            continue;
        }
        entries.push(IntakeEntry {
            is_audio: media::is_audio_file(&path),
            path,
            name,
            size_bytes: meta.len(),
        });
    }
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    entries
}
