//! RecordList — displays the transcription set, right pane.
//!
//! Four mutually exclusive render states, checked in precedence order:
//! loading → error → empty → populated.  Long transcription text is truncated
//! for display only; the underlying record always keeps the full text.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

use scribe_proto::record::TranscriptionRecord;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        style_default, style_error, style_muted, style_secondary, style_selected_focused,
        C_TIMESTAMP,
    },
    widgets::{pane_chrome::pane_chrome, scrollable_list::ScrollableList},
};

/// Which of the four displays to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Loading,
    Error,
    Empty,
    Populated,
}

/// Precedence: loading wins over everything, error over content, empty over
/// populated.
pub fn render_state(state: &AppState) -> RenderState {
    if state.loading {
        RenderState::Loading
    } else if state.error.is_some() {
        RenderState::Error
    } else if state.records.is_empty() {
        RenderState::Empty
    } else {
        RenderState::Populated
    }
}

/// Truncate `text` to `max_width` terminal columns for single-line display,
/// flattening internal whitespace.  Returns a new string; the source record
/// is never modified.
pub fn truncate_for_display(text: &str, max_width: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut width = 0usize;
    for (i, ch) in flat.char_indices() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width.saturating_sub(1) {
            let mut out = flat[..i].to_string();
            out.push('…');
            return out;
        }
        width += w;
    }
    flat
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Rows each record occupies: file name, transcription, timestamp.
const ROWS_PER_RECORD: usize = 3;

pub struct RecordList {
    pub list: ScrollableList<TranscriptionRecord>,
    spinner_frame: usize,
    last_page: usize,
}

impl RecordList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            spinner_frame: 0,
            last_page: 0,
        }
    }

    /// Replace the displayed set (wholesale, per the state contract).
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.records.clone());
    }
}

impl Component for RecordList {
    fn id(&self) -> ComponentId {
        ComponentId::RecordList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(1),
            KeyCode::Char('g') | KeyCode::Home => self.list.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.list.select_last(),
            KeyCode::PageUp => self.list.select_up(self.last_page.max(1)),
            KeyCode::PageDown => self.list.select_down(self.last_page.max(1)),
            KeyCode::Char('r') => return vec![Action::RefreshAll],
            _ => {}
        }
        Vec::new()
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        if state.loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let title = if state.query.is_empty() {
            format!("transcriptions ({})", state.records.len())
        } else {
            format!("transcriptions — \"{}\" ({})", state.query, state.records.len())
        };
        let block = pane_chrome(&title, Some('3'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 || inner.width < 4 {
            return;
        }

        match render_state(state) {
            RenderState::Loading => {
                let spinner = SPINNER_FRAMES[self.spinner_frame];
                let msg = Paragraph::new(Line::from(vec![
                    Span::styled(format!(" {spinner} "), style_secondary()),
                    Span::styled("loading…", style_secondary()),
                ]));
                frame.render_widget(msg, inner);
            }
            RenderState::Error => {
                let text = state.error.as_deref().unwrap_or("");
                let msg = Paragraph::new(Line::from(Span::styled(format!(" {text}"), style_error())))
                    .wrap(ratatui::widgets::Wrap { trim: true });
                frame.render_widget(msg, inner);
            }
            RenderState::Empty => {
                let msg = Paragraph::new(Line::from(Span::styled(
                    " No transcriptions found",
                    style_muted(),
                )));
                frame.render_widget(msg, inner);
            }
            RenderState::Populated => self.draw_records(frame, inner, focused),
        }
    }
}

impl RecordList {
    fn draw_records(&mut self, frame: &mut Frame, inner: Rect, focused: bool) {
        let page = (inner.height as usize / ROWS_PER_RECORD).max(1);
        self.last_page = page;
        self.list.ensure_visible(page);

        let text_width = inner.width.saturating_sub(3) as usize;

        for (row, (idx, record)) in self.list.visible_items(page).into_iter().enumerate() {
            let y = inner.y + (row * ROWS_PER_RECORD) as u16;
            if y + 2 >= inner.y + inner.height {
                break;
            }
            let selected = focused && idx == self.list.selected;

            let name_style = if selected {
                style_selected_focused()
            } else {
                style_default()
            };
            let cursor = if selected { "▸ " } else { "  " };

            let name = Line::from(vec![
                Span::styled(cursor, style_secondary()),
                Span::styled(record.file_name.clone(), name_style),
            ]);
            let body = Line::from(Span::styled(
                format!("  {}", truncate_for_display(&record.transcription, text_width)),
                style_secondary(),
            ));
            let stamp = Line::from(Span::styled(
                format!("  {}", record.created_at_display()),
                Style::default().fg(C_TIMESTAMP),
            ));

            for (offset, line) in [name, body, stamp].into_iter().enumerate() {
                let line_area = Rect {
                    x: inner.x,
                    y: y + offset as u16,
                    width: inner.width,
                    height: 1,
                };
                frame.render_widget(Paragraph::new(line), line_area);
            }
        }
    }
}

impl Default for RecordList {
    fn default() -> Self {
        Self::new()
    }
}
