//! Intake component — the file-drop surface, left pane.
//!
//! Lists the intake directory; Space marks files, Enter submits them.  Each
//! submitted file is validated independently: accepted audio files are
//! forwarded one at a time, in order, as `Upload` actions; anything else
//! produces a visible `Reject` and never reaches the network.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use scribe_proto::media;

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, IntakeEntry},
    component::Component,
    theme::{
        style_muted, style_secondary, style_selected, style_selected_focused, C_ACCENT, C_MUTED,
        C_PRIMARY, C_TOAST_WARNING,
    },
    widgets::{
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub struct Intake {
    pub list: ScrollableList<IntakeEntry>,
    marked: HashSet<PathBuf>,
    last_height: usize,
}

impl Intake {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            marked: HashSet::new(),
            last_height: 0,
        }
    }

    /// Sync the listing from AppState, dropping marks for vanished files.
    pub fn sync(&mut self, state: &AppState) {
        self.list.set_items(state.intake_files.clone());
        let present: HashSet<&Path> = state.intake_files.iter().map(|e| e.path.as_path()).collect();
        self.marked.retain(|p| present.contains(p.as_path()));
    }

    /// Validate and forward a batch of submitted paths.  One `Upload` per
    /// accepted file, in submission order; one `Reject` per refused file.
    pub fn submit_paths(paths: &[PathBuf]) -> Vec<Action> {
        let mut actions = Vec::with_capacity(paths.len());
        for path in paths {
            if media::is_audio_file(path) {
                actions.push(Action::Upload(path.clone()));
            } else {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                actions.push(Action::Reject { file_name });
            }
        }
        actions
    }

    /// The submission set: marked files in listing order, or the cursor row.
    fn submission(&self) -> Vec<PathBuf> {
        if self.marked.is_empty() {
            return self
                .list
                .selected_item()
                .map(|e| vec![e.path.clone()])
                .unwrap_or_default();
        }
        self.list
            .items
            .iter()
            .filter(|e| self.marked.contains(&e.path))
            .map(|e| e.path.clone())
            .collect()
    }
}

impl Component for Intake {
    fn id(&self) -> ComponentId {
        ComponentId::Intake
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list.select_up(1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list.select_down(1);
                Vec::new()
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.list.select_first();
                Vec::new()
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.list.select_last();
                Vec::new()
            }
            KeyCode::PageUp => {
                self.list.select_up(self.last_height.max(1));
                Vec::new()
            }
            KeyCode::PageDown => {
                self.list.select_down(self.last_height.max(1));
                Vec::new()
            }
            KeyCode::Char(' ') => {
                if let Some(entry) = self.list.selected_item() {
                    let path = entry.path.clone();
                    if !self.marked.remove(&path) {
                        self.marked.insert(path);
                    }
                }
                Vec::new()
            }
            KeyCode::Enter => {
                let paths = self.submission();
                self.marked.clear();
                Self::submit_paths(&paths)
            }
            KeyCode::Char('r') => vec![Action::RescanIntake],
            _ => Vec::new(),
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let badge = (state.uploads_pending > 0).then(|| Badge {
            text: "UPLOADING",
            color: C_TOAST_WARNING,
        });
        let title = format!("intake — {}", state.intake_dir.display());
        let block = pane_chrome(&title, Some('1'), focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        if self.list.is_empty() {
            let msg = Paragraph::new(Line::from(Span::styled(
                " no files here — drop audio into this directory",
                style_muted(),
            )));
            frame.render_widget(msg, inner);
            return;
        }

        let height = inner.height as usize;
        self.last_height = height;
        self.list.ensure_visible(height);

        for (row, (idx, entry)) in self.list.visible_items(height).into_iter().enumerate() {
            let y = inner.y + row as u16;
            let row_area = Rect {
                x: inner.x,
                y,
                width: inner.width,
                height: 1,
            };

            let selected = idx == self.list.selected;
            let marked = self.marked.contains(&entry.path);

            let marker = if marked { "▪ " } else { "  " };
            let name_style = if selected {
                if focused {
                    style_selected_focused()
                } else {
                    style_selected()
                }
            } else if entry.is_audio {
                Style::default().fg(C_PRIMARY)
            } else {
                Style::default().fg(C_MUTED)
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(C_ACCENT)),
                Span::styled(entry.name.clone(), name_style),
                Span::styled(format!("  {}", human_size(entry.size_bytes)), style_secondary()),
            ];
            if !entry.is_audio {
                spans.push(Span::styled("  not audio", style_muted()));
            }

            let mut line = Paragraph::new(Line::from(spans));
            if selected {
                line = line.style(style_selected());
            }
            frame.render_widget(line, row_area);
        }
    }
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.0} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

impl Default for Intake {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn non_audio_files_are_rejected_not_uploaded() {
        let actions = Intake::submit_paths(&paths(&["notes.txt", "slides.pdf"]));
        assert_eq!(actions.len(), 2);
        for action in &actions {
            assert!(
                matches!(action, Action::Reject { .. }),
                "expected Reject, got {action:?}"
            );
        }
    }

    #[test]
    fn audio_files_upload_once_each_in_order() {
        let actions = Intake::submit_paths(&paths(&["one.mp3", "two.wav", "three.ogg"]));
        let uploaded: Vec<_> = actions
            .iter()
            .map(|a| match a {
                Action::Upload(p) => p.clone(),
                other => panic!("expected Upload, got {other:?}"),
            })
            .collect();
        assert_eq!(uploaded, paths(&["one.mp3", "two.wav", "three.ogg"]));
    }

    #[test]
    fn mixed_batch_validates_each_file_independently() {
        let actions = Intake::submit_paths(&paths(&["a.mp3", "b.txt", "c.m4a"]));
        assert!(matches!(&actions[0], Action::Upload(p) if p == &PathBuf::from("a.mp3")));
        assert!(matches!(&actions[1], Action::Reject { file_name } if file_name == "b.txt"));
        assert!(matches!(&actions[2], Action::Upload(p) if p == &PathBuf::from("c.m4a")));
    }

    #[test]
    fn human_size_buckets() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }
}
