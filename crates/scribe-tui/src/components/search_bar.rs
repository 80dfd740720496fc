//! SearchBar — controlled text field driving server-side search.
//!
//! Every edit emits `SearchChanged` with the full current text; the App
//! issues one search request per change (no debounce — a deliberate
//! simplicity tradeoff).  An empty text is equivalent to listing all.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthChar;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_SEARCH_BG, C_SEARCH_FG},
    widgets::pane_chrome::pane_chrome,
};

pub struct SearchBar {
    input: Input,
    active: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            input: Input::default(),
            active: false,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }
}

/// Drop the first `scroll` visual columns of `value`.  `visual_scroll` counts
/// columns, not bytes, so the cut has to walk char boundaries.
fn skip_columns(value: &str, scroll: usize) -> &str {
    let mut cols = 0usize;
    for (i, ch) in value.char_indices() {
        if cols >= scroll {
            return &value[i..];
        }
        cols += ch.width().unwrap_or(0);
    }
    ""
}

impl Component for SearchBar {
    fn id(&self) -> ComponentId {
        ComponentId::SearchBar
    }

    /// Esc behaviour (two-step, like a vim-style filter):
    ///   - with text: clear it and emit `SearchChanged("")` — which lists all
    ///   - already empty: leave search mode
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    self.input = Input::default();
                    vec![Action::SearchChanged(String::new())]
                } else {
                    self.deactivate();
                    vec![Action::CloseSearch]
                }
            }
            KeyCode::Enter => {
                // Keep the query, hand focus back.
                self.deactivate();
                vec![Action::CloseSearch]
            }
            _ => {
                let before = self.input.value().to_string();
                self.input
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
                let after = self.input.value();
                if after != before {
                    vec![Action::SearchChanged(after.to_string())]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, _state: &AppState) {
        let block = pane_chrome("search", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width < 3 || inner.height == 0 {
            return;
        }

        let scroll = self.input.visual_scroll(inner.width.saturating_sub(3) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled("/ Search transcriptions", Style::default().fg(C_MUTED))
        } else {
            Span::styled(
                format!("/ {}", skip_columns(value, scroll)),
                Style::default().fg(C_SEARCH_FG),
            )
        };
        let paragraph =
            Paragraph::new(Line::from(display)).style(Style::default().bg(C_SEARCH_BG));
        frame.render_widget(paragraph, inner);

        if self.active {
            let cursor_x = inner.x + 2 + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(inner.x + inner.width - 1), inner.y));
        }
    }
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode, KeyEvent};
    use std::path::PathBuf;

    fn state() -> AppState {
        AppState::new("http://localhost:5000".to_string(), PathBuf::from("."))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn every_edit_emits_the_full_text() {
        let mut bar = SearchBar::new();
        bar.activate();
        let s = state();

        let a1 = bar.handle_key(key(KeyCode::Char('h')), &s);
        let a2 = bar.handle_key(key(KeyCode::Char('i')), &s);
        assert!(matches!(&a1[..], [Action::SearchChanged(t)] if t == "h"));
        assert!(matches!(&a2[..], [Action::SearchChanged(t)] if t == "hi"));
        assert_eq!(bar.text(), "hi");
    }

    #[test]
    fn backspace_emits_the_shortened_text() {
        let mut bar = SearchBar::new();
        bar.activate();
        let s = state();
        bar.handle_key(key(KeyCode::Char('a')), &s);
        bar.handle_key(key(KeyCode::Char('b')), &s);
        let actions = bar.handle_key(key(KeyCode::Backspace), &s);
        assert!(matches!(&actions[..], [Action::SearchChanged(t)] if t == "a"));
    }

    #[test]
    fn esc_clears_then_closes() {
        let mut bar = SearchBar::new();
        bar.activate();
        let s = state();
        bar.handle_key(key(KeyCode::Char('x')), &s);

        // First Esc clears, which lists all via the empty-query equivalence.
        let first = bar.handle_key(key(KeyCode::Esc), &s);
        assert!(matches!(&first[..], [Action::SearchChanged(t)] if t.is_empty()));
        assert!(bar.is_active());

        let second = bar.handle_key(key(KeyCode::Esc), &s);
        assert!(matches!(&second[..], [Action::CloseSearch]));
        assert!(!bar.is_active());
    }

    #[test]
    fn wide_char_query_draws_in_a_narrow_frame() {
        let mut bar = SearchBar::new();
        bar.activate();
        let s = state();
        for _ in 0..15 {
            bar.handle_key(key(KeyCode::Char('好')), &s);
        }

        let backend = ratatui::backend::TestBackend::new(15, 3);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|f| bar.draw(f, f.area(), true, &s))
            .unwrap();
    }

    #[test]
    fn column_skip_lands_on_char_boundaries() {
        // Each 好 is two columns wide; an odd scroll falls inside one.
        let text = "好好好";
        assert_eq!(skip_columns(text, 0), "好好好");
        assert_eq!(skip_columns(text, 1), "好好");
        assert_eq!(skip_columns(text, 2), "好好");
        assert_eq!(skip_columns(text, 6), "");
        assert_eq!(skip_columns("abc", 2), "c");
    }

    #[test]
    fn enter_keeps_the_query() {
        let mut bar = SearchBar::new();
        bar.activate();
        let s = state();
        bar.handle_key(key(KeyCode::Char('q')), &s);
        let actions = bar.handle_key(key(KeyCode::Enter), &s);
        assert!(matches!(&actions[..], [Action::CloseSearch]));
        assert_eq!(bar.text(), "q");
    }
}
