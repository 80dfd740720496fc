//! Status bar — bottom rows with mode, keybindings, and backend state.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ERROR, C_MODE_NORMAL, C_MODE_SEARCH, C_MUTED, C_OK, C_SECONDARY, C_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Keystrokes go to the search field.
    Search,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Search => "SEARCH",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Search => C_MODE_SEARCH,
        }
    }
}

/// Draw a horizontal separator line.
pub fn draw_separator(frame: &mut Frame, area: Rect) {
    let line = Line::from(Span::styled(
        "─".repeat(area.width as usize),
        Style::default().fg(C_SEPARATOR),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the backend line: connection dot + base URL.
pub fn draw_backend_bar(frame: &mut Frame, area: Rect, base_url: &str, connected: bool) {
    let dot = if connected {
        Span::styled("●", Style::default().fg(C_OK))
    } else {
        Span::styled("○", Style::default().fg(C_ERROR))
    };
    let url = Span::styled(base_url, Style::default().fg(C_SECONDARY));
    let line = Line::from(vec![Span::raw(" "), dot, Span::raw(" "), url]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode) {
    let label_span = Span::styled(
        format!(" {} ", mode.label()),
        Style::default()
            .fg(mode.color())
            .add_modifier(Modifier::BOLD),
    );

    let keys = match mode {
        InputMode::Normal => {
            " ↑↓/jk select  Space mark  Enter upload  / search  r refresh  Tab/1-3 panes  q quit"
        }
        InputMode::Search => " type to search  Enter keep  Esc clear/close  Tab next pane",
    };

    let line = Line::from(vec![
        label_span,
        Span::styled("│", Style::default().fg(C_MUTED)),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
