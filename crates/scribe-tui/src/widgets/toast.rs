//! Toast notifications — transient status messages in the top-right corner,
//! plus a persistent spinner for the transcription in flight.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    fn color(self) -> ratatui::style::Color {
        match self {
            Self::Info => C_TOAST_INFO,
            Self::Success => C_TOAST_SUCCESS,
            Self::Error => C_TOAST_ERROR,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => "·",
            Self::Success => "✓",
            Self::Error => "✗",
        }
    }
}

struct Toast {
    message: String,
    severity: Severity,
    expires: Instant,
}

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];
const MAX_VISIBLE: usize = 4;

pub struct ToastManager {
    toasts: VecDeque<Toast>,
    /// Message of the persistent spinner toast, animated until resolved.
    spinner: Option<String>,
    spinner_frame: usize,
}

impl ToastManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            spinner: None,
            spinner_frame: 0,
        }
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, duration: Duration) {
        let msg = message.into();
        // Duplicate messages refresh rather than stack.
        self.toasts.retain(|t| t.message != msg);
        self.toasts.push_back(Toast {
            message: msg,
            severity,
            expires: Instant::now() + duration,
        });
        while self.toasts.len() > MAX_VISIBLE * 2 {
            self.toasts.pop_front();
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info, Duration::from_secs(3));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error, Duration::from_secs(5));
    }

    /// Start or replace the persistent spinner toast.  It animates on every
    /// `tick()` and stays until resolved or dismissed.
    pub fn spinner(&mut self, message: impl Into<String>) {
        self.spinner = Some(message.into());
    }

    /// Dismiss the spinner and push a normal expiring toast in its place.
    pub fn resolve_spinner(&mut self, severity: Severity, message: impl Into<String>) {
        self.spinner = None;
        let duration = match severity {
            Severity::Error => Duration::from_secs(5),
            _ => Duration::from_secs(3),
        };
        self.push(message, severity, duration);
    }

    /// Remove expired toasts and advance the spinner frame. Call each tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires > now);
        if self.spinner.is_some() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty() && self.spinner.is_none()
    }

    /// Render toasts in the top-right corner of `area`, spinner first.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if self.is_empty() {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60);
        let mut y = area.y + 1;

        if let Some(ref msg) = self.spinner {
            let icon = SPINNER_FRAMES[self.spinner_frame];
            draw_toast_row(frame, area, y, max_width, icon, msg, C_TOAST_INFO);
            y += 1;
            if y >= area.y + area.height {
                return;
            }
        }

        for toast in self.toasts.iter().rev().take(MAX_VISIBLE) {
            draw_toast_row(
                frame,
                area,
                y,
                max_width,
                toast.severity.icon(),
                &toast.message,
                toast.severity.color(),
            );
            y += 1;
            if y >= area.y + area.height {
                break;
            }
        }
    }
}

fn draw_toast_row(
    frame: &mut Frame,
    area: Rect,
    y: u16,
    max_width: u16,
    icon: &str,
    message: &str,
    color: ratatui::style::Color,
) {
    let msg_len = message.chars().count() as u16;
    let w = (msg_len + 4).min(max_width);
    let x = area.x + area.width.saturating_sub(w + 1);
    let toast_area = Rect {
        x,
        y,
        width: w,
        height: 1,
    };
    frame.render_widget(Clear, toast_area);
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {} {} ", icon, message),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(paragraph, toast_area);
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
