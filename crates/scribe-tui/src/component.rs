//! Component trait — the interface every UI panel implements.
//!
//! Design principles:
//! - Components are self-contained: they own their cursor/input state and
//!   render themselves.
//! - Components receive `AppState` (read-only) for data they don't own.
//! - Components produce `Vec<Action>` — they never mutate shared state
//!   directly; the App event-loop owns all writes.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

/// The trait every focusable panel implements.
pub trait Component {
    /// Which component is this?
    fn id(&self) -> ComponentId;

    /// Handle a key event. Returns actions to be dispatched.
    /// Only called when this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Called each tick (~100ms). For animations and expiry checks.
    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
