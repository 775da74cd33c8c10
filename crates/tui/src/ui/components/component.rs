//! Component system for the Exoscope TUI.
//!
//! Components are self-contained UI elements that handle their own events and
//! render themselves, reporting side effects back to the runtime as
//! [`Effect`]s.

use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::app::{App, Effect, Msg};

/// A UI component with localized behavior.
///
/// Components own only local UI behavior. Anything that leaves the process
/// (network, preference writes) is returned as an [`Effect`].
pub(crate) trait Component {
    /// Handle an application-level message the component cares about.
    fn handle_message(&mut self, _app: &mut App, _msg: Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle key events routed to this component.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Render the component into `rect`.
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
