use crate::tui::{Action, Theme};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

/// Base trait for all TUI components
///
/// Components own their presentation state only. Data they show is pushed in
/// by the app before rendering.
pub trait Component {
    /// Handle an action
    ///
    /// Returns Ok(true) if the action was handled and consumed.
    /// Returns Ok(false) if the action was not handled and should propagate.
    fn handle_action(&mut self, action: Action) -> Result<bool>;

    /// Render the component within `area`
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Actions this component reacts to, for the help overlay
    fn supported_actions(&self) -> &[Action];

    /// Get component name for debugging/logging
    fn name(&self) -> &str;

    /// Called on every tick
    fn update(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Components that can receive keyboard focus
pub trait Focusable: Component {
    fn is_focused(&self) -> bool;

    fn set_focused(&mut self, focused: bool);
}

/// What a modal decided after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum ModalOutcome<T> {
    /// Still open
    Pending,
    Cancelled,
    Submitted(T),
}

/// Overlays that take every key while open
///
/// `action` is the key translated through the keybindings; modals with text
/// inputs decide themselves whether a key is text or a command.
pub trait Modal: Component {
    type Output;

    fn handle_key(&mut self, key: KeyEvent, action: Option<Action>) -> Result<ModalOutcome<Self::Output>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    struct MockComponent {
        name: String,
        focused: bool,
        actions: Vec<Action>,
        confirmed: usize,
    }

    impl MockComponent {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                focused: false,
                actions: vec![Action::MoveUp, Action::MoveDown],
                confirmed: 0,
            }
        }
    }

    impl Component for MockComponent {
        fn handle_action(&mut self, action: Action) -> Result<bool> {
            Ok(self.supported_actions().contains(&action))
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _theme: &Theme) {}

        fn supported_actions(&self) -> &[Action] {
            &self.actions
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    impl Focusable for MockComponent {
        fn is_focused(&self) -> bool {
            self.focused
        }

        fn set_focused(&mut self, focused: bool) {
            self.focused = focused;
        }
    }

    impl Modal for MockComponent {
        type Output = usize;

        fn handle_key(&mut self, _key: KeyEvent, action: Option<Action>) -> Result<ModalOutcome<usize>> {
            Ok(match action {
                Some(Action::Cancel) => ModalOutcome::Cancelled,
                Some(Action::Confirm) => {
                    self.confirmed += 1;
                    ModalOutcome::Submitted(self.confirmed)
                }
                _ => ModalOutcome::Pending,
            })
        }
    }

    #[test]
    fn test_component_action_handling() {
        let mut comp = MockComponent::new("test");

        assert!(comp.handle_action(Action::MoveUp).unwrap());
        assert!(!comp.handle_action(Action::Quit).unwrap());
    }

    #[test]
    fn test_focusable() {
        let mut comp = MockComponent::new("test");

        assert!(!comp.is_focused());
        comp.set_focused(true);
        assert!(comp.is_focused());
    }

    #[test]
    fn test_modal_outcomes() {
        let mut comp = MockComponent::new("modal");
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(comp.handle_key(key, None).unwrap(), ModalOutcome::Pending);
        assert_eq!(comp.handle_key(key, Some(Action::Confirm)).unwrap(), ModalOutcome::Submitted(1));
        assert_eq!(comp.handle_key(key, Some(Action::Cancel)).unwrap(), ModalOutcome::Cancelled);
        assert_eq!(comp.name(), "modal");
    }
}
