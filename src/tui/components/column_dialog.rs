use crate::core::columns;
use crate::tui::components::dialog_layout::{centered_rect, render_dialog_frame};
use crate::tui::{Action, Component, Modal, ModalOutcome, Theme};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{List, ListItem, ListState, Paragraph},
};

/// Checklist of the region's columns
pub struct ColumnDialog {
    all: Vec<String>,
    visible: Vec<String>,
    selected: usize,
    error: Option<String>,
}

impl ColumnDialog {
    pub fn new(all: Vec<String>, visible: &[String]) -> Self {
        Self {
            all,
            visible: visible.to_vec(),
            selected: 0,
            error: None,
        }
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    fn toggle_selected(&mut self) {
        if let Some(column) = self.all.get(self.selected) {
            self.visible = columns::toggle(&self.visible, column, &self.all);
            self.error = None;
        }
    }
}

impl Component for ColumnDialog {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::MoveUp => self.selected = self.selected.saturating_sub(1),
            Action::MoveDown => {
                self.selected = (self.selected + 1).min(self.all.len().saturating_sub(1))
            }
            Action::GoToTop => self.selected = 0,
            Action::GoToBottom => self.selected = self.all.len().saturating_sub(1),
            Action::Toggle => self.toggle_selected(),
            Action::ShowAllColumns => {
                self.visible = self.all.clone();
                self.error = None;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered_rect(50, 70, area);
        let inner = render_dialog_frame(
            frame,
            popup,
            &format!("Columns ({}/{})", self.visible.len(), self.all.len()),
            "Up/Down: move  Space: show/hide  C: show all  Enter: apply  Esc: cancel",
            theme,
        );
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let items: Vec<ListItem> = self
            .all
            .iter()
            .map(|c| {
                let mark = if self.visible.contains(c) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", mark, c))
            })
            .collect();
        let list = List::new(items)
            .style(theme.normal_style())
            .highlight_style(theme.selected_style());
        let mut state = ListState::default();
        state.select((!self.all.is_empty()).then_some(self.selected));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        if let Some(error) = &self.error {
            frame.render_widget(Paragraph::new(Span::styled(error.as_str(), theme.error_style())), chunks[1]);
        }
    }

    fn supported_actions(&self) -> &[Action] {
        &[
            Action::MoveUp,
            Action::MoveDown,
            Action::Toggle,
            Action::ShowAllColumns,
            Action::Confirm,
            Action::Cancel,
        ]
    }

    fn name(&self) -> &str {
        "ColumnDialog"
    }
}

impl Modal for ColumnDialog {
    type Output = Vec<String>;

    fn handle_key(&mut self, _key: KeyEvent, action: Option<Action>) -> Result<ModalOutcome<Self::Output>> {
        match action {
            Some(Action::Cancel) => Ok(ModalOutcome::Cancelled),
            Some(Action::Confirm) if self.visible.is_empty() && !self.all.is_empty() => {
                self.error = Some("Select at least one column".to_string());
                Ok(ModalOutcome::Pending)
            }
            Some(Action::Confirm) => Ok(ModalOutcome::Submitted(self.visible.clone())),
            Some(other) => {
                self.handle_action(other)?;
                Ok(ModalOutcome::Pending)
            }
            None => Ok(ModalOutcome::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn press(dialog: &mut ColumnDialog, action: Action) -> ModalOutcome<Vec<String>> {
        dialog
            .handle_key(KeyEvent::new(KeyCode::Null, KeyModifiers::NONE), Some(action))
            .unwrap()
    }

    #[test]
    fn test_toggle_back_restores_natural_position() {
        let mut dialog = ColumnDialog::new(cols(&["a", "b", "c"]), &cols(&["a", "c"]));

        press(&mut dialog, Action::MoveDown);
        press(&mut dialog, Action::Toggle);

        assert_eq!(dialog.visible(), cols(&["a", "b", "c"]).as_slice());
        assert_eq!(press(&mut dialog, Action::Confirm), ModalOutcome::Submitted(cols(&["a", "b", "c"])));
    }

    #[test]
    fn test_empty_selection_is_refused() {
        let mut dialog = ColumnDialog::new(cols(&["a"]), &cols(&["a"]));
        press(&mut dialog, Action::Toggle);

        assert_eq!(press(&mut dialog, Action::Confirm), ModalOutcome::Pending);
        assert!(dialog.error.is_some());

        press(&mut dialog, Action::ShowAllColumns);
        assert_eq!(press(&mut dialog, Action::Confirm), ModalOutcome::Submitted(cols(&["a"])));
    }

    #[test]
    fn test_cancel_and_bounds() {
        let mut dialog = ColumnDialog::new(cols(&["a", "b"]), &[]);
        press(&mut dialog, Action::GoToBottom);
        press(&mut dialog, Action::MoveDown);
        assert_eq!(dialog.selected, 1);
        assert_eq!(press(&mut dialog, Action::Cancel), ModalOutcome::Cancelled);
    }
}
