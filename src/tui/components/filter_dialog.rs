//! Editor for the column predicates of the active region.
//!
//! The dialog works on a draft copy; nothing reaches the dashboard until the
//! Apply row is confirmed.

use crate::core::{FilterOperator, FilterPredicate};
use crate::tui::components::dialog_layout::{centered_rect, render_dialog_frame};
use crate::tui::{Action, Component, Modal, ModalOutcome, Theme};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};
use tui_textarea::TextArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Column,
    Operator,
    Value,
}

impl EditField {
    fn next(self) -> Self {
        match self {
            Self::Column => Self::Operator,
            Self::Operator => Self::Value,
            Self::Value => Self::Column,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Column => Self::Value,
            Self::Operator => Self::Column,
            Self::Value => Self::Operator,
        }
    }
}

/// A predicate being added or changed
struct Editor {
    /// Index into the draft list, None when adding
    target: Option<usize>,
    column: usize,
    operator: FilterOperator,
    value: TextArea<'static>,
    field: EditField,
}

pub struct FilterDialog {
    columns: Vec<String>,
    draft: Vec<FilterPredicate>,
    selected: usize,
    editor: Option<Editor>,
    error: Option<String>,
}

impl FilterDialog {
    pub fn new(columns: Vec<String>, current: &[FilterPredicate]) -> Self {
        Self {
            columns,
            draft: current.to_vec(),
            selected: 0,
            editor: None,
            error: None,
        }
    }

    pub fn draft(&self) -> &[FilterPredicate] {
        &self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Rows of the list: one per predicate, then "add", then "apply"
    fn add_row(&self) -> usize {
        self.draft.len()
    }

    fn apply_row(&self) -> usize {
        self.draft.len() + 1
    }

    fn open_editor(&mut self, target: Option<usize>) {
        if self.columns.is_empty() {
            self.error = Some("No columns to filter".to_string());
            return;
        }
        let existing = target.and_then(|i| self.draft.get(i));
        let column = existing
            .and_then(|p| self.columns.iter().position(|c| *c == p.column))
            .unwrap_or(0);
        let operator = existing.map(|p| p.operator).unwrap_or_default();
        let mut value = TextArea::from([existing.map(|p| p.value.clone()).unwrap_or_default()]);
        value.move_cursor(tui_textarea::CursorMove::End);
        self.error = None;
        self.editor = Some(Editor {
            target,
            column,
            operator,
            value,
            field: EditField::Column,
        });
    }

    fn commit_editor(&mut self) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        let Some(column) = self.columns.get(editor.column) else {
            return;
        };
        let predicate = FilterPredicate::new(column.clone(), editor.operator, editor.value.lines().join(""));
        match editor.target {
            Some(i) if i < self.draft.len() => self.draft[i] = predicate,
            _ => {
                self.draft.push(predicate);
                self.selected = self.draft.len() - 1;
            }
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        let column_count = self.columns.len();
        let Some(editor) = &mut self.editor else {
            return;
        };
        match editor.field {
            EditField::Column if column_count > 0 => {
                editor.column = if forward {
                    (editor.column + 1) % column_count
                } else {
                    (editor.column + column_count - 1) % column_count
                };
            }
            EditField::Operator => {
                editor.operator = if forward {
                    editor.operator.next()
                } else {
                    editor.operator.prev()
                };
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent, action: Option<Action>) {
        let Some(editor) = &mut self.editor else {
            return;
        };
        match key.code {
            KeyCode::Enter => return self.commit_editor(),
            KeyCode::Esc => {
                self.editor = None;
                return;
            }
            KeyCode::Tab => {
                editor.field = editor.field.next();
                return;
            }
            KeyCode::BackTab => {
                editor.field = editor.field.prev();
                return;
            }
            _ => {}
        }

        if editor.field == EditField::Value {
            editor.value.input(key);
            return;
        }

        match (key.code, action) {
            (KeyCode::Right, _) | (_, Some(Action::MoveRight | Action::MoveDown)) => self.cycle_choice(true),
            (KeyCode::Left, _) | (_, Some(Action::MoveLeft | Action::MoveUp)) => self.cycle_choice(false),
            _ => {}
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut items: Vec<ListItem> = self
            .draft
            .iter()
            .map(|p| ListItem::new(p.describe()))
            .collect();
        items.push(ListItem::new(Span::styled("[+ Add filter]", theme.muted_style())));
        items.push(ListItem::new(Span::styled(
            "[Apply]",
            theme.muted_style().add_modifier(Modifier::BOLD),
        )));

        let list = List::new(items)
            .style(theme.normal_style())
            .highlight_style(theme.selected_style())
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_editor(&self, editor: &Editor, frame: &mut Frame, area: Rect, theme: &Theme) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let label = |field: EditField, text: &str| {
            let style = if editor.field == field {
                theme.selected_style()
            } else {
                theme.normal_style()
            };
            Span::styled(format!("{:<10}", text), style)
        };

        let column = self.columns.get(editor.column).map(String::as_str).unwrap_or("");
        frame.render_widget(
            Paragraph::new(Line::from(vec![label(EditField::Column, "Column"), Span::raw(format!("< {} >", column))])),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                label(EditField::Operator, "Operator"),
                Span::raw(format!("< {} >", editor.operator.symbol())),
            ])),
            rows[1],
        );

        let value_row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(10), Constraint::Min(1)])
            .split(rows[2]);
        frame.render_widget(Paragraph::new(label(EditField::Value, "Value")), value_row[0]);
        frame.render_widget(&editor.value, value_row[1]);
    }

    fn instructions(&self) -> &'static str {
        if self.editor.is_some() {
            "Tab/Shift+Tab: field  Left/Right: change  Enter: save  Esc: back"
        } else {
            "Up/Down: select  Enter: edit/add/apply  Del: remove  x: clear all  Esc: cancel"
        }
    }
}

impl Component for FilterDialog {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        let last_row = self.apply_row();
        match action {
            Action::MoveUp => self.selected = self.selected.saturating_sub(1),
            Action::MoveDown => self.selected = (self.selected + 1).min(last_row),
            Action::Delete if self.selected < self.draft.len() => {
                self.draft.remove(self.selected);
                self.selected = self.selected.min(self.apply_row());
            }
            Action::ClearFilters => {
                self.draft.clear();
                self.selected = 0;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered_rect(60, 60, area);
        let inner = render_dialog_frame(frame, popup, "Filters", self.instructions(), theme);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        match &self.editor {
            Some(editor) => self.render_editor(editor, frame, chunks[0], theme),
            None => self.render_list(frame, chunks[0], theme),
        }
        if let Some(error) = &self.error {
            frame.render_widget(Paragraph::new(Span::styled(error.as_str(), theme.error_style())), chunks[1]);
        }
    }

    fn supported_actions(&self) -> &[Action] {
        &[
            Action::MoveUp,
            Action::MoveDown,
            Action::Delete,
            Action::ClearFilters,
            Action::Confirm,
            Action::Cancel,
        ]
    }

    fn name(&self) -> &str {
        "FilterDialog"
    }
}

impl Modal for FilterDialog {
    type Output = Vec<FilterPredicate>;

    fn handle_key(&mut self, key: KeyEvent, action: Option<Action>) -> Result<ModalOutcome<Self::Output>> {
        if self.editor.is_some() {
            self.handle_editor_key(key, action);
            return Ok(ModalOutcome::Pending);
        }

        match action {
            Some(Action::Cancel) => return Ok(ModalOutcome::Cancelled),
            Some(Action::Confirm) => {
                if self.selected == self.apply_row() {
                    return Ok(ModalOutcome::Submitted(self.draft.clone()));
                }
                if self.selected == self.add_row() {
                    self.open_editor(None);
                } else {
                    self.open_editor(Some(self.selected));
                }
            }
            Some(other) => {
                self.handle_action(other)?;
            }
            None => {}
        }
        Ok(ModalOutcome::Pending)
    }
}
