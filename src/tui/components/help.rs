use crate::tui::components::dialog_layout::{centered_rect, render_dialog_frame};
use crate::tui::keybindings::KeyPattern;
use crate::tui::{Action, ActionCategory, Component, KeyBindings, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};
use std::collections::BTreeMap;

/// Key reference overlay, grouped by action category
pub struct HelpOverlay {
    lines: Vec<(Option<ActionCategory>, String, String)>,
    scroll: u16,
}

impl HelpOverlay {
    pub fn new(bindings: &KeyBindings) -> Self {
        let mut grouped: BTreeMap<ActionCategory, Vec<(String, String)>> = BTreeMap::new();
        for action in Action::all() {
            let keys: Vec<String> = bindings
                .get_keys_for_action(action)
                .iter()
                .map(|k| KeyPattern::from_string(k).map(|p| p.label()).unwrap_or_else(|_| k.clone()))
                .collect();
            if keys.is_empty() {
                continue;
            }
            grouped
                .entry(action.category())
                .or_default()
                .push((keys.join(", "), action.description().to_string()));
        }

        let mut lines = Vec::new();
        for (category, entries) in grouped {
            lines.push((Some(category), String::new(), String::new()));
            lines.extend(entries.into_iter().map(|(k, d)| (None, k, d)));
        }
        Self { lines, scroll: 0 }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Component for HelpOverlay {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        let max = self.lines.len().saturating_sub(1) as u16;
        match action {
            Action::MoveUp => self.scroll = self.scroll.saturating_sub(1),
            Action::MoveDown => self.scroll = (self.scroll + 1).min(max),
            Action::GoToTop => self.scroll = 0,
            Action::GoToBottom => self.scroll = max,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered_rect(70, 80, area);
        let inner = render_dialog_frame(frame, popup, "Help", "Up/Down: scroll  ?/Esc: close", theme);

        let key_width = self
            .lines
            .iter()
            .map(|(_, k, _)| k.chars().count())
            .max()
            .unwrap_or(0)
            .min(inner.width as usize / 2);

        let text: Vec<Line> = self
            .lines
            .iter()
            .map(|(category, keys, description)| match category {
                Some(c) => Line::from(Span::styled(
                    c.to_string(),
                    theme.header_style().add_modifier(Modifier::UNDERLINED),
                )),
                None => Line::from(vec![
                    Span::styled(format!("  {:<width$}  ", keys, width = key_width), theme.warning_style()),
                    Span::styled(description.as_str(), theme.normal_style()),
                ]),
            })
            .collect();

        frame.render_widget(Paragraph::new(text).scroll((self.scroll, 0)), inner);
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::ToggleHelp, Action::MoveUp, Action::MoveDown]
    }

    fn name(&self) -> &str {
        "Help"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_group_by_category() {
        let help = HelpOverlay::new(&KeyBindings::default());

        let (first_category, _, _) = &help.lines[0];
        assert_eq!(*first_category, Some(ActionCategory::Navigation));

        let search = help
            .lines
            .iter()
            .find(|(_, _, d)| d == Action::Search.description())
            .unwrap();
        assert_eq!(search.1, "/, Ctrl+f");
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut help = HelpOverlay::new(&KeyBindings::default());
        help.handle_action(Action::MoveUp).unwrap();
        assert_eq!(help.scroll, 0);

        help.handle_action(Action::GoToBottom).unwrap();
        assert_eq!(help.scroll as usize, help.line_count() - 1);
        help.handle_action(Action::MoveDown).unwrap();
        assert_eq!(help.scroll as usize, help.line_count() - 1);
    }
}
