use crate::core::Notification;
use crate::tui::{Action, Component, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Bottom line: the front notification (if any) and a short key hint
#[derive(Debug, Default)]
pub struct StatusBar {
    current: Option<Notification>,
    pending: usize,
    hint: String,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            hint: "?: help  q: quit".to_string(),
            ..Self::default()
        }
    }

    pub fn set_notification(&mut self, current: Option<Notification>, pending: usize) {
        self.current = current;
        self.pending = pending;
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) {
        self.hint = hint.into();
    }

    /// Rows needed to show the notification wrapped at `width`, at most two
    pub fn height(&self, width: u16) -> u16 {
        match &self.current {
            Some(n) => (self.wrapped(n, width).len() as u16).clamp(1, 2),
            None => 1,
        }
    }

    fn wrapped(&self, notification: &Notification, width: u16) -> Vec<String> {
        let mut text = format!("{}: {}", notification.title, notification.description);
        if self.pending > 0 {
            text.push_str(&format!(" (+{} more, d to dismiss)", self.pending));
        }
        let hint_width = self.hint.chars().count() as u16 + 1;
        let width = width.saturating_sub(hint_width).max(10) as usize;
        textwrap::wrap(&text, width)
            .into_iter()
            .map(|l| l.into_owned())
            .collect()
    }
}

impl Component for StatusBar {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(self.hint.chars().count() as u16 + 1),
            ])
            .split(area);

        if let Some(notification) = &self.current {
            let style = theme.notification_style(notification.level);
            let lines: Vec<Line> = self
                .wrapped(notification, area.width)
                .into_iter()
                .take(area.height.max(1) as usize)
                .map(|l| Line::from(Span::styled(l, style)))
                .collect();
            frame.render_widget(Paragraph::new(lines), chunks[0]);
        }

        frame.render_widget(
            Paragraph::new(Span::styled(self.hint.as_str(), theme.muted_style())),
            chunks[1],
        );
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::DismissNotification]
    }

    fn name(&self) -> &str {
        "StatusBar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_height_grows_for_long_messages() {
        let mut bar = StatusBar::new();
        assert_eq!(bar.height(80), 1);

        bar.set_notification(
            Some(Notification::error("Failed to load Play data. Please try again.")),
            0,
        );
        assert_eq!(bar.height(200), 1);
        assert_eq!(bar.height(40), 2);
    }

    #[test]
    fn test_pending_count_is_mentioned() {
        let mut bar = StatusBar::new();
        let n = Notification::error("boom");
        bar.set_notification(Some(n.clone()), 2);

        let text = bar.wrapped(&n, 200).join(" ");
        assert_eq!(text, "Error: boom (+2 more, d to dismiss)");
    }
}
