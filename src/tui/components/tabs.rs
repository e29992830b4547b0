use crate::access::{Page, UserContext};
use crate::tui::{Action, Component, Theme};
use color_eyre::Result;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

/// Region selector above the table
#[derive(Debug, Default)]
pub struct RegionTabs {
    names: Vec<String>,
    selected: Option<usize>,
}

impl RegionTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_regions(&mut self, names: Vec<String>, active: Option<&str>) {
        self.selected = active.and_then(|a| names.iter().position(|n| n == a));
        self.names = names;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.and_then(|i| self.names.get(i)).map(String::as_str)
    }
}

impl Component for RegionTabs {
    // Region changes go through the dashboard state; this only draws them
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style());

        if self.names.is_empty() {
            let empty = Paragraph::new(Span::styled("No regions", theme.muted_style())).block(block);
            frame.render_widget(empty, area);
            return;
        }

        let tabs = Tabs::new(self.names.iter().map(|n| Line::from(n.as_str())))
            .select(self.selected.unwrap_or(0))
            .style(theme.normal_style())
            .highlight_style(theme.tab_active_style())
            .divider("|")
            .block(block);
        frame.render_widget(tabs, area);
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::NextTab, Action::PrevTab]
    }

    fn name(&self) -> &str {
        "RegionTabs"
    }
}

/// Top navigation bar; only drawn for a signed-in user
#[derive(Debug, Default)]
pub struct NavBar {
    entries: Vec<Page>,
    active: Option<Page>,
    user: Option<UserContext>,
}

impl NavBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_entries(&mut self, entries: Vec<Page>, active: Page, user: Option<UserContext>) {
        self.active = Some(active);
        self.entries = entries;
        self.user = user;
    }

    pub fn is_visible(&self) -> bool {
        self.user.is_some()
    }

    /// Entry after (or before) the active one, wrapping around
    pub fn neighbour(&self, forward: bool) -> Option<Page> {
        if self.entries.is_empty() {
            return None;
        }
        let len = self.entries.len();
        let current = self
            .active
            .and_then(|a| self.entries.iter().position(|p| *p == a));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, _) => 0,
        };
        self.entries.get(next).copied()
    }
}

impl Component for NavBar {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(user) = &self.user else {
            return;
        };

        let who = format!(" {} ({}) ", user.email, user.role);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(who.chars().count() as u16)])
            .split(area);

        let mut spans = vec![Span::styled(" sheetdash ", theme.tab_active_style())];
        for page in &self.entries {
            spans.push(Span::raw(" "));
            let style = if Some(*page) == self.active {
                theme.tab_active_style()
            } else {
                theme.nav_style()
            };
            spans.push(Span::styled(format!(" {} ", page.title()), style));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.nav_style()), chunks[0]);
        frame.render_widget(Paragraph::new(who).style(theme.nav_style()), chunks[1]);
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::NextView, Action::PrevView, Action::OpenSettings]
    }

    fn name(&self) -> &str {
        "NavBar"
    }
}
