use crate::tui::{Action, Component, Focusable, Theme};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Paragraph},
};
use tui_textarea::TextArea;

const PLACEHOLDER: &str = "Press / to search all columns";

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Live search box with the loading indicator and row summary beside it
pub struct Toolbar {
    search: TextArea<'static>,
    focused: bool,
    loading: bool,
    spinner_frame: usize,
    summary: String,
    filters: Vec<String>,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolbar {
    pub fn new() -> Self {
        let mut search = TextArea::default();
        search.set_placeholder_text(PLACEHOLDER);
        Self {
            search,
            focused: false,
            loading: false,
            spinner_frame: 0,
            summary: String::new(),
            filters: Vec::new(),
        }
    }

    /// Feed a key to the search box; returns true when the text changed
    pub fn input(&mut self, key: KeyEvent) -> bool {
        // Single line input
        if matches!(key.code, KeyCode::Enter) {
            return false;
        }
        let before = self.search_term();
        self.search.input(key);
        self.search_term() != before
    }

    pub fn search_term(&self) -> String {
        self.search.lines().join("")
    }

    /// Mirror the dashboard's term, e.g. after a region switch cleared it
    pub fn set_search_term(&mut self, term: &str) {
        if self.search_term() == term {
            return;
        }
        self.search = TextArea::from([term.to_string()]);
        self.search.set_placeholder_text(PLACEHOLDER);
        self.search.move_cursor(tui_textarea::CursorMove::End);
    }

    pub fn set_status(&mut self, loading: bool, summary: String, filters: Vec<String>) {
        self.loading = loading;
        self.summary = summary;
        self.filters = filters;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn indicator(&self) -> String {
        if self.loading {
            format!("{} Loading", SPINNER[self.spinner_frame % SPINNER.len()])
        } else {
            self.summary.clone()
        }
    }
}

impl Component for Toolbar {
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::Search => {
                self.set_focused(true);
                Ok(true)
            }
            Action::Confirm | Action::Cancel if self.focused => {
                self.set_focused(false);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let title = if self.filters.is_empty() {
            " Search ".to_string()
        } else {
            format!(" Search | filters: {} ", self.filters.join(", "))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if self.focused {
                theme.focused_border_style()
            } else {
                theme.border_style()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let indicator = self.indicator();
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(indicator.chars().count() as u16 + 1),
            ])
            .split(inner);

        self.search.set_style(theme.normal_style());
        self.search.set_cursor_style(if self.focused {
            theme.selected_style()
        } else {
            theme.normal_style()
        });
        frame.render_widget(&self.search, chunks[0]);

        let style = if self.loading {
            theme.warning_style()
        } else {
            theme.muted_style()
        };
        frame.render_widget(Paragraph::new(Span::styled(indicator, style)), chunks[1]);
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::Search, Action::Confirm, Action::Cancel]
    }

    fn name(&self) -> &str {
        "Toolbar"
    }

    fn update(&mut self) -> Result<()> {
        if self.loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
        Ok(())
    }
}

impl Focusable for Toolbar {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
