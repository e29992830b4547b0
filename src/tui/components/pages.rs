//! Screens without a data table: the public pages, the sign-in form and the
//! admin settings overview.

use crate::access::{Page, Role, Router};
use crate::config::Config;
use crate::core::DataSource;
use crate::tui::components::dialog_layout::centered_rect;
use crate::tui::{Action, Component, Modal, ModalOutcome, Theme};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use strum::IntoEnumIterator;
use tui_textarea::TextArea;

/// Informational page with a title and a paragraph of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPage {
    title: &'static str,
    body: &'static str,
}

impl StaticPage {
    pub fn for_page(page: Page) -> Option<Self> {
        let body = match page {
            Page::Register => {
                "Accounts are created by an administrator. Ask for access, then sign in with your email."
            }
            Page::Library => "The public library lists the feeds available on this dashboard: Market Lines, SH Sellers.json and Play.",
            Page::Contact => "Questions about the data or your access? Contact the BI team.",
            Page::NotFound => "There is nothing at this address. Use the navigation bar or press Esc to go back.",
            _ => return None,
        };
        Some(Self {
            title: page.title(),
            body,
        })
    }

    pub fn title(&self) -> &str {
        self.title
    }
}

impl Component for StaticPage {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .border_style(theme.border_style());
        let text = Paragraph::new(self.body)
            .wrap(Wrap { trim: true })
            .style(theme.normal_style())
            .block(block);
        frame.render_widget(text, centered_rect(60, 40, area));
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::Cancel]
    }

    fn name(&self) -> &str {
        "StaticPage"
    }
}

/// Sign-in form; submits the trimmed email
pub struct LoginForm {
    email: TextArea<'static>,
    error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginForm {
    pub fn new() -> Self {
        let mut email = TextArea::default();
        email.set_placeholder_text("you@example.com");
        Self { email, error: None }
    }

    pub fn email(&self) -> String {
        self.email.lines().join("").trim().to_string()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl Component for LoginForm {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered_rect(50, 40, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Login ")
            .border_style(theme.focused_border_style());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(Paragraph::new("Email"), rows[0]);
        self.email.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        );
        frame.render_widget(&self.email, rows[1]);
        if let Some(error) = &self.error {
            frame.render_widget(Paragraph::new(Span::styled(error.as_str(), theme.error_style())), rows[2]);
        }
        frame.render_widget(
            Paragraph::new("Enter: sign in  Tab: register, library, contact  Ctrl+c: quit")
                .wrap(Wrap { trim: true })
                .style(theme.muted_style()),
            rows[3],
        );
    }

    fn supported_actions(&self) -> &[Action] {
        &[Action::Confirm]
    }

    fn name(&self) -> &str {
        "LoginForm"
    }
}

impl Modal for LoginForm {
    type Output = String;

    fn handle_key(&mut self, key: KeyEvent, _action: Option<Action>) -> Result<ModalOutcome<Self::Output>> {
        match key.code {
            KeyCode::Enter => {
                let email = self.email();
                if email.is_empty() || !email.contains('@') {
                    self.error = Some("Enter a valid email address".to_string());
                    return Ok(ModalOutcome::Pending);
                }
                self.error = None;
                Ok(ModalOutcome::Submitted(email))
            }
            KeyCode::Esc => Ok(ModalOutcome::Cancelled),
            _ => {
                self.email.input(key);
                Ok(ModalOutcome::Pending)
            }
        }
    }
}

/// Read-only overview of the active configuration, admin only
pub struct SettingsPage {
    lines: Vec<(String, String)>,
}

impl SettingsPage {
    pub fn new(config: &Config, router: &Router) -> Self {
        let mut lines = vec![
            ("Base path".to_string(), router.base_path().to_string()),
            ("Request timeout".to_string(), format!("{}s", config.request_timeout().as_secs())),
            ("Rows per page".to_string(), config.page_size.to_string()),
            ("Notification time".to_string(), format!("{}s", config.notification_ttl_secs)),
            ("Theme".to_string(), format!("{:?}", config.theme)),
            ("Data folder".to_string(), config.config.data_dir.display().to_string()),
        ];
        for source in DataSource::all() {
            lines.push((
                format!("{} endpoint", source.title()),
                config.endpoint(source).unwrap_or("(not configured)").to_string(),
            ));
        }
        for role in Role::iter() {
            let tabs: Vec<&str> = router
                .visibility()
                .visible_tabs(role)
                .iter()
                .map(|t| t.label())
                .collect();
            lines.push((format!("Tabs for {}", role), tabs.join(", ")));
        }
        lines.push((
            "Admin emails".to_string(),
            if config.admin_emails.is_empty() {
                "(none)".to_string()
            } else {
                config.admin_emails.join(", ")
            },
        ));
        lines.push(("Key overrides".to_string(), config.keybindings.len().to_string()));
        Self { lines }
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }
}

impl Component for SettingsPage {
    fn handle_action(&mut self, _action: Action) -> Result<bool> {
        Ok(false)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let label_width = self.lines.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        let text: Vec<Line> = self
            .lines
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<width$}  ", label, width = label_width), theme.header_style()),
                    Span::styled(value.as_str(), theme.normal_style()),
                ])
            })
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Settings ")
            .border_style(theme.border_style());
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn supported_actions(&self) -> &[Action] {
        &[]
    }

    fn name(&self) -> &str {
        "Settings"
    }
}
