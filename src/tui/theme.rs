use crate::config::ThemeName;
use crate::core::NotificationLevel;
use ratatui::style::{Color, Modifier, Style};

/// Color scheme for the dashboard
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI colors
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,

    // Navigation
    pub nav_fg: Color,
    pub nav_bg: Color,
    pub tab_active_fg: Color,
    pub tab_active_bg: Color,

    // Table colors
    pub header_fg: Color,
    pub header_bg: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub row_alt_bg: Color,

    // Status/feedback colors
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Default for Theme {
    /// Dark navy theme
    fn default() -> Self {
        Self {
            name: "Dark".to_string(),
            background: Color::Reset,
            foreground: Color::Gray,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            nav_fg: Color::White,
            nav_bg: Color::Rgb(16, 24, 48),
            tab_active_fg: Color::Black,
            tab_active_bg: Color::Cyan,
            header_fg: Color::Cyan,
            header_bg: Color::Rgb(16, 24, 48),
            selected_fg: Color::Black,
            selected_bg: Color::Cyan,
            row_alt_bg: Color::Rgb(22, 28, 44),
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::Blue,
        }
    }
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            border: Color::Gray,
            border_focused: Color::Blue,
            nav_fg: Color::White,
            nav_bg: Color::Blue,
            tab_active_fg: Color::White,
            tab_active_bg: Color::Blue,
            header_fg: Color::Blue,
            header_bg: Color::Rgb(240, 240, 240),
            selected_fg: Color::White,
            selected_bg: Color::Blue,
            row_alt_bg: Color::Rgb(246, 246, 250),
            success: Color::Green,
            error: Color::Red,
            // Darker yellow for light bg
            warning: Color::Rgb(200, 150, 0),
            info: Color::Blue,
        }
    }

    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Dark => Self::default(),
            ThemeName::Light => Self::light(),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn alt_row_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.row_alt_bg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.border_focused)
    }

    pub fn nav_style(&self) -> Style {
        Style::default().fg(self.nav_fg).bg(self.nav_bg)
    }

    pub fn tab_active_style(&self) -> Style {
        Style::default()
            .fg(self.tab_active_fg)
            .bg(self.tab_active_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn notification_style(&self, level: NotificationLevel) -> Style {
        let color = match level {
            NotificationLevel::Info => self.info,
            NotificationLevel::Success => self.success,
            NotificationLevel::Error => self.error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name(ThemeName::Dark).name, "Dark");
        assert_eq!(Theme::from_name(ThemeName::Light).background, Color::White);
    }

    #[test]
    fn test_style_helpers() {
        let theme = Theme::default();

        assert!(theme.header_style().add_modifier.contains(Modifier::BOLD));

        let selected = theme.selected_style();
        assert_eq!(selected.fg, Some(theme.selected_fg));
        assert_eq!(selected.bg, Some(theme.selected_bg));

        assert_eq!(
            theme.notification_style(NotificationLevel::Error).fg,
            Some(theme.error)
        );
    }
}
