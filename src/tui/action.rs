use serde::{Deserialize, Serialize};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    GoToTop,
    GoToBottom,

    // Pagination
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    CyclePageSize,

    // Data Operations
    Search,
    Filter,
    ClearFilters,
    Refresh,
    Export,

    // Columns
    Columns,
    ShowAllColumns,

    // View
    ToggleHelp,
    DismissNotification,

    // Region tabs
    NextTab,
    PrevTab,

    // Pages
    NextView,
    PrevView,
    OpenSettings,

    // Application
    Quit,
    Confirm,
    Cancel,

    // Dialog editing
    Delete,
    Toggle,
}

impl Action {
    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Action::MoveUp => "Move cursor up",
            Action::MoveDown => "Move cursor down",
            Action::MoveLeft => "Scroll columns left",
            Action::MoveRight => "Scroll columns right",
            Action::GoToTop => "Go to first row of page",
            Action::GoToBottom => "Go to last row of page",
            Action::NextPage => "Next page",
            Action::PrevPage => "Previous page",
            Action::FirstPage => "First page",
            Action::LastPage => "Last page",
            Action::CyclePageSize => "Cycle rows per page",
            Action::Search => "Search all columns",
            Action::Filter => "Edit column filters",
            Action::ClearFilters => "Clear search and filters",
            Action::Refresh => "Reload data",
            Action::Export => "Export view to CSV",
            Action::Columns => "Choose visible columns",
            Action::ShowAllColumns => "Show all columns",
            Action::ToggleHelp => "Toggle help screen",
            Action::DismissNotification => "Dismiss notification",
            Action::NextTab => "Next region",
            Action::PrevTab => "Previous region",
            Action::NextView => "Next page in navigation",
            Action::PrevView => "Previous page in navigation",
            Action::OpenSettings => "Open settings",
            Action::Quit => "Quit application",
            Action::Confirm => "Confirm action",
            Action::Cancel => "Cancel action",
            Action::Delete => "Delete selected item",
            Action::Toggle => "Toggle selected item",
        }
    }

    /// Get category for grouping in help screen
    pub fn category(&self) -> ActionCategory {
        match self {
            Action::MoveUp
            | Action::MoveDown
            | Action::MoveLeft
            | Action::MoveRight
            | Action::GoToTop
            | Action::GoToBottom => ActionCategory::Navigation,

            Action::NextPage
            | Action::PrevPage
            | Action::FirstPage
            | Action::LastPage
            | Action::CyclePageSize => ActionCategory::Pagination,

            Action::Search
            | Action::Filter
            | Action::ClearFilters
            | Action::Refresh
            | Action::Export => ActionCategory::DataOps,

            Action::Columns | Action::ShowAllColumns => ActionCategory::Columns,

            Action::ToggleHelp | Action::DismissNotification => ActionCategory::View,

            Action::NextTab | Action::PrevTab => ActionCategory::Tabs,

            Action::NextView | Action::PrevView | Action::OpenSettings => ActionCategory::Pages,

            Action::Quit | Action::Confirm | Action::Cancel => ActionCategory::Application,

            Action::Delete | Action::Toggle => ActionCategory::Dialogs,
        }
    }

    /// Get all possible actions (for validation)
    pub fn all() -> Vec<Action> {
        vec![
            Action::MoveUp,
            Action::MoveDown,
            Action::MoveLeft,
            Action::MoveRight,
            Action::GoToTop,
            Action::GoToBottom,
            Action::NextPage,
            Action::PrevPage,
            Action::FirstPage,
            Action::LastPage,
            Action::CyclePageSize,
            Action::Search,
            Action::Filter,
            Action::ClearFilters,
            Action::Refresh,
            Action::Export,
            Action::Columns,
            Action::ShowAllColumns,
            Action::ToggleHelp,
            Action::DismissNotification,
            Action::NextTab,
            Action::PrevTab,
            Action::NextView,
            Action::PrevView,
            Action::OpenSettings,
            Action::Quit,
            Action::Confirm,
            Action::Cancel,
            Action::Delete,
            Action::Toggle,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionCategory {
    Navigation,
    Pagination,
    DataOps,
    Columns,
    View,
    Tabs,
    Pages,
    Application,
    Dialogs,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Navigation => write!(f, "Navigation"),
            ActionCategory::Pagination => write!(f, "Pagination"),
            ActionCategory::DataOps => write!(f, "Data Operations"),
            ActionCategory::Columns => write!(f, "Columns"),
            ActionCategory::View => write!(f, "View"),
            ActionCategory::Tabs => write!(f, "Regions"),
            ActionCategory::Pages => write!(f, "Pages"),
            ActionCategory::Application => write!(f, "Application"),
            ActionCategory::Dialogs => write!(f, "Dialogs"),
        }
    }
}
