pub mod access;
pub mod config;
pub mod core;
pub mod logging;
pub mod services;
pub mod tui;

// Re-export commonly used types
pub use access::{Page, Role, Router, UserContext};
pub use core::{DashboardState, DataSource, Dataset, LoadError, Row};
pub use services::DataService;
pub use tui::{Action, ActionCategory, App};
