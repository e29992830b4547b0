pub mod column_dialog;
pub mod data_table;
pub mod dialog_layout;
pub mod filter_dialog;
pub mod help;
pub mod pages;
pub mod status_bar;
pub mod tabs;
pub mod toolbar;

pub use column_dialog::ColumnDialog;
pub use data_table::{DataTable, TableSnapshot};
pub use filter_dialog::FilterDialog;
pub use help::HelpOverlay;
pub use pages::{LoginForm, SettingsPage, StaticPage};
pub use status_bar::StatusBar;
pub use tabs::{NavBar, RegionTabs};
pub use toolbar::Toolbar;
