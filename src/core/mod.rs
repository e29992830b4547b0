pub mod columns;
pub mod error;
pub mod filter;
pub mod notification;
pub mod pagination;
pub mod types;
pub mod view;

pub use columns::ColumnVisibility;
pub use error::LoadError;
pub use filter::{FilterEngine, FilterOperator, FilterPredicate};
pub use notification::{Notification, NotificationLevel, Notifications};
pub use pagination::Pagination;
pub use types::*;
pub use view::{DashboardState, LoadOutcome, PageView};
