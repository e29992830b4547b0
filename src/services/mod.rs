pub mod data_service;
pub mod export_service;

pub use data_service::DataService;
pub use export_service::ExportService;
