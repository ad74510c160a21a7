pub mod export_service;
pub mod refresh_service;
pub mod stats_service;
pub mod view_service;

pub use refresh_service::RefreshService;
pub use view_service::ViewService;
