pub mod app_context;
pub mod config;
pub mod logging;
pub mod router;
