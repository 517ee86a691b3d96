pub mod auth;
pub mod error;
pub mod extract;
pub mod feeds;
pub mod health;
pub mod openapi;
pub mod posts;
pub mod rate_limit;
pub mod request_log;
pub mod users;
