pub mod auth;
pub mod feeds;
pub mod posts;
pub mod users;
