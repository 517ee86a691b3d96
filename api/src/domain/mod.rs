pub mod posts;
pub mod ranking;
pub mod users;
