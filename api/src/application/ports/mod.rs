pub mod follow_repository;
pub mod health_probe;
pub mod post_repository;
pub mod user_repository;
