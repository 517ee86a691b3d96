pub mod follow_user;
pub mod get_profile;
pub mod list_connections;
pub mod unfollow_user;
pub mod update_profile;
