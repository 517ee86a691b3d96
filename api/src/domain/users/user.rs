use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const USER_ID_PREFIX: &str = "user_";

pub fn new_user_id() -> String {
    format!("{USER_ID_PREFIX}{}", Uuid::new_v4())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user together with the stored password hash. Only the login flow sees this.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

// None => leave unchanged
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.bio.is_none()
    }
}
