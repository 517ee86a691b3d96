use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const POST_ID_PREFIX: &str = "post_";

pub fn new_post_id() -> String {
    format!("{POST_ID_PREFIX}{}", Uuid::new_v4())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAuthor {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: PostAuthor,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub id: String,
    pub author_id: String,
    pub content: String,
}

/// One page of posts plus the size of the whole filtered set.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: i64,
}
