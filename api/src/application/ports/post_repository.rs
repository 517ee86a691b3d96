use async_trait::async_trait;

use crate::application::pagination::PageRequest;
use crate::domain::posts::post::{NewPost, Post, PostPage};

/// Every listing is ordered newest first, ties broken by id descending.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &NewPost) -> anyhow::Result<Post>;
    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Post>>;
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
    async fn list_by_author(&self, author_id: &str, page: PageRequest)
    -> anyhow::Result<PostPage>;
    /// Posts written by `user_id` or by anyone `user_id` follows.
    async fn timeline_for(&self, user_id: &str, page: PageRequest) -> anyhow::Result<PostPage>;
    async fn list_all(&self, page: PageRequest) -> anyhow::Result<PostPage>;
    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<Post>>;
}
