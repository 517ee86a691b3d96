use async_trait::async_trait;

use crate::domain::users::user::UserProfile;

#[async_trait]
pub trait FollowRepository: Send + Sync {
    // false when the edge already existed
    async fn follow(&self, follower_id: &str, followed_id: &str) -> anyhow::Result<bool>;
    // false when there was no edge to remove
    async fn unfollow(&self, follower_id: &str, followed_id: &str) -> anyhow::Result<bool>;
    /// Profiles of the users following `user_id`, ordered by username.
    async fn followers_of(&self, user_id: &str) -> anyhow::Result<Vec<UserProfile>>;
    /// Profiles of the users `user_id` follows, ordered by username.
    async fn following_of(&self, user_id: &str) -> anyhow::Result<Vec<UserProfile>>;
    async fn follower_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>>;
    async fn following_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>>;
}
