use async_trait::async_trait;

use crate::domain::users::user::{NewUser, ProfileChanges, User, UserCredentials, UserProfile};

#[derive(thiserror::Error, Debug)]
pub enum CreateUserError {
    #[error("username already registered")]
    UsernameTaken,
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>>;
    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserCredentials>>;
    async fn find_profile(&self, id: &str) -> anyhow::Result<Option<UserProfile>>;
    // Returns None when the user does not exist
    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>>;
}
