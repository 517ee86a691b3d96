use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::UserProfile;

pub struct GetProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetProfile<'a, R> {
    pub async fn execute(&self, user_id: &str) -> Result<UserProfile, AppError> {
        self.repo
            .find_profile(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)
    }
}
