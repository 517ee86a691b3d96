use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::validation;
use crate::domain::users::user::{ProfileChanges, UserProfile};

pub struct UpdateProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateProfile<'a, R> {
    pub async fn execute(
        &self,
        user_id: &str,
        changes: &ProfileChanges,
    ) -> Result<UserProfile, AppError> {
        validation::validate_profile_update(
            changes.display_name.as_deref(),
            changes.bio.as_deref(),
        )?;
        if !changes.is_empty() {
            self.repo
                .update_profile(user_id, changes)
                .await?
                .ok_or_else(AppError::user_not_found)?;
        }
        self.repo
            .find_profile(user_id)
            .await?
            .ok_or_else(AppError::user_not_found)
    }
}
