use crate::application::error::AppError;
use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::user_repository::UserRepository;

pub struct FollowUser<'a, U, F>
where
    U: UserRepository + ?Sized,
    F: FollowRepository + ?Sized,
{
    pub users: &'a U,
    pub follows: &'a F,
}

impl<'a, U, F> FollowUser<'a, U, F>
where
    U: UserRepository + ?Sized,
    F: FollowRepository + ?Sized,
{
    pub async fn execute(&self, follower_id: &str, target_id: &str) -> Result<(), AppError> {
        if follower_id == target_id {
            return Err(AppError::BadRequest("Cannot follow yourself".into()));
        }
        if self.users.find_by_id(target_id).await?.is_none() {
            return Err(AppError::user_not_found());
        }
        if !self.follows.follow(follower_id, target_id).await? {
            return Err(AppError::Conflict("Already following this user".into()));
        }
        tracing::debug!(follower_id, followed_id = target_id, "user_followed");
        Ok(())
    }
}
