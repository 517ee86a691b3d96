use crate::application::error::AppError;
use crate::application::ports::follow_repository::FollowRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Followers,
    Following,
}

pub struct ListConnections<'a, U, F>
where
    U: UserRepository + ?Sized,
    F: FollowRepository + ?Sized,
{
    pub users: &'a U,
    pub follows: &'a F,
}

impl<'a, U, F> ListConnections<'a, U, F>
where
    U: UserRepository + ?Sized,
    F: FollowRepository + ?Sized,
{
    pub async fn execute(
        &self,
        user_id: &str,
        direction: Direction,
    ) -> Result<Vec<UserProfile>, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::user_not_found());
        }
        let profiles = match direction {
            Direction::Followers => self.follows.followers_of(user_id).await?,
            Direction::Following => self.follows.following_of(user_id).await?,
        };
        Ok(profiles)
    }
}
