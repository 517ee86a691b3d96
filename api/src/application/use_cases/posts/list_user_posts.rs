use crate::application::error::AppError;
use crate::application::pagination::PageRequest;
use crate::application::ports::post_repository::PostRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::posts::post::PostPage;

pub struct ListUserPosts<'a, U, P>
where
    U: UserRepository + ?Sized,
    P: PostRepository + ?Sized,
{
    pub users: &'a U,
    pub posts: &'a P,
}

impl<'a, U, P> ListUserPosts<'a, U, P>
where
    U: UserRepository + ?Sized,
    P: PostRepository + ?Sized,
{
    pub async fn execute(&self, user_id: &str, page: PageRequest) -> Result<PostPage, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::user_not_found());
        }
        Ok(self.posts.list_by_author(user_id, page).await?)
    }
}
