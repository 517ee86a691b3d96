use crate::application::error::AppError;
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::Post;

pub struct GetPost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> GetPost<'a, R> {
    pub async fn execute(&self, id: &str) -> Result<Post, AppError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(AppError::post_not_found)
    }
}
