use crate::application::error::AppError;
use crate::application::pagination::PageRequest;
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::PostPage;

pub struct GetTimeline<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> GetTimeline<'a, R> {
    pub async fn execute(&self, user_id: &str, page: PageRequest) -> Result<PostPage, AppError> {
        Ok(self.repo.timeline_for(user_id, page).await?)
    }
}
