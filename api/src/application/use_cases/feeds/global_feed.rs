use crate::application::error::AppError;
use crate::application::pagination::PageRequest;
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::PostPage;

pub struct GlobalFeed<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> GlobalFeed<'a, R> {
    pub async fn execute(&self, page: PageRequest) -> Result<PostPage, AppError> {
        Ok(self.repo.list_all(page).await?)
    }
}
