use crate::application::error::AppError;
use crate::application::ports::post_repository::PostRepository;

pub struct DeletePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> DeletePost<'a, R> {
    /// Only the author may delete a post.
    pub async fn execute(&self, id: &str, user_id: &str) -> Result<(), AppError> {
        let post = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or_else(AppError::post_not_found)?;
        if post.author.id != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this post".into(),
            ));
        }
        if !self.repo.delete(id).await? {
            // deleted concurrently
            return Err(AppError::post_not_found());
        }
        Ok(())
    }
}
