use crate::application::error::AppError;
use crate::application::ports::post_repository::PostRepository;
use crate::application::validation;
use crate::domain::posts::post::{NewPost, Post, new_post_id};

pub struct CreatePost<'a, R: PostRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PostRepository + ?Sized> CreatePost<'a, R> {
    pub async fn execute(&self, author_id: &str, content: &str) -> Result<Post, AppError> {
        validation::validate_post_content(content)?;
        let post = self
            .repo
            .create(&NewPost {
                id: new_post_id(),
                author_id: author_id.to_string(),
                content: content.to_string(),
            })
            .await?;
        tracing::debug!(post_id = %post.id, author_id, "post_created");
        Ok(post)
    }
}
