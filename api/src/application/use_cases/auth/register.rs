use crate::application::error::AppError;
use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::application::services::passwords;
use crate::application::validation;
use crate::domain::users::user::{NewUser, UserProfile, new_user_id};

pub struct Register<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

impl<'a, R: UserRepository + ?Sized> Register<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> Result<UserProfile, AppError> {
        validation::validate_registration(
            &req.username,
            &req.email,
            &req.password,
            req.display_name.as_deref(),
            req.bio.as_deref(),
        )?;

        if self.repo.username_exists(&req.username).await? {
            return Err(username_taken());
        }
        if self.repo.email_exists(&req.email).await? {
            return Err(email_taken());
        }

        let new_user = NewUser {
            id: new_user_id(),
            username: req.username.clone(),
            email: req.email.clone(),
            password_hash: passwords::hash_password(&req.password)?,
            display_name: req.display_name.clone(),
            bio: req.bio.clone(),
        };
        // A concurrent registration can still win the race between the checks and the insert.
        let user = self
            .repo
            .create_user(&new_user)
            .await
            .map_err(|e| match e {
                CreateUserError::UsernameTaken => username_taken(),
                CreateUserError::EmailTaken => email_taken(),
                CreateUserError::Storage(e) => AppError::Internal(e),
            })?;
        tracing::info!(user_id = %user.id, username = %user.username, "user_registered");

        Ok(UserProfile {
            user,
            post_count: 0,
            follower_count: 0,
            following_count: 0,
        })
    }
}

fn username_taken() -> AppError {
    AppError::Conflict("Username already registered".into())
}

fn email_taken() -> AppError {
    AppError::Conflict("Email already registered".into())
}
