use crate::application::error::AppError;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords;
use crate::application::validation;
use crate::domain::users::user::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    /// `Ok(None)` covers both an unknown username and a wrong password.
    pub async fn execute(&self, req: &LoginRequest) -> Result<Option<User>, AppError> {
        validation::validate_credentials(&req.username, &req.password)?;
        let creds = match self.repo.find_credentials(&req.username).await? {
            Some(c) => c,
            None => return Ok(None),
        };
        if passwords::verify_password(&req.password, &creds.password_hash) {
            Ok(Some(creds.user))
        } else {
            Ok(None)
        }
    }
}
