use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::error::AppError;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 255;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 100;
pub const DISPLAY_NAME_MAX: usize = 100;
pub const BIO_MAX: usize = 250;
pub const POST_CONTENT_MAX: usize = 280;

/// Collects every problem found in one payload so the client sees them all at once.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            self.0.push(format!(
                "{field}: should have at least {min} character{}",
                if min == 1 { "" } else { "s" }
            ));
        } else if len > max {
            self.0
                .push(format!("{field}: should have at most {max} characters"));
        }
        self
    }

    pub fn optional_length(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(v) = value {
            self.length(field, v, 0, max);
        }
        self
    }

    pub fn pattern(&mut self, field: &str, value: &str, re: &Regex, expected: &str) -> &mut Self {
        if !value.is_empty() && !re.is_match(value) {
            self.0.push(format!("{field}: {expected}"));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.0).join("; ")))
        }
    }
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    display_name: Option<&str>,
    bio: Option<&str>,
) -> Result<(), AppError> {
    Violations::default()
        .length("username", username, USERNAME_MIN, USERNAME_MAX)
        .pattern(
            "username",
            username,
            &USERNAME_RE,
            "may only contain letters, digits, underscores and hyphens",
        )
        .length("email", email, 1, EMAIL_MAX)
        .pattern("email", email, &EMAIL_RE, "is not a valid email address")
        .length("password", password, PASSWORD_MIN, PASSWORD_MAX)
        .optional_length("display_name", display_name, DISPLAY_NAME_MAX)
        .optional_length("bio", bio, BIO_MAX)
        .finish()
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    Violations::default()
        .length("username", username, 1, usize::MAX)
        .length("password", password, 1, usize::MAX)
        .finish()
}

pub fn validate_profile_update(
    display_name: Option<&str>,
    bio: Option<&str>,
) -> Result<(), AppError> {
    Violations::default()
        .optional_length("display_name", display_name, DISPLAY_NAME_MAX)
        .optional_length("bio", bio, BIO_MAX)
        .finish()
}

pub fn validate_post_content(content: &str) -> Result<(), AppError> {
    Violations::default()
        .length("content", content, 1, POST_CONTENT_MAX)
        .finish()
}
