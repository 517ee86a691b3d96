use async_trait::async_trait;
use sqlx::Row;

use super::{PROFILE_COUNTS, USER_COLUMNS, profile_from_row, user_from_row};
use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::domain::users::user::{NewUser, ProfileChanges, User, UserCredentials, UserProfile};
use crate::infrastructure::db::PgPool;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique_violation(err: sqlx::Error) -> CreateUserError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            match db.constraint() {
                Some("users_username_key") => return CreateUserError::UsernameTaken,
                Some("users_email_key") => return CreateUserError::EmailTaken,
                _ => {}
            }
        }
    }
    CreateUserError::Storage(err.into())
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError> {
        let row = sqlx::query(
            r#"INSERT INTO users AS u (id, username, email, password_hash, display_name, bio)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING u.id, u.username, u.email, u.display_name, u.bio, u.created_at"#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(&user.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;
        Ok(user_from_row(&row))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserCredentials>> {
        let sql = format!("SELECT {USER_COLUMNS}, u.password_hash FROM users u WHERE u.username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| UserCredentials {
            user: user_from_row(&r),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn find_profile(&self, id: &str) -> anyhow::Result<Option<UserProfile>> {
        let sql = format!("SELECT {USER_COLUMNS}, {PROFILE_COUNTS} FROM users u WHERE u.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(profile_from_row))
    }

    async fn update_profile(
        &self,
        id: &str,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(
            r#"UPDATE users AS u SET
                   display_name = COALESCE($2, u.display_name),
                   bio = COALESCE($3, u.bio)
               WHERE u.id = $1
               RETURNING u.id, u.username, u.email, u.display_name, u.bio, u.created_at"#,
        )
        .bind(id)
        .bind(&changes.display_name)
        .bind(&changes.bio)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }
}
