use async_trait::async_trait;
use sqlx::Row;

use super::{PROFILE_COUNTS, USER_COLUMNS, profile_from_row};
use crate::application::ports::follow_repository::FollowRepository;
use crate::domain::users::user::UserProfile;
use crate::infrastructure::db::PgPool;

pub struct SqlxFollowRepository {
    pub pool: PgPool,
}

impl SqlxFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn profiles_joined_on(
        &self,
        user_id: &str,
        match_col: &str,
        join_col: &str,
    ) -> anyhow::Result<Vec<UserProfile>> {
        let sql = format!(
            r#"SELECT {USER_COLUMNS}, {PROFILE_COUNTS}
               FROM followers fl
               JOIN users u ON u.id = fl.{join_col}
               WHERE fl.{match_col} = $1
               ORDER BY u.username ASC"#
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(profile_from_row).collect())
    }
}

#[async_trait]
impl FollowRepository for SqlxFollowRepository {
    async fn follow(&self, follower_id: &str, followed_id: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"INSERT INTO followers (follower_id, followed_id) VALUES ($1, $2)
               ON CONFLICT (follower_id, followed_id) DO NOTHING"#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn unfollow(&self, follower_id: &str, followed_id: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM followers WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn followers_of(&self, user_id: &str) -> anyhow::Result<Vec<UserProfile>> {
        self.profiles_joined_on(user_id, "followed_id", "follower_id")
            .await
    }

    async fn following_of(&self, user_id: &str) -> anyhow::Result<Vec<UserProfile>> {
        self.profiles_joined_on(user_id, "follower_id", "followed_id")
            .await
    }

    async fn follower_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query("SELECT follower_id FROM followers WHERE followed_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get("follower_id")).collect())
    }

    async fn following_ids(&self, user_id: &str) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query("SELECT followed_id FROM followers WHERE follower_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.get("followed_id")).collect())
    }
}
