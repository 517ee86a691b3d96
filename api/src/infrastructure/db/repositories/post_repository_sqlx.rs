use async_trait::async_trait;

use super::{POST_COLUMNS, post_from_row};
use crate::application::pagination::PageRequest;
use crate::application::ports::post_repository::PostRepository;
use crate::domain::posts::post::{NewPost, Post, PostPage};
use crate::infrastructure::db::PgPool;

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // `filter` is a trusted WHERE fragment whose only bind is the optional $1.
    async fn page_where(
        &self,
        filter: &str,
        arg: Option<&str>,
        page: PageRequest,
    ) -> anyhow::Result<PostPage> {
        let (limit_at, offset_at) = if arg.is_some() { (2, 3) } else { (1, 2) };
        let count_sql = format!("SELECT COUNT(*) FROM posts p WHERE {filter}");
        let list_sql = format!(
            r#"SELECT {POST_COLUMNS}
               FROM posts p
               JOIN users u ON u.id = p.author_id
               WHERE {filter}
               ORDER BY p.created_at DESC, p.id DESC
               LIMIT ${limit_at} OFFSET ${offset_at}"#
        );

        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut list = sqlx::query(&list_sql);
        if let Some(arg) = arg {
            count = count.bind(arg);
            list = list.bind(arg);
        }
        let total = count.fetch_one(&self.pool).await?;
        let rows = list
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(PostPage {
            posts: rows.iter().map(post_from_row).collect(),
            total,
        })
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &NewPost) -> anyhow::Result<Post> {
        let sql = format!(
            r#"WITH p AS (
                   INSERT INTO posts (id, content, author_id) VALUES ($1, $2, $3)
                   RETURNING id, content, created_at, author_id
               )
               SELECT {POST_COLUMNS} FROM p JOIN users u ON u.id = p.author_id"#
        );
        let row = sqlx::query(&sql)
            .bind(&post.id)
            .bind(&post.content)
            .bind(&post.author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(post_from_row(&row))
    }

    async fn get_by_id(&self, id: &str) -> anyhow::Result<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.author_id WHERE p.id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(post_from_row))
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_by_author(
        &self,
        author_id: &str,
        page: PageRequest,
    ) -> anyhow::Result<PostPage> {
        self.page_where("p.author_id = $1", Some(author_id), page)
            .await
    }

    async fn timeline_for(&self, user_id: &str, page: PageRequest) -> anyhow::Result<PostPage> {
        self.page_where(
            "p.author_id = $1 OR p.author_id IN (SELECT followed_id FROM followers WHERE follower_id = $1)",
            Some(user_id),
            page,
        )
        .await
    }

    async fn list_all(&self, page: PageRequest) -> anyhow::Result<PostPage> {
        self.page_where("TRUE", None, page).await
    }

    async fn recent(&self, limit: i64) -> anyhow::Result<Vec<Post>> {
        let sql = format!(
            r#"SELECT {POST_COLUMNS}
               FROM posts p
               JOIN users u ON u.id = p.author_id
               ORDER BY p.created_at DESC, p.id DESC
               LIMIT $1"#
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(post_from_row).collect())
    }
}
