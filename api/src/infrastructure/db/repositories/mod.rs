pub mod follow_repository_sqlx;
pub mod post_repository_sqlx;
pub mod user_repository_sqlx;


use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::domain::posts::post::{Post, PostAuthor};
use crate::domain::users::user::{User, UserProfile};

// Column lists shared by the repositories so row mappers stay in sync.
pub(crate) const USER_COLUMNS: &str =
    "u.id, u.username, u.email, u.display_name, u.bio, u.created_at";

pub(crate) const PROFILE_COUNTS: &str = r#"
    (SELECT COUNT(*) FROM posts p WHERE p.author_id = u.id) AS post_count,
    (SELECT COUNT(*) FROM followers f WHERE f.followed_id = u.id) AS follower_count,
    (SELECT COUNT(*) FROM followers f WHERE f.follower_id = u.id) AS following_count"#;

pub(crate) const POST_COLUMNS: &str =
    "p.id, p.content, p.created_at, u.id AS author_id, u.username, u.display_name";

pub(crate) fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        bio: row.get("bio"),
        created_at: row.get("created_at"),
    }
}

pub(crate) fn profile_from_row(row: &PgRow) -> UserProfile {
    UserProfile {
        user: user_from_row(row),
        post_count: row.get("post_count"),
        follower_count: row.get("follower_count"),
        following_count: row.get("following_count"),
    }
}

pub(crate) fn post_from_row(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        author: PostAuthor {
            id: row.get("author_id"),
            username: row.get("username"),
            display_name: row.get("display_name"),
        },
    }
}
