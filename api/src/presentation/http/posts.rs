use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::pagination::PageRequest;
use crate::application::use_cases::posts::create_post::CreatePost;
use crate::application::use_cases::posts::delete_post::DeletePost;
use crate::application::use_cases::posts::get_post::GetPost;
use crate::application::use_cases::posts::get_timeline::GetTimeline;
use crate::application::use_cases::posts::list_user_posts::ListUserPosts;
use crate::bootstrap::app_context::AppContext;
use crate::domain::posts::post::{Post, PostAuthor, PostPage};
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::error::ApiError;
use crate::presentation::http::extract::{ApiJson, ApiQuery};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PostCreate {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthorPublic {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostPublic {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorPublic,
}

impl From<PostAuthor> for AuthorPublic {
    fn from(a: PostAuthor) -> Self {
        Self {
            id: a.id,
            username: a.username,
            display_name: a.display_name,
        }
    }
}

impl From<Post> for PostPublic {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            content: p.content,
            created_at: p.created_at,
            author: p.author.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostList {
    pub posts: Vec<PostPublic>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

impl PostList {
    pub fn from_page(page: PostPage, req: PageRequest) -> Self {
        Self {
            posts: page.posts.into_iter().map(PostPublic::from).collect(),
            total: page.total,
            offset: req.offset,
            limit: req.limit,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1..=100, defaults to 20
    pub limit: Option<i64>,
    /// defaults to 0
    pub offset: Option<i64>,
}

impl PageQuery {
    pub fn page(&self) -> Result<PageRequest, ApiError> {
        Ok(PageRequest::new(self.limit, self.offset)?)
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(get_timeline).post(create_post))
        .route("/user/:id", get(list_user_posts))
        .route("/:id", get(get_post).delete(delete_post))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/v1/posts", tag = "Posts", request_body = PostCreate, responses(
    (status = 201, body = PostPublic),
    (status = 401, body = ErrorBody),
    (status = 422, body = ErrorBody)
))]
pub async fn create_post(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
    ApiJson(req): ApiJson<PostCreate>,
) -> Result<(StatusCode, Json<PostPublic>), ApiError> {
    let repo = ctx.post_repo();
    let uc = CreatePost {
        repo: repo.as_ref(),
    };
    let post = uc.execute(&me.id, &req.content).await?;
    Ok((StatusCode::CREATED, Json(post.into())))
}

#[utoipa::path(get, path = "/v1/posts", tag = "Posts", params(PageQuery), responses(
    (status = 200, body = PostList),
    (status = 401, body = ErrorBody),
    (status = 422, body = ErrorBody)
))]
pub async fn get_timeline(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<PostList>, ApiError> {
    let page = q.page()?;
    let repo = ctx.post_repo();
    let uc = GetTimeline {
        repo: repo.as_ref(),
    };
    let posts = uc.execute(&me.id, page).await?;
    Ok(Json(PostList::from_page(posts, page)))
}

#[utoipa::path(get, path = "/v1/posts/{id}", tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, body = PostPublic),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_post(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<PostPublic>, ApiError> {
    let repo = ctx.post_repo();
    let uc = GetPost {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(&id).await?.into()))
}

#[utoipa::path(delete, path = "/v1/posts/{id}", tag = "Posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204),
        (status = 403, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_post(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = ctx.post_repo();
    let uc = DeletePost {
        repo: repo.as_ref(),
    };
    uc.execute(&id, &me.id).await?;
    tracing::info!(post_id = %id, user_id = %me.id, "post_deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/v1/posts/user/{id}", tag = "Posts",
    params(("id" = String, Path, description = "Author id"), PageQuery),
    responses(
        (status = 200, body = PostList),
        (status = 404, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn list_user_posts(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<PostList>, ApiError> {
    let page = q.page()?;
    let users = ctx.user_repo();
    let posts = ctx.post_repo();
    let uc = ListUserPosts {
        users: users.as_ref(),
        posts: posts.as_ref(),
    };
    let result = uc.execute(&id, page).await?;
    Ok(Json(PostList::from_page(result, page)))
}
