use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::pagination::PageRequest;
use crate::application::use_cases::feeds::for_you_feed::ForYouFeed;
use crate::application::use_cases::feeds::global_feed::GlobalFeed;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::error::ApiError;
use crate::presentation::http::extract::ApiQuery;
use crate::presentation::http::posts::{PageQuery, PostList, PostPublic};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForYouQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Drop posts scoring below this value, in `[0, 1]`.
    pub min_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RankedPost {
    pub post: PostPublic,
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RankedPostList {
    pub posts: Vec<RankedPost>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/global", get(global_feed))
        .route("/for-you", get(for_you_feed))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/v1/feeds/global", tag = "Feeds", params(PageQuery), responses(
    (status = 200, body = PostList),
    (status = 422, body = ErrorBody)
))]
pub async fn global_feed(
    State(ctx): State<AppContext>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<PostList>, ApiError> {
    let page = q.page()?;
    let repo = ctx.post_repo();
    let uc = GlobalFeed {
        repo: repo.as_ref(),
    };
    let posts = uc.execute(page).await?;
    Ok(Json(PostList::from_page(posts, page)))
}

#[utoipa::path(get, path = "/v1/feeds/for-you", tag = "Feeds", params(ForYouQuery), responses(
    (status = 200, body = RankedPostList),
    (status = 401, body = ErrorBody),
    (status = 422, body = ErrorBody)
))]
pub async fn for_you_feed(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
    ApiQuery(q): ApiQuery<ForYouQuery>,
) -> Result<Json<RankedPostList>, ApiError> {
    let page = PageRequest::new(q.limit, q.offset)?;
    let posts = ctx.post_repo();
    let follows = ctx.follow_repo();
    let uc = ForYouFeed {
        posts: posts.as_ref(),
        follows: follows.as_ref(),
        weights: ctx.ranking_weights(),
    };
    let ranked = uc
        .execute(&me.id, page, q.min_score.unwrap_or(0.0), chrono::Utc::now())
        .await?;
    Ok(Json(RankedPostList {
        posts: ranked
            .posts
            .into_iter()
            .map(|s| RankedPost {
                post: s.post.into(),
                score: s.score,
            })
            .collect(),
        total: ranked.total,
        offset: page.offset,
        limit: page.limit,
    }))
}
