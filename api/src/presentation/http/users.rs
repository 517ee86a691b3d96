use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::users::follow_user::FollowUser;
use crate::application::use_cases::users::get_profile::GetProfile;
use crate::application::use_cases::users::list_connections::{Direction, ListConnections};
use crate::application::use_cases::users::unfollow_user::UnfollowUser;
use crate::application::use_cases::users::update_profile::UpdateProfile;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::{ProfileChanges, UserProfile};
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::error::ApiError;
use crate::presentation::http::extract::ApiJson;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserPublic {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub join_date: DateTime<Utc>,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

impl From<UserProfile> for UserPublic {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.user.id,
            username: p.user.username,
            email: p.user.email,
            display_name: p.user.display_name,
            bio: p.user.bio,
            join_date: p.user.created_at,
            post_count: p.post_count,
            follower_count: p.follower_count,
            following_count: p.following_count,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserUpdate {
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route(
            "/me/following/:id",
            post(follow_user).delete(unfollow_user),
        )
        .route("/:id", get(get_user))
        .route("/:id/followers", get(list_followers))
        .route("/:id/following", get(list_following))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/v1/users/me", tag = "Users", responses(
    (status = 200, body = UserPublic),
    (status = 401, body = ErrorBody)
))]
pub async fn get_me(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
) -> Result<Json<UserPublic>, ApiError> {
    let repo = ctx.user_repo();
    let uc = GetProfile {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(&me.id).await?.into()))
}

#[utoipa::path(put, path = "/v1/users/me", tag = "Users", request_body = UserUpdate, responses(
    (status = 200, body = UserPublic),
    (status = 401, body = ErrorBody),
    (status = 422, body = ErrorBody)
))]
pub async fn update_me(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
    ApiJson(req): ApiJson<UserUpdate>,
) -> Result<Json<UserPublic>, ApiError> {
    let repo = ctx.user_repo();
    let uc = UpdateProfile {
        repo: repo.as_ref(),
    };
    let changes = ProfileChanges {
        display_name: req.display_name,
        bio: req.bio,
    };
    Ok(Json(uc.execute(&me.id, &changes).await?.into()))
}

#[utoipa::path(get, path = "/v1/users/{id}", tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, body = UserPublic),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_user(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<UserPublic>, ApiError> {
    let repo = ctx.user_repo();
    let uc = GetProfile {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(&id).await?.into()))
}

#[utoipa::path(post, path = "/v1/users/me/following/{id}", tag = "Users",
    params(("id" = String, Path, description = "User to follow")),
    responses(
        (status = 204),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn follow_user(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let users = ctx.user_repo();
    let follows = ctx.follow_repo();
    let uc = FollowUser {
        users: users.as_ref(),
        follows: follows.as_ref(),
    };
    uc.execute(&me.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(delete, path = "/v1/users/me/following/{id}", tag = "Users",
    params(("id" = String, Path, description = "User to unfollow")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn unfollow_user(
    State(ctx): State<AppContext>,
    CurrentUser(me): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let users = ctx.user_repo();
    let follows = ctx.follow_repo();
    let uc = UnfollowUser {
        users: users.as_ref(),
        follows: follows.as_ref(),
    };
    uc.execute(&me.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn connections(
    ctx: &AppContext,
    id: &str,
    direction: Direction,
) -> Result<Json<Vec<UserPublic>>, ApiError> {
    let users = ctx.user_repo();
    let follows = ctx.follow_repo();
    let uc = ListConnections {
        users: users.as_ref(),
        follows: follows.as_ref(),
    };
    let profiles = uc.execute(id, direction).await?;
    Ok(Json(profiles.into_iter().map(UserPublic::from).collect()))
}

#[utoipa::path(get, path = "/v1/users/{id}/followers", tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, body = [UserPublic]),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn list_followers(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<UserPublic>>, ApiError> {
    connections(&ctx, &id, Direction::Followers).await
}

#[utoipa::path(get, path = "/v1/users/{id}/following", tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, body = [UserPublic]),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn list_following(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<UserPublic>>, ApiError> {
    connections(&ctx, &id, Direction::Following).await
}
