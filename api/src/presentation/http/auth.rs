use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::{Json, Router, routing::post};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::error::AppError;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::register::{
    Register as RegisterUc, RegisterRequest as RegisterDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::users::user::User;
use crate::presentation::http::error::ApiError;
use crate::presentation::http::extract::ApiJson;
use crate::presentation::http::users::UserPublic;

const INVALID_CREDENTIALS: &str = "Could not validate credentials";
const BAD_LOGIN: &str = "Incorrect username or password";

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, alias = "displayName")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the token in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(login))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/v1/auth/register", tag = "Auth", request_body = UserCreate, responses(
    (status = 201, body = UserPublic),
    (status = 409, body = ErrorBody),
    (status = 422, body = ErrorBody)
))]
pub async fn register(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<UserCreate>,
) -> Result<(StatusCode, Json<UserPublic>), ApiError> {
    let repo = ctx.user_repo();
    let uc = RegisterUc {
        repo: repo.as_ref(),
    };
    let dto = RegisterDto {
        username: req.username,
        email: req.email,
        password: req.password,
        display_name: req.display_name,
        bio: req.bio,
    };
    let profile = uc.execute(&dto).await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

#[utoipa::path(post, path = "/v1/auth/token", tag = "Auth", request_body = TokenRequest, responses(
    (status = 200, body = TokenResponse),
    (status = 401, body = ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        username: req.username,
        password: req.password,
    };
    let user = uc.execute(&dto).await?.ok_or_else(|| {
        tracing::info!(username = %dto.username, "login_failed");
        ApiError::unauthorized(BAD_LOGIN)
    })?;
    let access_token = issue_token(&ctx.cfg, &user)?;
    tracing::info!(user_id = %user.id, "login_succeeded");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
        expires_in: ctx.cfg.token_ttl_secs(),
    }))
}

// --- JWT utils & bearer extractor ---

pub fn issue_token(cfg: &Config, user: &User) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        exp: (now + cfg.token_ttl_secs()) as usize,
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(cfg.secret_key.as_bytes()),
    )
    .map_err(|e| AppError::Internal(e.into()))
}

pub fn decode_token(cfg: &Config, token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "sub"]);
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.secret_key.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// The authenticated caller, resolved from `Authorization: Bearer <jwt>`.
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let token =
            bearer_token(&parts.headers).ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;
        let claims = decode_token(&ctx.cfg, token)
            .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;
        // A valid token for a deleted account is still rejected.
        let user = ctx
            .user_repo()
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cfg() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    fn user() -> User {
        User {
            id: "user_1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            display_name: None,
            bio: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn issued_token_decodes() {
        let cfg = cfg();
        let token = issue_token(&cfg, &user()).unwrap();
        let claims = decode_token(&cfg, &token).unwrap();
        assert_eq!(claims.sub, "user_1");
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let cfg = cfg();
        let other = Config::from_lookup(|k| {
            (k == "SECRET_KEY").then(|| "another-secret-that-is-at-least-32-chars".to_string())
        })
        .unwrap();
        let token = issue_token(&other, &user()).unwrap();
        assert!(decode_token(&cfg, &token).is_none());

        let expired = Claims {
            sub: "user_1".into(),
            username: "alice".into(),
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &expired,
            &EncodingKey::from_secret(cfg.secret_key.as_bytes()),
        )
        .unwrap();
        assert!(decode_token(&cfg, &token).is_none());
        assert!(decode_token(&cfg, "not-a-jwt").is_none());
    }

    #[test]
    fn parses_bearer_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
