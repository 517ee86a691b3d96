use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::{auth, error, feeds, health, posts, users};

#[derive(OpenApi)]
#[openapi(
        info(title = "Microblog API", description = "Users, posts, follows and feeds"),
        paths(
            auth::register,
            auth::login,
            users::get_me,
            users::update_me,
            users::get_user,
            users::follow_user,
            users::unfollow_user,
            users::list_followers,
            users::list_following,
            posts::create_post,
            posts::get_timeline,
            posts::get_post,
            posts::delete_post,
            posts::list_user_posts,
            feeds::global_feed,
            feeds::for_you_feed,
            health::root,
            health::health,
            health::metrics,
        ),
        components(schemas(
            auth::UserCreate,
            auth::TokenRequest,
            auth::TokenResponse,
            users::UserPublic,
            users::UserUpdate,
            posts::PostCreate,
            posts::PostPublic,
            posts::AuthorPublic,
            posts::PostList,
            feeds::RankedPost,
            feeds::RankedPostList,
            health::RootResp,
            health::HealthResp,
            health::HealthChecks,
            health::DatabaseCheck,
            health::MetricsResp,
            error::ErrorBody,
        )),
        modifiers(&BearerAuth),
        security(("bearerAuth" = [])),
        tags(
            (name = "Auth", description = "Registration and tokens"),
            (name = "Users", description = "Profiles and the follow graph"),
            (name = "Posts", description = "Posts and the timeline"),
            (name = "Feeds", description = "Global and ranked feeds"),
            (name = "Health", description = "System health checks")
        )
    )]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
