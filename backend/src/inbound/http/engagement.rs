//! Watchlist and likes API handlers.
//!
//! ```text
//! POST /api/v1/movies/{slug}/{relation}/toggle {"username":"alice"}
//! GET  /api/v1/movies/{movie_id}/{relation}/status?username=alice
//! ```
//!
//! `{relation}` is `watchlist` or `liked`; both share the same handlers.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::EngagementToggle;
use crate::domain::{EngagementRelation, Error, MembershipChange, MovieId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Body for the toggle endpoint.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    #[schema(example = "alice")]
    pub username: String,
}

/// Query string for the status endpoint.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub relation: EngagementRelation,
    pub change: MembershipChange,
    /// Whether the movie is in the set after the toggle.
    pub member: bool,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub relation: EngagementRelation,
    pub movie_id: i32,
    pub member: bool,
}

fn invalid_field(field: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": "invalid_field" }))
}

fn parse_relation(raw: &str) -> Result<EngagementRelation, Error> {
    raw.parse()
        .map_err(|err: crate::domain::UnknownRelation| invalid_field("relation", err.to_string()))
}

fn parse_username(raw: &str) -> Result<Username, Error> {
    Username::new(raw).map_err(|err| invalid_field("username", err.to_string()))
}

/// Flip a movie in or out of the caller's watchlist or likes.
#[utoipa::path(
    post,
    path = "/api/v1/movies/{slug}/{relation}/toggle",
    params(
        ("slug" = String, Path, description = "Title with spaces written as hyphens"),
        ("relation" = String, Path, description = "`watchlist` or `liked`")
    ),
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "Membership after the toggle", body = ToggleResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Username is not the signed-in user", body = Error),
        (status = 404, description = "Unknown movie or user", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "toggleEngagement",
    security(("bearerAuth" = []))
)]
#[post("/movies/{slug}/{relation}/toggle")]
pub async fn toggle(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<ToggleRequest>,
) -> ApiResult<web::Json<ToggleResponse>> {
    let (movie_slug, relation) = path.into_inner();
    let relation = parse_relation(&relation)?;
    let username = parse_username(&payload.username)?;

    let change = state
        .engagement
        .toggle(EngagementToggle {
            relation,
            movie_slug,
            username,
            actor: user.id(),
        })
        .await?;
    Ok(web::Json(ToggleResponse {
        relation,
        change,
        member: change.is_member(),
    }))
}

/// Whether a movie is in a user's watchlist or likes.
#[utoipa::path(
    get,
    path = "/api/v1/movies/{movie_id}/{relation}/status",
    params(
        ("movie_id" = i32, Path, description = "Movie identifier"),
        ("relation" = String, Path, description = "`watchlist` or `liked`"),
        StatusQuery
    ),
    responses(
        (status = 200, description = "Membership state", body = StatusResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Unknown user (never reported as false)", body = Error)
    ),
    tags = ["engagement"],
    operation_id = "engagementStatus",
    security([])
)]
#[get("/movies/{movie_id}/{relation}/status")]
pub async fn status(
    state: web::Data<HttpState>,
    path: web::Path<(i32, String)>,
    query: web::Query<StatusQuery>,
) -> ApiResult<web::Json<StatusResponse>> {
    let (movie_id, relation) = path.into_inner();
    let relation = parse_relation(&relation)?;
    let username = parse_username(&query.username)?;

    let member = state
        .engagement_query
        .status(relation, MovieId::new(movie_id), &username)
        .await?;
    Ok(web::Json(StatusResponse {
        relation,
        movie_id,
        member,
    }))
}
