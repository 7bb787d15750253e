//! Review API handlers.
//!
//! ```text
//! POST /api/v1/movies/{slug}/reviews {"username":"alice","stars":4,"body":"..."}
//! GET  /api/v1/movies/{slug}/reviews
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::ReviewSubmission;
use crate::domain::{Error, Review, ReviewReceipt, StarRating, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Review body for `POST /api/v1/movies/{slug}/reviews`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[schema(example = "alice")]
    pub username: String,
    /// Whole stars from 1 to 5.
    #[schema(example = 4)]
    pub stars: i64,
    #[schema(example = "Still holds up.")]
    pub body: String,
}

fn invalid_field(field: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": "invalid_field" }))
}

/// Create or overwrite the caller's review of a movie.
#[utoipa::path(
    post,
    path = "/api/v1/movies/{slug}/reviews",
    params(("slug" = String, Path, description = "Title with spaces written as hyphens")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review stored; includes the refreshed average", body = ReviewReceipt),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Username is not the signed-in user", body = Error),
        (status = 404, description = "Unknown movie or user", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "submitReview",
    security(("bearerAuth" = []))
)]
#[post("/movies/{slug}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    slug: web::Path<String>,
    payload: web::Json<ReviewRequest>,
) -> ApiResult<web::Json<ReviewReceipt>> {
    let ReviewRequest {
        username,
        stars,
        body,
    } = payload.into_inner();
    let username =
        Username::new(&username).map_err(|err| invalid_field("username", err.to_string()))?;
    let stars = StarRating::new(stars).map_err(|err| invalid_field("stars", err.to_string()))?;

    let receipt = state
        .reviews
        .submit(ReviewSubmission {
            movie_slug: slug.into_inner(),
            username,
            actor: user.id(),
            stars,
            body,
        })
        .await?;
    Ok(web::Json(receipt))
}

/// Reviews of a movie, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/movies/{slug}/reviews",
    params(("slug" = String, Path, description = "Title with spaces written as hyphens")),
    responses(
        (status = 200, description = "Reviews", body = [Review]),
        (status = 404, description = "Unknown movie, or no reviews yet (details.code = no_reviews)", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/movies/{slug}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
) -> ApiResult<web::Json<Vec<Review>>> {
    let reviews = state.reviews_query.list(&slug).await?;
    Ok(web::Json(reviews))
}
