//! Account API handlers.
//!
//! ```text
//! POST /api/v1/accounts {"username":"alice","password":"pw","email":"a@example.com"}
//! POST /api/v1/login    {"username":"alice","password":"pw"}
//! GET  /api/v1/session  Authorization: Bearer <token>
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::SessionGrant;
use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, RegistrationDetails, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/accounts`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Token and account returned after registering or logging in.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub account: UserProfile,
    /// HS256 bearer token valid for 24 hours.
    pub token: String,
}

impl From<SessionGrant> for SessionResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            account: grant.account,
            token: grant.token.as_str().to_owned(),
        }
    }
}

fn map_validation_error(err: &CredentialsValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": "invalid_field" }))
}

/// Register an account and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username already taken", body = Error),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/accounts")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        password,
        email,
    } = payload.into_inner();
    let details = RegistrationDetails::try_from_parts(&username, &password, &email)
        .map_err(|err| map_validation_error(&err))?;
    let grant = state.accounts.register(&details).await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(grant)))
}

/// Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Password mismatch", body = Error),
        (status = 404, description = "Unknown username", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password)
        .map_err(|err| map_validation_error(&err))?;
    let grant = state.accounts.login(&credentials).await?;
    Ok(web::Json(grant.into()))
}

/// Profile of the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current account", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentSession",
    security(("bearerAuth" = []))
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.accounts_query.current_account(user.id()).await?;
    Ok(web::Json(profile))
}
