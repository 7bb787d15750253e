//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every inbound HTTP path and the schemas they return,
//! and registers the bearer token scheme issued by `POST /api/v1/login`.
//! Swagger UI serves the generated document in debug builds.

use crate::domain::{
    EngagementRelation, Error, ErrorCode, MembershipChange, Review, ReviewOutcome, ReviewReceipt,
    UserProfile,
};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest, SessionResponse};
use crate::inbound::http::engagement::{StatusResponse, ToggleRequest, ToggleResponse};
use crate::inbound::http::reviews::ReviewRequest;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let bearer = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some(
                "HS256 token from POST /api/v1/login or /api/v1/accounts.",
            ))
            .build();
        components.add_security_scheme("bearerAuth", SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Cinephile backend API",
        description = "Accounts, reviews, watchlists and likes for the movie catalogue.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_session,
        crate::inbound::http::reviews::submit_review,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::engagement::toggle,
        crate::inbound::http::engagement::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserProfile,
        RegisterRequest,
        LoginRequest,
        SessionResponse,
        ReviewRequest,
        Review,
        ReviewOutcome,
        ReviewReceipt,
        EngagementRelation,
        MembershipChange,
        ToggleRequest,
        ToggleResponse,
        StatusResponse,
    )),
    tags(
        (name = "accounts", description = "Registration, login and the current session"),
        (name = "reviews", description = "Per-user movie reviews and ratings"),
        (name = "engagement", description = "Watchlist and likes"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
