//! Builders wiring domain services onto database or fixture adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use cinephile::domain::ports::{
    AccountCommand, AccountQuery, CatalogueReader, EngagementCommand, EngagementQuery,
    EngagementRepository, FixtureCatalogueReader, FixtureEngagementRepository,
    FixtureHealthProbe, FixtureReviewRepository, FixtureUserRepository, HealthProbe,
    ReviewCommand, ReviewQuery, ReviewRepository, UserRepository,
};
use cinephile::domain::{
    AccountService, Argon2PasswordHasher, EngagementService, PasswordHashError, ReviewService,
    TokenService,
};
use cinephile::inbound::http::state::HttpState;
use cinephile::outbound::persistence::{
    DieselCatalogueReader, DieselEngagementRepository, DieselHealthProbe, DieselReviewRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Driven adapters the domain services run on.
struct DrivenPorts<C, U, R, E> {
    catalogue: Arc<C>,
    users: Arc<U>,
    reviews: Arc<R>,
    engagements: Arc<E>,
}

fn wire_services<C, U, R, E>(
    ports: DrivenPorts<C, U, R, E>,
    hasher: Arc<Argon2PasswordHasher>,
    tokens: TokenService,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    C: CatalogueReader + 'static,
    U: UserRepository + 'static,
    R: ReviewRepository + 'static,
    E: EngagementRepository + 'static,
{
    let DrivenPorts {
        catalogue,
        users,
        reviews,
        engagements,
    } = ports;

    let accounts = Arc::new(AccountService::new(users, hasher, tokens.clone()));
    let review_service = Arc::new(ReviewService::new(
        Arc::clone(&catalogue),
        reviews,
        Arc::clone(&clock),
    ));
    let engagement_service = Arc::new(EngagementService::new(catalogue, engagements, clock));

    HttpState {
        accounts: accounts.clone() as Arc<dyn AccountCommand>,
        accounts_query: accounts as Arc<dyn AccountQuery>,
        sessions: Arc::new(tokens),
        reviews: review_service.clone() as Arc<dyn ReviewCommand>,
        reviews_query: review_service as Arc<dyn ReviewQuery>,
        engagement: engagement_service.clone() as Arc<dyn EngagementCommand>,
        engagement_query: engagement_service as Arc<dyn EngagementQuery>,
    }
}

/// Build the HTTP state, using Diesel adapters when a pool is configured and
/// fixtures otherwise.
///
/// # Errors
///
/// Returns [`PasswordHashError`] when the configured Argon2 cost is rejected.
pub(super) fn build_http_state(config: &ServerConfig) -> Result<HttpState, PasswordHashError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher::new(config.password)?);
    let tokens = TokenService::new(&config.signing_secret, Arc::clone(&clock));

    let state = match &config.db_pool {
        Some(pool) => wire_services(
            DrivenPorts {
                catalogue: Arc::new(DieselCatalogueReader::new(pool.clone())),
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
                engagements: Arc::new(DieselEngagementRepository::new(pool.clone())),
            },
            hasher,
            tokens,
            clock,
        ),
        None => wire_services(
            DrivenPorts {
                catalogue: Arc::new(FixtureCatalogueReader),
                users: Arc::new(FixtureUserRepository),
                reviews: Arc::new(FixtureReviewRepository),
                engagements: Arc::new(FixtureEngagementRepository),
            },
            hasher,
            tokens,
            clock,
        ),
    };
    Ok(state)
}

/// Probe backing the readiness endpoint.
pub(super) fn build_health_probe(config: &ServerConfig) -> Arc<dyn HealthProbe> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselHealthProbe::new(pool.clone())),
        None => Arc::new(FixtureHealthProbe),
    }
}
