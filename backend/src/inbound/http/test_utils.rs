//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockEngagementCommand, MockEngagementQuery,
    MockReviewCommand, MockReviewQuery,
};
use crate::domain::{SessionToken, SigningSecret, TokenService, UserId};
use crate::test_support::MutableClock;

use super::state::HttpState;

/// Signing secret shared by every handler test.
pub const TOKEN_SECRET: &[u8] = b"http-handler-test-secret-0000001";

/// Clock frozen at 2026-01-10T12:00:00Z.
pub fn fixed_clock() -> Arc<dyn Clock> {
    let now = Utc
        .with_ymd_and_hms(2026, 1, 10, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(MutableClock::new(now))
}

pub fn token_service() -> TokenService {
    TokenService::new(&SigningSecret::new(TOKEN_SECRET.to_vec()), fixed_clock())
}

/// Mint a token the test state will accept for user `id`.
pub fn token_for(id: i32) -> SessionToken {
    token_service()
        .mint(UserId::new(id).expect("positive id"))
        .expect("mint token")
}

/// `Authorization` header value for user `id`.
pub fn bearer_for(id: i32) -> String {
    format!("Bearer {}", token_for(id).as_str())
}

/// Mocked driving ports; configure expectations before building state.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub accounts_query: MockAccountQuery,
    pub reviews: MockReviewCommand,
    pub reviews_query: MockReviewQuery,
    pub engagement: MockEngagementCommand,
    pub engagement_query: MockEngagementQuery,
}

/// Build an [`HttpState`] from mocks, verifying tokens with
/// [`TOKEN_SECRET`].
pub fn state_with(configure: impl FnOnce(&mut MockPorts)) -> HttpState {
    let mut ports = MockPorts::default();
    configure(&mut ports);
    HttpState {
        accounts: Arc::new(ports.accounts),
        accounts_query: Arc::new(ports.accounts_query),
        sessions: Arc::new(token_service()),
        reviews: Arc::new(ports.reviews),
        reviews_query: Arc::new(ports.reviews_query),
        engagement: Arc::new(ports.engagement),
        engagement_query: Arc::new(ports.engagement_query),
    }
}
