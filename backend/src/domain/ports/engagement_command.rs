//! Driving ports for toggling and reading watchlist and likes membership.

use async_trait::async_trait;

use crate::domain::{EngagementRelation, Error, MembershipChange, MovieId, UserId, Username};

/// Request to flip a movie in or out of a user's relation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementToggle {
    pub relation: EngagementRelation,
    /// Title slug as it appears in the URL.
    pub movie_slug: String,
    pub username: Username,
    /// Signed-in user making the request.
    pub actor: UserId,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementCommand: Send + Sync {
    /// Toggle membership and report the resulting state.
    ///
    /// # Errors
    ///
    /// - `not_found` / `movie_not_found` or `user_not_found`.
    /// - `forbidden` when `actor` is not the named user.
    async fn toggle(&self, request: EngagementToggle) -> Result<MembershipChange, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementQuery: Send + Sync {
    /// Whether `movie` is in `username`'s relation set.
    ///
    /// # Errors
    ///
    /// `not_found` / `user_not_found` when the username does not resolve;
    /// this is never reported as `false`.
    async fn status(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        username: &Username,
    ) -> Result<bool, Error>;
}
