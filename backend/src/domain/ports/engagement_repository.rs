//! Driven port for the watchlist and likes membership sets.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EngagementRelation, MembershipChange, MovieId, UserId};

use super::{define_port_error, map_storage_error_to_domain};

define_port_error! {
    /// Errors raised by engagement repository adapters.
    pub enum EngagementRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "engagement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "engagement repository query failed: {message}",
    }
}

map_storage_error_to_domain!(EngagementRepositoryError);

/// Storage for `(movie, user)` membership in an [`EngagementRelation`].
///
/// Both relations share this one contract; adapters pick the backing table
/// from the relation argument.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Remove the pair if present, otherwise insert it stamped `added_at`.
    ///
    /// The existence check and the write must be one atomic step so
    /// concurrent toggles of the same pair never leave duplicates.
    async fn toggle(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        user: UserId,
        added_at: DateTime<Utc>,
    ) -> Result<MembershipChange, EngagementRepositoryError>;

    /// Whether the pair is currently present.
    async fn contains(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        user: UserId,
    ) -> Result<bool, EngagementRepositoryError>;
}

/// Fixture repository whose sets are always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEngagementRepository;

#[async_trait]
impl EngagementRepository for FixtureEngagementRepository {
    async fn toggle(
        &self,
        _relation: EngagementRelation,
        _movie: MovieId,
        _user: UserId,
        _added_at: DateTime<Utc>,
    ) -> Result<MembershipChange, EngagementRepositoryError> {
        Ok(MembershipChange::Added)
    }

    async fn contains(
        &self,
        _relation: EngagementRelation,
        _movie: MovieId,
        _user: UserId,
    ) -> Result<bool, EngagementRepositoryError> {
        Ok(false)
    }
}
