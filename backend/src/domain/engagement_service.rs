//! Engagement domain service: toggling and reading relation membership.
//!
//! Watchlist and likes share this single code path; the relation is data.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::identity::{IdentityResolver, ensure_actor};
use crate::domain::ports::{
    CatalogueReader, EngagementCommand, EngagementQuery, EngagementRepository, EngagementToggle,
};
use crate::domain::{EngagementRelation, Error, MembershipChange, MovieId, Username};

/// Service implementing the engagement driving ports.
pub struct EngagementService<C, E> {
    resolver: IdentityResolver<C>,
    engagements: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<C, E> Clone for EngagementService<C, E> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            engagements: Arc::clone(&self.engagements),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C, E> EngagementService<C, E> {
    pub fn new(catalogue: Arc<C>, engagements: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            resolver: IdentityResolver::new(catalogue),
            engagements,
            clock,
        }
    }
}

#[async_trait]
impl<C, E> EngagementCommand for EngagementService<C, E>
where
    C: CatalogueReader,
    E: EngagementRepository,
{
    async fn toggle(&self, request: EngagementToggle) -> Result<MembershipChange, Error> {
        let movie = self.resolver.resolve_movie(&request.movie_slug).await?;
        let user = self.resolver.resolve_user(&request.username).await?;
        ensure_actor(request.actor, user)?;

        let change = self
            .engagements
            .toggle(request.relation, movie.id, user, self.clock.utc())
            .await?;
        info!(
            relation = %request.relation,
            movie_id = %movie.id,
            user_id = %user,
            ?change,
            "engagement toggled"
        );
        Ok(change)
    }
}

#[async_trait]
impl<C, E> EngagementQuery for EngagementService<C, E>
where
    C: CatalogueReader,
    E: EngagementRepository,
{
    async fn status(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        username: &Username,
    ) -> Result<bool, Error> {
        let user = self.resolver.resolve_user(username).await?;
        Ok(self.engagements.contains(relation, movie, user).await?)
    }
}
