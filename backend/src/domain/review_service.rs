//! Review domain service: authored upserts and per-movie listings.
//!
//! Submissions resolve the movie before the author, so an unknown title is
//! reported even when the username is also unknown. The write itself, the
//! authorship link and the refreshed average all happen inside one
//! [`ReviewRepository::upsert_authored`] call.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::identity::{IdentityResolver, ensure_actor};
use crate::domain::ports::{
    CatalogueReader, ReviewCommand, ReviewQuery, ReviewRepository, ReviewSubmission,
};
use crate::domain::{Error, Review, ReviewDraft, ReviewReceipt};

/// Service implementing the review driving ports.
pub struct ReviewService<C, R> {
    resolver: IdentityResolver<C>,
    reviews: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<C, R> Clone for ReviewService<C, R> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            reviews: Arc::clone(&self.reviews),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C, R> ReviewService<C, R> {
    pub fn new(catalogue: Arc<C>, reviews: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            resolver: IdentityResolver::new(catalogue),
            reviews,
            clock,
        }
    }
}

#[async_trait]
impl<C, R> ReviewCommand for ReviewService<C, R>
where
    C: CatalogueReader,
    R: ReviewRepository,
{
    async fn submit(&self, submission: ReviewSubmission) -> Result<ReviewReceipt, Error> {
        let movie = self.resolver.resolve_movie(&submission.movie_slug).await?;
        let author = self.resolver.resolve_user(&submission.username).await?;
        ensure_actor(submission.actor, author)?;

        let draft = ReviewDraft {
            stars: submission.stars,
            body: submission.body,
            posted_on: self.clock.utc().date_naive(),
        };
        let receipt = self
            .reviews
            .upsert_authored(movie.id, author, &draft)
            .await?;
        info!(
            movie_id = %movie.id,
            user_id = %author,
            review_id = %receipt.review_id,
            outcome = ?receipt.outcome,
            "review stored"
        );
        Ok(receipt)
    }
}

#[async_trait]
impl<C, R> ReviewQuery for ReviewService<C, R>
where
    C: CatalogueReader,
    R: ReviewRepository,
{
    async fn list(&self, movie_slug: &str) -> Result<Vec<Review>, Error> {
        let movie = self.resolver.resolve_movie(movie_slug).await?;
        let reviews = self.reviews.list_for_movie(movie.id).await?;
        if reviews.is_empty() {
            return Err(
                Error::not_found(format!("'{}' has no reviews yet", movie.title))
                    .with_reason("no_reviews"),
            );
        }
        Ok(reviews)
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
