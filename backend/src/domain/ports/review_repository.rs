//! Driven port for review persistence.
//!
//! Submitting a review touches three places: the review row, the authorship
//! join and the movie's cached average. Adapters must apply all three in one
//! atomic unit, serialised per author, so concurrent submissions by the same
//! user never produce two authored reviews for one movie.

use async_trait::async_trait;

use crate::domain::{
    MovieId, Review, ReviewDraft, ReviewId, ReviewOutcome, ReviewReceipt, UserId, mean_rating,
};

use super::{define_port_error, map_storage_error_to_domain};

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
    }
}

map_storage_error_to_domain!(ReviewRepositoryError);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Create or overwrite `author`'s review of `movie`, then store the
    /// movie's new average rating.
    ///
    /// When the author already has reviews of the movie, the newest one
    /// (highest id) is overwritten. The average is
    /// [`mean_rating`](crate::domain::mean_rating) over every review of the
    /// movie after the write.
    async fn upsert_authored(
        &self,
        movie: MovieId,
        author: UserId,
        draft: &ReviewDraft,
    ) -> Result<ReviewReceipt, ReviewRepositoryError>;

    /// All reviews of `movie`, oldest first.
    async fn list_for_movie(&self, movie: MovieId) -> Result<Vec<Review>, ReviewRepositoryError>;
}

/// Fixture repository that accepts writes and lists nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReviewRepository;

#[async_trait]
impl ReviewRepository for FixtureReviewRepository {
    async fn upsert_authored(
        &self,
        _movie: MovieId,
        _author: UserId,
        draft: &ReviewDraft,
    ) -> Result<ReviewReceipt, ReviewRepositoryError> {
        Ok(ReviewReceipt {
            review_id: ReviewId::new(1),
            outcome: ReviewOutcome::Created,
            average_rating: mean_rating(&[draft.stars.get()]),
        })
    }

    async fn list_for_movie(&self, _movie: MovieId) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(Vec::new())
    }
}
