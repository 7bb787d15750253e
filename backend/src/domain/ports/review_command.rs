//! Driving ports for submitting and listing movie reviews.

use async_trait::async_trait;

use crate::domain::{Error, Review, ReviewReceipt, StarRating, UserId, Username};

/// Request to create or overwrite a user's review of a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    /// Title slug as it appears in the URL.
    pub movie_slug: String,
    /// Author named by the request.
    pub username: Username,
    /// Signed-in user making the request.
    pub actor: UserId,
    pub stars: StarRating,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Upsert the author's review and refresh the movie's average.
    ///
    /// # Errors
    ///
    /// - `not_found` / `movie_not_found`, then `not_found` / `user_not_found`,
    ///   checked in that order.
    /// - `forbidden` when `actor` is not the named author.
    async fn submit(&self, submission: ReviewSubmission) -> Result<ReviewReceipt, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Reviews of the movie addressed by `movie_slug`, oldest first.
    ///
    /// # Errors
    ///
    /// - `not_found` / `movie_not_found` for an unknown title.
    /// - `not_found` / `no_reviews` when the movie has none.
    async fn list(&self, movie_slug: &str) -> Result<Vec<Review>, Error>;
}
