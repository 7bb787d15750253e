//! Reviews, star ratings and the aggregate rating rule.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MovieId;

/// Lowest accepted star rating.
pub const STARS_MIN: i16 = 1;
/// Highest accepted star rating.
pub const STARS_MAX: i16 = 5;

/// Numeric review identifier; higher means more recently created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ReviewId(i32);

impl ReviewId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a star rating falls outside `STARS_MIN..=STARS_MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("stars must be between 1 and 5, got {0}")]
pub struct StarRatingError(pub i64);

/// Whole-star rating between one and five.
///
/// # Examples
/// ```
/// use cinephile::domain::StarRating;
///
/// assert_eq!(StarRating::new(4).map(StarRating::get), Ok(4));
/// assert!(StarRating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "i64", into = "i16")]
pub struct StarRating(i16);

impl StarRating {
    /// Validate and construct a rating.
    pub fn new(stars: i64) -> Result<Self, StarRatingError> {
        i16::try_from(stars)
            .ok()
            .filter(|value| (STARS_MIN..=STARS_MAX).contains(value))
            .map(Self)
            .ok_or(StarRatingError(stars))
    }

    pub fn get(self) -> i16 {
        self.0
    }
}

impl From<StarRating> for i16 {
    fn from(value: StarRating) -> Self {
        value.0
    }
}

impl TryFrom<i64> for StarRating {
    type Error = StarRatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored review as returned by listings.
///
/// `stars` is the stored value; rows written outside this service may fall
/// outside `STARS_MIN..=STARS_MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[schema(value_type = i32, example = 11)]
    pub id: ReviewId,
    #[schema(value_type = i32, example = 3)]
    pub movie_id: MovieId,
    #[schema(example = 4)]
    pub stars: i16,
    #[schema(example = "Still holds up.")]
    pub body: String,
    pub posted_on: NaiveDate,
}

/// Content of a review submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub stars: StarRating,
    pub body: String,
    pub posted_on: NaiveDate,
}

/// Whether a submission created a new review or overwrote the author's
/// existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Created,
    Updated,
}

/// Result of a successful review submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReceipt {
    #[schema(value_type = i32)]
    pub review_id: ReviewId,
    pub outcome: ReviewOutcome,
    /// Movie average after the submission was applied.
    pub average_rating: Option<f64>,
}

/// Arithmetic mean of stored `stars`, or `None` when there are no ratings.
///
/// Values are averaged as stored, without range checks. The result depends
/// only on the multiset of ratings, so concurrent recomputations over the
/// same rows agree.
#[expect(
    clippy::cast_precision_loss,
    reason = "rating sums and counts are far below 2^52"
)]
pub fn mean_rating(stars: &[i16]) -> Option<f64> {
    if stars.is_empty() {
        return None;
    }
    let total: i64 = stars.iter().copied().map(i64::from).sum();
    Some(total as f64 / stars.len() as f64)
}
