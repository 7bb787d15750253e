//! Movie catalogue entries as consumed by reviews and engagement.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Numeric movie identifier assigned by the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MovieId(i32);

impl MovieId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title lookup key derived from a URL slug.
///
/// Every `-` becomes a space and nothing else changes: case, surrounding
/// whitespace and other punctuation are kept, so the result must match a
/// stored title exactly.
///
/// # Examples
/// ```
/// use cinephile::domain::TitleSlug;
///
/// assert_eq!(TitleSlug::from_slug("the-matrix").title(), "the matrix");
/// assert_eq!(TitleSlug::from_slug("The Matrix").title(), "The Matrix");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TitleSlug(String);

impl TitleSlug {
    /// Translate a slug (or an already spaced title) into a lookup key.
    pub fn from_slug(slug: &str) -> Self {
        Self(slug.replace('-', " "))
    }

    /// Exact title to look up.
    pub fn title(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TitleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Movie row projected for the review and engagement use-cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[schema(value_type = i32, example = 3)]
    pub id: MovieId,
    #[schema(example = "The Matrix")]
    pub title: String,
    pub release_date: Option<NaiveDate>,
    #[schema(example = "Science Fiction")]
    pub genre: Option<String>,
    /// Mean star rating; `None` until the first review lands.
    #[schema(example = 4.5)]
    pub avg_rating: Option<f64>,
}
