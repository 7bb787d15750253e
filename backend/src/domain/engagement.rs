//! User-to-movie engagement relations (watchlist and likes).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Membership set a user can toggle a movie in and out of.
///
/// Both relations behave identically: a `(movie, user)` pair is either
/// present or absent, and toggling flips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EngagementRelation {
    Watchlist,
    Liked,
}

impl EngagementRelation {
    /// Path segment and log label for the relation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Watchlist => "watchlist",
            Self::Liked => "liked",
        }
    }
}

impl fmt::Display for EngagementRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown relation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown engagement relation '{0}'; expected watchlist or liked")]
pub struct UnknownRelation(pub String);

impl FromStr for EngagementRelation {
    type Err = UnknownRelation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watchlist" => Ok(Self::Watchlist),
            "liked" => Ok(Self::Liked),
            other => Err(UnknownRelation(other.to_owned())),
        }
    }
}

/// State of the pair after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MembershipChange {
    Added,
    Removed,
}

impl MembershipChange {
    /// Whether the pair is present after the change.
    pub fn is_member(self) -> bool {
        matches!(self, Self::Added)
    }
}
