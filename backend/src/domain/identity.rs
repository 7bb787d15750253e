//! Resolution of human-facing identifiers into durable ids.
//!
//! Usernames map to user ids; title slugs map to movies through
//! [`TitleSlug`]. Misses surface as `not_found` errors carrying
//! `user_not_found` or `movie_not_found` so callers never confuse them with
//! an empty result.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::CatalogueReader;
use crate::domain::{Error, Movie, TitleSlug, UserId, Username};

/// Read-only resolver shared by the review and engagement services.
pub struct IdentityResolver<C> {
    catalogue: Arc<C>,
}

impl<C> Clone for IdentityResolver<C> {
    fn clone(&self) -> Self {
        Self {
            catalogue: Arc::clone(&self.catalogue),
        }
    }
}

impl<C> IdentityResolver<C> {
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

impl<C> IdentityResolver<C>
where
    C: CatalogueReader,
{
    /// Resolve a username to its user id.
    pub async fn resolve_user(&self, username: &Username) -> Result<UserId, Error> {
        match self.catalogue.find_user_id_by_username(username).await? {
            Some(id) => Ok(id),
            None => {
                debug!(%username, "username did not resolve");
                Err(Error::not_found(format!("user '{username}' not found"))
                    .with_reason("user_not_found"))
            }
        }
    }

    /// Resolve a title slug (or exact title) to a movie.
    ///
    /// Ties between identically titled movies go to the lowest id.
    pub async fn resolve_movie(&self, slug: &str) -> Result<Movie, Error> {
        let key = TitleSlug::from_slug(slug);
        match self.catalogue.find_movie_by_title(key.title()).await? {
            Some(movie) => Ok(movie),
            None => {
                debug!(title = %key, "title did not resolve");
                Err(Error::not_found(format!("movie '{key}' not found"))
                    .with_reason("movie_not_found"))
            }
        }
    }
}

/// Reject requests where the signed-in user acts on someone else's behalf.
pub(crate) fn ensure_actor(actor: UserId, subject: UserId) -> Result<(), Error> {
    if actor == subject {
        Ok(())
    } else {
        Err(Error::forbidden("cannot act on behalf of another user").with_reason("actor_mismatch"))
    }
}
