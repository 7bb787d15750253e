//! Driven port for the read-only catalogue lookups the core depends on.
//!
//! Only two queries are needed: a movie by exact title and a user id by
//! username. Both return `Ok(None)` on a miss so the identity resolver can
//! decide how to report it.

use async_trait::async_trait;

use crate::domain::{Movie, UserId, Username};

use super::{define_port_error, map_storage_error_to_domain};

define_port_error! {
    /// Errors raised by catalogue reader adapters.
    pub enum CatalogueReadError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "catalogue query failed: {message}",
    }
}

map_storage_error_to_domain!(CatalogueReadError);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueReader: Send + Sync {
    /// Fetch the movie whose title equals `title` exactly.
    ///
    /// When several rows share the title, the one with the lowest id wins.
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, CatalogueReadError>;

    /// Fetch the id of the user with this exact username.
    async fn find_user_id_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserId>, CatalogueReadError>;
}

/// Fixture reader with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueReader;

#[async_trait]
impl CatalogueReader for FixtureCatalogueReader {
    async fn find_movie_by_title(&self, _title: &str) -> Result<Option<Movie>, CatalogueReadError> {
        Ok(None)
    }

    async fn find_user_id_by_username(
        &self,
        _username: &Username,
    ) -> Result<Option<UserId>, CatalogueReadError> {
        Ok(None)
    }
}
