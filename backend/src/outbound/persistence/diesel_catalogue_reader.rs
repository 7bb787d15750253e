//! PostgreSQL-backed catalogue reader.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogueReadError, CatalogueReader};
use crate::domain::{Movie, MovieId, UserId, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::MovieRow;
use super::pool::{DbPool, PoolError};
use super::schema::{movies, users};

/// Diesel-backed implementation of [`CatalogueReader`].
#[derive(Clone)]
pub struct DieselCatalogueReader {
    pool: DbPool,
}

impl DieselCatalogueReader {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CatalogueReadError {
    map_pool_error(error, CatalogueReadError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CatalogueReadError {
    map_diesel_error(
        error,
        CatalogueReadError::query,
        CatalogueReadError::connection,
    )
}

pub(super) fn row_to_movie(row: MovieRow) -> Movie {
    Movie {
        id: MovieId::new(row.id),
        title: row.title,
        release_date: row.release_date,
        genre: row.genre,
        avg_rating: row.avg_rating,
    }
}

#[async_trait]
impl CatalogueReader for DieselCatalogueReader {
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, CatalogueReadError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = movies::table
            .filter(movies::title.eq(title))
            .order_by(movies::id.asc())
            .select(MovieRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_movie))
    }

    async fn find_user_id_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserId>, CatalogueReadError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let id: Option<i32> = users::table
            .filter(users::username.eq(username.as_str()))
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        id.map(UserId::new)
            .transpose()
            .map_err(|err| CatalogueReadError::query(err.to_string()))
    }
}
