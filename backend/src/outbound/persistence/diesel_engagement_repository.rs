//! PostgreSQL-backed watchlist and likes membership.
//!
//! Both relations use identically shaped tables, so a single macro emits
//! the toggle and existence queries for whichever table the relation
//! selects. A toggle locks the user's row first, which serialises toggles
//! per user and makes the delete-or-insert step atomic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{EngagementRepository, EngagementRepositoryError};
use crate::domain::{EngagementRelation, MembershipChange, MovieId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::{DbPool, PoolError};
use super::schema::{movie_likes, users, watchlist_entries};

/// Diesel-backed implementation of [`EngagementRepository`].
#[derive(Clone)]
pub struct DieselEngagementRepository {
    pool: DbPool,
}

impl DieselEngagementRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> EngagementRepositoryError {
    map_pool_error(error, EngagementRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> EngagementRepositoryError {
    map_diesel_error(
        error,
        EngagementRepositoryError::query,
        EngagementRepositoryError::connection,
    )
}

/// Delete the pair from `$table` if present, otherwise insert it.
macro_rules! toggle_pair {
    ($table:ident, $conn:expr, $movie:expr, $user:expr, $added_at:expr) => {{
        let removed = diesel::delete(
            $table::table
                .filter($table::movie_id.eq($movie))
                .filter($table::user_id.eq($user)),
        )
        .execute($conn)
        .await?;
        if removed > 0 {
            MembershipChange::Removed
        } else {
            diesel::insert_into($table::table)
                .values((
                    $table::movie_id.eq($movie),
                    $table::user_id.eq($user),
                    $table::added_at.eq($added_at),
                ))
                .execute($conn)
                .await?;
            MembershipChange::Added
        }
    }};
}

/// Whether `$table` holds the pair.
macro_rules! pair_exists {
    ($table:ident, $conn:expr, $movie:expr, $user:expr) => {
        diesel::select(diesel::dsl::exists(
            $table::table
                .filter($table::movie_id.eq($movie))
                .filter($table::user_id.eq($user)),
        ))
        .get_result::<bool>($conn)
        .await
    };
}

async fn toggle_in_transaction(
    conn: &mut AsyncPgConnection,
    relation: EngagementRelation,
    movie: i32,
    user: i32,
    added_at: DateTime<Utc>,
) -> Result<MembershipChange, diesel::result::Error> {
    users::table
        .find(user)
        .select(users::id)
        .for_update()
        .first::<i32>(conn)
        .await?;

    let change = match relation {
        EngagementRelation::Watchlist => {
            toggle_pair!(watchlist_entries, conn, movie, user, added_at)
        }
        EngagementRelation::Liked => toggle_pair!(movie_likes, conn, movie, user, added_at),
    };
    Ok(change)
}

#[async_trait]
impl EngagementRepository for DieselEngagementRepository {
    async fn toggle(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        user: UserId,
        added_at: DateTime<Utc>,
    ) -> Result<MembershipChange, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (movie, user) = (movie.get(), user.get());
        conn.transaction(|conn| {
            async move { toggle_in_transaction(conn, relation, movie, user, added_at).await }
                .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn contains(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        user: UserId,
    ) -> Result<bool, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let (movie, user) = (movie.get(), user.get());
        let present = match relation {
            EngagementRelation::Watchlist => {
                pair_exists!(watchlist_entries, &mut conn, movie, user)
            }
            EngagementRelation::Liked => pair_exists!(movie_likes, &mut conn, movie, user),
        };
        present.map_err(diesel_error)
    }
}
