//! PostgreSQL-backed review repository.
//!
//! An authored upsert runs in one transaction that first locks the author's
//! `users` row. Concurrent submissions by the same author therefore queue
//! behind each other, and the "find newest authored review, then update or
//! insert" sequence can never produce two authored reviews for one movie.
//! The movie's `avg_rating` is recomputed in the same transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{
    MovieId, Review, ReviewDraft, ReviewId, ReviewOutcome, ReviewReceipt, UserId, mean_rating,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewReviewAuthorRow, ReviewContent, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::{movies, review_authors, reviews, users};

/// Diesel-backed implementation of [`ReviewRepository`].
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failures inside the upsert transaction.
#[derive(Debug)]
enum UpsertFailure {
    Diesel(diesel::result::Error),
    AuthorMissing(i32),
}

impl From<diesel::result::Error> for UpsertFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<UpsertFailure> for ReviewRepositoryError {
    fn from(value: UpsertFailure) -> Self {
        match value {
            UpsertFailure::Diesel(error) => diesel_error(error),
            UpsertFailure::AuthorMissing(id) => Self::query(format!("author {id} does not exist")),
        }
    }
}

fn pool_error(error: PoolError) -> ReviewRepositoryError {
    map_pool_error(error, ReviewRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            movie_id: MovieId::new(row.movie_id),
            stars: row.stars,
            body: row.body,
            posted_on: row.posted_on,
        }
    }
}

async fn upsert_in_transaction(
    conn: &mut AsyncPgConnection,
    movie: i32,
    author: i32,
    content: ReviewContent<'_>,
) -> Result<ReviewReceipt, UpsertFailure> {
    users::table
        .find(author)
        .select(users::id)
        .for_update()
        .first::<i32>(conn)
        .await
        .optional()?
        .ok_or(UpsertFailure::AuthorMissing(author))?;

    let newest: Option<i32> = reviews::table
        .inner_join(review_authors::table)
        .filter(reviews::movie_id.eq(movie))
        .filter(review_authors::user_id.eq(author))
        .select(reviews::id)
        .order_by(reviews::id.desc())
        .first(conn)
        .await
        .optional()?;

    let (review_id, outcome) = match newest {
        Some(id) => {
            diesel::update(reviews::table.find(id))
                .set(&content)
                .execute(conn)
                .await?;
            (id, ReviewOutcome::Updated)
        }
        None => {
            let id: i32 = diesel::insert_into(reviews::table)
                .values((reviews::movie_id.eq(movie), &content))
                .returning(reviews::id)
                .get_result(conn)
                .await?;
            diesel::insert_into(review_authors::table)
                .values(NewReviewAuthorRow {
                    review_id: id,
                    user_id: author,
                })
                .execute(conn)
                .await?;
            (id, ReviewOutcome::Created)
        }
    };

    let stars = reviews::table
        .filter(reviews::movie_id.eq(movie))
        .select(reviews::stars)
        .load::<i16>(conn)
        .await?;
    let average_rating = mean_rating(&stars);

    diesel::update(movies::table.find(movie))
        .set(movies::avg_rating.eq(average_rating))
        .execute(conn)
        .await?;

    Ok(ReviewReceipt {
        review_id: ReviewId::new(review_id),
        outcome,
        average_rating,
    })
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn upsert_authored(
        &self,
        movie: MovieId,
        author: UserId,
        draft: &ReviewDraft,
    ) -> Result<ReviewReceipt, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let content = ReviewContent {
            stars: draft.stars.get(),
            body: &draft.body,
            posted_on: draft.posted_on,
        };
        let (movie, author) = (movie.get(), author.get());
        conn.transaction::<_, UpsertFailure, _>(|conn| {
            async move { upsert_in_transaction(conn, movie, author, content).await }.scope_boxed()
        })
        .await
        .map_err(ReviewRepositoryError::from)
    }

    async fn list_for_movie(&self, movie: MovieId) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = reviews::table
            .filter(reviews::movie_id.eq(movie.get()))
            .order_by(reviews::id.asc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }
}
