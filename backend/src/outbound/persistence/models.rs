//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; adapters convert them into
//! validated domain types before returning.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{movies, review_authors, reviews, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MovieRow {
    pub id: i32,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: i32,
    pub movie_id: i32,
    pub stars: i16,
    pub body: String,
    pub posted_on: NaiveDate,
}

/// Insert and overwrite payload for a review.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = reviews)]
pub(crate) struct ReviewContent<'a> {
    pub stars: i16,
    pub body: &'a str,
    pub posted_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = review_authors)]
pub(crate) struct NewReviewAuthorRow {
    pub review_id: i32,
    pub user_id: i32,
}
