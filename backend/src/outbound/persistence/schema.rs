//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match the deployed database. Migrations are managed outside
//! this crate; `diesel print-schema` regenerates this file from a live
//! database.

diesel::table! {
    /// Movie catalogue. `title` is not unique; lookups take the lowest id.
    movies (id) {
        id -> Int4,
        title -> Text,
        release_date -> Nullable<Date>,
        genre -> Nullable<Text>,
        /// Mean of all review stars, or null before the first review.
        avg_rating -> Nullable<Float8>,
    }
}

diesel::table! {
    /// Registered accounts. `username` carries a unique constraint.
    users (id) {
        id -> Int4,
        username -> Text,
        email -> Text,
        /// PHC-formatted adaptive hash; never the plaintext.
        password_hash -> Text,
    }
}

diesel::table! {
    reviews (id) {
        id -> Int4,
        movie_id -> Int4,
        /// The service writes 1..=5; older rows are not guaranteed to.
        stars -> Int2,
        body -> Text,
        posted_on -> Date,
    }
}

diesel::table! {
    /// Links each review to the user who wrote it.
    review_authors (review_id, user_id) {
        review_id -> Int4,
        user_id -> Int4,
    }
}

diesel::table! {
    watchlist_entries (movie_id, user_id) {
        movie_id -> Int4,
        user_id -> Int4,
        added_at -> Timestamptz,
    }
}

diesel::table! {
    movie_likes (movie_id, user_id) {
        movie_id -> Int4,
        user_id -> Int4,
        added_at -> Timestamptz,
    }
}

diesel::joinable!(reviews -> movies (movie_id));
diesel::joinable!(review_authors -> reviews (review_id));
diesel::joinable!(review_authors -> users (user_id));
diesel::joinable!(watchlist_entries -> movies (movie_id));
diesel::joinable!(watchlist_entries -> users (user_id));
diesel::joinable!(movie_likes -> movies (movie_id));
diesel::joinable!(movie_likes -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    movies,
    users,
    reviews,
    review_authors,
    watchlist_entries,
    movie_likes,
);
