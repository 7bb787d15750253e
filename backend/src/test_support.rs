//! Shared test doubles: a mutable clock and an in-memory store implementing
//! the driven ports.
//!
//! The store takes one mutex for each port call, which gives the same
//! all-or-nothing behaviour the database transactions provide.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    CatalogueReadError, CatalogueReader, EngagementRepository, EngagementRepositoryError,
    NewUserAccount, ReviewRepository, ReviewRepositoryError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    EmailAddress, EngagementRelation, MembershipChange, Movie, MovieId, Review, ReviewDraft,
    ReviewId, ReviewOutcome, ReviewReceipt, UserAccount, UserId, Username, mean_rating,
};

pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub fn sample_movie(id: i32, title: &str) -> Movie {
    Movie {
        id: MovieId::new(id),
        title: title.to_owned(),
        release_date: NaiveDate::from_ymd_opt(1999, 3, 31),
        genre: Some("Science Fiction".to_owned()),
        avg_rating: None,
    }
}

#[derive(Default)]
struct StoreState {
    movies: BTreeMap<MovieId, Movie>,
    users: BTreeMap<UserId, UserAccount>,
    reviews: BTreeMap<ReviewId, Review>,
    authorship: BTreeSet<(ReviewId, UserId)>,
    memberships: HashMap<EngagementRelation, BTreeMap<(MovieId, UserId), DateTime<Utc>>>,
    last_user_id: i32,
    last_review_id: i32,
}

/// In-memory catalogue, accounts, reviews and engagement sets.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("store mutex"),
        }
    }

    pub fn add_movie(&self, id: i32, title: &str) -> MovieId {
        let movie = sample_movie(id, title);
        let movie_id = movie.id;
        self.lock().movies.insert(movie_id, movie);
        movie_id
    }

    /// Insert an account with a placeholder email and hash.
    pub fn add_user(&self, username: &str) -> UserId {
        let mut state = self.lock();
        state.last_user_id += 1;
        let id = UserId::new(state.last_user_id).expect("positive id");
        state.users.insert(
            id,
            UserAccount {
                id,
                username: Username::new(username).expect("valid username"),
                email: EmailAddress::new(format!("{username}@example.com")).expect("valid email"),
                password_hash: "unused".to_owned(),
            },
        );
        id
    }

    pub fn movie(&self, id: MovieId) -> Movie {
        self.lock().movies.get(&id).cloned().expect("movie exists")
    }

    /// Reviews of `movie` written by `author`, oldest first.
    pub fn authored_reviews(&self, movie: MovieId, author: UserId) -> Vec<Review> {
        let state = self.lock();
        state
            .authorship
            .iter()
            .filter(|(_, user)| *user == author)
            .filter_map(|(review, _)| state.reviews.get(review))
            .filter(|review| review.movie_id == movie)
            .cloned()
            .collect()
    }

    /// Seed an unauthored review with raw stored stars, as rows written by
    /// other tools may look.
    pub fn seed_legacy_review(&self, movie: MovieId, stars: i16) -> ReviewId {
        let mut state = self.lock();
        state.last_review_id += 1;
        let id = ReviewId::new(state.last_review_id);
        state.reviews.insert(
            id,
            Review {
                id,
                movie_id: movie,
                stars,
                body: "Imported".to_owned(),
                posted_on: NaiveDate::from_ymd_opt(2001, 1, 1).expect("valid date"),
            },
        );
        id
    }

    /// Seed a review directly, bypassing the upsert rules.
    pub fn seed_review(&self, movie: MovieId, author: UserId, draft: &ReviewDraft) -> ReviewId {
        let mut state = self.lock();
        let id = Self::insert_review(&mut state, movie, draft);
        state.authorship.insert((id, author));
        id
    }

    fn insert_review(state: &mut StoreState, movie: MovieId, draft: &ReviewDraft) -> ReviewId {
        state.last_review_id += 1;
        let id = ReviewId::new(state.last_review_id);
        state.reviews.insert(
            id,
            Review {
                id,
                movie_id: movie,
                stars: draft.stars.get(),
                body: draft.body.clone(),
                posted_on: draft.posted_on,
            },
        );
        id
    }

    pub fn membership_count(&self, relation: EngagementRelation) -> usize {
        self.lock()
            .memberships
            .get(&relation)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl CatalogueReader for InMemoryStore {
    async fn find_movie_by_title(&self, title: &str) -> Result<Option<Movie>, CatalogueReadError> {
        Ok(self
            .lock()
            .movies
            .values()
            .find(|movie| movie.title == title)
            .cloned())
    }

    async fn find_user_id_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserId>, CatalogueReadError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|account| &account.username == username)
            .map(|account| account.id))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, account: &NewUserAccount) -> Result<UserId, UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(UserPersistenceError::duplicate_username(
                account.username.as_str(),
            ));
        }
        state.last_user_id += 1;
        let id = UserId::new(state.last_user_id)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        state.users.insert(
            id,
            UserAccount {
                id,
                username: account.username.clone(),
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
            },
        );
        Ok(id)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|account| &account.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.lock().users.get(&id).cloned())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn upsert_authored(
        &self,
        movie: MovieId,
        author: UserId,
        draft: &ReviewDraft,
    ) -> Result<ReviewReceipt, ReviewRepositoryError> {
        let mut state = self.lock();
        let newest = state
            .authorship
            .iter()
            .filter(|(_, user)| *user == author)
            .map(|(review, _)| *review)
            .filter(|review| {
                state
                    .reviews
                    .get(review)
                    .is_some_and(|row| row.movie_id == movie)
            })
            .max();

        let (review_id, outcome) = match newest {
            Some(id) => {
                let row = state
                    .reviews
                    .get_mut(&id)
                    .ok_or_else(|| ReviewRepositoryError::query("authored review vanished"))?;
                row.stars = draft.stars.get();
                row.body.clone_from(&draft.body);
                row.posted_on = draft.posted_on;
                (id, ReviewOutcome::Updated)
            }
            None => {
                let id = Self::insert_review(&mut state, movie, draft);
                state.authorship.insert((id, author));
                (id, ReviewOutcome::Created)
            }
        };

        let stars: Vec<_> = state
            .reviews
            .values()
            .filter(|review| review.movie_id == movie)
            .map(|review| review.stars)
            .collect();
        let average_rating = mean_rating(&stars);
        if let Some(row) = state.movies.get_mut(&movie) {
            row.avg_rating = average_rating;
        }

        Ok(ReviewReceipt {
            review_id,
            outcome,
            average_rating,
        })
    }

    async fn list_for_movie(&self, movie: MovieId) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(self
            .lock()
            .reviews
            .values()
            .filter(|review| review.movie_id == movie)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EngagementRepository for InMemoryStore {
    async fn toggle(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        user: UserId,
        added_at: DateTime<Utc>,
    ) -> Result<MembershipChange, EngagementRepositoryError> {
        let mut state = self.lock();
        let set = state.memberships.entry(relation).or_default();
        if set.remove(&(movie, user)).is_some() {
            Ok(MembershipChange::Removed)
        } else {
            set.insert((movie, user), added_at);
            Ok(MembershipChange::Added)
        }
    }

    async fn contains(
        &self,
        relation: EngagementRelation,
        movie: MovieId,
        user: UserId,
    ) -> Result<bool, EngagementRepositoryError> {
        Ok(self
            .lock()
            .memberships
            .get(&relation)
            .is_some_and(|set| set.contains_key(&(movie, user))))
    }
}
