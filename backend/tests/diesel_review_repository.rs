//! Integration tests for `DieselReviewRepository` against embedded PostgreSQL.
//!
//! These cover the transactional upsert: the author row lock, update of the
//! newest authored review versus insert plus authorship link, and the
//! `avg_rating` recompute.

use chrono::NaiveDate;
use cinephile::domain::ports::{ReviewRepository, ReviewRepositoryError};
use cinephile::domain::{ReviewDraft, ReviewOutcome, StarRating, UserId};
use cinephile::outbound::persistence::DieselReviewRepository;
use rstest::{fixture, rstest};

mod support;

use support::{TestDatabase, test_database};

#[fixture]
fn database() -> Option<TestDatabase> {
    test_database()
}

fn draft(stars: i64, body: &str) -> ReviewDraft {
    ReviewDraft {
        stars: StarRating::new(stars).expect("valid rating"),
        body: body.to_owned(),
        posted_on: NaiveDate::from_ymd_opt(2026, 2, 14).expect("valid date"),
    }
}

#[rstest]
fn resubmission_updates_the_single_authored_review(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: resubmission_updates_the_single_authored_review skipped");
        return;
    };
    let matrix = db.insert_movie("the matrix");
    let alice = db.insert_user("alice");
    let repo = DieselReviewRepository::new(db.pool.clone());

    let (first, second) = db.runtime.block_on(async {
        let first = repo
            .upsert_authored(matrix, alice, &draft(5, "Great"))
            .await
            .expect("first upsert");
        let second = repo
            .upsert_authored(matrix, alice, &draft(3, "Okay"))
            .await
            .expect("second upsert");
        (first, second)
    });

    assert_eq!(first.outcome, ReviewOutcome::Created);
    assert_eq!(second.outcome, ReviewOutcome::Updated);
    assert_eq!(second.review_id, first.review_id);
    assert_eq!(second.average_rating, Some(3.0));
    assert_eq!(db.authored_stars(matrix, alice), [3]);
    assert_eq!(db.avg_rating(matrix), Some(3.0));
    assert_eq!(db.count("review_authors"), 1);
}

#[rstest]
fn average_spans_every_author(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: average_spans_every_author skipped");
        return;
    };
    let matrix = db.insert_movie("the matrix");
    let alice = db.insert_user("alice");
    let bob = db.insert_user("bob");
    let repo = DieselReviewRepository::new(db.pool.clone());

    let receipt = db.runtime.block_on(async {
        repo.upsert_authored(matrix, alice, &draft(5, "Loved it"))
            .await
            .expect("alice");
        repo.upsert_authored(matrix, bob, &draft(2, "Not for me"))
            .await
            .expect("bob")
    });

    assert_eq!(receipt.average_rating, Some(3.5));
    assert_eq!(db.avg_rating(matrix), Some(3.5));
    assert_eq!(db.authored_stars(matrix, alice), [5]);
    assert_eq!(db.authored_stars(matrix, bob), [2]);
}

#[rstest]
fn stored_out_of_range_rows_are_listed_and_averaged(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: stored_out_of_range_rows_are_listed_and_averaged skipped");
        return;
    };
    let matrix = db.insert_movie("the matrix");
    let alice = db.insert_user("alice");
    db.insert_unauthored_review(matrix, 9);
    let repo = DieselReviewRepository::new(db.pool.clone());

    let (receipt, listed) = db.runtime.block_on(async {
        let receipt = repo
            .upsert_authored(matrix, alice, &draft(3, "Fine"))
            .await
            .expect("upsert succeeds beside a legacy row");
        let listed = repo.list_for_movie(matrix).await.expect("listing");
        (receipt, listed)
    });

    assert_eq!(receipt.average_rating, Some(6.0));
    let stars: Vec<_> = listed.iter().map(|review| review.stars).collect();
    assert_eq!(stars, [9, 3]);
}

#[rstest]
fn unknown_author_rolls_back_the_write(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_author_rolls_back_the_write skipped");
        return;
    };
    let matrix = db.insert_movie("the matrix");
    let ghost = UserId::new(9_999).expect("positive id");
    let repo = DieselReviewRepository::new(db.pool.clone());

    let err = db
        .runtime
        .block_on(repo.upsert_authored(matrix, ghost, &draft(4, "Who am I")))
        .expect_err("author does not exist");

    assert!(matches!(err, ReviewRepositoryError::Query { .. }));
    assert_eq!(db.count("reviews"), 0);
    assert_eq!(db.avg_rating(matrix), None);
}

#[rstest]
fn concurrent_submissions_by_one_author_leave_one_review(database: Option<TestDatabase>) {
    let Some(db) = database else {
        eprintln!(
            "SKIP-TEST-CLUSTER: concurrent_submissions_by_one_author_leave_one_review skipped"
        );
        return;
    };
    let matrix = db.insert_movie("the matrix");
    let alice = db.insert_user("alice");
    let repo = DieselReviewRepository::new(db.pool.clone());

    let (left, right) = db.runtime.block_on(async {
        let left_repo = repo.clone();
        let right_repo = repo.clone();
        let left = tokio::spawn(async move {
            left_repo
                .upsert_authored(matrix, alice, &draft(5, "Great"))
                .await
        });
        let right = tokio::spawn(async move {
            right_repo
                .upsert_authored(matrix, alice, &draft(1, "Awful"))
                .await
        });
        (
            left.await.expect("task").expect("left upsert"),
            right.await.expect("task").expect("right upsert"),
        )
    });

    let mut outcomes = [left.outcome, right.outcome];
    outcomes.sort_by_key(|outcome| matches!(outcome, ReviewOutcome::Updated));
    assert_eq!(outcomes, [ReviewOutcome::Created, ReviewOutcome::Updated]);
    assert_eq!(left.review_id, right.review_id);

    let authored = db.authored_stars(matrix, alice);
    assert_eq!(authored.len(), 1);
    let stored = authored.first().copied().map(f64::from);
    assert_eq!(db.avg_rating(matrix), stored);
}
