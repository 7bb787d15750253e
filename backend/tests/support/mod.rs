//! Embedded PostgreSQL helpers shared by the adapter integration suites.
//!
//! Each test gets its own database cloned from a template that carries the
//! fixture schema in `tests/fixtures/schema`. The template name includes a
//! hash of that directory, so editing the schema provisions a fresh one.
//!
//! Set `SKIP_TEST_CLUSTER=1` to skip these suites where the embedded
//! cluster cannot start.
#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use cinephile::domain::{MovieId, UserId};
use cinephile::outbound::persistence::{DbPool, PoolConfig};
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

const TEMPLATE_NAME_PREFIX: &str = "cinephile_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Render a `postgres` error with its SQLSTATE and detail.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Returns `None` with a skip marker when `SKIP_TEST_CLUSTER` is truthy and
/// panics otherwise, so CI breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Keeps `PG_PASSWORD` stable across processes that reuse one data directory.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads.
        unsafe {
            std::env::set_var("PG_PASSWORD", "cinephile_embedded_test");
        }
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut last_error = String::new();
    for _ in 0..PROVISION_RETRIES {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) => last_error = format!("{err:?}"),
        }
        std::thread::sleep(PROVISION_RETRY_DELAY);
    }
    Err(last_error)
}

fn schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("schema")
}

fn apply_schema(url: &str) -> Result<(), String> {
    let sql = std::fs::read_to_string(schema_dir().join("schema.sql"))
        .map_err(|err| format!("read schema: {err}"))?;
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&sql)
        .map_err(|err| format_postgres_error(&err))
}

fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let hash = hash_directory(schema_dir()).map_err(|err| format!("hash schema: {err}"))?;
    let template_name = format!("{TEMPLATE_NAME_PREFIX}_{}", hash.get(..8).unwrap_or(&hash));
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        apply_schema(&cluster.connection().database_url(&template_name))?;
    }
    Ok(template_name)
}

fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::new();
    for attempt in 1..=PROVISION_RETRIES {
        let provisioned = ensure_template_database(cluster).and_then(|template| {
            cluster
                .temporary_database_from_template(
                    format!("test_{}", Uuid::new_v4()).as_str(),
                    template.as_str(),
                )
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match provisioned {
            Ok(database) => return Ok(database),
            Err(err) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {err}"),
        }
        std::thread::sleep(PROVISION_RETRY_DELAY);
    }
    Err(last_error)
}

/// A freshly cloned database, a pool over it and a runtime to drive the
/// async adapters from synchronous tests.
pub struct TestDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    url: String,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    fn open() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let database = provision_database(shared_cluster()?)?;
        let url = database.url().to_owned();
        // Room for two concurrent transactions plus a reader.
        let config = PoolConfig::new(url.as_str()).with_max_size(4);
        let pool = runtime
            .block_on(DbPool::new(config))
            .map_err(|err| err.to_string())?;
        Ok(Self {
            runtime,
            pool,
            url,
            _database: database,
        })
    }

    /// Synchronous client for seeding rows and reading them back.
    pub fn client(&self) -> Client {
        Client::connect(&self.url, NoTls)
            .unwrap_or_else(|err| panic!("connect: {}", format_postgres_error(&err)))
    }

    pub fn insert_movie(&self, title: &str) -> MovieId {
        let row = self
            .client()
            .query_one("INSERT INTO movies (title) VALUES ($1) RETURNING id", &[&title])
            .unwrap_or_else(|err| panic!("insert movie: {}", format_postgres_error(&err)));
        MovieId::new(row.get(0))
    }

    pub fn insert_user(&self, username: &str) -> UserId {
        let email = format!("{username}@example.com");
        let row = self
            .client()
            .query_one(
                "INSERT INTO users (username, email, password_hash) \
                 VALUES ($1, $2, 'unused') RETURNING id",
                &[&username, &email],
            )
            .unwrap_or_else(|err| panic!("insert user: {}", format_postgres_error(&err)));
        UserId::new(row.get(0)).expect("serial ids are positive")
    }

    /// Insert a review row with no author link and arbitrary stars.
    pub fn insert_unauthored_review(&self, movie: MovieId, stars: i16) {
        self.client()
            .execute(
                "INSERT INTO reviews (movie_id, stars, body, posted_on) \
                 VALUES ($1, $2, 'Imported', DATE '2001-01-01')",
                &[&movie.get(), &stars],
            )
            .unwrap_or_else(|err| panic!("insert review: {}", format_postgres_error(&err)));
    }

    /// Stars of every review `author` wrote for `movie`.
    pub fn authored_stars(&self, movie: MovieId, author: UserId) -> Vec<i16> {
        self.client()
            .query(
                "SELECT r.stars FROM reviews r \
                 JOIN review_authors a ON a.review_id = r.id \
                 WHERE r.movie_id = $1 AND a.user_id = $2 ORDER BY r.id",
                &[&movie.get(), &author.get()],
            )
            .unwrap_or_else(|err| panic!("authored stars: {}", format_postgres_error(&err)))
            .iter()
            .map(|row| row.get(0))
            .collect()
    }

    pub fn avg_rating(&self, movie: MovieId) -> Option<f64> {
        self.client()
            .query_one("SELECT avg_rating FROM movies WHERE id = $1", &[&movie.get()])
            .unwrap_or_else(|err| panic!("avg rating: {}", format_postgres_error(&err)))
            .get(0)
    }

    pub fn count(&self, table: &str) -> i64 {
        self.client()
            .query_one(format!("SELECT COUNT(*) FROM {table}").as_str(), &[])
            .unwrap_or_else(|err| panic!("count {table}: {}", format_postgres_error(&err)))
            .get(0)
    }
}

/// Open a test database, or `None` when the cluster is unavailable and
/// skipping is enabled.
pub fn test_database() -> Option<TestDatabase> {
    match TestDatabase::open() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
