//! PostgreSQL persistence adapters using Diesel.
//!
//! Concrete implementations of the driven ports, backed by `diesel-async`
//! with a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types; the rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Atomic writes**: review upserts and engagement toggles run in a
//!   transaction that row-locks the acting user.
//!
//! # Example
//!
//! ```ignore
//! use cinephile::outbound::persistence::{DbPool, DieselReviewRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/cinephile")).await?;
//! let reviews = DieselReviewRepository::new(pool);
//! ```

mod diesel_catalogue_reader;
mod diesel_engagement_repository;
mod diesel_error_mapping;
mod diesel_health_probe;
mod diesel_review_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_reader::DieselCatalogueReader;
pub use diesel_engagement_repository::DieselEngagementRepository;
pub use diesel_health_probe::DieselHealthProbe;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
