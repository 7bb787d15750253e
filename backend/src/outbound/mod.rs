//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL-backed repositories and the readiness probe,
//!   built on Diesel.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business rules.

pub mod persistence;
