//! Shared translation of pool and Diesel failures into port errors.
//!
//! Every adapter in this module funnels its errors through these helpers so
//! that "the database is unreachable" and "the statement failed" are told
//! apart the same way everywhere.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool failure onto a port's connection variant.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a Diesel failure onto a port's query or connection variant.
///
/// Only a closed connection counts as a connectivity problem; everything
/// else is a query failure.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection closed".to_owned())
        }
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        other => query(other.to_string()),
    }
}

/// Whether `error` is a unique-constraint violation, optionally on a named
/// constraint.
pub(crate) fn is_unique_violation(error: &DieselError, constraint: Option<&str>) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            constraint.is_none_or(|name| info.constraint_name() == Some(name))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    struct Info {
        message: &'static str,
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(
        kind: DatabaseErrorKind,
        message: &'static str,
        constraint: Option<&'static str>,
    ) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { message, constraint }))
    }

    fn map(error: DieselError) -> Mapped {
        map_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    #[rstest]
    fn closed_connection_is_a_connection_error() {
        let mapped = map(database_error(
            DatabaseErrorKind::ClosedConnection,
            "server closed the connection",
            None,
        ));
        assert!(matches!(mapped, Mapped::Connection(_)));
    }

    #[rstest]
    fn other_database_errors_are_query_errors() {
        let mapped = map(database_error(
            DatabaseErrorKind::CheckViolation,
            "stars_range",
            None,
        ));
        assert_eq!(mapped, Mapped::Query("stars_range".to_owned()));
    }

    #[rstest]
    fn not_found_is_a_query_error() {
        assert_eq!(
            map(DieselError::NotFound),
            Mapped::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }

    #[rstest]
    #[case(Some("users_username_key"), None, true)]
    #[case(Some("users_username_key"), Some("users_username_key"), true)]
    #[case(Some("users_email_key"), Some("users_username_key"), false)]
    fn unique_violations_match_by_constraint(
        #[case] actual: Option<&'static str>,
        #[case] wanted: Option<&str>,
        #[case] expected: bool,
    ) {
        let error = database_error(DatabaseErrorKind::UniqueViolation, "duplicate key", actual);
        assert_eq!(is_unique_violation(&error, wanted), expected);
    }

    #[rstest]
    fn non_unique_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DieselError::NotFound, None));
    }
}
