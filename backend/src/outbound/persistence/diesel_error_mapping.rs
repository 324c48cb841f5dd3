//! Shared classification of pool and Diesel failures.
//!
//! Repositories translate a [`StoreFailure`] into their own port error,
//! because the meaning of a constraint violation depends on the operation
//! (a foreign key failure is a missing parent on insert but a live child on
//! delete).

use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to the cases the ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The database could not be reached or dropped the connection.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation,
    /// Any other query failure.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, emitting debug context for the failure.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> StoreFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            StoreFailure::Query("database query error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StoreFailure::ForeignKeyViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            StoreFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(_, info) => StoreFailure::Query(info.message().to_owned()),
        other => StoreFailure::Query(other.to_string()),
    }
}
