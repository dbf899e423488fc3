pub mod bid;
pub mod category;
pub mod dashboard;
pub mod product;
pub mod user;

use crate::error::AppError;
use sqlx::Error as SqlxError;

/// Translate a Postgres unique violation (23505) into a domain-level
/// conflict instead of a raw storage error.
pub(crate) fn map_unique_violation(err: SqlxError, conflict: AppError) -> AppError {
    match err {
        SqlxError::Database(db_err) if db_err.code().as_deref() == Some("23505") => conflict,
        other => other.into(),
    }
}
