//! Translation of SeaORM failures into repository errors.

use domain::RepositoryError;
use sea_orm::{DbErr, SqlErr};

/// Classify a [`DbErr`] for the service layer.
///
/// Unique violations become [`RepositoryError::Duplicate`] and missing rows
/// become [`RepositoryError::NotFound`]. Everything else is opaque.
pub fn repository_error(err: DbErr) -> RepositoryError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return RepositoryError::Duplicate;
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepositoryError::NotFound,
        other => RepositoryError::other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_are_not_found() {
        assert!(matches!(
            repository_error(DbErr::RecordNotFound("products".into())),
            RepositoryError::NotFound
        ));
        assert!(matches!(repository_error(DbErr::RecordNotUpdated), RepositoryError::NotFound));
    }

    #[test]
    fn other_failures_are_opaque() {
        let err = repository_error(DbErr::Custom("pool timed out".into()));
        assert!(matches!(err, RepositoryError::Other(_)));
        assert!(err.to_string().contains("pool timed out"));
    }
}
