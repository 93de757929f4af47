use crate::error::AppError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// PostgreSQL reports the offending table and column alongside the message,
/// so the structured fields come straight from the error information.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let table = info.table_name().unwrap_or("resource");

        match kind {
            DatabaseErrorKind::UniqueViolation => AppError::Duplicate {
                entity: table.to_string(),
                field: info
                    .column_name()
                    .or(info.constraint_name())
                    .unwrap_or("unknown")
                    .to_string(),
                value: info.details().unwrap_or(message).to_string(),
            },
            DatabaseErrorKind::NotNullViolation => match info.column_name() {
                Some(column) => AppError::Validation {
                    field: column.to_string(),
                    reason: format!("Field is required for {}", table),
                },
                None => Self::database(operation, "Not null constraint violation", message),
            },
            DatabaseErrorKind::ForeignKeyViolation => {
                Self::database(operation, "Foreign key constraint violation", message)
            }
            DatabaseErrorKind::CheckViolation => {
                Self::database(operation, "Check constraint violation", message)
            }
            _ => Self::database(operation, "Database error", message),
        }
    }

    fn database(operation: &str, label: &str, message: &str) -> AppError {
        AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{}: {}", label, message)),
        }
    }
}
