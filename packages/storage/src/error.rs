// ABOUTME: Storage error taxonomy shared by every store
// ABOUTME: Classifies SQLite constraint failures and wraps errors raised inside transactions

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Transaction '{operation}' rolled back: {source}")]
    TransactionFailed {
        operation: &'static str,
        #[source]
        source: Box<StorageError>,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(sqlx::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Wrap an error raised inside a multi-statement operation.
    ///
    /// Already-wrapped errors are returned untouched so nested helpers do not
    /// stack transaction layers.
    pub fn in_transaction(self, operation: &'static str) -> Self {
        match self {
            wrapped @ StorageError::TransactionFailed { .. } => wrapped,
            other => StorageError::TransactionFailed {
                operation,
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, looking through a transaction wrapper
    pub fn root(&self) -> &StorageError {
        match self {
            StorageError::TransactionFailed { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), StorageError::NotFound(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self.root(), StorageError::ConstraintViolation(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), StorageError::Validation(_))
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db_err) => {
                use sqlx::error::ErrorKind;
                match db_err.kind() {
                    ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation => {
                        StorageError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => StorageError::Sqlx(sqlx::Error::Database(db_err)),
                }
            }
            other => StorageError::Sqlx(other),
        }
    }
}
