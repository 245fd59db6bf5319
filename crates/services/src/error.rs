//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::bank::BankError;
use quiz_core::model::ValidationError;
use quiz_core::session::SessionError;
use storage::document::DocumentError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `BankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error("import rejected: {0}")]
    MalformedImport(#[from] DocumentError),
    #[error("export failed: {0}")]
    Export(#[source] DocumentError),
    /// The change is applied in memory but could not be saved.
    #[error("bank could not be saved: {0}")]
    Persist(#[from] StorageError),
}

/// Errors emitted by `PracticeService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
