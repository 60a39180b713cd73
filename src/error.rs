use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid ticket: {0}")]
    Validation(String),
    #[error("asset error: {0}")]
    Asset(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures raised by the ticket store and its storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read ticket storage: {0}")]
    Read(String),
    #[error("stored tickets are corrupt: {0}")]
    Corrupt(String),
    #[error("could not write ticket storage: {0}")]
    Write(String),
    #[error("ticket storage changed since it was read (expected {expected}, found {found})")]
    Conflict { expected: String, found: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User-visible export failures. Both abort the export before anything is saved.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: no tickets available")]
    EmptyExportSet,
    #[error("could not embed logo: {0}")]
    AssetEmbed(String),
}
