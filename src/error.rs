//! Error types surfaced by table construction and mutation.

use std::collections::TryReserveError;

/// Represents errors that can occur while building or mutating a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backing storage for the bucket array could not be reserved
    Alloc(TryReserveError),

    /// Every probe attempt found a live entry for another key, so the
    /// insert has no bucket to claim
    TableFull,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alloc(e) => write!(f, "bucket allocation failed: {e}"),
            Self::TableFull => write!(f, "table is full"),
        }
    }
}

impl std::error::Error for Error {}

impl From<TryReserveError> for Error {
    fn from(value: TryReserveError) -> Self {
        Self::Alloc(value)
    }
}

/// Table result
pub type Result<T> = std::result::Result<T, Error>;
