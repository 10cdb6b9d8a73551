//! Store error model.

use thiserror::Error;

/// Failure of a storage backend.
///
/// Domain outcomes ("not found") are `Ok(None)`, not errors; this type is
/// for the backend itself misbehaving.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be mapped back into domain types.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}
