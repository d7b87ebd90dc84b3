//! Error taxonomy for the join engine and its companion modules.
//!
//! Every fallible entry point returns [`BifrostError`]; there is no in-place
//! recovery anywhere in this crate. A failed call propagates the error to the
//! caller and leaves the profiler's state unspecified.

use thiserror::Error;

/// The complete set of ways a Bifrost call can fail.
#[derive(Debug, Clone, Error)]
pub enum BifrostError {
    /// A requested join column does not exist in the corresponding schema.
    #[error("join column '{column}' not found in {side} table schema")]
    MissingJoinColumn {
        /// Which side the lookup failed on ("left" or "right").
        side: &'static str,
        /// The column name that was requested.
        column: String,
    },

    /// `Table::add_row` was called with a row whose arity differs from the schema.
    #[error("row arity {actual} does not match schema arity {expected}")]
    SchemaMismatch {
        /// Number of columns the schema declares.
        expected: usize,
        /// Number of values the offending row carried.
        actual: usize,
    },

    /// The CSV path could not be read, or was empty.
    #[error("io failure: {0}")]
    IoFailure(String),

    /// A join key could not be hashed deterministically (currently: float `NaN`).
    #[error("invalid join key: {0}")]
    InvalidJoinKey(String),
}

impl From<std::io::Error> for BifrostError {
    fn from(error: std::io::Error) -> Self {
        BifrostError::IoFailure(error.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BifrostError>;
