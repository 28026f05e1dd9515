//! Unified error type.
//!
//! The variants mirror how failures surface to clients: `InvalidParameter`
//! and `NotFound` render as the legacy plain-text messages with a 200 status,
//! everything else is a fatal 500 for the request that hit it. The `Display`
//! strings for the first two are the exact client-facing bodies, so handlers
//! can render `err.to_string()` without a translation table.

use thiserror::Error;

/// The error type returned by iss-tracker's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A non-integer (or negative) `offset`/`limit` query parameter.
    #[error("Invalid limit or offset parameter; must be an integer.")]
    InvalidParameter,

    /// No state vector matches the requested EPOCH key.
    #[error("Epoch not found.")]
    NotFound,

    /// A numeric or timestamp field in the dataset could not be interpreted.
    /// Never caught by the dispatcher; terminates the request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The dataset could not be retrieved, parsed, or is missing an expected
    /// substructure. Never caught by the dispatcher; terminates the request.
    #[error("dataset unavailable: {0}")]
    DataUnavailable(String),

    /// Infrastructure failure: binding a port or accepting a connection.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
