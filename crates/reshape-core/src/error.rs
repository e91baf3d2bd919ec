//! Error types for the reshape core library
//!
//! This module defines the error handling for reshape, using thiserror for
//! ergonomic error definitions and anyhow for opaque transformer error sources.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Main error type for reshape operations
#[derive(Error, Debug)]
pub enum Error {
    /// Source value is not an object-shaped record
    #[error("Invalid source: {message}")]
    InvalidSource { message: String },

    /// A computed-map key is already a field of the source record
    #[error("Conflicting key: computed field '{key}' is already a source field")]
    ConflictingKey { key: String },

    /// Failure raised inside a caller-supplied transformer function
    ///
    /// The core never constructs this variant on its own; it is how a
    /// transformer reports its failure, carried back to the caller verbatim.
    #[error("Transformer failed: {message}")]
    Transformer {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// JSON (de)serialization errors at the typed result boundary
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Policy for computed-map keys that coincide with source fields
///
/// `Reject` refuses the call before any transformer runs; `Overwrite` lets
/// the computed value replace the source-derived one in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionPolicy {
    /// Fail with `ConflictingKey` when a computed key is a source field
    #[default]
    Reject,
    /// Let the computed value replace the source-derived value
    Overwrite,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::Reject => write!(f, "Reject"),
            CollisionPolicy::Overwrite => write!(f, "Overwrite"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Transformer {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
