//! Reshape Core - record-shape transformation over JSON records
//!
//! This crate produces, from a source record, a new record where selected
//! fields are replaced by the output of caller-supplied field transformers
//! and where additional computed fields are synthesized from the whole
//! source record. The source is never mutated and the operation is
//! all-or-nothing: any transformer failure aborts the call with no partial
//! result.
//!
//! # Main Components
//!
//! - **Error Handling**: crate error enum via `thiserror`, with `anyhow`
//!   sources for opaque transformer failures
//! - **Transform Engine**: the [`transform`] family of operations, the
//!   [`FieldMap`]/[`ComputedMap`] registries, and the [`Transformer`]
//!   builder
//! - **Built-in Transformers**: stock conversions in
//!   [`transform::built_in`]
//!
//! # Example
//!
//! ```
//! use reshape_core::{Result, Transformer};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let source = json!({"name": "ada", "score": 41});
//!
//!     let result = Transformer::new()
//!         .field("name", |v, _| Ok(json!(v.as_str().unwrap_or_default().to_uppercase())))
//!         .computed("next_score", |src| Ok(json!(src["score"].as_i64().unwrap_or(0) + 1)))
//!         .transform_value(&source)?;
//!
//!     assert_eq!(result, json!({"name": "ADA", "score": 41, "next_score": 42}));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod transform;

// Re-export main types for convenience
pub use error::{CollisionPolicy, Error, Result};
pub use transform::{
    // Operations
    transform, transform_as, transform_value,

    // Registries and builder
    ComputedMap, FieldMap, Transformer,

    // Data shapes
    Record,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
