//! Record transformation engine
//!
//! This module implements the core transformation operation: given a source
//! record, produce a new record where selected fields are replaced by the
//! output of a registered field transformer and where additional computed
//! fields are synthesized from the whole source record.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

pub mod builder;
pub mod built_in;
pub mod registry;


pub use builder::Transformer;
pub use registry::{ComputedFn, ComputedMap, FieldFn, FieldMap};

use crate::{CollisionPolicy, Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// A JSON object record, with keys enumerated in insertion order
pub type Record = Map<String, Value>;

/// Transform a source record through a field map and a computed map
///
/// Every source field appears in the result exactly once: replaced by its
/// field transformer's output when one is registered, copied verbatim
/// otherwise. Every computed-map entry then contributes one new field
/// derived from the whole source record. The source is never mutated.
///
/// Result key order is source keys first, in source order, followed by
/// computed keys in registration order.
///
/// Empty maps are fine: `transform(src, &FieldMap::new(), &ComputedMap::new())`
/// is an identity copy of `src`.
///
/// # Errors
///
/// - [`Error::ConflictingKey`] if a computed-map key is already a source
///   field (this entry point uses [`CollisionPolicy::Reject`]; see
///   [`Transformer`] for the `Overwrite` mode)
/// - any error returned by a field or computed transformer, propagated
///   unmodified; no partial result is produced
///
/// # Example
///
/// ```
/// use reshape_core::{transform, ComputedMap, FieldMap};
/// use serde_json::json;
///
/// # fn main() -> reshape_core::Result<()> {
/// let source = json!({"name": "ada", "score": 41});
/// let field_map = FieldMap::new().with("name", |v, _| {
///     Ok(json!(v.as_str().unwrap_or_default().to_uppercase()))
/// });
/// let computed_map = ComputedMap::new()
///     .with("next_score", |src| Ok(json!(src["score"].as_i64().unwrap_or(0) + 1)));
///
/// let result = transform(source.as_object().unwrap(), &field_map, &computed_map)?;
/// assert_eq!(result["name"], json!("ADA"));
/// assert_eq!(result["next_score"], json!(42));
/// # Ok(())
/// # }
/// ```
pub fn transform(
    source: &Record,
    field_map: &FieldMap,
    computed_map: &ComputedMap,
) -> Result<Record> {
    transform_with(source, field_map, computed_map, CollisionPolicy::Reject)
}

/// Like [`transform`], but accepting any JSON value as the source
///
/// # Errors
///
/// In addition to the [`transform`] errors, fails with
/// [`Error::InvalidSource`] when `source` is not a JSON object. Non-object
/// values are never coerced into records.
pub fn transform_value(
    source: &Value,
    field_map: &FieldMap,
    computed_map: &ComputedMap,
) -> Result<Value> {
    let record = expect_record(source)?;
    transform(record, field_map, computed_map).map(Value::Object)
}

/// Transform a source record and deserialize the result into `T`
///
/// The typed counterpart of [`transform`]: the caller names the result
/// shape as a Rust type and a shape mismatch surfaces as [`Error::Json`].
pub fn transform_as<T>(
    source: &Record,
    field_map: &FieldMap,
    computed_map: &ComputedMap,
) -> Result<T>
where
    T: DeserializeOwned,
{
    let result = transform(source, field_map, computed_map)?;
    serde_json::from_value(Value::Object(result)).map_err(Error::from)
}

/// Core traversal, parameterized by collision policy
pub(crate) fn transform_with(
    source: &Record,
    field_map: &FieldMap,
    computed_map: &ComputedMap,
    policy: CollisionPolicy,
) -> Result<Record> {
    // Collision validation happens before any transformer runs, so a
    // rejected call has no observable effects.
    if policy == CollisionPolicy::Reject {
        if let Some(key) = computed_map.keys().find(|k| source.contains_key(*k)) {
            return Err(Error::ConflictingKey {
                key: key.to_string(),
            });
        }
    }

    debug!(
        fields = source.len(),
        mapped = field_map.len(),
        computed = computed_map.len(),
        %policy,
        "transforming record"
    );

    let mut result = Record::new();
    for (key, value) in source {
        if let Some(transformer) = field_map.get(key) {
            trace!(%key, "applying field transformer");
            result.insert(key.clone(), transformer(value, source)?);
        } else {
            result.insert(key.clone(), value.clone());
        }
    }

    // Every computed key is processed; under Overwrite, inserting an
    // existing key replaces the value in place, keeping its source position.
    for (key, transformer) in computed_map.iter() {
        trace!(%key, "applying computed transformer");
        let computed = transformer(source)?;
        result.insert(key.to_string(), computed);
    }

    Ok(result)
}

pub(crate) fn expect_record(source: &Value) -> Result<&Record> {
    source.as_object().ok_or_else(|| Error::InvalidSource {
        message: format!("expected a JSON object, got {}", value_kind(source)),
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
