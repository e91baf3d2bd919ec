//! Builder bundling a field map, a computed map, and a collision policy
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::{CollisionPolicy, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::registry::{ComputedMap, FieldMap};
use super::{expect_record, transform_with, Record};

/// Reusable record transformer
///
/// Bundles the two transformer registries with the collision policy and
/// exposes the same operations as the free functions. A `Transformer` can
/// be applied to any number of records; it holds no per-call state.
///
/// # Example
///
/// ```
/// use reshape_core::Transformer;
/// use serde_json::json;
///
/// # fn main() -> reshape_core::Result<()> {
/// let transformer = Transformer::new()
///     .field("name", |v, _| Ok(json!(v.as_str().unwrap_or_default().to_uppercase())))
///     .computed("greeting", |src| {
///         Ok(json!(format!("hello {}", src["name"].as_str().unwrap_or_default())))
///     });
///
/// let result = transformer.transform_value(&json!({"name": "ada"}))?;
/// assert_eq!(result, json!({"name": "ADA", "greeting": "hello ada"}));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Transformer {
    field_map: FieldMap,
    computed_map: ComputedMap,
    policy: CollisionPolicy,
}

impl Transformer {
    /// Create a transformer with empty maps and the default collision policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field transformer for an existing source field
    pub fn field<K, F>(mut self, key: K, transformer: F) -> Self
    where
        K: Into<String>,
        F: Fn(&Value, &Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.field_map.insert(key, transformer);
        self
    }

    /// Register a computed transformer for a new field
    pub fn computed<K, F>(mut self, key: K, transformer: F) -> Self
    where
        K: Into<String>,
        F: Fn(&Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.computed_map.insert(key, transformer);
        self
    }

    /// Set the policy for computed keys that coincide with source fields
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The registered field map
    pub fn field_map(&self) -> &FieldMap {
        &self.field_map
    }

    /// The registered computed map
    pub fn computed_map(&self) -> &ComputedMap {
        &self.computed_map
    }

    /// Apply the transformer to a source record
    ///
    /// Semantics are those of [`transform`](super::transform), under this
    /// transformer's collision policy.
    pub fn transform(&self, source: &Record) -> Result<Record> {
        transform_with(source, &self.field_map, &self.computed_map, self.policy)
    }

    /// Apply the transformer to any JSON value
    ///
    /// Fails with [`Error::InvalidSource`](crate::Error::InvalidSource) when
    /// `source` is not a JSON object.
    pub fn transform_value(&self, source: &Value) -> Result<Value> {
        let record = expect_record(source)?;
        self.transform(record).map(Value::Object)
    }

    /// Apply the transformer and deserialize the result into `T`
    pub fn transform_as<T>(&self, source: &Record) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let result = self.transform(source)?;
        serde_json::from_value(Value::Object(result)).map_err(crate::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn sample_record() -> Record {
        json!({"a": 1, "b": "two"}).as_object().unwrap().clone()
    }

    #[test]
    fn test_builder_chain() {
        let transformer = Transformer::new()
            .field("a", |v, _| Ok(json!(v.as_i64().unwrap_or_default() + 1)))
            .computed("c", |_| Ok(json!(true)));

        assert_eq!(transformer.field_map().len(), 1);
        assert_eq!(transformer.computed_map().len(), 1);

        let result = transformer.transform(&sample_record()).unwrap();
        assert_eq!(result["a"], json!(2));
        assert_eq!(result["b"], json!("two"));
        assert_eq!(result["c"], json!(true));
    }

    #[test]
    fn test_default_policy_rejects_collisions() {
        let transformer = Transformer::new().computed("a", |_| Ok(json!(0)));

        let err = transformer.transform(&sample_record()).unwrap_err();
        assert!(matches!(err, Error::ConflictingKey { .. }));
    }

    #[test]
    fn test_overwrite_policy() {
        let transformer = Transformer::new()
            .computed("a", |_| Ok(json!("computed wins")))
            .computed("c", |_| Ok(json!("new field")))
            .collision_policy(CollisionPolicy::Overwrite);

        let result = transformer.transform(&sample_record()).unwrap();

        // The overwritten key keeps its source position; only genuinely new
        // keys are appended.
        assert_eq!(result.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(result["a"], json!("computed wins"));
        assert_eq!(result["c"], json!("new field"));
    }

    #[test]
    fn test_transformer_is_reusable() {
        let transformer =
            Transformer::new().field("a", |v, _| Ok(json!(v.as_i64().unwrap_or_default() * 10)));

        let first = transformer.transform(&sample_record()).unwrap();
        let second = transformer.transform(&sample_record()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first["a"], json!(10));
    }

    #[test]
    fn test_transform_value_requires_object() {
        let transformer = Transformer::new();
        let err = transformer.transform_value(&json!("not a record")).unwrap_err();
        assert!(matches!(err, Error::InvalidSource { .. }));
    }

    #[test]
    fn test_transform_as() {
        #[derive(Debug, serde::Deserialize)]
        struct Row {
            a: i64,
            b: String,
        }

        let transformer = Transformer::new();
        let row: Row = transformer.transform_as(&sample_record()).unwrap();
        assert_eq!(row.a, 1);
        assert_eq!(row.b, "two");
    }

    #[test]
    fn test_transformer_is_shareable_across_threads() {
        let transformer = std::sync::Arc::new(
            Transformer::new().computed("t", |_| Ok(json!("threaded"))),
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let transformer = transformer.clone();
                std::thread::spawn(move || transformer.transform(&sample_record()).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap()["t"], json!("threaded"));
        }
    }
}
