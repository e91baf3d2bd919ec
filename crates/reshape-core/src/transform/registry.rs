//! Transformer registries keyed by field name
//!
//! A `FieldMap` holds transformers for existing source fields, a
//! `ComputedMap` holds transformers that synthesize new fields from the
//! whole source record. Both preserve registration order, which determines
//! the order computed fields appear in the result.
//!
//! Copyright (c) 2025 Reshape Team
//! Licensed under the Apache-2.0 license

use crate::Result;
use serde_json::Value;
use std::fmt;

use super::Record;

/// A field transformer: converts an existing field's value, with the full
/// source record available for context.
pub type FieldFn = dyn Fn(&Value, &Record) -> Result<Value> + Send + Sync;

/// A computed transformer: derives a new field's value from the full
/// source record.
pub type ComputedFn = dyn Fn(&Record) -> Result<Value> + Send + Sync;

/// Registry of field transformers keyed by source field name
///
/// Keys are expected to be a subset of the source record's fields; an entry
/// for a key the source does not have is inert — never invoked, never
/// reflected in the result.
///
/// Registering a key twice replaces the transformer but keeps the original
/// position, matching object-literal semantics.
#[derive(Default)]
pub struct FieldMap {
    entries: Vec<(String, Box<FieldFn>)>,
}

impl FieldMap {
    /// Create an empty field map
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a transformer for `key`, consuming and returning the map
    pub fn with<K, F>(mut self, key: K, transformer: F) -> Self
    where
        K: Into<String>,
        F: Fn(&Value, &Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(key, transformer);
        self
    }

    /// Register a transformer for `key`
    pub fn insert<K, F>(&mut self, key: K, transformer: F)
    where
        K: Into<String>,
        F: Fn(&Value, &Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert_boxed(key.into(), Box::new(transformer));
    }

    /// Register an already-boxed transformer for `key`
    pub fn insert_boxed(&mut self, key: String, transformer: Box<FieldFn>) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = transformer;
        } else {
            self.entries.push((key, transformer));
        }
    }

    /// Look up the transformer registered for `key`
    pub fn get(&self, key: &str) -> Option<&FieldFn> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, f)| f.as_ref())
    }

    /// Check whether `key` is directly registered in this map
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of registered transformers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl fmt::Debug for FieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMap")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registry of computed transformers keyed by new field name
///
/// Keys name fields that do not exist on the source record; whether a
/// coinciding key is an error is decided by the active
/// [`CollisionPolicy`](crate::CollisionPolicy).
#[derive(Default)]
pub struct ComputedMap {
    entries: Vec<(String, Box<ComputedFn>)>,
}

impl ComputedMap {
    /// Create an empty computed map
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a transformer for `key`, consuming and returning the map
    pub fn with<K, F>(mut self, key: K, transformer: F) -> Self
    where
        K: Into<String>,
        F: Fn(&Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert(key, transformer);
        self
    }

    /// Register a transformer for `key`
    pub fn insert<K, F>(&mut self, key: K, transformer: F)
    where
        K: Into<String>,
        F: Fn(&Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.insert_boxed(key.into(), Box::new(transformer));
    }

    /// Register an already-boxed transformer for `key`
    pub fn insert_boxed(&mut self, key: String, transformer: Box<ComputedFn>) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = transformer;
        } else {
            self.entries.push((key, transformer));
        }
    }

    /// Look up the transformer registered for `key`
    pub fn get(&self, key: &str) -> Option<&ComputedFn> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, f)| f.as_ref())
    }

    /// Check whether `key` is directly registered in this map
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Number of registered transformers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered keys, in registration order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComputedFn)> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f.as_ref()))
    }
}

impl fmt::Debug for ComputedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedMap")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_map_registration() {
        let map = FieldMap::new()
            .with("a", |v, _| Ok(v.clone()))
            .with("b", |v, _| Ok(v.clone()));

        assert_eq!(map.len(), 2);
        assert!(map.contains("a"));
        assert!(map.contains("b"));
        assert!(!map.contains("c"));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_field_map_replace_keeps_position() {
        let map = FieldMap::new()
            .with("a", |_, _| Ok(json!(1)))
            .with("b", |_, _| Ok(json!(2)))
            .with("a", |_, _| Ok(json!(3)));

        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);

        let src = Record::new();
        let replaced = map.get("a").unwrap()(&Value::Null, &src).unwrap();
        assert_eq!(replaced, json!(3));
    }

    #[test]
    fn test_field_map_get_invokes_transformer() {
        let map = FieldMap::new().with("name", |v, _| {
            Ok(json!(v.as_str().unwrap_or_default().to_uppercase()))
        });

        let src = Record::new();
        let out = map.get("name").unwrap()(&json!("ada"), &src).unwrap();
        assert_eq!(out, json!("ADA"));
        assert!(map.get("missing").is_none());
    }

    #[test]
    fn test_computed_map_order() {
        let map = ComputedMap::new()
            .with("second", |_| Ok(json!(2)))
            .with("first", |_| Ok(json!(1)));

        // Registration order, not alphabetical
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["second", "first"]);
    }

    #[test]
    fn test_computed_map_iter() {
        let map = ComputedMap::new().with("total", |src| Ok(json!(src.len())));

        let mut src = Record::new();
        src.insert("x".to_string(), json!(1));

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries.len(), 1);
        let (key, transformer) = entries[0];
        assert_eq!(key, "total");
        assert_eq!(transformer(&src).unwrap(), json!(1));
    }

    #[test]
    fn test_empty_maps() {
        assert!(FieldMap::new().is_empty());
        assert!(ComputedMap::new().is_empty());
        assert!(FieldMap::default().is_empty());
        assert!(ComputedMap::default().is_empty());
    }
}
