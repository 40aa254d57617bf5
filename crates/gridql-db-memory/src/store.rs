//! In-memory grid backend.
//!
//! Regions are declared up front with their metadata and index set; entry
//! state lives behind a per-region `RwLock`. Predicate queries consult the
//! per-field inverted indexes where one is declared and fall back to a
//! region scan otherwise.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use gridql_store::{CollectionDescriptor, GridStore, StoreError, ValueConstraint};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::oql;

/// Canonical text form of a key or index value.
///
/// JSON serialization keeps distinct scalars distinct (`"1"` vs `1`).
fn repr(value: &Value) -> String {
    value.to_string()
}

/// Resolves a dotted field path against a record.
fn field_value<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

#[derive(Default)]
struct RegionData {
    /// Canonical key text -> stored value.
    entries: HashMap<String, Value>,
    /// Indexed field -> canonical value text -> canonical key texts.
    indexes: HashMap<String, HashMap<String, HashSet<String>>>,
}

struct Region {
    descriptor: CollectionDescriptor,
    indexed: Vec<String>,
    data: RwLock<RegionData>,
}

impl Region {
    fn new(descriptor: CollectionDescriptor, indexed: Vec<String>) -> Self {
        let mut data = RegionData::default();
        for field in &indexed {
            data.indexes.insert(field.clone(), HashMap::new());
        }
        Self {
            descriptor,
            indexed,
            data: RwLock::new(data),
        }
    }
}

impl RegionData {
    fn index_insert(&mut self, key_repr: &str, value: &Value) {
        for (field, index) in &mut self.indexes {
            if let Some(fv) = field_value(value, field) {
                index
                    .entry(repr(fv))
                    .or_default()
                    .insert(key_repr.to_string());
            }
        }
    }

    fn index_remove(&mut self, key_repr: &str, value: &Value) {
        for (field, index) in &mut self.indexes {
            if let Some(fv) = field_value(value, field) {
                let value_repr = repr(fv);
                if let Some(keys) = index.get_mut(&value_repr) {
                    keys.remove(key_repr);
                    if keys.is_empty() {
                        index.remove(&value_repr);
                    }
                }
            }
        }
    }
}

/// In-memory implementation of [`GridStore`].
///
/// The region set is fixed at construction; entries mutate freely afterwards.
pub struct MemoryGrid {
    regions: HashMap<String, Region>,
}

impl MemoryGrid {
    /// Creates an empty grid with no regions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regions: HashMap::new(),
        }
    }

    /// Declares a region with its metadata and indexed field names.
    #[must_use]
    pub fn with_region(mut self, descriptor: CollectionDescriptor, indexed: Vec<String>) -> Self {
        let name = descriptor.name.clone();
        self.regions.insert(name, Region::new(descriptor, indexed));
        self
    }

    fn region(&self, name: &str) -> Result<&Region, StoreError> {
        self.regions
            .get(name)
            .ok_or_else(|| StoreError::collection_not_found(name))
    }

    /// Validates that a predicate field is declared on the region's value
    /// type. Scalar-valued regions have no fields to filter on.
    fn check_predicate_field(region: &Region, field: &str) -> Result<(), StoreError> {
        let top = field.split('.').next().unwrap_or(field);
        match region.descriptor.value_constraint() {
            ValueConstraint::Composite(td) if td.field(top).is_some() => Ok(()),
            ValueConstraint::Composite(td) => Err(StoreError::query_failed(format!(
                "no field {top} on type {}",
                td.name
            ))),
            ValueConstraint::Scalar(_) => Err(StoreError::query_failed(format!(
                "collection {} holds scalar values, cannot filter on {field}",
                region.descriptor.name
            ))),
        }
    }

    async fn select_matching(
        &self,
        region: &Region,
        field: &str,
        bindings: &[Value],
    ) -> Vec<Value> {
        let data = region.data.read().await;
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        if let Some(index) = data.indexes.get(field) {
            // Indexed path: union of the per-value posting sets
            for binding in bindings {
                if let Some(keys) = index.get(&repr(binding)) {
                    for key in keys {
                        if let Some(value) = data.entries.get(key)
                            && seen.insert(repr(value))
                        {
                            results.push(value.clone());
                        }
                    }
                }
            }
        } else {
            // Scan path for fields declared but not indexed
            for value in data.entries.values() {
                let matched = field_value(value, field)
                    .is_some_and(|fv| bindings.iter().any(|b| b == fv));
                if matched && seen.insert(repr(value)) {
                    results.push(value.clone());
                }
            }
        }

        results
    }
}

impl Default for MemoryGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GridStore for MemoryGrid {
    fn root_collections(&self) -> Vec<CollectionDescriptor> {
        let mut collections: Vec<CollectionDescriptor> = self
            .regions
            .values()
            .map(|r| r.descriptor.clone())
            .collect();
        collections.sort_by(|a, b| a.name.cmp(&b.name));
        collections
    }

    fn indexed_fields(&self, collection: &str) -> Vec<String> {
        self.regions
            .get(collection)
            .map(|r| r.indexed.clone())
            .unwrap_or_default()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError> {
        let region = self.region(collection)?;
        let data = region.data.read().await;
        Ok(data.entries.get(&repr(key)).cloned())
    }

    async fn get_all(&self, collection: &str, keys: &[Value]) -> Result<Vec<Value>, StoreError> {
        let region = self.region(collection)?;
        let data = region.data.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| data.entries.get(&repr(key)).cloned())
            .collect())
    }

    async fn put(
        &self,
        collection: &str,
        key: &Value,
        value: &Value,
    ) -> Result<Option<Value>, StoreError> {
        let region = self.region(collection)?;
        let key_repr = repr(key);
        trace!(collection, key = %key_repr, "put");

        let mut data = region.data.write().await;
        let previous = data.entries.insert(key_repr.clone(), value.clone());
        if let Some(ref old) = previous {
            data.index_remove(&key_repr, old);
        }
        data.index_insert(&key_repr, value);
        Ok(previous)
    }

    async fn destroy(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError> {
        let region = self.region(collection)?;
        let key_repr = repr(key);
        trace!(collection, key = %key_repr, "destroy");

        let mut data = region.data.write().await;
        let removed = data.entries.remove(&key_repr);
        if let Some(ref old) = removed {
            data.index_remove(&key_repr, old);
        }
        Ok(removed)
    }

    async fn query(&self, oql: &str, bindings: &[Value]) -> Result<Vec<Value>, StoreError> {
        let predicate = oql::parse(oql)?;
        if bindings.len() != predicate.arity {
            return Err(StoreError::query_failed(format!(
                "query references {} parameters but {} bindings were supplied",
                predicate.arity,
                bindings.len()
            )));
        }

        let region = self
            .regions
            .get(&predicate.collection)
            .ok_or_else(|| {
                StoreError::query_failed(format!("unknown collection /{}", predicate.collection))
            })?;
        Self::check_predicate_field(region, &predicate.field)?;

        let results = self
            .select_matching(region, &predicate.field, bindings)
            .await;
        debug!(
            collection = %predicate.collection,
            field = %predicate.field,
            matches = results.len(),
            "predicate query executed"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridql_store::{FieldDescriptor, ScalarKind, TypeDescriptor};
    use serde_json::json;

    fn person_region() -> CollectionDescriptor {
        CollectionDescriptor::new("Person").with_value_type(
            TypeDescriptor::new("Person")
                .with_field(FieldDescriptor::scalar("id", ScalarKind::String))
                .with_field(FieldDescriptor::scalar("firstName", ScalarKind::String))
                .with_field(FieldDescriptor::scalar("age", ScalarKind::Int)),
        )
    }

    fn grid() -> MemoryGrid {
        MemoryGrid::new()
            .with_region(person_region(), vec!["firstName".to_string()])
            .with_region(CollectionDescriptor::new("Foo"), vec![])
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let grid = grid();
        let prev = grid.put("Foo", &json!("1"), &json!("One")).await.unwrap();
        assert!(prev.is_none());

        let hit = grid.get("Foo", &json!("1")).await.unwrap();
        assert_eq!(hit, Some(json!("One")));

        let prev = grid.put("Foo", &json!("1"), &json!("Uno")).await.unwrap();
        assert_eq!(prev, Some(json!("One")));
    }

    #[tokio::test]
    async fn test_get_all_skips_missing_keys() {
        let grid = grid();
        grid.put("Foo", &json!("1"), &json!("One")).await.unwrap();
        grid.put("Foo", &json!("2"), &json!("Two")).await.unwrap();

        let mut values = grid
            .get_all("Foo", &[json!("1"), json!("3"), json!("2")])
            .await
            .unwrap();
        values.sort_by_key(|v| v.as_str().unwrap_or_default().to_string());
        assert_eq!(values, vec![json!("One"), json!("Two")]);
    }

    #[tokio::test]
    async fn test_destroy_returns_removed_value() {
        let grid = grid();
        grid.put("Foo", &json!("1"), &json!("One")).await.unwrap();

        let removed = grid.destroy("Foo", &json!("1")).await.unwrap();
        assert_eq!(removed, Some(json!("One")));
        assert_eq!(grid.get("Foo", &json!("1")).await.unwrap(), None);
        assert_eq!(grid.destroy("Foo", &json!("1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_distinct_key_representations() {
        let grid = grid();
        grid.put("Foo", &json!("1"), &json!("text key")).await.unwrap();
        grid.put("Foo", &json!(1), &json!("numeric key")).await.unwrap();

        assert_eq!(
            grid.get("Foo", &json!("1")).await.unwrap(),
            Some(json!("text key"))
        );
        assert_eq!(
            grid.get("Foo", &json!(1)).await.unwrap(),
            Some(json!("numeric key"))
        );
    }

    #[tokio::test]
    async fn test_equality_query_via_index() {
        let grid = grid();
        grid.put(
            "Person",
            &json!("1"),
            &json!({"id": "1", "firstName": "Luke", "age": 30}),
        )
        .await
        .unwrap();
        grid.put(
            "Person",
            &json!("2"),
            &json!({"id": "2", "firstName": "Leia", "age": 30}),
        )
        .await
        .unwrap();

        let results = grid
            .query(
                "SELECT DISTINCT * FROM /Person x where x.firstName=$1",
                &[json!("Luke")],
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["id"], json!("1"));
    }

    #[tokio::test]
    async fn test_equality_query_scans_unindexed_field() {
        let grid = grid();
        grid.put(
            "Person",
            &json!("1"),
            &json!({"id": "1", "firstName": "Luke", "age": 30}),
        )
        .await
        .unwrap();

        let results = grid
            .query(
                "SELECT DISTINCT * FROM /Person x where x.age=$1",
                &[json!(30)],
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_membership_query_single_round_trip() {
        let grid = grid();
        for (id, name) in [("1", "Luke"), ("2", "Leia"), ("3", "Han")] {
            grid.put(
                "Person",
                &json!(id),
                &json!({"id": id, "firstName": name, "age": 30}),
            )
            .await
            .unwrap();
        }

        let results = grid
            .query(
                "SELECT DISTINCT * FROM /Person x where x.firstName IN set($1, $2)",
                &[json!("Luke"), json!("Han")],
            )
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_query_rejects_unknown_field() {
        let grid = grid();
        let err = grid
            .query(
                "SELECT DISTINCT * FROM /Person x where x.nickname=$1",
                &[json!("Lu")],
            )
            .await
            .unwrap_err();
        assert!(err.is_query_failed());
    }

    #[tokio::test]
    async fn test_query_rejects_scalar_collection_target() {
        let grid = grid();
        let err = grid
            .query(
                "SELECT DISTINCT * FROM /Foo x where x.anything=$1",
                &[json!("x")],
            )
            .await
            .unwrap_err();
        assert!(err.is_query_failed());
    }

    #[tokio::test]
    async fn test_query_rejects_binding_count_mismatch() {
        let grid = grid();
        let err = grid
            .query(
                "SELECT DISTINCT * FROM /Person x where x.firstName=$1",
                &[],
            )
            .await
            .unwrap_err();
        assert!(err.is_query_failed());
    }

    #[tokio::test]
    async fn test_index_tracks_overwrites_and_removals() {
        let grid = grid();
        grid.put(
            "Person",
            &json!("1"),
            &json!({"id": "1", "firstName": "Luke"}),
        )
        .await
        .unwrap();
        grid.put(
            "Person",
            &json!("1"),
            &json!({"id": "1", "firstName": "Anakin"}),
        )
        .await
        .unwrap();

        let by_old_name = grid
            .query(
                "SELECT DISTINCT * FROM /Person x where x.firstName=$1",
                &[json!("Luke")],
            )
            .await
            .unwrap();
        assert!(by_old_name.is_empty());

        grid.destroy("Person", &json!("1")).await.unwrap();
        let by_new_name = grid
            .query(
                "SELECT DISTINCT * FROM /Person x where x.firstName=$1",
                &[json!("Anakin")],
            )
            .await
            .unwrap();
        assert!(by_new_name.is_empty());
    }

    #[test]
    fn test_metadata_enumeration() {
        let grid = grid();
        let names: Vec<_> = grid
            .root_collections()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Foo", "Person"]);
        assert_eq!(grid.indexed_fields("Person"), vec!["firstName"]);
        assert!(grid.indexed_fields("Nope").is_empty());
    }
}
