//! The store trait all grid backends implement.
//!
//! This is the narrow contract the GraphQL layer consumes: metadata
//! enumeration at schema-build time, entry operations and predicate queries
//! at resolution time. Nothing else about the grid (replication, consistency,
//! persistence) is visible through it.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::CollectionDescriptor;

/// The main store trait that all grid backends must implement.
///
/// Keys and values are JSON values; collections with a composite value
/// constraint hold JSON objects shaped per their `TypeDescriptor`.
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use gridql_store::{GridStore, StoreError};
///
/// async fn first_person(store: &dyn GridStore) -> Result<Option<serde_json::Value>, StoreError> {
///     store.get("Person", &serde_json::json!("1")).await
/// }
/// ```
#[async_trait]
pub trait GridStore: Send + Sync {
    // ==================== Metadata ====================

    /// Enumerates the grid's root collections with their declared metadata.
    ///
    /// Called once per schema build; the returned descriptors are the sole
    /// input to schema synthesis.
    fn root_collections(&self) -> Vec<CollectionDescriptor>;

    /// Names of the fields of `collection`'s value type that carry a
    /// secondary index.
    ///
    /// Only these fields are offered as filter arguments in the synthesized
    /// schema. Unknown collections yield an empty list.
    fn indexed_fields(&self, collection: &str) -> Vec<String>;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;

    // ==================== Entry operations ====================

    /// Point lookup by key.
    ///
    /// Returns `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues or an unknown
    /// collection, not for missing entries.
    async fn get(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError>;

    /// Batched multi-key lookup.
    ///
    /// Returns the values found for the given keys; absent keys contribute
    /// nothing. Result order follows the backend's batch-get contract and is
    /// not guaranteed to match key order.
    async fn get_all(&self, collection: &str, keys: &[Value]) -> Result<Vec<Value>, StoreError>;

    /// Writes an entry, overwriting any existing value.
    ///
    /// Returns the previous value, or `None` on first write.
    async fn put(
        &self,
        collection: &str,
        key: &Value,
        value: &Value,
    ) -> Result<Option<Value>, StoreError>;

    /// Removes an entry.
    ///
    /// Returns the removed value, or `None` if the key was absent.
    async fn destroy(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError>;

    // ==================== Predicate queries ====================

    /// Runs a parameterized predicate query and returns the matching value
    /// records.
    ///
    /// The query text names the target collection; `bindings` supplies the
    /// `$1..$n` parameters in order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryFailed` for syntax, target, or type errors
    /// from the query engine.
    async fn query(&self, oql: &str, bindings: &[Value]) -> Result<Vec<Value>, StoreError>;
}

/// Type alias for a shared store trait object.
pub type DynStore = std::sync::Arc<dyn GridStore>;

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that GridStore is object-safe
    fn _assert_store_object_safe(_: &dyn GridStore) {}
}
