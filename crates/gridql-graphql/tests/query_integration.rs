//! Integration tests for the GraphQL resolution layer.
//!
//! These tests verify the complete flow from schema synthesis through
//! resolution against a real in-memory grid, including the exact predicate
//! text issued to the store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gridql_db_memory::MemoryGrid;
use gridql_graphql::{QueryExecutor, SchemaBuilderConfig};
use gridql_store::{
    CollectionDescriptor, DynStore, FieldDescriptor, GridStore, ScalarKind, StoreError,
    TypeDescriptor,
};
use serde_json::{json, Value};

// =============================================================================
// Recording store
// =============================================================================

/// Wraps the memory grid and records every predicate query issued to it.
struct RecordingStore {
    inner: MemoryGrid,
    queries: Mutex<Vec<(String, Vec<Value>)>>,
}

impl RecordingStore {
    fn new(inner: MemoryGrid) -> Self {
        Self {
            inner,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn recorded_queries(&self) -> Vec<(String, Vec<Value>)> {
        self.queries.lock().expect("queries lock").clone()
    }
}

#[async_trait]
impl GridStore for RecordingStore {
    fn root_collections(&self) -> Vec<CollectionDescriptor> {
        self.inner.root_collections()
    }

    fn indexed_fields(&self, collection: &str) -> Vec<String> {
        self.inner.indexed_fields(collection)
    }

    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn get(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError> {
        self.inner.get(collection, key).await
    }

    async fn get_all(&self, collection: &str, keys: &[Value]) -> Result<Vec<Value>, StoreError> {
        self.inner.get_all(collection, keys).await
    }

    async fn put(
        &self,
        collection: &str,
        key: &Value,
        value: &Value,
    ) -> Result<Option<Value>, StoreError> {
        self.inner.put(collection, key, value).await
    }

    async fn destroy(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError> {
        self.inner.destroy(collection, key).await
    }

    async fn query(&self, oql: &str, bindings: &[Value]) -> Result<Vec<Value>, StoreError> {
        self.queries
            .lock()
            .expect("queries lock")
            .push((oql.to_string(), bindings.to_vec()));
        self.inner.query(oql, bindings).await
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn person_type() -> TypeDescriptor {
    TypeDescriptor::new("Person")
        .with_field(FieldDescriptor::scalar("id", ScalarKind::String))
        .with_field(FieldDescriptor::scalar("firstName", ScalarKind::String).with_doc("Given name"))
        .with_field(FieldDescriptor::scalar("age", ScalarKind::Int))
        .with_field(FieldDescriptor::composite(
            "address",
            TypeDescriptor::new("Address")
                .with_field(FieldDescriptor::scalar("city", ScalarKind::String)),
        ))
        .with_field(FieldDescriptor::connection(
            "friends",
            ScalarKind::String,
            "Person",
        ))
}

fn seeded_grid() -> MemoryGrid {
    MemoryGrid::new()
        .with_region(
            CollectionDescriptor::new("Person").with_value_type(person_type()),
            vec!["firstName".to_string()],
        )
        .with_region(CollectionDescriptor::new("Foo"), vec![])
}

async fn seed_people(store: &dyn GridStore) {
    let people = [
        json!({"id": "1", "firstName": "Luke", "age": 23,
               "address": {"city": "Mos Eisley"}, "friends": ["2", "3"]}),
        json!({"id": "2", "firstName": "Leia", "age": 23, "friends": ["1"]}),
        json!({"id": "3", "firstName": "Han", "age": 32, "friends": []}),
    ];
    for person in people {
        store
            .put("Person", &person["id"], &person)
            .await
            .expect("seed person");
    }
    store.put("Foo", &json!("1"), &json!("One")).await.unwrap();
    store.put("Foo", &json!("2"), &json!("Two")).await.unwrap();
}

async fn executor_for(store: DynStore) -> QueryExecutor {
    QueryExecutor::new(store, SchemaBuilderConfig::default())
        .await
        .expect("schema should build")
}

fn data(response: &async_graphql::Response) -> Value {
    serde_json::to_value(&response.data).expect("data serializes")
}

// =============================================================================
// Query side
// =============================================================================

#[tokio::test]
async fn single_key_read_returns_entry() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store.clone()).await;

    let response = executor
        .execute(r#"{ Person(key: "1") { id firstName age } }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(
        data(&response)["Person"],
        json!({"id": "1", "firstName": "Luke", "age": 23})
    );
    // A key lookup never touches the query engine
    assert!(store.recorded_queries().is_empty());
}

#[tokio::test]
async fn equality_predicate_issues_exact_query_text() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store.clone()).await;

    let response = executor
        .execute(r#"{ Person(firstName: "Luke") { id firstName } }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(
        data(&response)["Person"],
        json!({"id": "1", "firstName": "Luke"})
    );

    let queries = store.recorded_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(
        queries[0].0,
        "SELECT DISTINCT * FROM /Person x where x.firstName=$1"
    );
    assert_eq!(queries[0].1, vec![json!("Luke")]);
}

#[tokio::test]
async fn key_takes_precedence_over_field_predicates() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store.clone()).await;

    let response = executor
        .execute(r#"{ Person(key: "1", firstName: "Leia") { id } }"#)
        .await;
    assert!(response.errors.is_empty());
    assert_eq!(data(&response)["Person"]["id"], json!("1"));
    assert!(store.recorded_queries().is_empty());
}

#[tokio::test]
async fn unbound_singular_read_yields_empty_object() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let response = executor.execute("{ Person { id firstName } }").await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(
        data(&response)["Person"],
        json!({"id": null, "firstName": null})
    );
}

#[tokio::test]
async fn batch_key_read_returns_all_values() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let response = executor.execute(r#"{ Foos(key: ["1", "2"]) }"#).await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);

    let mut values: Vec<String> = data(&response)["Foos"]
        .as_array()
        .expect("list result")
        .iter()
        .map(|v| v.as_str().unwrap_or_default().to_string())
        .collect();
    values.sort();
    assert_eq!(values, vec!["One", "Two"]);
}

#[tokio::test]
async fn batch_predicate_issues_one_membership_query() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store.clone()).await;

    let response = executor
        .execute(r#"{ Persons(firstName: ["Luke", "Han"]) { id } }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(data(&response)["Persons"].as_array().unwrap().len(), 2);

    let queries = store.recorded_queries();
    assert_eq!(queries.len(), 1, "one store query for the whole value list");
    assert_eq!(
        queries[0].0,
        "SELECT DISTINCT * FROM /Person x where x.firstName IN set($1, $2)"
    );
    assert_eq!(queries[0].1, vec![json!("Luke"), json!("Han")]);
}

#[tokio::test]
async fn unbound_plural_read_yields_empty_list() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let response = executor.execute("{ Persons { id } }").await;
    assert!(response.errors.is_empty());
    assert_eq!(data(&response)["Persons"], json!([]));
}

#[tokio::test]
async fn connection_field_resolves_by_batch_lookup() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let response = executor
        .execute(r#"{ Person(key: "1") { id friends { id firstName } } }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);

    let friends = data(&response)["Person"]["friends"]
        .as_array()
        .expect("friends list")
        .clone();
    let mut names: Vec<String> = friends
        .iter()
        .map(|f| f["firstName"].as_str().unwrap_or_default().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Han", "Leia"]);
}

#[tokio::test]
async fn empty_connection_field_skips_the_store() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let response = executor
        .execute(r#"{ Person(key: "3") { id friends { id } } }"#)
        .await;
    assert!(response.errors.is_empty());
    assert_eq!(data(&response)["Person"]["friends"], json!([]));
}

#[tokio::test]
async fn nested_composite_fields_resolve() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let response = executor
        .execute(r#"{ Person(key: "1") { address { city } } }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(
        data(&response)["Person"]["address"]["city"],
        json!("Mos Eisley")
    );
}

// =============================================================================
// Mutation side
// =============================================================================

#[tokio::test]
async fn put_then_read_scalar_round_trip() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    let executor = executor_for(store).await;

    let response = executor
        .execute(r#"mutation { putFoo(key: "1", value: "One") }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(data(&response)["putFoo"], json!("One"));

    let response = executor.execute(r#"{ Foo(key: "1") }"#).await;
    assert_eq!(data(&response)["Foo"], json!("One"));
}

#[tokio::test]
async fn create_composite_from_input_object() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    let executor = executor_for(store).await;

    let response = executor
        .execute(
            r#"mutation {
                createPerson(key: "9", Person: {id: "9", firstName: "Rey", age: 19}) {
                    id firstName
                }
            }"#,
        )
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(
        data(&response)["createPerson"],
        json!({"id": "9", "firstName": "Rey"})
    );

    let response = executor.execute(r#"{ Person(key: "9") { firstName } }"#).await;
    assert_eq!(data(&response)["Person"]["firstName"], json!("Rey"));
}

#[tokio::test]
async fn create_without_key_yields_empty_representation() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    let executor = executor_for(store).await;

    let response = executor
        .execute(r#"mutation { createPerson(Person: {id: "9"}) { id } }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(data(&response)["createPerson"], json!({"id": null}));
}

#[tokio::test]
async fn put_overwrites_and_returns_written_value() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let response = executor
        .execute(
            r#"mutation {
                putPerson(key: "1", Person: {id: "1", firstName: "Anakin"}) { firstName }
            }"#,
        )
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    // The written value comes back, not the previous entry
    assert_eq!(data(&response)["putPerson"]["firstName"], json!("Anakin"));
}

#[tokio::test]
async fn destroy_returns_removed_value() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store.clone()).await;

    let response = executor
        .execute(r#"mutation { destroyPerson(key: "3") { id firstName } }"#)
        .await;
    assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
    assert_eq!(data(&response)["destroyPerson"]["firstName"], json!("Han"));

    assert_eq!(store.get("Person", &json!("3")).await.unwrap(), None);
}

#[tokio::test]
async fn destroy_without_key_yields_empty_representation() {
    let store = Arc::new(RecordingStore::new(seeded_grid()));
    seed_people(store.as_ref()).await;
    let executor = executor_for(store.clone()).await;

    let response = executor
        .execute("mutation { destroyPerson { id } }")
        .await;
    assert!(response.errors.is_empty());
    assert_eq!(data(&response)["destroyPerson"], json!({"id": null}));
    // Nothing was removed
    assert!(store.get("Person", &json!("1")).await.unwrap().is_some());
}

// =============================================================================
// Degradation
// =============================================================================

/// A store whose query engine always fails.
struct FailingQueryStore {
    inner: MemoryGrid,
}

#[async_trait]
impl GridStore for FailingQueryStore {
    fn root_collections(&self) -> Vec<CollectionDescriptor> {
        self.inner.root_collections()
    }

    fn indexed_fields(&self, collection: &str) -> Vec<String> {
        self.inner.indexed_fields(collection)
    }

    fn backend_name(&self) -> &'static str {
        "failing-query"
    }

    async fn get(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError> {
        self.inner.get(collection, key).await
    }

    async fn get_all(&self, collection: &str, keys: &[Value]) -> Result<Vec<Value>, StoreError> {
        self.inner.get_all(collection, keys).await
    }

    async fn put(
        &self,
        collection: &str,
        key: &Value,
        value: &Value,
    ) -> Result<Option<Value>, StoreError> {
        self.inner.put(collection, key, value).await
    }

    async fn destroy(&self, collection: &str, key: &Value) -> Result<Option<Value>, StoreError> {
        self.inner.destroy(collection, key).await
    }

    async fn query(&self, _oql: &str, _bindings: &[Value]) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::query_failed("query engine unavailable"))
    }
}

#[tokio::test]
async fn failed_predicate_degrades_to_empty_not_error() {
    let store = Arc::new(FailingQueryStore {
        inner: seeded_grid(),
    });
    seed_people(store.as_ref()).await;
    let executor = executor_for(store).await;

    let singular = executor
        .execute(r#"{ Person(firstName: "Luke") { id } }"#)
        .await;
    assert!(singular.errors.is_empty(), "errors: {:?}", singular.errors);
    assert_eq!(data(&singular)["Person"], json!({"id": null}));

    let plural = executor
        .execute(r#"{ Persons(firstName: ["Luke"]) { id } }"#)
        .await;
    assert!(plural.errors.is_empty());
    assert_eq!(data(&plural)["Persons"], json!([]));
}

// =============================================================================
// Rebuild
// =============================================================================

/// A store whose collection set can grow between schema builds.
struct GrowingStore {
    collections: Mutex<Vec<CollectionDescriptor>>,
}

#[async_trait]
impl GridStore for GrowingStore {
    fn root_collections(&self) -> Vec<CollectionDescriptor> {
        self.collections.lock().expect("collections lock").clone()
    }

    fn indexed_fields(&self, _collection: &str) -> Vec<String> {
        Vec::new()
    }

    fn backend_name(&self) -> &'static str {
        "growing"
    }

    async fn get(&self, _collection: &str, _key: &Value) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    async fn get_all(&self, _collection: &str, _keys: &[Value]) -> Result<Vec<Value>, StoreError> {
        Ok(Vec::new())
    }

    async fn put(
        &self,
        _collection: &str,
        _key: &Value,
        _value: &Value,
    ) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    async fn destroy(&self, _collection: &str, _key: &Value) -> Result<Option<Value>, StoreError> {
        Ok(None)
    }

    async fn query(&self, _oql: &str, _bindings: &[Value]) -> Result<Vec<Value>, StoreError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn rebuild_exposes_collections_added_after_startup() {
    let store = Arc::new(GrowingStore {
        collections: Mutex::new(vec![CollectionDescriptor::new("Foo")]),
    });
    let executor = executor_for(store.clone()).await;

    assert!(executor.schema_sdl().contains("Foo("));
    assert!(!executor.schema_sdl().contains("Bar("));

    store
        .collections
        .lock()
        .unwrap()
        .push(CollectionDescriptor::new("Bar"));

    executor.rebuild().await.expect("rebuild should succeed");
    assert!(executor.schema_sdl().contains("Bar("));
}
