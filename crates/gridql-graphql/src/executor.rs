//! Query executor.
//!
//! A thin facade over the graph engine: it holds the current synthesized
//! schema and delegates execution to it. Schema replacement is an explicit
//! operation - `rebuild` re-runs the synthesis pass against the store's
//! current metadata and publishes the result with a single atomic pointer
//! swap, so in-flight queries always see one consistent, complete schema.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response, Variables};
use gridql_store::DynStore;
use tracing::info;

use crate::context::GraphQLContext;
use crate::error::GraphQLError;
use crate::schema::{SchemaBuilderConfig, SchemaSynthesizer};

/// Executes GraphQL requests against the schema synthesized from a grid
/// store.
pub struct QueryExecutor {
    store: DynStore,
    config: SchemaBuilderConfig,
    schema: ArcSwap<Schema>,
    request_counter: AtomicU64,
}

impl QueryExecutor {
    /// Creates an executor, running the initial schema synthesis.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial schema build fails.
    pub async fn new(store: DynStore, config: SchemaBuilderConfig) -> Result<Self, GraphQLError> {
        let schema = SchemaSynthesizer::new(store.clone(), config.clone())
            .build()
            .await?;
        info!(backend = store.backend_name(), "GraphQL schema built");

        Ok(Self {
            store,
            config,
            schema: ArcSwap::from_pointee(schema),
            request_counter: AtomicU64::new(0),
        })
    }

    /// Re-runs schema synthesis against the store's current metadata and
    /// swaps the held schema.
    ///
    /// Idempotent: rebuilding against unchanged metadata yields an
    /// equivalent schema. Queries running during the swap finish against
    /// the schema they started with.
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails; the previous schema stays
    /// published in that case.
    pub async fn rebuild(&self) -> Result<(), GraphQLError> {
        let schema = SchemaSynthesizer::new(self.store.clone(), self.config.clone())
            .build()
            .await?;
        self.schema.store(Arc::new(schema));
        info!("GraphQL schema rebuilt");
        Ok(())
    }

    /// The SDL of the currently published schema.
    #[must_use]
    pub fn schema_sdl(&self) -> String {
        self.schema.load().sdl()
    }

    /// Executes a query with no variables.
    pub async fn execute(&self, query: &str) -> Response {
        self.execute_request(query, None, None).await
    }

    /// Executes a query with optional variables and operation name.
    pub async fn execute_request(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
        operation_name: Option<&str>,
    ) -> Response {
        let schema = self.schema.load_full();

        let mut request = Request::new(query);
        if let Some(vars) = variables {
            request = request.variables(Variables::from_json(vars));
        }
        if let Some(name) = operation_name {
            request = request.operation_name(name);
        }

        let request_id = format!(
            "req-{}",
            self.request_counter.fetch_add(1, Ordering::Relaxed)
        );
        let context = GraphQLContext {
            store: self.store.clone(),
            request_id,
        };

        schema.execute(request.data(context)).await
    }
}
