//! GraphQL execution context.
//!
//! The context holds the dependencies resolvers need to execute a request:
//! the store handle and a request id for tracing. It is attached to every
//! request by the executor and read back through the async-graphql data
//! system.

use gridql_store::DynStore;

/// GraphQL execution context.
///
/// Constructed per-request; `Clone` and `Send + Sync` safe through the
/// shared store handle.
#[derive(Clone)]
pub struct GraphQLContext {
    /// Grid store handle.
    pub store: DynStore,

    /// Request ID for tracing and correlation.
    pub request_id: String,
}

impl GraphQLContext {
    /// Creates a new builder for `GraphQLContext`.
    #[must_use]
    pub fn builder() -> GraphQLContextBuilder {
        GraphQLContextBuilder::default()
    }
}

/// Builder for constructing [`GraphQLContext`].
#[derive(Default)]
pub struct GraphQLContextBuilder {
    store: Option<DynStore>,
    request_id: Option<String>,
}

impl GraphQLContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store handle.
    #[must_use]
    pub fn with_store(mut self, store: DynStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the request ID.
    #[must_use]
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Builds the `GraphQLContext`.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<GraphQLContext, ContextBuilderError> {
        let store = self
            .store
            .ok_or(ContextBuilderError::MissingField("store"))?;
        let request_id = self
            .request_id
            .ok_or(ContextBuilderError::MissingField("request_id"))?;

        Ok(GraphQLContext { store, request_id })
    }
}

/// Errors that can occur when building a `GraphQLContext`.
#[derive(Debug, thiserror::Error)]
pub enum ContextBuilderError {
    /// A required field was not provided.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_missing_store() {
        let result = GraphQLContextBuilder::new()
            .with_request_id("req-1")
            .build();

        assert!(matches!(
            result,
            Err(ContextBuilderError::MissingField("store"))
        ));
    }
}
