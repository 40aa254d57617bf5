//! # gridql-graphql
//!
//! GraphQL API layer for the GridQL server.
//!
//! This crate synthesizes a query/mutation schema from a grid store's
//! collection metadata and resolves incoming graph queries against the
//! store. It supports:
//!
//! - Singular and plural query fields per collection (point lookup, batched
//!   lookup, equality and set-membership predicates over indexed fields)
//! - create/put/destroy mutation fields per collection
//! - Connection fields resolved by batched lookups into other collections
//! - Custom scalar types for the grid's native scalar families
//!
//! ## Overview
//!
//! The schema is dynamically generated from [`gridql_store::GridStore`]
//! metadata - there are no static types. A synthesis pass enumerates root
//! collections, memoizes generated object/input types in a per-build cache,
//! and binds a resolution strategy to every field. The [`QueryExecutor`]
//! holds the product and replaces it atomically on rebuild.
//!
//! Resolution is deliberately best-effort: a store failure or missing
//! required argument contributes an empty result to the response rather
//! than failing the whole query.
//!
//! ## Endpoints
//!
//! - `POST /graphql` - query endpoint
//! - `GET /graphql` - query endpoint (URL parameters)
//! - `POST /graphql/schema` - explicit schema rebuild
//!
//! ## Configuration
//!
//! Add to `gridql.toml`:
//!
//! ```toml
//! [graphql]
//! enabled = true
//! max_depth = 15
//! max_complexity = 500
//! introspection = true
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`schema`] - Schema synthesis from collection metadata
//! - [`resolvers`] - Resolution strategies bound to schema fields
//! - [`executor`] - Schema holder and execution facade
//! - [`context`] - GraphQL execution context
//! - [`handler`] - Axum HTTP handlers
//! - [`error`] - Error types for GraphQL operations

pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod handler;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use config::GraphQLConfig;
pub use context::{GraphQLContext, GraphQLContextBuilder};
pub use error::GraphQLError;
pub use executor::QueryExecutor;
pub use handler::{graphql_handler, graphql_handler_get, routes, schema_rebuild_handler};
pub use schema::{SchemaBuilderConfig, SchemaSynthesizer};

/// Result type for GraphQL operations.
pub type Result<T> = std::result::Result<T, GraphQLError>;
