//! Predicate query construction and execution.
//!
//! The only two query shapes the resolution layer ever sends to the store
//! are built here, so the wire text has a single source of truth. Failures
//! carry a named classification: callers can tell "legitimately no rows"
//! (empty `Ok`) apart from "store rejected the query" (`Err`), even though
//! both surface to the graph caller as empty results.

use gridql_store::DynStore;
use serde_json::Value;
use tracing::warn;

/// A predicate query the store refused or failed to execute.
#[derive(Debug)]
pub(crate) enum PredicateError {
    ExecutionFailed {
        /// The query text that was issued.
        query: String,
        /// The store's failure description.
        message: String,
    },
}

impl PredicateError {
    /// Logs the failure at the degraded-path level.
    pub(crate) fn log(&self) {
        match self {
            Self::ExecutionFailed { query, message } => {
                warn!(query = %query, error = %message, "Predicate query failed, returning empty result");
            }
        }
    }
}

/// Equality predicate text for one field of a collection.
pub(crate) fn equality_query(collection: &str, field: &str) -> String {
    format!("SELECT DISTINCT * FROM /{collection} x where x.{field}=$1")
}

/// Set-membership predicate text over `arity` bound values.
pub(crate) fn membership_query(collection: &str, field: &str, arity: usize) -> String {
    let params: Vec<String> = (1..=arity).map(|i| format!("${i}")).collect();
    format!(
        "SELECT DISTINCT * FROM /{collection} x where x.{field} IN set({})",
        params.join(", ")
    )
}

/// Runs `field = value` against a collection, returning all matches.
pub(crate) async fn select_where_eq(
    store: &DynStore,
    collection: &str,
    field: &str,
    value: &Value,
) -> Result<Vec<Value>, PredicateError> {
    let query = equality_query(collection, field);
    store
        .query(&query, std::slice::from_ref(value))
        .await
        .map_err(|e| PredicateError::ExecutionFailed {
            query,
            message: e.to_string(),
        })
}

/// Runs `field IN set(values...)` against a collection as one store query.
pub(crate) async fn select_where_in(
    store: &DynStore,
    collection: &str,
    field: &str,
    values: &[Value],
) -> Result<Vec<Value>, PredicateError> {
    let query = membership_query(collection, field, values.len());
    store
        .query(&query, values)
        .await
        .map_err(|e| PredicateError::ExecutionFailed {
            query,
            message: e.to_string(),
        })
}
