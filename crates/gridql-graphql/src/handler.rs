//! Axum HTTP handlers for the GraphQL endpoints.
//!
//! - `POST /graphql` - query endpoint (JSON body)
//! - `GET /graphql` - query endpoint (URL parameters, variables as a JSON
//!   string)
//! - `POST /graphql/schema` - re-runs schema synthesis against current grid
//!   metadata and responds with the new schema's SDL
//!
//! Malformed request framing is answered at this layer with a bad-request
//! response; everything past it follows the resolution layer's best-effort
//! policy.

use std::sync::Arc;

use async_graphql::Response;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GraphQLError;
use crate::executor::QueryExecutor;

/// State shared across GraphQL handlers.
#[derive(Clone)]
pub struct GraphQLState {
    /// The executor holding the current schema.
    pub executor: Arc<QueryExecutor>,
}

/// GraphQL request body.
#[derive(Debug, Deserialize)]
pub struct GraphQLRequest {
    /// The GraphQL query string.
    pub query: String,

    /// Optional operation name for multi-operation documents.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables for the query.
    pub variables: Option<serde_json::Value>,
}

/// Query parameters for GET requests.
#[derive(Debug, Deserialize)]
pub struct GraphQLQueryParams {
    /// The GraphQL query string.
    pub query: Option<String>,

    /// Optional operation name.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// GraphQL response framing.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        let data_json = serde_json::to_value(&resp.data).unwrap_or(serde_json::Value::Null);
        let data = if data_json.is_null() {
            None
        } else {
            Some(data_json)
        };

        let errors: Vec<serde_json::Value> = resp
            .errors
            .into_iter()
            .map(|e| {
                let mut error_obj = serde_json::json!({ "message": e.message });
                if !e.locations.is_empty() {
                    error_obj["locations"] =
                        serde_json::to_value(&e.locations).unwrap_or(serde_json::Value::Null);
                }
                if !e.path.is_empty() {
                    error_obj["path"] =
                        serde_json::to_value(&e.path).unwrap_or(serde_json::Value::Null);
                }
                error_obj
            })
            .collect();

        Self { data, errors }
    }
}

/// Handles POST requests to `/graphql`.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    Json(request): Json<GraphQLRequest>,
) -> impl IntoResponse {
    debug!("Processing GraphQL request");
    let response = state
        .executor
        .execute_request(
            &request.query,
            request.variables,
            request.operation_name.as_deref(),
        )
        .await;
    Json(GraphQLResponse::from(response))
}

/// Handles GET requests to `/graphql` with the query in URL parameters.
pub async fn graphql_handler_get(
    State(state): State<GraphQLState>,
    Query(params): Query<GraphQLQueryParams>,
) -> axum::response::Response {
    let request = match params_to_request(params) {
        Ok(request) => request,
        Err(e) => return error_response(&e).into_response(),
    };

    debug!("Processing GraphQL GET request");
    let response = state
        .executor
        .execute_request(
            &request.query,
            request.variables,
            request.operation_name.as_deref(),
        )
        .await;
    Json(GraphQLResponse::from(response)).into_response()
}

/// Handles POST requests to `/graphql/schema`: rebuilds the schema from
/// current grid metadata and returns its SDL.
pub async fn schema_rebuild_handler(State(state): State<GraphQLState>) -> axum::response::Response {
    match state.executor.rebuild().await {
        Ok(()) => (StatusCode::OK, state.executor.schema_sdl()).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Assembles the GraphQL routes around an executor.
pub fn routes(executor: Arc<QueryExecutor>) -> Router {
    let state = GraphQLState { executor };
    Router::new()
        .route("/graphql", post(graphql_handler).get(graphql_handler_get))
        .route("/graphql/schema", post(schema_rebuild_handler))
        .with_state(state)
}

fn params_to_request(params: GraphQLQueryParams) -> Result<GraphQLRequest, GraphQLError> {
    let query = params
        .query
        .ok_or_else(|| GraphQLError::InvalidQuery("missing query parameter".into()))?;

    let variables = match params.variables {
        Some(text) => Some(
            serde_json::from_str(&text)
                .map_err(|e| GraphQLError::InvalidQuery(format!("invalid variables: {e}")))?,
        ),
        None => None,
    };

    Ok(GraphQLRequest {
        query,
        operation_name: params.operation_name,
        variables,
    })
}

fn error_response(error: &GraphQLError) -> (StatusCode, Json<serde_json::Value>) {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(serde_json::json!({
            "errors": [{
                "message": error.to_string(),
                "extensions": { "code": error.error_code() }
            }]
        })),
    )
}
