//! Error types for GraphQL operations.
//!
//! Most failures inside resolvers never reach this type: the resolution
//! layer degrades to empty results by design. What remains here is the
//! schema lifecycle and transport-visible failures.

use std::fmt;

/// Errors that can occur during GraphQL operations.
#[derive(Debug)]
pub enum GraphQLError {
    /// Schema build failed.
    SchemaBuildFailed(String),

    /// Invalid query syntax or malformed request framing.
    InvalidQuery(String),

    /// Store error outside the best-effort resolution paths.
    Store(String),

    /// Internal server error.
    Internal(String),
}

impl fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaBuildFailed(msg) => {
                write!(f, "Failed to build GraphQL schema: {msg}")
            }
            Self::InvalidQuery(msg) => {
                write!(f, "Invalid GraphQL query: {msg}")
            }
            Self::Store(msg) => {
                write!(f, "Store error: {msg}")
            }
            Self::Internal(msg) => {
                write!(f, "Internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for GraphQLError {}

impl GraphQLError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SchemaBuildFailed(_) => 500,
            Self::InvalidQuery(_) => 400,
            Self::Store(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<gridql_store::StoreError> for GraphQLError {
    fn from(err: gridql_store::StoreError) -> Self {
        Self::Store(err.to_string())
    }
}
