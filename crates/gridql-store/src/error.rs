//! Store error types for the grid abstraction layer.

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The named collection does not exist in the grid.
    #[error("Collection not found: {name}")]
    CollectionNotFound {
        /// The missing collection name.
        name: String,
    },

    /// The grid's query engine rejected or failed a predicate query.
    #[error("Query failed: {message}")]
    QueryFailed {
        /// Description of the failure (syntax, target, or type error).
        message: String,
    },

    /// A key or value did not satisfy the collection's declared constraints.
    #[error("Invalid entry: {message}")]
    InvalidEntry {
        /// Description of the violation.
        message: String,
    },

    /// An internal store error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `CollectionNotFound` error.
    #[must_use]
    pub fn collection_not_found(name: impl Into<String>) -> Self {
        Self::CollectionNotFound { name: name.into() }
    }

    /// Creates a new `QueryFailed` error.
    #[must_use]
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::QueryFailed {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidEntry` error.
    #[must_use]
    pub fn invalid_entry(message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a query failure.
    #[must_use]
    pub fn is_query_failed(&self) -> bool {
        matches!(self, Self::QueryFailed { .. })
    }

    /// Returns `true` if this is a missing-collection error.
    #[must_use]
    pub fn is_collection_not_found(&self) -> bool {
        matches!(self, Self::CollectionNotFound { .. })
    }
}
