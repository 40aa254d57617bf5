//! # gridql-store
//!
//! Store abstraction layer for the GridQL server.
//!
//! This crate defines the traits and types that all grid backends must
//! implement. It does not contain any implementations - those are provided by
//! separate crates.
//!
//! ## Overview
//!
//! The main trait is [`GridStore`], which defines the contract for:
//! - Metadata enumeration (root collections, indexed fields)
//! - Entry operations (get, batched get, put, destroy)
//! - Parameterized predicate queries
//!
//! Collection metadata is expressed through [`CollectionDescriptor`] and the
//! descriptor types in [`types`]: an explicit, pre-computed view over a value
//! type's fields and markers. The GraphQL layer consumes only these
//! descriptors, never runtime value introspection.
//!
//! ## Example
//!
//! ```ignore
//! use gridql_store::{DynStore, StoreError};
//! use serde_json::json;
//!
//! async fn lookup(store: &DynStore) -> Result<(), StoreError> {
//!     let hit = store.get("Person", &json!("1")).await?;
//!     println!("{hit:?}");
//!     Ok(())
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::StoreError;
pub use traits::{DynStore, GridStore};
pub use types::{
    CollectionDescriptor, FieldDescriptor, FieldType, ScalarKind, TypeDescriptor, ValueConstraint,
};

/// Type alias for a store result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use gridql_store::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::StoreError;
    pub use crate::traits::{DynStore, GridStore};
    pub use crate::types::{
        CollectionDescriptor, FieldDescriptor, FieldType, ScalarKind, TypeDescriptor,
        ValueConstraint,
    };
    pub use crate::StoreResult;
}
