//! # gridql-db-memory
//!
//! In-memory grid backend for GridQL.
//!
//! [`MemoryGrid`] implements the [`gridql_store::GridStore`] contract with
//! regions declared at construction time:
//!
//! - entry maps behind per-region `RwLock`s
//! - per-field inverted indexes for the declared indexed fields
//! - an executor for the two parameterized predicate shapes the resolution
//!   layer emits (field equality and `IN set(...)` membership)
//!
//! The backend is intended for development, testing, and small single-node
//! deployments; it does not persist or replicate.
//!
//! ## Example
//!
//! ```ignore
//! use gridql_db_memory::MemoryGrid;
//! use gridql_store::CollectionDescriptor;
//!
//! let grid = MemoryGrid::new()
//!     .with_region(CollectionDescriptor::new("Foo"), vec![]);
//! ```

mod oql;
mod store;

pub use store::MemoryGrid;
