//! Schema synthesis from grid metadata.
//!
//! - `builder` - the synthesis pass over root collections
//! - `scalars` - native scalar to GraphQL scalar mapping
//! - `arguments` - key and indexed-field argument construction
//! - `object_type` - object/input type generation for composite values
//! - `type_cache` - per-build memoization of generated types

mod arguments;
mod builder;
mod object_type;
mod scalars;
mod type_cache;

pub use builder::{SchemaBuilderConfig, SchemaSynthesizer};
pub use scalars::{field_scalar, scalar_type_name};
