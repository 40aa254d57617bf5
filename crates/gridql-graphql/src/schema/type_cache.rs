//! Per-build cache of generated GraphQL types.
//!
//! The cache is owned by one schema synthesis pass and dropped with it.
//! Checking the cache before recursing into a descriptor guarantees that
//! self-referential and repeated value types are built exactly once and that
//! recursion terminates.

use std::collections::HashSet;

use async_graphql::dynamic::{InputObject, Object};

/// Tracks the types generated during one synthesis pass.
#[derive(Default)]
pub(crate) struct TypeCache {
    /// Names already claimed (built or currently being built).
    claimed: HashSet<String>,
    /// Finished output object types awaiting schema registration.
    objects: Vec<Object>,
    /// Finished input object types awaiting schema registration.
    inputs: Vec<InputObject>,
}

impl TypeCache {
    /// Claims a type name for generation.
    ///
    /// Returns `false` if the name is already claimed, in which case the
    /// caller must not build the type again and should reference it by name.
    pub fn claim(&mut self, name: &str) -> bool {
        self.claimed.insert(name.to_string())
    }

    /// Stores a finished output object type.
    pub fn add_object(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Stores a finished input object type.
    pub fn add_input(&mut self, input: InputObject) {
        self.inputs.push(input);
    }

    /// Number of finished types.
    pub fn generated_count(&self) -> usize {
        self.objects.len() + self.inputs.len()
    }

    /// Consumes the cache, yielding all types for registration.
    pub fn into_types(self) -> (Vec<Object>, Vec<InputObject>) {
        (self.objects, self.inputs)
    }
}
