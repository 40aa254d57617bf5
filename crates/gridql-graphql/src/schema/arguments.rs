//! Argument synthesis for query and mutation fields.
//!
//! The `key` argument exists on every field; filter arguments exist only for
//! fields the store has indexed, which keeps every offered predicate
//! executable without a full scan.

use async_graphql::dynamic::{InputValue, TypeRef};
use gridql_store::{FieldType, ScalarKind, TypeDescriptor};

use super::scalars::scalar_type_name;

/// The `key` argument for singular fields.
pub(crate) fn key_argument(kind: ScalarKind) -> InputValue {
    InputValue::new("key", TypeRef::named(scalar_type_name(kind)))
}

/// The `key` list argument for plural fields.
pub(crate) fn key_list_argument(kind: ScalarKind) -> InputValue {
    InputValue::new("key", TypeRef::named_list(scalar_type_name(kind)))
}

/// One equality-predicate argument per indexed, scalar-mappable field.
pub(crate) fn field_arguments(
    descriptor: &TypeDescriptor,
    indexed: &[String],
) -> Vec<InputValue> {
    indexed_scalar_fields(descriptor, indexed)
        .map(|(name, kind)| InputValue::new(name, TypeRef::named(scalar_type_name(kind))))
        .collect()
}

/// The list-typed counterparts used on plural fields, where each bound value
/// contributes to one set-membership predicate.
pub(crate) fn list_field_arguments(
    descriptor: &TypeDescriptor,
    indexed: &[String],
) -> Vec<InputValue> {
    indexed_scalar_fields(descriptor, indexed)
        .map(|(name, kind)| InputValue::new(name, TypeRef::named_list(scalar_type_name(kind))))
        .collect()
}

fn indexed_scalar_fields<'a>(
    descriptor: &'a TypeDescriptor,
    indexed: &'a [String],
) -> impl Iterator<Item = (&'a str, ScalarKind)> {
    descriptor
        .plain_fields()
        .filter(|f| indexed.iter().any(|i| i == &f.name))
        .filter_map(|f| match &f.field_type {
            FieldType::Scalar(kind) => Some((f.name.as_str(), *kind)),
            FieldType::Composite(_) => None,
        })
}
