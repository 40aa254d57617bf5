//! Object and input type synthesis for composite value types.
//!
//! Every object field traces back to a declared attribute: plain scalar
//! attributes map through the scalar table, composite attributes recurse one
//! level into an embedded type named after the attribute's own type, and
//! connection attributes become list fields referencing another collection's
//! value type by name. Connection references are resolved lazily when the
//! full schema is assembled, so a type may reference types not yet built.

use std::collections::HashMap;

use async_graphql::dynamic::{Field, FieldFuture, InputObject, InputValue, Object, TypeRef};
use async_graphql::Value;
use gridql_store::{FieldDescriptor, FieldType, TypeDescriptor};
use tracing::trace;

use super::scalars::scalar_type_name;
use super::type_cache::TypeCache;
use crate::resolvers::ConnectionResolver;

/// Builds the output object type for a composite value type, recursing into
/// nested composites through the cache.
///
/// A descriptor whose name is already claimed in this pass is skipped; the
/// caller's by-name reference resolves against the earlier build.
pub(crate) fn build_object_type(
    cache: &mut TypeCache,
    descriptor: &TypeDescriptor,
    referenced_types: &HashMap<String, String>,
) {
    if !cache.claim(&descriptor.name) {
        return;
    }
    trace!(type_name = %descriptor.name, "Generating object type");

    let mut object = Object::new(&descriptor.name);
    if let Some(doc) = &descriptor.doc {
        object = object.description(doc);
    }

    let mut has_fields = false;

    for field in descriptor.plain_fields() {
        let output = match &field.field_type {
            FieldType::Scalar(kind) => {
                attribute_field(field, TypeRef::named(scalar_type_name(*kind)))
            }
            FieldType::Composite(nested) => {
                build_object_type(cache, nested, referenced_types);
                attribute_field(field, TypeRef::named(nested.name.clone()))
            }
        };
        object = object.field(output);
        has_fields = true;
    }

    for field in descriptor.connection_fields() {
        let Some(target) = &field.connection else {
            continue;
        };
        // Element type resolves to the target collection's value type; the
        // reference stays lazy because the target may not be built yet.
        let element_type = referenced_types
            .get(target)
            .cloned()
            .unwrap_or_else(|| target.clone());

        let mut output = Field::new(
            &field.name,
            TypeRef::named_list(element_type),
            ConnectionResolver::resolve(target.clone(), field.name.clone()),
        );
        if let Some(doc) = &field.doc {
            output = output.description(doc);
        }
        object = object.field(output);
        has_fields = true;
    }

    // The graph engine requires at least one field per object type
    if !has_fields {
        object = object.field(placeholder_field());
    }

    cache.add_object(object);
}

/// Builds the input object type for a composite value type and returns its
/// name (`{Type}Input`). Connection fields are not accepted as input.
pub(crate) fn build_input_type(cache: &mut TypeCache, descriptor: &TypeDescriptor) -> String {
    let input_name = format!("{}Input", descriptor.name);
    if !cache.claim(&input_name) {
        return input_name;
    }
    trace!(type_name = %input_name, "Generating input type");

    let mut input = InputObject::new(&input_name);
    if let Some(doc) = &descriptor.doc {
        input = input.description(doc);
    }

    let mut has_fields = false;
    for field in descriptor.plain_fields() {
        let mut value = match &field.field_type {
            FieldType::Scalar(kind) => {
                InputValue::new(&field.name, TypeRef::named(scalar_type_name(*kind)))
            }
            FieldType::Composite(nested) => {
                let nested_name = build_input_type(cache, nested);
                InputValue::new(&field.name, TypeRef::named(nested_name))
            }
        };
        if let Some(doc) = &field.doc {
            value = value.description(doc);
        }
        input = input.field(value);
        has_fields = true;
    }

    if !has_fields {
        input = input.field(
            InputValue::new("_placeholder", TypeRef::named(TypeRef::STRING))
                .description("Placeholder - type has no declared attributes"),
        );
    }

    cache.add_input(input);
    input_name
}

/// An output field that reads the same-named attribute off the resolved
/// parent record.
fn attribute_field(field: &FieldDescriptor, type_ref: TypeRef) -> Field {
    let field_name = field.name.clone();
    let mut output = Field::new(&field.name, type_ref, move |ctx| {
        let field_name = field_name.clone();
        FieldFuture::new(async move {
            if let Some(parent) = ctx.parent_value.as_value()
                && let Value::Object(record) = parent
            {
                return Ok(record.get(field_name.as_str()).cloned());
            }
            Ok(None)
        })
    });
    if let Some(doc) = &field.doc {
        output = output.description(doc);
    }
    output
}

/// Hidden field added to otherwise-empty object types.
fn placeholder_field() -> Field {
    Field::new("_placeholder", TypeRef::named(TypeRef::STRING), |_ctx| {
        FieldFuture::new(async { Ok(None::<Value>) })
    })
    .description("Placeholder - type has no declared attributes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridql_store::ScalarKind;

    #[test]
    fn test_self_referential_type_is_built_once() {
        let descriptor = TypeDescriptor::new("Person")
            .with_field(FieldDescriptor::scalar("id", ScalarKind::String))
            .with_field(FieldDescriptor::connection(
                "friends",
                ScalarKind::String,
                "Person",
            ));
        let referenced =
            HashMap::from([("Person".to_string(), "Person".to_string())]);

        let mut cache = TypeCache::default();
        build_object_type(&mut cache, &descriptor, &referenced);
        build_object_type(&mut cache, &descriptor, &referenced);

        let (objects, _) = cache.into_types();
        assert_eq!(objects.len(), 1, "one cached type per value type");
    }

    #[test]
    fn test_nested_composite_produces_embedded_type() {
        let descriptor = TypeDescriptor::new("Person").with_field(FieldDescriptor::composite(
            "address",
            TypeDescriptor::new("Address")
                .with_field(FieldDescriptor::scalar("city", ScalarKind::String)),
        ));

        let mut cache = TypeCache::default();
        build_object_type(&mut cache, &descriptor, &HashMap::new());

        let (objects, _) = cache.into_types();
        let names: Vec<_> = objects.iter().map(|o| o.type_name().to_string()).collect();
        assert!(names.contains(&"Person".to_string()));
        assert!(names.contains(&"Address".to_string()));
    }

    #[test]
    fn test_empty_type_still_builds() {
        let mut cache = TypeCache::default();
        build_object_type(&mut cache, &TypeDescriptor::new("Empty"), &HashMap::new());
        let (objects, _) = cache.into_types();
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_input_types_mirror_plain_fields() {
        let descriptor = TypeDescriptor::new("Person")
            .with_field(FieldDescriptor::scalar("firstName", ScalarKind::String))
            .with_field(FieldDescriptor::connection(
                "friends",
                ScalarKind::String,
                "Person",
            ))
            .with_field(FieldDescriptor::composite(
                "address",
                TypeDescriptor::new("Address")
                    .with_field(FieldDescriptor::scalar("city", ScalarKind::String)),
            ));

        let mut cache = TypeCache::default();
        let name = build_input_type(&mut cache, &descriptor);
        assert_eq!(name, "PersonInput");

        let (_, inputs) = cache.into_types();
        let names: Vec<_> = inputs.iter().map(|i| i.type_name().to_string()).collect();
        assert!(names.contains(&"PersonInput".to_string()));
        assert!(names.contains(&"AddressInput".to_string()));
    }
}
