//! Scalar type mapping.
//!
//! Maps the grid's native scalar families onto GraphQL scalar types. The
//! mapping is a total pure function over [`ScalarKind`]; "not a scalar" is
//! never an error here because field classification already split scalars
//! from composites upstream.

use async_graphql::dynamic::{Scalar, SchemaBuilder, TypeRef};
use gridql_store::{FieldType, ScalarKind};

/// The GraphQL type name for a native scalar family.
///
/// String, int, float, and boolean use the engine built-ins; everything else
/// is one of the custom scalars registered by [`register_scalars`].
#[must_use]
pub fn scalar_type_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::String => TypeRef::STRING,
        ScalarKind::Uuid => "Uuid",
        ScalarKind::Int => TypeRef::INT,
        ScalarKind::Short => "Short",
        ScalarKind::Long => "Long",
        ScalarKind::Float => TypeRef::FLOAT,
        ScalarKind::Boolean => TypeRef::BOOLEAN,
        ScalarKind::Date => "Date",
        ScalarKind::DateTime => "DateTime",
        ScalarKind::Instant => "Instant",
        ScalarKind::Decimal => "Decimal",
    }
}

/// The scalar kind of a field, or `None` for composite fields.
///
/// This is the classification the object type builder branches on: `None`
/// selects the embedded-object path.
#[must_use]
pub fn field_scalar(field_type: &FieldType) -> Option<ScalarKind> {
    match field_type {
        FieldType::Scalar(kind) => Some(*kind),
        FieldType::Composite(_) => None,
    }
}

/// Registers the custom scalar types used by the synthesized schema.
pub fn register_scalars(builder: SchemaBuilder) -> SchemaBuilder {
    let scalars = [
        ("Short", "A 16-bit signed integer"),
        ("Long", "A 64-bit signed integer"),
        ("Date", "A calendar date"),
        ("DateTime", "A local date with time of day"),
        ("Instant", "A point on the UTC timeline"),
        ("Decimal", "An arbitrary precision decimal"),
    ];

    let mut builder = builder;
    for (name, description) in scalars {
        let scalar = Scalar::new(name).description(description);
        builder = builder.register(scalar);
    }

    // Uuid values must parse as RFC 4122 identifiers
    let uuid_scalar = Scalar::new("Uuid")
        .description("An RFC 4122 UUID")
        .validator(|value| {
            matches!(value, async_graphql::Value::String(s) if uuid::Uuid::parse_str(s).is_ok())
        });
    builder.register(uuid_scalar)
}
