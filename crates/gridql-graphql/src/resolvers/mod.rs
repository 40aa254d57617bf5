//! Resolution strategies bound to synthesized schema fields.
//!
//! Query side: `read` (single-key / equality predicate), `list` (batched
//! keys / membership predicate), `connection` (parent key list to a second
//! collection). Mutation side: `create`, `put`, `destroy`.
//!
//! All strategies follow the same degradation policy: a store failure or a
//! missing required argument contributes an empty result to the response
//! instead of a graph-level error.

mod connection;
mod create;
mod destroy;
mod list;
mod predicate;
mod put;
mod read;

pub use connection::ConnectionResolver;
pub use create::{CreateResolver, ValueArgument};
pub use destroy::DestroyResolver;
pub use list::ListResolver;
pub use put::PutResolver;
pub use read::ReadResolver;

use async_graphql::dynamic::{ResolverContext, ValueAccessor};
use async_graphql::{Error as ResolverError, Value};

use crate::context::GraphQLContext;

/// Helper to extract the GraphQL context from a resolver context.
pub(crate) fn get_graphql_context<'a>(
    ctx: &'a ResolverContext<'_>,
) -> Result<&'a GraphQLContext, ResolverError> {
    ctx.data::<GraphQLContext>()
        .map_err(|_| ResolverError::new("GraphQL context not available"))
}

/// An argument that is present and non-null.
pub(crate) fn bound_arg<'a>(
    ctx: &'a ResolverContext<'_>,
    name: &str,
) -> Option<ValueAccessor<'a>> {
    ctx.args.get(name).filter(|v| !v.is_null())
}

/// The empty representation: an empty object for composite collections,
/// null for scalar collections.
pub(crate) fn empty_value(composite: bool) -> Option<Value> {
    if composite {
        Some(Value::Object(Default::default()))
    } else {
        None
    }
}

/// An empty list value for plural paths.
pub(crate) fn empty_list() -> Option<Value> {
    Some(Value::List(Vec::new()))
}

/// Convert a `serde_json::Value` to `async_graphql::Value`.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(
                    async_graphql::Number::from_f64(f)
                        .unwrap_or_else(|| async_graphql::Number::from(0)),
                )
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let map: async_graphql::indexmap::IndexMap<async_graphql::Name, Value> = obj
                .into_iter()
                .map(|(k, v)| (async_graphql::Name::new(k), json_to_graphql_value(v)))
                .collect();
            Value::Object(map)
        }
    }
}

/// Converts a GraphQL `Value` to `serde_json::Value`.
pub(crate) fn graphql_value_to_json(value: &Value) -> Result<serde_json::Value, ResolverError> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(serde_json::Value::Number(i.into()))
            } else if let Some(f) = n.as_f64() {
                Ok(serde_json::json!(f))
            } else {
                Ok(serde_json::Value::Null)
            }
        }
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::List(arr) => {
            let items: Result<Vec<serde_json::Value>, ResolverError> =
                arr.iter().map(graphql_value_to_json).collect();
            Ok(serde_json::Value::Array(items?))
        }
        Value::Object(obj) => {
            let mut map = serde_json::Map::new();
            for (k, v) in obj.iter() {
                map.insert(k.to_string(), graphql_value_to_json(v)?);
            }
            Ok(serde_json::Value::Object(map))
        }
        Value::Enum(e) => Ok(serde_json::Value::String(e.to_string())),
        Value::Binary(_) => Err(ResolverError::new("binary values are not supported")),
    }
}

/// Converts an argument accessor to `serde_json::Value`.
pub(crate) fn value_accessor_to_json(
    value: &ValueAccessor<'_>,
) -> Result<serde_json::Value, ResolverError> {
    if value.is_null() {
        return Ok(serde_json::Value::Null);
    }

    if let Ok(b) = value.boolean() {
        return Ok(serde_json::Value::Bool(b));
    }

    if let Ok(i) = value.i64() {
        return Ok(serde_json::Value::Number(i.into()));
    }

    if let Ok(f) = value.f64() {
        return Ok(serde_json::json!(f));
    }

    if let Ok(s) = value.string() {
        return Ok(serde_json::Value::String(s.to_string()));
    }

    if let Ok(list) = value.list() {
        let items: Result<Vec<serde_json::Value>, ResolverError> =
            list.iter().map(|v| value_accessor_to_json(&v)).collect();
        return Ok(serde_json::Value::Array(items?));
    }

    if let Ok(obj) = value.object() {
        let mut map = serde_json::Map::new();
        for (k, v) in obj.iter() {
            map.insert(k.to_string(), value_accessor_to_json(&v)?);
        }
        return Ok(serde_json::Value::Object(map));
    }

    Ok(serde_json::Value::Null)
}

/// Converts a list-typed argument to its JSON elements. A single non-list
/// value coerces to a one-element list per the usual input coercion rules.
pub(crate) fn list_accessor_to_json(
    value: &ValueAccessor<'_>,
) -> Result<Vec<serde_json::Value>, ResolverError> {
    if let Ok(list) = value.list() {
        return list.iter().map(|v| value_accessor_to_json(&v)).collect();
    }
    Ok(vec![value_accessor_to_json(value)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_graphql_value_primitives() {
        assert!(matches!(json_to_graphql_value(json!(null)), Value::Null));
        assert!(matches!(
            json_to_graphql_value(json!(true)),
            Value::Boolean(true)
        ));
        assert!(matches!(json_to_graphql_value(json!(42)), Value::Number(_)));
        assert!(matches!(
            json_to_graphql_value(json!("hello")),
            Value::String(s) if s == "hello"
        ));
    }

    #[test]
    fn test_json_to_graphql_value_complex() {
        assert!(matches!(
            json_to_graphql_value(json!([1, 2, 3])),
            Value::List(_)
        ));
        assert!(matches!(
            json_to_graphql_value(json!({"name": "Luke"})),
            Value::Object(_)
        ));
    }

    #[test]
    fn test_graphql_value_round_trip() {
        let original = json!({"id": "1", "age": 30, "tags": ["a", "b"]});
        let converted = graphql_value_to_json(&json_to_graphql_value(original.clone())).unwrap();
        assert_eq!(converted, original);
    }

    #[test]
    fn test_empty_value_shapes() {
        assert!(matches!(empty_value(true), Some(Value::Object(m)) if m.is_empty()));
        assert!(empty_value(false).is_none());
        assert!(matches!(empty_list(), Some(Value::List(l)) if l.is_empty()));
    }
}
