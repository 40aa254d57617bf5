//! Connection field resolver.
//!
//! A connection field holds a list of foreign keys on the parent record;
//! resolving it performs one batched lookup against the connection's target
//! collection.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use async_graphql::Value;
use tracing::{debug, warn};

use super::{get_graphql_context, graphql_value_to_json, json_to_graphql_value};

/// Resolver for connection list fields.
pub struct ConnectionResolver;

impl ConnectionResolver {
    /// Creates a resolver that reads `field_name` (a key list) off the
    /// already-resolved parent record and batch-gets against `target`.
    ///
    /// An empty or missing source field yields an empty list without a
    /// store round trip.
    pub fn resolve(
        target: String,
        field_name: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let target = target.clone();
            let field_name = field_name.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let keys: Vec<serde_json::Value> = match ctx.parent_value.as_value() {
                    Some(Value::Object(record)) => match record.get(field_name.as_str()) {
                        Some(Value::List(items)) => items
                            .iter()
                            .map(graphql_value_to_json)
                            .collect::<Result<_, _>>()?,
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                };

                if keys.is_empty() {
                    return Ok(Some(Value::List(Vec::new())));
                }

                debug!(
                    target = %target,
                    field = %field_name,
                    keys = keys.len(),
                    "Resolving connection field"
                );

                match gql_ctx.store.get_all(&target, &keys).await {
                    Ok(values) => Ok(Some(Value::List(
                        values.into_iter().map(json_to_graphql_value).collect(),
                    ))),
                    Err(e) => {
                        warn!(error = %e, target = %target, "Connection lookup failed, returning empty list");
                        Ok(Some(Value::List(Vec::new())))
                    }
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionResolver;

    #[test]
    fn test_connection_resolver_created() {
        let _resolver = ConnectionResolver::resolve("Person".to_string(), "friends".to_string());
    }
}
