//! Single-entry read resolver.
//!
//! Backs the singular query field of every collection, e.g.
//! `Person(key: "1")` or `Person(firstName: "Luke")`.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{
    bound_arg, empty_value, get_graphql_context, json_to_graphql_value, predicate,
    value_accessor_to_json,
};

/// Resolver for single-entry reads.
///
/// Exactly one strategy runs per invocation: a bound `key` performs a point
/// lookup and always wins; otherwise the first bound argument runs an
/// equality predicate and the first match is returned. With nothing bound,
/// no match, or a failed store query, the result is the empty
/// representation.
pub struct ReadResolver;

impl ReadResolver {
    /// Creates a resolver function for the singular query field of
    /// `collection`. `composite` selects the empty representation shape.
    pub fn resolve(
        collection: String,
        composite: bool,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let collection = collection.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                // `key` takes precedence over any field predicate
                if let Some(key) = bound_arg(&ctx, "key") {
                    let key = value_accessor_to_json(&key)?;
                    debug!(collection = %collection, key = %key, "Resolving single-key read");
                    return match gql_ctx.store.get(&collection, &key).await {
                        Ok(Some(value)) => Ok(Some(json_to_graphql_value(value))),
                        Ok(None) => Ok(empty_value(composite)),
                        Err(e) => {
                            warn!(error = %e, collection = %collection, "Point lookup failed, returning empty result");
                            Ok(empty_value(composite))
                        }
                    };
                }

                // Otherwise the first bound argument runs as an equality predicate
                for (name, value) in ctx.args.iter() {
                    if name.as_str() == "key" || value.is_null() {
                        continue;
                    }
                    let bound = value_accessor_to_json(&value)?;
                    debug!(
                        collection = %collection,
                        field = %name,
                        "Resolving single read by equality predicate"
                    );
                    return match predicate::select_where_eq(
                        &gql_ctx.store,
                        &collection,
                        name.as_str(),
                        &bound,
                    )
                    .await
                    {
                        Ok(mut rows) if !rows.is_empty() => {
                            Ok(Some(json_to_graphql_value(rows.remove(0))))
                        }
                        Ok(_) => Ok(empty_value(composite)),
                        Err(e) => {
                            e.log();
                            Ok(empty_value(composite))
                        }
                    };
                }

                // No argument bound at all
                Ok(empty_value(composite))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReadResolver;

    #[test]
    fn test_read_resolver_created() {
        let _resolver = ReadResolver::resolve("Person".to_string(), true);
    }
}
