//! Put mutation resolver.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::create::{materialize_value, ValueArgument};
use super::{bound_arg, empty_value, get_graphql_context, json_to_graphql_value, value_accessor_to_json};

/// Resolver for entry overwrite mutations (`putC`).
pub struct PutResolver;

impl PutResolver {
    /// Creates a resolver for `putC` on `collection`.
    ///
    /// Identical argument resolution to create, and always overwrites.
    /// The field's result is the newly written value; the store's own put
    /// return (the previous value) is discarded, so callers can rely on one
    /// contract.
    pub fn resolve(
        collection: String,
        value_arg: ValueArgument,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let collection = collection.clone();
            let value_arg = value_arg.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;
                let composite = value_arg.is_composite();

                let Some(key) = bound_arg(&ctx, "key") else {
                    return Ok(empty_value(composite));
                };
                let key = value_accessor_to_json(&key)?;

                let value = match materialize_value(&ctx, &value_arg) {
                    Ok(Some(value)) => value,
                    Ok(None) => return Ok(empty_value(composite)),
                    Err(failure) => {
                        failure.log();
                        return Ok(empty_value(composite));
                    }
                };

                debug!(collection = %collection, key = %key, "Processing put mutation");

                match gql_ctx.store.put(&collection, &key, &value).await {
                    Ok(_previous) => Ok(Some(json_to_graphql_value(value))),
                    Err(e) => {
                        warn!(error = %e, collection = %collection, "Put failed, returning empty result");
                        Ok(empty_value(composite))
                    }
                }
            })
        }
    }
}
