//! Destroy mutation resolver.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{bound_arg, empty_value, get_graphql_context, json_to_graphql_value, value_accessor_to_json};

/// Resolver for entry removal mutations (`destroyC`).
pub struct DestroyResolver;

impl DestroyResolver {
    /// Creates a resolver for `destroyC` on `collection`.
    ///
    /// Requires `key`; removes the entry and returns the removed value, or
    /// the empty representation when `key` is absent or nothing was stored.
    pub fn resolve(
        collection: String,
        composite: bool,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let collection = collection.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                let Some(key) = bound_arg(&ctx, "key") else {
                    return Ok(empty_value(composite));
                };
                let key = value_accessor_to_json(&key)?;

                debug!(collection = %collection, key = %key, "Processing destroy mutation");

                match gql_ctx.store.destroy(&collection, &key).await {
                    Ok(Some(removed)) => Ok(Some(json_to_graphql_value(removed))),
                    Ok(None) => Ok(empty_value(composite)),
                    Err(e) => {
                        warn!(error = %e, collection = %collection, "Destroy failed, returning empty result");
                        Ok(empty_value(composite))
                    }
                }
            })
        }
    }
}
