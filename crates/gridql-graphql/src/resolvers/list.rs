//! Plural read resolver.
//!
//! Backs the plural query field of every collection, e.g.
//! `Persons(key: ["1", "2"])` or `Persons(firstName: ["Luke", "Leia"])`.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use async_graphql::Value;
use tracing::{debug, warn};

use super::{
    bound_arg, empty_list, get_graphql_context, json_to_graphql_value, list_accessor_to_json,
    predicate,
};

/// Resolver for plural reads.
///
/// A bound `key` list performs one batched multi-key lookup (result order
/// follows the store's batch-get contract, not key order). Otherwise the
/// first bound list argument issues a single set-membership predicate query
/// covering all its values. Absent or empty arguments yield an empty list,
/// never null.
pub struct ListResolver;

impl ListResolver {
    /// Creates a resolver function for the plural query field of
    /// `collection`.
    pub fn resolve(
        collection: String,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let collection = collection.clone();
            FieldFuture::new(async move {
                let gql_ctx = get_graphql_context(&ctx)?;

                // `key` list takes precedence: one batched lookup
                if let Some(keys) = bound_arg(&ctx, "key") {
                    let keys = list_accessor_to_json(&keys)?;
                    if keys.is_empty() {
                        return Ok(empty_list());
                    }
                    debug!(collection = %collection, keys = keys.len(), "Resolving batched key read");
                    return match gql_ctx.store.get_all(&collection, &keys).await {
                        Ok(values) => Ok(Some(Value::List(
                            values.into_iter().map(json_to_graphql_value).collect(),
                        ))),
                        Err(e) => {
                            warn!(error = %e, collection = %collection, "Batched lookup failed, returning empty list");
                            Ok(empty_list())
                        }
                    };
                }

                // Otherwise the first bound list argument runs one membership query
                for (name, value) in ctx.args.iter() {
                    if name.as_str() == "key" || value.is_null() {
                        continue;
                    }
                    let values = list_accessor_to_json(&value)?;
                    if values.is_empty() {
                        return Ok(empty_list());
                    }
                    debug!(
                        collection = %collection,
                        field = %name,
                        values = values.len(),
                        "Resolving batched read by membership predicate"
                    );
                    return match predicate::select_where_in(
                        &gql_ctx.store,
                        &collection,
                        name.as_str(),
                        &values,
                    )
                    .await
                    {
                        Ok(rows) => Ok(Some(Value::List(
                            rows.into_iter().map(json_to_graphql_value).collect(),
                        ))),
                        Err(e) => {
                            e.log();
                            Ok(empty_list())
                        }
                    };
                }

                Ok(empty_list())
            })
        }
    }
}
