//! Create mutation resolver, plus the key/value argument resolution shared
//! with `put`.

use async_graphql::dynamic::{FieldFuture, ResolverContext};
use tracing::{debug, warn};

use super::{
    bound_arg, empty_value, get_graphql_context, json_to_graphql_value, value_accessor_to_json,
};

/// Where a mutation takes its value from.
#[derive(Debug, Clone)]
pub enum ValueArgument {
    /// Scalar collections: the `value` argument.
    Scalar,
    /// Composite collections: an input object argument named after the
    /// value type.
    Composite {
        /// The value type name, which is also the argument name.
        type_name: String,
    },
}

impl ValueArgument {
    /// Whether the enclosing collection holds composite values.
    pub(crate) fn is_composite(&self) -> bool {
        matches!(self, Self::Composite { .. })
    }
}

/// A value that could not be materialized from the mutation's input
/// argument. Logged and surfaced to the caller as the empty representation.
#[derive(Debug)]
pub(crate) struct MaterializationFailed {
    pub argument: String,
    pub message: String,
}

impl MaterializationFailed {
    pub(crate) fn log(&self) {
        warn!(
            argument = %self.argument,
            error = %self.message,
            "Failed to materialize mutation value, returning empty result"
        );
    }
}

/// Materializes the mutation value from the argument map.
///
/// Returns `Ok(None)` when the argument is absent (the caller answers with
/// the empty representation) and `Err` when it is present but malformed.
pub(crate) fn materialize_value(
    ctx: &ResolverContext<'_>,
    value_arg: &ValueArgument,
) -> Result<Option<serde_json::Value>, MaterializationFailed> {
    let name = match value_arg {
        ValueArgument::Scalar => "value",
        ValueArgument::Composite { type_name } => type_name.as_str(),
    };

    let Some(accessor) = bound_arg(ctx, name) else {
        return Ok(None);
    };

    let value = value_accessor_to_json(&accessor).map_err(|e| MaterializationFailed {
        argument: name.to_string(),
        message: e.message,
    })?;

    if value_arg.is_composite() && !value.is_object() {
        return Err(MaterializationFailed {
            argument: name.to_string(),
            message: "input did not materialize into a record".to_string(),
        });
    }

    Ok(Some(value))
}

/// Resolver for entry creation mutations (`createC`).
pub struct CreateResolver;

impl CreateResolver {
    /// Creates a resolver for `createC` on `collection`.
    ///
    /// Requires `key` and a value argument; delegates to the store's put
    /// primitive and returns the stored value. A missing key or value
    /// yields the empty representation, not an error.
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

                debug!(collection = %collection, key = %key, "Processing create mutation");

                match gql_ctx.store.put(&collection, &key, &value).await {
                    Ok(_) => Ok(Some(json_to_graphql_value(value))),
                    Err(e) => {
                        warn!(error = %e, collection = %collection, "Create failed, returning empty result");
                        Ok(empty_value(composite))
                    }
                }
            })
        }
    }
}
