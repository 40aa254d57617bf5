//! Grid GraphQL schema synthesizer.
//!
//! One synthesis pass turns the store's current collection metadata into a
//! complete query/mutation type graph. The pass owns its type cache; the
//! product is an immutable schema that is replaced, never mutated, when the
//! grid's metadata changes.

use std::collections::HashMap;

use async_graphql::dynamic::{Field, FieldFuture, InputValue, Object, Schema, TypeRef};
use async_graphql::Value;
use gridql_store::{CollectionDescriptor, DynStore, ScalarKind, TypeDescriptor, ValueConstraint};
use tracing::{debug, info};

use super::arguments::{field_arguments, key_argument, key_list_argument, list_field_arguments};
use super::object_type::{build_input_type, build_object_type};
use super::scalars::{register_scalars, scalar_type_name};
use super::type_cache::TypeCache;
use crate::error::GraphQLError;
use crate::resolvers::{
    CreateResolver, DestroyResolver, ListResolver, PutResolver, ReadResolver, ValueArgument,
};

/// Configuration for the schema synthesizer.
#[derive(Debug, Clone)]
pub struct SchemaBuilderConfig {
    /// Maximum query depth allowed.
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    pub max_complexity: usize,

    /// Whether to enable introspection queries.
    pub introspection_enabled: bool,
}

impl Default for SchemaBuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            max_complexity: 500,
            introspection_enabled: true,
        }
    }
}

/// Synthesizes a GraphQL schema from the grid's collection metadata.
///
/// For every non-ignored root collection the query root gets a singular and
/// a plural field and the mutation root gets create/put/destroy fields, with
/// argument sets derived from the key kind and the store's secondary
/// indexes.
///
/// # Example
///
/// ```ignore
/// let synthesizer = SchemaSynthesizer::new(store, SchemaBuilderConfig::default());
/// let schema = synthesizer.build().await?;
/// ```
pub struct SchemaSynthesizer {
    /// Store whose metadata drives the synthesis.
    store: DynStore,

    /// Configuration options.
    config: SchemaBuilderConfig,
}

impl SchemaSynthesizer {
    /// Creates a new synthesizer.
    #[must_use]
    pub fn new(store: DynStore, config: SchemaBuilderConfig) -> Self {
        Self { store, config }
    }

    /// Builds the GraphQL schema from the store's current metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if schema construction fails.
    pub async fn build(&self) -> Result<Schema, GraphQLError> {
        debug!("Starting GraphQL schema build");

        let collections = self.store.root_collections();

        // Connection fields reference the target collection's value type by
        // name; precompute that mapping so references resolve lazily.
        let referenced_types: HashMap<String, String> = collections
            .iter()
            .map(|c| {
                let type_name = match c.value_constraint() {
                    ValueConstraint::Composite(td) => td.name.clone(),
                    ValueConstraint::Scalar(kind) => scalar_type_name(kind).to_string(),
                };
                (c.name.clone(), type_name)
            })
            .collect();

        let mut cache = TypeCache::default();
        let mut query = Object::new("Query").description("All encompassing schema for this grid");
        let mut mutation =
            Object::new("Mutation").description("All encompassing schema for this grid");

        query = query.field(
            Field::new("_health", TypeRef::named_nn(TypeRef::STRING), |_| {
                FieldFuture::new(async { Ok(Some(Value::String("ok".to_string()))) })
            })
            .description("Health check endpoint"),
        );
        query = query.field(
            Field::new("_version", TypeRef::named_nn(TypeRef::STRING), |_| {
                FieldFuture::new(async {
                    Ok(Some(Value::String(env!("CARGO_PKG_VERSION").to_string())))
                })
            })
            .description("API version"),
        );

        let mut has_collections = false;
        for collection in &collections {
            if collection.is_ignored() {
                debug!(collection = %collection.name, "Skipping ignored collection");
                continue;
            }
            if !is_valid_graphql_name(&collection.name) {
                debug!(collection = %collection.name, "Skipping collection with invalid GraphQL name");
                continue;
            }

            (query, mutation) = match collection.value_constraint() {
                ValueConstraint::Scalar(kind) => {
                    self.add_scalar_collection(query, mutation, collection, kind)
                }
                ValueConstraint::Composite(td) => self.add_composite_collection(
                    query,
                    mutation,
                    &mut cache,
                    collection,
                    &td,
                    &referenced_types,
                ),
            };
            has_collections = true;
        }

        // A mutation root with no fields is not a valid schema
        if !has_collections {
            mutation = mutation.field(
                Field::new("_placeholder", TypeRef::named(TypeRef::STRING), |_| {
                    FieldFuture::new(async { Ok(None::<Value>) })
                })
                .description("Placeholder - the grid has no mutable collections"),
            );
        }

        let mut builder = Schema::build("Query", Some("Mutation"), None);
        builder = register_scalars(builder);

        let generated = cache.generated_count();
        let (objects, inputs) = cache.into_types();
        for object in objects {
            builder = builder.register(object);
        }
        for input in inputs {
            builder = builder.register(input);
        }
        builder = builder.register(query).register(mutation);

        builder = builder.limit_depth(self.config.max_depth);
        builder = builder.limit_complexity(self.config.max_complexity);
        if !self.config.introspection_enabled {
            builder = builder.disable_introspection();
        }

        let schema = builder
            .finish()
            .map_err(|e| GraphQLError::SchemaBuildFailed(e.to_string()))?;

        debug!(
            collections = collections.len(),
            generated_types = generated,
            "GraphQL schema build complete"
        );
        Ok(schema)
    }

    /// Adds the query and mutation fields for a scalar-valued collection.
    fn add_scalar_collection(
        &self,
        mut query: Object,
        mut mutation: Object,
        collection: &CollectionDescriptor,
        kind: ScalarKind,
    ) -> (Object, Object) {
        let name = collection.name.clone();
        let key_kind = collection.key_kind();
        let scalar = scalar_type_name(kind);

        query = query.field(
            Field::new(
                name.as_str(),
                TypeRef::named(scalar),
                ReadResolver::resolve(name.clone(), false),
            )
            .argument(key_argument(key_kind))
            .description(format!("Look up one {name} entry")),
        );

        query = query.field(
            Field::new(
                format!("{name}s"),
                TypeRef::named_list(scalar),
                ListResolver::resolve(name.clone()),
            )
            .argument(key_list_argument(key_kind))
            .description(format!("Look up {name} entries in one batch")),
        );

        mutation = mutation.field(
            Field::new(
                format!("create{name}"),
                TypeRef::named(scalar),
                CreateResolver::resolve(name.clone(), ValueArgument::Scalar),
            )
            .argument(key_argument(key_kind))
            .argument(InputValue::new("value", TypeRef::named(scalar)))
            .description(format!("Store a {name} entry")),
        );
        mutation = mutation.field(
            Field::new(
                format!("put{name}"),
                TypeRef::named(scalar),
                PutResolver::resolve(name.clone(), ValueArgument::Scalar),
            )
            .argument(key_argument(key_kind))
            .argument(InputValue::new("value", TypeRef::named(scalar)))
            .description(format!("Overwrite a {name} entry")),
        );
        mutation = mutation.field(
            Field::new(
                format!("destroy{name}"),
                TypeRef::named(scalar),
                DestroyResolver::resolve(name.clone(), false),
            )
            .argument(key_argument(key_kind))
            .description(format!("Remove a {name} entry")),
        );

        (query, mutation)
    }

    /// Adds the query and mutation fields for a composite-valued collection,
    /// building its object and input types through the cache.
    fn add_composite_collection(
        &self,
        mut query: Object,
        mut mutation: Object,
        cache: &mut TypeCache,
        collection: &CollectionDescriptor,
        descriptor: &TypeDescriptor,
        referenced_types: &HashMap<String, String>,
    ) -> (Object, Object) {
        let name = collection.name.clone();
        let key_kind = collection.key_kind();
        let indexed = self.store.indexed_fields(&name);
        info!(collection = %name, indexed = ?indexed, "Indexed fields for collection");

        build_object_type(cache, descriptor, referenced_types);
        let input_name = build_input_type(cache, descriptor);

        let doc = descriptor.doc.clone();
        let type_name = descriptor.name.as_str();

        let mut singular = Field::new(
            name.as_str(),
            TypeRef::named(type_name),
            ReadResolver::resolve(name.clone(), true),
        )
        .argument(key_argument(key_kind));
        for argument in field_arguments(descriptor, &indexed) {
            singular = singular.argument(argument);
        }
        singular = singular
            .description(doc.clone().unwrap_or_else(|| format!("Look up one {name} entry")));
        query = query.field(singular);

        let mut plural = Field::new(
            format!("{name}s"),
            TypeRef::named_list(type_name),
            ListResolver::resolve(name.clone()),
        )
        .argument(key_list_argument(key_kind));
        for argument in list_field_arguments(descriptor, &indexed) {
            plural = plural.argument(argument);
        }
        plural = plural.description(
            doc.clone()
                .unwrap_or_else(|| format!("Look up {name} entries in one batch")),
        );
        query = query.field(plural);

        let value_argument = ValueArgument::Composite {
            type_name: descriptor.name.clone(),
        };

        mutation = mutation.field(
            Field::new(
                format!("create{name}"),
                TypeRef::named(type_name),
                CreateResolver::resolve(name.clone(), value_argument.clone()),
            )
            .argument(key_argument(key_kind))
            .argument(InputValue::new(type_name, TypeRef::named(input_name.as_str())))
            .description(doc.clone().unwrap_or_else(|| format!("Store a {name} entry"))),
        );
        mutation = mutation.field(
            Field::new(
                format!("put{name}"),
                TypeRef::named(type_name),
                PutResolver::resolve(name.clone(), value_argument),
            )
            .argument(key_argument(key_kind))
            .argument(InputValue::new(type_name, TypeRef::named(input_name.as_str())))
            .description(doc.clone().unwrap_or_else(|| format!("Overwrite a {name} entry"))),
        );
        mutation = mutation.field(
            Field::new(
                format!("destroy{name}"),
                TypeRef::named(type_name),
                DestroyResolver::resolve(name.clone(), true),
            )
            .argument(key_argument(key_kind))
            .description(doc.unwrap_or_else(|| format!("Remove a {name} entry"))),
        );

        (query, mutation)
    }
}

/// GraphQL names start with a letter or underscore and continue with
/// letters, digits, or underscores.
fn is_valid_graphql_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
