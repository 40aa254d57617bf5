//! Metadata descriptors for grid collections and their value types.
//!
//! The GraphQL layer never inspects values at runtime; it consumes the
//! descriptors defined here, which are declared once (configuration or
//! backend registration) and re-read on every schema build.

use serde::{Deserialize, Serialize};

/// Native scalar families a grid value or key can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// UTF-8 text.
    String,
    /// RFC 4122 UUID.
    Uuid,
    /// 32-bit signed integer.
    Int,
    /// 16-bit signed integer.
    Short,
    /// 64-bit signed integer.
    Long,
    /// Floating point (single or double precision).
    Float,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Local date with time of day.
    DateTime,
    /// Point on the UTC timeline.
    Instant,
    /// Arbitrary-precision decimal.
    Decimal,
}

impl ScalarKind {
    /// Parses a lowercase type tag as used in region declarations.
    ///
    /// Returns `None` for tags that do not name a scalar family; callers
    /// treat those as composite types.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "uuid" => Some(Self::Uuid),
            "int" => Some(Self::Int),
            "short" => Some(Self::Short),
            "long" => Some(Self::Long),
            "float" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            "datetime" => Some(Self::DateTime),
            "instant" => Some(Self::Instant),
            "decimal" => Some(Self::Decimal),
            _ => None,
        }
    }

    /// The lowercase tag for this scalar family.
    #[must_use]
    pub fn as_tag(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Int => "int",
            Self::Short => "short",
            Self::Long => "long",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Instant => "instant",
            Self::Decimal => "decimal",
        }
    }
}

/// Declared type of a single field: either a scalar family or a nested
/// composite type with its own descriptor.
///
/// This is the two-variant classification the schema builder matches on;
/// there is no "try scalar, catch failure" path anywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    /// A directly mappable scalar.
    Scalar(ScalarKind),
    /// A nested record with introspectable fields of its own.
    Composite(TypeDescriptor),
}

/// One declared field of a value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name as it appears in stored records.
    pub name: String,

    /// Declared field type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Excludes the field from the synthesized schema entirely.
    #[serde(default)]
    pub ignored: bool,

    /// Documentation text surfaced as the GraphQL field description.
    #[serde(default)]
    pub doc: Option<String>,

    /// Marks the field as holding keys into another root collection.
    /// The value is the target collection name.
    #[serde(default)]
    pub connection: Option<String>,
}

impl FieldDescriptor {
    /// Creates a scalar field.
    #[must_use]
    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Scalar(kind),
            ignored: false,
            doc: None,
            connection: None,
        }
    }

    /// Creates a nested composite field.
    #[must_use]
    pub fn composite(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Composite(descriptor),
            ignored: false,
            doc: None,
            connection: None,
        }
    }

    /// Creates a connection field: a list of keys (of the given scalar kind)
    /// pointing into `target`.
    #[must_use]
    pub fn connection(
        name: impl Into<String>,
        key_kind: ScalarKind,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType::Scalar(key_kind),
            ignored: false,
            doc: None,
            connection: Some(target.into()),
        }
    }

    /// Attaches documentation text.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Marks the field as ignored.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Whether this field holds keys into another collection.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        self.connection.is_some()
    }
}

/// Read-only view over a composite value type: its name, markers, and
/// declared fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name; becomes the GraphQL object type name.
    pub name: String,

    /// Documentation text surfaced as the GraphQL type description.
    #[serde(default)]
    pub doc: Option<String>,

    /// Excludes the whole enclosing collection from the schema.
    #[serde(default)]
    pub ignored: bool,

    /// Declared fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Creates an empty descriptor with the given type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            ignored: false,
            fields: Vec::new(),
        }
    }

    /// Attaches documentation text.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Marks the type as ignored.
    #[must_use]
    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Non-ignored fields that map directly onto output fields.
    pub fn plain_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| !f.ignored && !f.is_connection())
    }

    /// Non-ignored connection fields.
    pub fn connection_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| !f.ignored && f.is_connection())
    }
}

/// Declared value shape of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueConstraint {
    /// Entries are bare scalars.
    Scalar(ScalarKind),
    /// Entries are records described by the descriptor.
    Composite(TypeDescriptor),
}

/// A named root collection of the grid: its key kind and value constraint.
///
/// Both are optional in declarations; the grid's convention is that an
/// unconstrained collection holds string keys and string values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    /// Collection (region) name.
    pub name: String,

    /// Declared key scalar kind. `None` defaults to string.
    #[serde(default)]
    pub key: Option<ScalarKind>,

    /// Declared value constraint. `None` defaults to scalar string.
    #[serde(default)]
    pub value: Option<ValueConstraint>,
}

impl CollectionDescriptor {
    /// Creates a descriptor with defaulted key and value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            value: None,
        }
    }

    /// Sets the key scalar kind.
    #[must_use]
    pub fn with_key(mut self, kind: ScalarKind) -> Self {
        self.key = Some(kind);
        self
    }

    /// Declares a scalar value constraint.
    #[must_use]
    pub fn with_scalar_value(mut self, kind: ScalarKind) -> Self {
        self.value = Some(ValueConstraint::Scalar(kind));
        self
    }

    /// Declares a composite value constraint.
    #[must_use]
    pub fn with_value_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.value = Some(ValueConstraint::Composite(descriptor));
        self
    }

    /// The effective key kind (string when undeclared).
    #[must_use]
    pub fn key_kind(&self) -> ScalarKind {
        self.key.unwrap_or(ScalarKind::String)
    }

    /// The effective value constraint (scalar string when undeclared).
    #[must_use]
    pub fn value_constraint(&self) -> ValueConstraint {
        self.value
            .clone()
            .unwrap_or(ValueConstraint::Scalar(ScalarKind::String))
    }

    /// Whether the collection's value type opts the collection out of the
    /// synthesized schema.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(&self.value, Some(ValueConstraint::Composite(td)) if td.ignored)
    }

    /// The value type name for composite collections.
    #[must_use]
    pub fn value_type_name(&self) -> Option<&str> {
        match &self.value {
            Some(ValueConstraint::Composite(td)) => Some(&td.name),
            _ => None,
        }
    }
}
