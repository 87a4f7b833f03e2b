//! Structural element model
//!
//! A [`StructuralElement`] is the annotation-equivalent form of one piece of
//! mapping metadata: a column, a join table, an override, a generator, a query.
//! Its fields are a flat, insertion-ordered attribute bag whose values may nest
//! further elements.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kind of a structural element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Column,
    OrderColumn,
    JoinColumn,
    JoinColumns,
    PrimaryKeyJoinColumn,
    PrimaryKeyJoinColumns,
    JoinTable,
    CollectionTable,
    UniqueConstraint,
    AttributeOverride,
    AttributeOverrides,
    AssociationOverride,
    AssociationOverrides,
    Lob,
    Temporal,
    Enumerated,
    Access,
    IdClass,
    Transient,
    ExcludeDefaultListeners,
    ExcludeSuperclassListeners,
    EntityListeners,
    PrePersist,
    PreRemove,
    PreUpdate,
    PostPersist,
    PostUpdate,
    PostRemove,
    PostLoad,
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
    TableGenerator,
    TableGenerators,
    SequenceGenerator,
    SequenceGenerators,
    NamedQuery,
    NamedQueries,
    NamedNativeQuery,
    NamedNativeQueries,
    QueryHint,
    SqlResultSetMapping,
    SqlResultSetMappings,
    EntityResult,
    FieldResult,
    ColumnResult,
}

impl ElementKind {
    /// The wrapper kind that holds several elements of this kind, if any
    pub fn plural(self) -> Option<ElementKind> {
        match self {
            ElementKind::JoinColumn => Some(ElementKind::JoinColumns),
            ElementKind::PrimaryKeyJoinColumn => Some(ElementKind::PrimaryKeyJoinColumns),
            ElementKind::AttributeOverride => Some(ElementKind::AttributeOverrides),
            ElementKind::AssociationOverride => Some(ElementKind::AssociationOverrides),
            ElementKind::TableGenerator => Some(ElementKind::TableGenerators),
            ElementKind::SequenceGenerator => Some(ElementKind::SequenceGenerators),
            ElementKind::NamedQuery => Some(ElementKind::NamedQueries),
            ElementKind::NamedNativeQuery => Some(ElementKind::NamedNativeQueries),
            ElementKind::SqlResultSetMapping => Some(ElementKind::SqlResultSetMappings),
            _ => None,
        }
    }

    /// The member kind held by this wrapper kind, if this is a wrapper
    pub fn member(self) -> Option<ElementKind> {
        match self {
            ElementKind::JoinColumns => Some(ElementKind::JoinColumn),
            ElementKind::PrimaryKeyJoinColumns => Some(ElementKind::PrimaryKeyJoinColumn),
            ElementKind::AttributeOverrides => Some(ElementKind::AttributeOverride),
            ElementKind::AssociationOverrides => Some(ElementKind::AssociationOverride),
            ElementKind::TableGenerators => Some(ElementKind::TableGenerator),
            ElementKind::SequenceGenerators => Some(ElementKind::SequenceGenerator),
            ElementKind::NamedQueries => Some(ElementKind::NamedQuery),
            ElementKind::NamedNativeQueries => Some(ElementKind::NamedNativeQuery),
            ElementKind::SqlResultSetMappings => Some(ElementKind::SqlResultSetMapping),
            _ => None,
        }
    }

    /// Whether this kind is a wrapper around a list of members
    pub fn is_plural(self) -> bool {
        self.member().is_some()
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Where an element is attached
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Target {
    /// The class itself
    Class { class: String },
    /// A persistent field of the class
    Field { class: String, name: String },
    /// A property accessor of the class
    Method { class: String, name: String },
}

impl Target {
    pub fn class(class: impl Into<String>) -> Self {
        Target::Class {
            class: class.into(),
        }
    }

    pub fn field(class: impl Into<String>, name: impl Into<String>) -> Self {
        Target::Field {
            class: class.into(),
            name: name.into(),
        }
    }

    pub fn method(class: impl Into<String>, name: impl Into<String>) -> Self {
        Target::Method {
            class: class.into(),
            name: name.into(),
        }
    }

    /// Name of the owning class
    pub fn class_name(&self) -> &str {
        match self {
            Target::Class { class }
            | Target::Field { class, .. }
            | Target::Method { class, .. } => class,
        }
    }
}

/// A field value inside a structural element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    /// Enum constant, e.g. `TemporalType.DATE`
    Enum { type_name: String, tag: String },
    /// Resolved, fully-qualified class name
    Class(String),
    StringArray(Vec<String>),
    /// Enum constants of one enum type, e.g. `{CascadeType.PERSIST}`
    EnumArray { type_name: String, tags: Vec<String> },
    /// Resolved, fully-qualified class names
    ClassArray(Vec<String>),
    Nested(Box<StructuralElement>),
    Array(Vec<StructuralElement>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Class(s) => Some(s),
            Value::Enum { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string_array(&self) -> Option<&[String]> {
        match self {
            Value::StringArray(items) => Some(items),
            _ => None,
        }
    }

    /// Tags of an enum array, or class names of a class array
    pub fn as_names(&self) -> Option<&[String]> {
        match self {
            Value::EnumArray { tags, .. } => Some(tags),
            Value::ClassArray(classes) => Some(classes),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&StructuralElement> {
        match self {
            Value::Nested(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StructuralElement]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// One piece of annotation-equivalent mapping metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    pub kind: ElementKind,
    /// Attachment point; `None` for nested elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default)]
    pub fields: IndexMap<String, Value>,
}

impl StructuralElement {
    /// Create an element from an already-built field table
    pub fn new(kind: ElementKind, target: Option<Target>, fields: IndexMap<String, Value>) -> Self {
        Self {
            kind,
            target,
            fields,
        }
    }

    /// Create an element that carries no fields, such as `Lob` or `Transient`
    pub fn marker(kind: ElementKind, target: Option<Target>) -> Self {
        Self::new(kind, target, IndexMap::new())
    }

    /// Wrap members into a plural declaration under the `value` field
    pub fn wrapper(
        kind: ElementKind,
        target: Option<Target>,
        members: Vec<StructuralElement>,
    ) -> Self {
        let mut fields = IndexMap::new();
        fields.insert("value".to_string(), Value::Array(members));
        Self::new(kind, target, fields)
    }

    /// The `name` field, when present
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Members of a plural wrapper, empty for any other element
    pub fn members(&self) -> &[StructuralElement] {
        self.field("value")
            .and_then(Value::as_array)
            .unwrap_or_default()
    }

    /// Copy of this element without an attachment point, for nesting
    pub fn detached(&self) -> StructuralElement {
        Self {
            kind: self.kind,
            target: None,
            fields: self.fields.clone(),
        }
    }

    pub fn with_target(mut self, target: Option<Target>) -> Self {
        self.target = target;
        self
    }
}
