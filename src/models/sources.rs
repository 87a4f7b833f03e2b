//! Declarations as delivered by the mapping-document parser
//!
//! These are plain structural records. Every optional field left `None` is
//! treated as "not declared" and never reaches the mocked element.

use serde::{Deserialize, Serialize};

use super::element::ElementKind;
use super::enums::{AccessType, AssociationType, CascadeType, EnumType, LockModeType, TemporalType};
use crate::config::MappingDefaults;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnSource {
    pub name: Option<String>,
    pub column_definition: Option<String>,
    pub table: Option<String>,
    pub unique: Option<bool>,
    pub nullable: Option<bool>,
    pub insertable: Option<bool>,
    pub updatable: Option<bool>,
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
}

impl ColumnSource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinColumnSource {
    pub name: Option<String>,
    pub column_definition: Option<String>,
    pub table: Option<String>,
    pub referenced_column_name: Option<String>,
    pub unique: Option<bool>,
    pub nullable: Option<bool>,
    pub insertable: Option<bool>,
    pub updatable: Option<bool>,
}

impl JoinColumnSource {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderColumnSource {
    pub name: Option<String>,
    pub column_definition: Option<String>,
    pub nullable: Option<bool>,
    pub insertable: Option<bool>,
    pub updatable: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrimaryKeyJoinColumnSource {
    pub name: Option<String>,
    pub referenced_column_name: Option<String>,
    pub column_definition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniqueConstraintSource {
    pub name: Option<String>,
    pub column_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinTableSource {
    pub name: Option<String>,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub join_columns: Vec<JoinColumnSource>,
    pub inverse_join_columns: Vec<JoinColumnSource>,
    pub unique_constraints: Vec<UniqueConstraintSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionTableSource {
    pub name: Option<String>,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub join_columns: Vec<JoinColumnSource>,
    pub unique_constraints: Vec<UniqueConstraintSource>,
}

/// Document-declared override of a basic attribute's column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeOverrideSource {
    pub name: String,
    #[serde(default)]
    pub column: Option<ColumnSource>,
}

impl AttributeOverrideSource {
    pub fn new(name: impl Into<String>, column: ColumnSource) -> Self {
        Self {
            name: name.into(),
            column: Some(column),
        }
    }
}

/// Document-declared override of an association's join columns or join table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationOverrideSource {
    pub name: String,
    #[serde(default)]
    pub join_columns: Vec<JoinColumnSource>,
    #[serde(default)]
    pub join_table: Option<JoinTableSource>,
}

impl AssociationOverrideSource {
    pub fn new(name: impl Into<String>, join_columns: Vec<JoinColumnSource>) -> Self {
        Self {
            name: name.into(),
            join_columns,
            join_table: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableGeneratorSource {
    pub name: Option<String>,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: Option<String>,
    pub pk_column_name: Option<String>,
    pub value_column_name: Option<String>,
    pub pk_column_value: Option<String>,
    pub initial_value: Option<i64>,
    pub allocation_size: Option<i64>,
    pub unique_constraints: Vec<UniqueConstraintSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SequenceGeneratorSource {
    pub name: Option<String>,
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub sequence_name: Option<String>,
    pub initial_value: Option<i64>,
    pub allocation_size: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryHintSource {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamedQuerySource {
    pub name: Option<String>,
    pub query: Option<String>,
    pub lock_mode: Option<LockModeType>,
    pub hints: Vec<QueryHintSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamedNativeQuerySource {
    pub name: Option<String>,
    pub query: Option<String>,
    pub result_set_mapping: Option<String>,
    pub result_class: Option<String>,
    pub hints: Vec<QueryHintSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldResultSource {
    pub name: Option<String>,
    pub column: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityResultSource {
    pub entity_class: Option<String>,
    pub discriminator_column: Option<String>,
    pub fields: Vec<FieldResultSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnResultSource {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SqlResultSetMappingSource {
    pub name: Option<String>,
    pub entities: Vec<EntityResultSource>,
    pub columns: Vec<ColumnResultSource>,
}

/// Global declarations collected from one mapping document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalDeclarations {
    pub table_generators: Vec<TableGeneratorSource>,
    pub sequence_generators: Vec<SequenceGeneratorSource>,
    pub named_queries: Vec<NamedQuerySource>,
    pub named_native_queries: Vec<NamedNativeQuerySource>,
    pub sql_result_set_mappings: Vec<SqlResultSetMappingSource>,
}

impl GlobalDeclarations {
    pub fn is_empty(&self) -> bool {
        self.table_generators.is_empty()
            && self.sequence_generators.is_empty()
            && self.named_queries.is_empty()
            && self.named_native_queries.is_empty()
            && self.sql_result_set_mappings.is_empty()
    }
}

/// Per-attribute column refinements declared alongside an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicAttributeSource {
    pub name: String,
    #[serde(default)]
    pub column: Option<ColumnSource>,
    #[serde(default)]
    pub lob: bool,
    #[serde(default)]
    pub temporal: Option<TemporalType>,
    #[serde(default)]
    pub enumerated: Option<EnumType>,
}

/// Per-attribute association mapping declared alongside an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationAttributeSource {
    pub name: String,
    #[serde(default)]
    pub join_columns: Vec<JoinColumnSource>,
    #[serde(default)]
    pub join_table: Option<JoinTableSource>,
    #[serde(default)]
    pub collection_table: Option<CollectionTableSource>,
    #[serde(default)]
    pub order_column: Option<OrderColumnSource>,
    #[serde(default)]
    pub attribute_overrides: Vec<AttributeOverrideSource>,
    #[serde(default)]
    pub association_overrides: Vec<AssociationOverrideSource>,
    /// Kind of association; required when `cascade` or `target_entity` is declared
    #[serde(default)]
    pub association_type: Option<AssociationType>,
    #[serde(default)]
    pub target_entity: Option<String>,
    #[serde(default)]
    pub cascade: Vec<CascadeType>,
}

/// Lifecycle callback methods, by event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifecycleCallbacks {
    pub pre_persist: Option<String>,
    pub pre_remove: Option<String>,
    pub pre_update: Option<String>,
    pub post_persist: Option<String>,
    pub post_update: Option<String>,
    pub post_remove: Option<String>,
    pub post_load: Option<String>,
}

impl LifecycleCallbacks {
    /// Declared callbacks as (marker kind, method name), in event order
    pub fn declared(&self) -> Vec<(ElementKind, &str)> {
        [
            (ElementKind::PrePersist, &self.pre_persist),
            (ElementKind::PreRemove, &self.pre_remove),
            (ElementKind::PreUpdate, &self.pre_update),
            (ElementKind::PostPersist, &self.post_persist),
            (ElementKind::PostUpdate, &self.post_update),
            (ElementKind::PostRemove, &self.post_remove),
            (ElementKind::PostLoad, &self.post_load),
        ]
        .into_iter()
        .filter_map(|(kind, method)| {
            method
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(|m| (kind, m))
        })
        .collect()
    }
}

/// A listener class attached to an entity, with its callback methods
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityListenerSource {
    pub class_name: String,
    #[serde(flatten)]
    pub callbacks: LifecycleCallbacks,
}

/// An entity, mapped superclass or embeddable as declared by a mapping document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityObjectSource {
    pub class_name: String,
    #[serde(default)]
    pub metadata_complete: bool,
    #[serde(default)]
    pub access: Option<AccessType>,
    #[serde(default)]
    pub exclude_default_listeners: bool,
    #[serde(default)]
    pub exclude_superclass_listeners: bool,
    #[serde(default)]
    pub id_class: Option<String>,
    #[serde(default)]
    pub attribute_overrides: Vec<AttributeOverrideSource>,
    #[serde(default)]
    pub association_overrides: Vec<AssociationOverrideSource>,
    #[serde(default)]
    pub primary_key_join_columns: Vec<PrimaryKeyJoinColumnSource>,
    #[serde(default)]
    pub basic_attributes: Vec<BasicAttributeSource>,
    #[serde(default)]
    pub associations: Vec<AssociationAttributeSource>,
    #[serde(default)]
    pub transient_attributes: Vec<String>,
    #[serde(default)]
    pub entity_listeners: Vec<EntityListenerSource>,
    /// Callback methods declared on the entity class itself
    #[serde(flatten)]
    pub callbacks: LifecycleCallbacks,
}

impl EntityObjectSource {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Default::default()
        }
    }
}

/// One mapping document: document defaults, entity declarations and global declarations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingDocument {
    #[serde(default)]
    pub defaults: MappingDefaults,
    #[serde(default)]
    pub entities: Vec<EntityObjectSource>,
    #[serde(flatten)]
    pub globals: GlobalDeclarations,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_source_from_yaml() {
        let yaml = r#"
className: Customer
access: FIELD
attributeOverrides:
  - name: address
    column:
      name: ADDR
      length: 120
transientAttributes: [cache]
"#;
        let entity: EntityObjectSource = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entity.class_name, "Customer");
        assert_eq!(entity.access, Some(AccessType::Field));
        assert_eq!(entity.attribute_overrides.len(), 1);
        let column = entity.attribute_overrides[0].column.as_ref().unwrap();
        assert_eq!(column.name.as_deref(), Some("ADDR"));
        assert_eq!(column.length, Some(120));
        assert_eq!(column.nullable, None);
        assert_eq!(entity.transient_attributes, vec!["cache".to_string()]);
        assert!(entity.entity_listeners.is_empty());
        assert!(entity.callbacks.declared().is_empty());
    }

    #[test]
    fn test_listeners_and_callbacks_from_yaml() {
        let yaml = r#"
className: Order
prePersist: beforeSave
postLoad: afterLoad
entityListeners:
  - className: AuditListener
    postPersist: recordInsert
    postUpdate: ""
"#;
        let entity: EntityObjectSource = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            entity.callbacks.declared(),
            vec![
                (ElementKind::PrePersist, "beforeSave"),
                (ElementKind::PostLoad, "afterLoad"),
            ]
        );
        let listener = &entity.entity_listeners[0];
        assert_eq!(listener.class_name, "AuditListener");
        assert_eq!(
            listener.callbacks.declared(),
            vec![(ElementKind::PostPersist, "recordInsert")]
        );
    }

    #[test]
    fn test_global_declarations_is_empty() {
        let mut globals = GlobalDeclarations::default();
        assert!(globals.is_empty());
        globals.named_queries.push(NamedQuerySource::default());
        assert!(!globals.is_empty());
    }
}
