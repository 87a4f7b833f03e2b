//! Value table builders
//!
//! Turns declaration records into [`StructuralElement`]s. Only explicitly set
//! fields are emitted: `None`, empty strings and empty lists never appear as
//! fields of the result. Nested lists keep declaration order. Nothing here
//! touches the index.

use indexmap::IndexMap;

use crate::config::MappingDefaults;
use crate::models::{
    AssociationOverrideSource, AttributeOverrideSource, CollectionTableSource, ColumnSource,
    ElementKind, EnumType, JoinColumnSource, JoinTableSource, OrderColumnSource,
    PrimaryKeyJoinColumnSource, StructuralElement, Target, TemporalType, UniqueConstraintSource,
    Value,
};

/// Accumulates the explicitly-set fields of one element
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    fields: IndexMap<String, Value>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string field unless it is absent or empty
    pub fn string(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.fields
                .insert(name.to_string(), Value::String(value.to_string()));
        }
        self
    }

    pub fn boolean(mut self, name: &str, value: Option<bool>) -> Self {
        if let Some(value) = value {
            self.fields.insert(name.to_string(), Value::Bool(value));
        }
        self
    }

    pub fn integer(mut self, name: &str, value: Option<i64>) -> Self {
        if let Some(value) = value {
            self.fields.insert(name.to_string(), Value::Int(value));
        }
        self
    }

    pub fn enum_value(mut self, name: &str, type_name: &str, tag: Option<&str>) -> Self {
        if let Some(tag) = tag {
            self.fields.insert(
                name.to_string(),
                Value::Enum {
                    type_name: type_name.to_string(),
                    tag: tag.to_string(),
                },
            );
        }
        self
    }

    /// Add an already-resolved class reference
    pub fn class_value(mut self, name: &str, class_name: Option<&str>) -> Self {
        if let Some(class_name) = class_name.filter(|c| !c.is_empty()) {
            self.fields
                .insert(name.to_string(), Value::Class(class_name.to_string()));
        }
        self
    }

    pub fn strings(mut self, name: &str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.fields
                .insert(name.to_string(), Value::StringArray(values.to_vec()));
        }
        self
    }

    pub fn enum_values(mut self, name: &str, type_name: &str, tags: &[&str]) -> Self {
        if !tags.is_empty() {
            self.fields.insert(
                name.to_string(),
                Value::EnumArray {
                    type_name: type_name.to_string(),
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                },
            );
        }
        self
    }

    /// Add already-resolved class references
    pub fn class_values(mut self, name: &str, class_names: &[String]) -> Self {
        if !class_names.is_empty() {
            self.fields
                .insert(name.to_string(), Value::ClassArray(class_names.to_vec()));
        }
        self
    }

    pub fn nested(mut self, name: &str, element: Option<StructuralElement>) -> Self {
        if let Some(element) = element {
            self.fields
                .insert(name.to_string(), Value::Nested(Box::new(element)));
        }
        self
    }

    pub fn nested_list(mut self, name: &str, elements: Vec<StructuralElement>) -> Self {
        if !elements.is_empty() {
            self.fields.insert(name.to_string(), Value::Array(elements));
        }
        self
    }

    /// Carry an already-built value over unchanged
    pub fn raw(mut self, name: &str, value: Option<&Value>) -> Self {
        if let Some(value) = value {
            self.fields.insert(name.to_string(), value.clone());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_element(self, kind: ElementKind, target: Option<&Target>) -> StructuralElement {
        StructuralElement::new(kind, target.cloned(), self.fields)
    }
}

/// Fill in schema and catalog from the document defaults when not declared
fn schema_and_catalog(
    schema: Option<&str>,
    catalog: Option<&str>,
    defaults: &MappingDefaults,
) -> (Option<String>, Option<String>) {
    let schema = schema
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| defaults.schema.clone());
    let catalog = catalog
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .or_else(|| defaults.catalog.clone());
    (schema, catalog)
}

/// `@Column` from a column declaration
pub fn column(column: &ColumnSource, target: Option<&Target>) -> StructuralElement {
    ValueTable::new()
        .string("name", column.name.as_deref())
        .string("columnDefinition", column.column_definition.as_deref())
        .string("table", column.table.as_deref())
        .boolean("unique", column.unique)
        .boolean("nullable", column.nullable)
        .boolean("insertable", column.insertable)
        .boolean("updatable", column.updatable)
        .integer("length", column.length)
        .integer("precision", column.precision)
        .integer("scale", column.scale)
        .into_element(ElementKind::Column, target)
}

/// `@JoinColumn` from a join column declaration
pub fn join_column(column: &JoinColumnSource, target: Option<&Target>) -> StructuralElement {
    ValueTable::new()
        .string("name", column.name.as_deref())
        .string("columnDefinition", column.column_definition.as_deref())
        .string("table", column.table.as_deref())
        .string("referencedColumnName", column.referenced_column_name.as_deref())
        .boolean("unique", column.unique)
        .boolean("nullable", column.nullable)
        .boolean("insertable", column.insertable)
        .boolean("updatable", column.updatable)
        .into_element(ElementKind::JoinColumn, target)
}

/// Join columns as a detached, ordered list for nesting
pub fn nested_join_columns(columns: &[JoinColumnSource]) -> Vec<StructuralElement> {
    columns.iter().map(|c| join_column(c, None)).collect()
}

/// One join column as a scalar element, several as a `JoinColumns` wrapper
pub fn join_column_list(
    columns: &[JoinColumnSource],
    target: Option<&Target>,
) -> Option<StructuralElement> {
    match columns {
        [] => None,
        [single] => Some(join_column(single, target)),
        _ => Some(StructuralElement::wrapper(
            ElementKind::JoinColumns,
            target.cloned(),
            nested_join_columns(columns),
        )),
    }
}

/// `@UniqueConstraint`, always nested
pub fn unique_constraint(constraint: &UniqueConstraintSource) -> StructuralElement {
    ValueTable::new()
        .string("name", constraint.name.as_deref())
        .strings("columnNames", &constraint.column_names)
        .into_element(ElementKind::UniqueConstraint, None)
}

/// Nested unique constraints in declaration order
pub fn nested_unique_constraints(constraints: &[UniqueConstraintSource]) -> Vec<StructuralElement> {
    constraints.iter().map(unique_constraint).collect()
}

/// `@JoinTable`, with schema and catalog defaulted from the document
pub fn join_table(
    join_table: &JoinTableSource,
    defaults: &MappingDefaults,
    target: Option<&Target>,
) -> StructuralElement {
    let (schema, catalog) =
        schema_and_catalog(join_table.schema.as_deref(), join_table.catalog.as_deref(), defaults);
    ValueTable::new()
        .string("name", join_table.name.as_deref())
        .string("catalog", catalog.as_deref())
        .string("schema", schema.as_deref())
        .nested_list("joinColumns", nested_join_columns(&join_table.join_columns))
        .nested_list(
            "inverseJoinColumns",
            nested_join_columns(&join_table.inverse_join_columns),
        )
        .nested_list(
            "uniqueConstraints",
            nested_unique_constraints(&join_table.unique_constraints),
        )
        .into_element(ElementKind::JoinTable, target)
}

/// `@CollectionTable`, with schema and catalog defaulted from the document
pub fn collection_table(
    collection_table: &CollectionTableSource,
    defaults: &MappingDefaults,
    target: Option<&Target>,
) -> StructuralElement {
    let (schema, catalog) = schema_and_catalog(
        collection_table.schema.as_deref(),
        collection_table.catalog.as_deref(),
        defaults,
    );
    ValueTable::new()
        .string("name", collection_table.name.as_deref())
        .string("catalog", catalog.as_deref())
        .string("schema", schema.as_deref())
        .nested_list(
            "joinColumns",
            nested_join_columns(&collection_table.join_columns),
        )
        .nested_list(
            "uniqueConstraints",
            nested_unique_constraints(&collection_table.unique_constraints),
        )
        .into_element(ElementKind::CollectionTable, target)
}

/// `@OrderColumn`
pub fn order_column(column: &OrderColumnSource, target: Option<&Target>) -> StructuralElement {
    ValueTable::new()
        .string("name", column.name.as_deref())
        .string("columnDefinition", column.column_definition.as_deref())
        .boolean("nullable", column.nullable)
        .boolean("insertable", column.insertable)
        .boolean("updatable", column.updatable)
        .into_element(ElementKind::OrderColumn, target)
}

/// `@PrimaryKeyJoinColumn`
pub fn primary_key_join_column(
    column: &PrimaryKeyJoinColumnSource,
    target: Option<&Target>,
) -> StructuralElement {
    ValueTable::new()
        .string("name", column.name.as_deref())
        .string("referencedColumnName", column.referenced_column_name.as_deref())
        .string("columnDefinition", column.column_definition.as_deref())
        .into_element(ElementKind::PrimaryKeyJoinColumn, target)
}

/// One primary-key join column as a scalar element, several as a wrapper
pub fn primary_key_join_column_list(
    columns: &[PrimaryKeyJoinColumnSource],
    target: Option<&Target>,
) -> Option<StructuralElement> {
    match columns {
        [] => None,
        [single] => Some(primary_key_join_column(single, target)),
        _ => Some(StructuralElement::wrapper(
            ElementKind::PrimaryKeyJoinColumns,
            target.cloned(),
            columns
                .iter()
                .map(|c| primary_key_join_column(c, None))
                .collect(),
        )),
    }
}

/// `@Lob` marker
pub fn lob(target: Option<&Target>) -> StructuralElement {
    StructuralElement::marker(ElementKind::Lob, target.cloned())
}

/// `@Temporal` with its precision
pub fn temporal(temporal: TemporalType, target: Option<&Target>) -> StructuralElement {
    ValueTable::new()
        .enum_value("value", "TemporalType", Some(temporal.as_str()))
        .into_element(ElementKind::Temporal, target)
}

/// `@Enumerated` with its storage representation
pub fn enumerated(enum_type: EnumType, target: Option<&Target>) -> StructuralElement {
    ValueTable::new()
        .enum_value("value", "EnumType", Some(enum_type.as_str()))
        .into_element(ElementKind::Enumerated, target)
}

/// `@AttributeOverride` from a document declaration
pub fn attribute_override(
    source: &AttributeOverrideSource,
    target: Option<&Target>,
) -> StructuralElement {
    ValueTable::new()
        .string("name", Some(source.name.as_str()))
        .nested("column", source.column.as_ref().map(|c| column(c, None)))
        .into_element(ElementKind::AttributeOverride, target)
}

/// `@AssociationOverride` from a document declaration
pub fn association_override(
    source: &AssociationOverrideSource,
    defaults: &MappingDefaults,
    target: Option<&Target>,
) -> StructuralElement {
    ValueTable::new()
        .string("name", Some(source.name.as_str()))
        .nested_list("joinColumns", nested_join_columns(&source.join_columns))
        .nested(
            "joinTable",
            source
                .join_table
                .as_ref()
                .map(|t| join_table(t, defaults, None)),
        )
        .into_element(ElementKind::AssociationOverride, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_omits_unset_fields() {
        let source = ColumnSource {
            name: Some("ADDR".to_string()),
            column_definition: Some(String::new()),
            nullable: Some(false),
            length: Some(80),
            ..Default::default()
        };
        let element = column(&source, None);

        assert_eq!(element.kind, ElementKind::Column);
        let names: Vec<&str> = element.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name", "nullable", "length"]);
        assert_eq!(element.field("nullable"), Some(&Value::Bool(false)));
        assert_eq!(element.field("length"), Some(&Value::Int(80)));
        assert!(element.target.is_none());
    }

    #[test]
    fn test_empty_column_has_no_fields() {
        let element = column(&ColumnSource::default(), Some(&Target::field("A", "b")));
        assert!(element.fields.is_empty());
        assert_eq!(element.target, Some(Target::field("A", "b")));
    }

    #[test]
    fn test_join_column_list_arity() {
        let target = Target::field("Order", "customer");
        assert!(join_column_list(&[], Some(&target)).is_none());

        let single =
            join_column_list(&[JoinColumnSource::named("CUST_ID")], Some(&target)).unwrap();
        assert_eq!(single.kind, ElementKind::JoinColumn);
        assert_eq!(single.name(), Some("CUST_ID"));

        let several = join_column_list(
            &[JoinColumnSource::named("A"), JoinColumnSource::named("B")],
            Some(&target),
        )
        .unwrap();
        assert_eq!(several.kind, ElementKind::JoinColumns);
        let members: Vec<_> = several.members().iter().map(|m| m.name().unwrap()).collect();
        assert_eq!(members, vec!["A", "B"]);
        assert!(several.members().iter().all(|m| m.target.is_none()));
    }

    #[test]
    fn test_join_table_applies_defaults_and_nests_in_order() {
        let defaults = MappingDefaults {
            schema: Some("SALES".to_string()),
            catalog: Some("MAIN".to_string()),
            ..Default::default()
        };
        let source = JoinTableSource {
            name: Some("ORDER_ITEM".to_string()),
            catalog: Some("ARCHIVE".to_string()),
            join_columns: vec![JoinColumnSource::named("ORDER_ID")],
            inverse_join_columns: vec![
                JoinColumnSource::named("ITEM_ID"),
                JoinColumnSource::named("ITEM_REV"),
            ],
            unique_constraints: vec![UniqueConstraintSource {
                name: None,
                column_names: vec!["ORDER_ID".to_string(), "ITEM_ID".to_string()],
            }],
            ..Default::default()
        };
        let element = join_table(&source, &defaults, None);

        assert_eq!(element.string_field("schema"), Some("SALES"));
        assert_eq!(element.string_field("catalog"), Some("ARCHIVE"));
        let inverse = element.field("inverseJoinColumns").unwrap().as_array().unwrap();
        assert_eq!(inverse[0].name(), Some("ITEM_ID"));
        assert_eq!(inverse[1].name(), Some("ITEM_REV"));
        let constraints = element.field("uniqueConstraints").unwrap().as_array().unwrap();
        assert_eq!(
            constraints[0].field("columnNames").unwrap().as_string_array().unwrap(),
            ["ORDER_ID".to_string(), "ITEM_ID".to_string()]
        );
    }

    #[test]
    fn test_attribute_override_nests_column() {
        let source = AttributeOverrideSource::new("address", ColumnSource::named("ADDR2"));
        let element = attribute_override(&source, Some(&Target::class("Customer")));

        assert_eq!(element.name(), Some("address"));
        let nested = element.field("column").unwrap().as_nested().unwrap();
        assert_eq!(nested.name(), Some("ADDR2"));
        assert!(nested.target.is_none());
    }

    #[test]
    fn test_association_override_without_join_data() {
        let source = AssociationOverrideSource::new("owner", Vec::new());
        let element = association_override(&source, &MappingDefaults::default(), None);
        let names: Vec<&str> = element.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn test_temporal_and_enumerated_values() {
        let element = temporal(TemporalType::Date, None);
        assert_eq!(
            element.field("value"),
            Some(&Value::Enum {
                type_name: "TemporalType".to_string(),
                tag: "DATE".to_string()
            })
        );
        assert_eq!(
            enumerated(EnumType::String, None).string_field("value"),
            Some("STRING")
        );
        assert!(lob(None).fields.is_empty());
    }

    #[test]
    fn test_primary_key_join_column_list_arity() {
        let target = Target::class("Manager");
        let one = [PrimaryKeyJoinColumnSource {
            name: Some("EMP_ID".to_string()),
            ..Default::default()
        }];
        assert_eq!(
            primary_key_join_column_list(&one, Some(&target)).unwrap().kind,
            ElementKind::PrimaryKeyJoinColumn
        );
        let two = [one[0].clone(), one[0].clone()];
        let wrapper = primary_key_join_column_list(&two, Some(&target)).unwrap();
        assert_eq!(wrapper.kind, ElementKind::PrimaryKeyJoinColumns);
        assert_eq!(wrapper.members().len(), 2);
    }
}
