//! Global declaration mocker
//!
//! Builds generator, query and result-set mapping elements from a mapping
//! document's global declarations and registers them in the session registry.
//! Every declaration is built before any is registered, so a failure leaves
//! the registry untouched.

use tracing::debug;

use super::classes::{ClassResolver, resolve_class};
use super::values::{ValueTable, nested_unique_constraints};
use crate::config::MappingDefaults;
use crate::error::{MockError, MockResult};
use crate::models::{
    ColumnResultSource, ElementKind, EntityResultSource, FieldResultSource, GlobalDeclarations,
    NamedNativeQuerySource, NamedQuerySource, QueryHintSource, SequenceGeneratorSource,
    SqlResultSetMappingSource, StructuralElement, TableGeneratorSource,
};
use crate::registry::{DeclarationKind, GlobalRegistry};

/// A built global declaration, ready to register
pub type BuiltDeclaration = (DeclarationKind, String, StructuralElement);

pub struct GlobalMocker<'a> {
    resolver: &'a dyn ClassResolver,
    defaults: &'a MappingDefaults,
}

impl<'a> GlobalMocker<'a> {
    pub fn new(resolver: &'a dyn ClassResolver, defaults: &'a MappingDefaults) -> Self {
        Self { resolver, defaults }
    }

    /// Build every declaration and register it; returns how many were registered
    pub fn process(
        &self,
        declarations: &GlobalDeclarations,
        registry: &mut GlobalRegistry,
    ) -> MockResult<usize> {
        let built = self.build_all(declarations)?;
        Ok(register_all(built, registry))
    }

    /// Build every declaration without registering any
    pub fn build_all(
        &self,
        declarations: &GlobalDeclarations,
    ) -> MockResult<Vec<BuiltDeclaration>> {
        let mut built = Vec::new();
        for generator in &declarations.table_generators {
            built.push(named(DeclarationKind::TableGenerator, table_generator(generator))?);
        }
        for generator in &declarations.sequence_generators {
            built.push(named(
                DeclarationKind::SequenceGenerator,
                sequence_generator(generator),
            )?);
        }
        for query in &declarations.named_queries {
            built.push(named(DeclarationKind::NamedQuery, named_query(query))?);
        }
        for query in &declarations.named_native_queries {
            built.push(named(
                DeclarationKind::NamedNativeQuery,
                self.named_native_query(query)?,
            )?);
        }
        for mapping in &declarations.sql_result_set_mappings {
            built.push(named(
                DeclarationKind::SqlResultSetMapping,
                self.sql_result_set_mapping(mapping)?,
            )?);
        }
        Ok(built)
    }

    fn resolve(&self, class_name: Option<&str>, context: &str) -> MockResult<Option<String>> {
        class_name
            .filter(|c| !c.is_empty())
            .map(|c| resolve_class(self.resolver, self.defaults, c, context))
            .transpose()
    }

    /// `@NamedNativeQuery`, resolving its result class
    pub fn named_native_query(
        &self,
        query: &NamedNativeQuerySource,
    ) -> MockResult<StructuralElement> {
        let result_class = self.resolve(query.result_class.as_deref(), "named native query")?;
        Ok(ValueTable::new()
            .string("name", query.name.as_deref())
            .string("query", query.query.as_deref())
            .string("resultSetMapping", query.result_set_mapping.as_deref())
            .class_value("resultClass", result_class.as_deref())
            .nested_list("hints", query_hints(&query.hints))
            .into_element(ElementKind::NamedNativeQuery, None))
    }

    /// `@SqlResultSetMapping`, resolving the class of each entity result
    pub fn sql_result_set_mapping(
        &self,
        mapping: &SqlResultSetMappingSource,
    ) -> MockResult<StructuralElement> {
        let entities = mapping
            .entities
            .iter()
            .map(|entity| self.entity_result(entity))
            .collect::<MockResult<Vec<_>>>()?;
        Ok(ValueTable::new()
            .string("name", mapping.name.as_deref())
            .nested_list("entities", entities)
            .nested_list(
                "columns",
                mapping.columns.iter().map(column_result).collect(),
            )
            .into_element(ElementKind::SqlResultSetMapping, None))
    }

    fn entity_result(&self, result: &EntityResultSource) -> MockResult<StructuralElement> {
        let entity_class = self.resolve(result.entity_class.as_deref(), "entity result")?;
        Ok(ValueTable::new()
            .string("discriminatorColumn", result.discriminator_column.as_deref())
            .nested_list("fields", result.fields.iter().map(field_result).collect())
            .class_value("entityClass", entity_class.as_deref())
            .into_element(ElementKind::EntityResult, None))
    }
}

/// Register built declarations in order; returns how many were registered
pub fn register_all(built: Vec<BuiltDeclaration>, registry: &mut GlobalRegistry) -> usize {
    let count = built.len();
    for (kind, name, element) in built {
        registry.register(kind, name, element);
    }
    debug!(count, "Registered document global declarations");
    count
}

fn named(kind: DeclarationKind, element: StructuralElement) -> MockResult<BuiltDeclaration> {
    let name = element
        .name()
        .ok_or(MockError::MissingName { kind: element.kind })?
        .to_string();
    Ok((kind, name, element))
}

/// `@TableGenerator`
pub fn table_generator(generator: &TableGeneratorSource) -> StructuralElement {
    ValueTable::new()
        .string("name", generator.name.as_deref())
        .string("catalog", generator.catalog.as_deref())
        .string("schema", generator.schema.as_deref())
        .string("table", generator.table.as_deref())
        .string("pkColumnName", generator.pk_column_name.as_deref())
        .string("valueColumnName", generator.value_column_name.as_deref())
        .string("pkColumnValue", generator.pk_column_value.as_deref())
        .integer("initialValue", generator.initial_value)
        .integer("allocationSize", generator.allocation_size)
        .nested_list(
            "uniqueConstraints",
            nested_unique_constraints(&generator.unique_constraints),
        )
        .into_element(ElementKind::TableGenerator, None)
}

/// `@SequenceGenerator`
pub fn sequence_generator(generator: &SequenceGeneratorSource) -> StructuralElement {
    ValueTable::new()
        .string("name", generator.name.as_deref())
        .string("catalog", generator.catalog.as_deref())
        .string("schema", generator.schema.as_deref())
        .string("sequenceName", generator.sequence_name.as_deref())
        .integer("initialValue", generator.initial_value)
        .integer("allocationSize", generator.allocation_size)
        .into_element(ElementKind::SequenceGenerator, None)
}

/// `@NamedQuery` with its lock mode and hints
pub fn named_query(query: &NamedQuerySource) -> StructuralElement {
    ValueTable::new()
        .string("name", query.name.as_deref())
        .string("query", query.query.as_deref())
        .enum_value(
            "lockMode",
            "LockModeType",
            query.lock_mode.as_ref().map(|m| m.as_str()),
        )
        .nested_list("hints", query_hints(&query.hints))
        .into_element(ElementKind::NamedQuery, None)
}

fn query_hints(hints: &[QueryHintSource]) -> Vec<StructuralElement> {
    hints
        .iter()
        .map(|hint| {
            ValueTable::new()
                .string("name", hint.name.as_deref())
                .string("value", hint.value.as_deref())
                .into_element(ElementKind::QueryHint, None)
        })
        .collect()
}

fn field_result(result: &FieldResultSource) -> StructuralElement {
    ValueTable::new()
        .string("name", result.name.as_deref())
        .string("column", result.column.as_deref())
        .into_element(ElementKind::FieldResult, None)
}

fn column_result(result: &ColumnResultSource) -> StructuralElement {
    ValueTable::new()
        .string("name", result.name.as_deref())
        .into_element(ElementKind::ColumnResult, None)
}
