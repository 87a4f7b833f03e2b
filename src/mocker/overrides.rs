//! Override merge engine
//!
//! Reconciles the attribute or association overrides a mapping document
//! declares for one target with the overrides already indexed for that target.
//! A document declaration replaces any indexed override of the same name;
//! indexed overrides the document does not name are carried forward with their
//! resolved fields. The merged set becomes a single override when it has one
//! member and a plural wrapper otherwise.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::values::{self, ValueTable};
use crate::config::MappingDefaults;
use crate::error::{MockError, MockResult};
use crate::index::AnnotationSource;
use crate::models::{
    AssociationOverrideSource, AttributeOverrideSource, ElementKind, StructuralElement, Target,
    Value,
};

/// Attribute overrides or association overrides
pub trait OverrideFamily {
    type Source: Clone;

    /// Kind of a single override
    const SCALAR: ElementKind;
    /// Kind of the wrapper holding several overrides
    const PLURAL: ElementKind;
    /// Fields copied from an indexed override when it is carried forward
    const CARRIED_FIELDS: &'static [&'static str];

    fn name(source: &Self::Source) -> &str;

    fn build(
        source: &Self::Source,
        defaults: &MappingDefaults,
        target: Option<&Target>,
    ) -> StructuralElement;
}

pub struct AttributeOverrideFamily;

impl OverrideFamily for AttributeOverrideFamily {
    type Source = AttributeOverrideSource;

    const SCALAR: ElementKind = ElementKind::AttributeOverride;
    const PLURAL: ElementKind = ElementKind::AttributeOverrides;
    const CARRIED_FIELDS: &'static [&'static str] = &["column"];

    fn name(source: &Self::Source) -> &str {
        &source.name
    }

    fn build(
        source: &Self::Source,
        _defaults: &MappingDefaults,
        target: Option<&Target>,
    ) -> StructuralElement {
        values::attribute_override(source, target)
    }
}

pub struct AssociationOverrideFamily;

impl OverrideFamily for AssociationOverrideFamily {
    type Source = AssociationOverrideSource;

    const SCALAR: ElementKind = ElementKind::AssociationOverride;
    const PLURAL: ElementKind = ElementKind::AssociationOverrides;
    const CARRIED_FIELDS: &'static [&'static str] = &["joinColumns", "joinTable"];

    fn name(source: &Self::Source) -> &str {
        &source.name
    }

    fn build(
        source: &Self::Source,
        defaults: &MappingDefaults,
        target: Option<&Target>,
    ) -> StructuralElement {
        values::association_override(source, defaults, target)
    }
}

/// One member of a merged override set
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideEntry<S> {
    /// Declared by the mapping document
    Explicit(S),
    /// Indexed earlier and not redeclared by the document
    CarriedForward {
        name: String,
        fields: IndexMap<String, Value>,
    },
}

impl<S> OverrideEntry<S> {
    pub fn is_explicit(&self) -> bool {
        matches!(self, OverrideEntry::Explicit(_))
    }
}

/// Merged overrides for one target: document entries first, carried entries after
pub struct OverrideSet<F: OverrideFamily> {
    target: Target,
    entries: Vec<OverrideEntry<F::Source>>,
}

impl<F: OverrideFamily> OverrideSet<F> {
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn entries(&self) -> &[OverrideEntry<F::Source>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Member names in merged order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(entry_name::<F>).collect()
    }

    /// Produce the declaration: scalar for one member, plural wrapper for several
    pub fn into_element(self, defaults: &MappingDefaults) -> Option<StructuralElement> {
        match self.entries.len() {
            0 => None,
            1 => self
                .entries
                .first()
                .map(|entry| build_entry::<F>(entry, defaults, Some(&self.target))),
            _ => {
                let members = self
                    .entries
                    .iter()
                    .map(|entry| build_entry::<F>(entry, defaults, None))
                    .collect();
                Some(StructuralElement::wrapper(
                    F::PLURAL,
                    Some(self.target),
                    members,
                ))
            }
        }
    }
}

fn entry_name<F: OverrideFamily>(entry: &OverrideEntry<F::Source>) -> &str {
    match entry {
        OverrideEntry::Explicit(source) => F::name(source),
        OverrideEntry::CarriedForward { name, .. } => name,
    }
}

fn build_entry<F: OverrideFamily>(
    entry: &OverrideEntry<F::Source>,
    defaults: &MappingDefaults,
    target: Option<&Target>,
) -> StructuralElement {
    match entry {
        OverrideEntry::Explicit(source) => F::build(source, defaults, target),
        OverrideEntry::CarriedForward { name, fields } => fields
            .iter()
            .fold(ValueTable::new().string("name", Some(name)), |table, (key, value)| {
                table.raw(key, Some(value))
            })
            .into_element(F::SCALAR, target),
    }
}

/// Merges document overrides with indexed ones
pub struct OverrideMerger<'a, I: AnnotationSource + ?Sized> {
    index: &'a I,
    defaults: &'a MappingDefaults,
    dedupe_document: bool,
}

impl<'a, I: AnnotationSource + ?Sized> OverrideMerger<'a, I> {
    pub fn new(index: &'a I, defaults: &'a MappingDefaults) -> Self {
        Self {
            index,
            defaults,
            dedupe_document: true,
        }
    }

    /// Collapse repeated names inside the document list (last declaration wins)
    pub fn with_dedupe_document(mut self, dedupe: bool) -> Self {
        self.dedupe_document = dedupe;
        self
    }

    /// Compute the merged override set for `target`
    ///
    /// Fails with an assertion failure when `target` is `None`. Returns
    /// `Ok(None)` when the document declares no overrides, leaving indexed
    /// overrides as they are.
    pub fn merge_set<F: OverrideFamily>(
        &self,
        declared: &[F::Source],
        target: Option<&Target>,
    ) -> MockResult<Option<OverrideSet<F>>> {
        let target = target
            .ok_or_else(|| MockError::AssertionFailure("target can not be null".to_string()))?;
        if declared.is_empty() {
            return Ok(None);
        }

        let mut entries = self.document_entries::<F>(declared, target)?;
        let mut names: HashSet<String> = entries
            .iter()
            .map(|e| entry_name::<F>(e).to_string())
            .collect();

        let class = target.class_name();
        let container = self
            .index
            .indexed(class, F::PLURAL)
            .iter()
            .find(|e| e.target.as_ref() == Some(target));
        if let Some(container) = container {
            for member in container.members() {
                Self::carry_forward::<F>(member, &mut names, &mut entries)?;
            }
        }
        for indexed in self
            .index
            .indexed(class, F::SCALAR)
            .iter()
            .filter(|e| e.target.as_ref() == Some(target))
        {
            Self::carry_forward::<F>(indexed, &mut names, &mut entries)?;
        }

        debug!(
            owner = ?target,
            kind = %F::SCALAR,
            declared = declared.len(),
            merged = entries.len(),
            "Merged overrides"
        );

        Ok(Some(OverrideSet {
            target: target.clone(),
            entries,
        }))
    }

    /// Merge and produce the resulting declaration for `target`
    pub fn merge<F: OverrideFamily>(
        &self,
        declared: &[F::Source],
        target: Option<&Target>,
    ) -> MockResult<Option<StructuralElement>> {
        Ok(self
            .merge_set::<F>(declared, target)?
            .and_then(|set| set.into_element(self.defaults)))
    }

    fn document_entries<F: OverrideFamily>(
        &self,
        declared: &[F::Source],
        target: &Target,
    ) -> MockResult<Vec<OverrideEntry<F::Source>>> {
        if declared.iter().any(|s| F::name(s).trim().is_empty()) {
            debug!(owner = ?target, kind = %F::SCALAR, "Override declared without a name");
            return Err(MockError::MissingName { kind: F::SCALAR });
        }
        if !self.dedupe_document {
            return Ok(declared.iter().cloned().map(OverrideEntry::Explicit).collect());
        }
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut entries: Vec<OverrideEntry<F::Source>> = Vec::with_capacity(declared.len());
        for source in declared {
            let name = F::name(source);
            match positions.get(name) {
                Some(&position) => {
                    warn!(
                        owner = ?target,
                        override_name = name,
                        "Override declared more than once; the last declaration wins"
                    );
                    entries[position] = OverrideEntry::Explicit(source.clone());
                }
                None => {
                    positions.insert(name, entries.len());
                    entries.push(OverrideEntry::Explicit(source.clone()));
                }
            }
        }
        Ok(entries)
    }

    fn carry_forward<F: OverrideFamily>(
        indexed: &StructuralElement,
        names: &mut HashSet<String>,
        entries: &mut Vec<OverrideEntry<F::Source>>,
    ) -> MockResult<()> {
        let name = indexed
            .name()
            .ok_or(MockError::MissingName { kind: F::SCALAR })?;
        if names.insert(name.to_string()) {
            let fields = F::CARRIED_FIELDS
                .iter()
                .filter_map(|field| {
                    indexed
                        .field(field)
                        .map(|value| (field.to_string(), value.clone()))
                })
                .collect();
            entries.push(OverrideEntry::CarriedForward {
                name: name.to_string(),
                fields,
            });
        }
        Ok(())
    }
}

/// Merge document attribute overrides for `target` against `index`
pub fn merge_attribute_overrides<I: AnnotationSource + ?Sized>(
    index: &I,
    defaults: &MappingDefaults,
    declared: &[AttributeOverrideSource],
    target: Option<&Target>,
) -> MockResult<Option<StructuralElement>> {
    OverrideMerger::new(index, defaults).merge::<AttributeOverrideFamily>(declared, target)
}

/// Merge document association overrides for `target` against `index`
pub fn merge_association_overrides<I: AnnotationSource + ?Sized>(
    index: &I,
    defaults: &MappingDefaults,
    declared: &[AssociationOverrideSource],
    target: Option<&Target>,
) -> MockResult<Option<StructuralElement>> {
    OverrideMerger::new(index, defaults).merge::<AssociationOverrideFamily>(declared, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::AnnotationIndex;
    use crate::models::{ColumnSource, JoinColumnSource};

    fn indexed_attribute_override(
        name: &str,
        column: &str,
        target: Option<&Target>,
    ) -> StructuralElement {
        values::attribute_override(
            &AttributeOverrideSource::new(name, ColumnSource::named(column)),
            target,
        )
    }

    fn column_name(element: &StructuralElement) -> Option<&str> {
        element.field("column")?.as_nested()?.name()
    }

    #[test]
    fn test_null_target_is_assertion_failure() {
        let index = AnnotationIndex::new();
        let defaults = MappingDefaults::default();
        let declared = vec![AttributeOverrideSource::new("addr", ColumnSource::named("A"))];

        let err = merge_attribute_overrides(&index, &defaults, &declared, None).unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("target can not be null"));

        let err = merge_attribute_overrides(&index, &defaults, &[], None).unwrap_err();
        assert!(err.is_assertion());
    }

    #[test]
    fn test_empty_declaration_yields_nothing() {
        let target = Target::class("Customer");
        let index = AnnotationIndex::from_elements(vec![indexed_attribute_override(
            "addr",
            "ADDR1",
            Some(&target),
        )]);
        let defaults = MappingDefaults::default();
        let result = merge_attribute_overrides(&index, &defaults, &[], Some(&target)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_document_wins_and_new_names_are_added() {
        let target = Target::class("Customer");
        let index = AnnotationIndex::from_elements(vec![indexed_attribute_override(
            "addr",
            "ADDR1",
            Some(&target),
        )]);
        let declared = vec![
            AttributeOverrideSource::new("addr", ColumnSource::named("ADDR2")),
            AttributeOverrideSource::new("city", ColumnSource::named("CITY")),
        ];

        let merged =
            merge_attribute_overrides(&index, &MappingDefaults::default(), &declared, Some(&target))
                .unwrap()
                .unwrap();

        assert_eq!(merged.kind, ElementKind::AttributeOverrides);
        assert_eq!(merged.target, Some(target));
        let members = merged.members();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name(), Some("addr"));
        assert_eq!(column_name(&members[0]), Some("ADDR2"));
        assert_eq!(members[1].name(), Some("city"));
        assert_eq!(column_name(&members[1]), Some("CITY"));
        assert!(members.iter().all(|m| m.target.is_none()));
    }

    #[test]
    fn test_indexed_only_names_are_carried_forward() {
        let target = Target::class("Customer");
        let index = AnnotationIndex::from_elements(vec![
            indexed_attribute_override("zip", "ZIP_CODE", Some(&target)),
            indexed_attribute_override("other", "ELSEWHERE", Some(&Target::class("Supplier"))),
        ]);
        let declared = vec![AttributeOverrideSource::new("addr", ColumnSource::named("ADDR"))];
        let defaults = MappingDefaults::default();
        let merger = OverrideMerger::new(&index, &defaults);

        let set = merger
            .merge_set::<AttributeOverrideFamily>(&declared, Some(&target))
            .unwrap()
            .unwrap();
        assert_eq!(set.names(), vec!["addr", "zip"]);
        assert!(set.entries()[0].is_explicit());
        assert!(!set.entries()[1].is_explicit());

        let merged = set.into_element(&defaults).unwrap();
        let carried = &merged.members()[1];
        assert_eq!(carried.kind, ElementKind::AttributeOverride);
        assert_eq!(
            carried.field("column"),
            index.indexed("Customer", ElementKind::AttributeOverride)[0].field("column")
        );
    }

    #[test]
    fn test_container_members_are_unwrapped() {
        let target = Target::field("Order", "shippingAddress");
        let container = StructuralElement::wrapper(
            ElementKind::AttributeOverrides,
            Some(target.clone()),
            vec![
                indexed_attribute_override("street", "SHIP_STREET", None),
                indexed_attribute_override("city", "SHIP_CITY", None),
            ],
        );
        let index = AnnotationIndex::from_elements(vec![container]);
        let declared = vec![AttributeOverrideSource::new("city", ColumnSource::named("TOWN"))];

        let merged =
            merge_attribute_overrides(&index, &MappingDefaults::default(), &declared, Some(&target))
                .unwrap()
                .unwrap();
        let members = merged.members();
        assert_eq!(members.len(), 2);
        assert_eq!(column_name(&members[0]), Some("TOWN"));
        assert_eq!(members[1].name(), Some("street"));
        assert_eq!(column_name(&members[1]), Some("SHIP_STREET"));
    }

    #[test]
    fn test_single_result_is_scalar() {
        let target = Target::class("Customer");
        let index = AnnotationIndex::from_elements(vec![indexed_attribute_override(
            "addr",
            "ADDR1",
            Some(&target),
        )]);
        let declared = vec![AttributeOverrideSource::new("addr", ColumnSource::named("ADDR2"))];

        let merged =
            merge_attribute_overrides(&index, &MappingDefaults::default(), &declared, Some(&target))
                .unwrap()
                .unwrap();
        assert_eq!(merged.kind, ElementKind::AttributeOverride);
        assert_eq!(merged.target, Some(target));
        assert_eq!(column_name(&merged), Some("ADDR2"));
    }

    #[test]
    fn test_repeated_document_names_collapse_to_last() {
        let target = Target::class("Customer");
        let index = AnnotationIndex::new();
        let declared = vec![
            AttributeOverrideSource::new("addr", ColumnSource::named("FIRST")),
            AttributeOverrideSource::new("city", ColumnSource::named("CITY")),
            AttributeOverrideSource::new("addr", ColumnSource::named("SECOND")),
        ];
        let defaults = MappingDefaults::default();
        let merger = OverrideMerger::new(&index, &defaults);

        let set = merger
            .merge_set::<AttributeOverrideFamily>(&declared, Some(&target))
            .unwrap()
            .unwrap();
        assert_eq!(set.names(), vec!["addr", "city"]);
        let merged = set.into_element(&defaults).unwrap();
        assert_eq!(column_name(&merged.members()[0]), Some("SECOND"));

        let raw = merger
            .with_dedupe_document(false)
            .merge_set::<AttributeOverrideFamily>(&declared, Some(&target))
            .unwrap()
            .unwrap();
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn test_association_overrides_carry_join_data() {
        let target = Target::class("Employee");
        let indexed = values::association_override(
            &AssociationOverrideSource::new(
                "manager",
                vec![JoinColumnSource::named("MGR_ID")],
            ),
            &MappingDefaults::default(),
            Some(&target),
        );
        let index = AnnotationIndex::from_elements(vec![indexed]);
        let declared = vec![AssociationOverrideSource::new(
            "department",
            vec![JoinColumnSource::named("DEPT_ID")],
        )];

        let merged = merge_association_overrides(
            &index,
            &MappingDefaults::default(),
            &declared,
            Some(&target),
        )
        .unwrap()
        .unwrap();

        assert_eq!(merged.kind, ElementKind::AssociationOverrides);
        let carried = &merged.members()[1];
        assert_eq!(carried.name(), Some("manager"));
        let join_columns = carried.field("joinColumns").unwrap().as_array().unwrap();
        assert_eq!(join_columns[0].name(), Some("MGR_ID"));
        assert!(carried.field("joinTable").is_none());
    }

    #[test]
    fn test_indexed_override_without_name_is_rejected() {
        let target = Target::class("Customer");
        let nameless =
            StructuralElement::marker(ElementKind::AttributeOverride, Some(target.clone()));
        let index = AnnotationIndex::from_elements(vec![nameless]);
        let declared = vec![AttributeOverrideSource::new("addr", ColumnSource::named("A"))];

        let defaults = MappingDefaults::default();
        let err = merge_attribute_overrides(&index, &defaults, &declared, Some(&target))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_document_override_without_name_is_rejected() {
        let target = Target::class("Order");
        let index = AnnotationIndex::new();
        let defaults = MappingDefaults::default();
        let declared = vec![
            AssociationOverrideSource::new("customer", vec![JoinColumnSource::named("CUST_ID")]),
            AssociationOverrideSource::new(" ", vec![JoinColumnSource::named("OTHER_ID")]),
        ];

        let err = merge_association_overrides(&index, &defaults, &declared, Some(&target))
            .unwrap_err();
        assert!(matches!(
            err,
            MockError::MissingName {
                kind: ElementKind::AssociationOverride
            }
        ));

        let undeduped = OverrideMerger::new(&index, &defaults)
            .with_dedupe_document(false)
            .merge::<AssociationOverrideFamily>(&declared, Some(&target));
        assert!(undeduped.is_err());
    }
}
