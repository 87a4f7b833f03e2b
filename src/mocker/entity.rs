//! Entity-level mocker
//!
//! Turns one entity, mapped superclass or embeddable declared in a mapping
//! document into annotation-equivalent elements in the annotation index.
//! Processing runs in two phases: `pre_process` registers the class and its
//! explicit access type for every document entity before `process` builds the
//! remaining elements, so access lookups see every class of the document.

use tracing::{debug, info_span};

use super::classes::{ClassResolver, resolve_class};
use super::overrides::{AssociationOverrideFamily, AttributeOverrideFamily, OverrideMerger};
use super::values::{self, ValueTable};
use crate::config::MappingDefaults;
use crate::error::{MockError, MockResult};
use crate::index::{AnnotationIndex, AnnotationSource};
use crate::models::{
    AccessType, AssociationAttributeSource, AssociationType, BasicAttributeSource, CascadeType,
    ElementKind, EntityObjectSource, LifecycleCallbacks, StructuralElement, Target,
};

/// An element waiting to be written, with the kinds it supersedes on its target
struct Pending {
    element: StructuralElement,
    superseded: &'static [ElementKind],
}

impl Pending {
    fn new(element: StructuralElement, superseded: &'static [ElementKind]) -> Self {
        Self {
            element,
            superseded,
        }
    }
}

pub struct EntityObjectMocker<'a> {
    source: &'a EntityObjectSource,
    defaults: &'a MappingDefaults,
    resolver: &'a dyn ClassResolver,
    dedupe_document: bool,
    class_name: Option<String>,
}

impl<'a> EntityObjectMocker<'a> {
    pub fn new(
        source: &'a EntityObjectSource,
        defaults: &'a MappingDefaults,
        resolver: &'a dyn ClassResolver,
    ) -> Self {
        Self {
            source,
            defaults,
            resolver,
            dedupe_document: true,
            class_name: None,
        }
    }

    pub fn with_dedupe_document(mut self, dedupe: bool) -> Self {
        self.dedupe_document = dedupe;
        self
    }

    /// The qualified class name, once `pre_process` has run
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Register the class, its metadata-complete flag and its explicit access type
    pub fn pre_process(&mut self, index: &mut AnnotationIndex) -> MockResult<()> {
        if self.source.class_name.trim().is_empty() {
            return Err(MockError::Configuration(
                "entity declaration is missing its class name".to_string(),
            ));
        }
        let class_name = self.defaults.qualify_class_name(&self.source.class_name);
        index.create_class(&class_name);
        if self.source.metadata_complete {
            index.mark_metadata_complete(&class_name);
        }
        if let Some(access) = self.source.access {
            index.replace(
                access_element(access, &Target::class(&class_name)),
                &[ElementKind::Access],
            );
        }
        self.class_name = Some(class_name);
        Ok(())
    }

    /// Build and write every remaining element of this entity
    ///
    /// Elements are built against the current index before any is written, so
    /// a failure leaves the index as `pre_process` left it. Returns the number
    /// of elements written.
    pub fn process(&self, index: &mut AnnotationIndex) -> MockResult<usize> {
        let class_name = self.class_name.as_deref().ok_or_else(|| {
            MockError::AssertionFailure("preProcess should be called before process".to_string())
        })?;
        let _span = info_span!("mock_entity", class = %class_name).entered();

        let pending = self.build(index, class_name)?;
        let written = pending.len();
        for Pending {
            element,
            superseded,
        } in pending
        {
            index.replace(element, superseded);
        }
        debug!(written, "Entity elements written");
        Ok(written)
    }

    fn build(&self, index: &AnnotationIndex, class_name: &str) -> MockResult<Vec<Pending>> {
        let source = self.source;
        let class_target = Target::class(class_name);
        let merger =
            OverrideMerger::new(index, self.defaults).with_dedupe_document(self.dedupe_document);
        let mut pending = Vec::new();

        let access = match source.access {
            Some(access) => access,
            None => {
                let inherited = index.access_of(class_name).or(self.defaults.access);
                if let Some(access) = inherited {
                    pending.push(Pending::new(
                        access_element(access, &class_target),
                        &[ElementKind::Access],
                    ));
                }
                inherited.unwrap_or(AccessType::Field)
            }
        };

        if source.exclude_default_listeners {
            pending.push(Pending::new(
                StructuralElement::marker(
                    ElementKind::ExcludeDefaultListeners,
                    Some(class_target.clone()),
                ),
                &[ElementKind::ExcludeDefaultListeners],
            ));
        }
        if source.exclude_superclass_listeners {
            pending.push(Pending::new(
                StructuralElement::marker(
                    ElementKind::ExcludeSuperclassListeners,
                    Some(class_target.clone()),
                ),
                &[ElementKind::ExcludeSuperclassListeners],
            ));
        }

        if let Some(id_class) = source.id_class.as_deref().filter(|c| !c.is_empty()) {
            let resolved = resolve_class(self.resolver, self.defaults, id_class, "id class")?;
            pending.push(Pending::new(
                ValueTable::new()
                    .class_value("value", Some(resolved.as_str()))
                    .into_element(ElementKind::IdClass, Some(&class_target)),
                &[ElementKind::IdClass],
            ));
        }

        if let Some(element) = merger
            .merge::<AttributeOverrideFamily>(&source.attribute_overrides, Some(&class_target))?
        {
            pending.push(Pending::new(element, ATTRIBUTE_OVERRIDE_KINDS));
        }
        if let Some(element) = merger.merge::<AssociationOverrideFamily>(
            &source.association_overrides,
            Some(&class_target),
        )? {
            pending.push(Pending::new(element, ASSOCIATION_OVERRIDE_KINDS));
        }

        if let Some(element) = values::primary_key_join_column_list(
            &source.primary_key_join_columns,
            Some(&class_target),
        ) {
            pending.push(Pending::new(
                element,
                &[
                    ElementKind::PrimaryKeyJoinColumn,
                    ElementKind::PrimaryKeyJoinColumns,
                ],
            ));
        }

        for attribute in &source.basic_attributes {
            let target = attribute_target(class_name, &attribute.name, access);
            self.basic_attribute(attribute, &target, &mut pending);
        }
        for attribute in &source.associations {
            let target = attribute_target(class_name, &attribute.name, access);
            self.association(&merger, attribute, &target, &mut pending)?;
        }

        // Transient always applies to the field
        for name in &source.transient_attributes {
            pending.push(Pending::new(
                StructuralElement::marker(
                    ElementKind::Transient,
                    Some(Target::field(class_name, name)),
                ),
                &[ElementKind::Transient],
            ));
        }

        self.listeners(&class_target, &mut pending)?;
        lifecycle_callbacks(class_name, &source.callbacks, &mut pending);

        Ok(pending)
    }

    /// `EntityListeners` on the class, plus the callbacks of each listener class
    fn listeners(&self, class_target: &Target, pending: &mut Vec<Pending>) -> MockResult<()> {
        let listeners = &self.source.entity_listeners;
        if listeners.is_empty() {
            return Ok(());
        }
        let mut classes = Vec::with_capacity(listeners.len());
        for listener in listeners {
            if listener.class_name.trim().is_empty() {
                return Err(MockError::Configuration(format!(
                    "entity listener of {} is missing its class name",
                    class_target.class_name()
                )));
            }
            classes.push(resolve_class(
                self.resolver,
                self.defaults,
                &listener.class_name,
                "entity listener",
            )?);
        }

        pending.push(Pending::new(
            ValueTable::new()
                .class_values("value", &classes)
                .into_element(ElementKind::EntityListeners, Some(class_target)),
            &[ElementKind::EntityListeners],
        ));
        for (listener, class) in listeners.iter().zip(&classes) {
            lifecycle_callbacks(class, &listener.callbacks, pending);
        }
        Ok(())
    }

    fn basic_attribute(
        &self,
        attribute: &BasicAttributeSource,
        target: &Target,
        pending: &mut Vec<Pending>,
    ) {
        if let Some(column) = &attribute.column {
            pending.push(Pending::new(
                values::column(column, Some(target)),
                &[ElementKind::Column],
            ));
        }
        if attribute.lob {
            pending.push(Pending::new(values::lob(Some(target)), &[ElementKind::Lob]));
        }
        if let Some(temporal) = attribute.temporal {
            pending.push(Pending::new(
                values::temporal(temporal, Some(target)),
                &[ElementKind::Temporal],
            ));
        }
        if let Some(enum_type) = attribute.enumerated {
            pending.push(Pending::new(
                values::enumerated(enum_type, Some(target)),
                &[ElementKind::Enumerated],
            ));
        }
    }

    fn association(
        &self,
        merger: &OverrideMerger<'_, AnnotationIndex>,
        attribute: &AssociationAttributeSource,
        target: &Target,
        pending: &mut Vec<Pending>,
    ) -> MockResult<()> {
        if let Some(element) = self.association_element(attribute, target)? {
            pending.push(Pending::new(element, ASSOCIATION_KINDS));
        }
        if let Some(element) = values::join_column_list(&attribute.join_columns, Some(target)) {
            pending.push(Pending::new(
                element,
                &[ElementKind::JoinColumn, ElementKind::JoinColumns],
            ));
        }
        if let Some(join_table) = &attribute.join_table {
            pending.push(Pending::new(
                values::join_table(join_table, self.defaults, Some(target)),
                &[ElementKind::JoinTable],
            ));
        }
        if let Some(collection_table) = &attribute.collection_table {
            pending.push(Pending::new(
                values::collection_table(collection_table, self.defaults, Some(target)),
                &[ElementKind::CollectionTable],
            ));
        }
        if let Some(order_column) = &attribute.order_column {
            pending.push(Pending::new(
                values::order_column(order_column, Some(target)),
                &[ElementKind::OrderColumn],
            ));
        }
        if let Some(element) =
            merger.merge::<AttributeOverrideFamily>(&attribute.attribute_overrides, Some(target))?
        {
            pending.push(Pending::new(element, ATTRIBUTE_OVERRIDE_KINDS));
        }
        if let Some(element) = merger
            .merge::<AssociationOverrideFamily>(&attribute.association_overrides, Some(target))?
        {
            pending.push(Pending::new(element, ASSOCIATION_OVERRIDE_KINDS));
        }
        Ok(())
    }

    /// The association annotation itself, carrying target entity and cascade
    ///
    /// With `cascadePersist` set in the defaults, `PERSIST` joins the declared
    /// cascade unless `ALL` or `PERSIST` is already there.
    fn association_element(
        &self,
        attribute: &AssociationAttributeSource,
        target: &Target,
    ) -> MockResult<Option<StructuralElement>> {
        let Some(association_type) = attribute.association_type else {
            if !attribute.cascade.is_empty() || attribute.target_entity.is_some() {
                return Err(MockError::Configuration(format!(
                    "association '{}' declares cascade or target entity without a type",
                    attribute.name
                )));
            }
            return Ok(None);
        };

        let target_entity = attribute
            .target_entity
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| resolve_class(self.resolver, self.defaults, c, "target entity"))
            .transpose()?;

        let mut cascade: Vec<&str> = attribute.cascade.iter().map(CascadeType::as_str).collect();
        if self.defaults.is_cascade_persist()
            && !attribute
                .cascade
                .iter()
                .any(|c| matches!(c, CascadeType::All | CascadeType::Persist))
        {
            cascade.push(CascadeType::Persist.as_str());
        }

        Ok(Some(
            ValueTable::new()
                .class_value("targetEntity", target_entity.as_deref())
                .enum_values("cascade", "CascadeType", &cascade)
                .into_element(association_kind(association_type), Some(target)),
        ))
    }
}

fn association_kind(association_type: AssociationType) -> ElementKind {
    match association_type {
        AssociationType::OneToOne => ElementKind::OneToOne,
        AssociationType::OneToMany => ElementKind::OneToMany,
        AssociationType::ManyToOne => ElementKind::ManyToOne,
        AssociationType::ManyToMany => ElementKind::ManyToMany,
    }
}

/// Callback markers on the methods of `class`
fn lifecycle_callbacks(class: &str, callbacks: &LifecycleCallbacks, pending: &mut Vec<Pending>) {
    for (kind, method) in callbacks.declared() {
        pending.push(Pending::new(
            StructuralElement::marker(kind, Some(Target::method(class, method))),
            callback_kinds(kind),
        ));
    }
}

fn callback_kinds(kind: ElementKind) -> &'static [ElementKind] {
    match kind {
        ElementKind::PrePersist => &[ElementKind::PrePersist],
        ElementKind::PreRemove => &[ElementKind::PreRemove],
        ElementKind::PreUpdate => &[ElementKind::PreUpdate],
        ElementKind::PostPersist => &[ElementKind::PostPersist],
        ElementKind::PostUpdate => &[ElementKind::PostUpdate],
        ElementKind::PostRemove => &[ElementKind::PostRemove],
        ElementKind::PostLoad => &[ElementKind::PostLoad],
        _ => &[],
    }
}

const ASSOCIATION_KINDS: &[ElementKind] = &[
    ElementKind::OneToOne,
    ElementKind::OneToMany,
    ElementKind::ManyToOne,
    ElementKind::ManyToMany,
];
const ATTRIBUTE_OVERRIDE_KINDS: &[ElementKind] =
    &[ElementKind::AttributeOverride, ElementKind::AttributeOverrides];
const ASSOCIATION_OVERRIDE_KINDS: &[ElementKind] = &[
    ElementKind::AssociationOverride,
    ElementKind::AssociationOverrides,
];

fn access_element(access: AccessType, target: &Target) -> StructuralElement {
    ValueTable::new()
        .enum_value("value", "AccessType", Some(access.as_str()))
        .into_element(ElementKind::Access, Some(target))
}

/// Field target under field access, getter target under property access
pub fn attribute_target(class_name: &str, attribute: &str, access: AccessType) -> Target {
    match access {
        AccessType::Field => Target::field(class_name, attribute),
        AccessType::Property => Target::method(class_name, getter_name(attribute)),
    }
}

fn getter_name(attribute: &str) -> String {
    let mut chars = attribute.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "get".to_string(),
    }
}
