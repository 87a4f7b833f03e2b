//! Global declaration registry
//!
//! Named queries, native queries, generators and result-set mappings are not
//! scoped to a class. The registry collects them across every mapping source of
//! one scan session, keeping the latest declaration per name, and finalizes
//! each kind into a single declaration or a plural wrapper.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MockError, MockResult};
use crate::index::AnnotationIndex;
use crate::models::{ElementKind, StructuralElement};

/// Kind of a global declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    TableGenerator,
    SequenceGenerator,
    NamedQuery,
    NamedNativeQuery,
    SqlResultSetMapping,
}

impl DeclarationKind {
    /// Finalization order
    pub const ALL: [DeclarationKind; 5] = [
        DeclarationKind::TableGenerator,
        DeclarationKind::SequenceGenerator,
        DeclarationKind::NamedQuery,
        DeclarationKind::NamedNativeQuery,
        DeclarationKind::SqlResultSetMapping,
    ];

    pub fn element_kind(self) -> ElementKind {
        match self {
            DeclarationKind::TableGenerator => ElementKind::TableGenerator,
            DeclarationKind::SequenceGenerator => ElementKind::SequenceGenerator,
            DeclarationKind::NamedQuery => ElementKind::NamedQuery,
            DeclarationKind::NamedNativeQuery => ElementKind::NamedNativeQuery,
            DeclarationKind::SqlResultSetMapping => ElementKind::SqlResultSetMapping,
        }
    }

    pub fn plural_kind(self) -> ElementKind {
        match self {
            DeclarationKind::TableGenerator => ElementKind::TableGenerators,
            DeclarationKind::SequenceGenerator => ElementKind::SequenceGenerators,
            DeclarationKind::NamedQuery => ElementKind::NamedQueries,
            DeclarationKind::NamedNativeQuery => ElementKind::NamedNativeQueries,
            DeclarationKind::SqlResultSetMapping => ElementKind::SqlResultSetMappings,
        }
    }

    /// The declaration kind of a scalar global element
    pub fn from_element_kind(kind: ElementKind) -> Option<DeclarationKind> {
        DeclarationKind::ALL
            .into_iter()
            .find(|k| k.element_kind() == kind)
    }

    /// The declaration kind whose plural wrapper is `kind`
    pub fn from_plural_kind(kind: ElementKind) -> Option<DeclarationKind> {
        DeclarationKind::ALL
            .into_iter()
            .find(|k| k.plural_kind() == kind)
    }
}

/// Latest declaration per name, per kind, in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalRegistry {
    groups: IndexMap<DeclarationKind, IndexMap<String, StructuralElement>>,
}

impl GlobalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `element` under `name`, replacing any earlier declaration of that name
    ///
    /// A replaced declaration keeps the position of the first registration.
    /// Returns the replaced declaration.
    pub fn register(
        &mut self,
        kind: DeclarationKind,
        name: impl Into<String>,
        element: StructuralElement,
    ) -> Option<StructuralElement> {
        let name = name.into();
        let previous = self
            .groups
            .entry(kind)
            .or_default()
            .insert(name.clone(), element);
        if previous.is_some() {
            debug!(kind = ?kind, declaration = %name, "Global declaration replaced");
        }
        previous
    }

    /// Register a scalar global element, deriving its kind and name
    pub fn register_element(
        &mut self,
        element: StructuralElement,
    ) -> MockResult<Option<StructuralElement>> {
        let kind = DeclarationKind::from_element_kind(element.kind).ok_or_else(|| {
            MockError::Configuration(format!("{} is not a global declaration", element.kind))
        })?;
        let name = element
            .name()
            .ok_or(MockError::MissingName { kind: element.kind })?
            .to_string();
        Ok(self.register(kind, name, element.detached()))
    }

    /// Harvest global declarations carried by indexed classes
    ///
    /// Both scalar declarations and the members of plural wrappers are
    /// registered. Returns the number of declarations registered.
    pub fn collect_from_index(&mut self, index: &AnnotationIndex) -> MockResult<usize> {
        let mut collected = 0;
        for class in index.classes() {
            let Some(annotations) = index.class(class) else {
                continue;
            };
            for element in annotations.elements() {
                if DeclarationKind::from_element_kind(element.kind).is_some() {
                    self.register_element(element.clone())?;
                    collected += 1;
                } else if DeclarationKind::from_plural_kind(element.kind).is_some() {
                    for member in element.members() {
                        self.register_element(member.clone())?;
                        collected += 1;
                    }
                }
            }
        }
        debug!(collected, "Collected global declarations from index");
        Ok(collected)
    }

    pub fn get(&self, kind: DeclarationKind, name: &str) -> Option<&StructuralElement> {
        self.groups.get(&kind).and_then(|group| group.get(name))
    }

    /// Registered names of `kind`, in registration order
    pub fn names(&self, kind: DeclarationKind) -> Vec<&str> {
        self.groups
            .get(&kind)
            .map(|group| group.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of registered declarations across all kinds
    pub fn len(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Emit the finalized declarations
    ///
    /// A kind with one registered name yields that declaration; a kind with
    /// several yields its plural wrapper with members in registration order.
    /// Kinds with no registrations yield nothing.
    pub fn finalize(&self) -> Vec<StructuralElement> {
        let mut finalized = Vec::new();
        for kind in DeclarationKind::ALL {
            let Some(group) = self.groups.get(&kind) else {
                continue;
            };
            match group.len() {
                0 => {}
                1 => finalized.extend(group.values().map(StructuralElement::detached)),
                _ => finalized.push(StructuralElement::wrapper(
                    kind.plural_kind(),
                    None,
                    group.values().map(StructuralElement::detached).collect(),
                )),
            }
        }
        info!(
            declarations = self.len(),
            emitted = finalized.len(),
            "Finalized global declarations"
        );
        finalized
    }
}
