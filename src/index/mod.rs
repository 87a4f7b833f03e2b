//! Annotation index
//!
//! Holds the annotation-equivalent elements known for each class: those the
//! class-scanning collaborator indexed from annotations and those pushed by the
//! mockers while processing mapping documents. Mockers read through the
//! [`AnnotationSource`] seam and write back only through [`AnnotationIndex::push`]
//! and [`AnnotationIndex::replace`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AccessType, ElementKind, StructuralElement, Target};

/// Read access to previously indexed elements
pub trait AnnotationSource {
    /// Elements of `kind` indexed for `class`, in insertion order
    fn indexed(&self, class: &str, kind: ElementKind) -> &[StructuralElement];

    /// Access type explicitly declared on `class`, if any
    fn access_of(&self, class: &str) -> Option<AccessType>;
}

/// Annotations indexed for one class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassAnnotations {
    #[serde(default)]
    pub metadata_complete: bool,
    #[serde(default)]
    pub annotations: IndexMap<ElementKind, Vec<StructuralElement>>,
}

impl ClassAnnotations {
    /// All elements of this class, grouped by kind in first-seen order
    pub fn elements(&self) -> impl Iterator<Item = &StructuralElement> {
        self.annotations.values().flatten()
    }
}

/// Per-class store of annotation-equivalent elements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationIndex {
    classes: IndexMap<String, ClassAnnotations>,
}

impl AnnotationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from targeted elements; elements without a target are skipped
    pub fn from_elements(elements: impl IntoIterator<Item = StructuralElement>) -> Self {
        let mut index = Self::new();
        for element in elements {
            index.push(element);
        }
        index
    }

    /// Ensure an entry exists for `class`
    pub fn create_class(&mut self, class: &str) -> &mut ClassAnnotations {
        self.classes.entry(class.to_string()).or_default()
    }

    /// Add an element under the class of its target
    ///
    /// Returns `false` and leaves the index untouched when the element has no target.
    pub fn push(&mut self, element: StructuralElement) -> bool {
        let Some(target) = element.target.as_ref() else {
            return false;
        };
        let class = target.class_name().to_string();
        debug!(class = %class, kind = %element.kind, "Indexing element");
        self.create_class(&class)
            .annotations
            .entry(element.kind)
            .or_default()
            .push(element);
        true
    }

    /// Remove elements of the given kinds on the element's target, then push it
    pub fn replace(&mut self, element: StructuralElement, superseded: &[ElementKind]) -> bool {
        if let Some(target) = element.target.clone() {
            for kind in superseded {
                self.remove_on_target(&target, *kind);
            }
        }
        self.push(element)
    }

    /// Remove every element of `kind` attached to `target`; returns how many were removed
    pub fn remove_on_target(&mut self, target: &Target, kind: ElementKind) -> usize {
        let Some(class) = self.classes.get_mut(target.class_name()) else {
            return 0;
        };
        let Some(elements) = class.annotations.get_mut(&kind) else {
            return 0;
        };
        let before = elements.len();
        elements.retain(|e| e.target.as_ref() != Some(target));
        before - elements.len()
    }

    /// Remove every element of `kind` from every class; returns how many were removed
    pub fn remove_kind(&mut self, kind: ElementKind) -> usize {
        let removed: usize = self
            .classes
            .values_mut()
            .filter_map(|class| class.annotations.shift_remove(&kind))
            .map(|elements| elements.len())
            .sum();
        if removed > 0 {
            debug!(kind = %kind, removed, "Removed elements from index");
        }
        removed
    }

    pub fn mark_metadata_complete(&mut self, class: &str) {
        self.create_class(class).metadata_complete = true;
    }

    pub fn is_metadata_complete(&self, class: &str) -> bool {
        self.classes
            .get(class)
            .is_some_and(|c| c.metadata_complete)
    }

    /// Class names in the order they were first indexed
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn class(&self, class: &str) -> Option<&ClassAnnotations> {
        self.classes.get(class)
    }

    /// Elements of `kind` on `class` attached to exactly `target`
    pub fn on_target<'a>(
        &'a self,
        class: &str,
        kind: ElementKind,
        target: &'a Target,
    ) -> impl Iterator<Item = &'a StructuralElement> + 'a {
        self.indexed(class, kind)
            .iter()
            .filter(move |e| e.target.as_ref() == Some(target))
    }

    /// Total number of indexed elements
    pub fn len(&self) -> usize {
        self.classes
            .values()
            .map(|c| c.annotations.values().map(Vec::len).sum::<usize>())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_classes(self) -> IndexMap<String, ClassAnnotations> {
        self.classes
    }
}

impl AnnotationSource for AnnotationIndex {
    fn indexed(&self, class: &str, kind: ElementKind) -> &[StructuralElement] {
        self.classes
            .get(class)
            .and_then(|c| c.annotations.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn access_of(&self, class: &str) -> Option<AccessType> {
        let class_target = Target::class(class);
        self.on_target(class, ElementKind::Access, &class_target)
            .filter_map(|e| e.string_field("value"))
            .find_map(|tag| tag.parse().ok())
    }
}
