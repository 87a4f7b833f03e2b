//! Mocking session
//!
//! One session covers one scan pass: it owns the annotation index, the global
//! registry and the class resolver, and hands them to the mockers explicitly.
//! Mapping documents are processed in the order the caller supplies them;
//! later declarations of a global name replace earlier ones. A document either
//! applies completely or leaves the session as it was.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::config::{MappingDefaults, MockerConfig};
use crate::error::MockResult;
use crate::index::{AnnotationIndex, ClassAnnotations};
use crate::mocker::{
    AcceptAllClasses, ClassResolver, EntityObjectMocker, GlobalMocker, KnownClasses,
    register_all,
};
use crate::models::{EntityObjectSource, GlobalDeclarations, MappingDocument, StructuralElement};
use crate::registry::{DeclarationKind, GlobalRegistry};

/// Outcome of processing one mapping document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentReport {
    pub entities: usize,
    pub elements: usize,
    pub globals: usize,
}

/// Final metadata of a session: per-class elements plus finalized global declarations
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MockedMetadata {
    pub classes: IndexMap<String, ClassAnnotations>,
    pub globals: Vec<StructuralElement>,
}

pub struct MockingSession {
    config: MockerConfig,
    index: AnnotationIndex,
    registry: GlobalRegistry,
    resolver: Box<dyn ClassResolver>,
}

impl MockingSession {
    /// Start a session over an empty index
    pub fn new(config: MockerConfig) -> Self {
        let resolver: Box<dyn ClassResolver> = if config.strict_class_resolution {
            Box::new(KnownClasses::new(config.known_classes.iter().cloned()))
        } else {
            Box::new(AcceptAllClasses)
        };
        Self {
            config,
            index: AnnotationIndex::new(),
            registry: GlobalRegistry::new(),
            resolver,
        }
    }

    /// Start a session over an index built from annotations
    ///
    /// Global declarations already present in the index are moved into the
    /// registry, so documents processed afterwards replace them by name and
    /// the finished metadata carries each of them once, under `globals`.
    pub fn with_index(config: MockerConfig, mut index: AnnotationIndex) -> MockResult<Self> {
        let mut session = Self::new(config);
        session.registry.collect_from_index(&index)?;
        for kind in DeclarationKind::ALL {
            index.remove_kind(kind.element_kind());
            index.remove_kind(kind.plural_kind());
        }
        session.index = index;
        Ok(session)
    }

    /// Replace the class resolver
    pub fn with_resolver(mut self, resolver: Box<dyn ClassResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &MockerConfig {
        &self.config
    }

    pub fn index(&self) -> &AnnotationIndex {
        &self.index
    }

    pub fn registry(&self) -> &GlobalRegistry {
        &self.registry
    }

    /// Mock one entity using the session defaults
    pub fn mock_entity(&mut self, source: &EntityObjectSource) -> MockResult<usize> {
        let defaults = self.config.defaults.clone();
        let (index, written) = self.stage_entities(std::slice::from_ref(source), &defaults)?;
        self.index = index;
        Ok(written)
    }

    /// Register global declarations using the session defaults
    pub fn mock_globals(&mut self, declarations: &GlobalDeclarations) -> MockResult<usize> {
        let defaults = self.config.defaults.clone();
        GlobalMocker::new(self.resolver.as_ref(), &defaults)
            .process(declarations, &mut self.registry)
    }

    /// Process one mapping document
    ///
    /// The document defaults refine the session defaults. Global declarations
    /// are built first; entities then run `pre_process` as a group before any
    /// of them runs `process`, against a staged copy of the index. The staged
    /// index and the built globals are committed only when every entity
    /// succeeds, so a failing document changes neither index nor registry.
    pub fn mock_document(&mut self, document: &MappingDocument) -> MockResult<DocumentReport> {
        let _span = info_span!("mock_document", entities = document.entities.len()).entered();
        let defaults = self.config.defaults.overlay(&document.defaults);

        let built = if document.globals.is_empty() {
            Vec::new()
        } else {
            GlobalMocker::new(self.resolver.as_ref(), &defaults).build_all(&document.globals)?
        };
        let (index, elements) = self.stage_entities(&document.entities, &defaults)?;

        self.index = index;
        let globals = register_all(built, &mut self.registry);

        let report = DocumentReport {
            entities: document.entities.len(),
            elements,
            globals,
        };
        info!(
            entities = report.entities,
            elements = report.elements,
            globals = report.globals,
            "Mapping document processed"
        );
        Ok(report)
    }

    /// Run entities against a copy of the index; returns the copy and the element count
    fn stage_entities(
        &self,
        sources: &[EntityObjectSource],
        defaults: &MappingDefaults,
    ) -> MockResult<(AnnotationIndex, usize)> {
        let mut staged = self.index.clone();
        let mut mockers: Vec<EntityObjectMocker<'_>> = sources
            .iter()
            .map(|source| {
                EntityObjectMocker::new(source, defaults, self.resolver.as_ref())
                    .with_dedupe_document(self.config.dedupe_document_overrides)
            })
            .collect();
        for mocker in &mut mockers {
            mocker.pre_process(&mut staged)?;
        }
        let mut written = 0;
        for mocker in &mockers {
            written += mocker.process(&mut staged)?;
        }
        debug!(entities = mockers.len(), written, "Entities mocked");
        Ok((staged, written))
    }

    /// Finalize the registry and hand back the collected metadata
    pub fn finish(self) -> MockedMetadata {
        let globals = self.registry.finalize();
        MockedMetadata {
            classes: self.index.into_classes(),
            globals,
        }
    }
}
