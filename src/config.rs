//! Configuration for metadata mocking

use serde::{Deserialize, Serialize};

use crate::models::AccessType;

/// Document-level defaults applied to every declaration of a mapping document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingDefaults {
    /// Package prepended to unqualified class names
    pub package: Option<String>,
    /// Schema applied to join and collection tables that declare none
    pub schema: Option<String>,
    /// Catalog applied to join and collection tables that declare none
    pub catalog: Option<String>,
    /// Access type used when neither the document nor the index declares one
    pub access: Option<AccessType>,
    /// Add `PERSIST` to the cascade of every typed association
    pub cascade_persist: Option<bool>,
}

impl MappingDefaults {
    /// Overlay `other` on top of these defaults; values set in `other` win
    pub fn overlay(&self, other: &MappingDefaults) -> MappingDefaults {
        MappingDefaults {
            package: other.package.clone().or_else(|| self.package.clone()),
            schema: other.schema.clone().or_else(|| self.schema.clone()),
            catalog: other.catalog.clone().or_else(|| self.catalog.clone()),
            access: other.access.or(self.access),
            cascade_persist: other.cascade_persist.or(self.cascade_persist),
        }
    }

    pub fn is_cascade_persist(&self) -> bool {
        self.cascade_persist.unwrap_or(false)
    }

    /// Qualify `class_name` with the default package unless it already is qualified
    pub fn qualify_class_name(&self, class_name: &str) -> String {
        match &self.package {
            Some(package) if !class_name.contains('.') && !package.is_empty() => {
                format!("{}.{}", package, class_name)
            }
            _ => class_name.to_string(),
        }
    }
}

/// Configuration for a mocking session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MockerConfig {
    /// Session-wide defaults, refined per document
    pub defaults: MappingDefaults,
    /// Reject class references that are not in `known_classes`
    pub strict_class_resolution: bool,
    /// Classes the class-loading collaborator is able to resolve
    pub known_classes: Vec<String>,
    /// Collapse repeated names inside one document override list
    pub dedupe_document_overrides: bool,
}

impl Default for MockerConfig {
    fn default() -> Self {
        Self {
            defaults: MappingDefaults::default(),
            strict_class_resolution: false,
            known_classes: Vec::new(),
            dedupe_document_overrides: true,
        }
    }
}

impl MockerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> MockerConfigBuilder {
        MockerConfigBuilder::default()
    }
}

/// Builder for MockerConfig
#[derive(Debug, Default)]
pub struct MockerConfigBuilder {
    config: MockerConfig,
}

impl MockerConfigBuilder {
    /// Set the default package for unqualified class names
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.config.defaults.package = Some(package.into());
        self
    }

    /// Set the default schema
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.config.defaults.schema = Some(schema.into());
        self
    }

    /// Set the default catalog
    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.config.defaults.catalog = Some(catalog.into());
        self
    }

    /// Set the default access type
    pub fn access(mut self, access: AccessType) -> Self {
        self.config.defaults.access = Some(access);
        self
    }

    /// Cascade persist to every typed association
    pub fn cascade_persist(mut self, cascade: bool) -> Self {
        self.config.defaults.cascade_persist = Some(cascade);
        self
    }

    /// Enable or disable strict class resolution
    pub fn strict_class_resolution(mut self, strict: bool) -> Self {
        self.config.strict_class_resolution = strict;
        self
    }

    /// Add a class the resolver should accept
    pub fn known_class(mut self, class_name: impl Into<String>) -> Self {
        self.config.known_classes.push(class_name.into());
        self
    }

    /// Enable or disable collapsing of repeated document override names
    pub fn dedupe_document_overrides(mut self, dedupe: bool) -> Self {
        self.config.dedupe_document_overrides = dedupe;
        self
    }

    /// Build the configuration
    pub fn build(self) -> MockerConfig {
        self.config
    }
}
