//! Class reference resolution seam
//!
//! Class loading belongs to an external collaborator; mockers only ask it
//! whether a (package-qualified) class name can be resolved.

use std::collections::HashSet;

use crate::config::MappingDefaults;
use crate::error::{MockError, MockResult};

/// Resolves class names referenced from mapping documents
pub trait ClassResolver {
    /// The fully-qualified name of `class_name`, or `None` when it cannot be loaded
    fn resolve(&self, class_name: &str) -> Option<String>;
}

/// Accepts every class name as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllClasses;

impl ClassResolver for AcceptAllClasses {
    fn resolve(&self, class_name: &str) -> Option<String> {
        Some(class_name.to_string())
    }
}

/// Resolves only class names from a fixed set
#[derive(Debug, Clone, Default)]
pub struct KnownClasses {
    classes: HashSet<String>,
}

impl KnownClasses {
    pub fn new(classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClassResolver for KnownClasses {
    fn resolve(&self, class_name: &str) -> Option<String> {
        self.classes.get(class_name).cloned()
    }
}

/// Qualify `class_name` with the default package and resolve it
pub fn resolve_class(
    resolver: &dyn ClassResolver,
    defaults: &MappingDefaults,
    class_name: &str,
    context: &str,
) -> MockResult<String> {
    let qualified = defaults.qualify_class_name(class_name);
    resolver
        .resolve(&qualified)
        .ok_or_else(|| MockError::UnresolvedClass {
            name: qualified,
            context: context.to_string(),
        })
}
