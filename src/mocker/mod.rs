//! Mockers
//!
//! Translate mapping-document declarations into annotation-equivalent
//! structural elements: value tables for single declarations, the override
//! merge engine, entity-level processing and global declarations.

pub mod classes;
pub mod entity;
pub mod globals;
pub mod overrides;
pub mod values;

pub use classes::{AcceptAllClasses, ClassResolver, KnownClasses, resolve_class};
pub use entity::EntityObjectMocker;
pub use globals::{BuiltDeclaration, GlobalMocker, register_all};
pub use overrides::{
    AssociationOverrideFamily, AttributeOverrideFamily, OverrideEntry, OverrideFamily,
    OverrideMerger, OverrideSet, merge_association_overrides, merge_attribute_overrides,
};
pub use values::ValueTable;
