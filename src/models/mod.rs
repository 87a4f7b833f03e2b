//! Models module
//!
//! Defines the structural element model produced by the mockers and the
//! plain declaration records they consume.

pub mod element;
pub mod enums;
pub mod sources;

pub use element::{ElementKind, StructuralElement, Target, Value};
pub use enums::*;
pub use sources::*;
