//! Mapping Mocker - merges mapping-document metadata into annotation-equivalent form
//!
//! Provides:
//! - Value tables that turn single declarations into structural elements
//! - The override merge engine for attribute and association overrides
//! - The global registry for named queries, generators and result-set mappings
//! - Sessions that run one scan pass over mapping documents and an annotation index
//! - Mapping document loading and metadata saving

pub mod config;
pub mod error;
pub mod index;
pub mod mocker;
pub mod model;
pub mod models;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use config::{MappingDefaults, MockerConfig, MockerConfigBuilder};
pub use error::{MockError, MockResult};
pub use index::{AnnotationIndex, AnnotationSource, ClassAnnotations};
pub use mocker::{
    AssociationOverrideFamily, AttributeOverrideFamily, ClassResolver, EntityObjectMocker,
    GlobalMocker, OverrideMerger, OverrideSet, ValueTable,
};
pub use model::{DocumentFormat, DocumentLoader, MetadataSaver};
pub use registry::{DeclarationKind, GlobalRegistry};
pub use session::{DocumentReport, MockedMetadata, MockingSession};

// Re-export models
pub use models::{ElementKind, MappingDocument, StructuralElement, Target, Value};
pub use models::enums::*;
