//! EAV Core - runtime schema-resolution engine
//!
//! Entity types ("families") and their fields ("attributes") are declared in
//! configuration and assembled into an in-memory model at startup. This
//! crate provides:
//! - The global attribute registry with per-family override/merge semantics
//! - Family definitions with single-parent inheritance and identifier/label
//!   designation rules
//! - Context-masked value creation for data instances
//! - Label translation with humanized fallback
//! - YAML/JSON model configuration and a dependency-ordered loader

pub mod bindings;
pub mod config;
pub mod errors;
pub mod loader;
pub mod logging_facility;
pub mod model;
pub mod registry;
pub mod translator;

// Used by the exported logging macros
#[doc(hidden)]
pub use tracing;

pub use eav_core_types::schema;
pub use eav_core_types::{Context, ContextManager, StaticContextManager};

// Re-export commonly used types
pub use bindings::{BindingCatalog, DataBinding, ValueBinding};
pub use config::{AttributeConfig, FamilyConfig, ModelConfig, OrderedMap};
pub use errors::{EavError, ErrorCategory, ExError, ExErrorKind, Result};
pub use loader::{Model, ModelLoader};
pub use model::{
    AttributeDefinition, AttributeType, AttributeTypeCatalog, BuiltinTypeCatalog, Data,
    FamilyDefinition, FamilySummary, Value,
};
pub use registry::{AttributeRegistry, FamilyLookup, FamilyRegistry};
pub use translator::{humanize, try_translate, MapTranslator, Translator};
