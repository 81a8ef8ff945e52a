pub mod attribute;
pub mod attribute_type;
pub mod data;
pub mod family;

pub use attribute::{AttributeDefinition, AttributeSet};
pub use attribute_type::{AttributeType, AttributeTypeCatalog, BuiltinTypeCatalog};
pub use data::{Data, Value};
pub use family::{AttributeSummary, FamilyBuildEnv, FamilyDefinition, FamilySummary};
