pub mod attribute_registry;
pub mod family_registry;

pub use attribute_registry::{is_reserved_code, AttributeRegistry, RESERVED_CODES};
pub use family_registry::{FamilyLookup, FamilyRegistry};
