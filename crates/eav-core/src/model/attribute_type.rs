use std::collections::HashMap;

use serde::Serialize;

/// Type-level behavior shared by every attribute of a given type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeType {
    /// Type tag used in configuration (`type: string`)
    pub code: String,

    /// Collection-ness when the attribute does not set `collection` itself
    pub collection: bool,

    /// Whether values of this type can be checked for uniqueness
    pub supports_unique: bool,

    /// Values point at other data instances
    pub relation: bool,

    /// Values are data instances owned by the referencing data
    pub embedded: bool,
}

impl AttributeType {
    /// Scalar type: single-valued, uniqueness allowed
    pub fn scalar(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            collection: false,
            supports_unique: true,
            relation: false,
            embedded: false,
        }
    }

    /// Relation to other data; defaults to single-valued
    pub fn relation(code: impl Into<String>) -> Self {
        Self {
            relation: true,
            ..Self::scalar(code)
        }
    }

    /// Embedded data; never unique
    pub fn embedded(code: impl Into<String>) -> Self {
        Self {
            embedded: true,
            supports_unique: false,
            ..Self::scalar(code)
        }
    }

    /// Builder: make collection the default
    pub fn as_collection(mut self) -> Self {
        self.collection = true;
        self
    }

    /// Builder: forbid uniqueness
    pub fn without_unique(mut self) -> Self {
        self.supports_unique = false;
        self
    }
}

/// Resolves type tags to their structural capabilities
pub trait AttributeTypeCatalog: Send + Sync {
    fn get_type(&self, code: &str) -> Option<&AttributeType>;

    fn has_type(&self, code: &str) -> bool {
        self.get_type(code).is_some()
    }
}

/// Type used when an attribute omits `type`
pub const DEFAULT_ATTRIBUTE_TYPE: &str = "string";

/// Catalog seeded with the built-in types
#[derive(Debug, Clone)]
pub struct BuiltinTypeCatalog {
    types: HashMap<String, AttributeType>,
}

impl BuiltinTypeCatalog {
    /// Catalog with no types at all
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Register or replace a type
    pub fn register(&mut self, attribute_type: AttributeType) {
        self.types
            .insert(attribute_type.code.clone(), attribute_type);
    }

    pub fn with(mut self, attribute_type: AttributeType) -> Self {
        self.register(attribute_type);
        self
    }

    /// Registered type codes, sorted
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.types.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl Default for BuiltinTypeCatalog {
    fn default() -> Self {
        Self::empty()
            .with(AttributeType::scalar(DEFAULT_ATTRIBUTE_TYPE))
            .with(AttributeType::scalar("text").without_unique())
            .with(AttributeType::scalar("html").without_unique())
            .with(AttributeType::scalar("email"))
            .with(AttributeType::scalar("integer"))
            .with(AttributeType::scalar("decimal"))
            .with(AttributeType::scalar("boolean").without_unique())
            .with(AttributeType::scalar("date"))
            .with(AttributeType::scalar("datetime"))
            .with(AttributeType::scalar("choice"))
            .with(AttributeType::scalar("tags").as_collection().without_unique())
            .with(AttributeType::relation("data"))
            .with(AttributeType::relation("data_collection").as_collection())
            .with(AttributeType::embedded("embed"))
            .with(AttributeType::embedded("embed_collection").as_collection())
    }
}

impl AttributeTypeCatalog for BuiltinTypeCatalog {
    fn get_type(&self, code: &str) -> Option<&AttributeType> {
        self.types.get(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_default_type() {
        let catalog = BuiltinTypeCatalog::default();
        assert!(catalog.has_type(DEFAULT_ATTRIBUTE_TYPE));
        assert!(!catalog.has_type("no_such_type"));
    }

    #[test]
    fn test_builtin_capabilities() {
        let catalog = BuiltinTypeCatalog::default();

        let tags = catalog.get_type("tags").unwrap();
        assert!(tags.collection);
        assert!(!tags.supports_unique);

        let embed = catalog.get_type("embed").unwrap();
        assert!(embed.embedded);
        assert!(!embed.supports_unique);

        let relation = catalog.get_type("data").unwrap();
        assert!(relation.relation);
        assert!(!relation.collection);
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut catalog = BuiltinTypeCatalog::default();
        catalog.register(AttributeType::scalar("string").as_collection());
        assert!(catalog.get_type("string").unwrap().collection);
    }
}
