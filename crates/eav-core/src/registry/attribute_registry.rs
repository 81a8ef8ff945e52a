use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{AttributeConfig, OrderedMap};
use crate::errors::{EavError, Result};
use crate::model::attribute::{AttributeDefinition, AttributeSet};
use crate::model::attribute_type::AttributeTypeCatalog;
use crate::{log_op_end, log_op_start};

/// Codes that collide with built-in data properties
pub const RESERVED_CODES: &[&str] = &[
    "id",
    "identifier",
    "values",
    "value",
    "valueData",
    "valuesData",
    "refererValues",
    "createdAt",
    "updatedAt",
    "family",
    "familyCode",
    "currentContext",
    "empty",
];

pub fn is_reserved_code(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Process-wide pool of globally declared attributes
///
/// Populated once during loading, then shared read-only. Families never
/// hold these originals, only clones.
pub struct AttributeRegistry {
    catalog: Arc<dyn AttributeTypeCatalog>,
    global_context_mask: Vec<String>,
    attributes: AttributeSet,
}

impl AttributeRegistry {
    pub fn new(catalog: Arc<dyn AttributeTypeCatalog>, global_context_mask: Vec<String>) -> Self {
        Self {
            catalog,
            global_context_mask,
            attributes: AttributeSet::new(),
        }
    }

    /// Create and register every global attribute, in declaration order
    ///
    /// # Errors
    ///
    /// Any error of [`AttributeRegistry::create_attribute`] or
    /// [`AttributeRegistry::add_attribute`]; registration stops at the first.
    pub fn parse_global_config(
        &mut self,
        config: &OrderedMap<Option<AttributeConfig>>,
    ) -> Result<()> {
        let start = Instant::now();
        log_op_start!("parse_global_config", attribute_count = config.len());

        for (code, attribute_config) in config.iter() {
            let attribute = self.create_attribute(code, attribute_config.as_ref())?;
            self.add_attribute(attribute)?;
        }

        log_op_end!(
            "parse_global_config",
            duration_ms = start.elapsed().as_millis() as u64,
            attribute_count = self.attributes.len()
        );
        Ok(())
    }

    /// Build an attribute without registering it
    ///
    /// # Errors
    ///
    /// * `ReservedAttributeCode` - If `code` is reserved
    /// * `UnknownAttributeType` / `UniqueNotSupported` - From the configuration
    pub fn create_attribute(
        &self,
        code: &str,
        config: Option<&AttributeConfig>,
    ) -> Result<AttributeDefinition> {
        if is_reserved_code(code) {
            return Err(EavError::ReservedAttributeCode {
                code: code.to_string(),
            });
        }
        let default_config = AttributeConfig::default();
        AttributeDefinition::from_config(
            code,
            config.unwrap_or(&default_config),
            self.catalog.as_ref(),
            &self.global_context_mask,
        )
    }

    /// Register an attribute
    ///
    /// # Errors
    ///
    /// * `DuplicateAttribute` - If the code is already registered
    pub fn add_attribute(&mut self, attribute: AttributeDefinition) -> Result<()> {
        if self.attributes.contains(attribute.code()) {
            return Err(EavError::DuplicateAttribute {
                code: attribute.code().to_string(),
            });
        }
        self.attributes.insert(attribute);
        Ok(())
    }

    /// # Errors
    ///
    /// * `AttributeNotFound` - If no attribute has this code
    pub fn get_attribute(&self, code: &str) -> Result<&AttributeDefinition> {
        self.attributes
            .get(code)
            .ok_or_else(|| EavError::AttributeNotFound {
                code: code.to_string(),
            })
    }

    pub fn has_attribute(&self, code: &str) -> bool {
        self.attributes.contains(code)
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    pub fn catalog(&self) -> &dyn AttributeTypeCatalog {
        self.catalog.as_ref()
    }

    pub fn global_context_mask(&self) -> &[String] {
        &self.global_context_mask
    }
}

impl fmt::Debug for AttributeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeRegistry")
            .field("global_context_mask", &self.global_context_mask)
            .field("attributes", &self.attributes.codes().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
