//! Data/value class bindings
//!
//! A family names the data and value classes its instances are built with.
//! The catalog maps those references to descriptors of what the class can do.

use std::collections::HashMap;

use serde::Serialize;

/// Binding used when a family names no data class
pub const DEFAULT_DATA_CLASS: &str = "contextual_data";
/// Binding used when a family names no value class
pub const DEFAULT_VALUE_CLASS: &str = "contextual_value";

/// Descriptor of a data class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataBinding {
    pub name: String,
    /// Instances carry a current context
    pub contextual: bool,
}

/// Descriptor of a value class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueBinding {
    pub name: String,
    /// Values may be scoped to a context
    pub contextual: bool,
    /// Context keys the default context must provide
    pub required_context_keys: Vec<String>,
}

impl DataBinding {
    pub fn new(name: impl Into<String>, contextual: bool) -> Self {
        Self {
            name: name.into(),
            contextual,
        }
    }
}

impl ValueBinding {
    pub fn new(name: impl Into<String>, contextual: bool) -> Self {
        Self {
            name: name.into(),
            contextual,
            required_context_keys: Vec::new(),
        }
    }

    pub fn requiring(mut self, keys: &[&str]) -> Self {
        self.required_context_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }
}

/// Catalog of known class bindings
#[derive(Debug, Clone)]
pub struct BindingCatalog {
    data: HashMap<String, DataBinding>,
    values: HashMap<String, ValueBinding>,
}

impl BindingCatalog {
    /// Catalog with no bindings at all
    pub fn empty() -> Self {
        Self {
            data: HashMap::new(),
            values: HashMap::new(),
        }
    }

    pub fn with_data(mut self, binding: DataBinding) -> Self {
        self.data.insert(binding.name.clone(), binding);
        self
    }

    pub fn with_value(mut self, binding: ValueBinding) -> Self {
        self.values.insert(binding.name.clone(), binding);
        self
    }

    pub fn data(&self, name: &str) -> Option<&DataBinding> {
        self.data.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&ValueBinding> {
        self.values.get(name)
    }
}

impl Default for BindingCatalog {
    /// `data`/`value` (context-free) and the contextual defaults
    fn default() -> Self {
        Self::empty()
            .with_data(DataBinding::new("data", false))
            .with_data(DataBinding::new(DEFAULT_DATA_CLASS, true))
            .with_value(ValueBinding::new("value", false))
            .with_value(ValueBinding::new(DEFAULT_VALUE_CLASS, true))
    }
}
