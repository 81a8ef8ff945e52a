//! Model configuration format
//!
//! Defines the YAML/JSON structure the model is loaded from. Every struct
//! rejects unknown keys; maps keep declaration order and reject duplicates.

use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

use eav_core_types::Context;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::errors::{EavError, Result};

/// Open key → value configuration bag
pub type Options = serde_json::Map<String, serde_json::Value>;

/// Insertion-ordered string-keyed map
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace; a replaced entry keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map keyed by code, or null")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(OrderedMap::new())
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(OrderedMap::new())
            }

            fn visit_map<M>(self, mut access: M) -> std::result::Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut map = OrderedMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    if map.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate key '{}'", key)));
                    }
                    let value = access.next_value()?;
                    map.entries.push((key, value));
                }
                Ok(map)
            }
        }

        deserializer.deserialize_any(OrderedMapVisitor(PhantomData))
    }
}

/// Configuration of one attribute, global or family-local
///
/// Every field is optional so the same struct serves as a full definition
/// and as a partial override merged onto an existing attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AttributeConfig {
    #[serde(rename = "type")]
    pub attribute_type: Option<String>,
    pub label: Option<String>,
    pub group: Option<String>,
    pub required: Option<bool>,
    pub unique: Option<bool>,
    pub collection: Option<bool>,
    pub context_mask: Option<Vec<String>>,
    pub options: Option<Options>,
    pub form_options: Option<Options>,
    pub validation_rules: Option<Vec<serde_json::Value>>,
}

fn default_true() -> bool {
    true
}

/// Configuration of one family
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FamilyConfig {
    pub parent: Option<String>,
    pub label: Option<String>,
    #[serde(default)]
    pub attributes: OrderedMap<Option<AttributeConfig>>,
    #[serde(default)]
    pub attribute_as_label: Vec<String>,
    pub attribute_as_identifier: Option<String>,
    #[serde(default = "default_true")]
    pub instantiable: bool,
    #[serde(default)]
    pub singleton: bool,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub form_options: Options,
    pub data_class: Option<String>,
    pub value_class: Option<String>,
}

impl Default for FamilyConfig {
    fn default() -> Self {
        Self {
            parent: None,
            label: None,
            attributes: OrderedMap::new(),
            attribute_as_label: Vec::new(),
            attribute_as_identifier: None,
            instantiable: true,
            singleton: false,
            options: Options::new(),
            form_options: Options::new(),
            data_class: None,
            value_class: None,
        }
    }
}

/// Top-level model document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelConfig {
    /// Context every family falls back to; checked against value classes
    #[serde(default)]
    pub default_context: Context,

    /// Mask applied to attributes that do not declare `contextMask`
    #[serde(default)]
    pub global_context_mask: Vec<String>,

    /// Globally shared attributes
    #[serde(default)]
    pub attributes: OrderedMap<Option<AttributeConfig>>,

    #[serde(default)]
    pub families: OrderedMap<FamilyConfig>,
}

impl ModelConfig {
    /// Parse a YAML document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` on syntax errors, unknown keys or
    /// duplicate codes.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| EavError::InvalidConfiguration {
            message: format!("YAML parse error: {}", e),
        })
    }

    /// Parse a JSON document
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` on syntax errors, unknown keys or
    /// duplicate codes.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| EavError::InvalidConfiguration {
            message: format!("JSON parse error: {}", e),
        })
    }

    /// Read a configuration file; `.json` is parsed as JSON, anything else as YAML
    ///
    /// # Errors
    ///
    /// Returns `Io` when the file cannot be read, otherwise the parse errors
    /// of [`ModelConfig::from_yaml_str`] / [`ModelConfig::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| EavError::Io {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}
