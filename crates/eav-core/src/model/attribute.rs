use std::collections::HashMap;

use serde::Serialize;

use super::attribute_type::{AttributeType, AttributeTypeCatalog};
use crate::config::{AttributeConfig, Options};
use crate::errors::{EavError, Result};
use crate::translator::{resolve_label, Translator};

/// One field of a family: type, flags, context mask and options
///
/// Cloning is a deep copy: a family's attribute never shares state with the
/// registry's original or with another family's clone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDefinition {
    code: String,
    #[serde(rename = "type")]
    attribute_type: AttributeType,
    label: Option<String>,
    group: Option<String>,
    required: bool,
    unique: bool,
    /// Explicit collection flag; `None` defers to the type
    collection: Option<bool>,
    context_mask: Vec<String>,
    options: Options,
    form_options: Options,
    validation_rules: Vec<serde_json::Value>,
    /// Owning family, set when the attribute is attached to one
    family: Option<String>,
}

impl AttributeDefinition {
    /// Build an attribute from its configuration
    ///
    /// `default_context_mask` applies when the configuration has no
    /// `contextMask` of its own.
    ///
    /// # Errors
    ///
    /// * `UnknownAttributeType` - If the type is not in the catalog
    /// * `UniqueNotSupported` - If declared unique on a type that forbids it
    pub fn from_config(
        code: impl Into<String>,
        config: &AttributeConfig,
        catalog: &dyn AttributeTypeCatalog,
        default_context_mask: &[String],
    ) -> Result<Self> {
        let code = code.into();
        let type_code = config
            .attribute_type
            .as_deref()
            .unwrap_or(super::attribute_type::DEFAULT_ATTRIBUTE_TYPE);
        let attribute_type = resolve_type(&code, type_code, catalog)?;

        let mut attribute = Self {
            code,
            attribute_type,
            label: None,
            group: None,
            required: false,
            unique: false,
            collection: None,
            context_mask: default_context_mask.to_vec(),
            options: Options::new(),
            form_options: Options::new(),
            validation_rules: Vec::new(),
            family: None,
        };
        attribute.apply(config, catalog)?;
        Ok(attribute)
    }

    /// Merge a partial configuration on top of this attribute
    ///
    /// Scalars and lists present in `config` replace the current ones;
    /// `options` and `formOptions` are merged key by key, `config` winning.
    ///
    /// # Errors
    ///
    /// Same as [`AttributeDefinition::from_config`].
    pub fn merge_configuration(
        &mut self,
        config: &AttributeConfig,
        catalog: &dyn AttributeTypeCatalog,
    ) -> Result<()> {
        self.apply(config, catalog)
    }

    fn apply(&mut self, config: &AttributeConfig, catalog: &dyn AttributeTypeCatalog) -> Result<()> {
        if let Some(type_code) = &config.attribute_type {
            self.attribute_type = resolve_type(&self.code, type_code, catalog)?;
        }
        if let Some(label) = &config.label {
            self.label = Some(label.clone());
        }
        if let Some(group) = &config.group {
            self.group = Some(group.clone());
        }
        if let Some(required) = config.required {
            self.required = required;
        }
        if let Some(unique) = config.unique {
            self.unique = unique;
        }
        if let Some(collection) = config.collection {
            self.collection = Some(collection);
        }
        if let Some(mask) = &config.context_mask {
            self.context_mask = dedup_preserving_order(mask);
        }
        if let Some(options) = &config.options {
            merge_options(&mut self.options, options);
        }
        if let Some(form_options) = &config.form_options {
            merge_options(&mut self.form_options, form_options);
        }
        if let Some(rules) = &config.validation_rules {
            self.validation_rules = rules.clone();
        }

        if self.unique && !self.attribute_type.supports_unique {
            return Err(EavError::UniqueNotSupported {
                code: self.code.clone(),
                attribute_type: self.attribute_type.code.clone(),
            });
        }
        Ok(())
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn attribute_type(&self) -> &AttributeType {
        &self.attribute_type
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Explicit `collection` flag, else the type's default
    pub fn is_collection(&self) -> bool {
        self.collection.unwrap_or(self.attribute_type.collection)
    }

    pub fn context_mask(&self) -> &[String] {
        &self.context_mask
    }

    pub fn is_contextual(&self) -> bool {
        !self.context_mask.is_empty()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable options; only meaningful on a family-owned clone before publishing
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Option value, or `fallback` when unset
    pub fn option<'a>(
        &'a self,
        code: &str,
        fallback: &'a serde_json::Value,
    ) -> &'a serde_json::Value {
        self.options.get(code).unwrap_or(fallback)
    }

    pub fn form_options(&self) -> &Options {
        &self.form_options
    }

    pub fn validation_rules(&self) -> &[serde_json::Value] {
        &self.validation_rules
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub(crate) fn set_family(&mut self, family: &str) {
        self.family = Some(family.to_string());
    }

    /// Explicitly configured label, if any
    pub fn explicit_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Human label: explicit label, then translation, then humanized code
    ///
    /// Tried keys: `eav.family.{family}.attribute.{code}.label` (when owned
    /// by a family) and `eav.attribute.{code}.label`.
    pub fn label(&self, translator: Option<&dyn Translator>) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        let mut keys = Vec::with_capacity(2);
        if let Some(family) = &self.family {
            keys.push(format!("eav.family.{}.attribute.{}.label", family, self.code));
        }
        keys.push(format!("eav.attribute.{}.label", self.code));

        resolve_label(translator, &keys, &self.code)
    }
}

fn resolve_type(
    code: &str,
    type_code: &str,
    catalog: &dyn AttributeTypeCatalog,
) -> Result<AttributeType> {
    catalog
        .get_type(type_code)
        .cloned()
        .ok_or_else(|| EavError::UnknownAttributeType {
            code: code.to_string(),
            attribute_type: type_code.to_string(),
        })
}

fn merge_options(target: &mut Options, overrides: &Options) {
    for (key, value) in overrides {
        target.insert(key.clone(), value.clone());
    }
}

fn dedup_preserving_order(mask: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(mask.len());
    for key in mask {
        if !seen.contains(key) {
            seen.push(key.clone());
        }
    }
    seen
}

/// Attributes keyed by code, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeSet {
    entries: Vec<AttributeDefinition>,
    index: HashMap<String, usize>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by code; a replaced attribute keeps its position
    pub fn insert(&mut self, attribute: AttributeDefinition) -> Option<AttributeDefinition> {
        match self.index.get(attribute.code()) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position], attribute)),
            None => {
                self.index
                    .insert(attribute.code().to_string(), self.entries.len());
                self.entries.push(attribute);
                None
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&AttributeDefinition> {
        self.index.get(code).map(|&position| &self.entries[position])
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut AttributeDefinition> {
        match self.index.get(code) {
            Some(&position) => Some(&mut self.entries[position]),
            None => None,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeDefinition> {
        self.entries.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(AttributeDefinition::code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a AttributeDefinition;
    type IntoIter = std::slice::Iter<'a, AttributeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attribute_type::BuiltinTypeCatalog;
    use crate::translator::MapTranslator;
    use serde_json::json;

    fn config(value: serde_json::Value) -> AttributeConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_from_config_defaults() {
        let catalog = BuiltinTypeCatalog::default();
        let attribute =
            AttributeDefinition::from_config("title", &AttributeConfig::default(), &catalog, &[])
                .unwrap();

        assert_eq!(attribute.code(), "title");
        assert_eq!(attribute.attribute_type().code, "string");
        assert!(!attribute.is_required());
        assert!(!attribute.is_collection());
        assert!(!attribute.is_contextual());
        assert!(attribute.family().is_none());
    }

    #[test]
    fn test_default_mask_applies_unless_overridden() {
        let catalog = BuiltinTypeCatalog::default();
        let default_mask = vec!["locale".to_string()];

        let inherited =
            AttributeDefinition::from_config("body", &AttributeConfig::default(), &catalog, &default_mask)
                .unwrap();
        assert_eq!(inherited.context_mask(), ["locale"]);

        let explicit = AttributeDefinition::from_config(
            "sku",
            &config(json!({"contextMask": []})),
            &catalog,
            &default_mask,
        )
        .unwrap();
        assert!(explicit.context_mask().is_empty());
    }

    #[test]
    fn test_collection_defers_to_type() {
        let catalog = BuiltinTypeCatalog::default();
        let tags =
            AttributeDefinition::from_config("tags", &config(json!({"type": "tags"})), &catalog, &[])
                .unwrap();
        assert!(tags.is_collection());

        let single = AttributeDefinition::from_config(
            "tags",
            &config(json!({"type": "tags", "collection": false})),
            &catalog,
            &[],
        )
        .unwrap();
        assert!(!single.is_collection());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let catalog = BuiltinTypeCatalog::default();
        let err = AttributeDefinition::from_config(
            "price",
            &config(json!({"type": "money"})),
            &catalog,
            &[],
        )
        .unwrap_err();
        assert_eq!(
            err,
            EavError::UnknownAttributeType {
                code: "price".to_string(),
                attribute_type: "money".to_string(),
            }
        );
    }

    #[test]
    fn test_unique_on_unsupported_type_rejected() {
        let catalog = BuiltinTypeCatalog::default();
        let err = AttributeDefinition::from_config(
            "address",
            &config(json!({"type": "embed", "unique": true})),
            &catalog,
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, EavError::UniqueNotSupported { .. }));
    }

    #[test]
    fn test_merge_overrides_and_merges_options() {
        let catalog = BuiltinTypeCatalog::default();
        let mut attribute = AttributeDefinition::from_config(
            "status",
            &config(json!({
                "type": "choice",
                "options": {"choices": ["draft", "published"], "expanded": false},
                "required": false
            })),
            &catalog,
            &[],
        )
        .unwrap();

        attribute
            .merge_configuration(
                &config(json!({"required": true, "options": {"expanded": true}})),
                &catalog,
            )
            .unwrap();

        assert!(attribute.is_required());
        assert_eq!(attribute.attribute_type().code, "choice");
        assert_eq!(attribute.options().get("expanded"), Some(&json!(true)));
        assert_eq!(
            attribute.options().get("choices"),
            Some(&json!(["draft", "published"]))
        );
    }

    #[test]
    fn test_clone_is_independent() {
        let catalog = BuiltinTypeCatalog::default();
        let original = AttributeDefinition::from_config(
            "title",
            &config(json!({"options": {"max": 10}})),
            &catalog,
            &[],
        )
        .unwrap();

        let mut copy = original.clone();
        copy.options_mut().insert("max".to_string(), json!(99));
        copy.set_family("Post");

        assert_eq!(original.options().get("max"), Some(&json!(10)));
        assert!(original.family().is_none());
    }

    #[test]
    fn test_context_mask_deduplicated() {
        let catalog = BuiltinTypeCatalog::default();
        let attribute = AttributeDefinition::from_config(
            "body",
            &config(json!({"contextMask": ["locale", "channel", "locale"]})),
            &catalog,
            &[],
        )
        .unwrap();
        assert_eq!(attribute.context_mask(), ["locale", "channel"]);
    }

    #[test]
    fn test_label_resolution_order() {
        let catalog = BuiltinTypeCatalog::default();
        let mut attribute =
            AttributeDefinition::from_config("firstName", &AttributeConfig::default(), &catalog, &[])
                .unwrap();
        attribute.set_family("User");

        assert_eq!(attribute.label(None), "first Name");

        let generic = MapTranslator::new().with("eav.attribute.firstName.label", "First name");
        assert_eq!(attribute.label(Some(&generic)), "First name");

        let specific = generic
            .clone()
            .with("eav.family.User.attribute.firstName.label", "Given name");
        assert_eq!(attribute.label(Some(&specific)), "Given name");

        attribute
            .merge_configuration(&config(json!({"label": "Prénom"})), &catalog)
            .unwrap();
        assert_eq!(attribute.label(Some(&specific)), "Prénom");
    }

    #[test]
    fn test_attribute_set_keeps_order_on_replace() {
        let catalog = BuiltinTypeCatalog::default();
        let make = |code: &str| {
            AttributeDefinition::from_config(code, &AttributeConfig::default(), &catalog, &[])
                .unwrap()
        };

        let mut set = AttributeSet::new();
        set.insert(make("a"));
        set.insert(make("b"));
        set.insert(make("c"));
        let replaced = set.insert(make("a"));

        assert!(replaced.is_some());
        assert_eq!(set.codes().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(set.len(), 3);
    }
}
