use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use eav_core_types::{Context, ContextManager, MissingContextKey};
use serde::Serialize;

use super::attribute::{AttributeDefinition, AttributeSet};
use super::data::{Data, Value};
use crate::bindings::{
    BindingCatalog, DataBinding, ValueBinding, DEFAULT_DATA_CLASS, DEFAULT_VALUE_CLASS,
};
use crate::config::{FamilyConfig, Options};
use crate::errors::{EavError, IdentifierViolation, Result};
use crate::registry::{AttributeRegistry, FamilyLookup};
use crate::translator::{resolve_label, Translator};

/// Services a family is built against
///
/// The family lookup must already hold the parent, if any.
#[derive(Clone)]
pub struct FamilyBuildEnv<'a> {
    pub attributes: &'a AttributeRegistry,
    pub families: Weak<dyn FamilyLookup>,
    pub context_manager: Arc<dyn ContextManager>,
    pub bindings: &'a BindingCatalog,
    pub translator: Option<Arc<dyn Translator>>,
}

/// FamilyDefinition - one entity type
///
/// Built in a single step from its configuration and its parent, then
/// immutable except for the lazily computed children.
pub struct FamilyDefinition {
    code: String,
    parent: Option<Arc<FamilyDefinition>>,
    label: Option<String>,
    attributes: AttributeSet,
    attribute_as_label: Vec<String>,
    attribute_as_identifier: Option<String>,
    instantiable: bool,
    singleton: bool,
    options: Options,
    form_options: Options,
    data_binding: DataBinding,
    value_binding: ValueBinding,

    families: Weak<dyn FamilyLookup>,
    context_manager: Arc<dyn ContextManager>,
    translator: Option<Arc<dyn Translator>>,
    children: OnceLock<Vec<Weak<FamilyDefinition>>>,
}

impl FamilyDefinition {
    /// Build and validate a family
    ///
    /// # Errors
    ///
    /// * `UnknownParentFamily` - If the parent is not in the family lookup
    /// * `ReservedAttributeCode` / `UnknownAttributeType` / `UniqueNotSupported` -
    ///   From a local attribute
    /// * `UnknownLabelAttribute` / `UnknownIdentifierAttribute` - If a
    ///   designation names an attribute the family does not have
    /// * `InvalidIdentifierAttribute` - If the identifier is not unique,
    ///   required, single-valued and context-free
    /// * `UnknownDataClass` / `UnknownValueClass` - If a class reference
    ///   is not in the binding catalog
    /// * `DefaultContextMismatch` - If the default context lacks a key the
    ///   value class requires
    pub fn build(code: &str, config: &FamilyConfig, env: &FamilyBuildEnv<'_>) -> Result<Self> {
        let parent = match &config.parent {
            Some(parent_code) => Some(resolve_parent(code, parent_code, &env.families)?),
            None => None,
        };

        // Inherited state: deep copies only
        let mut attributes = AttributeSet::new();
        let mut attribute_as_label = Vec::new();
        let mut attribute_as_identifier = None;
        let mut data_class = None;
        let mut value_class = None;
        if let Some(parent) = &parent {
            for attribute in parent.attributes() {
                let mut inherited = attribute.clone();
                inherited.set_family(code);
                attributes.insert(inherited);
            }
            attribute_as_label = parent.attribute_as_label.clone();
            attribute_as_identifier = parent.attribute_as_identifier.clone();
            data_class = Some(parent.data_binding.name.clone());
            value_class = Some(parent.value_binding.name.clone());
        }

        let registry = env.attributes;
        for (attribute_code, local) in config.attributes.iter() {
            let mut attribute = if registry.has_attribute(attribute_code) {
                let mut global = registry.get_attribute(attribute_code)?.clone();
                if let Some(local) = local {
                    global.merge_configuration(local, registry.catalog())?;
                }
                global
            } else if let Some(inherited) = attributes.get(attribute_code) {
                let mut inherited = inherited.clone();
                if let Some(local) = local {
                    inherited.merge_configuration(local, registry.catalog())?;
                }
                inherited
            } else {
                registry.create_attribute(attribute_code, local.as_ref())?
            };
            attribute.set_family(code);
            attributes.insert(attribute);
        }

        if !config.attribute_as_label.is_empty() {
            attribute_as_label = config.attribute_as_label.clone();
        }
        for label_code in &attribute_as_label {
            if !attributes.contains(label_code) {
                return Err(EavError::UnknownLabelAttribute {
                    family: code.to_string(),
                    attribute: label_code.clone(),
                });
            }
        }

        if let Some(identifier) = &config.attribute_as_identifier {
            attribute_as_identifier = Some(identifier.clone());
        }
        if let Some(identifier) = &attribute_as_identifier {
            check_identifier(code, identifier, &attributes)?;
        }

        let data_class = config
            .data_class
            .clone()
            .or(data_class)
            .unwrap_or_else(|| DEFAULT_DATA_CLASS.to_string());
        let data_binding = env
            .bindings
            .data(&data_class)
            .cloned()
            .ok_or_else(|| EavError::UnknownDataClass {
                family: code.to_string(),
                class_ref: data_class.clone(),
            })?;

        let value_class = config
            .value_class
            .clone()
            .or(value_class)
            .unwrap_or_else(|| DEFAULT_VALUE_CLASS.to_string());
        let value_binding = env
            .bindings
            .value(&value_class)
            .cloned()
            .ok_or_else(|| EavError::UnknownValueClass {
                family: code.to_string(),
                class_ref: value_class.clone(),
            })?;

        if value_binding.contextual {
            let default_context = env.context_manager.default_context();
            if let Some(key) = value_binding
                .required_context_keys
                .iter()
                .find(|key| !default_context.contains_key(key))
            {
                return Err(EavError::DefaultContextMismatch {
                    family: code.to_string(),
                    class_ref: value_class,
                    key: key.clone(),
                });
            }
        }

        Ok(Self {
            code: code.to_string(),
            parent,
            label: config.label.clone(),
            attributes,
            attribute_as_label,
            attribute_as_identifier,
            instantiable: config.instantiable,
            singleton: config.singleton,
            options: config.options.clone(),
            form_options: config.form_options.clone(),
            data_binding,
            value_binding,
            families: env.families.clone(),
            context_manager: Arc::clone(&env.context_manager),
            translator: env.translator.clone(),
            children: OnceLock::new(),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn parent(&self) -> Option<&Arc<FamilyDefinition>> {
        self.parent.as_ref()
    }

    /// # Errors
    ///
    /// * `MissingAttribute` - If the family has no attribute with this code
    pub fn get_attribute(&self, code: &str) -> Result<&AttributeDefinition> {
        self.attributes
            .get(code)
            .ok_or_else(|| EavError::MissingAttribute {
                family: self.code.clone(),
                code: code.to_string(),
            })
    }

    pub fn has_attribute(&self, code: &str) -> bool {
        self.attributes.contains(code)
    }

    /// Resolved attributes: inherited first, then local, in declaration order
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Attributes used to render an instance's label, in order
    pub fn attribute_as_label(&self) -> Vec<&AttributeDefinition> {
        self.attribute_as_label
            .iter()
            .filter_map(|code| self.attributes.get(code))
            .collect()
    }

    pub fn attribute_as_identifier(&self) -> Option<&AttributeDefinition> {
        self.attribute_as_identifier
            .as_deref()
            .and_then(|code| self.attributes.get(code))
    }

    pub fn is_instantiable(&self) -> bool {
        self.instantiable
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub fn options(&self) -> &Options {
        &self.options
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

    pub fn data_binding(&self) -> &DataBinding {
        &self.data_binding
    }

    pub fn value_binding(&self) -> &ValueBinding {
        &self.value_binding
    }

    /// Direct children, resolved once on first call
    ///
    /// Families registered after the first call are not picked up.
    pub fn children(&self) -> Vec<Arc<FamilyDefinition>> {
        self.children
            .get_or_init(|| match self.families.upgrade() {
                Some(lookup) => lookup
                    .get_by_parent(&self.code)
                    .iter()
                    .map(Arc::downgrade)
                    .collect(),
                None => Vec::new(),
            })
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// This family's code followed by every descendant's, depth first
    pub fn matching_codes(&self) -> Vec<String> {
        let mut codes = Vec::new();
        self.collect_matching_codes(&mut codes);
        codes
    }

    fn collect_matching_codes(&self, codes: &mut Vec<String>) {
        if codes.contains(&self.code) {
            return;
        }
        codes.push(self.code.clone());
        for child in self.children() {
            child.collect_matching_codes(codes);
        }
    }

    /// New data instance scoped to the current context
    ///
    /// # Errors
    ///
    /// * `NotInstantiable` - If the family is abstract
    /// * `SingletonFamily` - If the family is a singleton
    pub fn create_data(&self) -> Result<Data> {
        self.create_data_with_context(self.context_manager.current_context())
    }

    /// New data instance scoped to `context`
    ///
    /// A context-free data class ignores `context`.
    ///
    /// # Errors
    ///
    /// Same as [`FamilyDefinition::create_data`].
    pub fn create_data_with_context(&self, context: Context) -> Result<Data> {
        if !self.instantiable {
            return Err(EavError::NotInstantiable {
                family: self.code.clone(),
            });
        }
        if self.singleton {
            return Err(EavError::SingletonFamily {
                family: self.code.clone(),
            });
        }
        let context = if self.data_binding.contextual {
            context
        } else {
            Context::new()
        };
        Ok(Data::new(&self.code, &self.data_binding.name, context))
    }

    /// Create a value slot for `attribute` and attach it to `data`
    ///
    /// When the value class, the data class and the attribute are all
    /// context-aware, the value's context is `context` merged over the
    /// data's current context (explicit keys win), restricted to the
    /// attribute's mask. Otherwise the value is context-free. Nothing is
    /// attached when an error is returned.
    ///
    /// # Errors
    ///
    /// * `MissingAttribute` - If `attribute` is not part of this family
    /// * `MissingContextKey` - If the effective context lacks a masked key
    pub fn create_value<'d>(
        &self,
        data: &'d mut Data,
        attribute: &AttributeDefinition,
        context: Option<&Context>,
    ) -> Result<&'d mut Value> {
        let attribute = self.get_attribute(attribute.code())?;

        let scoped = if self.value_binding.contextual
            && self.data_binding.contextual
            && attribute.is_contextual()
        {
            let effective = match context {
                Some(overrides) => data.current_context().merged_with(overrides),
                None => data.current_context().clone(),
            };
            let projected = effective.project(attribute.context_mask()).map_err(
                |MissingContextKey(key)| EavError::MissingContextKey {
                    family: self.code.clone(),
                    attribute: attribute.code().to_string(),
                    key,
                },
            )?;
            Some(projected)
        } else {
            None
        };

        let value = Value::new(
            data.id.clone(),
            attribute.code(),
            &self.value_binding.name,
            scoped,
        );
        Ok(data.attach(value))
    }

    /// Human label: explicit label, then `eav.family.{code}.label`, then
    /// the humanized code
    pub fn label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        resolve_label(
            self.translator.as_deref(),
            &[format!("eav.family.{}.label", self.code)],
            &self.code,
        )
    }

    /// # Errors
    ///
    /// * `MissingAttribute` - If the family has no attribute with this code
    pub fn attribute_label(&self, code: &str) -> Result<String> {
        Ok(self
            .get_attribute(code)?
            .label(self.translator.as_deref()))
    }

    /// Serializable snapshot, labels resolved
    pub fn summary(&self) -> FamilySummary {
        let translator = self.translator.as_deref();
        FamilySummary {
            code: self.code.clone(),
            label: self.label(),
            parent: self.parent.as_ref().map(|parent| parent.code.clone()),
            attributes: self
                .attributes
                .iter()
                .map(|attribute| AttributeSummary {
                    code: attribute.code().to_string(),
                    label: attribute.label(translator),
                    attribute_type: attribute.attribute_type().code.clone(),
                    group: attribute.group().map(str::to_string),
                    required: attribute.is_required(),
                    unique: attribute.is_unique(),
                    collection: attribute.is_collection(),
                    context_mask: attribute.context_mask().to_vec(),
                })
                .collect(),
            attribute_as_label: self.attribute_as_label.clone(),
            attribute_as_identifier: self.attribute_as_identifier.clone(),
            instantiable: self.instantiable,
            singleton: self.singleton,
            data_class: self.data_binding.name.clone(),
            value_class: self.value_binding.name.clone(),
            matching_codes: self.matching_codes(),
        }
    }
}

fn resolve_parent(
    code: &str,
    parent_code: &str,
    families: &Weak<dyn FamilyLookup>,
) -> Result<Arc<FamilyDefinition>> {
    families
        .upgrade()
        .and_then(|lookup| lookup.get_family(parent_code).ok())
        .ok_or_else(|| EavError::UnknownParentFamily {
            family: code.to_string(),
            parent: parent_code.to_string(),
        })
}

fn check_identifier(family: &str, identifier: &str, attributes: &AttributeSet) -> Result<()> {
    let attribute = attributes
        .get(identifier)
        .ok_or_else(|| EavError::UnknownIdentifierAttribute {
            family: family.to_string(),
            attribute: identifier.to_string(),
        })?;

    let violation = if !attribute.is_unique() {
        Some(IdentifierViolation::NotUnique)
    } else if !attribute.is_required() {
        Some(IdentifierViolation::NotRequired)
    } else if attribute.is_collection() {
        Some(IdentifierViolation::Collection)
    } else if attribute.is_contextual() {
        Some(IdentifierViolation::Contextual)
    } else {
        None
    };

    match violation {
        Some(violation) => Err(EavError::InvalidIdentifierAttribute {
            family: family.to_string(),
            attribute: identifier.to_string(),
            violation,
        }),
        None => Ok(()),
    }
}

impl fmt::Display for FamilyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl fmt::Debug for FamilyDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyDefinition")
            .field("code", &self.code)
            .field("parent", &self.parent.as_ref().map(|parent| parent.code()))
            .field("attributes", &self.attributes.codes().collect::<Vec<_>>())
            .field("attribute_as_label", &self.attribute_as_label)
            .field("attribute_as_identifier", &self.attribute_as_identifier)
            .field("instantiable", &self.instantiable)
            .field("singleton", &self.singleton)
            .field("data_class", &self.data_binding.name)
            .field("value_class", &self.value_binding.name)
            .finish_non_exhaustive()
    }
}

/// Attribute as shown in a [`FamilySummary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSummary {
    pub code: String,
    pub label: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub required: bool,
    pub unique: bool,
    pub collection: bool,
    pub context_mask: Vec<String>,
}

/// Serializable view of a resolved family
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySummary {
    pub code: String,
    pub label: String,
    pub parent: Option<String>,
    pub attributes: Vec<AttributeSummary>,
    pub attribute_as_label: Vec<String>,
    pub attribute_as_identifier: Option<String>,
    pub instantiable: bool,
    pub singleton: bool,
    pub data_class: String,
    pub value_class: String,
    pub matching_codes: Vec<String>,
}
