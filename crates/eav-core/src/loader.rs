//! Model loading
//!
//! Turns a [`ModelConfig`] into a finalized [`Model`]: global attributes
//! first, then every family, parents before children.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Weak};
use std::time::Instant;

use eav_core_types::{ContextManager, StaticContextManager};

use crate::bindings::BindingCatalog;
use crate::config::ModelConfig;
use crate::errors::{EavError, Result};
use crate::model::attribute_type::{AttributeTypeCatalog, BuiltinTypeCatalog};
use crate::model::family::{FamilyBuildEnv, FamilyDefinition};
use crate::registry::{AttributeRegistry, FamilyLookup, FamilyRegistry};
use crate::translator::Translator;
use crate::{log_op_end, log_op_start};

/// A loaded model, read-only and shareable across threads
#[derive(Clone)]
pub struct Model {
    pub attributes: Arc<AttributeRegistry>,
    pub families: Arc<FamilyRegistry>,
    pub context: Arc<dyn ContextManager>,
    pub translator: Option<Arc<dyn Translator>>,
}

impl Model {
    /// # Errors
    ///
    /// * `FamilyNotFound` - If no family has this code
    pub fn get_family(&self, code: &str) -> Result<Arc<FamilyDefinition>> {
        self.families.get_family(code)
    }

    pub fn has_family(&self, code: &str) -> bool {
        self.families.has_family(code)
    }

    /// Families without a parent, in registration order
    pub fn root_families(&self) -> Vec<Arc<FamilyDefinition>> {
        self.families
            .families()
            .into_iter()
            .filter(|family| family.parent().is_none())
            .collect()
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("attributes", &self.attributes)
            .field("families", &self.families)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Model`]
///
/// ```
/// use eav_core::{ModelConfig, ModelLoader};
///
/// let config = ModelConfig::from_yaml_str("families:\n  Page: {}\n").unwrap();
/// let model = ModelLoader::new().load(&config).unwrap();
/// assert!(model.has_family("Page"));
/// ```
pub struct ModelLoader {
    catalog: Arc<dyn AttributeTypeCatalog>,
    bindings: BindingCatalog,
    translator: Option<Arc<dyn Translator>>,
    context_manager: Option<Arc<dyn ContextManager>>,
    global_context_mask: Option<Vec<String>>,
}

impl ModelLoader {
    pub fn new() -> Self {
        Self {
            catalog: Arc::new(BuiltinTypeCatalog::default()),
            bindings: BindingCatalog::default(),
            translator: None,
            context_manager: None,
            global_context_mask: None,
        }
    }

    pub fn with_type_catalog(mut self, catalog: Arc<dyn AttributeTypeCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_bindings(mut self, bindings: BindingCatalog) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Use this context manager instead of one built from `defaultContext`
    pub fn with_context_manager(mut self, context_manager: Arc<dyn ContextManager>) -> Self {
        self.context_manager = Some(context_manager);
        self
    }

    /// Override the configuration's `globalContextMask`
    pub fn with_global_context_mask(mut self, mask: Vec<String>) -> Self {
        self.global_context_mask = Some(mask);
        self
    }

    /// Read and load a configuration file
    ///
    /// # Errors
    ///
    /// Errors of [`ModelConfig::from_path`] and [`ModelLoader::load`].
    pub fn load_path(&self, path: &Path) -> Result<Model> {
        let config = ModelConfig::from_path(path)?;
        self.load(&config)
    }

    /// Build the attribute registry, then every family in dependency order
    ///
    /// # Errors
    ///
    /// * `UnknownParentFamily` - If a parent is not declared
    /// * `InheritanceCycle` - If parents loop back on themselves
    /// * Any error of [`AttributeRegistry::parse_global_config`] or
    ///   [`FamilyDefinition::build`]
    pub fn load(&self, config: &ModelConfig) -> Result<Model> {
        let start = Instant::now();
        log_op_start!("load_model", family_count = config.families.len());

        let mask = self
            .global_context_mask
            .clone()
            .unwrap_or_else(|| config.global_context_mask.clone());
        let mut attributes = AttributeRegistry::new(Arc::clone(&self.catalog), mask);
        attributes.parse_global_config(&config.attributes)?;

        let context: Arc<dyn ContextManager> = match &self.context_manager {
            Some(context_manager) => Arc::clone(context_manager),
            None => Arc::new(StaticContextManager::new(config.default_context.clone())),
        };

        let families = Arc::new(FamilyRegistry::new());
        let env = FamilyBuildEnv {
            attributes: &attributes,
            families: lookup_handle(&families),
            context_manager: Arc::clone(&context),
            bindings: &self.bindings,
            translator: self.translator.clone(),
        };

        let mut stack = Vec::new();
        for code in config.families.keys() {
            build_family(code, config, &env, &families, &mut stack)?;
        }

        log_op_end!(
            "load_model",
            duration_ms = start.elapsed().as_millis() as u64,
            family_count = families.len(),
            attribute_count = attributes.attributes().len()
        );

        Ok(Model {
            attributes: Arc::new(attributes),
            families,
            context,
            translator: self.translator.clone(),
        })
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn build_family(
    code: &str,
    config: &ModelConfig,
    env: &FamilyBuildEnv<'_>,
    families: &FamilyRegistry,
    stack: &mut Vec<String>,
) -> Result<()> {
    if families.has_family(code) {
        return Ok(());
    }
    if let Some(position) = stack.iter().position(|pending| pending == code) {
        let mut chain = stack[position..].to_vec();
        chain.push(code.to_string());
        return Err(EavError::InheritanceCycle { chain });
    }
    let family_config = config
        .families
        .get(code)
        .ok_or_else(|| EavError::FamilyNotFound {
            family: code.to_string(),
        })?;

    if let Some(parent) = &family_config.parent {
        if !config.families.contains_key(parent) {
            return Err(EavError::UnknownParentFamily {
                family: code.to_string(),
                parent: parent.clone(),
            });
        }
        stack.push(code.to_string());
        let built = build_family(parent, config, env, families, stack);
        stack.pop();
        built?;
    }

    let family = FamilyDefinition::build(code, family_config, env)?;
    tracing::debug!(
        family_code = code,
        parent_code = ?family_config.parent,
        attribute_count = family.attributes().len(),
        "Built family"
    );
    families.add_family(Arc::new(family))
}

/// Weak handle to a registry, for building families outside the loader
pub fn lookup_handle(families: &Arc<FamilyRegistry>) -> Weak<dyn FamilyLookup> {
    let lookup: Arc<dyn FamilyLookup> = families.clone();
    Arc::downgrade(&lookup)
}
