pub mod check;
pub mod describe;
pub mod humanize;
pub mod tree;

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use eav_core::{log_op_end, log_op_error, log_op_start};
use eav_core::{EavError, MapTranslator, Model, ModelLoader};

/// Load a model, logging the outcome under `op`
pub fn load_model(
    op: &str,
    config: &Path,
    translations: Option<&Path>,
) -> Result<Model, Box<dyn Error>> {
    let start = Instant::now();
    log_op_start!(op);

    let mut loader = ModelLoader::new();
    if let Some(path) = translations {
        let translator = read_translations(path).map_err(|err| fail(op, start, err))?;
        loader = loader.with_translator(Arc::new(translator));
    }

    let model = loader.load_path(config).map_err(|err| fail(op, start, err))?;

    log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
    Ok(model)
}

/// Log a model error for `op` and hand it back boxed
pub fn fail(op: &str, start: Instant, err: EavError) -> Box<dyn Error> {
    log_op_error!(
        op,
        err.clone(),
        duration_ms = start.elapsed().as_millis() as u64
    );
    Box::new(err)
}

/// Read a flat key → message catalogue (YAML or JSON)
fn read_translations(path: &Path) -> Result<MapTranslator, EavError> {
    let content = std::fs::read_to_string(path).map_err(|e| EavError::Io {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;
    let catalogue: HashMap<String, String> =
        serde_yaml::from_str(&content).map_err(|e| EavError::InvalidConfiguration {
            message: format!("Invalid translations in {}: {}", path.display(), e),
        })?;
    Ok(MapTranslator::from(catalogue))
}
