use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::{EavError, Result};
use crate::model::family::FamilyDefinition;

/// Read access to the family graph
///
/// Families hold a weak reference to their lookup to resolve children.
pub trait FamilyLookup: Send + Sync {
    /// # Errors
    ///
    /// * `FamilyNotFound` - If no family has this code
    fn get_family(&self, code: &str) -> Result<Arc<FamilyDefinition>>;

    fn has_family(&self, code: &str) -> bool {
        self.get_family(code).is_ok()
    }

    /// Direct children of `code`, in registration order
    fn get_by_parent(&self, code: &str) -> Vec<Arc<FamilyDefinition>>;

    /// Every family, in registration order
    fn families(&self) -> Vec<Arc<FamilyDefinition>>;
}

#[derive(Default)]
struct Entries {
    ordered: Vec<Arc<FamilyDefinition>>,
    index: HashMap<String, usize>,
}

/// Owner of every finalized family
///
/// Written only while loading; afterwards it is shared read-only.
#[derive(Default)]
pub struct FamilyRegistry {
    entries: RwLock<Entries>,
}

impl FamilyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a finalized family
    ///
    /// # Errors
    ///
    /// * `DuplicateFamily` - If a family with the same code is registered
    pub fn add_family(&self, family: Arc<FamilyDefinition>) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.index.contains_key(family.code()) {
            return Err(EavError::DuplicateFamily {
                family: family.code().to_string(),
            });
        }
        let position = entries.ordered.len();
        entries.index.insert(family.code().to_string(), position);
        entries.ordered.push(family);
        Ok(())
    }

    /// Registered codes, in registration order
    pub fn codes(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .ordered
            .iter()
            .map(|family| family.code().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FamilyLookup for FamilyRegistry {
    fn get_family(&self, code: &str) -> Result<Arc<FamilyDefinition>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .index
            .get(code)
            .map(|&position| Arc::clone(&entries.ordered[position]))
            .ok_or_else(|| EavError::FamilyNotFound {
                family: code.to_string(),
            })
    }

    fn has_family(&self, code: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .index
            .contains_key(code)
    }

    fn get_by_parent(&self, code: &str) -> Vec<Arc<FamilyDefinition>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .ordered
            .iter()
            .filter(|family| family.parent().is_some_and(|parent| parent.code() == code))
            .cloned()
            .collect()
    }

    fn families(&self) -> Vec<Arc<FamilyDefinition>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ordered
            .clone()
    }
}

impl fmt::Debug for FamilyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FamilyRegistry")
            .field("families", &self.codes())
            .finish()
    }
}
