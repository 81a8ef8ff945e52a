//! Addressing context shared by the model and its collaborators
//!
//! A context is a flat mapping of dimension names (e.g. `locale`, `channel`)
//! to the selected value for each dimension. Attributes declare a mask over
//! these dimensions; values only ever carry the masked subset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

/// Ordered snapshot of context dimensions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(BTreeMap<String, String>);

/// A masked context key was absent from the context being projected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingContextKey(pub String);

impl fmt::Display for MissingContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing context key '{}'", self.0)
    }
}

impl std::error::Error for MissingContextKey {}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return a copy of `self` with every entry of `overrides` applied on top
    pub fn merged_with(&self, overrides: &Context) -> Context {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        Context(merged)
    }

    /// Restrict the context to exactly the keys of `mask`
    ///
    /// # Errors
    ///
    /// Returns the first mask key that has no value in this context.
    pub fn project<S: AsRef<str>>(&self, mask: &[S]) -> Result<Context, MissingContextKey> {
        let mut projected = BTreeMap::new();
        for key in mask {
            let key = key.as_ref();
            let value = self
                .0
                .get(key)
                .ok_or_else(|| MissingContextKey(key.to_string()))?;
            projected.insert(key.to_string(), value.clone());
        }
        Ok(Context(projected))
    }
}

impl From<BTreeMap<String, String>> for Context {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Source of the ambient context
///
/// The model never stores ambient context itself; it asks this collaborator
/// whenever a caller relies on "the current context" instead of passing one.
pub trait ContextManager: Send + Sync {
    /// Context every family falls back to, validated at load time
    fn default_context(&self) -> Context;

    /// Context of the current request/process scope
    fn current_context(&self) -> Context;
}

/// Context manager backed by an in-memory default and an optional override
#[derive(Debug, Default)]
pub struct StaticContextManager {
    default: Context,
    current: RwLock<Option<Context>>,
}

impl StaticContextManager {
    pub fn new(default: Context) -> Self {
        Self {
            default,
            current: RwLock::new(None),
        }
    }

    /// Replace the current context; the default stays untouched
    pub fn set_current_context(&self, context: Context) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(context);
    }

    /// Drop the current override so the default applies again
    pub fn reset_current_context(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = None;
    }
}

impl ContextManager for StaticContextManager {
    fn default_context(&self) -> Context {
        self.default.clone()
    }

    fn current_context(&self) -> Context {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.default.clone())
    }
}
