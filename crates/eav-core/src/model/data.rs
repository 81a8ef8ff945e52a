use chrono::{DateTime, Utc};
use eav_core_types::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Data - a generic entity instance shaped by its family
///
/// Construction goes through `FamilyDefinition::create_data`, which enforces
/// the instantiable and singleton guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Code of the family this instance belongs to
    pub family_code: String,

    /// Data class binding the family resolved to
    pub data_class: String,

    /// Context new contextual values are scoped to by default
    pub current_context: Context,

    /// Values in creation order
    pub values: Vec<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Data {
    pub(crate) fn new(
        family_code: impl Into<String>,
        data_class: impl Into<String>,
        current_context: Context,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            family_code: family_code.into(),
            data_class: data_class.into(),
            current_context,
            values: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn current_context(&self) -> &Context {
        &self.current_context
    }

    /// Replace the current context; existing values keep their own snapshot
    pub fn set_current_context(&mut self, context: Context) {
        self.current_context = context;
        self.touch();
    }

    /// Values bound to `attribute_code`, in creation order
    pub fn values_for<'a>(&'a self, attribute_code: &'a str) -> impl Iterator<Item = &'a Value> {
        self.values
            .iter()
            .filter(move |value| value.attribute_code == attribute_code)
    }

    /// Value of `attribute_code` whose context matches `context` exactly
    pub fn value_in_context(&self, attribute_code: &str, context: Option<&Context>) -> Option<&Value> {
        self.values.iter().find(|value| {
            value.attribute_code == attribute_code && value.context.as_ref() == context
        })
    }

    pub(crate) fn attach(&mut self, value: Value) -> &mut Value {
        self.values.push(value);
        self.touch();
        let last = self.values.len() - 1;
        &mut self.values[last]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Value - one attribute slot of a data instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    /// Unique identifier (UUID v7)
    pub id: String,

    /// Owning data instance
    pub data_id: String,

    pub attribute_code: String,

    /// Value class binding the family resolved to
    pub value_class: String,

    /// Context snapshot restricted to the attribute's mask; `None` when the
    /// value is context-free
    pub context: Option<Context>,

    /// Stored payload
    pub payload: serde_json::Value,
}

impl Value {
    pub(crate) fn new(
        data_id: impl Into<String>,
        attribute_code: impl Into<String>,
        value_class: impl Into<String>,
        context: Option<Context>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            data_id: data_id.into(),
            attribute_code: attribute_code.into(),
            value_class: value_class.into(),
            context,
            payload: serde_json::Value::Null,
        }
    }

    pub fn is_contextual(&self) -> bool {
        self.context.is_some()
    }

    pub fn set_payload(&mut self, payload: serde_json::Value) {
        self.payload = payload;
    }
}
