//! Action metadata: the `{ name, ... }` record a tagging capability attaches
//! to a function or class to mark it as an action.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMeta {
    pub name: String,

    /// Free-form fields set by the tagging capability (e.g. `is_system_action`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
