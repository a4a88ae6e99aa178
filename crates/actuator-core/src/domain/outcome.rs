//! Outcome model: the `(result, status)` pair returned by a dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Serialized as `success` / `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one `execute` call.
///
/// - `success`: `value` holds what the action produced (a scalar, or a mapping
///   for multi-output pipelines).
/// - `failed`: `value` is absent. Lookup misses and contained action errors
///   both end up here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub value: Option<Value>,
    pub status: ActionStatus,
}

impl ActionResult {
    pub fn success(value: Value) -> Self {
        Self {
            value: Some(value),
            status: ActionStatus::Success,
        }
    }

    pub fn failed() -> Self {
        Self {
            value: None,
            status: ActionStatus::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }

    pub fn into_parts(self) -> (Option<Value>, ActionStatus) {
        (self.value, self.status)
    }
}
