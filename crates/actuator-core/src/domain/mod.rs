//! Domain model (metadata, results, errors).
//!
//! action 本体の形（shape）には依存しない型だけをここに置く。

pub mod errors;
pub mod meta;
pub mod outcome;

pub use self::errors::{ActionError, BoxError, UpstreamCallError};
pub use self::meta::ActionMeta;
pub use self::outcome::{ActionResult, ActionStatus};

/// Keyword-style parameters passed to an action, bound by name.
pub type Params = serde_json::Map<String, serde_json::Value>;
