//! Errors - action 実行時のエラー型
//!
//! # 二層構造
//! - [`UpstreamCallError`]: delegated external call failed. The dispatcher
//!   hands it back to the caller untouched.
//! - [`ActionError`]: everything an action body can fail with. Apart from the
//!   `Upstream` variant, the dispatcher contains these and reports `failed`.

use std::error::Error as StdError;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure of an external call an action delegates to (model invocation,
/// remote service, ...).
#[derive(Debug, thiserror::Error)]
#[error("upstream call failed: {message}")]
pub struct UpstreamCallError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl UpstreamCallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Upstream(#[from] UpstreamCallError),

    /// Raised by optional invocation paths (e.g. a pipeline without an async path).
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("declared output `{0}` was not produced")]
    MissingOutput(String),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(BoxError),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wrap an arbitrary error.
    ///
    /// An [`UpstreamCallError`] passed in boxed form is recognised and kept
    /// in the `Upstream` variant.
    pub fn other(error: impl Into<BoxError>) -> Self {
        match error.into().downcast::<UpstreamCallError>() {
            Ok(upstream) => Self::Upstream(*upstream),
            Err(error) => Self::Other(error),
        }
    }
}
