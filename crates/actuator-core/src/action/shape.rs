//! One object-safe trait per callable shape.
//!
//! Each trait is what the dispatcher calls for that shape; all of them report
//! failure through [`ActionError`].

use async_trait::async_trait;
use serde_json::Value;

use super::Action;
use crate::domain::{ActionError, Params};

/// Plain synchronous function. Runs on the calling task.
pub trait SyncAction: Send + Sync {
    fn call(&self, params: Params) -> Result<Value, ActionError>;
}

#[async_trait]
pub trait AsyncAction: Send + Sync {
    async fn call(&self, params: Params) -> Result<Value, ActionError>;
}

/// A class-like template, instantiated with no arguments on first use.
pub trait ActionClass: Send + Sync {
    fn instantiate(&self) -> Result<Action, ActionError>;
}

/// Multi-step computation with one or more named outputs.
///
/// Every invocation path is optional. The dispatcher prefers the async path
/// and falls back to the sync one when the async path reports
/// [`ActionError::NotImplemented`]. A sync path doing blocking I/O stalls the
/// worker thread it runs on.
#[async_trait]
pub trait Pipeline: Send + Sync {
    fn output_keys(&self) -> Vec<String>;

    /// Async single-output path.
    async fn arun(&self, _params: Params) -> Result<Value, ActionError> {
        Err(ActionError::NotImplemented("async single-output path"))
    }

    /// Sync single-output path.
    fn run(&self, _params: Params) -> Result<Value, ActionError> {
        Err(ActionError::NotImplemented("sync single-output path"))
    }

    /// Async multi-output path. May return internal state besides the outputs.
    async fn acall(&self, _inputs: Params) -> Result<Params, ActionError> {
        Err(ActionError::NotImplemented("async multi-output path"))
    }

    fn call(&self, _inputs: Params) -> Result<Params, ActionError> {
        Err(ActionError::NotImplemented("sync multi-output path"))
    }
}

/// Single async `invoke(input)` entry point.
#[async_trait]
pub trait Runnable: Send + Sync {
    async fn invoke(&self, input: Params) -> Result<Value, ActionError>;
}

/// Anything else with a generic `run` operation.
#[async_trait]
pub trait Executable: Send + Sync {
    async fn run(&self, params: Params) -> Result<Value, ActionError>;
}
