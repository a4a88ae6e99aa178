//! actuator-core
//!
//! Discovers actions under a set of filesystem roots, keeps them in a
//! name → entry registry and dispatches calls to them by name.
//!
//! # モジュール構成
//! - **domain**: metadata, `(result, status)` outcome, error types
//! - **action**: callable shapes (function, class, pipeline, runnable, executable)
//! - **registry**: name → entry store with override policy and lazy instances
//! - **classify**: upstream failures vs. contained failures
//! - **discovery**: pre-filter, module loader port, root scanner
//! - **dispatcher**: `execute(name, params)`
//! - **builder** / **config**: wiring

pub mod action;
pub mod builder;
pub mod classify;
pub mod config;
pub mod discovery;
pub mod dispatcher;
pub mod domain;
pub mod registry;

pub use crate::action::{Action, ActionDef, ActionHandler, ActionSource};
pub use crate::builder::{BuildError, DispatcherBuilder};
pub use crate::config::DispatcherConfig;
pub use crate::discovery::{DiscoveryRoot, ModuleCatalog, ModuleLoader};
pub use crate::dispatcher::ActionDispatcher;
pub use crate::domain::{
    ActionError, ActionMeta, ActionResult, ActionStatus, Params, UpstreamCallError,
};
pub use crate::registry::{ActionEntry, ActionRegistry, ActionShape};
