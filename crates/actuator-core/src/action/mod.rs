//! Action - callable shapes the dispatcher knows how to invoke
//!
//! # 二層構造
//! - **表層**: closures and typed handlers ([`Action::function`],
//!   [`Action::typed`], ...) wrap user code.
//! - **内部**: one object-safe trait per shape, stored as `Arc<dyn ...>`
//!   inside the [`Action`] enum.

pub mod def;
pub mod handler;
pub mod shape;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ActionError, Params};

pub use self::def::{ActionDef, ActionSource};
pub use self::handler::{ActionHandler, AsyncFnAction, ClassFactory, FnAction, TypedAction};
pub use self::shape::{ActionClass, AsyncAction, Executable, Pipeline, Runnable, SyncAction};

/// A callable registered under a name.
///
/// Cloning is cheap; every variant shares its target through an `Arc`.
#[derive(Clone)]
pub enum Action {
    Function(Arc<dyn SyncAction>),
    AsyncFunction(Arc<dyn AsyncAction>),
    /// Instantiated lazily on first dispatch.
    Class(Arc<dyn ActionClass>),
    Pipeline(Arc<dyn Pipeline>),
    Runnable(Arc<dyn Runnable>),
    Executable(Arc<dyn Executable>),
}

impl Action {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(Params) -> Result<Value, ActionError> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(FnAction::new(f)))
    }

    pub fn async_function<F, Fut>(f: F) -> Self
    where
        F: Fn(Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ActionError>> + Send + 'static,
    {
        Self::AsyncFunction(Arc::new(AsyncFnAction::new(f)))
    }

    /// Async action whose keyword parameters are decoded into `P`.
    pub fn typed<P, H>(handler: H) -> Self
    where
        P: DeserializeOwned + Send + 'static,
        H: ActionHandler<P> + 'static,
    {
        Self::AsyncFunction(Arc::new(TypedAction::<P, H>::new(handler)))
    }

    pub fn class<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Action, ActionError> + Send + Sync + 'static,
    {
        Self::Class(Arc::new(ClassFactory::new(factory)))
    }

    pub fn pipeline(pipeline: impl Pipeline + 'static) -> Self {
        Self::Pipeline(Arc::new(pipeline))
    }

    pub fn runnable(runnable: impl Runnable + 'static) -> Self {
        Self::Runnable(Arc::new(runnable))
    }

    pub fn executable(executable: impl Executable + 'static) -> Self {
        Self::Executable(Arc::new(executable))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Function(_) => "function",
            Self::AsyncFunction(_) => "async_function",
            Self::Class(_) => "class",
            Self::Pipeline(_) => "pipeline",
            Self::Runnable(_) => "runnable",
            Self::Executable(_) => "executable",
        }
    }

    /// Function- or class-shaped; the only members picked up from modules.
    pub fn is_function_or_class(&self) -> bool {
        matches!(
            self,
            Self::Function(_) | Self::AsyncFunction(_) | Self::Class(_)
        )
    }

    /// True when both actions point at the same underlying object.
    pub fn same_target(&self, other: &Action) -> bool {
        self.target_ptr() == other.target_ptr()
    }

    fn target_ptr(&self) -> *const () {
        match self {
            Self::Function(a) => Arc::as_ptr(a) as *const (),
            Self::AsyncFunction(a) => Arc::as_ptr(a) as *const (),
            Self::Class(a) => Arc::as_ptr(a) as *const (),
            Self::Pipeline(a) => Arc::as_ptr(a) as *const (),
            Self::Runnable(a) => Arc::as_ptr(a) as *const (),
            Self::Executable(a) => Arc::as_ptr(a) as *const (),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.kind_name()).finish()
    }
}
