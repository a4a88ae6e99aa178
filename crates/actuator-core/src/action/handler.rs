//! Adapters from user code to the shape traits
//!
//! # 学習ポイント
//! - ジェネリック trait (`ActionHandler<P>`)
//! - Type erasure (`TypedAction<P, H>` → `dyn AsyncAction`)
//! - closure を newtype で包んで trait を実装する

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Action;
use super::shape::{ActionClass, AsyncAction, SyncAction};
use crate::domain::{ActionError, Params};

/// Async handler taking its keyword parameters as a typed struct.
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct Greet {
///     name: String,
/// }
///
/// struct GreetHandler;
///
/// #[async_trait]
/// impl ActionHandler<Greet> for GreetHandler {
///     async fn handle(&self, params: Greet) -> Result<Value, ActionError> {
///         Ok(json!(format!("hello {}", params.name)))
///     }
/// }
///
/// let action = Action::typed(GreetHandler);
/// ```
#[async_trait]
pub trait ActionHandler<P>: Send + Sync
where
    P: DeserializeOwned + Send + 'static,
{
    async fn handle(&self, params: P) -> Result<Value, ActionError>;
}

pub struct TypedAction<P, H> {
    handler: H,
    _marker: PhantomData<fn() -> P>,
}

impl<P, H> TypedAction<P, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<P, H> AsyncAction for TypedAction<P, H>
where
    P: DeserializeOwned + Send + 'static,
    H: ActionHandler<P>,
{
    async fn call(&self, params: Params) -> Result<Value, ActionError> {
        let params: P = serde_json::from_value(Value::Object(params))
            .map_err(|e| ActionError::InvalidParams(e.to_string()))?;
        self.handler.handle(params).await
    }
}

pub struct FnAction<F> {
    f: F,
}

impl<F> FnAction<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SyncAction for FnAction<F>
where
    F: Fn(Params) -> Result<Value, ActionError> + Send + Sync,
{
    fn call(&self, params: Params) -> Result<Value, ActionError> {
        (self.f)(params)
    }
}

pub struct AsyncFnAction<F> {
    f: F,
}

impl<F> AsyncFnAction<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> AsyncAction for AsyncFnAction<F>
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ActionError>> + Send + 'static,
{
    async fn call(&self, params: Params) -> Result<Value, ActionError> {
        (self.f)(params).await
    }
}

/// Class template backed by a zero-argument constructor.
pub struct ClassFactory<F> {
    factory: F,
}

impl<F> ClassFactory<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> ActionClass for ClassFactory<F>
where
    F: Fn() -> Result<Action, ActionError> + Send + Sync,
{
    fn instantiate(&self) -> Result<Action, ActionError> {
        (self.factory)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct AddParams {
        a: i64,
        b: i64,
    }

    struct AddHandler;

    #[async_trait]
    impl ActionHandler<AddParams> for AddHandler {
        async fn handle(&self, params: AddParams) -> Result<Value, ActionError> {
            Ok(json!(params.a + params.b))
        }
    }

    fn params(v: Value) -> Params {
        match v {
            Value::Object(map) => map,
            _ => unreachable!("test params must be an object"),
        }
    }

    #[tokio::test]
    async fn typed_action_binds_params_by_name() {
        let action = TypedAction::<AddParams, _>::new(AddHandler);
        let out = action.call(params(json!({"b": 2, "a": 40}))).await.unwrap();
        assert_eq!(out, json!(42));
    }

    #[tokio::test]
    async fn typed_action_rejects_missing_params() {
        let action = TypedAction::<AddParams, _>::new(AddHandler);
        let err = action.call(params(json!({"a": 1}))).await.unwrap_err();
        assert!(matches!(err, ActionError::InvalidParams(ref m) if m.contains("`b`")));
    }

    #[tokio::test]
    async fn async_closure_is_awaited() {
        let action = AsyncFnAction::new(|p: Params| async move { Ok(json!(p.len())) });
        let out = action.call(params(json!({"x": 1, "y": 2}))).await.unwrap();
        assert_eq!(out, json!(2));
    }

    #[test]
    fn class_factory_builds_a_fresh_instance_each_time() {
        let class = ClassFactory::new(|| Ok(Action::function(|_| Ok(Value::Null))));
        let first = class.instantiate().unwrap();
        let second = class.instantiate().unwrap();
        assert!(!first.same_target(&second));
    }
}
