//! ActionDispatcher executes a named action against a parameter mapping.
//!
//! Every callable shape ends up in the same contract:
//! `Ok(ActionResult)` with status `success` or `failed`, or
//! `Err(UpstreamCallError)` when a delegated external call failed.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::action::{
    Action, ActionDef, ActionSource, AsyncAction, Executable, Pipeline, Runnable, SyncAction,
};
use crate::classify::{Disposition, classify};
use crate::config::DispatcherConfig;
use crate::discovery::{ActionScanner, ModuleCatalog, ModuleLoader};
use crate::domain::{ActionError, ActionResult, Params, UpstreamCallError};
use crate::registry::{ActionEntry, ActionRegistry};

/// Shared by all callers (wrap it in an `Arc`). Discovery runs once in
/// [`ActionDispatcher::new`]; afterwards the registry is read-mostly.
pub struct ActionDispatcher {
    registry: ActionRegistry,
    loader: Arc<dyn ModuleLoader>,
}

impl ActionDispatcher {
    /// Build a dispatcher and run discovery over `config.roots()`.
    pub fn new(config: &DispatcherConfig, loader: Arc<dyn ModuleLoader>) -> Self {
        info!("initializing action dispatcher");
        let dispatcher = Self {
            registry: ActionRegistry::new(),
            loader,
        };

        let found = ActionScanner::new(dispatcher.loader.as_ref()).scan(&config.roots());
        dispatcher.registry.extend(found);

        info!(actions = ?dispatcher.registered_actions(), "action dispatcher initialized");
        dispatcher
    }

    /// Dispatcher with an empty registry and no module loader.
    pub fn empty() -> Self {
        Self {
            registry: ActionRegistry::new(),
            loader: Arc::new(ModuleCatalog::new()),
        }
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Scan one more root and merge its actions, replacing same-named ones.
    pub fn load_actions_from_path(&self, path: &Path) -> usize {
        let found = ActionScanner::new(self.loader.as_ref()).load_actions_from_path(path);
        let count = found.len();
        self.registry.extend(found);
        count
    }

    pub fn register_action(&self, def: ActionDef, name: Option<&str>, override_existing: bool) -> bool {
        self.registry.register(def, name, override_existing)
    }

    pub fn register_actions<S>(&self, source: &S, override_existing: bool) -> usize
    where
        S: ActionSource + ?Sized,
    {
        self.registry.register_all(source, override_existing)
    }

    pub fn get_action(&self, name: &str) -> Option<Arc<ActionEntry>> {
        self.registry.get(name)
    }

    /// Registered names, sorted.
    pub fn registered_actions(&self) -> Vec<String> {
        self.registry.names().into_iter().collect()
    }

    /// Execute the action registered as `name`.
    ///
    /// Unknown names and failing actions give `(None, failed)`. Only an
    /// [`UpstreamCallError`] is returned as `Err`.
    pub async fn execute(&self, name: &str, params: Params) -> Result<ActionResult, UpstreamCallError> {
        let Some(entry) = self.registry.get(name) else {
            warn!(action = %name, "action not registered");
            return Ok(ActionResult::failed());
        };

        info!(action = %name, shape = ?entry.shape(), "executing registered action");
        let outcome = match entry.resolve().await {
            Ok(action) => invoke(name, &action, params).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => Ok(ActionResult::success(value)),
            Err(err) => match classify(err) {
                Disposition::Propagate(upstream) => {
                    warn!(action = %name, error = %upstream, "forwarding upstream call failure");
                    Err(upstream)
                }
                Disposition::Contain(err) => {
                    warn!(action = %name, error = %err, "error while executing action");
                    Ok(ActionResult::failed())
                }
            },
        }
    }
}

async fn invoke(name: &str, action: &Action, params: Params) -> Result<Value, ActionError> {
    match action {
        Action::Function(f) => {
            warn!(action = %name, "synchronous action called, it blocks the calling task");
            f.call(params)
        }
        Action::AsyncFunction(f) => f.call(params).await,
        Action::Pipeline(p) => invoke_pipeline(name, p.as_ref(), params).await,
        Action::Runnable(r) => r.invoke(params).await,
        Action::Executable(e) => e.run(params).await,
        Action::Class(_) => Err(ActionError::failed("instantiating the class produced another class")),
    }
}

async fn invoke_pipeline(name: &str, pipeline: &dyn Pipeline, params: Params) -> Result<Value, ActionError> {
    let output_keys = pipeline.output_keys();

    if output_keys.len() == 1 {
        return match pipeline.arun(params.clone()).await {
            Err(ActionError::NotImplemented(_)) => {
                debug!(action = %name, "async path not implemented, running synchronously");
                pipeline.run(params)
            }
            result => result,
        };
    }

    let outputs = match pipeline.acall(params.clone()).await {
        Err(ActionError::NotImplemented(_)) => {
            debug!(action = %name, "async path not implemented, running synchronously");
            pipeline.call(params)?
        }
        result => result?,
    };
    select_outputs(&output_keys, outputs).map(Value::Object)
}

/// Exactly the declared outputs, nothing else.
fn select_outputs(keys: &[String], mut outputs: Params) -> Result<Params, ActionError> {
    keys.iter()
        .map(|key| {
            outputs
                .remove(key)
                .map(|value| (key.clone(), value))
                .ok_or_else(|| ActionError::MissingOutput(key.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(v: Value) -> Params {
        match v {
            Value::Object(map) => map,
            _ => unreachable!("test params must be an object"),
        }
    }

    #[test]
    fn select_outputs_drops_internal_state() {
        let outputs = params(json!({"a": 1, "b": 2, "_memory": [1, 2, 3]}));
        let keys = vec!["a".to_string(), "b".to_string()];
        let selected = select_outputs(&keys, outputs).unwrap();
        assert_eq!(Value::Object(selected), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn select_outputs_reports_missing_keys() {
        let keys = vec!["a".to_string(), "b".to_string()];
        let err = select_outputs(&keys, params(json!({"a": 1}))).unwrap_err();
        assert!(matches!(err, ActionError::MissingOutput(ref k) if k == "b"));
    }

    #[tokio::test]
    async fn empty_dispatcher_misses_every_name() {
        let dispatcher = ActionDispatcher::empty();
        let result = dispatcher.execute("missing", Params::new()).await.unwrap();
        assert_eq!(result, ActionResult::failed());
        assert!(dispatcher.registered_actions().is_empty());
    }
}
