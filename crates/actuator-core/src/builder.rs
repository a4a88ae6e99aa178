//! DispatcherBuilder - dispatcher の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - `expect_actions()` で必要な action 名を宣言
//! - `build()` 時に「期待集合 ⊆ 登録済み集合」をチェック
//! - 不足があれば `BuildError` を返す

use std::sync::Arc;

use crate::action::ActionDef;
use crate::config::DispatcherConfig;
use crate::discovery::{ModuleCatalog, ModuleLoader};
use crate::dispatcher::ActionDispatcher;

/// ```ignore
/// let dispatcher = DispatcherBuilder::new()
///     .config(DispatcherConfig::load_default()?)
///     .loader(catalog)
///     .register(ActionDef::tagged("greet", greet))
///     .expect_actions(&["greet", "retrieve_relevant_chunks"])
///     .build()?;
/// ```
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    loader: Arc<dyn ModuleLoader>,
    registrations: Vec<(ActionDef, Option<String>)>,
    expected_actions: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing actions: {0:?}. These actions were expected but not registered.")]
    MissingActions(Vec<String>),
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            config: DispatcherConfig::default(),
            loader: Arc::new(ModuleCatalog::new()),
            registrations: Vec::new(),
            expected_actions: None,
        }
    }

    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Registered after discovery, replacing discovered actions of the same name.
    pub fn register(mut self, def: ActionDef) -> Self {
        self.registrations.push((def, None));
        self
    }

    pub fn register_as(mut self, name: impl Into<String>, def: ActionDef) -> Self {
        self.registrations.push((def, Some(name.into())));
        self
    }

    pub fn expect_actions(mut self, names: &[&str]) -> Self {
        self.expected_actions = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn build(self) -> Result<ActionDispatcher, BuildError> {
        let dispatcher = ActionDispatcher::new(&self.config, self.loader);
        for (def, name) in self.registrations {
            dispatcher.register_action(def, name.as_deref(), true);
        }

        if let Some(expected) = self.expected_actions {
            let registry = dispatcher.registry();
            let mut missing: Vec<String> = expected
                .into_iter()
                .filter(|name| !registry.contains(name))
                .collect();
            if !missing.is_empty() {
                missing.sort();
                return Err(BuildError::MissingActions(missing));
            }
        }

        Ok(dispatcher)
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
