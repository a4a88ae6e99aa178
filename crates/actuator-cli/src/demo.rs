//! Demo actions compiled into the CLI.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use actuator_core::action::Pipeline;
use actuator_core::{Action, ActionDef, ActionError, ActionHandler, ActionSource, ModuleCatalog, Params};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

/// Actions registered directly, without discovery.
pub struct Builtins;

impl ActionSource for Builtins {
    fn members(&self) -> Vec<ActionDef> {
        vec![
            ActionDef::tagged("echo", Action::async_function(|p: Params| async move { Ok(Value::Object(p)) })),
            ActionDef::tagged("add", Action::typed(AddHandler)),
            ActionDef::tagged("word_stats", Action::pipeline(WordStats)),
            ActionDef::tagged("counter", Action::class(|| Ok(Counter::instance()))),
            // untagged helpers are not registered by `register_actions`
            ActionDef::new("format_helper", Action::function(|_| Ok(Value::Null))),
        ]
    }
}

/// Modules the scanner can load when it finds matching files under a root.
pub fn catalog() -> ModuleCatalog {
    ModuleCatalog::new().module("actions/greetings.py", || {
        Ok(vec![ActionDef::tagged(
            "greet",
            Action::typed(GreetHandler),
        )])
    })
}

#[derive(Deserialize)]
struct Add {
    a: f64,
    b: f64,
}

struct AddHandler;

#[async_trait]
impl ActionHandler<Add> for AddHandler {
    async fn handle(&self, params: Add) -> Result<Value, ActionError> {
        Ok(json!(params.a + params.b))
    }
}

#[derive(Deserialize)]
struct Greet {
    name: String,
}

struct GreetHandler;

#[async_trait]
impl ActionHandler<Greet> for GreetHandler {
    async fn handle(&self, params: Greet) -> Result<Value, ActionError> {
        Ok(json!(format!("Hello, {}!", params.name)))
    }
}

struct WordStats;

#[async_trait]
impl Pipeline for WordStats {
    fn output_keys(&self) -> Vec<String> {
        vec!["words".into(), "chars".into()]
    }

    fn call(&self, inputs: Params) -> Result<Params, ActionError> {
        let text = inputs
            .get("text")
            .and_then(Value::as_str)
            .ok_or_else(|| ActionError::InvalidParams("`text` must be a string".into()))?;

        let mut outputs = Params::new();
        outputs.insert("words".into(), json!(text.split_whitespace().count()));
        outputs.insert("chars".into(), json!(text.chars().count()));
        outputs.insert("text".into(), json!(text));
        Ok(outputs)
    }
}

struct Counter;

impl Counter {
    fn instance() -> Action {
        let count = Arc::new(AtomicU64::new(0));
        Action::async_function(move |_| {
            let n = count.fetch_add(1, Ordering::Relaxed) + 1;
            async move { Ok(json!(n)) }
        })
    }
}
