//! ActionRegistry - name → entry の管理
//!
//! # 設計
//! - Filled by discovery and explicit `register` calls; read on every dispatch.
//! - The map is behind a `RwLock`; entries are handed out as `Arc` so no lock
//!   is held across an `.await`.
//! - Class templates keep their entry object. The instance goes into a
//!   per-entry `OnceCell`, so concurrent first dispatches construct it once.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::action::{Action, ActionClass, ActionDef, ActionSource, Pipeline};
use crate::domain::{ActionError, ActionMeta};

/// Shape of an entry as the dispatcher sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionShape {
    Function,
    AsyncFunction,
    ClassTemplate,
    Instance,
    SingleOutputPipeline,
    MultiOutputPipeline,
    Runnable,
    GenericExecutable,
}

impl ActionShape {
    /// Shape of a bare callable. Class templates always report `ClassTemplate`.
    pub fn of(action: &Action) -> Self {
        match action {
            Action::Function(_) => Self::Function,
            Action::AsyncFunction(_) => Self::AsyncFunction,
            Action::Class(_) => Self::ClassTemplate,
            Action::Pipeline(p) if p.output_keys().len() == 1 => Self::SingleOutputPipeline,
            Action::Pipeline(_) => Self::MultiOutputPipeline,
            Action::Runnable(_) => Self::Runnable,
            Action::Executable(_) => Self::GenericExecutable,
        }
    }
}

pub struct ActionEntry {
    name: String,
    meta: Option<ActionMeta>,
    action: Action,
    instance: OnceCell<Action>,
}

impl ActionEntry {
    fn new(name: String, def: ActionDef) -> Self {
        let (meta, action) = def.into_parts();
        Self {
            name,
            meta,
            action,
            instance: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> Option<&ActionMeta> {
        self.meta.as_ref()
    }

    /// The callable as registered (the template, for class entries).
    pub fn action(&self) -> &Action {
        &self.action
    }

    /// The memoized instance of a class entry, once dispatched.
    pub fn instance(&self) -> Option<&Action> {
        self.instance.get()
    }

    pub fn shape(&self) -> ActionShape {
        match &self.action {
            Action::Class(_) if self.instance.initialized() => ActionShape::Instance,
            action => ActionShape::of(action),
        }
    }

    /// Callable to dispatch to.
    ///
    /// A class template is instantiated on the first call and the instance is
    /// reused afterwards. If instantiation fails the slot stays empty and the
    /// next call tries again.
    pub async fn resolve(&self) -> Result<Action, ActionError> {
        let Action::Class(template) = &self.action else {
            return Ok(self.action.clone());
        };

        let instance = self
            .instance
            .get_or_try_init(|| async {
                debug!(action = %self.name, "instantiating action class");
                template.instantiate()
            })
            .await?;
        Ok(instance.clone())
    }
}

impl std::fmt::Debug for ActionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEntry")
            .field("name", &self.name)
            .field("shape", &self.shape())
            .finish()
    }
}

#[derive(Default)]
pub struct ActionRegistry {
    entries: RwLock<HashMap<String, Arc<ActionEntry>>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def` under `name`, or under its derived name when `name` is
    /// `None`.
    ///
    /// With `override_existing == false` an existing entry is left untouched.
    /// Returns whether the entry was stored.
    pub fn register(&self, def: ActionDef, name: Option<&str>, override_existing: bool) -> bool {
        let name = name.unwrap_or_else(|| def.action_name()).to_string();

        let mut entries = self.entries.write();
        if !override_existing && entries.contains_key(&name) {
            debug!(action = %name, "action already registered, keeping existing entry");
            return false;
        }

        let entry = ActionEntry::new(name.clone(), def);
        info!(action = %name, shape = ?entry.shape(), "registered action");
        entries.insert(name, Arc::new(entry));
        true
    }

    /// Register every tagged member of `source`. Returns how many were stored.
    pub fn register_all<S>(&self, source: &S, override_existing: bool) -> usize
    where
        S: ActionSource + ?Sized,
    {
        let mut stored = 0;
        for def in source.members() {
            if def.is_tagged() && self.register(def, None, override_existing) {
                stored += 1;
            }
        }
        stored
    }

    /// Merge discovery results. Later names replace earlier ones.
    pub(crate) fn extend(&self, found: IndexMap<String, ActionDef>) {
        for (name, def) in found {
            self.register(def, Some(&name), true);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<ActionEntry>> {
        self.entries.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn entries(&self) -> Vec<Arc<ActionEntry>> {
        self.entries.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
