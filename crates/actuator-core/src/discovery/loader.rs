//! ModuleLoader port - turns a source file into its members.
//!
//! Loading a file means running whatever produces its actions, so it can
//! fail; the scanner logs such failures and moves on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::action::ActionDef;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no module registered for {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("module execution failed: {0}")]
    Execution(String),
}

pub trait ModuleLoader: Send + Sync {
    /// All top-level members of the module at `path`, tagged or not.
    fn load(&self, path: &Path) -> Result<Vec<ActionDef>, LoadError>;
}

pub type ModuleFactory = Arc<dyn Fn() -> Result<Vec<ActionDef>, LoadError> + Send + Sync>;

/// Build-time manifest: source paths mapped to module factories compiled
/// into the binary.
///
/// A key matches a file when it is the file's path or a trailing part of it,
/// so `actions/weather.py` matches `/srv/bot/actions/weather.py`. The longest
/// matching key wins.
#[derive(Clone, Default)]
pub struct ModuleCatalog {
    modules: Vec<(PathBuf, ModuleFactory)>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module<F>(mut self, path: impl Into<PathBuf>, factory: F) -> Self
    where
        F: Fn() -> Result<Vec<ActionDef>, LoadError> + Send + Sync + 'static,
    {
        self.insert(path, factory);
        self
    }

    pub fn insert<F>(&mut self, path: impl Into<PathBuf>, factory: F)
    where
        F: Fn() -> Result<Vec<ActionDef>, LoadError> + Send + Sync + 'static,
    {
        self.modules.push((path.into(), Arc::new(factory)));
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn lookup(&self, path: &Path) -> Option<&ModuleFactory> {
        self.modules
            .iter()
            .filter(|(key, _)| path.ends_with(key))
            .max_by_key(|(key, _)| key.components().count())
            .map(|(_, factory)| factory)
    }
}

impl ModuleLoader for ModuleCatalog {
    fn load(&self, path: &Path) -> Result<Vec<ActionDef>, LoadError> {
        let factory = self
            .lookup(path)
            .ok_or_else(|| LoadError::NotFound(path.to_path_buf()))?;
        factory()
    }
}
