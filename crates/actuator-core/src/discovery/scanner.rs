//! ActionScanner - roots → tagged members
//!
//! # 失敗時の扱い
//! - missing path: skipped, debug log only
//! - module load failure: error log with the file path, scan continues
//! - folder without actions: not an error

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use super::loader::{LoadError, ModuleLoader};
use super::prefilter::is_action_file;
use super::{ACTIONS_DIR, ACTIONS_MODULE, DiscoveryRoot, SOURCE_EXTENSION};
use crate::action::ActionDef;

/// Tagged members found by a scan, keyed by action name.
pub type Found = IndexMap<String, ActionDef>;

pub struct ActionScanner<'a> {
    loader: &'a dyn ModuleLoader,
}

impl<'a> ActionScanner<'a> {
    pub fn new(loader: &'a dyn ModuleLoader) -> Self {
        Self { loader }
    }

    /// Scan `roots` in order. A later root's action replaces an earlier one
    /// with the same name.
    pub fn scan(&self, roots: &[DiscoveryRoot]) -> Found {
        let mut found = Found::new();
        for root in roots {
            match root {
                DiscoveryRoot::Path(path) => found.extend(self.load_actions_from_path(path)),
                DiscoveryRoot::Library(library) => {
                    for path in library_roots(library) {
                        found.extend(self.load_actions_from_path(&path));
                    }
                }
            }
        }
        found
    }

    /// Actions from `path/actions/` (recursively) and `path/actions.py`.
    pub fn load_actions_from_path(&self, path: &Path) -> Found {
        let mut found = Found::new();
        if !path.exists() {
            debug!(path = %path.display(), "discovery root does not exist");
            return found;
        }

        let actions_dir = path.join(ACTIONS_DIR);
        if actions_dir.is_dir() {
            found.extend(self.find_actions(&actions_dir));
        }

        let actions_module = path.join(ACTIONS_MODULE);
        if actions_module.exists() {
            found.extend(self.load_module(&actions_module));
        }
        found
    }

    /// Every source file under `dir` that passes the pre-filter.
    pub fn find_actions(&self, dir: &Path) -> Found {
        let mut found = Found::new();
        if !dir.exists() {
            debug!(path = %dir.display(), "actions folder does not exist");
            return found;
        }

        let sources = WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!(path = %dir.display(), error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == SOURCE_EXTENSION));

        for entry in sources {
            let path = entry.path();
            match read_source(path) {
                Ok(source) if is_action_file(&source) => found.extend(self.load_module(path)),
                Ok(_) => debug!(path = %path.display(), "no call-shaped decorators, skipping"),
                Err(err) => error!(path = %path.display(), error = %err, "failed to read action source"),
            }
        }

        if found.is_empty() {
            debug!(path = %dir.display(), "no actions found");
        }
        found
    }

    /// Tagged function- and class-shaped members of one module.
    pub fn load_module(&self, path: &Path) -> Found {
        let mut found = Found::new();
        if !path.is_file() {
            error!(path = %path.display(), "action module does not exist or is not a file");
            return found;
        }

        debug!(path = %path.display(), "loading action module");
        let members = match self.loader.load(path) {
            Ok(members) => members,
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to load actions from module");
                return found;
            }
        };

        for def in members {
            if !def.is_tagged() || !def.action().is_function_or_class() {
                continue;
            }
            let name = def.action_name().to_string();
            info!(action = %name, path = %path.display(), "found action");
            found.insert(name, def);
        }
        found
    }
}

/// Folders under `library` (itself included) that hold `actions/` or
/// `actions.py`, in walk order.
pub fn library_roots(library: &Path) -> Vec<PathBuf> {
    WalkDir::new(library)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(|dir| dir.join(ACTIONS_DIR).is_dir() || dir.join(ACTIONS_MODULE).is_file())
        .collect()
}

/// Source text for the pre-filter. Bytes outside UTF-8 (latin-1 comments and
/// the like) are replaced; the pre-filter only looks at ASCII tokens.
fn read_source(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, SyncAction};
    use crate::discovery::ModuleCatalog;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    const TAGGED: &str = "@action(name=\"x\")\nasync def x():\n    pass\n";

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn returns(name: &'static str, v: Value) -> ActionDef {
        ActionDef::tagged(name, Action::function(move |_| Ok(v.clone())))
    }

    #[test]
    fn missing_root_yields_nothing() {
        let catalog = ModuleCatalog::new();
        let scanner = ActionScanner::new(&catalog);
        let found = scanner.scan(&[DiscoveryRoot::Path("/definitely/not/here".into())]);
        assert!(found.is_empty());
    }

    #[test]
    fn prefilter_gates_loading() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "actions/tagged.py", TAGGED);
        write(tmp.path(), "actions/plain.py", "def helper():\n    pass\n");

        let catalog = ModuleCatalog::new()
            .module("actions/tagged.py", || Ok(vec![returns("tagged", Value::Null)]))
            .module("actions/plain.py", || panic!("plain.py must not be loaded"));
        let found = ActionScanner::new(&catalog).load_actions_from_path(tmp.path());

        assert_eq!(found.keys().collect::<Vec<_>>(), vec!["tagged"]);
    }

    #[test]
    fn actions_module_skips_prefilter() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "actions.py", "# no decorators here\n");

        let catalog = ModuleCatalog::new().module("actions.py", || Ok(vec![returns("top", Value::Null)]));
        let found = ActionScanner::new(&catalog).load_actions_from_path(tmp.path());
        assert!(found.contains_key("top"));
    }

    #[test]
    fn non_utf8_sources_still_pass_the_prefilter() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("actions/legacy.py");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            b"# -*- coding: latin-1 -*-\n# caf\xe9\n@action(name=\"legacy\")\ndef legacy():\n    pass\n",
        )
        .unwrap();

        let catalog = ModuleCatalog::new().module("actions/legacy.py", || Ok(vec![returns("legacy", Value::Null)]));
        let found = ActionScanner::new(&catalog).load_actions_from_path(tmp.path());
        assert_eq!(found.keys().collect::<Vec<_>>(), vec!["legacy"]);
    }

    #[test]
    fn nested_folders_are_walked() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "actions/retrieval/kb.py", TAGGED);

        let catalog = ModuleCatalog::new().module("retrieval/kb.py", || Ok(vec![returns("kb", Value::Null)]));
        let found = ActionScanner::new(&catalog).load_actions_from_path(tmp.path());
        assert!(found.contains_key("kb"));
    }

    #[test]
    fn failing_module_does_not_stop_the_scan() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "actions/a_broken.py", TAGGED);
        write(tmp.path(), "actions/b_fine.py", TAGGED);
        write(tmp.path(), "actions/c_unknown.py", TAGGED);

        let catalog = ModuleCatalog::new()
            .module("actions/a_broken.py", || Err(LoadError::Execution("ImportError".into())))
            .module("actions/b_fine.py", || Ok(vec![returns("fine", Value::Null)]));
        let found = ActionScanner::new(&catalog).load_actions_from_path(tmp.path());

        assert_eq!(found.keys().collect::<Vec<_>>(), vec!["fine"]);
    }

    #[test]
    fn only_tagged_functions_and_classes_are_kept() {
        struct Echo;

        #[async_trait::async_trait]
        impl crate::action::Executable for Echo {
            async fn run(&self, params: crate::domain::Params) -> Result<Value, crate::domain::ActionError> {
                Ok(Value::Object(params))
            }
        }

        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "actions.py", "");
        let catalog = ModuleCatalog::new().module("actions.py", || {
            Ok(vec![
                returns("fn_action", Value::Null),
                ActionDef::tagged("class_action", Action::class(|| Ok(Action::function(|_| Ok(Value::Null))))),
                ActionDef::new("untagged", Action::function(|_| Ok(Value::Null))),
                ActionDef::tagged("object_action", Action::executable(Echo)),
            ])
        });

        let found = ActionScanner::new(&catalog).load_actions_from_path(tmp.path());
        let mut names: Vec<_> = found.keys().cloned().collect();
        names.sort();
        assert_eq!(names, vec!["class_action", "fn_action"]);
    }

    #[test]
    fn later_roots_override_earlier_ones() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        write(first.path(), "actions.py", "");
        write(second.path(), "actions.py", "");

        let first_module = first.path().join("actions.py");
        let second_module = second.path().join("actions.py");
        let catalog = ModuleCatalog::new()
            .module(first_module, || Ok(vec![returns("shared", json!(1)), returns("only_first", json!(1))]))
            .module(second_module, || Ok(vec![returns("shared", json!(2))]));

        let found = ActionScanner::new(&catalog).scan(&[
            DiscoveryRoot::Path(first.path().to_path_buf()),
            DiscoveryRoot::Path(second.path().to_path_buf()),
        ]);

        assert_eq!(found.len(), 2);
        let Action::Function(shared) = found["shared"].action() else {
            panic!("expected a function action");
        };
        assert_eq!(shared.call(Default::default()).unwrap(), json!(2));
    }

    #[test]
    fn library_roots_lists_folders_with_actions() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "hallucination/actions.py", "");
        write(tmp.path(), "factchecking/actions/check.py", "");
        write(tmp.path(), "empty/readme.md", "");

        let roots = library_roots(tmp.path());
        assert_eq!(
            roots,
            vec![tmp.path().join("factchecking"), tmp.path().join("hallucination")]
        );
    }
}
