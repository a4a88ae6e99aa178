//! Discovery - finding actions on disk.
//!
//! - **prefilter**: cheap syntax check, no code is run
//! - **loader**: `ModuleLoader` port + `ModuleCatalog`
//! - **scanner**: walks roots in order and collects tagged members

pub mod loader;
pub mod prefilter;
pub mod scanner;

use std::path::PathBuf;

pub use self::loader::{LoadError, ModuleCatalog, ModuleFactory, ModuleLoader};
pub use self::prefilter::is_action_file;
pub use self::scanner::ActionScanner;

/// Folder name scanned recursively under each root.
pub const ACTIONS_DIR: &str = "actions";
/// Module loaded directly from each root.
pub const ACTIONS_MODULE: &str = "actions.py";
/// Extension of candidate source files inside an actions folder.
pub const SOURCE_EXTENSION: &str = "py";

/// One entry of the ordered discovery input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryRoot {
    /// Scanned for `actions/` and `actions.py`.
    Path(PathBuf),
    /// Walked; every folder holding `actions/` or `actions.py` is scanned.
    Library(PathBuf),
}
