//! Dispatcher configuration: which roots discovery scans, in which order.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::DiscoveryRoot;

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_ENV: &str = "ACTUATOR_CONFIG_PATH";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// When false, discovery is skipped and only explicit registrations exist.
    pub load_all_actions: bool,

    /// Built-in actions shipped with the application.
    pub builtin_path: Option<PathBuf>,

    /// Library tree; each folder holding actions is scanned.
    pub library_path: Option<PathBuf>,

    pub include_cwd: bool,

    /// Comma-separated list of config folders.
    pub config_path: Option<String>,

    pub import_paths: Vec<PathBuf>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            load_all_actions: true,
            builtin_path: None,
            library_path: None,
            include_cwd: true,
            config_path: None,
            import_paths: Vec::new(),
        }
    }
}

impl DispatcherConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `$ACTUATOR_CONFIG_PATH`, or defaults when unset or absent.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn config_paths(&self) -> Vec<PathBuf> {
        self.config_path
            .as_deref()
            .map(|paths| {
                paths
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ordered discovery input: builtin, library, cwd, config paths, import paths.
    pub fn roots(&self) -> Vec<DiscoveryRoot> {
        let mut roots = Vec::new();
        if !self.load_all_actions {
            return roots;
        }

        if let Some(builtin) = &self.builtin_path {
            roots.push(DiscoveryRoot::Path(builtin.clone()));
        }
        if let Some(library) = &self.library_path {
            roots.push(DiscoveryRoot::Library(library.clone()));
        }
        if self.include_cwd {
            match env::current_dir() {
                Ok(cwd) => roots.push(DiscoveryRoot::Path(cwd)),
                Err(err) => debug!(error = %err, "current directory unavailable, skipping"),
            }
        }
        roots.extend(self.config_paths().into_iter().map(DiscoveryRoot::Path));
        roots.extend(
            self.import_paths
                .iter()
                .map(|p| PathBuf::from(p.to_string_lossy().trim()))
                .filter(|p| !p.as_os_str().is_empty())
                .map(DiscoveryRoot::Path),
        );
        roots
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roots_follow_priority_order() {
        let config = DispatcherConfig {
            builtin_path: Some("/opt/app".into()),
            library_path: Some("/opt/app/library".into()),
            include_cwd: false,
            config_path: Some(" /etc/bot , /etc/bot-extra,".into()),
            import_paths: vec![" /srv/shared ".into()],
            ..Default::default()
        };

        assert_eq!(
            config.roots(),
            vec![
                DiscoveryRoot::Path("/opt/app".into()),
                DiscoveryRoot::Library("/opt/app/library".into()),
                DiscoveryRoot::Path("/etc/bot".into()),
                DiscoveryRoot::Path("/etc/bot-extra".into()),
                DiscoveryRoot::Path("/srv/shared".into()),
            ]
        );
    }

    #[test]
    fn cwd_comes_before_config_paths() {
        let config = DispatcherConfig {
            config_path: Some("/etc/bot".into()),
            ..Default::default()
        };
        let roots = config.roots();
        assert_eq!(roots[0], DiscoveryRoot::Path(env::current_dir().unwrap()));
        assert_eq!(roots[1], DiscoveryRoot::Path("/etc/bot".into()));
    }

    #[test]
    fn disabled_loading_has_no_roots() {
        let config = DispatcherConfig {
            load_all_actions: false,
            builtin_path: Some("/opt/app".into()),
            ..Default::default()
        };
        assert!(config.roots().is_empty());
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), r#"{"import_paths": ["/srv/a"], "include_cwd": false}"#).unwrap();

        let config = DispatcherConfig::load(tmp.path()).unwrap();
        assert!(config.load_all_actions);
        assert!(!config.include_cwd);
        assert_eq!(config.import_paths, vec![PathBuf::from("/srv/a")]);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "not json").unwrap();

        let err = DispatcherConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&tmp.path().display().to_string()));
    }
}
