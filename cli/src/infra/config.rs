//! Infrastructure implementation of the `TargetStore` port.

use std::path::{Path, PathBuf};

use crate::application::ports::{TargetResolver, TargetStore};
use crate::domain::{ConfigError, ConnectionParameters, Lookup, TargetsConfig};

/// Environment variable overriding the configuration path.
pub const CONFIG_PATH_ENV: &str = "REMOTEKIT_CONFIG";

/// Production `TargetStore` reading a YAML file on disk.
///
/// The file is read again on every call, so edits take effect immediately.
pub struct YamlTargetStore {
    path: PathBuf,
}

impl YamlTargetStore {
    /// Store at `$REMOTEKIT_CONFIG`, or `~/.remotekit/targets.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> anyhow::Result<Self> {
        if let Ok(val) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(Self::with_path(val));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(".remotekit").join("targets.yaml")))
    }

    /// Store at an explicit path.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TargetStore for YamlTargetStore {
    fn load(&self) -> Result<TargetsConfig, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no configuration file");
                return Ok(TargetsConfig::default());
            }
            Err(e) => {
                return Err(ConfigError::Unreadable {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(TargetsConfig::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Unreadable {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl TargetResolver for YamlTargetStore {
    fn resolve(&self, target: &str) -> Result<ConnectionParameters, ConfigError> {
        self.load()?.resolve(target, &ProcessEnv)
    }
}

/// [`Lookup`] over the real process environment.
pub struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}
