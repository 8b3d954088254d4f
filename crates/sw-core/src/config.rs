//! Configuration types and parsing for stepwise.yml

use crate::error::{CoreError, CoreResult};
use crate::policy::{Engine, TransactionPolicy, TxMode};
use crate::state_table::StateTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File names searched for when no explicit config path is given
pub const CONFIG_FILE_NAMES: [&str; 2] = ["stepwise.yml", "stepwise.yaml"];

/// Project configuration from stepwise.yml
///
/// Every field is optional; command-line flags and environment variables
/// take precedence over values found here. Relative paths in the file
/// (`migrations`, and `dsn` for file-based engines) are relative to the
/// directory holding the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Target database engine
    #[serde(default)]
    pub engine: Option<Engine>,

    /// Connection string (a file path or `:memory:` for embedded engines)
    #[serde(default)]
    pub dsn: Option<String>,

    /// Name of the state table, optionally schema-qualified
    #[serde(default)]
    pub state_table: Option<StateTable>,

    /// Directory containing migration SQL files, relative to the config file
    #[serde(default)]
    pub migrations: Option<PathBuf>,

    /// Transactional-mode override
    #[serde(default)]
    pub run_in_transaction: Option<TxMode>,

    /// Per-engine overrides of the default transaction policy
    #[serde(default)]
    pub transactional_engines: BTreeMap<Engine, bool>,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                source: e,
            })?;

        if let (Some(migrations), Some(base)) = (&config.migrations, path.parent()) {
            if migrations.is_relative() {
                config.migrations = Some(base.join(migrations));
            }
        }
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Load configuration from a directory, if one of [`CONFIG_FILE_NAMES`]
    /// exists there.
    pub fn discover(dir: &Path) -> CoreResult<Option<Self>> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("Using config file {}", path.display());
                return Self::load(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// DSN to use for `engine`.
    ///
    /// A relative file path for a file-based engine is resolved against the
    /// config file's directory; `:memory:` and server DSNs are returned as is.
    pub fn dsn_for(&self, engine: Engine) -> Option<String> {
        let dsn = self.dsn.as_ref()?;
        match &self.base_dir {
            Some(base)
                if engine.is_file_based() && dsn != ":memory:" && Path::new(dsn).is_relative() =>
            {
                Some(base.join(dsn).display().to_string())
            }
            _ => Some(dsn.clone()),
        }
    }

    /// Transaction policy with this config's per-engine overrides applied
    pub fn transaction_policy(&self) -> TransactionPolicy {
        TransactionPolicy::with_overrides(&self.transactional_engines)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
