//! Transaction policy: decide whether a run is wrapped in one transaction.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Target database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// DuckDB
    DuckDb,
    /// SQLite
    Sqlite,
    /// PostgreSQL
    Postgres,
    /// MySQL / MariaDB
    MySql,
}

impl Engine {
    /// Every known engine
    pub const ALL: [Engine; 4] = [Engine::DuckDb, Engine::Sqlite, Engine::Postgres, Engine::MySql];

    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::DuckDb => "duckdb",
            Engine::Sqlite => "sqlite",
            Engine::Postgres => "postgres",
            Engine::MySql => "mysql",
        }
    }

    /// Whether the DSN for this engine is a local file path
    pub fn is_file_based(self) -> bool {
        match self {
            Engine::DuckDb | Engine::Sqlite => true,
            Engine::Postgres | Engine::MySql => false,
        }
    }

    /// Whether schema changes on this engine are undone by a rollback.
    ///
    /// MySQL implicitly commits around DDL statements.
    pub fn supports_transactional_ddl(self) -> bool {
        match self {
            Engine::DuckDb | Engine::Sqlite | Engine::Postgres => true,
            Engine::MySql => false,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "duckdb" => Ok(Engine::DuckDb),
            "sqlite" | "sqlite3" => Ok(Engine::Sqlite),
            "postgres" | "postgresql" => Ok(Engine::Postgres),
            "mysql" => Ok(Engine::MySql),
            other => Err(CoreError::InvalidOption {
                option: "engine".to_string(),
                value: other.to_string(),
                expected: "duckdb, sqlite, postgres, or mysql".to_string(),
            }),
        }
    }
}

/// Transactional-mode override selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxMode {
    /// Use the engine's entry in the [`TransactionPolicy`]
    #[default]
    Auto,
    /// Always run in one transaction
    Always,
    /// Never open a transaction
    Never,
}

impl fmt::Display for TxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxMode::Auto => write!(f, "auto"),
            TxMode::Always => write!(f, "always"),
            TxMode::Never => write!(f, "never"),
        }
    }
}

impl FromStr for TxMode {
    type Err = CoreError;

    /// An empty string means unset and resolves to [`TxMode::Auto`].
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "" | "auto" => Ok(TxMode::Auto),
            "always" => Ok(TxMode::Always),
            "never" => Ok(TxMode::Never),
            other => Err(CoreError::InvalidOption {
                option: "run-in-transaction".to_string(),
                value: other.to_string(),
                expected: "auto, always, or never".to_string(),
            }),
        }
    }
}

/// Per-engine defaults consulted when the mode is [`TxMode::Auto`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPolicy {
    transactional: BTreeMap<Engine, bool>,
}

impl Default for TransactionPolicy {
    fn default() -> Self {
        Self {
            transactional: Engine::ALL
                .iter()
                .map(|e| (*e, e.supports_transactional_ddl()))
                .collect(),
        }
    }
}

impl TransactionPolicy {
    /// Default table with the given per-engine overrides applied on top.
    pub fn with_overrides(overrides: &BTreeMap<Engine, bool>) -> Self {
        let mut policy = Self::default();
        for (engine, transactional) in overrides {
            policy.transactional.insert(*engine, *transactional);
        }
        policy
    }

    /// Whether `engine` runs transactionally under [`TxMode::Auto`].
    pub fn is_transactional(&self, engine: Engine) -> bool {
        self.transactional
            .get(&engine)
            .copied()
            .unwrap_or_else(|| engine.supports_transactional_ddl())
    }

    /// Resolve the effective transactional mode for a run.
    pub fn resolve(&self, mode: TxMode, engine: Engine) -> bool {
        match mode {
            TxMode::Always => true,
            TxMode::Never => false,
            TxMode::Auto => self.is_transactional(engine),
        }
    }
}
