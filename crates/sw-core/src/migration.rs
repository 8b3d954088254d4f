//! Migration discovery and validation
//!
//! A migrations directory holds plain SQL files named `<digits>_<anything>.sql`.
//! The leading digit run is the migration's version. [`MigrationSet::load`]
//! turns such a directory into a version-ordered, duplicate-free list.

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// File suffix recognised as a migration script
pub const MIGRATION_SUFFIX: &str = ".sql";

/// Largest accepted migration version
pub const MAX_VERSION: u64 = i64::MAX as u64;

static MIGRATION_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn migration_name_re() -> &'static Regex {
    MIGRATION_NAME_RE
        .get_or_init(|| Regex::new(r"(?s)^([0-9]+)_.*\.sql$").expect("valid migration name regex"))
}

/// A single versioned SQL script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Version parsed from the leading digits of the file name (always >= 1)
    pub version: u64,

    /// File name, used in logs and error messages
    pub name: String,

    /// Script text, executed verbatim as one unit
    pub script: String,
}

impl Migration {
    /// Build a migration from its file name and script, validating the name.
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        let version = parse_migration_name(&name)?;
        Ok(Self {
            version,
            name,
            script: script.into(),
        })
    }
}

/// Parse the version out of a migration file name.
///
/// Fails with [`CoreError::InvalidName`] when the name is not
/// `<digits>_<anything>.sql` and with [`CoreError::ZeroVersion`] when the
/// digits parse to zero.
pub fn parse_migration_name(name: &str) -> CoreResult<u64> {
    let caps = migration_name_re()
        .captures(name)
        .ok_or_else(|| CoreError::InvalidName {
            name: name.to_string(),
            reason: "migration name must begin with digits followed by underscore (`_`)"
                .to_string(),
        })?;

    // Versions are stored in a signed 64-bit column.
    let version: u64 = caps[1]
        .parse()
        .ok()
        .filter(|v| *v <= MAX_VERSION)
        .ok_or_else(|| CoreError::InvalidName {
            name: name.to_string(),
            reason: "version out of range".to_string(),
        })?;

    if version == 0 {
        return Err(CoreError::ZeroVersion {
            name: name.to_string(),
        });
    }

    Ok(version)
}

/// Ordered, validated collection of migrations
///
/// Versions are strictly ascending and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSet {
    migrations: Vec<Migration>,
}

impl MigrationSet {
    /// Load every migration script from `dir`.
    ///
    /// Subdirectories and files without the `.sql` suffix are ignored. Names
    /// are validated in lexicographic order before any script is read, so the
    /// same malformed directory always yields the same error.
    pub fn load(dir: &Path) -> CoreResult<Self> {
        let read_dir_err = |e: std::io::Error| CoreError::ReadDir {
            path: dir.display().to_string(),
            source: e,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            if !entry.path().is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.ends_with(MIGRATION_SUFFIX) {
                names.push((name.into_owned(), file_name.to_str().is_some()));
            }
        }
        names.sort();

        let mut by_version: BTreeMap<u64, String> = BTreeMap::new();
        for (name, utf8) in names {
            if !utf8 {
                return Err(CoreError::InvalidName {
                    name,
                    reason: "file name is not valid UTF-8".to_string(),
                });
            }
            let version = parse_migration_name(&name)?;
            if let Some(existing) = by_version.get(&version) {
                return Err(duplicate(version, existing, &name));
            }
            by_version.insert(version, name);
        }

        let mut migrations = Vec::with_capacity(by_version.len());
        for (version, name) in by_version {
            let path = dir.join(&name);
            let script = std::fs::read_to_string(&path).map_err(|e| CoreError::ReadFile {
                path: path.display().to_string(),
                source: e,
            })?;
            migrations.push(Migration {
                version,
                name,
                script,
            });
        }

        log::debug!(
            "Loaded {} migrations from {}",
            migrations.len(),
            dir.display()
        );
        Ok(Self { migrations })
    }

    /// Build a set from already-constructed migrations, sorting by version.
    pub fn from_migrations(mut migrations: Vec<Migration>) -> CoreResult<Self> {
        migrations.sort_by(|a, b| a.version.cmp(&b.version).then(a.name.cmp(&b.name)));
        for pair in migrations.windows(2) {
            if pair[0].version == pair[1].version {
                return Err(duplicate(pair[0].version, &pair[0].name, &pair[1].name));
            }
        }
        if let Some(m) = migrations.iter().find(|m| m.version == 0) {
            return Err(CoreError::ZeroVersion {
                name: m.name.clone(),
            });
        }
        Ok(Self { migrations })
    }

    /// Migrations with a version strictly greater than `version`, ascending.
    pub fn pending_after(&self, version: u64) -> &[Migration] {
        let start = self.migrations.partition_point(|m| m.version <= version);
        &self.migrations[start..]
    }

    /// Highest version in the set, if any.
    pub fn latest_version(&self) -> Option<u64> {
        self.migrations.last().map(|m| m.version)
    }

    /// Iterate migrations in ascending version order.
    pub fn iter(&self) -> std::slice::Iter<'_, Migration> {
        self.migrations.iter()
    }

    /// Number of migrations in the set.
    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// True when the set holds no migrations.
    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

fn duplicate(version: u64, a: &str, b: &str) -> CoreError {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    CoreError::DuplicateVersion {
        version,
        first: first.to_string(),
        second: second.to_string(),
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
