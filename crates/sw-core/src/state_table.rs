//! Strongly-typed state table name.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Name of the table holding the `(version, dirty)` record, optionally
/// schema-qualified like "schema.table".
///
/// The name is interpolated directly into SQL, so construction only accepts
/// one or two dot-separated identifiers of `[A-Za-z_][A-Za-z0-9_]*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateTable(String);

impl StateTable {
    /// Validate and wrap a state table name.
    pub fn new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
            return Err(CoreError::InvalidTableName { name });
        }
        Ok(Self(name))
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for StateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateTable {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for StateTable {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl FromStr for StateTable {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for StateTable {
    type Error = CoreError;

    fn try_from(s: String) -> CoreResult<Self> {
        Self::new(s)
    }
}

impl From<StateTable> for String {
    fn from(t: StateTable) -> Self {
        t.0
    }
}

impl PartialEq<&str> for StateTable {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        let t = StateTable::new("stepwise_state").unwrap();
        assert_eq!(t.as_str(), "stepwise_state");
    }

    #[test]
    fn test_schema_qualified() {
        let t = StateTable::new("ops.stepwise_state").unwrap();
        assert_eq!(t, "ops.stepwise_state");
    }

    #[test]
    fn test_display() {
        let t = StateTable::new("_state2").unwrap();
        assert_eq!(format!("{}", t), "_state2");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            StateTable::new(""),
            Err(CoreError::InvalidTableName { .. })
        ));
    }

    #[test]
    fn test_rejects_injection() {
        assert!(StateTable::new("state; DROP TABLE users").is_err());
        assert!(StateTable::new("state--").is_err());
        assert!(StateTable::new("\"quoted\"").is_err());
    }

    #[test]
    fn test_rejects_bad_qualification() {
        assert!(StateTable::new("a.b.c").is_err());
        assert!(StateTable::new(".state").is_err());
        assert!(StateTable::new("ops.").is_err());
        assert!(StateTable::new("1state").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let t: StateTable = serde_json::from_str(r#""ops.state""#).unwrap();
        assert_eq!(t, "ops.state");
        assert!(serde_json::from_str::<StateTable>(r#""bad name""#).is_err());
        assert_eq!(serde_json::to_string(&t).unwrap(), r#""ops.state""#);
    }

    #[test]
    fn test_from_str() {
        let t: StateTable = "state".parse().unwrap();
        assert_eq!(&*t, "state");
    }
}
