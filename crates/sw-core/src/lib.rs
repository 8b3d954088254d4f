//! sw-core - Core library for Stepwise
//!
//! This crate provides migration discovery and validation, the transaction
//! policy, configuration parsing, and shared error types used across all
//! Stepwise components. It never touches a database.

pub mod config;
pub mod error;
pub mod migration;
pub mod policy;
pub mod state_table;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use migration::{parse_migration_name, Migration, MigrationSet};
pub use policy::{Engine, TransactionPolicy, TxMode};
pub use state_table::StateTable;
