//! sw-runner - Migration engine for Stepwise
//!
//! Owns the persisted `(version, dirty)` state record and the apply
//! algorithm that advances it through pending migrations.

pub mod apply;
pub mod error;
pub mod state;

pub use apply::{ApplyMode, ApplyReport, Migrator};
pub use error::{RunnerError, RunnerResult};
pub use state::{State, StateStore};
