//! driftmoney-core - Core library for DriftMoney
//!
//! This crate contains the local-first persistence layer shared by every
//! DriftMoney client: the entity models, the on-device `SQLite` store with its
//! forward-only migrations, and the repositories that track dirty records and
//! merge remote writes with last-write-wins.

pub mod db;
pub mod error;
pub mod models;
pub mod util;

pub use db::{Database, MergeOutcome, Repository};
pub use error::{Error, Result};
pub use models::SyncStatus;
