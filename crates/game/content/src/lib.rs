//! Data-driven content for the battle core.
//!
//! This crate turns data files into the read-only inputs of `battle-core`:
//! - Content database (RON): actors, classes, skills, items, equipment,
//!   states, enemies, troops and system catalogues
//! - Battle rules (TOML): [`battle_core::BattleConfig`]
//!
//! Loaded content is handed to the core as [`battle_core::ContentTables`] and
//! never appears in live battle state.

pub mod database;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use database::Database;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, DatabaseLoader, LoadResult};
