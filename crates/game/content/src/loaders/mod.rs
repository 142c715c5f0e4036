//! Content loaders for reading game data from files.
//!
//! The content database is stored as RON and the battle rules as TOML. Every
//! loader returns an [`anyhow::Result`] carrying the offending path or parse
//! position.

pub mod config;
pub mod database;
pub mod factory;

pub use config::ConfigLoader;
pub use database::DatabaseLoader;
pub use factory::ContentFactory;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
