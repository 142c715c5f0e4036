//! Content database loader.

use std::path::Path;

use battle_core::ContentTables;
use tracing::info;

use crate::database::Database;
use crate::loaders::{LoadResult, read_file};

/// Loader for the content database from a single RON document.
///
/// # File Format
///
/// ```text
/// (
///     system: (party_members: [1]),
///     classes: [(id: 1, name: "Warrior", ...)],
///     actors: [(id: 1, name: "Hero", class_id: 1, ...)],
///     skills: [...],
///     enemies: [...],
///     troops: [...],
/// )
/// ```
///
/// Every table is optional. Cross references are checked when the tables are
/// built, so a loaded database never points at a missing definition.
pub struct DatabaseLoader;

impl DatabaseLoader {
    /// Load and validate a database file.
    pub fn load(path: &Path) -> LoadResult<ContentTables> {
        let content = read_file(path)?;
        let tables = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid content database {}: {}", path.display(), e))?;
        Ok(tables)
    }

    /// Parse and validate database text.
    pub fn parse(content: &str) -> LoadResult<ContentTables> {
        let database = Self::parse_raw(content)?;
        let definitions = database.len();
        let tables = database
            .into_tables()
            .map_err(|e| anyhow::anyhow!("Failed to build content tables: {}", e))?;
        info!(definitions, "content database loaded");
        Ok(tables)
    }

    /// Parse database text without validating cross references.
    pub fn parse_raw(content: &str) -> LoadResult<Database> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse database RON: {}", e))
    }
}
