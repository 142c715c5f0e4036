//! Content factory for loading a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, ContentTables};

use crate::loaders::{ConfigLoader, DatabaseLoader, LoadResult};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── database.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle rules from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load and validate the content database from `database.ron`.
    pub fn load_database(&self) -> LoadResult<ContentTables> {
        let path = self.data_dir.join("database.ron");
        DatabaseLoader::load(&path)
    }

    /// Load both files. Pass the results to [`battle_core::Env::new`].
    pub fn load_all(&self) -> LoadResult<(ContentTables, BattleConfig)> {
        Ok((self.load_database()?, self.load_config()?))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
