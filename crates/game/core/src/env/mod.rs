//! Explicit context handed to every combat operation.
//!
//! The content oracle exposes static definitions, [`BattleConfig`] the rule
//! constants. [`Env`] bundles both together with the current battle flag so
//! the core never reaches for process-wide state.
mod content;
mod rng;
mod tables;

pub use content::ContentOracle;
pub use rng::{GameRng, RandomSource};
pub use tables::{ContentError, ContentTables, ContentTablesBuilder};

use crate::config::BattleConfig;
use crate::data::{StateData, SystemData};
use crate::ids::StateId;

/// Read-only context for battler and roster operations.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    content: &'a dyn ContentOracle,
    config: &'a BattleConfig,
    in_battle: bool,
}

impl<'a> Env<'a> {
    pub fn new(content: &'a dyn ContentOracle, config: &'a BattleConfig) -> Self {
        Self {
            content,
            config,
            in_battle: false,
        }
    }

    /// Returns a copy flagged as in (or out of) battle.
    ///
    /// The flag mirrors the party's battle state; the driver rebuilds the
    /// environment when a battle starts or ends.
    #[must_use]
    pub fn with_in_battle(mut self, in_battle: bool) -> Self {
        self.in_battle = in_battle;
        self
    }

    pub fn content(&self) -> &'a dyn ContentOracle {
        self.content
    }

    pub fn config(&self) -> &'a BattleConfig {
        self.config
    }

    pub fn in_battle(&self) -> bool {
        self.in_battle
    }

    pub fn system(&self) -> &'a SystemData {
        self.content.system()
    }

    pub fn state(&self, id: StateId) -> Option<&'a StateData> {
        self.content.state(id)
    }

    pub fn death_state_id(&self) -> StateId {
        self.config.death_state_id
    }
}

impl std::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("config", self.config)
            .field("in_battle", &self.in_battle)
            .finish_non_exhaustive()
    }
}
