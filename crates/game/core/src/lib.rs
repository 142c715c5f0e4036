//! Combat rules for a turn-based RPG: combatants, traits and rosters.
//!
//! `battle-core` owns the live state of every combatant and answers the
//! questions a battle driver asks: what are this battler's stats, may it act,
//! which action does it take, whom does it target. Static definitions arrive
//! through [`env::ContentOracle`] and rule constants through
//! [`config::BattleConfig`], both bundled in an [`Env`] that is passed to
//! every operation. Randomness is drawn from a caller-supplied
//! [`env::RandomSource`].
//!
//! Stats are never stored: they are folded on demand from the battler's
//! [`traits::TraitSet`] (definition, class, equipment and states).
pub mod actor;
pub mod battler;
pub mod config;
pub mod data;
pub mod enemy;
pub mod env;
pub mod error;
pub mod ids;
pub mod item;
pub mod stats;
pub mod switches;
pub mod traits;
pub mod unit;

pub use actor::{ActionEvaluator, Actor, EquipError, LevelUp};
pub use battler::{
    ActionState, BattleAction, Battler, BattlerCore, BattlerResult, TpbClock, TpbGauge, TpbState,
};
pub use config::{BattleConfig, BattleSystem, LetterTable};
pub use enemy::{AiContext, Enemy};
pub use env::{
    ContentError, ContentOracle, ContentTables, ContentTablesBuilder, Env, GameRng, RandomSource,
};
pub use error::{ErrorSeverity, GameError};
pub use ids::{
    ActorId, ArmorId, ClassId, EnemyId, ItemId, SkillId, StateId, SwitchId, TroopId, WeaponId,
};
pub use item::{EquipItem, ItemRef};
pub use stats::{BuffTable, ParamId, SParamId, XParamId};
pub use switches::Switches;
pub use traits::{PartyAbilities, SpecialFlags, Trait, TraitCode, TraitSet, TraitSource};
pub use unit::{Inventory, Party, Troop, Unit};
