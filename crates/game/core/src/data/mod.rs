//! Static content definitions.
//!
//! Definitions are read-only during battle and reach the core through
//! [`crate::env::ContentOracle`]. Those that contribute traits implement
//! [`crate::traits::TraitSource`].
mod actor;
mod enemy;
mod item;
mod state;
mod system;
mod troop;

pub use actor::{ActorData, ClassData, ExpCurve, Learning};
pub use enemy::{ActionCondition, DropItem, EnemyAction, EnemyData};
pub use item::{ArmorData, ItemData, Occasion, SkillData, WeaponData};
pub use state::{AutoRemovalTiming, Restriction, StateData};
pub use system::SystemData;
pub use troop::{PageConditions, PageSpan, TroopData, TroopMember, TroopPage};
