use crate::ids::StateId;
use crate::traits::{Trait, TraitSource};

/// How strongly a state constrains its bearer. Ordered from least to most.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Restriction {
    #[default]
    None = 0,
    /// Confused: attacks an enemy at random.
    AttackEnemy = 1,
    /// Confused: attacks anyone at random.
    AttackAnyone = 2,
    /// Confused: attacks an ally at random.
    AttackAlly = 3,
    /// Cannot act at all.
    CannotMove = 4,
}

impl Restriction {
    pub const fn level(self) -> u8 {
        self as u8
    }

    pub const fn is_confusion(self) -> bool {
        matches!(self, Self::AttackEnemy | Self::AttackAnyone | Self::AttackAlly)
    }
}

/// When an expired state is removed automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutoRemovalTiming {
    /// Never expires by turn.
    #[default]
    None,
    ActionEnd,
    TurnEnd,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StateData {
    pub id: StateId,
    pub name: String,
    pub icon_index: u32,
    /// Higher priority states sort first.
    pub priority: i32,
    pub restriction: Restriction,
    pub auto_removal_timing: AutoRemovalTiming,
    pub min_turns: i32,
    pub max_turns: i32,
    pub remove_at_battle_end: bool,
    pub remove_by_restriction: bool,
    pub remove_by_damage: bool,
    /// Percent chance of removal per damage instance.
    pub chance_by_damage: u32,
    pub traits: Vec<Trait>,
}

impl StateData {
    /// Whether the state carries a turn timer.
    pub fn expires_by_turn(&self) -> bool {
        self.auto_removal_timing != AutoRemovalTiming::None
    }
}

impl TraitSource for StateData {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
}
