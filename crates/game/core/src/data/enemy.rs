use crate::config::BattleConfig;
use crate::ids::{EnemyId, SkillId, StateId, SwitchId};
use crate::item::ItemRef;
use crate::stats::ParamId;
use crate::traits::{Trait, TraitSource};

/// Trigger that must hold before an enemy action is considered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionCondition {
    #[default]
    Always,
    /// Turn `a + b·k` for k ≥ 0; with `b == 0` exactly turn `a`.
    Turn { a: u32, b: u32 },
    /// Own hp rate within `[min, max]` (0.0–1.0).
    Hp { min: f64, max: f64 },
    /// Own mp rate within `[min, max]` (0.0–1.0).
    Mp { min: f64, max: f64 },
    State(StateId),
    /// Opposing party's highest level is at least this value.
    PartyLevel(i32),
    Switch(SwitchId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAction {
    pub skill_id: SkillId,
    /// Preference from 1 to 9.
    pub rating: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: ActionCondition,
}

impl EnemyAction {
    pub const fn new(skill_id: SkillId, rating: u32) -> Self {
        Self {
            skill_id,
            rating,
            condition: ActionCondition::Always,
        }
    }

    pub const fn when(mut self, condition: ActionCondition) -> Self {
        self.condition = condition;
        self
    }
}

/// Reward dropped with probability `1 / denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropItem {
    pub item: ItemRef,
    pub denominator: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemyData {
    pub id: EnemyId,
    pub name: String,
    pub battler_name: String,
    pub params: [i32; BattleConfig::PARAM_COUNT],
    pub exp: i64,
    pub gold: i64,
    pub drop_items: Vec<DropItem>,
    /// Candidate actions in definition order; order breaks selection ties.
    pub actions: Vec<EnemyAction>,
    pub traits: Vec<Trait>,
}

impl EnemyData {
    pub fn param(&self, param: ParamId) -> i32 {
        self.params[param.index()]
    }
}

impl TraitSource for EnemyData {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
}
