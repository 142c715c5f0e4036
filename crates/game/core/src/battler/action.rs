//! Queued battle actions and the per-battler input state.

use crate::config::BattleConfig;
use crate::env::Env;
use crate::ids::{ItemId, SkillId};
use crate::item::ItemRef;

/// Where a battler stands in the command/execute cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActionState {
    /// Waiting for the player to enter commands.
    #[default]
    Undecided,
    Inputting,
    /// Commands decided, waiting for the execute phase.
    Waiting,
    Acting,
}

/// One queued action slot.
///
/// An empty slot (`item == None`) is a placeholder created by
/// `make_actions` and filled later by input or AI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BattleAction {
    item: Option<ItemRef>,
    /// Remembered target; `None` means "pick at execution time".
    target_index: Option<usize>,
    /// Forced by an event rather than chosen by the battler.
    forcing: bool,
    /// Attack chosen by a confusion restriction.
    confused: bool,
}

impl BattleAction {
    pub const fn empty() -> Self {
        Self {
            item: None,
            target_index: None,
            forcing: false,
            confused: false,
        }
    }

    pub const fn skill(skill_id: SkillId) -> Self {
        Self {
            item: Some(ItemRef::Skill(skill_id)),
            ..Self::empty()
        }
    }

    pub const fn item(item_id: ItemId) -> Self {
        Self {
            item: Some(ItemRef::Item(item_id)),
            ..Self::empty()
        }
    }

    pub fn attack(attack_skill_id: SkillId) -> Self {
        Self::skill(attack_skill_id)
    }

    pub fn guard(config: &BattleConfig) -> Self {
        Self::skill(config.guard_skill_id)
    }

    /// Attack against a target picked by the confusion level.
    pub fn confused_attack(attack_skill_id: SkillId) -> Self {
        Self {
            confused: true,
            ..Self::attack(attack_skill_id)
        }
    }

    #[must_use]
    pub const fn with_target(mut self, index: usize) -> Self {
        self.target_index = Some(index);
        self
    }

    #[must_use]
    pub const fn forced(mut self) -> Self {
        self.forcing = true;
        self
    }

    pub const fn item_ref(&self) -> Option<ItemRef> {
        self.item
    }

    pub fn set_item(&mut self, item: ItemRef) {
        self.item = Some(item);
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    pub const fn target_index(&self) -> Option<usize> {
        self.target_index
    }

    pub fn set_target(&mut self, index: usize) {
        self.target_index = Some(index);
    }

    pub const fn is_empty(&self) -> bool {
        self.item.is_none()
    }

    pub const fn is_forcing(&self) -> bool {
        self.forcing
    }

    pub const fn is_confused(&self) -> bool {
        self.confused
    }

    pub fn is_skill(&self) -> bool {
        self.item.is_some_and(ItemRef::is_skill)
    }

    pub fn is_item(&self) -> bool {
        self.item.is_some_and(ItemRef::is_item)
    }

    pub fn is_attack_with(&self, attack_skill_id: SkillId) -> bool {
        self.item == Some(ItemRef::Skill(attack_skill_id))
    }

    pub fn is_guard(&self, env: &Env<'_>) -> bool {
        self.item == Some(ItemRef::Skill(env.config().guard_skill_id))
    }

    /// Initiative modifier of the queued skill or item.
    pub fn item_speed(&self, env: &Env<'_>) -> i32 {
        self.item
            .and_then(|item| item.resolve(env.content()))
            .map_or(0, |object| object.speed())
    }
}
