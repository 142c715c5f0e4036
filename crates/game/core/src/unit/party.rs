//! The player's side: actor registry, formation and shared possessions.

use std::collections::BTreeMap;

use tracing::{debug, info, trace};

use crate::actor::{ActionEvaluator, Actor, EquipError, LevelUp};
use crate::battler::Battler;
use crate::config::{BattleConfig, BattleSystem};
use crate::env::{Env, RandomSource};
use crate::ids::ActorId;
use crate::item::{EquipItem, ItemRef};
use crate::traits::PartyAbilities;

use super::{Inventory, Unit};

/// Base preemptive/surprise chances; the faster side gets the favourable one.
const OPENING_RATE_HIGH: f64 = 0.05;
const OPENING_RATE_LOW: f64 = 0.03;

/// Player party.
///
/// Actors are created on first use and kept in the registry even after they
/// leave the formation, so progress survives a later return.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Party {
    actors: BTreeMap<ActorId, Actor>,
    /// Formation order.
    roster: Vec<ActorId>,
    inventory: Inventory,
    max_battle_members: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    in_battle: bool,
}

impl Party {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            actors: BTreeMap::new(),
            roster: Vec::new(),
            inventory: Inventory::new(),
            max_battle_members: config.max_battle_members,
            in_battle: false,
        }
    }

    /// Replaces the formation with the starting members of the system data.
    pub fn setup_starting_members(&mut self, env: &Env<'_>) {
        self.roster.clear();
        for &actor_id in &env.system().party_members {
            if self.ensure_actor(env, actor_id) {
                self.roster.push(actor_id);
            }
        }
        info!(members = ?self.roster, "starting party set up");
    }

    fn ensure_actor(&mut self, env: &Env<'_>, actor_id: ActorId) -> bool {
        if self.actors.contains_key(&actor_id) {
            return true;
        }
        match Actor::new(env, actor_id) {
            Some(actor) => {
                self.actors.insert(actor_id, actor);
                true
            }
            None => false,
        }
    }

    /// Runs `f` on the registry entry, creating it from its definition on
    /// first access. Equipment released by `f` returns to the inventory.
    pub fn with_actor<R>(
        &mut self,
        env: &Env<'_>,
        actor_id: ActorId,
        f: impl FnOnce(&mut Actor) -> R,
    ) -> Option<R> {
        if !self.ensure_actor(env, actor_id) {
            return None;
        }
        let result = self.actors.get_mut(&actor_id).map(f);
        self.reclaim_released_items(env);
        result
    }

    pub fn actor(&self, actor_id: ActorId) -> Option<&Actor> {
        self.actors.get(&actor_id)
    }

    pub fn roster(&self) -> &[ActorId] {
        &self.roster
    }

    pub fn size(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Appends the actor to the formation; `false` when already present or
    /// undefined.
    pub fn add_actor(&mut self, env: &Env<'_>, actor_id: ActorId) -> bool {
        if self.roster.contains(&actor_id) || !self.ensure_actor(env, actor_id) {
            return false;
        }
        self.roster.push(actor_id);
        debug!(actor = %actor_id, "actor joined the party");
        true
    }

    pub fn remove_actor(&mut self, actor_id: ActorId) -> bool {
        let before = self.roster.len();
        self.roster.retain(|id| *id != actor_id);
        let removed = self.roster.len() != before;
        if removed {
            debug!(actor = %actor_id, "actor left the party");
        }
        removed
    }

    pub fn swap_order(&mut self, a: usize, b: usize) {
        if a < self.roster.len() && b < self.roster.len() {
            self.roster.swap(a, b);
        }
    }

    pub fn all_members(&self) -> Vec<&Actor> {
        self.roster
            .iter()
            .filter_map(|id| self.actors.get(id))
            .collect()
    }

    /// Front formation slots whose actors are not hidden.
    pub fn battle_members(&self) -> Vec<&Actor> {
        self.all_members()
            .into_iter()
            .take(self.max_battle_members)
            .filter(|actor| actor.is_appeared())
            .collect()
    }

    fn battle_member_ids(&self) -> Vec<ActorId> {
        self.battle_members()
            .iter()
            .map(|actor| actor.actor_id())
            .collect()
    }

    fn members_by_id(&mut self, ids: &[ActorId]) -> Vec<&mut Actor> {
        let mut by_id: BTreeMap<ActorId, &mut Actor> =
            self.actors.iter_mut().map(|(id, actor)| (*id, actor)).collect();
        ids.iter().filter_map(|id| by_id.remove(id)).collect()
    }

    pub fn is_battle_member(&self, actor_id: ActorId) -> bool {
        self.battle_member_ids().contains(&actor_id)
    }

    pub fn leader(&self) -> Option<&Actor> {
        self.battle_members().into_iter().next()
    }

    pub fn highest_level(&self) -> i32 {
        self.members()
            .iter()
            .map(|actor| actor.level())
            .max()
            .unwrap_or(0)
    }

    // ===== possessions =====

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn gold(&self) -> i64 {
        self.inventory.gold()
    }

    pub fn gain_gold(&mut self, config: &BattleConfig, amount: i64) {
        self.inventory.gain_gold(config, amount);
    }

    pub fn lose_gold(&mut self, config: &BattleConfig, amount: i64) {
        self.inventory.lose_gold(config, amount);
    }

    pub fn steps(&self) -> u64 {
        self.inventory.steps()
    }

    pub fn increase_steps(&mut self) {
        self.inventory.increase_steps();
    }

    pub fn num_items(&self, item: ItemRef) -> i32 {
        self.inventory.num_items(item)
    }

    /// Held in the inventory, or with `include_equip` worn by a member.
    pub fn has_item(&self, item: ItemRef, include_equip: bool) -> bool {
        if self.inventory.has_item(item) {
            return true;
        }
        include_equip
            && item
                .as_equip()
                .is_some_and(|equip| self.is_any_member_equipped(equip))
    }

    pub fn is_any_member_equipped(&self, item: EquipItem) -> bool {
        self.members().iter().any(|actor| actor.has_equip(item))
    }

    /// Changes the held count, clamped to `[0, max_items]`.
    ///
    /// With `include_equip`, removing more than is held strips the shortfall
    /// from members' equipment.
    pub fn gain_item(&mut self, env: &Env<'_>, item: ItemRef, amount: i32, include_equip: bool) {
        let shortfall = self.inventory.gain(env.config(), item, amount);
        if include_equip && shortfall > 0 {
            if let Some(equip) = item.as_equip() {
                self.discard_members_equip(env, equip, shortfall);
            }
        }
    }

    pub fn lose_item(&mut self, env: &Env<'_>, item: ItemRef, amount: i32, include_equip: bool) {
        self.gain_item(env, item, -amount, include_equip);
    }

    fn discard_members_equip(&mut self, env: &Env<'_>, item: EquipItem, amount: i32) {
        let mut remaining = amount;
        let ids: Vec<ActorId> = self.members().iter().map(|actor| actor.actor_id()).collect();
        for actor in self.members_by_id(&ids) {
            let mut changed = false;
            while remaining > 0 && actor.discard_equip(item) {
                remaining -= 1;
                changed = true;
            }
            if changed {
                debug!(actor = %actor.actor_id(), ?item, "equipped copy discarded");
                actor.refresh(env);
            }
        }
        self.reclaim_released_items(env);
    }

    /// Puts equipment released by member refreshes back into the inventory.
    pub fn reclaim_released_items(&mut self, env: &Env<'_>) {
        for actor in self.actors.values_mut() {
            for item in actor.take_released_items() {
                trace!(actor = %actor.actor_id(), ?item, "released equipment reclaimed");
                self.inventory.gain(env.config(), item.into(), 1);
            }
        }
    }

    /// Equipment change for a registered actor, traded with the party
    /// inventory.
    pub fn change_equip(
        &mut self,
        env: &Env<'_>,
        actor_id: ActorId,
        slot: usize,
        item: Option<EquipItem>,
    ) -> Result<(), EquipError> {
        let actor = self
            .actors
            .get_mut(&actor_id)
            .ok_or(EquipError::UnknownActor { actor: actor_id })?;
        actor.change_equip(env, &mut self.inventory, slot, item)?;
        self.reclaim_released_items(env);
        Ok(())
    }

    pub fn optimize_equipments(&mut self, env: &Env<'_>, actor_id: ActorId) -> Result<(), EquipError> {
        let actor = self
            .actors
            .get_mut(&actor_id)
            .ok_or(EquipError::UnknownActor { actor: actor_id })?;
        actor.optimize_equipments(env, &mut self.inventory);
        self.reclaim_released_items(env);
        Ok(())
    }

    pub fn clear_equipments(&mut self, env: &Env<'_>, actor_id: ActorId) -> Result<(), EquipError> {
        let actor = self
            .actors
            .get_mut(&actor_id)
            .ok_or(EquipError::UnknownActor { actor: actor_id })?;
        actor.clear_equipments(env, &mut self.inventory);
        self.reclaim_released_items(env);
        Ok(())
    }

    /// Uses a skill or item as the given member, paying the cost or
    /// consuming the item from the inventory.
    pub fn use_item(&mut self, env: &Env<'_>, actor_id: ActorId, item: ItemRef) -> bool {
        let Some(actor) = self.actors.get_mut(&actor_id) else {
            return false;
        };
        if !actor.can_use(env, item, Some(&self.inventory)) {
            return false;
        }
        actor.use_item(env, item, Some(&mut self.inventory));
        true
    }

    // ===== battle =====

    /// Builds every member's action slots for the turn.
    pub fn make_actions(
        &mut self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        evaluator: &dyn ActionEvaluator,
    ) {
        for actor in self.members_mut() {
            actor.make_actions(env, rng, evaluator);
        }
    }

    /// Dead battle members come back with 1 hp.
    pub fn revive_battle_members(&mut self, env: &Env<'_>) {
        let ids = self.battle_member_ids();
        for actor in self.members_by_id(&ids) {
            if actor.is_dead(env) {
                actor.set_hp(env, 1);
                debug!(actor = %actor.actor_id(), "battle member revived");
            }
        }
    }

    /// Union of the battle members' party abilities.
    pub fn abilities(&self, env: &Env<'_>) -> PartyAbilities {
        self.battle_members()
            .iter()
            .fold(PartyAbilities::empty(), |acc, actor| acc | actor.party_abilities(env))
    }

    pub fn has_ability(&self, env: &Env<'_>, ability: PartyAbilities) -> bool {
        self.abilities(env).contains(ability)
    }

    /// Chance of a preemptive strike against a troop of the given agility.
    pub fn rate_preemptive(&self, env: &Env<'_>, troop_agility: f64) -> f64 {
        let rate = if self.agility(env) >= troop_agility {
            OPENING_RATE_HIGH
        } else {
            OPENING_RATE_LOW
        };
        if self.has_ability(env, PartyAbilities::RAISE_PREEMPTIVE) {
            rate * 4.0
        } else {
            rate
        }
    }

    /// Chance of being ambushed by a troop of the given agility.
    pub fn rate_surprise(&self, env: &Env<'_>, troop_agility: f64) -> f64 {
        if self.has_ability(env, PartyAbilities::CANCEL_SURPRISE) {
            return 0.0;
        }
        if self.agility(env) >= troop_agility {
            OPENING_RATE_LOW
        } else {
            OPENING_RATE_HIGH
        }
    }

    /// Any member could use the skill or item right now.
    pub fn can_use(&self, env: &Env<'_>, item: ItemRef) -> bool {
        self.members()
            .iter()
            .any(|actor| actor.can_use(env, item, Some(&self.inventory)))
    }

    /// Active time battles always accept input.
    pub fn can_input(&self, env: &Env<'_>) -> bool {
        if env.config().battle_system == BattleSystem::ActiveTpb {
            return true;
        }
        self.members().iter().any(|actor| actor.can_input(env))
    }

    /// Awards experience to the whole formation; reserve members receive
    /// the bench rate.
    pub fn gain_exp(&mut self, env: &Env<'_>, exp: i64) -> Vec<LevelUp> {
        let battle_ids = self.battle_member_ids();
        let ids = self.roster.clone();
        let mut level_ups = Vec::new();
        for actor in self.members_by_id(&ids) {
            let battle_member = battle_ids.contains(&actor.actor_id());
            level_ups.extend(actor.gain_exp(env, exp, battle_member));
        }
        self.reclaim_released_items(env);
        level_ups
    }
}

impl Unit for Party {
    type Member = Actor;

    /// Battle members while in battle, otherwise the whole formation.
    fn members(&self) -> Vec<&Actor> {
        if self.in_battle {
            self.battle_members()
        } else {
            self.all_members()
        }
    }

    fn members_mut(&mut self) -> Vec<&mut Actor> {
        let ids = if self.in_battle {
            self.battle_member_ids()
        } else {
            self.roster.clone()
        };
        self.members_by_id(&ids)
    }

    fn in_battle(&self) -> bool {
        self.in_battle
    }

    fn set_in_battle(&mut self, in_battle: bool) {
        self.in_battle = in_battle;
    }

    /// An empty party outside battle is not considered defeated.
    fn is_all_dead(&self, env: &Env<'_>) -> bool {
        self.alive_members(env).is_empty() && (self.in_battle || !self.is_empty())
    }

    fn on_battle_end(&mut self, env: &Env<'_>) {
        self.set_in_battle(false);
        for actor in self.members_mut() {
            actor.on_battle_end(env);
        }
        self.reclaim_released_items(env);
    }

    fn on_all_actions_end(&mut self, env: &Env<'_>) {
        for actor in self.members_mut() {
            actor.on_all_actions_end(env);
        }
        self.reclaim_released_items(env);
    }

    fn on_turn_end(&mut self, env: &Env<'_>) {
        for actor in self.members_mut() {
            actor.on_turn_end(env);
        }
        self.reclaim_released_items(env);
    }
}
