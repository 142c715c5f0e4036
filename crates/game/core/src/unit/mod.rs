//! Battle sides: the player's [`Party`] and the hostile [`Troop`].
//!
//! [`Unit::members`] is the only membership query an implementor provides.
//! Every aggregate (alive members, agility, target rate sum) is recomputed
//! from it on each call. Member lookups return indices into `members()` so
//! callers can mutate the chosen battler afterwards.
mod inventory;
mod party;
mod troop;

pub use inventory::Inventory;
pub use party::Party;
pub use troop::Troop;

use tracing::trace;

use crate::battler::{Battler, TpbClock};
use crate::env::{Env, RandomSource};

pub trait Unit {
    type Member: Battler;

    /// Current members in formation order.
    fn members(&self) -> Vec<&Self::Member>;
    fn members_mut(&mut self) -> Vec<&mut Self::Member>;

    fn in_battle(&self) -> bool;
    fn set_in_battle(&mut self, in_battle: bool);

    fn alive_members(&self, env: &Env<'_>) -> Vec<&Self::Member> {
        self.members()
            .into_iter()
            .filter(|member| member.is_alive(env))
            .collect()
    }

    fn dead_members(&self, env: &Env<'_>) -> Vec<&Self::Member> {
        self.members()
            .into_iter()
            .filter(|member| member.is_dead(env))
            .collect()
    }

    fn movable_members(&self, env: &Env<'_>) -> Vec<&Self::Member> {
        self.members()
            .into_iter()
            .filter(|member| member.can_move(env))
            .collect()
    }

    /// Average agility of all members, at least 1.
    fn agility(&self, env: &Env<'_>) -> f64 {
        let members = self.members();
        if members.is_empty() {
            return 1.0;
        }
        let sum: f64 = members.iter().map(|member| f64::from(member.agi(env))).sum();
        (sum / members.len() as f64).max(1.0)
    }

    /// Sum of the alive members' target rates.
    fn tgr_sum(&self, env: &Env<'_>) -> f64 {
        self.alive_members(env).iter().map(|member| member.tgr(env)).sum()
    }

    /// Draws an alive member weighted by target rate. Rounding leftovers fall
    /// to the last alive member.
    fn random_target(&self, env: &Env<'_>, rng: &mut dyn RandomSource) -> Option<usize> {
        let mut remaining = rng.next_f64() * self.tgr_sum(env);
        let alive: Vec<(usize, f64)> = self
            .members()
            .into_iter()
            .enumerate()
            .filter(|(_, member)| member.is_alive(env))
            .map(|(index, member)| (index, member.tgr(env)))
            .collect();
        let target = alive
            .iter()
            .find(|(_, tgr)| {
                remaining -= tgr;
                remaining <= 0.0
            })
            .or_else(|| alive.last())
            .map(|(index, _)| *index);
        trace!(?target, "random target drawn");
        target
    }

    /// Uniform draw among dead members.
    fn random_dead_target(&self, env: &Env<'_>, rng: &mut dyn RandomSource) -> Option<usize> {
        let dead: Vec<usize> = self
            .members()
            .into_iter()
            .enumerate()
            .filter(|(_, member)| member.is_dead(env))
            .map(|(index, _)| index)
            .collect();
        if dead.is_empty() {
            return None;
        }
        let len = u32::try_from(dead.len()).unwrap_or(u32::MAX);
        dead.get(rng.random_int(len) as usize).copied()
    }

    /// `index` if that member is alive, else the first alive member.
    ///
    /// `None` only when nobody is alive; check [`Unit::is_all_dead`] first.
    fn smooth_target(&self, env: &Env<'_>, index: usize) -> Option<usize> {
        let members = self.members();
        if members.get(index).is_some_and(|member| member.is_alive(env)) {
            return Some(index);
        }
        members.iter().position(|member| member.is_alive(env))
    }

    fn smooth_dead_target(&self, env: &Env<'_>, index: usize) -> Option<usize> {
        let members = self.members();
        if members.get(index).is_some_and(|member| member.is_dead(env)) {
            return Some(index);
        }
        members.iter().position(|member| member.is_dead(env))
    }

    fn is_all_dead(&self, env: &Env<'_>) -> bool {
        self.alive_members(env).is_empty()
    }

    /// First member able to cover for a dying ally.
    fn substitute_battler(&self, env: &Env<'_>) -> Option<usize> {
        self.members()
            .iter()
            .position(|member| member.is_substitute(env))
    }

    /// Fastest unbuffed gauge speed among members.
    fn tpb_base_speed(&self, env: &Env<'_>) -> f64 {
        self.members()
            .iter()
            .map(|member| member.tpb_base_speed(env))
            .fold(0.0, f64::max)
    }

    /// Gauge clock shared by both sides; built from the party.
    fn tpb_clock(&self, env: &Env<'_>) -> TpbClock {
        TpbClock::new(self.tpb_base_speed(env), env.config().tpb_reference_time())
    }

    // ===== fan-outs =====

    /// Prepares every member, then enters battle.
    fn on_battle_start(
        &mut self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        advantageous: bool,
        clock: &TpbClock,
    ) {
        for member in self.members_mut() {
            member.on_battle_start(env, rng, advantageous, clock);
        }
        self.set_in_battle(true);
    }

    /// Leaves battle, then cleans up every member.
    fn on_battle_end(&mut self, env: &Env<'_>) {
        self.set_in_battle(false);
        for member in self.members_mut() {
            member.on_battle_end(env);
        }
    }

    fn on_all_actions_end(&mut self, env: &Env<'_>) {
        for member in self.members_mut() {
            member.on_all_actions_end(env);
        }
    }

    /// Turn-end upkeep for every member: regeneration, state and buff timers.
    fn on_turn_end(&mut self, env: &Env<'_>) {
        for member in self.members_mut() {
            member.on_turn_end(env);
        }
    }

    fn clear_actions(&mut self) {
        for member in self.members_mut() {
            member.clear_actions();
        }
    }

    fn clear_results(&mut self) {
        for member in self.members_mut() {
            member.clear_result();
        }
    }

    /// Selects the member at `index` and deselects everyone else.
    fn select(&mut self, index: usize) {
        for (i, member) in self.members_mut().into_iter().enumerate() {
            if i == index {
                member.select();
            } else {
                member.deselect();
            }
        }
    }

    fn deselect_all(&mut self) {
        for member in self.members_mut() {
            member.deselect();
        }
    }

    fn make_speeds(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource) {
        for member in self.members_mut() {
            member.make_speed(env, rng);
        }
    }

    fn update_tpb(&mut self, env: &Env<'_>, clock: &TpbClock) {
        for member in self.members_mut() {
            member.update_tpb(env, clock);
        }
    }
}
