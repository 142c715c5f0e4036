//! Shared combatant behaviour.
//!
//! [`Battler`] is implemented by [`crate::actor::Actor`] and
//! [`crate::enemy::Enemy`]. Implementors supply their mutable
//! [`BattlerCore`], their parameter base values and the list of trait
//! sources currently applying to them; everything else (derived stats, the
//! restriction state machine, state and buff lifecycles, skill eligibility,
//! regeneration, action slots and the time progress gauge) is provided here.
//!
//! Derived queries never mutate. Mutating operations keep the core invariants:
//! after [`Battler::refresh`] hp, mp and tp are within their maxima and no
//! resisted state remains active.
mod action;
mod base;
mod result;
mod tpb;

pub use action::{ActionState, BattleAction};
pub use base::{ActionQueue, BattlerCore};
pub use result::BattlerResult;
pub use tpb::{TpbClock, TpbGauge, TpbState};

use std::collections::BTreeSet;

use tracing::{debug, trace, warn};

use crate::data::{AutoRemovalTiming, Occasion, Restriction, SkillData, StateData};
use crate::env::{Env, RandomSource};
use crate::ids::{ArmorTypeId, ElementId, EquipTypeId, SkillId, SkillTypeId, StateId, WeaponTypeId};
use crate::item::{EquipItem, EquipObject, ItemRef};
use crate::stats::{ParamId, SParamId, XParamId};
use crate::traits::{PartyAbilities, SpecialFlags, TraitCode, TraitSet};
use crate::unit::Inventory;

/// A combatant on either side of a battle.
pub trait Battler {
    // ========================================================================
    // Required
    // ========================================================================

    fn core(&self) -> &BattlerCore;
    fn core_mut(&mut self) -> &mut BattlerCore;
    fn is_actor(&self) -> bool;

    /// Display name.
    fn name(&self, env: &Env<'_>) -> String;

    /// Trait sources currently applying to this battler.
    fn trait_sources<'e>(&self, env: &Env<'e>) -> TraitSet<'e>;

    /// Parameter value before bonuses and rates.
    fn param_base(&self, env: &Env<'_>, param: ParamId) -> i32;

    // ========================================================================
    // Overridable hooks
    // ========================================================================

    /// Flat bonus added to the base value (equipment adds to this for actors).
    fn param_plus(&self, env: &Env<'_>, param: ParamId) -> i32 {
        let _ = env;
        self.core().param_plus(param)
    }

    fn attack_elements(&self, env: &Env<'_>) -> BTreeSet<ElementId> {
        self.trait_sources(env).set(TraitCode::AttackElement)
    }

    /// Whether the skill's weapon-type requirement is met.
    fn is_skill_wtype_ok(&self, env: &Env<'_>, skill: &SkillData) -> bool {
        let _ = (env, skill);
        true
    }

    /// Re-establishes the resource and resistance invariants.
    fn refresh(&mut self, env: &Env<'_>) {
        self.refresh_base(env);
    }

    /// Called when the battler's restriction rises above "none".
    fn on_restrict(&mut self, env: &Env<'_>) {
        self.clear_tpb_charge_time();
        self.clear_actions();
        let removable: Vec<StateId> = self
            .states(env)
            .into_iter()
            .filter(|s| s.remove_by_restriction)
            .map(|s| s.id)
            .collect();
        for id in removable {
            self.remove_state(env, id);
        }
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    fn param_min(&self, param: ParamId) -> i32 {
        param.min_value()
    }

    fn param_max(&self, param: ParamId) -> i32 {
        let _ = param;
        i32::MAX
    }

    fn param_rate(&self, env: &Env<'_>, param: ParamId) -> f64 {
        self.trait_sources(env)
            .product(TraitCode::Param, param.index() as u32)
    }

    fn param_buff_rate(&self, param: ParamId) -> f64 {
        self.core().buffs.rate(param)
    }

    /// Base plus flat bonus, floored at zero.
    fn param_base_plus(&self, env: &Env<'_>, param: ParamId) -> i32 {
        (self.param_base(env, param) + self.param_plus(env, param)).max(0)
    }

    /// `round(clamp(base_plus × rate × buff_rate, min, max))`.
    fn param(&self, env: &Env<'_>, param: ParamId) -> i32 {
        let value = f64::from(self.param_base_plus(env, param))
            * self.param_rate(env, param)
            * self.param_buff_rate(param);
        let min = f64::from(self.param_min(param));
        let max = f64::from(self.param_max(param));
        value.clamp(min, max).round() as i32
    }

    fn xparam(&self, env: &Env<'_>, id: XParamId) -> f64 {
        self.trait_sources(env).sum(TraitCode::XParam, id.data_id())
    }

    fn sparam(&self, env: &Env<'_>, id: SParamId) -> f64 {
        self.trait_sources(env).product(TraitCode::SParam, id.data_id())
    }

    fn mhp(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Mhp)
    }

    fn mmp(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Mmp)
    }

    fn atk(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Atk)
    }

    fn def(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Def)
    }

    fn mat(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Mat)
    }

    fn mdf(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Mdf)
    }

    fn agi(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Agi)
    }

    fn luk(&self, env: &Env<'_>) -> i32 {
        self.param(env, ParamId::Luk)
    }

    fn hit(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Hit)
    }

    fn eva(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Eva)
    }

    fn cri(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Cri)
    }

    fn cev(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Cev)
    }

    fn mev(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Mev)
    }

    fn mrf(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Mrf)
    }

    fn cnt(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Cnt)
    }

    fn hrg(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Hrg)
    }

    fn mrg(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Mrg)
    }

    fn trg(&self, env: &Env<'_>) -> f64 {
        self.xparam(env, XParamId::Trg)
    }

    fn tgr(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Tgr)
    }

    fn grd(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Grd)
    }

    fn rec(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Rec)
    }

    fn pha(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Pha)
    }

    fn mcr(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Mcr)
    }

    fn tcr(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Tcr)
    }

    fn pdr(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Pdr)
    }

    fn mdr(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Mdr)
    }

    fn fdr(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Fdr)
    }

    fn exr(&self, env: &Env<'_>) -> f64 {
        self.sparam(env, SParamId::Exr)
    }

    // ========================================================================
    // Trait queries
    // ========================================================================

    fn element_rate(&self, env: &Env<'_>, element: ElementId) -> f64 {
        self.trait_sources(env).product(TraitCode::ElementRate, element)
    }

    fn debuff_rate(&self, env: &Env<'_>, param: ParamId) -> f64 {
        self.trait_sources(env)
            .product(TraitCode::DebuffRate, param.index() as u32)
    }

    fn state_rate(&self, env: &Env<'_>, state: StateId) -> f64 {
        self.trait_sources(env)
            .product(TraitCode::StateRate, state.get())
    }

    fn state_resist_set(&self, env: &Env<'_>) -> BTreeSet<StateId> {
        self.trait_sources(env)
            .set(TraitCode::StateResist)
            .into_iter()
            .map(StateId)
            .collect()
    }

    fn is_state_resist(&self, env: &Env<'_>, state: StateId) -> bool {
        self.trait_sources(env)
            .any(TraitCode::StateResist, state.get())
    }

    fn attack_states(&self, env: &Env<'_>) -> BTreeSet<StateId> {
        self.trait_sources(env)
            .set(TraitCode::AttackState)
            .into_iter()
            .map(StateId)
            .collect()
    }

    /// Chance that a normal attack inflicts `state`.
    fn attack_states_rate(&self, env: &Env<'_>, state: StateId) -> f64 {
        self.trait_sources(env)
            .sum(TraitCode::AttackState, state.get())
    }

    fn attack_speed(&self, env: &Env<'_>) -> f64 {
        self.trait_sources(env).sum_all(TraitCode::AttackSpeed)
    }

    fn attack_times_add(&self, env: &Env<'_>) -> i32 {
        self.trait_sources(env)
            .sum_all(TraitCode::AttackTimes)
            .max(0.0) as i32
    }

    fn attack_skill_id(&self, env: &Env<'_>) -> SkillId {
        self.trait_sources(env)
            .max(TraitCode::AttackSkill)
            .map_or(env.config().attack_skill_id, SkillId)
    }

    fn added_skill_types(&self, env: &Env<'_>) -> BTreeSet<SkillTypeId> {
        self.trait_sources(env).set(TraitCode::SkillTypeAdd)
    }

    fn is_skill_type_sealed(&self, env: &Env<'_>, stype: SkillTypeId) -> bool {
        self.trait_sources(env).any(TraitCode::SkillTypeSeal, stype)
    }

    fn added_skills(&self, env: &Env<'_>) -> BTreeSet<SkillId> {
        self.trait_sources(env)
            .set(TraitCode::SkillAdd)
            .into_iter()
            .map(SkillId)
            .collect()
    }

    fn is_skill_sealed(&self, env: &Env<'_>, skill: SkillId) -> bool {
        self.trait_sources(env).any(TraitCode::SkillSeal, skill.get())
    }

    fn is_equip_wtype_ok(&self, env: &Env<'_>, wtype: WeaponTypeId) -> bool {
        self.trait_sources(env).any(TraitCode::EquipWeaponType, wtype)
    }

    fn is_equip_atype_ok(&self, env: &Env<'_>, atype: ArmorTypeId) -> bool {
        self.trait_sources(env).any(TraitCode::EquipArmorType, atype)
    }

    fn is_equip_type_locked(&self, env: &Env<'_>, etype: EquipTypeId) -> bool {
        self.trait_sources(env).any(TraitCode::EquipLock, etype)
    }

    fn is_equip_type_sealed(&self, env: &Env<'_>, etype: EquipTypeId) -> bool {
        self.trait_sources(env).any(TraitCode::EquipSeal, etype)
    }

    fn slot_type(&self, env: &Env<'_>) -> u32 {
        self.trait_sources(env).max(TraitCode::SlotType).unwrap_or(0)
    }

    fn is_dual_wield(&self, env: &Env<'_>) -> bool {
        self.slot_type(env) == 1
    }

    /// Probabilities of each extra action.
    fn action_plus_set(&self, env: &Env<'_>) -> Vec<f64> {
        self.trait_sources(env).values(TraitCode::ActionPlus)
    }

    fn special_flags(&self, env: &Env<'_>) -> SpecialFlags {
        self.trait_sources(env).special_flags()
    }

    fn collapse_type(&self, env: &Env<'_>) -> u32 {
        self.trait_sources(env).max(TraitCode::CollapseType).unwrap_or(0)
    }

    fn party_abilities(&self, env: &Env<'_>) -> PartyAbilities {
        self.trait_sources(env).party_abilities()
    }

    fn is_auto_battle(&self, env: &Env<'_>) -> bool {
        self.special_flags(env).contains(SpecialFlags::AUTO_BATTLE)
    }

    fn is_guard(&self, env: &Env<'_>) -> bool {
        self.special_flags(env).contains(SpecialFlags::GUARD) && self.can_move(env)
    }

    fn is_substitute(&self, env: &Env<'_>) -> bool {
        self.special_flags(env).contains(SpecialFlags::SUBSTITUTE) && self.can_move(env)
    }

    fn is_preserve_tp(&self, env: &Env<'_>) -> bool {
        self.special_flags(env).contains(SpecialFlags::PRESERVE_TP)
    }

    // ========================================================================
    // Resources
    // ========================================================================

    fn hp(&self) -> i32 {
        self.core().hp
    }

    fn mp(&self) -> i32 {
        self.core().mp
    }

    fn tp(&self) -> i32 {
        self.core().tp
    }

    fn max_tp(&self, env: &Env<'_>) -> i32 {
        env.config().max_tp.max(0)
    }

    fn hp_rate(&self, env: &Env<'_>) -> f64 {
        f64::from(self.hp()) / f64::from(self.mhp(env))
    }

    fn mp_rate(&self, env: &Env<'_>) -> f64 {
        let mmp = self.mmp(env);
        if mmp > 0 {
            f64::from(self.mp()) / f64::from(mmp)
        } else {
            0.0
        }
    }

    fn tp_rate(&self, env: &Env<'_>) -> f64 {
        let max_tp = self.max_tp(env);
        if max_tp > 0 {
            f64::from(self.tp()) / f64::from(max_tp)
        } else {
            0.0
        }
    }

    fn set_hp(&mut self, env: &Env<'_>, hp: i32) {
        self.core_mut().hp = hp;
        self.refresh(env);
    }

    fn set_mp(&mut self, env: &Env<'_>, mp: i32) {
        self.core_mut().mp = mp;
        self.refresh(env);
    }

    fn set_tp(&mut self, env: &Env<'_>, tp: i32) {
        self.core_mut().tp = tp;
        self.refresh(env);
    }

    fn gain_hp(&mut self, env: &Env<'_>, value: i32) {
        let result = &mut self.core_mut().result;
        result.hp_damage = -value;
        result.hp_affected = true;
        let hp = self.hp().saturating_add(value);
        self.set_hp(env, hp);
    }

    fn gain_mp(&mut self, env: &Env<'_>, value: i32) {
        self.core_mut().result.mp_damage = -value;
        let mp = self.mp().saturating_add(value);
        self.set_mp(env, mp);
    }

    fn gain_tp(&mut self, env: &Env<'_>, value: i32) {
        self.core_mut().result.tp_damage = -value;
        let tp = self.tp().saturating_add(value);
        self.set_tp(env, tp);
    }

    /// TP gain that is not reported in the action result.
    fn gain_silent_tp(&mut self, env: &Env<'_>, value: i32) {
        let tp = self.tp().saturating_add(value);
        self.set_tp(env, tp);
    }

    fn init_tp(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource) {
        let tp = rng.random_int(25) as i32;
        self.set_tp(env, tp);
    }

    fn clear_tp(&mut self, env: &Env<'_>) {
        self.set_tp(env, 0);
    }

    /// TP charged when taking damage worth `damage_rate` of max hp.
    fn charge_tp_by_damage(&mut self, env: &Env<'_>, damage_rate: f64) {
        let value = (50.0 * damage_rate * self.tcr(env)).floor() as i32;
        self.gain_silent_tp(env, value);
    }

    /// Largest slip damage that may be taken this turn.
    fn max_slip_damage(&self, env: &Env<'_>) -> i32 {
        if env.config().slip_death {
            self.hp()
        } else {
            (self.hp() - 1).max(0)
        }
    }

    fn regenerate_hp(&mut self, env: &Env<'_>) {
        let min_recover = -self.max_slip_damage(env);
        let value = ((f64::from(self.mhp(env)) * self.hrg(env)).floor() as i32).max(min_recover);
        if value != 0 {
            self.gain_hp(env, value);
        }
    }

    fn regenerate_mp(&mut self, env: &Env<'_>) {
        let value = (f64::from(self.mmp(env)) * self.mrg(env)).floor() as i32;
        if value != 0 {
            self.gain_mp(env, value);
        }
    }

    fn regenerate_tp(&mut self, env: &Env<'_>) {
        let value = (f64::from(self.max_tp(env)) * self.trg(env)).floor() as i32;
        self.gain_silent_tp(env, value);
    }

    fn regenerate_all(&mut self, env: &Env<'_>) {
        if self.is_alive(env) {
            self.regenerate_hp(env);
            self.regenerate_mp(env);
            self.regenerate_tp(env);
        }
    }

    fn recover_all(&mut self, env: &Env<'_>) {
        self.core_mut().clear_states();
        let mhp = self.mhp(env);
        let mmp = self.mmp(env);
        let core = self.core_mut();
        core.hp = mhp;
        core.mp = mmp;
        self.refresh(env);
    }

    /// Shared body of [`Battler::refresh`] for implementors that extend it.
    fn refresh_base(&mut self, env: &Env<'_>) {
        for id in self.state_resist_set(env) {
            if self.core().is_state_affected(id) {
                debug!(battler = %self.name(env), state = %id, "resisted state stripped");
                self.core_mut().erase_state(id);
            }
        }
        let mhp = self.mhp(env);
        let mmp = self.mmp(env);
        let max_tp = self.max_tp(env);
        let core = self.core_mut();
        core.hp = core.hp.clamp(0, mhp);
        core.mp = core.mp.clamp(0, mmp);
        core.tp = core.tp.clamp(0, max_tp);

        let death = env.death_state_id();
        if self.hp() == 0 {
            if !self.core().is_state_affected(death) && self.is_state_addable(env, death) {
                self.add_new_state(env, death);
                self.core_mut().result.push_added_state(death);
            }
        } else if self.core().is_state_affected(death) {
            self.remove_state(env, death);
        }
    }

    // ========================================================================
    // Life and restriction
    // ========================================================================

    fn is_hidden(&self) -> bool {
        self.core().hidden
    }

    fn is_appeared(&self) -> bool {
        !self.core().hidden
    }

    fn hide(&mut self) {
        self.core_mut().hidden = true;
    }

    fn appear(&mut self) {
        self.core_mut().hidden = false;
    }

    fn is_death_state_affected(&self, env: &Env<'_>) -> bool {
        self.core().is_state_affected(env.death_state_id())
    }

    fn is_alive(&self, env: &Env<'_>) -> bool {
        self.is_appeared() && !self.is_death_state_affected(env)
    }

    fn is_dead(&self, env: &Env<'_>) -> bool {
        self.is_appeared() && self.is_death_state_affected(env)
    }

    /// Alive with less than a quarter of max hp left.
    fn is_dying(&self, env: &Env<'_>) -> bool {
        self.is_alive(env) && f64::from(self.hp()) < f64::from(self.mhp(env)) / 4.0
    }

    /// Zeroes hp and drops every state and buff.
    fn die(&mut self) {
        let core = self.core_mut();
        core.hp = 0;
        core.clear_states();
        core.buffs.clear();
    }

    /// Restores hp to 1 when it is 0.
    fn revive(&mut self) {
        let core = self.core_mut();
        if core.hp == 0 {
            core.hp = 1;
        }
    }

    fn restriction(&self, env: &Env<'_>) -> Restriction {
        self.states(env)
            .iter()
            .map(|s| s.restriction)
            .max()
            .unwrap_or(Restriction::None)
    }

    fn is_restricted(&self, env: &Env<'_>) -> bool {
        self.is_appeared() && self.restriction(env) > Restriction::None
    }

    fn can_input(&self, env: &Env<'_>) -> bool {
        self.is_appeared()
            && self.is_actor()
            && !self.is_restricted(env)
            && !self.is_auto_battle(env)
    }

    fn can_move(&self, env: &Env<'_>) -> bool {
        self.is_appeared() && self.restriction(env) < Restriction::CannotMove
    }

    fn is_confused(&self, env: &Env<'_>) -> bool {
        self.is_appeared() && self.restriction(env).is_confusion()
    }

    fn confusion_level(&self, env: &Env<'_>) -> u8 {
        if self.is_confused(env) {
            self.restriction(env).level()
        } else {
            0
        }
    }

    // ========================================================================
    // States
    // ========================================================================

    /// Definitions of the active states, in priority order.
    fn states<'e>(&self, env: &Env<'e>) -> Vec<&'e StateData> {
        self.core()
            .states
            .iter()
            .filter_map(|id| env.state(*id))
            .collect()
    }

    fn is_state_affected(&self, id: StateId) -> bool {
        self.core().is_state_affected(id)
    }

    fn is_state_addable(&self, env: &Env<'_>, id: StateId) -> bool {
        self.is_alive(env)
            && env.state(id).is_some()
            && !self.is_state_resist(env, id)
            && !self.is_state_restrict(env, id)
    }

    /// The state would be removed immediately by the current restriction.
    fn is_state_restrict(&self, env: &Env<'_>, id: StateId) -> bool {
        env.state(id)
            .is_some_and(|s| s.remove_by_restriction && self.is_restricted(env))
    }

    /// Pushes the state without eligibility checks.
    ///
    /// The death state first kills the battler. If the battler was not
    /// restricted before and is now, [`Battler::on_restrict`] runs.
    fn add_new_state(&mut self, env: &Env<'_>, id: StateId) {
        if id == env.death_state_id() {
            self.die();
        }
        let restricted = self.is_restricted(env);
        let core = self.core_mut();
        core.states.push(id);
        core.sort_states(env);
        trace!(battler = %self.name(env), state = %id, "state pushed");
        if !restricted && self.is_restricted(env) {
            debug!(battler = %self.name(env), state = %id, "restriction onset");
            self.on_restrict(env);
        }
    }

    fn add_state(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource, id: StateId) {
        if env.state(id).is_none() {
            warn!(state = %id, "unknown state ignored");
            return;
        }
        if !self.is_state_addable(env, id) {
            return;
        }
        if !self.is_state_affected(id) {
            self.add_new_state(env, id);
            self.refresh(env);
        }
        self.reset_state_counts(env, rng, id);
        self.core_mut().result.push_added_state(id);
        debug!(battler = %self.name(env), state = %id, "state added");
    }

    /// Rolls the state's duration: `min_turns + random(1 + max - min)`.
    fn reset_state_counts(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource, id: StateId) {
        let Some(state) = env.state(id) else {
            return;
        };
        let core = self.core_mut();
        if state.expires_by_turn() {
            let variance = 1 + (state.max_turns - state.min_turns).max(0) as u32;
            let turns = state.min_turns + rng.random_int(variance) as i32;
            core.state_turns.insert(id, turns);
        } else {
            core.state_turns.remove(&id);
        }
    }

    /// Removing the death state revives the battler.
    fn remove_state(&mut self, env: &Env<'_>, id: StateId) {
        if !self.is_state_affected(id) {
            return;
        }
        if id == env.death_state_id() {
            self.revive();
        }
        self.core_mut().erase_state(id);
        self.refresh(env);
        self.core_mut().result.push_removed_state(id);
        debug!(battler = %self.name(env), state = %id, "state removed");
    }

    fn clear_states(&mut self) {
        self.core_mut().clear_states();
    }

    fn update_state_turns(&mut self) {
        self.core_mut().update_state_turns();
    }

    /// Removes expired states whose auto-removal matches `timing`.
    fn remove_states_auto(&mut self, env: &Env<'_>, timing: AutoRemovalTiming) {
        let expired: Vec<StateId> = self
            .states(env)
            .into_iter()
            .filter(|s| s.auto_removal_timing == timing && self.core().is_state_expired(s.id))
            .map(|s| s.id)
            .collect();
        for id in expired {
            self.remove_state(env, id);
        }
    }

    fn remove_battle_states(&mut self, env: &Env<'_>) {
        let battle_only: Vec<StateId> = self
            .states(env)
            .into_iter()
            .filter(|s| s.remove_at_battle_end)
            .map(|s| s.id)
            .collect();
        for id in battle_only {
            self.remove_state(env, id);
        }
    }

    /// Each damage-removable state is removed with its configured chance.
    fn remove_states_by_damage(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource) {
        let candidates: Vec<(StateId, u32)> = self
            .states(env)
            .into_iter()
            .filter(|s| s.remove_by_damage)
            .map(|s| (s.id, s.chance_by_damage))
            .collect();
        for (id, chance) in candidates {
            if rng.random_int(100) < chance {
                self.remove_state(env, id);
            }
        }
    }

    fn state_icons(&self, env: &Env<'_>) -> Vec<u32> {
        self.states(env)
            .iter()
            .map(|s| s.icon_index)
            .filter(|icon| *icon > 0)
            .collect()
    }

    fn buff_icons(&self) -> Vec<u32> {
        let buffs = &self.core().buffs;
        ParamId::all().filter_map(|p| buffs.icon_index(p)).collect()
    }

    fn all_icons(&self, env: &Env<'_>) -> Vec<u32> {
        let mut icons = self.state_icons(env);
        icons.extend(self.buff_icons());
        icons
    }

    // ========================================================================
    // Buffs
    // ========================================================================

    fn add_buff(&mut self, env: &Env<'_>, param: ParamId, turns: i32) {
        if !self.is_alive(env) {
            return;
        }
        let core = self.core_mut();
        core.buffs.increase(param);
        if core.buffs.is_buff_affected(param) {
            core.buffs.overwrite_turns(param, turns);
        }
        core.result.push_added_buff(param);
        trace!(battler = %self.name(env), %param, level = self.core().buffs.level(param), "buff raised");
        self.refresh(env);
    }

    fn add_debuff(&mut self, env: &Env<'_>, param: ParamId, turns: i32) {
        if !self.is_alive(env) {
            return;
        }
        let core = self.core_mut();
        core.buffs.decrease(param);
        if core.buffs.is_debuff_affected(param) {
            core.buffs.overwrite_turns(param, turns);
        }
        core.result.push_added_debuff(param);
        trace!(battler = %self.name(env), %param, level = self.core().buffs.level(param), "buff lowered");
        self.refresh(env);
    }

    fn remove_buff(&mut self, env: &Env<'_>, param: ParamId) {
        if !self.is_alive(env) || !self.core().buffs.is_affected(param) {
            return;
        }
        let core = self.core_mut();
        core.buffs.erase(param);
        core.result.push_removed_buff(param);
        self.refresh(env);
    }

    fn remove_all_buffs(&mut self, env: &Env<'_>) {
        for param in ParamId::all() {
            self.remove_buff(env, param);
        }
    }

    /// Drops buffs whose timer ran out; level-0 leftovers are erased silently.
    fn remove_buffs_auto(&mut self, env: &Env<'_>) {
        if !self.is_alive(env) {
            return;
        }
        for param in ParamId::all() {
            let buffs = &self.core().buffs;
            if !buffs.is_expired(param) {
                continue;
            }
            if buffs.is_affected(param) {
                self.remove_buff(env, param);
            }
        }
        for param in ParamId::all() {
            if !self.core().buffs.is_affected(param) {
                self.core_mut().buffs.erase(param);
            }
        }
    }

    fn update_buff_turns(&mut self) {
        self.core_mut().buffs.update_turns();
    }

    // ========================================================================
    // Skills and items
    // ========================================================================

    fn skill_mp_cost(&self, env: &Env<'_>, skill: &SkillData) -> i32 {
        (f64::from(skill.mp_cost) * self.mcr(env)).floor() as i32
    }

    fn skill_tp_cost(&self, skill: &SkillData) -> i32 {
        skill.tp_cost
    }

    fn can_pay_skill_cost(&self, env: &Env<'_>, skill: &SkillData) -> bool {
        self.tp() >= self.skill_tp_cost(skill) && self.mp() >= self.skill_mp_cost(env, skill)
    }

    fn pay_skill_cost(&mut self, env: &Env<'_>, skill: &SkillData) {
        let mp = self.skill_mp_cost(env, skill);
        let tp = self.skill_tp_cost(skill);
        let core = self.core_mut();
        core.mp -= mp;
        core.tp -= tp;
    }

    fn is_occasion_ok(&self, env: &Env<'_>, occasion: Occasion) -> bool {
        occasion.allows(env.in_battle())
    }

    fn meets_usable_item_conditions(&self, env: &Env<'_>, occasion: Occasion) -> bool {
        self.can_move(env) && self.is_occasion_ok(env, occasion)
    }

    fn meets_skill_conditions(&self, env: &Env<'_>, skill: &SkillData) -> bool {
        self.meets_usable_item_conditions(env, skill.occasion)
            && self.is_skill_wtype_ok(env, skill)
            && self.can_pay_skill_cost(env, skill)
            && !self.is_skill_sealed(env, skill.id)
            && !self.is_skill_type_sealed(env, skill.stype_id)
    }

    /// Skills check the battler; consumables also need a held copy.
    fn can_use(&self, env: &Env<'_>, item: ItemRef, inventory: Option<&Inventory>) -> bool {
        match item {
            ItemRef::Skill(id) => env
                .content()
                .skill(id)
                .is_some_and(|skill| self.meets_skill_conditions(env, skill)),
            ItemRef::Item(id) => env.content().item(id).is_some_and(|data| {
                self.meets_usable_item_conditions(env, data.occasion)
                    && inventory.is_some_and(|inv| inv.has_item(item))
            }),
            ItemRef::Weapon(_) | ItemRef::Armor(_) => false,
        }
    }

    fn can_attack(&self, env: &Env<'_>) -> bool {
        self.can_use(env, ItemRef::Skill(self.attack_skill_id(env)), None)
    }

    fn can_guard(&self, env: &Env<'_>) -> bool {
        self.can_use(env, ItemRef::Skill(env.config().guard_skill_id), None)
    }

    /// Skills pay their cost; consumable items are taken from the inventory.
    fn use_item(&mut self, env: &Env<'_>, item: ItemRef, inventory: Option<&mut Inventory>) {
        match item {
            ItemRef::Skill(id) => {
                if let Some(skill) = env.content().skill(id) {
                    self.pay_skill_cost(env, skill);
                }
            }
            ItemRef::Item(id) => {
                let consumable = env.content().item(id).is_some_and(|data| data.consumable);
                if let (true, Some(inventory)) = (consumable, inventory) {
                    inventory.lose(env.config(), item, 1);
                }
            }
            ItemRef::Weapon(_) | ItemRef::Armor(_) => {}
        }
    }

    fn can_equip(&self, env: &Env<'_>, item: EquipItem) -> bool {
        match item.resolve(env.content()) {
            Some(EquipObject::Weapon(data)) => {
                self.is_equip_wtype_ok(env, data.wtype_id)
                    && !self.is_equip_type_sealed(env, data.etype_id)
            }
            Some(EquipObject::Armor(data)) => {
                self.is_equip_atype_ok(env, data.atype_id)
                    && !self.is_equip_type_sealed(env, data.etype_id)
            }
            None => false,
        }
    }

    // ========================================================================
    // Action slots
    // ========================================================================

    fn num_actions(&self) -> usize {
        self.core().actions.len()
    }

    fn current_action(&self) -> Option<&BattleAction> {
        self.core().actions.first()
    }

    fn action(&self, index: usize) -> Option<&BattleAction> {
        self.core().actions.get(index)
    }

    fn set_action(&mut self, index: usize, action: BattleAction) {
        if let Some(slot) = self.core_mut().actions.get_mut(index) {
            *slot = action;
        }
    }

    /// Appends an action; ignored once the queue is full.
    fn push_action(&mut self, action: BattleAction) {
        if self.core_mut().actions.try_push(action).is_err() {
            warn!("action queue full");
        }
    }

    fn remove_current_action(&mut self) {
        let actions = &mut self.core_mut().actions;
        if !actions.is_empty() {
            actions.remove(0);
        }
    }

    fn clear_actions(&mut self) {
        self.core_mut().actions.clear();
    }

    fn action_state(&self) -> ActionState {
        self.core().action_state
    }

    fn set_action_state(&mut self, state: ActionState) {
        self.core_mut().action_state = state;
    }

    fn is_undecided(&self) -> bool {
        self.action_state() == ActionState::Undecided
    }

    fn is_inputting(&self) -> bool {
        self.action_state() == ActionState::Inputting
    }

    fn is_waiting(&self) -> bool {
        self.action_state() == ActionState::Waiting
    }

    fn is_acting(&self) -> bool {
        self.action_state() == ActionState::Acting
    }

    fn select(&mut self) {
        self.core_mut().selected = true;
    }

    fn deselect(&mut self) {
        self.core_mut().selected = false;
    }

    fn is_selected(&self) -> bool {
        self.core().selected
    }

    /// One action plus one per action-plus trait whose draw succeeds.
    fn make_action_times(&self, env: &Env<'_>, rng: &mut dyn RandomSource) -> usize {
        let extra = self
            .action_plus_set(env)
            .into_iter()
            .filter(|chance| rng.next_f64() < *chance)
            .count();
        1 + extra
    }

    /// Clears the queue and, if the battler can move, fills it with empty slots.
    fn make_action_slots(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource) {
        self.clear_actions();
        if !self.can_move(env) {
            return;
        }
        let times = self.make_action_times(env, rng).min(crate::config::BattleConfig::MAX_ACTIONS);
        for _ in 0..times {
            self.push_action(BattleAction::empty());
        }
    }

    /// Initiative for the turn: the slowest queued action decides.
    fn make_speed(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource) {
        let agi = self.agi(env);
        let attack_skill = self.attack_skill_id(env);
        let attack_speed = self.attack_speed(env) as i32;
        let actions: Vec<BattleAction> = self.core().actions.iter().copied().collect();
        let speed = actions
            .iter()
            .map(|action| {
                let variance = (5 + agi / 4).max(1) as u32;
                let mut speed = agi + rng.random_int(variance) as i32 + action.item_speed(env);
                if action.is_attack_with(attack_skill) {
                    speed += attack_speed;
                }
                speed
            })
            .min()
            .unwrap_or(0);
        self.core_mut().speed = speed;
    }

    fn speed(&self) -> i32 {
        self.core().speed
    }

    // ========================================================================
    // Battle lifecycle
    // ========================================================================

    fn on_battle_start(
        &mut self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        advantageous: bool,
        clock: &TpbClock,
    ) {
        self.set_action_state(ActionState::Undecided);
        self.init_tpb_charge_time(env, rng, advantageous, clock);
        self.core_mut().tpb.init_turn();
        if !self.is_preserve_tp(env) {
            self.init_tp(env, rng);
        }
    }

    fn on_all_actions_end(&mut self, env: &Env<'_>) {
        self.clear_result();
        self.remove_states_auto(env, AutoRemovalTiming::ActionEnd);
        self.remove_buffs_auto(env);
    }

    fn on_turn_end(&mut self, env: &Env<'_>) {
        self.clear_result();
        self.regenerate_all(env);
        self.update_state_turns();
        self.update_buff_turns();
        self.remove_states_auto(env, AutoRemovalTiming::TurnEnd);
    }

    fn on_battle_end(&mut self, env: &Env<'_>) {
        self.clear_result();
        self.remove_battle_states(env);
        self.remove_all_buffs(env);
        self.clear_actions();
        if !self.is_preserve_tp(env) {
            self.clear_tp(env);
        }
        self.appear();
    }

    /// Damage taken: chance to shake off states, then charge TP.
    fn on_damage(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource, value: i32) {
        self.remove_states_by_damage(env, rng);
        let rate = f64::from(value) / f64::from(self.mhp(env));
        self.charge_tp_by_damage(env, rate);
    }

    fn escape(&mut self, env: &Env<'_>) {
        if env.in_battle() {
            self.hide();
        }
        self.clear_actions();
        self.clear_states();
    }

    fn result(&self) -> &BattlerResult {
        &self.core().result
    }

    fn clear_result(&mut self) {
        self.core_mut().result.clear();
    }

    // ========================================================================
    // Time progress gauge
    // ========================================================================

    fn tpb_speed(&self, env: &Env<'_>) -> f64 {
        f64::from(self.agi(env)).sqrt() + 1.0
    }

    /// Speed from unbuffed agility; the party maximum sets the clock.
    fn tpb_base_speed(&self, env: &Env<'_>) -> f64 {
        f64::from(self.param_base_plus(env, ParamId::Agi)).sqrt() + 1.0
    }

    fn tpb_acceleration(&self, env: &Env<'_>, clock: &TpbClock) -> f64 {
        clock.acceleration(self.tpb_speed(env))
    }

    /// Cast time needed by the queued actions' negative item speeds.
    fn tpb_required_cast_time(&self, env: &Env<'_>) -> f64 {
        let delay: i32 = self
            .core()
            .actions
            .iter()
            .map(|action| (-action.item_speed(env)).max(0))
            .sum();
        f64::from(delay).sqrt() / self.tpb_speed(env)
    }

    fn init_tpb_charge_time(
        &mut self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        advantageous: bool,
        clock: &TpbClock,
    ) {
        let value = if self.is_restricted(env) {
            0.0
        } else if advantageous {
            1.0
        } else {
            clock.relative_speed(self.tpb_speed(env)) * rng.next_f64() * 0.5
        };
        self.core_mut().tpb.init_charge_time(value);
    }

    /// Advances the gauge by one frame.
    fn update_tpb(&mut self, env: &Env<'_>, clock: &TpbClock) {
        let acceleration = self.tpb_acceleration(env, clock);
        if self.can_move(env) {
            let required = self.tpb_required_cast_time(env);
            let tpb = &mut self.core_mut().tpb;
            if tpb.update_charge(acceleration) {
                trace!(battler = %self.name(env), "tpb charged");
            }
            self.core_mut().tpb.update_cast(acceleration, required);
        }
        if self.is_alive(env) {
            self.core_mut().tpb.update_idle(acceleration);
        }
    }

    fn start_tpb_casting(&mut self) {
        self.core_mut().tpb.start_casting();
    }

    fn start_tpb_action(&mut self) {
        self.core_mut().tpb.start_action();
    }

    fn start_tpb_turn(&mut self) {
        self.core_mut().tpb.start_turn();
    }

    fn end_tpb_turn(&mut self) {
        self.core_mut().tpb.end_turn();
    }

    fn on_tpb_timeout(&mut self, env: &Env<'_>) {
        self.on_all_actions_end(env);
        self.core_mut().tpb.on_timeout();
    }

    fn clear_tpb_charge_time(&mut self) {
        self.core_mut().tpb.clear_charge_time();
    }

    fn apply_tpb_penalty(&mut self) {
        self.core_mut().tpb.apply_penalty();
    }
}
