//! Experience, levels, classes and the learned skill list.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::battler::Battler;
use crate::data::SkillData;
use crate::env::Env;
use crate::ids::{ActorId, ClassId, SkillId};
use crate::item::ItemRef;

use super::Actor;

/// Level cap used when the actor definition is missing.
const FALLBACK_MAX_LEVEL: i32 = 99;

/// Net level gain reported by an experience change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub actor_id: ActorId,
    pub from_level: i32,
    pub to_level: i32,
    /// Skills known after the change that were not known before.
    pub new_skills: Vec<SkillId>,
}

impl Actor {
    pub(super) fn init_exp(&mut self, env: &Env<'_>) {
        let exp = self.current_level_exp(env);
        self.exp.insert(self.class_id, exp);
    }

    pub(super) fn init_skills(&mut self, env: &Env<'_>) {
        self.skills.clear();
        let Some(class) = self.current_class(env) else {
            return;
        };
        for learning in &class.learnings {
            if learning.level <= self.level {
                self.learn_skill(learning.skill_id);
            }
        }
    }

    pub fn max_level(&self, env: &Env<'_>) -> i32 {
        self.data(env)
            .map_or(FALLBACK_MAX_LEVEL, |data| data.max_level.max(1))
    }

    pub fn is_max_level(&self, env: &Env<'_>) -> bool {
        self.level >= self.max_level(env)
    }

    /// Total experience required to reach `level` in the current class.
    pub fn exp_for_level(&self, env: &Env<'_>, level: i32) -> i64 {
        self.current_class(env)
            .map_or(0, |class| class.exp_curve.exp_for_level(level))
    }

    pub fn current_exp(&self) -> i64 {
        self.exp.get(&self.class_id).copied().unwrap_or(0)
    }

    pub fn current_level_exp(&self, env: &Env<'_>) -> i64 {
        self.exp_for_level(env, self.level)
    }

    pub fn next_level_exp(&self, env: &Env<'_>) -> i64 {
        self.exp_for_level(env, self.level + 1)
    }

    pub fn next_required_exp(&self, env: &Env<'_>) -> i64 {
        self.next_level_exp(env) - self.current_exp()
    }

    /// Sets the current class's experience (floored at zero) and moves the
    /// level up or down until it matches.
    ///
    /// Levels stay within `[1, max_level]`, so a non-monotonic curve cannot
    /// loop forever. When `show` is set and the level rose, the gain is
    /// returned for display.
    pub fn change_exp(&mut self, env: &Env<'_>, exp: i64, show: bool) -> Option<LevelUp> {
        self.exp.insert(self.class_id, exp.max(0));
        let last_level = self.level;
        let last_skills = self.skills(env);

        while !self.is_max_level(env) && self.current_exp() >= self.next_level_exp(env) {
            self.level_up(env);
        }
        while self.level > 1 && self.current_exp() < self.current_level_exp(env) {
            self.level_down();
        }

        let gained = self.level > last_level;
        let report = (show && gained).then(|| LevelUp {
            actor_id: self.actor_id,
            from_level: last_level,
            to_level: self.level,
            new_skills: self.find_new_skills(env, &last_skills),
        });
        if self.level != last_level {
            info!(actor = %self.actor_id, from = last_level, to = self.level, "level changed");
        }
        self.refresh(env);
        report
    }

    /// Raises the level by one and learns the skills taught at the new level.
    pub fn level_up(&mut self, env: &Env<'_>) {
        self.level += 1;
        let Some(class) = self.current_class(env) else {
            return;
        };
        for learning in &class.learnings {
            if learning.level == self.level {
                self.learn_skill(learning.skill_id);
            }
        }
    }

    pub fn level_down(&mut self) {
        self.level -= 1;
    }

    fn find_new_skills(&self, env: &Env<'_>, last_skills: &[SkillId]) -> Vec<SkillId> {
        self.skills(env)
            .into_iter()
            .filter(|id| !last_skills.contains(id))
            .collect()
    }

    /// Experience multiplier: `exr`, times the bench rate for reserve members.
    pub fn final_exp_rate(&self, env: &Env<'_>, battle_member: bool) -> f64 {
        let bench = if battle_member || env.config().bench_exp {
            1.0
        } else {
            0.0
        };
        self.exr(env) * bench
    }

    pub fn gain_exp(&mut self, env: &Env<'_>, exp: i64, battle_member: bool) -> Option<LevelUp> {
        let gained = (exp as f64 * self.final_exp_rate(env, battle_member)).round() as i64;
        let new_exp = self.current_exp().saturating_add(gained);
        self.change_exp(env, new_exp, true)
    }

    pub fn change_level(&mut self, env: &Env<'_>, level: i32, show: bool) -> Option<LevelUp> {
        let level = level.clamp(1, self.max_level(env));
        let exp = self.exp_for_level(env, level);
        self.change_exp(env, exp, show)
    }

    /// Switches class; with `keep_exp` the current experience carries over,
    /// otherwise the ledger entry of the new class is used.
    pub fn change_class(&mut self, env: &Env<'_>, class_id: ClassId, keep_exp: bool) {
        if keep_exp {
            let exp = self.current_exp();
            self.exp.insert(class_id, exp);
        }
        debug!(actor = %self.actor_id, from = %self.class_id, to = %class_id, "class changed");
        self.class_id = class_id;
        self.level = 0;
        let exp = self.current_exp();
        self.change_exp(env, exp, false);
    }

    // ===== skills =====

    pub fn learn_skill(&mut self, skill_id: SkillId) {
        if let Err(index) = self.skills.binary_search(&skill_id) {
            self.skills.insert(index, skill_id);
        }
    }

    pub fn forget_skill(&mut self, skill_id: SkillId) {
        self.skills.retain(|id| *id != skill_id);
    }

    pub fn is_learned_skill(&self, skill_id: SkillId) -> bool {
        self.skills.binary_search(&skill_id).is_ok()
    }

    pub fn learned_skills(&self) -> &[SkillId] {
        &self.skills
    }

    /// Learned skills plus trait-added ones, ascending and unique.
    pub fn skills(&self, env: &Env<'_>) -> Vec<SkillId> {
        let mut all: BTreeSet<SkillId> = self.skills.iter().copied().collect();
        all.extend(self.added_skills(env));
        all.into_iter().collect()
    }

    pub fn has_skill(&self, env: &Env<'_>, skill_id: SkillId) -> bool {
        self.skills(env).contains(&skill_id)
    }

    /// Skill types the actor may use, ascending.
    pub fn skill_types(&self, env: &Env<'_>) -> Vec<u32> {
        self.added_skill_types(env).into_iter().collect()
    }

    pub fn usable_skills<'e>(&self, env: &Env<'e>) -> Vec<&'e SkillData> {
        self.skills(env)
            .into_iter()
            .filter(|id| self.can_use(env, ItemRef::Skill(*id), None))
            .filter_map(|id| env.content().skill(id))
            .collect()
    }
}
