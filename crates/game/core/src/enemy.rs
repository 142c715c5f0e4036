//! Hostile combatants and their action selection.
//!
//! Each enemy definition lists candidate actions with a rating (1–9) and an
//! optional condition. For every action slot the enemy keeps the valid
//! candidates within three points of the best rating and draws one with
//! weight `rating - (max_rating - 3)`, so higher ratings are proportionally
//! more likely and weaker tiers never come up.

use tracing::{debug, trace, warn};

use crate::battler::{ActionState, BattleAction, Battler, BattlerCore};
use crate::config::LetterTable;
use crate::data::{ActionCondition, EnemyAction, EnemyData};
use crate::env::{Env, RandomSource};
use crate::ids::EnemyId;
use crate::item::ItemRef;
use crate::stats::ParamId;
use crate::switches::Switches;
use crate::traits::TraitSet;

/// Battle-wide facts read by enemy action conditions.
#[derive(Clone, Copy, Debug)]
pub struct AiContext<'a> {
    /// Completed troop turns.
    pub troop_turn: u32,
    /// Highest level among the party's battle members.
    pub party_level: i32,
    pub switches: &'a Switches,
}

/// An enemy instance, created per encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    enemy_id: EnemyId,
    screen_x: i32,
    screen_y: i32,
    letter: String,
    plural: bool,
    core: BattlerCore,
}

impl Enemy {
    /// Returns `None` when the enemy id is unknown.
    pub fn new(env: &Env<'_>, enemy_id: EnemyId, screen_x: i32, screen_y: i32) -> Option<Self> {
        if env.content().enemy(enemy_id).is_none() {
            warn!(enemy = %enemy_id, "unknown enemy");
            return None;
        }
        let mut enemy = Self {
            enemy_id,
            screen_x,
            screen_y,
            letter: String::new(),
            plural: false,
            core: BattlerCore::new(),
        };
        enemy.recover_all(env);
        Some(enemy)
    }

    pub fn enemy_id(&self) -> EnemyId {
        self.enemy_id
    }

    pub fn data<'e>(&self, env: &Env<'e>) -> Option<&'e EnemyData> {
        env.content().enemy(self.enemy_id)
    }

    pub fn screen_position(&self) -> (i32, i32) {
        (self.screen_x, self.screen_y)
    }

    pub fn battler_name<'e>(&self, env: &Env<'e>) -> &'e str {
        self.data(env).map_or("", |data| data.battler_name.as_str())
    }

    pub fn original_name(&self, env: &Env<'_>) -> String {
        self.data(env).map(|data| data.name.clone()).unwrap_or_default()
    }

    pub fn letter(&self) -> &str {
        &self.letter
    }

    pub fn is_letter_empty(&self) -> bool {
        self.letter.is_empty()
    }

    pub fn set_letter(&mut self, letter: impl Into<String>) {
        self.letter = letter.into();
    }

    pub fn is_plural(&self) -> bool {
        self.plural
    }

    pub fn set_plural(&mut self, plural: bool) {
        self.plural = plural;
    }

    pub fn exp(&self, env: &Env<'_>) -> i64 {
        self.data(env).map_or(0, |data| data.exp)
    }

    pub fn gold(&self, env: &Env<'_>) -> i64 {
        self.data(env).map_or(0, |data| data.gold)
    }

    /// Rolls each drop entry with chance `rate / denominator`.
    pub fn make_drop_items(
        &self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        rate: f64,
    ) -> Vec<ItemRef> {
        let Some(data) = self.data(env) else {
            return Vec::new();
        };
        data.drop_items
            .iter()
            .filter(|drop| rng.next_f64() * f64::from(drop.denominator) < rate)
            .map(|drop| drop.item)
            .collect()
    }

    /// Turns into another enemy. A changed base name drops the letter.
    ///
    /// Returns `true` when the name changed so the troop can reassign letters.
    pub fn transform(&mut self, env: &Env<'_>, enemy_id: EnemyId) -> bool {
        if env.content().enemy(enemy_id).is_none() {
            warn!(enemy = %enemy_id, "transform into unknown enemy ignored");
            return false;
        }
        let name = self.original_name(env);
        self.enemy_id = enemy_id;
        let renamed = self.original_name(env) != name;
        if renamed {
            self.letter.clear();
            self.plural = false;
        }
        debug!(from = %name, to = %self.original_name(env), "enemy transformed");
        self.refresh(env);
        renamed
    }

    // ===== action selection =====

    /// Turn number used by turn conditions.
    pub fn turn_count(&self, env: &Env<'_>, ai: &AiContext<'_>) -> u32 {
        if env.config().battle_system.is_tpb() {
            self.core.tpb().turn_count()
        } else {
            ai.troop_turn + 1
        }
    }

    pub fn meets_condition(
        &self,
        env: &Env<'_>,
        ai: &AiContext<'_>,
        condition: &ActionCondition,
    ) -> bool {
        match *condition {
            ActionCondition::Always => true,
            ActionCondition::Turn { a, b } => {
                let n = self.turn_count(env, ai);
                if b == 0 {
                    n == a
                } else {
                    n > 0 && n >= a && n % b == a % b
                }
            }
            ActionCondition::Hp { min, max } => {
                let rate = self.hp_rate(env);
                rate >= min && rate <= max
            }
            ActionCondition::Mp { min, max } => {
                let rate = self.mp_rate(env);
                rate >= min && rate <= max
            }
            ActionCondition::State(id) => self.is_state_affected(id),
            ActionCondition::PartyLevel(level) => ai.party_level >= level,
            ActionCondition::Switch(id) => ai.switches.value(id),
        }
    }

    /// Condition holds and the skill is currently usable.
    pub fn is_action_valid(&self, env: &Env<'_>, ai: &AiContext<'_>, action: &EnemyAction) -> bool {
        self.meets_condition(env, ai, &action.condition)
            && self.can_use(env, ItemRef::Skill(action.skill_id), None)
    }

    pub fn valid_actions(&self, env: &Env<'_>, ai: &AiContext<'_>) -> Vec<EnemyAction> {
        self.data(env)
            .map(|data| {
                data.actions
                    .iter()
                    .filter(|action| self.is_action_valid(env, ai, action))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fills every action slot from the valid candidates.
    pub fn make_actions(&mut self, env: &Env<'_>, rng: &mut dyn RandomSource, ai: &AiContext<'_>) {
        self.make_action_slots(env, rng);
        if self.num_actions() > 0 {
            let candidates = self.valid_actions(env, ai);
            if !candidates.is_empty() {
                self.select_all_actions(env, rng, &candidates);
            }
        }
        self.set_action_state(ActionState::Waiting);
    }

    fn select_all_actions(
        &mut self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        candidates: &[EnemyAction],
    ) {
        let rating_zero = rating_zero(candidates);
        let top: Vec<EnemyAction> = candidates
            .iter()
            .filter(|action| i64::from(action.rating) > rating_zero)
            .copied()
            .collect();
        for index in 0..self.num_actions() {
            let chosen = select_action(rng, &top, rating_zero);
            let action = chosen.map_or_else(BattleAction::empty, |a| BattleAction::skill(a.skill_id));
            trace!(enemy = %self.name(env), slot = index, skill = ?chosen.map(|a| a.skill_id), "enemy action");
            self.set_action(index, action);
        }
    }
}

/// `max(rating) - 3`; candidates at or below it are never chosen.
pub fn rating_zero(candidates: &[EnemyAction]) -> i64 {
    candidates
        .iter()
        .map(|action| i64::from(action.rating))
        .max()
        .unwrap_or(0)
        - 3
}

/// Weighted draw with weight `rating - rating_zero`.
///
/// Ties go to the first candidate in list order whose cumulative weight
/// passes the draw. Returns `None` when the total weight is zero.
pub fn select_action(
    rng: &mut dyn RandomSource,
    candidates: &[EnemyAction],
    rating_zero: i64,
) -> Option<EnemyAction> {
    let weight = |action: &EnemyAction| (i64::from(action.rating) - rating_zero).max(0);
    let sum: i64 = candidates.iter().map(weight).sum();
    if sum <= 0 {
        return None;
    }
    let mut value = i64::from(rng.random_int(u32::try_from(sum).unwrap_or(u32::MAX)));
    for action in candidates {
        value -= weight(action);
        if value < 0 {
            return Some(*action);
        }
    }
    None
}

impl Battler for Enemy {
    fn core(&self) -> &BattlerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BattlerCore {
        &mut self.core
    }

    fn is_actor(&self) -> bool {
        false
    }

    /// Base name, followed by the letter when several share it.
    fn name(&self, env: &Env<'_>) -> String {
        let base = self.original_name(env);
        if !self.plural {
            return base;
        }
        match env.config().letter_table {
            LetterTable::Half => format!("{base} {}", self.letter),
            LetterTable::Full => format!("{base}{}", self.letter),
        }
    }

    fn trait_sources<'e>(&self, env: &Env<'e>) -> TraitSet<'e> {
        let mut set = TraitSet::new();
        if let Some(data) = self.data(env) {
            set.push(data);
        }
        for state in self.states(env) {
            set.push(state);
        }
        set
    }

    fn param_base(&self, env: &Env<'_>, param: ParamId) -> i32 {
        self.data(env).map_or(0, |data| data.param(param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::GameRng;
    use crate::ids::SkillId;

    #[test]
    fn rating_zero_is_three_below_max() {
        let actions = [
            EnemyAction::new(SkillId(1), 5),
            EnemyAction::new(SkillId(2), 8),
        ];
        assert_eq!(rating_zero(&actions), 5);
        assert_eq!(rating_zero(&[]), -3);
    }

    #[test]
    fn zero_weight_selects_nothing() {
        let mut rng = GameRng::seeded(3);
        let actions = [EnemyAction::new(SkillId(1), 4)];
        assert_eq!(select_action(&mut rng, &actions, 4), None);
        assert_eq!(select_action(&mut rng, &[], 0), None);
    }

    #[test]
    fn single_candidate_always_wins() {
        let mut rng = GameRng::seeded(9);
        let actions = [EnemyAction::new(SkillId(7), 5)];
        for _ in 0..20 {
            assert_eq!(
                select_action(&mut rng, &actions, 2).map(|a| a.skill_id),
                Some(SkillId(7))
            );
        }
    }
}
