//! Action list construction and command input for actors.

use tracing::debug;

use crate::battler::{ActionState, BattleAction, Battler};
use crate::env::{Env, RandomSource};

use super::Actor;

/// Scores a candidate action for auto-battle.
///
/// Damage and effect formulas live outside this crate; the driver supplies
/// an evaluator that rates each candidate for the acting actor.
pub trait ActionEvaluator {
    fn evaluate(&self, env: &Env<'_>, subject: &Actor, action: &BattleAction) -> f64;
}

impl<F> ActionEvaluator for F
where
    F: Fn(&Env<'_>, &Actor, &BattleAction) -> f64,
{
    fn evaluate(&self, env: &Env<'_>, subject: &Actor, action: &BattleAction) -> f64 {
        self(env, subject, action)
    }
}

impl Actor {
    /// Builds this turn's action slots.
    ///
    /// Slots start empty and the actor waits for input. Auto-battle actors
    /// pick the best scoring candidate for every slot; confused actors get
    /// confusion attacks. Either way they skip input.
    pub fn make_actions(
        &mut self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        evaluator: &dyn ActionEvaluator,
    ) {
        self.make_action_slots(env, rng);
        if self.num_actions() > 0 {
            self.set_action_state(ActionState::Undecided);
        } else {
            self.set_action_state(ActionState::Waiting);
        }
        if self.is_auto_battle(env) {
            self.make_auto_battle_actions(env, evaluator);
        } else if self.is_confused(env) {
            self.make_confusion_actions(env);
        }
    }

    /// Candidates: the attack command plus every currently usable skill.
    pub fn make_action_list(&self, env: &Env<'_>) -> Vec<BattleAction> {
        let mut list = vec![BattleAction::attack(self.attack_skill_id(env))];
        list.extend(
            self.usable_skills(env)
                .into_iter()
                .map(|skill| BattleAction::skill(skill.id)),
        );
        list
    }

    fn make_auto_battle_actions(&mut self, env: &Env<'_>, evaluator: &dyn ActionEvaluator) {
        for index in 0..self.num_actions() {
            let mut best: Option<(BattleAction, f64)> = None;
            for action in self.make_action_list(env) {
                let value = evaluator.evaluate(env, self, &action);
                if best.is_none_or(|(_, top)| value > top) {
                    best = Some((action, value));
                }
            }
            if let Some((action, value)) = best {
                debug!(actor = %self.actor_id, slot = index, ?action, value, "auto-battle choice");
                self.set_action(index, action);
            }
        }
        self.set_action_state(ActionState::Waiting);
    }

    fn make_confusion_actions(&mut self, env: &Env<'_>) {
        let attack = self.attack_skill_id(env);
        for index in 0..self.num_actions() {
            self.set_action(index, BattleAction::confused_attack(attack));
        }
        self.set_action_state(ActionState::Waiting);
    }

    // ===== command input =====

    pub fn action_input_index(&self) -> usize {
        self.action_input_index
    }

    /// Slot currently receiving input.
    pub fn inputting_action(&self) -> Option<&BattleAction> {
        self.action(self.action_input_index)
    }

    pub fn set_input(&mut self, action: BattleAction) {
        self.set_action(self.action_input_index, action);
    }

    pub fn select_next_command(&mut self) -> bool {
        if self.action_input_index + 1 < self.num_actions() {
            self.action_input_index += 1;
            true
        } else {
            false
        }
    }

    pub fn select_previous_command(&mut self) -> bool {
        if self.action_input_index > 0 {
            self.action_input_index -= 1;
            true
        } else {
            false
        }
    }
}
