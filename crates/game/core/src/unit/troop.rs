//! The hostile side of an encounter.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::battler::Battler;
use crate::data::{PageConditions, PageSpan, TroopData, TroopPage};
use crate::enemy::{AiContext, Enemy};
use crate::env::{Env, RandomSource};
use crate::ids::{EnemyId, TroopId};
use crate::item::ItemRef;
use crate::switches::Switches;
use crate::traits::PartyAbilities;

use super::{Party, Unit};

/// Enemies of the current encounter, rebuilt by every [`Troop::setup`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Troop {
    troop_id: TroopId,
    enemies: Vec<Enemy>,
    turn_count: u32,
    /// Letters handed out per base name.
    names_count: BTreeMap<String, usize>,
    /// Event pages already run for their span.
    event_flags: BTreeSet<usize>,
    in_battle: bool,
}

impl Troop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.troop_id = TroopId::NONE;
        self.enemies.clear();
        self.turn_count = 0;
        self.names_count.clear();
        self.event_flags.clear();
        self.in_battle = false;
    }

    /// Builds the enemy instances of `troop_id`. Unknown enemies are skipped.
    ///
    /// Returns `false` when the troop itself is undefined.
    pub fn setup(&mut self, env: &Env<'_>, troop_id: TroopId) -> bool {
        self.clear();
        let Some(data) = env.content().troop(troop_id) else {
            warn!(troop = %troop_id, "unknown troop");
            return false;
        };
        self.troop_id = troop_id;
        for member in &data.members {
            let Some(mut enemy) = Enemy::new(env, member.enemy_id, member.x, member.y) else {
                continue;
            };
            if member.hidden {
                enemy.hide();
            }
            self.enemies.push(enemy);
        }
        self.make_unique_names(env);
        info!(troop = %troop_id, enemies = self.enemies.len(), "troop set up");
        true
    }

    pub fn troop_id(&self) -> TroopId {
        self.troop_id
    }

    pub fn data<'e>(&self, env: &Env<'e>) -> Option<&'e TroopData> {
        env.content().troop(self.troop_id)
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy_mut(&mut self, index: usize) -> Option<&mut Enemy> {
        self.enemies.get_mut(index)
    }

    /// Gives every alive, unlettered enemy that shares its base name a
    /// letter, then marks shared names as plural.
    ///
    /// Each enemy takes the first letter not already used by its namesakes;
    /// once the table is exhausted letters repeat in table order.
    pub fn make_unique_names(&mut self, env: &Env<'_>) {
        let table = env.config().letter_table.letters();
        let names: Vec<String> = self.enemies.iter().map(|e| e.original_name(env)).collect();
        let mut group_sizes: BTreeMap<&str, usize> = BTreeMap::new();
        for name in &names {
            *group_sizes.entry(name.as_str()).or_default() += 1;
        }

        for index in 0..self.enemies.len() {
            let name = &names[index];
            let enemy = &self.enemies[index];
            if !enemy.is_alive(env) || !enemy.is_letter_empty() {
                continue;
            }
            let assigned = self.names_count.get(name).copied().unwrap_or(0);
            if group_sizes.get(name.as_str()).copied().unwrap_or(0) < 2 && assigned == 0 {
                continue;
            }
            let used: BTreeSet<&str> = self
                .enemies
                .iter()
                .zip(&names)
                .filter(|(_, other)| *other == name)
                .map(|(enemy, _)| enemy.letter())
                .filter(|letter| !letter.is_empty())
                .collect();
            let letter = table
                .iter()
                .find(|letter| !used.contains(**letter))
                .or_else(|| table.get(assigned % table.len().max(1)))
                .copied()
                .unwrap_or_default()
                .to_owned();
            self.names_count.insert(name.clone(), assigned + 1);
            debug!(enemy = %name, %letter, "enemy letter assigned");
            self.enemies[index].set_letter(letter);
        }

        for (enemy, name) in self.enemies.iter_mut().zip(&names) {
            if self.names_count.get(name).copied().unwrap_or(0) >= 2 {
                enemy.set_plural(true);
            }
        }
    }

    /// Transforms an enemy and reassigns letters when its name changed.
    pub fn transform_enemy(&mut self, env: &Env<'_>, index: usize, enemy_id: EnemyId) -> bool {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return false;
        };
        if enemy.transform(env, enemy_id) {
            self.make_unique_names(env);
        }
        true
    }

    /// Reveals a hidden enemy and gives it a letter if it needs one.
    pub fn appear_enemy(&mut self, env: &Env<'_>, index: usize) -> bool {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return false;
        };
        enemy.appear();
        self.make_unique_names(env);
        true
    }

    /// Distinct base names of alive enemies in formation order.
    pub fn enemy_names(&self, env: &Env<'_>) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for enemy in self.alive_members(env) {
            let name = enemy.original_name(env);
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    // ===== turns and events =====

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Advances the turn counter and re-arms per-turn event pages.
    pub fn increase_turn(&mut self, env: &Env<'_>) {
        if let Some(data) = self.data(env) {
            for (index, page) in data.pages.iter().enumerate() {
                if page.span == PageSpan::Turn {
                    self.event_flags.remove(&index);
                }
            }
        }
        self.turn_count += 1;
    }

    /// Whether every condition set on the page holds. A page without
    /// conditions never triggers.
    pub fn meets_conditions(
        &self,
        env: &Env<'_>,
        page: &TroopPage,
        party: &Party,
        switches: &Switches,
        turn_ending: bool,
    ) -> bool {
        let PageConditions {
            turn_ending: needs_turn_end,
            turn,
            enemy_hp,
            actor_hp,
            switch,
        } = page.conditions;
        if page.conditions.is_empty() {
            return false;
        }
        if needs_turn_end && !turn_ending {
            return false;
        }
        if let Some((a, b)) = turn {
            let n = self.turn_count;
            let hit = if b == 0 {
                n == a
            } else {
                n >= 1 && n >= a && n % b == a % b
            };
            if !hit {
                return false;
            }
        }
        if let Some((index, percent)) = enemy_hp {
            let below = self
                .members()
                .get(index)
                .is_some_and(|enemy| enemy.hp_rate(env) * 100.0 <= f64::from(percent));
            if !below {
                return false;
            }
        }
        if let Some((actor_id, percent)) = actor_hp {
            let below = party
                .actor(actor_id)
                .is_some_and(|actor| actor.hp_rate(env) * 100.0 <= f64::from(percent));
            if !below {
                return false;
            }
        }
        if let Some(id) = switch {
            if !switches.value(id) {
                return false;
            }
        }
        true
    }

    /// First page whose conditions hold and which has not yet run for its
    /// span. Battle and turn pages are flagged as run.
    pub fn setup_battle_event(
        &mut self,
        env: &Env<'_>,
        party: &Party,
        switches: &Switches,
        turn_ending: bool,
    ) -> Option<usize> {
        let data = self.data(env)?;
        let index = data.pages.iter().enumerate().position(|(index, page)| {
            !self.event_flags.contains(&index)
                && self.meets_conditions(env, page, party, switches, turn_ending)
        })?;
        if data.pages[index].span != PageSpan::Moment {
            self.event_flags.insert(index);
        }
        debug!(troop = %self.troop_id, page = index, "battle event triggered");
        Some(index)
    }

    // ===== rewards =====

    pub fn exp_total(&self, env: &Env<'_>) -> i64 {
        self.dead_members(env).iter().map(|enemy| enemy.exp(env)).sum()
    }

    /// Gold of defeated enemies, doubled by the gold-double ability.
    pub fn gold_total(&self, env: &Env<'_>, abilities: PartyAbilities) -> i64 {
        let gold: i64 = self.dead_members(env).iter().map(|enemy| enemy.gold(env)).sum();
        if abilities.contains(PartyAbilities::GOLD_DOUBLE) {
            gold * 2
        } else {
            gold
        }
    }

    /// Drops of defeated enemies; the drop-item-double ability doubles every
    /// chance.
    pub fn make_drop_items(
        &self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        abilities: PartyAbilities,
    ) -> Vec<ItemRef> {
        let rate = if abilities.contains(PartyAbilities::DROP_ITEM_DOUBLE) {
            2.0
        } else {
            1.0
        };
        self.dead_members(env)
            .iter()
            .flat_map(|enemy| enemy.make_drop_items(env, &mut *rng, rate))
            .collect()
    }

    // ===== battle =====

    /// Chooses actions for every enemy.
    pub fn make_actions(
        &mut self,
        env: &Env<'_>,
        rng: &mut dyn RandomSource,
        party_level: i32,
        switches: &Switches,
    ) {
        let ai = AiContext {
            troop_turn: self.turn_count,
            party_level,
            switches,
        };
        for enemy in &mut self.enemies {
            enemy.make_actions(env, rng, &ai);
        }
    }
}

impl Unit for Troop {
    type Member = Enemy;

    fn members(&self) -> Vec<&Enemy> {
        self.enemies.iter().collect()
    }

    fn members_mut(&mut self) -> Vec<&mut Enemy> {
        self.enemies.iter_mut().collect()
    }

    fn in_battle(&self) -> bool {
        self.in_battle
    }

    fn set_in_battle(&mut self, in_battle: bool) {
        self.in_battle = in_battle;
    }
}
