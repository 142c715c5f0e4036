use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::env::Env;
use crate::ids::StateId;
use crate::stats::{BuffTable, ParamId};

use super::action::{ActionState, BattleAction};
use super::result::BattlerResult;
use super::tpb::TpbGauge;

pub type ActionQueue = ArrayVec<BattleAction, { BattleConfig::MAX_ACTIONS }>;

/// Mutable combat state shared by actors and enemies.
///
/// Derived stats are never stored here; see [`super::Battler`]. The fields
/// below the action queue are battle-transient and excluded from persisted
/// snapshots.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattlerCore {
    pub(crate) hp: i32,
    pub(crate) mp: i32,
    pub(crate) tp: i32,
    pub(crate) hidden: bool,
    pub(crate) param_plus: [i32; BattleConfig::PARAM_COUNT],
    /// Active states, sorted by priority (descending) then id.
    pub(crate) states: Vec<StateId>,
    /// Remaining turns; absent for states that do not expire by turn.
    pub(crate) state_turns: BTreeMap<StateId, i32>,
    pub(crate) buffs: BuffTable,

    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) actions: ActionQueue,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) action_state: ActionState,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) speed: i32,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) selected: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) last_target_index: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) tpb: TpbGauge,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) result: BattlerResult,
}

impl BattlerCore {
    /// Placeholder state; owners call `recover_all` during setup.
    pub fn new() -> Self {
        Self {
            hp: 1,
            mp: 0,
            tp: 0,
            hidden: false,
            param_plus: [0; BattleConfig::PARAM_COUNT],
            states: Vec::new(),
            state_turns: BTreeMap::new(),
            buffs: BuffTable::new(),
            actions: ArrayVec::new(),
            action_state: ActionState::default(),
            speed: 0,
            selected: false,
            last_target_index: 0,
            tpb: TpbGauge::default(),
            result: BattlerResult::default(),
        }
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn mp(&self) -> i32 {
        self.mp
    }

    pub fn tp(&self) -> i32 {
        self.tp
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn param_plus(&self, param: ParamId) -> i32 {
        self.param_plus[param.index()]
    }

    pub fn add_param(&mut self, param: ParamId, value: i32) {
        let slot = &mut self.param_plus[param.index()];
        *slot = slot.saturating_add(value);
    }

    pub fn state_ids(&self) -> &[StateId] {
        &self.states
    }

    pub fn state_turns(&self, id: StateId) -> Option<i32> {
        self.state_turns.get(&id).copied()
    }

    pub fn is_state_affected(&self, id: StateId) -> bool {
        self.states.contains(&id)
    }

    pub fn buffs(&self) -> &BuffTable {
        &self.buffs
    }

    pub fn actions(&self) -> &[BattleAction] {
        &self.actions
    }

    pub fn action_state(&self) -> ActionState {
        self.action_state
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn last_target_index(&self) -> usize {
        self.last_target_index
    }

    pub fn tpb(&self) -> &TpbGauge {
        &self.tpb
    }

    pub fn tpb_mut(&mut self) -> &mut TpbGauge {
        &mut self.tpb
    }

    pub fn result(&self) -> &BattlerResult {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut BattlerResult {
        &mut self.result
    }

    pub(crate) fn clear_states(&mut self) {
        self.states.clear();
        self.state_turns.clear();
    }

    pub(crate) fn erase_state(&mut self, id: StateId) {
        self.states.retain(|s| *s != id);
        self.state_turns.remove(&id);
    }

    /// Re-sorts active states by priority (descending), ties by id.
    pub(crate) fn sort_states(&mut self, env: &Env<'_>) {
        let priority = |id: &StateId| env.state(*id).map_or(0, |s| s.priority);
        self.states
            .sort_by(|a, b| priority(b).cmp(&priority(a)).then(a.cmp(b)));
    }

    /// Counts every finite state timer down by one, never below zero.
    pub(crate) fn update_state_turns(&mut self) {
        for turns in self.state_turns.values_mut().filter(|t| **t > 0) {
            *turns -= 1;
        }
    }

    pub(crate) fn is_state_expired(&self, id: StateId) -> bool {
        self.state_turns.get(&id) == Some(&0)
    }
}

impl Default for BattlerCore {
    fn default() -> Self {
        Self::new()
    }
}
