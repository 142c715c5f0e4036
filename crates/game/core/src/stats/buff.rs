//! Buff and debuff levels with their countdown timers.

use crate::config::BattleConfig;

use super::params::ParamId;

const N: usize = BattleConfig::PARAM_COUNT;

/// Per-parameter buff level in `[-2, 2]` and remaining turns.
///
/// Timers are only meaningful while the level is non-zero. A level of 0 is
/// treated as expired and can be erased by the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuffTable {
    levels: [i32; N],
    turns: [i32; N],
}

impl BuffTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn level(&self, param: ParamId) -> i32 {
        self.levels[param.index()]
    }

    pub fn turns(&self, param: ParamId) -> i32 {
        self.turns[param.index()]
    }

    pub fn is_buff_affected(&self, param: ParamId) -> bool {
        self.level(param) > 0
    }

    pub fn is_debuff_affected(&self, param: ParamId) -> bool {
        self.level(param) < 0
    }

    pub fn is_affected(&self, param: ParamId) -> bool {
        self.level(param) != 0
    }

    pub fn is_max_buff_affected(&self, param: ParamId) -> bool {
        self.level(param) == BattleConfig::MAX_BUFF_LEVEL
    }

    pub fn is_max_debuff_affected(&self, param: ParamId) -> bool {
        self.level(param) == -BattleConfig::MAX_BUFF_LEVEL
    }

    pub fn increase(&mut self, param: ParamId) {
        if !self.is_max_buff_affected(param) {
            self.levels[param.index()] += 1;
        }
    }

    pub fn decrease(&mut self, param: ParamId) {
        if !self.is_max_debuff_affected(param) {
            self.levels[param.index()] -= 1;
        }
    }

    /// Keeps the longer of the remaining and the newly applied duration.
    pub fn overwrite_turns(&mut self, param: ParamId, turns: i32) {
        let slot = &mut self.turns[param.index()];
        if *slot < turns {
            *slot = turns;
        }
    }

    pub fn erase(&mut self, param: ParamId) {
        self.levels[param.index()] = 0;
        self.turns[param.index()] = 0;
    }

    pub fn is_expired(&self, param: ParamId) -> bool {
        self.turns(param) == 0
    }

    /// Counts every running timer down by one, never below zero.
    pub fn update_turns(&mut self) {
        for turns in self.turns.iter_mut().filter(|t| **t > 0) {
            *turns -= 1;
        }
    }

    /// Multiplier applied to the parameter: `1.0 + 0.25 × level`.
    pub fn rate(&self, param: ParamId) -> f64 {
        f64::from(self.level(param)) * 0.25 + 1.0
    }

    /// Icon for the current level, or `None` while unbuffed.
    pub fn icon_index(&self, param: ParamId) -> Option<u32> {
        let level = self.level(param);
        let offset = param.index() as u32;
        match level {
            0 => None,
            l if l > 0 => Some(BattleConfig::ICON_BUFF_START + (l as u32 - 1) * N as u32 + offset),
            l => Some(BattleConfig::ICON_DEBUFF_START + (l.unsigned_abs() - 1) * N as u32 + offset),
        }
    }

    /// Parameters with a non-zero level, in parameter order.
    pub fn active(&self) -> impl Iterator<Item = ParamId> + '_ {
        ParamId::all().filter(|p| self.is_affected(*p))
    }
}
