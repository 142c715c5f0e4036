use crate::ids::StateId;
use crate::stats::ParamId;

/// What happened to a battler during the current action.
///
/// Filled by state, buff and resource operations, read by the presentation
/// layer, and cleared at action, turn and battle boundaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BattlerResult {
    pub used: bool,
    pub missed: bool,
    pub evaded: bool,
    pub critical: bool,
    pub hp_affected: bool,
    pub hp_damage: i32,
    pub mp_damage: i32,
    pub tp_damage: i32,
    pub added_states: Vec<StateId>,
    pub removed_states: Vec<StateId>,
    pub added_buffs: Vec<ParamId>,
    pub added_debuffs: Vec<ParamId>,
    pub removed_buffs: Vec<ParamId>,
}

impl BattlerResult {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_hit(&self) -> bool {
        self.used && !self.missed && !self.evaded
    }

    pub fn is_status_affected(&self) -> bool {
        !self.added_states.is_empty()
            || !self.removed_states.is_empty()
            || !self.added_buffs.is_empty()
            || !self.added_debuffs.is_empty()
            || !self.removed_buffs.is_empty()
    }

    pub fn push_added_state(&mut self, id: StateId) {
        if !self.added_states.contains(&id) {
            self.added_states.push(id);
        }
    }

    pub fn push_removed_state(&mut self, id: StateId) {
        if !self.removed_states.contains(&id) {
            self.removed_states.push(id);
        }
    }

    pub fn push_added_buff(&mut self, param: ParamId) {
        if !self.added_buffs.contains(&param) {
            self.added_buffs.push(param);
        }
    }

    pub fn push_added_debuff(&mut self, param: ParamId) {
        if !self.added_debuffs.contains(&param) {
            self.added_debuffs.push(param);
        }
    }

    pub fn push_removed_buff(&mut self, param: ParamId) {
        if !self.removed_buffs.contains(&param) {
            self.removed_buffs.push(param);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_deduplicated() {
        let mut result = BattlerResult::default();
        result.push_added_state(StateId(4));
        result.push_added_state(StateId(4));
        result.push_added_buff(ParamId::Atk);
        assert_eq!(result.added_states, vec![StateId(4)]);
        assert!(result.is_status_affected());
        result.clear();
        assert!(!result.is_status_affected());
    }
}
