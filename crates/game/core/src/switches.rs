use std::collections::BTreeSet;

use crate::ids::SwitchId;

/// Live game flags read by enemy action conditions and troop event pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Switches {
    on: BTreeSet<SwitchId>,
}

impl Switches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: SwitchId) -> bool {
        self.on.contains(&id)
    }

    pub fn set_value(&mut self, id: SwitchId, value: bool) {
        if id.is_none() {
            return;
        }
        if value {
            self.on.insert(id);
        } else {
            self.on.remove(&id);
        }
    }

    pub fn clear(&mut self) {
        self.on.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_flags() {
        let mut switches = Switches::new();
        switches.set_value(SwitchId(3), true);
        assert!(switches.value(SwitchId(3)));
        switches.set_value(SwitchId(3), false);
        assert!(!switches.value(SwitchId(3)));
        switches.set_value(SwitchId::NONE, true);
        assert!(!switches.value(SwitchId::NONE));
    }
}
