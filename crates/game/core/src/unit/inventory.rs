//! Party-owned possessions: item counts, gold and step counter.

use std::collections::BTreeMap;

use tracing::trace;

use crate::config::BattleConfig;
use crate::ids::{ArmorId, ItemId, WeaponId};
use crate::item::{EquipItem, ItemRef};

/// Possession ledger.
///
/// Counts are clamped to `[0, max_items]` and zero entries are dropped, so
/// [`Inventory::items`] only yields held kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Inventory {
    gold: i64,
    steps: u64,
    items: BTreeMap<ItemId, i32>,
    weapons: BTreeMap<WeaponId, i32>,
    armors: BTreeMap<ArmorId, i32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== gold =====

    pub fn gold(&self) -> i64 {
        self.gold
    }

    pub fn gain_gold(&mut self, config: &BattleConfig, amount: i64) {
        self.gold = self.gold.saturating_add(amount).clamp(0, config.max_gold);
    }

    pub fn lose_gold(&mut self, config: &BattleConfig, amount: i64) {
        self.gain_gold(config, -amount);
    }

    // ===== steps =====

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn increase_steps(&mut self) {
        self.steps += 1;
    }

    // ===== items =====

    /// Held count; skills are never held.
    pub fn num_items(&self, item: ItemRef) -> i32 {
        match item {
            ItemRef::Skill(_) => 0,
            ItemRef::Item(id) => self.items.get(&id).copied().unwrap_or(0),
            ItemRef::Weapon(id) => self.weapons.get(&id).copied().unwrap_or(0),
            ItemRef::Armor(id) => self.armors.get(&id).copied().unwrap_or(0),
        }
    }

    pub fn has_item(&self, item: ItemRef) -> bool {
        self.num_items(item) > 0
    }

    pub fn has_max_items(&self, config: &BattleConfig, item: ItemRef) -> bool {
        self.num_items(item) >= config.max_items
    }

    /// Adds (or with a negative amount removes) items, clamping the count.
    ///
    /// Returns the shortfall: how many more items were requested to be
    /// removed than were held. Callers use it to strip equipped copies.
    pub fn gain(&mut self, config: &BattleConfig, item: ItemRef, amount: i32) -> i32 {
        let last = self.num_items(item);
        let requested = last.saturating_add(amount);
        let clamped = requested.clamp(0, config.max_items);
        match item {
            ItemRef::Skill(_) => return 0,
            ItemRef::Item(id) => store(&mut self.items, id, clamped),
            ItemRef::Weapon(id) => store(&mut self.weapons, id, clamped),
            ItemRef::Armor(id) => store(&mut self.armors, id, clamped),
        }
        trace!(?item, from = last, to = clamped, "inventory count changed");
        (-requested).max(0)
    }

    pub fn lose(&mut self, config: &BattleConfig, item: ItemRef, amount: i32) -> i32 {
        self.gain(config, item, -amount)
    }

    /// Every held kind with its count: items, then weapons, then armors.
    pub fn items(&self) -> impl Iterator<Item = (ItemRef, i32)> + '_ {
        let items = self.items.iter().map(|(id, n)| (ItemRef::Item(*id), *n));
        let weapons = self.weapons.iter().map(|(id, n)| (ItemRef::Weapon(*id), *n));
        let armors = self.armors.iter().map(|(id, n)| (ItemRef::Armor(*id), *n));
        items.chain(weapons).chain(armors)
    }

    pub fn equip_items(&self) -> impl Iterator<Item = EquipItem> + '_ {
        let weapons = self.weapons.keys().map(|id| EquipItem::Weapon(*id));
        let armors = self.armors.keys().map(|id| EquipItem::Armor(*id));
        weapons.chain(armors)
    }
}

fn store<K: Ord>(table: &mut BTreeMap<K, i32>, id: K, count: i32) {
    if count == 0 {
        table.remove(&id);
    } else {
        table.insert(id, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SkillId;

    #[test]
    fn counts_are_clamped() {
        let config = BattleConfig::default();
        let mut inventory = Inventory::new();
        let potion = ItemRef::Item(ItemId(1));

        assert_eq!(inventory.gain(&config, potion, 150), 0);
        assert_eq!(inventory.num_items(potion), 99);
        assert!(inventory.has_max_items(&config, potion));

        assert_eq!(inventory.lose(&config, potion, 101), 2);
        assert_eq!(inventory.num_items(potion), 0);
        assert_eq!(inventory.items().count(), 0);
    }

    #[test]
    fn skills_are_never_held() {
        let config = BattleConfig::default();
        let mut inventory = Inventory::new();
        inventory.gain(&config, ItemRef::Skill(SkillId(3)), 5);
        assert!(!inventory.has_item(ItemRef::Skill(SkillId(3))));
    }

    #[test]
    fn gold_is_clamped() {
        let config = BattleConfig {
            max_gold: 1000,
            ..Default::default()
        };
        let mut inventory = Inventory::new();
        inventory.gain_gold(&config, 5000);
        assert_eq!(inventory.gold(), 1000);
        inventory.lose_gold(&config, 4000);
        assert_eq!(inventory.gold(), 0);
    }

    #[test]
    fn lists_kinds_in_order() {
        let config = BattleConfig::default();
        let mut inventory = Inventory::new();
        inventory.gain(&config, ItemRef::Armor(ArmorId(2)), 1);
        inventory.gain(&config, ItemRef::Weapon(WeaponId(4)), 2);
        inventory.gain(&config, ItemRef::Item(ItemId(9)), 3);
        let kinds: Vec<_> = inventory.items().collect();
        assert_eq!(
            kinds,
            vec![
                (ItemRef::Item(ItemId(9)), 3),
                (ItemRef::Weapon(WeaponId(4)), 2),
                (ItemRef::Armor(ArmorId(2)), 1),
            ]
        );
        assert_eq!(inventory.equip_items().count(), 2);
    }
}
