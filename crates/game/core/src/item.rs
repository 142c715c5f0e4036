//! Lightweight references to content items.
//!
//! Live state never holds definitions directly; it stores an [`ItemRef`] (or
//! an [`EquipItem`] for equipment slots) and resolves it through the content
//! oracle when details are needed.

use crate::data::{ArmorData, ItemData, SkillData, WeaponData};
use crate::env::ContentOracle;
use crate::ids::{ArmorId, EquipTypeId, ItemId, SkillId, WeaponId};
use crate::stats::ParamId;
use crate::traits::TraitSource;

/// Kind plus id of any usable or equippable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemRef {
    Skill(SkillId),
    Item(ItemId),
    Weapon(WeaponId),
    Armor(ArmorId),
}

impl ItemRef {
    pub const fn is_skill(self) -> bool {
        matches!(self, Self::Skill(_))
    }

    pub const fn is_item(self) -> bool {
        matches!(self, Self::Item(_))
    }

    pub const fn is_equip(self) -> bool {
        matches!(self, Self::Weapon(_) | Self::Armor(_))
    }

    pub const fn as_equip(self) -> Option<EquipItem> {
        match self {
            Self::Weapon(id) => Some(EquipItem::Weapon(id)),
            Self::Armor(id) => Some(EquipItem::Armor(id)),
            _ => None,
        }
    }

    /// Resolves the reference; `None` when the definition does not exist.
    pub fn resolve<'a>(self, content: &'a dyn ContentOracle) -> Option<ItemObject<'a>> {
        match self {
            Self::Skill(id) => content.skill(id).map(ItemObject::Skill),
            Self::Item(id) => content.item(id).map(ItemObject::Item),
            Self::Weapon(id) => content.weapon(id).map(ItemObject::Weapon),
            Self::Armor(id) => content.armor(id).map(ItemObject::Armor),
        }
    }
}

/// Occupant of an equipment slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipItem {
    Weapon(WeaponId),
    Armor(ArmorId),
}

impl EquipItem {
    pub const fn is_weapon(self) -> bool {
        matches!(self, Self::Weapon(_))
    }

    pub fn resolve<'a>(self, content: &'a dyn ContentOracle) -> Option<EquipObject<'a>> {
        match self {
            Self::Weapon(id) => content.weapon(id).map(EquipObject::Weapon),
            Self::Armor(id) => content.armor(id).map(EquipObject::Armor),
        }
    }
}

impl From<EquipItem> for ItemRef {
    fn from(item: EquipItem) -> Self {
        match item {
            EquipItem::Weapon(id) => ItemRef::Weapon(id),
            EquipItem::Armor(id) => ItemRef::Armor(id),
        }
    }
}

/// A resolved definition of any kind.
#[derive(Clone, Copy, Debug)]
pub enum ItemObject<'a> {
    Skill(&'a SkillData),
    Item(&'a ItemData),
    Weapon(&'a WeaponData),
    Armor(&'a ArmorData),
}

impl ItemObject<'_> {
    pub fn name(&self) -> &str {
        match self {
            Self::Skill(data) => &data.name,
            Self::Item(data) => &data.name,
            Self::Weapon(data) => &data.name,
            Self::Armor(data) => &data.name,
        }
    }

    pub fn icon_index(&self) -> u32 {
        match self {
            Self::Skill(data) => data.icon_index,
            Self::Item(data) => data.icon_index,
            Self::Weapon(data) => data.icon_index,
            Self::Armor(data) => data.icon_index,
        }
    }

    /// Initiative modifier of usable items; equipment has none.
    pub fn speed(&self) -> i32 {
        match self {
            Self::Skill(data) => data.speed,
            Self::Item(data) => data.speed,
            _ => 0,
        }
    }
}

/// A resolved equipment definition.
#[derive(Clone, Copy, Debug)]
pub enum EquipObject<'a> {
    Weapon(&'a WeaponData),
    Armor(&'a ArmorData),
}

impl<'a> EquipObject<'a> {
    pub fn etype_id(&self) -> EquipTypeId {
        match self {
            Self::Weapon(data) => data.etype_id,
            Self::Armor(data) => data.etype_id,
        }
    }

    pub fn param(&self, param: ParamId) -> i32 {
        match self {
            Self::Weapon(data) => data.param(param),
            Self::Armor(data) => data.param(param),
        }
    }

    /// Sum of flat parameter bonuses; used to rank candidates when optimizing.
    pub fn performance(&self) -> i32 {
        ParamId::all().map(|p| self.param(p)).sum()
    }

    pub fn as_trait_source(&self) -> &'a dyn TraitSource {
        match *self {
            Self::Weapon(data) => data,
            Self::Armor(data) => data,
        }
    }
}
