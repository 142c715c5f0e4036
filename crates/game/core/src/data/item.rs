use crate::config::BattleConfig;
use crate::ids::{ArmorId, ArmorTypeId, EquipTypeId, ItemId, SkillId, SkillTypeId, WeaponId, WeaponTypeId};
use crate::stats::ParamId;
use crate::traits::{Trait, TraitSource};

/// Where a skill or consumable may be used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occasion {
    #[default]
    Always,
    BattleOnly,
    MenuOnly,
    Never,
}

impl Occasion {
    pub const fn allows(self, in_battle: bool) -> bool {
        match self {
            Self::Always => true,
            Self::BattleOnly => in_battle,
            Self::MenuOnly => !in_battle,
            Self::Never => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillData {
    pub id: SkillId,
    pub name: String,
    pub icon_index: u32,
    pub stype_id: SkillTypeId,
    pub mp_cost: i32,
    pub tp_cost: i32,
    pub occasion: Occasion,
    /// Initiative modifier; negative values add TPB cast time.
    pub speed: i32,
    /// Weapon types of which at least one must be equipped (0 = no requirement).
    pub required_wtype_ids: [WeaponTypeId; 2],
    /// Skills flagged as magic mark their user as chanting while queued.
    pub magical: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemData {
    pub id: ItemId,
    pub name: String,
    pub icon_index: u32,
    pub consumable: bool,
    pub occasion: Occasion,
    pub speed: i32,
    pub price: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeaponData {
    pub id: WeaponId,
    pub name: String,
    pub icon_index: u32,
    pub etype_id: EquipTypeId,
    pub wtype_id: WeaponTypeId,
    /// Flat bonus per base parameter.
    pub params: [i32; BattleConfig::PARAM_COUNT],
    pub traits: Vec<Trait>,
    pub price: u32,
}

impl WeaponData {
    pub fn param(&self, param: ParamId) -> i32 {
        self.params[param.index()]
    }
}

impl TraitSource for WeaponData {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArmorData {
    pub id: ArmorId,
    pub name: String,
    pub icon_index: u32,
    pub etype_id: EquipTypeId,
    pub atype_id: ArmorTypeId,
    pub params: [i32; BattleConfig::PARAM_COUNT],
    pub traits: Vec<Trait>,
    pub price: u32,
}

impl ArmorData {
    pub fn param(&self, param: ParamId) -> i32 {
        self.params[param.index()]
    }
}

impl TraitSource for ArmorData {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
}
