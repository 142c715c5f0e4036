use crate::ids::{ActorId, EquipTypeId};

/// Catalogues shared by all content. Index 0 of each catalogue is reserved.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SystemData {
    pub equip_types: Vec<String>,
    pub elements: Vec<String>,
    pub skill_types: Vec<String>,
    pub weapon_types: Vec<String>,
    pub armor_types: Vec<String>,
    /// Starting roster in formation order.
    pub party_members: Vec<ActorId>,
}

impl SystemData {
    /// Equip type ids in slot order: `1..equip_types.len()`.
    pub fn equip_type_ids(&self) -> impl Iterator<Item = EquipTypeId> {
        1..self.equip_types.len().max(1) as EquipTypeId
    }
}

impl Default for SystemData {
    fn default() -> Self {
        let catalogue = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            equip_types: catalogue(&["", "Weapon", "Shield", "Head", "Body", "Accessory"]),
            elements: catalogue(&["", "Physical", "Fire", "Ice", "Thunder"]),
            skill_types: catalogue(&["", "Magic", "Special"]),
            weapon_types: catalogue(&["", "Dagger", "Sword", "Flail", "Axe"]),
            armor_types: catalogue(&["", "General Armor", "Magic Armor", "Light Armor"]),
            party_members: Vec::new(),
        }
    }
}
