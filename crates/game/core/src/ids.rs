//! Typed identifiers for content definitions and live flags.
//!
//! Content tables are indexed from 1; id 0 is reserved and never resolves to a
//! definition. Trait records carry raw `u32` data ids because a single trait
//! code may reference elements, states, skill types or parameters.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            /// Reserved id that never resolves to a definition.
            pub const NONE: Self = Self(0);

            #[inline]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn get(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Actor definition and live actor identity.
    ActorId,
    "actor"
);
define_id!(
    /// Class definition (parameter curves, experience curve, learnings).
    ClassId,
    "class"
);
define_id!(
    /// Skill definition.
    SkillId,
    "skill"
);
define_id!(
    /// Consumable or key item definition.
    ItemId,
    "item"
);
define_id!(
    /// Weapon definition.
    WeaponId,
    "weapon"
);
define_id!(
    /// Armor definition.
    ArmorId,
    "armor"
);
define_id!(
    /// State (condition) definition.
    StateId,
    "state"
);
define_id!(
    /// Enemy definition.
    EnemyId,
    "enemy"
);
define_id!(
    /// Troop (encounter) definition.
    TroopId,
    "troop"
);
define_id!(
    /// Global boolean flag.
    SwitchId,
    "switch"
);

/// Equipment type id (1 = weapon, others are armor slots).
pub type EquipTypeId = u32;
/// Weapon type id referenced by traits and skill requirements.
pub type WeaponTypeId = u32;
/// Armor type id referenced by traits.
pub type ArmorTypeId = u32;
/// Skill type id referenced by traits.
pub type SkillTypeId = u32;
/// Element id referenced by traits.
pub type ElementId = u32;

/// Equipment type reserved for weapons.
pub const WEAPON_EQUIP_TYPE: EquipTypeId = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_id_is_zero() {
        assert!(StateId::NONE.is_none());
        assert!(!StateId::new(1).is_none());
        assert_eq!(ActorId::from(4).get(), 4);
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(SkillId(12).to_string(), "skill#12");
    }
}
