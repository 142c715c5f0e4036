//! Parameter identifiers for the three stat tiers.

use strum::{EnumCount, IntoEnumIterator};

/// Base parameters. The discriminant is the trait data id and array index.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum ParamId {
    /// Maximum hit points.
    Mhp = 0,
    /// Maximum magic points.
    Mmp = 1,
    Atk = 2,
    Def = 3,
    Mat = 4,
    Mdf = 5,
    Agi = 6,
    Luk = 7,
}

impl ParamId {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Lowest value `param` may return: max hp never drops below 1.
    pub const fn min_value(self) -> i32 {
        match self {
            Self::Mhp => 1,
            _ => 0,
        }
    }
}

const _: () = assert!(ParamId::COUNT == crate::config::BattleConfig::PARAM_COUNT);

/// Secondary parameters, combined by summing `XParam` traits.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum XParamId {
    /// Hit rate.
    Hit = 0,
    /// Evasion rate.
    Eva = 1,
    /// Critical rate.
    Cri = 2,
    /// Critical evasion rate.
    Cev = 3,
    /// Magic evasion rate.
    Mev = 4,
    /// Magic reflection rate.
    Mrf = 5,
    /// Counter attack rate.
    Cnt = 6,
    /// Hp regeneration rate.
    Hrg = 7,
    /// Mp regeneration rate.
    Mrg = 8,
    /// Tp regeneration rate.
    Trg = 9,
}

impl XParamId {
    pub const fn data_id(self) -> u32 {
        self as u32
    }
}

/// Tertiary parameters, combined by multiplying `SParam` traits.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "lowercase")]
pub enum SParamId {
    /// Target rate.
    Tgr = 0,
    /// Guard effect rate.
    Grd = 1,
    /// Recovery effect rate.
    Rec = 2,
    /// Pharmacology.
    Pha = 3,
    /// Mp cost rate.
    Mcr = 4,
    /// Tp charge rate.
    Tcr = 5,
    /// Physical damage rate.
    Pdr = 6,
    /// Magic damage rate.
    Mdr = 7,
    /// Floor damage rate.
    Fdr = 8,
    /// Experience rate.
    Exr = 9,
}

impl SParamId {
    pub const fn data_id(self) -> u32 {
        self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_indices_are_stable() {
        let ids: Vec<usize> = ParamId::all().map(ParamId::index).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
        assert_eq!(ParamId::from_index(6), Some(ParamId::Agi));
        assert_eq!(ParamId::from_index(8), None);
    }

    #[test]
    fn only_max_hp_has_a_floor() {
        assert_eq!(ParamId::Mhp.min_value(), 1);
        assert_eq!(ParamId::Luk.min_value(), 0);
        assert_eq!(XParamId::COUNT, 10);
        assert_eq!(SParamId::Exr.data_id(), 9);
        assert_eq!(ParamId::Agi.to_string(), "agi");
    }
}
