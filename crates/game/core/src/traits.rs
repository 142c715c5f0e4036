//! Trait records and the aggregator that answers categorized queries over them.
//!
//! A battler's stats are never stored directly. Every query gathers the
//! battler's current trait sources (definition, class, equipment, active
//! states) into a [`TraitSet`] and combines the matching records with the rule
//! that belongs to the trait category:
//!
//! | Shape       | Rule                         | Typical codes                       |
//! |-------------|------------------------------|-------------------------------------|
//! | `sum`       | arithmetic sum               | XParam, AttackState, AttackTimes    |
//! | `product`   | product seeded at 1          | ElementRate, StateRate, Param       |
//! | `set`       | deduplicated data ids        | StateResist, EquipWeaponType        |
//! | `max`/`any` | strongest id / presence      | SlotType, CollapseType, SpecialFlag |
//!
//! Sets are rebuilt on every query, so equipment or state changes are visible
//! immediately without invalidation.

use std::collections::BTreeSet;

use bitflags::bitflags;

/// Trait category. Determines which combination rule applies.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TraitCode {
    /// Damage multiplier for an element (product).
    ElementRate,
    /// Success multiplier for debuffs on a parameter (product).
    DebuffRate,
    /// Success multiplier for inflicting a state (product).
    StateRate,
    /// State that can never be added (set).
    StateResist,
    /// Base parameter multiplier (product).
    Param,
    /// Secondary additive rate (sum).
    XParam,
    /// Tertiary multiplicative rate (product).
    SParam,
    AttackElement,
    /// State inflicted by normal attacks; value is the chance (sum per state).
    AttackState,
    AttackSpeed,
    AttackTimes,
    /// Replacement skill for the attack command (max).
    AttackSkill,
    SkillTypeAdd,
    SkillTypeSeal,
    SkillAdd,
    SkillSeal,
    EquipWeaponType,
    EquipArmorType,
    EquipLock,
    EquipSeal,
    /// 1 = dual wield (max).
    SlotType,
    /// Probability of one extra action (value list).
    ActionPlus,
    SpecialFlag,
    CollapseType,
    PartyAbility,
}

/// A tagged numeric contribution emitted by a trait source.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trait {
    pub code: TraitCode,
    pub data_id: u32,
    pub value: f64,
}

impl Trait {
    pub const fn new(code: TraitCode, data_id: u32, value: f64) -> Self {
        Self {
            code,
            data_id,
            value,
        }
    }

    /// Trait whose meaning is carried entirely by its data id.
    pub const fn flag(code: TraitCode, data_id: u32) -> Self {
        Self::new(code, data_id, 1.0)
    }
}

/// Anything that contributes traits to a battler.
pub trait TraitSource {
    fn traits(&self) -> &[Trait];
}

impl TraitSource for Vec<Trait> {
    fn traits(&self) -> &[Trait] {
        self
    }
}

/// Snapshot of the sources currently applying to one battler.
#[derive(Clone, Default)]
pub struct TraitSet<'a> {
    sources: Vec<&'a dyn TraitSource>,
}

impl<'a> TraitSet<'a> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn push(&mut self, source: &'a dyn TraitSource) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Every trait record across all sources, in source order.
    pub fn all(&self) -> impl Iterator<Item = &'a Trait> + '_ {
        self.sources.iter().flat_map(|source| source.traits().iter())
    }

    pub fn traits(&self, code: TraitCode) -> impl Iterator<Item = &'a Trait> + '_ {
        self.all().filter(move |t| t.code == code)
    }

    pub fn traits_with_id(
        &self,
        code: TraitCode,
        data_id: u32,
    ) -> impl Iterator<Item = &'a Trait> + '_ {
        self.traits(code).filter(move |t| t.data_id == data_id)
    }

    pub fn sum(&self, code: TraitCode, data_id: u32) -> f64 {
        self.traits_with_id(code, data_id).map(|t| t.value).sum()
    }

    pub fn sum_all(&self, code: TraitCode) -> f64 {
        self.traits(code).map(|t| t.value).sum()
    }

    pub fn product(&self, code: TraitCode, data_id: u32) -> f64 {
        self.traits_with_id(code, data_id)
            .fold(1.0, |acc, t| acc * t.value)
    }

    pub fn set(&self, code: TraitCode) -> BTreeSet<u32> {
        self.traits(code).map(|t| t.data_id).collect()
    }

    /// Largest data id carried by the code, if any trait matches.
    pub fn max(&self, code: TraitCode) -> Option<u32> {
        self.traits(code).map(|t| t.data_id).max()
    }

    pub fn any(&self, code: TraitCode, data_id: u32) -> bool {
        self.traits_with_id(code, data_id).next().is_some()
    }

    pub fn values(&self, code: TraitCode) -> Vec<f64> {
        self.traits(code).map(|t| t.value).collect()
    }

    fn flag_bits(&self, code: TraitCode) -> u32 {
        self.traits(code)
            .filter(|t| t.data_id < u32::BITS)
            .fold(0, |bits, t| bits | (1 << t.data_id))
    }

    pub fn special_flags(&self) -> SpecialFlags {
        SpecialFlags::from_bits_truncate(self.flag_bits(TraitCode::SpecialFlag))
    }

    pub fn party_abilities(&self) -> PartyAbilities {
        PartyAbilities::from_bits_truncate(self.flag_bits(TraitCode::PartyAbility))
    }
}

bitflags! {
    /// Behaviour flags granted by `SpecialFlag` traits (bit = data id).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SpecialFlags: u32 {
        const AUTO_BATTLE = 1 << 0;
        const GUARD = 1 << 1;
        const SUBSTITUTE = 1 << 2;
        const PRESERVE_TP = 1 << 3;
    }
}

bitflags! {
    /// Party-wide abilities granted by `PartyAbility` traits (bit = data id).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PartyAbilities: u32 {
        const ENCOUNTER_HALF = 1 << 0;
        const ENCOUNTER_NONE = 1 << 1;
        const CANCEL_SURPRISE = 1 << 2;
        const RAISE_PREEMPTIVE = 1 << 3;
        const GOLD_DOUBLE = 1 << 4;
        const DROP_ITEM_DOUBLE = 1 << 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> (Vec<Trait>, Vec<Trait>) {
        let class = vec![
            Trait::new(TraitCode::XParam, 0, 0.95),
            Trait::new(TraitCode::ElementRate, 2, 0.5),
            Trait::flag(TraitCode::EquipWeaponType, 1),
            Trait::flag(TraitCode::SpecialFlag, 2),
        ];
        let state = vec![
            Trait::new(TraitCode::XParam, 0, -0.25),
            Trait::new(TraitCode::ElementRate, 2, 2.0),
            Trait::new(TraitCode::ElementRate, 3, 1.5),
            Trait::flag(TraitCode::EquipWeaponType, 1),
            Trait::flag(TraitCode::EquipWeaponType, 4),
            Trait::flag(TraitCode::SlotType, 1),
        ];
        (class, state)
    }

    #[test]
    fn combinators_follow_category_rules() {
        let (class, state) = sources();
        let mut set = TraitSet::new();
        set.push(&class);
        set.push(&state);

        assert!((set.sum(TraitCode::XParam, 0) - 0.70).abs() < 1e-9);
        assert!((set.product(TraitCode::ElementRate, 2) - 1.0).abs() < 1e-9);
        assert!((set.product(TraitCode::ElementRate, 3) - 1.5).abs() < 1e-9);
        assert_eq!(set.product(TraitCode::ElementRate, 9), 1.0);
        assert_eq!(
            set.set(TraitCode::EquipWeaponType).into_iter().collect::<Vec<_>>(),
            vec![1, 4]
        );
        assert_eq!(set.max(TraitCode::SlotType), Some(1));
        assert_eq!(set.max(TraitCode::CollapseType), None);
        assert!(set.any(TraitCode::SpecialFlag, 2));
        assert_eq!(set.special_flags(), SpecialFlags::SUBSTITUTE);
    }

    #[test]
    fn empty_set_is_neutral() {
        let set = TraitSet::new();
        assert!(set.is_empty());
        assert_eq!(set.sum_all(TraitCode::AttackTimes), 0.0);
        assert_eq!(set.product(TraitCode::SParam, 0), 1.0);
        assert!(set.set(TraitCode::StateResist).is_empty());
        assert_eq!(set.party_abilities(), PartyAbilities::empty());
    }
}
