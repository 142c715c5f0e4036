use crate::config::BattleConfig;
use crate::ids::{ActorId, ClassId, SkillId};
use crate::stats::ParamId;
use crate::traits::{Trait, TraitSource};

/// Actor definition: identity, starting class/level and initial equipment.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActorData {
    pub id: ActorId,
    pub name: String,
    pub nickname: String,
    pub profile: String,
    pub class_id: ClassId,
    pub initial_level: i32,
    pub max_level: i32,
    /// Initial item id per equipment slot (0 = empty). Slot 0 is always a
    /// weapon; the remaining slots follow the equip-type catalogue.
    pub equips: Vec<u32>,
    pub traits: Vec<Trait>,
    pub face_name: String,
    pub face_index: u32,
    pub character_name: String,
    pub character_index: u32,
    pub battler_name: String,
}

impl TraitSource for ActorData {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
}

/// Four tunable constants of the experience curve.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpCurve {
    pub basis: f64,
    pub extra: f64,
    pub acceleration_a: f64,
    pub acceleration_b: f64,
}

impl ExpCurve {
    pub const fn new(basis: f64, extra: f64, acceleration_a: f64, acceleration_b: f64) -> Self {
        Self {
            basis,
            extra,
            acceleration_a,
            acceleration_b,
        }
    }

    /// Total experience required to reach `level`.
    ///
    /// `round(basis·L·(L+1)·(L-1)^(0.9+a/250) / (6 + L²/(50·b)) + (L-1)·extra)`
    pub fn exp_for_level(&self, level: i32) -> i64 {
        let level = f64::from(level);
        let growth = (level - 1.0).max(0.0).powf(0.9 + self.acceleration_a / 250.0);
        let divisor = 6.0 + level * level / 50.0 / self.acceleration_b;
        let value =
            self.basis * growth * level * (level + 1.0) / divisor + (level - 1.0) * self.extra;
        value.round() as i64
    }
}

impl Default for ExpCurve {
    fn default() -> Self {
        Self::new(30.0, 20.0, 30.0, 30.0)
    }
}

/// Skill learned when the class reaches `level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Learning {
    pub level: i32,
    pub skill_id: SkillId,
}

/// Class definition: parameter curves, experience curve and learnings.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClassData {
    pub id: ClassId,
    pub name: String,
    pub exp_curve: ExpCurve,
    /// Parameter value per level, indexed `[param][level]`.
    pub params: [Vec<i32>; BattleConfig::PARAM_COUNT],
    pub learnings: Vec<Learning>,
    pub traits: Vec<Trait>,
}

impl ClassData {
    /// Base value of `param` at `level`. Levels past the table reuse its last
    /// entry; an empty curve yields 0.
    pub fn param(&self, param: ParamId, level: i32) -> i32 {
        let curve = &self.params[param.index()];
        let index = usize::try_from(level.max(0)).unwrap_or(0);
        curve
            .get(index)
            .or_else(|| curve.last())
            .copied()
            .unwrap_or(0)
    }

    /// Builds a linear curve `start + per_level × level` up to `max_level`.
    pub fn linear_params(start: [i32; 8], per_level: [i32; 8], max_level: i32) -> [Vec<i32>; 8] {
        std::array::from_fn(|p| {
            (0..=max_level)
                .map(|level| start[p] + per_level[p] * level)
                .collect()
        })
    }
}

impl TraitSource for ClassData {
    fn traits(&self) -> &[Trait] {
        &self.traits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_matches_reference_values() {
        let curve = ExpCurve::default();
        let values: Vec<i64> = (1..=7).map(|l| curve.exp_for_level(l)).collect();
        assert_eq!(values, vec![0, 50, 162, 366, 695, 1180, 1852]);
    }

    #[test]
    fn linear_curve_is_extra_only() {
        let curve = ExpCurve::new(0.0, 250.0, 30.0, 30.0);
        assert_eq!(curve.exp_for_level(5), 1000);
        assert_eq!(curve.exp_for_level(6), 1250);
    }

    #[test]
    fn param_lookup_clamps_to_table() {
        let class = ClassData {
            params: ClassData::linear_params([100, 20, 10, 10, 10, 10, 10, 10], [10; 8], 5),
            ..Default::default()
        };
        assert_eq!(class.param(ParamId::Mhp, 1), 110);
        assert_eq!(class.param(ParamId::Mhp, 5), 150);
        assert_eq!(class.param(ParamId::Mhp, 40), 150);
        assert_eq!(ClassData::default().param(ParamId::Atk, 3), 0);
    }
}
