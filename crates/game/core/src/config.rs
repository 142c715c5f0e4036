use crate::ids::{ElementId, SkillId, StateId};

/// Battle rule configuration and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// State applied on death. Adding it zeroes hp and clears every other state.
    pub death_state_id: StateId,
    /// Skill used by the basic attack command when no trait overrides it.
    pub attack_skill_id: SkillId,
    /// Skill used by the guard command.
    pub guard_skill_id: SkillId,
    pub max_tp: i32,
    /// Number of roster slots that take part in battle.
    pub max_battle_members: usize,
    pub max_gold: i64,
    /// Possession cap per item kind.
    pub max_items: i32,
    /// Element attached to attacks of an actor with no weapon equipped.
    pub bare_hands_element_id: ElementId,
    /// When set, slip damage may reduce hp to zero.
    pub slip_death: bool,
    /// When set, reserve members receive full experience.
    pub bench_exp: bool,
    pub battle_system: BattleSystem,
    pub letter_table: LetterTable,
}

/// Turn scheduling flavour used by the external phase driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleSystem {
    /// Whole-side turns: collect every command, then execute.
    #[default]
    TurnBased,
    /// Time progress battle; gauges keep filling during command input.
    ActiveTpb,
    /// Time progress battle; gauges pause during command input.
    WaitTpb,
}

impl BattleSystem {
    pub const fn is_tpb(self) -> bool {
        matches!(self, Self::ActiveTpb | Self::WaitTpb)
    }
}

/// Alphabet used to tell same-named enemies apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LetterTable {
    #[default]
    Half,
    Full,
}

const HALF_LETTERS: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S",
    "T", "U", "V", "W", "X", "Y", "Z",
];

const FULL_LETTERS: [&str; 26] = [
    "Ａ", "Ｂ", "Ｃ", "Ｄ", "Ｅ", "Ｆ", "Ｇ", "Ｈ", "Ｉ", "Ｊ", "Ｋ", "Ｌ", "Ｍ", "Ｎ", "Ｏ", "Ｐ", "Ｑ", "Ｒ",
    "Ｓ", "Ｔ", "Ｕ", "Ｖ", "Ｗ", "Ｘ", "Ｙ", "Ｚ",
];

impl LetterTable {
    pub const fn letters(self) -> &'static [&'static str] {
        match self {
            Self::Half => &HALF_LETTERS,
            Self::Full => &FULL_LETTERS,
        }
    }
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Number of base parameters (mhp, mmp, atk, def, mat, mdf, agi, luk).
    pub const PARAM_COUNT: usize = 8;
    /// Upper bound on queued actions per battler per turn.
    pub const MAX_ACTIONS: usize = 8;
    pub const MAX_BUFF_LEVEL: i32 = 2;
    pub const ICON_BUFF_START: u32 = 32;
    pub const ICON_DEBUFF_START: u32 = 48;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_TP: i32 = 100;
    pub const DEFAULT_MAX_BATTLE_MEMBERS: usize = 4;
    pub const DEFAULT_MAX_GOLD: i64 = 99_999_999;
    pub const DEFAULT_MAX_ITEMS: i32 = 99;

    pub fn new() -> Self {
        Self {
            death_state_id: StateId(1),
            attack_skill_id: SkillId(1),
            guard_skill_id: SkillId(2),
            max_tp: Self::DEFAULT_MAX_TP,
            max_battle_members: Self::DEFAULT_MAX_BATTLE_MEMBERS,
            max_gold: Self::DEFAULT_MAX_GOLD,
            max_items: Self::DEFAULT_MAX_ITEMS,
            bare_hands_element_id: 1,
            slip_death: false,
            bench_exp: false,
            battle_system: BattleSystem::TurnBased,
            letter_table: LetterTable::Half,
        }
    }

    pub fn with_battle_system(mut self, battle_system: BattleSystem) -> Self {
        self.battle_system = battle_system;
        self
    }

    /// Gauge frames needed for a full TPB charge at reference speed.
    pub fn tpb_reference_time(&self) -> f64 {
        match self.battle_system {
            BattleSystem::ActiveTpb => 240.0,
            _ => 60.0,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
