use crate::ids::{ActorId, EnemyId, SwitchId, TroopId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TroopMember {
    pub enemy_id: EnemyId,
    pub x: i32,
    pub y: i32,
    /// Starts hidden until an event makes it appear.
    pub hidden: bool,
}

/// How often a battle event page may run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSpan {
    /// Once per battle.
    #[default]
    Battle,
    /// Once per turn.
    Turn,
    /// Every time its conditions hold.
    Moment,
}

/// Trigger conditions for a battle event page. All set conditions must hold;
/// a page with none set never triggers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageConditions {
    pub turn_ending: bool,
    /// Turn `a + b·k`; with `b == 0` exactly turn `a`.
    pub turn: Option<(u32, u32)>,
    /// Troop member index and hp percent threshold (at or below).
    pub enemy_hp: Option<(usize, u32)>,
    /// Actor and hp percent threshold (at or below).
    pub actor_hp: Option<(ActorId, u32)>,
    pub switch: Option<SwitchId>,
}

impl PageConditions {
    pub fn is_empty(&self) -> bool {
        !self.turn_ending
            && self.turn.is_none()
            && self.enemy_hp.is_none()
            && self.actor_hp.is_none()
            && self.switch.is_none()
    }
}

/// Event page; the command list itself belongs to the event scripting layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TroopPage {
    pub conditions: PageConditions,
    pub span: PageSpan,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TroopData {
    pub id: TroopId,
    pub name: String,
    pub members: Vec<TroopMember>,
    pub pages: Vec<TroopPage>,
}
