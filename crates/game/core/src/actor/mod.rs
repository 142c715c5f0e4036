//! Player-controlled combatants.
//!
//! An [`Actor`] persists for the whole game. On top of the shared battler
//! state it owns a class and level with a per-class experience ledger, the
//! learned skill list, equipment slots and command input bookkeeping.
//!
//! Submodules split the behaviour: [`leveling`] (experience curve, level and
//! class changes, skills), [`equip`] (slots and the inventory transaction),
//! [`commands`] (action list construction and input navigation).
mod commands;
mod equip;
mod leveling;

pub use commands::ActionEvaluator;
pub use equip::EquipError;
pub use leveling::LevelUp;

use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::battler::{Battler, BattlerCore};
use crate::data::{ActorData, ClassData, SkillData};
use crate::env::Env;
use crate::ids::{ActorId, ClassId, ElementId, SkillId, WEAPON_EQUIP_TYPE};
use crate::item::{EquipItem, EquipObject};
use crate::stats::ParamId;
use crate::traits::{TraitCode, TraitSet};

/// A party member.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    actor_id: ActorId,
    name: String,
    nickname: String,
    profile: String,
    class_id: ClassId,
    level: i32,
    /// Experience per class the actor has belonged to.
    exp: BTreeMap<ClassId, i64>,
    /// Learned skills, ascending.
    skills: Vec<SkillId>,
    equips: Vec<Option<EquipItem>>,
    face_name: String,
    face_index: u32,
    character_name: String,
    character_index: u32,
    battler_name: String,
    last_menu_skill: Option<SkillId>,
    last_battle_skill: Option<SkillId>,
    #[cfg_attr(feature = "serde", serde(skip))]
    action_input_index: usize,
    /// Items unequipped by a refresh, waiting to be returned to the party.
    #[cfg_attr(feature = "serde", serde(skip))]
    released: Vec<EquipItem>,
    core: BattlerCore,
}

impl Actor {
    /// Builds the actor from its definition: initial level, class skills up
    /// to that level, starting equipment, then full recovery.
    ///
    /// Returns `None` when the actor id is unknown.
    pub fn new(env: &Env<'_>, actor_id: ActorId) -> Option<Self> {
        let Some(data) = env.content().actor(actor_id) else {
            warn!(actor = %actor_id, "unknown actor");
            return None;
        };
        let mut actor = Self {
            actor_id,
            name: data.name.clone(),
            nickname: data.nickname.clone(),
            profile: data.profile.clone(),
            class_id: data.class_id,
            level: data.initial_level.max(1),
            exp: BTreeMap::new(),
            skills: Vec::new(),
            equips: Vec::new(),
            face_name: data.face_name.clone(),
            face_index: data.face_index,
            character_name: data.character_name.clone(),
            character_index: data.character_index,
            battler_name: data.battler_name.clone(),
            last_menu_skill: None,
            last_battle_skill: None,
            action_input_index: 0,
            released: Vec::new(),
            core: BattlerCore::new(),
        };
        actor.init_exp(env);
        actor.init_skills(env);
        actor.init_equips(env, &data.equips);
        actor.recover_all(env);
        Some(actor)
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn data<'e>(&self, env: &Env<'e>) -> Option<&'e ActorData> {
        env.content().actor(self.actor_id)
    }

    pub fn current_class<'e>(&self, env: &Env<'e>) -> Option<&'e ClassData> {
        env.content().class(self.class_id)
    }

    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    pub fn is_class(&self, class_id: ClassId) -> bool {
        self.class_id == class_id
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn actor_name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: impl Into<String>) {
        self.profile = profile.into();
    }

    pub fn face(&self) -> (&str, u32) {
        (&self.face_name, self.face_index)
    }

    pub fn set_face_image(&mut self, name: impl Into<String>, index: u32) {
        self.face_name = name.into();
        self.face_index = index;
    }

    pub fn character(&self) -> (&str, u32) {
        (&self.character_name, self.character_index)
    }

    pub fn set_character_image(&mut self, name: impl Into<String>, index: u32) {
        self.character_name = name.into();
        self.character_index = index;
    }

    pub fn battler_name(&self) -> &str {
        &self.battler_name
    }

    pub fn set_battler_image(&mut self, name: impl Into<String>) {
        self.battler_name = name.into();
    }

    pub fn last_menu_skill(&self) -> Option<SkillId> {
        self.last_menu_skill
    }

    pub fn set_last_menu_skill(&mut self, skill: SkillId) {
        self.last_menu_skill = Some(skill);
    }

    pub fn last_battle_skill(&self) -> Option<SkillId> {
        self.last_battle_skill
    }

    pub fn set_last_battle_skill(&mut self, skill: SkillId) {
        self.last_battle_skill = Some(skill);
    }

    /// Items released by the last refreshes; the party puts them back in
    /// its inventory.
    pub fn take_released_items(&mut self) -> Vec<EquipItem> {
        std::mem::take(&mut self.released)
    }

    /// Resolved equipment, skipping empty slots and unknown ids.
    pub fn equip_objects<'e>(&self, env: &Env<'e>) -> impl Iterator<Item = EquipObject<'e>> {
        let content = env.content();
        self.equips
            .iter()
            .flatten()
            .filter_map(move |item| item.resolve(content))
    }

    pub fn has_no_weapons(&self) -> bool {
        !self.equips.iter().flatten().any(|item| item.is_weapon())
    }

    /// Whether a weapon of the given weapon type is equipped.
    pub fn is_wtype_equipped(&self, env: &Env<'_>, wtype: u32) -> bool {
        self.equip_objects(env).any(|object| match object {
            EquipObject::Weapon(data) => data.wtype_id == wtype,
            EquipObject::Armor(_) => false,
        })
    }
}

impl Battler for Actor {
    fn core(&self) -> &BattlerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BattlerCore {
        &mut self.core
    }

    fn is_actor(&self) -> bool {
        true
    }

    fn name(&self, _env: &Env<'_>) -> String {
        self.name.clone()
    }

    fn trait_sources<'e>(&self, env: &Env<'e>) -> TraitSet<'e> {
        let content = env.content();
        let mut set = TraitSet::new();
        if let Some(actor) = content.actor(self.actor_id) {
            set.push(actor);
        }
        if let Some(class) = content.class(self.class_id) {
            set.push(class);
        }
        for object in self.equip_objects(env) {
            set.push(object.as_trait_source());
        }
        for state in self.states(env) {
            set.push(state);
        }
        set
    }

    fn param_base(&self, env: &Env<'_>, param: ParamId) -> i32 {
        self.current_class(env)
            .map_or(0, |class| class.param(param, self.level))
    }

    fn param_plus(&self, env: &Env<'_>, param: ParamId) -> i32 {
        self.core.param_plus(param) + self.equip_objects(env).map(|o| o.param(param)).sum::<i32>()
    }

    fn attack_elements(&self, env: &Env<'_>) -> BTreeSet<ElementId> {
        let mut elements = self.trait_sources(env).set(TraitCode::AttackElement);
        if self.has_no_weapons() {
            elements.insert(env.config().bare_hands_element_id);
        }
        elements
    }

    fn is_skill_wtype_ok(&self, env: &Env<'_>, skill: &SkillData) -> bool {
        let [first, second] = skill.required_wtype_ids;
        (first == 0 && second == 0)
            || (first > 0 && self.is_wtype_equipped(env, first))
            || (second > 0 && self.is_wtype_equipped(env, second))
    }

    /// Releases equipment that became illegal before the shared refresh.
    fn refresh(&mut self, env: &Env<'_>) {
        let released = self.release_unequippable(env);
        self.released.extend(released);
        self.refresh_base(env);
    }

    fn clear_actions(&mut self) {
        self.core.actions.clear();
        self.action_input_index = 0;
    }
}

/// Slot layout for a given equip type catalogue.
pub(crate) fn slot_layout(equip_type_ids: impl Iterator<Item = u32>, dual_wield: bool) -> Vec<u32> {
    let mut slots: Vec<u32> = equip_type_ids.collect();
    if slots.len() >= 2 && dual_wield {
        slots[1] = WEAPON_EQUIP_TYPE;
    }
    slots
}
