//! In-memory content tables.
//!
//! [`ContentTables`] is the default [`ContentOracle`]: one dense table per
//! definition kind, indexed by id with slot 0 left empty. Tables are assembled
//! through [`ContentTablesBuilder`], which rejects malformed content up front
//! so lookups during battle never need to fail.

use crate::data::{
    ActorData, ArmorData, ClassData, EnemyData, ItemData, SkillData, StateData, SystemData,
    TroopData, WeaponData,
};
use crate::error::{ErrorSeverity, GameError};
use crate::ids::{ActorId, ArmorId, ClassId, EnemyId, ItemId, SkillId, StateId, TroopId, WeaponId};
use crate::item::ItemRef;

use super::ContentOracle;

/// Errors raised while assembling content tables.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// A definition was registered at the reserved id 0.
    #[error("{kind} definition uses reserved id 0")]
    ReservedId { kind: &'static str },

    #[error("duplicate {kind} definition with id {id}")]
    DuplicateId { kind: &'static str, id: u32 },

    /// A definition references another definition that does not exist.
    #[error("{referenced_by} references missing {kind} {id}")]
    MissingReference {
        kind: &'static str,
        id: u32,
        referenced_by: String,
    },
}

impl GameError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ReservedId { .. } | Self::DuplicateId { .. } => ErrorSeverity::Fatal,
            Self::MissingReference { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ReservedId { .. } => "CONTENT_RESERVED_ID",
            Self::DuplicateId { .. } => "CONTENT_DUPLICATE_ID",
            Self::MissingReference { .. } => "CONTENT_MISSING_REFERENCE",
        }
    }
}

trait Keyed {
    const KIND: &'static str;
    fn key(&self) -> u32;
}

macro_rules! keyed {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(impl Keyed for $ty {
            const KIND: &'static str = $kind;
            fn key(&self) -> u32 {
                self.id.get()
            }
        })*
    };
}

keyed!(
    ActorData => "actor",
    ClassData => "class",
    SkillData => "skill",
    ItemData => "item",
    WeaponData => "weapon",
    ArmorData => "armor",
    StateData => "state",
    EnemyData => "enemy",
    TroopData => "troop",
);

/// Dense id-indexed table; index 0 is always empty.
#[derive(Clone, Debug)]
struct Table<T> {
    slots: Vec<Option<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Keyed> Table<T> {
    fn from_entries(entries: Vec<T>) -> Result<Self, ContentError> {
        let mut table = Self::default();
        for entry in entries {
            let id = entry.key();
            if id == 0 {
                return Err(ContentError::ReservedId { kind: T::KIND });
            }
            let index = id as usize;
            if table.slots.len() <= index {
                table.slots.resize_with(index + 1, || None);
            }
            if table.slots[index].is_some() {
                return Err(ContentError::DuplicateId { kind: T::KIND, id });
            }
            table.slots[index] = Some(entry);
        }
        Ok(table)
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().flatten()
    }
}

/// Immutable, validated content database.
#[derive(Clone, Debug, Default)]
pub struct ContentTables {
    actors: Table<ActorData>,
    classes: Table<ClassData>,
    skills: Table<SkillData>,
    items: Table<ItemData>,
    weapons: Table<WeaponData>,
    armors: Table<ArmorData>,
    states: Table<StateData>,
    enemies: Table<EnemyData>,
    troops: Table<TroopData>,
    system: SystemData,
}

impl ContentTables {
    pub fn builder() -> ContentTablesBuilder {
        ContentTablesBuilder::default()
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorData> {
        self.actors.iter()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EnemyData> {
        self.enemies.iter()
    }

    pub fn troops(&self) -> impl Iterator<Item = &TroopData> {
        self.troops.iter()
    }

    fn validate(&self) -> Result<(), ContentError> {
        let missing = |kind: &'static str, id: u32, referenced_by: String| {
            ContentError::MissingReference {
                kind,
                id,
                referenced_by,
            }
        };

        for actor in self.actors.iter() {
            if !self.classes.contains(actor.class_id.get()) {
                return Err(missing("class", actor.class_id.get(), actor.id.to_string()));
            }
        }
        for class in self.classes.iter() {
            for learning in &class.learnings {
                if !self.skills.contains(learning.skill_id.get()) {
                    return Err(missing("skill", learning.skill_id.get(), class.id.to_string()));
                }
            }
        }
        for enemy in self.enemies.iter() {
            for action in &enemy.actions {
                if !self.skills.contains(action.skill_id.get()) {
                    return Err(missing("skill", action.skill_id.get(), enemy.id.to_string()));
                }
            }
            for drop in &enemy.drop_items {
                let known = match drop.item {
                    ItemRef::Skill(id) => self.skills.contains(id.get()),
                    ItemRef::Item(id) => self.items.contains(id.get()),
                    ItemRef::Weapon(id) => self.weapons.contains(id.get()),
                    ItemRef::Armor(id) => self.armors.contains(id.get()),
                };
                if !known {
                    return Err(missing("drop item", drop_id(drop.item), enemy.id.to_string()));
                }
            }
        }
        for troop in self.troops.iter() {
            for member in &troop.members {
                if !self.enemies.contains(member.enemy_id.get()) {
                    return Err(missing("enemy", member.enemy_id.get(), troop.id.to_string()));
                }
            }
        }
        for actor_id in &self.system.party_members {
            if !self.actors.contains(actor_id.get()) {
                return Err(missing("actor", actor_id.get(), "system".to_string()));
            }
        }
        Ok(())
    }
}

fn drop_id(item: ItemRef) -> u32 {
    match item {
        ItemRef::Skill(id) => id.get(),
        ItemRef::Item(id) => id.get(),
        ItemRef::Weapon(id) => id.get(),
        ItemRef::Armor(id) => id.get(),
    }
}

impl ContentOracle for ContentTables {
    fn actor(&self, id: ActorId) -> Option<&ActorData> {
        self.actors.get(id.get())
    }

    fn class(&self, id: ClassId) -> Option<&ClassData> {
        self.classes.get(id.get())
    }

    fn skill(&self, id: SkillId) -> Option<&SkillData> {
        self.skills.get(id.get())
    }

    fn item(&self, id: ItemId) -> Option<&ItemData> {
        self.items.get(id.get())
    }

    fn weapon(&self, id: WeaponId) -> Option<&WeaponData> {
        self.weapons.get(id.get())
    }

    fn armor(&self, id: ArmorId) -> Option<&ArmorData> {
        self.armors.get(id.get())
    }

    fn state(&self, id: StateId) -> Option<&StateData> {
        self.states.get(id.get())
    }

    fn enemy(&self, id: EnemyId) -> Option<&EnemyData> {
        self.enemies.get(id.get())
    }

    fn troop(&self, id: TroopId) -> Option<&TroopData> {
        self.troops.get(id.get())
    }

    fn system(&self) -> &SystemData {
        &self.system
    }
}

/// Collects definitions and validates them into [`ContentTables`].
#[derive(Clone, Debug, Default)]
pub struct ContentTablesBuilder {
    actors: Vec<ActorData>,
    classes: Vec<ClassData>,
    skills: Vec<SkillData>,
    items: Vec<ItemData>,
    weapons: Vec<WeaponData>,
    armors: Vec<ArmorData>,
    states: Vec<StateData>,
    enemies: Vec<EnemyData>,
    troops: Vec<TroopData>,
    system: SystemData,
}

impl ContentTablesBuilder {
    pub fn actor(mut self, data: ActorData) -> Self {
        self.actors.push(data);
        self
    }

    pub fn class(mut self, data: ClassData) -> Self {
        self.classes.push(data);
        self
    }

    pub fn skill(mut self, data: SkillData) -> Self {
        self.skills.push(data);
        self
    }

    pub fn item(mut self, data: ItemData) -> Self {
        self.items.push(data);
        self
    }

    pub fn weapon(mut self, data: WeaponData) -> Self {
        self.weapons.push(data);
        self
    }

    pub fn armor(mut self, data: ArmorData) -> Self {
        self.armors.push(data);
        self
    }

    pub fn state(mut self, data: StateData) -> Self {
        self.states.push(data);
        self
    }

    pub fn enemy(mut self, data: EnemyData) -> Self {
        self.enemies.push(data);
        self
    }

    pub fn troop(mut self, data: TroopData) -> Self {
        self.troops.push(data);
        self
    }

    pub fn system(mut self, data: SystemData) -> Self {
        self.system = data;
        self
    }

    pub fn build(self) -> Result<ContentTables, ContentError> {
        let tables = ContentTables {
            actors: Table::from_entries(self.actors)?,
            classes: Table::from_entries(self.classes)?,
            skills: Table::from_entries(self.skills)?,
            items: Table::from_entries(self.items)?,
            weapons: Table::from_entries(self.weapons)?,
            armors: Table::from_entries(self.armors)?,
            states: Table::from_entries(self.states)?,
            enemies: Table::from_entries(self.enemies)?,
            troops: Table::from_entries(self.troops)?,
            system: self.system,
        };
        tables.validate()?;
        Ok(tables)
    }
}
