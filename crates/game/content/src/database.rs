//! Whole-database document shape.

use battle_core::data::{
    ActorData, ArmorData, ClassData, EnemyData, ItemData, SkillData, StateData, SystemData,
    TroopData, WeaponData,
};
use battle_core::{ContentError, ContentTables};

/// Every definition table in one document. Missing tables are empty.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Database {
    pub system: SystemData,
    pub actors: Vec<ActorData>,
    pub classes: Vec<ClassData>,
    pub skills: Vec<SkillData>,
    pub items: Vec<ItemData>,
    pub weapons: Vec<WeaponData>,
    pub armors: Vec<ArmorData>,
    pub states: Vec<StateData>,
    pub enemies: Vec<EnemyData>,
    pub troops: Vec<TroopData>,
}

impl Database {
    /// Number of definitions across all tables.
    pub fn len(&self) -> usize {
        self.actors.len()
            + self.classes.len()
            + self.skills.len()
            + self.items.len()
            + self.weapons.len()
            + self.armors.len()
            + self.states.len()
            + self.enemies.len()
            + self.troops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates the definitions and indexes them by id.
    pub fn into_tables(self) -> Result<ContentTables, ContentError> {
        let mut builder = ContentTables::builder().system(self.system);
        builder = self.actors.into_iter().fold(builder, |b, data| b.actor(data));
        builder = self.classes.into_iter().fold(builder, |b, data| b.class(data));
        builder = self.skills.into_iter().fold(builder, |b, data| b.skill(data));
        builder = self.items.into_iter().fold(builder, |b, data| b.item(data));
        builder = self.weapons.into_iter().fold(builder, |b, data| b.weapon(data));
        builder = self.armors.into_iter().fold(builder, |b, data| b.armor(data));
        builder = self.states.into_iter().fold(builder, |b, data| b.state(data));
        builder = self.enemies.into_iter().fold(builder, |b, data| b.enemy(data));
        builder = self.troops.into_iter().fold(builder, |b, data| b.troop(data));
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{ContentOracle, SkillId};

    use super::*;

    #[test]
    fn empty_database_builds() {
        let database = Database::default();
        assert!(database.is_empty());
        let tables = database.into_tables().expect("empty tables are valid");
        assert!(tables.skill(SkillId(1)).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let skill = SkillData {
            id: SkillId(4),
            name: "Slash".into(),
            ..SkillData::default()
        };
        let database = Database {
            skills: vec![skill.clone(), skill],
            ..Database::default()
        };
        assert_eq!(database.len(), 2);
        let err = database.into_tables().unwrap_err();
        assert_eq!(err, ContentError::DuplicateId { kind: "skill", id: 4 });
    }
}
