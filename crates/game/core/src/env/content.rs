use crate::data::{
    ActorData, ArmorData, ClassData, EnemyData, ItemData, SkillData, StateData, SystemData,
    TroopData, WeaponData,
};
use crate::ids::{ActorId, ArmorId, ClassId, EnemyId, ItemId, SkillId, StateId, TroopId, WeaponId};

/// Oracle providing static content definitions.
///
/// Ids start at 1; id 0 and unknown ids resolve to `None`. Callers treat a
/// missing definition as "no contribution" rather than an error.
pub trait ContentOracle: Send + Sync {
    fn actor(&self, id: ActorId) -> Option<&ActorData>;
    fn class(&self, id: ClassId) -> Option<&ClassData>;
    fn skill(&self, id: SkillId) -> Option<&SkillData>;
    fn item(&self, id: ItemId) -> Option<&ItemData>;
    fn weapon(&self, id: WeaponId) -> Option<&WeaponData>;
    fn armor(&self, id: ArmorId) -> Option<&ArmorData>;
    fn state(&self, id: StateId) -> Option<&StateData>;
    fn enemy(&self, id: EnemyId) -> Option<&EnemyData>;
    fn troop(&self, id: TroopId) -> Option<&TroopData>;
    fn system(&self) -> &SystemData;
}
