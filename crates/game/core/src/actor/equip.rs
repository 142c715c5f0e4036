//! Equipment slots and the inventory trade.
//!
//! `change_equip` is all-or-nothing: every check runs before anything is
//! mutated, so an `Err` leaves both the actor and the inventory untouched.

use tracing::{debug, trace};

use crate::battler::Battler;
use crate::data::{ArmorData, WeaponData};
use crate::env::Env;
use crate::error::{ErrorSeverity, GameError};
use crate::ids::{ActorId, ArmorId, EquipTypeId, WEAPON_EQUIP_TYPE, WeaponId};
use crate::item::{EquipItem, EquipObject, ItemRef};
use crate::unit::Inventory;

use super::{Actor, slot_layout};

/// Performance floor for automatic equipment selection.
const MIN_EQUIP_SCORE: i32 = -1000;

/// Reasons an equipment change is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EquipError {
    #[error("{actor} is not in the party")]
    UnknownActor { actor: ActorId },

    #[error("slot {slot} does not exist")]
    UnknownSlot { slot: usize },

    #[error("{item:?} is not held by the party")]
    NotHeld { item: EquipItem },

    #[error("{item:?} does not fit slot {slot} (expects equip type {expected})")]
    SlotTypeMismatch {
        item: EquipItem,
        slot: usize,
        expected: EquipTypeId,
    },

    /// The slot is locked or sealed by a trait.
    #[error("slot {slot} cannot be changed")]
    SlotLocked { slot: usize },

    #[error("{item:?} cannot be equipped by this actor")]
    CannotEquip { item: EquipItem },
}

impl GameError for EquipError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotHeld { .. } | Self::SlotLocked { .. } => ErrorSeverity::Recoverable,
            Self::UnknownActor { .. }
            | Self::UnknownSlot { .. }
            | Self::SlotTypeMismatch { .. }
            | Self::CannotEquip { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownActor { .. } => "EQUIP_UNKNOWN_ACTOR",
            Self::UnknownSlot { .. } => "EQUIP_UNKNOWN_SLOT",
            Self::NotHeld { .. } => "EQUIP_NOT_HELD",
            Self::SlotTypeMismatch { .. } => "EQUIP_SLOT_TYPE_MISMATCH",
            Self::SlotLocked { .. } => "EQUIP_SLOT_LOCKED",
            Self::CannotEquip { .. } => "EQUIP_CANNOT_EQUIP",
        }
    }
}

impl Actor {
    /// Fills slots from the definition's starting equipment; anything the
    /// actor cannot wear is discarded.
    pub(super) fn init_equips(&mut self, env: &Env<'_>, equips: &[u32]) {
        let slots = self.equip_slots(env);
        self.equips = vec![None; slots.len()];
        for (slot, (etype, id)) in slots.iter().zip(equips).enumerate() {
            if *id == 0 {
                continue;
            }
            self.equips[slot] = Some(if *etype == WEAPON_EQUIP_TYPE {
                EquipItem::Weapon(WeaponId(*id))
            } else {
                EquipItem::Armor(ArmorId(*id))
            });
        }
        let discarded = self.release_unequippable(env);
        if !discarded.is_empty() {
            debug!(actor = %self.actor_id, ?discarded, "starting equipment discarded");
        }
        self.refresh(env);
    }

    /// Equip type per slot; slot 1 holds a weapon while dual wielding.
    pub fn equip_slots(&self, env: &Env<'_>) -> Vec<EquipTypeId> {
        slot_layout(env.system().equip_type_ids(), self.is_dual_wield(env))
    }

    pub fn equips(&self) -> &[Option<EquipItem>] {
        &self.equips
    }

    pub fn weapons<'e>(&self, env: &Env<'e>) -> Vec<&'e WeaponData> {
        self.equip_objects(env)
            .filter_map(|object| match object {
                EquipObject::Weapon(data) => Some(data),
                EquipObject::Armor(_) => None,
            })
            .collect()
    }

    pub fn armors<'e>(&self, env: &Env<'e>) -> Vec<&'e ArmorData> {
        self.equip_objects(env)
            .filter_map(|object| match object {
                EquipObject::Armor(data) => Some(data),
                EquipObject::Weapon(_) => None,
            })
            .collect()
    }

    pub fn has_equip(&self, item: EquipItem) -> bool {
        self.equips.contains(&Some(item))
    }

    /// The slot is neither locked nor sealed.
    pub fn is_equip_change_ok(&self, env: &Env<'_>, slot: usize) -> bool {
        let slots = self.equip_slots(env);
        let Some(etype) = slots.get(slot).copied() else {
            return false;
        };
        !self.is_equip_type_locked(env, etype) && !self.is_equip_type_sealed(env, etype)
    }

    /// Trades `item` (or an empty slot) with the party inventory.
    ///
    /// The incoming item must exist in the inventory, match the slot's equip
    /// type and be wearable; the slot must be changeable. The outgoing item
    /// goes back into the inventory.
    pub fn change_equip(
        &mut self,
        env: &Env<'_>,
        inventory: &mut Inventory,
        slot: usize,
        item: Option<EquipItem>,
    ) -> Result<(), EquipError> {
        let slots = self.equip_slots(env);
        let expected = *slots.get(slot).ok_or(EquipError::UnknownSlot { slot })?;
        if !self.is_equip_change_ok(env, slot) {
            return Err(EquipError::SlotLocked { slot });
        }
        if let Some(item) = item {
            let etype = item.resolve(env.content()).map(|object| object.etype_id());
            if etype != Some(expected) {
                return Err(EquipError::SlotTypeMismatch {
                    item,
                    slot,
                    expected,
                });
            }
            if !self.can_equip(env, item) {
                return Err(EquipError::CannotEquip { item });
            }
            if !inventory.has_item(item.into()) {
                return Err(EquipError::NotHeld { item });
            }
        }

        let config = env.config();
        let outgoing = self.equips.get(slot).copied().flatten();
        if let Some(old) = outgoing {
            inventory.gain(config, old.into(), 1);
        }
        if let Some(new) = item {
            inventory.lose(config, new.into(), 1);
        }
        self.equips[slot] = item;
        debug!(actor = %self.actor_id, slot, ?outgoing, incoming = ?item, "equipment changed");

        self.release_unequippable_items(env, Some(inventory));
        self.refresh(env);
        Ok(())
    }

    /// Sets a slot without touching the inventory; illegal items are discarded.
    pub fn force_change_equip(&mut self, env: &Env<'_>, slot: usize, item: Option<EquipItem>) {
        let Some(target) = self.equips.get_mut(slot) else {
            return;
        };
        *target = item;
        self.release_unequippable_items(env, None);
        self.refresh(env);
    }

    /// Equips by equip type id (1-based) and raw item id; id 0 empties the slot.
    pub fn change_equip_by_id(
        &mut self,
        env: &Env<'_>,
        inventory: &mut Inventory,
        etype_id: EquipTypeId,
        item_id: u32,
    ) -> Result<(), EquipError> {
        let slot = etype_id.saturating_sub(1) as usize;
        let slots = self.equip_slots(env);
        let kind = *slots.get(slot).ok_or(EquipError::UnknownSlot { slot })?;
        let item = match (item_id, kind == WEAPON_EQUIP_TYPE) {
            (0, _) => None,
            (id, true) => Some(EquipItem::Weapon(WeaponId(id))),
            (id, false) => Some(EquipItem::Armor(ArmorId(id))),
        };
        self.change_equip(env, inventory, slot, item)
    }

    /// Removes the first equipped copy of `item` without returning it.
    pub fn discard_equip(&mut self, item: EquipItem) -> bool {
        match self.equips.iter().position(|slot| *slot == Some(item)) {
            Some(slot) => {
                self.equips[slot] = None;
                trace!(actor = %self.actor_id, ?item, "equipment discarded");
                true
            }
            None => false,
        }
    }

    /// Returns every changeable slot's item to the inventory.
    pub fn clear_equipments(&mut self, env: &Env<'_>, inventory: &mut Inventory) {
        for slot in 0..self.equips.len() {
            if self.is_equip_change_ok(env, slot) && self.equips[slot].is_some() {
                // Emptying a changeable, existing slot cannot fail.
                let _ = self.change_equip(env, inventory, slot, None);
            }
        }
    }

    /// Clears changeable slots, then fills each with the best held candidate.
    pub fn optimize_equipments(&mut self, env: &Env<'_>, inventory: &mut Inventory) {
        self.clear_equipments(env, inventory);
        for slot in 0..self.equips.len() {
            if !self.is_equip_change_ok(env, slot) {
                continue;
            }
            if let Some(best) = self.best_equip_item(env, inventory, slot) {
                if let Err(err) = self.change_equip(env, inventory, slot, Some(best)) {
                    debug!(actor = %self.actor_id, slot, %err, "optimize skipped slot");
                }
            }
        }
    }

    /// Highest scoring held item for the slot; the first wins ties. Items
    /// scoring -1000 or less are never picked.
    pub fn best_equip_item(
        &self,
        env: &Env<'_>,
        inventory: &Inventory,
        slot: usize,
    ) -> Option<EquipItem> {
        let etype = *self.equip_slots(env).get(slot)?;
        let mut best = None;
        let mut top = MIN_EQUIP_SCORE;
        for item in inventory.equip_items() {
            let Some(object) = item.resolve(env.content()) else {
                continue;
            };
            if object.etype_id() != etype || !self.can_equip(env, item) {
                continue;
            }
            let score = object.performance();
            if score > top {
                best = Some(item);
                top = score;
            }
        }
        best
    }

    /// Unequips everything illegal, returning items to `inventory` when
    /// given and discarding them otherwise.
    pub fn release_unequippable_items(&mut self, env: &Env<'_>, inventory: Option<&mut Inventory>) {
        let released = self.release_unequippable(env);
        if let Some(inventory) = inventory {
            for item in released {
                inventory.gain(env.config(), ItemRef::from(item), 1);
            }
        }
    }

    /// Repeatedly removes items that fail `can_equip` or no longer match their
    /// slot until a pass changes nothing.
    ///
    /// Every changing pass removes at least one item, so at most
    /// `slots + 1` passes run.
    pub(super) fn release_unequippable(&mut self, env: &Env<'_>) -> Vec<EquipItem> {
        let mut released = Vec::new();
        for _ in 0..=self.equips.len() {
            let slots = self.equip_slots(env);
            let mut changed = false;
            for slot in 0..self.equips.len() {
                let Some(item) = self.equips[slot] else {
                    continue;
                };
                let etype = item.resolve(env.content()).map(|object| object.etype_id());
                let fits = etype.is_some() && etype == slots.get(slot).copied();
                if !fits || !self.can_equip(env, item) {
                    self.equips[slot] = None;
                    debug!(actor = %self.actor_id, slot, ?item, "unequippable item released");
                    released.push(item);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        released
    }
}
