mod common;

use battle_core::{
    ActionEvaluator, ActionState, Actor, ActorId, BattleAction, Battler, EquipError, EquipItem,
    Env, GameError, GameRng, ItemRef, LevelUp, Party, SkillId, Unit,
};

use common::*;

fn party(env: &Env<'_>) -> Party {
    let mut party = Party::new(env.config());
    party.setup_starting_members(env);
    party
}

fn assert_equipment_legal(env: &Env<'_>, actor: &Actor) {
    let slots = actor.equip_slots(env);
    for (slot, item) in actor.equips().iter().enumerate() {
        let Some(item) = item else { continue };
        let object = item.resolve(env.content()).expect("equipped item is defined");
        assert_eq!(object.etype_id(), slots[slot], "slot {slot} holds {item:?}");
        assert!(actor.can_equip(env, *item), "{item:?} is not wearable");
    }
}

#[test]
fn experience_moves_level_both_ways() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut mira = Actor::new(&env, MIRA).unwrap();
    assert_eq!(mira.current_exp(), 0);
    assert_eq!(mira.next_required_exp(&env), 250);

    let report = mira.change_exp(&env, 1000, true);
    assert_eq!(mira.level(), 5);
    assert_eq!(mira.current_exp(), 1000);
    assert_eq!(
        report,
        Some(LevelUp {
            actor_id: MIRA,
            from_level: 1,
            to_level: 5,
            new_skills: vec![BLIZZARD],
        })
    );
    assert_eq!(mira.mhp(&env), 450);

    assert_eq!(mira.change_exp(&env, 300, true), None);
    assert_eq!(mira.level(), 2);
    assert!(mira.is_learned_skill(BLIZZARD));

    mira.change_exp(&env, -50, false);
    assert_eq!(mira.level(), 1);
    assert_eq!(mira.current_exp(), 0);
}

#[test]
fn level_changes_respect_the_cap() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rook = Actor::new(&env, ROOK).unwrap();
    assert_eq!(rook.level(), 3);
    assert!(rook.is_learned_skill(SLASH));

    rook.change_level(&env, 250, false);
    assert_eq!(rook.level(), 99);
    assert!(rook.is_max_level(&env));
    assert_eq!(rook.current_exp(), rook.exp_for_level(&env, 99));
}

#[test]
fn class_change_keeps_or_resets_experience() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);

    let warrior_exp = party
        .with_actor(&env, HERO, |hero| {
            hero.change_level(&env, 3, false);
            let warrior_exp = hero.current_exp();
            assert!(warrior_exp > 0 && warrior_exp < 250);

            hero.change_class(&env, MAGE, true);
            assert!(hero.is_class(MAGE));
            assert_eq!(hero.level(), 1);
            assert_eq!(hero.current_exp(), warrior_exp);
            assert_eq!(hero.equips()[0], None);
            warrior_exp
        })
        .unwrap();
    assert_eq!(party.num_items(ItemRef::Weapon(SWORD)), 1);

    party.with_actor(&env, HERO, |hero| {
        hero.change_class(&env, WARRIOR, false);
        assert_eq!(hero.level(), 3);
        assert_eq!(hero.current_exp(), warrior_exp);
    });
}

#[test]
fn party_exp_skips_the_bench() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    for id in [ZED, ASH, ROOK] {
        assert!(party.add_actor(&env, id));
    }
    assert!(!party.is_battle_member(ROOK));

    let level_ups = party.gain_exp(&env, 1000);
    let gains: Vec<_> = level_ups
        .iter()
        .map(|up| (up.actor_id, up.from_level, up.to_level))
        .collect();
    assert_eq!(
        gains,
        vec![(HERO, 1, 5), (MIRA, 1, 5), (ZED, 1, 5), (ASH, 1, 5)]
    );
    assert_eq!(level_ups[0].new_skills, vec![SLASH]);
    assert_eq!(party.actor(ROOK).unwrap().level(), 3);
}

#[test]
fn failed_equip_change_leaves_everything_untouched() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    let before = party.actor(HERO).unwrap().equips().to_vec();

    let err = party
        .change_equip(&env, HERO, 0, Some(EquipItem::Weapon(DAGGER)))
        .unwrap_err();
    assert_eq!(
        err,
        EquipError::NotHeld {
            item: EquipItem::Weapon(DAGGER)
        }
    );
    assert_eq!(err.error_code(), "EQUIP_NOT_HELD");

    party.gain_item(&env, ItemRef::Weapon(AXE), 1, false);
    party.gain_item(&env, ItemRef::Armor(PLATE), 1, false);
    let err = party
        .change_equip(&env, HERO, 0, Some(EquipItem::Weapon(AXE)))
        .unwrap_err();
    assert!(matches!(err, EquipError::CannotEquip { .. }));
    let err = party
        .change_equip(&env, HERO, 0, Some(EquipItem::Armor(PLATE)))
        .unwrap_err();
    assert!(matches!(err, EquipError::SlotTypeMismatch { slot: 0, .. }));
    assert!(matches!(
        party.change_equip(&env, HERO, 9, None),
        Err(EquipError::UnknownSlot { slot: 9 })
    ));
    assert!(matches!(
        party.change_equip(&env, ActorId(42), 0, None),
        Err(EquipError::UnknownActor { .. })
    ));

    assert_eq!(party.actor(HERO).unwrap().equips(), before.as_slice());
    assert_eq!(party.num_items(ItemRef::Weapon(AXE)), 1);
    assert_eq!(party.num_items(ItemRef::Armor(PLATE)), 1);
}

#[test]
fn equip_change_trades_with_inventory() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    party.gain_item(&env, ItemRef::Weapon(DAGGER), 1, false);

    party
        .change_equip(&env, HERO, 0, Some(EquipItem::Weapon(DAGGER)))
        .unwrap();
    let hero = party.actor(HERO).unwrap();
    assert_eq!(hero.equips()[0], Some(EquipItem::Weapon(DAGGER)));
    assert_eq!(hero.atk(&env), 28);
    assert_eq!(party.num_items(ItemRef::Weapon(DAGGER)), 0);
    assert_eq!(party.num_items(ItemRef::Weapon(SWORD)), 1);
}

#[test]
fn losing_an_enabling_accessory_releases_dependent_weapon() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    party.gain_item(&env, ItemRef::Armor(AXE_BRACER), 1, false);
    party.gain_item(&env, ItemRef::Weapon(AXE), 1, false);

    party
        .change_equip(&env, HERO, 4, Some(EquipItem::Armor(AXE_BRACER)))
        .unwrap();
    party
        .change_equip(&env, HERO, 0, Some(EquipItem::Weapon(AXE)))
        .unwrap();
    assert_eq!(party.actor(HERO).unwrap().atk(&env), 43);

    party.lose_item(&env, ItemRef::Armor(AXE_BRACER), 1, true);

    let hero = party.actor(HERO).unwrap();
    assert_eq!(hero.equips()[0], None);
    assert_eq!(hero.equips()[4], None);
    assert_eq!(party.num_items(ItemRef::Weapon(AXE)), 1);
    assert_eq!(party.num_items(ItemRef::Armor(AXE_BRACER)), 0);
    assert!(!party.has_item(ItemRef::Armor(AXE_BRACER), true));
    assert_equipment_legal(&env, hero);
}

#[test]
fn forced_changes_discard_illegal_items() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut hero = Actor::new(&env, HERO).unwrap();

    hero.force_change_equip(&env, 4, Some(EquipItem::Armor(AXE_BRACER)));
    hero.force_change_equip(&env, 0, Some(EquipItem::Weapon(AXE)));
    assert_eq!(hero.equips()[0], Some(EquipItem::Weapon(AXE)));

    hero.force_change_equip(&env, 4, None);
    assert_eq!(hero.equips()[0], None);
    assert!(hero.take_released_items().is_empty());
    assert_equipment_legal(&env, &hero);
}

#[test]
fn class_change_returns_forbidden_weapon_to_the_party() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    assert_eq!(party.num_items(ItemRef::Weapon(SWORD)), 0);

    party.with_actor(&env, HERO, |hero| hero.change_class(&env, MAGE, false));

    let hero = party.actor(HERO).unwrap();
    assert_eq!(hero.equips()[0], None);
    assert_eq!(hero.equips()[1], Some(EquipItem::Armor(SHIELD)));
    assert_eq!(party.num_items(ItemRef::Weapon(SWORD)), 1);
    assert!(party.with_actor(&env, ActorId(77), |_| ()).is_none());
}

#[test]
fn optimize_never_picks_cursed_gear() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    party.clear_equipments(&env, HERO).unwrap();
    party.lose_item(&env, ItemRef::Weapon(SWORD), 1, false);
    party.gain_item(&env, ItemRef::Weapon(CURSED_BLADE), 1, false);
    assert!(party.actor(HERO).unwrap().can_equip(&env, EquipItem::Weapon(CURSED_BLADE)));

    party.optimize_equipments(&env, HERO).unwrap();
    assert_eq!(party.actor(HERO).unwrap().equips()[0], None);
    assert_eq!(party.num_items(ItemRef::Weapon(CURSED_BLADE)), 1);
}

#[test]
fn optimize_picks_strongest_wearable_items() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    for item in [
        ItemRef::Weapon(AXE),
        ItemRef::Weapon(DAGGER),
        ItemRef::Armor(PLATE),
    ] {
        party.gain_item(&env, item, 1, false);
    }
    party.clear_equipments(&env, HERO).unwrap();
    assert!(party.actor(HERO).unwrap().equips().iter().all(Option::is_none));

    party.optimize_equipments(&env, HERO).unwrap();
    let hero = party.actor(HERO).unwrap();
    assert_eq!(
        hero.equips(),
        &[
            Some(EquipItem::Weapon(SWORD)),
            Some(EquipItem::Armor(SHIELD)),
            Some(EquipItem::Armor(HELM)),
            None,
            None,
        ]
    );
    assert_eq!(party.num_items(ItemRef::Weapon(DAGGER)), 1);
    assert_eq!(party.num_items(ItemRef::Weapon(AXE)), 1);
    assert_eq!(party.num_items(ItemRef::Armor(PLATE)), 1);
    assert_equipment_legal(&env, hero);
}

#[test]
fn weapon_bound_skills_need_the_weapon() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    party.add_actor(&env, ROOK);
    let slash = ItemRef::Skill(SLASH);

    assert!(!party.actor(ROOK).unwrap().can_use(&env, slash, None));

    party.gain_item(&env, ItemRef::Weapon(SWORD), 1, false);
    party
        .change_equip(&env, ROOK, 0, Some(EquipItem::Weapon(SWORD)))
        .unwrap();
    let rook = party.actor(ROOK).unwrap();
    assert!(rook.can_use(&env, slash, None));
    let usable: Vec<_> = rook.usable_skills(&env).iter().map(|s| s.id).collect();
    assert_eq!(usable, vec![SLASH, BASH]);
}

#[test]
fn action_list_offers_attack_and_usable_skills() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let hero = Actor::new(&env, HERO).unwrap();

    assert_eq!(
        hero.make_action_list(&env),
        vec![BattleAction::attack(ATTACK), BattleAction::skill(BASH)]
    );
}

#[test]
fn confused_actors_attack_without_input() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(11);
    let mut hero = Actor::new(&env, HERO).unwrap();
    hero.add_state(&env, &mut rng, CONFUSION);

    hero.make_actions(&env, &mut rng, &Indifferent);
    assert_eq!(hero.num_actions(), 1);
    let action = hero.current_action().unwrap();
    assert!(action.is_confused());
    assert!(action.is_attack_with(ATTACK));
    assert_eq!(hero.action_state(), ActionState::Waiting);
    assert!(!hero.can_input(&env));
}

struct Indifferent;

impl ActionEvaluator for Indifferent {
    fn evaluate(&self, _env: &Env<'_>, _subject: &Actor, _action: &BattleAction) -> f64 {
        0.0
    }
}

struct PreferSkill(SkillId);

impl ActionEvaluator for PreferSkill {
    fn evaluate(&self, _env: &Env<'_>, _subject: &Actor, action: &BattleAction) -> f64 {
        if action.item_ref() == Some(ItemRef::Skill(self.0)) {
            10.0
        } else {
            1.0
        }
    }
}

#[test]
fn auto_battle_takes_best_scored_action() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(12);
    let mut party = party(&env);
    party.with_actor(&env, HERO, |hero| hero.add_state(&env, &mut rng, AUTO));

    party.make_actions(&env, &mut rng, &PreferSkill(BASH));

    let hero = party.actor(HERO).unwrap();
    assert!(hero.is_auto_battle(&env));
    assert_eq!(hero.current_action(), Some(&BattleAction::skill(BASH)));
    assert_eq!(hero.action_state(), ActionState::Waiting);

    let mira = party.actor(MIRA).unwrap();
    assert_eq!(mira.num_actions(), 1);
    assert!(mira.current_action().unwrap().is_empty());
    assert_eq!(mira.action_state(), ActionState::Undecided);
    assert!(party.can_input(&env));
}

#[test]
fn command_input_walks_the_slots() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(13);
    let mut hero = Actor::new(&env, HERO).unwrap();
    hero.make_actions(&env, &mut rng, &Indifferent);

    assert!(!hero.select_previous_command());
    hero.set_input(BattleAction::skill(BASH));
    assert_eq!(hero.inputting_action(), Some(&BattleAction::skill(BASH)));
    assert!(!hero.select_next_command());
    assert_eq!(hero.action_input_index(), 0);
}

#[test]
fn consumables_leave_the_inventory() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    let potion = ItemRef::Item(POTION);

    assert!(!party.use_item(&env, HERO, potion));
    party.gain_item(&env, potion, 2, false);
    assert!(party.can_use(&env, potion));
    assert!(party.use_item(&env, HERO, potion));
    assert_eq!(party.num_items(potion), 1);
    assert_eq!(party.members().len(), 2);
}
