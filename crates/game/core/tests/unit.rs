mod common;

use battle_core::{
    Battler, Env, GameRng, ItemRef, ParamId, Party, PartyAbilities, Switches, Troop, Unit,
};

use common::*;

fn troop(env: &Env<'_>, troop_id: battle_core::TroopId) -> Troop {
    let mut troop = Troop::new();
    assert!(troop.setup(env, troop_id));
    troop
}

fn party(env: &Env<'_>) -> Party {
    let mut party = Party::new(env.config());
    party.setup_starting_members(env);
    party
}

fn kill_all(env: &Env<'_>, troop: &mut Troop) {
    for index in 0..troop.enemies().len() {
        troop.enemy_mut(index).unwrap().set_hp(env, 0);
    }
}

#[test]
fn random_targets_follow_target_rate() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(42);
    let troop = troop(&env, DECOY_TRIO);
    assert!((troop.tgr_sum(&env) - 4.0).abs() < 1e-9);

    let draws = 8_000;
    let mut hits = [0usize; 3];
    for _ in 0..draws {
        let index = troop.random_target(&env, &mut rng).unwrap();
        hits[index] += 1;
    }
    let expected = [0.5, 0.25, 0.25];
    for (count, want) in hits.iter().zip(expected) {
        let share = *count as f64 / draws as f64;
        assert!((share - want).abs() < 0.03, "share {share}, expected {want}");
    }
}

#[test]
fn dead_members_are_never_random_targets() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(7);
    let mut troop = troop(&env, DECOY_TRIO);
    troop.enemy_mut(0).unwrap().set_hp(&env, 0);

    for _ in 0..200 {
        let index = troop.random_target(&env, &mut rng).unwrap();
        assert_ne!(index, 0);
        assert_eq!(troop.random_dead_target(&env, &mut rng), Some(0));
    }

    kill_all(&env, &mut troop);
    assert_eq!(troop.random_target(&env, &mut rng), None);
    assert!(troop.is_all_dead(&env));
}

#[test]
fn smooth_targets_skip_to_the_first_match() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut troop = troop(&env, SLIME_PACK);

    assert_eq!(troop.smooth_target(&env, 2), Some(2));
    assert_eq!(troop.smooth_dead_target(&env, 2), None);

    troop.enemy_mut(0).unwrap().set_hp(&env, 0);
    troop.enemy_mut(2).unwrap().set_hp(&env, 0);
    assert_eq!(troop.smooth_target(&env, 2), Some(1));
    assert_eq!(troop.smooth_target(&env, 9), Some(1));
    assert_eq!(troop.smooth_dead_target(&env, 1), Some(0));
    assert_eq!(troop.smooth_dead_target(&env, 2), Some(2));
    assert_eq!(troop.alive_members(&env).len(), 2);
    assert_eq!(troop.dead_members(&env).len(), 2);
}

#[test]
fn namesakes_get_distinct_letters() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut troop = troop(&env, SLIME_PACK);

    let names: Vec<String> = troop.enemies().iter().map(|e| e.name(&env)).collect();
    assert_eq!(names, ["Slime A", "Slime B", "Slime C", "Ogre"]);
    assert!(troop.enemies()[..3].iter().all(|e| e.is_plural()));
    assert!(troop.enemies()[3].is_letter_empty());
    assert!(!troop.enemies()[3].is_plural());
    assert_eq!(troop.enemy_names(&env), ["Slime", "Ogre"]);

    assert!(troop.transform_enemy(&env, 0, OGRE));
    let names: Vec<String> = troop.enemies().iter().map(|e| e.name(&env)).collect();
    assert_eq!(names, ["Ogre A", "Slime B", "Slime C", "Ogre B"]);
    assert_eq!(troop.enemy_names(&env), ["Ogre", "Slime"]);
}

#[test]
fn hidden_enemies_appear_later() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut troop = troop(&env, DECOY_TRIO);
    troop.enemy_mut(2).unwrap().hide();

    assert_eq!(troop.alive_members(&env).len(), 2);
    assert!(!troop.enemies()[2].is_alive(&env));
    assert!(troop.appear_enemy(&env, 2));
    assert!(troop.enemies()[2].is_alive(&env));
    assert!(!troop.appear_enemy(&env, 7));
}

#[test]
fn defeated_enemies_pay_out() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(9);
    let mut troop = troop(&env, SLIME_PACK);
    troop.enemy_mut(3).unwrap().set_hp(&env, 0);
    assert_eq!(troop.exp_total(&env), 80);

    kill_all(&env, &mut troop);
    assert_eq!(troop.exp_total(&env), 110);
    assert_eq!(troop.gold_total(&env, PartyAbilities::empty()), 86);
    assert_eq!(troop.gold_total(&env, PartyAbilities::GOLD_DOUBLE), 172);
    assert_eq!(
        troop.make_drop_items(&env, &mut rng, PartyAbilities::DROP_ITEM_DOUBLE),
        vec![ItemRef::Item(POTION); 3]
    );
}

#[test]
fn battle_events_respect_their_span() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let party = party(&env);
    let mut switches = Switches::new();
    let mut troop = troop(&env, EVENT_TROOP);

    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), None);

    troop.increase_turn(&env);
    assert_eq!(troop.turn_count(), 1);
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), Some(0));
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), None);

    troop.enemy_mut(0).unwrap().set_hp(&env, 50);
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), Some(1));
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), None);

    switches.set_value(EVENT_SWITCH, true);
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), Some(2));
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), Some(2));
    switches.set_value(EVENT_SWITCH, false);

    troop.increase_turn(&env);
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), Some(1));
    assert_eq!(troop.setup_battle_event(&env, &party, &switches, false), None);
}

#[test]
fn turn_end_ticks_every_enemy() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(11);
    let mut troop = troop(&env, SLIME_PACK);
    for index in [0, 3] {
        troop.enemy_mut(index).unwrap().add_state(&env, &mut rng, POISON);
    }

    troop.on_turn_end(&env);
    let hp: Vec<i32> = troop.enemies().iter().map(|e| e.hp()).collect();
    assert_eq!(hp, [90, 120, 120, 375]);

    troop.on_turn_end(&env);
    troop.on_turn_end(&env);
    let hp: Vec<i32> = troop.enemies().iter().map(|e| e.hp()).collect();
    assert_eq!(hp, [30, 120, 120, 125]);
    assert!(troop.enemies().iter().all(|e| !e.is_state_affected(POISON)));
}

#[test]
fn party_phase_hooks_reach_members() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(12);
    let mut party = party(&env);
    party.with_actor(&env, HERO, |hero| {
        hero.add_state(&env, &mut rng, POISON);
        hero.add_buff(&env, ParamId::Atk, 1);
    });

    party.on_turn_end(&env);
    let hero = party.actor(HERO).unwrap();
    assert_eq!(hero.hp(), 330);
    assert_eq!(hero.core().buffs().level(ParamId::Atk), 1);
    assert_eq!(party.actor(MIRA).unwrap().hp(), 330);

    party.on_all_actions_end(&env);
    assert_eq!(party.actor(HERO).unwrap().core().buffs().level(ParamId::Atk), 0);
}

#[test]
fn troop_setup_leaves_battle() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(13);
    let mut troop = troop(&env, SLIME_PACK);
    let clock = troop.tpb_clock(&env);

    troop.on_battle_start(&env, &mut rng, false, &clock);
    assert!(troop.in_battle());
    assert!(troop.setup(&env, DECOY_TRIO));
    assert!(!troop.in_battle());
    assert_eq!(troop.turn_count(), 0);
}

#[test]
fn troop_actions_use_the_troop_turn() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut rng = GameRng::seeded(10);
    let switches = Switches::new();
    let mut troop = troop(&env, SLIME_PACK);

    troop.make_actions(&env, &mut rng, 1, &switches);
    for enemy in troop.enemies() {
        assert_eq!(enemy.num_actions(), 1);
        assert!(!enemy.current_action().unwrap().is_empty());
    }
    troop.select(1);
    let selected: Vec<bool> = troop.enemies().iter().map(|e| e.is_selected()).collect();
    assert_eq!(selected, [false, true, false, false]);
    troop.deselect_all();
    assert!(troop.enemies().iter().all(|e| !e.is_selected()));

    troop.clear_actions();
    assert!(troop.enemies().iter().all(|e| e.num_actions() == 0));
}

#[test]
fn formation_limits_battle_members() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);
    assert!(!party.add_actor(&env, HERO));
    assert!(!party.add_actor(&env, battle_core::ActorId(77)));
    for id in [ZED, ASH, ROOK] {
        assert!(party.add_actor(&env, id));
    }

    let battle: Vec<_> = party.battle_members().iter().map(|a| a.actor_id()).collect();
    assert_eq!(battle, [HERO, MIRA, ZED, ASH]);
    assert_eq!(party.leader().map(|a| a.actor_id()), Some(HERO));
    assert_eq!(party.highest_level(), 3);

    party.swap_order(0, 4);
    assert!(party.is_battle_member(ROOK));
    assert!(!party.is_battle_member(HERO));
    assert_eq!(party.leader().map(|a| a.actor_id()), Some(ROOK));

    assert!(party.remove_actor(ZED));
    assert!(!party.remove_actor(ZED));
    assert_eq!(party.size(), 4);
    assert!(party.actor(ZED).is_some());
}

#[test]
fn party_defeat_and_revival() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let empty = Party::new(&config);
    assert!(!empty.is_all_dead(&env));

    let mut party = party(&env);
    for id in [HERO, MIRA] {
        party.with_actor(&env, id, |actor| actor.set_hp(&env, 0));
    }
    assert!(party.is_all_dead(&env));
    assert_eq!(party.random_target(&env, &mut GameRng::seeded(1)), None);

    party.revive_battle_members(&env);
    assert!(!party.is_all_dead(&env));
    assert!(party.members().iter().all(|a| a.hp() == 1));
}

#[test]
fn opening_rates_compare_agility() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let party = party(&env);
    let troop = troop(&env, SLIME_PACK);

    assert!((party.agility(&env) - 19.0).abs() < 1e-9);
    assert!((troop.agility(&env) - 9.0).abs() < 1e-9);
    let agility = troop.agility(&env);
    assert!((party.rate_preemptive(&env, agility) - 0.05).abs() < 1e-9);
    assert!((party.rate_surprise(&env, agility) - 0.03).abs() < 1e-9);
    assert!((party.rate_preemptive(&env, 100.0) - 0.03).abs() < 1e-9);
    assert!((party.rate_surprise(&env, 100.0) - 0.05).abs() < 1e-9);
    assert!(party.abilities(&env).is_empty());
}

#[test]
fn gold_and_items_are_clamped() {
    let content = content();
    let config = config();
    let env = env(&content, &config);
    let mut party = party(&env);

    party.gain_gold(&config, i64::MAX);
    assert_eq!(party.gold(), config.max_gold);
    party.lose_gold(&config, i64::MAX);
    assert_eq!(party.gold(), 0);

    let potion = ItemRef::Item(POTION);
    party.gain_item(&env, potion, 500, false);
    assert_eq!(party.num_items(potion), config.max_items);
    party.lose_item(&env, potion, 1_000, true);
    assert_eq!(party.num_items(potion), 0);
    assert!(!party.has_item(potion, true));

    let sword = ItemRef::Weapon(SWORD);
    assert!(!party.has_item(sword, false));
    assert!(party.has_item(sword, true));
    party.lose_item(&env, sword, 1, false);
    assert!(party.has_item(sword, true));
}
