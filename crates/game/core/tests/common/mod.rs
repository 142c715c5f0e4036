//! Shared content database for integration tests.
#![allow(dead_code)]

use battle_core::data::{
    ActorData, ArmorData, AutoRemovalTiming, ClassData, DropItem, EnemyAction, EnemyData,
    ExpCurve, ItemData, Learning, PageConditions, PageSpan, Restriction, SkillData, StateData,
    SystemData, TroopData, TroopMember, TroopPage, WeaponData,
};
use battle_core::{
    ActorId, ArmorId, BattleConfig, ClassId, ContentTables, EnemyId, Env, ItemId, ItemRef,
    SkillId, StateId, SwitchId, Trait, TraitCode, TroopId, WeaponId,
};

pub const HERO: ActorId = ActorId(1);
pub const MIRA: ActorId = ActorId(2);
pub const ROOK: ActorId = ActorId(3);
pub const ZED: ActorId = ActorId(4);
pub const ASH: ActorId = ActorId(5);

pub const WARRIOR: ClassId = ClassId(1);
pub const MAGE: ClassId = ClassId(2);

pub const DEAD: StateId = StateId(1);
pub const POISON: StateId = StateId(2);
pub const SLEEP: StateId = StateId(3);
pub const CONFUSION: StateId = StateId(4);
pub const BLESSING: StateId = StateId(5);
pub const WARD: StateId = StateId(6);
pub const AUTO: StateId = StateId(7);

pub const ATTACK: SkillId = SkillId(1);
pub const GUARD: SkillId = SkillId(2);
pub const FIRE: SkillId = SkillId(3);
pub const SLASH: SkillId = SkillId(4);
pub const BASH: SkillId = SkillId(5);
pub const ROAR: SkillId = SkillId(6);
pub const BITE: SkillId = SkillId(7);
pub const HOWL: SkillId = SkillId(8);
pub const BLIZZARD: SkillId = SkillId(9);

pub const POTION: ItemId = ItemId(1);

pub const SWORD: WeaponId = WeaponId(1);
pub const DAGGER: WeaponId = WeaponId(2);
pub const AXE: WeaponId = WeaponId(3);
pub const CURSED_BLADE: WeaponId = WeaponId(4);

pub const SHIELD: ArmorId = ArmorId(1);
pub const HELM: ArmorId = ArmorId(2);
pub const AXE_BRACER: ArmorId = ArmorId(3);
pub const PLATE: ArmorId = ArmorId(4);

pub const SLIME: EnemyId = EnemyId(1);
pub const OGRE: EnemyId = EnemyId(2);
pub const DECOY: EnemyId = EnemyId(3);
pub const BAT: EnemyId = EnemyId(4);
pub const KING_SLIME: EnemyId = EnemyId(5);

pub const SLIME_PACK: TroopId = TroopId(1);
pub const DECOY_TRIO: TroopId = TroopId(2);
pub const EVENT_TROOP: TroopId = TroopId(3);

pub const EVENT_SWITCH: SwitchId = SwitchId(5);

pub fn config() -> BattleConfig {
    BattleConfig::default()
}

pub fn env<'a>(content: &'a ContentTables, config: &'a BattleConfig) -> Env<'a> {
    Env::new(content, config)
}

fn state(id: StateId, name: &str, priority: i32) -> StateData {
    StateData {
        id,
        name: name.to_string(),
        icon_index: id.get(),
        priority,
        ..Default::default()
    }
}

fn skill(id: SkillId, name: &str, stype_id: u32) -> SkillData {
    SkillData {
        id,
        name: name.to_string(),
        stype_id,
        ..Default::default()
    }
}

fn weapon(id: WeaponId, name: &str, wtype_id: u32, atk: i32) -> WeaponData {
    WeaponData {
        id,
        name: name.to_string(),
        etype_id: 1,
        wtype_id,
        params: [0, 0, atk, 0, 0, 0, 0, 0],
        ..Default::default()
    }
}

fn armor(id: ArmorId, name: &str, etype_id: u32, atype_id: u32, def: i32) -> ArmorData {
    ArmorData {
        id,
        name: name.to_string(),
        etype_id,
        atype_id,
        params: [0, 0, 0, def, 0, 0, 0, 0],
        ..Default::default()
    }
}

fn actor(id: ActorId, name: &str, class_id: ClassId, level: i32, equips: [u32; 5]) -> ActorData {
    ActorData {
        id,
        name: name.to_string(),
        class_id,
        initial_level: level,
        max_level: 99,
        equips: equips.to_vec(),
        ..Default::default()
    }
}

fn enemy(id: EnemyId, name: &str, params: [i32; 8], actions: Vec<EnemyAction>) -> EnemyData {
    EnemyData {
        id,
        name: name.to_string(),
        params,
        actions,
        ..Default::default()
    }
}

fn member(enemy_id: EnemyId) -> TroopMember {
    TroopMember {
        enemy_id,
        ..Default::default()
    }
}

pub fn states() -> Vec<StateData> {
    vec![
        StateData {
            restriction: Restriction::CannotMove,
            ..state(DEAD, "Dead", 100)
        },
        StateData {
            auto_removal_timing: AutoRemovalTiming::TurnEnd,
            min_turns: 3,
            max_turns: 3,
            traits: vec![Trait::new(TraitCode::XParam, 7, -0.25)],
            ..state(POISON, "Poison", 50)
        },
        StateData {
            restriction: Restriction::CannotMove,
            remove_by_damage: true,
            chance_by_damage: 100,
            remove_at_battle_end: true,
            ..state(SLEEP, "Sleep", 80)
        },
        StateData {
            restriction: Restriction::AttackAnyone,
            ..state(CONFUSION, "Confusion", 60)
        },
        StateData {
            remove_by_restriction: true,
            traits: vec![Trait::new(TraitCode::Param, 2, 2.0)],
            ..state(BLESSING, "Blessing", 10)
        },
        StateData {
            traits: vec![Trait::flag(TraitCode::StateResist, POISON.get())],
            ..state(WARD, "Ward", 20)
        },
        StateData {
            traits: vec![Trait::flag(TraitCode::SpecialFlag, 0)],
            ..state(AUTO, "Auto", 5)
        },
    ]
}

pub fn content() -> ContentTables {
    let warrior = ClassData {
        id: WARRIOR,
        name: "Warrior".to_string(),
        exp_curve: ExpCurve::default(),
        params: ClassData::linear_params(
            [400, 40, 20, 20, 10, 10, 20, 10],
            [40, 4, 3, 3, 1, 1, 2, 1],
            99,
        ),
        learnings: vec![
            Learning { level: 1, skill_id: BASH },
            Learning { level: 3, skill_id: SLASH },
        ],
        traits: vec![
            Trait::flag(TraitCode::EquipWeaponType, 1),
            Trait::flag(TraitCode::EquipWeaponType, 2),
            Trait::flag(TraitCode::EquipArmorType, 1),
            Trait::flag(TraitCode::SkillTypeAdd, 2),
            Trait::new(TraitCode::XParam, 0, 0.95),
        ],
    };
    let mage = ClassData {
        id: MAGE,
        name: "Mage".to_string(),
        exp_curve: ExpCurve::new(0.0, 250.0, 30.0, 30.0),
        params: ClassData::linear_params(
            [300, 80, 10, 10, 30, 30, 15, 10],
            [30, 8, 1, 1, 3, 3, 1, 1],
            99,
        ),
        learnings: vec![
            Learning { level: 1, skill_id: FIRE },
            Learning { level: 5, skill_id: BLIZZARD },
        ],
        traits: vec![
            Trait::flag(TraitCode::EquipWeaponType, 1),
            Trait::flag(TraitCode::EquipArmorType, 1),
            Trait::flag(TraitCode::SkillTypeAdd, 1),
        ],
    };

    let mut builder = ContentTables::builder()
        .class(warrior)
        .class(mage)
        .actor(actor(HERO, "Hero", WARRIOR, 1, [1, 1, 2, 0, 0]))
        .actor(actor(MIRA, "Mira", MAGE, 1, [2, 0, 0, 0, 0]))
        .actor(actor(ROOK, "Rook", WARRIOR, 3, [0, 0, 0, 0, 0]))
        .actor(actor(ZED, "Zed", WARRIOR, 1, [0, 0, 0, 0, 0]))
        .actor(actor(ASH, "Ash", WARRIOR, 1, [0, 0, 0, 0, 0]))
        .skill(skill(ATTACK, "Attack", 0))
        .skill(skill(GUARD, "Guard", 0))
        .skill(SkillData {
            mp_cost: 5,
            ..skill(FIRE, "Fire", 1)
        })
        .skill(SkillData {
            required_wtype_ids: [2, 0],
            ..skill(SLASH, "Slash", 2)
        })
        .skill(skill(BASH, "Bash", 2))
        .skill(skill(ROAR, "Roar", 0))
        .skill(skill(BITE, "Bite", 0))
        .skill(skill(HOWL, "Howl", 0))
        .skill(SkillData {
            mp_cost: 8,
            ..skill(BLIZZARD, "Blizzard", 1)
        })
        .item(ItemData {
            id: POTION,
            name: "Potion".to_string(),
            consumable: true,
            ..Default::default()
        })
        .weapon(weapon(SWORD, "Sword", 2, 10))
        .weapon(weapon(DAGGER, "Dagger", 1, 5))
        .weapon(weapon(AXE, "Axe", 4, 20))
        .weapon(weapon(CURSED_BLADE, "Cursed Blade", 2, -1500))
        .armor(armor(SHIELD, "Shield", 2, 1, 5))
        .armor(armor(HELM, "Helm", 3, 1, 3))
        .armor(ArmorData {
            traits: vec![Trait::flag(TraitCode::EquipWeaponType, 4)],
            ..armor(AXE_BRACER, "Axe Bracer", 5, 1, 1)
        })
        .armor(armor(PLATE, "Plate", 4, 3, 12))
        .enemy(EnemyData {
            exp: 10,
            gold: 12,
            drop_items: vec![DropItem {
                item: ItemRef::Item(POTION),
                denominator: 1,
            }],
            ..enemy(
                SLIME,
                "Slime",
                [120, 0, 15, 10, 5, 5, 8, 5],
                vec![EnemyAction::new(BITE, 5)],
            )
        })
        .enemy(EnemyData {
            exp: 80,
            gold: 50,
            ..enemy(
                OGRE,
                "Ogre",
                [500, 0, 40, 30, 10, 10, 12, 5],
                vec![
                    EnemyAction::new(ROAR, 9),
                    EnemyAction::new(BITE, 7),
                    EnemyAction::new(HOWL, 4),
                    EnemyAction::new(ATTACK, 1),
                ],
            )
        })
        .enemy(EnemyData {
            traits: vec![Trait::new(TraitCode::SParam, 0, 2.0)],
            ..enemy(
                DECOY,
                "Decoy",
                [100, 0, 5, 5, 5, 5, 5, 5],
                vec![EnemyAction::new(ATTACK, 5)],
            )
        })
        .enemy(enemy(
            BAT,
            "Bat",
            [80, 0, 10, 5, 5, 5, 20, 5],
            vec![EnemyAction::new(ATTACK, 5)],
        ))
        .enemy(enemy(
            KING_SLIME,
            "King Slime",
            [900, 0, 50, 40, 10, 10, 6, 5],
            vec![EnemyAction::new(ATTACK, 5)],
        ))
        .troop(TroopData {
            id: SLIME_PACK,
            name: "Slime x3, Ogre".to_string(),
            members: vec![member(SLIME), member(SLIME), member(SLIME), member(OGRE)],
            pages: Vec::new(),
        })
        .troop(TroopData {
            id: DECOY_TRIO,
            name: "Decoy, Bat x2".to_string(),
            members: vec![member(DECOY), member(BAT), member(BAT)],
            pages: Vec::new(),
        })
        .troop(TroopData {
            id: EVENT_TROOP,
            name: "Event test".to_string(),
            members: vec![member(SLIME), member(KING_SLIME)],
            pages: vec![
                TroopPage {
                    conditions: PageConditions {
                        turn: Some((1, 0)),
                        ..Default::default()
                    },
                    span: PageSpan::Battle,
                },
                TroopPage {
                    conditions: PageConditions {
                        enemy_hp: Some((0, 50)),
                        ..Default::default()
                    },
                    span: PageSpan::Turn,
                },
                TroopPage {
                    conditions: PageConditions {
                        switch: Some(EVENT_SWITCH),
                        ..Default::default()
                    },
                    span: PageSpan::Moment,
                },
                TroopPage::default(),
            ],
        })
        .system(SystemData {
            party_members: vec![HERO, MIRA],
            ..Default::default()
        });
    for data in states() {
        builder = builder.state(data);
    }
    match builder.build() {
        Ok(tables) => tables,
        Err(err) => panic!("fixture content is invalid: {err}"),
    }
}
