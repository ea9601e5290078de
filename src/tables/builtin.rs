//! Built-in data set.
//!
//! The table set and the prototype catalog are both derived from the
//! descriptor lists below, so every id an entry list references exists in
//! the catalog.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::constants::{
    GEM_CLASS_COUNT, GEM_CLASS_WEIGHTS, MAX_TIER, WIELD_ARMOR, WIELD_CASTER, WIELD_LEVEL,
    WIELD_MELEE, WIELD_MISSILE,
};
use crate::item::{
    ArmorTemplate, DamageType, Material, MaterialClass, MutationCode, Prototype, Skill,
    WeaponTemplate,
};
use crate::roll::{
    ArmorStyle, ArmorSubType, ArmorWeightClass, CasterFamily, Heritage, MeleeFamily,
    MissileFamily, Society, TreasureItemType, WeaponClass, WeaponSubType,
};
use crate::table::{ChanceTable, ClassedTable, TierChanceTable};
use crate::world::PrototypeCatalog;

use super::{
    CloakTables, ColorTables, EntryList, GemTables, ItemTypeTables, LootTables, MaterialTables,
    StyleTables, TierEntry, WieldTables,
};

use crate::roll::Heritage::{Aluvian, Gharundim, Sho};

// =====================================================
// Material / color / gem codes
// =====================================================

pub const MATERIAL_ARMOR: u8 = 1;
pub const MATERIAL_CLOTH: u8 = 2;
pub const MATERIAL_MELEE: u8 = 3;
pub const MATERIAL_MISSILE: u8 = 4;
pub const MATERIAL_CASTER: u8 = 5;
pub const MATERIAL_JEWELRY: u8 = 6;
pub const MATERIAL_ART: u8 = 7;

pub const GEMS_EQUIPMENT: u8 = 1;
pub const GEMS_JEWELRY: u8 = 2;
pub const GEMS_ART: u8 = 3;

pub const COLOR_BY_CLASS: u8 = 1;
pub const COLOR_DYEABLE: u8 = 2;
pub const COLOR_LEGACY: u8 = 9;

// =====================================================
// Descriptors
// =====================================================

struct WeaponDesc {
    id: u32,
    name: &'static str,
    sub_type: WeaponSubType,
    heritage: Option<Heritage>,
    min_tier: u8,
    skill: Skill,
    cycle: f64,
    strikes: u32,
    variance: f64,
    damage_type: DamageType,
    value: u32,
    coded: bool,
}

#[allow(clippy::too_many_arguments)]
const fn melee(
    id: u32,
    name: &'static str,
    family: MeleeFamily,
    heritage: Option<Heritage>,
    min_tier: u8,
    skill: Skill,
    cycle: f64,
    strikes: u32,
    variance: f64,
    damage_type: DamageType,
    value: u32,
) -> WeaponDesc {
    WeaponDesc {
        id,
        name,
        sub_type: WeaponSubType::Melee(family),
        heritage,
        min_tier,
        skill,
        cycle,
        strikes,
        variance,
        damage_type,
        value,
        coded: true,
    }
}

const fn uncoded(mut desc: WeaponDesc) -> WeaponDesc {
    desc.coded = false;
    desc
}

const MELEE: &[WeaponDesc] = &[
    melee(1001, "Hand Axe", MeleeFamily::Axe, Some(Aluvian), 1, Skill::HeavyWeapons, 1.1, 1, 0.45, DamageType::Slash, 80),
    melee(1002, "Ono", MeleeFamily::Axe, Some(Sho), 1, Skill::HeavyWeapons, 1.1, 1, 0.45, DamageType::Slash, 80),
    melee(1003, "Tungi", MeleeFamily::Axe, Some(Gharundim), 1, Skill::LightWeapons, 1.0, 1, 0.5, DamageType::Slash, 75),
    melee(1004, "War Axe", MeleeFamily::Axe, None, 3, Skill::HeavyWeapons, 1.2, 1, 0.4, DamageType::Slash, 140),
    melee(1010, "Dagger", MeleeFamily::Dagger, Some(Aluvian), 1, Skill::FinesseWeapons, 0.8, 2, 0.5, DamageType::Pierce, 50),
    melee(1011, "Jambiya", MeleeFamily::Dagger, Some(Gharundim), 1, Skill::FinesseWeapons, 0.8, 2, 0.5, DamageType::Pierce, 55),
    melee(1012, "Knife", MeleeFamily::Dagger, Some(Sho), 1, Skill::FinesseWeapons, 0.75, 1, 0.55, DamageType::Pierce, 40),
    melee(1020, "Mace", MeleeFamily::Mace, Some(Aluvian), 1, Skill::HeavyWeapons, 1.1, 1, 0.35, DamageType::Bludgeon, 90),
    uncoded(melee(1021, "Jitte", MeleeFamily::Mace, Some(Sho), 1, Skill::LightWeapons, 0.9, 1, 0.4, DamageType::Bludgeon, 70)),
    melee(1022, "Kasrullah", MeleeFamily::Mace, Some(Gharundim), 1, Skill::HeavyWeapons, 1.1, 1, 0.35, DamageType::Bludgeon, 90),
    melee(1030, "Spear", MeleeFamily::Spear, Some(Aluvian), 1, Skill::HeavyWeapons, 1.0, 1, 0.4, DamageType::Pierce, 70),
    melee(1031, "Yari", MeleeFamily::Spear, Some(Sho), 1, Skill::LightWeapons, 1.0, 1, 0.4, DamageType::Pierce, 70),
    melee(1032, "Budiaq", MeleeFamily::Spear, Some(Gharundim), 1, Skill::FinesseWeapons, 0.9, 1, 0.45, DamageType::Pierce, 65),
    melee(1040, "Quarter Staff", MeleeFamily::Staff, Some(Aluvian), 1, Skill::LightWeapons, 1.0, 1, 0.4, DamageType::Bludgeon, 45),
    melee(1041, "Jo", MeleeFamily::Staff, Some(Sho), 1, Skill::LightWeapons, 0.9, 1, 0.4, DamageType::Bludgeon, 40),
    uncoded(melee(1042, "Nabut", MeleeFamily::Staff, Some(Gharundim), 1, Skill::FinesseWeapons, 0.9, 1, 0.45, DamageType::Bludgeon, 40)),
    melee(1050, "Long Sword", MeleeFamily::Sword, Some(Aluvian), 1, Skill::HeavyWeapons, 1.0, 1, 0.4, DamageType::Slash, 100),
    melee(1051, "Yaoji", MeleeFamily::Sword, Some(Sho), 1, Skill::HeavyWeapons, 1.0, 1, 0.4, DamageType::Slash, 100),
    melee(1052, "Scimitar", MeleeFamily::Sword, Some(Gharundim), 1, Skill::LightWeapons, 0.9, 1, 0.45, DamageType::Slash, 95),
    melee(1053, "Broad Sword", MeleeFamily::Sword, Some(Aluvian), 2, Skill::HeavyWeapons, 1.1, 1, 0.35, DamageType::Slash, 130),
    melee(1054, "Shamshir", MeleeFamily::Sword, Some(Gharundim), 2, Skill::FinesseWeapons, 0.9, 2, 0.5, DamageType::Slash, 120),
    melee(1060, "Cestus", MeleeFamily::Unarmed, Some(Aluvian), 1, Skill::LightWeapons, 0.7, 1, 0.5, DamageType::Bludgeon, 40),
    melee(1061, "Katar", MeleeFamily::Unarmed, Some(Gharundim), 1, Skill::FinesseWeapons, 0.7, 1, 0.5, DamageType::Pierce, 45),
    melee(1062, "Nekode", MeleeFamily::Unarmed, Some(Sho), 1, Skill::FinesseWeapons, 0.7, 1, 0.5, DamageType::Slash, 45),
    melee(1070, "Nodachi", MeleeFamily::TwoHanded, Some(Sho), 1, Skill::TwoHandedCombat, 1.5, 1, 0.3, DamageType::Slash, 160),
    melee(1071, "Great Axe", MeleeFamily::TwoHanded, Some(Aluvian), 1, Skill::TwoHandedCombat, 1.6, 1, 0.3, DamageType::Slash, 160),
    melee(1072, "Shashqa", MeleeFamily::TwoHanded, Some(Gharundim), 1, Skill::TwoHandedCombat, 1.5, 1, 0.3, DamageType::Slash, 150),
];

const fn missile(
    id: u32,
    name: &'static str,
    family: MissileFamily,
    heritage: Option<Heritage>,
    min_tier: u8,
    cycle: f64,
    value: u32,
) -> WeaponDesc {
    WeaponDesc {
        id,
        name,
        sub_type: WeaponSubType::Missile(family),
        heritage,
        min_tier,
        skill: Skill::MissileWeapons,
        cycle,
        strikes: 1,
        variance: 0.0,
        damage_type: DamageType::Pierce,
        value,
        coded: true,
    }
}

const MISSILE: &[WeaponDesc] = &[
    missile(2001, "Shortbow", MissileFamily::Bow, Some(Aluvian), 1, 1.2, 90),
    missile(2002, "Yumi", MissileFamily::Bow, Some(Sho), 1, 1.2, 90),
    missile(2003, "Nayin", MissileFamily::Bow, Some(Gharundim), 1, 1.2, 90),
    missile(2004, "Longbow", MissileFamily::Bow, Some(Aluvian), 2, 1.4, 130),
    missile(2005, "Compound Bow", MissileFamily::Bow, None, 5, 1.3, 220),
    missile(2010, "Light Crossbow", MissileFamily::Crossbow, None, 1, 1.7, 120),
    missile(2011, "Heavy Crossbow", MissileFamily::Crossbow, None, 3, 2.0, 180),
    missile(2020, "Atlatl", MissileFamily::Atlatl, None, 1, 1.0, 70),
    missile(2021, "Royal Atlatl", MissileFamily::Atlatl, None, 4, 1.0, 150),
];

const fn caster(id: u32, name: &'static str, family: CasterFamily, min_tier: u8, value: u32) -> WeaponDesc {
    WeaponDesc {
        id,
        name,
        sub_type: WeaponSubType::Caster(family),
        heritage: None,
        min_tier,
        skill: Skill::WarMagic,
        cycle: 1.0,
        strikes: 1,
        variance: 0.0,
        damage_type: DamageType::Fire,
        value,
        coded: true,
    }
}

const CASTERS: &[WeaponDesc] = &[
    caster(3001, "Orb", CasterFamily::Orb, 1, 150),
    caster(3002, "Crystal Orb", CasterFamily::Orb, 4, 300),
    caster(3010, "Sceptre", CasterFamily::Sceptre, 1, 160),
    caster(3011, "Jeweled Sceptre", CasterFamily::Sceptre, 5, 350),
    caster(3020, "Wand", CasterFamily::Wand, 1, 120),
    caster(3021, "Ivory Wand", CasterFamily::Wand, 3, 250),
    caster(3030, "Baton", CasterFamily::Baton, 1, 130),
];

struct ArmorDesc {
    id: u32,
    name: &'static str,
    sub_type: ArmorSubType,
    heritage: Option<Heritage>,
    slots: u32,
    headwear: bool,
    value: u32,
}

const fn armor(
    id: u32,
    name: &'static str,
    sub_type: ArmorSubType,
    heritage: Option<Heritage>,
    slots: u32,
    value: u32,
) -> ArmorDesc {
    ArmorDesc {
        id,
        name,
        sub_type,
        heritage,
        slots,
        headwear: false,
        value,
    }
}

const fn helm(id: u32, name: &'static str, sub_type: ArmorSubType, heritage: Option<Heritage>, value: u32) -> ArmorDesc {
    ArmorDesc {
        id,
        name,
        sub_type,
        heritage,
        slots: 1,
        headwear: true,
        value,
    }
}

const ARMOR: &[ArmorDesc] = &[
    armor(4001, "Robe", ArmorSubType::Robe, None, 5, 60),
    armor(4002, "Hooded Robe", ArmorSubType::Robe, Some(Gharundim), 6, 75),
    helm(4010, "Leather Cap", ArmorSubType::Leather, None, 30),
    armor(4011, "Leather Coat", ArmorSubType::Leather, None, 3, 70),
    armor(4012, "Leather Gauntlets", ArmorSubType::Leather, None, 1, 30),
    armor(4013, "Leather Boots", ArmorSubType::Leather, None, 1, 30),
    armor(4020, "Studded Leather Cuirass", ArmorSubType::StuddedLeather, None, 1, 60),
    armor(4021, "Studded Leather Leggings", ArmorSubType::StuddedLeather, None, 2, 80),
    armor(4030, "Koujia Breastplate", ArmorSubType::Koujia, Some(Sho), 1, 100),
    helm(4031, "Koujia Kabuton", ArmorSubType::Koujia, Some(Sho), 70),
    armor(4040, "Amuli Shadow Coat", ArmorSubType::Amuli, Some(Gharundim), 3, 160),
    armor(4041, "Amuli Shadow Leggings", ArmorSubType::Amuli, Some(Gharundim), 2, 120),
    armor(4050, "Nariyid Girth", ArmorSubType::Nariyid, Some(Gharundim), 1, 110),
    armor(4051, "Nariyid Hauberk", ArmorSubType::Nariyid, Some(Gharundim), 3, 190),
    armor(4060, "Lorica Breastplate", ArmorSubType::Lorica, None, 1, 120),
    helm(4061, "Lorica Helm", ArmorSubType::Lorica, None, 90),
    armor(4070, "Chainmail Shirt", ArmorSubType::Chainmail, Some(Aluvian), 2, 90),
    helm(4071, "Chainmail Coif", ArmorSubType::Chainmail, Some(Aluvian), 50),
    armor(4072, "Chainmail Leggings", ArmorSubType::Chainmail, None, 2, 90),
    armor(4080, "Scalemail Hauberk", ArmorSubType::Scalemail, None, 3, 160),
    armor(4081, "Scalemail Gauntlets", ArmorSubType::Scalemail, None, 1, 60),
    armor(4090, "Platemail Cuirass", ArmorSubType::Platemail, Some(Aluvian), 1, 150),
    armor(4091, "Platemail Greaves", ArmorSubType::Platemail, None, 1, 120),
    helm(4092, "Great Helm", ArmorSubType::Platemail, Some(Aluvian), 110),
    armor(4100, "Yoroi Breastplate", ArmorSubType::Yoroi, Some(Sho), 1, 140),
    armor(4101, "Yoroi Pauldrons", ArmorSubType::Yoroi, Some(Sho), 1, 100),
    armor(4110, "Celdon Breastplate", ArmorSubType::Celdon, None, 1, 220),
    armor(4111, "Celdon Sleeves", ArmorSubType::Celdon, None, 2, 260),
    armor(4120, "Diforsa Cuirass", ArmorSubType::Diforsa, None, 1, 240),
    helm(4121, "Diforsa Helm", ArmorSubType::Diforsa, None, 180),
    armor(4130, "Covenant Breastplate", ArmorSubType::Covenant, None, 1, 400),
    helm(4131, "Covenant Helm", ArmorSubType::Covenant, None, 300),
    armor(4140, "Olthoi Breastplate", ArmorSubType::Olthoi, None, 1, 500),
    helm(4141, "Olthoi Helm", ArmorSubType::Olthoi, None, 380),
    armor(4150, "Buckler", ArmorSubType::Shield, None, 1, 40),
    armor(4151, "Round Shield", ArmorSubType::Shield, None, 1, 60),
    armor(4152, "Kite Shield", ArmorSubType::Shield, None, 1, 90),
    armor(4153, "Large Kite Shield", ArmorSubType::Shield, None, 1, 120),
    armor(4154, "Tower Shield", ArmorSubType::Shield, None, 1, 160),
    armor(4155, "Covenant Shield", ArmorSubType::Shield, None, 1, 350),
];

/// Shield id, min tier, (armor, ward) base
const SHIELDS: &[(u32, u8, (f64, f64))] = &[
    (4150, 1, (22.0, 1.0)),
    (4151, 1, (26.0, 1.0)),
    (4152, 2, (28.0, 1.0)),
    (4153, 3, (30.0, 1.0)),
    (4154, 4, (34.0, 1.0)),
    (4155, 6, (38.0, 2.0)),
];

const STYLE_BASES: &[(ArmorStyle, (f64, f64))] = &[
    (ArmorStyle::Cloth, (5.0, 4.0)),
    (ArmorStyle::Leather, (18.0, 0.0)),
    (ArmorStyle::StuddedLeather, (20.0, 0.0)),
    (ArmorStyle::Koujia, (22.0, 1.0)),
    (ArmorStyle::Amuli, (22.0, 2.0)),
    (ArmorStyle::Nariyid, (21.0, 3.0)),
    (ArmorStyle::Lorica, (20.0, 3.0)),
    (ArmorStyle::Chainmail, (24.0, 0.0)),
    (ArmorStyle::Scalemail, (25.0, 0.0)),
    (ArmorStyle::Platemail, (28.0, 0.0)),
    (ArmorStyle::Yoroi, (27.0, 0.0)),
    (ArmorStyle::Celdon, (28.0, 1.0)),
    (ArmorStyle::Diforsa, (27.0, 1.0)),
    (ArmorStyle::Covenant, (32.0, 1.0)),
    (ArmorStyle::Olthoi, (33.0, 2.0)),
    (ArmorStyle::Society, (30.0, 3.0)),
    (ArmorStyle::Shield, (30.0, 2.0)),
];

/// Clothing: id, name, slots, headwear, value
const CLOTHING: &[(u32, &str, u32, bool, u32)] = &[
    (5001, "Shirt", 2, false, 15),
    (5002, "Pants", 2, false, 15),
    (5003, "Tunic", 3, false, 25),
    (5004, "Cap", 1, true, 10),
    (5005, "Gloves", 1, false, 12),
    (5006, "Shoes", 1, false, 12),
];

/// Jewelry: id, name, min tier, value
const JEWELRY: &[(u32, &str, u8, u32)] = &[
    (6001, "Ring", 1, 120),
    (6002, "Bracelet", 1, 150),
    (6003, "Necklace", 1, 180),
    (6004, "Amulet", 2, 220),
    (6005, "Pendant", 1, 140),
];

/// Jewelry worn on the head with an innate armor level
const CROWN: (u32, &str, u8, u32, u32) = (6006, "Crown", 3, 400, 40);

const CLOAKS: &[(u32, &str, u32)] = &[(7001, "Cloak", 250), (7002, "Heavy Cloak", 320)];

const SOCIETY_PIECES: &[(&str, u32, bool)] = &[
    ("Breastplate", 1, false),
    ("Gauntlets", 1, false),
    ("Helm", 1, true),
];

/// Generic: id, name, item type, min tier, max tier, value, mutation code
const GENERIC: &[(u32, &str, TreasureItemType, u8, u8, u32, Option<MutationCode>)] = &[
    (10001, "Pyreal", TreasureItemType::Pyreal, 1, 8, 1, None),
    (10010, "Statuette", TreasureItemType::ArtObject, 1, 8, 200, Some(MutationCode(0x0001_0307))),
    (10011, "Goblet", TreasureItemType::ArtObject, 1, 8, 150, Some(MutationCode(0x0001_0307))),
    (10012, "Tapestry", TreasureItemType::ArtObject, 2, 8, 300, Some(MutationCode(0x0009_0007))),
    (10013, "Jeweled Bowl", TreasureItemType::ArtObject, 3, 8, 400, Some(MutationCode(0x0001_0307))),
    (10020, "Scroll of Flame Bolt", TreasureItemType::Scroll, 1, 8, 50, None),
    (10021, "Scroll of Heal Self", TreasureItemType::Scroll, 1, 8, 50, None),
    (10022, "Scroll of Blade Bane", TreasureItemType::Scroll, 4, 8, 250, None),
    (10030, "Tiny Mana Stone", TreasureItemType::ManaStone, 1, 3, 20, None),
    (10031, "Greater Mana Stone", TreasureItemType::ManaStone, 3, 8, 120, None),
    (10040, "Health Potion", TreasureItemType::Consumable, 1, 8, 25, None),
    (10041, "Mana Potion", TreasureItemType::Consumable, 1, 8, 25, None),
    (10042, "Stamina Elixir", TreasureItemType::Consumable, 2, 8, 40, None),
    (10050, "Crude Healing Kit", TreasureItemType::HealKit, 1, 8, 30, None),
    (10051, "Adept Healing Kit", TreasureItemType::HealKit, 3, 8, 90, None),
    (10060, "Plain Lockpick", TreasureItemType::Lockpick, 1, 8, 30, None),
    (10061, "Good Lockpick", TreasureItemType::Lockpick, 4, 8, 90, None),
    (10070, "Prismatic Taper", TreasureItemType::SpellComponent, 1, 8, 5, None),
    (10071, "Hyssop", TreasureItemType::SpellComponent, 1, 8, 8, None),
    (10072, "Lead Scarab", TreasureItemType::SpellComponent, 1, 8, 10, None),
    (10080, "Pet Essence", TreasureItemType::PetDevice, 1, 8, 100, None),
];

/// Add-ons: id, name, item type, value
const ADDONS: &[(u32, &str, TreasureItemType, u32)] = &[
    (10090, "Coalesced Mana", TreasureItemType::Consumable, 100),
    (10091, "Aetheria", TreasureItemType::Jewelry, 500),
];

const GEM_BASE_ID: u32 = 8000;
const SOCIETY_BASE_ID: u32 = 9000;

// =====================================================
// Helpers
// =====================================================

fn weapon_material_code(sub_type: WeaponSubType) -> u8 {
    match sub_type {
        WeaponSubType::Melee(_) => MATERIAL_MELEE,
        WeaponSubType::Missile(_) => MATERIAL_MISSILE,
        WeaponSubType::Caster(_) => MATERIAL_CASTER,
    }
}

fn uniform_weights<T: Clone>(values: &[T]) -> impl FnMut(u8) -> Vec<(T, f64)> + '_ {
    move |_| values.iter().map(|v| (v.clone(), 1.0)).collect()
}

/// Weight drifting from the front of the list at tier 1 to the back at tier 8
fn drifting(values: &[Material], tier: u8) -> Vec<(Material, f64)> {
    let n = values.len();
    let f = (tier.clamp(1, MAX_TIER) - 1) as f64 / (MAX_TIER - 1) as f64;
    values
        .iter()
        .enumerate()
        .map(|(i, m)| (*m, (n - i) as f64 * (1.0 - f) + (i + 1) as f64 * f))
        .collect()
}

fn palettes(range: std::ops::RangeInclusive<u32>) -> ChanceTable<u32> {
    ChanceTable::uniform("palettes", range)
}

fn class_palettes(class: MaterialClass) -> std::ops::RangeInclusive<u32> {
    match class {
        MaterialClass::Cloth => 1..=16,
        MaterialClass::Metal => 20..=27,
        MaterialClass::Leather => 28..=33,
        MaterialClass::Wood => 34..=39,
        MaterialClass::Stone => 40..=45,
        MaterialClass::Gem => 46..=52,
    }
}

fn type_table(label: &str, weights: &[(TreasureItemType, f64)]) -> ChanceTable<TreasureItemType> {
    ChanceTable::new(label, weights.to_vec())
}

// =====================================================
// Prototypes
// =====================================================

fn weapon_prototype(desc: &WeaponDesc) -> Prototype {
    let item_type = match desc.sub_type {
        WeaponSubType::Caster(_) => TreasureItemType::Caster,
        _ => TreasureItemType::Weapon,
    };
    let mut proto = Prototype::new(desc.id, desc.name, item_type, desc.value);
    if desc.coded {
        proto.mutation = Some(MutationCode::pack(
            weapon_material_code(desc.sub_type),
            GEMS_EQUIPMENT,
            COLOR_BY_CLASS,
            0,
        ));
    }
    proto.heritage = desc.heritage;
    proto.weapon = Some(WeaponTemplate {
        sub_type: desc.sub_type,
        wield_skill: desc.skill,
        attack_cycle: desc.cycle,
        strikes: desc.strikes,
        two_handed: desc.skill == Skill::TwoHandedCombat,
        thrown: matches!(desc.sub_type, WeaponSubType::Missile(MissileFamily::Atlatl)),
        damage_variance: desc.variance,
        damage_type: desc.damage_type,
    });
    proto
}

fn style_base(style: ArmorStyle) -> (f64, f64) {
    STYLE_BASES
        .iter()
        .find(|(s, _)| *s == style)
        .map(|(_, b)| *b)
        .unwrap_or((0.0, 0.0))
}

fn armor_prototype(desc: &ArmorDesc) -> Prototype {
    let mut proto = Prototype::new(desc.id, desc.name, TreasureItemType::Armor, desc.value);
    let style = desc.sub_type.style();
    let weight_class = desc.sub_type.weight_class();
    let material = if weight_class == ArmorWeightClass::Cloth {
        MATERIAL_CLOTH
    } else {
        MATERIAL_ARMOR
    };
    let color = if weight_class == ArmorWeightClass::Cloth {
        COLOR_DYEABLE
    } else {
        COLOR_BY_CLASS
    };
    proto.mutation = Some(MutationCode::pack(material, GEMS_EQUIPMENT, color, 0));
    proto.heritage = desc.heritage;
    let (base_al, base_ward) = SHIELDS
        .iter()
        .find(|(id, _, _)| *id == desc.id)
        .map(|(_, _, b)| *b)
        .unwrap_or_else(|| style_base(style));
    // Innate level: what a mid-tier piece carries before any mutation
    proto.armor_level = (base_al * 2.0 * desc.slots as f64).round() as u32;
    proto.ward_level = (base_ward * 2.0).round() as u32;
    proto.armor = Some(ArmorTemplate {
        style,
        weight_class,
        coverage_slots: desc.slots,
        headwear: desc.headwear,
    });
    proto
}

fn clothing_prototype(&(id, name, slots, headwear, value): &(u32, &str, u32, bool, u32)) -> Prototype {
    let mut proto = Prototype::new(id, name, TreasureItemType::Clothing, value);
    proto.mutation = Some(MutationCode::pack(MATERIAL_CLOTH, 0, COLOR_DYEABLE, 0));
    proto.palettes = (1..=16).collect();
    proto.armor_level = 10 * slots;
    proto.armor = Some(ArmorTemplate {
        style: ArmorStyle::Cloth,
        weight_class: ArmorWeightClass::Cloth,
        coverage_slots: slots,
        headwear,
    });
    proto
}

fn jewelry_prototype(&(id, name, _, value): &(u32, &str, u8, u32)) -> Prototype {
    let mut proto = Prototype::new(id, name, TreasureItemType::Jewelry, value);
    proto.mutation = Some(MutationCode::pack(MATERIAL_JEWELRY, GEMS_JEWELRY, COLOR_BY_CLASS, 0));
    proto
}

fn crown_prototype() -> Prototype {
    let (id, name, _, value, armor_level) = CROWN;
    let mut proto = Prototype::new(id, name, TreasureItemType::Jewelry, value);
    proto.mutation = Some(MutationCode::pack(MATERIAL_JEWELRY, GEMS_JEWELRY, COLOR_BY_CLASS, 0));
    proto.armor_level = armor_level;
    proto.armor = Some(ArmorTemplate {
        style: ArmorStyle::Cloth,
        weight_class: ArmorWeightClass::Cloth,
        coverage_slots: 1,
        headwear: true,
    });
    proto
}

fn cloak_prototype(&(id, name, value): &(u32, &str, u32)) -> Prototype {
    let mut proto = Prototype::new(id, name, TreasureItemType::Cloak, value);
    proto.mutation = Some(MutationCode::pack(MATERIAL_CLOTH, 0, COLOR_DYEABLE, 0));
    proto
}

fn gem_prototype(index: usize, gem: Material) -> Prototype {
    let class = gem.gem_class().unwrap_or(1) as usize;
    let value = crate::constants::GEM_CLASS_VALUE[class - 1];
    let mut proto = Prototype::new(
        GEM_BASE_ID + index as u32,
        gem.display_name(),
        TreasureItemType::Gem,
        value,
    );
    proto.gem_material = Some(gem);
    proto
}

fn society_id(society: Society, piece: usize) -> u32 {
    let offset = match society {
        Society::CelestialHand => 0,
        Society::EldrytchWeb => 10,
        Society::RadiantBlood => 20,
    };
    SOCIETY_BASE_ID + offset + piece as u32 + 1
}

fn society_prototype(society: Society, piece: usize) -> Prototype {
    let (piece_name, slots, headwear) = SOCIETY_PIECES[piece];
    let name = match society {
        Society::CelestialHand => format!("Celestial Hand {piece_name}"),
        Society::EldrytchWeb => format!("Eldrytch Web {piece_name}"),
        Society::RadiantBlood => format!("Radiant Blood {piece_name}"),
    };
    let mut proto = Prototype::new(society_id(society, piece), name, TreasureItemType::SocietyArmor, 600);
    proto.mutation = Some(MutationCode::pack(MATERIAL_ARMOR, 0, COLOR_BY_CLASS, 0));
    let (base_al, base_ward) = style_base(ArmorStyle::Society);
    proto.armor_level = (base_al * 2.0) as u32;
    proto.ward_level = (base_ward * 2.0) as u32;
    proto.armor = Some(ArmorTemplate {
        style: ArmorStyle::Society,
        weight_class: ArmorWeightClass::Heavy,
        coverage_slots: slots,
        headwear,
    });
    proto
}

fn generic_prototype(
    &(id, name, item_type, _, _, value, mutation): &(u32, &str, TreasureItemType, u8, u8, u32, Option<MutationCode>),
) -> Prototype {
    let mut proto = Prototype::new(id, name, item_type, value);
    proto.mutation = mutation;
    proto
}

fn addon_prototype(&(id, name, item_type, value): &(u32, &str, TreasureItemType, u32)) -> Prototype {
    Prototype::new(id, name, item_type, value)
}

/// Every built-in prototype
pub fn prototypes() -> Vec<Prototype> {
    let mut out = Vec::new();
    out.extend(MELEE.iter().map(weapon_prototype));
    out.extend(MISSILE.iter().map(weapon_prototype));
    out.extend(CASTERS.iter().map(weapon_prototype));
    out.extend(ARMOR.iter().map(armor_prototype));
    out.extend(CLOTHING.iter().map(clothing_prototype));
    out.extend(JEWELRY.iter().map(jewelry_prototype));
    out.push(crown_prototype());
    out.extend(CLOAKS.iter().map(cloak_prototype));
    out.extend(
        Material::all_gems()
            .into_iter()
            .enumerate()
            .map(|(i, gem)| gem_prototype(i, gem)),
    );
    for society in Society::ALL {
        out.extend((0..SOCIETY_PIECES.len()).map(|piece| society_prototype(society, piece)));
    }
    out.extend(GENERIC.iter().map(generic_prototype));
    out.extend(ADDONS.iter().map(addon_prototype));
    out
}

static CATALOG: OnceLock<Arc<PrototypeCatalog>> = OnceLock::new();

/// Shared catalog matching `tables()`
pub fn catalog() -> Arc<PrototypeCatalog> {
    CATALOG
        .get_or_init(|| Arc::new(PrototypeCatalog::from_prototypes(prototypes())))
        .clone()
}

// =====================================================
// Tables
// =====================================================

fn weapon_entries(descs: &[WeaponDesc], matches: impl Fn(WeaponSubType) -> bool, label: &str) -> EntryList {
    EntryList::new(
        label,
        descs
            .iter()
            .filter(|d| matches(d.sub_type))
            .map(|d| TierEntry {
                heritage: d.heritage,
                ..TierEntry::new(d.id, d.min_tier, MAX_TIER)
            })
            .collect(),
    )
}

fn item_type_tables() -> ItemTypeTables {
    use TreasureItemType::*;
    let mut tables = ItemTypeTables::default();
    tables.item.insert(
        1,
        type_table(
            "item[1]",
            &[
                (Pyreal, 20.0),
                (Gem, 10.0),
                (ArtObject, 8.0),
                (Weapon, 20.0),
                (Armor, 18.0),
                (Clothing, 8.0),
                (Jewelry, 8.0),
                (Caster, 4.0),
                (Cloak, 2.0),
                (SocietyArmor, 2.0),
            ],
        ),
    );
    tables.item.insert(
        2,
        type_table("item[2]", &[(Pyreal, 50.0), (Gem, 30.0), (ArtObject, 20.0)]),
    );
    tables.magic_item.insert(
        1,
        type_table(
            "magic_item[1]",
            &[
                (Weapon, 28.0),
                (Armor, 24.0),
                (Caster, 14.0),
                (Jewelry, 14.0),
                (Clothing, 8.0),
                (Cloak, 6.0),
                (Gem, 3.0),
                (SocietyArmor, 3.0),
            ],
        ),
    );
    tables.magic_item.insert(
        2,
        type_table("magic_item[2]", &[(Armor, 70.0), (Clothing, 20.0), (SocietyArmor, 10.0)]),
    );
    tables.magic_item.insert(
        3,
        type_table("magic_item[3]", &[(Weapon, 70.0), (Caster, 30.0)]),
    );
    tables
        .magic_item
        .insert(4, type_table("magic_item[4]", &[(Jewelry, 100.0)]));
    tables.mundane_item.insert(
        1,
        type_table(
            "mundane_item[1]",
            &[
                (Pyreal, 30.0),
                (Consumable, 20.0),
                (HealKit, 10.0),
                (Lockpick, 8.0),
                (SpellComponent, 15.0),
                (ManaStone, 7.0),
                (Scroll, 5.0),
                (PetDevice, 5.0),
            ],
        ),
    );
    tables
        .mundane_item
        .insert(2, type_table("mundane_item[2]", &[(Pyreal, 100.0)]));
    tables.mundane_item.insert(
        3,
        type_table(
            "mundane_item[3]",
            &[(Consumable, 50.0), (HealKit, 25.0), (SpellComponent, 25.0)],
        ),
    );
    tables
}

fn armor_type_table() -> TierChanceTable<ArmorSubType> {
    TierChanceTable::from_fn("armor_types", |tier| {
        ArmorSubType::ALL
            .iter()
            .filter(|a| a.min_tier() <= tier)
            .map(|a| {
                let weight = match a {
                    ArmorSubType::Robe => 6.0,
                    ArmorSubType::Shield => 12.0,
                    ArmorSubType::Olthoi => 8.0,
                    _ => 10.0,
                };
                (*a, weight)
            })
            .collect()
    })
}

fn armor_entries() -> HashMap<ArmorSubType, EntryList> {
    let mut lists = HashMap::new();
    for sub_type in ArmorSubType::ALL {
        let entries = ARMOR
            .iter()
            .filter(|d| d.sub_type == sub_type)
            .map(|d| {
                let min_tier = SHIELDS
                    .iter()
                    .find(|(id, _, _)| *id == d.id)
                    .map(|(_, t, _)| *t)
                    .unwrap_or_else(|| sub_type.min_tier());
                TierEntry {
                    heritage: d.heritage,
                    ..TierEntry::new(d.id, min_tier, MAX_TIER)
                }
            })
            .collect();
        lists.insert(sub_type, EntryList::new(format!("armor::{sub_type:?}"), entries));
    }
    lists
}

fn gem_tables() -> GemTables {
    let classes = TierChanceTable::from_fn("gem_classes", |tier| {
        let weights = GEM_CLASS_WEIGHTS[(tier - 1) as usize];
        (0..GEM_CLASS_COUNT)
            .map(|i| ((i + 1) as u8, weights[i]))
            .collect()
    });
    let gems = Material::all_gems();
    let mut members = HashMap::new();
    for class in 1..=GEM_CLASS_COUNT as u8 {
        let of_class: Vec<Material> = gems
            .iter()
            .copied()
            .filter(|g| g.gem_class() == Some(class))
            .collect();
        members.insert(class, ChanceTable::uniform(format!("gems[{class}]"), of_class));
    }
    let prototypes = gems
        .iter()
        .enumerate()
        .map(|(i, g)| (*g, GEM_BASE_ID + i as u32))
        .collect();
    GemTables {
        classes: ClassedTable { classes, members },
        prototypes,
    }
}

fn material_tables() -> MaterialTables {
    use MaterialClass::*;
    let code_weights: &[(u8, &[(MaterialClass, f64)])] = &[
        (MATERIAL_ARMOR, &[(Leather, 40.0), (Metal, 60.0)]),
        (MATERIAL_CLOTH, &[(Cloth, 80.0), (Leather, 20.0)]),
        (MATERIAL_MELEE, &[(Metal, 75.0), (Wood, 15.0), (Stone, 10.0)]),
        (MATERIAL_MISSILE, &[(Wood, 100.0)]),
        (MATERIAL_CASTER, &[(Wood, 40.0), (Stone, 30.0), (Metal, 20.0), (Gem, 10.0)]),
        (MATERIAL_JEWELRY, &[(Metal, 50.0), (Stone, 25.0), (Gem, 25.0)]),
        (
            MATERIAL_ART,
            &[(Stone, 35.0), (Metal, 25.0), (Wood, 20.0), (Cloth, 10.0), (Gem, 10.0)],
        ),
    ];
    let mut tables = MaterialTables::default();
    for (code, weights) in code_weights {
        tables.by_code.insert(
            *code,
            TierChanceTable::from_fn(format!("material_code[{code}]"), |_| weights.to_vec()),
        );
    }
    for class in MaterialClass::ALL {
        let members = Material::of_class(class);
        tables.by_class.insert(
            class,
            TierChanceTable::from_fn(format!("materials[{class:?}]"), |tier| drifting(&members, tier)),
        );
    }
    tables.gem_counts.insert(
        GEMS_EQUIPMENT,
        ChanceTable::new("gem_count[1]", vec![(0, 60.0), (1, 30.0), (2, 10.0)]),
    );
    tables.gem_counts.insert(
        GEMS_JEWELRY,
        ChanceTable::new("gem_count[2]", vec![(1, 40.0), (2, 30.0), (3, 20.0), (4, 10.0)]),
    );
    tables.gem_counts.insert(
        GEMS_ART,
        ChanceTable::new(
            "gem_count[3]",
            vec![(1, 30.0), (2, 25.0), (3, 20.0), (4, 15.0), (5, 10.0)],
        ),
    );
    tables
}

fn color_tables() -> ColorTables {
    let mut by_class = HashMap::new();
    let mut dyeable = HashMap::new();
    for class in MaterialClass::ALL {
        by_class.insert(class, palettes(class_palettes(class)));
        let mut entries: Vec<u32> = class_palettes(class).collect();
        entries.extend(1..=8);
        entries.sort_unstable();
        entries.dedup();
        dyeable.insert(class, ChanceTable::uniform("palettes", entries));
    }
    let mut by_code = HashMap::new();
    by_code.insert(COLOR_BY_CLASS, by_class);
    by_code.insert(COLOR_DYEABLE, dyeable);
    ColorTables {
        by_code,
        legacy_code: COLOR_LEGACY,
        legacy_palettes: (61..=78).collect(),
    }
}

fn wield_tables() -> WieldTables {
    let mut by_skill = HashMap::new();
    for skill in [
        Skill::HeavyWeapons,
        Skill::LightWeapons,
        Skill::FinesseWeapons,
        Skill::TwoHandedCombat,
    ] {
        by_skill.insert(skill, WIELD_MELEE.to_vec());
    }
    by_skill.insert(Skill::MissileWeapons, WIELD_MISSILE.to_vec());
    by_skill.insert(Skill::WarMagic, WIELD_CASTER.to_vec());
    by_skill.insert(Skill::LifeMagic, WIELD_CASTER.to_vec());
    let by_weight_class = [
        ArmorWeightClass::Cloth,
        ArmorWeightClass::Light,
        ArmorWeightClass::Heavy,
    ]
    .into_iter()
    .map(|c| (c, WIELD_ARMOR.to_vec()))
    .collect();
    WieldTables {
        by_skill,
        by_weight_class,
        level: WIELD_LEVEL.to_vec(),
    }
}

fn legacy_damage() -> HashMap<Skill, Vec<u32>> {
    HashMap::from([
        (Skill::HeavyWeapons, vec![8, 12, 16, 20, 24, 28, 32, 36]),
        (Skill::LightWeapons, vec![7, 10, 14, 17, 21, 24, 28, 31]),
        (Skill::FinesseWeapons, vec![6, 9, 12, 15, 18, 21, 24, 27]),
        (Skill::TwoHandedCombat, vec![10, 15, 20, 25, 30, 35, 40, 45]),
    ])
}

/// The built-in table set
pub fn tables() -> LootTables {
    let melee = MeleeFamily::ALL
        .into_iter()
        .map(|family| {
            let list = weapon_entries(
                MELEE,
                |s| s == WeaponSubType::Melee(family),
                &format!("melee::{family:?}"),
            );
            (family, list)
        })
        .collect();
    let missile = MissileFamily::ALL
        .into_iter()
        .map(|family| {
            let list = weapon_entries(
                MISSILE,
                |s| s == WeaponSubType::Missile(family),
                &format!("missile::{family:?}"),
            );
            (family, list)
        })
        .collect();
    let casters = CasterFamily::ALL
        .into_iter()
        .map(|family| {
            let list = weapon_entries(
                CASTERS,
                |s| s == WeaponSubType::Caster(family),
                &format!("caster::{family:?}"),
            );
            (family, list)
        })
        .collect();

    let clothing = EntryList::new(
        "clothing",
        CLOTHING.iter().map(|c| TierEntry::new(c.0, 1, MAX_TIER)).collect(),
    );
    let mut jewelry_entries: Vec<TierEntry> = JEWELRY
        .iter()
        .map(|j| TierEntry::new(j.0, j.2, MAX_TIER))
        .collect();
    jewelry_entries.push(TierEntry {
        weight: 0.5,
        ..TierEntry::new(CROWN.0, CROWN.2, MAX_TIER)
    });
    let jewelry = EntryList::new("jewelry", jewelry_entries);
    let cloaks = EntryList::new(
        "cloaks",
        CLOAKS.iter().map(|c| TierEntry::new(c.0, 1, MAX_TIER)).collect(),
    );
    let society = Society::ALL
        .into_iter()
        .map(|s| {
            let entries = (0..SOCIETY_PIECES.len())
                .map(|piece| TierEntry::new(society_id(s, piece), 1, MAX_TIER))
                .collect();
            (s, EntryList::new(format!("society::{s:?}"), entries))
        })
        .collect();

    let mut generic: HashMap<TreasureItemType, EntryList> = HashMap::new();
    for desc in GENERIC {
        let (id, _, item_type, min_tier, max_tier, _, _) = *desc;
        generic
            .entry(item_type)
            .or_insert_with(|| EntryList::new(format!("generic::{item_type:?}"), Vec::new()))
            .entries
            .push(TierEntry::new(id, min_tier, max_tier));
    }
    let addons = EntryList::new(
        "addons",
        ADDONS.iter().map(|a| TierEntry::new(a.0, 1, MAX_TIER)).collect(),
    );

    LootTables {
        item_types: item_type_tables(),
        weapon_classes: TierChanceTable::from_fn("weapon_classes", |_| {
            vec![(WeaponClass::Melee, 70.0), (WeaponClass::Missile, 30.0)]
        }),
        melee_families: TierChanceTable::from_fn(
            "melee_families",
            uniform_weights(&MeleeFamily::ALL),
        ),
        missile_families: TierChanceTable::from_fn("missile_families", |_| {
            vec![
                (MissileFamily::Bow, 50.0),
                (MissileFamily::Crossbow, 30.0),
                (MissileFamily::Atlatl, 20.0),
            ]
        }),
        caster_families: TierChanceTable::from_fn("caster_families", |_| {
            vec![
                (CasterFamily::Orb, 20.0),
                (CasterFamily::Sceptre, 25.0),
                (CasterFamily::Wand, 30.0),
                (CasterFamily::Baton, 25.0),
            ]
        }),
        armor_types: armor_type_table(),
        melee,
        missile,
        casters,
        armor: armor_entries(),
        clothing,
        jewelry,
        cloaks,
        society,
        generic,
        addons,
        gems: gem_tables(),
        materials: material_tables(),
        colors: color_tables(),
        wield: wield_tables(),
        legacy_damage: legacy_damage(),
        styles: StyleTables {
            bases: STYLE_BASES.iter().copied().collect(),
            shields: SHIELDS.iter().map(|(id, _, b)| (*id, *b)).collect(),
        },
        cloak: CloakTables {
            weave_sets: (1..=12).collect(),
            surge_spells: vec![5753, 5754, 5755, 5756, 5757],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prototype_ids_unique() {
        let protos = prototypes();
        let ids: HashSet<u32> = protos.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), protos.len());
    }

    #[test]
    fn test_every_family_has_tier1_entry() {
        let t = tables();
        for family in MeleeFamily::ALL {
            assert!(!t.melee[&family].eligible(1, None).is_empty(), "{family:?}");
        }
        for family in MissileFamily::ALL {
            assert!(!t.missile[&family].eligible(1, None).is_empty(), "{family:?}");
        }
        for family in CasterFamily::ALL {
            assert!(!t.casters[&family].eligible(1, None).is_empty(), "{family:?}");
        }
    }

    #[test]
    fn test_armor_table_respects_min_tier() {
        let t = tables();
        let tier1 = t.armor_types.for_tier(1).unwrap();
        assert!(tier1.values().all(|a| a.min_tier() <= 1));
        let tier8 = t.armor_types.for_tier(8).unwrap();
        assert_eq!(tier8.len(), ArmorSubType::ALL.len());
    }

    #[test]
    fn test_some_weapons_lack_mutation_code() {
        let protos = prototypes();
        assert!(protos
            .iter()
            .any(|p| p.weapon.is_some() && p.mutation.is_none()));
    }

    #[test]
    fn test_legacy_palette_list() {
        let t = tables();
        assert_eq!(t.colors.legacy_palettes.len(), 18);
        assert_eq!(t.colors.legacy_palettes[0], 61);
    }

    #[test]
    fn test_crown_has_armor_level() {
        let protos = prototypes();
        let crown = protos.iter().find(|p| p.id == CROWN.0).unwrap();
        assert_eq!(crown.item_type, TreasureItemType::Jewelry);
        assert!(crown.armor_level > 0);
    }
}
