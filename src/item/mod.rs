//! Item templates (prototypes) and generated item instances.
//!
//! - `Prototype`: read-only template keyed by integer id
//! - `ItemInstance`: the populated item handed back to the world
//! - `MutationCode`: packed per-template table keys (material, gem, color)
//! - Stat blocks for weapons, armor and cloaks

pub mod material;

use serde::{Deserialize, Serialize};

use crate::roll::{
    ArmorStyle, ArmorWeightClass, Heritage, Society, TreasureItemType, WeaponSubType,
};

pub use material::{Material, MaterialClass, ALL_MATERIALS};

// =====================================================
// Enums shared by templates and instances
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Slash,
    Pierce,
    Bludgeon,
    Fire,
    Cold,
    Acid,
    Electric,
}

impl DamageType {
    pub const ALL: [DamageType; 7] = [
        Self::Slash,
        Self::Pierce,
        Self::Bludgeon,
        Self::Fire,
        Self::Cold,
        Self::Acid,
        Self::Electric,
    ];

    pub const ELEMENTAL: [DamageType; 4] = [Self::Fire, Self::Cold, Self::Acid, Self::Electric];

    pub fn index(&self) -> usize {
        match self {
            Self::Slash => 0,
            Self::Pierce => 1,
            Self::Bludgeon => 2,
            Self::Fire => 3,
            Self::Cold => 4,
            Self::Acid => 5,
            Self::Electric => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    HeavyWeapons,
    LightWeapons,
    FinesseWeapons,
    TwoHandedCombat,
    MissileWeapons,
    WarMagic,
    LifeMagic,
    ManaConversion,
    MeleeDefense,
    MissileDefense,
    MagicDefense,
    DualWield,
    Thievery,
    Run,
    Attack,
    Shield,
}

/// Caster bias deciding which of the elemental / restoration pair is favored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasterSchool {
    War,
    Life,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GearRating {
    Damage,
    DamageResist,
    Crit,
    CritResist,
    CritDamage,
    CritDamageResist,
    HealBoost,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WieldRequirement {
    Skill { skill: Skill, difficulty: u32 },
    Level(u32),
    Society(Society),
}

// =====================================================
// Mutation code
// =====================================================

/// Packed table keys: material bits 0-7, gem 8-15, color 16-23, spell 24-31.
/// A zero field means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationCode(pub u32);

impl MutationCode {
    pub fn pack(material: u8, gem: u8, color: u8, spell: u8) -> Self {
        Self(
            material as u32
                | (gem as u32) << 8
                | (color as u32) << 16
                | (spell as u32) << 24,
        )
    }

    fn field(&self, shift: u32) -> Option<u8> {
        match ((self.0 >> shift) & 0xFF) as u8 {
            0 => None,
            code => Some(code),
        }
    }

    pub fn material_code(&self) -> Option<u8> {
        self.field(0)
    }

    pub fn gem_code(&self) -> Option<u8> {
        self.field(8)
    }

    pub fn color_code(&self) -> Option<u8> {
        self.field(16)
    }

    pub fn spell_code(&self) -> Option<u8> {
        self.field(24)
    }
}

// =====================================================
// Templates
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponTemplate {
    pub sub_type: WeaponSubType,
    pub wield_skill: Skill,
    /// Seconds per attack
    pub attack_cycle: f64,
    #[serde(default = "one")]
    pub strikes: u32,
    #[serde(default)]
    pub two_handed: bool,
    #[serde(default)]
    pub thrown: bool,
    /// Fraction of max damage the low roll can fall below max
    pub damage_variance: f64,
    pub damage_type: DamageType,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorTemplate {
    pub style: ArmorStyle,
    pub weight_class: ArmorWeightClass,
    /// Number of body locations covered
    pub coverage_slots: u32,
    #[serde(default)]
    pub headwear: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prototype {
    pub id: u32,
    pub name: String,
    pub item_type: TreasureItemType,
    pub base_value: u32,
    #[serde(default)]
    pub mutation: Option<MutationCode>,
    /// Palettes the model supports; empty means any
    #[serde(default)]
    pub palettes: Vec<u32>,
    #[serde(default)]
    pub armor_level: u32,
    #[serde(default)]
    pub ward_level: u32,
    #[serde(default)]
    pub resists: [f64; 7],
    #[serde(default)]
    pub weapon: Option<WeaponTemplate>,
    #[serde(default)]
    pub armor: Option<ArmorTemplate>,
    /// Fixed material of loose gems
    #[serde(default)]
    pub gem_material: Option<Material>,
    #[serde(default)]
    pub heritage: Option<Heritage>,
}

impl Prototype {
    pub fn new(id: u32, name: impl Into<String>, item_type: TreasureItemType, base_value: u32) -> Self {
        Self {
            id,
            name: name.into(),
            item_type,
            base_value,
            mutation: None,
            palettes: Vec::new(),
            armor_level: 0,
            ward_level: 0,
            resists: [0.0; 7],
            weapon: None,
            armor: None,
            gem_material: None,
            heritage: None,
        }
    }
}

// =====================================================
// Instance stat blocks
// =====================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeaponStats {
    pub max_damage: u32,
    pub damage_variance: f64,
    pub damage_type: Option<DamageType>,
    /// Missile damage multiplier
    pub damage_mod: f64,
    /// Flat elemental bonus (missile)
    pub elemental_bonus: u32,
    pub offense_mod: f64,
    pub melee_defense_mod: f64,
    pub missile_defense_mod: f64,
    pub magic_defense_mod: f64,
    pub mana_conversion_mod: f64,
    pub elemental_damage_mod: f64,
    pub restoration_mod: f64,
    pub school: Option<CasterSchool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmorStats {
    pub armor_level: u32,
    pub ward_level: u32,
    /// Resistance modifiers in `DamageType::index` order
    pub resists: [f64; 7],
    pub gear_ratings: Vec<(GearRating, u32)>,
    pub skill_mods: Vec<(Skill, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CloakProc {
    DamageReduction,
    Surge(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloakStats {
    pub set_id: u32,
    pub max_level: u32,
    pub proc: CloakProc,
}

// =====================================================
// Item instance
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub prototype_id: u32,
    pub name: String,
    pub item_type: TreasureItemType,
    pub tier: u8,
    pub material: Option<Material>,
    pub gem_count: u32,
    pub gem_type: Option<Material>,
    pub palette: Option<u32>,
    pub shade: Option<f64>,
    pub workmanship: Option<u8>,
    pub value: u32,
    pub stack_size: u32,
    pub long_desc: Option<String>,
    pub wield_requirements: Vec<WieldRequirement>,
    pub spells: Vec<u32>,
    pub is_magical: bool,
    pub weapon: Option<WeaponStats>,
    pub armor: Option<ArmorStats>,
    pub cloak: Option<CloakStats>,
    pub uses: Option<u32>,
    pub bonus: Option<u32>,
    pub mana_capacity: Option<u32>,
    pub item_level: Option<u32>,
}

impl ItemInstance {
    /// Unmutated instance carrying the template's innate values
    pub fn from_prototype(proto: &Prototype, tier: u8) -> Self {
        let armor = if proto.armor.is_some() || proto.armor_level > 0 {
            Some(ArmorStats {
                armor_level: proto.armor_level,
                ward_level: proto.ward_level,
                resists: proto.resists,
                ..Default::default()
            })
        } else {
            None
        };
        let weapon = proto.weapon.as_ref().map(|w| WeaponStats {
            damage_variance: w.damage_variance,
            damage_type: Some(w.damage_type),
            damage_mod: 1.0,
            ..Default::default()
        });
        Self {
            prototype_id: proto.id,
            name: proto.name.clone(),
            item_type: proto.item_type,
            tier,
            material: proto.gem_material,
            gem_count: 0,
            gem_type: None,
            palette: None,
            shade: None,
            workmanship: None,
            value: proto.base_value,
            stack_size: 1,
            long_desc: None,
            wield_requirements: Vec::new(),
            spells: Vec::new(),
            is_magical: false,
            weapon,
            armor,
            cloak: None,
            uses: None,
            bonus: None,
            mana_capacity: None,
            item_level: None,
        }
    }

    pub fn armor_level(&self) -> u32 {
        self.armor.as_ref().map(|a| a.armor_level).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_code_fields() {
        let code = MutationCode::pack(3, 1, 2, 0);
        assert_eq!(code.material_code(), Some(3));
        assert_eq!(code.gem_code(), Some(1));
        assert_eq!(code.color_code(), Some(2));
        assert_eq!(code.spell_code(), None);
        assert_eq!(MutationCode::default().material_code(), None);
    }

    #[test]
    fn test_instance_from_prototype() {
        let mut proto = Prototype::new(10, "Buckler", TreasureItemType::Armor, 40);
        proto.armor_level = 44;
        proto.ward_level = 2;
        let item = ItemInstance::from_prototype(&proto, 3);
        assert_eq!(item.tier, 3);
        assert_eq!(item.value, 40);
        assert_eq!(item.armor_level(), 44);
        assert!(item.weapon.is_none());
        assert!(item.workmanship.is_none());
    }

    #[test]
    fn test_prototype_ron_defaults() {
        let text = r#"(id: 5, name: "Pyreal", item_type: Pyreal, base_value: 1)"#;
        let proto: Prototype = ron::from_str(text).unwrap();
        assert_eq!(proto.id, 5);
        assert!(proto.mutation.is_none());
        assert!(proto.palettes.is_empty());
    }
}
