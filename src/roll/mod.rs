//! Treasure rolls: the decision record produced once per generated item.
//!
//! A `TreasureRoll` captures the resolved item type, the resolved sub-type,
//! the heritage and the chosen prototype, plus a snapshot of the
//! prototype's innate armor and ward levels. The sub-type is a sum type, so
//! a roll can never carry both a weapon family and an armor family.

use serde::{Deserialize, Serialize};

// =====================================================
// Item types
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreasureItemType {
    Pyreal,
    Gem,
    Jewelry,
    ArtObject,
    Weapon,
    Armor,
    Clothing,
    Scroll,
    Caster,
    ManaStone,
    Consumable,
    HealKit,
    Lockpick,
    SpellComponent,
    SocietyArmor,
    Cloak,
    PetDevice,
}

impl TreasureItemType {
    pub fn all() -> &'static [TreasureItemType] {
        &[
            Self::Pyreal,
            Self::Gem,
            Self::Jewelry,
            Self::ArtObject,
            Self::Weapon,
            Self::Armor,
            Self::Clothing,
            Self::Scroll,
            Self::Caster,
            Self::ManaStone,
            Self::Consumable,
            Self::HealKit,
            Self::Lockpick,
            Self::SpellComponent,
            Self::SocietyArmor,
            Self::Cloak,
            Self::PetDevice,
        ]
    }

    /// Types handled by the generic mutator
    pub fn is_generic(&self) -> bool {
        matches!(
            self,
            Self::Pyreal
                | Self::ArtObject
                | Self::Scroll
                | Self::ManaStone
                | Self::Consumable
                | Self::HealKit
                | Self::Lockpick
                | Self::SpellComponent
                | Self::PetDevice
        )
    }

    /// Stackables carry no workmanship
    pub fn has_workmanship(&self) -> bool {
        !matches!(
            self,
            Self::Pyreal
                | Self::Scroll
                | Self::ManaStone
                | Self::Consumable
                | Self::HealKit
                | Self::Lockpick
                | Self::SpellComponent
                | Self::PetDevice
        )
    }
}

// =====================================================
// Heritage
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heritage {
    Aluvian,
    Gharundim,
    Sho,
}

impl Heritage {
    pub const ALL: [Heritage; 3] = [Heritage::Aluvian, Heritage::Gharundim, Heritage::Sho];
}

// =====================================================
// Weapons
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeleeFamily {
    Axe,
    Dagger,
    Mace,
    Spear,
    Staff,
    Sword,
    Unarmed,
    TwoHanded,
}

impl MeleeFamily {
    pub const ALL: [MeleeFamily; 8] = [
        Self::Axe,
        Self::Dagger,
        Self::Mace,
        Self::Spear,
        Self::Staff,
        Self::Sword,
        Self::Unarmed,
        Self::TwoHanded,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileFamily {
    Bow,
    Crossbow,
    Atlatl,
}

impl MissileFamily {
    pub const ALL: [MissileFamily; 3] = [Self::Bow, Self::Crossbow, Self::Atlatl];

    /// Ammo damage scale relative to arrows
    pub fn ammo_scale(&self) -> f64 {
        match self {
            Self::Bow => 1.0,
            Self::Crossbow => 1.4,
            Self::Atlatl => 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CasterFamily {
    Orb,
    Sceptre,
    Wand,
    Baton,
}

impl CasterFamily {
    pub const ALL: [CasterFamily; 4] = [Self::Orb, Self::Sceptre, Self::Wand, Self::Baton];
}

/// Melee vs missile split of the weapon item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    Melee,
    Missile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSubType {
    Melee(MeleeFamily),
    Missile(MissileFamily),
    Caster(CasterFamily),
}

// =====================================================
// Armor
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorWeightClass {
    Cloth,
    Light,
    Heavy,
}

/// Construction family with a fixed base armor and ward level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorStyle {
    Cloth,
    Leather,
    StuddedLeather,
    Koujia,
    Amuli,
    Nariyid,
    Lorica,
    Chainmail,
    Scalemail,
    Platemail,
    Yoroi,
    Celdon,
    Diforsa,
    Covenant,
    Olthoi,
    Society,
    Shield,
}

impl ArmorStyle {
    pub const ALL: [ArmorStyle; 17] = [
        Self::Cloth,
        Self::Leather,
        Self::StuddedLeather,
        Self::Koujia,
        Self::Amuli,
        Self::Nariyid,
        Self::Lorica,
        Self::Chainmail,
        Self::Scalemail,
        Self::Platemail,
        Self::Yoroi,
        Self::Celdon,
        Self::Diforsa,
        Self::Covenant,
        Self::Olthoi,
        Self::Society,
        Self::Shield,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmorSubType {
    Robe,
    Leather,
    StuddedLeather,
    Koujia,
    Amuli,
    Nariyid,
    Lorica,
    Chainmail,
    Scalemail,
    Platemail,
    Yoroi,
    Celdon,
    Diforsa,
    Covenant,
    Olthoi,
    Shield,
}

impl ArmorSubType {
    pub const ALL: [ArmorSubType; 16] = [
        Self::Robe,
        Self::Leather,
        Self::StuddedLeather,
        Self::Koujia,
        Self::Amuli,
        Self::Nariyid,
        Self::Lorica,
        Self::Chainmail,
        Self::Scalemail,
        Self::Platemail,
        Self::Yoroi,
        Self::Celdon,
        Self::Diforsa,
        Self::Covenant,
        Self::Olthoi,
        Self::Shield,
    ];

    pub fn style(&self) -> ArmorStyle {
        match self {
            Self::Robe => ArmorStyle::Cloth,
            Self::Leather => ArmorStyle::Leather,
            Self::StuddedLeather => ArmorStyle::StuddedLeather,
            Self::Koujia => ArmorStyle::Koujia,
            Self::Amuli => ArmorStyle::Amuli,
            Self::Nariyid => ArmorStyle::Nariyid,
            Self::Lorica => ArmorStyle::Lorica,
            Self::Chainmail => ArmorStyle::Chainmail,
            Self::Scalemail => ArmorStyle::Scalemail,
            Self::Platemail => ArmorStyle::Platemail,
            Self::Yoroi => ArmorStyle::Yoroi,
            Self::Celdon => ArmorStyle::Celdon,
            Self::Diforsa => ArmorStyle::Diforsa,
            Self::Covenant => ArmorStyle::Covenant,
            Self::Olthoi => ArmorStyle::Olthoi,
            Self::Shield => ArmorStyle::Shield,
        }
    }

    pub fn weight_class(&self) -> ArmorWeightClass {
        match self {
            Self::Robe => ArmorWeightClass::Cloth,
            Self::Leather
            | Self::StuddedLeather
            | Self::Koujia
            | Self::Amuli
            | Self::Nariyid
            | Self::Lorica => ArmorWeightClass::Light,
            Self::Chainmail
            | Self::Scalemail
            | Self::Platemail
            | Self::Yoroi
            | Self::Celdon
            | Self::Diforsa
            | Self::Covenant
            | Self::Olthoi
            | Self::Shield => ArmorWeightClass::Heavy,
        }
    }

    /// Lowest tier at which the family can drop
    pub fn min_tier(&self) -> u8 {
        match self {
            Self::Robe | Self::Leather | Self::StuddedLeather | Self::Chainmail | Self::Shield => 1,
            Self::Koujia | Self::Scalemail | Self::Yoroi => 2,
            Self::Amuli | Self::Platemail => 3,
            Self::Nariyid | Self::Celdon | Self::Lorica => 4,
            Self::Diforsa => 5,
            Self::Covenant => 6,
            Self::Olthoi => 7,
        }
    }
}

// =====================================================
// Societies
// =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Society {
    CelestialHand,
    EldrytchWeb,
    RadiantBlood,
}

impl Society {
    pub const ALL: [Society; 3] = [Self::CelestialHand, Self::EldrytchWeb, Self::RadiantBlood];
}

// =====================================================
// Treasure roll
// =====================================================

/// Category-specific part of a roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollSubType {
    None,
    Weapon(WeaponSubType),
    Armor(ArmorSubType),
    Society(Society),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureRoll {
    pub item_type: TreasureItemType,
    pub sub_type: RollSubType,
    pub heritage: Heritage,
    pub prototype_id: u32,
    /// Prototype armor level captured before mutation
    pub base_armor_level: u32,
    pub base_ward_level: u32,
}

impl TreasureRoll {
    pub fn new(item_type: TreasureItemType, heritage: Heritage) -> Self {
        Self {
            item_type,
            sub_type: RollSubType::None,
            heritage,
            prototype_id: 0,
            base_armor_level: 0,
            base_ward_level: 0,
        }
    }

    /// Jewelry with an innate armor level mutates as armor
    pub fn has_armor_level(&self) -> bool {
        self.base_armor_level > 0
    }

    pub fn weapon_type(&self) -> Option<WeaponSubType> {
        match self.sub_type {
            RollSubType::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn armor_type(&self) -> Option<ArmorSubType> {
        match self.sub_type {
            RollSubType::Armor(a) => Some(a),
            _ => None,
        }
    }
}
