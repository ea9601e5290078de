//! Treasure profiles: the input record of a loot request.
//!
//! A profile is attached to a monster, chest or scripted reward. It carries
//! the tier, three independent drop categories (item, magic item, mundane
//! item) each with a chance/min/max and a type-selection code, a quality
//! modifier that biases every diminishing roll, and an optional set of
//! forced choices.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_TIER, MIN_TIER};
use crate::error::{LootError, LootResult};
use crate::roll::{ArmorSubType, Heritage, TreasureItemType, WeaponSubType};

/// The three independent drop categories of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreasureItemCategory {
    Item,
    MagicItem,
    MundaneItem,
}

impl TreasureItemCategory {
    pub fn all() -> [TreasureItemCategory; 3] {
        [Self::Item, Self::MagicItem, Self::MundaneItem]
    }

    /// Items rolled in this category receive spells
    pub fn is_magical(&self) -> bool {
        matches!(self, Self::MagicItem)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::MagicItem => "magic_item",
            Self::MundaneItem => "mundane_item",
        }
    }
}

/// Drop chance, count range and type-selection code for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryChance {
    /// Percent, 0..=100
    pub chance: u8,
    pub min: u32,
    pub max: u32,
    /// Key into the category's item type selection tables
    pub type_code: u32,
}

impl CategoryChance {
    pub const NONE: CategoryChance = CategoryChance {
        chance: 0,
        min: 0,
        max: 0,
        type_code: 1,
    };

    pub fn new(chance: u8, min: u32, max: u32, type_code: u32) -> Self {
        Self {
            chance,
            min,
            max,
            type_code,
        }
    }

    /// Always drops exactly `count` items
    pub fn guaranteed(count: u32, type_code: u32) -> Self {
        Self::new(100, count, count, type_code)
    }
}

impl Default for CategoryChance {
    fn default() -> Self {
        Self::NONE
    }
}

/// Forced choices that bypass the corresponding table rolls
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(default)]
    pub item_type: Option<TreasureItemType>,
    #[serde(default)]
    pub armor_type: Option<ArmorSubType>,
    #[serde(default)]
    pub weapon_type: Option<WeaponSubType>,
    #[serde(default)]
    pub heritage: Option<Heritage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasureProfile {
    pub id: u32,
    pub tier: u8,
    /// 0.0 = plain diminishing rolls, 1.0 = every roll maxed
    #[serde(default)]
    pub quality_mod: f64,
    #[serde(default)]
    pub item: CategoryChance,
    #[serde(default)]
    pub magic_item: CategoryChance,
    #[serde(default)]
    pub mundane_item: CategoryChance,
    #[serde(default)]
    pub overrides: Option<ProfileOverrides>,
}

impl TreasureProfile {
    /// Profile with every category disabled
    pub fn new(id: u32, tier: u8) -> Self {
        Self {
            id,
            tier,
            quality_mod: 0.0,
            item: CategoryChance::NONE,
            magic_item: CategoryChance::NONE,
            mundane_item: CategoryChance::NONE,
            overrides: None,
        }
    }

    pub fn with_item(mut self, chance: CategoryChance) -> Self {
        self.item = chance;
        self
    }

    pub fn with_magic_item(mut self, chance: CategoryChance) -> Self {
        self.magic_item = chance;
        self
    }

    pub fn with_mundane_item(mut self, chance: CategoryChance) -> Self {
        self.mundane_item = chance;
        self
    }

    pub fn with_quality(mut self, quality_mod: f64) -> Self {
        self.quality_mod = quality_mod;
        self
    }

    pub fn with_overrides(mut self, overrides: ProfileOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn category(&self, category: TreasureItemCategory) -> &CategoryChance {
        match category {
            TreasureItemCategory::Item => &self.item,
            TreasureItemCategory::MagicItem => &self.magic_item,
            TreasureItemCategory::MundaneItem => &self.mundane_item,
        }
    }

    pub fn forced_item_type(&self) -> Option<TreasureItemType> {
        self.overrides.and_then(|o| o.item_type)
    }

    pub fn forced_armor_type(&self) -> Option<ArmorSubType> {
        self.overrides.and_then(|o| o.armor_type)
    }

    pub fn forced_weapon_type(&self) -> Option<WeaponSubType> {
        self.overrides.and_then(|o| o.weapon_type)
    }

    pub fn forced_heritage(&self) -> Option<Heritage> {
        self.overrides.and_then(|o| o.heritage)
    }

    /// Caller-contract check run once at the orchestrator entry point
    pub fn validate(&self) -> LootResult<()> {
        if !(MIN_TIER..=MAX_TIER).contains(&self.tier) {
            return Err(LootError::InvalidTier(self.tier));
        }
        if !(0.0..=1.0).contains(&self.quality_mod) {
            return Err(LootError::InvalidQualityMod(self.quality_mod));
        }
        for category in TreasureItemCategory::all() {
            let c = self.category(category);
            if c.chance > 100 {
                return Err(LootError::InvalidChance {
                    category,
                    chance: c.chance,
                });
            }
            if c.min > c.max {
                return Err(LootError::InvalidCountRange {
                    category,
                    min: c.min,
                    max: c.max,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_profile() {
        let profile = TreasureProfile::new(1, 3)
            .with_item(CategoryChance::new(50, 1, 3, 1))
            .with_quality(0.25);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_invalid_tier() {
        assert_eq!(
            TreasureProfile::new(1, 0).validate(),
            Err(LootError::InvalidTier(0))
        );
        assert_eq!(
            TreasureProfile::new(1, 9).validate(),
            Err(LootError::InvalidTier(9))
        );
    }

    #[test]
    fn test_invalid_count_range() {
        let profile = TreasureProfile::new(1, 2).with_mundane_item(CategoryChance::new(30, 4, 2, 1));
        assert_eq!(
            profile.validate(),
            Err(LootError::InvalidCountRange {
                category: TreasureItemCategory::MundaneItem,
                min: 4,
                max: 2
            })
        );
    }

    #[test]
    fn test_invalid_chance_and_quality() {
        let profile = TreasureProfile::new(1, 2).with_item(CategoryChance::new(101, 1, 1, 1));
        assert!(matches!(profile.validate(), Err(LootError::InvalidChance { .. })));

        let profile = TreasureProfile::new(1, 2).with_quality(1.5);
        assert_eq!(profile.validate(), Err(LootError::InvalidQualityMod(1.5)));

        let profile = TreasureProfile::new(1, 2).with_quality(f64::NAN);
        assert!(matches!(profile.validate(), Err(LootError::InvalidQualityMod(_))));
    }

    #[test]
    fn test_overrides_accessors() {
        let profile = TreasureProfile::new(1, 5).with_overrides(ProfileOverrides {
            item_type: Some(TreasureItemType::Armor),
            heritage: Some(Heritage::Sho),
            ..Default::default()
        });
        assert_eq!(profile.forced_item_type(), Some(TreasureItemType::Armor));
        assert_eq!(profile.forced_heritage(), Some(Heritage::Sho));
        assert_eq!(profile.forced_armor_type(), None);
    }

    #[test]
    fn test_ron_roundtrip_defaults() {
        let text = "(id: 7, tier: 4, item: (chance: 100, min: 1, max: 2, type_code: 1))";
        let profile: TreasureProfile = ron::from_str(text).unwrap();
        assert_eq!(profile.tier, 4);
        assert_eq!(profile.magic_item, CategoryChance::NONE);
        assert_eq!(profile.quality_mod, 0.0);
    }
}
