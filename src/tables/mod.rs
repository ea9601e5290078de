//! Static loot tables.
//!
//! `LootTables` aggregates every read-only lookup the engine consults:
//! - Item type selection per category and type code
//! - Weapon, caster and armor family tier tables plus prototype entry lists
//! - Jewelry, clothing, cloak, society and generic entry lists
//! - Gem class/material tables and the material -> gem prototype map
//! - Material, color, wield, legacy damage and armor style tables
//!
//! Tables are built once (either from the built-in descriptors or from RON)
//! and shared read-only across threads.

pub mod builtin;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::constants::{tier_index, TIER_COUNT};
use crate::item::{Material, MaterialClass, Skill};
use crate::profile::TreasureItemCategory;
use crate::roll::{
    ArmorStyle, ArmorSubType, ArmorWeightClass, CasterFamily, Heritage, MeleeFamily,
    MissileFamily, Society, TreasureItemType, WeaponClass,
};
use crate::table::{ChanceTable, ClassedTable, TierChanceTable};
use crate::world::PrototypeCatalog;

// =====================================================
// Entry lists
// =====================================================

/// A prototype eligible for a tier window, optionally heritage-specific
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierEntry {
    pub prototype_id: u32,
    #[serde(default)]
    pub heritage: Option<Heritage>,
    pub min_tier: u8,
    pub max_tier: u8,
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

fn unit_weight() -> f64 {
    1.0
}

impl TierEntry {
    pub fn new(prototype_id: u32, min_tier: u8, max_tier: u8) -> Self {
        Self {
            prototype_id,
            heritage: None,
            min_tier,
            max_tier,
            weight: 1.0,
        }
    }

    pub fn allows_tier(&self, tier: u8) -> bool {
        (self.min_tier..=self.max_tier).contains(&tier)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntryList {
    pub label: String,
    pub entries: Vec<TierEntry>,
}

impl EntryList {
    pub fn new(label: impl Into<String>, entries: Vec<TierEntry>) -> Self {
        Self {
            label: label.into(),
            entries,
        }
    }

    /// Prototype ids eligible at `tier`.
    ///
    /// With a heritage, entries of that heritage (or of no heritage) are
    /// preferred; when none qualify every tier-eligible entry is used.
    pub fn eligible(&self, tier: u8, heritage: Option<Heritage>) -> ChanceTable<u32> {
        let by_tier: Vec<&TierEntry> = self.entries.iter().filter(|e| e.allows_tier(tier)).collect();
        let preferred: Vec<&TierEntry> = match heritage {
            Some(h) => by_tier
                .iter()
                .copied()
                .filter(|e| e.heritage.map_or(true, |eh| eh == h))
                .collect(),
            None => by_tier.clone(),
        };
        let chosen = if preferred.is_empty() { by_tier } else { preferred };
        ChanceTable::new(
            format!("{}[t{tier}]", self.label),
            chosen.iter().map(|e| (e.prototype_id, e.weight)).collect(),
        )
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().map(|e| e.prototype_id)
    }
}

// =====================================================
// Sub-tables
// =====================================================

/// Item type selection tables keyed by type code, per category
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemTypeTables {
    pub item: HashMap<u32, ChanceTable<TreasureItemType>>,
    pub magic_item: HashMap<u32, ChanceTable<TreasureItemType>>,
    pub mundane_item: HashMap<u32, ChanceTable<TreasureItemType>>,
}

impl ItemTypeTables {
    pub fn for_category(&self, category: TreasureItemCategory) -> &HashMap<u32, ChanceTable<TreasureItemType>> {
        match category {
            TreasureItemCategory::Item => &self.item,
            TreasureItemCategory::MagicItem => &self.magic_item,
            TreasureItemCategory::MundaneItem => &self.mundane_item,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemTables {
    /// Gem class (1..=6) per tier, then gem material within the class
    pub classes: ClassedTable<u8, Material>,
    /// Loose gem prototype for each gem material
    pub prototypes: HashMap<Material, u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialTables {
    /// Material code -> per-tier material class
    pub by_code: HashMap<u8, TierChanceTable<MaterialClass>>,
    /// Material class -> per-tier material
    pub by_class: HashMap<MaterialClass, TierChanceTable<Material>>,
    /// Gem code -> socket count
    pub gem_counts: HashMap<u8, ChanceTable<u32>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorTables {
    /// Color code -> material class -> palette
    pub by_code: HashMap<u8, HashMap<MaterialClass, ChanceTable<u32>>>,
    /// Code selecting the uniform legacy palette list
    pub legacy_code: u8,
    pub legacy_palettes: Vec<u32>,
}

/// Wield difficulty per tier
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WieldTables {
    pub by_skill: HashMap<Skill, Vec<u32>>,
    pub by_weight_class: HashMap<ArmorWeightClass, Vec<u32>>,
    pub level: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleTables {
    /// (armor level, ward level) per point of coverage and tier
    pub bases: HashMap<ArmorStyle, (f64, f64)>,
    /// Shield prototypes with their own bases
    pub shields: HashMap<u32, (f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CloakTables {
    pub weave_sets: Vec<u32>,
    pub surge_spells: Vec<u32>,
}

// =====================================================
// Table set
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTables {
    pub item_types: ItemTypeTables,
    pub weapon_classes: TierChanceTable<WeaponClass>,
    pub melee_families: TierChanceTable<MeleeFamily>,
    pub missile_families: TierChanceTable<MissileFamily>,
    pub caster_families: TierChanceTable<CasterFamily>,
    pub armor_types: TierChanceTable<ArmorSubType>,
    pub melee: HashMap<MeleeFamily, EntryList>,
    pub missile: HashMap<MissileFamily, EntryList>,
    pub casters: HashMap<CasterFamily, EntryList>,
    pub armor: HashMap<ArmorSubType, EntryList>,
    pub clothing: EntryList,
    pub jewelry: EntryList,
    pub cloaks: EntryList,
    pub society: HashMap<Society, EntryList>,
    pub generic: HashMap<TreasureItemType, EntryList>,
    /// Mundane add-on side roll (coalesced mana, aetheria)
    #[serde(default)]
    pub addons: EntryList,
    pub gems: GemTables,
    pub materials: MaterialTables,
    pub colors: ColorTables,
    pub wield: WieldTables,
    /// Max damage per tier for mutations without a roll
    pub legacy_damage: HashMap<Skill, Vec<u32>>,
    pub styles: StyleTables,
    pub cloak: CloakTables,
}

static BUILTIN: OnceLock<Arc<LootTables>> = OnceLock::new();

impl LootTables {
    /// Shared built-in table set, built on first use
    pub fn builtin() -> Arc<LootTables> {
        BUILTIN
            .get_or_init(|| Arc::new(builtin::tables()))
            .clone()
    }

    /// Built-in tables together with the matching prototype catalog
    pub fn builtin_with_catalog() -> (Arc<LootTables>, Arc<PrototypeCatalog>) {
        (Self::builtin(), builtin::catalog())
    }

    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        let tables: LootTables = ron::from_str(text).context("failed to parse loot tables")?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read loot tables {}", path.display()))?;
        Self::from_ron_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_ron_string(&self) -> anyhow::Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("failed to serialize loot tables")
    }

    /// Tier-indexed tables must have 8 tiers; lists needed at tier 1 must
    /// have an eligible entry.
    pub fn validate(&self) -> anyhow::Result<()> {
        check_tiers("weapon_classes", self.weapon_classes.tier_count())?;
        check_tiers("melee_families", self.melee_families.tier_count())?;
        check_tiers("missile_families", self.missile_families.tier_count())?;
        check_tiers("caster_families", self.caster_families.tier_count())?;
        check_tiers("armor_types", self.armor_types.tier_count())?;
        check_tiers("gems.classes", self.gems.classes.classes.tier_count())?;
        for (code, table) in &self.materials.by_code {
            check_tiers(&format!("materials.by_code[{code}]"), table.tier_count())?;
        }
        for (class, table) in &self.materials.by_class {
            check_tiers(&format!("materials.by_class[{class:?}]"), table.tier_count())?;
        }
        for (skill, row) in self.wield.by_skill.iter().chain(self.legacy_damage.iter()) {
            check_tiers(&format!("{skill:?} tier row"), row.len())?;
        }
        for (class, row) in &self.wield.by_weight_class {
            check_tiers(&format!("wield[{class:?}]"), row.len())?;
        }
        check_tiers("wield.level", self.wield.level.len())?;

        if self.item_types.item.get(&1).is_none()
            || self.item_types.magic_item.get(&1).is_none()
            || self.item_types.mundane_item.get(&1).is_none()
        {
            bail!("item type tables must define code 1 for every category");
        }

        let tier1_lists = self
            .melee
            .values()
            .chain(self.missile.values())
            .chain(self.casters.values())
            .chain([&self.clothing, &self.jewelry, &self.cloaks]);
        for list in tier1_lists {
            if list.eligible(1, None).is_empty() {
                bail!("entry list '{}' has no tier 1 entry", list.label);
            }
        }
        for armor in ArmorSubType::ALL.iter().filter(|a| a.min_tier() <= 1) {
            let list = self
                .armor
                .get(armor)
                .with_context(|| format!("missing armor list for {armor:?}"))?;
            if list.eligible(1, None).is_empty() {
                bail!("entry list '{}' has no tier 1 entry", list.label);
            }
        }
        for society in Society::ALL {
            match self.society.get(&society) {
                Some(list) if !list.entries.is_empty() => {}
                _ => bail!("society armor list for {society:?} is empty"),
            }
        }
        let gem_tier1 = self.gems.classes.classes.for_tier(1);
        if gem_tier1.map_or(true, |t| t.is_empty()) {
            bail!("gem class table has no tier 1 entry");
        }
        if self.colors.legacy_palettes.is_empty() {
            bail!("legacy palette list is empty");
        }
        Ok(())
    }

    /// Every prototype id referenced by an entry list or map
    pub fn referenced_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .melee
            .values()
            .chain(self.missile.values())
            .chain(self.casters.values())
            .chain(self.armor.values())
            .chain(self.society.values())
            .chain(self.generic.values())
            .chain([&self.clothing, &self.jewelry, &self.cloaks, &self.addons])
            .flat_map(|list| list.ids())
            .chain(self.gems.prototypes.values().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn wield_difficulty_for_skill(&self, skill: Skill, tier: u8) -> u32 {
        self.wield
            .by_skill
            .get(&skill)
            .and_then(|row| row.get(tier_index(tier)).copied())
            .unwrap_or(0)
    }

    pub fn wield_difficulty_for_armor(&self, class: ArmorWeightClass, tier: u8) -> u32 {
        self.wield
            .by_weight_class
            .get(&class)
            .and_then(|row| row.get(tier_index(tier)).copied())
            .unwrap_or(0)
    }

    pub fn wield_level(&self, tier: u8) -> u32 {
        self.wield.level.get(tier_index(tier)).copied().unwrap_or(0)
    }
}

fn check_tiers(name: &str, count: usize) -> anyhow::Result<()> {
    if count != TIER_COUNT {
        bail!("table '{name}' has {count} tiers, expected {TIER_COUNT}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::PrototypeSource;

    #[test]
    fn test_builtin_validates() {
        let tables = LootTables::builtin();
        tables.validate().unwrap();
    }

    #[test]
    fn test_builtin_ids_exist_in_catalog() {
        let (tables, catalog) = LootTables::builtin_with_catalog();
        for id in tables.referenced_ids() {
            assert!(catalog.get_prototype(id).is_some(), "id {id} missing from catalog");
        }
    }

    #[test]
    fn test_eligible_prefers_heritage() {
        let list = EntryList::new(
            "swords",
            vec![
                TierEntry {
                    heritage: Some(Heritage::Sho),
                    ..TierEntry::new(1, 1, 8)
                },
                TierEntry {
                    heritage: Some(Heritage::Aluvian),
                    ..TierEntry::new(2, 1, 8)
                },
                TierEntry {
                    heritage: Some(Heritage::Aluvian),
                    ..TierEntry::new(3, 5, 8)
                },
            ],
        );
        let sho: Vec<u32> = list.eligible(1, Some(Heritage::Sho)).values().copied().collect();
        assert_eq!(sho, vec![1]);
        // No Gharundim entries: falls back to every tier-eligible entry
        let gharu: Vec<u32> = list
            .eligible(1, Some(Heritage::Gharundim))
            .values()
            .copied()
            .collect();
        assert_eq!(gharu, vec![1, 2]);
        assert!(list.eligible(9, None).is_empty());
    }

    #[test]
    fn test_validate_rejects_short_tier_rows() {
        let mut tables = (*LootTables::builtin()).clone();
        tables.wield.level.pop();
        let err = tables.validate().unwrap_err();
        assert!(err.to_string().contains("wield.level"));
    }

    #[test]
    fn test_validate_rejects_empty_tier1_list() {
        let mut tables = (*LootTables::builtin()).clone();
        tables.jewelry.entries.retain(|e| e.min_tier > 1);
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_wield_lookups() {
        let tables = LootTables::builtin();
        assert_eq!(tables.wield_difficulty_for_skill(Skill::HeavyWeapons, 1), 0);
        assert_eq!(tables.wield_difficulty_for_skill(Skill::HeavyWeapons, 8), 420);
        assert_eq!(tables.wield_difficulty_for_armor(ArmorWeightClass::Heavy, 8), 350);
        assert_eq!(tables.wield_level(7), 150);
    }
}
