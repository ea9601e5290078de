//! Category roll: item type, sub-type, heritage, then a concrete
//! prototype id from the tier-windowed tables.

use tracing::{debug, warn};

use crate::error::{LootError, LootResult};
use crate::profile::{TreasureItemCategory, TreasureProfile};
use crate::rng::LootRng;
use crate::roll::{
    Heritage, RollSubType, Society, TreasureItemType, TreasureRoll, WeaponClass, WeaponSubType,
};
use crate::tables::{EntryList, LootTables};

const FALLBACK_TYPE_CODE: u32 = 1;

/// Full roll for one item of `category`. The base armor/ward snapshot is
/// left at zero; the orchestrator fills it from the prototype.
pub fn roll_treasure(
    tables: &LootTables,
    profile: &TreasureProfile,
    category: TreasureItemCategory,
    rng: &mut LootRng,
) -> LootResult<TreasureRoll> {
    let item_type = select_item_type(tables, profile, category, rng)?;
    let heritage = select_heritage(profile, rng);
    let mut roll = TreasureRoll::new(item_type, heritage);
    roll.sub_type = select_sub_type(tables, profile, item_type, rng)?;
    roll.prototype_id = select_prototype_id(tables, profile.tier, &roll, rng)?;
    debug!(
        category = category.as_str(),
        item_type = ?roll.item_type,
        sub_type = ?roll.sub_type,
        prototype = roll.prototype_id,
        "treasure rolled"
    );
    Ok(roll)
}

pub fn select_item_type(
    tables: &LootTables,
    profile: &TreasureProfile,
    category: TreasureItemCategory,
    rng: &mut LootRng,
) -> LootResult<TreasureItemType> {
    if let Some(forced) = profile.forced_item_type() {
        return Ok(forced);
    }
    let by_code = tables.item_types.for_category(category);
    let code = profile.category(category).type_code;
    let table = match by_code.get(&code) {
        Some(table) => table,
        None => {
            warn!(
                category = category.as_str(),
                code,
                "unknown item type code, using code {FALLBACK_TYPE_CODE}"
            );
            by_code
                .get(&FALLBACK_TYPE_CODE)
                .ok_or_else(|| LootError::no_entry(format!("{}[{FALLBACK_TYPE_CODE}]", category.as_str())))?
        }
    };
    table.roll(rng)
}

pub fn select_heritage(profile: &TreasureProfile, rng: &mut LootRng) -> Heritage {
    profile
        .forced_heritage()
        .unwrap_or_else(|| rng.choose(&Heritage::ALL).copied().unwrap_or(Heritage::Aluvian))
}

pub fn select_sub_type(
    tables: &LootTables,
    profile: &TreasureProfile,
    item_type: TreasureItemType,
    rng: &mut LootRng,
) -> LootResult<RollSubType> {
    let tier = profile.tier;
    let sub_type = match item_type {
        TreasureItemType::Weapon => {
            let weapon = match profile.forced_weapon_type() {
                Some(forced @ (WeaponSubType::Melee(_) | WeaponSubType::Missile(_))) => forced,
                _ => match tables.weapon_classes.roll(tier, rng)? {
                    WeaponClass::Melee => WeaponSubType::Melee(tables.melee_families.roll(tier, rng)?),
                    WeaponClass::Missile => {
                        WeaponSubType::Missile(tables.missile_families.roll(tier, rng)?)
                    }
                },
            };
            RollSubType::Weapon(weapon)
        }
        TreasureItemType::Caster => {
            let caster = match profile.forced_weapon_type() {
                Some(forced @ WeaponSubType::Caster(_)) => forced,
                _ => WeaponSubType::Caster(tables.caster_families.roll(tier, rng)?),
            };
            RollSubType::Weapon(caster)
        }
        TreasureItemType::Armor => match profile.forced_armor_type() {
            Some(forced) => RollSubType::Armor(forced),
            None => RollSubType::Armor(tables.armor_types.roll(tier, rng)?),
        },
        TreasureItemType::SocietyArmor => {
            let society = rng
                .choose(&Society::ALL)
                .copied()
                .ok_or_else(|| LootError::no_entry("society"))?;
            RollSubType::Society(society)
        }
        _ => RollSubType::None,
    };
    Ok(sub_type)
}

fn list<'a>(list: Option<&'a EntryList>, label: &str) -> LootResult<&'a EntryList> {
    list.ok_or_else(|| LootError::no_entry(label))
}

pub fn select_prototype_id(
    tables: &LootTables,
    tier: u8,
    roll: &TreasureRoll,
    rng: &mut LootRng,
) -> LootResult<u32> {
    use TreasureItemType as T;
    let heritage = Some(roll.heritage);
    let entries = match (roll.item_type, roll.sub_type) {
        (T::Gem, _) => {
            let gem = tables.gems.classes.roll(tier, rng)?;
            return tables
                .gems
                .prototypes
                .get(&gem)
                .copied()
                .ok_or_else(|| LootError::no_entry(format!("gem prototype for {gem:?}")));
        }
        (_, RollSubType::Weapon(WeaponSubType::Melee(family))) => {
            list(tables.melee.get(&family), &format!("melee {family:?}"))?
        }
        (_, RollSubType::Weapon(WeaponSubType::Missile(family))) => {
            list(tables.missile.get(&family), &format!("missile {family:?}"))?
        }
        (_, RollSubType::Weapon(WeaponSubType::Caster(family))) => {
            list(tables.casters.get(&family), &format!("caster {family:?}"))?
        }
        (_, RollSubType::Armor(armor)) => list(tables.armor.get(&armor), &format!("armor {armor:?}"))?,
        (_, RollSubType::Society(society)) => {
            let entries = list(tables.society.get(&society), &format!("society {society:?}"))?;
            return entries.eligible(tier, None).roll(rng);
        }
        (T::Clothing, _) => &tables.clothing,
        (T::Jewelry, _) => &tables.jewelry,
        (T::Cloak, _) => &tables.cloaks,
        (t, _) => list(tables.generic.get(&t), &format!("generic {t:?}"))?,
    };
    entries.eligible(tier, heritage).roll(rng)
}

/// Mundane add-on prototype (legacy side roll)
pub fn select_addon(tables: &LootTables, tier: u8, rng: &mut LootRng) -> LootResult<u32> {
    tables.addons.eligible(tier, None).roll(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{CategoryChance, ProfileOverrides};
    use crate::roll::{ArmorSubType, MeleeFamily};
    use crate::world::PrototypeSource;

    fn setup() -> (std::sync::Arc<LootTables>, std::sync::Arc<crate::world::PrototypeCatalog>) {
        LootTables::builtin_with_catalog()
    }

    #[test]
    fn test_every_roll_resolves_to_known_prototype() {
        let (tables, catalog) = setup();
        let mut rng = LootRng::new(11);
        for tier in 1..=8u8 {
            let profile = TreasureProfile::new(1, tier);
            for category in TreasureItemCategory::all() {
                for _ in 0..100 {
                    let roll = roll_treasure(&tables, &profile, category, &mut rng).unwrap();
                    let proto = catalog.get_prototype(roll.prototype_id).unwrap();
                    assert_eq!(proto.item_type, roll.item_type);
                }
            }
        }
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let (tables, _) = setup();
        let mut rng = LootRng::new(12);
        let profile = TreasureProfile::new(1, 3).with_mundane_item(CategoryChance::new(100, 1, 1, 999));
        let t = select_item_type(&tables, &profile, TreasureItemCategory::MundaneItem, &mut rng).unwrap();
        assert!(t.is_generic());
    }

    #[test]
    fn test_overrides_bypass_tables() {
        let (tables, catalog) = setup();
        let mut rng = LootRng::new(13);
        let profile = TreasureProfile::new(1, 5).with_overrides(ProfileOverrides {
            item_type: Some(TreasureItemType::Weapon),
            weapon_type: Some(WeaponSubType::Melee(MeleeFamily::Sword)),
            heritage: Some(Heritage::Sho),
            ..Default::default()
        });
        for _ in 0..50 {
            let roll = roll_treasure(&tables, &profile, TreasureItemCategory::Item, &mut rng).unwrap();
            assert_eq!(roll.sub_type, RollSubType::Weapon(WeaponSubType::Melee(MeleeFamily::Sword)));
            assert_eq!(roll.heritage, Heritage::Sho);
            assert!(catalog.get_prototype(roll.prototype_id).is_some());
        }
    }

    #[test]
    fn test_forced_armor_type() {
        let (tables, _) = setup();
        let mut rng = LootRng::new(14);
        let profile = TreasureProfile::new(1, 8).with_overrides(ProfileOverrides {
            item_type: Some(TreasureItemType::Armor),
            armor_type: Some(ArmorSubType::Olthoi),
            ..Default::default()
        });
        let roll = roll_treasure(&tables, &profile, TreasureItemCategory::MagicItem, &mut rng).unwrap();
        assert_eq!(roll.armor_type(), Some(ArmorSubType::Olthoi));
    }

    #[test]
    fn test_armor_unlocks_by_tier() {
        let (tables, _) = setup();
        let mut rng = LootRng::new(15);
        let profile = TreasureProfile::new(1, 1);
        for _ in 0..300 {
            let sub = select_sub_type(&tables, &profile, TreasureItemType::Armor, &mut rng).unwrap();
            if let RollSubType::Armor(armor) = sub {
                assert!(armor.min_tier() <= 1);
            }
        }
    }

    #[test]
    fn test_addon_roll() {
        let (tables, _) = setup();
        let mut rng = LootRng::new(16);
        let id = select_addon(&tables, 4, &mut rng).unwrap();
        assert!([10090, 10091].contains(&id));
    }
}
