//! Caster mutation: elemental type, War/Life bias and caster mods.

use crate::constants::{tier_index, MAX_TIER, TIER_COUNT};
use crate::error::LootResult;
use crate::item::{
    CasterSchool, DamageType, ItemInstance, Prototype, Skill, WeaponStats, WieldRequirement,
};
use crate::profile::TreasureProfile;
use crate::roll::TreasureRoll;

use super::melee::{roll_legacy_mods, roll_weapon_mods};
use super::mods::{self, WeaponMod};
use super::{skill_and_level, MutationContext, Mutator, Quality};

const CASTER_MODS: [WeaponMod; 3] = [
    WeaponMod::ManaConversion,
    WeaponMod::MeleeDefense,
    WeaponMod::MagicDefense,
];

/// Ceiling of the favored mod of the (elemental damage, restoration) pair
const CASTER_PRIMARY_MAX: [f64; TIER_COUNT] = [0.02, 0.04, 0.06, 0.08, 0.10, 0.12, 0.15, 0.18];

/// The other mod of the pair rolls against a reduced ceiling
const SECONDARY_SHARE: f64 = 0.5;

fn apply_pair(stats: &mut WeaponStats, school: CasterSchool, primary: f64, secondary: f64) {
    match school {
        CasterSchool::War => {
            stats.elemental_damage_mod = primary;
            stats.restoration_mod = secondary;
        }
        CasterSchool::Life => {
            stats.restoration_mod = primary;
            stats.elemental_damage_mod = secondary;
        }
    }
}

fn school_skill(school: Option<CasterSchool>) -> Skill {
    match school {
        Some(CasterSchool::Life) => Skill::LifeMagic,
        _ => Skill::WarMagic,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CasterMutator;

impl Mutator for CasterMutator {
    fn name(&self) -> &'static str {
        "caster"
    }

    fn mutate_stats(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        _proto: &Prototype,
        profile: &TreasureProfile,
        roll: Option<&TreasureRoll>,
    ) -> LootResult<Quality> {
        let tier = item.tier;
        let mut stats = item.weapon.take().unwrap_or_default();

        let school = if ctx.rng.coin_flip() {
            CasterSchool::War
        } else {
            CasterSchool::Life
        };
        stats.school = Some(school);
        stats.damage_type = ctx.rng.choose(&DamageType::ELEMENTAL).copied();

        let ceiling = CASTER_PRIMARY_MAX[tier_index(tier)];
        let top = CASTER_PRIMARY_MAX[tier_index(MAX_TIER)];
        let quality = match roll {
            Some(_) => {
                let q = profile.quality_mod;
                let primary = ctx.rng.diminishing_roll(q) * ceiling;
                let secondary = ctx.rng.diminishing_roll(q) * ceiling * SECONDARY_SHARE;
                apply_pair(&mut stats, school, primary, secondary);

                let primary_pct = mods::percentile(primary, 0.0, top);
                let secondary_pct = mods::percentile(secondary, 0.0, top * SECONDARY_SHARE);
                let mods_pct = roll_weapon_mods(ctx, &mut stats, &CASTER_MODS, tier, q);
                Quality::Percentiles(vec![primary_pct, primary_pct, mods_pct, secondary_pct])
            }
            None => {
                let primary = ctx.rng.range_f64(0.0, ceiling);
                let secondary = ctx.rng.range_f64(0.0, ceiling * SECONDARY_SHARE);
                apply_pair(&mut stats, school, primary, secondary);
                roll_legacy_mods(ctx, &mut stats, &CASTER_MODS, tier);
                Quality::Legacy
            }
        };
        item.weapon = Some(stats);
        Ok(quality)
    }

    fn wield_requirements(
        &self,
        ctx: &MutationContext<'_>,
        item: &ItemInstance,
        _proto: &Prototype,
        _roll: Option<&TreasureRoll>,
    ) -> Vec<WieldRequirement> {
        let skill = school_skill(item.weapon.as_ref().and_then(|w| w.school));
        let difficulty = ctx.tables.wield_difficulty_for_skill(skill, item.tier);
        skill_and_level(ctx.tables, skill, difficulty, item.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::roll::{CasterFamily, Heritage, RollSubType, TreasureItemType, WeaponSubType};

    fn orb_roll() -> TreasureRoll {
        TreasureRoll {
            sub_type: RollSubType::Weapon(WeaponSubType::Caster(CasterFamily::Orb)),
            prototype_id: 3001,
            ..TreasureRoll::new(TreasureItemType::Caster, Heritage::Gharundim)
        }
    }

    #[test]
    fn test_school_biases_pair() {
        let mut fx = Fixture::new(41);
        let proto = fx.proto(3001);
        let roll = orb_roll();
        let profile = TreasureProfile::new(1, 8).with_quality(1.0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..40 {
            let mut item = ItemInstance::from_prototype(&proto, 8);
            CasterMutator
                .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, Some(&roll))
                .unwrap();
            let stats = item.weapon.unwrap();
            let school = stats.school.unwrap();
            seen.insert(school);
            let (favored, other) = match school {
                CasterSchool::War => (stats.elemental_damage_mod, stats.restoration_mod),
                CasterSchool::Life => (stats.restoration_mod, stats.elemental_damage_mod),
            };
            assert!((favored - 0.18).abs() < 1e-12);
            assert!((other - 0.09).abs() < 1e-12);
            assert!(DamageType::ELEMENTAL.contains(&stats.damage_type.unwrap()));
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_maxed_caster_is_top_workmanship() {
        let mut fx = Fixture::new(42);
        let proto = fx.proto(3020);
        let profile = TreasureProfile::new(1, 8).with_quality(1.0);
        let mut item = ItemInstance::from_prototype(&proto, 8);
        let quality = CasterMutator
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, Some(&orb_roll()))
            .unwrap();
        let Quality::Percentiles(p) = quality else {
            panic!("expected percentiles");
        };
        assert_eq!(p.len(), 4);
        assert_eq!(mods::workmanship_from_percentiles(&p), 10);
    }

    #[test]
    fn test_wield_follows_school() {
        let mut fx = Fixture::new(43);
        let proto = fx.proto(3001);
        let mut item = ItemInstance::from_prototype(&proto, 6);
        item.weapon.get_or_insert_with(Default::default).school = Some(CasterSchool::Life);
        let reqs = CasterMutator.wield_requirements(&fx.ctx(), &item, &proto, None);
        assert_eq!(
            reqs,
            vec![WieldRequirement::Skill {
                skill: Skill::LifeMagic,
                difficulty: 290
            }]
        );
    }
}
