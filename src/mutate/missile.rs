//! Missile launcher mutation.
//!
//! Launchers carry a damage multiplier applied to the ammunition instead of
//! their own max damage. The multiplier ceiling is the back-solved max
//! damage over the tier's ammo damage, never below the family floor.

use crate::constants::{tier_index, MAX_TIER, TIER_COUNT};
use crate::error::LootResult;
use crate::item::{ItemInstance, Prototype, Skill, WeaponTemplate, WieldRequirement};
use crate::profile::TreasureProfile;
use crate::roll::{MissileFamily, TreasureRoll, WeaponSubType};

use super::melee::{back_solve_max_damage, roll_legacy_mods, roll_weapon_mods, weapon_template};
use super::mods::{self, WeaponMod};
use super::{skill_and_level, MutationContext, Mutator, Quality};

const MISSILE_MODS: [WeaponMod; 3] = [
    WeaponMod::Offense,
    WeaponMod::MeleeDefense,
    WeaponMod::MagicDefense,
];

/// Arrow max damage per tier, scaled by `MissileFamily::ammo_scale`
const AMMO_MAX: [f64; TIER_COUNT] = [8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 22.0];

const MULTIPLIER_FLOOR_BOW: [f64; TIER_COUNT] = [1.2, 1.4, 1.6, 1.8, 2.0, 2.2, 2.3, 2.4];
const MULTIPLIER_FLOOR_CROSSBOW: [f64; TIER_COUNT] = [1.4, 1.6, 1.8, 2.0, 2.2, 2.4, 2.5, 2.6];
const MULTIPLIER_FLOOR_ATLATL: [f64; TIER_COUNT] = [1.1, 1.3, 1.5, 1.7, 1.9, 2.1, 2.2, 2.3];

const ELEMENTAL_BONUS_BOW: [f64; TIER_COUNT] = [0.0, 0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
const ELEMENTAL_BONUS_CROSSBOW: [f64; TIER_COUNT] = [0.0, 0.0, 3.0, 5.0, 8.0, 10.0, 12.0, 15.0];
const ELEMENTAL_BONUS_ATLATL: [f64; TIER_COUNT] = [0.0, 0.0, 2.0, 4.0, 7.0, 9.0, 11.0, 13.0];

/// Spread added to the floor multiplier when mutating without a roll
const LEGACY_MULTIPLIER_SPREAD: f64 = 0.1;

fn multiplier_floor(family: MissileFamily, tier: u8) -> f64 {
    let table = match family {
        MissileFamily::Bow => &MULTIPLIER_FLOOR_BOW,
        MissileFamily::Crossbow => &MULTIPLIER_FLOOR_CROSSBOW,
        MissileFamily::Atlatl => &MULTIPLIER_FLOOR_ATLATL,
    };
    table[tier_index(tier)]
}

fn elemental_bonus_max(family: MissileFamily, tier: u8) -> f64 {
    let table = match family {
        MissileFamily::Bow => &ELEMENTAL_BONUS_BOW,
        MissileFamily::Crossbow => &ELEMENTAL_BONUS_CROSSBOW,
        MissileFamily::Atlatl => &ELEMENTAL_BONUS_ATLATL,
    };
    table[tier_index(tier)]
}

/// (floor, ceiling) of the damage multiplier
pub fn multiplier_range(template: &WeaponTemplate, family: MissileFamily, tier: u8) -> (f64, f64) {
    let floor = multiplier_floor(family, tier);
    let ammo = AMMO_MAX[tier_index(tier)] * family.ammo_scale();
    let ceiling = (back_solve_max_damage(template, tier) / ammo).max(floor);
    (floor, ceiling)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MissileMutator;

impl Mutator for MissileMutator {
    fn name(&self) -> &'static str {
        "missile"
    }

    fn mutate_stats(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        proto: &Prototype,
        profile: &TreasureProfile,
        roll: Option<&TreasureRoll>,
    ) -> LootResult<Quality> {
        let template = weapon_template(proto)?;
        let family = match roll.and_then(|r| r.weapon_type()).unwrap_or(template.sub_type) {
            WeaponSubType::Missile(family) => family,
            _ => MissileFamily::Bow,
        };
        let tier = item.tier;
        let mut stats = item.weapon.take().unwrap_or_default();

        let quality = match roll {
            Some(_) => {
                let q = profile.quality_mod;
                let (floor, ceiling) = multiplier_range(template, family, tier);
                let (_, top) = multiplier_range(template, family, MAX_TIER);
                let multiplier = floor + (ceiling - floor) * ctx.rng.diminishing_roll(q);
                stats.damage_mod = multiplier;

                let bonus_max = elemental_bonus_max(family, tier);
                stats.elemental_bonus = (ctx.rng.diminishing_roll(q) * bonus_max).round() as u32;

                let damage_pct = mods::percentile(multiplier, floor, top);
                let mods_pct = roll_weapon_mods(ctx, &mut stats, &MISSILE_MODS, tier, q);
                Quality::Percentiles(vec![damage_pct, mods_pct])
            }
            None => {
                let floor = multiplier_floor(family, tier);
                stats.damage_mod = floor + ctx.rng.range_f64(0.0, LEGACY_MULTIPLIER_SPREAD);
                roll_legacy_mods(ctx, &mut stats, &MISSILE_MODS, tier);
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
        let skill = Skill::MissileWeapons;
        let difficulty = ctx.tables.wield_difficulty_for_skill(skill, item.tier);
        skill_and_level(ctx.tables, skill, difficulty, item.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::roll::{Heritage, RollSubType, TreasureItemType};

    fn roll_of(family: MissileFamily, id: u32) -> TreasureRoll {
        TreasureRoll {
            sub_type: RollSubType::Weapon(WeaponSubType::Missile(family)),
            prototype_id: id,
            ..TreasureRoll::new(TreasureItemType::Weapon, Heritage::Aluvian)
        }
    }

    #[test]
    fn test_multiplier_ceiling_not_below_floor() {
        let fx = Fixture::new(31);
        for id in [2001, 2010, 2020] {
            let proto = fx.proto(id);
            let template = proto.weapon.as_ref().unwrap();
            let WeaponSubType::Missile(family) = template.sub_type else {
                panic!("not a missile template");
            };
            for tier in 1..=8 {
                let (floor, ceiling) = multiplier_range(template, family, tier);
                assert!(ceiling >= floor);
            }
        }
    }

    #[test]
    fn test_rolled_multiplier_in_range() {
        let mut fx = Fixture::new(32);
        let proto = fx.proto(2010);
        let template = proto.weapon.clone().unwrap();
        let roll = roll_of(MissileFamily::Crossbow, 2010);
        let profile = TreasureProfile::new(1, 5);
        let (floor, ceiling) = multiplier_range(&template, MissileFamily::Crossbow, 5);
        for _ in 0..100 {
            let mut item = ItemInstance::from_prototype(&proto, 5);
            MissileMutator
                .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, Some(&roll))
                .unwrap();
            let stats = item.weapon.unwrap();
            assert!(stats.damage_mod >= floor && stats.damage_mod <= ceiling);
            assert!(stats.elemental_bonus <= 8);
        }
    }

    #[test]
    fn test_low_tier_has_no_elemental_bonus() {
        let mut fx = Fixture::new(33);
        let proto = fx.proto(2001);
        let roll = roll_of(MissileFamily::Bow, 2001);
        let profile = TreasureProfile::new(1, 2).with_quality(1.0);
        let mut item = ItemInstance::from_prototype(&proto, 2);
        MissileMutator
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, Some(&roll))
            .unwrap();
        assert_eq!(item.weapon.unwrap().elemental_bonus, 0);
    }

    #[test]
    fn test_legacy_multiplier() {
        let mut fx = Fixture::new(34);
        let proto = fx.proto(2020);
        let mut item = ItemInstance::from_prototype(&proto, 4);
        let quality = MissileMutator
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &TreasureProfile::new(1, 4), None)
            .unwrap();
        assert_eq!(quality, Quality::Legacy);
        let m = item.weapon.unwrap().damage_mod;
        assert!((1.7..1.8).contains(&m));
    }
}
