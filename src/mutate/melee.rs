//! Melee weapon mutation.
//!
//! Max damage is back-solved from the tier's target DPS:
//! - seconds per attack = attack cycle (+ reload when thrown), doubled for
//!   two-handed weapons
//! - damage per strike = DPS x seconds / strikes
//! - max = per strike / ((1 - variance / 2) x (1 + crit share))
//!
//! The rolled max lands between 75% of that ceiling and the ceiling. The
//! tier-8 ceiling is the workmanship denominator.

use crate::constants::{
    tier_index, CRIT_CONTRIBUTION, LEGACY_WEAPON_MOD, MAX_TIER, MELEE_DAMAGE_FLOOR, TARGET_DPS,
    THROWN_RELOAD_SECS, WEAPON_MOD_MAX,
};
use crate::error::{LootError, LootResult};
use crate::item::{ItemInstance, Prototype, WeaponStats, WeaponTemplate, WieldRequirement};
use crate::profile::TreasureProfile;
use crate::roll::TreasureRoll;

use super::mods::{self, WeaponMod};
use super::{skill_and_level, MutationContext, Mutator, Quality};

const MELEE_MODS: [WeaponMod; 3] = [
    WeaponMod::Offense,
    WeaponMod::MeleeDefense,
    WeaponMod::MagicDefense,
];

/// Highest max damage that keeps expected DPS at the tier target
pub fn back_solve_max_damage(template: &WeaponTemplate, tier: u8) -> f64 {
    let dps = TARGET_DPS[tier_index(tier)];
    let mut seconds = template.attack_cycle.max(0.1);
    if template.thrown {
        seconds += THROWN_RELOAD_SECS;
    }
    if template.two_handed {
        seconds *= 2.0;
    }
    let per_strike = dps * seconds / template.strikes.max(1) as f64;
    let variance = template.damage_variance.clamp(0.0, 1.0);
    per_strike / ((1.0 - variance / 2.0) * (1.0 + CRIT_CONTRIBUTION))
}

pub(crate) fn weapon_template<'p>(proto: &'p Prototype) -> LootResult<&'p WeaponTemplate> {
    proto.weapon.as_ref().ok_or(LootError::MissingTemplateData {
        prototype_id: proto.id,
        field: "weapon",
    })
}

/// Flat per-tier roll for each mod slot
pub(crate) fn roll_legacy_mods(
    ctx: &mut MutationContext<'_>,
    stats: &mut WeaponStats,
    slots: &[WeaponMod],
    tier: u8,
) {
    let (lo, hi) = LEGACY_WEAPON_MOD[tier_index(tier)];
    for slot in slots {
        slot.apply(stats, ctx.rng.range_f64(lo, hi));
    }
}

/// Rolled mod subset applied to the stats, returning the mean percentile
pub(crate) fn roll_weapon_mods(
    ctx: &mut MutationContext<'_>,
    stats: &mut WeaponStats,
    slots: &[WeaponMod],
    tier: u8,
    quality_mod: f64,
) -> f64 {
    let rolled = mods::roll_mod_subset(
        ctx.rng,
        quality_mod,
        slots,
        WEAPON_MOD_MAX[tier_index(tier)],
        WEAPON_MOD_MAX[tier_index(MAX_TIER)],
    );
    for m in &rolled {
        m.slot.apply(stats, m.value);
    }
    mods::mean_percentile(&rolled)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MeleeMutator;

impl Mutator for MeleeMutator {
    fn name(&self) -> &'static str {
        "melee"
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
        let tier = item.tier;
        let mut stats = item.weapon.take().unwrap_or_default();

        let quality = match roll {
            Some(_) => {
                let ceiling = back_solve_max_damage(template, tier);
                let floor = ceiling * MELEE_DAMAGE_FLOOR;
                let max_damage = floor + (ceiling - floor) * ctx.rng.diminishing_roll(profile.quality_mod);
                let top = back_solve_max_damage(template, MAX_TIER);
                stats.max_damage = (max_damage.round() as u32).max(1);

                let damage_pct = mods::percentile(max_damage, floor, top);
                let mods_pct = roll_weapon_mods(ctx, &mut stats, &MELEE_MODS, tier, profile.quality_mod);
                Quality::Percentiles(vec![damage_pct, mods_pct])
            }
            None => {
                let legacy = ctx
                    .tables
                    .legacy_damage
                    .get(&template.wield_skill)
                    .and_then(|row| row.get(tier_index(tier)))
                    .copied();
                stats.max_damage = match legacy {
                    Some(damage) => damage,
                    None => back_solve_max_damage(template, tier).round() as u32,
                };
                roll_legacy_mods(ctx, &mut stats, &MELEE_MODS, tier);
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
        proto: &Prototype,
        _roll: Option<&TreasureRoll>,
    ) -> Vec<WieldRequirement> {
        let Some(template) = proto.weapon.as_ref() else {
            return Vec::new();
        };
        let skill = template.wield_skill;
        let difficulty = ctx.tables.wield_difficulty_for_skill(skill, item.tier);
        skill_and_level(ctx.tables, skill, difficulty, item.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::item::{DamageType, Skill};
    use crate::roll::{Heritage, MeleeFamily, RollSubType, TreasureItemType, WeaponSubType};

    fn sword() -> WeaponTemplate {
        WeaponTemplate {
            sub_type: WeaponSubType::Melee(MeleeFamily::Sword),
            wield_skill: Skill::HeavyWeapons,
            attack_cycle: 1.0,
            strikes: 1,
            two_handed: false,
            thrown: false,
            damage_variance: 0.4,
            damage_type: DamageType::Slash,
        }
    }

    fn melee_roll() -> TreasureRoll {
        TreasureRoll {
            sub_type: RollSubType::Weapon(WeaponSubType::Melee(MeleeFamily::Sword)),
            prototype_id: 1050,
            ..TreasureRoll::new(TreasureItemType::Weapon, Heritage::Aluvian)
        }
    }

    #[test]
    fn test_back_solve_non_decreasing_in_tier() {
        let template = sword();
        let mut last = 0.0;
        for tier in 1..=8 {
            let max = back_solve_max_damage(&template, tier);
            assert!(max >= last, "tier {tier}: {max} < {last}");
            last = max;
        }
    }

    #[test]
    fn test_back_solve_matches_target_dps() {
        let template = sword();
        let max = back_solve_max_damage(&template, 1);
        // Expected hit with crits over one second equals the tier DPS
        let expected = max * (1.0 - 0.2) * 1.2;
        assert!((expected - TARGET_DPS[0]).abs() < 1e-9);
    }

    #[test]
    fn test_multi_strike_and_two_handed() {
        let base = sword();
        let double = WeaponTemplate { strikes: 2, ..sword() };
        let big = WeaponTemplate { two_handed: true, ..sword() };
        let b = back_solve_max_damage(&base, 4);
        assert!((back_solve_max_damage(&double, 4) - b / 2.0).abs() < 1e-9);
        assert!((back_solve_max_damage(&big, 4) - b * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rolled_damage_within_tier_band() {
        let mut fx = Fixture::new(21);
        let proto = fx.proto(1050);
        let template = proto.weapon.clone().unwrap();
        let profile = TreasureProfile::new(1, 6);
        let roll = melee_roll();
        for _ in 0..100 {
            let mut item = ItemInstance::from_prototype(&proto, 6);
            let quality = MeleeMutator
                .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, Some(&roll))
                .unwrap();
            let ceiling = back_solve_max_damage(&template, 6);
            let max = item.weapon.as_ref().unwrap().max_damage as f64;
            assert!(max >= (ceiling * MELEE_DAMAGE_FLOOR).round() && max <= ceiling.round());
            match quality {
                Quality::Percentiles(p) => assert_eq!(p.len(), 2),
                other => panic!("unexpected quality {other:?}"),
            }
        }
    }

    #[test]
    fn test_legacy_damage_from_table() {
        let mut fx = Fixture::new(22);
        let proto = fx.proto(1050);
        let profile = TreasureProfile::new(1, 3);
        let mut item = ItemInstance::from_prototype(&proto, 3);
        let quality = MeleeMutator
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, None)
            .unwrap();
        assert_eq!(quality, Quality::Legacy);
        assert_eq!(item.weapon.unwrap().max_damage, 16);
    }

    #[test]
    fn test_wield_requirement_by_tier() {
        let mut fx = Fixture::new(23);
        let proto = fx.proto(1050);
        let item = ItemInstance::from_prototype(&proto, 8);
        let reqs = MeleeMutator.wield_requirements(&fx.ctx(), &item, &proto, None);
        assert!(reqs.contains(&WieldRequirement::Skill {
            skill: Skill::HeavyWeapons,
            difficulty: 420
        }));
        assert!(reqs.contains(&WieldRequirement::Level(180)));

        let item = ItemInstance::from_prototype(&proto, 1);
        assert!(MeleeMutator.wield_requirements(&fx.ctx(), &item, &proto, None).is_empty());
    }

    #[test]
    fn test_missing_template_is_reported() {
        let mut fx = Fixture::new(24);
        let proto = Prototype::new(77, "Stick", TreasureItemType::Weapon, 1);
        let mut item = ItemInstance::from_prototype(&proto, 2);
        let err = MeleeMutator
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &TreasureProfile::new(1, 2), None)
            .unwrap_err();
        assert!(matches!(err, LootError::MissingTemplateData { prototype_id: 77, .. }));
    }
}
