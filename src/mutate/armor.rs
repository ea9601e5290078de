//! Armor mutation: armor/ward level, resists, gear ratings and skill mods.
//!
//! Two armor level paths:
//! - Style: style base (or shield base) x (tier - 1) x coverage x U[0.9, 1.1]
//! - Compat: template innate level plus a tier-ranged delta
//!
//! Compat is also used whenever the item has no roll. Clothing takes the
//! same path without gear ratings.

use crate::constants::{
    tier_index, ARMOR_LEVEL_JITTER, ARMOR_SKILL_MOD_MAX, COMPAT_ARMOR_DELTA, GEAR_RATING_MAX,
    HEADWEAR_MULT, MAX_TIER, RESIST_FLOOR, RESIST_ROLL_RANGE, RESIST_SCALE,
};
use crate::engine::config::ArmorLevelMethod;
use crate::error::{LootError, LootResult};
use crate::item::{ArmorStats, ArmorTemplate, GearRating, ItemInstance, Prototype, Skill, WieldRequirement};
use crate::profile::TreasureProfile;
use crate::roll::{ArmorWeightClass, TreasureRoll};
use crate::tables::LootTables;

use super::mods;
use super::{level_requirement, skill_and_level, MutationContext, Mutator, Quality};

fn gear_candidates(class: ArmorWeightClass) -> &'static [GearRating] {
    match class {
        ArmorWeightClass::Cloth => &[GearRating::HealBoost, GearRating::CritDamage, GearRating::Damage],
        ArmorWeightClass::Light => &[GearRating::Crit, GearRating::CritDamage, GearRating::Damage],
        ArmorWeightClass::Heavy => &[
            GearRating::DamageResist,
            GearRating::CritResist,
            GearRating::CritDamageResist,
        ],
    }
}

fn skill_candidates(class: ArmorWeightClass) -> &'static [Skill] {
    match class {
        ArmorWeightClass::Cloth => &[Skill::WarMagic, Skill::LifeMagic, Skill::ManaConversion],
        ArmorWeightClass::Light => &[Skill::DualWield, Skill::Thievery, Skill::Run],
        ArmorWeightClass::Heavy => &[Skill::Attack, Skill::MeleeDefense, Skill::Shield],
    }
}

/// Defense skill gating each weight class
pub fn wield_skill(class: ArmorWeightClass) -> Skill {
    match class {
        ArmorWeightClass::Cloth => Skill::MagicDefense,
        ArmorWeightClass::Light => Skill::MissileDefense,
        ArmorWeightClass::Heavy => Skill::MeleeDefense,
    }
}

/// (armor, ward) per coverage slot and tier step
pub fn style_base(tables: &LootTables, proto: &Prototype, template: &ArmorTemplate) -> (f64, f64) {
    tables
        .styles
        .shields
        .get(&proto.id)
        .or_else(|| tables.styles.bases.get(&template.style))
        .copied()
        .unwrap_or((0.0, 0.0))
}

pub(crate) fn armor_template(proto: &Prototype) -> LootResult<&ArmorTemplate> {
    proto.armor.as_ref().ok_or(LootError::MissingTemplateData {
        prototype_id: proto.id,
        field: "armor",
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArmorMutator {
    pub clothing: bool,
}

impl ArmorMutator {
    /// Armor level, ward level and resists. Returns the level percentiles.
    fn roll_levels(
        &self,
        ctx: &mut MutationContext<'_>,
        stats: &mut ArmorStats,
        proto: &Prototype,
        template: &ArmorTemplate,
        tier: u8,
        roll: Option<&TreasureRoll>,
    ) -> Vec<f64> {
        let method = match roll {
            Some(_) => ctx.config.armor_level_method,
            None => ArmorLevelMethod::Compat,
        };
        let mut percentiles = Vec::with_capacity(2);
        match method {
            ArmorLevelMethod::Style => {
                let (base_al, base_ward) = style_base(ctx.tables, proto, template);
                let slots = template.coverage_slots.max(1) as f64;
                let steps = (tier.saturating_sub(1)) as f64;
                let jitter = ctx.rng.range_f64(ARMOR_LEVEL_JITTER.0, ARMOR_LEVEL_JITTER.1);
                let armor_level = base_al * steps * slots * jitter;
                let ward_level = base_ward * steps * slots * jitter;
                stats.armor_level = armor_level.round() as u32;
                stats.ward_level = ward_level.round() as u32;

                let top_steps = (MAX_TIER - 1) as f64 * slots * ARMOR_LEVEL_JITTER.1;
                percentiles.push(mods::percentile(armor_level, 0.0, base_al * top_steps));
                if base_ward > 0.0 {
                    percentiles.push(mods::percentile(ward_level, 0.0, base_ward * top_steps));
                }
            }
            ArmorLevelMethod::Compat => {
                let innate = roll.map_or(proto.armor_level, |r| r.base_armor_level);
                let (lo, hi) = COMPAT_ARMOR_DELTA[tier_index(tier)];
                let delta = ctx.rng.range_i32(lo, hi);
                stats.armor_level = (innate as i64 + delta as i64).max(0) as u32;
                stats.ward_level = roll.map_or(proto.ward_level, |r| r.base_ward_level);
                let top = COMPAT_ARMOR_DELTA[tier_index(MAX_TIER)].1;
                percentiles.push(mods::percentile(delta as f64, 0.0, top as f64));
            }
        }

        for (i, resist) in stats.resists.iter_mut().enumerate() {
            let r = ctx.rng.range_f64(RESIST_ROLL_RANGE.0, RESIST_ROLL_RANGE.1);
            let delta = (r.signum() * r * r * RESIST_SCALE).max(RESIST_FLOOR);
            *resist = (proto.resists[i] + delta).max(0.0);
        }
        percentiles
    }
}

impl Mutator for ArmorMutator {
    fn name(&self) -> &'static str {
        if self.clothing {
            "clothing"
        } else {
            "armor"
        }
    }

    fn is_armor(&self) -> bool {
        true
    }

    fn mutate_stats(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        proto: &Prototype,
        profile: &TreasureProfile,
        roll: Option<&TreasureRoll>,
    ) -> LootResult<Quality> {
        let template = armor_template(proto)?;
        let tier = item.tier;
        let q = profile.quality_mod;
        let head = if template.headwear { HEADWEAR_MULT } else { 1.0 };
        let mut stats = item.armor.take().unwrap_or_default();

        let mut percentiles = self.roll_levels(ctx, &mut stats, proto, template, tier, roll);

        let skill_mods = mods::roll_mod_subset(
            ctx.rng,
            q,
            skill_candidates(template.weight_class),
            ARMOR_SKILL_MOD_MAX[tier_index(tier)] * head,
            ARMOR_SKILL_MOD_MAX[tier_index(MAX_TIER)] * head,
        );
        percentiles.push(mods::mean_percentile(&skill_mods));
        stats.skill_mods = skill_mods.iter().map(|m| (m.slot, m.value)).collect();

        let gear_max = GEAR_RATING_MAX[tier_index(tier)] as f64 * head;
        if !self.clothing && gear_max > 0.0 {
            let top = GEAR_RATING_MAX[tier_index(MAX_TIER)] as f64 * head;
            let chosen = mods::choose_subset(ctx.rng, q, gear_candidates(template.weight_class));
            let mut gear_pcts = Vec::with_capacity(chosen.len());
            for rating in chosen {
                let points = (ctx.rng.diminishing_roll(q) * gear_max).round();
                gear_pcts.push(mods::percentile(points, 0.0, top));
                if points >= 1.0 {
                    stats.gear_ratings.push((rating, points as u32));
                }
            }
            let avg = gear_pcts.iter().sum::<f64>() / gear_pcts.len().max(1) as f64;
            percentiles.push(avg);
        }

        item.armor = Some(stats);
        Ok(match roll {
            Some(_) => Quality::Percentiles(percentiles),
            None => Quality::Legacy,
        })
    }

    fn wield_requirements(
        &self,
        ctx: &MutationContext<'_>,
        item: &ItemInstance,
        proto: &Prototype,
        _roll: Option<&TreasureRoll>,
    ) -> Vec<WieldRequirement> {
        if self.clothing {
            return level_requirement(ctx.tables, item.tier).into_iter().collect();
        }
        let Some(template) = proto.armor.as_ref() else {
            return level_requirement(ctx.tables, item.tier).into_iter().collect();
        };
        let class = template.weight_class;
        let difficulty = ctx.tables.wield_difficulty_for_armor(class, item.tier);
        skill_and_level(ctx.tables, wield_skill(class), difficulty, item.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::roll::{ArmorSubType, Heritage, RollSubType, TreasureItemType};

    fn armor_roll(proto: &Prototype, sub_type: ArmorSubType) -> TreasureRoll {
        TreasureRoll {
            sub_type: RollSubType::Armor(sub_type),
            prototype_id: proto.id,
            base_armor_level: proto.armor_level,
            base_ward_level: proto.ward_level,
            ..TreasureRoll::new(TreasureItemType::Armor, Heritage::Aluvian)
        }
    }

    fn mutate(fx: &mut Fixture, id: u32, sub_type: ArmorSubType, tier: u8) -> (ItemInstance, Quality) {
        let proto = fx.proto(id);
        let roll = armor_roll(&proto, sub_type);
        let mut item = ItemInstance::from_prototype(&proto, tier);
        let quality = ArmorMutator::default()
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &TreasureProfile::new(1, tier), Some(&roll))
            .unwrap();
        (item, quality)
    }

    #[test]
    fn test_style_armor_at_tier_one_is_zero() {
        let mut fx = Fixture::new(51);
        for _ in 0..20 {
            let (item, _) = mutate(&mut fx, 4001, ArmorSubType::Robe, 1);
            let armor = item.armor.unwrap();
            assert_eq!(armor.armor_level, 0);
            assert_eq!(armor.ward_level, 0);
        }
    }

    #[test]
    fn test_style_armor_scales_with_tier() {
        let mut fx = Fixture::new(52);
        let proto = fx.proto(4001);
        let template = proto.armor.clone().unwrap();
        let (base, _) = style_base(&fx.tables, &proto, &template);
        let slots = template.coverage_slots as f64;
        for tier in 2..=8u8 {
            let (item, _) = mutate(&mut fx, 4001, ArmorSubType::Robe, tier);
            let al = item.armor.unwrap().armor_level as f64;
            let nominal = base * (tier - 1) as f64 * slots;
            assert!(al >= (nominal * 0.9).floor() && al <= (nominal * 1.1).ceil());
        }
    }

    #[test]
    fn test_compat_adds_delta_to_innate() {
        let mut fx = Fixture::new(53);
        fx.config.armor_level_method = ArmorLevelMethod::Compat;
        let proto = fx.proto(4001);
        let (item, _) = mutate(&mut fx, 4001, ArmorSubType::Robe, 4);
        let (lo, hi) = COMPAT_ARMOR_DELTA[3];
        let al = item.armor.unwrap().armor_level as i32;
        let innate = proto.armor_level as i32;
        assert!(al >= innate + lo && al <= innate + hi);
    }

    #[test]
    fn test_resists_never_negative() {
        let mut fx = Fixture::new(54);
        for _ in 0..50 {
            let (item, _) = mutate(&mut fx, 4001, ArmorSubType::Robe, 5);
            assert!(item.armor.unwrap().resists.iter().all(|r| *r >= 0.0));
        }
    }

    #[test]
    fn test_gear_ratings_only_at_high_tiers() {
        let mut fx = Fixture::new(55);
        let (low, _) = mutate(&mut fx, 4001, ArmorSubType::Robe, 2);
        assert!(low.armor.unwrap().gear_ratings.is_empty());

        let proto = fx.proto(4001);
        let roll = armor_roll(&proto, ArmorSubType::Robe);
        let mut item = ItemInstance::from_prototype(&proto, 8);
        let profile = TreasureProfile::new(1, 8).with_quality(1.0);
        ArmorMutator::default()
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, Some(&roll))
            .unwrap();
        let armor = item.armor.unwrap();
        assert_eq!(armor.gear_ratings.len(), 3);
        assert!(armor.gear_ratings.iter().all(|(_, points)| *points == 3));
        assert_eq!(armor.skill_mods.len(), 3);
    }

    #[test]
    fn test_clothing_has_no_gear_ratings() {
        let mut fx = Fixture::new(56);
        let proto = fx.proto(5003);
        let roll = TreasureRoll::new(TreasureItemType::Clothing, Heritage::Sho);
        let profile = TreasureProfile::new(1, 8).with_quality(1.0);
        let mut item = ItemInstance::from_prototype(&proto, 8);
        ArmorMutator { clothing: true }
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &profile, Some(&roll))
            .unwrap();
        assert!(item.armor.unwrap().gear_ratings.is_empty());
    }

    #[test]
    fn test_no_roll_is_legacy_quality() {
        let mut fx = Fixture::new(57);
        let proto = fx.proto(4001);
        let mut item = ItemInstance::from_prototype(&proto, 3);
        let quality = ArmorMutator::default()
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &TreasureProfile::new(1, 3), None)
            .unwrap();
        assert_eq!(quality, Quality::Legacy);
        assert!(item.armor_level() >= proto.armor_level);
    }
}
