//! Cloak mutation: weave set, max item level and proc.

use crate::constants::{
    tier_fraction, tier_index, CLOAK_DAMAGE_REDUCTION_PERCENT, CLOAK_LEVEL_CAP, CLOAK_MAX_LEVEL,
};
use crate::error::{LootError, LootResult};
use crate::item::{CloakProc, CloakStats, ItemInstance, Prototype, WieldRequirement};
use crate::profile::TreasureProfile;
use crate::roll::TreasureRoll;

use super::{level_requirement, GemSocketing, MutationContext, Mutator, Quality, Steps};

#[derive(Debug, Clone, Copy, Default)]
pub struct CloakMutator;

impl Mutator for CloakMutator {
    fn name(&self) -> &'static str {
        "cloak"
    }

    fn steps(&self, _proto: &Prototype) -> Steps {
        Steps {
            gems: GemSocketing::Never,
            ..Steps::EQUIPMENT
        }
    }

    fn mutate_stats(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        _proto: &Prototype,
        profile: &TreasureProfile,
        _roll: Option<&TreasureRoll>,
    ) -> LootResult<Quality> {
        let tables = ctx.tables;
        let set_id = *ctx
            .rng
            .choose(&tables.cloak.weave_sets)
            .ok_or_else(|| LootError::no_entry("cloak.weave_sets"))?;

        let (lo, hi) = CLOAK_MAX_LEVEL[tier_index(item.tier)];
        let span = (hi - lo + 1) as f64;
        let step = (ctx.rng.diminishing_roll(profile.quality_mod) * span).floor() as u32;
        let max_level = (lo + step).min(hi);

        let proc = if ctx.rng.percent(CLOAK_DAMAGE_REDUCTION_PERCENT) {
            CloakProc::DamageReduction
        } else {
            match ctx.rng.choose(&tables.cloak.surge_spells) {
                Some(spell) => CloakProc::Surge(*spell),
                None => CloakProc::DamageReduction,
            }
        };

        item.item_level = Some(max_level);
        item.cloak = Some(CloakStats {
            set_id,
            max_level,
            proc,
        });
        let level_pct = max_level as f64 / CLOAK_LEVEL_CAP as f64;
        Ok(Quality::Percentiles(vec![level_pct, tier_fraction(item.tier)]))
    }

    fn wield_requirements(
        &self,
        ctx: &MutationContext<'_>,
        item: &ItemInstance,
        _proto: &Prototype,
        _roll: Option<&TreasureRoll>,
    ) -> Vec<WieldRequirement> {
        level_requirement(ctx.tables, item.tier).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::roll::{Heritage, TreasureItemType};

    #[test]
    fn test_cloak_level_within_tier_range() {
        let mut fx = Fixture::new(81);
        let proto = fx.proto(7001);
        let roll = TreasureRoll::new(TreasureItemType::Cloak, Heritage::Aluvian);
        for tier in 1..=8u8 {
            let (lo, hi) = CLOAK_MAX_LEVEL[tier_index(tier)];
            for _ in 0..20 {
                let mut item = ItemInstance::from_prototype(&proto, tier);
                CloakMutator
                    .mutate_stats(&mut fx.ctx(), &mut item, &proto, &TreasureProfile::new(1, tier), Some(&roll))
                    .unwrap();
                let cloak = item.cloak.unwrap();
                assert!((lo..=hi).contains(&cloak.max_level));
                assert!((1..=12).contains(&cloak.set_id));
            }
        }
    }

    #[test]
    fn test_both_proc_kinds_appear() {
        let mut fx = Fixture::new(82);
        let proto = fx.proto(7002);
        let (mut reduction, mut surge) = (0, 0);
        for _ in 0..400 {
            let mut item = ItemInstance::from_prototype(&proto, 6);
            CloakMutator
                .mutate_stats(&mut fx.ctx(), &mut item, &proto, &TreasureProfile::new(1, 6), None)
                .unwrap();
            match item.cloak.unwrap().proc {
                CloakProc::DamageReduction => reduction += 1,
                CloakProc::Surge(_) => surge += 1,
            }
        }
        assert!(reduction > 50 && surge > reduction);
    }

    #[test]
    fn test_empty_weave_sets_fail() {
        let mut fx = Fixture::new(83);
        let mut tables = (*fx.tables).clone();
        tables.cloak.weave_sets.clear();
        fx.tables = std::sync::Arc::new(tables);
        let proto = fx.proto(7001);
        let mut item = ItemInstance::from_prototype(&proto, 3);
        let err = CloakMutator
            .mutate_stats(&mut fx.ctx(), &mut item, &proto, &TreasureProfile::new(1, 3), None)
            .unwrap_err();
        assert!(matches!(err, LootError::NoEligibleEntry { .. }));
    }
}
