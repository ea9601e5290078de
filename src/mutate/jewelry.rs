//! Jewelry mutation. Jewelry with an innate armor level is dispatched to
//! the armor mutator instead.

use crate::constants::tier_fraction;
use crate::error::LootResult;
use crate::item::{ItemInstance, Prototype, WieldRequirement};
use crate::profile::TreasureProfile;
use crate::roll::TreasureRoll;

use super::{level_requirement, GemSocketing, MutationContext, Mutator, Quality, Steps};

#[derive(Debug, Clone, Copy, Default)]
pub struct JewelryMutator;

impl Mutator for JewelryMutator {
    fn name(&self) -> &'static str {
        "jewelry"
    }

    fn steps(&self, _proto: &Prototype) -> Steps {
        Steps {
            gems: GemSocketing::Jewelry,
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
        let score = ctx.rng.diminishing_roll(profile.quality_mod) * tier_fraction(item.tier);
        Ok(Quality::Score(score))
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
