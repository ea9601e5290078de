//! Loose gem mutation. The gem material comes from the prototype; value
//! comes from the gem class.

use tracing::warn;

use crate::constants::tier_fraction;
use crate::error::LootResult;
use crate::item::{ItemInstance, Prototype};
use crate::profile::TreasureProfile;
use crate::roll::TreasureRoll;

use super::value::gem_value;
use super::{MutationContext, Mutator, Quality, Steps};

#[derive(Debug, Clone, Copy, Default)]
pub struct GemMutator;

impl Mutator for GemMutator {
    fn name(&self) -> &'static str {
        "gem"
    }

    fn steps(&self, _proto: &Prototype) -> Steps {
        Steps::STATS_ONLY
    }

    fn mutate_stats(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        proto: &Prototype,
        profile: &TreasureProfile,
        _roll: Option<&TreasureRoll>,
    ) -> LootResult<Quality> {
        let gem = match proto.gem_material {
            Some(gem) => gem,
            None => {
                warn!(prototype = proto.id, "gem prototype without a gem material");
                ctx.tables.gems.classes.roll(item.tier, ctx.rng)?
            }
        };
        item.material = Some(gem);
        item.value = gem_value(gem).max(proto.base_value);
        let score = ctx.rng.diminishing_roll(profile.quality_mod) * tier_fraction(item.tier);
        Ok(Quality::Score(score))
    }
}
