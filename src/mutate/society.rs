//! Society armor: the armor path plus a society membership requirement.

use crate::error::LootResult;
use crate::item::{ItemInstance, Prototype, WieldRequirement};
use crate::profile::TreasureProfile;
use crate::roll::{RollSubType, TreasureRoll};

use super::{ArmorMutator, MutationContext, Mutator, Quality};

const ARMOR_PATH: ArmorMutator = ArmorMutator { clothing: false };

#[derive(Debug, Clone, Copy, Default)]
pub struct SocietyArmorMutator;

impl Mutator for SocietyArmorMutator {
    fn name(&self) -> &'static str {
        "society"
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
        ARMOR_PATH.mutate_stats(ctx, item, proto, profile, roll)
    }

    fn wield_requirements(
        &self,
        ctx: &MutationContext<'_>,
        item: &ItemInstance,
        proto: &Prototype,
        roll: Option<&TreasureRoll>,
    ) -> Vec<WieldRequirement> {
        let mut reqs = ARMOR_PATH.wield_requirements(ctx, item, proto, roll);
        if let Some(RollSubType::Society(society)) = roll.map(|r| r.sub_type) {
            reqs.push(WieldRequirement::Society(society));
        }
        reqs
    }
}
