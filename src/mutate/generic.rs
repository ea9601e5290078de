//! Mundane and stackable items: coin stacks, consumables, mana stones,
//! tools, scrolls, pet devices and art objects.
//!
//! Only art objects take the shared material/color/gem/value steps and
//! receive workmanship. Everything else sets its own value here.

use crate::constants::{
    tier_fraction, tier_index, CONSUMABLE_STACK, MANA_STONE_CAPACITY, PET_DEVICE_LEVEL,
    PYREAL_STACK, SPELL_COMPONENT_STACK, TOOL_BONUS, TOOL_USES,
};
use crate::error::LootResult;
use crate::item::{ItemInstance, Prototype};
use crate::profile::TreasureProfile;
use crate::rng::LootRng;
use crate::roll::{TreasureItemType, TreasureRoll};

use super::{MutationContext, Mutator, Quality, Steps};

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericMutator;

/// `lo + dimroll * (hi - lo)`, rounded down
fn scaled_in_range(rng: &mut LootRng, quality_mod: f64, (lo, hi): (u32, u32)) -> u32 {
    let span = hi.saturating_sub(lo) as f64;
    lo + (rng.diminishing_roll(quality_mod) * span).floor() as u32
}

impl Mutator for GenericMutator {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn steps(&self, proto: &Prototype) -> Steps {
        match proto.item_type {
            TreasureItemType::ArtObject => Steps::EQUIPMENT,
            _ => Steps::STATS_ONLY,
        }
    }

    fn mutate_stats(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        proto: &Prototype,
        profile: &TreasureProfile,
        _roll: Option<&TreasureRoll>,
    ) -> LootResult<Quality> {
        let t = tier_index(item.tier);
        let q = profile.quality_mod;
        let rng = &mut *ctx.rng;

        match item.item_type {
            TreasureItemType::Pyreal => {
                let (lo, hi) = PYREAL_STACK[t];
                item.stack_size = rng.range_u32(lo, hi);
                item.value = proto.base_value.max(1).saturating_mul(item.stack_size);
            }
            TreasureItemType::Consumable => {
                let (lo, hi) = CONSUMABLE_STACK[t];
                item.stack_size = rng.range_u32(lo, hi);
                item.value = proto.base_value.saturating_mul(item.stack_size);
            }
            TreasureItemType::SpellComponent => {
                let (lo, hi) = SPELL_COMPONENT_STACK[t];
                item.stack_size = rng.range_u32(lo, hi);
                item.value = proto.base_value.saturating_mul(item.stack_size);
            }
            TreasureItemType::ManaStone => {
                item.mana_capacity = Some(scaled_in_range(rng, q, MANA_STONE_CAPACITY[t]));
            }
            TreasureItemType::HealKit | TreasureItemType::Lockpick => {
                item.uses = Some(rng.range_u32(TOOL_USES[t].0, TOOL_USES[t].1));
                item.bonus = Some(scaled_in_range(rng, q, TOOL_BONUS[t]));
            }
            TreasureItemType::PetDevice => {
                item.item_level = Some(PET_DEVICE_LEVEL[t]);
            }
            TreasureItemType::ArtObject => {
                let score = rng.diminishing_roll(q) * tier_fraction(item.tier);
                return Ok(Quality::Score(score));
            }
            // scrolls keep the template value
            _ => {}
        }
        Ok(Quality::None)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Fixture;
    use super::*;
    use crate::mutate::run_pipeline;
    use crate::roll::Heritage;

    fn mutate(fx: &mut Fixture, id: u32, tier: u8, with_roll: bool) -> ItemInstance {
        let proto = fx.proto(id);
        let roll = TreasureRoll {
            prototype_id: id,
            ..TreasureRoll::new(proto.item_type, Heritage::Gharundim)
        };
        let mut item = ItemInstance::from_prototype(&proto, tier);
        let profile = TreasureProfile::new(1, tier);
        let roll = with_roll.then_some(&roll);
        run_pipeline(&GenericMutator, &mut fx.ctx(), &mut item, &proto, &profile, roll, false).unwrap();
        item
    }

    #[test]
    fn test_pyreal_stack_value() {
        let mut fx = Fixture::new(101);
        for tier in 1..=8u8 {
            let item = mutate(&mut fx, 10001, tier, true);
            let (lo, hi) = PYREAL_STACK[tier_index(tier)];
            assert!((lo..=hi).contains(&item.stack_size));
            assert_eq!(item.value, item.stack_size);
            assert!(item.workmanship.is_none());
            assert!(item.material.is_none());
        }
    }

    #[test]
    fn test_stackables_have_no_workmanship_even_without_roll() {
        let mut fx = Fixture::new(102);
        for id in [10020, 10030, 10040, 10050, 10060, 10070, 10080] {
            let item = mutate(&mut fx, id, 4, false);
            assert!(item.workmanship.is_none(), "prototype {id}");
        }
    }

    #[test]
    fn test_tools_and_stones() {
        let mut fx = Fixture::new(103);
        let kit = mutate(&mut fx, 10051, 5, true);
        let (lo, hi) = TOOL_USES[4];
        assert!((lo..=hi).contains(&kit.uses.unwrap()));
        assert!(kit.bonus.is_some());

        let stone = mutate(&mut fx, 10031, 8, true);
        let (lo, hi) = MANA_STONE_CAPACITY[7];
        assert!((lo..=hi).contains(&stone.mana_capacity.unwrap()));

        let pet = mutate(&mut fx, 10080, 7, true);
        assert_eq!(pet.item_level, Some(200));
    }

    #[test]
    fn test_art_object_gets_decorations() {
        let mut fx = Fixture::new(104);
        let item = mutate(&mut fx, 10013, 6, true);
        assert!(item.material.is_some());
        assert!(item.gem_count >= 1);
        assert!(item.workmanship.is_some());
        assert!(item.value >= 400);
        assert!(item.long_desc.is_some());
    }

    #[test]
    fn test_scroll_keeps_base_value() {
        let mut fx = Fixture::new(105);
        let item = mutate(&mut fx, 10022, 5, true);
        assert_eq!(item.value, 250);
        assert_eq!(item.stack_size, 1);
    }
}
