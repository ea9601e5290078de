//! Item value.
//!
//! With a roll: `base * (1 + 0.1w)^2 * material * tier * U[0.7, 1.3]`
//! plus the socketed gems. Without a roll the value is a flat per-tier
//! range. Either way it never drops below the template base.

use crate::constants::{
    tier_index, GEM_CLASS_VALUE, LEGACY_VALUE_RANGE, TIER_VALUE_MOD, VALUE_JITTER,
    WORKMANSHIP_VALUE_STEP,
};
use crate::item::{ItemInstance, Material, Prototype};
use crate::rng::LootRng;
use crate::roll::TreasureRoll;

pub fn apply_value(
    rng: &mut LootRng,
    item: &mut ItemInstance,
    proto: &Prototype,
    roll: Option<&TreasureRoll>,
) {
    item.value = match roll {
        None => legacy_value(rng, item.tier).max(proto.base_value),
        Some(_) => computed_value(rng, proto.base_value, item),
    };
}

pub fn legacy_value(rng: &mut LootRng, tier: u8) -> u32 {
    let (lo, hi) = LEGACY_VALUE_RANGE[tier_index(tier)];
    rng.range_u32(lo, hi)
}

pub fn computed_value(rng: &mut LootRng, base: u32, item: &ItemInstance) -> u32 {
    let w = item.workmanship.unwrap_or(0) as f64;
    let workmanship_mod = (1.0 + WORKMANSHIP_VALUE_STEP * w).powi(2);
    let material_mod = item.material.map(|m| m.value_mod()).unwrap_or(1.0);
    let tier_mod = TIER_VALUE_MOD[tier_index(item.tier)];
    let jitter = rng.range_f64(VALUE_JITTER.0, VALUE_JITTER.1);

    let scaled = (base as f64 * workmanship_mod * material_mod * tier_mod * jitter).round() as u32;
    let gems = item
        .gem_type
        .map(|gem| gem_value(gem).saturating_mul(item.gem_count))
        .unwrap_or(0);
    scaled.saturating_add(gems).max(base)
}

/// Value of one gem of this material, 0 for non-gems
pub fn gem_value(gem: Material) -> u32 {
    gem.gem_class()
        .and_then(|class| GEM_CLASS_VALUE.get(class as usize - 1))
        .copied()
        .unwrap_or(0)
}
