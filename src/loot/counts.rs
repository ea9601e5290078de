//! Per-category item counts.
//!
//! - `GuaranteedFloor`: one quality-biased trial grants `min`, then every
//!   extra slot up to `max` gets its own trial at the same chance
//! - `Legacy`: one flat 1..=100 roll per candidate item

use crate::engine::config::CountMethod;
use crate::profile::{CategoryChance, TreasureItemCategory};
use crate::rng::LootRng;

/// Number of items to generate for one category
pub fn resolve_count(
    method: CountMethod,
    category: TreasureItemCategory,
    chance: &CategoryChance,
    quality_mod: f64,
    rng: &mut LootRng,
) -> u32 {
    match method {
        CountMethod::GuaranteedFloor => floor_count(chance, quality_mod, rng),
        CountMethod::Legacy => match category {
            TreasureItemCategory::MundaneItem => legacy_mundane_count(chance, rng),
            _ => legacy_count(chance, rng),
        },
    }
}

/// Success when `U[0, 1 - q) * 100 < chance`; plain `chance/100` at q = 0
pub fn floor_trial(chance: u8, quality_mod: f64, rng: &mut LootRng) -> bool {
    let ceiling = 1.0 - quality_mod.clamp(0.0, 1.0);
    rng.range_f64(0.0, ceiling) * 100.0 < chance as f64
}

pub fn floor_count(chance: &CategoryChance, quality_mod: f64, rng: &mut LootRng) -> u32 {
    match chance.chance {
        0 => 0,
        c if c >= 100 => rng.range_u32(chance.min, chance.max),
        c => {
            if !floor_trial(c, quality_mod, rng) {
                return 0;
            }
            let extra = chance.max.saturating_sub(chance.min);
            let bonus = (0..extra).filter(|_| floor_trial(c, 0.0, rng)).count() as u32;
            chance.min + bonus
        }
    }
}

/// Candidate count uniform in `[min, max]`, each kept on a flat percent roll
pub fn legacy_count(chance: &CategoryChance, rng: &mut LootRng) -> u32 {
    if chance.chance == 0 {
        return 0;
    }
    let candidates = rng.range_u32(chance.min, chance.max);
    (0..candidates).filter(|_| rng.percent(chance.chance)).count() as u32
}

/// One flat roll gates a uniform `[min, max]` count
pub fn legacy_mundane_count(chance: &CategoryChance, rng: &mut LootRng) -> u32 {
    if chance.chance == 0 || !rng.percent(chance.chance) {
        return 0;
    }
    rng.range_u32(chance.min, chance.max)
}
