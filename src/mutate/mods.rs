//! Shared stat-mod rolling and workmanship math.

use rand::seq::SliceRandom;

use crate::constants::{
    tier_index, LEGACY_WORKMANSHIP, MAX_MOD_SLOTS, MAX_WORKMANSHIP, MIN_WORKMANSHIP, MOD_COUNT_MULT,
};
use crate::item::WeaponStats;
use crate::rng::LootRng;

use super::Quality;

/// Weapon mod slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponMod {
    Offense,
    MeleeDefense,
    MissileDefense,
    MagicDefense,
    ManaConversion,
}

impl WeaponMod {
    pub fn apply(&self, stats: &mut WeaponStats, value: f64) {
        match self {
            WeaponMod::Offense => stats.offense_mod = value,
            WeaponMod::MeleeDefense => stats.melee_defense_mod = value,
            WeaponMod::MissileDefense => stats.missile_defense_mod = value,
            WeaponMod::MagicDefense => stats.magic_defense_mod = value,
            WeaponMod::ManaConversion => stats.mana_conversion_mod = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolledMod<T> {
    pub slot: T,
    pub value: f64,
    pub percentile: f64,
}

/// Quality-biased subset size: `1 + floor(diminishing_roll * limit)`,
/// capped at the candidate count and `MAX_MOD_SLOTS`
pub fn subset_size(rng: &mut LootRng, quality_mod: f64, candidates: usize) -> usize {
    let limit = candidates.min(MAX_MOD_SLOTS);
    if limit == 0 {
        return 0;
    }
    let extra = (rng.diminishing_roll(quality_mod) * limit as f64).floor() as usize;
    (1 + extra).min(limit)
}

pub fn choose_subset<T: Copy>(rng: &mut LootRng, quality_mod: f64, candidates: &[T]) -> Vec<T> {
    let n = subset_size(rng, quality_mod, candidates.len());
    let mut chosen = candidates.to_vec();
    chosen.shuffle(rng);
    chosen.truncate(n);
    chosen
}

/// Pick a subset and diminishing-roll each slot up to its tier ceiling.
///
/// Fewer slots get a larger share: the ceiling is scaled by
/// `MOD_COUNT_MULT[n - 1]`. Percentiles are taken against the same
/// scaled ceiling at tier 8.
pub fn roll_mod_subset<T: Copy>(
    rng: &mut LootRng,
    quality_mod: f64,
    candidates: &[T],
    tier_max: f64,
    top_tier_max: f64,
) -> Vec<RolledMod<T>> {
    let chosen = choose_subset(rng, quality_mod, candidates);
    let mult = chosen
        .len()
        .checked_sub(1)
        .and_then(|i| MOD_COUNT_MULT.get(i))
        .copied()
        .unwrap_or(1.0);
    chosen
        .into_iter()
        .map(|slot| {
            let value = rng.diminishing_roll(quality_mod) * tier_max * mult;
            RolledMod {
                slot,
                value,
                percentile: percentile(value, 0.0, top_tier_max * mult),
            }
        })
        .collect()
}

pub fn mean_percentile<T>(mods: &[RolledMod<T>]) -> f64 {
    if mods.is_empty() {
        return 0.0;
    }
    mods.iter().map(|m| m.percentile).sum::<f64>() / mods.len() as f64
}

/// `(value - floor) / (ceiling - floor)` clamped to [0, 1]
pub fn percentile(value: f64, floor: f64, ceiling: f64) -> f64 {
    let span = ceiling - floor;
    if span <= f64::EPSILON {
        return 0.0;
    }
    ((value - floor) / span).clamp(0.0, 1.0)
}

pub fn workmanship_from_percentiles(percentiles: &[f64]) -> u8 {
    if percentiles.is_empty() {
        return MIN_WORKMANSHIP;
    }
    let avg = percentiles.iter().sum::<f64>() / percentiles.len() as f64;
    workmanship_from_score(avg)
}

pub fn workmanship_from_score(score: f64) -> u8 {
    let w = (score * MAX_WORKMANSHIP as f64).round();
    w.clamp(MIN_WORKMANSHIP as f64, MAX_WORKMANSHIP as f64) as u8
}

pub fn resolve_workmanship(rng: &mut LootRng, quality: &Quality, tier: u8) -> Option<u8> {
    match quality {
        Quality::Percentiles(p) => Some(workmanship_from_percentiles(p)),
        Quality::Score(s) => Some(workmanship_from_score(*s)),
        Quality::Legacy => {
            let (lo, hi) = LEGACY_WORKMANSHIP[tier_index(tier)];
            let w = rng.range_u32(lo, hi) as u8;
            Some(w.clamp(MIN_WORKMANSHIP, MAX_WORKMANSHIP))
        }
        Quality::None => None,
    }
}
