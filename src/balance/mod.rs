//! Monte-Carlo loot distribution simulation
//!
//! Generates many loot sets from one profile to check the shape of the
//! output: which item types drop, how workmanship is spread, what the
//! sets are worth. Each set draws from its own derived random stream
//! (SHA3 of base seed and set index), so a run is deterministic for a
//! fixed seed regardless of how rayon schedules the work.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_WORKMANSHIP;
use crate::error::LootResult;
use crate::item::ItemInstance;
use crate::loot::LootGenerator;
use crate::profile::TreasureProfile;
use crate::rng::LootRng;
use crate::roll::TreasureItemType;

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub set_count: u64,
    pub profile: TreasureProfile,
    pub base_seed: u64,
}

impl SimConfig {
    pub fn new(profile: TreasureProfile) -> Self {
        Self {
            set_count: 10_000,
            profile,
            base_seed: 42,
        }
    }
}

/// Overall assessment of the workmanship spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceGrade {
    Excellent, // std dev >= 2.0
    Good,      // std dev >= 1.5
    Fair,      // std dev >= 1.0
    Poor,      // std dev >= 0.5
    Critical,  // quality barely varies
}

impl BalanceGrade {
    pub fn from_spread(std_dev: f64) -> Self {
        if std_dev >= 2.0 {
            Self::Excellent
        } else if std_dev >= 1.5 {
            Self::Good
        } else if std_dev >= 1.0 {
            Self::Fair
        } else if std_dev >= 0.5 {
            Self::Poor
        } else {
            Self::Critical
        }
    }
}

/// Results of a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionReport {
    pub total_sets: u64,
    pub total_items: u64,
    pub avg_items_per_set: f64,
    pub items_by_type: Vec<(TreasureItemType, u64)>,
    /// Items per workmanship level, index 0 = workmanship 1
    pub workmanship_histogram: Vec<u64>,
    pub avg_workmanship: f64,
    pub workmanship_std_dev: f64,
    pub avg_value: f64,
    pub max_value: u32,
    pub magic_items: u64,
    pub balance_grade: BalanceGrade,
}

impl DistributionReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn share_of(&self, item_type: TreasureItemType) -> f64 {
        if self.total_items == 0 {
            return 0.0;
        }
        let count = self
            .items_by_type
            .iter()
            .find(|(t, _)| *t == item_type)
            .map_or(0, |(_, n)| *n);
        count as f64 / self.total_items as f64
    }
}

/// Run the simulation with rayon parallelism. Fails only when the
/// profile itself is invalid.
pub fn run_loot_simulation(generator: &LootGenerator, config: &SimConfig) -> LootResult<DistributionReport> {
    config.profile.validate()?;

    let sets: Vec<Vec<ItemInstance>> = (0..config.set_count)
        .into_par_iter()
        .map(|index| {
            let mut rng = LootRng::derived(config.base_seed, index);
            generator
                .generate_with_rng(&config.profile, &mut rng)
                .unwrap_or_default()
        })
        .collect();

    Ok(analyze_results(&sets))
}

/// Fold generated sets into a report
pub fn analyze_results(sets: &[Vec<ItemInstance>]) -> DistributionReport {
    let items: Vec<&ItemInstance> = sets.iter().flatten().collect();
    let total_sets = sets.len() as u64;
    let total_items = items.len() as u64;

    let mut by_type: BTreeMap<TreasureItemType, u64> = BTreeMap::new();
    for item in &items {
        *by_type.entry(item.item_type).or_default() += 1;
    }

    let mut histogram = vec![0u64; MAX_WORKMANSHIP as usize];
    let workmanship: Vec<f64> = items
        .iter()
        .filter_map(|i| i.workmanship)
        .map(|w| {
            let slot = (w.clamp(1, MAX_WORKMANSHIP) - 1) as usize;
            histogram[slot] += 1;
            w as f64
        })
        .collect();
    let (avg_workmanship, workmanship_std_dev) = mean_and_std(&workmanship);

    let avg_value = if items.is_empty() {
        0.0
    } else {
        items.iter().map(|i| i.value as f64).sum::<f64>() / items.len() as f64
    };

    DistributionReport {
        total_sets,
        total_items,
        avg_items_per_set: if total_sets == 0 {
            0.0
        } else {
            total_items as f64 / total_sets as f64
        },
        items_by_type: by_type.into_iter().collect(),
        workmanship_histogram: histogram,
        avg_workmanship,
        workmanship_std_dev,
        avg_value,
        max_value: items.iter().map(|i| i.value).max().unwrap_or(0),
        magic_items: items.iter().filter(|i| i.is_magical).count() as u64,
        balance_grade: BalanceGrade::from_spread(workmanship_std_dev),
    }
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
