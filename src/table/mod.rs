//! Weighted chance tables.
//!
//! Every categorical roll in the engine goes through one of these:
//! - `ChanceTable<T>`: flat (value, weight) list
//! - `TierChanceTable<T>`: one `ChanceTable` per tier (1-8)
//! - `ClassedTable<C, T>`: roll a class per tier, then roll within the class
//!
//! Selection accumulates weights in declaration order and returns the first
//! entry whose running total exceeds the draw, so ties go to the earlier
//! entry.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_TIER;
use crate::error::{LootError, LootResult};
use crate::rng::LootRng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChanceEntry<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> ChanceEntry<T> {
    /// NaN and negative weights never win a draw
    fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChanceTable<T> {
    #[serde(default)]
    pub label: String,
    pub entries: Vec<ChanceEntry<T>>,
}

impl<T> Default for ChanceTable<T> {
    fn default() -> Self {
        Self {
            label: String::new(),
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> ChanceTable<T> {
    pub fn new(label: impl Into<String>, entries: Vec<(T, f64)>) -> Self {
        Self {
            label: label.into(),
            entries: entries
                .into_iter()
                .map(|(value, weight)| ChanceEntry { value, weight })
                .collect(),
        }
    }

    /// Equal weight for every value
    pub fn uniform(label: impl Into<String>, values: impl IntoIterator<Item = T>) -> Self {
        Self::new(label, values.into_iter().map(|v| (v, 1.0)).collect())
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(ChanceEntry::effective_weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_weight() <= 0.0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|e| &e.value)
    }

    /// Deterministic selection for a draw in `[0, total_weight)`.
    ///
    /// A draw at or past the total (float rounding) resolves to the last
    /// entry with positive weight.
    pub fn select(&self, draw: f64) -> Option<&T> {
        let mut accumulated = 0.0;
        let mut last = None;
        for entry in &self.entries {
            let weight = entry.effective_weight();
            if weight <= 0.0 {
                continue;
            }
            accumulated += weight;
            if accumulated > draw {
                return Some(&entry.value);
            }
            last = Some(&entry.value);
        }
        last
    }

    pub fn roll(&self, rng: &mut LootRng) -> LootResult<T> {
        let total = self.total_weight();
        if total <= 0.0 {
            return Err(LootError::no_entry(self.label.clone()));
        }
        let draw = rng.range_f64(0.0, total);
        self.select(draw)
            .cloned()
            .ok_or_else(|| LootError::no_entry(self.label.clone()))
    }

    /// Copy keeping only entries whose value satisfies `keep`
    pub fn filtered(&self, mut keep: impl FnMut(&T) -> bool) -> Self {
        Self {
            label: self.label.clone(),
            entries: self
                .entries
                .iter()
                .filter(|e| keep(&e.value))
                .cloned()
                .collect(),
        }
    }
}

/// One table per tier, index 0 = tier 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierChanceTable<T> {
    #[serde(default)]
    pub label: String,
    pub tiers: Vec<ChanceTable<T>>,
}

impl<T: Clone> TierChanceTable<T> {
    pub fn new(label: impl Into<String>, tiers: Vec<ChanceTable<T>>) -> Self {
        Self {
            label: label.into(),
            tiers,
        }
    }

    /// Build by evaluating `weights_for(tier)` for tiers 1..=8
    pub fn from_fn(label: impl Into<String>, mut weights_for: impl FnMut(u8) -> Vec<(T, f64)>) -> Self {
        let label = label.into();
        let tiers = (1..=MAX_TIER)
            .map(|tier| ChanceTable::new(format!("{label}[t{tier}]"), weights_for(tier)))
            .collect();
        Self { label, tiers }
    }

    /// Table for a tier; out-of-range tiers clamp to the nearest defined one
    pub fn for_tier(&self, tier: u8) -> Option<&ChanceTable<T>> {
        if self.tiers.is_empty() {
            return None;
        }
        let index = (tier.max(1) as usize - 1).min(self.tiers.len() - 1);
        self.tiers.get(index)
    }

    pub fn roll(&self, tier: u8, rng: &mut LootRng) -> LootResult<T> {
        self.for_tier(tier)
            .ok_or_else(|| LootError::no_entry(self.label.clone()))?
            .roll(rng)
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
}

/// Two-stage table: tier-scoped class roll, then a roll within the class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassedTable<C: Eq + Hash, T> {
    pub classes: TierChanceTable<C>,
    pub members: HashMap<C, ChanceTable<T>>,
}

impl<C, T> ClassedTable<C, T>
where
    C: Clone + Eq + Hash + std::fmt::Debug,
    T: Clone,
{
    pub fn roll_class(&self, tier: u8, rng: &mut LootRng) -> LootResult<C> {
        self.classes.roll(tier, rng)
    }

    pub fn roll_within(&self, class: &C, rng: &mut LootRng) -> LootResult<T> {
        self.members
            .get(class)
            .ok_or_else(|| LootError::no_entry(format!("{}::{class:?}", self.classes.label)))?
            .roll(rng)
    }

    pub fn roll(&self, tier: u8, rng: &mut LootRng) -> LootResult<T> {
        let class = self.roll_class(tier, rng)?;
        self.roll_within(&class, rng)
    }
}
