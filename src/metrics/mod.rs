//! Loot Metrics - lock-free generation counters
//!
//! The engine reports through the `MetricsCollector` trait so hosts can
//! forward counts to their own metrics stack. `LootMetrics` is the
//! built-in implementation: plain atomics, readable as a JSON snapshot.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::profile::TreasureItemCategory;
use crate::roll::TreasureItemType;

/// Why an item was dropped from a loot set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    UnknownPrototype,
    NoEligibleEntry,
    MissingTemplateData,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::UnknownPrototype => "unknown_prototype",
            SkipReason::NoEligibleEntry => "no_eligible_entry",
            SkipReason::MissingTemplateData => "missing_template_data",
        }
    }
}

pub trait MetricsCollector: Send + Sync {
    fn record_item(&self, category: TreasureItemCategory, item_type: TreasureItemType);

    fn record_skip(&self, reason: SkipReason);

    fn record_generation(&self, duration: Duration, items: usize);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsCollector for NoopMetrics {
    fn record_item(&self, _category: TreasureItemCategory, _item_type: TreasureItemType) {}

    fn record_skip(&self, _reason: SkipReason) {}

    fn record_generation(&self, _duration: Duration, _items: usize) {}
}

// ============================================================================
// Atomic collector
// ============================================================================

#[derive(Debug)]
pub struct LootMetrics {
    /// Loot sets generated
    pub total_sets: AtomicU64,
    /// Items produced, all categories
    pub total_items: AtomicU64,
    pub magic_items: AtomicU64,
    pub mundane_items: AtomicU64,
    /// Items dropped because of a data-integrity fallback
    pub total_skips: AtomicU64,
    pub unknown_prototype_skips: AtomicU64,
    pub missing_template_skips: AtomicU64,
    /// Cumulative generation time in microseconds
    pub total_duration_us: AtomicU64,
    per_type: Vec<AtomicU64>,
    pub start_time: Instant,
}

impl Default for LootMetrics {
    fn default() -> Self {
        Self {
            total_sets: AtomicU64::new(0),
            total_items: AtomicU64::new(0),
            magic_items: AtomicU64::new(0),
            mundane_items: AtomicU64::new(0),
            total_skips: AtomicU64::new(0),
            unknown_prototype_skips: AtomicU64::new(0),
            missing_template_skips: AtomicU64::new(0),
            total_duration_us: AtomicU64::new(0),
            per_type: TreasureItemType::all().iter().map(|_| AtomicU64::new(0)).collect(),
            start_time: Instant::now(),
        }
    }
}

impl LootMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn items_of_type(&self, item_type: TreasureItemType) -> u64 {
        type_slot(item_type)
            .and_then(|i| self.per_type.get(i))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    pub fn avg_duration_ms(&self) -> f64 {
        let sets = self.total_sets.load(Ordering::Relaxed);
        let dur_us = self.total_duration_us.load(Ordering::Relaxed);
        if sets > 0 {
            (dur_us as f64 / sets as f64) / 1000.0
        } else {
            0.0
        }
    }

    pub fn avg_items_per_set(&self) -> f64 {
        let sets = self.total_sets.load(Ordering::Relaxed);
        if sets > 0 {
            self.total_items.load(Ordering::Relaxed) as f64 / sets as f64
        } else {
            0.0
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs_f64(),
            total_sets: self.total_sets.load(Ordering::Relaxed),
            total_items: self.total_items.load(Ordering::Relaxed),
            magic_items: self.magic_items.load(Ordering::Relaxed),
            mundane_items: self.mundane_items.load(Ordering::Relaxed),
            total_skips: self.total_skips.load(Ordering::Relaxed),
            unknown_prototype_skips: self.unknown_prototype_skips.load(Ordering::Relaxed),
            missing_template_skips: self.missing_template_skips.load(Ordering::Relaxed),
            avg_duration_ms: self.avg_duration_ms(),
            avg_items_per_set: self.avg_items_per_set(),
            items_by_type: TreasureItemType::all()
                .iter()
                .map(|t| (*t, self.items_of_type(*t)))
                .filter(|(_, n)| *n > 0)
                .collect(),
        }
    }
}

fn type_slot(item_type: TreasureItemType) -> Option<usize> {
    TreasureItemType::all().iter().position(|t| *t == item_type)
}

impl MetricsCollector for LootMetrics {
    fn record_item(&self, category: TreasureItemCategory, item_type: TreasureItemType) {
        self.total_items.fetch_add(1, Ordering::Relaxed);
        match category {
            TreasureItemCategory::MagicItem => {
                self.magic_items.fetch_add(1, Ordering::Relaxed);
            }
            TreasureItemCategory::MundaneItem => {
                self.mundane_items.fetch_add(1, Ordering::Relaxed);
            }
            TreasureItemCategory::Item => {}
        }
        if let Some(counter) = type_slot(item_type).and_then(|i| self.per_type.get(i)) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_skip(&self, reason: SkipReason) {
        self.total_skips.fetch_add(1, Ordering::Relaxed);
        match reason {
            SkipReason::UnknownPrototype => {
                self.unknown_prototype_skips.fetch_add(1, Ordering::Relaxed);
            }
            SkipReason::MissingTemplateData => {
                self.missing_template_skips.fetch_add(1, Ordering::Relaxed);
            }
            SkipReason::NoEligibleEntry => {}
        }
    }

    fn record_generation(&self, duration: Duration, _items: usize) {
        self.total_sets.fetch_add(1, Ordering::Relaxed);
        self.total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: f64,
    pub total_sets: u64,
    pub total_items: u64,
    pub magic_items: u64,
    pub mundane_items: u64,
    pub total_skips: u64,
    pub unknown_prototype_skips: u64,
    pub missing_template_skips: u64,
    pub avg_duration_ms: f64,
    pub avg_items_per_set: f64,
    pub items_by_type: Vec<(TreasureItemType, u64)>,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
