//! Loot generation orchestrator.
//!
//! A loot set is built from a `TreasureProfile` in three passes, one per
//! category (item, magic item, mundane item):
//! 1. Resolve how many items the category yields (`counts`)
//! 2. Roll each item's type, sub-type, heritage and prototype (`select`)
//! 3. Instantiate the prototype and run the mutation pipeline
//!
//! Caller mistakes in the profile fail the whole call up front. Any other
//! failure only drops the item it happened to.

pub mod counts;
pub mod select;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::engine::config::{CountMethod, LootConfig};
use crate::error::{LootError, LootResult};
use crate::item::ItemInstance;
use crate::logging::TimingSpan;
use crate::metrics::{MetricsCollector, NoopMetrics, SkipReason};
use crate::mutate::{mutate_item, MutationContext};
use crate::profile::{TreasureItemCategory, TreasureProfile};
use crate::rng::LootRng;
use crate::roll::TreasureRoll;
use crate::tables::LootTables;
use crate::world::{MagicAssigner, NoMagic, PrototypeSource};

pub struct LootGenerator {
    tables: Arc<LootTables>,
    prototypes: Arc<dyn PrototypeSource>,
    magic: Arc<dyn MagicAssigner>,
    metrics: Arc<dyn MetricsCollector>,
    config: LootConfig,
    /// Stream index for seeded generation
    calls: AtomicU64,
}

impl LootGenerator {
    pub fn new(tables: Arc<LootTables>, prototypes: Arc<dyn PrototypeSource>) -> Self {
        Self {
            tables,
            prototypes,
            magic: Arc::new(NoMagic),
            metrics: Arc::new(NoopMetrics),
            config: LootConfig::default(),
            calls: AtomicU64::new(0),
        }
    }

    /// Generator over the built-in tables and prototype catalog
    pub fn builtin() -> Self {
        let (tables, catalog) = LootTables::builtin_with_catalog();
        Self::new(tables, catalog)
    }

    pub fn with_config(mut self, config: LootConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_magic(mut self, magic: Arc<dyn MagicAssigner>) -> Self {
        self.magic = magic;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &LootConfig {
        &self.config
    }

    pub fn tables(&self) -> &LootTables {
        &self.tables
    }

    pub fn prototypes(&self) -> &dyn PrototypeSource {
        self.prototypes.as_ref()
    }

    // =====================================================
    // Loot sets
    // =====================================================

    /// Generate every item a profile yields.
    ///
    /// With a configured seed each call draws from its own derived stream,
    /// so a sequence of calls is reproducible; otherwise entropy is used.
    pub fn generate_random_loot_set(&self, profile: &TreasureProfile) -> LootResult<Vec<ItemInstance>> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let mut rng = match self.config.seed {
            Some(seed) => LootRng::derived(seed, call),
            None => LootRng::from_entropy(),
        };
        self.generate_with_rng(profile, &mut rng)
    }

    /// Same as `generate_random_loot_set` with a caller-owned random source
    pub fn generate_with_rng(
        &self,
        profile: &TreasureProfile,
        rng: &mut LootRng,
    ) -> LootResult<Vec<ItemInstance>> {
        profile.validate()?;
        let _span = TimingSpan::loot_set(profile.id, profile.tier);
        let start = Instant::now();

        let mut items = Vec::new();
        for category in TreasureItemCategory::all() {
            let chance = profile.category(category);
            let count = counts::resolve_count(
                self.config.count_method,
                category,
                chance,
                profile.quality_mod,
                rng,
            );
            for _ in 0..count {
                match self.create_random_loot_object(category, profile, rng) {
                    Ok(item) => items.push(item),
                    Err(err) => self.skip(category, &err),
                }
            }
        }

        if self.config.count_method == CountMethod::Legacy {
            if let Some(addon) = self.roll_mundane_addon(profile, rng) {
                items.push(addon);
            }
        }

        let elapsed = start.elapsed();
        self.metrics.record_generation(elapsed, items.len());
        info!(
            profile = profile.id,
            tier = profile.tier,
            items = items.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "loot set generated"
        );
        Ok(items)
    }

    // =====================================================
    // Single items
    // =====================================================

    /// Roll, instantiate and mutate one item of `category`
    pub fn create_random_loot_object(
        &self,
        category: TreasureItemCategory,
        profile: &TreasureProfile,
        rng: &mut LootRng,
    ) -> LootResult<ItemInstance> {
        let mut roll = select::roll_treasure(&self.tables, profile, category, rng)?;
        let proto = self
            .prototypes
            .get_prototype(roll.prototype_id)
            .ok_or(LootError::UnknownPrototype(roll.prototype_id))?;
        roll.base_armor_level = proto.armor_level;
        roll.base_ward_level = proto.ward_level;

        let mut item = ItemInstance::from_prototype(proto, profile.tier);
        let mut ctx = self.context(rng);
        match mutate_item(&mut ctx, &mut item, proto, profile, Some(&roll), category.is_magical()) {
            // unmatched branch: already logged, the item is kept unmutated
            Ok(()) | Err(LootError::UnmatchedItemType { .. }) => {}
            Err(err) => return Err(err),
        }
        self.metrics.record_item(category, item.item_type);
        Ok(item)
    }

    /// Instantiate a fixed prototype and mutate it without a roll. Used for
    /// scripted rewards; stats, value and workmanship take the flat
    /// per-tier ranges.
    pub fn create_and_mutate(
        &self,
        prototype_id: u32,
        profile: &TreasureProfile,
        is_magical: bool,
        rng: &mut LootRng,
    ) -> LootResult<ItemInstance> {
        profile.validate()?;
        let proto = self
            .prototypes
            .get_prototype(prototype_id)
            .ok_or(LootError::UnknownPrototype(prototype_id))?;
        let mut item = ItemInstance::from_prototype(proto, profile.tier);
        let mut ctx = self.context(rng);
        mutate_item(&mut ctx, &mut item, proto, profile, None, is_magical)?;
        Ok(item)
    }

    /// Mutate a caller-built roll. The roll must name a known prototype.
    pub fn mutate_roll(
        &self,
        roll: &TreasureRoll,
        profile: &TreasureProfile,
        is_magical: bool,
        rng: &mut LootRng,
    ) -> LootResult<ItemInstance> {
        let proto = self
            .prototypes
            .get_prototype(roll.prototype_id)
            .ok_or(LootError::UnknownPrototype(roll.prototype_id))?;
        let mut item = ItemInstance::from_prototype(proto, profile.tier);
        let mut ctx = self.context(rng);
        mutate_item(&mut ctx, &mut item, proto, profile, Some(roll), is_magical)?;
        Ok(item)
    }

    /// Legacy side roll for a "Coalesced Mana / Aetheria" add-on. Off
    /// unless `mundane_addons` is set.
    fn roll_mundane_addon(&self, profile: &TreasureProfile, rng: &mut LootRng) -> Option<ItemInstance> {
        if !self.config.mundane_addons {
            return None;
        }
        let id = match select::select_addon(&self.tables, profile.tier, rng) {
            Ok(id) => id,
            Err(err) => {
                self.skip(TreasureItemCategory::MundaneItem, &err);
                return None;
            }
        };
        match self.create_and_mutate(id, profile, false, rng) {
            Ok(item) => {
                self.metrics
                    .record_item(TreasureItemCategory::MundaneItem, item.item_type);
                Some(item)
            }
            Err(err) => {
                self.skip(TreasureItemCategory::MundaneItem, &err);
                None
            }
        }
    }

    fn context<'a>(&'a self, rng: &'a mut LootRng) -> MutationContext<'a> {
        MutationContext {
            tables: &self.tables,
            config: &self.config,
            magic: self.magic.as_ref(),
            rng,
        }
    }

    fn skip(&self, category: TreasureItemCategory, err: &LootError) {
        let reason = match err {
            LootError::UnknownPrototype(_) => SkipReason::UnknownPrototype,
            LootError::MissingTemplateData { .. } => SkipReason::MissingTemplateData,
            _ => SkipReason::NoEligibleEntry,
        };
        warn!(category = category.as_str(), %err, "loot item skipped");
        self.metrics.record_skip(reason);
    }
}
