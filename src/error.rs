//! Error taxonomy for loot generation.
//!
//! Three families of failure:
//! - Caller-contract errors (malformed profile) fail fast at the entry point
//! - Data-integrity errors (unknown prototype, empty table, missing template
//!   data) are logged and resolved by a fallback or by skipping the item
//! - Unreachable states (no mutation branch for a rolled type) are logged
//!   and the item is left unmutated

use thiserror::Error;

use crate::profile::TreasureItemCategory;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LootError {
    #[error("Tier {0} is out of range (expected 1..=8)")]
    InvalidTier(u8),

    #[error("{category:?} chance {chance} is out of range (expected 0..=100)")]
    InvalidChance {
        category: TreasureItemCategory,
        chance: u8,
    },

    #[error("{category:?} count range is inverted: min {min} > max {max}")]
    InvalidCountRange {
        category: TreasureItemCategory,
        min: u32,
        max: u32,
    },

    #[error("Quality modifier {0} is out of range (expected 0.0..=1.0)")]
    InvalidQualityMod(f64),

    #[error("No eligible entry in table '{table}'")]
    NoEligibleEntry { table: String },

    #[error("Unknown prototype id {0}")]
    UnknownPrototype(u32),

    #[error("Prototype {prototype_id} is missing template data: {field}")]
    MissingTemplateData {
        prototype_id: u32,
        field: &'static str,
    },

    #[error("No mutation branch for {item_type} (tier {tier}, prototype {prototype_id})")]
    UnmatchedItemType {
        tier: u8,
        item_type: String,
        prototype_id: u32,
    },
}

impl LootError {
    pub fn no_entry(table: impl Into<String>) -> Self {
        Self::NoEligibleEntry {
            table: table.into(),
        }
    }

    /// True for errors caused by the caller rather than by game data
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTier(_)
                | Self::InvalidChance { .. }
                | Self::InvalidCountRange { .. }
                | Self::InvalidQualityMod(_)
        )
    }
}

pub type LootResult<T> = Result<T, LootError>;
