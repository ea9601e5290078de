//! Treasure Core - Loot Generation Engine
//!
//! Turns abstract treasure profiles (monster drops, chests, scripted
//! rewards) into concrete, fully mutated item instances:
//! - Weighted chance tables (flat, tier-indexed, class -> member)
//! - Diminishing quality rolls and per-call random streams
//! - Treasure profiles, count resolution and category rolls
//! - Mutation pipeline (material, color, gems, category stats, wield
//!   requirements, spells, workmanship, value)
//! - Built-in and RON-loaded static data
//! - Monte-Carlo distribution simulation

pub mod balance;
pub mod constants;
pub mod engine;
pub mod error;
pub mod item;
pub mod logging;
pub mod loot;
pub mod metrics;
pub mod mutate;
pub mod profile;
pub mod rng;
pub mod roll;
pub mod table;
pub mod tables;
pub mod world;

pub use engine::config::{ArmorLevelMethod, CountMethod, LootConfig};
pub use error::{LootError, LootResult};
pub use item::{ItemInstance, Prototype};
pub use loot::LootGenerator;
pub use profile::{CategoryChance, ProfileOverrides, TreasureItemCategory, TreasureProfile};
pub use rng::LootRng;
pub use roll::{RollSubType, TreasureItemType, TreasureRoll};
pub use tables::LootTables;
pub use world::{MagicAssigner, NoMagic, PrototypeCatalog, PrototypeSource};
