//! Engine assembly.
//!
//! Builds a ready-to-use `LootGenerator` from a `LootConfig`:
//!   1. Table set: RON file from `tables_path`, else the built-in tables
//!   2. Prototype catalog: RON file from `catalog_path`, else built-in
//!   3. Tracing subscriber from the config's `TracingConfig`

pub mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::logging::init_tracing;
use crate::loot::LootGenerator;
use crate::tables::{builtin, LootTables};
use crate::world::PrototypeCatalog;

pub use config::{ArmorLevelMethod, CountMethod, LootConfig};

/// Generator wired from configuration. Loaded tables are validated.
pub fn from_config(config: LootConfig) -> anyhow::Result<LootGenerator> {
    init_tracing(&config.tracing);

    let tables = match &config.tables_path {
        Some(path) => Arc::new(load_tables(path)?),
        None => LootTables::builtin(),
    };
    let catalog = match &config.catalog_path {
        Some(path) => Arc::new(PrototypeCatalog::load(path)?),
        None => builtin::catalog(),
    };

    info!(
        tables = config.tables_path.is_some(),
        catalog = config.catalog_path.is_some(),
        prototypes = catalog.len(),
        count_method = ?config.count_method,
        "loot engine ready"
    );
    Ok(LootGenerator::new(tables, catalog).with_config(config))
}

/// Read a config file (RON or JSON) and build the generator from it
pub fn from_config_file(path: impl AsRef<Path>) -> anyhow::Result<LootGenerator> {
    let path = path.as_ref();
    let config = LootConfig::load(path)
        .with_context(|| format!("failed to load loot config {}", path.display()))?;
    from_config(config)
}

fn load_tables(path: &Path) -> anyhow::Result<LootTables> {
    let tables = LootTables::load(path)?;
    tables
        .validate()
        .with_context(|| format!("invalid loot tables in {}", path.display()))?;
    Ok(tables)
}

// =====================================================
// Tests
// =====================================================
