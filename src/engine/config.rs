use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::logging::TracingConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootConfig {
    #[serde(default)]
    pub count_method: CountMethod,
    #[serde(default)]
    pub armor_level_method: ArmorLevelMethod,
    /// Run the mundane add-on side roll on the legacy count path
    #[serde(default)]
    pub mundane_addons: bool,
    /// Fixed seed; each generation call derives its own stream from it
    #[serde(default)]
    pub seed: Option<u64>,
    /// RON table set replacing the built-in tables
    #[serde(default)]
    pub tables_path: Option<PathBuf>,
    /// RON prototype list replacing the built-in catalog
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default)]
    pub tracing: TracingConfig,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            count_method: CountMethod::GuaranteedFloor,
            armor_level_method: ArmorLevelMethod::Style,
            mundane_addons: false,
            seed: None,
            tables_path: None,
            catalog_path: None,
            tracing: TracingConfig::default(),
        }
    }
}

/// How per-category item counts are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountMethod {
    /// One quality-biased trial grants `min`, then one trial per extra slot
    #[default]
    GuaranteedFloor,
    /// One flat roll per candidate item
    Legacy,
}

/// How armor level is computed when a roll is present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArmorLevelMethod {
    /// Style base x (tier - 1) x coverage
    #[default]
    Style,
    /// Template armor level plus a tier-ranged delta
    Compat,
}

impl LootConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        ron::from_str(text).context("failed to parse RON loot config")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("failed to parse JSON loot config")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Load from a `.ron` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read loot config {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => Self::from_ron_str(&text),
            Some("json") => Self::from_json(&text),
            other => bail!("unsupported config extension {:?} for {}", other, path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LootConfig::default();
        assert_eq!(config.count_method, CountMethod::GuaranteedFloor);
        assert_eq!(config.armor_level_method, ArmorLevelMethod::Style);
        assert!(!config.mundane_addons);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_ron() {
        let config = LootConfig::from_ron_str("(count_method: Legacy, seed: Some(9))").unwrap();
        assert_eq!(config.count_method, CountMethod::Legacy);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.armor_level_method, ArmorLevelMethod::Style);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = LootConfig {
            armor_level_method: ArmorLevelMethod::Compat,
            mundane_addons: true,
            ..Default::default()
        };
        let restored = LootConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(restored.armor_level_method, ArmorLevelMethod::Compat);
        assert!(restored.mundane_addons);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loot.toml");
        std::fs::write(&path, "").unwrap();
        assert!(LootConfig::load(&path).is_err());
    }
}
