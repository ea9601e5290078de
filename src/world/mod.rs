//! Boundary with the world-object subsystem.
//!
//! The engine never owns item storage. It reads templates through
//! `PrototypeSource` and hands spell assignment to a `MagicAssigner`.
//! `PrototypeCatalog` is the in-memory source used by the built-in data
//! set and by anything that loads templates from RON.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::item::{ItemInstance, Prototype};
use crate::profile::TreasureProfile;
use crate::roll::TreasureRoll;

/// Template lookup keyed by prototype id
pub trait PrototypeSource: Send + Sync {
    fn get_prototype(&self, id: u32) -> Option<&Prototype>;

    /// Fresh unmutated instance of a template
    fn create_instance(&self, id: u32, tier: u8) -> Option<ItemInstance> {
        self.get_prototype(id)
            .map(|proto| ItemInstance::from_prototype(proto, tier))
    }
}

/// Spell assignment, called once after every non-magic mutation
pub trait MagicAssigner: Send + Sync {
    fn assign_magic(
        &self,
        item: &mut ItemInstance,
        profile: &TreasureProfile,
        roll: Option<&TreasureRoll>,
        is_armor: bool,
        is_magical: bool,
    );
}

/// Assigns nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMagic;

impl MagicAssigner for NoMagic {
    fn assign_magic(
        &self,
        _item: &mut ItemInstance,
        _profile: &TreasureProfile,
        _roll: Option<&TreasureRoll>,
        _is_armor: bool,
        _is_magical: bool,
    ) {
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrototypeCatalog {
    prototypes: HashMap<u32, Prototype>,
}

impl PrototypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prototypes(prototypes: impl IntoIterator<Item = Prototype>) -> Self {
        let mut catalog = Self::new();
        for proto in prototypes {
            catalog.insert(proto);
        }
        catalog
    }

    /// Later inserts with the same id replace earlier ones
    pub fn insert(&mut self, proto: Prototype) {
        self.prototypes.insert(proto.id, proto);
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.prototypes.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prototype> {
        self.prototypes.values()
    }

    /// Parse a RON list of prototypes
    pub fn from_ron_str(text: &str) -> anyhow::Result<Self> {
        let list: Vec<Prototype> =
            ron::from_str(text).context("failed to parse prototype catalog")?;
        Ok(Self::from_prototypes(list))
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prototype catalog {}", path.display()))?;
        Self::from_ron_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_ron_string(&self) -> anyhow::Result<String> {
        let mut list: Vec<&Prototype> = self.prototypes.values().collect();
        list.sort_by_key(|p| p.id);
        ron::ser::to_string_pretty(&list, ron::ser::PrettyConfig::default())
            .context("failed to serialize prototype catalog")
    }
}

impl PrototypeSource for PrototypeCatalog {
    fn get_prototype(&self, id: u32) -> Option<&Prototype> {
        self.prototypes.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::TreasureItemType;

    #[test]
    fn test_catalog_lookup() {
        let catalog = PrototypeCatalog::from_prototypes([
            Prototype::new(1, "Pyreal", TreasureItemType::Pyreal, 1),
            Prototype::new(2, "Scroll", TreasureItemType::Scroll, 50),
        ]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get_prototype(2).is_some());
        assert!(catalog.get_prototype(3).is_none());
        let item = catalog.create_instance(2, 4).unwrap();
        assert_eq!(item.tier, 4);
        assert_eq!(item.prototype_id, 2);
        assert!(catalog.create_instance(99, 1).is_none());
    }

    #[test]
    fn test_catalog_ron_roundtrip() {
        let catalog = PrototypeCatalog::from_prototypes([Prototype::new(
            7,
            "Gold Ring",
            TreasureItemType::Jewelry,
            100,
        )]);
        let text = catalog.to_ron_string().unwrap();
        let restored = PrototypeCatalog::from_ron_str(&text).unwrap();
        assert_eq!(restored.get_prototype(7), catalog.get_prototype(7));
    }

    #[test]
    fn test_catalog_parse_error_has_context() {
        let err = PrototypeCatalog::from_ron_str("not ron").unwrap_err();
        assert!(format!("{err:#}").contains("prototype catalog"));
    }
}
