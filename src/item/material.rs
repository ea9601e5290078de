//! Materials, material classes and their value modifiers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialClass {
    Cloth,
    Leather,
    Metal,
    Stone,
    Wood,
    Gem,
}

impl MaterialClass {
    pub const ALL: [MaterialClass; 6] = [
        Self::Cloth,
        Self::Leather,
        Self::Metal,
        Self::Stone,
        Self::Wood,
        Self::Gem,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    // Cloth
    Linen,
    Wool,
    Satin,
    Silk,
    Velvet,
    Damask,
    // Leather
    Leather,
    ArmoredilloHide,
    GromnieHide,
    ReedSharkHide,
    // Metal
    Copper,
    Bronze,
    Brass,
    Iron,
    Steel,
    Silver,
    Gold,
    // Stone
    Granite,
    Marble,
    Sandstone,
    Obsidian,
    Alabaster,
    Ceramic,
    Porcelain,
    // Wood
    Pine,
    Oak,
    Teak,
    Mahogany,
    Ebony,
    // Gems, class 1
    Agate,
    Amber,
    Azurite,
    Bloodstone,
    // class 2
    Carnelian,
    Citrine,
    Hematite,
    LavenderJade,
    // class 3
    Malachite,
    Moonstone,
    Onyx,
    Peridot,
    // class 4
    Aquamarine,
    GreenGarnet,
    Jet,
    Opal,
    // class 5
    BlackGarnet,
    FireOpal,
    ImperialTopaz,
    Sunstone,
    // class 6
    BlackOpal,
    Diamond,
    Emerald,
    Ruby,
    Sapphire,
}

impl Material {
    pub fn class(&self) -> MaterialClass {
        use Material::*;
        match self {
            Linen | Wool | Satin | Silk | Velvet | Damask => MaterialClass::Cloth,
            Leather | ArmoredilloHide | GromnieHide | ReedSharkHide => MaterialClass::Leather,
            Copper | Bronze | Brass | Iron | Steel | Silver | Gold => MaterialClass::Metal,
            Granite | Marble | Sandstone | Obsidian | Alabaster | Ceramic | Porcelain => {
                MaterialClass::Stone
            }
            Pine | Oak | Teak | Mahogany | Ebony => MaterialClass::Wood,
            _ => MaterialClass::Gem,
        }
    }

    /// Gem rarity class 1..=6, `None` for non-gem materials
    pub fn gem_class(&self) -> Option<u8> {
        use Material::*;
        match self {
            Agate | Amber | Azurite | Bloodstone => Some(1),
            Carnelian | Citrine | Hematite | LavenderJade => Some(2),
            Malachite | Moonstone | Onyx | Peridot => Some(3),
            Aquamarine | GreenGarnet | Jet | Opal => Some(4),
            BlackGarnet | FireOpal | ImperialTopaz | Sunstone => Some(5),
            BlackOpal | Diamond | Emerald | Ruby | Sapphire => Some(6),
            _ => None,
        }
    }

    /// Multiplier applied to item value
    pub fn value_mod(&self) -> f64 {
        use Material::*;
        match self {
            Linen | Wool | Pine | Sandstone | Leather | Copper => 1.0,
            Satin | Oak | Granite | Ceramic | GromnieHide | Bronze | Brass | Iron => 1.1,
            Silk | Teak | Marble | ArmoredilloHide | Steel => 1.25,
            Velvet | Mahogany | Alabaster | Porcelain | ReedSharkHide | Silver => 1.5,
            Damask | Ebony | Obsidian => 1.75,
            Gold => 2.0,
            _ => match self.gem_class() {
                Some(class) => 1.0 + 0.25 * class as f64,
                None => 1.0,
            },
        }
    }

    pub fn display_name(&self) -> String {
        let debug = format!("{self:?}");
        let mut out = String::with_capacity(debug.len() + 2);
        for (i, ch) in debug.chars().enumerate() {
            if i > 0 && ch.is_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
        out
    }

    pub fn all_gems() -> Vec<Material> {
        ALL_MATERIALS
            .iter()
            .copied()
            .filter(|m| m.gem_class().is_some())
            .collect()
    }

    pub fn of_class(class: MaterialClass) -> Vec<Material> {
        ALL_MATERIALS
            .iter()
            .copied()
            .filter(|m| m.class() == class)
            .collect()
    }
}

pub const ALL_MATERIALS: [Material; 54] = {
    use Material::*;
    [
        Linen, Wool, Satin, Silk, Velvet, Damask, Leather, ArmoredilloHide, GromnieHide,
        ReedSharkHide, Copper, Bronze, Brass, Iron, Steel, Silver, Gold, Granite, Marble,
        Sandstone, Obsidian, Alabaster, Ceramic, Porcelain, Pine, Oak, Teak, Mahogany, Ebony,
        Agate, Amber, Azurite, Bloodstone, Carnelian, Citrine, Hematite, LavenderJade, Malachite,
        Moonstone, Onyx, Peridot, Aquamarine, GreenGarnet, Jet, Opal, BlackGarnet, FireOpal,
        ImperialTopaz, Sunstone, BlackOpal, Diamond, Emerald, Ruby, Sapphire,
    ]
};
