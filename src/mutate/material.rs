//! Material, color and gem socketing steps.

use tracing::{debug, warn};

use crate::constants::{DEFAULT_GEM_COUNT, DEFAULT_JEWELRY_GEM_COUNT};
use crate::error::{LootError, LootResult};
use crate::item::{ItemInstance, MaterialClass, Prototype};
use crate::roll::{ArmorWeightClass, TreasureItemType, WeaponSubType};
use crate::tables::builtin::{
    MATERIAL_ARMOR, MATERIAL_ART, MATERIAL_CASTER, MATERIAL_CLOTH, MATERIAL_JEWELRY,
    MATERIAL_MELEE, MATERIAL_MISSILE,
};

use super::{GemSocketing, MutationContext};

/// Material code used when a template has none, by functional type
pub fn default_material_code(proto: &Prototype) -> Option<u8> {
    use TreasureItemType as T;
    let code = match proto.item_type {
        T::Caster => MATERIAL_CASTER,
        T::Clothing | T::Cloak => MATERIAL_CLOTH,
        T::Weapon => match proto.weapon.as_ref().map(|w| w.sub_type) {
            Some(WeaponSubType::Missile(_)) => MATERIAL_MISSILE,
            _ => MATERIAL_MELEE,
        },
        T::Jewelry => MATERIAL_JEWELRY,
        T::Armor | T::SocietyArmor => match proto.armor.as_ref().map(|a| a.weight_class) {
            Some(ArmorWeightClass::Cloth) => MATERIAL_CLOTH,
            _ => MATERIAL_ARMOR,
        },
        T::ArtObject => MATERIAL_ART,
        _ => return None,
    };
    Some(code)
}

pub fn apply_material(
    ctx: &mut MutationContext<'_>,
    item: &mut ItemInstance,
    proto: &Prototype,
) -> LootResult<()> {
    let tables = ctx.tables;
    let code = match proto.mutation.and_then(|m| m.material_code()) {
        Some(code) if tables.materials.by_code.contains_key(&code) => Some(code),
        Some(code) => {
            warn!(prototype = proto.id, code, "unknown material code, using type default");
            default_material_code(proto)
        }
        None => default_material_code(proto),
    };
    let Some(code) = code else {
        return Ok(());
    };
    let class_table = tables
        .materials
        .by_code
        .get(&code)
        .ok_or_else(|| LootError::no_entry(format!("material_code[{code}]")))?;
    let class = class_table.roll(item.tier, ctx.rng)?;
    let material = tables
        .materials
        .by_class
        .get(&class)
        .ok_or_else(|| LootError::no_entry(format!("materials[{class:?}]")))?
        .roll(item.tier, ctx.rng)?;
    debug!(prototype = proto.id, ?material, "material rolled");
    item.material = Some(material);
    Ok(())
}

pub fn apply_color(
    ctx: &mut MutationContext<'_>,
    item: &mut ItemInstance,
    proto: &Prototype,
) -> LootResult<()> {
    let tables = ctx.tables;
    let Some(code) = proto.mutation.and_then(|m| m.color_code()) else {
        return Ok(());
    };
    let palette = if code == tables.colors.legacy_code {
        *ctx.rng
            .choose(&tables.colors.legacy_palettes)
            .ok_or_else(|| LootError::no_entry("legacy_palettes"))?
    } else {
        let class = item.material.map(|m| m.class()).unwrap_or(MaterialClass::Cloth);
        tables
            .colors
            .by_code
            .get(&code)
            .and_then(|by_class| by_class.get(&class))
            .ok_or_else(|| LootError::no_entry(format!("colors[{code}][{class:?}]")))?
            .filtered(|p| proto.palettes.is_empty() || proto.palettes.contains(p))
            .roll(ctx.rng)?
    };
    item.palette = Some(palette);
    item.shade = Some(ctx.rng.range_f64(0.0, 1.0));
    Ok(())
}

pub fn apply_gems(
    ctx: &mut MutationContext<'_>,
    item: &mut ItemInstance,
    proto: &Prototype,
    socketing: GemSocketing,
) -> LootResult<()> {
    let tables = ctx.tables;
    let code = proto.mutation.and_then(|m| m.gem_code());
    let count = match (socketing, code) {
        (GemSocketing::Never, _) | (GemSocketing::ByCode, None) => return Ok(()),
        (_, Some(code)) => match tables.materials.gem_counts.get(&code) {
            Some(table) => table.roll(ctx.rng)?,
            None => {
                warn!(prototype = proto.id, code, "unknown gem code, using default count");
                fallback_count(ctx, socketing)
            }
        },
        (GemSocketing::Jewelry, None) => fallback_count(ctx, socketing),
    };
    if count == 0 {
        return Ok(());
    }
    let gem = tables.gems.classes.roll(item.tier, ctx.rng)?;
    item.gem_count = count;
    item.gem_type = Some(gem);
    Ok(())
}

fn fallback_count(ctx: &mut MutationContext<'_>, socketing: GemSocketing) -> u32 {
    let (lo, hi) = match socketing {
        GemSocketing::Jewelry => DEFAULT_JEWELRY_GEM_COUNT,
        _ => DEFAULT_GEM_COUNT,
    };
    ctx.rng.range_u32(lo, hi)
}
