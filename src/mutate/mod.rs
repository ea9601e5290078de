//! Item mutation pipeline.
//!
//! Every generated item runs the same ordered steps, each gated by what the
//! template supports:
//! 1. Material (material code -> class -> material)
//! 2. Color (color code x material class -> palette, plus shade)
//! 3. Gem socketing
//! 4. Category stats (one `Mutator` per category)
//! 5. Wield requirements
//! 6. Spells through the injected `MagicAssigner`
//! 7. Workmanship, then value (value depends on workmanship)
//! 8. Long description
//!
//! Items mutated without a `TreasureRoll` (scripted spawns of a fixed
//! prototype) take the legacy formulas for stats, value and workmanship.
//!
//! A failed stats step (missing template data, empty table) aborts the
//! pipeline and the caller drops the item. The earlier decoration steps
//! only log and move on.

pub mod armor;
pub mod caster;
pub mod cloak;
pub mod gem;
pub mod generic;
pub mod jewelry;
pub mod material;
pub mod melee;
pub mod missile;
pub mod mods;
pub mod society;
pub mod value;

use tracing::{debug, error, warn};

use crate::engine::config::LootConfig;
use crate::error::{LootError, LootResult};
use crate::item::{ItemInstance, Prototype, Skill, WieldRequirement};
use crate::profile::TreasureProfile;
use crate::rng::LootRng;
use crate::roll::{RollSubType, TreasureItemType, TreasureRoll, WeaponSubType};
use crate::tables::LootTables;
use crate::world::MagicAssigner;

pub use armor::ArmorMutator;
pub use caster::CasterMutator;
pub use cloak::CloakMutator;
pub use gem::GemMutator;
pub use generic::GenericMutator;
pub use jewelry::JewelryMutator;
pub use melee::MeleeMutator;
pub use missile::MissileMutator;
pub use society::SocietyArmorMutator;

/// Everything a mutator reads or draws from during one item mutation
pub struct MutationContext<'a> {
    pub tables: &'a LootTables,
    pub config: &'a LootConfig,
    pub magic: &'a dyn MagicAssigner,
    pub rng: &'a mut LootRng,
}

/// Quality evidence gathered by the stats step, turned into workmanship
#[derive(Debug, Clone, PartialEq)]
pub enum Quality {
    /// Per-stat percentiles against the best tier-8 roll, averaged
    Percentiles(Vec<f64>),
    /// A single score in [0, 1]
    Score(f64),
    /// Flat per-tier workmanship range
    Legacy,
    /// No workmanship
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemSocketing {
    Never,
    /// Only when the template carries a gem code
    ByCode,
    /// Always socketed; unknown or missing codes use the jewelry range
    Jewelry,
}

/// Which shared steps run for a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Steps {
    pub material: bool,
    pub color: bool,
    pub gems: GemSocketing,
    /// Recompute value; otherwise the stats step owns it
    pub value: bool,
}

impl Steps {
    pub const EQUIPMENT: Steps = Steps {
        material: true,
        color: true,
        gems: GemSocketing::ByCode,
        value: true,
    };

    pub const STATS_ONLY: Steps = Steps {
        material: false,
        color: false,
        gems: GemSocketing::Never,
        value: false,
    };
}

pub trait Mutator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Passed through to the magic assigner
    fn is_armor(&self) -> bool {
        false
    }

    fn steps(&self, _proto: &Prototype) -> Steps {
        Steps::EQUIPMENT
    }

    fn mutate_stats(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        proto: &Prototype,
        profile: &TreasureProfile,
        roll: Option<&TreasureRoll>,
    ) -> LootResult<Quality>;

    fn wield_requirements(
        &self,
        _ctx: &MutationContext<'_>,
        _item: &ItemInstance,
        _proto: &Prototype,
        _roll: Option<&TreasureRoll>,
    ) -> Vec<WieldRequirement> {
        Vec::new()
    }

    fn mutate(
        &self,
        ctx: &mut MutationContext<'_>,
        item: &mut ItemInstance,
        proto: &Prototype,
        profile: &TreasureProfile,
        roll: Option<&TreasureRoll>,
        is_magical: bool,
    ) -> LootResult<()> {
        run_pipeline(self, ctx, item, proto, profile, roll, is_magical)
    }
}

/// The shared step sequence around a mutator's stats step
pub fn run_pipeline<M: Mutator + ?Sized>(
    mutator: &M,
    ctx: &mut MutationContext<'_>,
    item: &mut ItemInstance,
    proto: &Prototype,
    profile: &TreasureProfile,
    roll: Option<&TreasureRoll>,
    is_magical: bool,
) -> LootResult<()> {
    let steps = mutator.steps(proto);

    if steps.material {
        if let Err(err) = material::apply_material(ctx, item, proto) {
            warn!(prototype = proto.id, %err, "material step skipped");
        }
    }
    if steps.color {
        if let Err(err) = material::apply_color(ctx, item, proto) {
            warn!(prototype = proto.id, %err, "color step skipped");
        }
    }
    if let Err(err) = material::apply_gems(ctx, item, proto, steps.gems) {
        warn!(prototype = proto.id, %err, "gem step skipped");
    }

    let quality = match mutator.mutate_stats(ctx, item, proto, profile, roll) {
        Ok(quality) => quality,
        Err(err) => {
            warn!(prototype = proto.id, mutator = mutator.name(), %err, "stats step failed");
            return Err(err);
        }
    };
    let quality = match (roll, quality) {
        (None, Quality::None) => Quality::None,
        (None, _) => Quality::Legacy,
        (Some(_), quality) => quality,
    };

    let requirements = mutator.wield_requirements(ctx, item, proto, roll);
    item.wield_requirements.extend(requirements);

    if is_magical {
        item.is_magical = true;
        ctx.magic
            .assign_magic(item, profile, roll, mutator.is_armor(), is_magical);
    }

    if item.item_type.has_workmanship() {
        item.workmanship = mods::resolve_workmanship(ctx.rng, &quality, item.tier);
    }
    if steps.value {
        value::apply_value(ctx.rng, item, proto, roll);
    }
    item.long_desc = describe(item);

    debug!(
        prototype = proto.id,
        mutator = mutator.name(),
        workmanship = ?item.workmanship,
        value = item.value,
        "item mutated"
    );
    Ok(())
}

/// "Material Name, set with N Gem" when either decoration is present
pub fn describe(item: &ItemInstance) -> Option<String> {
    let material = item
        .material
        .filter(|_| item.item_type != TreasureItemType::Gem);
    let gems = item.gem_type.filter(|_| item.gem_count > 0);
    if material.is_none() && gems.is_none() {
        return None;
    }
    let mut desc = match material {
        Some(m) => format!("{} {}", m.display_name(), item.name),
        None => item.name.clone(),
    };
    if let Some(gem) = gems {
        let plural = if item.gem_count > 1 { "s" } else { "" };
        desc.push_str(&format!(
            ", set with {} {}{}",
            item.gem_count,
            gem.display_name(),
            plural
        ));
    }
    Some(desc)
}

// =====================================================
// Dispatch
// =====================================================

static MELEE: MeleeMutator = MeleeMutator;
static MISSILE: MissileMutator = MissileMutator;
static CASTER: CasterMutator = CasterMutator;
static ARMOR: ArmorMutator = ArmorMutator { clothing: false };
static CLOTHING: ArmorMutator = ArmorMutator { clothing: true };
static SOCIETY: SocietyArmorMutator = SocietyArmorMutator;
static JEWELRY: JewelryMutator = JewelryMutator;
static CLOAK: CloakMutator = CloakMutator;
static GEM: GemMutator = GemMutator;
static GENERIC: GenericMutator = GenericMutator;

/// Mutator for a roll. `None` marks a roll no branch handles.
pub fn select_mutator(roll: &TreasureRoll) -> Option<&'static dyn Mutator> {
    use TreasureItemType as T;
    let mutator: &'static dyn Mutator = match (roll.item_type, roll.sub_type) {
        (T::Weapon, RollSubType::Weapon(WeaponSubType::Melee(_))) => &MELEE,
        (T::Weapon, RollSubType::Weapon(WeaponSubType::Missile(_))) => &MISSILE,
        (T::Caster, RollSubType::Weapon(WeaponSubType::Caster(_))) => &CASTER,
        (T::Armor, RollSubType::Armor(_)) => &ARMOR,
        (T::SocietyArmor, RollSubType::Society(_)) => &SOCIETY,
        (T::Clothing, RollSubType::None) => &CLOTHING,
        (T::Jewelry, RollSubType::None) if roll.has_armor_level() => &ARMOR,
        (T::Jewelry, RollSubType::None) => &JEWELRY,
        (T::Cloak, RollSubType::None) => &CLOAK,
        (T::Gem, RollSubType::None) => &GEM,
        (t, RollSubType::None) if t.is_generic() => &GENERIC,
        _ => return None,
    };
    Some(mutator)
}

/// Mutator for a prototype mutated without a roll
pub fn mutator_for_prototype(proto: &Prototype) -> Option<&'static dyn Mutator> {
    use TreasureItemType as T;
    let mutator: &'static dyn Mutator = match proto.item_type {
        T::Weapon => match proto.weapon.as_ref().map(|w| w.sub_type) {
            Some(WeaponSubType::Melee(_)) => &MELEE,
            Some(WeaponSubType::Missile(_)) => &MISSILE,
            _ => return None,
        },
        T::Caster => &CASTER,
        T::Armor => &ARMOR,
        T::SocietyArmor => &SOCIETY,
        T::Clothing => &CLOTHING,
        T::Jewelry if proto.armor_level > 0 => &ARMOR,
        T::Jewelry => &JEWELRY,
        T::Cloak => &CLOAK,
        T::Gem => &GEM,
        t if t.is_generic() => &GENERIC,
        _ => return None,
    };
    Some(mutator)
}

/// Run the matching mutator. With no matching branch the error is logged
/// and the item left untouched; callers decide whether to keep it.
pub fn mutate_item(
    ctx: &mut MutationContext<'_>,
    item: &mut ItemInstance,
    proto: &Prototype,
    profile: &TreasureProfile,
    roll: Option<&TreasureRoll>,
    is_magical: bool,
) -> LootResult<()> {
    let mutator = match roll {
        Some(roll) => select_mutator(roll),
        None => mutator_for_prototype(proto),
    };
    match mutator {
        Some(mutator) => mutator.mutate(ctx, item, proto, profile, roll, is_magical),
        None => {
            let err = LootError::UnmatchedItemType {
                tier: item.tier,
                item_type: format!("{:?}", roll.map_or(proto.item_type, |r| r.item_type)),
                prototype_id: proto.id,
            };
            error!(%err, "item left unmutated");
            Err(err)
        }
    }
}

// =====================================================
// Shared wield helpers
// =====================================================

/// Skill requirement (when the tier has one) plus the flat level requirement
pub(crate) fn skill_and_level(tables: &LootTables, skill: Skill, difficulty: u32, tier: u8) -> Vec<WieldRequirement> {
    let mut reqs = Vec::new();
    if difficulty > 0 {
        reqs.push(WieldRequirement::Skill { skill, difficulty });
    }
    reqs.extend(level_requirement(tables, tier));
    reqs
}

pub(crate) fn level_requirement(tables: &LootTables, tier: u8) -> Option<WieldRequirement> {
    match tables.wield_level(tier) {
        0 => None,
        level => Some(WieldRequirement::Level(level)),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::Fixture;
    use super::*;
    use crate::roll::{ArmorSubType, Heritage, MeleeFamily, Society};

    fn roll_for(item_type: TreasureItemType, sub_type: RollSubType) -> TreasureRoll {
        TreasureRoll {
            sub_type,
            ..TreasureRoll::new(item_type, Heritage::Aluvian)
        }
    }

    #[test]
    fn test_dispatch_is_exhaustive_for_valid_rolls() {
        let cases = [
            (TreasureItemType::Weapon, RollSubType::Weapon(WeaponSubType::Melee(MeleeFamily::Axe)), "melee"),
            (TreasureItemType::Armor, RollSubType::Armor(ArmorSubType::Leather), "armor"),
            (TreasureItemType::SocietyArmor, RollSubType::Society(Society::RadiantBlood), "society"),
            (TreasureItemType::Clothing, RollSubType::None, "clothing"),
            (TreasureItemType::Jewelry, RollSubType::None, "jewelry"),
            (TreasureItemType::Pyreal, RollSubType::None, "generic"),
        ];
        for (item_type, sub_type, expected) in cases {
            let mutator = select_mutator(&roll_for(item_type, sub_type)).unwrap();
            assert_eq!(mutator.name(), expected);
        }
    }

    #[test]
    fn test_jewelry_with_armor_level_routes_to_armor() {
        let mut roll = roll_for(TreasureItemType::Jewelry, RollSubType::None);
        roll.base_armor_level = 40;
        assert_eq!(select_mutator(&roll).unwrap().name(), "armor");
    }

    #[test]
    fn test_mismatched_roll_has_no_branch() {
        let roll = roll_for(TreasureItemType::Weapon, RollSubType::Armor(ArmorSubType::Leather));
        assert!(select_mutator(&roll).is_none());
        let roll = roll_for(TreasureItemType::Armor, RollSubType::None);
        assert!(select_mutator(&roll).is_none());
    }

    #[test]
    fn test_unmatched_item_is_left_unmutated() {
        let mut fx = Fixture::new(3);
        let proto = fx.proto(4001);
        let mut item = ItemInstance::from_prototype(&proto, 4);
        let before = item.clone();
        let roll = roll_for(TreasureItemType::Armor, RollSubType::None);
        let profile = TreasureProfile::new(1, 4);
        let mut ctx = fx.ctx();
        let err = mutate_item(&mut ctx, &mut item, &proto, &profile, Some(&roll), false).unwrap_err();
        assert!(matches!(err, LootError::UnmatchedItemType { tier: 4, .. }));
        assert_eq!(item, before);
    }

    #[test]
    fn test_missing_template_aborts_pipeline() {
        let mut fx = Fixture::new(4);
        let mut proto = fx.proto(1001);
        proto.weapon = None;
        let mut item = ItemInstance::from_prototype(&proto, 5);
        let roll = roll_for(
            TreasureItemType::Weapon,
            RollSubType::Weapon(WeaponSubType::Melee(MeleeFamily::Sword)),
        );
        let profile = TreasureProfile::new(1, 5);
        let mut ctx = fx.ctx();
        let err = mutate_item(&mut ctx, &mut item, &proto, &profile, Some(&roll), false).unwrap_err();
        assert!(matches!(err, LootError::MissingTemplateData { prototype_id: 1001, .. }));
        assert!(item.workmanship.is_none());
    }

    #[test]
    fn test_describe() {
        let fx = Fixture::new(1);
        let proto = fx.proto(6001);
        let mut item = ItemInstance::from_prototype(&proto, 2);
        assert!(describe(&item).is_none());
        item.material = Some(crate::item::Material::Gold);
        item.gem_count = 2;
        item.gem_type = Some(crate::item::Material::Sapphire);
        assert_eq!(describe(&item).unwrap(), "Gold Ring, set with 2 Sapphires");
    }
}
