//! Centralized tier tables for the treasure engine.
//!
//! Every array here is indexed by `tier - 1`. Tables that are specific to a
//! single mutation branch (missile multipliers, cloak levels) stay next to
//! the code that uses them.

// =====================================================
// Tiers
// =====================================================

pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 8;
pub const TIER_COUNT: usize = MAX_TIER as usize;

/// Index into a per-tier table, clamping out-of-range tiers
pub fn tier_index(tier: u8) -> usize {
    (tier.clamp(MIN_TIER, MAX_TIER) - 1) as usize
}

/// Fraction of the top tier, used by the tier workmanship formula
pub fn tier_fraction(tier: u8) -> f64 {
    tier.clamp(MIN_TIER, MAX_TIER) as f64 / MAX_TIER as f64
}

// =====================================================
// Weapons
// =====================================================

/// Expected damage per second a weapon of each tier is balanced around
pub const TARGET_DPS: [f64; TIER_COUNT] = [12.0, 18.0, 25.0, 33.0, 42.0, 52.0, 62.0, 72.0];

/// Fixed share of expected damage attributed to critical hits
pub const CRIT_CONTRIBUTION: f64 = 0.2;

/// Melee damage floor as a fraction of the back-solved ceiling
pub const MELEE_DAMAGE_FLOOR: f64 = 0.75;

/// Extra seconds per throw for thrown weapons
pub const THROWN_RELOAD_SECS: f64 = 0.5;

/// Offense/defense mod ceiling per tier before the subset multiplier
pub const WEAPON_MOD_MAX: [f64; TIER_COUNT] = [0.05, 0.07, 0.09, 0.11, 0.13, 0.15, 0.17, 0.20];

/// Per-slot ceiling multiplier by subset size (1, 2, 3 slots)
pub const MOD_COUNT_MULT: [f64; 3] = [1.75, 1.25, 1.0];

/// Upper bound on mod slots per item
pub const MAX_MOD_SLOTS: usize = 3;

/// Flat per-tier mod range used when no roll is present
pub const LEGACY_WEAPON_MOD: [(f64, f64); TIER_COUNT] = [
    (0.0, 0.03),
    (0.0, 0.05),
    (0.01, 0.07),
    (0.02, 0.09),
    (0.03, 0.11),
    (0.04, 0.13),
    (0.05, 0.15),
    (0.06, 0.18),
];

// =====================================================
// Wield Requirements
// =====================================================

pub const WIELD_MELEE: [u32; TIER_COUNT] = [0, 250, 300, 325, 350, 370, 400, 420];
pub const WIELD_MISSILE: [u32; TIER_COUNT] = [0, 250, 270, 290, 315, 335, 360, 375];
pub const WIELD_CASTER: [u32; TIER_COUNT] = [0, 0, 225, 250, 275, 290, 310, 330];
pub const WIELD_ARMOR: [u32; TIER_COUNT] = [0, 0, 200, 250, 280, 300, 330, 350];
pub const WIELD_LEVEL: [u32; TIER_COUNT] = [0, 0, 0, 0, 0, 0, 150, 180];

// =====================================================
// Armor
// =====================================================

/// Random delta added to the innate armor level on the compat path
pub const COMPAT_ARMOR_DELTA: [(i32, i32); TIER_COUNT] = [
    (0, 20),
    (20, 40),
    (40, 70),
    (70, 100),
    (100, 130),
    (130, 160),
    (160, 190),
    (190, 220),
];

/// Style armor level jitter
pub const ARMOR_LEVEL_JITTER: (f64, f64) = (0.9, 1.1);

/// Resist perturbation draw range, before squaring
pub const RESIST_ROLL_RANGE: (f64, f64) = (-1.25, 1.0);
pub const RESIST_SCALE: f64 = 0.5;
pub const RESIST_FLOOR: f64 = -0.75;

/// Gear rating ceiling per tier (integer points)
pub const GEAR_RATING_MAX: [u32; TIER_COUNT] = [0, 0, 0, 1, 1, 2, 2, 3];

/// Armor skill mod ceiling per tier
pub const ARMOR_SKILL_MOD_MAX: [f64; TIER_COUNT] = [0.01, 0.015, 0.02, 0.025, 0.03, 0.035, 0.04, 0.05];

/// Headwear carries double skill mods and gear ratings
pub const HEADWEAR_MULT: f64 = 2.0;

// =====================================================
// Value & Workmanship
// =====================================================

pub const TIER_VALUE_MOD: [f64; TIER_COUNT] = [1.0, 1.5, 2.2, 3.0, 4.0, 5.5, 7.5, 10.0];

/// Jitter applied to the computed value
pub const VALUE_JITTER: (f64, f64) = (0.7, 1.3);

/// Workmanship contribution per point: `(1 + 0.1 * w)^2`
pub const WORKMANSHIP_VALUE_STEP: f64 = 0.1;

/// Flat value range when an item is mutated without a roll
pub const LEGACY_VALUE_RANGE: [(u32, u32); TIER_COUNT] = [
    (50, 500),
    (150, 1000),
    (300, 2000),
    (600, 4000),
    (1000, 6000),
    (2000, 8000),
    (3000, 10000),
    (4000, 12000),
];

/// Flat workmanship range when an item is mutated without a roll
pub const LEGACY_WORKMANSHIP: [(u32, u32); TIER_COUNT] = [
    (1, 3),
    (1, 4),
    (2, 5),
    (2, 6),
    (3, 7),
    (3, 8),
    (4, 9),
    (5, 10),
];

pub const MIN_WORKMANSHIP: u8 = 1;
pub const MAX_WORKMANSHIP: u8 = 10;

// =====================================================
// Gems
// =====================================================

pub const GEM_CLASS_COUNT: usize = 6;

/// Gem class weights per tier, classes 1..=6
pub const GEM_CLASS_WEIGHTS: [[f64; GEM_CLASS_COUNT]; TIER_COUNT] = [
    [80.0, 20.0, 0.0, 0.0, 0.0, 0.0],
    [60.0, 30.0, 10.0, 0.0, 0.0, 0.0],
    [45.0, 30.0, 20.0, 5.0, 0.0, 0.0],
    [30.0, 30.0, 25.0, 10.0, 5.0, 0.0],
    [20.0, 25.0, 25.0, 15.0, 10.0, 5.0],
    [15.0, 20.0, 25.0, 20.0, 12.0, 8.0],
    [10.0, 15.0, 25.0, 22.0, 16.0, 12.0],
    [10.0, 10.0, 20.0, 25.0, 20.0, 15.0],
];

/// Base value of a single gem by class
pub const GEM_CLASS_VALUE: [u32; GEM_CLASS_COUNT] = [10, 50, 100, 250, 500, 1000];

/// Socket count range when the template's gem code is unknown
pub const DEFAULT_GEM_COUNT: (u32, u32) = (1, 5);
pub const DEFAULT_JEWELRY_GEM_COUNT: (u32, u32) = (1, 6);

// =====================================================
// Generic Items
// =====================================================

pub const PYREAL_STACK: [(u32, u32); TIER_COUNT] = [
    (25, 100),
    (50, 250),
    (100, 500),
    (250, 1000),
    (500, 2000),
    (1000, 3500),
    (2000, 5000),
    (3000, 7500),
];

pub const CONSUMABLE_STACK: [(u32, u32); TIER_COUNT] =
    [(1, 2), (1, 3), (1, 3), (1, 4), (2, 4), (2, 5), (2, 5), (3, 6)];

pub const SPELL_COMPONENT_STACK: [(u32, u32); TIER_COUNT] =
    [(1, 5), (2, 6), (3, 8), (4, 10), (5, 12), (6, 15), (8, 18), (10, 20)];

pub const MANA_STONE_CAPACITY: [(u32, u32); TIER_COUNT] = [
    (100, 500),
    (500, 1500),
    (1500, 3000),
    (3000, 5000),
    (5000, 7500),
    (7500, 10000),
    (10000, 15000),
    (15000, 20000),
];

pub const TOOL_USES: [(u32, u32); TIER_COUNT] =
    [(10, 15), (15, 20), (20, 30), (25, 40), (30, 50), (40, 60), (50, 75), (60, 100)];

pub const TOOL_BONUS: [(u32, u32); TIER_COUNT] =
    [(5, 10), (10, 20), (15, 30), (20, 40), (30, 50), (40, 60), (50, 75), (60, 90)];

pub const PET_DEVICE_LEVEL: [u32; TIER_COUNT] = [50, 80, 100, 125, 150, 180, 200, 200];

// =====================================================
// Cloaks
// =====================================================

/// Max item level range per tier
pub const CLOAK_MAX_LEVEL: [(u32, u32); TIER_COUNT] =
    [(1, 1), (1, 1), (1, 2), (1, 3), (2, 3), (2, 4), (3, 5), (4, 5)];

pub const CLOAK_LEVEL_CAP: u32 = 5;

/// Chance (percent) a cloak proc is damage reduction instead of a surge
pub const CLOAK_DAMAGE_REDUCTION_PERCENT: u8 = 25;
