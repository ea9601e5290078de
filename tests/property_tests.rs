//! Property-based tests using proptest
//!
//! Invariants that must hold for ALL inputs:
//! - Any valid profile + seed -> items of the profile tier, workmanship in 1..=10
//! - Same seed -> identical loot set
//! - Guaranteed counts stay within [min, max]
//! - Diminishing roll stays in [q^2, 1]
//! - Weapon back-solve is non-decreasing in tier
//! - Chance table selection always lands on a positive-weight entry

use proptest::prelude::*;

use treasure_core::loot::counts::floor_count;
use treasure_core::mutate::melee::back_solve_max_damage;
use treasure_core::table::ChanceTable;
use treasure_core::{
    CategoryChance, LootConfig, LootGenerator, LootRng, PrototypeSource, TreasureProfile,
};

fn category() -> impl Strategy<Value = CategoryChance> {
    (0u8..=100, 0u32..=3, 0u32..=3, 1u32..=4).prop_map(|(chance, a, b, code)| {
        CategoryChance::new(chance, a.min(b), a.max(b), code)
    })
}

fn profile() -> impl Strategy<Value = TreasureProfile> {
    (1u8..=8, 0.0f64..=1.0, category(), category(), category()).prop_map(
        |(tier, q, item, magic, mundane)| {
            TreasureProfile::new(1, tier)
                .with_quality(q)
                .with_item(item)
                .with_magic_item(magic)
                .with_mundane_item(mundane)
        },
    )
}

// ============================================================
// Loot Set Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_any_profile_yields_valid_items(profile in profile(), seed in any::<u64>()) {
        let generator = LootGenerator::builtin();
        let mut rng = LootRng::new(seed);
        let items = generator.generate_with_rng(&profile, &mut rng).unwrap();
        let cap = profile.item.max + profile.magic_item.max + profile.mundane_item.max;
        prop_assert!(items.len() as u32 <= cap);
        for item in &items {
            prop_assert_eq!(item.tier, profile.tier);
            if let Some(w) = item.workmanship {
                prop_assert!((1..=10).contains(&w));
            }
            if profile.magic_item.chance == 0 {
                prop_assert!(!item.is_magical);
            }
        }
    }

    #[test]
    fn prop_generation_is_deterministic(profile in profile(), seed in any::<u64>()) {
        let a = LootGenerator::builtin().with_config(LootConfig::default().with_seed(seed));
        let b = LootGenerator::builtin().with_config(LootConfig::default().with_seed(seed));
        prop_assert_eq!(
            a.generate_random_loot_set(&profile).unwrap(),
            b.generate_random_loot_set(&profile).unwrap()
        );
    }

    #[test]
    fn prop_full_chance_count_in_range(min in 0u32..10, extra in 0u32..10, seed in any::<u64>()) {
        let mut rng = LootRng::new(seed);
        let chance = CategoryChance::new(100, min, min + extra, 1);
        let n = floor_count(&chance, 0.0, &mut rng);
        prop_assert!(n >= min && n <= min + extra);
    }

    #[test]
    fn prop_partial_chance_is_zero_or_at_least_min(
        percent in 1u8..100,
        min in 0u32..5,
        extra in 0u32..5,
        q in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let mut rng = LootRng::new(seed);
        let chance = CategoryChance::new(percent, min, min + extra, 1);
        let n = floor_count(&chance, q, &mut rng);
        prop_assert!(n == 0 || (n >= min && n <= min + extra));
    }
}

// ============================================================
// Primitive Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_diminishing_roll_bounds(q in 0.0f64..=1.0, seed in any::<u64>()) {
        let mut rng = LootRng::new(seed);
        let r = rng.diminishing_roll(q);
        prop_assert!(r >= q * q - 1e-12 && r <= 1.0);
    }

    #[test]
    fn prop_select_lands_on_positive_weight(
        weights in prop::collection::vec(0.0f64..10.0, 1..8),
        fraction in 0.0f64..1.0,
    ) {
        let entries: Vec<(usize, f64)> = weights.iter().copied().enumerate().collect();
        let table = ChanceTable::new("prop", entries);
        let total = table.total_weight();
        match table.select(fraction * total) {
            Some(&index) => prop_assert!(weights[index] > 0.0),
            None => prop_assert!(total <= 0.0),
        }
    }
}

#[test]
fn back_solve_non_decreasing_for_every_weapon() {
    let generator = LootGenerator::builtin();
    let ids = generator.tables().referenced_ids();
    let mut checked = 0;
    for id in ids {
        let Some(proto) = generator.prototypes().get_prototype(id) else {
            continue;
        };
        let Some(template) = proto.weapon.as_ref() else {
            continue;
        };
        let damages: Vec<f64> = (1..=8).map(|t| back_solve_max_damage(template, t)).collect();
        assert!(
            damages.windows(2).all(|w| w[0] <= w[1]),
            "{}: {damages:?}",
            proto.name
        );
        checked += 1;
    }
    assert!(checked > 0);
}
