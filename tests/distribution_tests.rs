//! Statistical distribution tests
//!
//! Fixed seeds keep these deterministic; the tolerances are several
//! standard deviations wide at the trial counts used.

use treasure_core::loot::counts::{floor_count, legacy_count, legacy_mundane_count};
use treasure_core::table::ChanceTable;
use treasure_core::{CategoryChance, LootGenerator, LootRng, TreasureItemType, TreasureProfile};

const TRIALS: usize = 10_000;

// ============================================================
// Count resolution
// ============================================================

#[test]
fn full_chance_count_is_uniform() {
    let mut rng = LootRng::new(1001);
    let chance = CategoryChance::new(100, 1, 5, 1);
    let mut buckets = [0usize; 5];
    for _ in 0..TRIALS {
        let n = floor_count(&chance, 0.0, &mut rng);
        assert!((1..=5).contains(&n));
        buckets[(n - 1) as usize] += 1;
    }
    let expected = TRIALS as f64 / 5.0;
    let chi_square: f64 = buckets
        .iter()
        .map(|&observed| (observed as f64 - expected).powi(2) / expected)
        .sum();
    // df = 4, p = 0.001
    assert!(chi_square < 18.47, "chi-square {chi_square:.2}, buckets {buckets:?}");
}

#[test]
fn floor_trial_rate_matches_chance() {
    for (seed, percent) in [(1002u64, 10u8), (1003, 30), (1004, 75)] {
        let mut rng = LootRng::new(seed);
        let chance = CategoryChance::new(percent, 1, 1, 1);
        let hits = (0..TRIALS)
            .filter(|_| floor_count(&chance, 0.0, &mut rng) == 1)
            .count();
        let rate = hits as f64 / TRIALS as f64;
        let target = percent as f64 / 100.0;
        assert!((rate - target).abs() < 0.02, "chance {percent}: rate {rate:.4}");
    }
}

#[test]
fn extra_slots_follow_binomial_mean() {
    let mut rng = LootRng::new(1005);
    // floor passes half the time, then 4 extra slots at 50% each
    let chance = CategoryChance::new(50, 2, 6, 1);
    let total: u32 = (0..TRIALS).map(|_| floor_count(&chance, 0.0, &mut rng)).sum();
    let mean = total as f64 / TRIALS as f64;
    let expected = 0.5 * (2.0 + 4.0 * 0.5);
    assert!((mean - expected).abs() < 0.1, "mean {mean:.3}");
}

#[test]
fn legacy_counts_match_flat_rolls() {
    let mut rng = LootRng::new(1006);
    let chance = CategoryChance::new(50, 4, 4, 1);
    let total: u32 = (0..TRIALS).map(|_| legacy_count(&chance, &mut rng)).sum();
    let mean = total as f64 / TRIALS as f64;
    assert!((mean - 2.0).abs() < 0.1, "legacy mean {mean:.3}");

    let gated = (0..TRIALS)
        .filter(|_| legacy_mundane_count(&chance, &mut rng) > 0)
        .count();
    let rate = gated as f64 / TRIALS as f64;
    assert!((rate - 0.5).abs() < 0.02, "mundane gate rate {rate:.4}");
}

// ============================================================
// Chance tables
// ============================================================

#[test]
fn equal_weights_split_evenly() {
    let mut rng = LootRng::new(1007);
    let table = ChanceTable::new("coin", vec![(true, 50.0), (false, 50.0)]);
    let rolls = 100_000;
    let heads = (0..rolls).filter(|_| table.roll(&mut rng).unwrap()).count();
    let share = heads as f64 / rolls as f64;
    assert!((share - 0.5).abs() < 0.01, "share {share:.4}");
}

#[test]
fn weights_are_proportional() {
    let mut rng = LootRng::new(1008);
    let table = ChanceTable::new("abc", vec![('a', 1.0), ('b', 3.0), ('c', 6.0)]);
    let rolls = 50_000;
    let mut counts = [0usize; 3];
    for _ in 0..rolls {
        match table.roll(&mut rng).unwrap() {
            'a' => counts[0] += 1,
            'b' => counts[1] += 1,
            _ => counts[2] += 1,
        }
    }
    for (i, target) in [0.1, 0.3, 0.6].into_iter().enumerate() {
        let share = counts[i] as f64 / rolls as f64;
        assert!((share - target).abs() < 0.015, "entry {i}: {share:.4}");
    }
}

// ============================================================
// Quality modifier
// ============================================================

#[test]
fn diminishing_roll_mean_rises_with_quality() {
    let mut rng = LootRng::new(1009);
    let mean = |rng: &mut LootRng, q: f64| {
        (0..TRIALS).map(|_| rng.diminishing_roll(q)).sum::<f64>() / TRIALS as f64
    };
    let plain = mean(&mut rng, 0.0);
    let biased = mean(&mut rng, 0.5);
    // E[x^2] for x ~ U[0,1] is 1/3
    assert!((plain - 1.0 / 3.0).abs() < 0.02, "plain mean {plain:.4}");
    assert!(biased > plain + 0.2);
}

#[test]
fn quality_raises_mean_workmanship() {
    let generator = LootGenerator::builtin();
    let forced = |q: f64| {
        TreasureProfile::new(1, 6)
            .with_item(CategoryChance::guaranteed(1, 1))
            .with_overrides(treasure_core::ProfileOverrides {
                item_type: Some(TreasureItemType::Weapon),
                ..Default::default()
            })
            .with_quality(q)
    };
    let mean_workmanship = |profile: &TreasureProfile, seed: u64| {
        let mut rng = LootRng::new(seed);
        let mut total = 0.0;
        for _ in 0..2_000 {
            let items = generator.generate_with_rng(profile, &mut rng).unwrap();
            total += items[0].workmanship.unwrap() as f64;
        }
        total / 2_000.0
    };
    let low = mean_workmanship(&forced(0.0), 1010);
    let high = mean_workmanship(&forced(0.8), 1011);
    assert!(high > low + 0.5, "low {low:.2}, high {high:.2}");
}

#[test]
fn item_type_shares_follow_table() {
    let generator = LootGenerator::builtin();
    let profile = TreasureProfile::new(1, 5).with_mundane_item(CategoryChance::guaranteed(1, 2));
    let mut rng = LootRng::new(1012);
    for _ in 0..500 {
        let items = generator.generate_with_rng(&profile, &mut rng).unwrap();
        assert_eq!(items.len(), 1);
        // mundane code 2 is pyreal only
        assert_eq!(items[0].item_type, TreasureItemType::Pyreal);
    }
}
