//! End-to-end breakup scenarios with fixed seeds and sequential execution.
//!
//! The fragment counts are fixed by the published count laws (Eq. 2 and 4)
//! and therefore exact; the sampled per-fragment values are checked through
//! their invariants.

use nalgebra::Vector3;

use breakup::model::builder::SatelliteBuilder;
use breakup::model::satellite::{SatKind, Satellite};
use breakup::simulation::pipeline::Breakup;

fn satellite(
    id: u64,
    name: &str,
    kind: SatKind,
    mass: f64,
    velocity: Vector3<f64>,
) -> Satellite {
    let mut builder = SatelliteBuilder::new();
    builder
        .id(id)
        .name(name)
        .kind(kind)
        .mass(mass)
        .velocity(velocity)
        .position(Vector3::new(6.9e6, 0.0, 0.0))
        .build()
        .expect("complete satellite")
}

/// The Iridium-33 / Kosmos-2251 parents at the given collision speed.
fn iridium_kosmos(collision_speed: f64) -> [Satellite; 2] {
    [
        satellite(
            24946,
            "Iridium 33",
            SatKind::Spacecraft,
            560.0,
            Vector3::new(collision_speed, 0.0, 0.0),
        ),
        satellite(
            22675,
            "Kosmos 2251",
            SatKind::Spacecraft,
            950.0,
            Vector3::zeros(),
        ),
    ]
}

/// A Nimbus-6 style upper stage.
fn nimbus_upper_stage() -> Satellite {
    satellite(
        8011,
        "Nimbus 6 R/B",
        SatKind::RocketBody,
        839.0,
        Vector3::new(7500.0, 0.0, 0.0),
    )
}

#[test]
fn explosion_fragment_count_matches_count_law() {
    let mut explosion = Breakup::explosion(nimbus_upper_stage(), 0.05, 0, false);
    explosion.set_seed(Some(1234)).set_sequential(true);
    explosion.run();

    assert_eq!(explosion.result_soa().len(), 724);
}

#[test]
fn catastrophic_collision_fragment_count() {
    let mut collision = Breakup::collision(iridium_kosmos(11700.0), 0.05, 0, false);
    collision.set_seed(Some(1234)).set_sequential(true);
    collision.run();

    assert_eq!(collision.is_catastrophic(), Some(true));
    assert_eq!(collision.result_soa().len(), 4064);
}

#[test]
fn non_catastrophic_collision_fragment_count() {
    let mut collision = Breakup::collision(iridium_kosmos(100.0), 0.05, 0, false);
    collision.set_seed(Some(8)).set_sequential(true);
    collision.run();

    assert_eq!(collision.is_catastrophic(), Some(false));
    assert_eq!(collision.result_soa().len(), 61);
}

#[test]
fn non_catastrophic_collision_remnant() {
    let mut collision = Breakup::collision(iridium_kosmos(100.0), 0.05, 0, true);
    collision.set_seed(Some(8)).set_sequential(true);
    collision.run();

    let fragments = collision.result_soa();
    assert_eq!(fragments.len(), 62);

    // Row 0 is the remnant of the larger parent: it carries exactly the
    // unassigned mass budget.
    let input_mass = 560.0 + 950.0;
    let other_mass: f64 = fragments.mass.iter().skip(1).sum();
    let remnant = fragments.mass[0];
    assert!(
        (input_mass - other_mass - remnant).abs() < 1e-6,
        "remnant {remnant} does not close the mass budget"
    );
    assert!(
        remnant > 1490.0 && remnant < 1510.0,
        "remnant mass {remnant} out of the expected range"
    );
}

#[test]
fn fragment_characteristic_lengths_are_bounded() {
    let mut explosion = Breakup::explosion(nimbus_upper_stage(), 0.05, 0, false);
    explosion.set_seed(Some(71)).set_sequential(true);
    explosion.run();

    let max = explosion.maximal_characteristic_length();
    assert!(max > 0.05);
    for &lc in &explosion.result_soa().characteristic_length {
        assert!(lc >= 0.05, "L_c {lc} below the minimum");
        assert!(lc <= max, "L_c {lc} above the parent maximum {max}");
    }
}

#[test]
fn mass_budget_is_never_exceeded() {
    for seed in [1, 2, 3, 4, 5] {
        let mut collision = Breakup::collision(iridium_kosmos(11700.0), 0.05, 0, false);
        collision.set_seed(Some(seed)).set_sequential(true);
        collision.run();
        let output_mass: f64 = collision.result_soa().mass.iter().sum();
        assert!(output_mass <= 560.0 + 950.0, "seed {seed}: output {output_mass}");
    }
}

#[test]
fn enforced_mass_conservation_closes_the_budget() {
    let mut explosion = Breakup::explosion(nimbus_upper_stage(), 0.05, 0, true);
    explosion.set_seed(Some(1234)).set_sequential(true);
    explosion.run();

    let fragments = explosion.result_soa();
    let output_mass: f64 = fragments.mass.iter().sum();
    let max_row_mass = fragments.mass.iter().copied().fold(0.0, f64::max);
    assert!(output_mass <= 839.0);
    assert!(
        839.0 - output_mass <= max_row_mass,
        "deficit {} exceeds the largest row mass {max_row_mass}",
        839.0 - output_mass
    );
    // The budget enforcement grew the population well beyond the count law.
    assert!(fragments.len() > 724);
}

#[test]
fn fragment_ids_are_sequential_and_disjoint_from_parents() {
    let mut collision = Breakup::collision(iridium_kosmos(11700.0), 0.05, 24946, false);
    collision.set_seed(Some(9)).set_sequential(true);
    collision.run();

    let fragments = collision.result();
    let count = fragments.len() as u64;
    for (row, fragment) in fragments.iter().enumerate() {
        assert_eq!(fragment.id(), 24946 + row as u64 + 1);
    }
    assert_eq!(collision.current_max_id(), 24946 + count);
    // No fragment reuses a parent id.
    for fragment in &fragments {
        assert_ne!(fragment.id(), 24946);
        assert_ne!(fragment.id(), 22675);
    }
}

#[test]
fn large_fragments_belong_to_the_larger_parent() {
    let mut collision = Breakup::collision(iridium_kosmos(11700.0), 0.05, 0, false);
    collision.set_seed(Some(31)).set_sequential(true);
    collision.run();

    // After ordering, the smaller parent is Iridium 33 (560 kg).
    let small_lc = collision
        .input()
        .iter()
        .map(Satellite::characteristic_length)
        .fold(f64::INFINITY, f64::min);
    let big_velocity = Vector3::new(0.0, 0.0, 0.0);

    let fragments = collision.result_soa();
    for row in 0..fragments.len() {
        if fragments.characteristic_length[row] > small_lc {
            // The base velocity (total minus ejection) is the big parent's.
            let base = fragments.velocity[row] - fragments.ejection_velocity[row];
            assert!(
                (base - big_velocity).norm() < 1e-9,
                "row {row} with L_c {} not assigned to the larger parent",
                fragments.characteristic_length[row]
            );
        }
    }
}

#[test]
fn every_fragment_velocity_splits_into_parent_base_plus_ejection() {
    let mut collision = Breakup::collision(iridium_kosmos(11700.0), 0.05, 0, false);
    collision.set_seed(Some(12)).set_sequential(true);
    collision.run();

    let parent_velocities: Vec<Vector3<f64>> = collision
        .input()
        .iter()
        .map(Satellite::velocity)
        .collect();
    let fragments = collision.result_soa();
    for row in 0..fragments.len() {
        let base = fragments.velocity[row] - fragments.ejection_velocity[row];
        let matches_parent = parent_velocities
            .iter()
            .any(|parent| (base - parent).norm() < 1e-9);
        assert!(matches_parent, "row {row} has no parent base velocity");
    }
}

/// The cumulative size law: the count of fragments larger than L follows
/// `0.1 M^0.75 L^-1.71` within 10% of the total count.
#[test]
fn cumulative_size_distribution_follows_the_count_law() {
    let mut collision = Breakup::collision(iridium_kosmos(11700.0), 0.05, 0, false);
    collision.set_seed(Some(10)).set_sequential(true);
    collision.run();

    let fragments = collision.result_soa();
    let total = fragments.len() as f64;
    let deviation = total * 0.1;
    let reference_mass: f64 = 560.0 + 950.0;
    let max_lc = collision.maximal_characteristic_length();

    let mut lc = 0.05;
    while lc < max_lc / 2.0 {
        let count = fragments
            .characteristic_length
            .iter()
            .filter(|&&value| value > lc)
            .count() as f64;
        let expected = 0.1 * reference_mass.powf(0.75) * lc.powf(-1.71);
        assert!(
            count >= (expected - deviation).max(0.0) && count <= expected + deviation,
            "count {count} at L_c {lc} outside {expected} +- {deviation}"
        );
        lc += 0.1;
    }
}

/// Fixed seed plus sequential execution yields identical output.
#[test]
fn sequential_fixed_seed_runs_are_deterministic() {
    let run = || {
        let mut collision = Breakup::collision(iridium_kosmos(100.0), 0.05, 0, true);
        collision.set_seed(Some(1234)).set_sequential(true);
        collision.run();
        collision.result_soa().clone()
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);
}

/// With per-worker entropy generators, exact duplicates in the sampled
/// characteristic lengths stay rare; an elevated duplicate count would hint
/// at a race on a shared generator.
#[test]
fn parallel_sampling_produces_no_duplicate_clusters() {
    for _ in 0..50 {
        let mut collision = Breakup::collision(iridium_kosmos(100.0), 0.05, 0, false);
        collision.run();
        let lengths = &collision.result_soa().characteristic_length;
        let mut duplicates = 0usize;
        for (i, a) in lengths.iter().enumerate() {
            for (j, b) in lengths.iter().enumerate() {
                if i != j && (a - b).abs() < 1e-16 {
                    duplicates += 1;
                }
            }
        }
        assert!(duplicates < 10, "{duplicates} duplicate pairs in one run");
    }
}
