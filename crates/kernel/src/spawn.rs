use cubes_common::SimConfig;
use rand::Rng;

use crate::population::CubePopulation;

/// Offer `capacity` random cubes to the population.
///
/// Each cube draws, in order: radius, x, y, z, vx, vy, vz, all from closed
/// ranges. Offers past capacity are dropped by the saturating insert.
pub fn spawn_random<R: Rng>(population: &mut CubePopulation, rng: &mut R, config: &SimConfig) {
    let (r_min, r_max) = config.radius_range;
    let b = config.half_extent;
    let s = config.max_speed;

    for _ in 0..population.capacity() {
        let r = rng.gen_range(r_min..=r_max);
        let x = rng.gen_range(-b..=b);
        let y = rng.gen_range(-b..=b);
        let z = rng.gen_range(-b..=b);
        let vx = rng.gen_range(-s..=s);
        let vy = rng.gen_range(-s..=s);
        let vz = rng.gen_range(-s..=s);
        population.add(r, x, y, z, vx, vy, vz);
    }

    tracing::debug!(
        cubes = population.len(),
        capacity = population.capacity(),
        "spawned cube population"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn fills_to_capacity_within_ranges() {
        let cfg = SimConfig::default();
        let mut p = CubePopulation::with_capacity(cfg.capacity);
        let mut rng = SmallRng::seed_from_u64(cfg.seed);
        spawn_random(&mut p, &mut rng, &cfg);

        assert_eq!(p.len(), 350);
        for c in p.cubes() {
            assert!((0.1..=0.5).contains(&c.radius));
            assert!(c.position.abs().max_element() <= 3.0);
            assert!(c.velocity.abs().max_element() <= 2.0);
        }
    }

    #[test]
    fn same_seed_same_population() {
        let cfg = SimConfig::default();
        let mut a = CubePopulation::with_capacity(16);
        let mut b = CubePopulation::with_capacity(16);
        spawn_random(&mut a, &mut SmallRng::seed_from_u64(9), &cfg);
        spawn_random(&mut b, &mut SmallRng::seed_from_u64(9), &cfg);
        assert_eq!(a.slots(), b.slots());
    }

    #[test]
    fn respawn_into_full_population_changes_nothing() {
        let cfg = SimConfig::default();
        let mut p = CubePopulation::with_capacity(5);
        let mut rng = SmallRng::seed_from_u64(1);
        spawn_random(&mut p, &mut rng, &cfg);
        let before = p.slots().to_vec();
        spawn_random(&mut p, &mut rng, &cfg);
        assert_eq!(p.len(), 5);
        assert_eq!(p.slots(), before.as_slice());
    }
}
