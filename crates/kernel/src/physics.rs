use crate::population::CubePopulation;

/// Advance every slot by one fixed timestep and bounce off the box
/// `[-half_extent, half_extent]` on each axis.
///
/// Explicit Euler, then per-axis reflection: a component whose new position
/// lies outside the box has its velocity negated. Positions are not clamped,
/// so a cube may sit just outside for one tick while already heading back.
/// Unpopulated slots are zero and stay at rest.
pub fn step(population: &mut CubePopulation, dt: f32, half_extent: f32) {
    let _span = tracing::trace_span!("physics_step", slots = population.capacity()).entered();

    for cube in population.slots_mut() {
        cube.position += cube.velocity * dt;

        for axis in 0..3 {
            let p = cube.position[axis];
            if p < -half_extent || p > half_extent {
                cube.velocity[axis] = -cube.velocity[axis];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::Cube;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    fn single(position: Vec3, velocity: Vec3) -> CubePopulation {
        let mut p = CubePopulation::with_capacity(1);
        p.try_add(Cube::new(0.3, position, velocity));
        p
    }

    #[test]
    fn euler_integration_inside_box() {
        let v = Vec3::new(1.5, -0.75, 2.0);
        let start = Vec3::new(0.5, 1.0, -2.0);
        let mut p = single(start, v);
        step(&mut p, DT, 3.0);

        let c = p.slots()[0];
        assert!((c.position - (start + v * DT)).abs().max_element() < 1e-6);
        assert_eq!(c.velocity, v);
    }

    #[test]
    fn crossing_the_wall_overshoots_and_reverses() {
        let mut p = single(Vec3::new(2.99, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        step(&mut p, DT, 3.0);

        let c = p.slots()[0];
        assert!((c.position.x - 3.006_667).abs() < 1e-4);
        assert!(c.position.x > 3.0, "position must not be clamped");
        assert_eq!(c.velocity.x, -1.0);

        step(&mut p, DT, 3.0);
        let c = p.slots()[0];
        assert!(c.position.x < 3.0);
        assert_eq!(c.velocity.x, -1.0);
    }

    #[test]
    fn reflection_is_per_axis() {
        let v = Vec3::new(-2.0, 0.5, 1.0);
        let mut p = single(Vec3::new(-2.99, 0.0, 2.995), v);
        step(&mut p, DT, 3.0);

        let c = p.slots()[0];
        assert_eq!(c.velocity.x, 2.0);
        assert_eq!(c.velocity.y, 0.5);
        assert_eq!(c.velocity.z, -1.0);
    }

    #[test]
    fn exactly_on_the_wall_does_not_reflect() {
        let mut p = single(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO);
        step(&mut p, DT, 3.0);
        assert_eq!(p.slots()[0].velocity, Vec3::ZERO);
    }

    #[test]
    fn empty_slots_stay_at_rest() {
        let mut p = CubePopulation::with_capacity(4);
        p.add(0.2, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0);
        for _ in 0..120 {
            step(&mut p, DT, 3.0);
        }
        for c in &p.slots()[1..] {
            assert_eq!(*c, Cube::default());
        }
        assert_ne!(p.slots()[0].position, Vec3::ZERO);
    }

    #[test]
    fn long_run_stays_near_the_box() {
        let mut p = CubePopulation::with_capacity(3);
        p.add(0.1, 0.0, 0.0, 0.0, 2.0, -2.0, 1.3);
        p.add(0.1, 2.9, -2.9, 1.0, -1.7, 0.4, 2.0);
        p.add(0.1, -1.0, 1.0, -1.0, 0.9, 1.9, -2.0);
        let overshoot = 2.0 * DT + 1e-4;
        for _ in 0..10_000 {
            step(&mut p, DT, 3.0);
            for c in p.slots() {
                assert!(c.position.abs().max_element() <= 3.0 + overshoot);
            }
        }
    }
}
