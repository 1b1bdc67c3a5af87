use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One simulated cube. Identity is its slot index in the population.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cube {
    /// Nominal radius recorded at spawn. Nothing reads it; visual size comes
    /// from the slot's entry in the [`ScaleTable`].
    pub radius: f32,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Cube {
    pub fn new(radius: f32, position: Vec3, velocity: Vec3) -> Self {
        Self {
            radius,
            position,
            velocity,
        }
    }
}

/// Fixed-capacity cube storage.
///
/// All slots exist from construction and start zeroed. `len` counts how many
/// have been filled by [`CubePopulation::try_add`]; the rest stay inert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubePopulation {
    slots: Vec<Cube>,
    len: usize,
}

impl CubePopulation {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Cube::default(); capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Place a cube in the next free slot. Returns `false` once full.
    pub fn try_add(&mut self, cube: Cube) -> bool {
        if self.len >= self.slots.len() {
            return false;
        }
        self.slots[self.len] = cube;
        self.len += 1;
        true
    }

    /// Saturating insert: silently ignored when the population is full.
    #[allow(clippy::too_many_arguments)]
    pub fn add(&mut self, r: f32, x: f32, y: f32, z: f32, vx: f32, vy: f32, vz: f32) {
        let _ = self.try_add(Cube::new(r, Vec3::new(x, y, z), Vec3::new(vx, vy, vz)));
    }

    /// Every slot of the fixed capacity, in index order.
    pub fn slots(&self) -> &[Cube] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [Cube] {
        &mut self.slots
    }

    /// Populated slots only.
    pub fn cubes(&self) -> &[Cube] {
        &self.slots[..self.len]
    }

    pub fn get(&self, slot: usize) -> Option<&Cube> {
        self.slots.get(slot)
    }
}

/// Per-slot visual scale, a linear ramp over slot index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleTable {
    factors: Vec<f32>,
}

impl ScaleTable {
    /// `scale[i] = base + i * (span / capacity)`.
    pub fn new(capacity: usize, base: f32, span: f32) -> Self {
        let increment = span / capacity as f32;
        let factors = (0..capacity).map(|i| base + i as f32 * increment).collect();
        Self { factors }
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Scale for a slot. Panics on an index outside the table.
    pub fn factor(&self, slot: usize) -> f32 {
        self.factors[slot]
    }

    pub fn factors(&self) -> &[f32] {
        &self.factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_starts_empty_with_zeroed_slots() {
        let p = CubePopulation::with_capacity(8);
        assert_eq!(p.len(), 0);
        assert_eq!(p.capacity(), 8);
        assert!(p.is_empty());
        assert!(p.slots().iter().all(|c| *c == Cube::default()));
    }

    #[test]
    fn add_fills_slots_in_order() {
        let mut p = CubePopulation::with_capacity(3);
        p.add(0.2, 1.0, 2.0, 3.0, 0.5, 0.0, -0.5);
        p.add(0.3, -1.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        assert_eq!(p.len(), 2);
        assert_eq!(p.cubes()[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.cubes()[1].velocity, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p.slots()[2], Cube::default());
    }

    #[test]
    fn insert_beyond_capacity_is_ignored() {
        let mut p = CubePopulation::with_capacity(2);
        assert!(p.try_add(Cube::default()));
        assert!(p.try_add(Cube::default()));
        assert!(p.is_full());

        let before = p.slots().to_vec();
        assert!(!p.try_add(Cube::new(0.4, Vec3::ONE, Vec3::ONE)));
        p.add(0.4, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(p.len(), 2);
        assert_eq!(p.slots(), before.as_slice());
    }

    #[test]
    fn scale_table_endpoints() {
        let t = ScaleTable::new(350, 0.05, 0.35);
        assert_eq!(t.len(), 350);
        assert!((t.factor(0) - 0.05).abs() < 1e-6);
        let last = 0.05 + 0.35 * 349.0 / 350.0;
        assert!((t.factor(349) - last).abs() < 1e-5);
    }

    #[test]
    fn scale_table_is_monotonic() {
        let t = ScaleTable::new(350, 0.05, 0.35);
        assert!(t.factors().windows(2).all(|w| w[0] <= w[1]));
        assert!(t.factors().iter().all(|&s| s < 0.05 + 0.35));
    }

    #[test]
    fn scale_depends_on_slot_not_radius() {
        let t = ScaleTable::new(4, 0.05, 0.35);
        let mut p = CubePopulation::with_capacity(4);
        p.add(0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        p.add(0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        // Bigger radius in slot 0 still gets the smaller scale.
        assert!(t.factor(0) < t.factor(1));
    }
}
