// ============================================
// Falloff Map - Маска затухания к краям квадрата
// ============================================

use crate::terrain::grid::Grid2;

const FALLOFF_A: f32 = 3.0;
const FALLOFF_B: f32 = 2.24;

/// f(t) = t^a / (t^a + (b - b*t)^a)
#[inline]
pub fn evaluate_falloff(t: f32) -> f32 {
    let ta = t.powf(FALLOFF_A);
    let denom = ta + (FALLOFF_B - FALLOFF_B * t).powf(FALLOFF_A);
    if denom <= f32::EPSILON { 0.0 } else { ta / denom }
}

/// Значение маски в ячейке (i, j) сетки width x height
#[inline]
pub fn falloff_at(i: u32, j: u32, width: u32, height: u32) -> f32 {
    let x = i as f32 / width as f32 * 2.0 - 1.0;
    let y = j as f32 / height as f32 * 2.0 - 1.0;
    evaluate_falloff(x.abs().max(y.abs()))
}

/// Маска затухания size x size
pub fn generate_falloff_map(size: u32) -> Grid2<f32> {
    Grid2::from_fn(size, size, |i, j| falloff_at(i, j, size, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_is_clear_edges_are_masked() {
        let map = generate_falloff_map(64);
        assert!(*map.get(32, 32) < 0.01);
        assert!(*map.get(0, 0) > 0.99);
        assert!(*map.get(0, 32) > 0.99);
    }

    #[test]
    fn test_values_in_unit_range() {
        let map = generate_falloff_map(33);
        assert!(map.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
