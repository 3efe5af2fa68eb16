// ============================================
// Height Map - Карта высот из шума + кривая отклика
// ============================================

use ultraviolet::Vec2;

use crate::terrain::grid::Grid2;
use crate::terrain::settings::HeightMapSettings;
use super::falloff::falloff_at;
use super::noise_field::NoiseField;

/// Результат одной генерации: сетка высот с рамкой + реальные min/max
#[derive(Debug, Clone)]
pub struct HeightMap {
    pub values: Grid2<f32>,
    pub min_value: f32,
    pub max_value: f32,
}

impl HeightMap {
    pub fn new(values: Grid2<f32>, min_value: f32, max_value: f32) -> Self {
        Self { values, min_value, max_value }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.values.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.values.height()
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f32 {
        *self.values.get(x, y)
    }
}

/// Генератор карт высот: шумовое поле + настройки высоты
#[derive(Clone)]
pub struct HeightField {
    settings: HeightMapSettings,
    noise: NoiseField,
}

impl HeightField {
    pub fn new(settings: &HeightMapSettings) -> Self {
        let settings = settings.validated();
        Self {
            noise: NoiseField::new(&settings.noise),
            settings,
        }
    }

    pub fn settings(&self) -> &HeightMapSettings {
        &self.settings
    }

    /// value = value * curve(value) * height_multiplier; min/max по итоговым значениям
    pub fn generate(&self, width: u32, height: u32, sample_centre: Vec2) -> HeightMap {
        let mut values = self.noise.generate(width, height, sample_centre);

        if self.settings.use_falloff {
            for y in 0..height {
                for x in 0..width {
                    let v = values.get_mut(x, y);
                    *v = (*v - falloff_at(x, y, width, height)).clamp(0.0, 1.0);
                }
            }
        }

        let curve = &self.settings.height_curve;
        let multiplier = self.settings.height_multiplier;
        let mut min_value = f32::MAX;
        let mut max_value = f32::MIN;

        for v in values.values_mut() {
            *v *= curve.evaluate(*v) * multiplier;
            if *v > max_value {
                max_value = *v;
            }
            if *v < min_value {
                min_value = *v;
            }
        }

        if values.values().is_empty() {
            min_value = 0.0;
            max_value = 0.0;
        }

        HeightMap::new(values, min_value, max_value)
    }
}

/// Сгенерировать карту высот (разовый вызов)
pub fn generate_height_map(width: u32, height: u32, settings: &HeightMapSettings, sample_centre: Vec2) -> HeightMap {
    HeightField::new(settings).generate(width, height, sample_centre)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::generation::HeightCurve;
    use crate::terrain::settings::{NoiseSettings, NormalizeMode};

    fn settings() -> HeightMapSettings {
        HeightMapSettings {
            noise: NoiseSettings { seed: 7, scale: 25.0, ..Default::default() },
            use_falloff: false,
            height_multiplier: 30.0,
            height_curve: HeightCurve::from_points(&[(0.0, 0.0), (0.4, 0.1), (1.0, 1.0)]),
        }
    }

    #[test]
    fn test_min_max_bound_every_cell() {
        let map = generate_height_map(53, 53, &settings(), Vec2::new(120.0, -40.0));
        assert!(map.min_value <= map.max_value);
        for v in map.values.values() {
            assert!(*v >= map.min_value && *v <= map.max_value);
        }
        assert!(map.values.values().contains(&map.min_value));
        assert!(map.values.values().contains(&map.max_value));
    }

    #[test]
    fn test_curve_and_multiplier_applied() {
        let mut s = settings();
        s.height_curve = HeightCurve::constant(1.0);
        s.height_multiplier = 2.0;
        let noise = crate::terrain::generation::generate_noise_map(8, 8, &s.noise, Vec2::zero());
        let map = generate_height_map(8, 8, &s, Vec2::zero());
        for (a, b) in noise.values().iter().zip(map.values.values()) {
            assert!((a * 2.0 - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_falloff_pushes_edges_down() {
        let mut s = settings();
        s.use_falloff = true;
        s.height_curve = HeightCurve::constant(1.0);
        s.height_multiplier = 1.0;
        let map = generate_height_map(40, 40, &s, Vec2::zero());
        assert_eq!(map.get(0, 0), 0.0);
        assert!(map.values.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_zero_variance_local_tile() {
        let mut s = settings();
        s.noise.normalize_mode = NormalizeMode::Local;
        s.height_curve = HeightCurve::constant(1.0);
        s.height_multiplier = 10.0;
        let map = generate_height_map(1, 1, &s, Vec2::zero());
        assert_eq!(map.min_value, 5.0);
        assert_eq!(map.max_value, 5.0);
    }
}
