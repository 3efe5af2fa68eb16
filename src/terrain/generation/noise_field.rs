// ============================================
// Noise Field - Октавный градиентный шум (fBm)
// ============================================
//
// Смещения октав берутся из ГПСЧ по seed и включают центр выборки,
// поэтому соседние тайлы читают одно непрерывное глобальное поле.

use noise::{NoiseFn, Perlin};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ultraviolet::Vec2;

use crate::terrain::grid::Grid2;
use crate::terrain::settings::{NoiseSettings, NormalizeMode};

/// Диапазон случайных смещений октав
const OCTAVE_OFFSET_RANGE: i32 = 100_000;

/// Доля оценки максимума, реально достижимая суммой октав (Global режим)
const GLOBAL_NORMALIZE_HEADROOM: f64 = 0.9;

/// Шумовое поле: неизменяемое после создания, безопасно для чтения из потоков
#[derive(Clone)]
pub struct NoiseField {
    settings: NoiseSettings,
    perlin: Perlin,
    /// Смещения октав без учёта центра выборки
    octave_offsets: Vec<[f64; 2]>,
    max_possible_height: f64,
}

impl NoiseField {
    pub fn new(settings: &NoiseSettings) -> Self {
        let settings = settings.validated();
        let mut rng = ChaCha8Rng::seed_from_u64(settings.seed as i64 as u64);

        let octave_offsets = (0..settings.octaves)
            .map(|_| {
                let x = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64;
                let y = rng.gen_range(-OCTAVE_OFFSET_RANGE..OCTAVE_OFFSET_RANGE) as f64;
                [x + settings.offset[0] as f64, y - settings.offset[1] as f64]
            })
            .collect();

        Self {
            perlin: Perlin::new(settings.seed as u32),
            max_possible_height: settings.max_possible_height() as f64,
            octave_offsets,
            settings,
        }
    }

    pub fn settings(&self) -> &NoiseSettings {
        &self.settings
    }

    /// Сгенерировать сетку width x height вокруг sample_centre
    pub fn generate(&self, width: u32, height: u32, sample_centre: Vec2) -> Grid2<f32> {
        let offsets: Vec<[f64; 2]> = self
            .octave_offsets
            .iter()
            .map(|o| [o[0] + sample_centre.x as f64, o[1] - sample_centre.y as f64])
            .collect();

        let half_width = width as f64 / 2.0;
        let half_height = height as f64 / 2.0;
        let scale = self.settings.scale as f64;
        let persistence = self.settings.persistence as f64;
        let lacunarity = self.settings.lacunarity as f64;

        // Независимые проверки min и max: одна ячейка может обновить оба
        let mut min_raw = f64::MAX;
        let mut max_raw = f64::MIN;

        let raw = Grid2::from_fn(width, height, |x, y| {
            let mut amplitude = 1.0;
            let mut frequency = 1.0;
            let mut noise_height = 0.0;

            for offset in &offsets {
                let sample_x = (x as f64 - half_width + offset[0]) / scale * frequency;
                let sample_y = (y as f64 - half_height + offset[1]) / scale * frequency;
                noise_height += self.perlin.get([sample_x, sample_y]) * amplitude;

                amplitude *= persistence;
                frequency *= lacunarity;
            }

            if noise_height > max_raw {
                max_raw = noise_height;
            }
            if noise_height < min_raw {
                min_raw = noise_height;
            }
            noise_height
        });

        match self.settings.normalize_mode {
            NormalizeMode::Local => {
                let range = max_raw - min_raw;
                if !(range > f64::EPSILON) {
                    // Нулевая дисперсия: плоское поле посередине
                    return Grid2::new_with(width, height, 0.5);
                }
                Grid2::from_fn(width, height, |x, y| ((*raw.get(x, y) - min_raw) / range) as f32)
            }
            NormalizeMode::Global => {
                let denom = self.max_possible_height / GLOBAL_NORMALIZE_HEADROOM;
                Grid2::from_fn(width, height, |x, y| {
                    ((*raw.get(x, y) + 1.0) / denom).clamp(0.0, 1.0) as f32
                })
            }
        }
    }
}

/// Сгенерировать шумовую карту (разовый вызов)
pub fn generate_noise_map(width: u32, height: u32, settings: &NoiseSettings, sample_centre: Vec2) -> Grid2<f32> {
    NoiseField::new(settings).generate(width, height, sample_centre)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_settings() -> NoiseSettings {
        NoiseSettings {
            normalize_mode: NormalizeMode::Global,
            scale: 37.0,
            octaves: 5,
            persistence: 0.5,
            lacunarity: 2.0,
            seed: 1234,
            offset: [3.0, -7.0],
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let s = global_settings();
        let a = generate_noise_map(16, 16, &s, Vec2::new(10.0, 20.0));
        let b = generate_noise_map(16, 16, &s, Vec2::new(10.0, 20.0));
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn test_different_seed_differs() {
        let a = generate_noise_map(16, 16, &global_settings(), Vec2::zero());
        let other = NoiseSettings { seed: 99, ..global_settings() };
        let b = generate_noise_map(16, 16, &other, Vec2::zero());
        assert_ne!(a.values(), b.values());
    }

    #[test]
    fn test_global_overlapping_windows_identical() {
        let field = NoiseField::new(&global_settings());
        let a = field.generate(24, 20, Vec2::new(0.0, 0.0));
        // Окно, сдвинутое на 8 ячеек по x и на 4 по y (ось y шума инвертирована)
        let b = field.generate(24, 20, Vec2::new(8.0, -4.0));
        for y in 4..20 {
            for x in 8..24 {
                assert_eq!(
                    a.get(x, y).to_bits(),
                    b.get(x - 8, y - 4).to_bits(),
                    "mismatch at ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_global_values_in_unit_range() {
        let map = generate_noise_map(32, 32, &global_settings(), Vec2::new(-500.0, 250.0));
        assert!(map.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_local_normalization_spans_unit_range() {
        let s = NoiseSettings { normalize_mode: NormalizeMode::Local, ..global_settings() };
        let map = generate_noise_map(32, 32, &s, Vec2::zero());
        let min = map.values().iter().cloned().fold(f32::MAX, f32::min);
        let max = map.values().iter().cloned().fold(f32::MIN, f32::max);
        assert!(min.abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_local_zero_variance_is_flat_half() {
        // Один пиксель: min == max
        let s = NoiseSettings { normalize_mode: NormalizeMode::Local, ..global_settings() };
        let map = generate_noise_map(1, 1, &s, Vec2::zero());
        assert_eq!(map.values(), &[0.5]);
    }

    #[test]
    fn test_zero_scale_is_clamped_not_nan() {
        let s = NoiseSettings { scale: 0.0, ..global_settings() };
        let map = generate_noise_map(8, 8, &s, Vec2::zero());
        assert!(map.values().iter().all(|v| v.is_finite()));
    }
}
