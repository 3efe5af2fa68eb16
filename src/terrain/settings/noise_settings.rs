// ============================================
// Noise Settings - Параметры октавного шума
// ============================================

use serde::{Deserialize, Serialize};

/// Минимальный масштаб шума (защита от деления на ноль)
pub const MIN_NOISE_SCALE: f32 = 0.01;

/// Режим нормализации шума
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    /// По min/max текущего тайла (только для превью одного тайла, на стыках будут швы)
    Local,
    /// По оценке максимально возможной амплитуды, бесшовно для стриминга
    #[default]
    Global,
}

/// Параметры генерации шумового поля
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub normalize_mode: NormalizeMode,
    pub scale: f32,
    pub octaves: u32,
    /// Затухание амплитуды на октаву (0..1)
    pub persistence: f32,
    /// Рост частоты на октаву (>= 1)
    pub lacunarity: f32,
    pub seed: i32,
    pub offset: [f32; 2],
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            normalize_mode: NormalizeMode::Global,
            scale: 50.0,
            octaves: 6,
            persistence: 0.6,
            lacunarity: 2.0,
            seed: 0,
            offset: [0.0, 0.0],
        }
    }
}

impl NoiseSettings {
    /// Привести значения к допустимым (локальный clamp вместо ошибки)
    pub fn validated(&self) -> Self {
        let mut v = self.clone();
        if !(v.scale >= MIN_NOISE_SCALE) {
            log::warn!("noise scale {} clamped to {}", v.scale, MIN_NOISE_SCALE);
            v.scale = MIN_NOISE_SCALE;
        }
        if v.octaves < 1 {
            log::warn!("noise octave count 0 clamped to 1");
            v.octaves = 1;
        }
        if !(v.lacunarity >= 1.0) {
            log::warn!("noise lacunarity {} clamped to 1", v.lacunarity);
            v.lacunarity = 1.0;
        }
        v.persistence = if v.persistence.is_nan() { 0.0 } else { v.persistence.clamp(0.0, 1.0) };
        v
    }

    /// Оценка максимальной суммы амплитуд: Σ persistence^i
    pub fn max_possible_height(&self) -> f32 {
        let mut amplitude = 1.0;
        let mut total = 0.0;
        for _ in 0..self.octaves.max(1) {
            total += amplitude;
            amplitude *= self.persistence;
        }
        total
    }
}
