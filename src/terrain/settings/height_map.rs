// ============================================
// Height Map Settings - Параметры карты высот
// ============================================

use serde::{Deserialize, Serialize};

use crate::terrain::generation::HeightCurve;
use super::noise_settings::NoiseSettings;

/// Параметры карты высот: шум + кривая + множитель
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightMapSettings {
    pub noise: NoiseSettings,
    /// Вычитать маску затухания к краям (остров)
    pub use_falloff: bool,
    /// Масштаб по вертикали
    pub height_multiplier: f32,
    pub height_curve: HeightCurve,
}

impl Default for HeightMapSettings {
    fn default() -> Self {
        Self {
            noise: NoiseSettings::default(),
            use_falloff: false,
            height_multiplier: 40.0,
            height_curve: HeightCurve::from_points(&[(0.0, 0.0), (0.35, 0.05), (1.0, 1.0)]),
        }
    }
}

impl HeightMapSettings {
    pub fn validated(&self) -> Self {
        Self {
            noise: self.noise.validated(),
            ..self.clone()
        }
    }

    /// Минимальная высота террейна: multiplier * curve(0)
    pub fn min_height(&self) -> f32 {
        self.height_multiplier * self.height_curve.evaluate(0.0)
    }

    /// Максимальная высота террейна: multiplier * curve(1)
    pub fn max_height(&self) -> f32 {
        self.height_multiplier * self.height_curve.evaluate(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_range_from_curve_ends() {
        let s = HeightMapSettings {
            height_multiplier: 20.0,
            height_curve: HeightCurve::from_points(&[(0.0, 0.1), (1.0, 0.8)]),
            ..Default::default()
        };
        assert!((s.min_height() - 2.0).abs() < 1e-5);
        assert!((s.max_height() - 16.0).abs() < 1e-5);
    }
}
