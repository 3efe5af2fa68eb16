// ============================================
// Texture Settings - Цветовые слои по высоте
// ============================================

use serde::{Deserialize, Serialize};

/// Цветовой слой: начинается с высоты start_height (доля 0..1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorLayer {
    pub tint: [f32; 3],
    /// Доля высоты [0,1], с которой начинается слой
    pub start_height: f32,
    /// Ширина зоны смешивания с предыдущим слоем
    #[serde(default)]
    pub blend_strength: f32,
}

impl ColorLayer {
    pub const fn new(tint: [f32; 3], start_height: f32, blend_strength: f32) -> Self {
        Self { tint, start_height, blend_strength }
    }
}

/// Набор слоёв для раскраски террейна по высоте
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSettings {
    pub layers: Vec<ColorLayer>,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            layers: vec![
                ColorLayer::new([0.16, 0.32, 0.62], 0.0, 0.0),   // вода
                ColorLayer::new([0.84, 0.80, 0.55], 0.08, 0.04), // песок
                ColorLayer::new([0.36, 0.60, 0.28], 0.15, 0.08), // трава
                ColorLayer::new([0.45, 0.42, 0.40], 0.55, 0.10), // скалы
                ColorLayer::new([0.95, 0.95, 0.97], 0.80, 0.08), // снег
            ],
        }
    }
}

impl TextureSettings {
    pub fn validated(&self) -> Self {
        let mut layers = self.layers.clone();
        for layer in &mut layers {
            layer.start_height = layer.start_height.clamp(0.0, 1.0);
            layer.blend_strength = layer.blend_strength.max(0.0);
        }
        layers.sort_by(|a, b| a.start_height.total_cmp(&b.start_height));
        Self { layers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_sorts_and_clamps() {
        let t = TextureSettings {
            layers: vec![
                ColorLayer::new([1.0, 1.0, 1.0], 1.7, -0.5),
                ColorLayer::new([0.0, 0.0, 0.0], 0.2, 0.1),
            ],
        }
        .validated();
        assert_eq!(t.layers[0].start_height, 0.2);
        assert_eq!(t.layers[1].start_height, 1.0);
        assert_eq!(t.layers[1].blend_strength, 0.0);
    }
}
