// ============================================
// Terrain Colors - Цвет по слоям высоты
// ============================================

use crate::terrain::grid::Grid2;
use crate::terrain::settings::TextureSettings;
use super::falloff::generate_falloff_map;
use super::height::HeightMap;

#[inline]
fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        return if value >= b { 1.0 } else { 0.0 };
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

#[inline]
fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Цвет для высоты height в диапазоне [min_height, max_height]
pub fn get_color(texture: &TextureSettings, height: f32, min_height: f32, max_height: f32) -> [f32; 3] {
    let height_percent = inverse_lerp(min_height, max_height, height);
    let mut color = [0.0; 3];
    for layer in &texture.layers {
        let half_blend = layer.blend_strength / 2.0;
        let draw_strength = inverse_lerp(-half_blend - 1e-4, half_blend, height_percent - layer.start_height);
        color = lerp3(color, layer.tint, draw_strength);
    }
    color
}

/// RGBA8 карта цветов (для внешнего вывода)
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

#[inline]
fn to_rgba8(color: [f32; 3]) -> [u8; 4] {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [c(color[0]), c(color[1]), c(color[2]), 255]
}

fn color_map_from_grid(grid: &Grid2<f32>, mut f: impl FnMut(f32) -> [f32; 3]) -> ColorMap {
    ColorMap {
        width: grid.width(),
        height: grid.height(),
        pixels: grid.values().iter().map(|v| to_rgba8(f(*v))).collect(),
    }
}

/// Оттенки серого: min -> чёрный, max -> белый
pub fn grayscale_from_height_map(map: &HeightMap) -> ColorMap {
    color_map_from_grid(&map.values, |v| {
        let t = inverse_lerp(map.min_value, map.max_value, v);
        [t, t, t]
    })
}

/// Раскраска по слоям высоты
pub fn color_map_from_height_map(map: &HeightMap, texture: &TextureSettings, min_height: f32, max_height: f32) -> ColorMap {
    color_map_from_grid(&map.values, |v| get_color(texture, v, min_height, max_height))
}

/// Превью маски затухания
pub fn falloff_color_map(size: u32) -> ColorMap {
    color_map_from_grid(&generate_falloff_map(size), |v| [v, v, v])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::settings::ColorLayer;

    fn two_layers() -> TextureSettings {
        TextureSettings {
            layers: vec![
                ColorLayer::new([0.0, 0.0, 1.0], 0.0, 0.0),
                ColorLayer::new([1.0, 1.0, 1.0], 0.5, 0.0),
            ],
        }
    }

    #[test]
    fn test_bands_without_blend() {
        let t = two_layers();
        assert_eq!(get_color(&t, 10.0, 0.0, 100.0), [0.0, 0.0, 1.0]);
        assert_eq!(get_color(&t, 90.0, 0.0, 100.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_blend_is_between_layers() {
        let mut t = two_layers();
        t.layers[1].blend_strength = 0.2;
        let c = get_color(&t, 50.0, 0.0, 100.0);
        assert!(c[0] > 0.0 && c[0] < 1.0);
    }

    #[test]
    fn test_grayscale_extremes() {
        let values = Grid2::from_fn(2, 1, |x, _| x as f32 * 4.0);
        let map = HeightMap::new(values, 0.0, 4.0);
        let img = grayscale_from_height_map(&map);
        assert_eq!(img.pixels, vec![[0, 0, 0, 255], [255, 255, 255, 255]]);
    }

    #[test]
    fn test_falloff_preview_size() {
        let img = falloff_color_map(16);
        assert_eq!(img.pixels.len(), 256);
    }
}
