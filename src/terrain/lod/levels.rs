// ============================================
// LOD Levels - Уровни детализации по дистанции
// ============================================

use serde::{Deserialize, Serialize};

use crate::terrain::settings::NUM_SUPPORTED_LODS;

/// Полоса дистанций: до visible_distance_threshold используется меш с данным lod
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodInfo {
    /// 0 = полная детализация, шаг сетки = lod * 2
    pub lod: u32,
    pub visible_distance_threshold: f32,
    /// Полоса для коллайдера: collider_lod_index берёт первую полосу с этим флагом (без флагов: полоса 0)
    #[serde(default)]
    pub use_for_collider: bool,
}

impl LodInfo {
    pub const fn new(lod: u32, visible_distance_threshold: f32) -> Self {
        Self { lod, visible_distance_threshold, use_for_collider: false }
    }

    #[inline]
    pub fn sqr_visible_distance_threshold(&self) -> f32 {
        self.visible_distance_threshold * self.visible_distance_threshold
    }

    pub const DEFAULT_LEVELS: [LodInfo; 3] = [
        LodInfo { lod: 0, visible_distance_threshold: 200.0, use_for_collider: true },
        LodInfo { lod: 1, visible_distance_threshold: 400.0, use_for_collider: false },
        LodInfo { lod: 4, visible_distance_threshold: 600.0, use_for_collider: false },
    ];
}

/// Шаг по сетке высот для lod
#[inline]
pub fn skip_increment(lod: u32) -> u32 {
    if lod == 0 { 1 } else { lod * 2 }
}

/// Индекс полосы для дистанции: первая полоса с distance <= threshold.
/// Граница относится к более детальной полосе. None, если дальше последней полосы.
pub fn select_lod_index(detail_levels: &[LodInfo], distance: f32) -> Option<usize> {
    detail_levels
        .iter()
        .position(|level| distance <= level.visible_distance_threshold)
}

/// Максимальная дистанция видимости (порог последней полосы)
pub fn max_view_distance(detail_levels: &[LodInfo]) -> f32 {
    detail_levels
        .last()
        .map(|level| level.visible_distance_threshold)
        .unwrap_or(0.0)
}

/// Привести полосы к инварианту: lod в допустимом наборе, пороги по возрастанию
pub fn validate_levels(levels: &[LodInfo]) -> Vec<LodInfo> {
    let mut out: Vec<LodInfo> = if levels.is_empty() {
        log::warn!("no detail levels configured, using defaults");
        LodInfo::DEFAULT_LEVELS.to_vec()
    } else {
        levels.to_vec()
    };

    for level in &mut out {
        if level.lod >= NUM_SUPPORTED_LODS {
            log::warn!("lod {} clamped to {}", level.lod, NUM_SUPPORTED_LODS - 1);
            level.lod = NUM_SUPPORTED_LODS - 1;
        }
        if !(level.visible_distance_threshold >= 0.0) {
            level.visible_distance_threshold = 0.0;
        }
    }
    out.sort_by(|a, b| a.visible_distance_threshold.total_cmp(&b.visible_distance_threshold));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands() -> Vec<LodInfo> {
        vec![LodInfo::new(0, 100.0), LodInfo::new(1, 200.0), LodInfo::new(2, 300.0)]
    }

    #[test]
    fn test_select_middle_band() {
        assert_eq!(select_lod_index(&bands(), 150.0), Some(1));
    }

    #[test]
    fn test_boundary_prefers_finer_lod() {
        assert_eq!(select_lod_index(&bands(), 100.0), Some(0));
        assert_eq!(select_lod_index(&bands(), 300.0), Some(2));
    }

    #[test]
    fn test_beyond_last_band() {
        assert_eq!(select_lod_index(&bands(), 300.5), None);
        assert_eq!(max_view_distance(&bands()), 300.0);
    }

    #[test]
    fn test_skip_increment() {
        assert_eq!(skip_increment(0), 1);
        assert_eq!(skip_increment(1), 2);
        assert_eq!(skip_increment(4), 8);
    }

    #[test]
    fn test_validate_sorts_and_clamps() {
        let levels = vec![LodInfo::new(9, 300.0), LodInfo::new(0, 50.0)];
        let v = validate_levels(&levels);
        assert_eq!(v[0].visible_distance_threshold, 50.0);
        assert_eq!(v[1].lod, NUM_SUPPORTED_LODS - 1);
        assert_eq!(validate_levels(&[]).len(), LodInfo::DEFAULT_LEVELS.len());
    }
}
