// ============================================
// Terrain Settings - Общая конфигурация (data-driven из JSON)
// ============================================

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::terrain::lod::{self, LodInfo};
use super::height_map::HeightMapSettings;
use super::mesh::MeshSettings;
use super::texture::TextureSettings;

/// Ошибки загрузки настроек
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(String),
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {}", e),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Все настройки генерации и стриминга
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub height_map: HeightMapSettings,
    pub mesh: MeshSettings,
    pub texture: TextureSettings,
    /// Полосы LOD по возрастанию порога
    pub detail_levels: Vec<LodInfo>,
    /// Насколько должен сместиться наблюдатель для пересканирования чанков
    pub viewer_move_threshold: f32,
    /// Дистанция до края чанка, при которой ставится коллайдер
    pub collider_generation_distance_threshold: f32,
    /// Потоков в пуле генерации (0 = по числу ядер)
    pub worker_threads: usize,
    /// Лимит хранимых чанков (None = никогда не выгружать)
    pub max_retained_chunks: Option<usize>,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            height_map: HeightMapSettings::default(),
            mesh: MeshSettings::default(),
            texture: TextureSettings::default(),
            detail_levels: LodInfo::DEFAULT_LEVELS.to_vec(),
            viewer_move_threshold: 25.0,
            collider_generation_distance_threshold: 5.0,
            worker_threads: 0,
            max_retained_chunks: None,
        }
    }
}

impl TerrainSettings {
    /// Загрузить из JSON строки (значения проходят validated())
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: TerrainSettings = serde_json::from_str(json)
            .map_err(|e| SettingsError::Parse(e.to_string()))?;
        Ok(settings.validated())
    }

    /// Загрузить из файла
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Привести все значения к допустимым
    pub fn validated(&self) -> Self {
        let mut v = Self {
            height_map: self.height_map.validated(),
            mesh: self.mesh.validated(),
            texture: self.texture.validated(),
            detail_levels: lod::validate_levels(&self.detail_levels),
            ..self.clone()
        };
        if !(v.viewer_move_threshold >= 0.0) {
            v.viewer_move_threshold = 0.0;
        }
        if !(v.collider_generation_distance_threshold >= 0.0) {
            v.collider_generation_distance_threshold = 0.0;
        }
        v
    }

    /// Индекс полосы, меш которой идёт в коллайдер (первая с use_for_collider, иначе 0)
    pub fn collider_lod_index(&self) -> usize {
        self.detail_levels
            .iter()
            .position(|level| level.use_for_collider)
            .unwrap_or(0)
    }

    pub fn max_view_distance(&self) -> f32 {
        lod::max_view_distance(&self.detail_levels)
    }

    #[inline]
    pub fn sqr_viewer_move_threshold(&self) -> f32 {
        self.viewer_move_threshold * self.viewer_move_threshold
    }

    #[inline]
    pub fn sqr_collider_generation_distance_threshold(&self) -> f32 {
        self.collider_generation_distance_threshold * self.collider_generation_distance_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::settings::NormalizeMode;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "height_map": { "noise": { "scale": 0.0, "octaves": 4, "normalize_mode": "local" } },
            "detail_levels": [
                { "lod": 2, "visible_distance_threshold": 300.0 },
                { "lod": 0, "visible_distance_threshold": 100.0, "use_for_collider": true }
            ]
        }"#;
        let s = TerrainSettings::from_json(json).unwrap();
        assert_eq!(s.height_map.noise.octaves, 4);
        assert_eq!(s.height_map.noise.normalize_mode, NormalizeMode::Local);
        assert!(s.height_map.noise.scale > 0.0);
        assert_eq!(s.detail_levels[0].lod, 0);
        assert_eq!(s.collider_lod_index(), 0);
        assert_eq!(s.max_view_distance(), 300.0);
        assert_eq!(s.viewer_move_threshold, 25.0);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        match TerrainSettings::from_json("{ not json") {
            Err(SettingsError::Parse(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TerrainSettings::load_from_file("/definitely/not/here.json");
        assert!(matches!(result, Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let s = TerrainSettings::default();
        let back = TerrainSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s.validated());
    }

    #[test]
    fn test_collider_band_follows_flag() {
        let mut s = TerrainSettings {
            detail_levels: vec![LodInfo::new(0, 50.0), LodInfo::new(1, 100.0), LodInfo::new(3, 200.0)],
            ..Default::default()
        };
        assert_eq!(s.collider_lod_index(), 0);
        s.detail_levels[1].use_for_collider = true;
        s.detail_levels[2].use_for_collider = true;
        assert_eq!(s.collider_lod_index(), 1);
    }
}
