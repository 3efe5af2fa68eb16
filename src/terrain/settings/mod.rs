// ============================================
// Settings - Конфигурация генерации террейна
// ============================================
// Все настройки: неизменяемые значения, разделяются между потоками через Arc

mod noise_settings;
mod height_map;
mod mesh;
mod texture;
mod terrain;

pub use noise_settings::{NoiseSettings, NormalizeMode, MIN_NOISE_SCALE};
pub use height_map::HeightMapSettings;
pub use mesh::{
    MeshSettings, NUM_SUPPORTED_LODS, SUPPORTED_CHUNK_SIZES, NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES,
};
pub use texture::{ColorLayer, TextureSettings};
pub use terrain::{SettingsError, TerrainSettings};
