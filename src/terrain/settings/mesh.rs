// ============================================
// Mesh Settings - Размеры чанков и масштаб
// ============================================

use serde::{Deserialize, Serialize};

/// Количество поддерживаемых LOD (0..=4)
pub const NUM_SUPPORTED_LODS: u32 = 5;
/// Поддерживаемые базовые размеры чанков (кратны 24, делятся на все шаги LOD)
pub const SUPPORTED_CHUNK_SIZES: [u32; 9] = [48, 72, 96, 120, 144, 168, 192, 216, 240];
/// Для flat shading вершин в 3 раза больше, поэтому только маленькие размеры
pub const NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES: usize = 3;

/// Параметры построения меша
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    pub mesh_scale: f32,
    pub use_flat_shading: bool,
    pub chunk_size_index: usize,
    pub flat_shaded_chunk_size_index: usize,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            mesh_scale: 2.5,
            use_flat_shading: false,
            chunk_size_index: 0,
            flat_shaded_chunk_size_index: 0,
        }
    }
}

impl MeshSettings {
    pub fn validated(&self) -> Self {
        let mut v = self.clone();
        if !(v.mesh_scale > 0.0) {
            log::warn!("mesh scale {} clamped to 1", v.mesh_scale);
            v.mesh_scale = 1.0;
        }
        if v.chunk_size_index >= SUPPORTED_CHUNK_SIZES.len() {
            log::warn!("chunk size index {} out of range", v.chunk_size_index);
            v.chunk_size_index = SUPPORTED_CHUNK_SIZES.len() - 1;
        }
        if v.flat_shaded_chunk_size_index >= NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES {
            log::warn!("flat shaded chunk size index {} out of range", v.flat_shaded_chunk_size_index);
            v.flat_shaded_chunk_size_index = NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES - 1;
        }
        v
    }

    /// Базовый размер чанка (в ячейках) для текущего режима
    pub fn chunk_size(&self) -> u32 {
        let idx = if self.use_flat_shading {
            self.flat_shaded_chunk_size_index.min(NUM_SUPPORTED_FLAT_SHADED_CHUNK_SIZES - 1)
        } else {
            self.chunk_size_index.min(SUPPORTED_CHUNK_SIZES.len() - 1)
        };
        SUPPORTED_CHUNK_SIZES[idx]
    }

    /// Вершин в строке при LOD 0, включая 2 вершины вне меша (для нормалей)
    /// и 2 вершины кольца стыковки
    pub fn num_verts_per_line(&self) -> u32 {
        self.chunk_size() + 5
    }

    /// Размер чанка в мировых единицах
    pub fn mesh_world_size(&self) -> f32 {
        (self.num_verts_per_line() - 3) as f32 * self.mesh_scale
    }
}
