// ============================================
// Terrain Vertex - Структура вершины
// ============================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 3],
}

impl TerrainVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2], color: [f32; 3]) -> Self {
        Self { position, normal, uv, color }
    }

    /// Шаг вершины в байтах (для буфера вершин)
    pub const STRIDE: usize = std::mem::size_of::<TerrainVertex>();
}

/// Байтовое представление буфера вершин для загрузки во внешний рендер
pub fn vertex_bytes(vertices: &[TerrainVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Байтовое представление индексов
pub fn index_bytes(indices: &[u32]) -> &[u8] {
    bytemuck::cast_slice(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(TerrainVertex::STRIDE, 11 * 4);
        let v = [TerrainVertex::default(); 3];
        assert_eq!(vertex_bytes(&v).len(), 3 * TerrainVertex::STRIDE);
        assert_eq!(index_bytes(&[0, 1, 2]).len(), 12);
    }
}
