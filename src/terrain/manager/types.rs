use crate::terrain::cache::ChunkCoord;

/// Событие жизненного цикла чанка (забирается через drain_events)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkEvent {
    /// Чанк вошёл в радиус видимости или вышел из него
    VisibilityChanged { coord: ChunkCoord, visible: bool },
    /// Активным стал меш полосы lod_index
    MeshApplied { coord: ChunkCoord, lod_index: usize, lod: u32 },
    /// Коллайдер установлен (один раз за жизнь чанка)
    ColliderSet { coord: ChunkCoord },
    /// Чанк выгружен по лимиту max_retained_chunks
    Evicted { coord: ChunkCoord },
}

/// Снимок состояния стримера
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamerStats {
    pub tick: u64,
    pub chunks: usize,
    pub visible: usize,
    pub height_maps: usize,
    pub meshes: usize,
    pub colliders: usize,
    pub in_flight: usize,
}
