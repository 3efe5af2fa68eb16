// ============================================
// Terrain Module - Бесконечный процедурный террейн с LOD
// ============================================

pub mod grid;
pub mod settings;
pub mod generation;
pub mod mesh;
pub mod cache;
pub mod lod;
pub mod manager;

// Re-exports
pub use grid::Grid2;
pub use settings::{TerrainSettings, SettingsError, NoiseSettings, HeightMapSettings, MeshSettings, TextureSettings};
pub use generation::{NoiseField, HeightField, HeightMap, HeightCurve};
pub use mesh::{MeshData, TerrainVertex, tessellate};
pub use cache::{ChunkCoord, Bounds2};
pub use lod::LodInfo;
pub use manager::{TerrainStreamer, TerrainChunk, ChunkEvent, StreamerStats, ThreadedDataRequester, RequesterError};
