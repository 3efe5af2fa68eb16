// ============================================
// Mesh Module - Тесселяция карт высот
// ============================================

mod vertex;
mod data;
mod tessellator;

pub use vertex::{TerrainVertex, vertex_bytes, index_bytes};
pub use data::MeshData;
pub use tessellator::tessellate;
