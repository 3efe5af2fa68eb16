mod types;
mod requester;
mod chunk;
mod streamer;

pub use types::{ChunkEvent, StreamerStats};
pub use requester::{Callback, RequesterError, ThreadedDataRequester};
pub use chunk::{ChunkRequester, ChunkSet, LodMesh, TerrainChunk};
pub use streamer::TerrainStreamer;
