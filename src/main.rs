// ============================================
// Demo - Пролёт наблюдателя над бесконечным террейном
// ============================================
// Использование: lod_terrain [settings.json] [ticks]
// Уровень логов: RUST_LOG=debug lod_terrain

use std::process;

use env_logger::Env;
use ultraviolet::Vec2;

use lod_terrain::terrain::mesh::{index_bytes, vertex_bytes};
use lod_terrain::{ChunkEvent, TerrainSettings, TerrainStreamer};

/// Скорость наблюдателя (мировых единиц за тик)
const VIEWER_SPEED: f32 = 12.0;
const DEFAULT_TICKS: u32 = 120;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match TerrainSettings::load_from_file(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}: {}", path, e);
                process::exit(1);
            }
        },
        None => TerrainSettings::default(),
    };
    let ticks = args.next().and_then(|t| t.parse().ok()).unwrap_or(DEFAULT_TICKS);

    let mut streamer = match TerrainStreamer::new(settings) {
        Ok(streamer) => streamer,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    // Прогрев: первая окрестность целиком
    streamer.tick(Vec2::zero());
    let completed = streamer.flush();
    log::info!("warm-up: {} tasks, {:?}", completed, streamer.stats());

    let heading = Vec2::new(1.0, 0.35).normalized();
    let mut position = Vec2::zero();
    let (mut shown, mut hidden, mut colliders) = (0usize, 0usize, 0usize);

    for tick in 0..ticks {
        position += heading * VIEWER_SPEED;
        streamer.tick(position);

        for event in streamer.drain_events() {
            match event {
                ChunkEvent::VisibilityChanged { visible: true, .. } => shown += 1,
                ChunkEvent::VisibilityChanged { visible: false, .. } => hidden += 1,
                ChunkEvent::ColliderSet { coord } => {
                    colliders += 1;
                    log::debug!("collider at {:?}", coord);
                }
                ChunkEvent::MeshApplied { coord, lod, .. } => log::trace!("{:?} -> lod {}", coord, lod),
                ChunkEvent::Evicted { coord } => log::debug!("evicted {:?}", coord),
            }
        }

        if tick % 30 == 0 {
            log::info!("tick {}: viewer ({:.0}, {:.0}) {:?}", tick, position.x, position.y, streamer.stats());
        }
    }

    streamer.flush();

    // Объём данных для GPU по видимым мешам
    let settings = streamer.settings().clone();
    let (min_height, max_height) = (settings.height_map.min_height(), settings.height_map.max_height());
    let mut gpu_bytes = 0usize;
    for coord in streamer.visible_chunks() {
        if let Some(mesh) = streamer.chunk(coord).and_then(|chunk| chunk.active_mesh()) {
            let vertices = mesh.to_vertices(&settings.texture, min_height, max_height);
            gpu_bytes += vertex_bytes(&vertices).len() + index_bytes(&mesh.triangles).len();
        }
    }

    log::info!(
        "done: {} shown, {} hidden, {} colliders, {:.1} MiB of visible geometry, {:?}",
        shown,
        hidden,
        colliders,
        gpu_bytes as f64 / (1024.0 * 1024.0),
        streamer.stats()
    );
}
