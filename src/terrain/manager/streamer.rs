// ============================================
// Terrain Streamer - Бесконечный террейн вокруг наблюдателя
// ============================================
//
// tick(viewer):
//   1. применить готовые результаты фоновых задач
//   2. коллайдеры для видимых чанков
//   3. если наблюдатель сместился дальше порога: пересканировать окрестность

use std::collections::HashSet;
use std::sync::Arc;

use ultraviolet::Vec2;

use crate::terrain::cache::ChunkCoord;
use crate::terrain::settings::TerrainSettings;
use super::chunk::{ChunkRequester, ChunkSet, TerrainChunk};
use super::requester::RequesterError;
use super::types::{ChunkEvent, StreamerStats};

/// Менеджер стриминга чанков
pub struct TerrainStreamer {
    requester: ChunkRequester,
    set: ChunkSet,
    /// Позиция последнего пересканирования (None до первого tick)
    last_scan_position: Option<Vec2>,
}

impl TerrainStreamer {
    pub fn new(settings: TerrainSettings) -> Result<Self, RequesterError> {
        let settings = Arc::new(settings.validated());
        let requester = ChunkRequester::new(settings.worker_threads)?;

        log::info!(
            "terrain streamer: chunk {} world units, view distance {}, {} detail levels",
            settings.mesh.mesh_world_size(),
            settings.max_view_distance(),
            settings.detail_levels.len()
        );

        Ok(Self {
            requester,
            set: ChunkSet::new(settings),
            last_scan_position: None,
        })
    }

    pub fn settings(&self) -> &TerrainSettings {
        self.set.settings()
    }

    pub fn viewer_position(&self) -> Vec2 {
        self.set.viewer
    }

    /// Один кадр
    pub fn tick(&mut self, viewer: Vec2) {
        self.set.tick += 1;
        self.set.viewer = viewer;

        self.requester.process_completed(&mut self.set);

        let visible = self.set.visible.clone();
        for coord in visible {
            self.set.update_collision_mesh(coord, &self.requester);
        }

        let should_scan = match self.last_scan_position {
            None => true,
            Some(old) => (old - viewer).mag_sq() > self.set.settings().sqr_viewer_move_threshold(),
        };
        if should_scan {
            self.last_scan_position = Some(viewer);
            self.update_visible_chunks();
        }
    }

    /// Обновить ранее видимые чанки, затем окрестность (2n+1)^2 вокруг наблюдателя
    fn update_visible_chunks(&mut self) {
        let mut already_updated: HashSet<ChunkCoord> = HashSet::new();

        // update_chunk может убрать чанк из списка видимых, идём по копии с конца
        let previously_visible = self.set.visible.clone();
        for coord in previously_visible.into_iter().rev() {
            already_updated.insert(coord);
            self.set.update_chunk(coord, &self.requester);
        }

        let settings = self.set.settings();
        let world_size = settings.mesh.mesh_world_size();
        let chunks_visible = (settings.max_view_distance() / world_size).round() as i32;
        let current = ChunkCoord::containing(self.set.viewer, world_size);

        for y_offset in -chunks_visible..=chunks_visible {
            for x_offset in -chunks_visible..=chunks_visible {
                let coord = ChunkCoord::new(current.x + x_offset, current.y + y_offset);
                if already_updated.contains(&coord) {
                    continue;
                }
                if self.set.contains(&coord) {
                    self.set.update_chunk(coord, &self.requester);
                } else {
                    self.set.create(coord, &self.requester);
                }
            }
        }

        self.evict_stale_chunks(current, chunks_visible);
    }

    /// Выгрузить давно невидимые чанки сверх лимита (окрестность наблюдателя не трогается)
    fn evict_stale_chunks(&mut self, current: ChunkCoord, radius: i32) {
        let max = match self.set.settings().max_retained_chunks {
            Some(max) => max,
            None => return,
        };
        if self.set.len() <= max {
            return;
        }

        let mut candidates: Vec<(u64, ChunkCoord)> = self
            .set
            .iter()
            .filter(|chunk| {
                let in_window = (chunk.coord.x - current.x).abs() <= radius
                    && (chunk.coord.y - current.y).abs() <= radius;
                !chunk.visible && !in_window
            })
            .map(|chunk| (chunk.last_visible_tick, chunk.coord))
            .collect();
        candidates.sort();

        let excess = self.set.len() - max;
        for (_, coord) in candidates.into_iter().take(excess) {
            if self.set.remove(&coord).is_some() {
                self.set.events.push(ChunkEvent::Evicted { coord });
            }
        }
        log::debug!("evicted down to {} chunks (limit {})", self.set.len(), max);
    }

    /// Дождаться всех фоновых задач (и порождённых ими)
    pub fn flush(&mut self) -> usize {
        self.requester.flush(&mut self.set)
    }

    /// Забрать накопленные события
    pub fn drain_events(&mut self) -> Vec<ChunkEvent> {
        std::mem::take(&mut self.set.events)
    }

    pub fn chunk(&self, coord: &ChunkCoord) -> Option<&TerrainChunk> {
        self.set.get(coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.set.iter()
    }

    pub fn visible_chunks(&self) -> &[ChunkCoord] {
        self.set.visible()
    }

    pub fn in_flight(&self) -> usize {
        self.requester.in_flight()
    }

    pub fn stats(&self) -> StreamerStats {
        let mut stats = StreamerStats {
            tick: self.set.tick,
            chunks: self.set.len(),
            visible: self.set.visible.len(),
            in_flight: self.requester.in_flight(),
            ..Default::default()
        };
        for chunk in self.set.iter() {
            if chunk.has_height_map() {
                stats.height_maps += 1;
            }
            stats.meshes += chunk.lod_meshes.iter().filter(|slot| slot.has_mesh()).count();
            if chunk.has_collider() {
                stats.colliders += 1;
            }
        }
        stats
    }
}
