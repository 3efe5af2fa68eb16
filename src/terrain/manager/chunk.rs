// ============================================
// Terrain Chunk - Состояние чанка и его переходы
// ============================================
//
// Чанк: Created -> (карта высот) -> Ready; видимость и активный LOD
// пересчитываются в update(). Меши всех LOD кэшируются, коллайдер
// ставится один раз и больше не меняется.
//
// Все переходы выполняются в потоке владельца: продолжения фоновых задач
// находят чанк по координате и отбрасывают результат, если чанка нет.

use std::collections::HashMap;
use std::sync::Arc;

use ultraviolet::Vec2;

use crate::terrain::cache::{Bounds2, ChunkCoord};
use crate::terrain::generation::{HeightField, HeightMap};
use crate::terrain::lod::select_lod_index;
use crate::terrain::mesh::{tessellate, MeshData};
use crate::terrain::settings::TerrainSettings;
use super::requester::ThreadedDataRequester;
use super::types::ChunkEvent;

pub type ChunkRequester = ThreadedDataRequester<ChunkSet>;

/// Слот меша одной полосы LOD
#[derive(Debug, Clone)]
pub struct LodMesh {
    pub lod: u32,
    pub mesh: Option<Arc<MeshData>>,
    pub requested: bool,
}

impl LodMesh {
    fn new(lod: u32) -> Self {
        Self { lod, mesh: None, requested: false }
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}

/// Один тайл террейна
#[derive(Debug)]
pub struct TerrainChunk {
    pub coord: ChunkCoord,
    pub sample_centre: Vec2,
    pub bounds: Bounds2,
    pub height_map: Option<Arc<HeightMap>>,
    pub lod_meshes: Vec<LodMesh>,
    pub previous_lod_index: Option<usize>,
    pub visible: bool,
    pub collider: Option<Arc<MeshData>>,
    pub last_visible_tick: u64,
    /// Поколение: результаты для выгруженного ранее чанка с той же координатой отбрасываются
    epoch: u64,
}

impl TerrainChunk {
    pub fn new(coord: ChunkCoord, settings: &TerrainSettings, epoch: u64) -> Self {
        let world_size = settings.mesh.mesh_world_size();
        Self {
            coord,
            sample_centre: coord.sample_centre(world_size, settings.mesh.mesh_scale),
            bounds: Bounds2::for_chunk(coord, world_size),
            height_map: None,
            lod_meshes: settings.detail_levels.iter().map(|level| LodMesh::new(level.lod)).collect(),
            previous_lod_index: None,
            visible: false,
            collider: None,
            last_visible_tick: 0,
            epoch,
        }
    }

    #[inline]
    pub fn has_height_map(&self) -> bool {
        self.height_map.is_some()
    }

    #[inline]
    pub fn has_collider(&self) -> bool {
        self.collider.is_some()
    }

    /// Меш, показанный сейчас (последний применённый LOD)
    pub fn active_mesh(&self) -> Option<&Arc<MeshData>> {
        self.previous_lod_index
            .and_then(|i| self.lod_meshes.get(i))
            .and_then(|slot| slot.mesh.as_ref())
    }

    /// Положение меша в мире (меш построен вокруг начала координат)
    pub fn world_position(&self) -> Vec2 {
        self.bounds.centre
    }

    #[inline]
    pub fn sqr_distance_to(&self, viewer: Vec2) -> f32 {
        self.bounds.sqr_distance(viewer)
    }

    /// Запросить карту высот
    fn load(&self, height_field: &Arc<HeightField>, size: u32, requester: &ChunkRequester) {
        let field = Arc::clone(height_field);
        let centre = self.sample_centre;
        let (coord, epoch) = (self.coord, self.epoch);

        requester.request_data(
            move || field.generate(size, size, centre),
            move |map, set: &mut ChunkSet, requester| set.on_height_map_received(coord, epoch, map, requester),
        );
    }

    /// Запросить меш полосы lod_index (один раз)
    fn request_mesh(&mut self, lod_index: usize, settings: &TerrainSettings, requester: &ChunkRequester) {
        let height_map = match &self.height_map {
            Some(map) => Arc::clone(map),
            None => return,
        };
        let slot = match self.lod_meshes.get_mut(lod_index) {
            Some(slot) => slot,
            None => return,
        };
        if slot.requested {
            return;
        }
        slot.requested = true;

        let lod = slot.lod;
        let mesh_settings = settings.mesh.clone();
        let (coord, epoch) = (self.coord, self.epoch);

        log::trace!("chunk {:?}: mesh lod {} requested", coord, lod);
        requester.request_data(
            move || tessellate(&height_map, &mesh_settings, lod),
            move |mesh, set: &mut ChunkSet, requester| {
                set.on_mesh_received(coord, epoch, lod_index, mesh, requester)
            },
        );
    }

    /// Пересчитать видимость и LOD. Возвращает новую видимость, если она изменилась.
    fn update(
        &mut self,
        viewer: Vec2,
        tick: u64,
        settings: &TerrainSettings,
        requester: &ChunkRequester,
        events: &mut Vec<ChunkEvent>,
    ) -> Option<bool> {
        if self.height_map.is_none() {
            return None;
        }

        let distance = self.bounds.sqr_distance(viewer).sqrt();
        let was_visible = self.visible;
        let visible = distance <= settings.max_view_distance();

        if visible {
            self.last_visible_tick = tick;
            if let Some(lod_index) = select_lod_index(&settings.detail_levels, distance) {
                if self.previous_lod_index != Some(lod_index) {
                    if let Some(slot) = self.lod_meshes.get(lod_index).filter(|s| s.has_mesh()) {
                        let lod = slot.lod;
                        self.previous_lod_index = Some(lod_index);
                        events.push(ChunkEvent::MeshApplied { coord: self.coord, lod_index, lod });
                    } else {
                        self.request_mesh(lod_index, settings, requester);
                    }
                }
            }
        }

        if was_visible != visible {
            self.visible = visible;
            events.push(ChunkEvent::VisibilityChanged { coord: self.coord, visible });
            return Some(visible);
        }
        None
    }

    /// Запросить меш коллайдера вблизи и установить его на пороге
    fn update_collision_mesh(
        &mut self,
        viewer: Vec2,
        settings: &TerrainSettings,
        requester: &ChunkRequester,
        events: &mut Vec<ChunkEvent>,
    ) {
        if self.collider.is_some() || self.height_map.is_none() {
            return;
        }

        let collider_index = settings.collider_lod_index();
        let sqr_distance = self.bounds.sqr_distance(viewer);

        let request_threshold = match settings.detail_levels.get(collider_index) {
            Some(level) => level.sqr_visible_distance_threshold(),
            None => return,
        };
        if sqr_distance < request_threshold {
            self.request_mesh(collider_index, settings, requester);
        }

        if sqr_distance < settings.sqr_collider_generation_distance_threshold() {
            if let Some(mesh) = self.lod_meshes[collider_index].mesh.as_ref() {
                self.collider = Some(Arc::clone(mesh));
                events.push(ChunkEvent::ColliderSet { coord: self.coord });
                log::debug!("chunk {:?}: collider set", self.coord);
            }
        }
    }
}

/// Все чанки + общее состояние, к которому применяются результаты
pub struct ChunkSet {
    pub(super) chunks: HashMap<ChunkCoord, TerrainChunk>,
    pub(super) visible: Vec<ChunkCoord>,
    pub(super) events: Vec<ChunkEvent>,
    pub(super) viewer: Vec2,
    pub(super) tick: u64,
    settings: Arc<TerrainSettings>,
    height_field: Arc<HeightField>,
    next_epoch: u64,
}

impl ChunkSet {
    pub fn new(settings: Arc<TerrainSettings>) -> Self {
        let height_field = Arc::new(HeightField::new(&settings.height_map));
        Self {
            chunks: HashMap::new(),
            visible: Vec::new(),
            events: Vec::new(),
            viewer: Vec2::zero(),
            tick: 0,
            settings,
            height_field,
            next_epoch: 0,
        }
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn get(&self, coord: &ChunkCoord) -> Option<&TerrainChunk> {
        self.chunks.get(coord)
    }

    pub fn contains(&self, coord: &ChunkCoord) -> bool {
        self.chunks.contains_key(coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TerrainChunk> {
        self.chunks.values()
    }

    pub fn visible(&self) -> &[ChunkCoord] {
        &self.visible
    }

    /// Создать чанк и запросить его карту высот
    pub(super) fn create(&mut self, coord: ChunkCoord, requester: &ChunkRequester) {
        if self.chunks.contains_key(&coord) {
            return;
        }
        let mut chunk = TerrainChunk::new(coord, &self.settings, self.next_epoch);
        chunk.last_visible_tick = self.tick;
        self.next_epoch += 1;

        chunk.load(&self.height_field, self.settings.mesh.num_verts_per_line(), requester);
        log::trace!("chunk {:?} created", coord);
        self.chunks.insert(coord, chunk);
    }

    /// Выгрузить чанк (ожидающие результаты будут отброшены)
    pub(super) fn remove(&mut self, coord: &ChunkCoord) -> Option<TerrainChunk> {
        let chunk = self.chunks.remove(coord)?;
        if chunk.visible {
            self.visible.retain(|c| c != coord);
        }
        Some(chunk)
    }

    pub(super) fn update_chunk(&mut self, coord: ChunkCoord, requester: &ChunkRequester) {
        let chunk = match self.chunks.get_mut(&coord) {
            Some(chunk) => chunk,
            None => return,
        };
        let change = chunk.update(self.viewer, self.tick, &self.settings, requester, &mut self.events);
        match change {
            Some(true) => self.visible.push(coord),
            Some(false) => self.visible.retain(|c| *c != coord),
            None => {}
        }
    }

    pub(super) fn update_collision_mesh(&mut self, coord: ChunkCoord, requester: &ChunkRequester) {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.update_collision_mesh(self.viewer, &self.settings, requester, &mut self.events);
        }
    }

    /// Чанк с этим поколением ещё жив
    fn live_chunk(&mut self, coord: ChunkCoord, epoch: u64) -> Option<&mut TerrainChunk> {
        match self.chunks.get_mut(&coord) {
            Some(chunk) if chunk.epoch == epoch => Some(chunk),
            _ => {
                log::trace!("chunk {:?} gone, result dropped", coord);
                None
            }
        }
    }

    fn on_height_map_received(
        &mut self,
        coord: ChunkCoord,
        epoch: u64,
        map: HeightMap,
        requester: &ChunkRequester,
    ) {
        match self.live_chunk(coord, epoch) {
            Some(chunk) => chunk.height_map = Some(Arc::new(map)),
            None => return,
        }
        self.update_chunk(coord, requester);
    }

    fn on_mesh_received(
        &mut self,
        coord: ChunkCoord,
        epoch: u64,
        lod_index: usize,
        mesh: MeshData,
        requester: &ChunkRequester,
    ) {
        let chunk = match self.live_chunk(coord, epoch) {
            Some(chunk) => chunk,
            None => return,
        };
        match chunk.lod_meshes.get_mut(lod_index) {
            Some(slot) if slot.mesh.is_none() => slot.mesh = Some(Arc::new(mesh)),
            Some(_) => log::trace!("chunk {:?}: duplicate mesh for lod index {}", coord, lod_index),
            None => return,
        }

        self.update_chunk(coord, requester);
        if lod_index == self.settings.collider_lod_index() {
            self.update_collision_mesh(coord, requester);
        }
    }
}
