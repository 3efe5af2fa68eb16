// ============================================
// Chunk Coord - Идентификатор чанка и его границы
// ============================================

use ultraviolet::Vec2;

/// Целочисленная координата чанка на плоскости (x, y)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Чанк, в котором лежит точка (округление к ближайшему центру)
    pub fn containing(position: Vec2, mesh_world_size: f32) -> Self {
        Self {
            x: (position.x / mesh_world_size).round() as i32,
            y: (position.y / mesh_world_size).round() as i32,
        }
    }

    #[inline]
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Центр чанка в мире
    #[inline]
    pub fn world_centre(&self, mesh_world_size: f32) -> Vec2 {
        self.as_vec2() * mesh_world_size
    }

    /// Центр выборки шума: мировой центр в единицах сетки высот
    #[inline]
    pub fn sample_centre(&self, mesh_world_size: f32, mesh_scale: f32) -> Vec2 {
        self.world_centre(mesh_world_size) / mesh_scale
    }
}

/// Осевой квадрат чанка на плоскости
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Bounds2 {
    pub centre: Vec2,
    pub size: Vec2,
}

impl Bounds2 {
    pub fn new(centre: Vec2, size: Vec2) -> Self {
        Self { centre, size }
    }

    pub fn for_chunk(coord: ChunkCoord, mesh_world_size: f32) -> Self {
        Self::new(
            coord.world_centre(mesh_world_size),
            Vec2::broadcast(mesh_world_size),
        )
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.centre - self.size * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.centre + self.size * 0.5
    }

    /// Квадрат расстояния от точки до квадрата (0 внутри)
    pub fn sqr_distance(&self, point: Vec2) -> f32 {
        let (min, max) = (self.min(), self.max());
        let dx = (min.x - point.x).max(0.0).max(point.x - max.x);
        let dy = (min.y - point.y).max(0.0).max(point.y - max.y);
        dx * dx + dy * dy
    }
}
