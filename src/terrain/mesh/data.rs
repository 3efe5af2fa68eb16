// ============================================
// Mesh Data - Геометрия чанка + вспомогательная рамка
// ============================================
//
// Вершины "вне меша" (внешнее кольцо сетки высот) и их треугольники
// участвуют только в накоплении нормалей граничных вершин и отбрасываются
// при финализации, поэтому у соседних чанков нет шва освещения.

use ultraviolet::{Vec2, Vec3};

use crate::terrain::generation::get_color;
use crate::terrain::settings::TextureSettings;
use super::vertex::TerrainVertex;

/// Готовый меш чанка
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub lod: u32,
    pub flat_shaded: bool,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Вершины для рендера с цветом по высоте
    pub fn to_vertices(&self, texture: &TextureSettings, min_height: f32, max_height: f32) -> Vec<TerrainVertex> {
        self.vertices
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| {
                let color = get_color(texture, p.y, min_height, max_height);
                TerrainVertex::new([p.x, p.y, p.z], [n.x, n.y, n.z], [uv.x, uv.y], color)
            })
            .collect()
    }

    /// Треугольники как тройки индексов (для коллизий)
    pub fn triangle_indices(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Ссылка на вершину при построении
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum VertexRef {
    Mesh(u32),
    OutOfMesh(u32),
}

/// Нормаль треугольника; вырожденный треугольник даёт ноль
#[inline]
pub(super) fn surface_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let n = (b - a).cross(c - a);
    let mag_sq = n.mag_sq();
    if mag_sq > f32::EPSILON * f32::EPSILON {
        n / mag_sq.sqrt()
    } else {
        Vec3::zero()
    }
}

#[inline]
fn normalize_or_up(n: Vec3) -> Vec3 {
    let mag_sq = n.mag_sq();
    if mag_sq > f32::EPSILON * f32::EPSILON {
        n / mag_sq.sqrt()
    } else {
        Vec3::unit_y()
    }
}

/// Построитель меша: основные + вспомогательные вершины
pub(super) struct MeshBuilder {
    vertices: Vec<Vec3>,
    uvs: Vec<Vec2>,
    triangles: Vec<u32>,
    out_of_mesh_vertices: Vec<Vec3>,
    out_of_mesh_triangles: Vec<[VertexRef; 3]>,
    lod: u32,
    use_flat_shading: bool,
}

impl MeshBuilder {
    pub fn new(
        mesh_vertex_count: usize,
        out_of_mesh_vertex_count: usize,
        triangle_capacity: usize,
        lod: u32,
        use_flat_shading: bool,
    ) -> Self {
        Self {
            vertices: vec![Vec3::zero(); mesh_vertex_count],
            uvs: vec![Vec2::zero(); mesh_vertex_count],
            triangles: Vec::with_capacity(triangle_capacity * 3),
            out_of_mesh_vertices: vec![Vec3::zero(); out_of_mesh_vertex_count],
            out_of_mesh_triangles: Vec::new(),
            lod,
            use_flat_shading,
        }
    }

    pub fn add_vertex(&mut self, position: Vec3, uv: Vec2, slot: VertexRef) {
        match slot {
            VertexRef::Mesh(i) => {
                self.vertices[i as usize] = position;
                self.uvs[i as usize] = uv;
            }
            VertexRef::OutOfMesh(i) => {
                self.out_of_mesh_vertices[i as usize] = position;
            }
        }
    }

    pub fn add_triangle(&mut self, a: VertexRef, b: VertexRef, c: VertexRef) {
        match (a, b, c) {
            (VertexRef::Mesh(a), VertexRef::Mesh(b), VertexRef::Mesh(c)) => {
                self.triangles.extend_from_slice(&[a, b, c]);
            }
            _ => self.out_of_mesh_triangles.push([a, b, c]),
        }
    }

    #[inline]
    fn position(&self, r: VertexRef) -> Vec3 {
        match r {
            VertexRef::Mesh(i) => self.vertices[i as usize],
            VertexRef::OutOfMesh(i) => self.out_of_mesh_vertices[i as usize],
        }
    }

    /// Нормали по всем треугольникам, включая вспомогательные
    fn bake_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::zero(); self.vertices.len()];

        for tri in self.triangles.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let n = surface_normal(self.vertices[a], self.vertices[b], self.vertices[c]);
            normals[a] += n;
            normals[b] += n;
            normals[c] += n;
        }

        for tri in &self.out_of_mesh_triangles {
            let n = surface_normal(self.position(tri[0]), self.position(tri[1]), self.position(tri[2]));
            for r in tri {
                if let VertexRef::Mesh(i) = *r {
                    normals[i as usize] += n;
                }
            }
        }

        normals.into_iter().map(normalize_or_up).collect()
    }

    /// Финализация: рамка отбрасывается
    pub fn finish(self) -> MeshData {
        if self.use_flat_shading {
            return self.finish_flat_shaded();
        }
        let normals = self.bake_normals();
        MeshData {
            vertices: self.vertices,
            triangles: self.triangles,
            uvs: self.uvs,
            normals,
            lod: self.lod,
            flat_shaded: false,
        }
    }

    /// Отдельная вершина на каждый угол треугольника, нормаль = нормаль грани
    fn finish_flat_shaded(self) -> MeshData {
        let corner_count = self.triangles.len();
        let mut vertices = Vec::with_capacity(corner_count);
        let mut uvs = Vec::with_capacity(corner_count);
        let mut normals = Vec::with_capacity(corner_count);

        for tri in self.triangles.chunks_exact(3) {
            let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = normalize_or_up(surface_normal(
                self.vertices[corners[0]],
                self.vertices[corners[1]],
                self.vertices[corners[2]],
            ));
            for i in corners {
                vertices.push(self.vertices[i]);
                uvs.push(self.uvs[i]);
                normals.push(face);
            }
        }

        MeshData {
            vertices,
            triangles: (0..corner_count as u32).collect(),
            uvs,
            normals,
            lod: self.lod,
            flat_shaded: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_normal_points_up_for_grid_winding() {
        // (a, d, c) в сетке, где y сетки идёт в -z
        let a = Vec3::new(0.0, 0.0, 0.0);
        let d = Vec3::new(1.0, 0.0, -1.0);
        let c = Vec3::new(0.0, 0.0, -1.0);
        let n = surface_normal(a, d, c);
        assert!((n - Vec3::unit_y()).mag() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_contributes_nothing() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(surface_normal(p, p, p), Vec3::zero());
    }

    #[test]
    fn test_out_of_mesh_triangles_affect_normals_only() {
        let mut b = MeshBuilder::new(2, 1, 1, 0, false);
        b.add_vertex(Vec3::new(0.0, 0.0, 0.0), Vec2::zero(), VertexRef::Mesh(0));
        b.add_vertex(Vec3::new(1.0, 0.0, 0.0), Vec2::zero(), VertexRef::Mesh(1));
        b.add_vertex(Vec3::new(0.0, 1.0, -1.0), Vec2::zero(), VertexRef::OutOfMesh(0));
        b.add_triangle(VertexRef::Mesh(0), VertexRef::Mesh(1), VertexRef::OutOfMesh(0));
        let mesh = b.finish();
        assert_eq!(mesh.vertices.len(), 2);
        assert!(mesh.triangles.is_empty());
        // Нормаль наклонного треугольника, а не запасная (0,1,0)
        assert!(mesh.normals[0].z.abs() > 0.1);
        assert!((mesh.normals[0].mag() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_to_vertices_carries_attributes() {
        let mut b = MeshBuilder::new(3, 0, 1, 0, false);
        b.add_vertex(Vec3::new(0.0, 0.0, 0.0), Vec2::new(0.0, 0.0), VertexRef::Mesh(0));
        b.add_vertex(Vec3::new(1.0, 10.0, -1.0), Vec2::new(1.0, 1.0), VertexRef::Mesh(1));
        b.add_vertex(Vec3::new(0.0, 0.0, -1.0), Vec2::new(0.0, 1.0), VertexRef::Mesh(2));
        b.add_triangle(VertexRef::Mesh(0), VertexRef::Mesh(1), VertexRef::Mesh(2));
        let mesh = b.finish();

        let texture = TextureSettings::default();
        let vertices = mesh.to_vertices(&texture, 0.0, 10.0);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 10.0, -1.0]);
        assert_eq!(vertices[1].uv, [1.0, 1.0]);
        // Низ и верх раскрашены разными слоями
        assert_ne!(vertices[0].color, vertices[1].color);
        assert_eq!(mesh.triangle_indices().collect::<Vec<_>>(), vec![[0, 1, 2]]);
    }
}
