// ============================================
// Mesh Tessellator - Карта высот -> треугольная сетка с LOD
// ============================================
//
// Классы вершин по кольцам сетки n x n:
//   кольцо 0      - вне меша (только для нормалей)
//   кольцо 1      - край меша, всегда полное разрешение
//   кольцо 2      - стыковочные вершины, высота интерполируется между главными
//   внутри        - главные вершины с шагом skip, остальные пропускаются
//
// Кольца 1 и 2 одинаковы на любом LOD, поэтому соседние чанки с разным LOD
// стыкуются без трещин.

use ultraviolet::{Vec2, Vec3};

use crate::terrain::generation::HeightMap;
use crate::terrain::grid::Grid2;
use crate::terrain::lod::skip_increment;
use crate::terrain::settings::{MeshSettings, NUM_SUPPORTED_LODS};
use super::data::{MeshBuilder, MeshData, VertexRef};

/// Минимальная сетка: кольцо 0, кольцо 1, кольцо 2 с каждой стороны
const MIN_VERTS_PER_LINE: u32 = 6;

/// Класс вершины по положению в сетке
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexKind {
    OutOfMesh,
    MeshEdge,
    Main,
    EdgeConnection,
    Skipped,
}

#[inline]
fn classify(x: u32, y: u32, n: u32, skip: u32) -> VertexKind {
    if x == 0 || y == 0 || x == n - 1 || y == n - 1 {
        return VertexKind::OutOfMesh;
    }
    if x == 1 || y == 1 || x == n - 2 || y == n - 2 {
        return VertexKind::MeshEdge;
    }
    // Здесь x, y >= 2
    let aligned = (x - 2) % skip == 0 && (y - 2) % skip == 0;
    if aligned {
        return VertexKind::Main;
    }
    if x == 2 || y == 2 || x == n - 3 || y == n - 3 {
        return VertexKind::EdgeConnection;
    }
    VertexKind::Skipped
}

/// Высота стыковочной вершины: линейно между двумя главными на том же ребре
fn edge_connection_height(height_map: &HeightMap, x: u32, y: u32, n: u32, skip: u32) -> f32 {
    let vertical = x == 2 || x == n - 3;
    let along = if vertical { y - 2 } else { x - 2 };
    let dst_main_a = along % skip;
    let dst_main_b = skip - dst_main_a;
    let t = dst_main_a as f32 / skip as f32;

    let (a, b) = if vertical {
        ((x, y - dst_main_a), (x, (y + dst_main_b).min(n - 3)))
    } else {
        ((x - dst_main_a, y), ((x + dst_main_b).min(n - 3), y))
    };

    height_map.get(a.0, a.1) * (1.0 - t) + height_map.get(b.0, b.1) * t
}

/// Построить меш чанка для уровня детализации lod (0..=4)
pub fn tessellate(height_map: &HeightMap, mesh_settings: &MeshSettings, lod: u32) -> MeshData {
    let lod = if lod >= NUM_SUPPORTED_LODS {
        log::warn!("LOD {} out of range, clamped to {}", lod, NUM_SUPPORTED_LODS - 1);
        NUM_SUPPORTED_LODS - 1
    } else {
        lod
    };
    let use_flat_shading = mesh_settings.use_flat_shading;

    let n = height_map.width().min(height_map.height());
    if n < MIN_VERTS_PER_LINE {
        log::warn!("height map {}x{} too small to tessellate", height_map.width(), height_map.height());
        return MeshBuilder::new(0, 0, 0, lod, use_flat_shading).finish();
    }

    let skip = skip_increment(lod);
    if (n - 5) % skip != 0 {
        log::warn!("{} vertices per line not aligned to LOD {} step {}", n, lod, skip);
    }

    // Проход 1: классификация и индексы
    let mut mesh_count = 0u32;
    let mut out_of_mesh_count = 0u32;
    let index_map = Grid2::from_fn(n, n, |x, y| match classify(x, y, n, skip) {
        VertexKind::OutOfMesh => {
            out_of_mesh_count += 1;
            Some(VertexRef::OutOfMesh(out_of_mesh_count - 1))
        }
        VertexKind::Skipped => None,
        _ => {
            mesh_count += 1;
            Some(VertexRef::Mesh(mesh_count - 1))
        }
    });

    let main_per_line = (n - 5) / skip + 1;
    let triangle_capacity = 8 * (n - 4) + 2 * (main_per_line - 1) * (main_per_line - 1);
    let mut builder = MeshBuilder::new(
        mesh_count as usize,
        out_of_mesh_count as usize,
        triangle_capacity as usize,
        lod,
        use_flat_shading,
    );

    let world_size = (n - 3) as f32 * mesh_settings.mesh_scale;
    let top_left = Vec2::new(-world_size / 2.0, world_size / 2.0);
    let span = (n - 3) as f32;

    // Проход 2: вершины и треугольники
    for y in 0..n {
        for x in 0..n {
            let slot = match *index_map.get(x, y) {
                Some(slot) => slot,
                None => continue,
            };
            let kind = classify(x, y, n, skip);

            let percent = Vec2::new((x as f32 - 1.0) / span, (y as f32 - 1.0) / span);
            let position_2d = top_left + Vec2::new(percent.x, -percent.y) * world_size;

            let height = if kind == VertexKind::EdgeConnection {
                edge_connection_height(height_map, x, y, n, skip)
            } else {
                height_map.get(x, y)
            };

            builder.add_vertex(Vec3::new(position_2d.x, height, position_2d.y), percent, slot);

            let creates_triangles = x < n - 1
                && y < n - 1
                && (kind != VertexKind::EdgeConnection || (x != 2 && y != 2));
            if !creates_triangles {
                continue;
            }

            let step = if kind == VertexKind::Main && x + skip <= n - 3 && y + skip <= n - 3 {
                skip
            } else {
                1
            };

            let corners = (
                *index_map.get(x + step, y),
                *index_map.get(x, y + step),
                *index_map.get(x + step, y + step),
            );
            if let (Some(b), Some(c), Some(d)) = corners {
                builder.add_triangle(slot, d, c);
                builder.add_triangle(d, slot, b);
            }
        }
    }

    builder.finish()
}
