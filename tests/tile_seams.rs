// Соседние тайлы в Global режиме должны совпадать на общем ребре
// при любом сочетании LOD.

use std::collections::HashMap;

use ultraviolet::{Vec2, Vec3};

use lod_terrain::terrain::generation::HeightField;
use lod_terrain::terrain::settings::{MeshSettings, NormalizeMode, TerrainSettings};
use lod_terrain::{tessellate, ChunkCoord, MeshData};

const GRID: i32 = 4;

fn settings() -> TerrainSettings {
    let mut s = TerrainSettings::default();
    s.mesh = MeshSettings { mesh_scale: 2.5, chunk_size_index: 0, ..Default::default() };
    s.height_map.noise.normalize_mode = NormalizeMode::Global;
    s.height_map.noise.seed = 42;
    s.height_map.noise.octaves = 4;
    s.validated()
}

fn lod_for(coord: ChunkCoord) -> u32 {
    ((coord.x + 2 * coord.y).rem_euclid(5)) as u32
}

/// Меши тайлов 4x4 (LOD по формуле или одинаковый)
fn build_tiles(settings: &TerrainSettings, fixed_lod: Option<u32>) -> HashMap<ChunkCoord, MeshData> {
    let field = HeightField::new(&settings.height_map);
    let n = settings.mesh.num_verts_per_line();
    let world_size = settings.mesh.mesh_world_size();

    let mut tiles = HashMap::new();
    for y in 0..GRID {
        for x in 0..GRID {
            let coord = ChunkCoord::new(x, y);
            let map = field.generate(n, n, coord.sample_centre(world_size, settings.mesh.mesh_scale));
            let lod = fixed_lod.unwrap_or_else(|| lod_for(coord));
            tiles.insert(coord, tessellate(&map, &settings.mesh, lod));
        }
    }
    tiles
}

/// Вершины на ребре тайла: ключ = координата вдоль ребра в шагах сетки
fn edge_vertices(
    mesh: &MeshData,
    step: f32,
    on_edge: impl Fn(Vec3) -> bool,
    along: impl Fn(Vec3) -> f32,
) -> HashMap<i64, (Vec3, Vec3)> {
    mesh.vertices
        .iter()
        .zip(&mesh.normals)
        .filter(|(p, _)| on_edge(**p))
        .map(|(p, n)| (((along(*p)) / step).round() as i64, (*p, *n)))
        .collect()
}

/// same_lod: все тайлы одного LOD; высоты на ребре должны совпадать побитно, нормали тоже сравниваются
fn check_pairs(tiles: &HashMap<ChunkCoord, MeshData>, settings: &TerrainSettings, same_lod: bool) {
    let world_size = settings.mesh.mesh_world_size();
    let half = world_size / 2.0;
    let step = settings.mesh.mesh_scale;
    let eps = step * 0.01;
    let expected = (settings.mesh.num_verts_per_line() - 2) as usize;

    for y in 0..GRID {
        for x in 0..GRID {
            let coord = ChunkCoord::new(x, y);
            let a = &tiles[&coord];
            let origin_a = coord.world_centre(world_size);

            let neighbours = [
                // Справа: +x, общий край local x = +half / -half
                (ChunkCoord::new(x + 1, y), true),
                // Сверху: +y мира = +z меша
                (ChunkCoord::new(x, y + 1), false),
            ];
            for (other, horizontal) in neighbours {
                let b = match tiles.get(&other) {
                    Some(b) => b,
                    None => continue,
                };
                let origin_b = other.world_centre(world_size);

                let (edge_a, edge_b) = if horizontal {
                    (
                        edge_vertices(a, step, |p| (p.x - half).abs() < eps, |p| p.z + origin_a.y),
                        edge_vertices(b, step, |p| (p.x + half).abs() < eps, |p| p.z + origin_b.y),
                    )
                } else {
                    (
                        edge_vertices(a, step, |p| (p.z - half).abs() < eps, |p| p.x + origin_a.x),
                        edge_vertices(b, step, |p| (p.z + half).abs() < eps, |p| p.x + origin_b.x),
                    )
                };

                assert_eq!(edge_a.len(), expected, "{:?} edge", coord);
                assert_eq!(edge_b.len(), expected, "{:?} edge", other);

                for (key, (pa, na)) in &edge_a {
                    let (pb, nb) = edge_b
                        .get(key)
                        .unwrap_or_else(|| panic!("{:?}/{:?}: no partner for {}", coord, other, key));
                    let wa = Vec2::new(pa.x, pa.z) + origin_a;
                    let wb = Vec2::new(pb.x, pb.z) + origin_b;
                    assert!((wa - wb).mag() < 1e-2, "{:?}/{:?}: position {:?} vs {:?}", coord, other, wa, wb);
                    if same_lod {
                        assert_eq!(pa.y.to_bits(), pb.y.to_bits(), "{:?}/{:?}: height {} vs {}", coord, other, pa.y, pb.y);
                    } else {
                        assert!(
                            (pa.y - pb.y).abs() < 1e-3,
                            "{:?}/{:?}: height {} vs {}",
                            coord,
                            other,
                            pa.y,
                            pb.y
                        );
                    }
                    if same_lod {
                        assert!((*na - *nb).mag() < 1e-3, "{:?}/{:?}: normal {:?} vs {:?}", coord, other, na, nb);
                    }
                }
            }
        }
    }
}

#[test]
fn test_mixed_lod_tiles_share_edge_heights() {
    let s = settings();
    let tiles = build_tiles(&s, None);
    check_pairs(&tiles, &s, false);
}

#[test]
fn test_same_lod_tiles_share_edge_normals() {
    let s = settings();
    let tiles = build_tiles(&s, Some(0));
    check_pairs(&tiles, &s, true);
}

#[test]
fn test_every_lod_present_in_grid() {
    let mut lods: Vec<u32> = (0..GRID)
        .flat_map(|y| (0..GRID).map(move |x| lod_for(ChunkCoord::new(x, y))))
        .collect();
    lods.sort();
    lods.dedup();
    assert_eq!(lods, vec![0, 1, 2, 3, 4]);
}
