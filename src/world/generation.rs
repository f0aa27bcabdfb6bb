use std::collections::HashMap;

use glam::Vec3;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::generation::{GenerationParams, NoiseParams};
use crate::mapgen::climate::{generate_heat, generate_moisture};
use crate::mapgen::elevation::{base_elevations, normalize_sea_level, perturb_elevations};
use crate::mapgen::erosion::erode;
use crate::mapgen::plates::generate_plates;
use crate::mapgen::rivers::route_rivers;
use crate::mapgen::terrain::classify;
use crate::noise::OctaveNoise;
use crate::world::tile::{GenTerrain, TerrainMajorFeature, Tile, TilePolygon};
use crate::world::topology::{build_tiling, GenTile};
use crate::world::World;

fn octave_noise(rng: &mut impl Rng, params: &NoiseParams) -> OctaveNoise {
    OctaveNoise::new(
        rng,
        params.octaves,
        params.amplitude_scale,
        params.frequency_scale,
    )
}

/// Generate a new world from the given parameters.
///
/// If `params.seed` is 0, a random seed is chosen. The actual seed used is
/// stored in the returned World's `generation_params` for reproducibility.
pub fn generate_world(params: &GenerationParams) -> Result<World, String> {
    params.validate()?;

    let seed = if params.seed == 0 {
        rand::thread_rng().r#gen()
    } else {
        params.seed
    };
    let resolved_params = GenerationParams {
        seed,
        ..params.clone()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Noise channels are seeded up front, in a fixed order, so each field
    // stays independent of how much randomness the stages in between
    // consume.
    let plate_noise = octave_noise(&mut rng, &params.plate_height_noise);
    let heat_noise = octave_noise(&mut rng, &params.heat_noise);
    let moisture_noise = octave_noise(&mut rng, &params.moisture_noise);
    let terrain_noise = octave_noise(&mut rng, &params.terrain_noise);
    let tile_noise = octave_noise(&mut rng, &params.tile_height_noise);

    info!(size = params.size, tiles = params.tile_count(), "building geodesic tiling");
    let tiles = build_tiling(params.size);

    info!(plates = params.plates, "simulating tectonic plates");
    let plates = generate_plates(&tiles, &resolved_params, &plate_noise, &mut rng);

    info!("computing elevations");
    let mut elevations = base_elevations(&tiles, &plates, &resolved_params);
    perturb_elevations(&tiles, &mut elevations, &tile_noise, params.tile_height_mult);
    normalize_sea_level(&mut elevations, params.sea_fraction);

    info!("simulating erosion");
    let erosion = erode(&tiles, &elevations, params.epsilon, params.size * 10);

    info!("generating climate");
    let heat = generate_heat(&tiles, &erosion.elevations, &heat_noise);
    let moisture = generate_moisture(&tiles, &moisture_noise);

    info!(rivers = params.num_rivers, "routing rivers");
    let rivers = route_rivers(
        &tiles,
        &erosion.elevations,
        &erosion.riverness,
        &moisture,
        params.num_rivers,
        params.effective_min_river_length(),
        &mut rng,
    );

    info!("classifying terrain");
    let terrain = classify(
        &tiles,
        &erosion.elevations,
        &heat,
        &moisture,
        &rivers,
        &terrain_noise,
        &mut rng,
    )?;

    info!("assembling world");
    let world_tiles = assemble_tiles(&tiles, terrain, &erosion.elevations, &heat, &moisture);

    Ok(World::new(
        format!("World-{}", seed),
        resolved_params,
        world_tiles,
    ))
}

/// Pick the vertex rotation and direction that gives every polygon the same
/// winding relative to the +Y reference axis: start at the topmost vertex
/// and walk whichever way keeps the winding consistent. Tiles whose center
/// is colinear with the axis have no well-defined "topmost" side, so they
/// fall back to direction -1.
fn canonical_winding(tile: &GenTile) -> (usize, i32) {
    let verts = &tile.vertices;
    let mut index = 0;
    let mut value = verts[0].dot(Vec3::Y);
    for (i, v) in verts.iter().enumerate().skip(1) {
        let dot = v.dot(Vec3::Y);
        if dot > value {
            value = dot;
            index = i;
        }
    }

    let n = verts.len();
    let center_unit = tile.center.normalize();
    let direction = if center_unit.dot(Vec3::Y).abs() >= 1.0 - 1e-6 {
        -1
    } else {
        let axis = center_unit.cross(Vec3::Y).normalize();
        let next = (tile.center - verts[(index + 1) % n]).normalize().dot(axis);
        let prev = (tile.center - verts[(index + n - 1) % n]).normalize().dot(axis);
        if next >= prev { -1 } else { 1 }
    };
    (index, direction)
}

/// Turn generation tiles plus their simulated fields into finished tiles:
/// project polygon vertices onto the unit sphere, rewind them canonically,
/// and remap adjacency so `neighbors[i]` still shares the edge from
/// `vertices[i]` to `vertices[i + 1]`.
fn assemble_tiles(
    tiles: &[GenTile],
    terrain: Vec<GenTerrain>,
    elevations: &[f32],
    heat: &[f32],
    moisture: &[f32],
) -> Vec<Tile> {
    tiles
        .iter()
        .zip(terrain)
        .enumerate()
        .map(|(t, (tile, terr))| {
            let n = tile.vertices.len();
            let (index, direction) = canonical_winding(tile);

            let vertices: Vec<Vec3> = (0..n)
                .map(|j| {
                    let pos = (index as i32 + direction * j as i32).rem_euclid(n as i32);
                    tile.vertices[pos as usize].normalize()
                })
                .collect();
            let center = vertices.iter().copied().sum::<Vec3>() / n as f32;
            let normal = vertices
                .iter()
                .enumerate()
                .map(|(j, &v)| (v - center).cross(vertices[(j + 1) % n] - center).normalize())
                .sum::<Vec3>()
                .normalize();

            // vertices[j] came from ring slot index + direction * j; the
            // edge to vertices[j + 1] belongs to the ring slot it starts
            // from when walking forward, and to the slot it lands on when
            // walking backward.
            let neighbors: Vec<u32> = (0..n)
                .map(|j| {
                    let pos = if direction == 1 {
                        ((index + j) % n) as i32
                    } else {
                        (index as i32 - j as i32 - 1).rem_euclid(n as i32)
                    };
                    tile.neighbors[pos as usize]
                })
                .collect();

            Tile {
                id: t as u32,
                polygon: TilePolygon {
                    center,
                    vertices,
                    normal,
                },
                neighbors,
                terrain: terr,
                elevation: elevations[t],
                heat: heat[t],
                moisture: moisture[t],
            }
        })
        .collect()
}

/// Print a summary of the generated world.
pub fn print_world_summary(world: &World) {
    println!("=== World Summary ===");
    println!("Name: {}", world.name);
    println!("Tiles: {}", world.tile_count());
    println!("Seed: {}", world.generation_params.seed);
    println!(
        "Pentagons: {}  Hexagons: {}  Vertices: {}  Triangles: {}",
        world.num_pentagons, world.num_hexagons, world.num_vertices, world.num_triangles
    );

    let mut terrain_counts: HashMap<&str, u32> = HashMap::new();
    for tile in &world.tiles {
        *terrain_counts
            .entry(tile.terrain.terrain_type.name())
            .or_insert(0) += 1;
    }
    let mut terrain_sorted: Vec<_> = terrain_counts.into_iter().collect();
    terrain_sorted.sort_by_key(|&(name, _)| name);
    println!("\nTerrain:");
    for (name, count) in &terrain_sorted {
        let pct = *count as f32 / world.tile_count() as f32 * 100.0;
        println!("  {:<12} {:>5} ({:.1}%)", name, count, pct);
    }

    let mut shape_counts: HashMap<String, u32> = HashMap::new();
    for tile in &world.tiles {
        *shape_counts
            .entry(format!("{:?}", tile.terrain.shape))
            .or_insert(0) += 1;
    }
    let mut shape_sorted: Vec<_> = shape_counts.into_iter().collect();
    shape_sorted.sort_by(|a, b| a.0.cmp(&b.0));
    println!("\nShapes:");
    for (name, count) in &shape_sorted {
        let pct = *count as f32 / world.tile_count() as f32 * 100.0;
        println!("  {:<12} {:>5} ({:.1}%)", name, count, pct);
    }

    let rivers = world.tiles.iter().filter(|t| t.terrain.has_river()).count();
    let forests = world
        .tiles
        .iter()
        .filter(|t| t.terrain.major_feature != TerrainMajorFeature::None)
        .count();
    println!("\nRiver tiles: {}", rivers);
    println!("Forested tiles: {}", forests);
}
