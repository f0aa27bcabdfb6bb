//! Tectonic plate simulation: grow organic plate regions over the tiling,
//! assign each plate a rigid rotation, and measure the pressure that
//! rotation exerts on every plate-boundary tile.

use std::collections::VecDeque;
use std::f64::consts::PI;

use glam::{Quat, Vec3};
use rand::Rng;
use tracing::debug;

use crate::config::GenerationParams;
use crate::noise::OctaveNoise;
use crate::world::topology::GenTile;

/// A rigid tectonic plate and its kinematics.
///
/// `pressure[i]` is the smoothed compression on `boundary[i]`: positive
/// where neighboring plates converge on the tile, negative where they pull
/// away.
#[derive(Debug, Clone)]
pub struct TectonicPlate {
    /// Tile ids belonging to this plate, ascending.
    pub tiles: Vec<u32>,
    /// Tiles with at least one neighbor on a different plate, ascending.
    pub boundary: Vec<u32>,
    pub rotation_axis: Vec3,
    pub angle: f32,
    pub land: bool,
    pub base_height: f32,
    pub pressure: Vec<f32>,
}

/// All plates plus the tile-to-plate index.
#[derive(Debug, Clone)]
pub struct PlateMap {
    pub plates: Vec<TectonicPlate>,
    /// `plate_of[tile]` is the index into `plates`.
    pub plate_of: Vec<u32>,
}

impl PlateMap {
    pub fn plate_of_tile(&self, tile: u32) -> &TectonicPlate {
        &self.plates[self.plate_of[tile as usize] as usize]
    }
}

const UNASSIGNED: u32 = u32::MAX;

/// Uniform point on the unit sphere (cylinder-projection method).
fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    let theta = rng.gen_range(0.0..2.0 * PI);
    let z: f64 = rng.gen_range(-1.0..1.0);
    let circle_radius = (1.0 - z * z).sqrt();
    Vec3::new(
        (circle_radius * theta.cos()) as f32,
        (circle_radius * theta.sin()) as f32,
        z as f32,
    )
}

/// Where a tile "wants" to be after one step of its plate's rotation,
/// minus where it is: the plate-motion velocity at that tile.
fn tile_velocity(center: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    Quat::from_axis_angle(axis, angle) * center - center
}

/// One relaxation round: re-seed every plate at the tile closest to its
/// centroid, then re-grow all plates with a shared breadth-first flood.
/// Growing from centroids rounds the regions out; the shared queue keeps
/// plate sizes balanced.
fn loosen(tiles: &[GenTile], assignment: &[u32], plate_count: u32) -> Vec<u32> {
    let mut members: Vec<Vec<u32>> = vec![Vec::new(); plate_count as usize];
    for (tile, &plate) in assignment.iter().enumerate() {
        if plate != UNASSIGNED {
            members[plate as usize].push(tile as u32);
        }
    }

    let mut next = vec![UNASSIGNED; tiles.len()];
    let mut queue = VecDeque::new();
    for (plate, plate_tiles) in members.iter().enumerate() {
        if plate_tiles.is_empty() {
            continue;
        }
        let centroid = plate_tiles
            .iter()
            .map(|&t| tiles[t as usize].center)
            .sum::<Vec3>()
            / plate_tiles.len() as f32;
        let mut closest = plate_tiles[0];
        let mut closest_dist = f32::INFINITY;
        for &t in plate_tiles {
            let d = tiles[t as usize].center.distance_squared(centroid);
            if d < closest_dist {
                closest_dist = d;
                closest = t;
            }
        }
        next[closest as usize] = plate as u32;
        queue.push_back(closest);
    }

    while let Some(tile) = queue.pop_front() {
        let plate = next[tile as usize];
        for &adjacent in &tiles[tile as usize].neighbors {
            if next[adjacent as usize] == UNASSIGNED {
                next[adjacent as usize] = plate;
                queue.push_back(adjacent);
            }
        }
    }
    next
}

/// Sort plates by their noise value ascending and walk up accumulating tile
/// fraction; plates consumed before the accumulated fraction reaches
/// `sea_fraction` set the cutoff and end up below it (water). A zero sea
/// fraction leaves the cutoff at negative infinity, so every plate is land.
fn land_cutoff(plate_noise_vals: &[f32], members: &[Vec<u32>], tile_count: usize, sea_fraction: f64) -> f32 {
    let mut order: Vec<usize> = (0..plate_noise_vals.len()).collect();
    order.sort_by(|&a, &b| plate_noise_vals[a].total_cmp(&plate_noise_vals[b]));

    let mut cutoff = f32::NEG_INFINITY;
    let mut accumulated = 0.0f64;
    for &plate in &order {
        if accumulated >= sea_fraction {
            break;
        }
        cutoff = plate_noise_vals[plate];
        accumulated += members[plate].len() as f64 / tile_count as f64;
    }
    cutoff
}

/// Grow `params.plates` tectonic plates over the tiling and compute their
/// kinematics and boundary pressures.
pub fn generate_plates(
    tiles: &[GenTile],
    params: &GenerationParams,
    plate_noise: &OctaveNoise,
    rng: &mut impl Rng,
) -> PlateMap {
    let tile_count = tiles.len();

    // Seed each plate at a distinct random tile.
    let mut assignment = vec![UNASSIGNED; tile_count];
    for plate in 0..params.plates {
        let mut tile = rng.gen_range(0..tile_count);
        while assignment[tile] != UNASSIGNED {
            tile = rng.gen_range(0..tile_count);
        }
        assignment[tile] = plate;
    }

    // First round grows the seeds into regions, second round rounds the
    // regions out.
    assignment = loosen(tiles, &assignment, params.plates);
    assignment = loosen(tiles, &assignment, params.plates);
    debug_assert!(assignment.iter().all(|&p| p != UNASSIGNED));

    let mut members: Vec<Vec<u32>> = vec![Vec::new(); params.plates as usize];
    for (tile, &plate) in assignment.iter().enumerate() {
        members[plate as usize].push(tile as u32);
    }

    // Each plate's character comes from one noise sample at its centroid.
    let plate_noise_vals: Vec<f32> = members
        .iter()
        .map(|plate_tiles| {
            if plate_tiles.is_empty() {
                return f32::NEG_INFINITY;
            }
            let centroid = plate_tiles
                .iter()
                .map(|&t| tiles[t as usize].center)
                .sum::<Vec3>()
                / plate_tiles.len() as f32;
            plate_noise.sample(centroid)
        })
        .collect();

    let cutoff = land_cutoff(&plate_noise_vals, &members, tile_count, params.sea_fraction);
    debug!(cutoff, "classified plates against sea fraction");

    let mut plates: Vec<TectonicPlate> = members
        .into_iter()
        .enumerate()
        .map(|(plate, plate_tiles)| {
            let angle = rng.r#gen::<f32>() * 2.0 * PI as f32 / 180.0;
            let rotation_axis = random_unit_vector(rng);
            let noise_val = plate_noise_vals[plate];
            let land = noise_val > cutoff;
            let base_height = if land {
                0.1 + 0.5 * noise_val
            } else {
                -0.1 - 0.5 * noise_val
            };
            let boundary: Vec<u32> = plate_tiles
                .iter()
                .copied()
                .filter(|&t| {
                    tiles[t as usize]
                        .neighbors
                        .iter()
                        .any(|&n| assignment[n as usize] != plate as u32)
                })
                .collect();
            TectonicPlate {
                tiles: plate_tiles,
                boundary,
                rotation_axis,
                angle,
                land,
                base_height,
                pressure: Vec::new(),
            }
        })
        .collect();

    // Raw pressure: for each boundary tile, sum the relative velocity
    // against each foreign neighbor projected onto the direction toward
    // that neighbor. Converging motion comes out positive.
    for plate_idx in 0..plates.len() {
        let pressure: Vec<f32> = plates[plate_idx]
            .boundary
            .iter()
            .map(|&tile| {
                let center = tiles[tile as usize].center;
                let plate = &plates[plate_idx];
                let velocity = tile_velocity(center, plate.rotation_axis, plate.angle);
                tiles[tile as usize]
                    .neighbors
                    .iter()
                    .filter(|&&n| assignment[n as usize] != plate_idx as u32)
                    .map(|&other| {
                        let other_plate = &plates[assignment[other as usize] as usize];
                        let other_center = tiles[other as usize].center;
                        let other_velocity =
                            tile_velocity(other_center, other_plate.rotation_axis, other_plate.angle);
                        let toward_other = (other_center - center).normalize();
                        (velocity - other_velocity).dot(toward_other)
                    })
                    .sum()
            })
            .collect();
        plates[plate_idx].pressure = pressure;
    }

    // Smooth along the boundary so pressure ridges don't alias on diagonal
    // plate edges: average each tile with its strongest boundary neighbor.
    let mut boundary_pos = vec![UNASSIGNED; tile_count];
    for plate in &mut plates {
        for (i, &tile) in plate.boundary.iter().enumerate() {
            boundary_pos[tile as usize] = i as u32;
        }
        let smoothed: Vec<f32> = plate
            .boundary
            .iter()
            .enumerate()
            .map(|(i, &tile)| {
                let own = plate.pressure[i];
                let max_adjacent = tiles[tile as usize]
                    .neighbors
                    .iter()
                    .filter(|&&n| boundary_pos[n as usize] != UNASSIGNED)
                    .map(|&n| plate.pressure[boundary_pos[n as usize] as usize])
                    .fold(f32::NEG_INFINITY, f32::max);
                if max_adjacent == f32::NEG_INFINITY {
                    own
                } else {
                    own * 0.5 + max_adjacent * 0.5
                }
            })
            .collect();
        for &tile in &plate.boundary {
            boundary_pos[tile as usize] = UNASSIGNED;
        }
        plate.pressure = smoothed;
    }

    PlateMap {
        plates,
        plate_of: assignment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::topology::build_tiling;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(seed: u64, params: &GenerationParams) -> PlateMap {
        let tiles = build_tiling(params.size);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let noise = OctaveNoise::new(&mut rng, 8, 0.8, 0.5);
        generate_plates(&tiles, params, &noise, &mut rng)
    }

    fn small_params() -> GenerationParams {
        GenerationParams {
            size: 2,
            plates: 5,
            ..GenerationParams::default()
        }
    }

    #[test]
    fn plates_partition_the_tiling() {
        let params = small_params();
        let map = setup(7, &params);
        assert_eq!(map.plates.len(), 5);
        assert_eq!(map.plate_of.len(), 92);

        let mut seen = vec![false; 92];
        for (p, plate) in map.plates.iter().enumerate() {
            assert!(!plate.tiles.is_empty(), "Plate {} has no tiles", p);
            for &t in &plate.tiles {
                assert!(!seen[t as usize], "Tile {} is in two plates", t);
                seen[t as usize] = true;
                assert_eq!(
                    map.plate_of[t as usize], p as u32,
                    "plate_of disagrees with plate {} membership",
                    p
                );
            }
        }
        assert!(seen.iter().all(|&s| s), "Some tile belongs to no plate");
    }

    #[test]
    fn boundary_tiles_have_foreign_neighbors() {
        let params = small_params();
        let map = setup(7, &params);
        let tiles = build_tiling(params.size);
        for plate in &map.plates {
            for &t in &plate.tiles {
                let foreign = tiles[t as usize]
                    .neighbors
                    .iter()
                    .any(|&n| map.plate_of[n as usize] != map.plate_of[t as usize]);
                assert_eq!(
                    plate.boundary.contains(&t),
                    foreign,
                    "Boundary flag wrong for tile {}",
                    t
                );
            }
        }
    }

    #[test]
    fn pressure_aligned_with_boundary() {
        let params = small_params();
        let map = setup(7, &params);
        for (p, plate) in map.plates.iter().enumerate() {
            assert_eq!(
                plate.pressure.len(),
                plate.boundary.len(),
                "Plate {} pressure/boundary mismatch",
                p
            );
            assert!(
                plate.pressure.iter().all(|v| v.is_finite()),
                "Plate {} has non-finite pressure",
                p
            );
        }
    }

    #[test]
    fn same_seed_same_plates() {
        let params = small_params();
        let a = setup(42, &params);
        let b = setup(42, &params);
        assert_eq!(a.plate_of, b.plate_of);
        for (pa, pb) in a.plates.iter().zip(b.plates.iter()) {
            assert_eq!(pa.tiles, pb.tiles);
            assert_eq!(pa.angle, pb.angle);
            assert_eq!(pa.rotation_axis, pb.rotation_axis);
            assert_eq!(pa.pressure, pb.pressure);
        }
    }

    #[test]
    fn zero_sea_fraction_makes_every_plate_land() {
        let params = GenerationParams {
            sea_fraction: 0.0,
            ..small_params()
        };
        let map = setup(3, &params);
        assert!(
            map.plates.iter().all(|p| p.land),
            "Expected all plates land with sea_fraction 0"
        );
    }

    #[test]
    fn full_sea_fraction_makes_every_plate_water() {
        let params = GenerationParams {
            sea_fraction: 1.0,
            ..small_params()
        };
        let map = setup(3, &params);
        assert!(
            map.plates.iter().all(|p| !p.land),
            "Expected all plates water with sea_fraction 1"
        );
    }

    #[test]
    fn single_plate_has_no_boundary() {
        let params = GenerationParams {
            plates: 1,
            sea_fraction: 0.0,
            ..small_params()
        };
        let map = setup(11, &params);
        assert_eq!(map.plates.len(), 1);
        assert!(map.plates[0].boundary.is_empty());
        assert!(map.plates[0].pressure.is_empty());
        assert!(map.plates[0].land);
    }
}
