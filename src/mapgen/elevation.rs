//! Elevation from plate kinematics: plate base heights, boundary pressure
//! effects, per-tile noise perturbation, and sea-level renormalization.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::GenerationParams;
use crate::noise::OctaveNoise;
use crate::world::topology::GenTile;

use super::plates::PlateMap;

/// Seed every tile with its plate's base height, then apply boundary
/// pressure: converging similar plates pile up (or trench down), a land
/// plate pressing into a water plate regresses toward the neighbor and
/// lifts the strip of interior tiles just behind the boundary.
pub fn base_elevations(tiles: &[GenTile], plates: &PlateMap, params: &GenerationParams) -> Vec<f32> {
    let mut elevations = vec![0.0f32; tiles.len()];
    for plate in &plates.plates {
        for &tile in &plate.tiles {
            elevations[tile as usize] = plate.base_height;
        }
    }

    for (plate_idx, plate) in plates.plates.iter().enumerate() {
        // Interior tiles adjacent to a land/water collision boundary, to be
        // lifted (or sunk) in a second pass.
        let mut collision_backfill: BTreeSet<u32> = BTreeSet::new();

        for (i, &tile) in plate.boundary.iter().enumerate() {
            let pressure = plate.pressure[i];
            let foreign: Vec<u32> = tiles[tile as usize]
                .neighbors
                .iter()
                .copied()
                .filter(|&n| plates.plate_of[n as usize] != plate_idx as u32)
                .collect();
            let per_neighbor = pressure / foreign.len() as f32;

            let mut delta = 0.0f32;
            for &other in &foreign {
                let other_plate = plates.plate_of_tile(other);
                if plate.land == other_plate.land {
                    delta += per_neighbor * params.similar_collision_coef;
                } else if pressure > 0.0 {
                    collision_backfill.extend(
                        tiles[tile as usize]
                            .neighbors
                            .iter()
                            .copied()
                            .filter(|&n| {
                                plates.plate_of[n as usize] == plate_idx as u32
                                    && !plate.boundary.contains(&n)
                            }),
                    );
                    let coef = (per_neighbor * params.diff_regression_coef).min(0.5);
                    delta += coef * (elevations[other as usize] - elevations[tile as usize]);
                } else {
                    delta += per_neighbor * params.similar_collision_coef;
                }
            }
            elevations[tile as usize] += delta;
        }

        let boundary_pressure = |tile: u32| {
            tiles[tile as usize]
                .neighbors
                .iter()
                .filter_map(|&n| {
                    plate
                        .boundary
                        .iter()
                        .position(|&b| b == n)
                        .map(|pos| plate.pressure[pos])
                })
                .fold(f32::NEG_INFINITY, f32::max)
        };
        for &tile in &collision_backfill {
            let pressure = boundary_pressure(tile);
            if pressure == f32::NEG_INFINITY {
                continue;
            }
            elevations[tile as usize] += if plate.land {
                params.diff_collision_coef * pressure
            } else {
                -params.diff_collision_coef * pressure
            };
        }
    }

    elevations
}

/// Break up the flat plate interiors with fine-grained height noise.
pub fn perturb_elevations(
    tiles: &[GenTile],
    elevations: &mut [f32],
    tile_noise: &OctaveNoise,
    tile_height_mult: f32,
) {
    for (tile, elevation) in elevations.iter_mut().enumerate() {
        *elevation += tile_noise.sample(tiles[tile].center) * tile_height_mult;
    }
}

/// Shift all elevations so the configured fraction of tiles ends up below
/// zero. The new sea level is the elevation at the sea-fraction quantile.
pub fn normalize_sea_level(elevations: &mut [f32], sea_fraction: f64) {
    if elevations.is_empty() {
        return;
    }
    let mut sorted = elevations.to_vec();
    sorted.sort_by(f32::total_cmp);
    let index = ((sea_fraction * elevations.len() as f64).round() as usize).min(sorted.len() - 1);
    let sea_level = sorted[index];
    debug!(sea_level, index, "renormalizing sea level");
    for elevation in elevations.iter_mut() {
        *elevation -= sea_level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::plates::generate_plates;
    use crate::world::topology::build_tiling;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_params() -> GenerationParams {
        GenerationParams {
            size: 2,
            plates: 5,
            ..GenerationParams::default()
        }
    }

    fn elevations_for(seed: u64, params: &GenerationParams) -> Vec<f32> {
        let tiles = build_tiling(params.size);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let plate_noise = OctaveNoise::new(
            &mut rng,
            params.plate_height_noise.octaves,
            params.plate_height_noise.amplitude_scale,
            params.plate_height_noise.frequency_scale,
        );
        let tile_noise = OctaveNoise::new(
            &mut rng,
            params.tile_height_noise.octaves,
            params.tile_height_noise.amplitude_scale,
            params.tile_height_noise.frequency_scale,
        );
        let plates = generate_plates(&tiles, params, &plate_noise, &mut rng);
        let mut elevations = base_elevations(&tiles, &plates, params);
        perturb_elevations(&tiles, &mut elevations, &tile_noise, params.tile_height_mult);
        normalize_sea_level(&mut elevations, params.sea_fraction);
        elevations
    }

    #[test]
    fn every_tile_gets_an_elevation() {
        let params = small_params();
        let elevations = elevations_for(5, &params);
        assert_eq!(elevations.len(), 92);
        assert!(elevations.iter().all(|e| e.is_finite()));
    }

    #[test]
    fn sea_fraction_of_tiles_is_below_zero() {
        let params = small_params();
        let elevations = elevations_for(5, &params);
        let below = elevations.iter().filter(|&&e| e <= 0.0).count();
        let expected = (params.sea_fraction * elevations.len() as f64).round() as usize;
        // The quantile tile itself lands exactly at zero.
        assert!(
            below.abs_diff(expected) <= 1,
            "{} tiles at or below sea level, expected about {}",
            below,
            expected
        );
    }

    #[test]
    fn zero_sea_fraction_leaves_land_everywhere() {
        let params = GenerationParams {
            sea_fraction: 0.0,
            ..small_params()
        };
        let elevations = elevations_for(5, &params);
        let min = elevations.iter().copied().fold(f32::INFINITY, f32::min);
        // Normalization subtracts the minimum, so nothing is below zero.
        assert!(
            min >= 0.0,
            "Expected no tile below sea level, min was {}",
            min
        );
    }

    #[test]
    fn uniform_base_stays_uniform_without_pressure() {
        // A single plate has no boundary, so base elevations are exactly
        // the plate height everywhere.
        let params = GenerationParams {
            plates: 1,
            sea_fraction: 0.0,
            ..small_params()
        };
        let tiles = build_tiling(params.size);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let noise = OctaveNoise::new(&mut rng, 8, 0.8, 0.5);
        let plates = generate_plates(&tiles, &params, &noise, &mut rng);
        let elevations = base_elevations(&tiles, &plates, &params);
        let first = elevations[0];
        assert!(
            elevations.iter().all(|&e| e == first),
            "Single-plate base elevations should be uniform"
        );
    }

    #[test]
    fn deterministic_for_same_seed() {
        let params = small_params();
        assert_eq!(elevations_for(31, &params), elevations_for(31, &params));
    }
}
