//! Terrain classification: fold elevation, heat, moisture, rivers, and a
//! biome noise channel into a validated terrain assignment per tile.

use rand::Rng;

use crate::noise::OctaveNoise;
use crate::world::tile::{
    GenTerrain, TerrainMajorFeature, TerrainMinorFeature, TerrainShape, TerrainType,
};
use crate::world::topology::GenTile;

fn chance(rng: &mut impl Rng, probability: f64) -> bool {
    rng.r#gen::<f64>() <= probability
}

// Local relief below this marks a peak: the tile towers over most of its
// neighbors once noise and absolute height are factored in.
const MOUNTAIN_THRESHOLD: f32 = 1.4 / 9.0;

/// Classify every tile. Returns an error if an impossible terrain
/// combination is ever produced.
pub fn classify(
    tiles: &[GenTile],
    elevations: &[f32],
    heat: &[f32],
    moisture: &[f32],
    rivers: &[bool],
    terrain_noise: &OctaveNoise,
    rng: &mut impl Rng,
) -> Result<Vec<GenTerrain>, String> {
    let mut terrain = Vec::with_capacity(tiles.len());
    for (t, tile) in tiles.iter().enumerate() {
        let h = elevations[t];
        let temp = heat[t];
        let m = moisture[t];
        let n = terrain_noise.sample(tile.center);

        let smaller_frac = tile
            .neighbors
            .iter()
            .filter(|&&adj| elevations[adj as usize] <= h)
            .count() as f32
            / tile.neighbors.len() as f32;
        let coastal = tile
            .neighbors
            .iter()
            .any(|&adj| elevations[adj as usize] >= 0.0);
        let near_coastal = tile.neighbors.iter().any(|&adj| {
            tiles[adj as usize]
                .neighbors
                .iter()
                .any(|&adj2| elevations[adj2 as usize] >= 0.0)
        });

        let minor = if rivers[t] {
            vec![TerrainMinorFeature::River]
        } else {
            vec![]
        };

        let classified = if h < 0.0 {
            if temp < 0.25 {
                GenTerrain::new(
                    TerrainType::Water,
                    TerrainShape::Ice,
                    TerrainMajorFeature::None,
                    vec![],
                )?
            } else if h > (-0.015 + n / 15.0) || coastal || (near_coastal && n > -0.15) {
                GenTerrain::new(
                    TerrainType::Water,
                    TerrainShape::Coast,
                    TerrainMajorFeature::None,
                    vec![],
                )?
            } else {
                GenTerrain::new(
                    TerrainType::Water,
                    TerrainShape::Ocean,
                    TerrainMajorFeature::None,
                    vec![],
                )?
            }
        } else if smaller_frac + n / 2.0 - h / 2.0 < MOUNTAIN_THRESHOLD && !rivers[t] {
            GenTerrain::new(
                TerrainType::Mountain,
                TerrainShape::Mountain,
                TerrainMajorFeature::None,
                vec![],
            )?
        } else if 0.85 * temp < m && temp > 0.5 {
            if chance(rng, 1.0 / 5.0) {
                GenTerrain::new(
                    TerrainType::Grass,
                    TerrainShape::Hill,
                    TerrainMajorFeature::None,
                    minor,
                )?
            } else if chance(rng, 1.0 / 4.0) {
                GenTerrain::new(
                    TerrainType::Grass,
                    TerrainShape::Flat,
                    TerrainMajorFeature::None,
                    minor,
                )?
            } else {
                GenTerrain::new(
                    TerrainType::Grass,
                    TerrainShape::Flat,
                    TerrainMajorFeature::Rainforest,
                    minor,
                )?
            }
        } else if 0.45 * temp < m && temp > 0.4 {
            if chance(rng, 1.0 / 5.0) {
                GenTerrain::new(
                    TerrainType::Grass,
                    TerrainShape::Hill,
                    TerrainMajorFeature::None,
                    minor,
                )?
            } else if chance(rng, 1.0 / 4.0) {
                GenTerrain::new(
                    TerrainType::Grass,
                    TerrainShape::Flat,
                    TerrainMajorFeature::None,
                    minor,
                )?
            } else {
                GenTerrain::new(
                    TerrainType::Grass,
                    TerrainShape::Flat,
                    TerrainMajorFeature::Forest,
                    minor,
                )?
            }
        } else if 0.35 * temp < m {
            let terrain_type = if temp > 0.5 {
                TerrainType::Sand
            } else {
                TerrainType::Permafrost
            };
            let shape = if chance(rng, 0.5) {
                TerrainShape::Flat
            } else {
                TerrainShape::Hill
            };
            GenTerrain::new(terrain_type, shape, TerrainMajorFeature::None, minor)?
        } else {
            let terrain_type = if temp > 0.4 {
                TerrainType::Sand
            } else {
                TerrainType::Permafrost
            };
            GenTerrain::new(
                terrain_type,
                TerrainShape::Flat,
                TerrainMajorFeature::Forest,
                minor,
            )?
        };
        terrain.push(classified);
    }
    Ok(terrain)
}
