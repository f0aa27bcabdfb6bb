//! Latitude-driven climate fields. The planet's axis is +Y; heat peaks at
//! the equator and falls toward the poles, moisture follows the global
//! circulation bands (wet equator, dry horse latitudes, wetter mid
//! latitudes). Both fields are dithered with noise.

use std::f32::consts::FRAC_PI_4;

use glam::Vec3;

use crate::noise::OctaveNoise;
use crate::world::topology::GenTile;

const AXIS: Vec3 = Vec3::Y;

/// Heat per tile: the sine of the polar angle (1 at the equator, 0 at the
/// poles), plus a noise dither, minus an altitude penalty for land.
pub fn generate_heat(tiles: &[GenTile], elevations: &[f32], heat_noise: &OctaveNoise) -> Vec<f32> {
    tiles
        .iter()
        .enumerate()
        .map(|(t, tile)| {
            let dot = tile.center.normalize().dot(AXIS);
            let equator_sin = (1.0 - dot * dot).sqrt();
            let altitude_penalty = if elevations[t] < 0.0 {
                0.0
            } else {
                elevations[t] / 5.0
            };
            equator_sin + heat_noise.sample(tile.center) / 12.0 - altitude_penalty
        })
        .collect()
}

/// Sum of three Lorentzian bumps over latitude (equator and the two
/// mid-latitude belts), rescaled to roughly [0, 1].
fn latitude_moisture(theta: f32) -> f32 {
    let bump = |center: f32| {
        let x = 4.0 * (theta - center);
        1.0 / (1.0 + x * x)
    };
    (bump(0.0) + 0.5 * bump(FRAC_PI_4) + 0.5 * bump(-FRAC_PI_4) - 0.0763) / 1.0157
}

/// Moisture per tile: circulation-band base plus a noise dither.
pub fn generate_moisture(tiles: &[GenTile], moisture_noise: &OctaveNoise) -> Vec<f32> {
    tiles
        .iter()
        .map(|tile| {
            let theta = tile.center.normalize().dot(AXIS).asin();
            latitude_moisture(theta) + moisture_noise.sample(tile.center) / 6.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::topology::build_tiling;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn noise(seed: u64) -> OctaveNoise {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        OctaveNoise::new(&mut rng, 8, 0.3, 0.5)
    }

    #[test]
    fn heat_peaks_near_the_equator() {
        let tiles = build_tiling(3);
        let elevations = vec![0.0f32; tiles.len()];
        let heat = generate_heat(&tiles, &elevations, &noise(1));

        let latitude = |t: usize| tiles[t].center.normalize().dot(Vec3::Y).abs();
        let (equatorial, _) = heat
            .iter()
            .enumerate()
            .min_by(|a, b| latitude(a.0).total_cmp(&latitude(b.0)))
            .map(|(t, &h)| (h, t))
            .unwrap();
        let (polar, _) = heat
            .iter()
            .enumerate()
            .max_by(|a, b| latitude(a.0).total_cmp(&latitude(b.0)))
            .map(|(t, &h)| (h, t))
            .unwrap();
        assert!(
            equatorial > polar,
            "Equator ({}) should be hotter than pole ({})",
            equatorial,
            polar
        );
    }

    #[test]
    fn altitude_cools_land_but_not_ocean() {
        let tiles = build_tiling(2);
        let n = noise(2);
        let sea = generate_heat(&tiles, &vec![-0.2; tiles.len()], &n);
        let low = generate_heat(&tiles, &vec![0.0; tiles.len()], &n);
        let high = generate_heat(&tiles, &vec![1.0; tiles.len()], &n);
        for t in 0..tiles.len() {
            assert_eq!(sea[t], low[t], "Ocean depth should not change heat");
            assert!(
                high[t] < low[t],
                "Tile {}: higher land should be cooler",
                t
            );
        }
    }

    #[test]
    fn moisture_band_profile() {
        // Equator is wetter than the horse latitudes (~pi/8), which are
        // drier than the mid-latitude belt (~pi/4).
        let equator = latitude_moisture(0.0);
        let horse = latitude_moisture(std::f32::consts::PI / 8.0);
        let belt = latitude_moisture(FRAC_PI_4);
        assert!(equator > belt, "Equator should be wettest");
        assert!(belt > horse, "Mid-latitude belt should beat horse latitudes");
    }

    #[test]
    fn fields_are_deterministic() {
        let tiles = build_tiling(2);
        let elevations = vec![0.1f32; tiles.len()];
        assert_eq!(
            generate_heat(&tiles, &elevations, &noise(5)),
            generate_heat(&tiles, &elevations, &noise(5))
        );
        assert_eq!(
            generate_moisture(&tiles, &noise(6)),
            generate_moisture(&tiles, &noise(6))
        );
    }
}
