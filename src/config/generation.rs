use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one multi-octave noise field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    pub octaves: u32,
    pub amplitude_scale: f32,
    pub frequency_scale: f32,
}

impl NoiseParams {
    pub const fn new(octaves: u32, amplitude_scale: f32, frequency_scale: f32) -> Self {
        NoiseParams {
            octaves,
            amplitude_scale,
            frequency_scale,
        }
    }
}

/// Parameters used to procedurally generate a planet.
///
/// All fields have defaults matching the reference planet (geodesic size 31,
/// 30 plates), so a TOML file only needs to override what it cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Root seed; the whole pipeline is deterministic given this value.
    pub seed: u64,
    /// Geodesic subdivision size: number of new vertices inserted per
    /// icosahedron edge. Size N yields `10(N+1)^2 + 2` tiles.
    pub size: u32,
    /// Number of tectonic plates.
    pub plates: u32,
    /// Target fraction of tiles below sea level, in [0, 1].
    pub sea_fraction: f64,
    /// Elevation gain per unit pressure between two plates of the same
    /// land/water affinity.
    pub similar_collision_coef: f32,
    /// Regression rate pulling a compressed tile toward the elevation of an
    /// opposite-affinity neighbor.
    pub diff_regression_coef: f32,
    /// Elevation transfer onto interior tiles behind an opposite-affinity
    /// compression front.
    pub diff_collision_coef: f32,
    /// Amplitude of the per-tile elevation noise pass.
    pub tile_height_mult: f32,
    /// Minimum elevation step enforced by erosion; must be positive.
    pub epsilon: f32,
    /// Number of rivers to commit.
    pub num_rivers: u32,
    /// Minimum committed river length in tiles. 0 means derive from the
    /// geodesic size (`size / 4`).
    pub min_river_length: u32,
    pub plate_height_noise: NoiseParams,
    pub tile_height_noise: NoiseParams,
    pub heat_noise: NoiseParams,
    pub moisture_noise: NoiseParams,
    pub terrain_noise: NoiseParams,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            seed: 0,
            size: 31,
            plates: 30,
            sea_fraction: 0.65,
            similar_collision_coef: 0.2,
            diff_regression_coef: 5.0,
            diff_collision_coef: 1.0,
            tile_height_mult: 0.1,
            epsilon: 0.05,
            num_rivers: 20,
            min_river_length: 0,
            plate_height_noise: NoiseParams::new(8, 0.8, 0.5),
            tile_height_noise: NoiseParams::new(8, 0.5, 1.3),
            heat_noise: NoiseParams::new(8, 0.3, 0.5),
            moisture_noise: NoiseParams::new(8, 0.3, 0.5),
            terrain_noise: NoiseParams::new(2, 0.8, 1.2),
        }
    }
}

impl GenerationParams {
    /// Load generation parameters from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;
        let params: Self = toml::from_str(&content)
            .map_err(|e| format!("Invalid TOML in {}: {}", path.display(), e))?;
        params.validate()?;
        Ok(params)
    }

    /// Total tile count produced by the geodesic subdivision:
    /// 12 pentagons plus `10(size+1)^2 - 10` hexagons.
    pub fn tile_count(&self) -> u32 {
        let f = self.size + 1;
        10 * f * f + 2
    }

    /// Effective minimum river length (resolves the `0 = size / 4` default).
    pub fn effective_min_river_length(&self) -> u32 {
        if self.min_river_length == 0 {
            self.size / 4
        } else {
            self.min_river_length
        }
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), String> {
        if self.size < 1 {
            return Err(format!("size must be >= 1, got {}", self.size));
        }
        if self.plates < 1 {
            return Err(format!("plates must be >= 1, got {}", self.plates));
        }
        if self.plates > self.tile_count() {
            return Err(format!(
                "plates must not exceed the tile count ({}), got {}",
                self.tile_count(),
                self.plates
            ));
        }
        if !(0.0..=1.0).contains(&self.sea_fraction) {
            return Err(format!(
                "sea_fraction must be 0.0-1.0, got {}",
                self.sea_fraction
            ));
        }
        if self.epsilon <= 0.0 {
            return Err(format!("epsilon must be positive, got {}", self.epsilon));
        }
        for (name, noise) in [
            ("plate_height_noise", &self.plate_height_noise),
            ("tile_height_noise", &self.tile_height_noise),
            ("heat_noise", &self.heat_noise),
            ("moisture_noise", &self.moisture_noise),
            ("terrain_noise", &self.terrain_noise),
        ] {
            if noise.octaves < 1 {
                return Err(format!(
                    "{}.octaves must be >= 1, got {}",
                    name, noise.octaves
                ));
            }
        }
        Ok(())
    }
}
