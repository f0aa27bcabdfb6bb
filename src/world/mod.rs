pub mod generation;
pub mod tile;
pub mod topology;

use glam::Vec3;

use crate::config::GenerationParams;
pub use tile::{GenTerrain, Tile, TilePolygon};

/// A finished, immutable planet surface.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub name: String,
    pub generation_params: GenerationParams,
    pub num_pentagons: u32,
    pub num_hexagons: u32,
    /// Total polygon vertices across all tiles.
    pub num_vertices: u32,
    /// Total triangles a fan triangulation of every tile produces.
    pub num_triangles: u32,
    pub tiles: Vec<Tile>,
}

impl World {
    pub fn new(name: String, generation_params: GenerationParams, tiles: Vec<Tile>) -> Self {
        let num_pentagons = tiles
            .iter()
            .filter(|t| t.polygon.vertices.len() == 5)
            .count() as u32;
        let num_hexagons = tiles.len() as u32 - num_pentagons;
        World {
            name,
            generation_params,
            num_pentagons,
            num_hexagons,
            num_vertices: 5 * num_pentagons + 6 * num_hexagons,
            num_triangles: 3 * num_pentagons + 4 * num_hexagons,
            tiles,
        }
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles.len() as u32
    }

    /// Tile whose polygon center is nearest to `pos`. Picking hook for
    /// renderers.
    pub fn closest_tile_to(&self, pos: Vec3) -> u32 {
        let mut best = 0u32;
        let mut best_dist = f32::INFINITY;
        for (t, tile) in self.tiles.iter().enumerate() {
            let d = tile.polygon.center.distance_squared(pos);
            if d < best_dist {
                best_dist = d;
                best = t as u32;
            }
        }
        best
    }
}
