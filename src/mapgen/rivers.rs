//! River routing. Sources are drawn from the erosion flow map weighted by
//! squared moisture; each river runs steepest-descent until it reaches the
//! ocean or merges into an existing river, and only long enough runs are
//! kept.

use rand::Rng;
use tracing::debug;

use crate::world::topology::GenTile;

/// Already-committed river tiles repel later traces so rivers merge at
/// confluences instead of silently crossing.
const RIVER_PENALTY: f32 = 10_000.0;

fn downstream(tile: &GenTile, elevations: &[f32], rivers: &[bool]) -> u32 {
    let cost = |t: u32| {
        elevations[t as usize] + if rivers[t as usize] { RIVER_PENALTY } else { 0.0 }
    };
    let mut best = tile.neighbors[0];
    for &n in &tile.neighbors[1..] {
        if cost(n) < cost(best) {
            best = n;
        }
    }
    best
}

/// Route up to `num_rivers` rivers, keeping only paths of at least
/// `min_river_length` tiles. Returns a per-tile river flag.
pub fn route_rivers(
    tiles: &[GenTile],
    elevations: &[f32],
    riverness: &[f32],
    moisture: &[f32],
    num_rivers: u32,
    min_river_length: u32,
    rng: &mut impl Rng,
) -> Vec<bool> {
    let mut weights = vec![0.0f32; tiles.len()];
    let mut active = vec![false; tiles.len()];
    let mut total = 0.0f64;
    for t in 0..tiles.len() {
        let w = riverness[t] * moisture[t] * moisture[t];
        if w > 0.0 && elevations[t] > 0.0 {
            weights[t] = w;
            active[t] = true;
            total += w as f64;
        }
    }

    let mut rivers = vec![false; tiles.len()];
    let mut committed = 0u32;
    while committed < num_rivers && total > 0.0 && active.iter().any(|&a| a) {
        // Weighted draw over the remaining source candidates, scanning in
        // tile order.
        let mut remaining = rng.gen_range(0.0..total);
        let mut current = 0u32;
        for t in 0..tiles.len() {
            if !active[t] {
                continue;
            }
            current = t as u32;
            remaining -= weights[t] as f64;
            if remaining <= 0.0 {
                break;
            }
        }

        // Trace downhill until we hit ocean or an existing river. Visited
        // tiles guard against flats where the descent can loop.
        let mut path: Vec<u32> = Vec::new();
        while elevations[current as usize] > 0.0 && !rivers[current as usize] {
            if path.contains(&current) {
                break;
            }
            path.push(current);
            if active[current as usize] {
                active[current as usize] = false;
                total -= weights[current as usize] as f64;
            }
            current = downstream(&tiles[current as usize], elevations, &rivers);
        }

        if path.len() >= min_river_length as usize {
            for &t in &path {
                rivers[t as usize] = true;
            }
            committed += 1;
        }
    }
    debug!(committed, "routed rivers");

    rivers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::topology::build_tiling;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // Elevation rises with latitude: south pole is deep ocean, north pole
    // is the highest land, so every trace has a downhill run.
    fn sloped_world() -> (Vec<GenTile>, Vec<f32>) {
        let tiles = build_tiling(4);
        let elevations: Vec<f32> = tiles
            .iter()
            .map(|t| t.center.normalize().y)
            .collect();
        (tiles, elevations)
    }

    #[test]
    fn rivers_only_on_land() {
        let (tiles, elevations) = sloped_world();
        let riverness = vec![1.0f32; tiles.len()];
        let moisture = vec![1.0f32; tiles.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let rivers = route_rivers(&tiles, &elevations, &riverness, &moisture, 10, 1, &mut rng);
        assert!(rivers.iter().any(|&r| r), "Expected at least one river");
        for (t, &r) in rivers.iter().enumerate() {
            if r {
                assert!(
                    elevations[t] > 0.0,
                    "River tile {} is below sea level",
                    t
                );
            }
        }
    }

    #[test]
    fn short_runs_are_discarded() {
        let (tiles, elevations) = sloped_world();
        let riverness = vec![1.0f32; tiles.len()];
        let moisture = vec![1.0f32; tiles.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let huge = tiles.len() as u32 + 1;
        let rivers = route_rivers(&tiles, &elevations, &riverness, &moisture, 10, huge, &mut rng);
        assert!(
            rivers.iter().all(|&r| !r),
            "No path can satisfy an impossible minimum length"
        );
    }

    #[test]
    fn no_sources_no_rivers() {
        let (tiles, elevations) = sloped_world();
        let riverness = vec![0.0f32; tiles.len()];
        let moisture = vec![1.0f32; tiles.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let rivers = route_rivers(&tiles, &elevations, &riverness, &moisture, 10, 1, &mut rng);
        assert!(rivers.iter().all(|&r| !r));
    }

    #[test]
    fn zero_requested_rivers() {
        let (tiles, elevations) = sloped_world();
        let riverness = vec![1.0f32; tiles.len()];
        let moisture = vec![1.0f32; tiles.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let rivers = route_rivers(&tiles, &elevations, &riverness, &moisture, 0, 1, &mut rng);
        assert!(rivers.iter().all(|&r| !r));
    }

    #[test]
    fn deterministic_for_same_seed() {
        let (tiles, elevations) = sloped_world();
        let riverness = vec![1.0f32; tiles.len()];
        let moisture = vec![0.8f32; tiles.len()];
        let a = route_rivers(
            &tiles,
            &elevations,
            &riverness,
            &moisture,
            5,
            2,
            &mut ChaCha8Rng::seed_from_u64(13),
        );
        let b = route_rivers(
            &tiles,
            &elevations,
            &riverness,
            &moisture,
            5,
            2,
            &mut ChaCha8Rng::seed_from_u64(13),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn flat_plateau_terminates() {
        // All-equal land elevations cannot reach the ocean; the visited
        // guard must still end every trace.
        let tiles = build_tiling(2);
        let mut elevations = vec![0.5f32; tiles.len()];
        elevations[0] = -0.5;
        let riverness = vec![1.0f32; tiles.len()];
        let moisture = vec![1.0f32; tiles.len()];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let rivers = route_rivers(&tiles, &elevations, &riverness, &moisture, 4, 1, &mut rng);
        // Whether paths commit depends on where the loop closes; the point
        // is that routing finishes.
        assert_eq!(rivers.len(), tiles.len());
    }
}
