//! Hydraulic erosion as pit-filling relaxation. Ocean tiles anchor the
//! process; land relaxes down toward its pre-erosion height but never below
//! its lowest neighbor, and each round every land tile sheds flow onto that
//! neighbor, accumulating a "riverness" score.

use tracing::debug;

use crate::world::topology::GenTile;

/// Result of the erosion pass.
#[derive(Debug, Clone)]
pub struct ErosionOutcome {
    pub elevations: Vec<f32>,
    /// Accumulated downstream flow per tile; the river router samples
    /// sources from this.
    pub riverness: Vec<f32>,
    /// Relaxation rounds actually run (for diagnostics).
    pub iterations: u32,
}

/// Index of the lowest neighbor, first one winning ties.
fn lowest_neighbor(tile: &GenTile, elevations: &[f32]) -> usize {
    let mut best = tile.neighbors[0] as usize;
    for &n in &tile.neighbors[1..] {
        if elevations[n as usize] < elevations[best] {
            best = n as usize;
        }
    }
    best
}

/// Erode `elevations` (sea level at zero) until stable or `max_iterations`
/// rounds have run.
///
/// Each round recomputes every land tile from the previous round's map:
/// clamp back down to the pre-erosion height, then lift to just above the
/// lowest neighbor (`epsilon` above) if the tile had sunk below it. Land
/// starts at infinity so values can only descend toward the input heights.
/// With no ocean tile there is nothing to anchor the relaxation, so the
/// input is returned untouched.
pub fn erode(
    tiles: &[GenTile],
    input: &[f32],
    epsilon: f32,
    max_iterations: u32,
) -> ErosionOutcome {
    let is_ocean = |e: f32| e < 0.0;
    if !input.iter().any(|&e| is_ocean(e)) {
        debug!("no ocean tiles, skipping erosion");
        return ErosionOutcome {
            elevations: input.to_vec(),
            riverness: vec![0.0; input.len()],
            iterations: 0,
        };
    }

    let mut elevations: Vec<f32> = input
        .iter()
        .map(|&e| if is_ocean(e) { e } else { f32::INFINITY })
        .collect();
    let mut riverness = vec![0.0f32; input.len()];

    let mut iterations = 0;
    loop {
        let mut changed = false;
        let mut next_riverness = vec![0.0f32; input.len()];
        let next_elevations: Vec<f32> = elevations
            .iter()
            .enumerate()
            .map(|(t, &value)| {
                if is_ocean(value) {
                    return value;
                }
                let mut new_value = value.min(input[t]);
                let lowest = lowest_neighbor(&tiles[t], &elevations);
                if new_value < elevations[lowest] {
                    new_value = elevations[lowest] + epsilon;
                }
                next_riverness[lowest] += riverness[t] * 0.75 + 1.0;
                if new_value != value {
                    changed = true;
                }
                new_value
            })
            .collect();
        elevations = next_elevations;
        riverness = next_riverness;
        iterations += 1;
        if !changed || iterations >= max_iterations {
            break;
        }
    }
    debug!(iterations, "erosion settled");

    ErosionOutcome {
        elevations,
        riverness,
        iterations,
    }
}
