//! Coastal smoothing: beaches that sit in open water or deep inland are
//! relabelled so the remaining beach cells actually trace a coastline.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::terrain::TerrainType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingSettings {
    /// Number of full sweeps. Not run-until-stable: a further pass may
    /// still change cells.
    pub passes: usize,
    /// Count the cell itself as one of its neighbours (3x3 window instead
    /// of the Moore ring). Reproduces the boards the web client draws.
    pub include_center: bool,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        SmoothingSettings {
            passes: 2,
            include_center: false,
        }
    }
}

/// Water and land counts around `(row, col)`. Out-of-bounds neighbours are
/// dropped, so a corner only sees three cells.
pub fn neighbor_counts(
    grid: &[Vec<TerrainType>],
    row: usize,
    col: usize,
    include_center: bool,
) -> (usize, usize) {
    let n = grid.len();
    let mut water = 0;
    let mut total = 0;
    for dr in -1i32..=1 {
        for dc in -1i32..=1 {
            if dr == 0 && dc == 0 && !include_center {
                continue;
            }
            let r = row as i64 + dr as i64;
            let c = col as i64 + dc as i64;
            if r < 0 || c < 0 || r >= n as i64 || c >= n as i64 {
                continue;
            }
            total += 1;
            if grid[r as usize][c as usize].is_water() {
                water += 1;
            }
        }
    }
    (water, total - water)
}

/// What a beach becomes given its neighbourhood, or `None` to keep it.
pub fn relax_beach(water: usize, land: usize) -> Option<TerrainType> {
    if water > land + 1 {
        Some(TerrainType::ShallowWater)
    } else if land > water + 1 {
        Some(TerrainType::Lowland)
    } else {
        None
    }
}

/// One sweep. Every decision reads `grid`, never the partially updated
/// output, so the result does not depend on visiting order.
pub fn smooth_pass(grid: &[Vec<TerrainType>], include_center: bool) -> Vec<Vec<TerrainType>> {
    grid.iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, &cell)| {
                    if cell != TerrainType::Beach {
                        return cell;
                    }
                    let (water, land) = neighbor_counts(grid, row, col, include_center);
                    relax_beach(water, land).unwrap_or(cell)
                })
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CoastalSmoother {
    pub settings: SmoothingSettings,
}

impl CoastalSmoother {
    pub fn new(settings: SmoothingSettings) -> Self {
        CoastalSmoother { settings }
    }

    pub fn smooth(&self, mut grid: Vec<Vec<TerrainType>>) -> Vec<Vec<TerrainType>> {
        for pass in 0..self.settings.passes {
            let next = smooth_pass(&grid, self.settings.include_center);
            let changed = count_changes(&grid, &next);
            trace!(pass, changed, "coastal smoothing pass");
            grid = next;
        }
        grid
    }
}

fn count_changes(before: &[Vec<TerrainType>], after: &[Vec<TerrainType>]) -> usize {
    before
        .iter()
        .flatten()
        .zip(after.iter().flatten())
        .filter(|(a, b)| a != b)
        .count()
}
