//! Fleet placement on sea tiles, and the shots revealed when a game opens.
//!
//! Ships lie in straight horizontal or vertical runs of water cells and
//! never overlap. The RNG is seeded from the terrain seed, so a board and
//! its fleet are reproduced together.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{TerrainError, TerrainResult};
use crate::terrain::TerrainGrid;

const MAX_ATTEMPTS: usize = 1000;

/// A fresh board shows between three and five misses.
const REVEALED_MISSES: std::ops::RangeInclusive<usize> = 3..=5;

/// ChaCha stream for revealed shots, kept apart from the placement stream.
const REVEAL_STREAM: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub name: String,
    pub length: usize,
}

impl ShipSpec {
    pub fn new(name: &str, length: usize) -> Self {
        ShipSpec {
            name: name.to_string(),
            length,
        }
    }
}

/// Blue carrier plus two patrol boats.
pub fn default_fleet() -> Vec<ShipSpec> {
    vec![
        ShipSpec::new("blue", 3),
        ShipSpec::new("red", 2),
        ShipSpec::new("purple", 2),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedShip {
    pub name: String,
    pub orientation: Orientation,
    /// `(row, col)` cells from bow to stern
    pub cells: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fleet {
    pub ships: Vec<PlacedShip>,
}

impl Fleet {
    pub fn ship_at(&self, row: usize, col: usize) -> Option<&PlacedShip> {
        self.ships.iter().find(|ship| ship.cells.contains(&(row, col)))
    }

    pub fn occupied(&self) -> HashSet<(usize, usize)> {
        self.ships.iter().flat_map(|ship| ship.cells.iter().copied()).collect()
    }
}

/// A shot already on the board when the game opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub hit: bool,
    /// Name of the ship struck, `None` for a miss
    pub ship: Option<String>,
}

pub fn place_fleet(grid: &TerrainGrid, specs: &[ShipSpec], seed: i64) -> TerrainResult<Fleet> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    let mut fleet = Fleet::default();
    let mut occupied = HashSet::new();

    for spec in specs {
        let ship = place_ship(grid, spec, &occupied, &mut rng)?;
        occupied.extend(ship.cells.iter().copied());
        fleet.ships.push(ship);
    }

    debug!(seed, ships = fleet.ships.len(), "fleet placed");
    Ok(fleet)
}

fn place_ship(
    grid: &TerrainGrid,
    spec: &ShipSpec,
    occupied: &HashSet<(usize, usize)>,
    rng: &mut ChaCha8Rng,
) -> TerrainResult<PlacedShip> {
    let n = grid.size();
    let failure = |attempts| TerrainError::ShipPlacement {
        ship: spec.name.clone(),
        attempts,
    };
    if spec.length == 0 || spec.length > n {
        return Err(failure(0));
    }

    for _ in 0..MAX_ATTEMPTS {
        let orientation = if rng.gen_bool(0.5) {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let (row, col) = match orientation {
            Orientation::Horizontal => (rng.gen_range(0..n), rng.gen_range(0..=n - spec.length)),
            Orientation::Vertical => (rng.gen_range(0..=n - spec.length), rng.gen_range(0..n)),
        };
        let cells: Vec<(usize, usize)> = (0..spec.length)
            .map(|i| match orientation {
                Orientation::Horizontal => (row, col + i),
                Orientation::Vertical => (row + i, col),
            })
            .collect();

        let fits = cells.iter().all(|&(r, c)| {
            !occupied.contains(&(r, c)) && grid.get(r, c).is_some_and(|t| t.is_water())
        });
        if fits {
            return Ok(PlacedShip {
                name: spec.name.clone(),
                orientation,
                cells,
            });
        }
    }

    Err(failure(MAX_ATTEMPTS))
}

/// Opening shots: 3 to 5 misses on distinct cells no ship occupies, then
/// one hit on a random cell of each ship. Misses may land on land cells.
pub fn reveal_moves(grid: &TerrainGrid, fleet: &Fleet, seed: i64) -> TerrainResult<Vec<Move>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
    rng.set_stream(REVEAL_STREAM);

    let n = grid.size();
    let occupied = fleet.occupied();
    let wanted = rng.gen_range(REVEALED_MISSES);
    let free = n.saturating_mul(n).saturating_sub(occupied.len());
    let failure = |attempts| TerrainError::RevealMoves { wanted, attempts };
    if free < wanted {
        return Err(failure(0));
    }

    let mut misses: Vec<(usize, usize)> = Vec::with_capacity(wanted);
    let mut attempts = 0;
    while misses.len() < wanted {
        if attempts == MAX_ATTEMPTS {
            return Err(failure(attempts));
        }
        attempts += 1;
        let cell = (rng.gen_range(0..n), rng.gen_range(0..n));
        if !occupied.contains(&cell) && !misses.contains(&cell) {
            misses.push(cell);
        }
    }

    let mut moves: Vec<Move> = misses
        .into_iter()
        .map(|(row, col)| Move { row, col, hit: false, ship: None })
        .collect();
    for ship in &fleet.ships {
        if let Some(&(row, col)) = ship.cells.choose(&mut rng) {
            moves.push(Move { row, col, hit: true, ship: Some(ship.name.clone()) });
        }
    }

    debug!(seed, misses = wanted, hits = moves.len() - wanted, "opening shots revealed");
    Ok(moves)
}
