use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;

use crate::error::TerrainError;

/// Terrain categories, ordered by ascending nominal height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TerrainType {
    DeepWater,
    ShallowWater,
    Beach,
    Lowland,
    Highland,
    Mountain,
}

impl TerrainType {
    pub const ALL: [TerrainType; 6] = [
        TerrainType::DeepWater,
        TerrainType::ShallowWater,
        TerrainType::Beach,
        TerrainType::Lowland,
        TerrainType::Highland,
        TerrainType::Mountain,
    ];

    /// Sea tiles are the only cells ships may occupy.
    pub fn is_water(self) -> bool {
        matches!(self, TerrainType::DeepWater | TerrainType::ShallowWater)
    }

    /// Stable label used in serialized grids.
    pub fn label(self) -> &'static str {
        match self {
            TerrainType::DeepWater => "deepWater",
            TerrainType::ShallowWater => "shallowWater",
            TerrainType::Beach => "beach",
            TerrainType::Lowland => "lowland",
            TerrainType::Highland => "highland",
            TerrainType::Mountain => "mountain",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TerrainType::DeepWater => "Deep Water",
            TerrainType::ShallowWater => "Shallow Water",
            TerrainType::Beach => "Beach",
            TerrainType::Lowland => "Lowland",
            TerrainType::Highland => "Highland",
            TerrainType::Mountain => "Mountain",
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            TerrainType::DeepWater => [0x2C, 0x7A, 0xAF],    // #2C7AAF
            TerrainType::ShallowWater => [0x54, 0x97, 0xC4], // #5497C4
            TerrainType::Beach => [0xD4, 0xC3, 0x91],        // #D4C391
            TerrainType::Lowland => [0x8B, 0xAF, 0x75],      // #8BAF75
            TerrainType::Highland => [0x6A, 0x8C, 0x59],     // #6A8C59
            TerrainType::Mountain => [0x50, 0x5F, 0x44],     // #505F44
        }
    }

    pub fn glyph(self) -> char {
        match self {
            TerrainType::DeepWater => '≈',
            TerrainType::ShallowWater => '~',
            TerrainType::Beach => '.',
            TerrainType::Lowland => ',',
            TerrainType::Highland => 'n',
            TerrainType::Mountain => '▲',
        }
    }

    /// ANSI foreground colour for terminal output.
    pub fn ansi_color(self) -> &'static str {
        match self {
            TerrainType::DeepWater => "\x1b[34m",    // Blue
            TerrainType::ShallowWater => "\x1b[36m", // Cyan
            TerrainType::Beach => "\x1b[93m",        // Yellow
            TerrainType::Lowland => "\x1b[92m",      // Light green
            TerrainType::Highland => "\x1b[32m",     // Green
            TerrainType::Mountain => "\x1b[90m",     // Dark gray
        }
    }
}

/// Baked-in board shown for seed 1 (first load).
pub const REFERENCE_TERRAIN: [[TerrainType; 6]; 6] = {
    use crate::terrain::TerrainType::{Beach as B, DeepWater as D, Highland as H, Lowland as L, ShallowWater as S};
    [
        [D, D, D, S, L, L],
        [D, D, S, B, L, S],
        [D, S, B, L, S, D],
        [D, S, L, H, S, D],
        [S, B, H, S, D, D],
        [L, L, S, D, D, D],
    ]
};

/// Square, row-major grid of terrain categories. Read-only once built.
///
/// Serialized as a plain array of rows; deserializing rejects ragged or
/// non-square input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<TerrainType>>", try_from = "Vec<Vec<TerrainType>>")]
pub struct TerrainGrid {
    size: usize,
    cells: Vec<Vec<TerrainType>>,
}

impl TerrainGrid {
    pub(crate) fn from_rows(cells: Vec<Vec<TerrainType>>) -> Self {
        debug_assert!(cells.iter().all(|row| row.len() == cells.len()));
        TerrainGrid {
            size: cells.len(),
            cells,
        }
    }

    pub fn reference() -> Self {
        Self::from_rows(REFERENCE_TERRAIN.iter().map(|row| row.to_vec()).collect())
    }

    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<TerrainType> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> &[Vec<TerrainType>] {
        &self.cells
    }

    /// Every cell as `(row, col, kind)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, TerrainType)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(row, r)| r.iter().enumerate().map(move |(col, &t)| (row, col, t)))
    }

    /// Coordinates of deep and shallow water cells.
    pub fn sea_tiles(&self) -> Vec<(usize, usize)> {
        self.cells()
            .filter(|&(_, _, t)| t.is_water())
            .map(|(row, col, _)| (row, col))
            .collect()
    }

    pub fn count(&self, kind: TerrainType) -> usize {
        self.cells().filter(|&(_, _, t)| t == kind).count()
    }

    pub fn histogram(&self) -> BTreeMap<TerrainType, usize> {
        let mut counts = BTreeMap::new();
        for (_, _, t) in self.cells() {
            *counts.entry(t).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_rows(self) -> Vec<Vec<TerrainType>> {
        self.cells
    }
}

impl TryFrom<Vec<Vec<TerrainType>>> for TerrainGrid {
    type Error = TerrainError;

    fn try_from(cells: Vec<Vec<TerrainType>>) -> Result<Self, Self::Error> {
        let size = cells.len();
        if let Some((row, r)) = cells.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(TerrainError::NonSquareGrid { size, row, len: r.len() });
        }
        Ok(Self::from_rows(cells))
    }
}

impl From<TerrainGrid> for Vec<Vec<TerrainType>> {
    fn from(grid: TerrainGrid) -> Self {
        grid.cells
    }
}

impl Index<usize> for TerrainGrid {
    type Output = [TerrainType];

    fn index(&self, row: usize) -> &Self::Output {
        &self.cells[row]
    }
}

/// Board coordinate as printed on the map: row letter(s) then 1-based column.
///
/// Rows past `Z` continue spreadsheet-style (`AA`, `AB`, ...).
pub fn cell_label(row: usize, col: usize) -> String {
    let mut letters = Vec::new();
    let mut n = row + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect::<String>() + &(col + 1).to_string()
}
