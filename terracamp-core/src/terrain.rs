//! Terrain classes and the 8x8 terrain layout
//!
//! The terrain under a piece decides how it moves. The layout is produced by
//! an external layout provider; this module only accepts and validates its
//! output.

use crate::board::{Coord, BISHOP_DIRS, BOARD_SIZE, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRS};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Movement pattern granted by a square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Rook,
    Bishop,
    Knight,
    King,
}

/// How a terrain class generates destinations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveShape {
    /// Scan along rays, stopping after an empty square of the given terrain
    Ray {
        dirs: &'static [(i8, i8)],
        stop_on: Terrain,
    },
    /// Fixed offsets, intervening squares ignored
    Leap(&'static [(i8, i8)]),
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [Terrain::Rook, Terrain::Bishop, Terrain::Knight, Terrain::King];

    /// Tile letter used by the layout provider
    pub fn letter(self) -> char {
        match self {
            Terrain::Rook => 'R',
            Terrain::Bishop => 'Y',
            Terrain::Knight => 'G',
            Terrain::King => 'B',
        }
    }

    pub fn from_letter(c: char) -> Option<Terrain> {
        match c.to_ascii_uppercase() {
            'R' => Some(Terrain::Rook),
            'Y' => Some(Terrain::Bishop),
            'G' => Some(Terrain::Knight),
            'B' => Some(Terrain::King),
            _ => None,
        }
    }

    pub fn move_shape(self) -> MoveShape {
        match self {
            Terrain::Rook => MoveShape::Ray {
                dirs: &ROOK_DIRS,
                stop_on: Terrain::Rook,
            },
            Terrain::Bishop => MoveShape::Ray {
                dirs: &BISHOP_DIRS,
                stop_on: Terrain::Bishop,
            },
            Terrain::Knight => MoveShape::Leap(&KNIGHT_OFFSETS),
            Terrain::King => MoveShape::Leap(&KING_OFFSETS),
        }
    }

    /// Ray directions for sliding classes, None for leapers
    pub fn ray_dirs(self) -> Option<&'static [(i8, i8)]> {
        match self.move_shape() {
            MoveShape::Ray { dirs, .. } => Some(dirs),
            MoveShape::Leap(_) => None,
        }
    }
}

/// Rejected layout input
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout must have 8 rows, found {0}")]
    RowCount(usize),

    #[error("row {row} must have 8 tiles, found {len}")]
    RowLength { row: usize, len: usize },

    #[error("unknown tile '{tile}' at row {row}, column {col}")]
    UnknownTile { tile: char, row: usize, col: usize },
}

/// Fixed terrain assignment for all 64 squares
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TerrainGrid {
    cells: [[Terrain; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

/// On-disk form handed over by the layout provider
#[derive(Serialize, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    name: Option<String>,
    rows: Vec<String>,
}

impl TerrainGrid {
    /// Every square carries the same class
    pub fn uniform(terrain: Terrain) -> Self {
        Self {
            cells: [[terrain; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Parse eight rows of tile letters (R, Y, G, B)
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        if rows.len() != BOARD_SIZE as usize {
            return Err(LayoutError::RowCount(rows.len()));
        }

        let mut grid = Self::uniform(Terrain::King);
        for (row, line) in rows.iter().enumerate() {
            let tiles: Vec<char> = line.as_ref().trim().chars().collect();
            if tiles.len() != BOARD_SIZE as usize {
                return Err(LayoutError::RowLength { row, len: tiles.len() });
            }
            for (col, &tile) in tiles.iter().enumerate() {
                grid.cells[row][col] = Terrain::from_letter(tile)
                    .ok_or(LayoutError::UnknownTile { tile, row, col })?;
            }
        }
        Ok(grid)
    }

    /// Terrain at a square. Caller guarantees validity.
    pub fn get(&self, coord: Coord) -> Terrain {
        self.cells[coord.row as usize][coord.col as usize]
    }

    /// Override a single square (layout construction only)
    pub fn with(mut self, coord: Coord, terrain: Terrain) -> Self {
        self.cells[coord.row as usize][coord.col as usize] = terrain;
        self
    }

    /// Tile-letter rows, top (row 0) first
    pub fn to_rows(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|t| t.letter()).collect())
            .collect()
    }

    /// Load from a JSON layout file: `{ "name": ..., "rows": [...] }`
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout: {}", path.display()))?;
        let file: LayoutFile = serde_json::from_str(&content)
            .with_context(|| format!("Malformed layout JSON: {}", path.display()))?;
        let grid = Self::from_rows(&file.rows)?;
        Ok(grid)
    }

    /// Save as a JSON layout file
    pub fn save(&self, path: &Path, name: &str) -> anyhow::Result<()> {
        let file = LayoutFile {
            name: Some(name.to_string()),
            rows: self.to_rows(),
        };
        let content = serde_json::to_string_pretty(&file)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for TerrainGrid {
    /// A fixed four-quadrant layout mixing every class
    fn default() -> Self {
        const ROWS: [&str; 8] = [
            "RYGBBGYR",
            "GBRYYRBG",
            "YRBGGBRY",
            "BGYRRYGB",
            "BGYRRYGB",
            "YRBGGBRY",
            "GBRYYRBG",
            "RYGBBGYR",
        ];
        let mut grid = Self::uniform(Terrain::King);
        for (row, line) in ROWS.iter().enumerate() {
            for (col, tile) in line.chars().enumerate() {
                if let Some(terrain) = Terrain::from_letter(tile) {
                    grid.cells[row][col] = terrain;
                }
            }
        }
        grid
    }
}
