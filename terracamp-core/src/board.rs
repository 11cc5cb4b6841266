//! Square-grid geometry: coordinates, rays and jump offsets

use serde::{Deserialize, Serialize};

/// Board width and height
pub const BOARD_SIZE: i8 = 8;

/// Grid coordinate (row 0 is Black's home row, row 7 is White's)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i8,
    pub col: i8,
}

impl Coord {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this coordinate is on the board
    pub fn is_valid(&self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Offset by (dr, dc), returning None when the result leaves the board
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Coord> {
        let next = Coord::new(self.row + dr, self.col + dc);
        next.is_valid().then_some(next)
    }

    /// Flat index into a row-major 8x8 array. Caller guarantees validity.
    pub(crate) fn index(&self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Iterate every square in scan order (row-major)
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Coord::new(row, col)))
    }
}

impl std::fmt::Display for Coord {
    /// Renders as file letter + rank digit, e.g. (7, 0) -> "A1"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            let file = (b'A' + self.col as u8) as char;
            write!(f, "{}{}", file, BOARD_SIZE - self.row)
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}

/// Orthogonal rays (dr, dc): left, right, up, down
pub const ROOK_DIRS: [(i8, i8); 4] = [
    (0, -1),  // left
    (0, 1),   // right
    (-1, 0),  // up
    (1, 0),   // down
];

/// Diagonal rays (dr, dc)
pub const BISHOP_DIRS: [(i8, i8); 4] = [
    (-1, 1),  // up-right
    (1, 1),   // down-right
    (1, -1),  // down-left
    (-1, -1), // up-left
];

/// Knight jump offsets
pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, -1),
    (2, 1),
    (1, -2),
    (1, 2),
    (-1, -2),
    (-1, 2),
    (-2, -1),
    (-2, 1),
];

/// Single-step offsets to the 8 neighbours
pub const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
