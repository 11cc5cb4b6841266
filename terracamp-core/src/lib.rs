//! TERRACAMP Core - Game engine and AI
//!
//! This crate provides the core game logic for TERRACAMP, an 8x8 territory
//! game where the terrain under a piece decides how it moves:
//! - Board geometry (square grid, rays and jump offsets)
//! - Terrain classes and the terrain layout contract
//! - Game state, legal-move generation, reversible move execution
//! - Terminal detection (camp wins, material wins)
//! - Multi-feature position evaluation
//! - CPU-based minimax AI with alpha-beta pruning

pub mod board;
pub mod terrain;
pub mod game;
pub mod eval;
pub mod ai;

// Re-exports for convenient access
pub use board::{Coord, BOARD_SIZE};
pub use terrain::{LayoutError, Terrain, TerrainGrid};
pub use game::{
    Destination, GameResult, GameState, Move, MoveError, MoveRecord, Piece, PieceId, Player, Square,
    CAMP_CAPACITY, PIECES_PER_SIDE,
};
pub use eval::{evaluate, evaluate_breakdown, FeatureBreakdown, Heuristics, WIN_VALUE};
pub use ai::{find_best_move, minimax, search, AlphaBetaAI, SearchOutcome, SearchStats};
#[cfg(feature = "parallel")]
pub use ai::search_parallel;
