//! CPU-based Alpha-Beta AI
//!
//! Plain minimax over the game tree with alpha-beta pruning. The board is
//! mutated in place: every descent applies one move and undoes it before
//! the next sibling is tried, including when a cutoff ends the loop early.

use crate::eval::{evaluate, evaluate_with_depth, Heuristics};
use crate::game::{GameState, Move, MoveRecord, Player};

// ============================================================================
// SEARCH STATISTICS
// ============================================================================

/// Counters collected during one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions visited (interior and leaf)
    pub nodes: u64,
    /// Positions scored by the evaluator
    pub leaves: u64,
    /// Move loops abandoned because beta <= alpha
    pub cutoffs: u64,
}

impl SearchStats {
    fn merge(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
    }
}

/// Result of a root search
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchOutcome {
    pub best_move: Move,
    pub score: f32,
    pub stats: SearchStats,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
#[derive(Clone, Debug)]
pub struct AlphaBetaAI {
    pub depth: u32,
    pub heuristics: Heuristics,
    last_stats: SearchStats,
}

impl AlphaBetaAI {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self {
            depth,
            heuristics,
            last_stats: SearchStats::default(),
        }
    }

    /// Get best move for `player`. The board is returned unchanged.
    pub fn best_move(&mut self, state: &mut GameState, player: Player) -> Option<Move> {
        let outcome = search(state, player, self.depth, &self.heuristics)?;
        self.last_stats = outcome.stats;
        Some(outcome.best_move)
    }

    /// Same choice as `best_move`, scoring root moves on separate board copies
    #[cfg(feature = "parallel")]
    pub fn best_move_parallel(&mut self, state: &GameState, player: Player) -> Option<Move> {
        let outcome = search_parallel(state, player, self.depth, &self.heuristics)?;
        self.last_stats = outcome.stats;
        Some(outcome.best_move)
    }

    /// Play a complete self-play game, White first
    pub fn play_game(&mut self, initial: GameState, max_plies: usize) -> (GameState, Vec<Move>) {
        let mut state = initial;
        let mut history = Vec::new();
        let mut to_move = Player::White;

        while !state.is_over() && history.len() < max_plies {
            match self.best_move(&mut state, to_move) {
                Some(mv) => {
                    let _ = apply_own_move(&mut state, to_move, mv);
                    history.push(mv);
                    to_move = to_move.opponent();
                }
                None => {
                    tracing::warn!(player = ?to_move, "no legal moves, stopping game");
                    break;
                }
            }
        }

        (state, history)
    }

    /// Evaluate a position for `player`
    pub fn evaluate(&self, state: &GameState, player: Player) -> f32 {
        evaluate(state, player, &self.heuristics)
    }

    /// Statistics of the most recent search
    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Apply a move taken from our own legal-move list. A refusal means move
/// generation and execution disagree, which is unrecoverable.
fn apply_own_move(state: &mut GameState, player: Player, mv: Move) -> MoveRecord {
    match state.apply_move(player, mv.from, mv.to) {
        Ok(record) => record,
        Err(err) => panic!("generated move {} for {:?} was rejected: {}", mv, player, err),
    }
}

/// Score of the position for `root`, searching `depth` plies with
/// `to_move` to play. Maximizes on `root`'s turns, minimizes otherwise.
#[allow(clippy::too_many_arguments)]
pub fn minimax(
    state: &mut GameState,
    to_move: Player,
    depth: u32,
    mut alpha: f32,
    mut beta: f32,
    root: Player,
    heuristics: &Heuristics,
    stats: &mut SearchStats,
) -> f32 {
    stats.nodes += 1;

    if depth == 0 || state.is_over() {
        stats.leaves += 1;
        return evaluate_with_depth(state, root, heuristics, depth);
    }

    // A side with nothing to play is scored where it stands
    let moves = state.legal_moves(to_move);
    if moves.is_empty() {
        stats.leaves += 1;
        return evaluate(state, root, heuristics);
    }

    let maximizing = to_move == root;
    let mut best = if maximizing { f32::NEG_INFINITY } else { f32::INFINITY };

    for mv in moves {
        let record = apply_own_move(state, to_move, mv);
        let score = minimax(
            state,
            to_move.opponent(),
            depth - 1,
            alpha,
            beta,
            root,
            heuristics,
            stats,
        );
        state.undo_move(record);

        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }

        if beta <= alpha {
            stats.cutoffs += 1;
            break;
        }
    }

    best
}

/// Search every root move and keep the first one with the strictly highest
/// score. Depth 0 is searched as depth 1.
pub fn search(
    state: &mut GameState,
    player: Player,
    depth: u32,
    heuristics: &Heuristics,
) -> Option<SearchOutcome> {
    let depth = depth.max(1);
    let mut stats = SearchStats::default();
    let mut best: Option<(Move, f32)> = None;

    for mv in state.legal_moves(player) {
        // Window opens at the best root score so far; a fail-low bound never exceeds it
        let alpha = best.map_or(f32::NEG_INFINITY, |(_, score)| score);

        let record = apply_own_move(state, player, mv);
        let score = minimax(
            state,
            player.opponent(),
            depth - 1,
            alpha,
            f32::INFINITY,
            player,
            heuristics,
            &mut stats,
        );
        state.undo_move(record);

        tracing::trace!(%mv, score, "root move");

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }

    let (best_move, score) = best?;
    tracing::debug!(
        player = ?player,
        depth,
        %best_move,
        score,
        nodes = stats.nodes,
        cutoffs = stats.cutoffs,
        "search complete"
    );

    Some(SearchOutcome {
        best_move,
        score,
        stats,
    })
}

/// Best move for `player` at the given depth, None if it has no legal move
pub fn find_best_move(
    state: &mut GameState,
    player: Player,
    depth: u32,
    heuristics: &Heuristics,
) -> Option<Move> {
    search(state, player, depth, heuristics).map(|outcome| outcome.best_move)
}

/// Root-parallel search. Each worker owns a clone of the board; results are
/// reduced in generator order so ties resolve as in `search`.
#[cfg(feature = "parallel")]
pub fn search_parallel(
    state: &GameState,
    player: Player,
    depth: u32,
    heuristics: &Heuristics,
) -> Option<SearchOutcome> {
    use rayon::prelude::*;

    let depth = depth.max(1);
    let moves = state.legal_moves(player);

    let scored: Vec<(Move, f32, SearchStats)> = moves
        .par_iter()
        .map(|&mv| {
            let mut board = state.clone();
            let mut stats = SearchStats::default();
            let record = apply_own_move(&mut board, player, mv);
            let score = minimax(
                &mut board,
                player.opponent(),
                depth - 1,
                f32::NEG_INFINITY,
                f32::INFINITY,
                player,
                heuristics,
                &mut stats,
            );
            board.undo_move(record);
            (mv, score, stats)
        })
        .collect();

    let mut stats = SearchStats::default();
    let mut best: Option<(Move, f32)> = None;
    for (mv, score, worker_stats) in scored {
        stats.merge(worker_stats);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((mv, score));
        }
    }

    let (best_move, score) = best?;
    tracing::debug!(player = ?player, depth, %best_move, score, nodes = stats.nodes, "parallel search complete");

    Some(SearchOutcome {
        best_move,
        score,
        stats,
    })
}

// ============================================================================
// TESTS
// ============================================================================
