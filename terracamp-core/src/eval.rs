//! Position evaluation

use crate::board::Coord;
use crate::game::{Destination, GameState, Move, Player};
use anyhow::Context;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Win value (dominates any weighted feature sum)
pub const WIN_VALUE: f32 = 1_000_000.0;

/// Heuristic weights for position evaluation. Every feature is scored as
/// (own value - opponent value), so a positive weight rewards having more.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Camped pieces
    pub camp_weight: f32,
    /// Closeness of the two front-runners to the goal row
    pub advancement_weight: f32,
    /// Legal move count
    pub mobility_weight: f32,
    /// Pieces on the grid
    pub material_weight: f32,
    /// Legal captures
    pub threat_weight: f32,
    /// Pieces the opponent cannot capture this turn
    pub safety_weight: f32,
    /// Empty ray squares seen by pieces on Rook and Bishop terrain
    pub open_line_weight: f32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            camp_weight: 1000.0,
            advancement_weight: 50.0,
            mobility_weight: 10.0,
            material_weight: 6.0,
            threat_weight: 4.0,
            safety_weight: 3.0,
            open_line_weight: 3.0,
        }
    }
}

impl Heuristics {
    /// Load from JSON; missing fields keep their default weight
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read heuristics: {}", path.display()))?;
        let heuristics = serde_json::from_str(&content)
            .with_context(|| format!("Malformed heuristics JSON: {}", path.display()))?;
        Ok(heuristics)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Per-feature differentials from one side's point of view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FeatureBreakdown {
    pub camps: i32,
    /// Opponent's front-runner distance minus ours (positive = we are closer)
    pub advancement: i32,
    pub mobility: i32,
    pub material: i32,
    pub threats: i32,
    pub safety: i32,
    pub open_lines: i32,
}

impl FeatureBreakdown {
    pub fn weighted(&self, h: &Heuristics) -> f32 {
        h.camp_weight * self.camps as f32
            + h.advancement_weight * self.advancement as f32
            + h.mobility_weight * self.mobility as f32
            + h.material_weight * self.material as f32
            + h.threat_weight * self.threats as f32
            + h.safety_weight * self.safety as f32
            + h.open_line_weight * self.open_lines as f32
    }
}

/// Raw feature values for one side
#[derive(Clone, Copy, Debug, Default)]
struct SideFeatures {
    camps: i32,
    front_distance: i32,
    mobility: i32,
    material: i32,
    threats: i32,
    safety: i32,
    open_lines: i32,
}

/// Evaluate position from `perspective`'s point of view
pub fn evaluate(state: &GameState, perspective: Player, heuristics: &Heuristics) -> f32 {
    if let Some(winner) = state.winner() {
        return if winner == perspective { WIN_VALUE } else { -WIN_VALUE };
    }

    evaluate_breakdown(state, perspective).weighted(heuristics)
}

/// Evaluate with depth bonus for preferring faster wins. `depth` is the
/// search depth still remaining when the position was reached.
pub fn evaluate_with_depth(state: &GameState, perspective: Player, heuristics: &Heuristics, depth: u32) -> f32 {
    match state.winner() {
        Some(winner) if winner == perspective => WIN_VALUE + depth as f32,
        Some(_) => -WIN_VALUE - depth as f32,
        None => evaluate(state, perspective, heuristics),
    }
}

/// Feature differentials without weights or terminal handling
pub fn evaluate_breakdown(state: &GameState, perspective: Player) -> FeatureBreakdown {
    let opponent = perspective.opponent();
    let own_moves = state.legal_moves(perspective);
    let opp_moves = state.legal_moves(opponent);

    let own = side_features(state, perspective, &own_moves, &attacked_squares(&opp_moves));
    let opp = side_features(state, opponent, &opp_moves, &attacked_squares(&own_moves));

    FeatureBreakdown {
        camps: own.camps - opp.camps,
        advancement: opp.front_distance - own.front_distance,
        mobility: own.mobility - opp.mobility,
        material: own.material - opp.material,
        threats: own.threats - opp.threats,
        safety: own.safety - opp.safety,
        open_lines: own.open_lines - opp.open_lines,
    }
}

fn side_features(
    state: &GameState,
    player: Player,
    moves: &[Move],
    attacked: &FxHashSet<Coord>,
) -> SideFeatures {
    let threats = moves
        .iter()
        .filter(|mv| match mv.to {
            Destination::Square(to) => state.piece_at(to).is_some_and(|p| p.owner != player),
            Destination::Camp => false,
        })
        .count();

    let safety = state
        .pieces(player)
        .filter(|(pos, _)| !attacked.contains(pos))
        .count();

    SideFeatures {
        camps: state.camp(player).len() as i32,
        front_distance: front_runner_distance(state, player),
        mobility: moves.len() as i32,
        material: state.pieces_on_board(player) as i32,
        threats: threats as i32,
        safety: safety as i32,
        open_lines: open_lines(state, player),
    }
}

/// Squares an opponent could move onto this turn
fn attacked_squares(moves: &[Move]) -> FxHashSet<Coord> {
    moves
        .iter()
        .filter_map(|mv| match mv.to {
            Destination::Square(to) => Some(to),
            Destination::Camp => None,
        })
        .collect()
}

/// Summed goal-row distance of the two most advanced grid pieces
fn front_runner_distance(state: &GameState, player: Player) -> i32 {
    let goal = player.goal_row();
    let mut distances: Vec<i32> = state
        .pieces(player)
        .map(|(pos, _)| (pos.row - goal).abs() as i32)
        .collect();
    distances.sort_unstable();
    distances.iter().take(2).sum()
}

/// Empty squares along each ray of pieces on sliding terrain. Ignores the
/// terrain stop rule, so this measures reach rather than legal moves.
fn open_lines(state: &GameState, player: Player) -> i32 {
    let mut count = 0;
    for (pos, _) in state.pieces(player) {
        let Some(dirs) = state.terrain(pos).and_then(|t| t.ray_dirs()) else {
            continue;
        };
        for &(dr, dc) in dirs {
            let mut current = pos;
            while let Some(next) = current.offset(dr, dc) {
                if state.piece_at(next).is_some() {
                    break;
                }
                count += 1;
                current = next;
            }
        }
    }
    count
}
