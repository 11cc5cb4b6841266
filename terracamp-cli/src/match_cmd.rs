//! Match command - play engine-vs-engine games on one terrain layout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_inputs(), play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use terracamp_core::{AlphaBetaAI, GameResult, GameState, Heuristics, Move, Player, TerrainGrid};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Terrain layout JSON file (built-in layout when omitted)
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Evaluation weights JSON file (defaults when omitted)
    #[arg(long, value_name = "FILE")]
    pub heuristics: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value = "2")]
    pub games: usize,

    /// Search depth in plies for White
    #[arg(long, default_value = "3")]
    pub white_depth: u32,

    /// Search depth in plies for Black
    #[arg(long, default_value = "3")]
    pub black_depth: u32,

    /// Random opening plies before the engines take over
    #[arg(long, default_value = "2")]
    pub random_plies: usize,

    /// Ply limit; a game still running at the limit is a draw
    #[arg(long, default_value = "200")]
    pub max_plies: usize,

    /// Score root moves on parallel board copies
    #[cfg(feature = "parallel")]
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    plies: usize,
    white_camp: usize,
    black_camp: usize,
    moves: Vec<Move>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    white_wins: usize,
    black_wins: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let (terrain, heuristics) = load_inputs(&args)?;

    tracing::info!(
        "Starting match: {} games, white depth={}, black depth={}",
        args.games,
        args.white_depth,
        args.black_depth
    );

    let results = play_match(&terrain, &heuristics, &args, seed)?;

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the terrain layout and evaluation weights
fn load_inputs(args: &MatchArgs) -> Result<(TerrainGrid, Heuristics)> {
    let terrain = match &args.layout {
        Some(path) => TerrainGrid::load(path)
            .with_context(|| format!("Failed to load layout: {}", path.display()))?,
        None => TerrainGrid::default(),
    };

    let heuristics = match &args.heuristics {
        Some(path) => Heuristics::load(path)
            .with_context(|| format!("Failed to load heuristics: {}", path.display()))?,
        None => Heuristics::default(),
    };

    Ok((terrain, heuristics))
}

/// Play all games in the match
fn play_match(
    terrain: &TerrainGrid,
    heuristics: &Heuristics,
    args: &MatchArgs,
    seed: Option<u64>,
) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let record = play_single_game(terrain, heuristics, game_num + 1, args, &mut rng)?;

        tracing::info!(
            "Game {}: {} ({} plies)",
            record.game_number,
            record.result,
            record.plies
        );

        games.push(record);
    }

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game from the standard start position
fn play_single_game(
    terrain: &TerrainGrid,
    heuristics: &Heuristics,
    game_number: usize,
    args: &MatchArgs,
    rng: &mut ChaCha8Rng,
) -> Result<GameRecord> {
    let mut state = GameState::new(terrain.clone());
    let mut white = AlphaBetaAI::new(args.white_depth, heuristics.clone());
    let mut black = AlphaBetaAI::new(args.black_depth, heuristics.clone());

    let mut to_move = Player::White;
    let mut moves = Vec::new();

    while !state.is_over() && moves.len() < args.max_plies {
        let choice = if moves.len() < args.random_plies {
            state.legal_moves(to_move).choose(rng).copied()
        } else {
            let ai = match to_move {
                Player::White => &mut white,
                Player::Black => &mut black,
            };
            choose_engine_move(ai, &mut state, to_move, args)
        };

        let Some(mv) = choice else {
            tracing::warn!("{:?} has no legal moves in game {}", to_move, game_number);
            break;
        };

        let _record = state
            .apply_move(to_move, mv.from, mv.to)
            .with_context(|| format!("Engine chose an unplayable move {}", mv))?;
        tracing::debug!(ply = moves.len() + 1, player = ?to_move, %mv, "move played");

        moves.push(mv);
        to_move = to_move.opponent();
    }

    Ok(GameRecord {
        game_number,
        result: state.result(),
        plies: moves.len(),
        white_camp: state.camp(Player::White).len(),
        black_camp: state.camp(Player::Black).len(),
        moves,
    })
}

#[cfg(feature = "parallel")]
fn choose_engine_move(ai: &mut AlphaBetaAI, state: &mut GameState, player: Player, args: &MatchArgs) -> Option<Move> {
    if args.parallel {
        ai.best_move_parallel(state, player)
    } else {
        ai.best_move(state, player)
    }
}

#[cfg(not(feature = "parallel"))]
fn choose_engine_move(ai: &mut AlphaBetaAI, state: &mut GameState, player: Player, _args: &MatchArgs) -> Option<Move> {
    ai.best_move(state, player)
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let white_wins = games
        .iter()
        .filter(|g| g.result == GameResult::WhiteWins)
        .count();
    let black_wins = games
        .iter()
        .filter(|g| g.result == GameResult::BlackWins)
        .count();
    let draws = games
        .iter()
        .filter(|g| g.result == GameResult::Ongoing)
        .count();

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        games,
        white_wins,
        black_wins,
        draws,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: GameResult,
        plies: usize,
        white_camp: usize,
        black_camp: usize,
        moves: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        white_wins: usize,
        black_wins: usize,
        draws: usize,
        avg_plies: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        white_wins: results.white_wins,
        black_wins: results.black_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: g.result,
                plies: g.plies,
                white_camp: g.white_camp,
                black_camp: g.black_camp,
                moves: g.moves.iter().map(|m| m.to_string()).collect(),
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("White wins:  {} ({:.1}%)", results.white_wins, percent(results.white_wins, total));
    println!("Black wins:  {} ({:.1}%)", results.black_wins, percent(results.black_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg plies:   {:.1}", results.avg_plies);

    println!("\n--- Games ---");
    for g in &results.games {
        println!(
            "#{:<3} {:<16} {:>4} plies  camps {}-{}",
            g.game_number,
            g.result.to_string(),
            g.plies,
            g.white_camp,
            g.black_camp
        );
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 * 100.0 / total as f32
    }
}
