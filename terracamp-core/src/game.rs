//! Game state, move generation and reversible move execution

use crate::board::{Coord, BOARD_SIZE};
use crate::terrain::{MoveShape, Terrain, TerrainGrid};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Pieces each side starts with (one per column of its home row)
pub const PIECES_PER_SIDE: usize = 8;

/// Camp slots per side; filling them wins the game
pub const CAMP_CAPACITY: usize = 2;

/// A side loses once it has fewer than this many pieces on the grid
pub const MIN_PIECES_ON_BOARD: usize = 2;

const NUM_SQUARES: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Row the side's pieces start on
    pub fn home_row(self) -> i8 {
        match self {
            Player::White => BOARD_SIZE - 1,
            Player::Black => 0,
        }
    }

    /// Row nearest the opponent's home; camp is entered from here
    pub fn goal_row(self) -> i8 {
        self.opponent().home_row()
    }
}

/// Stable piece identity, never reused within a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u16);

/// A piece handle: identity plus owner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub owner: Player,
}

/// One board square
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub terrain: Terrain,
    pub occupant: Option<Piece>,
}

/// Where a move ends: a grid square or the mover's camp
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Square(Coord),
    Camp,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Square(coord) => write!(f, "{}", coord),
            Destination::Camp => write!(f, "camp"),
        }
    }
}

impl From<Coord> for Destination {
    fn from(coord: Coord) -> Self {
        Destination::Square(coord)
    }
}

/// A legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Coord,
    pub to: Destination,
}

impl Move {
    pub fn new(from: Coord, to: impl Into<Destination>) -> Self {
        Self { from, to: to.into() }
    }

    pub fn camp(from: Coord) -> Self {
        Self { from, to: Destination::Camp }
    }

    pub fn is_camp_entry(&self) -> bool {
        self.to == Destination::Camp
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Everything needed to reverse one applied move
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a move record must be handed back to undo_move"]
pub struct MoveRecord {
    piece: Piece,
    from: Coord,
    to: Destination,
    captured: Option<Piece>,
}

impl MoveRecord {
    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn from(&self) -> Coord {
        self.from
    }

    pub fn to(&self) -> Destination {
        self.to
    }

    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    pub fn entered_camp(&self) -> bool {
        self.to == Destination::Camp
    }

    pub fn as_move(&self) -> Move {
        Move { from: self.from, to: self.to }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Ongoing => None,
            GameResult::WhiteWins => Some(Player::White),
            GameResult::BlackWins => Some(Player::Black),
        }
    }

    fn won_by(player: Player) -> Self {
        match player {
            Player::White => GameResult::WhiteWins,
            Player::Black => GameResult::BlackWins,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Ongoing => write!(f, "Game in progress"),
            GameResult::WhiteWins => write!(f, "White has won"),
            GameResult::BlackWins => write!(f, "Black has won"),
        }
    }
}

/// Why a requested move was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("coordinate {0} is off the board")]
    InvalidCoordinate(Coord),

    #[error("no piece found at {0}")]
    NoPieceAtSource(Coord),

    #[error("piece at {at} belongs to {owner:?}")]
    WrongOwner { at: Coord, owner: Player },

    #[error("{player:?} cannot enter camp from {from}")]
    CampEntryDenied { player: Player, from: Coord },

    #[error("{0} is not a legal move")]
    IllegalMove(Move),
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Board position (mutated in place, reversed with undo_move)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    /// Row-major squares; terrain is fixed at construction
    squares: [Square; NUM_SQUARES],

    /// Every piece each side was given, in creation order
    rosters: [Vec<Piece>; 2],

    /// Camped pieces in entry order
    camps: [Vec<Piece>; 2],

    /// Grid-resident piece counts, kept in step with apply/undo
    on_board: [usize; 2],

    next_id: u16,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Standard start: eight pieces per side on the home rows
    pub fn new(terrain: TerrainGrid) -> Self {
        let mut state = Self::empty(terrain);
        for player in [Player::White, Player::Black] {
            for col in 0..BOARD_SIZE {
                state.place(Coord::new(player.home_row(), col), player);
            }
        }
        state
    }

    /// Board with terrain only
    pub fn empty(terrain: TerrainGrid) -> Self {
        let squares = std::array::from_fn(|i| {
            let coord = Coord::new((i / BOARD_SIZE as usize) as i8, (i % BOARD_SIZE as usize) as i8);
            Square {
                terrain: terrain.get(coord),
                occupant: None,
            }
        });

        Self {
            squares,
            rosters: [Vec::with_capacity(PIECES_PER_SIDE), Vec::with_capacity(PIECES_PER_SIDE)],
            camps: [Vec::with_capacity(CAMP_CAPACITY), Vec::with_capacity(CAMP_CAPACITY)],
            on_board: [0, 0],
            next_id: 0,
        }
    }

    /// Put a new piece on an empty square. Returns None if the square is
    /// off the board or taken.
    pub fn place(&mut self, coord: Coord, owner: Player) -> Option<Piece> {
        if !coord.is_valid() || self.squares[coord.index()].occupant.is_some() {
            return None;
        }

        let piece = Piece {
            id: PieceId(self.next_id),
            owner,
        };
        self.next_id += 1;
        self.squares[coord.index()].occupant = Some(piece);
        self.rosters[owner.index()].push(piece);
        self.on_board[owner.index()] += 1;
        Some(piece)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn square(&self, coord: Coord) -> Option<&Square> {
        coord.is_valid().then(|| &self.squares[coord.index()])
    }

    pub fn terrain(&self, coord: Coord) -> Option<Terrain> {
        self.square(coord).map(|sq| sq.terrain)
    }

    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.square(coord).and_then(|sq| sq.occupant)
    }

    /// Pieces of one side currently on the grid, in scan order
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::all().filter_map(move |coord| match self.squares[coord.index()].occupant {
            Some(piece) if piece.owner == player => Some((coord, piece)),
            _ => None,
        })
    }

    pub fn roster(&self, player: Player) -> &[Piece] {
        &self.rosters[player.index()]
    }

    pub fn camp(&self, player: Player) -> &[Piece] {
        &self.camps[player.index()]
    }

    pub fn pieces_on_board(&self, player: Player) -> usize {
        self.on_board[player.index()]
    }

    /// Terrain layout the board was built with
    pub fn terrain_grid(&self) -> TerrainGrid {
        Coord::all().fold(TerrainGrid::uniform(Terrain::King), |grid, coord| {
            grid.with(coord, self.squares[coord.index()].terrain)
        })
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// Every legal move for a side, in scan order then direction order
    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (pos, piece) in self.pieces(player) {
            self.generate_piece_moves(pos, piece, &mut moves);
        }
        moves
    }

    /// Number of legal moves available to a side
    pub fn mobility(&self, player: Player) -> usize {
        self.legal_moves(player).len()
    }

    /// Whether a piece of `player` standing on `from` may step into camp
    pub fn can_enter_camp(&self, player: Player, from: Coord) -> bool {
        from.row == player.goal_row() && self.camps[player.index()].len() < CAMP_CAPACITY
    }

    fn generate_piece_moves(&self, pos: Coord, piece: Piece, moves: &mut Vec<Move>) {
        let terrain = self.squares[pos.index()].terrain;

        match terrain.move_shape() {
            MoveShape::Ray { dirs, stop_on } => {
                self.generate_ray_moves(pos, piece, dirs, stop_on, moves);
            }
            MoveShape::Leap(offsets) => {
                self.generate_leap_moves(pos, piece, offsets, moves);
            }
        }

        if self.can_enter_camp(piece.owner, pos) {
            moves.push(Move::camp(pos));
        }
    }

    fn generate_ray_moves(
        &self,
        pos: Coord,
        piece: Piece,
        dirs: &[(i8, i8)],
        stop_on: Terrain,
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in dirs {
            let mut current = pos;
            while let Some(next) = current.offset(dr, dc) {
                let square = &self.squares[next.index()];
                match square.occupant {
                    Some(occupant) if occupant.owner == piece.owner => break,
                    Some(_) => {
                        moves.push(Move::new(pos, next));
                        break;
                    }
                    None => {
                        moves.push(Move::new(pos, next));
                        // Matching terrain is reachable but ends the ray
                        if square.terrain == stop_on {
                            break;
                        }
                    }
                }
                current = next;
            }
        }
    }

    fn generate_leap_moves(&self, pos: Coord, piece: Piece, offsets: &[(i8, i8)], moves: &mut Vec<Move>) {
        for &(dr, dc) in offsets {
            if let Some(target) = pos.offset(dr, dc) {
                match self.squares[target.index()].occupant {
                    Some(occupant) if occupant.owner == piece.owner => {}
                    _ => moves.push(Move::new(pos, target)),
                }
            }
        }
    }

    // ========================================================================
    // MOVE EXECUTION
    // ========================================================================

    /// Validate and apply a move in place
    pub fn apply_move(
        &mut self,
        player: Player,
        from: Coord,
        to: Destination,
    ) -> Result<MoveRecord, MoveError> {
        if !from.is_valid() {
            return Err(MoveError::InvalidCoordinate(from));
        }
        if let Destination::Square(dest) = to {
            if !dest.is_valid() {
                return Err(MoveError::InvalidCoordinate(dest));
            }
        }

        let piece = self.squares[from.index()]
            .occupant
            .ok_or(MoveError::NoPieceAtSource(from))?;
        if piece.owner != player {
            return Err(MoveError::WrongOwner {
                at: from,
                owner: piece.owner,
            });
        }

        if to == Destination::Camp && !self.can_enter_camp(player, from) {
            return Err(MoveError::CampEntryDenied { player, from });
        }

        // The source piece's moves are exactly its share of legal_moves(player)
        let mv = Move { from, to };
        let mut piece_moves = Vec::with_capacity(32);
        self.generate_piece_moves(from, piece, &mut piece_moves);
        if !piece_moves.contains(&mv) {
            return Err(MoveError::IllegalMove(mv));
        }

        Ok(self.execute(piece, from, to))
    }

    /// Apply a move already known to be legal
    fn execute(&mut self, piece: Piece, from: Coord, to: Destination) -> MoveRecord {
        self.squares[from.index()].occupant = None;

        let captured = match to {
            Destination::Camp => {
                self.camps[piece.owner.index()].push(piece);
                self.on_board[piece.owner.index()] -= 1;
                None
            }
            Destination::Square(dest) => {
                let captured = self.squares[dest.index()].occupant.replace(piece);
                if let Some(victim) = captured {
                    self.on_board[victim.owner.index()] -= 1;
                }
                captured
            }
        };

        MoveRecord {
            piece,
            from,
            to,
            captured,
        }
    }

    /// Reverse a move produced by apply_move. Records must be undone in
    /// reverse order of application.
    pub fn undo_move(&mut self, record: MoveRecord) {
        let owner = record.piece.owner.index();

        match record.to {
            Destination::Camp => {
                let camp = &mut self.camps[owner];
                if let Some(slot) = camp.iter().rposition(|p| p.id == record.piece.id) {
                    camp.remove(slot);
                }
                self.on_board[owner] += 1;
            }
            Destination::Square(dest) => {
                self.squares[dest.index()].occupant = record.captured;
                if let Some(victim) = record.captured {
                    self.on_board[victim.owner.index()] += 1;
                }
            }
        }

        self.squares[record.from.index()].occupant = Some(record.piece);
    }

    // ========================================================================
    // TERMINAL DETECTION
    // ========================================================================

    /// Decisive outcome, if any. Camp wins take precedence over material.
    pub fn result(&self) -> GameResult {
        for player in [Player::White, Player::Black] {
            if self.camps[player.index()].len() >= CAMP_CAPACITY {
                return GameResult::won_by(player);
            }
        }
        for player in [Player::White, Player::Black] {
            if self.on_board[player.opponent().index()] < MIN_PIECES_ON_BOARD {
                return GameResult::won_by(player);
            }
        }
        GameResult::Ongoing
    }

    pub fn is_over(&self) -> bool {
        self.result() != GameResult::Ongoing
    }

    pub fn winner(&self) -> Option<Player> {
        self.result().winner()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn destinations(moves: &[Move], from: Coord) -> Vec<Destination> {
        moves.iter().filter(|m| m.from == from).map(|m| m.to).collect()
    }

    fn squares(moves: &[Move], from: Coord) -> Vec<Coord> {
        moves
            .iter()
            .filter_map(|m| match m.to {
                Destination::Square(c) if m.from == from => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Board with a single terrain class and no pieces
    fn bare(terrain: Terrain) -> GameState {
        GameState::empty(TerrainGrid::uniform(terrain))
    }

    #[test]
    fn test_game_creation() {
        let game = GameState::new(TerrainGrid::default());
        assert_eq!(game.pieces_on_board(Player::White), PIECES_PER_SIDE);
        assert_eq!(game.pieces_on_board(Player::Black), PIECES_PER_SIDE);
        assert!(game.pieces(Player::White).all(|(c, _)| c.row == 7));
        assert!(game.pieces(Player::Black).all(|(c, _)| c.row == 0));
        assert_eq!(game.roster(Player::White).len(), 8);
        assert!(game.camp(Player::White).is_empty());
        assert_eq!(game.result(), GameResult::Ongoing);
        assert_eq!(game.terrain_grid(), TerrainGrid::default());
    }

    #[test]
    fn test_piece_ids_are_unique() {
        let game = GameState::new(TerrainGrid::default());
        let mut ids: Vec<_> = game
            .roster(Player::White)
            .iter()
            .chain(game.roster(Player::Black))
            .map(|p| p.id)
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn test_place_rejects_taken_and_invalid() {
        let mut game = bare(Terrain::King);
        assert!(game.place(Coord::new(3, 3), Player::White).is_some());
        assert!(game.place(Coord::new(3, 3), Player::Black).is_none());
        assert!(game.place(Coord::new(8, 3), Player::Black).is_none());
    }

    #[test]
    fn test_rook_stops_on_rook_terrain() {
        let mut game = bare(Terrain::Rook);
        let from = Coord::new(3, 3);
        game.place(from, Player::White);

        let moves = game.legal_moves(Player::White);
        let rightward: Vec<_> = squares(&moves, from).into_iter().filter(|c| c.row == 3 && c.col > 3).collect();
        assert_eq!(rightward, vec![Coord::new(3, 4)]);
        assert_eq!(
            squares(&moves, from),
            vec![Coord::new(3, 2), Coord::new(3, 4), Coord::new(2, 3), Coord::new(4, 3)]
        );
    }

    #[test]
    fn test_rook_open_rays() {
        let grid = TerrainGrid::uniform(Terrain::King).with(Coord::new(3, 3), Terrain::Rook);
        let mut game = GameState::empty(grid);
        let from = Coord::new(3, 3);
        game.place(from, Player::White);

        let moves = game.legal_moves(Player::White);
        // 3 left, 4 right, 3 up, 4 down
        assert_eq!(moves.len(), 14);
    }

    #[test]
    fn test_rook_blocking_and_capture() {
        let grid = TerrainGrid::uniform(Terrain::King).with(Coord::new(3, 3), Terrain::Rook);
        let mut game = GameState::empty(grid);
        let from = Coord::new(3, 3);
        game.place(from, Player::White);
        game.place(Coord::new(3, 5), Player::White);
        game.place(Coord::new(1, 3), Player::Black);

        let moves = game.legal_moves(Player::White);
        let rook = squares(&moves, from);
        assert!(rook.contains(&Coord::new(3, 4)));
        assert!(!rook.contains(&Coord::new(3, 5)));
        assert!(!rook.contains(&Coord::new(3, 6)));
        assert!(rook.contains(&Coord::new(2, 3)));
        assert!(rook.contains(&Coord::new(1, 3)));
        assert!(!rook.contains(&Coord::new(0, 3)));
    }

    #[test]
    fn test_bishop_stops_on_bishop_terrain() {
        let grid = TerrainGrid::uniform(Terrain::Knight)
            .with(Coord::new(4, 4), Terrain::Bishop)
            .with(Coord::new(2, 6), Terrain::Bishop);
        let mut game = GameState::empty(grid);
        let from = Coord::new(4, 4);
        game.place(from, Player::White);

        let moves = game.legal_moves(Player::White);
        let dests = squares(&moves, from);
        // up-right ray halts on the bishop square at (2, 6)
        assert!(dests.contains(&Coord::new(3, 5)));
        assert!(dests.contains(&Coord::new(2, 6)));
        assert!(!dests.contains(&Coord::new(1, 7)));
        // down-right (5,5),(6,6),(7,7); down-left (5,3),(6,2),(7,1); up-left 4 squares
        assert_eq!(dests.len(), 2 + 3 + 3 + 4);
        assert!(dests.iter().all(|c| (c.row - 4).abs() == (c.col - 4).abs()));
    }

    #[test]
    fn test_knight_has_eight_jumps_in_center() {
        let mut game = bare(Terrain::Knight);
        let from = Coord::new(4, 4);
        game.place(from, Player::White);

        let dests = squares(&game.legal_moves(Player::White), from);
        assert_eq!(dests.len(), 8);
        assert!(dests.iter().all(|c| c.is_valid()));
    }

    #[test]
    fn test_knight_ignores_blockers() {
        let mut game = bare(Terrain::Knight);
        let from = Coord::new(4, 4);
        game.place(from, Player::White);
        for (dr, dc) in crate::board::KING_OFFSETS {
            game.place(Coord::new(4 + dr, 4 + dc), Player::Black);
        }
        game.place(Coord::new(6, 5), Player::White);
        game.place(Coord::new(2, 3), Player::Black);

        let dests = squares(&game.legal_moves(Player::White), from);
        assert_eq!(dests.len(), 7);
        assert!(!dests.contains(&Coord::new(6, 5)));
        assert!(dests.contains(&Coord::new(2, 3)));
    }

    #[test]
    fn test_king_steps() {
        let mut game = bare(Terrain::King);
        game.place(Coord::new(4, 4), Player::Black);
        game.place(Coord::new(0, 7), Player::Black);
        let moves = game.legal_moves(Player::Black);
        assert_eq!(squares(&moves, Coord::new(4, 4)).len(), 8);
        assert_eq!(squares(&moves, Coord::new(0, 7)).len(), 3);
    }

    #[test]
    fn test_camp_entry_rows() {
        let mut game = bare(Terrain::King);
        let white_goal = Coord::new(0, 2);
        let white_home = Coord::new(7, 2);
        let black_goal = Coord::new(7, 5);
        game.place(white_goal, Player::White);
        game.place(white_home, Player::White);
        game.place(black_goal, Player::Black);

        let white_moves = game.legal_moves(Player::White);
        assert_eq!(destinations(&white_moves, white_goal).last(), Some(&Destination::Camp));
        assert!(!destinations(&white_moves, white_home).contains(&Destination::Camp));

        let black_moves = game.legal_moves(Player::Black);
        assert_eq!(destinations(&black_moves, black_goal).last(), Some(&Destination::Camp));
    }

    #[test]
    fn test_legal_moves_never_land_on_friends() {
        let game = GameState::new(TerrainGrid::default());
        for player in [Player::White, Player::Black] {
            for mv in game.legal_moves(player) {
                assert_eq!(game.piece_at(mv.from).map(|p| p.owner), Some(player));
                if let Destination::Square(to) = mv.to {
                    assert_ne!(game.piece_at(to).map(|p| p.owner), Some(player));
                }
            }
        }
    }

    #[test]
    fn test_generation_order_is_deterministic() {
        let game = GameState::new(TerrainGrid::default());
        let first = game.legal_moves(Player::White);
        let second = game.legal_moves(Player::White);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0].from <= w[1].from));
    }

    #[test]
    fn test_apply_errors() {
        let mut game = GameState::new(TerrainGrid::uniform(Terrain::King));

        assert_eq!(
            game.apply_move(Player::White, Coord::new(8, 0), Coord::new(6, 0).into()),
            Err(MoveError::InvalidCoordinate(Coord::new(8, 0)))
        );
        assert_eq!(
            game.apply_move(Player::White, Coord::new(7, 0), Coord::new(6, -1).into()),
            Err(MoveError::InvalidCoordinate(Coord::new(6, -1)))
        );
        assert_eq!(
            game.apply_move(Player::White, Coord::new(4, 4), Coord::new(3, 4).into()),
            Err(MoveError::NoPieceAtSource(Coord::new(4, 4)))
        );
        assert_eq!(
            game.apply_move(Player::White, Coord::new(0, 0), Coord::new(1, 0).into()),
            Err(MoveError::WrongOwner {
                at: Coord::new(0, 0),
                owner: Player::Black
            })
        );
        assert_eq!(
            game.apply_move(Player::White, Coord::new(7, 0), Destination::Camp),
            Err(MoveError::CampEntryDenied {
                player: Player::White,
                from: Coord::new(7, 0)
            })
        );
        let jump = Move::new(Coord::new(7, 0), Coord::new(5, 0));
        assert_eq!(
            game.apply_move(Player::White, jump.from, jump.to),
            Err(MoveError::IllegalMove(jump))
        );
        // Failed requests leave the board untouched
        assert_eq!(game, GameState::new(TerrainGrid::uniform(Terrain::King)));
    }

    #[test]
    fn test_apply_and_undo_quiet_move() {
        let mut game = GameState::new(TerrainGrid::uniform(Terrain::King));
        let before = game.clone();

        let record = game
            .apply_move(Player::White, Coord::new(7, 3), Coord::new(6, 3).into())
            .unwrap();
        assert_eq!(game.piece_at(Coord::new(7, 3)), None);
        assert_eq!(game.piece_at(Coord::new(6, 3)), Some(record.piece()));
        assert_eq!(record.captured(), None);
        assert!(!record.entered_camp());

        game.undo_move(record);
        assert_eq!(game, before);
    }

    #[test]
    fn test_apply_and_undo_capture() {
        let mut game = bare(Terrain::King);
        game.place(Coord::new(3, 3), Player::White);
        let victim = game.place(Coord::new(2, 3), Player::Black).unwrap();
        let before = game.clone();

        let record = game
            .apply_move(Player::White, Coord::new(3, 3), Coord::new(2, 3).into())
            .unwrap();
        assert_eq!(record.captured(), Some(victim));
        assert_eq!(game.pieces_on_board(Player::Black), 0);
        assert_eq!(game.piece_at(Coord::new(2, 3)).map(|p| p.owner), Some(Player::White));

        game.undo_move(record);
        assert_eq!(game, before);
        assert_eq!(game.piece_at(Coord::new(2, 3)), Some(victim));
    }

    #[test]
    fn test_apply_and_undo_camp_entry() {
        let mut game = bare(Terrain::Rook);
        let runner = game.place(Coord::new(0, 4), Player::White).unwrap();
        game.place(Coord::new(5, 5), Player::White);
        let before = game.clone();

        let record = game
            .apply_move(Player::White, Coord::new(0, 4), Destination::Camp)
            .unwrap();
        assert!(record.entered_camp());
        assert_eq!(game.camp(Player::White), &[runner]);
        assert_eq!(game.piece_at(Coord::new(0, 4)), None);
        assert_eq!(game.pieces_on_board(Player::White), 1);

        game.undo_move(record);
        assert_eq!(game, before);
    }

    #[test]
    fn test_two_camped_pieces_win() {
        let mut game = bare(Terrain::King);
        game.place(Coord::new(0, 1), Player::White);
        game.place(Coord::new(0, 6), Player::White);
        game.place(Coord::new(4, 4), Player::White);
        game.place(Coord::new(3, 0), Player::Black);
        game.place(Coord::new(3, 7), Player::Black);

        let first = game.apply_move(Player::White, Coord::new(0, 1), Destination::Camp).unwrap();
        assert_eq!(game.result(), GameResult::Ongoing);
        let second = game.apply_move(Player::White, Coord::new(0, 6), Destination::Camp).unwrap();

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Player::White));
        assert_eq!(game.result().to_string(), "White has won");
        // Camp is full, no further entry offered
        assert!(!game.can_enter_camp(Player::White, Coord::new(0, 3)));

        game.undo_move(second);
        game.undo_move(first);
        assert_eq!(game.camp(Player::White).len(), 0);
        assert_eq!(game.result(), GameResult::Ongoing);
    }

    #[test]
    fn test_single_piece_loses() {
        let mut game = bare(Terrain::King);
        game.place(Coord::new(3, 3), Player::Black);
        game.place(Coord::new(6, 1), Player::White);
        game.place(Coord::new(6, 2), Player::White);

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Player::White));
        assert_eq!(game.result().to_string(), "White has won");
    }

    #[test]
    fn test_camp_win_takes_precedence() {
        let mut game = bare(Terrain::King);
        game.place(Coord::new(7, 1), Player::Black);
        game.place(Coord::new(7, 2), Player::Black);
        game.place(Coord::new(7, 3), Player::Black);
        game.place(Coord::new(2, 2), Player::White);
        game.place(Coord::new(2, 5), Player::White);

        let first = game.apply_move(Player::Black, Coord::new(7, 1), Destination::Camp).unwrap();
        let _second = game.apply_move(Player::Black, Coord::new(7, 2), Destination::Camp).unwrap();
        // Black is down to one piece on the grid but has a full camp
        assert_eq!(game.pieces_on_board(Player::Black), 1);
        assert_eq!(game.winner(), Some(Player::Black));
        assert_eq!(first.piece().owner, Player::Black);
    }
}
