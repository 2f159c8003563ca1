//! Core incremental board state representation.
//!
//! `Board` is the central model for the engine. It stores piece bitboards,
//! a square-indexed placement map, occupancy caches, castling/en-passant
//! state with its undo history, and running hash/material accumulators that
//! are updated on every placement change instead of being recomputed.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_rules::*;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::{Checkpoint, EnPassant, UndoState};
use crate::search::zobrist::ZobristKeys;

/// Mutable position owned by one game or search.
#[derive(Debug, Clone)]
pub struct Board {
    // --- Placement ---
    // [color][piece_kind]
    pieces: [[u64; 6]; 2],
    occupancy_by_color: [u64; 2],
    occupancy_all: u64,
    squares: [Option<Piece>; 64],
    kings: [Square; 2],

    // --- Side and state flags ---
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant: Option<EnPassant>,

    // --- Generation scratch, valid until the next generation call ---
    pub(crate) pinned: u64,
    pub(crate) pin_rays: [u64; 8],
    pub(crate) attacked_squares: u64,
    pub(crate) attacked_by: [u64; 6],
    pub(crate) in_check: bool,

    // --- Incremental accumulators ---
    zobrist_key: u64,
    material: [i32; 2],
    positional: [i32; 2],
    piece_counts: [[u8; 6]; 2],

    // --- Make/undo stacks ---
    undo_stack: Vec<UndoState>,
    last_moved_to: [Vec<Square>; 2],

    keys: &'static ZobristKeys,
}

// Generation scratch is not part of the position.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant == other.en_passant
            && self.zobrist_key == other.zobrist_key
            && self.material == other.material
            && self.positional == other.positional
            && self.undo_stack == other.undo_stack
            && self.last_moved_to == other.last_moved_to
            && std::ptr::eq(self.keys, other.keys)
    }
}

impl Eq for Board {}

impl Board {
    fn empty(keys: &'static ZobristKeys) -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            squares: [None; 64],
            kings: [0; 2],

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant: None,

            pinned: 0,
            pin_rays: [0; 8],
            attacked_squares: 0,
            attacked_by: [0; 6],
            in_check: false,

            zobrist_key: 0,
            material: [0; 2],
            positional: [0; 2],
            piece_counts: [[0; 6]; 2],

            undo_stack: Vec::with_capacity(64),
            last_moved_to: [Vec::with_capacity(32), Vec::with_capacity(32)],

            keys,
        }
    }

    /// Standard starting position, light to move.
    pub fn new_game() -> Self {
        match Self::from_placement(STARTING_PLACEMENT) {
            Ok(board) => board,
            Err(err) => unreachable!("starting placement must parse: {err}"),
        }
    }

    /// Build a board from the piece-placement field of a FEN string.
    ///
    /// Light is to move and every castling right whose king and rook still
    /// stand on their home squares is granted. Use the setters to override.
    pub fn from_placement(placement: &str) -> Result<Self, ChessErrors> {
        Self::from_placement_with_keys(placement, ZobristKeys::shared())
    }

    pub fn from_placement_with_keys(
        placement: &str,
        keys: &'static ZobristKeys,
    ) -> Result<Self, ChessErrors> {
        let mut board = Self::empty(keys);
        let field = placement.split_whitespace().next().unwrap_or("");

        // Squares are counted from a8 towards h1; '/' carries no meaning.
        let mut index = 0usize;
        for ch in field.chars() {
            if ch == '/' {
                continue;
            }
            if let Some(run) = ch.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(ChessErrors::InvalidPlacement(format!(
                        "invalid empty-square run '{ch}'"
                    )));
                }
                index += run as usize;
                if index > 64 {
                    return Err(ChessErrors::InvalidPlacement(
                        "placement describes more than 64 squares".to_owned(),
                    ));
                }
                continue;
            }

            let piece = Piece::from_char(ch).ok_or_else(|| {
                ChessErrors::InvalidPlacement(format!("invalid piece character '{ch}'"))
            })?;
            if index >= 64 {
                return Err(ChessErrors::InvalidPlacement(
                    "placement describes more than 64 squares".to_owned(),
                ));
            }

            let rank = 7 - (index / 8) as u8;
            let file = (index % 8) as u8;
            let square = square_at(file, rank);
            if piece.kind() == PieceKind::Pawn && (rank == 0 || rank == 7) {
                return Err(ChessErrors::InvalidPlacement(format!(
                    "{:?} pawn on back rank square {square}",
                    piece.color()
                )));
            }
            if piece.kind() == PieceKind::King
                && board.piece_counts[piece.color().index()][PieceKind::King.index()] > 0
            {
                return Err(ChessErrors::InvalidPlacement(format!(
                    "more than one {:?} king",
                    piece.color()
                )));
            }
            board.put_piece(square, piece);
            index += 1;
        }

        if index != 64 {
            return Err(ChessErrors::InvalidPlacement(format!(
                "placement describes {index} squares, expected 64"
            )));
        }
        for color in [Color::Light, Color::Dark] {
            if board.piece_counts[color.index()][PieceKind::King.index()] != 1 {
                return Err(ChessErrors::InvalidPlacement(format!("missing {color:?} king")));
            }
        }

        for color in [Color::Light, Color::Dark] {
            for kingside in [true, false] {
                let geometry = castle_geometry(color, kingside);
                if board.piece_at(geometry.king_from) == Some(Piece::new(PieceKind::King, color))
                    && board.piece_at(geometry.rook_from)
                        == Some(Piece::new(PieceKind::Rook, color))
                {
                    board.castling_rights |= castling_right(color, kingside);
                }
            }
        }

        Ok(board)
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[inline]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy_by_color[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> u64 {
        self.occupancy_all
    }

    /// Rooks and queens of `color`.
    #[inline]
    pub fn orthogonal_sliders(&self, color: Color) -> u64 {
        self.bitboard(color, PieceKind::Rook) | self.bitboard(color, PieceKind::Queen)
    }

    /// Bishops and queens of `color`.
    #[inline]
    pub fn diagonal_sliders(&self, color: Color) -> u64 {
        self.bitboard(color, PieceKind::Bishop) | self.bitboard(color, PieceKind::Queen)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn has_castling_right(&self, color: Color, kingside: bool) -> bool {
        self.castling_rights & castling_right(color, kingside) != 0
    }

    #[inline]
    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    /// Placement-only Zobrist hash.
    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    /// Placement hash with the side to move folded in. Search tables key on this.
    #[inline]
    pub fn position_key(&self) -> u64 {
        match self.side_to_move {
            Color::Light => self.zobrist_key,
            Color::Dark => self.zobrist_key ^ self.keys.side_to_move(),
        }
    }

    #[inline]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    #[inline]
    pub fn positional(&self, color: Color) -> i32 {
        self.positional[color.index()]
    }

    #[inline]
    pub fn piece_count(&self, color: Color, kind: PieceKind) -> u8 {
        self.piece_counts[color.index()][kind.index()]
    }

    /// Squares of pieces pinned to their king by the last generation call.
    #[inline]
    pub fn pinned(&self) -> u64 {
        self.pinned
    }

    #[inline]
    pub fn is_pinned(&self, square: Square) -> bool {
        self.pinned & (1u64 << square) != 0
    }

    /// The pin ray (king exclusive, pinning slider inclusive) through `square`.
    pub fn pin_ray(&self, square: Square) -> Option<u64> {
        let bit = 1u64 << square;
        self.pin_rays.iter().copied().find(|ray| ray & bit != 0)
    }

    /// Every square the opponent of the last generated side attacks.
    #[inline]
    pub fn attacked_squares(&self) -> u64 {
        self.attacked_squares
    }

    /// Opponent attacks from pieces of one kind.
    #[inline]
    pub fn attacked_by(&self, kind: PieceKind) -> u64 {
        self.attacked_by[kind.index()]
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Destination of the last move `color` made, if any is still applied.
    #[inline]
    pub fn last_moved_to(&self, color: Color) -> Option<Square> {
        self.last_moved_to[color.index()].last().copied()
    }

    /// Number of applied, not yet undone, moves.
    #[inline]
    pub fn history_len(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn keys(&self) -> &'static ZobristKeys {
        self.keys
    }

    /// Write the placement back out as a FEN piece-placement field.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8u8).rev() {
            let mut gap = 0u8;
            for file in 0..8u8 {
                match self.piece_at(square_at(file, rank)) {
                    Some(piece) => {
                        if gap > 0 {
                            out.push(char::from(b'0' + gap));
                            gap = 0;
                        }
                        out.push(piece.to_char());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                out.push(char::from(b'0' + gap));
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Setters for state the placement field does not carry
    // ------------------------------------------------------------------

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = rights & ALL_CASTLING_RIGHTS;
    }

    pub fn set_castling_right(&mut self, color: Color, kingside: bool, held: bool) {
        let right = castling_right(color, kingside);
        if held {
            self.castling_rights |= right;
        } else {
            self.castling_rights &= !right;
        }
    }

    /// Set the en-passant target square (the square a capturing pawn lands on).
    ///
    /// Checked against the current side to move, so set that first. The
    /// opponent's pawn must stand just past the target with the target and
    /// the pawn's start square both empty.
    pub fn set_en_passant(&mut self, target: Option<Square>) -> Result<(), ChessErrors> {
        let Some(target) = target else {
            self.en_passant = None;
            return Ok(());
        };
        if target > 63 {
            return Err(ChessErrors::SquareOutOfRange(target));
        }
        let (pawn, origin, pawn_color) = match rank_of(target) {
            2 => (target + 8, target - 8, Color::Light),
            5 => (target - 8, target + 8, Color::Dark),
            _ => return Err(ChessErrors::InvalidEnPassant(target)),
        };
        if pawn_color != self.side_to_move.opposite()
            || self.piece_at(pawn) != Some(Piece::new(PieceKind::Pawn, pawn_color))
            || self.piece_at(target).is_some()
            || self.piece_at(origin).is_some()
        {
            return Err(ChessErrors::InvalidEnPassant(target));
        }
        self.en_passant = Some(EnPassant { target, pawn });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Placement primitives. Every derived field moves in lock-step here.
    // ------------------------------------------------------------------

    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        debug_assert!(self.squares[square as usize].is_none(), "square {square} occupied");
        let bit = 1u64 << square;
        let color = piece.color().index();
        let kind = piece.kind();

        self.pieces[color][kind.index()] |= bit;
        self.occupancy_by_color[color] |= bit;
        self.occupancy_all |= bit;
        self.squares[square as usize] = Some(piece);

        self.zobrist_key ^= self.keys.piece_square(piece, square);
        self.piece_counts[color][kind.index()] += 1;
        self.material[color] += piece_value(kind);
        self.positional[color] += piece_square_value(kind, piece.color(), square);

        if kind == PieceKind::King {
            self.kings[color] = square;
        }
    }

    pub(crate) fn remove_piece(&mut self, square: Square) -> Piece {
        let Some(piece) = self.squares[square as usize].take() else {
            panic!("no piece to remove on square {square}");
        };
        let bit = 1u64 << square;
        let color = piece.color().index();
        let kind = piece.kind();

        self.pieces[color][kind.index()] &= !bit;
        self.occupancy_by_color[color] &= !bit;
        self.occupancy_all &= !bit;

        self.zobrist_key ^= self.keys.piece_square(piece, square);
        self.piece_counts[color][kind.index()] -= 1;
        self.material[color] -= piece_value(kind);
        self.positional[color] -= piece_square_value(kind, piece.color(), square);

        piece
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.remove_piece(from);
        self.put_piece(to, piece);
    }

    #[inline]
    pub(crate) fn revoke_castling(&mut self, rights: CastlingRights) {
        self.castling_rights &= !rights;
    }

    #[inline]
    pub(crate) fn set_en_passant_record(&mut self, record: EnPassant) {
        self.en_passant = Some(record);
    }

    /// The en-passant record in force before the most recent move.
    #[inline]
    pub(crate) fn previous_en_passant(&self) -> Option<EnPassant> {
        self.undo_stack.last().and_then(|state| state.prev_en_passant)
    }

    /// Save rights, flip the side to move and clear the en-passant target.
    pub(crate) fn push_state(&mut self, mover: Color, to: Square) -> Checkpoint {
        let depth = self.undo_stack.len();
        self.undo_stack.push(UndoState {
            prev_en_passant: self.en_passant,
            prev_castling_rights: self.castling_rights,
        });
        self.last_moved_to[mover.index()].push(to);
        self.en_passant = None;
        self.side_to_move = self.side_to_move.opposite();
        Checkpoint { depth }
    }

    /// Inverse of `push_state`.
    pub(crate) fn pop_state(&mut self, checkpoint: Checkpoint, mover: Color) {
        assert_eq!(
            self.undo_stack.len(),
            checkpoint.depth + 1,
            "moves must be undone in reverse order of application"
        );
        let Some(state) = self.undo_stack.pop() else {
            unreachable!("depth check guarantees a record");
        };
        self.en_passant = state.prev_en_passant;
        self.castling_rights = state.prev_castling_rights;
        self.last_moved_to[mover.index()].pop();
        self.side_to_move = self.side_to_move.opposite();
    }

    // ------------------------------------------------------------------
    // Invariant checks
    // ------------------------------------------------------------------

    /// Iterate `(square, piece)` over every occupied square, a1 first.
    pub fn occupied_squares(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(sq, piece)| piece.map(|p| (sq as Square, p)))
    }

    /// Hash the current placement from scratch.
    pub fn compute_zobrist_key(&self) -> u64 {
        self.keys.hash_placement(self.occupied_squares())
    }

    /// Re-derive every cached field from the placement map and compare.
    pub fn is_consistent(&self) -> bool {
        let mut pieces = [[0u64; 6]; 2];
        let mut counts = [[0u8; 6]; 2];
        let mut material = [0i32; 2];
        let mut positional = [0i32; 2];
        let mut kings = [None::<Square>; 2];

        for (square, piece) in self.occupied_squares() {
            let color = piece.color();
            let kind = piece.kind();
            pieces[color.index()][kind.index()] |= 1u64 << square;
            counts[color.index()][kind.index()] += 1;
            material[color.index()] += piece_value(kind);
            positional[color.index()] += piece_square_value(kind, color, square);
            if kind == PieceKind::King {
                kings[color.index()] = Some(square);
            }
        }

        let light = pieces[0].iter().fold(0u64, |acc, bb| acc | bb);
        let dark = pieces[1].iter().fold(0u64, |acc, bb| acc | bb);

        pieces == self.pieces
            && light & dark == 0
            && self.occupancy_by_color == [light, dark]
            && self.occupancy_all == light | dark
            && counts == self.piece_counts
            && material == self.material
            && positional == self.positional
            && kings == [Some(self.kings[0]), Some(self.kings[1])]
            && self.zobrist_key == self.compute_zobrist_key()
    }
}
