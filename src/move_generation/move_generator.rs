//! Legal move generation.
//!
//! One call computes the side's pins and the opponent's attack map into the
//! board's scratch fields, emits pseudo-legal moves masked by those pins, and
//! runs a make/undo legality filter only when the cheap masking is not
//! enough: while in check, or when an en-passant capture is on the list.

use crate::game_state::chess_rules::castle_geometry;
use crate::game_state::chess_types::*;
use crate::moves::attack_tables::{
    is_diagonal, AttackTables, DIRECTION_OFFSETS, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS,
};
use crate::moves::chess_move::{Move, MoveKind, PROMOTION_KINDS};

/// Pieces in the order their moves are emitted.
const GENERATION_ORDER: [PieceKind; 5] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

#[derive(Debug, Clone, Copy)]
pub struct MoveGenerator<'a> {
    tables: &'a AttackTables,
}

impl MoveGenerator<'static> {
    /// Generator over the process-wide attack tables.
    pub fn shared() -> Self {
        Self::new(AttackTables::shared())
    }
}

impl<'a> MoveGenerator<'a> {
    pub fn new(tables: &'a AttackTables) -> Self {
        Self { tables }
    }

    #[inline]
    pub fn tables(&self) -> &'a AttackTables {
        self.tables
    }

    /// Legal moves for the side to move.
    pub fn generate_legal_moves(&self, board: &mut Board) -> Vec<Move> {
        let side = board.side_to_move();
        self.generate_moves(board, side)
    }

    /// Legal moves for `side`.
    ///
    /// Leaves `side`'s pins and the opponent's attack map in the board's
    /// scratch fields until the next call.
    pub fn generate_moves(&self, board: &mut Board, side: Color) -> Vec<Move> {
        self.compute_pins(board, side);
        self.compute_attacks(board, side);

        let mut moves = Vec::with_capacity(64);
        let mut has_en_passant = false;

        for kind in GENERATION_ORDER {
            let mut pieces = board.bitboard(side, kind);
            while pieces != 0 {
                let from = pieces.trailing_zeros() as Square;
                pieces &= pieces - 1;
                if kind == PieceKind::Pawn {
                    has_en_passant |= self.pawn_moves(board, side, from, &mut moves);
                } else {
                    self.piece_moves(board, side, kind, from, &mut moves);
                }
            }
        }
        self.king_moves(board, side, &mut moves);

        if board.in_check() || has_en_passant {
            self.retain_legal(board, side, &mut moves);
        }
        moves
    }

    /// Record every piece of `side` pinned to its king and the ray it may move on.
    pub fn compute_pins(&self, board: &mut Board, side: Color) {
        let king = board.king_square(side);
        let own = board.occupancy(side);
        let enemy = side.opposite();
        let occupied = board.occupied();

        board.pinned = 0;
        board.pin_rays = [0; 8];

        for direction in ORTHOGONAL_DIRECTIONS.into_iter().chain(DIAGONAL_DIRECTIONS) {
            let ray = self.tables.ray(king, direction);
            let Some(first) = nearest(ray & occupied, direction) else {
                continue;
            };
            if own & (1u64 << first) == 0 {
                continue;
            }
            let Some(second) = nearest(ray & occupied & !(1u64 << first), direction) else {
                continue;
            };

            let sliders = if is_diagonal(direction) {
                board.diagonal_sliders(enemy)
            } else {
                board.orthogonal_sliders(enemy)
            };
            if sliders & (1u64 << second) != 0 {
                board.pinned |= 1u64 << first;
                board.pin_rays[direction] = ray & !self.tables.ray(second, direction);
            }
        }
    }

    /// Fill the opponent's attack map and the in-check flag for `side`.
    ///
    /// `side`'s king is lifted off the board first so squares behind it on a
    /// checking line count as attacked.
    pub fn compute_attacks(&self, board: &mut Board, side: Color) {
        let king = board.king_square(side);
        let occupancy = board.occupied() & !(1u64 << king);
        let (attacked, by_kind) = self.attack_map(board, side.opposite(), occupancy);

        board.attacked_squares = attacked;
        board.attacked_by = by_kind;
        board.in_check = attacked & (1u64 << king) != 0;
    }

    /// Union of `attacker`'s attacks, and the same split per piece kind.
    pub fn attack_map(&self, board: &Board, attacker: Color, occupancy: u64) -> (u64, [u64; 6]) {
        let mut by_kind = [0u64; 6];
        for kind in ALL_PIECE_KINDS {
            let mut pieces = board.bitboard(attacker, kind);
            while pieces != 0 {
                let square = pieces.trailing_zeros() as Square;
                pieces &= pieces - 1;
                by_kind[kind.index()] |= self.tables.piece_attacks(kind, attacker, square, occupancy);
            }
        }
        let attacked = by_kind.iter().fold(0u64, |acc, bb| acc | bb);
        (attacked, by_kind)
    }

    /// Every square `color` attacks on the current board.
    pub fn attacks_of(&self, board: &Board, color: Color) -> u64 {
        self.attack_map(board, color, board.occupied()).0
    }

    /// Whether any piece of `attacker` hits `square`.
    pub fn is_square_attacked(&self, board: &Board, square: Square, attacker: Color) -> bool {
        let occupancy = board.occupied();
        let defender = attacker.opposite();

        self.tables.pawn_captures(defender, square) & board.bitboard(attacker, PieceKind::Pawn) != 0
            || self.tables.knight_attacks(square) & board.bitboard(attacker, PieceKind::Knight) != 0
            || self.tables.king_attacks(square) & board.bitboard(attacker, PieceKind::King) != 0
            || self.tables.bishop_attacks(square, occupancy) & board.diagonal_sliders(attacker) != 0
            || self.tables.rook_attacks(square, occupancy) & board.orthogonal_sliders(attacker) != 0
    }

    /// Whether `side`'s king is attacked right now.
    pub fn is_in_check(&self, board: &Board, side: Color) -> bool {
        self.is_square_attacked(board, board.king_square(side), side.opposite())
    }

    /// Returns true if an en-passant capture was emitted.
    fn pawn_moves(&self, board: &Board, side: Color, from: Square, out: &mut Vec<Move>) -> bool {
        let occupied = board.occupied();
        let enemy = board.occupancy(side.opposite());
        let allowed = pin_mask(board, from);

        let step = DIRECTION_OFFSETS[if side == Color::Light { 1 } else { 3 }];
        let single = (from as i8 + step) as Square;
        if occupied & (1u64 << single) == 0 {
            if allowed & (1u64 << single) != 0 {
                push_pawn_move(board, from, single, out);
            }
            // Only the starting rank has a second push in the table.
            let double = self.tables.pawn_pushes(side, from) & !(1u64 << single);
            if double != 0 && double & (occupied | !allowed) == 0 {
                let to = double.trailing_zeros() as Square;
                out.push(Move::new(board, from, to, MoveKind::DoublePush));
            }
        }

        let captures = self.tables.pawn_captures(side, from) & allowed;
        let mut targets = captures & enemy;
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;
            push_pawn_move(board, from, to, out);
        }

        if side == board.side_to_move() {
            if let Some(record) = board.en_passant() {
                if captures & (1u64 << record.target) != 0 {
                    out.push(Move::new(board, from, record.target, MoveKind::EnPassant));
                    return true;
                }
            }
        }
        false
    }

    fn piece_moves(
        &self,
        board: &Board,
        side: Color,
        kind: PieceKind,
        from: Square,
        out: &mut Vec<Move>,
    ) {
        let mut targets = self.tables.piece_attacks(kind, side, from, board.occupied())
            & !board.occupancy(side)
            & pin_mask(board, from);
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;
            out.push(Move::new(board, from, to, MoveKind::Normal));
        }
    }

    fn king_moves(&self, board: &Board, side: Color, out: &mut Vec<Move>) {
        let from = board.king_square(side);
        let mut targets =
            self.tables.king_attacks(from) & !board.occupancy(side) & !board.attacked_squares();
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            targets &= targets - 1;
            out.push(Move::new(board, from, to, MoveKind::Normal));
        }

        if board.in_check() {
            return;
        }
        for (kingside, kind) in [(true, MoveKind::ShortCastle), (false, MoveKind::LongCastle)] {
            if !board.has_castling_right(side, kingside) {
                continue;
            }
            let geometry = castle_geometry(side, kingside);
            if from == geometry.king_from
                && board.piece_at(geometry.rook_from) == Some(Piece::new(PieceKind::Rook, side))
                && board.occupied() & geometry.empty_mask == 0
                && board.attacked_squares() & geometry.king_path_mask == 0
            {
                out.push(Move::new(board, geometry.king_from, geometry.king_to, kind));
            }
        }
    }

    /// Drop every move that leaves `side`'s king attacked.
    fn retain_legal(&self, board: &mut Board, side: Color, moves: &mut Vec<Move>) {
        moves.retain(|mv| {
            let checkpoint = mv.make(board);
            let exposed = self.is_in_check(board, side);
            mv.undo(board, checkpoint);
            !exposed
        });
    }
}

/// First set square of `ray_bits` walking away from the ray's origin.
#[inline]
fn nearest(ray_bits: u64, direction: usize) -> Option<Square> {
    if ray_bits == 0 {
        None
    } else if DIRECTION_OFFSETS[direction] > 0 {
        Some(ray_bits.trailing_zeros() as Square)
    } else {
        Some(63 - ray_bits.leading_zeros() as Square)
    }
}

/// Squares a piece on `square` may land on given its pin.
#[inline]
fn pin_mask(board: &Board, square: Square) -> u64 {
    if board.is_pinned(square) {
        board.pin_ray(square).unwrap_or(0)
    } else {
        u64::MAX
    }
}

fn push_pawn_move(board: &Board, from: Square, to: Square, out: &mut Vec<Move>) {
    if matches!(rank_of(to), 0 | 7) {
        out.extend(PROMOTION_KINDS.iter().map(|&kind| Move::new(board, from, to, kind)));
    } else {
        out.push(Move::new(board, from, to, MoveKind::Normal));
    }
}
