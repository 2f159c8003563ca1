//! Canonical chess-rule constants.
//!
//! Starting placement, material values, piece-square tables and the fixed
//! castling geometry used by move generation and move application.

use crate::game_state::chess_types::*;

/// Piece-placement field of the standard starting position.
pub const STARTING_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => 0,
    }
}

// Tables are laid out as seen from the light side: first row is rank 8.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

/// Positional bonus for `kind` of `color` standing on `square`.
#[inline]
pub const fn piece_square_value(kind: PieceKind, color: Color, square: Square) -> i32 {
    // Light reads the table upside down; dark reads it mirrored.
    let index = match color {
        Color::Light => (square ^ 56) as usize,
        Color::Dark => square as usize,
    };
    match kind {
        PieceKind::Pawn => PAWN_TABLE[index],
        PieceKind::Knight => KNIGHT_TABLE[index],
        PieceKind::Bishop => BISHOP_TABLE[index],
        PieceKind::Rook => ROOK_TABLE[index],
        PieceKind::Queen => QUEEN_TABLE[index],
        PieceKind::King => KING_TABLE[index],
    }
}

/// King and rook squares for one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleGeometry {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty.
    pub empty_mask: u64,
    /// Squares the king stands on, crosses or lands on.
    pub king_path_mask: u64,
}

#[inline]
pub const fn castle_geometry(color: Color, kingside: bool) -> CastleGeometry {
    let base: Square = match color {
        Color::Light => 0,
        Color::Dark => 56,
    };
    if kingside {
        CastleGeometry {
            king_from: base + 4,
            king_to: base + 6,
            rook_from: base + 7,
            rook_to: base + 5,
            empty_mask: 0b0110_0000u64 << base,
            king_path_mask: 0b0111_0000u64 << base,
        }
    } else {
        CastleGeometry {
            king_from: base + 4,
            king_to: base + 2,
            rook_from: base,
            rook_to: base + 3,
            empty_mask: 0b0000_1110u64 << base,
            king_path_mask: 0b0001_1100u64 << base,
        }
    }
}

/// Castling right lost when a rook leaves or is captured on `square`.
#[inline]
pub const fn rook_home_right(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_LIGHT_QUEENSIDE,
        7 => CASTLE_LIGHT_KINGSIDE,
        56 => CASTLE_DARK_QUEENSIDE,
        63 => CASTLE_DARK_KINGSIDE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_square_tables_mirror_between_colors() {
        for kind in ALL_PIECE_KINDS {
            for square in 0..64u8 {
                assert_eq!(
                    piece_square_value(kind, Color::Light, square),
                    piece_square_value(kind, Color::Dark, square ^ 56)
                );
            }
        }
    }

    #[test]
    fn central_pawn_push_is_rewarded() {
        // e2 -> e4 for light
        assert!(
            piece_square_value(PieceKind::Pawn, Color::Light, 28)
                > piece_square_value(PieceKind::Pawn, Color::Light, 12)
        );
    }

    #[test]
    fn castle_geometry_squares() {
        let light_short = castle_geometry(Color::Light, true);
        assert_eq!((light_short.king_from, light_short.king_to), (4, 6));
        assert_eq!((light_short.rook_from, light_short.rook_to), (7, 5));
        assert_eq!(light_short.empty_mask, (1 << 5) | (1 << 6));

        let dark_long = castle_geometry(Color::Dark, false);
        assert_eq!((dark_long.king_from, dark_long.king_to), (60, 58));
        assert_eq!((dark_long.rook_from, dark_long.rook_to), (56, 59));
        assert_eq!(dark_long.empty_mask, (1 << 57) | (1 << 58) | (1 << 59));
        assert_eq!(dark_long.king_path_mask, (1 << 58) | (1 << 59) | (1 << 60));
    }
}
