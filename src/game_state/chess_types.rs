//! Primitive chess types shared by every subsystem.
//!
//! Pieces are bit-packed: the low three bits carry the piece kind
//! (`1 == pawn` .. `6 == king`, `0 == none`) and two flag bits carry the
//! color. Exactly one color flag is set on any valid piece.

pub use crate::game_state::board::Board;
pub use crate::game_state::undo_state::{Checkpoint, EnPassant};

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    #[inline]
    const fn flag(self) -> u8 {
        match self {
            Color::Light => LIGHT_FLAG,
            Color::Dark => DARK_FLAG,
        }
    }
}

/// Piece kind. Discriminants match the packed type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl PieceKind {
    /// Zero-based index for `[_; 6]` tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::Pawn),
            2 => Some(PieceKind::Knight),
            3 => Some(PieceKind::Bishop),
            4 => Some(PieceKind::Rook),
            5 => Some(PieceKind::Queen),
            6 => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    #[inline]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Rook or queen.
    #[inline]
    pub const fn is_orthogonal_slider(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    /// Bishop or queen.
    #[inline]
    pub const fn is_diagonal_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }
}

const KIND_MASK: u8 = 0b00111;
const LIGHT_FLAG: u8 = 0b01000;
const DARK_FLAG: u8 = 0b10000;

/// Packed `(kind, color)` pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u8);

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece(kind.code() | color.flag())
    }

    /// Decode a raw packed value. Rejects empty codes and values with both
    /// or neither color flag set.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        let color_bits = bits & !KIND_MASK;
        if color_bits != LIGHT_FLAG && color_bits != DARK_FLAG {
            return None;
        }
        match PieceKind::from_code(bits & KIND_MASK) {
            Some(_) => Some(Piece(bits)),
            None => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        match PieceKind::from_code(self.0 & KIND_MASK) {
            Some(kind) => kind,
            None => panic!("packed piece without a kind"),
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0 & LIGHT_FLAG != 0 {
            Color::Light
        } else {
            Color::Dark
        }
    }

    #[inline]
    pub const fn is_light(self) -> bool {
        self.0 & LIGHT_FLAG != 0
    }

    #[inline]
    pub const fn same_color(self, other: Piece) -> bool {
        (self.0 & !KIND_MASK) == (other.0 & !KIND_MASK)
    }

    /// FEN letter: uppercase for light, lowercase for dark.
    #[inline]
    pub const fn to_char(self) -> char {
        let ch = self.kind().to_char();
        if self.is_light() {
            ch.to_ascii_uppercase()
        } else {
            ch
        }
    }

    #[inline]
    pub const fn from_char(ch: char) -> Option<Self> {
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else if ch.is_ascii_lowercase() {
            Color::Dark
        } else {
            return None;
        };
        match PieceKind::from_char(ch) {
            Some(kind) => Some(Piece::new(kind, color)),
            None => None,
        }
    }
}

impl std::fmt::Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece({})", self.to_char())
    }
}

/// Compact castling rights bitmask.
pub type CastlingRights = u8;
pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const ALL_CASTLING_RIGHTS: CastlingRights = 0b1111;

#[inline]
pub const fn castling_right(color: Color, kingside: bool) -> CastlingRights {
    match (color, kingside) {
        (Color::Light, true) => CASTLE_LIGHT_KINGSIDE,
        (Color::Light, false) => CASTLE_LIGHT_QUEENSIDE,
        (Color::Dark, true) => CASTLE_DARK_KINGSIDE,
        (Color::Dark, false) => CASTLE_DARK_QUEENSIDE,
    }
}

/// Board square index (`0 == a1`, `7 == h1`, `63 == h8`).
pub type Square = u8;

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square % 8
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square / 8
}

/// Build a square from zero-based file and rank.
#[inline]
pub const fn square_at(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_piece_round_trips_kind_and_color() {
        for kind in ALL_PIECE_KINDS {
            for color in [Color::Light, Color::Dark] {
                let piece = Piece::new(kind, color);
                assert_eq!(piece.kind(), kind);
                assert_eq!(piece.color(), color);
                assert_eq!(Piece::from_bits(piece.bits()), Some(piece));
            }
        }
    }

    #[test]
    fn packed_codes_match_layout() {
        assert_eq!(Piece::new(PieceKind::Pawn, Color::Light).bits(), 0b01001);
        assert_eq!(Piece::new(PieceKind::King, Color::Dark).bits(), 0b10110);
    }

    #[test]
    fn invalid_bit_patterns_are_rejected() {
        assert_eq!(Piece::from_bits(0), None);
        assert_eq!(Piece::from_bits(0b01000), None);
        assert_eq!(Piece::from_bits(0b11001), None);
        assert_eq!(Piece::from_bits(0b00001), None);
        assert_eq!(Piece::from_bits(0b01111), None);
    }

    #[test]
    fn fen_letters_carry_color_by_case() {
        let white_knight = Piece::from_char('N').expect("N is a piece");
        assert_eq!(white_knight.kind(), PieceKind::Knight);
        assert_eq!(white_knight.color(), Color::Light);
        assert_eq!(white_knight.to_char(), 'N');

        let black_queen = Piece::from_char('q').expect("q is a piece");
        assert_eq!(black_queen.color(), Color::Dark);
        assert_eq!(black_queen.to_char(), 'q');

        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::from_char('3'), None);
    }

    #[test]
    fn square_coordinates() {
        assert_eq!(square_at(4, 0), 4);
        assert_eq!(file_of(63), 7);
        assert_eq!(rank_of(63), 7);
        assert_eq!(square_at(file_of(28), rank_of(28)), 28);
    }
}
