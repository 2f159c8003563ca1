//! A single ply transition and its exact inverse.
//!
//! A `Move` remembers the pieces on its start and end squares at generation
//! time, so undo can restore captures without consulting any other record.
//! Everything else that must be restored (castling rights, en-passant state,
//! side to move) lives on the board's undo stack, guarded by the
//! `Checkpoint` that `make` hands out.

use std::fmt;

use crate::game_state::chess_rules::{castle_geometry, rook_home_right};
use crate::game_state::chess_types::*;
use crate::utils::algebraic::square_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    ShortCastle,
    LongCastle,
    PromoteQueen,
    PromoteRook,
    PromoteBishop,
    PromoteKnight,
    DoublePush,
    EnPassant,
}

/// Promotion choices in generation order.
pub const PROMOTION_KINDS: [MoveKind; 4] = [
    MoveKind::PromoteQueen,
    MoveKind::PromoteRook,
    MoveKind::PromoteBishop,
    MoveKind::PromoteKnight,
];

impl MoveKind {
    #[inline]
    pub const fn promotion(self) -> Option<PieceKind> {
        match self {
            MoveKind::PromoteQueen => Some(PieceKind::Queen),
            MoveKind::PromoteRook => Some(PieceKind::Rook),
            MoveKind::PromoteBishop => Some(PieceKind::Bishop),
            MoveKind::PromoteKnight => Some(PieceKind::Knight),
            _ => None,
        }
    }

    #[inline]
    pub const fn from_promotion(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Queen => Some(MoveKind::PromoteQueen),
            PieceKind::Rook => Some(MoveKind::PromoteRook),
            PieceKind::Bishop => Some(MoveKind::PromoteBishop),
            PieceKind::Knight => Some(MoveKind::PromoteKnight),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, MoveKind::ShortCastle | MoveKind::LongCastle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    start: Square,
    end: Square,
    kind: MoveKind,
    moved: Piece,
    captured: Option<Piece>,
}

impl Move {
    /// Snapshot the occupants of `start` and `end` on `board`.
    ///
    /// `start` must hold a piece; generation and move parsing guarantee it.
    pub fn new(board: &Board, start: Square, end: Square, kind: MoveKind) -> Self {
        let Some(moved) = board.piece_at(start) else {
            panic!("no piece on start square {start}");
        };
        Self {
            start,
            end,
            kind,
            moved,
            captured: board.piece_at(end),
        }
    }

    #[inline]
    pub fn start(&self) -> Square {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Square {
        self.end
    }

    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// The piece on the start square when the move was generated.
    #[inline]
    pub fn moved(&self) -> Piece {
        self.moved
    }

    /// The piece on the end square when the move was generated.
    #[inline]
    pub fn captured(&self) -> Option<Piece> {
        self.captured
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.moved.color()
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.kind == MoveKind::EnPassant
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.kind.promotion()
    }

    /// Pawn moves can never be reversed.
    #[inline]
    pub fn is_irreversible(&self) -> bool {
        self.moved.kind() == PieceKind::Pawn
    }

    /// Apply the move to the board it was generated from.
    pub fn make(&self, board: &mut Board) -> Checkpoint {
        let color = self.color();
        let checkpoint = board.push_state(color, self.end);

        match self.kind {
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let geometry = castle_geometry(color, self.kind == MoveKind::ShortCastle);
                board.move_piece(geometry.king_from, geometry.king_to);
                board.move_piece(geometry.rook_from, geometry.rook_to);
                board.revoke_castling(castling_right(color, true) | castling_right(color, false));
            }
            _ => {
                if self.captured.is_some() {
                    let captured = board.remove_piece(self.end);
                    if captured.kind() == PieceKind::Rook {
                        board.revoke_castling(rook_home_right(self.end));
                    }
                }
                board.move_piece(self.start, self.end);

                match self.kind {
                    MoveKind::DoublePush => {
                        board.set_en_passant_record(EnPassant {
                            target: (self.start + self.end) / 2,
                            pawn: self.end,
                        });
                    }
                    MoveKind::EnPassant => {
                        let Some(record) = board.previous_en_passant() else {
                            panic!("en-passant capture without an en-passant record");
                        };
                        board.remove_piece(record.pawn);
                    }
                    kind => {
                        if let Some(promoted) = kind.promotion() {
                            board.remove_piece(self.end);
                            board.put_piece(self.end, Piece::new(promoted, color));
                        }
                    }
                }

                match self.moved.kind() {
                    PieceKind::King => board
                        .revoke_castling(castling_right(color, true) | castling_right(color, false)),
                    PieceKind::Rook => board.revoke_castling(rook_home_right(self.start)),
                    _ => {}
                }
            }
        }

        checkpoint
    }

    /// Reverse `make`. `checkpoint` must be the one `make` returned.
    pub fn undo(&self, board: &mut Board, checkpoint: Checkpoint) {
        let color = self.color();

        match self.kind {
            MoveKind::ShortCastle | MoveKind::LongCastle => {
                let geometry = castle_geometry(color, self.kind == MoveKind::ShortCastle);
                board.move_piece(geometry.king_to, geometry.king_from);
                board.move_piece(geometry.rook_to, geometry.rook_from);
            }
            _ => {
                if self.kind.promotion().is_some() {
                    board.remove_piece(self.end);
                    board.put_piece(self.end, self.moved);
                }
                board.move_piece(self.end, self.start);
                if let Some(captured) = self.captured {
                    board.put_piece(self.end, captured);
                }
                if self.kind == MoveKind::EnPassant {
                    let Some(record) = board.previous_en_passant() else {
                        panic!("en-passant undo without an en-passant record");
                    };
                    board.put_piece(record.pawn, Piece::new(PieceKind::Pawn, color.opposite()));
                }
            }
        }

        board.pop_state(checkpoint, color);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::ShortCastle => f.write_str("O-O"),
            MoveKind::LongCastle => f.write_str("O-O-O"),
            kind => {
                write!(f, "{}{}", square_name(self.start), square_name(self.end))?;
                if let Some(promoted) = kind.promotion() {
                    write!(f, "{}", promoted.to_char())?;
                }
                Ok(())
            }
        }
    }
}
