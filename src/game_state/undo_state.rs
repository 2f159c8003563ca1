use crate::game_state::chess_types::*;

/// En-passant record left by a double pawn push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassant {
    /// The skipped square a capturing pawn lands on.
    pub target: Square,
    /// The square of the pawn that can be taken.
    pub pawn: Square,
}

/// Single undo record for `Move::make` / `Move::undo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    pub prev_en_passant: Option<EnPassant>,
    pub prev_castling_rights: CastlingRights,
}

/// Proof that one move is applied and not yet undone.
///
/// Returned by `Move::make` and consumed by `Move::undo`. It cannot be
/// cloned, so every apply is paired with at most one undo, and the stored
/// depth catches undos issued out of order.
#[must_use = "a checkpoint must be handed back to Move::undo"]
#[derive(Debug, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) depth: usize,
}

impl Checkpoint {
    /// Undo-stack depth before the move was applied.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}
