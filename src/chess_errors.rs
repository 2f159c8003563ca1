//! Errors used throughout the chess engine.
//!
//! `ChessErrors` is the single error type returned by the parsing and
//! construction entry points (placement strings, FEN import, move text).
//! Move application, move generation and search never return errors: they
//! operate on validated state and treat contract violations as bugs.
//! Checkmate and stalemate are ordinary search results, not errors.

use thiserror::Error;

use crate::game_state::chess_types::Square;

/// Unified error type for the chess engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// The piece-placement string could not be turned into a board.
    ///
    /// Payload: what was wrong with it.
    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),

    /// Move text is not coordinate notation, `O-O` or `O-O-O`.
    #[error("invalid move text: {0}")]
    InvalidMoveText(String),

    /// Move text parsed, but the move is not legal in the current position.
    #[error("illegal move in this position: {0}")]
    IllegalMove(String),

    /// A square index outside `0..=63`.
    #[error("square index {0} is out of range")]
    SquareOutOfRange(Square),

    /// An en-passant target that no double pawn push could have produced.
    #[error("square {0} is not a valid en-passant target")]
    InvalidEnPassant(Square),

    /// A FEN field other than the placement was malformed.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}
