//! Move text: `e2e4`, `e7e8q`, `O-O`, `O-O-O`.
//!
//! Text is matched against the legal moves of the position, so a parsed
//! move always carries the right special-move tag and captured piece.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::{Move, MoveKind};
use crate::utils::algebraic::algebraic_to_square;

/// Turn move text into a legal move for the side to move.
pub fn parse_move(
    text: &str,
    board: &mut Board,
    generator: &MoveGenerator<'_>,
) -> Result<Move, ChessErrors> {
    let text = text.trim();
    let request = parse_text(text)?;
    let legal = generator.generate_legal_moves(board);

    legal
        .into_iter()
        .find(|mv| request.matches(mv))
        .ok_or_else(|| ChessErrors::IllegalMove(text.to_owned()))
}

/// Format a move the way `parse_move` reads it.
#[inline]
pub fn move_to_long_algebraic(mv: &Move) -> String {
    mv.to_string()
}

enum MoveRequest {
    Castle(MoveKind),
    Coordinates {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
}

impl MoveRequest {
    fn matches(&self, mv: &Move) -> bool {
        match *self {
            MoveRequest::Castle(kind) => mv.kind() == kind,
            MoveRequest::Coordinates { from, to, promotion } => {
                mv.start() == from && mv.end() == to && mv.promotion() == promotion
            }
        }
    }
}

fn parse_text(text: &str) -> Result<MoveRequest, ChessErrors> {
    match text {
        "O-O" => return Ok(MoveRequest::Castle(MoveKind::ShortCastle)),
        "O-O-O" => return Ok(MoveRequest::Castle(MoveKind::LongCastle)),
        _ => {}
    }

    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessErrors::InvalidMoveText(text.to_owned()));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => Some(char_to_promotion(ch)?),
    };
    Ok(MoveRequest::Coordinates { from, to, promotion })
}

fn char_to_promotion(ch: char) -> Result<PieceKind, ChessErrors> {
    match ch {
        'q' => Ok(PieceKind::Queen),
        'r' => Ok(PieceKind::Rook),
        'b' => Ok(PieceKind::Bishop),
        'n' => Ok(PieceKind::Knight),
        _ => Err(ChessErrors::InvalidMoveText(format!(
            "invalid promotion piece character: {ch}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn parses_quiet_moves_and_double_pushes() {
        let mut board = Board::new_game();
        let generator = MoveGenerator::shared();
        let mv = parse_move("e2e4", &mut board, &generator).expect("e2e4 is legal");
        assert_eq!(mv.kind(), MoveKind::DoublePush);
        assert_eq!(move_to_long_algebraic(&mv), "e2e4");

        let mv = parse_move(" g1f3 ", &mut board, &generator).expect("g1f3 is legal");
        assert_eq!(mv.kind(), MoveKind::Normal);
    }

    #[test]
    fn parses_castling_tokens_for_either_side() {
        let generator = MoveGenerator::shared();
        let mut board = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1").expect("FEN should parse");
        let mv = parse_move("O-O-O", &mut board, &generator).expect("long castle is legal");
        assert_eq!((mv.start(), mv.end()), (60, 58));

        let mv = parse_move("e8g8", &mut board, &generator).expect("coordinates also castle");
        assert_eq!(mv.kind(), MoveKind::ShortCastle);
    }

    #[test]
    fn parses_promotions_and_en_passant() {
        let generator = MoveGenerator::shared();
        let mut board = parse_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mv = parse_move("a7b8n", &mut board, &generator).expect("capture promotion is legal");
        assert_eq!(mv.promotion(), Some(PieceKind::Knight));
        assert!(mv.is_capture());
        assert!(matches!(
            parse_move("a7a8", &mut board, &generator),
            Err(ChessErrors::IllegalMove(_))
        ));

        let mut board = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let mv = parse_move("e5d6", &mut board, &generator).expect("en passant is legal");
        assert_eq!(mv.kind(), MoveKind::EnPassant);
    }

    #[test]
    fn reports_malformed_and_illegal_text() {
        let mut board = Board::new_game();
        let generator = MoveGenerator::shared();
        for bad in ["", "e2", "e2e4e5", "x2e4", "e2e9", "e7e8k", "0-0"] {
            assert!(
                matches!(
                    parse_move(bad, &mut board, &generator),
                    Err(ChessErrors::InvalidMoveText(_))
                ),
                "{bad} should be malformed"
            );
        }
        for illegal in ["e2e5", "e1g1", "O-O", "d1d4"] {
            assert_eq!(
                parse_move(illegal, &mut board, &generator),
                Err(ChessErrors::IllegalMove(illegal.to_owned()))
            );
        }
    }
}
