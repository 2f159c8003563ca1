//! FEN-to-Board import.
//!
//! Builds a board from the placement field and then applies the remaining
//! fields through the board's public setters. The move clocks are checked
//! for shape but not kept: nothing in the engine reads them. A position where
//! the side that just moved is still in check is rejected.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveGenerator;
use crate::utils::algebraic::algebraic_to_square;

/// Parse a FEN string. The two clock fields may be omitted.
pub fn parse_fen(fen: &str) -> Result<Board, ChessErrors> {
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| ChessErrors::InvalidFen("missing board layout".to_owned()))?;
    let side_part = parts
        .next()
        .ok_or_else(|| ChessErrors::InvalidFen("missing side to move".to_owned()))?;
    let castling_part = parts
        .next()
        .ok_or_else(|| ChessErrors::InvalidFen("missing castling rights".to_owned()))?;
    let en_passant_part = parts
        .next()
        .ok_or_else(|| ChessErrors::InvalidFen("missing en-passant square".to_owned()))?;

    for (name, clock) in ["halfmove clock", "fullmove number"].into_iter().zip(parts.by_ref()) {
        clock
            .parse::<u16>()
            .map_err(|_| ChessErrors::InvalidFen(format!("invalid {name}: {clock}")))?;
    }
    if parts.next().is_some() {
        return Err(ChessErrors::InvalidFen("extra trailing fields".to_owned()));
    }

    let mut board = Board::from_placement(board_part)?;
    board.set_side_to_move(parse_side_to_move(side_part)?);
    board.set_castling_rights(parse_castling_rights(castling_part)?);
    board.set_en_passant(parse_en_passant_square(en_passant_part)?)?;

    let waiting = board.side_to_move().opposite();
    if MoveGenerator::shared().is_in_check(&board, waiting) {
        return Err(ChessErrors::InvalidFen(format!(
            "{waiting:?} king is in check but it is not {waiting:?} to move"
        )));
    }
    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> Result<Color, ChessErrors> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(ChessErrors::InvalidFen(format!("invalid side to move: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, ChessErrors> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_LIGHT_KINGSIDE,
            'Q' => rights |= CASTLE_LIGHT_QUEENSIDE,
            'k' => rights |= CASTLE_DARK_KINGSIDE,
            'q' => rights |= CASTLE_DARK_QUEENSIDE,
            _ => {
                return Err(ChessErrors::InvalidFen(format!(
                    "invalid castling rights character: {ch}"
                )))
            }
        }
    }
    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, ChessErrors> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    algebraic_to_square(en_passant_part)
        .map(Some)
        .map_err(|_| ChessErrors::InvalidFen(format!("invalid en-passant square: {en_passant_part}")))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;

    #[test]
    fn parse_starting_fen() {
        let board = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(board, Board::new_game());
    }

    #[test]
    fn fields_reach_the_board() {
        let board = parse_fen("4k3/8/8/8/3pP3/8/8/R3K2R b K e3").expect("FEN should parse");
        assert_eq!(board.side_to_move(), Color::Dark);
        assert_eq!(board.castling_rights(), CASTLE_LIGHT_KINGSIDE);
        assert_eq!(board.en_passant(), Some(EnPassant { target: 20, pawn: 28 }));
    }

    #[test]
    fn malformed_fields_are_rejected() {
        let placement = "4k3/8/8/8/8/8/8/4K3";
        for bad in [
            placement.to_owned(),
            format!("{placement} x - -"),
            format!("{placement} w KX -"),
            format!("{placement} w - z9"),
            format!("{placement} w - - x 1"),
            format!("{placement} w - - 0 1 extra"),
        ] {
            let err = parse_fen(&bad).expect_err("FEN should be rejected");
            assert!(matches!(err, ChessErrors::InvalidFen(_)), "{bad}: {err:?}");
        }

        assert!(matches!(
            parse_fen("4k3/8/8 w - - 0 1"),
            Err(ChessErrors::InvalidPlacement(_))
        ));
        assert_eq!(
            parse_fen(&format!("{placement} w - e3 0 1")),
            Err(ChessErrors::InvalidEnPassant(20))
        );
    }

    #[test]
    fn side_not_to_move_may_not_be_in_check() {
        // The a1 rook attacks the dark king with light to move.
        let err = parse_fen("k7/8/8/8/8/8/8/R6K w - - 0 1").expect_err("king capture position");
        assert!(matches!(err, ChessErrors::InvalidFen(_)), "{err:?}");

        // The same placement is fine when dark has to answer the check.
        let board = parse_fen("k7/8/8/8/8/8/8/R6K b - - 0 1").expect("dark is in check");
        assert_eq!(board.side_to_move(), Color::Dark);
    }

    #[test]
    fn en_passant_belongs_to_the_side_to_move() {
        assert_eq!(
            parse_fen("4k3/8/8/8/4P3/8/3P4/4K3 w - e3 0 1"),
            Err(ChessErrors::InvalidEnPassant(20))
        );
        let board = parse_fen("4k3/8/8/8/4P3/8/3P4/4K3 b - e3 0 1").expect("dark may capture");
        assert_eq!(board.en_passant(), Some(EnPassant { target: 20, pawn: 28 }));
    }
}
