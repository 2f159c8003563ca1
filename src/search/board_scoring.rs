//! Static evaluation from the board's running accumulators.
//!
//! Material and piece-square totals are maintained incrementally by the
//! board, so scoring a leaf is a handful of reads plus the mop-up term.

use crate::game_state::chess_types::*;

/// Base of the mate score. A mate found `ply` plies from the root scores
/// `MATE_SCORE / (ply + 1)`, so shorter mates score higher.
pub const MATE_SCORE: i32 = 100_000_000;

/// Initial search window bound. Larger than any reachable score.
pub const INFINITY: i32 = 1_000_000_000;

const MOP_UP_CENTER_WEIGHT: i32 = 10;
const MOP_UP_KING_WEIGHT: i32 = 4;

/// Score of `board` for the side to move, `ply` plies below the search root.
pub fn evaluate(board: &Board, ply: u32) -> i32 {
    let side = board.side_to_move();
    let opponent = side.opposite();

    let own = board.material(side) + board.positional(side);
    let theirs = board.material(opponent) + board.positional(opponent);
    own - theirs + mop_up(board, side, ply)
}

/// Bonus for herding a pawnless opponent's king: away from the centre and
/// towards our own king. Worth less the deeper it is found.
pub fn mop_up(board: &Board, side: Color, ply: u32) -> i32 {
    let opponent = side.opposite();
    if board.piece_count(opponent, PieceKind::Pawn) != 0 {
        return 0;
    }

    let own_king = board.king_square(side);
    let their_king = board.king_square(opponent);

    let bonus = MOP_UP_CENTER_WEIGHT * center_distance(their_king)
        + MOP_UP_KING_WEIGHT * (14 - king_distance(own_king, their_king));
    bonus / (ply as i32 + 1)
}

/// Manhattan distance from the four centre squares, 0..=6.
#[inline]
fn center_distance(square: Square) -> i32 {
    let file = file_of(square) as i32;
    let rank = rank_of(square) as i32;
    (3 - file).max(file - 4) + (3 - rank).max(rank - 4)
}

/// Manhattan distance between two squares, 0..=14.
#[inline]
fn king_distance(a: Square, b: Square) -> i32 {
    (file_of(a) as i32 - file_of(b) as i32).abs() + (rank_of(a) as i32 - rank_of(b) as i32).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn starting_position_is_balanced() {
        let board = Board::new_game();
        assert_eq!(evaluate(&board, 0), 0);
    }

    #[test]
    fn score_is_from_the_side_to_move() {
        let mut board = parse_fen("4k3/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1")
            .expect("FEN should parse");
        let light = evaluate(&board, 0);
        board.set_side_to_move(Color::Dark);
        let dark = evaluate(&board, 0);
        assert!(light > 2500);
        assert_eq!(light, -dark);
    }

    #[test]
    fn mop_up_only_against_a_pawnless_side() {
        let board = parse_fen("7k/8/8/8/8/8/8/KQ6 w - - 0 1").expect("FEN should parse");
        assert_eq!(center_distance(63), 6);
        assert_eq!(king_distance(0, 63), 14);
        // Enemy king in the corner, kings as far apart as they get.
        assert_eq!(mop_up(&board, Color::Light, 0), MOP_UP_CENTER_WEIGHT * 6);
        assert_eq!(mop_up(&board, Color::Light, 2), MOP_UP_CENTER_WEIGHT * 2);

        let with_pawn = parse_fen("7k/7p/8/8/8/8/8/KQ6 w - - 0 1").expect("FEN should parse");
        assert_eq!(mop_up(&with_pawn, Color::Light, 0), 0);
    }

    #[test]
    fn mop_up_prefers_a_cornered_king() {
        let cornered = parse_fen("7k/8/8/8/8/8/8/KQ6 w - - 0 1").expect("FEN should parse");
        let central = parse_fen("8/8/8/4k3/8/8/8/KQ6 w - - 0 1").expect("FEN should parse");
        assert!(mop_up(&cornered, Color::Light, 0) > mop_up(&central, Color::Light, 0));
    }
}
