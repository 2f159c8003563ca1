//! Move-ordering heuristic.
//!
//! Scores are rough guesses meant to put likely-best moves first so alpha-beta
//! cuts early. Moves are bucketed by sign, then each non-zero bucket is sorted
//! descending with a dual-pivot quicksort. Zero-scored moves keep their
//! generation order between the two.

use crate::game_state::chess_rules::{piece_square_value, piece_value};
use crate::game_state::chess_types::*;
use crate::moves::chess_move::Move;
use crate::search::repetition_table::RepetitionTable;

pub const WINNING_CAPTURE_BONUS: i32 = 8_000;
pub const LOSING_CAPTURE_BONUS: i32 = 2_000;
pub const PROMOTION_BONUS: i32 = 6_000;
pub const REPETITION_PENALTY: i32 = 1_000;
pub const KING_MOVE_PENALTY: i32 = 50;

#[derive(Debug, Clone, Copy)]
struct ScoredMove {
    score: i32,
    mv: Move,
}

/// Heuristic score of `mv`.
///
/// `own_attacks` is every square the mover's side attacks. The board's
/// enemy pawn-attack map must come from generating the mover's moves.
pub fn score_move(
    board: &mut Board,
    mv: &Move,
    own_attacks: u64,
    repetitions: &RepetitionTable,
) -> i32 {
    let moved = mv.moved();
    let end_bit = 1u64 << mv.end();
    let mut score = piece_square_value(moved.kind(), moved.color(), mv.end());

    let checkpoint = mv.make(board);
    let repeats = repetitions.contains(board.position_key());
    mv.undo(board, checkpoint);
    if repeats {
        score -= REPETITION_PENALTY;
    }

    if moved.kind() == PieceKind::King && !mv.kind().is_castle() {
        score -= KING_MOVE_PENALTY;
    }

    if mv.is_capture() {
        let captured = mv.captured().map_or(PieceKind::Pawn, |piece| piece.kind());
        let delta = piece_value(captured) - piece_value(moved.kind());
        if own_attacks & end_bit != 0 && delta >= 0 {
            score += WINNING_CAPTURE_BONUS + delta;
        } else {
            score += LOSING_CAPTURE_BONUS + delta;
        }
    }

    if let Some(promoted) = mv.promotion() {
        score += PROMOTION_BONUS + piece_value(promoted);
    }

    if board.attacked_by(PieceKind::Pawn) & end_bit != 0 {
        score -= piece_value(moved.kind());
    }

    score
}

/// Reorder `moves` best-first by `score_move`.
pub fn order_moves(
    board: &mut Board,
    moves: Vec<Move>,
    own_attacks: u64,
    repetitions: &RepetitionTable,
) -> Vec<Move> {
    let mut positive = Vec::with_capacity(moves.len());
    let mut zero = Vec::new();
    let mut negative = Vec::new();

    for mv in moves {
        let score = score_move(board, &mv, own_attacks, repetitions);
        let scored = ScoredMove { score, mv };
        match score.signum() {
            1 => positive.push(scored),
            0 => zero.push(scored),
            _ => negative.push(scored),
        }
    }

    dual_pivot_sort(&mut positive);
    dual_pivot_sort(&mut negative);

    positive
        .into_iter()
        .chain(zero)
        .chain(negative)
        .map(|scored| scored.mv)
        .collect()
}

/// Descending dual-pivot quicksort.
fn dual_pivot_sort(items: &mut [ScoredMove]) {
    if items.len() < 2 {
        return;
    }

    let last = items.len() - 1;
    if items[0].score < items[last].score {
        items.swap(0, last);
    }
    let high = items[0].score;
    let low = items[last].score;

    // [1, lt) > high, [lt, i) in [low, high], (gt, last) < low.
    let mut lt = 1;
    let mut gt = last - 1;
    let mut i = 1;
    while i <= gt {
        if items[i].score > high {
            items.swap(i, lt);
            lt += 1;
        } else if items[i].score < low {
            while items[gt].score < low && i < gt {
                gt -= 1;
            }
            items.swap(i, gt);
            gt -= 1;
            if items[i].score > high {
                items.swap(i, lt);
                lt += 1;
            }
        }
        i += 1;
    }
    lt -= 1;
    gt += 1;
    items.swap(0, lt);
    items.swap(last, gt);

    dual_pivot_sort(&mut items[..lt]);
    dual_pivot_sort(&mut items[lt + 1..gt]);
    dual_pivot_sort(&mut items[gt + 1..]);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::move_generation::move_generator::MoveGenerator;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn dual_pivot_sort_orders_descending() {
        let board = Board::new_game();
        let filler = Move::new(&board, 12, 20, crate::moves::chess_move::MoveKind::Normal);
        let mut rng = StdRng::seed_from_u64(7);

        for len in [0usize, 1, 2, 3, 5, 17, 64, 200] {
            let mut items: Vec<ScoredMove> = (0..len)
                .map(|_| ScoredMove {
                    score: rng.random_range(-20..20),
                    mv: filler,
                })
                .collect();
            let mut expected: Vec<i32> = items.iter().map(|item| item.score).collect();
            expected.sort_unstable_by(|a, b| b.cmp(a));

            dual_pivot_sort(&mut items);
            let got: Vec<i32> = items.iter().map(|item| item.score).collect();
            assert_eq!(got, expected, "length {len}");
        }
    }

    #[test]
    fn hanging_queen_capture_comes_first() {
        // Light knight on c3 can take the undefended queen on d5.
        let mut board =
            parse_fen("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1").expect("FEN should parse");
        let generator = MoveGenerator::shared();
        let moves = generator.generate_legal_moves(&mut board);
        let own_attacks = generator.attacks_of(&board, Color::Light);
        let ordered = order_moves(&mut board, moves, own_attacks, &RepetitionTable::new(4));
        assert_eq!(ordered[0].to_string(), "c3d5");
    }

    #[test]
    fn squares_covered_by_enemy_pawns_are_penalised() {
        // b5 is covered by the a6 pawn; d5 is not.
        let mut board =
            parse_fen("4k3/8/p7/8/8/2N5/8/4K3 w - - 0 1").expect("FEN should parse");
        let generator = MoveGenerator::shared();
        let moves = generator.generate_legal_moves(&mut board);
        let own_attacks = generator.attacks_of(&board, Color::Light);
        let repetitions = RepetitionTable::new(4);

        let score_of = |board: &mut Board, text: &str| {
            let mv = moves
                .iter()
                .find(|mv| mv.to_string() == text)
                .copied()
                .expect("move should be generated");
            score_move(board, &mv, own_attacks, &repetitions)
        };
        let b5 = score_of(&mut board, "c3b5");
        let d5 = score_of(&mut board, "c3d5");
        let square_gap = piece_square_value(PieceKind::Knight, Color::Light, 35)
            - piece_square_value(PieceKind::Knight, Color::Light, 33);
        assert_eq!(d5 - b5, piece_value(PieceKind::Knight) + square_gap);
    }

    #[test]
    fn repeated_positions_sink() {
        let mut board = Board::new_game();
        let generator = MoveGenerator::shared();
        let moves = generator.generate_legal_moves(&mut board);
        let own_attacks = generator.attacks_of(&board, Color::Light);

        let knight_out = moves
            .iter()
            .find(|mv| mv.to_string() == "g1f3")
            .copied()
            .expect("g1f3 is legal");
        let checkpoint = knight_out.make(&mut board);
        let mut repetitions = RepetitionTable::new(4);
        repetitions.push(board.position_key(), false);
        knight_out.undo(&mut board, checkpoint);

        let plain = score_move(&mut board, &knight_out, own_attacks, &RepetitionTable::new(4));
        let repeated = score_move(&mut board, &knight_out, own_attacks, &repetitions);
        assert_eq!(plain - repeated, REPETITION_PENALTY);
    }
}
