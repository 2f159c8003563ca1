use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ferrule_chess::game_state::chess_types::Board;
use ferrule_chess::move_generation::move_generator::MoveGenerator;
use ferrule_chess::utils::fen_parser::parse_fen;

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
];

/// Every legal move keeps the board consistent, never leaves the mover in
/// check, and undoes back to an identical board.
fn check_every_move(generator: &MoveGenerator<'_>, board: &mut Board) {
    let before = board.clone();
    let mover = board.side_to_move();

    for mv in generator.generate_legal_moves(board) {
        let checkpoint = mv.make(board);
        assert!(board.is_consistent(), "inconsistent after {mv}");
        assert_eq!(board.zobrist_key(), board.compute_zobrist_key(), "hash drift after {mv}");
        assert!(!generator.is_in_check(board, mover), "{mv} leaves the king attacked");
        mv.undo(board, checkpoint);
        assert_eq!(*board, before, "undo of {mv} did not restore the board");
    }
}

#[test]
fn random_games_keep_the_board_consistent() {
    let generator = MoveGenerator::shared();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for fen in POSITIONS {
        for _ in 0..4 {
            let mut board = parse_fen(fen).expect("FEN should parse");
            let start = board.clone();
            let mut line = Vec::new();

            for _ in 0..80 {
                check_every_move(&generator, &mut board);
                let moves = generator.generate_legal_moves(&mut board);
                if moves.is_empty() {
                    break;
                }
                let mv = moves[rng.random_range(0..moves.len())];
                let checkpoint = mv.make(&mut board);
                line.push((mv, checkpoint));
            }

            while let Some((mv, checkpoint)) = line.pop() {
                mv.undo(&mut board, checkpoint);
            }
            assert_eq!(board, start, "unwinding a game from {fen}");
        }
    }
}

#[test]
fn transpositions_share_a_key() {
    let generator = MoveGenerator::shared();
    let play = |line: &[&str]| {
        let mut board = Board::new_game();
        for text in line {
            let mv = ferrule_chess::utils::long_algebraic::parse_move(text, &mut board, &generator)
                .expect("line should be legal");
            // Never unwound, so the checkpoint is not needed.
            let _ = mv.make(&mut board);
        }
        board.position_key()
    };

    assert_eq!(
        play(&["g1f3", "g8f6", "b1c3"]),
        play(&["b1c3", "g8f6", "g1f3"])
    );
    assert_ne!(play(&["g1f3", "g8f6"]), play(&["g1f3"]));
}
