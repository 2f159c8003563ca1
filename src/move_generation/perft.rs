//! Brute-force leaf counting over generate/make/undo.
//!
//! Regression oracle for move generation: the counts for the standard suite
//! positions are published and any generator or make/undo bug shows up as a
//! mismatch.

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Board;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::chess_move::{Move, MoveKind};

/// A position with its published leaf counts, `nodes[d - 1]` at depth `d`.
#[derive(Debug, Clone, Copy)]
pub struct PerftReference {
    pub name: &'static str,
    pub fen: &'static str,
    pub nodes: &'static [u64],
}

/// The standard perft suite.
pub const REFERENCE_POSITIONS: &[PerftReference] = &[
    PerftReference {
        name: "startpos",
        fen: STARTING_POSITION_FEN,
        nodes: &[20, 400, 8902, 197_281],
    },
    PerftReference {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        nodes: &[48, 2039, 97_862],
    },
    PerftReference {
        name: "rook_endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        nodes: &[14, 191, 2812, 43_238, 674_624],
    },
    PerftReference {
        name: "promotions",
        fen: "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        nodes: &[6, 264, 9467, 422_333],
    },
    PerftReference {
        name: "discovered_check",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        nodes: &[44, 1486, 62_379, 2_103_487],
    },
    PerftReference {
        name: "middlegame",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        nodes: &[46, 2079, 89_890, 3_894_594],
    },
];

impl PerftReference {
    pub fn named(name: &str) -> Option<&'static PerftReference> {
        REFERENCE_POSITIONS.iter().find(|reference| reference.name == name)
    }

    /// `(depth, nodes)` pairs whose count stays within `max_nodes`.
    pub fn depths_up_to(&self, max_nodes: u64) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, nodes)| ((index + 1) as u8, *nodes))
            .take_while(move |(_, nodes)| *nodes <= max_nodes)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }
}

/// Number of leaf positions `depth` plies below `board`.
pub fn perft(generator: &MoveGenerator<'_>, board: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generator.generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in &moves {
        let checkpoint = mv.make(board);
        nodes += perft(generator, board, depth - 1);
        mv.undo(board, checkpoint);
    }
    nodes
}

/// Leaf count below each root move, in generation order.
pub fn perft_divide(generator: &MoveGenerator<'_>, board: &mut Board, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let moves = generator.generate_legal_moves(board);
    let mut divide = Vec::with_capacity(moves.len());
    for mv in moves {
        let checkpoint = mv.make(board);
        let nodes = perft(generator, board, depth - 1);
        mv.undo(board, checkpoint);
        log::trace!("{mv}: {nodes}");
        divide.push((mv, nodes));
    }
    divide
}

/// Leaf count plus a breakdown of the moves that reach the leaves.
pub fn perft_counts(generator: &MoveGenerator<'_>, board: &mut Board, depth: u8) -> PerftCounts {
    if depth == 0 {
        return PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };
    }

    let mut total = PerftCounts::default();
    for mv in generator.generate_legal_moves(board) {
        let checkpoint = mv.make(board);
        if depth == 1 {
            total.merge(classify_leaf(generator, board, &mv));
        } else {
            total.merge(perft_counts(generator, board, depth - 1));
        }
        mv.undo(board, checkpoint);
    }
    total
}

fn classify_leaf(generator: &MoveGenerator<'_>, board: &Board, mv: &Move) -> PerftCounts {
    PerftCounts {
        nodes: 1,
        captures: u64::from(mv.is_capture()),
        en_passant: u64::from(mv.kind() == MoveKind::EnPassant),
        castles: u64::from(mv.kind().is_castle()),
        promotions: u64::from(mv.promotion().is_some()),
        checks: u64::from(generator.is_in_check(board, board.side_to_move())),
    }
}
