//! Fixed-depth negamax search with fail-hard alpha-beta pruning.
//!
//! The engine walks one board depth-first with make/undo. Every node pushes
//! its position key onto the repetition table and pops it on the way out,
//! cutoffs included, so both the board's undo stack and the repetition stack
//! are balanced when `search` returns.

use crate::game_state::chess_types::*;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::attack_tables::AttackTables;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{evaluate, MATE_SCORE};
use crate::search::move_ordering::order_moves;
use crate::search::repetition_table::RepetitionTable;
use crate::search::transposition_table::{Bound, TTEntry, TranspositionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub transposition_entries: usize,
    pub repetition_capacity: usize,
    pub use_transposition_table: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transposition_entries: 250_000,
            repetition_capacity: 256,
            use_transposition_table: true,
        }
    }
}

/// Counters for the most recent `search` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
}

#[derive(Debug)]
pub struct SearchEngine<'a> {
    generator: MoveGenerator<'a>,
    config: EngineConfig,
    transpositions: TranspositionTable,
    repetitions: RepetitionTable,
    best_move: Option<Move>,
    stats: SearchStats,
}

impl SearchEngine<'static> {
    /// Engine over the process-wide attack tables.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_tables(AttackTables::shared(), config)
    }
}

impl Default for SearchEngine<'static> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<'a> SearchEngine<'a> {
    pub fn with_tables(tables: &'a AttackTables, config: EngineConfig) -> Self {
        Self {
            generator: MoveGenerator::new(tables),
            config,
            transpositions: TranspositionTable::new(config.transposition_entries),
            repetitions: RepetitionTable::new(config.repetition_capacity),
            best_move: None,
            stats: SearchStats::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Best root move of the last search, if the root had any legal move.
    #[inline]
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }

    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    #[inline]
    pub fn generator(&self) -> &MoveGenerator<'a> {
        &self.generator
    }

    #[inline]
    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.transpositions
    }

    #[inline]
    pub fn transposition_table_mut(&mut self) -> &mut TranspositionTable {
        &mut self.transpositions
    }

    /// Add a position from the game so far to the repetition history.
    ///
    /// `after_pawn_move` is true when the move that reached it was a pawn move.
    pub fn record_game_position(&mut self, board: &Board, after_pawn_move: bool) {
        self.repetitions.push(board.position_key(), after_pawn_move);
    }

    /// Forget cached results and recorded game history.
    pub fn clear(&mut self) {
        self.transpositions.clear();
        self.repetitions.clear();
        self.best_move = None;
        self.stats = SearchStats::default();
    }

    /// Search `depth` plies below `board` inside `[alpha, beta]`.
    ///
    /// Returns the score for the side to move. The board is left exactly as
    /// it was handed in.
    pub fn search(&mut self, board: &mut Board, depth: u8, alpha: i32, beta: i32) -> i32 {
        assert!(alpha < beta, "empty search window [{alpha}, {beta}]");
        self.best_move = None;
        self.stats = SearchStats::default();
        let history = board.history_len();
        let recorded = self.repetitions.len();

        // The root is in the line, so returning to it is a repetition.
        self.repetitions.push(board.position_key(), false);
        let score = self.negamax(board, depth, 0, alpha, beta, false);
        self.repetitions.pop();

        debug_assert_eq!(board.history_len(), history);
        debug_assert_eq!(self.repetitions.len(), recorded);
        log::debug!(
            "search depth {depth}: score {score}, best {}, {} nodes, {} tt hits",
            self.best_move.map_or_else(|| "none".to_owned(), |mv| mv.to_string()),
            self.stats.nodes,
            self.stats.tt_hits
        );
        score
    }

    /// Legal moves of the side to move, best-first.
    pub fn ordered_moves(&self, board: &mut Board) -> Vec<Move> {
        let side = board.side_to_move();
        let moves = self.generator.generate_moves(board, side);
        self.order(board, moves, side)
    }

    fn order(&self, board: &mut Board, moves: Vec<Move>, side: Color) -> Vec<Move> {
        let own_attacks = self.generator.attacks_of(board, side);
        order_moves(board, moves, own_attacks, &self.repetitions)
    }

    fn negamax(
        &mut self,
        board: &mut Board,
        depth: u8,
        ply: u32,
        alpha: i32,
        beta: i32,
        after_pawn_move: bool,
    ) -> i32 {
        self.stats.nodes += 1;
        if ply == 0 {
            return self.expand(board, depth, ply, alpha, beta);
        }

        let key = board.position_key();
        if self.repetitions.contains(key) {
            return 0;
        }
        self.repetitions.push(key, after_pawn_move);
        let score = self.expand(board, depth, ply, alpha, beta);
        self.repetitions.pop();
        score
    }

    fn expand(&mut self, board: &mut Board, depth: u8, ply: u32, mut alpha: i32, beta: i32) -> i32 {
        if depth == 0 {
            return evaluate(board, ply);
        }

        let key = board.position_key();
        let use_tt = self.config.use_transposition_table;
        if use_tt {
            if let Some(entry) = self.transpositions.lookup(key, depth, alpha, beta) {
                if ply > 0 || entry.best_move.is_some() {
                    self.stats.tt_hits += 1;
                    if ply == 0 {
                        self.best_move = entry.best_move;
                    }
                    return entry.score.max(alpha).min(beta);
                }
            }
        }

        let side = board.side_to_move();
        let moves = self.generator.generate_moves(board, side);
        if moves.is_empty() {
            return if board.in_check() {
                -MATE_SCORE / (ply as i32 + 1)
            } else {
                0
            };
        }

        let mut best: Option<Move> = None;
        for mv in self.order(board, moves, side) {
            let checkpoint = mv.make(board);
            let score =
                -self.negamax(board, depth - 1, ply + 1, -beta, -alpha, mv.is_irreversible());
            mv.undo(board, checkpoint);

            if score >= beta {
                if use_tt {
                    self.transpositions.store(TTEntry {
                        key,
                        depth,
                        score: beta,
                        bound: Bound::Lower,
                        best_move: Some(mv),
                    });
                }
                if ply == 0 {
                    self.best_move = Some(mv);
                }
                return beta;
            }
            if score > alpha {
                alpha = score;
                best = Some(mv);
            }
        }

        if ply == 0 {
            self.best_move = best;
        } else if use_tt {
            self.transpositions.store(TTEntry {
                key,
                depth,
                score: alpha,
                bound: if best.is_some() { Bound::Exact } else { Bound::Upper },
                best_move: best,
            });
        }
        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::board_scoring::INFINITY;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn depth_zero_returns_the_static_evaluation() {
        let mut board = Board::new_game();
        let mut engine = SearchEngine::default();
        assert_eq!(engine.search(&mut board, 0, -INFINITY, INFINITY), 0);
        assert_eq!(engine.best_move(), None);
        assert_eq!(engine.stats().nodes, 1);
    }

    #[test]
    fn finds_mate_in_one() {
        let mut board = parse_fen("k7/8/1K6/8/8/8/8/7R w - - 0 1").expect("FEN should parse");
        let before = board.clone();
        let mut engine = SearchEngine::default();
        // The mated reply has to be expanded, so one ply is not enough.
        let score = engine.search(&mut board, 2, -INFINITY, INFINITY);
        assert_eq!(score, MATE_SCORE / 2);
        assert_eq!(engine.best_move().map(|mv| mv.to_string()).as_deref(), Some("h1h8"));
        assert_eq!(board, before);
    }

    #[test]
    fn prefers_the_shorter_mate() {
        let mut board = parse_fen("k7/8/1K6/8/8/8/8/7R w - - 0 1").expect("FEN should parse");
        let mut engine = SearchEngine::default();
        let score = engine.search(&mut board, 4, -INFINITY, INFINITY);
        assert_eq!(score, MATE_SCORE / 2);
        assert_eq!(engine.best_move().map(|mv| mv.to_string()).as_deref(), Some("h1h8"));
    }

    #[test]
    fn stalemate_scores_zero() {
        let mut board = parse_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").expect("FEN should parse");
        let mut engine = SearchEngine::default();
        assert_eq!(engine.search(&mut board, 2, -INFINITY, INFINITY), 0);
        assert_eq!(engine.best_move(), None);
    }

    #[test]
    fn takes_a_hanging_queen() {
        let mut board =
            parse_fen("4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut engine = SearchEngine::default();
        let score = engine.search(&mut board, 2, -INFINITY, INFINITY);
        assert_eq!(engine.best_move().map(|mv| mv.to_string()).as_deref(), Some("c3d5"));
        assert!(score > 0);
    }

    #[test]
    fn clear_resets_tables() {
        let mut board = Board::new_game();
        let mut engine = SearchEngine::default();
        engine.record_game_position(&board, false);
        engine.search(&mut board, 2, -INFINITY, INFINITY);
        assert!(engine.transposition_table().stats().stores > 0);

        engine.clear();
        assert_eq!(engine.transposition_table().stats(), Default::default());
        assert_eq!(engine.best_move(), None);
    }
}
