//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! The keys are generated from a fixed seed so hashes are deterministic across
//! runs, which is useful for testing and debugging.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;

/// One key per `(kind, color, square)` plus one trailing slot.
pub const KEY_COUNT: usize = 12 * 64 + 1;

const KEY_SEED: u64 = 0;

/// Process-wide random key table. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    keys: [u64; KEY_COUNT],
}

static SHARED: OnceLock<ZobristKeys> = OnceLock::new();

impl ZobristKeys {
    /// Build a table from an explicit seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut keys = [0u64; KEY_COUNT];
        for key in &mut keys {
            *key = rng.random::<u64>();
        }
        Self { keys }
    }

    /// The table shared by every board in the process.
    pub fn shared() -> &'static ZobristKeys {
        SHARED.get_or_init(|| {
            log::debug!("building zobrist keys ({KEY_COUNT} entries, seed {KEY_SEED})");
            Self::with_seed(KEY_SEED)
        })
    }

    #[inline]
    pub fn index(piece: Piece, square: Square) -> usize {
        let color_offset = match piece.color() {
            Color::Light => 6,
            Color::Dark => 0,
        };
        (piece.kind().index() + color_offset) * 64 + square as usize
    }

    /// Key for one occupied `(piece, square)` pair.
    #[inline]
    pub fn piece_square(&self, piece: Piece, square: Square) -> u64 {
        self.keys[Self::index(piece, square)]
    }

    /// The trailing slot. Folded in when dark is to move.
    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.keys[KEY_COUNT - 1]
    }

    /// Hash a placement from scratch.
    pub fn hash_placement<I>(&self, occupied: I) -> u64
    where
        I: IntoIterator<Item = (Square, Piece)>,
    {
        occupied
            .into_iter()
            .fold(0u64, |acc, (square, piece)| acc ^ self.piece_square(piece, square))
    }
}

impl std::fmt::Debug for ZobristKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZobristKeys")
            .field("len", &self.keys.len())
            .finish()
    }
}
