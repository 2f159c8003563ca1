//! Fixed-size transposition table keyed by position hash.
//!
//! Direct indexing, no probing: a store always overwrites its slot. Every
//! read compares the full stored key first, so two positions sharing a slot
//! never see each other's results.

use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl TTEntry {
    /// Whether this entry answers a `depth` search inside `[alpha, beta]`.
    #[inline]
    pub fn is_usable(&self, depth: u8, alpha: i32, beta: i32) -> bool {
        if self.depth < depth {
            return false;
        }
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score <= alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub evictions: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![None; capacity.max(1)],
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// The entry stored for exactly `key`, if its slot still holds it.
    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let hit = self.entries[self.idx(key)].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// The entry for `key` if it can stand in for a `depth` search in `[alpha, beta]`.
    pub fn lookup(&mut self, key: u64, depth: u8, alpha: i32, beta: i32) -> Option<TTEntry> {
        self.probe(key).filter(|e| e.is_usable(depth, alpha, beta))
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        if let Some(existing) = self.entries[idx] {
            if existing.key != entry.key {
                self.stats.evictions += 1;
                log::trace!(
                    "tt slot {idx}: evicting {:#018x} (depth {}) for {:#018x} (depth {})",
                    existing.key,
                    existing.depth,
                    entry.key,
                    entry.depth
                );
            }
        }
        self.entries[idx] = Some(entry);
    }
}
