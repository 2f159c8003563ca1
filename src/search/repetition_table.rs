//! Position history for the active search line.
//!
//! A stack of position keys with a side array of window starts. Each push
//! records where the repetition window begins for everything above it: at
//! its own index after an irreversible move, otherwise wherever the window
//! below began. `contains` only scans that window.

#[derive(Debug, Clone)]
pub struct RepetitionTable {
    keys: Vec<u64>,
    window_starts: Vec<usize>,
}

impl RepetitionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            window_starts: Vec::with_capacity(capacity),
        }
    }

    /// Push `key`. `reset` marks a position reached by an irreversible move.
    pub fn push(&mut self, key: u64, reset: bool) {
        let start = if reset {
            self.keys.len()
        } else {
            self.window_start()
        };
        self.keys.push(key);
        self.window_starts.push(start);
    }

    pub fn pop(&mut self) {
        if self.keys.pop().is_none() {
            panic!("repetition table underflow");
        }
        self.window_starts.pop();
    }

    /// Whether `key` occurs since the last irreversible move.
    pub fn contains(&self, key: u64) -> bool {
        self.keys[self.window_start()..].contains(&key)
    }

    #[inline]
    fn window_start(&self) -> usize {
        self.window_starts.last().copied().unwrap_or(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.window_starts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::RepetitionTable;

    #[test]
    fn finds_keys_pushed_in_the_line() {
        let mut table = RepetitionTable::new(8);
        table.push(1, false);
        table.push(2, false);
        assert!(table.contains(1));
        assert!(table.contains(2));
        assert!(!table.contains(3));

        table.pop();
        assert!(!table.contains(2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn irreversible_moves_close_the_window() {
        let mut table = RepetitionTable::new(8);
        table.push(1, false);
        table.push(2, false);
        table.push(3, true);
        table.push(4, false);
        assert!(!table.contains(1));
        assert!(!table.contains(2));
        assert!(table.contains(3));
        assert!(table.contains(4));

        table.pop();
        table.pop();
        assert!(table.contains(1), "window reopens once the reset is popped");
    }

    #[test]
    fn clear_empties_the_stack() {
        let mut table = RepetitionTable::new(4);
        table.push(9, false);
        table.clear();
        assert!(table.is_empty());
        assert!(!table.contains(9));
    }
}
