//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Direct-indexed slots with depth-preferred replacement and generation
//! aging. Each slot keeps the full 64-bit key, so two positions that share a
//! slot index are told apart; two positions with the same full key are not,
//! and that risk is accepted.
//!
//! Single-threaded: the table is owned by one engine and borrowed mutably by
//! the search, with no internal locking.

use crate::game_state::board_types::Move;
use crate::search::score::Score;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTEntry {
    pub key: u64,
    /// Remaining depth the score was searched to.
    pub depth: u8,
    pub score: Score,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    generations: Vec<u8>,
    current_generation: u8,
    stats: TTStats,
}

impl TranspositionTable {
    const AGE_REPLACE_THRESHOLD: u8 = 2;

    pub fn new_with_mb(size_mb: usize) -> Self {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        Self::with_entries(bytes / entry_size)
    }

    pub fn with_entries(count: usize) -> Self {
        let count = count.max(1);
        Self {
            entries: vec![None; count],
            generations: vec![0; count],
            current_generation: 0,
            stats: TTStats::default(),
        }
    }

    /// Advance the generation (once per decision).
    #[inline]
    pub fn new_generation(&mut self) {
        self.current_generation = self.current_generation.wrapping_add(1);
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.generations.fill(0);
        self.current_generation = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = TTStats::default();
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Raw lookup regardless of depth.
    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let idx = self.idx(key);
        let hit = self.entries[idx].filter(|e| e.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
            self.generations[idx] = self.current_generation;
        }
        hit
    }

    /// Lookup that only succeeds when the stored entry was searched at least
    /// `remaining_depth` plies deep.
    pub fn try_get(&mut self, key: u64, remaining_depth: u8) -> Option<TTEntry> {
        self.probe(key).filter(|e| e.depth >= remaining_depth)
    }

    /// Best move hint for ordering; depth is ignored.
    pub fn probe_move(&mut self, key: u64) -> Option<Move> {
        self.probe(key).and_then(|e| e.best_move)
    }

    pub fn store(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        match self.entries[idx] {
            None => {
                self.entries[idx] = Some(entry);
                self.generations[idx] = self.current_generation;
            }
            Some(existing) => {
                let age = self.current_generation.wrapping_sub(self.generations[idx]);
                let stale = existing.key != entry.key && age >= Self::AGE_REPLACE_THRESHOLD;

                if stale || entry.depth >= existing.depth {
                    self.entries[idx] = Some(entry);
                    self.generations[idx] = self.current_generation;
                }
            }
        }
    }

    /// Number of occupied slots.
    pub fn occupancy(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::{Bound, TTEntry, TranspositionTable};
    use crate::game_state::board_types::{Move, PShape};

    fn entry(key: u64, depth: u8, score: f32, bound: Bound) -> TTEntry {
        TTEntry {
            key,
            depth,
            score,
            bound,
            best_move: Some(Move::new(3, PShape::Round)),
        }
    }

    #[test]
    fn store_and_probe_round_trip() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(entry(123, 5, 42.0, Bound::Exact));
        let got = tt.probe(123).expect("entry should exist");
        assert_eq!(got.key, 123);
        assert_eq!(got.depth, 5);
        assert_eq!(got.score, 42.0);
        assert_eq!(got.best_move, Some(Move::new(3, PShape::Round)));
    }

    #[test]
    fn depth_preferred_replacement() {
        let mut tt = TranspositionTable::new_with_mb(1);
        let key = 555;
        tt.store(entry(key, 2, 1.0, Bound::Upper));
        tt.store(entry(key, 1, 9.0, Bound::Exact));
        assert_eq!(tt.probe(key).expect("exists").score, 1.0);
        tt.store(entry(key, 6, 3.0, Bound::Lower));
        let got = tt.probe(key).expect("exists");
        assert_eq!(got.depth, 6);
        assert_eq!(got.score, 3.0);
        assert_eq!(got.bound, Bound::Lower);
    }

    #[test]
    fn equal_depth_overwrites() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(entry(77, 3, 1.0, Bound::Upper));
        tt.store(entry(77, 3, 2.0, Bound::Exact));
        assert_eq!(tt.probe(77).expect("exists").score, 2.0);
    }

    #[test]
    fn shallow_entries_are_not_usable_for_deeper_queries() {
        let mut tt = TranspositionTable::new_with_mb(1);
        tt.store(entry(9, 3, 10.0, Bound::Exact));
        assert!(tt.try_get(9, 4).is_none());
        assert!(tt.try_get(9, 3).is_some());
        assert!(tt.try_get(9, 1).is_some());
        // The move hint is still available.
        assert_eq!(tt.probe_move(9), Some(Move::new(3, PShape::Round)));
    }

    #[test]
    fn slot_collision_keeps_keys_apart() {
        let mut tt = TranspositionTable::with_entries(4);
        tt.store(entry(1, 4, 1.0, Bound::Exact));
        // Same slot, different key, shallower: the deeper entry survives.
        tt.store(entry(5, 2, 2.0, Bound::Exact));
        assert!(tt.probe(5).is_none());
        assert_eq!(tt.probe(1).expect("exists").score, 1.0);
    }

    #[test]
    fn stale_slot_is_replaced_by_new_key() {
        let mut tt = TranspositionTable::with_entries(4);
        tt.store(entry(1, 8, 1.0, Bound::Exact));
        tt.new_generation();
        tt.new_generation();
        tt.store(entry(5, 1, 2.0, Bound::Exact));
        assert_eq!(tt.probe(5).expect("exists").score, 2.0);
        assert!(tt.probe(1).is_none());
    }

    #[test]
    fn clear_resets_entries_and_stats() {
        let mut tt = TranspositionTable::with_entries(16);
        tt.store(entry(3, 1, 0.0, Bound::Exact));
        assert_eq!(tt.occupancy(), 1);
        tt.clear();
        assert_eq!(tt.occupancy(), 0);
        assert_eq!(tt.stats().stores, 0);
    }
}
