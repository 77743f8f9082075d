//! Slot-reuse allocator.
//!
//! Maps externally visible match keys to internal storage slots. Slots of
//! finished matches go back to a free pool and are handed out again before
//! any fresh slot is created.
//!
//! The allocator never touches slot contents: the owner must scrub residual
//! per-combatant state of a recycled slot before trusting any read from it.
//!
//! ```
//! use monclash::core::MatchKey;
//! use monclash::state::SlotAllocator;
//!
//! let mut alloc = SlotAllocator::new();
//! let (a, recycled) = alloc.begin_match(MatchKey(1));
//! assert!(!recycled);
//!
//! alloc.end_match(MatchKey(1));
//! let (b, recycled) = alloc.begin_match(MatchKey(2));
//! assert!(recycled);
//! assert_eq!(a, b);
//! ```

use rustc_hash::FxHashMap;

use crate::core::{MatchKey, StorageSlot};

/// Match key → storage slot indirection with a free list.
#[derive(Clone, Debug, Default)]
pub struct SlotAllocator {
    slots: FxHashMap<MatchKey, StorageSlot>,
    free: Vec<StorageSlot>,
    next_fresh: u32,
}

impl SlotAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a slot to `key`.
    ///
    /// Returns the slot and whether it was recycled. A key that already holds
    /// a slot keeps it.
    pub fn begin_match(&mut self, key: MatchKey) -> (StorageSlot, bool) {
        if let Some(&slot) = self.slots.get(&key) {
            return (slot, false);
        }
        let (slot, recycled) = match self.free.pop() {
            Some(slot) => (slot, true),
            None => {
                let slot = StorageSlot(self.next_fresh);
                self.next_fresh += 1;
                (slot, false)
            }
        };
        self.slots.insert(key, slot);
        (slot, recycled)
    }

    /// Release `key`'s slot to the free pool and drop the indirection.
    ///
    /// Returns the released slot, or `None` if `key` held none.
    pub fn end_match(&mut self, key: MatchKey) -> Option<StorageSlot> {
        let slot = self.slots.remove(&key)?;
        self.free.push(slot);
        Some(slot)
    }

    /// Slot currently assigned to `key`.
    #[must_use]
    pub fn lookup(&self, key: MatchKey) -> Option<StorageSlot> {
        self.slots.get(&key).copied()
    }

    /// Number of slots ever created.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.next_fresh as usize
    }

    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_slots_are_sequential() {
        let mut alloc = SlotAllocator::new();
        assert_eq!(alloc.begin_match(MatchKey(10)).0, StorageSlot(0));
        assert_eq!(alloc.begin_match(MatchKey(20)).0, StorageSlot(1));
        assert_eq!(alloc.capacity(), 2);
    }

    #[test]
    fn test_same_key_keeps_slot() {
        let mut alloc = SlotAllocator::new();
        let (first, _) = alloc.begin_match(MatchKey(10));
        let (again, recycled) = alloc.begin_match(MatchKey(10));
        assert_eq!(first, again);
        assert!(!recycled);
        assert_eq!(alloc.capacity(), 1);
    }

    #[test]
    fn test_end_unknown_key() {
        let mut alloc = SlotAllocator::new();
        assert_eq!(alloc.end_match(MatchKey(5)), None);
        assert_eq!(alloc.free_count(), 0);
    }

    #[test]
    fn test_recycle_prefers_free_pool() {
        let mut alloc = SlotAllocator::new();
        alloc.begin_match(MatchKey(1));
        let (b, _) = alloc.begin_match(MatchKey(2));
        alloc.end_match(MatchKey(2));

        let (c, recycled) = alloc.begin_match(MatchKey(3));
        assert!(recycled);
        assert_eq!(c, b);
        assert_eq!(alloc.lookup(MatchKey(2)), None);
        assert_eq!(alloc.lookup(MatchKey(3)), Some(b));
        assert_eq!(alloc.live_count(), 2);
        assert_eq!(alloc.capacity(), 2);
    }
}
