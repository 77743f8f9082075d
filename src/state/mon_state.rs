//! Mutable per-combatant state.
//!
//! Stat deltas carry a reserved sentinel meaning "not touched this match".
//! A cleared state is therefore one constant (`CombatantState::CLEARED`),
//! and recycling a storage slot replaces the whole table with it instead of
//! zeroing fields one by one.

use serde::{Deserialize, Serialize};

use crate::core::MonStateIndex;

/// Reserved delta value meaning "never modified this match".
///
/// Legitimate deltas never equal this value: updates that would land on it
/// are clamped one below.
pub const CLEARED_DELTA: i32 = i32::MAX - 1;

/// A signed stat delta with an explicit "untouched" state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatDelta(i32);

impl StatDelta {
    pub const CLEARED: StatDelta = StatDelta(CLEARED_DELTA);

    /// Delta value, or `None` if the stat was never touched.
    #[must_use]
    pub const fn get(self) -> Option<i32> {
        if self.0 == CLEARED_DELTA {
            None
        } else {
            Some(self.0)
        }
    }

    /// Delta value with "untouched" read as zero.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self.get() {
            Some(v) => v,
            None => 0,
        }
    }

    #[must_use]
    pub const fn is_cleared(self) -> bool {
        self.0 == CLEARED_DELTA
    }

    /// Add to the delta. An untouched delta starts from zero.
    pub fn apply(&mut self, change: i32) {
        let next = self.value().saturating_add(change);
        self.0 = if next >= CLEARED_DELTA { CLEARED_DELTA - 1 } else { next };
    }
}

impl Default for StatDelta {
    fn default() -> Self {
        Self::CLEARED
    }
}

/// Mutable state of one combatant in one match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantState {
    /// Indexed by `MonStateIndex::delta_index`.
    deltas: [StatDelta; 7],
    pub knocked_out: bool,
    pub skip_turn: bool,
}

impl CombatantState {
    pub const CLEARED: CombatantState = CombatantState {
        deltas: [StatDelta::CLEARED; 7],
        knocked_out: false,
        skip_turn: false,
    };

    /// Raw delta of a stat. `None` for the boolean indices.
    #[must_use]
    pub fn delta(&self, stat: MonStateIndex) -> Option<StatDelta> {
        stat.delta_index().map(|i| self.deltas[i])
    }

    /// Apply an update through a state index.
    ///
    /// For `IsKnockedOut`/`ShouldSkipTurn` any odd value sets the flag and
    /// any even value clears it.
    pub fn apply(&mut self, index: MonStateIndex, value: i32) {
        match index.delta_index() {
            Some(i) => self.deltas[i].apply(value),
            None => {
                let flag = value % 2 != 0;
                match index {
                    MonStateIndex::IsKnockedOut => self.knocked_out = flag,
                    _ => self.skip_turn = flag,
                }
            }
        }
    }

    /// Read a state index as a plain integer (flags read as 0/1).
    #[must_use]
    pub fn read(&self, index: MonStateIndex) -> i32 {
        match index {
            MonStateIndex::IsKnockedOut => self.knocked_out as i32,
            MonStateIndex::ShouldSkipTurn => self.skip_turn as i32,
            stat => self.delta(stat).map_or(0, |delta| delta.value()),
        }
    }

    #[must_use]
    pub fn is_cleared(&self) -> bool {
        *self == Self::CLEARED
    }
}

impl Default for CombatantState {
    fn default() -> Self {
        Self::CLEARED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_vs_zero() {
        let mut delta = StatDelta::CLEARED;
        assert_eq!(delta.get(), None);
        assert_eq!(delta.value(), 0);

        delta.apply(5);
        delta.apply(-5);
        assert_eq!(delta.get(), Some(0));
        assert!(!delta.is_cleared());
    }

    #[test]
    fn test_apply_never_produces_sentinel() {
        let mut delta = StatDelta::CLEARED;
        delta.apply(i32::MAX);
        assert_eq!(delta.get(), Some(CLEARED_DELTA - 1));
    }

    #[test]
    fn test_flags() {
        let mut state = CombatantState::CLEARED;
        state.apply(MonStateIndex::ShouldSkipTurn, 1);
        assert!(state.skip_turn);
        assert_eq!(state.read(MonStateIndex::ShouldSkipTurn), 1);
        state.apply(MonStateIndex::ShouldSkipTurn, 0);
        assert!(!state.skip_turn);
        assert!(state.is_cleared());
    }

    #[test]
    fn test_stat_update() {
        let mut state = CombatantState::CLEARED;
        state.apply(MonStateIndex::Speed, -20);
        assert_eq!(state.read(MonStateIndex::Speed), -20);
        assert_eq!(state.delta(MonStateIndex::Attack), Some(StatDelta::CLEARED));
        assert!(!state.is_cleared());
    }

    #[test]
    fn test_flags_have_no_delta() {
        assert_eq!(CombatantState::CLEARED.delta(MonStateIndex::IsKnockedOut), None);
        assert_eq!(CombatantState::CLEARED.delta(MonStateIndex::ShouldSkipTurn), None);
        assert!(CombatantState::CLEARED.delta(MonStateIndex::Hp).is_some());
    }
}
