//! Move selectors and per-slot decisions.
//!
//! ## Encoding
//!
//! A selector is one byte on the wire:
//!
//! | raw        | meaning                          |
//! |------------|----------------------------------|
//! | `0..=124`  | move at that index of the mon    |
//! | `125`      | switch; extra data = roster slot |
//! | `126`      | no-op                            |

use serde::{Deserialize, Serialize};

/// Raw selector value for a switch.
pub const SWITCH_MOVE_INDEX: u8 = 125;

/// Raw selector value for a no-op.
pub const NO_OP_MOVE_INDEX: u8 = 126;

/// Priority of regular moves unless a move says otherwise.
pub const DEFAULT_PRIORITY: u32 = 3;

/// Priority tier of switches and no-ops. Always ahead of regular moves.
pub const SWITCH_PRIORITY: u32 = 6;

/// What a slot does this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveSelector {
    /// Use the move at this index of the acting combatant.
    Move(usize),
    /// Field the roster position carried in the decision's extra data.
    Switch,
    /// Do nothing.
    NoOp,
}

impl MoveSelector {
    /// Wire encoding. `None` for move indices past the last encodable one.
    #[must_use]
    pub fn raw(self) -> Option<u8> {
        match self {
            MoveSelector::Move(index) => u8::try_from(index)
                .ok()
                .filter(|&raw| raw < SWITCH_MOVE_INDEX),
            MoveSelector::Switch => Some(SWITCH_MOVE_INDEX),
            MoveSelector::NoOp => Some(NO_OP_MOVE_INDEX),
        }
    }

    /// Decode a wire value. Values above the no-op index are rejected.
    #[must_use]
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            SWITCH_MOVE_INDEX => Some(MoveSelector::Switch),
            NO_OP_MOVE_INDEX => Some(MoveSelector::NoOp),
            r if r < SWITCH_MOVE_INDEX => Some(MoveSelector::Move(r as usize)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_switch(self) -> bool {
        self == MoveSelector::Switch
    }
}

impl std::fmt::Display for MoveSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveSelector::Move(i) => write!(f, "Move({i})"),
            MoveSelector::Switch => write!(f, "Switch"),
            MoveSelector::NoOp => write!(f, "NoOp"),
        }
    }
}

/// A slot's decision for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveDecision {
    pub selector: MoveSelector,
    /// Switch target for switches; move-specific payload otherwise.
    pub extra_data: u64,
    /// Set once the decision has been recorded for the current turn.
    pub submitted: bool,
}

impl MoveDecision {
    pub const EMPTY: MoveDecision = MoveDecision {
        selector: MoveSelector::NoOp,
        extra_data: 0,
        submitted: false,
    };

    #[must_use]
    pub const fn new(selector: MoveSelector, extra_data: u64) -> Self {
        Self {
            selector,
            extra_data,
            submitted: false,
        }
    }

    #[must_use]
    pub const fn use_move(index: usize, extra_data: u64) -> Self {
        Self::new(MoveSelector::Move(index), extra_data)
    }

    #[must_use]
    pub const fn switch_to(mon_index: usize) -> Self {
        Self::new(MoveSelector::Switch, mon_index as u64)
    }

    #[must_use]
    pub const fn no_op() -> Self {
        Self::new(MoveSelector::NoOp, 0)
    }

    /// Roster position targeted by a switch.
    #[must_use]
    pub fn switch_target(&self) -> Option<usize> {
        match self.selector {
            MoveSelector::Switch => Some(self.extra_data as usize),
            _ => None,
        }
    }

    /// Opponent slot targeted by a move in doubles (low byte of extra data).
    #[must_use]
    pub fn target_slot(&self) -> usize {
        (self.extra_data & 0xFF) as usize
    }
}

impl Default for MoveDecision {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_encoding() {
        assert_eq!(MoveSelector::Move(0).raw(), Some(0));
        assert_eq!(MoveSelector::Move(124).raw(), Some(124));
        assert_eq!(MoveSelector::Move(125).raw(), None);
        assert_eq!(MoveSelector::Move(300).raw(), None);
        assert_eq!(MoveSelector::Switch.raw(), Some(125));
        assert_eq!(MoveSelector::NoOp.raw(), Some(126));

        assert_eq!(MoveSelector::from_raw(3), Some(MoveSelector::Move(3)));
        assert_eq!(MoveSelector::from_raw(125), Some(MoveSelector::Switch));
        assert_eq!(MoveSelector::from_raw(127), None);
    }

    #[test]
    fn test_switch_target() {
        assert_eq!(MoveDecision::switch_to(2).switch_target(), Some(2));
        assert_eq!(MoveDecision::use_move(0, 2).switch_target(), None);
        assert_eq!(MoveDecision::use_move(0, 0x101).target_slot(), 1);
    }

    #[test]
    fn test_switch_outranks_default() {
        assert!(SWITCH_PRIORITY > DEFAULT_PRIORITY);
    }
}
