//! Battle event log.
//!
//! Every resolution pass records what happened as a flat list of
//! `BattleEvent`s, returned to the caller in a `TurnReport`. Content code
//! can append its own entries through `BattleEvent::Custom`.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::types::MonStateIndex;
use crate::effects::{EffectStep, EffectTarget};

/// Why a submitted decision did not run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The acting combatant is knocked out.
    KnockedOut,
    /// The combatant's one-shot skip-turn flag was consumed.
    SkipTurnFlag,
    /// The decision became illegal after it was revealed.
    NoLongerLegal,
    /// Doubles: the switch target is already fielded by the sibling slot.
    SiblingOccupied,
}

/// One entry of the battle log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    MatchStarted,
    TurnStarted {
        turn_id: u64,
    },
    MoveExecuted {
        player: PlayerId,
        slot: usize,
        mon_index: usize,
        move_index: usize,
    },
    Switched {
        player: PlayerId,
        slot: usize,
        from: usize,
        to: usize,
    },
    NoOp {
        player: PlayerId,
        slot: usize,
    },
    DecisionSkipped {
        player: PlayerId,
        slot: usize,
        reason: SkipReason,
    },
    Damage {
        player: PlayerId,
        mon_index: usize,
        amount: i32,
    },
    MonStateUpdated {
        player: PlayerId,
        mon_index: usize,
        index: MonStateIndex,
        value: i32,
    },
    KnockedOut {
        player: PlayerId,
        mon_index: usize,
    },
    EffectAdded {
        target: EffectTarget,
        index: usize,
        name: String,
    },
    EffectRan {
        target: EffectTarget,
        index: usize,
        step: EffectStep,
    },
    EffectRemoved {
        target: EffectTarget,
        index: usize,
    },
    AbilityActivated {
        player: PlayerId,
        mon_index: usize,
    },
    Custom {
        player: Option<PlayerId>,
        tag: String,
        value: i64,
    },
    GameOver {
        winner: PlayerId,
    },
}

impl BattleEvent {
    /// Build a content-defined event.
    pub fn custom(player: Option<PlayerId>, tag: impl Into<String>, value: i64) -> Self {
        BattleEvent::Custom {
            player,
            tag: tag.into(),
            value,
        }
    }

    /// Tag of a custom event, if this is one.
    #[must_use]
    pub fn custom_tag(&self) -> Option<&str> {
        match self {
            BattleEvent::Custom { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_tag() {
        let event = BattleEvent::custom(Some(PlayerId::P0), "burn", 3);
        assert_eq!(event.custom_tag(), Some("burn"));
        assert_eq!(BattleEvent::MatchStarted.custom_tag(), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = BattleEvent::Switched {
            player: PlayerId::P1,
            slot: 0,
            from: 0,
            to: 2,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: BattleEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
