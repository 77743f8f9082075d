//! Small shared enums and identifiers.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Externally visible match identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey(pub u64);

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Match({:#x})", self.0)
    }
}

/// Internal storage slot a match lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageSlot(pub u32);

impl StorageSlot {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Number of active slots per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Singles,
    Doubles,
}

impl GameMode {
    /// Active slots per side in this mode.
    #[must_use]
    pub const fn active_slots(self) -> usize {
        match self {
            GameMode::Singles => 1,
            GameMode::Doubles => 2,
        }
    }
}

/// Who must submit a decision for the upcoming turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayersToMove {
    /// Only this side decides (the other side's slot(s) sit out).
    Only(PlayerId),
    #[default]
    Both,
}

impl PlayersToMove {
    /// Does `player` owe a decision this turn?
    #[must_use]
    pub fn includes(self, player: PlayerId) -> bool {
        match self {
            PlayersToMove::Only(p) => p == player,
            PlayersToMove::Both => true,
        }
    }

    #[must_use]
    pub fn is_both(self) -> bool {
        matches!(self, PlayersToMove::Both)
    }
}

/// Mutable per-combatant fields addressable through the state-update
/// entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonStateIndex {
    Hp,
    Stamina,
    Speed,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    IsKnockedOut,
    ShouldSkipTurn,
}

impl MonStateIndex {
    /// The seven signed-delta stats, in storage order.
    pub const STATS: [MonStateIndex; 7] = [
        MonStateIndex::Hp,
        MonStateIndex::Stamina,
        MonStateIndex::Speed,
        MonStateIndex::Attack,
        MonStateIndex::Defense,
        MonStateIndex::SpecialAttack,
        MonStateIndex::SpecialDefense,
    ];

    /// Position in the delta array, or `None` for the boolean flags.
    #[must_use]
    pub const fn delta_index(self) -> Option<usize> {
        match self {
            MonStateIndex::Hp => Some(0),
            MonStateIndex::Stamina => Some(1),
            MonStateIndex::Speed => Some(2),
            MonStateIndex::Attack => Some(3),
            MonStateIndex::Defense => Some(4),
            MonStateIndex::SpecialAttack => Some(5),
            MonStateIndex::SpecialDefense => Some(6),
            MonStateIndex::IsKnockedOut | MonStateIndex::ShouldSkipTurn => None,
        }
    }
}

/// Elemental type of a combatant or move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Yin,
    Yang,
    Earth,
    Water,
    Fire,
    Metal,
    Ice,
    Nature,
    Lightning,
    Mythic,
    Air,
    Mind,
    Cyber,
    Wild,
    Cosmic,
    #[default]
    None,
}

/// Broad category of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveClass {
    Physical,
    Special,
    SelfTarget,
    Other,
}

impl MoveClass {
    /// Does this class of move aim at an opposing slot?
    #[must_use]
    pub const fn targets_opponent(self) -> bool {
        matches!(self, MoveClass::Physical | MoveClass::Special)
    }
}
