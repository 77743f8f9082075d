//! Error types for the engine and the commit/reveal layer.

use thiserror::Error;

use super::player::{PlayerId, PlayerKey};
use super::types::MatchKey;

/// Failures raised by the engine, the validator and strategy callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown match {0}")]
    UnknownMatch(MatchKey),

    #[error("match {0} is already registered")]
    MatchAlreadyExists(MatchKey),

    #[error("match {0} already has a winner")]
    GameAlreadyOver(MatchKey),

    #[error("no decision was submitted for turn {turn_id}")]
    NoDecisionSubmitted { turn_id: u64 },

    #[error("caller is not the move manager of match {0}")]
    UnauthorizedCaller(MatchKey),

    #[error("{0} is not a participant of the match")]
    NotAParticipant(PlayerKey),

    #[error("invalid team for {player}: {reason}")]
    InvalidTeam { player: PlayerId, reason: String },

    #[error("invalid mon index {index} for {player}")]
    InvalidMonIndex { player: PlayerId, index: usize },

    #[error("invalid move index {index}")]
    InvalidMoveIndex { index: usize },

    #[error("invalid active slot {slot}")]
    InvalidSlot { slot: usize },

    #[error("no effect at index {index}")]
    InvalidEffectIndex { index: usize },

    #[error("strategy failed: {0}")]
    Strategy(String),
}

/// Commit/reveal protocol failures. Each ordering violation is distinct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("player is not allowed to act at this point of the turn")]
    PlayerNotAllowed,

    #[error("a commitment for this turn already exists")]
    AlreadyCommitted,

    #[error("a decision for this turn was already revealed")]
    AlreadyRevealed,

    #[error("cannot reveal before the other player has committed")]
    RevealBeforeOtherCommit,

    #[error("cannot reveal before the other player has revealed")]
    RevealBeforeOtherReveal,

    #[error("revealed preimage does not match the stored commitment")]
    WrongPreimage,

    #[error("revealed decision is not legal in the current state")]
    InvalidMove,

    #[error("both slots switch into roster position {0}")]
    DuplicateSwitchTarget(usize),

    #[error("expected {expected} decisions, got {got}")]
    WrongDecisionCount { expected: usize, got: usize },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
