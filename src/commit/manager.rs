//! Commit/reveal move manager.
//!
//! The manager owns the commit records of every match it drives and is the
//! only caller the engine accepts decisions and turn resolutions from.
//!
//! ## Protocol per turn
//!
//! Two-player turn (`PlayersToMove::Both`):
//! 1. the committer (turn parity player) commits a hash;
//! 2. the revealer reveals in the clear (no hash of its own);
//! 3. the committer reveals the preimage of its hash.
//!
//! Single-player turn: the acting player reveals in the clear; the other
//! player may not act.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, info};

use super::hash::{commitment, MoveHash};
use super::record::CommitRecord;
use crate::core::{CommitError, EngineError, ManagerId, MatchKey, PlayerId, PlayerKey, PlayerPair, PlayersToMove};
use crate::engine::{Engine, TurnReport};
use crate::moves::MoveDecision;

/// Result of a successful reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealOutcome {
    pub player: PlayerId,
    /// Set when the reveal completed the turn and it was resolved.
    pub report: Option<TurnReport>,
}

#[derive(Debug)]
pub struct CommitManager {
    id: ManagerId,
    records: FxHashMap<MatchKey, PlayerPair<CommitRecord>>,
}

impl Default for CommitManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitManager {
    /// A manager with a freshly issued id. Hand `id()` to
    /// `MatchSetup::with_move_manager` for every match it should drive.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ManagerId::issue(),
            records: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ManagerId {
        self.id
    }

    /// Commit records of a match (defaults before any action).
    #[must_use]
    pub fn records(&self, key: MatchKey) -> PlayerPair<CommitRecord> {
        self.records.get(&key).copied().unwrap_or_default()
    }

    fn participant(engine: &Engine, key: MatchKey, caller: PlayerKey) -> Result<PlayerId, CommitError> {
        engine
            .view(key)?
            .player_of(caller)
            .ok_or(CommitError::Engine(EngineError::NotAParticipant(caller)))
    }

    /// Store `caller`'s commitment for the current turn.
    pub fn commit_move(
        &mut self,
        engine: &Engine,
        key: MatchKey,
        caller: PlayerKey,
        move_hash: MoveHash,
    ) -> Result<(), CommitError> {
        let player = Self::participant(engine, key, caller)?;
        let view = engine.view(key)?;
        let turn_id = view.turn_id();

        if !view.players_to_move().is_both() || player != PlayerId::for_turn_parity(turn_id) {
            return Err(CommitError::PlayerNotAllowed);
        }
        let record = &mut self.records.entry(key).or_default()[player];
        if record.has_committed(turn_id) {
            return Err(CommitError::AlreadyCommitted);
        }
        record.record_commit(turn_id, move_hash, engine.now());
        debug!(%key, %player, turn_id, hash = %move_hash, "move committed");
        Ok(())
    }

    /// Reveal a singles decision.
    pub fn reveal_move(
        &mut self,
        engine: &mut Engine,
        key: MatchKey,
        caller: PlayerKey,
        decision: MoveDecision,
        salt: u64,
        auto_execute: bool,
    ) -> Result<RevealOutcome, CommitError> {
        self.reveal_decisions(engine, key, caller, &[decision], salt, auto_execute)
    }

    /// Reveal the decisions of every active slot of `caller`.
    ///
    /// With `auto_execute`, resolves the turn as soon as every required
    /// decision is present.
    pub fn reveal_decisions(
        &mut self,
        engine: &mut Engine,
        key: MatchKey,
        caller: PlayerKey,
        decisions: &[MoveDecision],
        salt: u64,
        auto_execute: bool,
    ) -> Result<RevealOutcome, CommitError> {
        let player = Self::participant(engine, key, caller)?;
        let records = self.records(key);
        let now = engine.now();

        let (turn_id, completes_turn) = {
            let view = engine.view(key)?;
            let turn_id = view.turn_id();
            let slots = view.active_slot_count();
            if decisions.len() != slots {
                return Err(CommitError::WrongDecisionCount {
                    expected: slots,
                    got: decisions.len(),
                });
            }
            if let Some(bad) = decisions.iter().find(|d| d.selector.raw().is_none()) {
                debug!(%key, %player, selector = %bad.selector, "unencodable selector");
                return Err(CommitError::InvalidMove);
            }

            let own = &records[player];
            let other = &records[player.other()];
            if own.has_revealed(turn_id) {
                return Err(CommitError::AlreadyRevealed);
            }

            let completes_turn = match view.players_to_move() {
                PlayersToMove::Only(acting) if acting != player => {
                    return Err(CommitError::PlayerNotAllowed);
                }
                PlayersToMove::Only(_) => true,
                PlayersToMove::Both if player != PlayerId::for_turn_parity(turn_id) => {
                    if !other.has_committed(turn_id) {
                        return Err(CommitError::RevealBeforeOtherCommit);
                    }
                    false
                }
                PlayersToMove::Both => {
                    let expected = own.move_hash.filter(|_| own.has_committed(turn_id));
                    if expected != Some(commitment(decisions, salt)) {
                        return Err(CommitError::WrongPreimage);
                    }
                    if !other.has_revealed(turn_id) {
                        return Err(CommitError::RevealBeforeOtherReveal);
                    }
                    true
                }
            };

            let targets: SmallVec<[Option<usize>; 2]> =
                decisions.iter().map(MoveDecision::switch_target).collect();
            if let [Some(a), Some(b)] = targets.as_slice() {
                if a == b {
                    return Err(CommitError::DuplicateSwitchTarget(*a));
                }
            }

            let validator = &view.config().validator;
            for (slot, decision) in decisions.iter().enumerate() {
                let sibling_claim = targets
                    .iter()
                    .enumerate()
                    .find(|&(other_slot, _)| other_slot != slot)
                    .and_then(|(_, target)| *target);
                if !validator.validate_player_move(&view, player, slot, decision, sibling_claim) {
                    debug!(%key, %player, slot, selector = %decision.selector, "illegal reveal");
                    return Err(CommitError::InvalidMove);
                }
            }
            (turn_id, completes_turn)
        };

        engine.record_decisions(self.id, key, player, decisions, salt)?;
        self.records.entry(key).or_default()[player].record_reveal(turn_id, now);
        debug!(%key, %player, turn_id, "move revealed");

        let report = if auto_execute && completes_turn {
            Some(engine.resolve_turn(self.id, key)?)
        } else {
            None
        };
        if report.as_ref().is_some_and(|r| r.winner.is_some()) {
            self.records.remove(&key);
        }
        Ok(RevealOutcome { player, report })
    }

    /// Resolve the current turn once every required decision is in.
    pub fn execute(&mut self, engine: &mut Engine, key: MatchKey) -> Result<TurnReport, CommitError> {
        let report = engine.resolve_turn(self.id, key)?;
        if report.winner.is_some() {
            self.records.remove(&key);
        }
        Ok(report)
    }

    /// End the match if `presumed_afk` missed their deadline.
    ///
    /// Returns the winner when the timeout was upheld.
    pub fn claim_timeout(
        &mut self,
        engine: &mut Engine,
        key: MatchKey,
        presumed_afk: PlayerId,
    ) -> Result<Option<PlayerId>, CommitError> {
        let records = self.records(key);
        let now = engine.now();
        let loser = {
            let view = engine.view(key)?;
            view.config()
                .validator
                .validate_timeout(&view, &records, presumed_afk, now)
        };
        let Some(loser) = loser else {
            return Ok(None);
        };
        let summary = engine.declare_timeout(self.id, key, loser)?;
        self.records.remove(&key);
        info!(%key, %loser, winner = %summary.winner, "timeout upheld");
        Ok(Some(summary.winner))
    }
}
