//! Per-match configuration and mutable state.
//!
//! - `MatchSetup`: what a caller hands to `Engine::start_match`.
//! - `MatchConfig`: the immutable part of a live match (teams, strategies,
//!   participants, start time). Shared behind an `Arc`.
//! - `MatchState`: everything turn resolution mutates. Lives in a storage
//!   slot and is reused across matches; `scrub` returns it to the state a
//!   never-used slot has.
//! - `MatchSummary`: the serializable record kept for finished matches.

use std::sync::Arc;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::mon_state::CombatantState;
use super::packed::{ActiveSlots, KoBitmaps, SlotFlags, MAX_ACTIVE_SLOTS};
use crate::core::{
    GameMode, ManagerId, MatchKey, PlayerId, PlayerKey, PlayerPair, PlayersToMove,
    RandomnessOracle, SaltOracle, MAX_TEAM_SIZE,
};
use crate::effects::{Effect, EffectTable};
use crate::engine::EngineHook;
use crate::mons::Combatant;
use crate::moves::MoveDecision;
use crate::validator::Validator;

/// Everything needed to start a match.
#[derive(Clone)]
pub struct MatchSetup {
    pub players: PlayerPair<PlayerKey>,
    pub teams: PlayerPair<Vec<Combatant>>,
    pub mode: GameMode,
    /// `None` uses the engine's default validator.
    pub validator: Option<Arc<dyn Validator>>,
    pub oracle: Arc<dyn RandomnessOracle>,
    /// The only caller allowed to record decisions, resolve turns, force
    /// switches and declare timeouts for this match.
    pub move_manager: ManagerId,
    /// Global effects applied at match start.
    pub ruleset: Vec<(Arc<dyn Effect>, u64)>,
    pub hooks: Vec<Arc<dyn EngineHook>>,
}

impl MatchSetup {
    pub fn new(players: PlayerPair<PlayerKey>, teams: PlayerPair<Vec<Combatant>>) -> Self {
        Self {
            players,
            teams,
            mode: GameMode::Singles,
            validator: None,
            oracle: Arc::new(SaltOracle),
            move_manager: ManagerId::UNASSIGNED,
            ruleset: Vec::new(),
            hooks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn with_oracle(mut self, oracle: Arc<dyn RandomnessOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    #[must_use]
    pub fn with_move_manager(mut self, manager: ManagerId) -> Self {
        self.move_manager = manager;
        self
    }

    /// Add a global effect applied at match start (builder pattern).
    #[must_use]
    pub fn with_global_effect(mut self, effect: Arc<dyn Effect>, data: u64) -> Self {
        self.ruleset.push((effect, data));
        self
    }

    #[must_use]
    pub fn with_hook(mut self, hook: Arc<dyn EngineHook>) -> Self {
        self.hooks.push(hook);
        self
    }
}

impl std::fmt::Debug for MatchSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchSetup")
            .field("players", &self.players)
            .field("teams", &self.teams)
            .field("mode", &self.mode)
            .field("move_manager", &self.move_manager)
            .field("ruleset", &self.ruleset.len())
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}

/// Immutable configuration of a live match.
#[derive(Clone)]
pub struct MatchConfig {
    pub key: MatchKey,
    pub players: PlayerPair<PlayerKey>,
    pub teams: PlayerPair<Arc<[Combatant]>>,
    pub mode: GameMode,
    pub validator: Arc<dyn Validator>,
    pub oracle: Arc<dyn RandomnessOracle>,
    pub hooks: Arc<[Arc<dyn EngineHook>]>,
    pub move_manager: ManagerId,
    pub start_timestamp: u64,
}

impl MatchConfig {
    #[must_use]
    pub fn team(&self, player: PlayerId) -> &[Combatant] {
        &self.teams[player]
    }

    #[must_use]
    pub fn team_size(&self, player: PlayerId) -> usize {
        self.teams[player].len()
    }

    /// Side owned by `key`.
    #[must_use]
    pub fn player_of(&self, key: PlayerKey) -> Option<PlayerId> {
        self.players.position(&key)
    }
}

impl std::fmt::Debug for MatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchConfig")
            .field("key", &self.key)
            .field("players", &self.players)
            .field("mode", &self.mode)
            .field("move_manager", &self.move_manager)
            .field("start_timestamp", &self.start_timestamp)
            .finish_non_exhaustive()
    }
}

/// Mutable state of one match.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub(crate) turn_id: u64,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) players_to_move: PlayersToMove,
    pub(crate) prev_players_to_move: PlayersToMove,
    pub(crate) active: ActiveSlots,
    pub(crate) ko: KoBitmaps,
    pub(crate) flags: SlotFlags,
    pub(crate) decisions: PlayerPair<[MoveDecision; MAX_ACTIVE_SLOTS]>,
    pub(crate) salts: PlayerPair<u64>,
    pub(crate) last_execute_timestamp: u64,
    pub(crate) mon_states: PlayerPair<Vector<CombatantState>>,
    pub(crate) effects: EffectTable,
}

impl MatchState {
    /// State of a never-used storage slot.
    #[must_use]
    pub fn fresh() -> Self {
        Self {
            turn_id: 0,
            winner: None,
            players_to_move: PlayersToMove::Both,
            prev_players_to_move: PlayersToMove::Both,
            active: ActiveSlots::default(),
            ko: KoBitmaps::default(),
            flags: SlotFlags::default(),
            decisions: PlayerPair::splat([MoveDecision::EMPTY; MAX_ACTIVE_SLOTS]),
            salts: PlayerPair::splat(0),
            last_execute_timestamp: 0,
            mon_states: PlayerPair::from_fn(|_| {
                std::iter::repeat(CombatantState::CLEARED)
                    .take(MAX_TEAM_SIZE)
                    .collect()
            }),
            effects: EffectTable::default(),
        }
    }

    /// Reset residual state left by a previous match.
    pub fn scrub(&mut self) {
        *self = Self::fresh();
    }

    /// Initialize packed words for a new match.
    pub(crate) fn begin(&mut self, mode: GameMode, now: u64) {
        self.active = ActiveSlots::initial(mode);
        self.flags = SlotFlags::new(mode);
        self.last_execute_timestamp = now;
    }

    #[must_use]
    pub fn turn_id(&self) -> u64 {
        self.turn_id
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Combatant state, `CLEARED` for positions beyond the table.
    #[must_use]
    pub fn mon_state(&self, player: PlayerId, mon_index: usize) -> CombatantState {
        self.mon_states[player]
            .get(mon_index)
            .copied()
            .unwrap_or(CombatantState::CLEARED)
    }

    pub(crate) fn mon_state_mut(
        &mut self,
        player: PlayerId,
        mon_index: usize,
    ) -> Option<&mut CombatantState> {
        self.mon_states[player].get_mut(mon_index)
    }

    /// Do all combatant states read as untouched and no effects remain?
    #[must_use]
    pub fn is_scrubbed(&self) -> bool {
        self.mon_states
            .iter()
            .all(|(_, states)| states.iter().all(CombatantState::is_cleared))
            && self.effects.is_clear()
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Record kept for a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub key: MatchKey,
    pub players: PlayerPair<PlayerKey>,
    pub mode: GameMode,
    pub winner: PlayerId,
    /// Turn during which the match ended.
    pub turn_id: u64,
    pub start_timestamp: u64,
    pub end_timestamp: u64,
    pub ko_bitmaps: PlayerPair<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MonStateIndex;

    #[test]
    fn test_scrub_matches_fresh() {
        let mut state = MatchState::fresh();
        state.begin(GameMode::Doubles, 50);
        state.turn_id = 7;
        state.winner = Some(PlayerId::P1);
        state.ko.mark(PlayerId::P0, 1, true);
        if let Some(mon) = state.mon_state_mut(PlayerId::P0, 1) {
            mon.apply(MonStateIndex::Hp, -40);
        }
        assert!(!state.is_scrubbed());

        state.scrub();
        assert!(state.is_scrubbed());
        assert_eq!(state.turn_id(), 0);
        assert_eq!(state.winner(), None);
        assert_eq!(state.ko.raw(), 0);
        assert_eq!(state.active.raw(), 0);
        assert_eq!(state.flags.raw(), 0);
        assert_eq!(state.mon_state(PlayerId::P0, 1), CombatantState::CLEARED);
    }

    #[test]
    fn test_out_of_range_reads_cleared() {
        let state = MatchState::fresh();
        assert_eq!(state.mon_state(PlayerId::P1, MAX_TEAM_SIZE + 3), CombatantState::CLEARED);
    }

    #[test]
    fn test_summary_serde() {
        let summary = MatchSummary {
            key: MatchKey(9),
            players: PlayerPair::new(PlayerKey(1), PlayerKey(2)),
            mode: GameMode::Singles,
            winner: PlayerId::P0,
            turn_id: 4,
            start_timestamp: 10,
            end_timestamp: 90,
            ko_bitmaps: PlayerPair::new(0b0001, 0b1111),
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: MatchSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
