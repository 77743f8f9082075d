//! The engine: match registry, lifecycle and the turn entry point.
//!
//! Every mutating entry point works on a clone of the match state and
//! stores it back only when the whole call succeeded, so a failing strategy
//! leaves the match exactly as it was. Cloning is cheap: per-combatant
//! state and effect lists live in persistent vectors.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use super::context::ResolutionContext;
use super::hooks::HookPoint;
use crate::core::{
    BattleEvent, Clock, EngineConfig, EngineError, GameMode, ManagerId, MatchKey, PlayerId,
    PlayerPair, PlayersToMove, StorageSlot, TurnSeeds,
};
use crate::effects::{Effect, EffectTarget};
use crate::mons::MonCatalog;
use crate::moves::MoveDecision;
use crate::state::{BattleView, MatchConfig, MatchSetup, MatchState, MatchSummary, SlotAllocator};
use crate::validator::{DefaultValidator, Validator};

/// Outcome of one call to `Engine::resolve_turn`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub key: MatchKey,
    /// The turn that was resolved.
    pub turn_id: u64,
    pub winner: Option<PlayerId>,
    /// Who decides on the next turn.
    pub players_to_move: PlayersToMove,
    pub events: Vec<BattleEvent>,
}

pub struct Engine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    catalog: Option<Arc<dyn MonCatalog>>,
    allocator: SlotAllocator,
    slots: Vec<MatchState>,
    matches: FxHashMap<MatchKey, Arc<MatchConfig>>,
    archive: FxHashMap<MatchKey, MatchSummary>,
    /// Finished matches whose slot is released once time has moved past
    /// their start.
    pending_release: Vec<MatchKey>,
}

impl Engine {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            catalog: None,
            allocator: SlotAllocator::new(),
            slots: Vec::new(),
            matches: FxHashMap::default(),
            archive: FxHashMap::default(),
            pending_release: Vec::new(),
        }
    }

    /// Validate rosters against a catalog at match start (builder pattern).
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn MonCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    #[must_use]
    pub fn allocator(&self) -> &SlotAllocator {
        &self.allocator
    }

    #[must_use]
    pub fn live_matches(&self) -> usize {
        self.matches.len()
    }

    fn live(&self, key: MatchKey) -> Result<(Arc<MatchConfig>, usize), EngineError> {
        if self.archive.contains_key(&key) {
            return Err(EngineError::GameAlreadyOver(key));
        }
        let config = self
            .matches
            .get(&key)
            .cloned()
            .ok_or(EngineError::UnknownMatch(key))?;
        let slot = self
            .allocator
            .lookup(key)
            .ok_or(EngineError::UnknownMatch(key))?;
        Ok((config, slot.index()))
    }

    fn authorize(config: &MatchConfig, caller: ManagerId) -> Result<(), EngineError> {
        if caller == config.move_manager {
            Ok(())
        } else {
            Err(EngineError::UnauthorizedCaller(config.key))
        }
    }

    fn release_finished(&mut self, now: u64) {
        let archive = &self.archive;
        let allocator = &mut self.allocator;
        self.pending_release.retain(|key| {
            let started = archive.get(key).map_or(0, |s| s.start_timestamp);
            if now > started {
                allocator.end_match(*key);
                false
            } else {
                true
            }
        });
    }

    /// Register and initialize a new match.
    pub fn start_match(&mut self, key: MatchKey, setup: MatchSetup) -> Result<StorageSlot, EngineError> {
        let now = self.clock.now();
        self.release_finished(now);
        if self.archive.contains_key(&key) || self.matches.contains_key(&key) {
            return Err(EngineError::MatchAlreadyExists(key));
        }

        let validator: Arc<dyn Validator> = match &setup.validator {
            Some(validator) => Arc::clone(validator),
            None => Arc::new(DefaultValidator::from_engine(&self.config)),
        };
        validator.validate_game_start(&setup, self.catalog.as_deref())?;

        let MatchSetup {
            players,
            teams,
            mode,
            oracle,
            move_manager,
            ruleset,
            hooks,
            ..
        } = setup;
        let config = Arc::new(MatchConfig {
            key,
            players,
            teams: teams.map(|_, team| Arc::from(team.as_slice())),
            mode,
            validator,
            oracle,
            hooks: Arc::from(hooks),
            move_manager,
            start_timestamp: now,
        });

        let (slot, recycled) = self.allocator.begin_match(key);
        let index = slot.index();
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, MatchState::fresh);
        }
        let mut state = std::mem::take(&mut self.slots[index]);
        if recycled {
            debug!(%key, slot = index, "scrubbing recycled slot");
            state.scrub();
        }
        state.begin(mode, now);

        let started = {
            let mut ctx =
                ResolutionContext::new(&config, &mut state, 0, now, self.config.trace_effects);
            open_match(&mut ctx, ruleset)
        };
        if let Err(err) = started {
            self.slots[index] = state;
            self.allocator.end_match(key);
            return Err(err);
        }

        let finished = state.winner.is_some();
        self.slots[index] = state;
        self.matches.insert(key, Arc::clone(&config));
        info!(%key, slot = index, ?mode, recycled, "match started");
        if finished {
            self.archive_match(&config, index, now);
        }
        Ok(slot)
    }

    /// Read-only view of a live match.
    pub fn view(&self, key: MatchKey) -> Result<BattleView<'_>, EngineError> {
        if self.archive.contains_key(&key) {
            return Err(EngineError::GameAlreadyOver(key));
        }
        let config = self.matches.get(&key).ok_or(EngineError::UnknownMatch(key))?;
        let slot = self
            .allocator
            .lookup(key)
            .ok_or(EngineError::UnknownMatch(key))?;
        let state = self
            .slots
            .get(slot.index())
            .ok_or(EngineError::UnknownMatch(key))?;
        Ok(BattleView::new(config, state))
    }

    /// Winner of a live (`None` while undecided) or archived match.
    pub fn winner(&self, key: MatchKey) -> Result<Option<PlayerId>, EngineError> {
        if let Some(summary) = self.archive.get(&key) {
            return Ok(Some(summary.winner));
        }
        self.view(key).map(|view| view.winner())
    }

    /// Record of a finished match.
    #[must_use]
    pub fn summary(&self, key: MatchKey) -> Option<&MatchSummary> {
        self.archive.get(&key)
    }

    /// Store the decisions of every active slot of `player` for the current
    /// turn, with the salt they were committed under.
    pub fn record_decisions(
        &mut self,
        caller: ManagerId,
        key: MatchKey,
        player: PlayerId,
        decisions: &[MoveDecision],
        salt: u64,
    ) -> Result<(), EngineError> {
        let (config, index) = self.live(key)?;
        Self::authorize(&config, caller)?;
        let slots = config.mode.active_slots();
        if decisions.len() != slots {
            return Err(EngineError::InvalidSlot {
                slot: decisions.len(),
            });
        }

        let state = &mut self.slots[index];
        for (slot, decision) in decisions.iter().enumerate() {
            state.decisions[player][slot] = MoveDecision {
                submitted: true,
                ..*decision
            };
        }
        state.salts[player] = salt;
        debug!(%key, %player, turn_id = state.turn_id, "decisions recorded");
        Ok(())
    }

    /// Resolve the current turn of `key`.
    pub fn resolve_turn(&mut self, caller: ManagerId, key: MatchKey) -> Result<TurnReport, EngineError> {
        let (config, index) = self.live(key)?;
        Self::authorize(&config, caller)?;
        let now = self.clock.now();

        let mut state = self.slots[index].clone();
        let turn_id = state.turn_id;
        let slots = config.mode.active_slots();
        for player in PlayerId::both() {
            if !state.players_to_move.includes(player) {
                continue;
            }
            if state.decisions[player][..slots].iter().any(|d| !d.submitted) {
                return Err(EngineError::NoDecisionSubmitted { turn_id });
            }
        }

        let seeds = TurnSeeds {
            match_key: key,
            turn_id,
            salts: state.salts,
        };
        let rng = config.oracle.turn_randomness(&seeds);

        let events = {
            let mut ctx =
                ResolutionContext::new(&config, &mut state, rng, now, self.config.trace_effects);
            ctx.emit(BattleEvent::TurnStarted { turn_id });
            ctx.run_hooks(HookPoint::RoundStart)?;
            match config.mode {
                GameMode::Singles => ctx.resolve_singles()?,
                GameMode::Doubles => ctx.resolve_doubles()?,
            }
            if ctx.state.winner.is_none() {
                ctx.run_hooks(HookPoint::RoundEnd)?;
                ctx.check_game_over(PlayerId::P0);
            }
            match ctx.state.winner {
                Some(winner) => ctx.run_hooks(HookPoint::BattleEnd(winner))?,
                None => ctx.finish_turn(),
            }
            ctx.into_events()
        };

        let winner = state.winner;
        let players_to_move = state.players_to_move;
        self.slots[index] = state;
        debug!(%key, turn_id, events = events.len(), "turn resolved");
        if winner.is_some() {
            self.archive_match(&config, index, now);
        }

        Ok(TurnReport {
            key,
            turn_id,
            winner,
            players_to_move,
            events,
        })
    }

    /// Out-of-turn switch on behalf of the move manager.
    ///
    /// Returns the events of the switch; an illegal switch changes nothing
    /// and returns an empty log.
    pub fn force_switch(
        &mut self,
        caller: ManagerId,
        key: MatchKey,
        player: PlayerId,
        slot: usize,
        mon_index: usize,
    ) -> Result<Vec<BattleEvent>, EngineError> {
        let (config, index) = self.live(key)?;
        Self::authorize(&config, caller)?;
        let now = self.clock.now();

        let mut state = self.slots[index].clone();
        let rng = config.oracle.turn_randomness(&TurnSeeds {
            match_key: key,
            turn_id: state.turn_id,
            salts: PlayerPair::splat(0),
        });
        let events = {
            let mut ctx =
                ResolutionContext::new(&config, &mut state, rng, now, self.config.trace_effects);
            if ctx.switch_active_mon(player, slot, mon_index)? && ctx.check_game_over(player) {
                if let Some(winner) = ctx.state.winner {
                    ctx.run_hooks(HookPoint::BattleEnd(winner))?;
                }
            }
            ctx.into_events()
        };

        let finished = state.winner.is_some();
        self.slots[index] = state;
        if finished {
            self.archive_match(&config, index, now);
        }
        Ok(events)
    }

    /// End a match because `loser` ran out of time.
    pub fn declare_timeout(
        &mut self,
        caller: ManagerId,
        key: MatchKey,
        loser: PlayerId,
    ) -> Result<MatchSummary, EngineError> {
        let (config, index) = self.live(key)?;
        Self::authorize(&config, caller)?;
        let now = self.clock.now();

        let mut state = self.slots[index].clone();
        let winner = loser.other();
        {
            let mut ctx =
                ResolutionContext::new(&config, &mut state, 0, now, self.config.trace_effects);
            ctx.state.winner = Some(winner);
            ctx.emit(BattleEvent::GameOver { winner });
            ctx.run_hooks(HookPoint::BattleEnd(winner))?;
        }
        self.slots[index] = state;
        info!(%key, %loser, "timeout");
        Ok(self.archive_match(&config, index, now))
    }

    fn archive_match(&mut self, config: &MatchConfig, index: usize, now: u64) -> MatchSummary {
        let state = &self.slots[index];
        let summary = MatchSummary {
            key: config.key,
            players: config.players,
            mode: config.mode,
            winner: state.winner.unwrap_or(PlayerId::P0),
            turn_id: state.turn_id,
            start_timestamp: config.start_timestamp,
            end_timestamp: now,
            ko_bitmaps: PlayerPair::from_fn(|player| state.ko.get(player)),
        };
        info!(
            key = %config.key,
            winner = %summary.winner,
            turns = summary.turn_id,
            "match finished"
        );

        self.matches.remove(&config.key);
        self.archive.insert(config.key, summary.clone());
        if now > config.start_timestamp {
            self.allocator.end_match(config.key);
        } else {
            self.pending_release.push(config.key);
        }
        summary
    }
}

fn open_match(
    ctx: &mut ResolutionContext<'_>,
    ruleset: Vec<(Arc<dyn Effect>, u64)>,
) -> Result<(), EngineError> {
    ctx.emit(BattleEvent::MatchStarted);
    for (effect, data) in ruleset {
        ctx.add_effect(EffectTarget::Global, effect, data)?;
    }
    ctx.run_hooks(HookPoint::BattleStart)?;
    if ctx.check_game_over(PlayerId::P0) {
        if let Some(winner) = ctx.state.winner {
            ctx.run_hooks(HookPoint::BattleEnd(winner))?;
        }
    }
    Ok(())
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("live", &self.matches.len())
            .field("archived", &self.archive.len())
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}
