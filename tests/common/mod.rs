//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use monclash::content::basic_moveset;
use monclash::core::{
    EngineConfig, ManualClock, MatchKey, PlayerId, PlayerKey, PlayerPair,
    PlayersToMove, ValidatorConfig,
};
use monclash::engine::{Engine, TurnReport};
use monclash::mons::{Combatant, MonId, MonStats};
use monclash::moves::{Move, MoveDecision};
use monclash::state::MatchSetup;
use monclash::{commitment, CommitError, CommitManager};

pub const ALICE: PlayerKey = PlayerKey(1);
pub const BOB: PlayerKey = PlayerKey(2);
pub const KEY: MatchKey = MatchKey(0xBA77);
pub const START: u64 = 1_000;

pub const SALTS: PlayerPair<u64> = PlayerPair::new(11, 22);

/// A combatant carrying the reference moveset.
pub fn mon(id: u32, stats: MonStats, power: i32) -> Combatant {
    let mut mon = Combatant::new(MonId(id), format!("mon-{id}"), stats);
    mon.moves = basic_moveset(power);
    mon
}

/// A combatant with an explicit move list.
pub fn mon_with_moves(id: u32, stats: MonStats, moves: Vec<Arc<dyn Move>>) -> Combatant {
    let mut mon = Combatant::new(MonId(id), format!("mon-{id}"), stats);
    mon.moves = moves;
    mon
}

/// `size` identical combatants.
pub fn team(size: usize, speed: u32, power: i32) -> Vec<Combatant> {
    (0..size)
        .map(|i| mon(i as u32, MonStats::default().with_speed(speed), power))
        .collect()
}

/// A setup with no move manager yet; `Harness::start` assigns its own.
pub fn setup(p0: Vec<Combatant>, p1: Vec<Combatant>) -> MatchSetup {
    MatchSetup::new(PlayerPair::new(ALICE, BOB), PlayerPair::new(p0, p1))
}

pub fn engine_config(mons_per_team: usize) -> EngineConfig {
    EngineConfig::default()
        .with_validator(ValidatorConfig::default().with_mons_per_team(mons_per_team))
}

pub fn key_of(player: PlayerId) -> PlayerKey {
    if player == PlayerId::P0 {
        ALICE
    } else {
        BOB
    }
}

/// An engine, its move manager and a manual clock driving one match.
pub struct Harness {
    pub engine: Engine,
    pub manager: CommitManager,
    pub clock: Arc<ManualClock>,
    pub key: MatchKey,
}

impl Harness {
    pub fn new(config: EngineConfig) -> Self {
        let clock = Arc::new(ManualClock::new(START));
        Self {
            engine: Engine::new(config, clock.clone()),
            manager: CommitManager::new(),
            clock,
            key: KEY,
        }
    }

    /// Start `KEY` with `setup`, driven by the harness manager.
    pub fn start(config: EngineConfig, setup: MatchSetup) -> Self {
        let mut harness = Self::new(config);
        let setup = harness.managed(setup);
        harness
            .engine
            .start_match(KEY, setup)
            .expect("match should start");
        harness
    }

    /// `setup` with the harness manager as its move manager.
    pub fn managed(&self, setup: MatchSetup) -> MatchSetup {
        setup.with_move_manager(self.manager.id())
    }

    pub fn turn_id(&self) -> u64 {
        self.engine.view(self.key).expect("live match").turn_id()
    }

    pub fn players_to_move(&self) -> PlayersToMove {
        self.engine.view(self.key).expect("live match").players_to_move()
    }

    /// Drive one turn through the full commit/reveal protocol and resolve it.
    pub fn try_play(
        &mut self,
        p0: &[MoveDecision],
        p1: &[MoveDecision],
    ) -> Result<TurnReport, CommitError> {
        let decisions = PlayerPair::new(p0, p1);
        let outcome = match self.players_to_move() {
            PlayersToMove::Only(player) => self.manager.reveal_decisions(
                &mut self.engine,
                self.key,
                key_of(player),
                decisions[player],
                SALTS[player],
                true,
            )?,
            PlayersToMove::Both => {
                let committer = PlayerId::for_turn_parity(self.turn_id());
                let revealer = committer.other();
                let hash = commitment(decisions[committer], SALTS[committer]);
                self.manager
                    .commit_move(&self.engine, self.key, key_of(committer), hash)?;
                self.manager.reveal_decisions(
                    &mut self.engine,
                    self.key,
                    key_of(revealer),
                    decisions[revealer],
                    SALTS[revealer],
                    true,
                )?;
                self.manager.reveal_decisions(
                    &mut self.engine,
                    self.key,
                    key_of(committer),
                    decisions[committer],
                    SALTS[committer],
                    true,
                )?
            }
        };
        Ok(outcome.report.expect("final reveal resolves the turn"))
    }

    pub fn play(&mut self, p0: &[MoveDecision], p1: &[MoveDecision]) -> TurnReport {
        self.try_play(p0, p1).expect("turn should resolve")
    }

    /// Singles turn.
    pub fn play1(&mut self, p0: MoveDecision, p1: MoveDecision) -> TurnReport {
        self.play(&[p0], &[p1])
    }

    /// Both sides field their first combatant(s).
    pub fn open(&mut self) -> TurnReport {
        let slots = self
            .engine
            .view(self.key)
            .expect("live match")
            .active_slot_count();
        let opening: Vec<MoveDecision> = (0..slots).map(MoveDecision::switch_to).collect();
        self.play(&opening, &opening)
    }
}
