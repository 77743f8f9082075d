//! Core engine types: players, identifiers, configuration, randomness,
//! time, errors and the battle event log.
//!
//! Nothing here knows about turn resolution; the other modules build on
//! these primitives.

pub mod player;
pub mod types;
pub mod config;
pub mod rng;
pub mod clock;
pub mod error;
pub mod event;

pub use player::{ManagerId, PlayerId, PlayerKey, PlayerPair};
pub use types::{ElementType, GameMode, MatchKey, MonStateIndex, MoveClass, PlayersToMove, StorageSlot};
pub use config::{EngineConfig, ValidatorConfig, MAX_MOVES_PER_MON, MAX_TEAM_SIZE};
pub use rng::{FixedOracle, GameRng, RandomnessOracle, SaltOracle, SeededOracle, TurnSeeds};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CommitError, EngineError};
pub use event::{BattleEvent, SkipReason};
