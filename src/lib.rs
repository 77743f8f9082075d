//! # monclash
//!
//! A turn-based, two-player monster battle engine.
//!
//! ## Design Principles
//!
//! 1. **Content Is Pluggable**: Moves, abilities and effects are trait
//!    objects. The engine knows their interfaces, not their rules.
//!
//! 2. **One Write Gate**: Match state changes only through a
//!    `ResolutionContext`, which exists only while the engine is resolving.
//!
//! 3. **Cheap Matches**: Active slots, knockouts and switch flags are packed
//!    into small words; storage slots of finished matches are recycled.
//!
//! ## Architecture
//!
//! - **Commit/Reveal**: Decisions are hidden behind hashes until both
//!   required players are bound, then revealed and checked for legality.
//!
//! - **Persistent Data Structures**: Per-combatant state and effect lists
//!   use `im-rs`, so every turn resolves on an O(1) working copy that is
//!   discarded if anything fails.
//!
//! ## Modules
//!
//! - `core`: players, identifiers, configuration, RNG, clock, errors, events
//! - `state`: packed words, combatant deltas, slot allocator, match state
//! - `mons`: combatant definitions, catalog, team registry
//! - `moves`: move selectors and the move/ability traits
//! - `effects`: effect trait, storage and pipeline
//! - `validator`: legality and timeout rules
//! - `commit`: commit/reveal move manager
//! - `engine`: turn resolution
//! - `content`: reference moves, abilities and effects

pub mod core;
pub mod state;
pub mod mons;
pub mod moves;
pub mod effects;
pub mod validator;
pub mod commit;
pub mod engine;
pub mod content;

// Re-export commonly used types
pub use crate::core::{
    BattleEvent, Clock, CommitError, ElementType, EngineConfig, EngineError, GameMode,
    GameRng, ManagerId, ManualClock, MatchKey, MonStateIndex, MoveClass, PlayerId, PlayerKey,
    PlayerPair, PlayersToMove, RandomnessOracle, SaltOracle, SeededOracle, SystemClock,
    ValidatorConfig,
};

pub use crate::state::{BattleView, CombatantState, MatchSetup, MatchSummary, SlotAllocator};

pub use crate::mons::{Combatant, MonCatalog, MonId, MonRegistry, MonStats, TeamRegistry};

pub use crate::moves::{Ability, Move, MoveDecision, MoveInvocation, MoveSelector};

pub use crate::effects::{Effect, EffectOutcome, EffectStep, EffectTarget};

pub use crate::validator::{DefaultValidator, Validator};

pub use crate::commit::{commitment, singles_commitment, CommitManager, MoveHash};

pub use crate::engine::{Engine, EngineHook, ResolutionContext, TurnReport};
