//! Effect system.
//!
//! Effects are attachable strategies that run at named lifecycle steps:
//! - `Effect`: the strategy trait, one callback per step
//! - `EffectList` / `EffectTable`: per-target storage with tombstones
//! - the pipeline (`add_effect`, `edit_effect`, `remove_effect` on
//!   `ResolutionContext`) that executes them
//!
//! ## Targets
//!
//! Every effect is attached either globally or to one combatant. Local
//! effects of a combatant run for events concerning it; global effects run
//! for every event of their step.

mod effect;
mod list;
mod pipeline;

pub use effect::{
    Effect, EffectInvocation, EffectOutcome, EffectStep, EffectTarget, StateUpdate, StepPayload,
    SwitchInfo,
};
pub use list::{EffectInfo, EffectList, EffectSlot, EffectTable};
