//! Effect strategy trait and the types flowing through it.
//!
//! An effect is an attached strategy with one `u64` of private data. It
//! declares which lifecycle steps it cares about; at each step the engine
//! calls the matching callback, which returns the (possibly updated) data
//! and whether the effect should be removed.
//!
//! ## Steps
//!
//! | step               | fired when                                  |
//! |--------------------|---------------------------------------------|
//! | `OnApply`          | once, when the effect is added              |
//! | `RoundStart`       | start of a turn                             |
//! | `RoundEnd`         | end of a turn                               |
//! | `OnRemove`         | once, when the effect is removed            |
//! | `OnMonSwitchIn`    | a combatant enters an active slot           |
//! | `OnMonSwitchOut`   | a combatant leaves an active slot           |
//! | `AfterDamage`      | the target combatant took damage            |
//! | `AfterMove`        | a side finished its decision                |
//! | `OnUpdateMonState` | a combatant's state was updated             |

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, MonStateIndex, PlayerId};
use crate::engine::ResolutionContext;
use crate::state::BattleView;

/// Lifecycle steps at which effects run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectStep {
    OnApply,
    RoundStart,
    RoundEnd,
    OnRemove,
    OnMonSwitchIn,
    OnMonSwitchOut,
    AfterDamage,
    AfterMove,
    OnUpdateMonState,
}

/// Where an effect is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    /// Match-wide.
    Global,
    /// Attached to one combatant.
    Mon { player: PlayerId, mon_index: usize },
}

impl EffectTarget {
    #[must_use]
    pub const fn mon(player: PlayerId, mon_index: usize) -> Self {
        EffectTarget::Mon { player, mon_index }
    }
}

impl std::fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectTarget::Global => write!(f, "global"),
            EffectTarget::Mon { player, mon_index } => write!(f, "{player} mon {mon_index}"),
        }
    }
}

/// Result of an effect callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectOutcome {
    pub data: u64,
    pub remove: bool,
}

impl EffectOutcome {
    /// Keep the effect with `data`.
    #[must_use]
    pub const fn keep(data: u64) -> Self {
        Self { data, remove: false }
    }

    /// Remove the effect after this callback.
    #[must_use]
    pub const fn remove(data: u64) -> Self {
        Self { data, remove: true }
    }
}

/// Where the running effect lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectInvocation {
    pub target: EffectTarget,
    /// Position of the effect in its target's list.
    pub index: usize,
    pub rng: u64,
}

/// A combatant switch, passed to switch steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchInfo {
    pub player: PlayerId,
    pub slot: usize,
    pub mon_index: usize,
}

/// A state update, passed to `OnUpdateMonState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateUpdate {
    pub player: PlayerId,
    pub mon_index: usize,
    pub index: MonStateIndex,
    pub value: i32,
}

/// Step-specific payload handed to the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPayload {
    None,
    Switch(SwitchInfo),
    Damage { player: PlayerId, mon_index: usize, amount: i32 },
    Move { player: PlayerId, slot: usize },
    Update(StateUpdate),
}

/// An attachable effect.
///
/// Every callback defaults to keeping the effect unchanged, so effects only
/// implement the steps they declare in `should_run_at_step`.
pub trait Effect: Send + Sync {
    fn name(&self) -> &str;

    /// Admission check, run before the effect is added.
    fn should_apply(&self, _view: &BattleView<'_>, _target: EffectTarget, _data: u64) -> bool {
        true
    }

    fn should_run_at_step(&self, step: EffectStep) -> bool;

    fn on_apply(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    fn on_round_start(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    fn on_round_end(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    /// Cleanup before removal. The returned `remove` flag is ignored.
    fn on_remove(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    fn on_mon_switch_in(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
        _switch: SwitchInfo,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    fn on_mon_switch_out(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
        _switch: SwitchInfo,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    fn after_damage(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
        _amount: i32,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    /// `actor` is the side whose decision just ran.
    fn after_move(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
        _actor: PlayerId,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }

    fn on_update_mon_state(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
        _update: StateUpdate,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data))
    }
}

/// Route a step to the matching callback.
pub(crate) fn dispatch(
    effect: &dyn Effect,
    ctx: &mut ResolutionContext<'_>,
    inv: &EffectInvocation,
    data: u64,
    step: EffectStep,
    payload: StepPayload,
) -> Result<EffectOutcome, EngineError> {
    match (step, payload) {
        (EffectStep::OnApply, _) => effect.on_apply(ctx, inv, data),
        (EffectStep::RoundStart, _) => effect.on_round_start(ctx, inv, data),
        (EffectStep::RoundEnd, _) => effect.on_round_end(ctx, inv, data),
        (EffectStep::OnRemove, _) => effect.on_remove(ctx, inv, data),
        (EffectStep::OnMonSwitchIn, StepPayload::Switch(switch)) => {
            effect.on_mon_switch_in(ctx, inv, data, switch)
        }
        (EffectStep::OnMonSwitchOut, StepPayload::Switch(switch)) => {
            effect.on_mon_switch_out(ctx, inv, data, switch)
        }
        (EffectStep::AfterDamage, StepPayload::Damage { amount, .. }) => {
            effect.after_damage(ctx, inv, data, amount)
        }
        (EffectStep::AfterMove, StepPayload::Move { player, .. }) => {
            effect.after_move(ctx, inv, data, player)
        }
        (EffectStep::OnUpdateMonState, StepPayload::Update(update)) => {
            effect.on_update_mon_state(ctx, inv, data, update)
        }
        _ => Err(EngineError::Strategy(format!(
            "step {step:?} dispatched without its payload"
        ))),
    }
}
