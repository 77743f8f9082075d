//! Effect pipeline: add, edit, remove and run effects through the write
//! gate.
//!
//! ## Iteration
//!
//! A pass over a target's list re-reads its length on every step, so
//! effects appended by a callback run in the same pass. Tombstoned entries
//! are skipped. A callback asking for removal goes through the same path
//! as an explicit `remove_effect`, including `on_remove`.

use std::sync::Arc;

use tracing::trace;

use super::effect::{
    dispatch, Effect, EffectInvocation, EffectStep, EffectTarget, StepPayload,
};
use crate::core::{BattleEvent, EngineError, PlayerId};
use crate::engine::ResolutionContext;

impl ResolutionContext<'_> {
    fn check_target(&self, target: EffectTarget) -> Result<(), EngineError> {
        match target {
            EffectTarget::Global => Ok(()),
            EffectTarget::Mon { player, mon_index } => self.check_mon(player, mon_index),
        }
    }

    fn effect_count(&self, target: EffectTarget) -> usize {
        self.state.effects.list(target).map_or(0, |list| list.len())
    }

    fn live_effect(&self, target: EffectTarget, index: usize) -> Option<(Arc<dyn Effect>, u64)> {
        self.state
            .effects
            .list(target)
            .and_then(|list| list.live(index))
            .map(|slot| (Arc::clone(&slot.effect), slot.data))
    }

    /// Attach an effect.
    ///
    /// Returns the index it was stored at, or `None` when the admission
    /// check refused it or its `on_apply` asked for removal. `on_apply`
    /// runs before insertion and sees the index the effect will take.
    pub fn add_effect(
        &mut self,
        target: EffectTarget,
        effect: Arc<dyn Effect>,
        data: u64,
    ) -> Result<Option<usize>, EngineError> {
        self.check_target(target)?;
        if !effect.should_apply(&self.view(), target, data) {
            trace!(%target, effect = effect.name(), "effect refused admission");
            return Ok(None);
        }

        let mut data = data;
        if effect.should_run_at_step(EffectStep::OnApply) {
            let inv = EffectInvocation {
                target,
                index: self.effect_count(target),
                rng: self.rng,
            };
            let outcome = effect.on_apply(self, &inv, data)?;
            if outcome.remove {
                trace!(%target, effect = effect.name(), "effect cancelled on apply");
                return Ok(None);
            }
            data = outcome.data;
        }

        let name = effect.name().to_string();
        let index = self
            .state
            .effects
            .list_mut(target)
            .map(|list| list.push(effect, data))
            .ok_or_else(|| EngineError::Strategy(format!("no effect list for {target}")))?;
        if self.trace_effects {
            trace!(%target, index, effect = %name, data, "effect added");
        }
        self.emit(BattleEvent::EffectAdded {
            target,
            index,
            name,
        });
        Ok(Some(index))
    }

    /// Overwrite the data of a live effect.
    pub fn edit_effect(
        &mut self,
        target: EffectTarget,
        index: usize,
        data: u64,
    ) -> Result<(), EngineError> {
        self.check_target(target)?;
        let slot = self
            .state
            .effects
            .list_mut(target)
            .and_then(|list| list.get_mut(index))
            .filter(|slot| !slot.removed)
            .ok_or(EngineError::InvalidEffectIndex { index })?;
        slot.data = data;
        Ok(())
    }

    /// Remove a live effect, running its `on_remove` first if it asked for
    /// that step.
    pub fn remove_effect(&mut self, target: EffectTarget, index: usize) -> Result<(), EngineError> {
        self.check_target(target)?;
        let (effect, data) = self
            .live_effect(target, index)
            .ok_or(EngineError::InvalidEffectIndex { index })?;

        if effect.should_run_at_step(EffectStep::OnRemove) {
            let inv = EffectInvocation {
                target,
                index,
                rng: self.rng,
            };
            effect.on_remove(self, &inv, data)?;
        }

        if let Some(slot) = self
            .state
            .effects
            .list_mut(target)
            .and_then(|list| list.get_mut(index))
        {
            if slot.removed {
                return Ok(());
            }
            slot.removed = true;
        }
        if self.trace_effects {
            trace!(%target, index, effect = effect.name(), "effect removed");
        }
        self.emit(BattleEvent::EffectRemoved { target, index });
        Ok(())
    }

    /// Run every live effect of `target` that opted into `step`.
    pub(crate) fn run_effects(
        &mut self,
        target: EffectTarget,
        step: EffectStep,
        payload: StepPayload,
    ) -> Result<(), EngineError> {
        let mut index = 0;
        while index < self.effect_count(target) {
            let Some((effect, data)) = self.live_effect(target, index) else {
                index += 1;
                continue;
            };
            if !effect.should_run_at_step(step) {
                index += 1;
                continue;
            }

            if self.trace_effects {
                trace!(%target, index, ?step, effect = effect.name(), data, "running effect");
            }
            let inv = EffectInvocation {
                target,
                index,
                rng: self.rng,
            };
            let outcome = dispatch(effect.as_ref(), self, &inv, data, step, payload)?;
            self.emit(BattleEvent::EffectRan {
                target,
                index,
                step,
            });

            if let Some(slot) = self
                .state
                .effects
                .list_mut(target)
                .and_then(|list| list.get_mut(index))
                .filter(|slot| !slot.removed)
            {
                slot.data = outcome.data;
            }
            if outcome.remove && self.live_effect(target, index).is_some() {
                self.remove_effect(target, index)?;
            }
            index += 1;
        }
        Ok(())
    }

    /// Run the effects of the combatant fielded in `(player, slot)`.
    pub(crate) fn run_slot_effects(
        &mut self,
        player: PlayerId,
        slot: usize,
        step: EffectStep,
        payload: StepPayload,
    ) -> Result<(), EngineError> {
        let mon_index = self.active_mon_index(player, slot);
        self.run_effects(EffectTarget::mon(player, mon_index), step, payload)
    }
}
