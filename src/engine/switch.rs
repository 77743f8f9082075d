//! Decision execution and switching, shared by singles and doubles.

use tracing::{debug, warn};

use super::context::ResolutionContext;
use crate::core::{BattleEvent, EngineError, MonStateIndex, PlayerId, SkipReason};
use crate::effects::{EffectStep, EffectTarget, StepPayload, SwitchInfo};
use crate::moves::{MoveInvocation, MoveSelector};

impl ResolutionContext<'_> {
    /// Validate and perform a switch outside the regular decision flow.
    ///
    /// Returns `false` (and changes nothing) when the switch is not legal.
    pub fn switch_active_mon(
        &mut self,
        player: PlayerId,
        slot: usize,
        mon_index: usize,
    ) -> Result<bool, EngineError> {
        if slot >= self.config.mode.active_slots() {
            return Err(EngineError::InvalidSlot { slot });
        }
        let validator = self.config.validator.clone();
        if !validator.validate_switch(&self.view(), player, slot, mon_index, None) {
            debug!(%player, slot, mon_index, "forced switch rejected");
            return Ok(false);
        }
        self.handle_switch(player, slot, mon_index)?;
        Ok(true)
    }

    /// Swap the fielded combatant of `(player, slot)` and run the switch
    /// effects and the incoming ability.
    pub(crate) fn handle_switch(
        &mut self,
        player: PlayerId,
        slot: usize,
        to: usize,
    ) -> Result<(), EngineError> {
        let from = self.active_mon_index(player, slot);
        let opening = self.turn_id() == 0;

        if !opening && !self.is_knocked_out(player, from) {
            let payload = StepPayload::Switch(SwitchInfo {
                player,
                slot,
                mon_index: from,
            });
            self.run_effects(EffectTarget::mon(player, from), EffectStep::OnMonSwitchOut, payload)?;
            self.run_effects(EffectTarget::Global, EffectStep::OnMonSwitchOut, payload)?;
        }

        self.state.active.set(player, slot, to);
        self.state.flags.set_switch_required(player, slot, false);
        debug!(%player, slot, from, to, "switched");
        self.emit(BattleEvent::Switched {
            player,
            slot,
            from,
            to,
        });

        let payload = StepPayload::Switch(SwitchInfo {
            player,
            slot,
            mon_index: to,
        });
        self.run_effects(EffectTarget::mon(player, to), EffectStep::OnMonSwitchIn, payload)?;
        self.run_effects(EffectTarget::Global, EffectStep::OnMonSwitchIn, payload)?;

        if !opening && !self.is_knocked_out(player, to) {
            self.activate_ability(player, to)?;
        }
        Ok(())
    }

    pub(crate) fn activate_ability(
        &mut self,
        player: PlayerId,
        mon_index: usize,
    ) -> Result<(), EngineError> {
        let config = self.config;
        let Some(ability) = config
            .team(player)
            .get(mon_index)
            .and_then(|mon| mon.ability.as_ref())
        else {
            return Ok(());
        };
        self.emit(BattleEvent::AbilityActivated { player, mon_index });
        ability.activate_on_switch_in(self, player, mon_index)
    }

    /// Abilities of the combatants fielded on the opening turn.
    pub(crate) fn activate_slot_ability(
        &mut self,
        player: PlayerId,
        slot: usize,
    ) -> Result<(), EngineError> {
        let mon_index = self.active_mon_index(player, slot);
        if self.is_knocked_out(player, mon_index) {
            return Ok(());
        }
        self.activate_ability(player, mon_index)
    }

    fn skip(&mut self, player: PlayerId, slot: usize, reason: SkipReason) {
        self.emit(BattleEvent::DecisionSkipped {
            player,
            slot,
            reason,
        });
    }

    /// Run the recorded decision of `(player, slot)`.
    pub(crate) fn execute_decision(
        &mut self,
        player: PlayerId,
        slot: usize,
    ) -> Result<(), EngineError> {
        let decision = self.state.decisions[player][slot];
        if !decision.submitted {
            self.emit(BattleEvent::NoOp { player, slot });
            return Ok(());
        }

        let mon_index = self.active_mon_index(player, slot);
        let validator = self.config.validator.clone();

        match decision.selector {
            MoveSelector::NoOp => {
                self.emit(BattleEvent::NoOp { player, slot });
                Ok(())
            }
            MoveSelector::Switch => {
                let target = decision.extra_data as usize;
                let slots = self.config.mode.active_slots();
                if slots > 1
                    && self.turn_id() != 0
                    && self.active_mon_index(player, 1 - slot) == target
                {
                    warn!(%player, slot, target, "switch target fielded by sibling slot, skipping");
                    self.skip(player, slot, SkipReason::SiblingOccupied);
                    return Ok(());
                }
                if !validator.validate_switch(&self.view(), player, slot, target, None) {
                    warn!(%player, slot, target, "switch no longer legal, skipping");
                    self.skip(player, slot, SkipReason::NoLongerLegal);
                    return Ok(());
                }
                self.handle_switch(player, slot, target)
            }
            MoveSelector::Move(move_index) => {
                if self.is_knocked_out(player, mon_index) {
                    self.skip(player, slot, SkipReason::KnockedOut);
                    return Ok(());
                }
                if self.state.mon_state(player, mon_index).skip_turn {
                    self.update_mon_state(player, mon_index, MonStateIndex::ShouldSkipTurn, 0)?;
                    self.skip(player, slot, SkipReason::SkipTurnFlag);
                    return Ok(());
                }
                if !validator.validate_specific_move_selection(
                    &self.view(),
                    player,
                    slot,
                    move_index,
                    decision.extra_data,
                ) {
                    warn!(%player, slot, move_index, "move no longer legal, skipping");
                    self.skip(player, slot, SkipReason::NoLongerLegal);
                    return Ok(());
                }

                let config = self.config;
                let Some(mv) = config
                    .team(player)
                    .get(mon_index)
                    .and_then(|mon| mon.move_at(move_index))
                else {
                    return Err(EngineError::InvalidMoveIndex { index: move_index });
                };

                let cost = mv.stamina(&self.view(), player, mon_index);
                if cost > 0 {
                    let cost = i32::try_from(cost).unwrap_or(i32::MAX);
                    self.update_mon_state(player, mon_index, MonStateIndex::Stamina, -cost)?;
                }

                debug!(%player, slot, mon_index, move_name = mv.name(), "executing move");
                self.emit(BattleEvent::MoveExecuted {
                    player,
                    slot,
                    mon_index,
                    move_index,
                });
                let invocation = MoveInvocation {
                    player,
                    slot,
                    mon_index,
                    extra_data: decision.extra_data,
                    rng: self.rng,
                };
                mv.execute(self, &invocation)
            }
        }
    }
}
