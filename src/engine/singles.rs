//! Singles turn resolution.
//!
//! ## Sequence
//!
//! 1. global round-start effects
//! 2. round-start effects of the priority side, then the other side
//! 3. priority side's decision, its after-move effects, global after-move
//! 4. other side's decision
//! 5. opening turn only: abilities, priority side first
//! 6. other side's after-move effects, global after-move
//! 7. global round-end effects, then each side's round-end effects
//!
//! The game-over check runs after every step; a winner ends the turn.
//! Side-local steps skip a side whose fielded combatant is knocked out.
//! On a single-player turn only that side's decision runs.

use super::context::ResolutionContext;
use super::order::singles_priority_player;
use crate::core::{EngineError, PlayerId, PlayersToMove};
use crate::effects::{EffectStep, EffectTarget, StepPayload};

const SLOT: usize = 0;

impl ResolutionContext<'_> {
    fn side_alive(&self, player: PlayerId) -> bool {
        !self.is_knocked_out(player, self.active_mon_index(player, SLOT))
    }

    fn run_side(&mut self, player: PlayerId, step: EffectStep) -> Result<(), EngineError> {
        if !self.side_alive(player) {
            return Ok(());
        }
        let payload = match step {
            EffectStep::AfterMove => StepPayload::Move { player, slot: SLOT },
            _ => StepPayload::None,
        };
        self.run_slot_effects(player, SLOT, step, payload)
    }

    fn run_global_after_move(&mut self, player: PlayerId) -> Result<(), EngineError> {
        self.run_effects(
            EffectTarget::Global,
            EffectStep::AfterMove,
            StepPayload::Move { player, slot: SLOT },
        )
    }

    pub(crate) fn resolve_singles(&mut self) -> Result<(), EngineError> {
        if let PlayersToMove::Only(player) = self.state.players_to_move {
            step!(self, player, self.execute_decision(player, SLOT));
            return Ok(());
        }

        let first = singles_priority_player(&self.view(), self.rng);
        let second = first.other();
        let opening = self.turn_id() == 0;

        step!(self, first, self.run_effects(EffectTarget::Global, EffectStep::RoundStart, StepPayload::None));
        step!(self, first, self.run_side(first, EffectStep::RoundStart));
        step!(self, first, self.run_side(second, EffectStep::RoundStart));

        step!(self, first, self.execute_decision(first, SLOT));
        step!(self, first, self.run_side(first, EffectStep::AfterMove));
        step!(self, first, self.run_global_after_move(first));

        step!(self, first, self.execute_decision(second, SLOT));
        if opening {
            step!(self, first, self.activate_slot_ability(first, SLOT));
            step!(self, first, self.activate_slot_ability(second, SLOT));
        }
        step!(self, first, self.run_side(second, EffectStep::AfterMove));
        step!(self, first, self.run_global_after_move(second));

        step!(self, first, self.run_effects(EffectTarget::Global, EffectStep::RoundEnd, StepPayload::None));
        step!(self, first, self.run_side(first, EffectStep::RoundEnd));
        step!(self, first, self.run_side(second, EffectStep::RoundEnd));
        Ok(())
    }
}
