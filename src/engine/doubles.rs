//! Doubles turn resolution.
//!
//! All acting slots are sorted once by priority, speed and position. Each
//! slot then runs its decision, its after-move effects and the global
//! after-move effects, with a game-over check after every step. Round
//! start/end effects wrap the slot loop in the same order.

use smallvec::SmallVec;

use super::context::ResolutionContext;
use super::order::{doubles_order, SlotKey};
use crate::core::{EngineError, PlayerId, PlayersToMove};
use crate::effects::{EffectStep, EffectTarget, StepPayload};

impl ResolutionContext<'_> {
    fn slot_alive(&self, player: PlayerId, slot: usize) -> bool {
        !self.is_knocked_out(player, self.active_mon_index(player, slot))
    }

    fn run_slot(&mut self, key: SlotKey, step: EffectStep) -> Result<(), EngineError> {
        if !self.slot_alive(key.player, key.slot) {
            return Ok(());
        }
        let payload = match step {
            EffectStep::AfterMove => StepPayload::Move {
                player: key.player,
                slot: key.slot,
            },
            _ => StepPayload::None,
        };
        self.run_slot_effects(key.player, key.slot, step, payload)
    }

    pub(crate) fn resolve_doubles(&mut self) -> Result<(), EngineError> {
        let acting: SmallVec<[(PlayerId, usize); 4]> = match self.state.players_to_move {
            PlayersToMove::Only(player) => (0..2).map(|slot| (player, slot)).collect(),
            PlayersToMove::Both => PlayerId::both()
                .flat_map(|player| (0..2).map(move |slot| (player, slot)))
                .collect(),
        };
        let order = doubles_order(&self.view(), &acting);
        let Some(first) = order.first().map(|key| key.player) else {
            return Ok(());
        };

        if let PlayersToMove::Only(_) = self.state.players_to_move {
            for key in &order {
                step!(self, first, self.execute_decision(key.player, key.slot));
            }
            return Ok(());
        }

        step!(self, first, self.run_effects(EffectTarget::Global, EffectStep::RoundStart, StepPayload::None));
        for &key in &order {
            step!(self, first, self.run_slot(key, EffectStep::RoundStart));
        }

        for &key in &order {
            step!(self, first, self.execute_decision(key.player, key.slot));
            step!(self, first, self.run_slot(key, EffectStep::AfterMove));
            step!(
                self,
                first,
                self.run_effects(
                    EffectTarget::Global,
                    EffectStep::AfterMove,
                    StepPayload::Move {
                        player: key.player,
                        slot: key.slot,
                    },
                )
            );
        }

        if self.turn_id() == 0 {
            for &key in &order {
                step!(self, first, self.activate_slot_ability(key.player, key.slot));
            }
        }

        step!(self, first, self.run_effects(EffectTarget::Global, EffectStep::RoundEnd, StepPayload::None));
        for &key in &order {
            step!(self, first, self.run_slot(key, EffectStep::RoundEnd));
        }
        Ok(())
    }
}
