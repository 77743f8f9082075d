//! The write gate.
//!
//! A `ResolutionContext` only exists while the engine is resolving a turn,
//! starting a match or performing a forced switch. Content code (moves,
//! abilities, effects, hooks) receives one and can mutate the match through
//! it and nothing else.

use tracing::debug;

use crate::core::{BattleEvent, EngineError, MatchKey, MonStateIndex, PlayerId};
use crate::effects::{EffectStep, EffectTarget, StateUpdate, StepPayload};
use crate::state::{BattleView, MatchConfig, MatchState};

pub struct ResolutionContext<'a> {
    pub(crate) config: &'a MatchConfig,
    pub(crate) state: &'a mut MatchState,
    pub(crate) events: Vec<BattleEvent>,
    pub(crate) rng: u64,
    pub(crate) now: u64,
    pub(crate) trace_effects: bool,
}

impl<'a> ResolutionContext<'a> {
    pub(crate) fn new(
        config: &'a MatchConfig,
        state: &'a mut MatchState,
        rng: u64,
        now: u64,
        trace_effects: bool,
    ) -> Self {
        Self {
            config,
            state,
            events: Vec::new(),
            rng,
            now,
            trace_effects,
        }
    }

    #[must_use]
    pub fn view(&self) -> BattleView<'_> {
        BattleView::new(self.config, self.state)
    }

    #[must_use]
    pub fn config(&self) -> &'a MatchConfig {
        self.config
    }

    #[must_use]
    pub fn match_key(&self) -> MatchKey {
        self.config.key
    }

    /// Random value of the turn being resolved.
    #[must_use]
    pub fn rng(&self) -> u64 {
        self.rng
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[must_use]
    pub fn turn_id(&self) -> u64 {
        self.state.turn_id
    }

    #[must_use]
    pub fn active_mon_index(&self, player: PlayerId, slot: usize) -> usize {
        self.state.active.get(player, slot)
    }

    #[must_use]
    pub fn is_knocked_out(&self, player: PlayerId, mon_index: usize) -> bool {
        self.state.ko.is_knocked_out(player, mon_index)
    }

    /// Append to the battle log.
    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub(crate) fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    pub(crate) fn check_mon(&self, player: PlayerId, mon_index: usize) -> Result<(), EngineError> {
        if mon_index < self.config.team_size(player) {
            Ok(())
        } else {
            Err(EngineError::InvalidMonIndex {
                player,
                index: mon_index,
            })
        }
    }

    /// Subtract `amount` hp from a combatant.
    ///
    /// Knocks the combatant out when its hp reaches zero, then runs its
    /// after-damage effects. Damage to a knocked-out combatant is ignored.
    pub fn deal_damage(
        &mut self,
        player: PlayerId,
        mon_index: usize,
        amount: i32,
    ) -> Result<(), EngineError> {
        self.check_mon(player, mon_index)?;
        if self.is_knocked_out(player, mon_index) {
            return Ok(());
        }

        if let Some(mon) = self.state.mon_state_mut(player, mon_index) {
            mon.apply(MonStateIndex::Hp, amount.saturating_neg());
        }
        self.emit(BattleEvent::Damage {
            player,
            mon_index,
            amount,
        });
        self.check_knockout(player, mon_index);

        self.run_effects(
            EffectTarget::mon(player, mon_index),
            EffectStep::AfterDamage,
            StepPayload::Damage {
                player,
                mon_index,
                amount,
            },
        )
    }

    /// Apply `value` to one state index of a combatant.
    ///
    /// Fires the combatant's own state-update effects, then the global ones.
    pub fn update_mon_state(
        &mut self,
        player: PlayerId,
        mon_index: usize,
        index: MonStateIndex,
        value: i32,
    ) -> Result<(), EngineError> {
        self.check_mon(player, mon_index)?;
        if let Some(mon) = self.state.mon_state_mut(player, mon_index) {
            mon.apply(index, value);
        }
        self.emit(BattleEvent::MonStateUpdated {
            player,
            mon_index,
            index,
            value,
        });

        match index {
            MonStateIndex::IsKnockedOut => {
                let knocked_out = self.state.mon_state(player, mon_index).knocked_out;
                let was = self.is_knocked_out(player, mon_index);
                self.state.ko.mark(player, mon_index, knocked_out);
                if knocked_out && !was {
                    debug!(%player, mon_index, "knocked out");
                    self.emit(BattleEvent::KnockedOut { player, mon_index });
                }
            }
            MonStateIndex::Hp => self.check_knockout(player, mon_index),
            _ => {}
        }

        let payload = StepPayload::Update(StateUpdate {
            player,
            mon_index,
            index,
            value,
        });
        self.run_effects(
            EffectTarget::mon(player, mon_index),
            EffectStep::OnUpdateMonState,
            payload,
        )?;
        self.run_effects(EffectTarget::Global, EffectStep::OnUpdateMonState, payload)
    }

    fn check_knockout(&mut self, player: PlayerId, mon_index: usize) {
        if self.is_knocked_out(player, mon_index) {
            return;
        }
        let hp = self.view().effective_stat(player, mon_index, MonStateIndex::Hp);
        if hp > 0 {
            return;
        }
        if let Some(mon) = self.state.mon_state_mut(player, mon_index) {
            mon.knocked_out = true;
        }
        self.state.ko.mark(player, mon_index, true);
        debug!(%player, mon_index, "knocked out");
        self.emit(BattleEvent::KnockedOut { player, mon_index });
    }
}

impl std::fmt::Debug for ResolutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("key", &self.config.key)
            .field("turn_id", &self.state.turn_id)
            .field("rng", &self.rng)
            .field("events", &self.events.len())
            .finish()
    }
}
