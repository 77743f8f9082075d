//! Minimal deterministic content.
//!
//! Enough moves, abilities and effects to drive every engine path in tests,
//! benches and simulations. Damage is a flat number; there are no type
//! charts or stat formulas.

use std::sync::Arc;

use crate::core::{BattleEvent, ElementType, EngineError, MonStateIndex, MoveClass, PlayerId};
use crate::effects::{Effect, EffectInvocation, EffectOutcome, EffectStep, EffectTarget};
use crate::engine::ResolutionContext;
use crate::moves::{Ability, Move, MoveInvocation, DEFAULT_PRIORITY};
use crate::state::BattleView;

/// Opponent combatant targeted by `invocation`: the fielded one in singles,
/// the one in the slot named by the low byte of the extra data in doubles.
fn opponent_target(ctx: &ResolutionContext<'_>, invocation: &MoveInvocation) -> (PlayerId, usize) {
    let opponent = invocation.player.other();
    let slot = if ctx.config().mode.active_slots() > 1 {
        (invocation.extra_data & 0xFF) as usize % 2
    } else {
        0
    };
    (opponent, ctx.active_mon_index(opponent, slot))
}

/// Flat damage to the opposing combatant.
#[derive(Clone, Debug)]
pub struct FixedDamageMove {
    name: String,
    power: i32,
    stamina: u32,
    priority: u32,
    class: MoveClass,
    element: ElementType,
}

impl FixedDamageMove {
    pub fn new(name: impl Into<String>, power: i32, class: MoveClass) -> Self {
        Self {
            name: name.into(),
            power,
            stamina: 1,
            priority: DEFAULT_PRIORITY,
            class,
            element: ElementType::None,
        }
    }

    pub fn physical(name: impl Into<String>, power: i32) -> Self {
        Self::new(name, power, MoveClass::Physical)
    }

    pub fn special(name: impl Into<String>, power: i32) -> Self {
        Self::new(name, power, MoveClass::Special)
    }

    #[must_use]
    pub fn with_stamina(mut self, stamina: u32) -> Self {
        self.stamina = stamina;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: ElementType) -> Self {
        self.element = element;
        self
    }
}

impl Move for FixedDamageMove {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(
        &self,
        ctx: &mut ResolutionContext<'_>,
        invocation: &MoveInvocation,
    ) -> Result<(), EngineError> {
        let (target_player, target_mon) = opponent_target(ctx, invocation);
        ctx.deal_damage(target_player, target_mon, self.power)
    }

    fn stamina(&self, _view: &BattleView<'_>, _player: PlayerId, _mon_index: usize) -> u32 {
        self.stamina
    }

    fn priority(&self, _view: &BattleView<'_>, _player: PlayerId) -> u32 {
        self.priority
    }

    fn move_type(&self, _view: &BattleView<'_>) -> ElementType {
        self.element
    }

    fn move_class(&self, _view: &BattleView<'_>) -> MoveClass {
        self.class
    }
}

/// Restores stamina to the user. Costs nothing.
#[derive(Clone, Copy, Debug)]
pub struct RestMove {
    pub amount: i32,
}

impl Move for RestMove {
    fn name(&self) -> &str {
        "Rest"
    }

    fn execute(
        &self,
        ctx: &mut ResolutionContext<'_>,
        invocation: &MoveInvocation,
    ) -> Result<(), EngineError> {
        ctx.update_mon_state(
            invocation.player,
            invocation.mon_index,
            MonStateIndex::Stamina,
            self.amount,
        )
    }

    fn stamina(&self, _view: &BattleView<'_>, _player: PlayerId, _mon_index: usize) -> u32 {
        0
    }

    fn move_type(&self, _view: &BattleView<'_>) -> ElementType {
        ElementType::None
    }

    fn move_class(&self, _view: &BattleView<'_>) -> MoveClass {
        MoveClass::SelfTarget
    }
}

/// Forces the opponent's first slot to field the roster position carried
/// in the extra data (high 32 bits).
#[derive(Clone, Copy, Debug, Default)]
pub struct ForceSwitchMove;

impl ForceSwitchMove {
    /// Extra data selecting `mon_index` as the replacement.
    #[must_use]
    pub fn extra_data(mon_index: usize) -> u64 {
        (mon_index as u64) << 32
    }
}

impl Move for ForceSwitchMove {
    fn name(&self) -> &str {
        "Force Switch"
    }

    fn execute(
        &self,
        ctx: &mut ResolutionContext<'_>,
        invocation: &MoveInvocation,
    ) -> Result<(), EngineError> {
        let replacement = (invocation.extra_data >> 32) as usize;
        let switched = ctx.switch_active_mon(invocation.player.other(), 0, replacement)?;
        ctx.emit(BattleEvent::custom(
            Some(invocation.player),
            "force-switch",
            i64::from(switched),
        ));
        Ok(())
    }

    fn stamina(&self, _view: &BattleView<'_>, _player: PlayerId, _mon_index: usize) -> u32 {
        1
    }

    fn move_type(&self, _view: &BattleView<'_>) -> ElementType {
        ElementType::Air
    }

    fn move_class(&self, _view: &BattleView<'_>) -> MoveClass {
        MoveClass::Other
    }
}

/// Makes the opposing combatant lose its next move.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkipTurnMove;

impl Move for SkipTurnMove {
    fn name(&self) -> &str {
        "Daze"
    }

    fn execute(
        &self,
        ctx: &mut ResolutionContext<'_>,
        invocation: &MoveInvocation,
    ) -> Result<(), EngineError> {
        let (target_player, target_mon) = opponent_target(ctx, invocation);
        ctx.update_mon_state(target_player, target_mon, MonStateIndex::ShouldSkipTurn, 1)
    }

    fn stamina(&self, _view: &BattleView<'_>, _player: PlayerId, _mon_index: usize) -> u32 {
        1
    }

    fn priority(&self, _view: &BattleView<'_>, _player: PlayerId) -> u32 {
        DEFAULT_PRIORITY + 1
    }

    fn move_type(&self, _view: &BattleView<'_>) -> ElementType {
        ElementType::Mind
    }

    fn move_class(&self, _view: &BattleView<'_>) -> MoveClass {
        MoveClass::Other
    }
}

/// Ability that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAbility;

impl Ability for NoAbility {
    fn name(&self) -> &str {
        "None"
    }

    fn activate_on_switch_in(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _player: PlayerId,
        _mon_index: usize,
    ) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Grants stamina to its holder on every switch-in.
#[derive(Clone, Copy, Debug)]
pub struct StaminaOnSwitchAbility {
    pub amount: i32,
}

impl Ability for StaminaOnSwitchAbility {
    fn name(&self) -> &str {
        "Second Wind"
    }

    fn activate_on_switch_in(
        &self,
        ctx: &mut ResolutionContext<'_>,
        player: PlayerId,
        mon_index: usize,
    ) -> Result<(), EngineError> {
        ctx.update_mon_state(player, mon_index, MonStateIndex::Stamina, self.amount)
    }
}

/// Counts down at every round end and removes itself at zero.
///
/// Data is the number of round ends left.
#[derive(Clone, Copy, Debug, Default)]
pub struct CountdownEffect;

impl Effect for CountdownEffect {
    fn name(&self) -> &str {
        "Countdown"
    }

    fn should_apply(&self, _view: &BattleView<'_>, _target: EffectTarget, data: u64) -> bool {
        data > 0
    }

    fn should_run_at_step(&self, step: EffectStep) -> bool {
        matches!(step, EffectStep::RoundEnd | EffectStep::OnRemove)
    }

    fn on_round_end(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        let left = data.saturating_sub(1);
        if left == 0 {
            Ok(EffectOutcome::remove(0))
        } else {
            Ok(EffectOutcome::keep(left))
        }
    }

    fn on_remove(
        &self,
        ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        ctx.emit(BattleEvent::custom(None, "countdown-expired", 0));
        Ok(EffectOutcome::keep(data))
    }
}

/// Reflects a share of damage taken by its holder back onto the opponent's
/// first slot.
///
/// Data bit 0 is a re-entrancy guard: while set, the echo is suppressed so
/// two echo effects cannot bounce damage forever.
#[derive(Clone, Copy, Debug)]
pub struct DamageEchoEffect {
    /// Percentage of the damage reflected.
    pub percent: i32,
}

const ECHO_GUARD: u64 = 1;

impl Effect for DamageEchoEffect {
    fn name(&self) -> &str {
        "Damage Echo"
    }

    fn should_apply(&self, view: &BattleView<'_>, target: EffectTarget, _data: u64) -> bool {
        match target {
            EffectTarget::Global => false,
            EffectTarget::Mon { player, mon_index } => !view.is_knocked_out(player, mon_index),
        }
    }

    fn should_run_at_step(&self, step: EffectStep) -> bool {
        step == EffectStep::AfterDamage
    }

    fn after_damage(
        &self,
        ctx: &mut ResolutionContext<'_>,
        inv: &EffectInvocation,
        data: u64,
        amount: i32,
    ) -> Result<EffectOutcome, EngineError> {
        let EffectTarget::Mon { player, .. } = inv.target else {
            return Ok(EffectOutcome::keep(data));
        };
        if data & ECHO_GUARD != 0 {
            return Ok(EffectOutcome::keep(data));
        }
        let echoed = amount.saturating_mul(self.percent) / 100;
        if echoed <= 0 {
            return Ok(EffectOutcome::keep(data));
        }

        ctx.edit_effect(inv.target, inv.index, data | ECHO_GUARD)?;
        let opponent = player.other();
        let target_mon = ctx.active_mon_index(opponent, 0);
        ctx.deal_damage(opponent, target_mon, echoed)?;
        Ok(EffectOutcome::keep(data & !ECHO_GUARD))
    }
}

/// A fixed lineup of moves, handy for building test rosters.
#[must_use]
pub fn basic_moveset(power: i32) -> Vec<Arc<dyn Move>> {
    vec![
        Arc::new(FixedDamageMove::physical("Strike", power)),
        Arc::new(FixedDamageMove::special("Blast", power).with_stamina(2)),
        Arc::new(RestMove { amount: 2 }),
        Arc::new(SkipTurnMove),
    ]
}
