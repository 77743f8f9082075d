//! Effect pipeline tests, driven through real turns.

mod common;

use std::sync::Arc;

use common::*;
use monclash::content::{CountdownEffect, DamageEchoEffect};
use monclash::core::{BattleEvent, EngineError, MonStateIndex, PlayerId};
use monclash::effects::{
    Effect, EffectInvocation, EffectOutcome, EffectStep, EffectTarget, SwitchInfo,
};
use monclash::engine::ResolutionContext;
use monclash::moves::{Ability, MoveDecision};

const STRIKE: MoveDecision = MoveDecision::use_move(0, 0);
const REST: MoveDecision = MoveDecision::use_move(2, 0);

/// Attaches a damage echo to its holder on switch-in.
struct EchoAbility;

impl Ability for EchoAbility {
    fn name(&self) -> &str {
        "Echo"
    }

    fn activate_on_switch_in(
        &self,
        ctx: &mut ResolutionContext<'_>,
        player: PlayerId,
        mon_index: usize,
    ) -> Result<(), EngineError> {
        ctx.add_effect(
            EffectTarget::mon(player, mon_index),
            Arc::new(DamageEchoEffect { percent: 50 }),
            0,
        )?;
        Ok(())
    }
}

/// Adds a `Tally` to its own list the first time round start runs.
struct Spawner;

impl Effect for Spawner {
    fn name(&self) -> &str {
        "Spawner"
    }

    fn should_run_at_step(&self, step: EffectStep) -> bool {
        step == EffectStep::RoundStart
    }

    fn on_round_start(
        &self,
        ctx: &mut ResolutionContext<'_>,
        inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        if data == 0 {
            ctx.add_effect(inv.target, Arc::new(Tally), 0)?;
        }
        Ok(EffectOutcome::keep(1))
    }
}

/// Counts round starts.
struct Tally;

impl Effect for Tally {
    fn name(&self) -> &str {
        "Tally"
    }

    fn should_run_at_step(&self, step: EffectStep) -> bool {
        step == EffectStep::RoundStart
    }

    fn on_round_start(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data + 1))
    }
}

/// Counts switch-ins (units) and switch-outs (hundreds).
struct SwitchCounter;

impl Effect for SwitchCounter {
    fn name(&self) -> &str {
        "Switch Counter"
    }

    fn should_run_at_step(&self, step: EffectStep) -> bool {
        matches!(step, EffectStep::OnMonSwitchIn | EffectStep::OnMonSwitchOut)
    }

    fn on_mon_switch_in(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
        _switch: SwitchInfo,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data + 1))
    }

    fn on_mon_switch_out(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _inv: &EffectInvocation,
        data: u64,
        _switch: SwitchInfo,
    ) -> Result<EffectOutcome, EngineError> {
        Ok(EffectOutcome::keep(data + 100))
    }
}

/// Rewrites its data on apply, or refuses to stay when asked to.
struct Stamped;

impl Effect for Stamped {
    fn name(&self) -> &str {
        "Stamped"
    }

    fn should_run_at_step(&self, step: EffectStep) -> bool {
        step == EffectStep::OnApply
    }

    fn on_apply(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        inv: &EffectInvocation,
        data: u64,
    ) -> Result<EffectOutcome, EngineError> {
        if data == u64::MAX {
            Ok(EffectOutcome::remove(data))
        } else {
            Ok(EffectOutcome::keep(data * 10 + inv.index as u64))
        }
    }
}

fn global_data(harness: &Harness) -> Vec<(usize, u64)> {
    harness
        .engine
        .view(harness.key)
        .unwrap()
        .effects(EffectTarget::Global)
        .into_iter()
        .map(|info| (info.index, info.data))
        .collect()
}

/// Test that two echo effects do not bounce damage forever.
#[test]
fn test_damage_echo_is_bounded() {
    let echo = |speed| {
        let mut roster = team(4, speed, 40);
        roster[0] = roster[0].clone().with_ability(Arc::new(EchoAbility));
        roster
    };
    let mut harness = Harness::start(engine_config(4), setup(echo(100), echo(50)));
    harness.open();
    {
        let view = harness.engine.view(harness.key).unwrap();
        let infos = view.effects(EffectTarget::mon(PlayerId::P0, 0));
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "Damage Echo");
    }

    harness.play1(STRIKE, STRIKE);
    let view = harness.engine.view(harness.key).unwrap();
    assert_eq!(view.effective_stat(PlayerId::P0, 0, MonStateIndex::Hp), 30);
    assert_eq!(view.effective_stat(PlayerId::P1, 0, MonStateIndex::Hp), 30);
    for player in PlayerId::both() {
        let infos = view.effects(EffectTarget::mon(player, 0));
        assert_eq!(infos[0].data, 0);
    }
}

/// Test that a countdown ticks at round end, then runs its removal hook.
#[test]
fn test_countdown_expires() {
    let mut harness = Harness::start(
        engine_config(4),
        setup(team(4, 50, 10), team(4, 50, 10)).with_global_effect(Arc::new(CountdownEffect), 2),
    );
    assert_eq!(global_data(&harness), vec![(0, 2)]);

    harness.open();
    assert_eq!(global_data(&harness), vec![(0, 1)]);

    let report = harness.play1(REST, REST);
    assert!(global_data(&harness).is_empty());
    assert!(report.events.contains(&BattleEvent::EffectRemoved {
        target: EffectTarget::Global,
        index: 0,
    }));
    assert!(report
        .events
        .contains(&BattleEvent::custom(None, "countdown-expired", 0)));
}

/// Test that removed entries keep their index and are skipped.
#[test]
fn test_tombstones_keep_indices() {
    let mut harness = Harness::start(
        engine_config(4),
        setup(team(4, 50, 10), team(4, 50, 10))
            .with_global_effect(Arc::new(CountdownEffect), 1)
            .with_global_effect(Arc::new(CountdownEffect), 3),
    );
    harness.open();
    assert_eq!(global_data(&harness), vec![(1, 2)]);

    harness.play1(REST, REST);
    assert_eq!(global_data(&harness), vec![(1, 1)]);
}

/// Test that the admission check can refuse an effect.
#[test]
fn test_admission_refused() {
    let harness = Harness::start(
        engine_config(4),
        setup(team(4, 50, 10), team(4, 50, 10)).with_global_effect(Arc::new(CountdownEffect), 0),
    );
    assert!(global_data(&harness).is_empty());
}

/// Test that `on_apply` sees its index and may rewrite or cancel.
#[test]
fn test_on_apply_rewrites_or_cancels() {
    let harness = Harness::start(
        engine_config(4),
        setup(team(4, 50, 10), team(4, 50, 10))
            .with_global_effect(Arc::new(Stamped), 4)
            .with_global_effect(Arc::new(Stamped), u64::MAX)
            .with_global_effect(Arc::new(Stamped), 7),
    );
    assert_eq!(global_data(&harness), vec![(0, 40), (1, 71)]);
}

/// Test that an effect appended mid-pass runs in the same pass.
#[test]
fn test_appended_effect_runs_in_same_pass() {
    let mut harness = Harness::start(
        engine_config(4),
        setup(team(4, 50, 10), team(4, 50, 10)).with_global_effect(Arc::new(Spawner), 0),
    );
    harness.open();
    assert_eq!(global_data(&harness), vec![(0, 1), (1, 1)]);

    harness.play1(REST, REST);
    assert_eq!(global_data(&harness), vec![(0, 1), (1, 2)]);
}

/// Test switch steps, including the silent opening switch-out.
#[test]
fn test_switch_steps() {
    let mut harness = Harness::start(
        engine_config(4),
        setup(team(4, 50, 10), team(4, 50, 10)).with_global_effect(Arc::new(SwitchCounter), 0),
    );
    harness.open();
    assert_eq!(global_data(&harness), vec![(0, 2)]);

    harness.play1(MoveDecision::switch_to(1), REST);
    assert_eq!(global_data(&harness), vec![(0, 103)]);
}
