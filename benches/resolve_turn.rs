//! Turn resolution and slot recycling benchmarks.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use monclash::content::basic_moveset;
use monclash::core::{
    EngineConfig, ManagerId, ManualClock, MatchKey, PlayerId, PlayerKey, PlayerPair,
};
use monclash::CommitManager;
use monclash::engine::Engine;
use monclash::mons::{Combatant, MonId, MonStats};
use monclash::moves::MoveDecision;
use monclash::state::MatchSetup;

fn roster() -> Vec<Combatant> {
    (0..4)
        .map(|i| {
            let mut mon = Combatant::new(MonId(i), format!("mon-{i}"), MonStats::default());
            mon.moves = basic_moveset(5);
            mon
        })
        .collect()
}

fn setup(manager: ManagerId) -> MatchSetup {
    MatchSetup::new(
        PlayerPair::new(PlayerKey(1), PlayerKey(2)),
        PlayerPair::new(roster(), roster()),
    )
    .with_move_manager(manager)
}

fn play(engine: &mut Engine, manager: ManagerId, key: MatchKey, decision: MoveDecision) {
    for player in PlayerId::both() {
        engine
            .record_decisions(manager, key, player, &[decision], player.index() as u64)
            .unwrap();
    }
    engine.resolve_turn(manager, key).unwrap();
}

/// An engine with one match past its opening turn.
fn opened(manager: ManagerId, clock: Arc<ManualClock>) -> (Engine, MatchKey) {
    let mut engine = Engine::new(EngineConfig::default(), clock);
    let key = MatchKey(1);
    engine.start_match(key, setup(manager)).unwrap();
    play(&mut engine, manager, key, MoveDecision::switch_to(0));
    (engine, key)
}

fn bench_singles_turn(c: &mut Criterion) {
    let manager = CommitManager::new().id();
    c.bench_function("singles_turn", |b| {
        b.iter_batched(
            || opened(manager, Arc::new(ManualClock::new(0))),
            |(mut engine, key)| {
                play(&mut engine, manager, key, MoveDecision::use_move(0, 0));
                black_box(engine)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_slot_recycling(c: &mut Criterion) {
    let manager = CommitManager::new().id();
    let clock = Arc::new(ManualClock::new(0));
    let mut engine = Engine::new(EngineConfig::default(), clock.clone());
    let mut next = 0u64;

    c.bench_function("start_and_forfeit", |b| {
        b.iter(|| {
            next += 1;
            let key = MatchKey(next);
            clock.advance(1);
            engine.start_match(key, setup(manager)).unwrap();
            clock.advance(1);
            black_box(engine.declare_timeout(manager, key, PlayerId::P1).unwrap());
        })
    });
}

criterion_group!(benches, bench_singles_turn, bench_slot_recycling);
criterion_main!(benches);
