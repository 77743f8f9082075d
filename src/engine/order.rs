//! Turn order.
//!
//! Decisions resolve by priority tier (higher first), then effective speed
//! (higher first). Singles breaks a full tie with the turn's random value;
//! doubles breaks it by position (P0 before P1, slot 0 before slot 1) so
//! the order over the four slots is total and stable.

use smallvec::SmallVec;

use crate::core::{MonStateIndex, PlayerId};
use crate::moves::{MoveSelector, SWITCH_PRIORITY};
use crate::state::BattleView;

/// Ordering key of one acting slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotKey {
    pub player: PlayerId,
    pub slot: usize,
    pub priority: u32,
    pub speed: i64,
}

impl SlotKey {
    /// Build the key of `(player, slot)` from its recorded decision.
    #[must_use]
    pub fn for_slot(view: &BattleView<'_>, player: PlayerId, slot: usize) -> Self {
        Self {
            player,
            slot,
            priority: decision_priority(view, player, slot),
            speed: effective_speed(view, player, slot),
        }
    }

    fn position(&self) -> usize {
        self.player.index() * 2 + self.slot
    }
}

/// Priority tier of the decision recorded for `(player, slot)`.
#[must_use]
pub fn decision_priority(view: &BattleView<'_>, player: PlayerId, slot: usize) -> u32 {
    let decision = view.decision(player, slot);
    match decision.selector {
        MoveSelector::Switch | MoveSelector::NoOp => SWITCH_PRIORITY,
        MoveSelector::Move(index) => {
            let mon_index = view.active_mon_index(player, slot);
            view.mon(player, mon_index)
                .and_then(|mon| mon.move_at(index))
                .map_or(0, |mv| mv.priority(view, player))
        }
    }
}

/// Base speed plus delta of the combatant fielded in `(player, slot)`.
#[must_use]
pub fn effective_speed(view: &BattleView<'_>, player: PlayerId, slot: usize) -> i64 {
    let mon_index = view.active_mon_index(player, slot);
    i64::from(view.effective_stat(player, mon_index, MonStateIndex::Speed))
}

/// Singles: the side whose decision resolves first.
#[must_use]
pub fn priority_player(p0: (u32, i64), p1: (u32, i64), rng: u64) -> PlayerId {
    match p0.cmp(&p1) {
        std::cmp::Ordering::Greater => PlayerId::P0,
        std::cmp::Ordering::Less => PlayerId::P1,
        std::cmp::Ordering::Equal => PlayerId::new((rng % 2) as u8),
    }
}

/// Singles: the priority player from the recorded decisions.
#[must_use]
pub fn singles_priority_player(view: &BattleView<'_>, rng: u64) -> PlayerId {
    let key = |player| {
        (
            decision_priority(view, player, 0),
            effective_speed(view, player, 0),
        )
    };
    priority_player(key(PlayerId::P0), key(PlayerId::P1), rng)
}

/// Doubles: sort acting slots into resolution order.
pub fn order_slots(keys: &mut [SlotKey]) {
    keys.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(b.speed.cmp(&a.speed))
            .then(a.position().cmp(&b.position()))
    });
}

/// Doubles: resolution order of the given slots.
#[must_use]
pub fn doubles_order(
    view: &BattleView<'_>,
    slots: &[(PlayerId, usize)],
) -> SmallVec<[SlotKey; 4]> {
    let mut keys: SmallVec<[SlotKey; 4]> = slots
        .iter()
        .map(|&(player, slot)| SlotKey::for_slot(view, player, slot))
        .collect();
    order_slots(&mut keys);
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(player: u8, slot: usize, priority: u32, speed: i64) -> SlotKey {
        SlotKey {
            player: PlayerId::new(player),
            slot,
            priority,
            speed,
        }
    }

    #[test]
    fn test_priority_beats_speed() {
        assert_eq!(priority_player((6, 10), (3, 500), 0), PlayerId::P0);
        assert_eq!(priority_player((3, 10), (3, 500), 0), PlayerId::P1);
    }

    #[test]
    fn test_tie_uses_rng() {
        assert_eq!(priority_player((3, 50), (3, 50), 4), PlayerId::P0);
        assert_eq!(priority_player((3, 50), (3, 50), 7), PlayerId::P1);
    }

    #[test]
    fn test_doubles_position_tiebreak() {
        let mut keys = [
            key(1, 1, 3, 50),
            key(0, 1, 3, 50),
            key(1, 0, 3, 50),
            key(0, 0, 3, 50),
        ];
        order_slots(&mut keys);
        let order: Vec<_> = keys.iter().map(|k| (k.player.index(), k.slot)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_doubles_switch_tier_first() {
        let mut keys = [key(0, 0, 3, 999), key(1, 1, 6, 1)];
        order_slots(&mut keys);
        assert_eq!(keys[0].player, PlayerId::P1);
    }

    proptest! {
        #[test]
        fn prop_order_is_total_and_stable(
            specs in proptest::collection::vec((0u32..8, -50i64..200), 4)
        ) {
            let mut keys: Vec<SlotKey> = specs
                .iter()
                .enumerate()
                .map(|(i, &(priority, speed))| key((i / 2) as u8, i % 2, priority, speed))
                .collect();
            let mut reversed = keys.clone();
            reversed.reverse();

            order_slots(&mut keys);
            order_slots(&mut reversed);
            prop_assert_eq!(&keys, &reversed);

            for pair in keys.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(
                    (a.priority, a.speed) > (b.priority, b.speed)
                        || ((a.priority, a.speed) == (b.priority, b.speed)
                            && a.position() < b.position())
                );
            }
        }
    }
}
