//! Timeout deadlines.
//!
//! Deadlines depend on where the turn is in the commit/reveal cycle:
//!
//! - single-player turn: the acting player has `timeout * multiplier`
//!   from the previous resolution to reveal;
//! - committer (turn parity player) on a two-player turn: `timeout` from
//!   the previous resolution to commit, then `timeout` from the other
//!   side's reveal to reveal;
//! - revealer: `timeout` from the committer's commit to reveal.
//!
//! Before the first resolution, the match start time stands in for the
//! previous resolution.

use crate::commit::CommitRecord;
use crate::core::{PlayerId, PlayerPair, PlayersToMove, ValidatorConfig};
use crate::state::BattleView;

fn expired(now: u64, since: u64, duration: u64) -> bool {
    now >= since.saturating_add(duration)
}

/// `Some(presumed_afk)` if that player missed their current deadline.
#[must_use]
pub fn timed_out_player(
    config: &ValidatorConfig,
    view: &BattleView<'_>,
    records: &PlayerPair<CommitRecord>,
    presumed_afk: PlayerId,
    now: u64,
) -> Option<PlayerId> {
    let turn_id = view.turn_id();
    let last_turn = if turn_id == 0 {
        view.start_timestamp()
    } else {
        view.last_execute_timestamp()
    };
    let own = &records[presumed_afk];
    let other = &records[presumed_afk.other()];

    let late = match view.players_to_move() {
        PlayersToMove::Only(player) if player == presumed_afk => {
            !own.has_revealed(turn_id)
                && expired(now, last_turn, config.single_player_timeout())
        }
        PlayersToMove::Only(_) => false,
        PlayersToMove::Both if presumed_afk == PlayerId::for_turn_parity(turn_id) => {
            if !own.has_committed(turn_id) {
                expired(now, last_turn, config.timeout_duration)
            } else if other.has_revealed(turn_id) && !own.has_revealed(turn_id) {
                expired(now, other.last_move_timestamp, config.timeout_duration)
            } else {
                false
            }
        }
        PlayersToMove::Both => {
            other.has_committed(turn_id)
                && !own.has_revealed(turn_id)
                && expired(now, other.last_move_timestamp, config.timeout_duration)
        }
    };

    late.then_some(presumed_afk)
}
