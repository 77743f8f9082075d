//! Game-over detection and end-of-turn bookkeeping.

use tracing::{debug, info};

use super::context::ResolutionContext;
use crate::core::{BattleEvent, PlayerId, PlayerPair, PlayersToMove};
use crate::moves::MoveDecision;
use crate::state::MAX_ACTIVE_SLOTS;

impl ResolutionContext<'_> {
    /// Record a winner if either side is fully knocked out. `first` is
    /// checked first.
    ///
    /// Returns `true` once the match has a winner.
    pub(crate) fn check_game_over(&mut self, first: PlayerId) -> bool {
        if self.state.winner.is_some() {
            return true;
        }
        for player in [first, first.other()] {
            if self.state.ko.all_knocked_out(player, self.config.team_size(player)) {
                let winner = player.other();
                self.state.winner = Some(winner);
                info!(key = %self.config.key, %winner, turn_id = self.state.turn_id, "game over");
                self.emit(BattleEvent::GameOver { winner });
                return true;
            }
        }
        false
    }

    /// Recompute switch flags and who moves next, then advance the turn.
    pub(crate) fn finish_turn(&mut self) {
        let slots = self.config.mode.active_slots();
        self.state.flags.clear_switch_flags();

        let mut needs_switch = PlayerPair::splat(false);
        for player in PlayerId::both() {
            let has_target = self.view().has_switch_target(player, None);
            for slot in 0..slots {
                let mon_index = self.active_mon_index(player, slot);
                if self.is_knocked_out(player, mon_index) && has_target {
                    self.state.flags.set_switch_required(player, slot, true);
                    needs_switch[player] = true;
                }
            }
        }

        let next = match (needs_switch[PlayerId::P0], needs_switch[PlayerId::P1]) {
            (true, false) => PlayersToMove::Only(PlayerId::P0),
            (false, true) => PlayersToMove::Only(PlayerId::P1),
            _ => PlayersToMove::Both,
        };

        self.state.prev_players_to_move = self.state.players_to_move;
        self.state.players_to_move = next;
        self.state.turn_id += 1;
        self.state.decisions = PlayerPair::splat([MoveDecision::EMPTY; MAX_ACTIVE_SLOTS]);
        self.state.salts = PlayerPair::splat(0);
        self.state.last_execute_timestamp = self.now;
        debug!(
            key = %self.config.key,
            turn_id = self.state.turn_id,
            players_to_move = ?next,
            "turn finished"
        );
    }
}
