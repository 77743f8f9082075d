//! Read-only window onto a live match.
//!
//! Validators, move metadata and admission checks all read through a
//! `BattleView`; none of them can mutate the match.

use super::battle::{MatchConfig, MatchState};
use super::mon_state::CombatantState;
use crate::core::{
    GameMode, MatchKey, MonStateIndex, PlayerId, PlayerKey, PlayerPair, PlayersToMove,
};
use crate::effects::{EffectInfo, EffectTarget};
use crate::mons::Combatant;
use crate::moves::MoveDecision;

#[derive(Clone, Copy)]
pub struct BattleView<'a> {
    config: &'a MatchConfig,
    state: &'a MatchState,
}

impl<'a> BattleView<'a> {
    #[must_use]
    pub fn new(config: &'a MatchConfig, state: &'a MatchState) -> Self {
        Self { config, state }
    }

    #[must_use]
    pub fn config(&self) -> &'a MatchConfig {
        self.config
    }

    #[must_use]
    pub fn match_key(&self) -> MatchKey {
        self.config.key
    }

    #[must_use]
    pub fn players(&self) -> PlayerPair<PlayerKey> {
        self.config.players
    }

    #[must_use]
    pub fn player_of(&self, key: PlayerKey) -> Option<PlayerId> {
        self.config.player_of(key)
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.state.flags.mode()
    }

    #[must_use]
    pub fn active_slot_count(&self) -> usize {
        self.mode().active_slots()
    }

    #[must_use]
    pub fn turn_id(&self) -> u64 {
        self.state.turn_id
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner
    }

    #[must_use]
    pub fn players_to_move(&self) -> PlayersToMove {
        self.state.players_to_move
    }

    #[must_use]
    pub fn prev_players_to_move(&self) -> PlayersToMove {
        self.state.prev_players_to_move
    }

    #[must_use]
    pub fn start_timestamp(&self) -> u64 {
        self.config.start_timestamp
    }

    /// Time the previous turn was resolved (match start before the first).
    #[must_use]
    pub fn last_execute_timestamp(&self) -> u64 {
        self.state.last_execute_timestamp
    }

    #[must_use]
    pub fn team(&self, player: PlayerId) -> &'a [Combatant] {
        self.config.team(player)
    }

    #[must_use]
    pub fn team_size(&self, player: PlayerId) -> usize {
        self.config.team_size(player)
    }

    #[must_use]
    pub fn mon(&self, player: PlayerId, mon_index: usize) -> Option<&'a Combatant> {
        self.config.team(player).get(mon_index)
    }

    #[must_use]
    pub fn mon_state(&self, player: PlayerId, mon_index: usize) -> CombatantState {
        self.state.mon_state(player, mon_index)
    }

    /// Base stat plus delta; untouched deltas count as zero.
    #[must_use]
    pub fn effective_stat(&self, player: PlayerId, mon_index: usize, stat: MonStateIndex) -> i32 {
        let base = self
            .mon(player, mon_index)
            .map_or(0, |mon| mon.stats.base(stat));
        match stat {
            MonStateIndex::IsKnockedOut | MonStateIndex::ShouldSkipTurn => {
                self.mon_state(player, mon_index).read(stat)
            }
            _ => base.saturating_add(self.mon_state(player, mon_index).read(stat)),
        }
    }

    /// Roster position fielded in `(player, slot)`.
    #[must_use]
    pub fn active_mon_index(&self, player: PlayerId, slot: usize) -> usize {
        self.state.active.get(player, slot)
    }

    /// Is `mon_index` fielded in any active slot of `player`?
    #[must_use]
    pub fn is_active(&self, player: PlayerId, mon_index: usize) -> bool {
        self.state
            .active
            .slot_of(player, mon_index, self.active_slot_count())
            .is_some()
    }

    #[must_use]
    pub fn is_knocked_out(&self, player: PlayerId, mon_index: usize) -> bool {
        self.state.ko.is_knocked_out(player, mon_index)
    }

    #[must_use]
    pub fn ko_bitmap(&self, player: PlayerId) -> u8 {
        self.state.ko.get(player)
    }

    #[must_use]
    pub fn switch_required(&self, player: PlayerId, slot: usize) -> bool {
        self.state.flags.switch_required(player, slot)
    }

    /// Could `player` field some benched, healthy combatant other than
    /// `excluding`?
    #[must_use]
    pub fn has_switch_target(&self, player: PlayerId, excluding: Option<usize>) -> bool {
        (0..self.team_size(player)).any(|i| {
            Some(i) != excluding && !self.is_knocked_out(player, i) && !self.is_active(player, i)
        })
    }

    /// Recorded decision of `(player, slot)` for the current turn.
    #[must_use]
    pub fn decision(&self, player: PlayerId, slot: usize) -> MoveDecision {
        self.state.decisions[player]
            .get(slot)
            .copied()
            .unwrap_or(MoveDecision::EMPTY)
    }

    /// Live effects on a target.
    #[must_use]
    pub fn effects(&self, target: EffectTarget) -> Vec<EffectInfo> {
        self.state
            .effects
            .list(target)
            .map(|list| list.infos())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for BattleView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleView")
            .field("key", &self.config.key)
            .field("turn_id", &self.state.turn_id)
            .field("players_to_move", &self.state.players_to_move)
            .field("winner", &self.state.winner)
            .finish()
    }
}
