use tracing::debug;

use super::timeout::timed_out_player;
use super::Validator;
use crate::commit::CommitRecord;
use crate::core::{
    EngineConfig, EngineError, MonStateIndex, PlayerId, PlayerPair, ValidatorConfig,
    MAX_MOVES_PER_MON, MAX_TEAM_SIZE,
};
use crate::mons::MonCatalog;
use crate::moves::{MoveDecision, MoveSelector};
use crate::state::{BattleView, MatchSetup};

/// Rules parameterized by `ValidatorConfig`.
#[derive(Clone, Debug, Default)]
pub struct DefaultValidator {
    config: ValidatorConfig,
}

impl DefaultValidator {
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn from_engine(config: &EngineConfig) -> Self {
        Self::new(config.validator.clone())
    }

    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    fn invalid_team(player: PlayerId, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidTeam {
            player,
            reason: reason.into(),
        }
    }
}

impl Validator for DefaultValidator {
    fn validate_game_start(
        &self,
        setup: &MatchSetup,
        catalog: Option<&dyn MonCatalog>,
    ) -> Result<(), EngineError> {
        if setup.players[PlayerId::P0] == setup.players[PlayerId::P1] {
            return Err(Self::invalid_team(PlayerId::P1, "both sides share a player key"));
        }

        let expected = self.config.mons_per_team;
        if expected < setup.mode.active_slots() || expected > MAX_TEAM_SIZE {
            return Err(Self::invalid_team(
                PlayerId::P0,
                format!("team size {expected} unsupported for {:?}", setup.mode),
            ));
        }

        for (player, team) in setup.teams.iter() {
            if team.len() != expected {
                return Err(Self::invalid_team(
                    player,
                    format!("expected {expected} mons, got {}", team.len()),
                ));
            }
            for (index, mon) in team.iter().enumerate() {
                if mon.moves.len() != self.config.moves_per_mon
                    || mon.moves.len() > MAX_MOVES_PER_MON
                {
                    return Err(Self::invalid_team(
                        player,
                        format!(
                            "mon {index} has {} moves, expected {}",
                            mon.moves.len(),
                            self.config.moves_per_mon
                        ),
                    ));
                }
                if let Some(catalog) = catalog {
                    if !catalog.validate_mon(mon) {
                        return Err(Self::invalid_team(
                            player,
                            format!("mon {index} ({}) is not a registered configuration", mon.name),
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_switch(
        &self,
        view: &BattleView<'_>,
        player: PlayerId,
        slot: usize,
        mon_index: usize,
        sibling_claim: Option<usize>,
    ) -> bool {
        let slots = view.active_slot_count();
        if slot >= slots || mon_index >= view.team_size(player) {
            return false;
        }
        if view.is_knocked_out(player, mon_index) {
            return false;
        }
        if view.turn_id() != 0 {
            if view.active_mon_index(player, slot) == mon_index {
                return false;
            }
            if slots > 1 && view.active_mon_index(player, 1 - slot) == mon_index {
                return false;
            }
        }
        sibling_claim != Some(mon_index)
    }

    fn validate_specific_move_selection(
        &self,
        view: &BattleView<'_>,
        player: PlayerId,
        slot: usize,
        move_index: usize,
        extra_data: u64,
    ) -> bool {
        if slot >= view.active_slot_count() {
            return false;
        }
        let mon_index = view.active_mon_index(player, slot);
        let Some(mon) = view.mon(player, mon_index) else {
            return false;
        };
        let Some(mv) = mon.move_at(move_index) else {
            return false;
        };
        if view.is_knocked_out(player, mon_index) {
            return false;
        }

        let stamina = view.effective_stat(player, mon_index, MonStateIndex::Stamina);
        let cost = i64::from(mv.stamina(view, player, mon_index));
        if i64::from(stamina) < cost {
            debug!(%player, slot, move_index, stamina, cost, "not enough stamina");
            return false;
        }

        if view.active_slot_count() > 1
            && mv.move_class(view).targets_opponent()
            && MoveDecision::use_move(move_index, extra_data).target_slot() >= 2
        {
            return false;
        }
        mv.is_valid_target(view, player, extra_data)
    }

    fn validate_player_move(
        &self,
        view: &BattleView<'_>,
        player: PlayerId,
        slot: usize,
        decision: &MoveDecision,
        sibling_claim: Option<usize>,
    ) -> bool {
        if slot >= view.active_slot_count() {
            return false;
        }
        let switch_target = decision.extra_data as usize;

        if view.turn_id() == 0 {
            return decision.selector.is_switch()
                && self.validate_switch(view, player, slot, switch_target, sibling_claim);
        }

        let mon_index = view.active_mon_index(player, slot);
        let must_switch =
            view.switch_required(player, slot) || view.is_knocked_out(player, mon_index);

        match decision.selector {
            MoveSelector::Switch => {
                self.validate_switch(view, player, slot, switch_target, sibling_claim)
            }
            MoveSelector::NoOp if must_switch => !view.has_switch_target(player, sibling_claim),
            MoveSelector::NoOp => true,
            MoveSelector::Move(_) if must_switch => false,
            MoveSelector::Move(index) => {
                self.validate_specific_move_selection(view, player, slot, index, decision.extra_data)
            }
        }
    }

    fn validate_timeout(
        &self,
        view: &BattleView<'_>,
        records: &PlayerPair<CommitRecord>,
        presumed_afk: PlayerId,
        now: u64,
    ) -> Option<PlayerId> {
        timed_out_player(&self.config, view, records, presumed_afk, now)
    }
}
