//! Legality rules.
//!
//! A `Validator` answers every legality question the engine and the commit
//! manager ask: can this match start, is this switch/move legal right now,
//! has this player timed out. Each match carries its own validator; the
//! engine falls back to `DefaultValidator` built from its `EngineConfig`.

mod default;
mod timeout;

pub use default::DefaultValidator;
pub use timeout::timed_out_player;

use crate::commit::CommitRecord;
use crate::core::{EngineError, PlayerId, PlayerPair};
use crate::mons::MonCatalog;
use crate::moves::MoveDecision;
use crate::state::{BattleView, MatchSetup};

pub trait Validator: Send + Sync {
    /// Check team sizes, move counts and catalog membership.
    fn validate_game_start(
        &self,
        setup: &MatchSetup,
        catalog: Option<&dyn MonCatalog>,
    ) -> Result<(), EngineError>;

    /// Can `(player, slot)` field `mon_index`?
    ///
    /// `sibling_claim` is the roster position the other slot of the same
    /// side is switching into this turn, if any.
    fn validate_switch(
        &self,
        view: &BattleView<'_>,
        player: PlayerId,
        slot: usize,
        mon_index: usize,
        sibling_claim: Option<usize>,
    ) -> bool;

    /// Can the combatant in `(player, slot)` use `move_index` right now?
    fn validate_specific_move_selection(
        &self,
        view: &BattleView<'_>,
        player: PlayerId,
        slot: usize,
        move_index: usize,
        extra_data: u64,
    ) -> bool;

    /// Full legality of a slot decision for the current turn.
    fn validate_player_move(
        &self,
        view: &BattleView<'_>,
        player: PlayerId,
        slot: usize,
        decision: &MoveDecision,
        sibling_claim: Option<usize>,
    ) -> bool;

    /// The player to forfeit if `presumed_afk` has exceeded a deadline.
    fn validate_timeout(
        &self,
        view: &BattleView<'_>,
        records: &PlayerPair<CommitRecord>,
        presumed_afk: PlayerId,
        now: u64,
    ) -> Option<PlayerId>;
}
