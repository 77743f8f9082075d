//! Move and ability strategies.
//!
//! Concrete moves and abilities are external content. The engine only sees
//! these traits: it reads metadata through a `BattleView` and hands a
//! `ResolutionContext` to `execute`/`activate_on_switch_in`, which is the
//! only way content can change a match.

use crate::core::{ElementType, EngineError, MoveClass, PlayerId};
use crate::engine::ResolutionContext;
use crate::state::BattleView;

use super::selector::DEFAULT_PRIORITY;

/// Everything a move needs to know about its own invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveInvocation {
    pub player: PlayerId,
    pub slot: usize,
    /// Roster position of the user.
    pub mon_index: usize,
    pub extra_data: u64,
    /// Resolution-scoped random value of the current turn.
    pub rng: u64,
}

/// A move usable by a combatant.
pub trait Move: Send + Sync {
    fn name(&self) -> &str;

    /// Apply the move.
    fn execute(
        &self,
        ctx: &mut ResolutionContext<'_>,
        invocation: &MoveInvocation,
    ) -> Result<(), EngineError>;

    /// Stamina cost for `player`'s combatant at `mon_index`.
    fn stamina(&self, view: &BattleView<'_>, player: PlayerId, mon_index: usize) -> u32;

    fn priority(&self, _view: &BattleView<'_>, _player: PlayerId) -> u32 {
        DEFAULT_PRIORITY
    }

    fn move_type(&self, view: &BattleView<'_>) -> ElementType;

    fn move_class(&self, view: &BattleView<'_>) -> MoveClass;

    /// Move-specific target check on the decision's extra data.
    fn is_valid_target(&self, _view: &BattleView<'_>, _player: PlayerId, _extra_data: u64) -> bool {
        true
    }
}

/// Passive ability, activated when its holder is switched in.
pub trait Ability: Send + Sync {
    fn name(&self) -> &str;

    fn activate_on_switch_in(
        &self,
        ctx: &mut ResolutionContext<'_>,
        player: PlayerId,
        mon_index: usize,
    ) -> Result<(), EngineError>;
}
