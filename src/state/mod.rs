//! Match state: packed words, per-combatant deltas, storage slot
//! allocation and the read-only view.

mod allocator;
mod battle;
mod mon_state;
mod packed;
mod view;

pub use allocator::SlotAllocator;
pub use battle::{MatchConfig, MatchSetup, MatchState, MatchSummary};
pub use mon_state::{CombatantState, StatDelta, CLEARED_DELTA};
pub use packed::{ActiveSlots, KoBitmaps, SlotFlags, MAX_ACTIVE_SLOTS};
pub use view::BattleView;
