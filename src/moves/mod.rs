//! Move selection and the move/ability strategy traits.

mod selector;
mod strategy;

pub use selector::{
    MoveDecision, MoveSelector, DEFAULT_PRIORITY, NO_OP_MOVE_INDEX, SWITCH_MOVE_INDEX,
    SWITCH_PRIORITY,
};
pub use strategy::{Ability, Move, MoveInvocation};
