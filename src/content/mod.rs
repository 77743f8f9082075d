//! Reference content: simple moves, abilities and effects.

mod basic;

pub use basic::{
    basic_moveset, CountdownEffect, DamageEchoEffect, FixedDamageMove, ForceSwitchMove,
    NoAbility, RestMove, SkipTurnMove, StaminaOnSwitchAbility,
};
