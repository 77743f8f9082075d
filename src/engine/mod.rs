//! Turn-resolution engine.
//!
//! - `Engine`: match registry and the entry points (`start_match`,
//!   `record_decisions`, `resolve_turn`, `force_switch`, `declare_timeout`)
//! - `ResolutionContext`: the write gate handed to content code
//! - `EngineHook`: per-match lifecycle callbacks
//!
//! ## Atomicity
//!
//! Each entry point resolves against a working copy of the match state. Any
//! error raised by content code aborts the call and discards the copy.

/// Run one resolution step, then stop the turn if the match has a winner.
macro_rules! step {
    ($ctx:expr, $first:expr, $body:expr) => {
        $body?;
        if $ctx.check_game_over($first) {
            return Ok(());
        }
    };
}

mod bookkeeping;
mod context;
mod doubles;
#[allow(clippy::module_inception)]
mod engine;
mod hooks;
pub mod order;
mod singles;
mod switch;

pub use context::ResolutionContext;
pub use engine::{Engine, TurnReport};
pub use hooks::EngineHook;
