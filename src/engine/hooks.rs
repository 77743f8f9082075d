//! Match-level lifecycle hooks.
//!
//! Hooks are attached per match through `MatchSetup::with_hook` and see the
//! same write gate as moves and effects. All callbacks default to no-ops.

use super::context::ResolutionContext;
use crate::core::{EngineError, PlayerId};

pub trait EngineHook: Send + Sync {
    fn name(&self) -> &str;

    fn on_battle_start(&self, _ctx: &mut ResolutionContext<'_>) -> Result<(), EngineError> {
        Ok(())
    }

    fn on_round_start(&self, _ctx: &mut ResolutionContext<'_>) -> Result<(), EngineError> {
        Ok(())
    }

    fn on_round_end(&self, _ctx: &mut ResolutionContext<'_>) -> Result<(), EngineError> {
        Ok(())
    }

    fn on_battle_end(
        &self,
        _ctx: &mut ResolutionContext<'_>,
        _winner: PlayerId,
    ) -> Result<(), EngineError> {
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub(crate) enum HookPoint {
    BattleStart,
    RoundStart,
    RoundEnd,
    BattleEnd(PlayerId),
}

impl ResolutionContext<'_> {
    pub(crate) fn run_hooks(&mut self, point: HookPoint) -> Result<(), EngineError> {
        let config = self.config;
        for hook in config.hooks.iter() {
            match point {
                HookPoint::BattleStart => hook.on_battle_start(self)?,
                HookPoint::RoundStart => hook.on_round_start(self)?,
                HookPoint::RoundEnd => hook.on_round_end(self)?,
                HookPoint::BattleEnd(winner) => hook.on_battle_end(self, winner)?,
            }
        }
        Ok(())
    }
}
