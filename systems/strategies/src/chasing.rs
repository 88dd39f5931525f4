//! Pursuit strategy that drives toward the target its player assigned.

use tank_battle_core::{Action, BattleInfo, CellCoord, PlayerId, TankStrategy};
use tracing::trace;

use crate::{
    memory::{TankMemory, REFRESH_INTERVAL},
    navigation::{plan_route, Route},
};

/// Cells scanned straight ahead before firing opportunistically.
const FIRING_RANGE: u32 = 6;

/// Hunter strategy following a breadth-first route to its assigned target.
///
/// Without a target from its player the strategy keeps asking for battle info.
/// Every shot drops the target so the next turn fetches a fresh one.
#[derive(Clone, Debug)]
pub struct ChasingStrategy {
    memory: TankMemory,
    target: Option<CellCoord>,
    planned_for: Option<CellCoord>,
    route: Route,
}

impl ChasingStrategy {
    /// Creates the strategy for a tank owned by `player`.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            memory: TankMemory::new(player),
            target: None,
            planned_for: None,
            route: Route::default(),
        }
    }

    fn choose(&mut self) -> Action {
        let Some(target) = self.target else {
            return Action::GetBattleInfo;
        };

        let threats = self.memory.threats();
        if let Some(action) = self.memory.threatened_action(&threats) {
            return action;
        }

        if self.memory.shot_lined_up(FIRING_RANGE) {
            return Action::Shoot;
        }

        if self.memory.turns_since_update() >= REFRESH_INTERVAL {
            return Action::GetBattleInfo;
        }

        let (Some(cell), Some(info)) = (self.memory.cell(), self.memory.info()) else {
            self.target = None;
            return Action::GetBattleInfo;
        };

        if self.route.is_finished()
            || self.planned_for != Some(target)
            || self.route.expected_cell() != Some(cell)
        {
            self.route = plan_route(info, cell, self.memory.facing(), target);
            self.planned_for = Some(target);
            trace!(?cell, ?target, "route planned");
        }

        if self.route.is_finished() && self.memory.can_shoot() {
            return Action::Shoot;
        }

        if let Some(action) = self.route.advance() {
            return action;
        }

        self.target = None;
        Action::GetBattleInfo
    }
}

impl TankStrategy for ChasingStrategy {
    fn next_action(&mut self) -> Action {
        self.memory.tick_cooldown();
        let action = self.choose();
        if action == Action::Shoot {
            self.target = None;
        }
        self.memory.commit(action);
        action
    }

    fn update_battle_info(&mut self, info: BattleInfo) {
        self.target = info.target();
        self.memory.absorb(info);
    }
}
