//! Threat-avoiding sentry that stays put and fires at whatever wanders into range.

use std::collections::HashSet;

use tank_battle_core::{Action, BattleInfo, CellCoord, PlayerId, TankStrategy};

use crate::memory::{TankMemory, IDLE_REFRESH, REFRESH_INTERVAL};

/// Cells scanned straight ahead before firing opportunistically.
const FIRING_RANGE: u32 = 6;

/// Radius searched for enemies worth turning toward.
const AWARENESS_RADIUS: u32 = 3;

/// Sentry strategy: dodges danger, shoots enemies in line, otherwise scans around.
#[derive(Clone, Debug)]
pub struct BasicStrategy {
    memory: TankMemory,
}

impl BasicStrategy {
    /// Creates the strategy for a tank owned by `player`.
    #[must_use]
    pub fn new(player: PlayerId) -> Self {
        Self {
            memory: TankMemory::new(player),
        }
    }

    fn choose(&self) -> Action {
        if self.memory.info().is_none() {
            return Action::GetBattleInfo;
        }

        let threats = self.memory.threats();
        if let Some(action) = self.memory.threatened_action(&threats) {
            return action;
        }

        if self.memory.turns_since_update() >= REFRESH_INTERVAL {
            return Action::GetBattleInfo;
        }

        if let Some(action) = self.engage(&threats) {
            return action;
        }

        if self.memory.turns_since_update() >= IDLE_REFRESH {
            Action::GetBattleInfo
        } else {
            Action::RotateLeft90
        }
    }

    fn engage(&self, threats: &HashSet<CellCoord>) -> Option<Action> {
        if self.memory.shot_lined_up(FIRING_RANGE) {
            return Some(Action::Shoot);
        }

        let Some(direction) = self.memory.visible_enemy_direction(AWARENESS_RADIUS) else {
            return self.memory.rotation_toward_free_cell(threats);
        };
        if direction == self.memory.facing() {
            return None;
        }

        if self.memory.can_shoot() {
            Some(self.memory.rotation_toward(direction))
        } else {
            self.memory.rotation_toward_free_cell(threats)
        }
    }
}

impl TankStrategy for BasicStrategy {
    fn next_action(&mut self) -> Action {
        self.memory.tick_cooldown();
        let action = self.choose();
        self.memory.commit(action);
        action
    }

    fn update_battle_info(&mut self, info: BattleInfo) {
        self.memory.absorb(info);
    }
}
