//! Dead-reckoned knowledge a tank keeps between battle-info refreshes.

use std::collections::HashSet;

use tank_battle_core::{
    Action, BattleInfo, CellCoord, Direction, ObjectKind, PlayerId, SHOOT_COOLDOWN_TURNS,
};

/// Turns after which a strategy refreshes its picture of the battlefield.
pub(crate) const REFRESH_INTERVAL: u32 = 4;

/// Turns without anything to do after which a strategy re-queries early.
pub(crate) const IDLE_REFRESH: u32 = 2;

/// Rotations tried, in order, when looking for a safe heading.
const ESCAPE_ROTATIONS: [Action; 4] = [
    Action::RotateLeft45,
    Action::RotateRight45,
    Action::RotateLeft90,
    Action::RotateRight90,
];

/// Last battle info plus everything the tank inferred from its own requests since.
///
/// The engine never reports back what happened to a request, so position,
/// facing and ammunition are tracked by assuming every request succeeded.
#[derive(Clone, Debug)]
pub(crate) struct TankMemory {
    info: Option<BattleInfo>,
    cell: Option<CellCoord>,
    facing: Direction,
    turns_since_update: u32,
    shoot_cooldown: u32,
    shells_left: Option<u32>,
}

impl TankMemory {
    pub(crate) fn new(player: PlayerId) -> Self {
        Self {
            info: None,
            cell: None,
            facing: player.initial_facing(),
            turns_since_update: 0,
            shoot_cooldown: 0,
            shells_left: None,
        }
    }

    /// Replaces the remembered grid with a fresh snapshot.
    pub(crate) fn absorb(&mut self, info: BattleInfo) {
        if let Some(cell) = info.self_cell() {
            self.cell = Some(cell);
        }
        if self.shells_left.is_none() {
            self.shells_left = Some(info.initial_ammo());
        }
        self.info = Some(info);
    }

    pub(crate) fn info(&self) -> Option<&BattleInfo> {
        self.info.as_ref()
    }

    pub(crate) const fn cell(&self) -> Option<CellCoord> {
        self.cell
    }

    pub(crate) const fn facing(&self) -> Direction {
        self.facing
    }

    pub(crate) const fn turns_since_update(&self) -> u32 {
        self.turns_since_update
    }

    pub(crate) fn tick_cooldown(&mut self) {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
    }

    pub(crate) fn can_shoot(&self) -> bool {
        self.shoot_cooldown == 0 && self.shells_left.is_some_and(|shells| shells > 0)
    }

    /// Records the request chosen this turn and updates the dead-reckoned state.
    pub(crate) fn commit(&mut self, action: Action) {
        let dimensions = self.info.as_ref().map(BattleInfo::dimensions);

        match action {
            Action::MoveForward | Action::MoveBackward => {
                if let (Some(cell), Some((columns, rows))) = (self.cell, dimensions) {
                    self.cell = Some(if action == Action::MoveForward {
                        cell.step(self.facing, columns, rows)
                    } else {
                        cell.step_back(self.facing, columns, rows)
                    });
                }
            }
            Action::RotateLeft90
            | Action::RotateRight90
            | Action::RotateLeft45
            | Action::RotateRight45 => {
                if let Some(steps) = action.rotation_steps() {
                    self.facing = self.facing.rotated(steps);
                }
            }
            Action::Shoot => {
                self.shells_left = self.shells_left.map(|shells| shells.saturating_sub(1));
                self.shoot_cooldown = SHOOT_COOLDOWN_TURNS;
            }
            Action::GetBattleInfo => self.turns_since_update = 0,
            Action::DoNothing => {}
        }

        self.turns_since_update = self.turns_since_update.saturating_add(1);
    }

    fn kind_at(&self, cell: CellCoord) -> ObjectKind {
        self.info
            .as_ref()
            .map_or(ObjectKind::Empty, |info| info.kind_at(cell))
    }

    fn offset(&self, cell: CellCoord, direction: Direction, steps: i32) -> CellCoord {
        match self.info.as_ref().map(BattleInfo::dimensions) {
            Some((columns, rows)) => cell.offset(direction, steps, columns, rows),
            None => cell,
        }
    }

    /// Cells the tank should not stand on or drive into this turn.
    ///
    /// Covers occupied neighbours plus the two rings each remembered shell may
    /// sweep through during the current turn.
    pub(crate) fn threats(&self) -> HashSet<CellCoord> {
        let mut threats = HashSet::new();
        let Some(info) = self.info.as_ref() else {
            return threats;
        };

        if let Some(cell) = self.cell {
            for direction in Direction::ALL {
                let neighbour = self.offset(cell, direction, 1);
                let kind = self.kind_at(neighbour);
                if !matches!(kind, ObjectKind::Empty | ObjectKind::Shell) {
                    let _ = threats.insert(neighbour);
                }
            }
        }

        let elapsed = i32::try_from(self.turns_since_update).unwrap_or(i32::MAX / 4);
        let far = elapsed.saturating_add(1).saturating_mul(2);
        for &shell in info.shells() {
            for distance in [far - 1, far] {
                for direction in Direction::ALL {
                    let _ = threats.insert(self.offset(shell, direction, distance));
                }
            }
        }

        threats
    }

    /// Reports whether an enemy sits within `range` cells straight ahead and a shot is ready.
    pub(crate) fn shot_lined_up(&self, range: u32) -> bool {
        if !self.can_shoot() {
            return false;
        }
        let Some(origin) = self.cell else {
            return false;
        };

        let mut cursor = origin;
        for _ in 0..range {
            cursor = self.offset(cursor, self.facing, 1);
            if cursor == origin {
                return false;
            }
            match self.kind_at(cursor) {
                ObjectKind::EnemyTank => return true,
                ObjectKind::Wall | ObjectKind::AllyTank => return false,
                ObjectKind::Empty | ObjectKind::Mine | ObjectKind::Shell => {}
            }
        }
        false
    }

    /// Drives forward when the cell ahead is safe.
    pub(crate) fn escape_forward(&self, threats: &HashSet<CellCoord>) -> Option<Action> {
        let cell = self.cell?;
        let ahead = self.offset(cell, self.facing, 1);
        (!threats.contains(&ahead)).then_some(Action::MoveForward)
    }

    /// Reaction shared by all remembering strategies: flee a threatened cell,
    /// otherwise fire at a close enemy.
    pub(crate) fn threatened_action(&self, threats: &HashSet<CellCoord>) -> Option<Action> {
        let cell = self.cell?;
        if threats.contains(&cell) {
            if let Some(action) = self.escape_forward(threats) {
                return Some(action);
            }
        }
        self.shot_lined_up(2).then_some(Action::Shoot)
    }

    /// First direction, clockwise from north, with an enemy visible within `radius` cells.
    pub(crate) fn visible_enemy_direction(&self, radius: u32) -> Option<Direction> {
        let origin = self.cell?;
        for direction in Direction::ALL {
            let mut cursor = origin;
            for _ in 0..radius {
                cursor = self.offset(cursor, direction, 1);
                match self.kind_at(cursor) {
                    ObjectKind::EnemyTank => return Some(direction),
                    ObjectKind::Wall | ObjectKind::AllyTank => break,
                    ObjectKind::Empty | ObjectKind::Mine | ObjectKind::Shell => {}
                }
            }
        }
        None
    }

    /// Rotation that leaves the tank facing a cell outside `threats`.
    pub(crate) fn rotation_toward_free_cell(&self, threats: &HashSet<CellCoord>) -> Option<Action> {
        let cell = self.cell?;
        ESCAPE_ROTATIONS.into_iter().find(|action| {
            let heading = self.facing.rotated(action.rotation_steps().unwrap_or(0));
            !threats.contains(&self.offset(cell, heading, 1))
        })
    }

    /// Shortest single rotation bringing `direction` closer to the current facing.
    pub(crate) fn rotation_toward(&self, direction: Direction) -> Action {
        match (direction.index() + 8 - self.facing.index()) % 8 {
            0 => Action::DoNothing,
            1 => Action::RotateRight45,
            2..=4 => Action::RotateRight90,
            5 | 6 => Action::RotateLeft90,
            _ => Action::RotateLeft45,
        }
    }
}
