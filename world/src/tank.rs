//! Movable entities owned by the world.

use tank_battle_core::{
    CellCoord, Direction, PlayerId, TankId, BACKWARD_DELAY_TURNS, SHOOT_COOLDOWN_TURNS,
};

use crate::{board::Board, BackwardState};

#[derive(Clone, Debug)]
pub(crate) struct Tank {
    pub(crate) id: TankId,
    pub(crate) player: PlayerId,
    pub(crate) player_tank_index: u32,
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
    pub(crate) ammo: u32,
    pub(crate) alive: bool,
    pub(crate) shoot_cooldown: u32,
    pub(crate) backward: BackwardState,
}

impl Tank {
    pub(crate) fn spawn(
        id: TankId,
        player: PlayerId,
        player_tank_index: u32,
        cell: CellCoord,
        ammo: u32,
    ) -> Self {
        Self {
            id,
            player,
            player_tank_index,
            cell,
            direction: player.initial_facing(),
            ammo,
            alive: true,
            shoot_cooldown: 0,
            backward: BackwardState::Idle,
        }
    }

    /// Steps along the facing unless a wall blocks the target cell.
    pub(crate) fn move_forward(&mut self, board: &Board) -> Option<(CellCoord, CellCoord)> {
        let target = board.step(self.cell, self.direction);
        self.relocate(board, target)
    }

    /// Steps against the facing unless a wall blocks the target cell.
    pub(crate) fn move_backward(&mut self, board: &Board) -> Option<(CellCoord, CellCoord)> {
        let target = board.step_back(self.cell, self.direction);
        self.relocate(board, target)
    }

    fn relocate(&mut self, board: &Board, target: CellCoord) -> Option<(CellCoord, CellCoord)> {
        if board.blocks_tanks(target) {
            return None;
        }
        let from = self.cell;
        self.cell = target;
        Some((from, target))
    }

    pub(crate) fn rotate(&mut self, steps: i32) {
        self.direction = self.direction.rotated(steps);
    }

    pub(crate) const fn can_shoot(&self) -> bool {
        self.shoot_cooldown == 0 && self.ammo > 0
    }

    /// Spends a shell and arms the cooldown; callers check [`Tank::can_shoot`] first.
    pub(crate) fn shoot(&mut self) -> Shell {
        self.ammo = self.ammo.saturating_sub(1);
        self.shoot_cooldown = SHOOT_COOLDOWN_TURNS;
        Shell {
            cell: self.cell,
            direction: self.direction,
        }
    }

    pub(crate) fn cool_down(&mut self) {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
    }

    pub(crate) fn arm_backward(&mut self) {
        self.backward = BackwardState::Countdown(BACKWARD_DELAY_TURNS);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Shell {
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
}

impl Shell {
    pub(crate) fn advance(&mut self, board: &Board) {
        self.cell = board.step(self.cell, self.direction);
    }

    /// Cell the shell occupied before its latest half-step.
    pub(crate) fn previous_cell(&self, board: &Board) -> CellCoord {
        board.step_back(self.cell, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tank_battle_core::Terrain;

    fn tank_at(cell: CellCoord, player: PlayerId) -> Tank {
        Tank::spawn(TankId::new(0), player, 0, cell, 2)
    }

    #[test]
    fn walls_block_both_directions() {
        let mut board = Board::new(5, 1);
        board.set_terrain(CellCoord::new(1, 0), Terrain::Wall);
        let mut tank = tank_at(CellCoord::new(2, 0), PlayerId::One);

        assert_eq!(tank.direction, Direction::West);
        assert_eq!(tank.move_forward(&board), None);
        assert_eq!(
            tank.move_backward(&board),
            Some((CellCoord::new(2, 0), CellCoord::new(3, 0)))
        );
    }

    #[test]
    fn mines_do_not_block_movement() {
        let mut board = Board::new(3, 3);
        board.set_terrain(CellCoord::new(0, 1), Terrain::Mine);
        let mut tank = tank_at(CellCoord::new(1, 1), PlayerId::One);

        assert!(tank.move_forward(&board).is_some());
        assert_eq!(tank.cell, CellCoord::new(0, 1));
    }

    #[test]
    fn shooting_spends_ammo_and_arms_cooldown() {
        let mut tank = tank_at(CellCoord::new(0, 0), PlayerId::Two);
        assert!(tank.can_shoot());

        let shell = tank.shoot();

        assert_eq!(shell.direction, Direction::East);
        assert_eq!(tank.ammo, 1);
        assert!(!tank.can_shoot());
        for _ in 0..SHOOT_COOLDOWN_TURNS {
            tank.cool_down();
        }
        assert!(tank.can_shoot());
    }
}
