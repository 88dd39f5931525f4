//! Shell half-stepping and per-cell collision resolution.

use tank_battle_core::{CellCoord, DestructionCause, Event};
use tracing::debug;

use crate::{
    board::{Board, WallHit},
    spatial::Occupant,
    World,
};

/// Entities condemned during one resolution pass.
///
/// Marks are only ever added; removal happens once the pass finished reading
/// the index so every cell observes the same snapshot.
struct Casualties {
    tanks: Vec<Option<DestructionCause>>,
    shells: Vec<bool>,
}

impl Casualties {
    fn new(tanks: usize, shells: usize) -> Self {
        Self {
            tanks: vec![None; tanks],
            shells: vec![false; shells],
        }
    }

    fn mark_tank(&mut self, index: usize, cause: DestructionCause) {
        if let Some(slot) = self.tanks.get_mut(index) {
            if slot.is_none() {
                *slot = Some(cause);
            }
        }
    }

    fn mark_shell(&mut self, index: usize) {
        if let Some(slot) = self.shells.get_mut(index) {
            *slot = true;
        }
    }
}

impl World {
    /// Moves every shell two cells, checking for collisions after each half-step.
    pub(crate) fn resolve_shells(&mut self, out_events: &mut Vec<Event>) {
        self.rebuild_index();
        self.resolve_head_on(out_events);

        for _ in 0..2 {
            for shell in &mut self.shells {
                shell.advance(&self.board);
            }
            self.rebuild_index();
            self.resolve_collisions(out_events);
        }
    }

    /// Catches tanks and shells that crossed into the same cell from opposite sides.
    fn resolve_head_on(&mut self, out_events: &mut Vec<Event>) {
        let mut casualties = Casualties::new(self.tanks.len(), self.shells.len());

        for (tank_index, tank) in self.tanks.iter().enumerate() {
            if !tank.alive {
                continue;
            }

            for occupant in self.index.occupants(tank.cell) {
                let Occupant::Shell(shell_index) = *occupant else {
                    continue;
                };
                let Some(shell) = self.shells.get(shell_index) else {
                    continue;
                };
                if !shell.direction.is_opposite(tank.direction) {
                    continue;
                }

                casualties.mark_shell(shell_index);
                casualties.mark_tank(tank_index, DestructionCause::Shell);
                if self.board.clear_mine(tank.cell) {
                    out_events.push(Event::MineDetonated { cell: tank.cell });
                }
                let _ = record_wall_hit(&mut self.board, tank.cell, out_events);
            }
        }

        self.remove_casualties(casualties, out_events);
    }

    fn resolve_collisions(&mut self, out_events: &mut Vec<Event>) {
        let mut casualties = Casualties::new(self.tanks.len(), self.shells.len());

        for cell in self.index.occupied_cells() {
            let mut tanks = Vec::new();
            let mut shells = Vec::new();
            for occupant in self.index.occupants(cell) {
                match *occupant {
                    Occupant::Tank(index) => tanks.push(index),
                    Occupant::Shell(index) => shells.push(index),
                }
            }

            let mut tank_cause = None;
            if !tanks.is_empty() && self.board.clear_mine(cell) {
                out_events.push(Event::MineDetonated { cell });
                tank_cause = Some(DestructionCause::Mine);
            }
            if !tanks.is_empty() && !shells.is_empty() {
                tank_cause = tank_cause.or(Some(DestructionCause::Shell));
            }
            if tanks.len() > 1 {
                tank_cause = tank_cause.or(Some(DestructionCause::TankCollision));
            }
            if let Some(cause) = tank_cause {
                for &index in &tanks {
                    casualties.mark_tank(index, cause);
                }
            }

            if shells.is_empty() {
                continue;
            }

            let mut remove_shells = record_wall_hit(&mut self.board, cell, out_events);
            remove_shells |= !tanks.is_empty();
            remove_shells |= shells.len() > 1;
            if !remove_shells {
                remove_shells = self.swapped_with_opposing_shell(shells[0]);
            }

            if remove_shells {
                for &index in &shells {
                    casualties.mark_shell(index);
                }
            }
        }

        self.remove_casualties(casualties, out_events);
    }

    /// Detects a shell that traded cells with one flying the opposite way.
    fn swapped_with_opposing_shell(&self, shell_index: usize) -> bool {
        let Some(shell) = self.shells.get(shell_index) else {
            return false;
        };
        let previous = shell.previous_cell(&self.board);

        self.index
            .occupants(previous)
            .iter()
            .filter_map(|occupant| match *occupant {
                Occupant::Shell(index) => self.shells.get(index),
                Occupant::Tank(_) => None,
            })
            .any(|other| other.direction.is_opposite(shell.direction))
    }

    fn remove_casualties(&mut self, casualties: Casualties, out_events: &mut Vec<Event>) {
        for (tank, cause) in self.tanks.iter_mut().zip(casualties.tanks) {
            let Some(cause) = cause else {
                continue;
            };
            if !tank.alive {
                continue;
            }
            tank.alive = false;
            debug!(tank = tank.id.get(), ?cause, cell = ?tank.cell, "tank destroyed");
            out_events.push(Event::TankDestroyed {
                tank: tank.id,
                cell: tank.cell,
                cause,
            });
        }

        let mut doomed = casualties.shells.into_iter();
        self.shells.retain(|shell| {
            let remove = doomed.next().unwrap_or(false);
            if remove {
                debug!(cell = ?shell.cell, "shell destroyed");
                out_events.push(Event::ShellDestroyed { cell: shell.cell });
            }
            !remove
        });
    }
}

/// Applies a hit to the wall at `cell`, reporting whether a wall absorbed it.
fn record_wall_hit(board: &mut Board, cell: CellCoord, out_events: &mut Vec<Event>) -> bool {
    match board.hit_wall(cell) {
        WallHit::Missed => false,
        WallHit::Damaged(hits) => {
            out_events.push(Event::WallDamaged { cell, hits });
            true
        }
        WallHit::Destroyed => {
            debug!(?cell, "wall destroyed");
            out_events.push(Event::WallDestroyed { cell });
            true
        }
    }
}
