//! Position lookup rebuilt from the owning entity collections.

use tank_battle_core::CellCoord;

use crate::tank::{Shell, Tank};

/// Index into the world's tank or shell collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Occupant {
    Tank(usize),
    Shell(usize),
}

/// Dense cell-to-occupants grid.
///
/// The index is never patched incrementally: it reflects entity positions at
/// the moment of the last [`SpatialIndex::rebuild`] and stays stale while
/// tanks move or shells are added until the next rebuild.
#[derive(Clone, Debug, Default)]
pub(crate) struct SpatialIndex {
    columns: u32,
    rows: u32,
    slots: Vec<Vec<Occupant>>,
    occupied: Vec<usize>,
}

impl SpatialIndex {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity = u64::from(columns) * u64::from(rows);
        Self {
            columns,
            rows,
            slots: vec![Vec::new(); usize::try_from(capacity).unwrap_or(0)],
            occupied: Vec::new(),
        }
    }

    /// Replaces the contents with the current positions of live tanks and shells.
    pub(crate) fn rebuild(&mut self, tanks: &[Tank], shells: &[Shell]) {
        for &slot in &self.occupied {
            if let Some(entries) = self.slots.get_mut(slot) {
                entries.clear();
            }
        }
        self.occupied.clear();

        let live_tanks = tanks
            .iter()
            .enumerate()
            .filter(|(_, tank)| tank.alive)
            .map(|(index, tank)| (tank.cell, Occupant::Tank(index)));
        let shells = shells
            .iter()
            .enumerate()
            .map(|(index, shell)| (shell.cell, Occupant::Shell(index)));

        for (cell, occupant) in live_tanks.chain(shells) {
            let Some(slot) = self.index(cell) else {
                continue;
            };
            let entries = &mut self.slots[slot];
            if entries.is_empty() {
                self.occupied.push(slot);
            }
            entries.push(occupant);
        }

        self.occupied.sort_unstable();
    }

    /// Occupants recorded for `cell` at the last rebuild.
    pub(crate) fn occupants(&self, cell: CellCoord) -> &[Occupant] {
        match self.index(cell).and_then(|slot| self.slots.get(slot)) {
            Some(entries) => entries,
            None => &[],
        }
    }

    /// Non-empty cells in row-major order.
    pub(crate) fn occupied_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns.max(1) as usize;
        self.occupied.iter().map(move |&slot| {
            let column = slot % columns;
            let row = slot / columns;
            CellCoord::new(column as u32, row as u32)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tank_battle_core::{Direction, PlayerId, TankId};

    #[test]
    fn rebuild_skips_dead_tanks_and_orders_cells() {
        let alive = Tank::spawn(TankId::new(0), PlayerId::One, 0, CellCoord::new(2, 1), 1);
        let mut dead = Tank::spawn(TankId::new(1), PlayerId::Two, 0, CellCoord::new(0, 0), 1);
        dead.alive = false;
        let shells = [Shell {
            cell: CellCoord::new(2, 1),
            direction: Direction::South,
        }];

        let mut index = SpatialIndex::new(3, 2);
        index.rebuild(&[alive, dead], &shells);

        assert!(index.occupants(CellCoord::new(0, 0)).is_empty());
        assert_eq!(
            index.occupants(CellCoord::new(2, 1)),
            &[Occupant::Tank(0), Occupant::Shell(0)]
        );
        assert_eq!(
            index.occupied_cells().collect::<Vec<_>>(),
            vec![CellCoord::new(2, 1)]
        );
    }

    #[test]
    fn rebuild_discards_previous_positions() {
        let mut tank = Tank::spawn(TankId::new(0), PlayerId::One, 0, CellCoord::new(0, 0), 1);
        let mut index = SpatialIndex::new(2, 2);
        index.rebuild(std::slice::from_ref(&tank), &[]);

        tank.cell = CellCoord::new(1, 1);
        assert_eq!(index.occupants(CellCoord::new(0, 0)), &[Occupant::Tank(0)]);

        index.rebuild(&[tank], &[]);
        assert!(index.occupants(CellCoord::new(0, 0)).is_empty());
        assert_eq!(index.occupants(CellCoord::new(1, 1)), &[Occupant::Tank(0)]);
    }
}
