//! Terrain grid wrapped onto a torus.

use tank_battle_core::{wrap, CellCoord, Direction, Terrain, WALL_HITS_TO_DESTROY};

/// Single board cell with its accumulated wall damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Cell {
    terrain: Terrain,
    wall_hits: u32,
}

impl Cell {
    pub(crate) const fn terrain(&self) -> Terrain {
        self.terrain
    }

    pub(crate) const fn wall_hits(&self) -> u32 {
        self.wall_hits
    }
}

/// Outcome of a shell or collision striking a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WallHit {
    /// The cell held no wall.
    Missed,
    /// The wall absorbed the hit and keeps standing.
    Damaged(u32),
    /// The wall collapsed and the cell reverted to empty ground.
    Destroyed,
}

/// Fixed-size terrain grid; every coordinate access wraps both axes.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
}

impl Board {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let capacity = u64::from(columns) * u64::from(rows);
        Self {
            columns,
            rows,
            cells: vec![Cell::default(); usize::try_from(capacity).unwrap_or(0)],
        }
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    /// Canonical on-board coordinate for `cell`.
    pub(crate) fn wrapped(&self, cell: CellCoord) -> CellCoord {
        wrap(
            i64::from(cell.column()),
            i64::from(cell.row()),
            self.columns,
            self.rows,
        )
    }

    /// Neighbour of `cell` one step along `direction`.
    pub(crate) fn step(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        cell.step(direction, self.columns, self.rows)
    }

    /// Neighbour of `cell` one step against `direction`.
    pub(crate) fn step_back(&self, cell: CellCoord, direction: Direction) -> CellCoord {
        cell.step_back(direction, self.columns, self.rows)
    }

    pub(crate) fn cell(&self, cell: CellCoord) -> Cell {
        let index = self.index(cell);
        self.cells.get(index).copied().unwrap_or_default()
    }

    pub(crate) fn terrain(&self, cell: CellCoord) -> Terrain {
        self.cell(cell).terrain()
    }

    pub(crate) fn set_terrain(&mut self, cell: CellCoord, terrain: Terrain) {
        let index = self.index(cell);
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = Cell {
                terrain,
                wall_hits: 0,
            };
        }
    }

    /// Registers a hit against the wall at `cell`, collapsing it once worn out.
    pub(crate) fn hit_wall(&mut self, cell: CellCoord) -> WallHit {
        let index = self.index(cell);
        let Some(slot) = self.cells.get_mut(index) else {
            return WallHit::Missed;
        };

        if slot.terrain != Terrain::Wall {
            return WallHit::Missed;
        }

        slot.wall_hits = slot.wall_hits.saturating_add(1);
        if slot.wall_hits >= WALL_HITS_TO_DESTROY {
            *slot = Cell::default();
            WallHit::Destroyed
        } else {
            WallHit::Damaged(slot.wall_hits)
        }
    }

    /// Consumes the mine at `cell`, reporting whether one was armed there.
    pub(crate) fn clear_mine(&mut self, cell: CellCoord) -> bool {
        let index = self.index(cell);
        match self.cells.get_mut(index) {
            Some(slot) if slot.terrain == Terrain::Mine => {
                *slot = Cell::default();
                true
            }
            _ => false,
        }
    }

    /// Tanks may enter any cell that does not hold a wall.
    pub(crate) fn blocks_tanks(&self, cell: CellCoord) -> bool {
        self.terrain(cell) == Terrain::Wall
    }

    fn index(&self, cell: CellCoord) -> usize {
        let cell = self.wrapped(cell);
        cell.row() as usize * self.columns as usize + cell.column() as usize
    }
}
