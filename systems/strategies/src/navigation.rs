//! Breadth-first route planning over tank poses.

use std::collections::VecDeque;

use tank_battle_core::{Action, BattleInfo, CellCoord, Direction, ObjectKind};

/// Requests explored from every pose, in expansion order.
const MOVES: [Action; 5] = [
    Action::MoveForward,
    Action::RotateLeft45,
    Action::RotateRight45,
    Action::RotateLeft90,
    Action::RotateRight90,
];

/// Planned sequence of requests together with the cell expected after each one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Route {
    steps: VecDeque<(Action, CellCoord)>,
    expected: Option<CellCoord>,
}

impl Route {
    /// Reports whether every planned request has been handed out.
    pub(crate) fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Cell the tank should occupy if it followed the route so far.
    pub(crate) const fn expected_cell(&self) -> Option<CellCoord> {
        self.expected
    }

    /// Pops the next request and advances the expected cell.
    pub(crate) fn advance(&mut self) -> Option<Action> {
        let (action, cell) = self.steps.pop_front()?;
        self.expected = Some(cell);
        Some(action)
    }

    #[cfg(test)]
    pub(crate) fn actions(&self) -> Vec<Action> {
        self.steps.iter().map(|(action, _)| *action).collect()
    }
}

/// Plans the shortest request sequence that drives a tank from `start` onto `target`.
///
/// Poses are `(cell, facing)` pairs; forward moves wrap around the board and
/// refuse walls, mines and allied tanks. An unreachable target yields an empty
/// route anchored at `start`.
pub(crate) fn plan_route(
    info: &BattleInfo,
    start: CellCoord,
    facing: Direction,
    target: CellCoord,
) -> Route {
    let (columns, rows) = info.dimensions();
    let mut route = Route {
        steps: VecDeque::new(),
        expected: Some(start),
    };

    let columns_usize = usize::try_from(columns).unwrap_or(0);
    let rows_usize = usize::try_from(rows).unwrap_or(0);
    let pose_count = columns_usize
        .checked_mul(rows_usize)
        .and_then(|cells| cells.checked_mul(Direction::ALL.len()))
        .unwrap_or(0);
    if pose_count == 0 || start == target {
        return route;
    }

    let Some(origin) = pose_index(columns_usize, start, facing) else {
        return route;
    };

    let mut parents: Vec<Option<(usize, Action)>> = vec![None; pose_count];
    let mut visited = vec![false; pose_count];
    visited[origin] = true;
    let mut queue = VecDeque::from([origin]);

    while let Some(current) = queue.pop_front() {
        let (cell, heading) = decode_pose(columns_usize, current);

        for action in MOVES {
            let (next_cell, next_heading) = match action.rotation_steps() {
                Some(steps) => (cell, heading.rotated(steps)),
                None => {
                    let ahead = cell.step(heading, columns, rows);
                    if matches!(
                        info.kind_at(ahead),
                        ObjectKind::Wall | ObjectKind::Mine | ObjectKind::AllyTank
                    ) {
                        continue;
                    }
                    (ahead, heading)
                }
            };

            let Some(next) = pose_index(columns_usize, next_cell, next_heading) else {
                continue;
            };
            if visited[next] {
                continue;
            }
            visited[next] = true;
            parents[next] = Some((current, action));

            if next_cell == target {
                route.steps = reconstruct(&parents, columns_usize, next);
                return route;
            }
            queue.push_back(next);
        }
    }

    route
}

fn reconstruct(
    parents: &[Option<(usize, Action)>],
    columns: usize,
    goal: usize,
) -> VecDeque<(Action, CellCoord)> {
    let mut steps = VecDeque::new();
    let mut cursor = goal;
    while let Some((parent, action)) = parents.get(cursor).copied().flatten() {
        let (cell, _) = decode_pose(columns, cursor);
        steps.push_front((action, cell));
        cursor = parent;
    }
    steps
}

fn pose_index(columns: usize, cell: CellCoord, facing: Direction) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let cell_index = row.checked_mul(columns)?.checked_add(column)?;
    cell_index
        .checked_mul(Direction::ALL.len())?
        .checked_add(facing.index())
}

fn decode_pose(columns: usize, pose: usize) -> (CellCoord, Direction) {
    let cell_index = pose / Direction::ALL.len();
    let facing = Direction::from_index(pose % Direction::ALL.len());
    let columns = columns.max(1);
    let column = u32::try_from(cell_index % columns).unwrap_or(0);
    let row = u32::try_from(cell_index / columns).unwrap_or(0);
    (CellCoord::new(column, row), facing)
}
