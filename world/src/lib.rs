#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for tank battles.

mod board;
mod collision;
mod spatial;
mod tank;
mod termination;

use tank_battle_core::{
    Action, CellCoord, Command, Event, GameOutcome, PlayerId, TankId, DEFAULT_AMMO_COUNTDOWN,
};
use tracing::debug;

use crate::{
    board::Board,
    spatial::SpatialIndex,
    tank::{Shell, Tank},
    termination::TerminationTracker,
};

/// Numeric rules fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Turn cap after which the game ends in a tie.
    pub max_steps: u32,
    /// Shells carried by every tank at spawn.
    pub num_shells: u32,
    /// Turns the game keeps running once no live tank holds ammunition.
    pub ammo_countdown: u32,
}

impl Rules {
    /// Creates rules using the default ammunition countdown.
    #[must_use]
    pub const fn new(max_steps: u32, num_shells: u32) -> Self {
        Self {
            max_steps,
            num_shells,
            ammo_countdown: DEFAULT_AMMO_COUNTDOWN,
        }
    }

    /// Overrides the ammunition countdown.
    #[must_use]
    pub const fn with_ammo_countdown(mut self, turns: u32) -> Self {
        self.ammo_countdown = turns;
        self
    }
}

/// Reverse-gear protocol a tank follows after requesting backward movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackwardState {
    /// No backward movement pending.
    Idle,
    /// Waiting for the wind-up; the payload counts the turns left before the
    /// reverse step executes.
    Countdown(u8),
    /// Moved backward last turn; another backward request keeps reversing.
    Continuing,
}

/// Represents the authoritative tank battle world state.
#[derive(Debug)]
pub struct World {
    board: Board,
    rules: Rules,
    tanks: Vec<Tank>,
    shells: Vec<Shell>,
    index: SpatialIndex,
    termination: TerminationTracker,
    turn: u32,
    outcome: Option<GameOutcome>,
}

impl World {
    /// Creates an empty board of the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32, rules: Rules) -> Self {
        let board = Board::new(columns, rows);
        let index = SpatialIndex::new(board.columns(), board.rows());
        Self {
            board,
            rules,
            tanks: Vec::new(),
            shells: Vec::new(),
            index,
            termination: TerminationTracker::new(rules.max_steps, rules.ammo_countdown),
            turn: 0,
            outcome: None,
        }
    }

    fn rebuild_index(&mut self) {
        self.index.rebuild(&self.tanks, &self.shells);
    }

    fn tank_index(&self, tank: TankId) -> Option<usize> {
        let index = usize::try_from(tank.get()).ok()?;
        self.tanks
            .get(index)
            .filter(|candidate| candidate.id == tank)
            .map(|_| index)
    }

    fn spawn_tank(&mut self, player: PlayerId, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Ok(id) = u32::try_from(self.tanks.len()) else {
            return;
        };
        let id = TankId::new(id);
        let player_tank_index = self
            .tanks
            .iter()
            .filter(|tank| tank.player == player)
            .count() as u32;
        let cell = self.board.wrapped(cell);

        self.tanks.push(Tank::spawn(
            id,
            player,
            player_tank_index,
            cell,
            self.rules.num_shells,
        ));
        out_events.push(Event::TankSpawned {
            tank: id,
            player,
            player_tank_index,
            cell,
        });
    }

    fn apply_action(&mut self, tank: TankId, action: Action, out_events: &mut Vec<Event>) {
        let Some(index) = self.tank_index(tank) else {
            return;
        };
        if !self.tanks[index].alive {
            return;
        }

        out_events.push(Event::ActionReceived { tank, action });
        if !self.advance_backward_state(index, action, out_events) {
            self.dispatch(index, action, out_events);
        }
        self.tanks[index].cool_down();
    }

    /// Steps the reverse-gear protocol, returning whether it consumed the turn.
    fn advance_backward_state(
        &mut self,
        index: usize,
        action: Action,
        out_events: &mut Vec<Event>,
    ) -> bool {
        let tank = &mut self.tanks[index];
        match tank.backward {
            BackwardState::Idle => false,
            BackwardState::Countdown(0) => {
                if let Some((from, to)) = tank.move_backward(&self.board) {
                    out_events.push(Event::TankMoved {
                        tank: tank.id,
                        from,
                        to,
                    });
                }
                tank.backward = BackwardState::Continuing;
                suppress(tank.id, action, out_events);
                true
            }
            BackwardState::Countdown(remaining) => {
                tank.backward = if action == Action::MoveForward {
                    BackwardState::Idle
                } else {
                    BackwardState::Countdown(remaining - 1)
                };
                suppress(tank.id, action, out_events);
                true
            }
            BackwardState::Continuing if action == Action::MoveBackward => {
                if let Some((from, to)) = tank.move_backward(&self.board) {
                    out_events.push(Event::TankMoved {
                        tank: tank.id,
                        from,
                        to,
                    });
                }
                true
            }
            BackwardState::Continuing => {
                tank.backward = BackwardState::Idle;
                false
            }
        }
    }

    fn dispatch(&mut self, index: usize, action: Action, out_events: &mut Vec<Event>) {
        let tank = &mut self.tanks[index];
        match action {
            Action::MoveForward => {
                if let Some((from, to)) = tank.move_forward(&self.board) {
                    out_events.push(Event::TankMoved {
                        tank: tank.id,
                        from,
                        to,
                    });
                }
            }
            Action::MoveBackward => {
                tank.arm_backward();
                out_events.push(Event::BackwardMoveArmed { tank: tank.id });
            }
            Action::RotateLeft90
            | Action::RotateRight90
            | Action::RotateLeft45
            | Action::RotateRight45 => {
                if let Some(steps) = action.rotation_steps() {
                    tank.rotate(steps);
                    out_events.push(Event::TankRotated {
                        tank: tank.id,
                        direction: tank.direction,
                    });
                }
            }
            Action::Shoot => {
                if tank.can_shoot() {
                    let shell = tank.shoot();
                    out_events.push(Event::ShellFired {
                        tank: tank.id,
                        cell: shell.cell,
                        direction: shell.direction,
                    });
                    self.shells.push(shell);
                } else {
                    out_events.push(Event::ActionIgnored {
                        tank: tank.id,
                        action,
                    });
                }
            }
            Action::GetBattleInfo => {
                out_events.push(Event::BattleInfoRequested { tank: tank.id });
            }
            Action::DoNothing => {}
        }
    }

    fn live_tanks(&self) -> [u32; 2] {
        let mut counts = [0; 2];
        for tank in self.tanks.iter().filter(|tank| tank.alive) {
            counts[tank.player.index()] += 1;
        }
        counts
    }

    fn evaluate_termination(&mut self, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }

        let turn = self.turn;
        let ammo = self.tanks.iter().any(|tank| tank.alive && tank.ammo > 0);
        let live = self.live_tanks();
        if let Some(outcome) = self.termination.evaluate(turn, live, ammo, out_events) {
            debug!(turn, result = %outcome.result_line(), "game decided");
            self.outcome = Some(outcome);
            out_events.push(Event::GameEnded { outcome });
        }
    }
}

fn suppress(tank: TankId, action: Action, out_events: &mut Vec<Event>) {
    if action != Action::DoNothing {
        out_events.push(Event::ActionIgnored { tank, action });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetTerrain { cell, terrain } => {
            world.board.set_terrain(cell, terrain);
        }
        Command::SpawnTank { player, cell } => {
            world.spawn_tank(player, cell, out_events);
        }
        Command::BeginTurn => {
            world.turn = world.turn.saturating_add(1);
            world.rebuild_index();
            debug!(
                turn = world.turn,
                shells = world.shells.len(),
                "turn started"
            );
            out_events.push(Event::TurnStarted { turn: world.turn });
        }
        Command::ApplyAction { tank, action } => {
            world.apply_action(tank, action, out_events);
        }
        Command::ResolveShells => {
            world.resolve_shells(out_events);
        }
        Command::EvaluateTermination => {
            world.evaluate_termination(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tank_battle_core::{
        CellCoord, Direction, GameOutcome, ObjectSymbol, PlayerId, SatelliteView, TankId, Terrain,
    };

    use super::{spatial::Occupant, BackwardState, World};

    /// Board dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.board.columns(), world.board.rows())
    }

    /// Number of turns started so far.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Final outcome, once the game has been decided.
    #[must_use]
    pub fn outcome(world: &World) -> Option<GameOutcome> {
        world.outcome
    }

    /// Turns left on the exhausted-ammunition countdown, if it started.
    #[must_use]
    pub fn ammo_countdown(world: &World) -> Option<u32> {
        world.termination.remaining()
    }

    /// Terrain currently installed at the wrapped cell.
    #[must_use]
    pub fn terrain_at(world: &World, cell: CellCoord) -> Terrain {
        world.board.terrain(cell)
    }

    /// Hits absorbed so far by the wall at the wrapped cell.
    #[must_use]
    pub fn wall_hits(world: &World, cell: CellCoord) -> u32 {
        world.board.cell(cell).wall_hits()
    }

    /// Live tanks per side, indexed by [`PlayerId::index`].
    #[must_use]
    pub fn live_tanks(world: &World) -> [u32; 2] {
        world.live_tanks()
    }

    /// Captures a snapshot of the requested tank.
    #[must_use]
    pub fn tank(world: &World, tank: TankId) -> Option<TankSnapshot> {
        world
            .tank_index(tank)
            .map(|index| TankSnapshot::capture(&world.tanks[index]))
    }

    /// Captures snapshots of every tank, dead ones included, in creation order.
    #[must_use]
    pub fn tanks(world: &World) -> Vec<TankSnapshot> {
        world.tanks.iter().map(TankSnapshot::capture).collect()
    }

    /// Captures snapshots of the shells in flight in firing order.
    #[must_use]
    pub fn shells(world: &World) -> Vec<ShellSnapshot> {
        world
            .shells
            .iter()
            .map(|shell| ShellSnapshot {
                cell: shell.cell,
                direction: shell.direction,
            })
            .collect()
    }

    /// Builds the satellite projection handed to the player of `requester`.
    ///
    /// Entity positions come from the spatial index as of the start of the
    /// turn while terrain is read live from the board.
    #[must_use]
    pub fn satellite_view(world: &World, requester: TankId) -> SatelliteSnapshot<'_> {
        SatelliteSnapshot {
            world,
            requester: world.tank_index(requester),
        }
    }

    /// Immutable representation of a single tank's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TankSnapshot {
        /// Identifier assigned at spawn.
        pub id: TankId,
        /// Side owning the tank.
        pub player: PlayerId,
        /// Number of earlier tanks of the same side.
        pub player_tank_index: u32,
        /// Cell currently occupied by the tank.
        pub cell: CellCoord,
        /// Current facing.
        pub direction: Direction,
        /// Shells left.
        pub ammo: u32,
        /// Whether the tank is still in play.
        pub alive: bool,
        /// Turns left before the tank may fire again.
        pub shoot_cooldown: u32,
        /// Progress of the reverse-gear protocol.
        pub backward: BackwardState,
    }

    impl TankSnapshot {
        fn capture(tank: &super::Tank) -> Self {
            Self {
                id: tank.id,
                player: tank.player,
                player_tank_index: tank.player_tank_index,
                cell: tank.cell,
                direction: tank.direction,
                ammo: tank.ammo,
                alive: tank.alive,
                shoot_cooldown: tank.shoot_cooldown,
                backward: tank.backward,
            }
        }
    }

    /// Immutable representation of a shell in flight.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ShellSnapshot {
        /// Cell currently occupied by the shell.
        pub cell: CellCoord,
        /// Flight direction.
        pub direction: Direction,
    }

    /// Read-only satellite projection of the battlefield.
    #[derive(Clone, Copy, Debug)]
    pub struct SatelliteSnapshot<'a> {
        world: &'a World,
        requester: Option<usize>,
    }

    impl SatelliteView for SatelliteSnapshot<'_> {
        fn dimensions(&self) -> (u32, u32) {
            dimensions(self.world)
        }

        fn object_at(&self, column: u32, row: u32) -> ObjectSymbol {
            let (columns, rows) = dimensions(self.world);
            if column >= columns || row >= rows {
                return ObjectSymbol::OutOfBounds;
            }

            let cell = CellCoord::new(column, row);
            let occupants = self.world.index.occupants(cell);
            let tank = occupants.iter().find_map(|occupant| match *occupant {
                Occupant::Tank(index) => Some(index),
                Occupant::Shell(_) => None,
            });
            if let Some(index) = tank {
                if Some(index) == self.requester {
                    return ObjectSymbol::SelfTank;
                }
                return ObjectSymbol::Tank(self.world.tanks[index].player);
            }
            if occupants
                .iter()
                .any(|occupant| matches!(occupant, Occupant::Shell(_)))
            {
                return ObjectSymbol::Shell;
            }

            match self.world.board.terrain(cell) {
                Terrain::Wall => ObjectSymbol::Wall,
                Terrain::Mine => ObjectSymbol::Mine,
                Terrain::Empty => ObjectSymbol::Empty,
            }
        }
    }
}
