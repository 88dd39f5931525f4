#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tank battle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the orchestrating systems. Systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems such as the turn log consume deterministically. Decision
//! making lives behind the [`TankStrategy`] and [`Player`] traits, which only
//! ever observe the battlefield through a [`SatelliteView`].

use serde::{Deserialize, Serialize};

/// Number of turns a tank must wait between two shots.
pub const SHOOT_COOLDOWN_TURNS: u32 = 4;

/// Cumulative hits a wall absorbs before collapsing into empty terrain.
pub const WALL_HITS_TO_DESTROY: u32 = 2;

/// Turns the game keeps running once no live tank carries ammunition.
pub const DEFAULT_AMMO_COUNTDOWN: u32 = 40;

/// Turns a backward request waits before the first reverse step executes.
pub const BACKWARD_DELAY_TURNS: u8 = 2;

/// Compass directions ordered clockwise starting at north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Diagonal toward decreasing rows and increasing columns.
    NorthEast,
    /// Toward increasing column indices.
    East,
    /// Diagonal toward increasing rows and increasing columns.
    SouthEast,
    /// Toward increasing row indices.
    South,
    /// Diagonal toward increasing rows and decreasing columns.
    SouthWest,
    /// Toward decreasing column indices.
    West,
    /// Diagonal toward decreasing rows and decreasing columns.
    NorthWest,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Position of the direction within the clockwise ordering.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Resolves a clockwise index, wrapping values past a full turn.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 8]
    }

    /// Rotates by `steps` eighth turns; negative values turn counter-clockwise.
    #[must_use]
    pub fn rotated(self, steps: i32) -> Self {
        let index = (self as i32 + steps).rem_euclid(8);
        Self::from_index(index as usize)
    }

    /// Direction pointing the other way.
    #[must_use]
    pub fn opposite(self) -> Self {
        self.rotated(4)
    }

    /// Reports whether both directions point exactly against each other.
    #[must_use]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Column and row offsets of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Moves `steps` cells along `direction`, wrapping around both board edges.
    #[must_use]
    pub fn offset(self, direction: Direction, steps: i32, columns: u32, rows: u32) -> Self {
        let (dx, dy) = direction.delta();
        wrap(
            i64::from(self.column) + i64::from(dx) * i64::from(steps),
            i64::from(self.row) + i64::from(dy) * i64::from(steps),
            columns,
            rows,
        )
    }

    /// Neighbouring cell one step along `direction` on a torus.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Self {
        self.offset(direction, 1, columns, rows)
    }

    /// Neighbouring cell one step against `direction` on a torus.
    #[must_use]
    pub fn step_back(self, direction: Direction, columns: u32, rows: u32) -> Self {
        self.offset(direction, -1, columns, rows)
    }
}

/// Wraps arbitrary integer coordinates onto a `columns` by `rows` torus.
///
/// Zero dimensions are treated as a single cell so the result is always valid.
#[must_use]
pub fn wrap(column: i64, row: i64, columns: u32, rows: u32) -> CellCoord {
    let columns = i64::from(columns.max(1));
    let rows = i64::from(rows.max(1));
    CellCoord::new(
        column.rem_euclid(columns) as u32,
        row.rem_euclid(rows) as u32,
    )
}

/// Side controlling a fleet of tanks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// The side spawned from `1` map symbols.
    One,
    /// The side spawned from `2` map symbols.
    Two,
}

impl PlayerId {
    /// Both sides in numeric order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Resolves the side spawned by a map symbol, if any.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '1' => Some(Self::One),
            '2' => Some(Self::Two),
            _ => None,
        }
    }

    /// One-based player number used in logs and map symbols.
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Zero-based index suitable for per-side arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Facing assigned to freshly spawned tanks of this side.
    #[must_use]
    pub const fn initial_facing(self) -> Direction {
        match self {
            Self::One => Direction::West,
            Self::Two => Direction::East,
        }
    }
}

/// Identifier assigned to a tank in creation order; stable for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TankId(u32);

impl TankId {
    /// Creates a new tank identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Static terrain occupying a board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground.
    #[default]
    Empty,
    /// Destructible wall that blocks tanks and absorbs shells.
    Wall,
    /// Single-use mine that destroys the first tank to enter.
    Mine,
}

/// Discrete request a strategy issues for its tank each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Advance one cell along the facing.
    MoveForward,
    /// Arm or continue the delayed reverse movement.
    MoveBackward,
    /// Turn a quarter counter-clockwise.
    RotateLeft90,
    /// Turn a quarter clockwise.
    RotateRight90,
    /// Turn an eighth counter-clockwise.
    RotateLeft45,
    /// Turn an eighth clockwise.
    RotateRight45,
    /// Fire a shell along the facing.
    Shoot,
    /// Ask the owning player for a fresh battlefield snapshot.
    GetBattleInfo,
    /// Wait.
    DoNothing,
}

impl Action {
    /// Every action in declaration order.
    pub const ALL: [Action; 9] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::RotateLeft90,
        Action::RotateRight90,
        Action::RotateLeft45,
        Action::RotateRight45,
        Action::Shoot,
        Action::GetBattleInfo,
        Action::DoNothing,
    ];

    /// Literal used for the action in turn logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MoveForward => "MoveForward",
            Self::MoveBackward => "MoveBackward",
            Self::RotateLeft90 => "RotateLeft90",
            Self::RotateRight90 => "RotateRight90",
            Self::RotateLeft45 => "RotateLeft45",
            Self::RotateRight45 => "RotateRight45",
            Self::Shoot => "Shoot",
            Self::GetBattleInfo => "GetBattleInfo",
            Self::DoNothing => "DoNothing",
        }
    }

    /// Eighth-turn steps applied by rotation actions.
    #[must_use]
    pub const fn rotation_steps(self) -> Option<i32> {
        match self {
            Self::RotateLeft90 => Some(-2),
            Self::RotateRight90 => Some(2),
            Self::RotateLeft45 => Some(-1),
            Self::RotateRight45 => Some(1),
            _ => None,
        }
    }
}

/// Symbol reported by a [`SatelliteView`] for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectSymbol {
    /// Nothing but open ground.
    Empty,
    /// A standing wall.
    Wall,
    /// An armed mine.
    Mine,
    /// A shell in flight.
    Shell,
    /// The tank that requested the view.
    SelfTank,
    /// Any other tank, tagged with its owner.
    Tank(PlayerId),
    /// Coordinates beyond the board.
    OutOfBounds,
}

/// Player-relative classification of a cell inside [`BattleInfo`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Open ground, or nothing known.
    #[default]
    Empty,
    /// A standing wall.
    Wall,
    /// An armed mine.
    Mine,
    /// A shell in flight.
    Shell,
    /// A tank of the observing side, including the observer itself.
    AllyTank,
    /// A tank of the opposing side.
    EnemyTank,
}

/// Read-only projection of the battlefield handed to players.
pub trait SatelliteView {
    /// Board dimensions as `(columns, rows)`.
    fn dimensions(&self) -> (u32, u32);

    /// Symbol describing the cell at the provided coordinates.
    fn object_at(&self, column: u32, row: u32) -> ObjectSymbol;
}

/// Decision maker controlling a single tank.
pub trait TankStrategy {
    /// Chooses the request for the current turn.
    fn next_action(&mut self) -> Action;

    /// Receives a battlefield snapshot after a [`Action::GetBattleInfo`] request.
    fn update_battle_info(&mut self, info: BattleInfo);
}

/// Side controller that turns satellite views into battle info for its tanks.
pub trait Player {
    /// Builds battle info from `view` and hands it to the requesting `strategy`.
    fn update_tank_with_battle_info(
        &mut self,
        strategy: &mut dyn TankStrategy,
        view: &dyn SatelliteView,
    );
}

/// Produces one [`Player`] per side during board setup.
pub trait PlayerFactory {
    /// Creates the controller for `player` on a `columns` by `rows` board.
    fn create(
        &self,
        player: PlayerId,
        columns: u32,
        rows: u32,
        max_steps: u32,
        num_shells: u32,
    ) -> Box<dyn Player>;
}

/// Produces one [`TankStrategy`] per tank during board setup.
pub trait StrategyFactory {
    /// Creates the strategy for the `player_tank_index`-th tank of `player`.
    fn create(&self, player: PlayerId, player_tank_index: u32) -> Box<dyn TankStrategy>;
}

/// Snapshot of the battlefield as understood by one side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleInfo {
    columns: u32,
    rows: u32,
    grid: Vec<ObjectKind>,
    self_cell: Option<CellCoord>,
    target: Option<CellCoord>,
    shells: Vec<CellCoord>,
    initial_ammo: u32,
}

impl BattleInfo {
    /// Classifies every cell of `view` from the perspective of `player`.
    #[must_use]
    pub fn from_view(view: &dyn SatelliteView, player: PlayerId, initial_ammo: u32) -> Self {
        let (columns, rows) = view.dimensions();
        let cells = u64::from(columns) * u64::from(rows);
        let mut grid = Vec::with_capacity(usize::try_from(cells).unwrap_or(0));
        let mut self_cell = None;
        let mut shells = Vec::new();

        for row in 0..rows {
            for column in 0..columns {
                let kind = match view.object_at(column, row) {
                    ObjectSymbol::Empty | ObjectSymbol::OutOfBounds => ObjectKind::Empty,
                    ObjectSymbol::Wall => ObjectKind::Wall,
                    ObjectSymbol::Mine => ObjectKind::Mine,
                    ObjectSymbol::Shell => {
                        shells.push(CellCoord::new(column, row));
                        ObjectKind::Shell
                    }
                    ObjectSymbol::SelfTank => {
                        self_cell = Some(CellCoord::new(column, row));
                        ObjectKind::AllyTank
                    }
                    ObjectSymbol::Tank(owner) if owner == player => ObjectKind::AllyTank,
                    ObjectSymbol::Tank(_) => ObjectKind::EnemyTank,
                };
                grid.push(kind);
            }
        }

        Self {
            columns,
            rows,
            grid,
            self_cell,
            target: None,
            shells,
            initial_ammo,
        }
    }

    /// Attaches a target cell chosen by the player.
    #[must_use]
    pub fn with_target(mut self, target: Option<CellCoord>) -> Self {
        self.target = target;
        self
    }

    /// Board dimensions as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Classification of the provided cell; unknown cells read as empty.
    #[must_use]
    pub fn kind_at(&self, cell: CellCoord) -> ObjectKind {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return ObjectKind::Empty;
        }
        let index = cell.row() as usize * self.columns as usize + cell.column() as usize;
        self.grid.get(index).copied().unwrap_or_default()
    }

    /// Cell occupied by the requesting tank, when it was visible.
    #[must_use]
    pub const fn self_cell(&self) -> Option<CellCoord> {
        self.self_cell
    }

    /// Target assigned by the player, if any.
    #[must_use]
    pub const fn target(&self) -> Option<CellCoord> {
        self.target
    }

    /// Cells holding shells at the time of the snapshot.
    #[must_use]
    pub fn shells(&self) -> &[CellCoord] {
        &self.shells
    }

    /// Ammunition each tank started the game with.
    #[must_use]
    pub const fn initial_ammo(&self) -> u32 {
        self.initial_ammo
    }

    /// Cells holding enemy tanks in row-major order.
    pub fn enemy_tanks(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns.max(1);
        self.grid
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == ObjectKind::EnemyTank)
            .map(move |(index, _)| {
                let index = index as u32;
                CellCoord::new(index % columns, index / columns)
            })
    }
}

/// Tank placement extracted from a board description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TankSpawn {
    /// Side owning the tank.
    pub player: PlayerId,
    /// Cell the tank starts on.
    pub cell: CellCoord,
}

/// Validated description of a battle ready to be simulated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleSetup {
    /// Hard cap on the number of simulated turns.
    pub max_steps: u32,
    /// Shells carried by every tank at spawn.
    pub num_shells: u32,
    /// Number of board columns.
    pub columns: u32,
    /// Number of board rows.
    pub rows: u32,
    /// Terrain for every cell in row-major order.
    pub terrain: Vec<Terrain>,
    /// Tank placements in scan order, which is also creation order.
    pub spawns: Vec<TankSpawn>,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Overwrites the terrain of a cell during setup.
    SetTerrain {
        /// Cell to overwrite; wrapped onto the board.
        cell: CellCoord,
        /// Terrain to install.
        terrain: Terrain,
    },
    /// Creates a tank for `player` at `cell` facing the side's initial facing.
    SpawnTank {
        /// Side owning the new tank.
        player: PlayerId,
        /// Cell the tank starts on.
        cell: CellCoord,
    },
    /// Opens a new turn and rebuilds the spatial index.
    BeginTurn,
    /// Applies a strategy request to a tank.
    ApplyAction {
        /// Tank the request belongs to.
        tank: TankId,
        /// Request issued by the tank's strategy.
        action: Action,
    },
    /// Runs both shell half-steps with collision resolution.
    ResolveShells,
    /// Checks for a winner or an exhausted-ammo tie.
    EvaluateTermination,
}

/// Reason a tank was destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// The tank entered a mined cell.
    Mine,
    /// The tank shared a cell with a shell.
    Shell,
    /// The tank shared a cell with another tank.
    TankCollision,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a tank was created.
    TankSpawned {
        /// Identifier assigned to the tank.
        tank: TankId,
        /// Side owning the tank.
        player: PlayerId,
        /// Number of earlier tanks of the same side.
        player_tank_index: u32,
        /// Cell the tank starts on.
        cell: CellCoord,
    },
    /// Announces that a new turn began.
    TurnStarted {
        /// One-based turn number.
        turn: u32,
    },
    /// Records the request a live tank submitted this turn.
    ActionReceived {
        /// Tank issuing the request.
        tank: TankId,
        /// Request as issued by the strategy.
        action: Action,
    },
    /// Confirms a tank changed cells.
    TankMoved {
        /// Tank that moved.
        tank: TankId,
        /// Cell before the move.
        from: CellCoord,
        /// Cell after the move.
        to: CellCoord,
    },
    /// Confirms a tank turned.
    TankRotated {
        /// Tank that turned.
        tank: TankId,
        /// Facing after the rotation.
        direction: Direction,
    },
    /// Reports that a backward request started its wind-up.
    BackwardMoveArmed {
        /// Tank that requested reverse movement.
        tank: TankId,
    },
    /// Confirms a tank fired.
    ShellFired {
        /// Tank that fired.
        tank: TankId,
        /// Cell the shell starts on.
        cell: CellCoord,
        /// Flight direction of the shell.
        direction: Direction,
    },
    /// Reports that a request had no effect.
    ActionIgnored {
        /// Tank whose request was dropped.
        tank: TankId,
        /// Request that was dropped.
        action: Action,
    },
    /// Asks the orchestrator to serve battle info to a tank's strategy.
    BattleInfoRequested {
        /// Tank that requested the snapshot.
        tank: TankId,
    },
    /// Reports that a shell left play.
    ShellDestroyed {
        /// Cell where the shell stopped.
        cell: CellCoord,
    },
    /// Reports that a tank was destroyed.
    TankDestroyed {
        /// Tank that was destroyed.
        tank: TankId,
        /// Cell where the tank was destroyed.
        cell: CellCoord,
        /// What destroyed the tank.
        cause: DestructionCause,
    },
    /// Reports that a wall absorbed a hit but still stands.
    WallDamaged {
        /// Cell of the wall.
        cell: CellCoord,
        /// Cumulative hits absorbed so far.
        hits: u32,
    },
    /// Reports that a wall collapsed into empty terrain.
    WallDestroyed {
        /// Cell of the former wall.
        cell: CellCoord,
    },
    /// Reports that a mine detonated and cleared its cell.
    MineDetonated {
        /// Cell of the former mine.
        cell: CellCoord,
    },
    /// Reports that no live tank carries ammunition anymore.
    AmmoCountdownStarted {
        /// Turns left before the game is declared a tie.
        turns: u32,
    },
    /// Announces the final outcome.
    GameEnded {
        /// How the game ended.
        outcome: GameOutcome,
    },
}

/// Final outcome of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameOutcome {
    /// One side still has tanks while the other has none.
    Victory {
        /// Side that won.
        winner: PlayerId,
        /// Live tanks the winner kept.
        tanks_remaining: u32,
    },
    /// Both sides lost every tank.
    TieNoTanks,
    /// No live tank had ammunition for the whole countdown.
    TieAmmoExhausted {
        /// Length of the countdown that elapsed.
        countdown: u32,
    },
    /// The turn cap was reached without a decision.
    TieMaxSteps {
        /// Configured turn cap.
        max_steps: u32,
        /// Live tanks of player 1.
        player_one_tanks: u32,
        /// Live tanks of player 2.
        player_two_tanks: u32,
    },
}

impl GameOutcome {
    /// Literal line closing the game log.
    #[must_use]
    pub fn result_line(&self) -> String {
        match self {
            Self::Victory {
                winner,
                tanks_remaining,
            } => format!(
                "Player {} won with {} tanks still alive",
                winner.number(),
                tanks_remaining
            ),
            Self::TieNoTanks => "Tie, both players have zero tanks".to_owned(),
            Self::TieAmmoExhausted { countdown } => {
                format!("Tie, both players have zero shells for {countdown} steps")
            }
            Self::TieMaxSteps {
                max_steps,
                player_one_tanks,
                player_two_tanks,
            } => format!(
                "Tie, reached max steps = {max_steps}, player 1 has {player_one_tanks} tanks, player 2 has {player_two_tanks} tanks"
            ),
        }
    }

    /// Winning side, if the game was not a tie.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        match self {
            Self::Victory { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GridView {
        columns: u32,
        rows: u32,
        symbols: Vec<ObjectSymbol>,
    }

    impl SatelliteView for GridView {
        fn dimensions(&self) -> (u32, u32) {
            (self.columns, self.rows)
        }

        fn object_at(&self, column: u32, row: u32) -> ObjectSymbol {
            if column >= self.columns || row >= self.rows {
                return ObjectSymbol::OutOfBounds;
            }
            self.symbols[(row * self.columns + column) as usize]
        }
    }

    #[test]
    fn rotations_undo_each_other() {
        for direction in Direction::ALL {
            assert_eq!(direction.rotated(-1).rotated(1), direction);
            assert_eq!(direction.rotated(2).rotated(-2), direction);
            assert_eq!(direction.opposite().opposite(), direction);
            assert!(direction.is_opposite(direction.opposite()));
        }
    }

    #[test]
    fn rotation_wraps_past_north() {
        assert_eq!(Direction::North.rotated(-1), Direction::NorthWest);
        assert_eq!(Direction::NorthWest.rotated(2), Direction::NorthEast);
        assert_eq!(Direction::West.opposite(), Direction::East);
    }

    #[test]
    fn opposite_directions_have_negated_deltas() {
        for direction in Direction::ALL {
            let (dx, dy) = direction.delta();
            assert_eq!(direction.opposite().delta(), (-dx, -dy));
        }
    }

    #[test]
    fn wrap_is_periodic_in_both_axes() {
        for k in -3_i64..=3 {
            assert_eq!(wrap(2 + k * 7, 1, 7, 5), wrap(2, 1, 7, 5));
            assert_eq!(wrap(2, 1 + k * 5, 7, 5), wrap(2, 1, 7, 5));
        }
        assert_eq!(wrap(-1, -1, 7, 5), CellCoord::new(6, 4));
    }

    #[test]
    fn step_crosses_the_board_edge() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(
            corner.step(Direction::NorthWest, 4, 3),
            CellCoord::new(3, 2)
        );
        assert_eq!(
            corner.step_back(Direction::West, 4, 3),
            CellCoord::new(1, 0)
        );
    }

    #[test]
    fn result_lines_match_log_format() {
        let victory = GameOutcome::Victory {
            winner: PlayerId::Two,
            tanks_remaining: 3,
        };
        assert_eq!(
            victory.result_line(),
            "Player 2 won with 3 tanks still alive"
        );
        let ammo_tie = GameOutcome::TieAmmoExhausted { countdown: 40 };
        assert_eq!(
            ammo_tie.result_line(),
            "Tie, both players have zero shells for 40 steps"
        );
        assert_eq!(
            GameOutcome::TieMaxSteps {
                max_steps: 50,
                player_one_tanks: 1,
                player_two_tanks: 2,
            }
            .result_line(),
            "Tie, reached max steps = 50, player 1 has 1 tanks, player 2 has 2 tanks"
        );
    }

    #[test]
    fn only_victories_have_a_winner() {
        let victory = GameOutcome::Victory {
            winner: PlayerId::One,
            tanks_remaining: 1,
        };
        assert_eq!(victory.winner(), Some(PlayerId::One));
        assert_eq!(GameOutcome::TieNoTanks.winner(), None);
        let ammo_tie = GameOutcome::TieAmmoExhausted { countdown: 40 };
        assert_eq!(ammo_tie.winner(), None);
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let outcome = GameOutcome::TieNoTanks;
        let json = serde_json::to_string(&outcome).expect("serialize");
        assert_eq!(json, r#"{"kind":"tie_no_tanks"}"#);
    }

    #[test]
    fn battle_info_classifies_relative_to_player() {
        let view = GridView {
            columns: 3,
            rows: 2,
            symbols: vec![
                ObjectSymbol::SelfTank,
                ObjectSymbol::Tank(PlayerId::Two),
                ObjectSymbol::Wall,
                ObjectSymbol::Shell,
                ObjectSymbol::Tank(PlayerId::One),
                ObjectSymbol::Mine,
            ],
        };

        let info = BattleInfo::from_view(&view, PlayerId::One, 5);

        assert_eq!(info.self_cell(), Some(CellCoord::new(0, 0)));
        assert_eq!(info.kind_at(CellCoord::new(1, 0)), ObjectKind::EnemyTank);
        assert_eq!(info.kind_at(CellCoord::new(1, 1)), ObjectKind::AllyTank);
        assert_eq!(info.kind_at(CellCoord::new(2, 1)), ObjectKind::Mine);
        assert_eq!(info.shells(), &[CellCoord::new(0, 1)]);
        assert_eq!(
            info.enemy_tanks().collect::<Vec<_>>(),
            vec![CellCoord::new(1, 0)]
        );
        assert_eq!(info.initial_ammo(), 5);
    }
}
