#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn engine that drives strategies against the authoritative world.
//!
//! The battle owns the world, one strategy per tank and one player per side.
//! Each turn it asks every live tank for a request in creation order, serves
//! battle-info requests before the next tank acts, then moves shells and
//! evaluates termination. All resulting events are fed to the turn log.

use serde::Serialize;
use tank_battle_core::{
    BattleSetup, CellCoord, Command, Event, GameOutcome, Player, PlayerFactory, PlayerId,
    StrategyFactory, TankId, TankStrategy, Terrain, DEFAULT_AMMO_COUNTDOWN,
};
use tank_battle_system_turn_log::TurnLog;
use tank_battle_world::{self as world, query, Rules, World};
use tracing::{debug, info};

/// Strategy bound to the tank it steers.
struct Crew {
    tank: TankId,
    player: PlayerId,
    strategy: Box<dyn TankStrategy>,
}

/// A single game from setup to outcome.
pub struct Battle {
    world: World,
    crews: Vec<Crew>,
    players: [Option<Box<dyn Player>>; 2],
    log: TurnLog,
}

impl Battle {
    /// Builds the world described by `setup` using the default ammo countdown.
    #[must_use]
    pub fn new(
        setup: &BattleSetup,
        strategies: &dyn StrategyFactory,
        players: &dyn PlayerFactory,
    ) -> Self {
        Self::with_ammo_countdown(setup, DEFAULT_AMMO_COUNTDOWN, strategies, players)
    }

    /// Builds the world described by `setup`, ending ammo-less games after `ammo_countdown` turns.
    ///
    /// Strategies are created per tank in creation order; each side's player is
    /// created alongside that side's first tank. Termination is evaluated once
    /// before any turn runs.
    #[must_use]
    pub fn with_ammo_countdown(
        setup: &BattleSetup,
        ammo_countdown: u32,
        strategies: &dyn StrategyFactory,
        players: &dyn PlayerFactory,
    ) -> Self {
        let rules =
            Rules::new(setup.max_steps, setup.num_shells).with_ammo_countdown(ammo_countdown);
        let mut world = World::new(setup.columns, setup.rows, rules);
        let mut events = Vec::new();

        let columns = setup.columns.max(1);
        for (index, terrain) in setup.terrain.iter().enumerate() {
            if *terrain == Terrain::Empty {
                continue;
            }
            let Ok(index) = u32::try_from(index) else {
                break;
            };
            world::apply(
                &mut world,
                Command::SetTerrain {
                    cell: CellCoord::new(index % columns, index / columns),
                    terrain: *terrain,
                },
                &mut events,
            );
        }

        for spawn in &setup.spawns {
            world::apply(
                &mut world,
                Command::SpawnTank {
                    player: spawn.player,
                    cell: spawn.cell,
                },
                &mut events,
            );
        }

        let mut crews = Vec::with_capacity(setup.spawns.len());
        let mut sides: [Option<Box<dyn Player>>; 2] = [None, None];
        for event in &events {
            let Event::TankSpawned {
                tank,
                player,
                player_tank_index,
                ..
            } = *event
            else {
                continue;
            };
            crews.push(Crew {
                tank,
                player,
                strategy: strategies.create(player, player_tank_index),
            });
            let side = &mut sides[player.index()];
            if side.is_none() {
                *side = Some(players.create(
                    player,
                    setup.columns,
                    setup.rows,
                    setup.max_steps,
                    setup.num_shells,
                ));
            }
        }

        world::apply(&mut world, Command::EvaluateTermination, &mut events);

        let mut log = TurnLog::new();
        log.handle(&events);

        info!(
            columns = setup.columns,
            rows = setup.rows,
            tanks = crews.len(),
            max_steps = setup.max_steps,
            "battle prepared"
        );

        Self {
            world,
            crews,
            players: sides,
            log,
        }
    }

    /// Plays one turn, returning its log line, or `None` once the game is over.
    pub fn play_turn(&mut self) -> Option<String> {
        if query::outcome(&self.world).is_some() {
            return None;
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::BeginTurn, &mut events);

        for crew in &mut self.crews {
            let alive = query::tank(&self.world, crew.tank).is_some_and(|tank| tank.alive);
            if !alive {
                continue;
            }

            let action = crew.strategy.next_action();
            let first_new = events.len();
            world::apply(
                &mut self.world,
                Command::ApplyAction {
                    tank: crew.tank,
                    action,
                },
                &mut events,
            );

            let requested = events[first_new..]
                .iter()
                .any(|event| matches!(event, Event::BattleInfoRequested { .. }));
            if requested {
                if let Some(player) = self.players[crew.player.index()].as_mut() {
                    let view = query::satellite_view(&self.world, crew.tank);
                    player.update_tank_with_battle_info(crew.strategy.as_mut(), &view);
                }
            }
        }

        world::apply(&mut self.world, Command::ResolveShells, &mut events);
        world::apply(&mut self.world, Command::EvaluateTermination, &mut events);

        self.log.handle(&events);
        let line = self.log.finish_turn();
        debug!(turn = query::turn(&self.world), line = ?line, "turn played");
        line
    }

    /// Plays turns until the game is decided and returns the outcome.
    pub fn run(&mut self) -> GameOutcome {
        loop {
            if let Some(outcome) = query::outcome(&self.world) {
                info!(
                    turns = query::turn(&self.world),
                    result = %outcome.result_line(),
                    "battle finished"
                );
                return outcome;
            }
            let _ = self.play_turn();
        }
    }

    /// Outcome once the game has been decided.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        query::outcome(&self.world)
    }

    /// Authoritative world, for read-only queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Turn log accumulated so far.
    #[must_use]
    pub fn log(&self) -> &TurnLog {
        &self.log
    }

    /// Machine-readable digest of the game so far.
    #[must_use]
    pub fn summary(&self) -> BattleSummary {
        BattleSummary {
            outcome: self.outcome(),
            turns_played: query::turn(&self.world),
            tanks_remaining: query::live_tanks(&self.world),
        }
    }
}

/// Digest of a battle suitable for serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BattleSummary {
    /// Outcome, absent while the game is still running.
    pub outcome: Option<GameOutcome>,
    /// Number of turns simulated.
    pub turns_played: u32,
    /// Live tanks per side, player one first.
    pub tanks_remaining: [u32; 2],
}
