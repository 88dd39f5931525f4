use tank_battle_core::{Action, CellCoord, DestructionCause, Event, GameOutcome, PlayerId, TankId};
use tank_battle_system_turn_log::TurnLog;

fn spawned(count: u32) -> Vec<Event> {
    (0..count)
        .map(|index| Event::TankSpawned {
            tank: TankId::new(index),
            player: if index % 2 == 0 {
                PlayerId::One
            } else {
                PlayerId::Two
            },
            player_tank_index: index / 2,
            cell: CellCoord::new(index, 0),
        })
        .collect()
}

fn received(tank: u32, action: Action) -> Event {
    Event::ActionReceived {
        tank: TankId::new(tank),
        action,
    }
}

#[test]
fn renders_actions_in_creation_order() {
    let mut log = TurnLog::new();
    log.handle(&spawned(2));

    log.handle(&[
        Event::TurnStarted { turn: 1 },
        received(0, Action::MoveForward),
        received(1, Action::RotateLeft45),
    ]);

    assert_eq!(
        log.finish_turn().as_deref(),
        Some("MoveForward, RotateLeft45")
    );
}

#[test]
fn marks_ignored_and_killed_tanks() {
    let mut log = TurnLog::new();
    log.handle(&spawned(3));

    log.handle(&[
        Event::TurnStarted { turn: 1 },
        received(0, Action::Shoot),
        Event::ActionIgnored {
            tank: TankId::new(0),
            action: Action::Shoot,
        },
        received(1, Action::MoveForward),
        received(2, Action::DoNothing),
        Event::TankDestroyed {
            tank: TankId::new(1),
            cell: CellCoord::new(2, 0),
            cause: DestructionCause::Mine,
        },
    ]);
    let first = log.finish_turn();

    log.handle(&[
        Event::TurnStarted { turn: 2 },
        received(0, Action::GetBattleInfo),
        received(2, Action::MoveBackward),
    ]);
    let second = log.finish_turn();

    assert_eq!(
        first.as_deref(),
        Some("Shoot (ignored), MoveForward (killed), DoNothing")
    );
    assert_eq!(
        second.as_deref(),
        Some("GetBattleInfo, killed, MoveBackward")
    );
}

#[test]
fn render_appends_the_result_line() {
    let mut log = TurnLog::new();
    log.handle(&spawned(2));
    log.handle(&[
        Event::TurnStarted { turn: 1 },
        received(0, Action::Shoot),
        received(1, Action::DoNothing),
        Event::TankDestroyed {
            tank: TankId::new(1),
            cell: CellCoord::new(1, 0),
            cause: DestructionCause::Shell,
        },
        Event::GameEnded {
            outcome: GameOutcome::Victory {
                winner: PlayerId::One,
                tanks_remaining: 1,
            },
        },
    ]);
    let _ = log.finish_turn();

    assert_eq!(
        log.result_line(),
        Some("Player 1 won with 1 tanks still alive")
    );
    assert_eq!(
        log.render(),
        "Shoot, DoNothing (killed)\nPlayer 1 won with 1 tanks still alive\n"
    );
}

#[test]
fn game_decided_before_any_turn_renders_only_the_result() {
    let mut log = TurnLog::new();
    log.handle(&spawned(1));
    log.handle(&[Event::GameEnded {
        outcome: GameOutcome::Victory {
            winner: PlayerId::One,
            tanks_remaining: 1,
        },
    }]);

    assert_eq!(log.finish_turn(), None);
    assert_eq!(log.render(), "Player 1 won with 1 tanks still alive\n");
}
