use serde::Deserialize;
use tank_battle_core::{
    Action, BattleInfo, ObjectSymbol, PlayerFactory, PlayerId, SatelliteView, StrategyFactory,
};
use tank_battle_system_strategies::{
    ConfiguredPlayerFactory, ConfiguredStrategyFactory, PlayerKind, StrategyKind,
};

#[derive(Debug, Deserialize)]
struct Side {
    strategy: StrategyKind,
    player: PlayerKind,
}

struct Corridor;

impl SatelliteView for Corridor {
    fn dimensions(&self) -> (u32, u32) {
        (6, 3)
    }

    fn object_at(&self, column: u32, row: u32) -> ObjectSymbol {
        match (column, row) {
            (0, 1) => ObjectSymbol::SelfTank,
            (3, 1) => ObjectSymbol::Tank(PlayerId::One),
            (0..=5, 0..=2) => ObjectSymbol::Empty,
            _ => ObjectSymbol::OutOfBounds,
        }
    }
}

#[test]
fn kinds_deserialize_from_lowercase_names() {
    let side: Side = toml::from_str("strategy = \"chasing\"\nplayer = \"aggressive\"\n")
        .expect("valid side table");

    assert_eq!(side.strategy, StrategyKind::Chasing);
    assert_eq!(side.player, PlayerKind::Aggressive);
    let unknown = toml::from_str::<Side>("strategy = \"sniper\"\nplayer = \"defensive\"\n");
    assert!(unknown.is_err());
}

#[test]
fn default_factories_pair_sentries_against_hunters() {
    let strategies = ConfiguredStrategyFactory::default();
    let players = ConfiguredPlayerFactory::default();

    assert_eq!(strategies.kind(PlayerId::One), StrategyKind::Basic);
    assert_eq!(strategies.kind(PlayerId::Two), StrategyKind::Chasing);
    assert_eq!(players.kind(PlayerId::One), PlayerKind::Defensive);
    assert_eq!(players.kind(PlayerId::Two), PlayerKind::Aggressive);
}

#[test]
fn hunter_receives_a_target_and_closes_in() {
    let strategies = ConfiguredStrategyFactory::default();
    let players = ConfiguredPlayerFactory::default();
    let mut strategy = strategies.create(PlayerId::Two, 0);
    let mut player = players.create(PlayerId::Two, 6, 3, 100, 0);

    assert_eq!(strategy.next_action(), Action::GetBattleInfo);
    player.update_tank_with_battle_info(strategy.as_mut(), &Corridor);

    assert_eq!(strategy.next_action(), Action::MoveForward);
}

#[test]
fn idle_strategy_never_acts() {
    let factory = ConfiguredStrategyFactory::new([StrategyKind::Idle, StrategyKind::Idle], 3);
    let mut strategy = factory.create(PlayerId::One, 2);

    strategy.update_battle_info(BattleInfo::from_view(&Corridor, PlayerId::One, 1));

    for _ in 0..5 {
        assert_eq!(strategy.next_action(), Action::DoNothing);
    }
}

#[test]
fn random_factory_streams_depend_on_the_seed() {
    let draw = |seed: u64| {
        let factory =
            ConfiguredStrategyFactory::new([StrategyKind::Random, StrategyKind::Random], seed);
        let mut strategy = factory.create(PlayerId::Two, 0);
        (0..24).map(|_| strategy.next_action()).collect::<Vec<_>>()
    };

    assert_eq!(draw(11), draw(11));
    assert_ne!(draw(11), draw(12));
}
