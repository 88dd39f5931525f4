#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pluggable decision making for tank battles.
//!
//! Strategies choose one request per turn for a single tank and only learn
//! about the battlefield through the [`tank_battle_core::BattleInfo`] their
//! player hands them. Players turn the engine's satellite view into that info,
//! optionally assigning targets. Nothing in this crate touches the world
//! directly.

mod basic;
mod chasing;
mod memory;
mod navigation;
mod players;
mod scripted;

pub use basic::BasicStrategy;
pub use chasing::ChasingStrategy;
pub use players::{AggressivePlayer, DefensivePlayer};
pub use scripted::{BattleInfoInbox, RandomStrategy, ScriptedStrategy};

use serde::Deserialize;
use tank_battle_core::{Player, PlayerFactory, PlayerId, StrategyFactory, TankStrategy};

/// Strategy families selectable from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// [`BasicStrategy`].
    Basic,
    /// [`ChasingStrategy`].
    Chasing,
    /// [`RandomStrategy`] seeded per tank.
    Random,
    /// [`ScriptedStrategy`] with an empty script.
    Idle,
}

impl StrategyKind {
    /// Strategy used for `player` when configuration does not name one.
    #[must_use]
    pub const fn default_for(player: PlayerId) -> Self {
        match player {
            PlayerId::One => Self::Basic,
            PlayerId::Two => Self::Chasing,
        }
    }
}

/// Player families selectable from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// [`DefensivePlayer`].
    Defensive,
    /// [`AggressivePlayer`].
    Aggressive,
}

impl PlayerKind {
    /// Player used for `player` when configuration does not name one.
    #[must_use]
    pub const fn default_for(player: PlayerId) -> Self {
        match player {
            PlayerId::One => Self::Defensive,
            PlayerId::Two => Self::Aggressive,
        }
    }
}

/// Creates strategies according to a per-side [`StrategyKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfiguredStrategyFactory {
    kinds: [StrategyKind; 2],
    seed: u64,
}

impl ConfiguredStrategyFactory {
    /// Creates a factory using `kinds[player.index()]` for each side.
    ///
    /// `seed` only affects [`StrategyKind::Random`].
    #[must_use]
    pub const fn new(kinds: [StrategyKind; 2], seed: u64) -> Self {
        Self { kinds, seed }
    }

    /// Strategy family assigned to `player`.
    #[must_use]
    pub const fn kind(&self, player: PlayerId) -> StrategyKind {
        self.kinds[player.index()]
    }
}

impl Default for ConfiguredStrategyFactory {
    fn default() -> Self {
        Self::new(
            [
                StrategyKind::default_for(PlayerId::One),
                StrategyKind::default_for(PlayerId::Two),
            ],
            0,
        )
    }
}

impl StrategyFactory for ConfiguredStrategyFactory {
    fn create(&self, player: PlayerId, player_tank_index: u32) -> Box<dyn TankStrategy> {
        match self.kind(player) {
            StrategyKind::Basic => Box::new(BasicStrategy::new(player)),
            StrategyKind::Chasing => Box::new(ChasingStrategy::new(player)),
            StrategyKind::Random => Box::new(RandomStrategy::for_tank(
                self.seed,
                player,
                player_tank_index,
            )),
            StrategyKind::Idle => Box::new(ScriptedStrategy::default()),
        }
    }
}

/// Creates players according to a per-side [`PlayerKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfiguredPlayerFactory {
    kinds: [PlayerKind; 2],
}

impl ConfiguredPlayerFactory {
    /// Creates a factory using `kinds[player.index()]` for each side.
    #[must_use]
    pub const fn new(kinds: [PlayerKind; 2]) -> Self {
        Self { kinds }
    }

    /// Player family assigned to `player`.
    #[must_use]
    pub const fn kind(&self, player: PlayerId) -> PlayerKind {
        self.kinds[player.index()]
    }
}

impl Default for ConfiguredPlayerFactory {
    fn default() -> Self {
        Self::new([
            PlayerKind::default_for(PlayerId::One),
            PlayerKind::default_for(PlayerId::Two),
        ])
    }
}

impl PlayerFactory for ConfiguredPlayerFactory {
    fn create(
        &self,
        player: PlayerId,
        _columns: u32,
        _rows: u32,
        _max_steps: u32,
        num_shells: u32,
    ) -> Box<dyn Player> {
        match self.kind(player) {
            PlayerKind::Defensive => Box::new(DefensivePlayer::new(player, num_shells)),
            PlayerKind::Aggressive => Box::new(AggressivePlayer::new(player, num_shells)),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tank_battle_core::{BattleInfo, ObjectSymbol, PlayerId, SatelliteView};

    /// Satellite view drawn with the canonical board characters.
    pub(crate) struct GridView {
        rows: Vec<Vec<char>>,
    }

    impl GridView {
        pub(crate) fn new(rows: &[&str]) -> Self {
            Self {
                rows: rows.iter().map(|row| row.chars().collect()).collect(),
            }
        }
    }

    impl SatelliteView for GridView {
        fn dimensions(&self) -> (u32, u32) {
            let columns = self.rows.first().map_or(0, Vec::len);
            (columns as u32, self.rows.len() as u32)
        }

        fn object_at(&self, column: u32, row: u32) -> ObjectSymbol {
            let Some(symbol) = self
                .rows
                .get(row as usize)
                .and_then(|cells| cells.get(column as usize))
            else {
                return ObjectSymbol::OutOfBounds;
            };
            match symbol {
                '#' => ObjectSymbol::Wall,
                '@' => ObjectSymbol::Mine,
                '*' => ObjectSymbol::Shell,
                '%' => ObjectSymbol::SelfTank,
                '1' => ObjectSymbol::Tank(PlayerId::One),
                '2' => ObjectSymbol::Tank(PlayerId::Two),
                _ => ObjectSymbol::Empty,
            }
        }
    }

    pub(crate) fn info_from_rows(rows: &[&str], player: PlayerId, ammo: u32) -> BattleInfo {
        BattleInfo::from_view(&GridView::new(rows), player, ammo)
    }
}
