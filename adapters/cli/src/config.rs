//! Optional TOML configuration selecting strategies and rule tweaks.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tank_battle_core::{PlayerId, DEFAULT_AMMO_COUNTDOWN};
use tank_battle_system_strategies::{
    ConfiguredPlayerFactory, ConfiguredStrategyFactory, PlayerKind, StrategyKind,
};
use thiserror::Error;

/// Failures while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or has unexpected fields.
    #[error("failed to parse config toml")]
    Parse(#[from] toml::de::Error),
    /// A zero-length countdown would end every ammo-less game immediately.
    #[error("ammo_countdown must be at least 1")]
    ZeroCountdown,
}

/// Strategy and player choices for one side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SideConfig {
    strategy: Option<StrategyKind>,
    player: Option<PlayerKind>,
}

/// Contents of the configuration file; every field is optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BattleConfig {
    player_one: SideConfig,
    player_two: SideConfig,
    ammo_countdown: u32,
    seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            player_one: SideConfig::default(),
            player_two: SideConfig::default(),
            ammo_countdown: DEFAULT_AMMO_COUNTDOWN,
            seed: 0,
        }
    }
}

impl BattleConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses and validates configuration text.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        if config.ammo_countdown == 0 {
            return Err(ConfigError::ZeroCountdown);
        }
        Ok(config)
    }

    pub(crate) const fn ammo_countdown(&self) -> u32 {
        self.ammo_countdown
    }

    fn side(&self, player: PlayerId) -> SideConfig {
        match player {
            PlayerId::One => self.player_one,
            PlayerId::Two => self.player_two,
        }
    }

    fn strategy_kind(&self, player: PlayerId) -> StrategyKind {
        self.side(player)
            .strategy
            .unwrap_or(StrategyKind::default_for(player))
    }

    fn player_kind(&self, player: PlayerId) -> PlayerKind {
        self.side(player)
            .player
            .unwrap_or(PlayerKind::default_for(player))
    }

    pub(crate) fn strategy_factory(&self) -> ConfiguredStrategyFactory {
        ConfiguredStrategyFactory::new(
            PlayerId::ALL.map(|player| self.strategy_kind(player)),
            self.seed,
        )
    }

    pub(crate) fn player_factory(&self) -> ConfiguredPlayerFactory {
        ConfiguredPlayerFactory::new(PlayerId::ALL.map(|player| self.player_kind(player)))
    }
}
