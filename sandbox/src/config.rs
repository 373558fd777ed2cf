//! Tunables for a sandbox run, loaded from TOML.

use std::time::Duration;

use ghost_void_core::{BossKind, Command, LevelId, Vector2};
use serde::Deserialize;
use thiserror::Error;

/// Failures raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("malformed sandbox configuration")]
    Parse(#[from] toml::de::Error),
    /// The fixed timestep must be a finite, positive number of seconds.
    #[error("fixed timestep must be finite and positive, got {0}")]
    InvalidTimestep(f32),
    /// The city step must be finite and at least [`MIN_CITY_STEP_SECONDS`].
    #[error("city step must be finite and at least {}s, got {0}", MIN_CITY_STEP_SECONDS)]
    InvalidCityStep(f32),
    /// The city grid holds more than [`MAX_CITY_CELLS`] cells.
    #[error("city grid {width}x{height} exceeds {} cells", MAX_CITY_CELLS)]
    CityTooLarge {
        /// Requested columns.
        width: u32,
        /// Requested rows.
        height: u32,
    },
    /// The enemy's turn delay must be a finite, non-negative number of seconds.
    #[error("enemy turn delay must be finite and non-negative, got {0}")]
    InvalidTurnDelay(f32),
    /// The level catalog has no entry for the configured start level.
    #[error("start level {0} is not defined")]
    UnknownStartLevel(u32),
}

/// Shortest accepted city step, in seconds.
pub const MIN_CITY_STEP_SECONDS: f32 = 0.001;
/// Largest accepted number of city cells.
pub const MAX_CITY_CELLS: u64 = 1 << 20;

/// Complete configuration of a sandbox and the loop that drives it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SandboxConfig {
    /// Simulated seconds advanced per frame.
    pub fixed_dt_seconds: f32,
    /// Level loaded before the first frame.
    pub start_level: u32,
    /// Frame limit after which the loop stops on its own.
    pub max_ticks: Option<u64>,
    /// City grid settings.
    pub city: CitySettings,
    /// Battle settings.
    pub battle: BattleSettings,
    /// Bosses spawned before the first frame.
    pub bosses: Vec<BossSpawn>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            fixed_dt_seconds: 0.016,
            start_level: 1,
            max_ticks: None,
            city: CitySettings::default(),
            battle: BattleSettings::default(),
            bosses: vec![BossSpawn {
                kind: BossKind::BigBoss,
                position: Vector2::new(100.0, 0.0),
            }],
        }
    }
}

impl SandboxConfig {
    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every numeric setting the simulation depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.fixed_dt()?;

        let step = self.city.step_seconds;
        if !(step.is_finite() && step >= MIN_CITY_STEP_SECONDS) {
            return Err(ConfigError::InvalidCityStep(step));
        }

        let (width, height) = (self.city.width, self.city.height);
        if u64::from(width) * u64::from(height) > MAX_CITY_CELLS {
            return Err(ConfigError::CityTooLarge { width, height });
        }

        let delay = self.battle.enemy_turn_seconds;
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(ConfigError::InvalidTurnDelay(delay));
        }
        Ok(())
    }

    /// Fixed timestep as a duration.
    pub fn fixed_dt(&self) -> Result<Duration, ConfigError> {
        let seconds = self.fixed_dt_seconds;
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(ConfigError::InvalidTimestep(seconds));
        }
        Duration::try_from_secs_f32(seconds).map_err(|_| ConfigError::InvalidTimestep(seconds))
    }

    /// Commands that bring a fresh sandbox into its configured starting state.
    #[must_use]
    pub fn initial_commands(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.bosses.len() + 1);
        commands.push(Command::LoadLevel {
            level: LevelId::new(self.start_level),
        });
        commands.extend(self.bosses.iter().map(|spawn| Command::SpawnBoss {
            kind: spawn.kind,
            position: spawn.position,
        }));
        commands
    }
}

/// City grid dimensions and cadence.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CitySettings {
    /// Columns in the grid.
    pub width: u32,
    /// Rows in the grid.
    pub height: u32,
    /// Simulated seconds between growth steps.
    pub step_seconds: f32,
    /// Chebyshev radius covered by each power plant.
    pub power_radius: u32,
    /// Chebyshev radius covered by each water pump.
    pub water_radius: u32,
    /// Density change per step.
    pub growth_rate: u8,
}

impl Default for CitySettings {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            step_seconds: 1.0,
            power_radius: 5,
            water_radius: 5,
            growth_rate: 1,
        }
    }
}

/// Battle pacing.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BattleSettings {
    /// Seconds the enemy waits before answering.
    pub enemy_turn_seconds: f32,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            enemy_turn_seconds: 1.5,
        }
    }
}

/// A boss placed when the sandbox starts.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BossSpawn {
    /// Behaviour variant.
    pub kind: BossKind,
    /// Starting position.
    pub position: Vector2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SandboxConfig::from_toml_str("").expect("defaults");
        assert_eq!(config, SandboxConfig::default());
        assert_eq!(config.fixed_dt().expect("valid"), Duration::from_secs_f32(0.016));
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = SandboxConfig::from_toml_str(
            r#"
            start_level = 2
            max_ticks = 30

            [city]
            width = 8

            [[bosses]]
            kind = "Boss"
            position = { x = -20.0, y = 5.0 }
            "#,
        )
        .expect("valid document");

        assert_eq!(config.start_level, 2);
        assert_eq!(config.max_ticks, Some(30));
        assert_eq!(config.city.width, 8);
        assert_eq!(config.city.height, 32);
        assert_eq!(config.battle.enemy_turn_seconds, 1.5);
        assert_eq!(
            config.bosses,
            vec![BossSpawn {
                kind: BossKind::Boss,
                position: Vector2::new(-20.0, 5.0),
            }]
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = SandboxConfig::from_toml_str("tick_rate = 60").expect_err("unknown key");
        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn non_positive_timestep_is_rejected() {
        for source in ["fixed_dt_seconds = 0.0", "fixed_dt_seconds = -0.5", "fixed_dt_seconds = nan"] {
            let error = SandboxConfig::from_toml_str(source).expect_err("invalid timestep");
            assert!(matches!(error, ConfigError::InvalidTimestep(_)));
        }
    }

    #[test]
    fn degenerate_city_step_is_rejected() {
        for source in [
            "[city]\nstep_seconds = 0.0",
            "[city]\nstep_seconds = -1.0",
            "[city]\nstep_seconds = 1e-9",
            "[city]\nstep_seconds = inf",
        ] {
            let error = SandboxConfig::from_toml_str(source).expect_err("invalid city step");
            assert!(matches!(error, ConfigError::InvalidCityStep(_)), "{source}");
        }
    }

    #[test]
    fn oversized_city_is_rejected() {
        let error = SandboxConfig::from_toml_str("[city]\nwidth = 100000\nheight = 100000")
            .expect_err("grid too large");
        assert!(matches!(
            error,
            ConfigError::CityTooLarge {
                width: 100_000,
                height: 100_000
            }
        ));

        let largest = SandboxConfig::from_toml_str("[city]\nwidth = 1024\nheight = 1024");
        assert!(largest.is_ok());
    }

    #[test]
    fn invalid_turn_delay_is_rejected() {
        for source in ["[battle]\nenemy_turn_seconds = -0.5", "[battle]\nenemy_turn_seconds = nan"] {
            let error = SandboxConfig::from_toml_str(source).expect_err("invalid delay");
            assert!(matches!(error, ConfigError::InvalidTurnDelay(_)), "{source}");
        }
        assert!(SandboxConfig::from_toml_str("[battle]\nenemy_turn_seconds = 0.0").is_ok());
    }

    #[test]
    fn initial_commands_load_level_before_spawning() {
        let commands = SandboxConfig::default().initial_commands();
        assert_eq!(
            commands,
            vec![
                Command::LoadLevel {
                    level: LevelId::new(1)
                },
                Command::SpawnBoss {
                    kind: BossKind::BigBoss,
                    position: Vector2::new(100.0, 0.0),
                },
            ]
        );
    }
}
