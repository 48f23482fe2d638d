//! `wave.toml` handling.
//!
//! Every field has a default, so a missing file or a partial one is fine.

use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    /// Initial window size in physical pixels
    pub window_size: [u32; 2],
    /// Logical playfield every state draws and collides in, stretched over
    /// the window
    pub reference_size: [f32; 2],
    /// Show the frame stats overlay on startup
    pub show_stats: bool,
    pub menu: MenuConfig,
    pub play: PlayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "wave".to_string(),
            window_size: [1280, 720],
            reference_size: [1280.0, 720.0],
            show_stats: false,
            menu: MenuConfig::default(),
            play: PlayConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Seconds between background particles
    pub particle_interval: f32,
    pub particle_speed: [f32; 2],
    pub particle_size: f32,
    pub trail_interval: f32,
    pub trail_lifetime: f32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            particle_interval: 0.12,
            particle_speed: [300.0, 600.0],
            particle_size: 16.0,
            trail_interval: 0.05,
            trail_lifetime: 0.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Seconds between enemy spawns
    pub enemy_interval: f32,
    pub enemy_speed: [f32; 2],
    pub enemy_size: f32,
    pub enemy_trail_interval: f32,
    pub enemy_trail_lifetime: f32,
    pub player_speed: f32,
    pub player_size: f32,
    pub player_health: u32,
    /// Grace period after a hit, in seconds
    pub invulnerability: f32,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            enemy_interval: 5.0,
            enemy_speed: [100.0, 500.0],
            enemy_size: 16.0,
            enemy_trail_interval: 0.02,
            enemy_trail_lifetime: 0.3,
            player_speed: 400.0,
            player_size: 32.0,
            player_health: 3,
            invulnerability: 1.0,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would build a zero-length timer or an empty
    /// random range
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("reference_size", self.reference_size[0])?;
        positive("reference_size", self.reference_size[1])?;

        let menu = &self.menu;
        positive("menu.particle_interval", menu.particle_interval)?;
        positive("menu.particle_size", menu.particle_size)?;
        positive("menu.trail_interval", menu.trail_interval)?;
        positive("menu.trail_lifetime", menu.trail_lifetime)?;
        ordered("menu.particle_speed", menu.particle_speed)?;

        let play = &self.play;
        positive("play.enemy_interval", play.enemy_interval)?;
        positive("play.enemy_size", play.enemy_size)?;
        positive("play.enemy_trail_interval", play.enemy_trail_interval)?;
        positive("play.enemy_trail_lifetime", play.enemy_trail_lifetime)?;
        positive("play.player_size", play.player_size)?;
        ordered("play.enemy_speed", play.enemy_speed)?;
        if !(play.invulnerability >= 0.0 && play.invulnerability.is_finite()) {
            return Err(invalid(
                "play.invulnerability",
                format!("{} is not a finite, non-negative duration", play.invulnerability),
            ));
        }
        Ok(())
    }

    /// Like [`Config::load`], falling back to defaults. A missing file is
    /// expected, anything else is worth a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => {
                log::info!("loaded {config:?}");
                config
            }
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config file, using defaults");
                Self::default()
            }
            Err(err) => {
                log::warn!("{err}, using defaults");
                Self::default()
            }
        }
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // also catches NaN
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be greater than zero")))
    }
}

fn ordered(field: &'static str, [min, max]: [f32; 2]) -> Result<(), ConfigError> {
    if !(min.is_finite() && max.is_finite()) {
        return Err(invalid(field, format!("[{min}, {max}] is not finite")));
    }
    if min > max {
        return Err(invalid(field, format!("min {min} is above max {max}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            title = "waves"
            show_stats = true

            [play]
            enemy_interval = 2.5
            enemy_speed = [50.0, 60.0]
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "waves");
        assert!(config.show_stats);
        assert_eq!(config.play.enemy_interval, 2.5);
        assert_eq!(config.play.enemy_speed, [50.0, 60.0]);
        assert_eq!(config.play.player_health, 3);
        assert_eq!(config.menu, MenuConfig::default());
        assert_eq!(config.reference_size, [1280.0, 720.0]);
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(toml::from_str::<Config>("show_stats = \"yes\"").is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let path = std::env::temp_dir().join("wave-config-that-does-not-exist.toml");
        assert!(matches!(Config::load(&path), Err(ConfigError::Read { .. })));
        assert_eq!(Config::load_or_default(&path), Config::default());
    }

    #[test]
    fn malformed_file_falls_back() {
        let path = std::env::temp_dir().join(format!("wave-config-{}.toml", std::process::id()));
        fs::write(&path, "title = ").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(Config::load_or_default(&path), Config::default());

        fs::remove_file(&path).unwrap();
    }

    fn rejected_field(toml: &str) -> &'static str {
        let config: Config = toml::from_str(toml).unwrap();
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid field, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_intervals_are_rejected() {
        assert_eq!(
            rejected_field("[menu]\nparticle_interval = 0.0"),
            "menu.particle_interval"
        );
        assert_eq!(rejected_field("[menu]\ntrail_interval = -1.0"), "menu.trail_interval");
        assert_eq!(rejected_field("[play]\nenemy_interval = 0.0"), "play.enemy_interval");
        assert_eq!(
            rejected_field("[play]\nenemy_trail_interval = 0.0"),
            "play.enemy_trail_interval"
        );
        assert_eq!(
            rejected_field("[play]\nenemy_trail_lifetime = 0.0"),
            "play.enemy_trail_lifetime"
        );
        assert_eq!(rejected_field("[play]\nenemy_interval = nan"), "play.enemy_interval");
    }

    #[test]
    fn inverted_speed_ranges_are_rejected() {
        assert_eq!(
            rejected_field("[menu]\nparticle_speed = [600.0, 300.0]"),
            "menu.particle_speed"
        );
        assert_eq!(
            rejected_field("[play]\nenemy_speed = [500.0, 100.0]"),
            "play.enemy_speed"
        );

        let config: Config = toml::from_str("[play]\nenemy_speed = [200.0, 200.0]").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_invulnerability_is_allowed() {
        let config: Config = toml::from_str("[play]\ninvulnerability = 0.0").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            rejected_field("[play]\ninvulnerability = -0.5"),
            "play.invulnerability"
        );
    }

    #[test]
    fn invalid_file_falls_back() {
        let path = std::env::temp_dir().join(format!(
            "wave-config-invalid-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[menu]\nparticle_interval = 0.0\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Invalid {
                field: "menu.particle_interval",
                ..
            })
        ));
        assert_eq!(Config::load_or_default(&path), Config::default());

        fs::remove_file(&path).unwrap();
    }
}
