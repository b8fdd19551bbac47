use std::time::Duration;

use crate::enemy::DEFAULT_COOLDOWN;
use crate::error::{Error, Result};
use crate::grid::MIN_SIZE;

const DEFAULT_SIZE: usize = 20;
const DEFAULT_ENEMY_HEALTH: i32 = 3;
const DEFAULT_ENEMY_COUNT: usize = 1;
const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub size: usize,
    pub enemy_health: i32,
    pub enemy_count: usize,
    pub enemy_cooldown: Duration,
    pub render_fps: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            enemy_health: DEFAULT_ENEMY_HEALTH,
            enemy_count: DEFAULT_ENEMY_COUNT,
            enemy_cooldown: DEFAULT_COOLDOWN,
            render_fps: DEFAULT_RENDER_FPS,
        }
    }
}

impl GameConfig {
    /// Reads `MAZE_SIZE`, `MAZE_ENEMY_HP`, `MAZE_ENEMIES`, `MAZE_ENEMY_MS`
    /// and `MAZE_FPS`. Missing or unparsable values keep their
    /// default, as do zeros for everything but the enemy health.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let positive = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };
        Self {
            size: positive("MAZE_SIZE").map_or(defaults.size, |v| v as usize),
            enemy_health: lookup("MAZE_ENEMY_HP")
                .and_then(|v| v.trim().parse::<i32>().ok())
                .unwrap_or(defaults.enemy_health),
            enemy_count: positive("MAZE_ENEMIES").map_or(defaults.enemy_count, |v| v as usize),
            enemy_cooldown: positive("MAZE_ENEMY_MS")
                .map_or(defaults.enemy_cooldown, Duration::from_millis),
            render_fps: positive("MAZE_FPS").unwrap_or(defaults.render_fps),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size < MIN_SIZE {
            return Err(Error::InvalidConfiguration { size: self.size });
        }
        Ok(())
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> GameConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GameConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]), GameConfig::default());
    }

    #[test]
    fn reads_values() {
        let cfg = config(&[
            ("MAZE_SIZE", "12"),
            ("MAZE_ENEMY_HP", "-2"),
            ("MAZE_ENEMIES", "3"),
            ("MAZE_ENEMY_MS", " 250 "),
            ("MAZE_FPS", "30"),
        ]);
        assert_eq!(cfg.size, 12);
        assert_eq!(cfg.enemy_health, -2);
        assert_eq!(cfg.enemy_count, 3);
        assert_eq!(cfg.enemy_cooldown, Duration::from_millis(250));
        assert_eq!(cfg.frame_time(), Duration::from_micros(33_333));
    }

    #[test]
    fn junk_falls_back() {
        let cfg = config(&[("MAZE_SIZE", "big"), ("MAZE_FPS", "0"), ("MAZE_ENEMY_HP", "x")]);
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn small_maps_fail_validation() {
        let cfg = config(&[("MAZE_SIZE", "5")]);
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidConfiguration { size: 5 })
        ));
        assert!(GameConfig::default().validate().is_ok());
    }
}
