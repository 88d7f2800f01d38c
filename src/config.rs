//! Runtime configuration read from `TETRIS_*` environment variables.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};

use crate::core::{PieceGenerator, Randomizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Piece generator seed.
    pub seed: u32,
    pub randomizer: Randomizer,
    /// Start with grid dots visible.
    pub show_grid: bool,
    /// JSON-lines event log destination.
    pub event_log: Option<PathBuf>,
    /// `tracing` output destination; logging is off when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            randomizer: Randomizer::Uniform,
            show_grid: false,
            event_log: None,
            log_file: None,
        }
    }
}

impl GameConfig {
    /// Create from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup.
    ///
    /// Unset and blank values fall back to defaults; values that are set but
    /// malformed are errors.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = match var("TETRIS_SEED") {
            Some(v) => v
                .parse::<u32>()
                .with_context(|| format!("invalid TETRIS_SEED value: {}", v))?,
            None => clock_seed(),
        };

        let randomizer = match var("TETRIS_RANDOMIZER") {
            Some(v) => Randomizer::from_str(&v)
                .ok_or_else(|| anyhow!("invalid TETRIS_RANDOMIZER value: {} (expected uniform or bag)", v))?,
            None => Randomizer::Uniform,
        };

        let show_grid = match var("TETRIS_GRID") {
            Some(v) => parse_flag(&v)
                .ok_or_else(|| anyhow!("invalid TETRIS_GRID value: {}", v))?,
            None => false,
        };

        Ok(Self {
            seed,
            randomizer,
            show_grid,
            event_log: var("TETRIS_EVENT_LOG").map(PathBuf::from),
            log_file: var("TETRIS_LOG").map(PathBuf::from),
        })
    }

    pub fn piece_generator(&self) -> PieceGenerator {
        PieceGenerator::new(self.seed, self.randomizer.clone())
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Seed from the wall clock; zero if the clock is before the epoch.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_values() {
        let config = GameConfig::from_vars(vars(&[
            ("TETRIS_SEED", "42"),
            ("TETRIS_RANDOMIZER", "bag"),
            ("TETRIS_GRID", "true"),
            ("TETRIS_EVENT_LOG", "/tmp/events.jsonl"),
            ("TETRIS_LOG", " /tmp/tetris.log "),
        ]))
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.randomizer, Randomizer::Bag);
        assert!(config.show_grid);
        assert_eq!(config.event_log, Some(PathBuf::from("/tmp/events.jsonl")));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/tetris.log")));
    }

    #[test]
    fn test_defaults_when_unset_or_blank() {
        let config = GameConfig::from_vars(vars(&[("TETRIS_EVENT_LOG", "  ")])).unwrap();

        assert_eq!(config.randomizer, Randomizer::Uniform);
        assert!(!config.show_grid);
        assert_eq!(config.event_log, None);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = GameConfig::from_vars(vars(&[("TETRIS_SEED", "-3")])).unwrap_err();
        assert!(err.to_string().contains("TETRIS_SEED"));

        let err = GameConfig::from_vars(vars(&[("TETRIS_RANDOMIZER", "srs")])).unwrap_err();
        assert!(err.to_string().contains("TETRIS_RANDOMIZER"));

        assert!(GameConfig::from_vars(vars(&[("TETRIS_GRID", "maybe")])).is_err());
    }
}
