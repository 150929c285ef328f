/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub n_floors: i32,
    pub n_lifts: usize,
    pub tick_ms: u64,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            n_floors: 8,
            n_lifts: 2,
            tick_ms: 1000,
            seed: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            simulation: SimulationConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    // Fall back to the built-in defaults when there is no file at all
    if !path.exists() {
        log::warn!("No configuration file at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.n_lifts == 0 {
            return Err(ConfigError::Invalid("n_lifts must be at least 1".into()));
        }
        if self.simulation.n_floors < 0 {
            return Err(ConfigError::Invalid("n_floors must not be negative".into()));
        }
        Ok(())
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            "[simulation]\nn_floors = 12\nn_lifts = 3\ntick_ms = 250\nseed = 7\n",
        )
        .unwrap();

        assert_eq!(config.simulation.n_floors, 12);
        assert_eq!(config.simulation.n_lifts, 3);
        assert_eq!(config.simulation.tick_ms, 250);
        assert_eq!(config.simulation.seed, Some(7));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = parse_config("[simulation]\nn_lifts = 4\n").unwrap();

        assert_eq!(config.simulation.n_floors, 8);
        assert_eq!(config.simulation.n_lifts, 4);
        assert_eq!(config.simulation.tick_ms, 1000);
        assert_eq!(config.simulation.seed, None);
    }

    #[test]
    fn test_zero_lifts_rejected() {
        let result = parse_config("[simulation]\nn_lifts = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = parse_config("[simulation\nn_lifts = 2");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config("does/not/exist/config.toml").unwrap();
        assert_eq!(config, Config::default());
    }
}
