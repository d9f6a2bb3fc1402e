//! Routing configuration file
//!
//! ```toml
//! [heuristic]
//! floor_weight = 50.0
//! building_penalty = 100.0
//! ```
//!
//! Missing keys fall back to their defaults.

use std::path::Path;

use qrnav_common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::heuristic::HeuristicConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    pub heuristic: HeuristicConfig,
}

impl NavConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: NavConfig = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.heuristic.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::{DEFAULT_BUILDING_PENALTY, DEFAULT_FLOOR_WEIGHT};

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NavConfig::from_toml("").unwrap();
        assert_eq!(config.heuristic.floor_weight, DEFAULT_FLOOR_WEIGHT);
        assert_eq!(config.heuristic.building_penalty, DEFAULT_BUILDING_PENALTY);
    }

    #[test]
    fn test_partial_override() {
        let config = NavConfig::from_toml("[heuristic]\nfloor_weight = 80.0\n").unwrap();
        assert_eq!(config.heuristic.floor_weight, 80.0);
        assert_eq!(config.heuristic.building_penalty, DEFAULT_BUILDING_PENALTY);
    }

    #[test]
    fn test_rejects_negative_and_unknown() {
        let err = NavConfig::from_toml("[heuristic]\nbuilding_penalty = -5.0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = NavConfig::from_toml("[routing]\nspeed = 1\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_heuristic_key() {
        let err = NavConfig::from_toml("[heuristic]\nfloor_wieght = 5.0\n").unwrap_err();
        match err {
            Error::Config(message) => assert!(message.contains("floor_wieght"), "{message}"),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
