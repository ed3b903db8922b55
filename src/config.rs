use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

#[cfg(feature = "gym")]
use crate::gym::RoomsConfig;
use crate::{
    algo::{Bootstrap, TdAgent, TdAgentConfig},
    episode::EpisodeDriver,
    Error, Result,
};

/// Immutable configuration of a training run
///
/// Built once, then used to construct the agent and the episode driver, which both
/// discount with `agent.gamma`. Every field has a default, so a JSON file only needs the
/// values it changes:
///
/// ```json
/// { "algorithm": "q_learning", "episodes": 500, "agent": { "epsilon_decay": 0.001 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// **Default**: SARSA
    pub algorithm: Bootstrap,
    /// **Default**: `200`
    pub episodes: usize,
    pub agent: TdAgentConfig,
    #[cfg(feature = "gym")]
    pub rooms: RoomsConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            algorithm: Bootstrap::Sarsa,
            episodes: 200,
            agent: TdAgentConfig::default(),
            #[cfg(feature = "gym")]
            rooms: RoomsConfig::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::InvalidConfiguration(String::from(
                "`episodes` must be positive",
            )));
        }
        self.agent.validate()?;
        #[cfg(feature = "gym")]
        self.rooms.validate()?;
        Ok(())
    }

    pub fn build_agent(&self) -> Result<TdAgent> {
        TdAgent::new(self.agent.clone(), self.algorithm)
    }

    pub fn build_driver(&self) -> Result<EpisodeDriver> {
        EpisodeDriver::new(self.agent.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ExperimentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.build_agent().unwrap().bootstrap(), Bootstrap::Sarsa);
        assert_eq!(config.build_driver().unwrap().gamma(), config.agent.gamma);
    }

    #[test]
    fn partial_json() {
        let config = ExperimentConfig::from_json_str(
            r#"{
                "algorithm": "q_learning",
                "episodes": 50,
                "agent": { "alpha": 0.2, "seed": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, Bootstrap::QLearning);
        assert_eq!(config.episodes, 50);
        assert_eq!(config.agent.seed, Some(3));
        assert_eq!(config.agent.alpha, 0.2);
        assert_eq!(config.agent.gamma, TdAgentConfig::default().gamma);

        let agent = config.build_agent().unwrap();
        assert_eq!(agent.bootstrap(), Bootstrap::QLearning);
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn invalid_json_values() {
        for json in [
            r#"{ "episodes": 0 }"#,
            r#"{ "agent": { "nr_actions": 0 } }"#,
            r#"{ "agent": { "alpha": 1.2 } }"#,
        ] {
            assert!(
                matches!(
                    ExperimentConfig::from_json_str(json),
                    Err(Error::InvalidConfiguration(_))
                ),
                "{json}"
            );
        }
        assert!(matches!(
            ExperimentConfig::from_json_str(r#"{ "agent": { "nr_actions": -1 } }"#),
            Err(Error::Serde(_))
        ));
    }
}
