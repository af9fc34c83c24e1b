use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{BlackjackError, RuleSet};

/// Inputs for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of initial hands to deal
    pub hands: u64,
    /// RNG seed; `None` seeds from entropy and the run is not reproducible
    pub seed: Option<u64>,
    pub rules: RuleSet,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            hands: 300_000,
            seed: Some(7),
            rules: RuleSet::default(),
        }
    }
}

impl SimulationConfig {
    pub fn new(hands: u64, seed: Option<u64>, rules: RuleSet) -> Self {
        Self { hands, seed, rules }
    }

    pub fn validate(&self) -> Result<(), BlackjackError> {
        if self.hands == 0 {
            return Err(BlackjackError::InvalidConfiguration(
                "hand count must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, BlackjackError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BlackjackError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlackjackPayout;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hands, 300_000);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_zero_hands_rejected() {
        let config = SimulationConfig::new(0, None, RuleSet::default());
        assert!(matches!(
            config.validate(),
            Err(BlackjackError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SimulationConfig::from_json_str(r#"{"hands": 1000, "seed": null}"#).unwrap();
        assert_eq!(config.hands, 1000);
        assert_eq!(config.seed, None);
        assert_eq!(config.rules, RuleSet::default());
    }

    #[test]
    fn test_from_json_with_rules() {
        let json = r#"{
            "hands": 50,
            "seed": 3,
            "rules": {
                "hit_soft_17": false,
                "late_surrender": false,
                "double_after_split": true,
                "resplit_limit": 1,
                "dealer_peek": true,
                "blackjack_payout": "6:5"
            }
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.rules.resplit_limit, 1);
        assert_eq!(config.rules.blackjack_payout, BlackjackPayout::SixToFive);
    }

    #[test]
    fn test_payout_uses_ratio_spelling_in_json() {
        let json = serde_json::to_string(&SimulationConfig::default()).unwrap();
        assert!(json.contains(r#""blackjack_payout":"3:2""#), "{json}");

        let six_five = json.replace("3:2", "6:5");
        let config = SimulationConfig::from_json_str(&six_five).unwrap();
        assert_eq!(config.rules.blackjack_payout, BlackjackPayout::SixToFive);

        let variant_name = json.replace("3:2", "SixToFive");
        assert!(matches!(
            SimulationConfig::from_json_str(&variant_name),
            Err(BlackjackError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_zero_hands() {
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{"hands": 0}"#),
            Err(BlackjackError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SimulationConfig::from_json_str("not json"),
            Err(BlackjackError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SimulationConfig::load("/nonexistent/bj-config.json"),
            Err(BlackjackError::Io(_))
        ));
    }
}
