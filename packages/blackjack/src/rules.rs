use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::BlackjackError;

/// Blackjack payout ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlackjackPayout {
    #[serde(rename = "3:2")]
    ThreeToTwo,
    #[serde(rename = "6:5")]
    SixToFive,
}

impl BlackjackPayout {
    /// Payoff of a natural in units of the base bet.
    pub fn multiple(&self) -> f64 {
        match self {
            BlackjackPayout::ThreeToTwo => 1.5,
            BlackjackPayout::SixToFive => 1.2,
        }
    }
}

impl fmt::Display for BlackjackPayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlackjackPayout::ThreeToTwo => f.write_str("3:2"),
            BlackjackPayout::SixToFive => f.write_str("6:5"),
        }
    }
}

impl FromStr for BlackjackPayout {
    type Err = BlackjackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "3:2" => Ok(BlackjackPayout::ThreeToTwo),
            "6:5" => Ok(BlackjackPayout::SixToFive),
            other => Err(BlackjackError::InvalidConfiguration(format!(
                "unsupported blackjack payout '{other}', expected 3:2 or 6:5"
            ))),
        }
    }
}

/// Table rules for a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Dealer hits soft 17
    pub hit_soft_17: bool,

    /// Allow late surrender on any two-card hand, split hands included
    pub late_surrender: bool,

    /// Allow doubling after split
    pub double_after_split: bool,

    /// Maximum splits in the line of any one hand. The half that keeps
    /// playing after a split does not count it, so a deal can end up with
    /// more than `resplit_limit + 1` hands.
    pub resplit_limit: u8,

    /// Dealer peeks for blackjack with Ace or 10 up
    pub dealer_peek: bool,

    pub blackjack_payout: BlackjackPayout,
}

impl Default for RuleSet {
    fn default() -> Self {
        // H17, DAS, late surrender, peek
        Self {
            hit_soft_17: true,
            late_surrender: true,
            double_after_split: true,
            resplit_limit: 3,
            dealer_peek: true,
            blackjack_payout: BlackjackPayout::ThreeToTwo,
        }
    }
}

impl RuleSet {
    /// Default rules with the dealer standing on soft 17
    pub fn s17() -> Self {
        Self {
            hit_soft_17: false,
            ..Self::default()
        }
    }

    /// European rules (dealer doesn't peek, no surrender, no DAS)
    pub fn european() -> Self {
        Self {
            hit_soft_17: false,
            late_surrender: false,
            double_after_split: false,
            resplit_limit: 3,
            dealer_peek: false,
            blackjack_payout: BlackjackPayout::ThreeToTwo,
        }
    }

    /// Default rules with blackjack paying 6:5
    pub fn six_to_five() -> Self {
        Self {
            blackjack_payout: BlackjackPayout::SixToFive,
            ..Self::default()
        }
    }

    pub fn preset(name: &str) -> Result<Self, BlackjackError> {
        match name {
            "default" | "h17" => Ok(Self::default()),
            "s17" => Ok(Self::s17()),
            "european" => Ok(Self::european()),
            "six_to_five" => Ok(Self::six_to_five()),
            other => Err(BlackjackError::InvalidConfiguration(format!(
                "unknown preset '{other}', available: default, s17, european, six_to_five"
            ))),
        }
    }

    /// Short label used in reports
    pub fn label(&self) -> &'static str {
        if self.hit_soft_17 {
            "H17"
        } else {
            "S17"
        }
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BJ {}", self.label(), self.blackjack_payout)?;
        if self.double_after_split {
            f.write_str(" DAS")?;
        }
        if self.late_surrender {
            f.write_str(" LS")?;
        }
        if !self.dealer_peek {
            f.write_str(" ENHC")?;
        }
        write!(f, " RSA{}", self.resplit_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_multiples() {
        assert_eq!(BlackjackPayout::ThreeToTwo.multiple(), 1.5);
        assert_eq!(BlackjackPayout::SixToFive.multiple(), 1.2);
    }

    #[test]
    fn test_payout_parse() {
        assert_eq!("3:2".parse::<BlackjackPayout>().unwrap(), BlackjackPayout::ThreeToTwo);
        assert_eq!(" 6:5 ".parse::<BlackjackPayout>().unwrap(), BlackjackPayout::SixToFive);
        assert!(matches!(
            "1:1".parse::<BlackjackPayout>(),
            Err(BlackjackError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_default_rules() {
        let rules = RuleSet::default();
        assert!(rules.hit_soft_17);
        assert!(rules.late_surrender);
        assert!(rules.double_after_split);
        assert!(rules.dealer_peek);
        assert_eq!(rules.resplit_limit, 3);
        assert_eq!(rules.blackjack_payout, BlackjackPayout::ThreeToTwo);
        assert_eq!(rules.label(), "H17");
    }

    #[test]
    fn test_presets() {
        assert_eq!(RuleSet::preset("s17").unwrap().label(), "S17");
        assert!(!RuleSet::preset("european").unwrap().dealer_peek);
        assert_eq!(
            RuleSet::preset("six_to_five").unwrap().blackjack_payout,
            BlackjackPayout::SixToFive
        );
        assert!(RuleSet::preset("vegas").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(RuleSet::default().to_string(), "H17 BJ 3:2 DAS LS RSA3");
        assert_eq!(RuleSet::european().to_string(), "S17 BJ 3:2 ENHC RSA3");
    }
}
