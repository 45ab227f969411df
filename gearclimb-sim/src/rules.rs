//! Progression rule tables mapping account power to drop bumps.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One step of a progression table: at or above `threshold`, regular drops
/// land `power_bump` above account power and bonus drops `prime_bump` above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressionRule {
    pub threshold: u32,
    pub power_bump: u32,
    pub prime_bump: u32,
}

impl ProgressionRule {
    #[must_use]
    pub const fn new(threshold: u32, power_bump: u32, prime_bump: u32) -> Self {
        Self {
            threshold,
            power_bump,
            prime_bump,
        }
    }

    #[must_use]
    pub const fn bumps(self) -> Bumps {
        Bumps {
            power: self.power_bump,
            prime: self.prime_bump,
        }
    }
}

/// Bump pair resolved for a given account power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bumps {
    /// Added to account power for the regular drop.
    pub power: u32,
    /// Added to account power for the bonus drop.
    pub prime: u32,
}

/// First-match-wins scan over `rules`, which are expected to be ordered by
/// descending threshold.
///
/// Falls back to the last entry when no threshold matches, and returns `None`
/// only for an empty slice. Unsorted input is scanned the same way.
#[must_use]
pub fn lookup_bumps(account_power: u32, rules: &[ProgressionRule]) -> Option<Bumps> {
    rules
        .iter()
        .find(|rule| account_power >= rule.threshold)
        .or_else(|| rules.last())
        .map(|rule| rule.bumps())
}

/// Errors raised when a progression table violates its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleTableError {
    #[error("progression table must contain at least one rule")]
    Empty,
    #[error(
        "progression thresholds must strictly descend: rule {index} has threshold {threshold} after {previous}"
    )]
    NotDescending {
        index: usize,
        previous: u32,
        threshold: u32,
    },
}

/// Validated, non-empty progression table ordered by strictly descending threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProgressionRule>", into = "Vec<ProgressionRule>")]
pub struct ProgressionTable {
    rules: Vec<ProgressionRule>,
}

impl ProgressionTable {
    /// Build a table, rejecting empty or non-descending rule lists.
    ///
    /// # Errors
    ///
    /// Returns [`RuleTableError`] when the rules are empty or out of order.
    pub fn new(rules: Vec<ProgressionRule>) -> Result<Self, RuleTableError> {
        if rules.is_empty() {
            return Err(RuleTableError::Empty);
        }
        for (index, pair) in rules.windows(2).enumerate() {
            if pair[1].threshold >= pair[0].threshold {
                return Err(RuleTableError::NotDescending {
                    index: index + 1,
                    previous: pair[0].threshold,
                    threshold: pair[1].threshold,
                });
            }
        }
        Ok(Self { rules })
    }

    /// Build a table from `(threshold, power_bump, prime_bump)` triples.
    ///
    /// # Errors
    ///
    /// Returns [`RuleTableError`] when the rules are empty or out of order.
    pub fn from_triples(triples: &[(u32, u32, u32)]) -> Result<Self, RuleTableError> {
        Self::new(
            triples
                .iter()
                .map(|&(threshold, power, prime)| ProgressionRule::new(threshold, power, prime))
                .collect(),
        )
    }

    #[must_use]
    pub fn rules(&self) -> &[ProgressionRule] {
        &self.rules
    }

    /// Bumps that apply at `account_power`.
    #[must_use]
    pub fn bumps(&self, account_power: u32) -> Bumps {
        lookup_bumps(account_power, &self.rules).unwrap_or_default()
    }
}

impl TryFrom<Vec<ProgressionRule>> for ProgressionTable {
    type Error = RuleTableError;

    fn try_from(rules: Vec<ProgressionRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<ProgressionTable> for Vec<ProgressionRule> {
    fn from(table: ProgressionTable) -> Self {
        table.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_rules() -> Vec<ProgressionRule> {
        vec![
            ProgressionRule::new(400, 0, 3),
            ProgressionRule::new(297, 3, 4),
            ProgressionRule::new(196, 4, 5),
            ProgressionRule::new(0, 6, 7),
        ]
    }

    #[test]
    fn lookup_picks_first_threshold_at_or_below_power() {
        let rules = legacy_rules();
        assert_eq!(
            lookup_bumps(400, &rules),
            Some(Bumps { power: 0, prime: 3 })
        );
        assert_eq!(
            lookup_bumps(399, &rules),
            Some(Bumps { power: 3, prime: 4 })
        );
        assert_eq!(
            lookup_bumps(196, &rules),
            Some(Bumps { power: 4, prime: 5 })
        );
        assert_eq!(lookup_bumps(0, &rules), Some(Bumps { power: 6, prime: 7 }));
    }

    #[test]
    fn lookup_falls_back_to_last_entry() {
        let rules = vec![ProgressionRule::new(500, 1, 2), ProgressionRule::new(300, 4, 9)];
        assert_eq!(lookup_bumps(10, &rules), Some(Bumps { power: 4, prime: 9 }));
    }

    #[test]
    fn lookup_tolerates_unsorted_and_empty_input() {
        let unsorted = vec![ProgressionRule::new(100, 1, 1), ProgressionRule::new(300, 2, 2)];
        assert_eq!(lookup_bumps(350, &unsorted), Some(Bumps { power: 1, prime: 1 }));
        assert_eq!(lookup_bumps(50, &unsorted), Some(Bumps { power: 2, prime: 2 }));
        assert_eq!(lookup_bumps(50, &[]), None);
    }

    #[test]
    fn table_rejects_empty_and_unsorted_rules() {
        assert_eq!(ProgressionTable::new(Vec::new()), Err(RuleTableError::Empty));
        let err = ProgressionTable::from_triples(&[(300, 1, 2), (300, 2, 3)]).unwrap_err();
        assert_eq!(
            err,
            RuleTableError::NotDescending {
                index: 1,
                previous: 300,
                threshold: 300
            }
        );
    }

    #[test]
    fn table_bumps_match_free_lookup() {
        let table = ProgressionTable::new(legacy_rules()).unwrap();
        for power in [0, 195, 196, 296, 297, 399, 400, 549] {
            assert_eq!(Some(table.bumps(power)), lookup_bumps(power, table.rules()));
        }
    }

    #[test]
    fn table_deserialization_validates_order() {
        let ok: ProgressionTable =
            serde_json::from_str(r#"[{"threshold":10,"power_bump":1,"prime_bump":2},{"threshold":0,"power_bump":3,"prime_bump":4}]"#)
                .unwrap();
        assert_eq!(ok.rules().len(), 2);
        let bad = serde_json::from_str::<ProgressionTable>(
            r#"[{"threshold":0,"power_bump":1,"prime_bump":2},{"threshold":10,"power_bump":3,"prime_bump":4}]"#,
        );
        assert!(bad.is_err());
    }
}
