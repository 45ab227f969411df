//! Built-in progression scenarios and baseline comparison.

use serde::{Deserialize, Serialize};

use crate::batch::ScenarioStats;
use crate::numbers::percent_change;
use crate::rules::{ProgressionRule, ProgressionTable, RuleTableError};

/// A named progression table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub key: String,
    pub name: String,
    pub rules: ProgressionTable,
}

const fn rule(threshold: u32, power_bump: u32, prime_bump: u32) -> ProgressionRule {
    ProgressionRule::new(threshold, power_bump, prime_bump)
}

const ORIGINAL_RULES: &[ProgressionRule] = &[
    rule(450, 0, 2),
    rule(400, 0, 3),
    rule(297, 3, 4),
    rule(196, 4, 5),
    rule(0, 6, 7),
];

const MODIFIED_RULES: &[ProgressionRule] = &[
    rule(450, 1, 2),
    rule(400, 1, 3),
    rule(297, 3, 4),
    rule(196, 4, 5),
    rule(0, 6, 7),
];

const CATALOG: &[(&str, &str, &[ProgressionRule])] = &[
    ("original", "Original (0 power bump at 400+)", ORIGINAL_RULES),
    ("modified", "Modified (+1 power bump at 400+)", MODIFIED_RULES),
];

fn build(key: &str, name: &str, rules: &[ProgressionRule]) -> Result<Scenario, RuleTableError> {
    Ok(Scenario {
        key: key.to_string(),
        name: name.to_string(),
        rules: ProgressionTable::new(rules.to_vec())?,
    })
}

/// Every built-in scenario; the first is the comparison baseline.
///
/// # Errors
///
/// Returns [`RuleTableError`] if a built-in table is malformed.
pub fn builtin_scenarios() -> Result<Vec<Scenario>, RuleTableError> {
    CATALOG
        .iter()
        .map(|&(key, name, rules)| build(key, name, rules))
        .collect()
}

/// Look up a built-in scenario by key (case-insensitive).
///
/// # Errors
///
/// Returns [`RuleTableError`] if the matching built-in table is malformed.
pub fn find_scenario(key: &str) -> Result<Option<Scenario>, RuleTableError> {
    CATALOG
        .iter()
        .find(|(candidate, _, _)| candidate.eq_ignore_ascii_case(key))
        .map(|&(key, name, rules)| build(key, name, rules))
        .transpose()
}

/// `(key, display name)` of every built-in scenario.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.iter().map(|&(key, name, _)| (key, name)).collect()
}

/// Mean activity difference of one scenario against the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub name: String,
    pub activity_mean: f64,
    pub diff: f64,
    pub pct_change: f64,
    pub is_baseline: bool,
}

/// Compare every scenario's mean activity count with the first entry.
#[must_use]
pub fn compare(results: &[ScenarioStats]) -> Vec<ScenarioDelta> {
    let Some(baseline) = results.first() else {
        return Vec::new();
    };
    results
        .iter()
        .enumerate()
        .map(|(index, stats)| ScenarioDelta {
            name: stats.name.clone(),
            activity_mean: stats.activity_mean,
            diff: stats.activity_mean - baseline.activity_mean,
            pct_change: percent_change(baseline.activity_mean, stats.activity_mean),
            is_baseline: index == 0,
        })
        .collect()
}
