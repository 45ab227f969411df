//! Gearclimb simulation engine
//!
//! Monte Carlo estimate of how many activities it takes to raise the floor
//! average of eight gear slots from a starting power to a target power, under
//! a stepwise progression table and a rare bonus drop. This crate holds the
//! model only; the `gearclimb` binary handles flags and reports.

pub mod batch;
pub mod constants;
pub mod gear;
pub mod numbers;
pub mod rules;
pub mod scenario;
pub mod seed;
pub mod sim;
pub mod stats;

// Re-export commonly used types
pub use batch::{AnalysisError, BatchConfig, ScenarioStats, analyze, run_batch, summarize};
pub use gear::GearSet;
pub use rules::{Bumps, ProgressionRule, ProgressionTable, RuleTableError, lookup_bumps};
pub use scenario::{
    Scenario, ScenarioDelta, builtin_scenarios, compare, find_scenario, list_scenarios,
};
pub use seed::{CountingRng, derive_run_seed, fresh_batch_seed, run_rng};
pub use sim::{
    ProgressionRun, RunResult, SimConfigError, SimParams, SimulationError, TickOutcome, simulate,
};
pub use stats::{Distribution, Quartiles, RunningStats, StatsError};
