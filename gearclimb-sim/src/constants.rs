//! Centralized defaults for the gear progression model.
//!
//! The command-line driver exposes only a subset of these as flags; the rest
//! are fixed so that scenario comparisons stay apples-to-apples.

/// Number of equipment slots contributing to account power.
pub const SLOT_COUNT: usize = 8;

/// Absolute ceiling no slot may exceed.
pub const DEFAULT_POWER_CAP: u32 = 550;

/// Per-activity probability of a bonus (prime) drop.
pub const DEFAULT_BONUS_CHANCE: f64 = 0.075;

/// Power every slot starts at when no flag overrides it.
pub const DEFAULT_STARTING_POWER: u32 = 400;

/// Account power a run must reach when no flag overrides it.
pub const DEFAULT_TARGET_POWER: u32 = 450;

/// Lowest starting power accepted by configuration validation.
pub const MIN_STARTING_POWER: u32 = 10;

/// Simulated runs per scenario.
pub const DEFAULT_RUNS: usize = 10_000;

/// Smallest batch for which a sample standard deviation exists.
pub const MIN_BATCH_RUNS: usize = 2;

/// Activities after which a single run is abandoned as non-converging.
pub const DEFAULT_MAX_ACTIVITIES: u64 = 1_000_000;

// Seed domain tags ----------------------------------------------------------
pub(crate) const RUN_STREAM_TAG: &[u8] = b"gearclimb.run";
