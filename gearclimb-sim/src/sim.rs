//! Single-run progression simulator.
//!
//! One tick is one activity: an optional bonus drop followed by a regular
//! drop, each landing on a uniformly chosen slot. Account power is recomputed
//! only after both drops of a tick, since they are granted together.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BONUS_CHANCE, DEFAULT_MAX_ACTIVITIES, DEFAULT_POWER_CAP, DEFAULT_STARTING_POWER,
    DEFAULT_TARGET_POWER, MIN_STARTING_POWER, SLOT_COUNT,
};
use crate::gear::GearSet;
use crate::rules::ProgressionTable;

/// Parameters shared by every run of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    pub power_cap: u32,
    pub starting_power: u32,
    pub target_power: u32,
    pub bonus_chance: f64,
    /// Activities after which a run is abandoned as non-converging.
    pub max_activities: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            power_cap: DEFAULT_POWER_CAP,
            starting_power: DEFAULT_STARTING_POWER,
            target_power: DEFAULT_TARGET_POWER,
            bonus_chance: DEFAULT_BONUS_CHANCE,
            max_activities: DEFAULT_MAX_ACTIVITIES,
        }
    }
}

/// Errors raised when simulation parameters are out of range.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimConfigError {
    #[error("starting_power ({starting}) must be at least {min}")]
    StartingTooLow { starting: u32, min: u32 },
    #[error("starting_power ({starting}) must be less than power_cap ({cap})")]
    StartingAtCap { starting: u32, cap: u32 },
    #[error("target_power ({target}) must be greater than starting_power ({starting})")]
    TargetNotAboveStart { target: u32, starting: u32 },
    #[error("target_power ({target}) must be less than or equal to power_cap ({cap})")]
    TargetAboveCap { target: u32, cap: u32 },
    #[error("bonus_chance ({chance}) must be between 0 and 1")]
    BonusChanceRange { chance: f64 },
    #[error("max_activities must be at least 1")]
    ZeroActivityCap,
}

impl SimParams {
    /// Check the parameters in the order a user would fix them.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimConfigError`] encountered.
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.starting_power < MIN_STARTING_POWER {
            return Err(SimConfigError::StartingTooLow {
                starting: self.starting_power,
                min: MIN_STARTING_POWER,
            });
        }
        if self.starting_power >= self.power_cap {
            return Err(SimConfigError::StartingAtCap {
                starting: self.starting_power,
                cap: self.power_cap,
            });
        }
        if self.target_power <= self.starting_power {
            return Err(SimConfigError::TargetNotAboveStart {
                target: self.target_power,
                starting: self.starting_power,
            });
        }
        if self.target_power > self.power_cap {
            return Err(SimConfigError::TargetAboveCap {
                target: self.target_power,
                cap: self.power_cap,
            });
        }
        if !(0.0..=1.0).contains(&self.bonus_chance) {
            return Err(SimConfigError::BonusChanceRange {
                chance: self.bonus_chance,
            });
        }
        if self.max_activities == 0 {
            return Err(SimConfigError::ZeroActivityCap);
        }
        Ok(())
    }
}

/// Why a run stopped before reaching its target.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] SimConfigError),
    #[error(
        "progression stalled at account power {account_power} after {activities} activities (target {target_power}): no drop can raise any slot"
    )]
    Stalled {
        activities: u64,
        account_power: u32,
        target_power: u32,
    },
    #[error(
        "run did not converge within {limit} activities (account power {account_power}, target {target_power})"
    )]
    IterationCap {
        limit: u64,
        account_power: u32,
        target_power: u32,
    },
}

/// Terminal metrics of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub activity_count: u64,
    pub bonus_count: u64,
    pub final_gear: GearSet,
}

impl RunResult {
    #[must_use]
    pub fn final_account_power(&self) -> u32 {
        self.final_gear.account_power()
    }
}

/// What happened during a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Slot hit by the bonus drop, if one fired.
    pub bonus_slot: Option<usize>,
    pub regular_slot: usize,
    /// Account power after both drops.
    pub account_power: u32,
}

/// Mutable state of one run, advanced one activity at a time.
#[derive(Debug, Clone)]
pub struct ProgressionRun<'a> {
    params: SimParams,
    table: &'a ProgressionTable,
    gear: GearSet,
    account_power: u32,
    activity_count: u64,
    bonus_count: u64,
}

impl<'a> ProgressionRun<'a> {
    /// Start a run with every slot at `params.starting_power`.
    ///
    /// # Errors
    ///
    /// Returns [`SimConfigError`] when `params` fail [`SimParams::validate`].
    pub fn new(params: SimParams, table: &'a ProgressionTable) -> Result<Self, SimConfigError> {
        params.validate()?;
        let gear = GearSet::uniform(params.starting_power);
        Ok(Self {
            params,
            table,
            account_power: gear.account_power(),
            gear,
            activity_count: 0,
            bonus_count: 0,
        })
    }

    #[must_use]
    pub const fn account_power(&self) -> u32 {
        self.account_power
    }

    #[must_use]
    pub const fn gear(&self) -> &GearSet {
        &self.gear
    }

    #[must_use]
    pub const fn activity_count(&self) -> u64 {
        self.activity_count
    }

    #[must_use]
    pub const fn bonus_count(&self) -> u64 {
        self.bonus_count
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.account_power >= self.params.target_power
    }

    /// True when no sequence of draws can change the gear any more.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        let bumps = self.table.bumps(self.account_power);
        let reach = if self.params.bonus_chance > 0.0 {
            bumps.power.max(bumps.prime)
        } else {
            bumps.power
        };
        let ceiling = self
            .account_power
            .saturating_add(reach)
            .min(self.params.power_cap);
        // Account power only moves when some slot sits below a drop's candidate.
        self.gear.min_slot() >= ceiling
    }

    /// Play one activity.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        self.activity_count += 1;
        let bumps = self.table.bumps(self.account_power);
        let cap = self.params.power_cap;

        let bonus_slot = if rng.r#gen::<f64>() < self.params.bonus_chance {
            self.bonus_count += 1;
            let slot = rng.gen_range(0..SLOT_COUNT);
            self.gear
                .raise(slot, self.account_power.saturating_add(bumps.prime), cap);
            Some(slot)
        } else {
            None
        };

        let regular_slot = rng.gen_range(0..SLOT_COUNT);
        self.gear.raise(
            regular_slot,
            self.account_power.saturating_add(bumps.power),
            cap,
        );

        // Bonus and regular drops arrive together, so power moves once per tick.
        self.account_power = self.gear.account_power();

        TickOutcome {
            bonus_slot,
            regular_slot,
            account_power: self.account_power,
        }
    }

    #[must_use]
    pub fn into_result(self) -> RunResult {
        RunResult {
            activity_count: self.activity_count,
            bonus_count: self.bonus_count,
            final_gear: self.gear,
        }
    }
}

/// Run activities until account power reaches the target.
///
/// # Errors
///
/// Returns [`SimulationError`] when `params` are invalid, or when the run
/// provably stalls or exceeds `max_activities`.
pub fn simulate<R: Rng + ?Sized>(
    params: &SimParams,
    table: &ProgressionTable,
    rng: &mut R,
) -> Result<RunResult, SimulationError> {
    let mut run = ProgressionRun::new(*params, table)?;
    while !run.is_complete() {
        if run.is_stalled() {
            return Err(SimulationError::Stalled {
                activities: run.activity_count(),
                account_power: run.account_power(),
                target_power: params.target_power,
            });
        }
        if run.activity_count() >= params.max_activities {
            return Err(SimulationError::IterationCap {
                limit: params.max_activities,
                account_power: run.account_power(),
                target_power: params.target_power,
            });
        }
        run.tick(rng);
    }
    Ok(run.into_result())
}
