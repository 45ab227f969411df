mod reports;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use gearclimb_sim::constants::{
    DEFAULT_BONUS_CHANCE, DEFAULT_MAX_ACTIVITIES, DEFAULT_POWER_CAP, DEFAULT_RUNS,
    DEFAULT_STARTING_POWER, DEFAULT_TARGET_POWER,
};
use gearclimb_sim::{
    BatchConfig, Scenario, ScenarioStats, SimParams, analyze, builtin_scenarios, compare,
    find_scenario, fresh_batch_seed, list_scenarios,
};
use log::info;
use std::io::{BufWriter, Write, stdout};
use std::time::Instant;

use reports::{
    BatchReport, generate_console_report, generate_json_report, generate_markdown_report,
};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored human-readable summary
    Console,
    /// Machine-readable JSON document
    Json,
    /// Markdown with a comparison table
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "gearclimb", version)]
#[command(
    about = "Monte Carlo estimate of the activities needed to raise account power between two levels"
)]
struct Args {
    /// Starting power level (min: 10, max: power cap - 1)
    #[arg(long, default_value_t = DEFAULT_STARTING_POWER)]
    starting_power: u32,

    /// Target power level (must exceed starting power, max: power cap)
    #[arg(long, default_value_t = DEFAULT_TARGET_POWER)]
    target_power: u32,

    /// Simulated runs per scenario
    #[arg(long, default_value_t = DEFAULT_RUNS)]
    runs: usize,

    /// Batch seed for reproducible results (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Scenarios to compare (comma-separated keys, first is the baseline)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Run simulations on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    const fn sim_params(&self) -> SimParams {
        SimParams {
            power_cap: DEFAULT_POWER_CAP,
            starting_power: self.starting_power,
            target_power: self.target_power,
            bonus_chance: DEFAULT_BONUS_CHANCE,
            max_activities: DEFAULT_MAX_ACTIVITIES,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut out = BufWriter::new(stdout());
    if args.list_scenarios {
        write_scenario_list(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    let params = args.sim_params();
    params.validate()?;
    let scenarios = select_scenarios(&args.scenarios)?;

    let seed = args.seed.unwrap_or_else(fresh_batch_seed);
    info!("batch seed {seed}");
    let mut batch = BatchConfig::new(args.runs, seed);
    if args.sequential {
        batch = batch.sequential();
    }

    let start_time = Instant::now();
    let results = run_scenarios(&mut out, &args, &batch, &params, &scenarios)?;
    let comparison = compare(&results);
    let report = BatchReport {
        seed,
        runs: batch.runs,
        params: &params,
        scenarios: &results,
        comparison: &comparison,
    };

    match args.report {
        ReportFormat::Console => {
            generate_console_report(&mut out, &report)?;
            writeln!(out)?;
            writeln!(out, "Total time: {:?}", start_time.elapsed())?;
        }
        ReportFormat::Json => generate_json_report(&mut out, &report)?,
        ReportFormat::Markdown => generate_markdown_report(&mut out, &report)?,
    }
    out.flush()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn write_scenario_list(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Available scenarios:")?;
    for (key, name) in list_scenarios() {
        writeln!(out, "  {key:12} - {name}")?;
    }
    Ok(())
}

fn select_scenarios(selection: &str) -> Result<Vec<Scenario>> {
    let keys = split_csv(selection);
    if keys.is_empty() || keys.iter().any(|key| key.eq_ignore_ascii_case("all")) {
        return builtin_scenarios().context("built-in scenario table is malformed");
    }

    let mut scenarios = Vec::with_capacity(keys.len());
    for key in &keys {
        let Some(scenario) = find_scenario(key)
            .with_context(|| format!("scenario {key} has a malformed rule table"))?
        else {
            bail!("unknown scenario: {key} (see --list-scenarios)");
        };
        if scenarios.iter().all(|known: &Scenario| known.key != scenario.key) {
            scenarios.push(scenario);
        }
    }
    Ok(scenarios)
}

fn run_scenarios(
    out: &mut dyn Write,
    args: &Args,
    batch: &BatchConfig,
    params: &SimParams,
    scenarios: &[Scenario],
) -> Result<Vec<ScenarioStats>> {
    let announce = args.report == ReportFormat::Console;
    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        if announce {
            writeln!(
                out,
                "Running {} simulations for: {}",
                batch.runs,
                scenario.name.bright_cyan()
            )?;
        }
        let stats = analyze(&scenario.name, batch, params, &scenario.rules)
            .with_context(|| format!("scenario \"{}\" failed", scenario.name))?;
        if announce {
            writeln!(
                out,
                "  Completed - Mean activities: {:.1}\n",
                stats.activity_mean
            )?;
        }
        results.push(stats);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            starting_power: DEFAULT_STARTING_POWER,
            target_power: DEFAULT_TARGET_POWER,
            runs: 4,
            seed: Some(7),
            scenarios: "all".to_string(),
            list_scenarios: false,
            report: ReportFormat::Json,
            sequential: true,
            verbose: false,
        }
    }

    #[test]
    fn args_parse_defaults() {
        let args = Args::try_parse_from(["gearclimb"]).unwrap();
        assert_eq!(args.starting_power, 400);
        assert_eq!(args.target_power, 450);
        assert_eq!(args.runs, 10_000);
        assert_eq!(args.report, ReportFormat::Console);
        assert!(args.seed.is_none());
    }

    #[test]
    fn sim_params_use_fixed_cap_and_chance() {
        let params = base_args().sim_params();
        assert_eq!(params.power_cap, 550);
        assert!((params.bonus_chance - 0.075).abs() < f64::EPSILON);
    }

    #[test]
    fn select_scenarios_expands_all_in_catalog_order() {
        let scenarios = select_scenarios("all").unwrap();
        let keys: Vec<&str> = scenarios.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["original", "modified"]);
    }

    #[test]
    fn select_scenarios_keeps_requested_order_without_duplicates() {
        let scenarios = select_scenarios("modified,original,modified").unwrap();
        let keys: Vec<&str> = scenarios.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["modified", "original"]);
    }

    #[test]
    fn select_scenarios_rejects_unknown_keys() {
        let err = select_scenarios("original,bogus").unwrap_err();
        assert!(err.to_string().contains("unknown scenario: bogus"));
    }

    #[test]
    fn run_scenarios_produces_one_result_per_scenario() {
        let mut args = base_args();
        args.target_power = 405;
        let params = args.sim_params();
        let scenarios = select_scenarios("all").unwrap();
        let batch = BatchConfig::new(args.runs, 7).sequential();
        let mut buffer = Vec::new();
        let results = run_scenarios(&mut buffer, &args, &batch, &params, &scenarios).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|stats| stats.runs == 4));
        // JSON output carries no progress lines.
        assert!(buffer.is_empty());
    }

    #[test]
    fn console_progress_goes_through_the_writer() {
        let mut args = base_args();
        args.target_power = 405;
        args.report = ReportFormat::Console;
        let params = args.sim_params();
        let scenarios = select_scenarios("original").unwrap();
        let batch = BatchConfig::new(args.runs, 7).sequential();
        let mut buffer = Vec::new();
        run_scenarios(&mut buffer, &args, &batch, &params, &scenarios).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Running 4 simulations for: "));
        assert!(text.contains("Completed - Mean activities: "));
    }

    #[test]
    fn scenario_list_names_every_key() {
        let mut buffer = Vec::new();
        write_scenario_list(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Available scenarios"));
        assert!(text.contains("original"));
        assert!(text.contains("modified"));
    }
}
