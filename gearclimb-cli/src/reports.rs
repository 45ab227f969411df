use anyhow::Result;
use colored::Colorize;
use gearclimb_sim::{ScenarioDelta, ScenarioStats, SimParams};
use serde::Serialize;
use std::io::Write;

const RULE_WIDTH: usize = 60;

/// Everything a report needs about one invocation.
#[derive(Debug, Serialize)]
pub struct BatchReport<'a> {
    pub seed: u64,
    pub runs: usize,
    pub params: &'a SimParams,
    pub scenarios: &'a [ScenarioStats],
    pub comparison: &'a [ScenarioDelta],
}

pub fn generate_console_report(out: &mut dyn Write, report: &BatchReport<'_>) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{}", rule.cyan())?;
    writeln!(
        out,
        "{}",
        format!("SCENARIO COMPARISON - {} simulations each", report.runs)
            .bright_cyan()
            .bold()
    )?;
    writeln!(
        out,
        "Target: {} → {} power",
        report.params.starting_power, report.params.target_power
    )?;
    writeln!(out, "Prime chance: {:.1}%", report.params.bonus_chance * 100.0)?;
    writeln!(out, "Seed: {}", report.seed)?;
    writeln!(out, "{}", rule.cyan())?;

    for stats in report.scenarios {
        writeln!(out)?;
        writeln!(out, "{}:", stats.name.bold())?;
        writeln!(
            out,
            "  Activities to reach target_power ({}):",
            report.params.target_power
        )?;
        writeln!(out, "    Mean: {:.1}", stats.activity_mean)?;
        writeln!(out, "    Median: {:.1}", stats.activity_median)?;
        writeln!(out, "    Std Dev: {:.1}", stats.activity_stdev)?;
        writeln!(out, "    Range: {}-{}", stats.activity_min, stats.activity_max)?;
        writeln!(
            out,
            "    50% of runs: {:.0}-{:.0} activities",
            stats.activity_p25, stats.activity_p75
        )?;
        writeln!(out, "  Prime drops:")?;
        writeln!(out, "    Mean: {:.1}", stats.bonus_mean)?;
        writeln!(out, "    Observed rate: {:.4}", stats.bonus_rate)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", rule.yellow())?;
    writeln!(
        out,
        "{}",
        "SUMMARY - Activities needed (mean):".bright_yellow().bold()
    )?;
    for delta in report.comparison {
        if delta.is_baseline {
            writeln!(
                out,
                "  {}: {:.1} (baseline)",
                delta.name, delta.activity_mean
            )?;
        } else {
            let change = format!("({:+.1}, {:+.1}%)", delta.diff, delta.pct_change);
            let change = if delta.diff <= 0.0 {
                change.green()
            } else {
                change.red()
            };
            writeln!(
                out,
                "  {}: {:.1} {change}",
                delta.name, delta.activity_mean
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &BatchReport<'_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &BatchReport<'_>) -> Result<()> {
    writeln!(out, "# Gear Progression Scenario Comparison\n")?;
    writeln!(out, "- **Simulations per scenario**: {}", report.runs)?;
    writeln!(
        out,
        "- **Target**: {} → {} power",
        report.params.starting_power, report.params.target_power
    )?;
    writeln!(
        out,
        "- **Prime chance**: {:.1}%",
        report.params.bonus_chance * 100.0
    )?;
    writeln!(out, "- **Seed**: {}\n", report.seed)?;

    writeln!(out, "## Scenarios\n")?;
    for stats in report.scenarios {
        writeln!(out, "### {}\n", stats.name)?;
        writeln!(out, "- **Mean activities**: {:.1}", stats.activity_mean)?;
        writeln!(out, "- **Median**: {:.1}", stats.activity_median)?;
        writeln!(out, "- **Std dev**: {:.1}", stats.activity_stdev)?;
        writeln!(
            out,
            "- **Range**: {}-{}",
            stats.activity_min, stats.activity_max
        )?;
        writeln!(
            out,
            "- **Middle 50%**: {:.0}-{:.0}",
            stats.activity_p25, stats.activity_p75
        )?;
        writeln!(out, "- **Mean prime drops**: {:.1}", stats.bonus_mean)?;
        writeln!(out, "- **Observed prime rate**: {:.4}\n", stats.bonus_rate)?;
    }

    writeln!(out, "## Summary\n")?;
    writeln!(out, "| Scenario | Mean activities | Change |")?;
    writeln!(out, "| --- | ---: | ---: |")?;
    for delta in report.comparison {
        let change = if delta.is_baseline {
            "baseline".to_string()
        } else {
            format!("{:+.1} ({:+.1}%)", delta.diff, delta.pct_change)
        };
        writeln!(
            out,
            "| {} | {:.1} | {change} |",
            delta.name, delta.activity_mean
        )?;
    }
    Ok(())
}
