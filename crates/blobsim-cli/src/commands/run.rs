//! Run the simulation and print the results.

use anyhow::{Context, Result};
use blobsim::prelude::*;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{Config, ReportConfig};

/// Command-line values that take precedence over blobsim.toml.
#[derive(Debug, Default)]
pub struct Overrides {
    pub days: Option<u64>,
    pub blobs: Option<usize>,
    pub seed: Option<u64>,
    pub initial_food: Option<u64>,
    pub production: Option<u64>,
}

impl Overrides {
    fn apply(&self, mut config: SimulationConfig) -> SimulationConfig {
        if let Some(days) = self.days {
            config = config.with_days(days);
        }
        if let Some(blobs) = self.blobs {
            config = config.with_population(blobs);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(food) = self.initial_food {
            config = config.with_initial_food(food);
        }
        if let Some(rate) = self.production {
            config = config.with_production_rate(rate);
        }
        config
    }
}

pub fn run(overrides: Overrides, json: bool, output: Option<&str>, verbose: bool) -> Result<()> {
    let Config {
        simulation,
        report: report_options,
    } = Config::load()?;
    let config = overrides.apply(simulation);
    let mut sim = Simulation::new(config).context("Invalid simulation config")?;

    if json || output.is_some() {
        let report = sim.run()?;
        let text = report.to_json().context("Failed to serialize report")?;
        match output {
            Some(path) => {
                std::fs::write(path, &text)
                    .with_context(|| format!("Failed to write report: {}", path))?;
                println!("{} Report written to {}", "✓".green(), path.cyan());
            }
            None => println!("{}", text),
        }
        return Ok(());
    }

    let config = sim.config().clone();
    println!(
        "{} Running {} blobs for {} days (seed {})...",
        "→".blue(),
        config.population.to_string().cyan(),
        config.days.to_string().cyan(),
        config.seed.to_string().cyan()
    );

    let pb = ProgressBar::new(config.days);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} days")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    while !sim.is_finished() {
        let day = sim.run_day()?;
        if verbose {
            pb.println(format!(
                "  after day {}: {} alive, {} food",
                day,
                sim.alive_count(),
                sim.food_level()
            ));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let report = sim.report();
    print_results(&report);
    print_report_details(&report, &report_options, verbose);

    Ok(())
}

fn print_results(report: &SimulationReport) {
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!("  {:<14} {}", "Run:", report.run_id.0.to_string().dimmed());
    println!("  {:<14} {}", "Initial blobs:", report.initial_population.to_string().yellow());
    let survivors = report.survivors.to_string();
    let survivors = if report.survivors == 0 {
        survivors.red()
    } else {
        survivors.green()
    };
    println!("  {:<14} {}", "Survivors:", survivors);
    println!("  {:<14} {}", "Initial food:", report.initial_food.to_string().yellow());
    println!("  {:<14} {}", "Food growth:", report.food_grown.to_string().green());
    println!("  {:<14} {}", "Food left:", report.food_level.to_string().cyan());
    println!("  {:<14} {}", "Days:", report.config.days.to_string().cyan());
}

fn print_report_details(report: &SimulationReport, options: &ReportConfig, verbose: bool) {
    if options.show_census && !report.census.is_empty() {
        println!();
        println!("{}", "Daily census".bold());
        println!(
            "  {:>4} {:>8} {:>6} {:>7} {:>7} {:>10} {:>8}",
            "day", "at dawn", "meals", "alive", "deaths", "at dusk", "grown to"
        );
        for day in &report.census {
            println!(
                "  {:>4} {:>8} {:>6} {:>7} {:>7} {:>10} {:>8}",
                day.day,
                show(day.food_at_dawn),
                day.meals,
                show(day.alive_at_dusk),
                day.deaths.to_string().red(),
                show(day.food_at_dusk),
                show(day.food_after_growth),
            );
        }
    }

    if options.show_blobs || verbose {
        println!();
        println!("{}", "Blobs".bold());
        for blob in &report.blobs {
            let status = match blob.died_at() {
                Some(at) => format!("died at t={}", at).red(),
                None => "alive".green(),
            };
            println!(
                "  {:<10} {:<16} meals {:>3}  days survived {:>2}",
                blob.name(),
                status,
                blob.total_eaten(),
                blob.days_survived()
            );
        }
    }

    if verbose {
        println!();
        println!(
            "  {} events dispatched, {} interrupts delivered, {} missed",
            report.stats.dispatched,
            report.stats.interrupts_delivered,
            report.stats.interrupts_missed
        );
    }
}

fn show<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let overrides = Overrides {
            days: Some(5),
            blobs: Some(3),
            ..Overrides::default()
        };
        let config = overrides.apply(SimulationConfig::default().with_seed(9));
        assert_eq!(config.days, 5);
        assert_eq!(config.population, 3);
        assert_eq!(config.seed, 9);
        assert_eq!(config.initial_food, 70);
    }
}
