//! Growth x churn sensitivity grid
//!
//! Projects every growth/churn pair over the base assumptions and writes the
//! headline outcomes to CSV.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use startup_model::report::format_chart_currency;
use startup_model::{Assumptions, AssumptionsUpdate, ScenarioRunner};

#[derive(Parser)]
#[command(name = "sensitivity", about = "Growth x churn sensitivity grid")]
struct Cli {
    /// Monthly growth rates as ratios
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.05, 0.075, 0.10, 0.125, 0.15])]
    growth: Vec<f64>,

    /// Monthly churn rates as ratios
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.01, 0.02, 0.03, 0.05])]
    churn: Vec<f64>,

    /// JSON file with base assumptions (defaults to the SaaS template)
    #[arg(long)]
    assumptions: Option<PathBuf>,

    #[arg(long, default_value = "sensitivity_output.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let base = match &cli.assumptions {
        Some(path) => {
            let update = AssumptionsUpdate::from_json_path(path)
                .with_context(|| format!("loading assumptions from {}", path.display()))?;
            Assumptions::saas_template().merge(&update)
        }
        None => Assumptions::saas_template(),
    };

    let runner = ScenarioRunner::with_assumptions(base);
    let grid = runner.sensitivity_grid(&cli.growth, &cli.churn);
    println!("Projected {} scenarios in {:?}", grid.len(), start.elapsed());

    let file = File::create(&cli.output).with_context(|| format!("creating {}", cli.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for point in &grid {
        writer.serialize(point)?;
    }
    writer.flush()?;

    println!("\n{:>8} {:>8} {:>12} {:>12} {:>10}", "Growth", "Churn", "Y5 Revenue", "Y5 Cash", "Runway");
    println!("{}", "-".repeat(54));
    for point in &grid {
        let runway = point
            .runway_months
            .map(|m| format!("{} mo", m))
            .unwrap_or_else(|| "Positive".to_string());
        println!(
            "{:>7.1}% {:>7.1}% {:>12} {:>12} {:>10}",
            point.growth_rate * 100.0,
            point.churn_rate * 100.0,
            format_chart_currency(point.year5_revenue),
            format_chart_currency(point.year5_cash),
            runway,
        );
    }

    println!("\nOutput written to {}", cli.output.display());
    Ok(())
}
