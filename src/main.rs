//! Startup Model CLI
//!
//! Command-line interface for running projections and asking the advisor

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use startup_model::assumptions::{FieldSection, FIELDS};
use startup_model::report::{self, KpiCards, StatementView};
use startup_model::advisor::reply_or_apology;
use startup_model::{compute, Advisor, Assumptions, AssumptionsUpdate, BusinessType};

#[derive(Parser)]
#[command(name = "startup_model", version, about = "Five-year startup financial model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project the model and print statements and KPIs
    Project {
        #[command(flatten)]
        inputs: AssumptionArgs,

        /// Statement granularity: annual or monthly
        #[arg(long, default_value = "annual")]
        view: StatementView,

        /// Write every monthly row to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the projection as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Ask the AI advisor a question about the projection
    Ask {
        question: String,

        #[command(flatten)]
        inputs: AssumptionArgs,
    },
    /// List editable assumption fields
    Fields,
}

#[derive(Args)]
struct AssumptionArgs {
    /// Business type (every type currently uses the SaaS template)
    #[arg(long, default_value = "SaaS")]
    business_type: BusinessType,

    /// JSON file with a full or partial set of assumptions
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// CSV file of `field,value` overrides
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Single override, e.g. `--set churnRate=3` (percent fields take percentages)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
}

impl AssumptionArgs {
    /// Template, then JSON file, then CSV overrides, then `--set` flags
    fn resolve(&self) -> Result<Assumptions> {
        let mut assumptions = Assumptions::template_for(self.business_type);

        if let Some(path) = &self.assumptions {
            let update = AssumptionsUpdate::from_json_path(path)
                .with_context(|| format!("loading assumptions from {}", path.display()))?;
            assumptions = assumptions.merge(&update);
        }

        if let Some(path) = &self.overrides {
            let update = AssumptionsUpdate::from_csv_path(path)
                .with_context(|| format!("loading overrides from {}", path.display()))?;
            assumptions = assumptions.merge(&update);
        }

        let mut flags = AssumptionsUpdate::new();
        for assignment in &self.set {
            flags.parse_assignment(assignment)?;
        }
        Ok(assumptions.merge(&flags))
    }
}

fn print_project(assumptions: &Assumptions, view: StatementView, csv: Option<PathBuf>, json: bool) -> Result<()> {
    let data = compute(assumptions);

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        println!("Startup Model v{}", env!("CARGO_PKG_VERSION"));
        println!("======================\n");
        println!("{}", report::render_statement(&data, view));

        println!("Key Metrics:");
        for (title, value) in KpiCards::from_data(&data).entries() {
            println!("  {:<22} {}", title, value);
        }

        let summary = data.summary();
        println!("\nSummary:");
        println!("  Total Revenue: ${}", report::format_amount(summary.total_revenue, 0));
        println!("  Total Net Income: ${}", report::format_amount(summary.total_net_income, 0));
        match summary.first_profitable_month {
            Some(m) => println!("  First Profitable Month: M{}", m),
            None => println!("  First Profitable Month: none within forecast"),
        }
        println!(
            "  Lowest Cash: ${} (M{})",
            report::format_amount(summary.min_cash, 0),
            summary.min_cash_month
        );
    }

    if let Some(path) = csv {
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        report::write_monthly_csv(&data, BufWriter::new(file))?;
        info!("Monthly projection written to {}", path.display());
        if !json {
            println!("\nFull results written to: {}", path.display());
        }
    }

    Ok(())
}

fn print_fields() {
    let sections = [
        FieldSection::RevenueDrivers,
        FieldSection::CostsAndExpenses,
        FieldSection::CashAndFundraising,
    ];
    let template = serde_json::to_value(Assumptions::saas_template()).unwrap_or_default();

    for section in sections {
        println!("{}", section.title());
        for field in FIELDS.iter().filter(|f| f.section == section) {
            println!(
                "  {:<24} {:<26} {:<10} default {}",
                field.name,
                field.label,
                format!("{:?}", field.kind),
                template.get(field.name).cloned().unwrap_or_default()
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Project { inputs, view, csv, json } => {
            let assumptions = inputs.resolve()?;
            print_project(&assumptions, view, csv, json)?;
        }
        Command::Ask { question, inputs } => {
            let assumptions = inputs.resolve()?;
            let data = compute(&assumptions);
            // A client that cannot be built is reported like any other advisor failure
            let answer = match Advisor::from_env() {
                Ok(advisor) => advisor.ask(&question, &data, &assumptions).await,
                Err(e) => reply_or_apology(Err(e)),
            };
            println!("{}", answer);
        }
        Command::Fields => print_fields(),
    }

    Ok(())
}
