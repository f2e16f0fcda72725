//! Scenario runner for batch projections
//!
//! Holds one set of base assumptions and projects many variations of it.
//! Each projection is independent, so batches run in parallel.

use log::info;
use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::{Assumptions, AssumptionsUpdate};
use crate::projection::{compute, FinancialData, Runway};

/// Scenario runner for batch projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let grid = runner.sensitivity_grid(&[0.05, 0.10], &[0.01, 0.03]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

/// Headline outcome of one growth/churn pair
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub growth_rate: f64,
    pub churn_rate: f64,
    pub year5_revenue: f64,
    pub year5_cash: f64,
    pub final_mrr: f64,
    pub peak_burn: f64,
    /// Months of runway, empty when unbounded
    pub runway_months: Option<u64>,
}

impl ScenarioRunner {
    /// Runner over the SaaS template
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::saas_template(),
        }
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Project the base assumptions with an update applied
    pub fn run(&self, update: &AssumptionsUpdate) -> FinancialData {
        compute(&self.base_assumptions.merge(update))
    }

    /// Project every update, in input order
    pub fn run_batch(&self, updates: &[AssumptionsUpdate]) -> Vec<FinancialData> {
        info!("Running {} scenarios", updates.len());
        updates.par_iter().map(|u| self.run(u)).collect()
    }

    /// Project every growth/churn pair, growth-major order
    pub fn sensitivity_grid(&self, growth_rates: &[f64], churn_rates: &[f64]) -> Vec<SensitivityPoint> {
        let pairs: Vec<(f64, f64)> = growth_rates
            .iter()
            .flat_map(|&g| churn_rates.iter().map(move |&c| (g, c)))
            .collect();
        info!("Running sensitivity grid of {} scenarios", pairs.len());

        pairs
            .par_iter()
            .map(|&(growth_rate, churn_rate)| {
                let update = AssumptionsUpdate {
                    monthly_growth_rate: Some(growth_rate),
                    churn_rate: Some(churn_rate),
                    ..Default::default()
                };
                let data = self.run(&update);
                let year5 = data.year(5);
                SensitivityPoint {
                    growth_rate,
                    churn_rate,
                    year5_revenue: year5.map(|y| y.revenue).unwrap_or(0.0),
                    year5_cash: year5.map(|y| y.cash).unwrap_or(0.0),
                    final_mrr: data.final_month().map(|m| m.mrr).unwrap_or(0.0),
                    peak_burn: data.kpis.peak_burn,
                    runway_months: match data.kpis.runway_months {
                        Runway::Months(m) => Some(m),
                        Runway::Unbounded => None,
                    },
                }
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }

    /// Replace base assumptions with an update merged in
    pub fn rebase(&mut self, update: &AssumptionsUpdate) {
        self.base_assumptions = self.base_assumptions.merge(update);
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
