//! Output structures for a projection: monthly rows, annual roll-ups and KPIs

use serde::{Deserialize, Serialize};

/// Number of months in every forecast (5 years)
pub const MONTHS_TO_FORECAST: u32 = 60;

/// Months per forecast year
pub const MONTHS_PER_YEAR: u32 = 12;

/// One forecast month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyData {
    pub month: u32,
    pub year: u32,

    // P&L
    pub revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
    pub marketing: f64,
    pub sales_expense: f64,
    pub dev_expense: f64,
    #[serde(rename = "gAndAExpense")]
    pub g_and_a_expense: f64,
    pub total_operating_expense: f64,
    pub net_income: f64,

    // Cash flow
    pub cash_flow_from_ops: f64,
    pub cash_flow_from_financing: f64,
    pub net_cash_flow: f64,

    // Balance sheet
    /// End-of-month cash balance
    pub cash: f64,

    // KPIs
    pub mrr: f64,
    pub arr: f64,
    pub cumulative_revenue: f64,
}

/// Roll-up of one forecast year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualSummary {
    pub year: u32,
    pub revenue: f64,
    pub net_income: f64,
    /// Ending cash of the year's last month
    pub cash: f64,
}

/// Months of runway left at the end of the forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Runway {
    Months(u64),
    /// Cash is positive and not being burned
    Unbounded,
}

impl Runway {
    pub fn months(&self) -> Option<u64> {
        match self {
            Runway::Months(m) => Some(*m),
            Runway::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Runway::Unbounded)
    }
}

impl std::fmt::Display for Runway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runway::Months(m) => write!(f, "{} months", m),
            Runway::Unbounded => f.write_str("Infinite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    /// Most negative monthly net cash flow, or 0 if no month burns cash
    pub peak_burn: f64,
    pub runway_months: Runway,
}

impl Kpis {
    /// Derive KPIs from a complete monthly series
    pub fn from_monthly(monthly: &[MonthlyData]) -> Self {
        let peak_burn = monthly
            .iter()
            .map(|m| m.net_cash_flow)
            .filter(|&flow| flow < 0.0)
            .fold(None, |worst: Option<f64>, flow| Some(worst.map_or(flow, |w| w.min(flow))))
            .unwrap_or(0.0);

        let runway_months = monthly
            .last()
            .map(|last| runway_from(last.cash, last.net_cash_flow))
            .unwrap_or(Runway::Months(0));

        Self { peak_burn, runway_months }
    }
}

/// Runway from one month's ending cash and net cash flow
///
/// Only the given month counts: a series that dips negative and recovers
/// still reports unbounded runway. An infinite quotient is unbounded too.
pub fn runway_from(cash: f64, net_cash_flow: f64) -> Runway {
    if net_cash_flow < 0.0 && cash > 0.0 {
        let months = (cash / net_cash_flow.abs()).floor();
        if months.is_finite() {
            Runway::Months(months as u64)
        } else {
            Runway::Unbounded
        }
    } else if cash <= 0.0 {
        Runway::Months(0)
    } else {
        Runway::Unbounded
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialData {
    pub monthly: Vec<MonthlyData>,
    pub annual: Vec<AnnualSummary>,
    pub kpis: Kpis,
}

impl FinancialData {
    /// Assemble the result from a completed monthly series
    pub fn from_monthly(monthly: Vec<MonthlyData>) -> Self {
        let annual = annual_summaries(&monthly);
        let kpis = Kpis::from_monthly(&monthly);
        Self { monthly, annual, kpis }
    }

    pub fn final_month(&self) -> Option<&MonthlyData> {
        self.monthly.last()
    }

    /// Annual summary for a 1-indexed year
    pub fn year(&self, year: u32) -> Option<&AnnualSummary> {
        self.annual.iter().find(|a| a.year == year)
    }

    /// Headline figures for reports
    pub fn summary(&self) -> ProjectionSummary {
        let final_arr = self.final_month().map(|m| m.arr).unwrap_or(0.0);
        let final_cash = self.final_month().map(|m| m.cash).unwrap_or(0.0);
        let total_revenue = self.final_month().map(|m| m.cumulative_revenue).unwrap_or(0.0);
        let total_net_income: f64 = self.monthly.iter().map(|m| m.net_income).sum();
        let first_profitable_month = self.monthly.iter().find(|m| m.net_income > 0.0).map(|m| m.month);
        let (min_cash_month, min_cash) = self
            .monthly
            .iter()
            .fold(None, |lowest: Option<(u32, f64)>, m| match lowest {
                Some((_, cash)) if cash <= m.cash => lowest,
                _ => Some((m.month, m.cash)),
            })
            .unwrap_or((0, 0.0));

        ProjectionSummary {
            total_months: self.monthly.len() as u32,
            total_revenue,
            total_net_income,
            final_arr,
            final_cash,
            first_profitable_month,
            min_cash,
            min_cash_month,
            peak_burn: self.kpis.peak_burn,
            runway: self.kpis.runway_months,
        }
    }
}

/// Group monthly rows into forecast years
///
/// Revenue and net income are summed; cash is the last month's balance.
pub fn annual_summaries(monthly: &[MonthlyData]) -> Vec<AnnualSummary> {
    let years = MONTHS_TO_FORECAST / MONTHS_PER_YEAR;
    (1..=years)
        .filter_map(|year| {
            let months: Vec<&MonthlyData> = monthly.iter().filter(|m| m.year == year).collect();
            let last = months.last()?;
            Some(AnnualSummary {
                year,
                revenue: months.iter().map(|m| m.revenue).sum(),
                net_income: months.iter().map(|m| m.net_income).sum(),
                cash: last.cash,
            })
        })
        .collect()
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub total_months: u32,
    pub total_revenue: f64,
    pub total_net_income: f64,
    pub final_arr: f64,
    pub final_cash: f64,
    pub first_profitable_month: Option<u32>,
    pub min_cash: f64,
    pub min_cash_month: u32,
    pub peak_burn: f64,
    pub runway: Runway,
}
