//! Prompt context built from a finished projection

use crate::assumptions::Assumptions;
use crate::projection::{AnnualSummary, FinancialData, MonthlyData, Runway};
use crate::report::{format_amount, format_percent};

/// Standing instruction sent with every question
pub const SYSTEM_INSTRUCTION: &str = "You are an expert financial analyst providing advice to a startup founder. \
Be concise, insightful, and use the provided financial context to answer questions. \
Format your answers clearly, using markdown for lists or emphasis where appropriate.";

fn dollars(value: f64) -> String {
    format!("${}", format_amount(value, 0))
}

/// Render the fixed subset of figures the advisor sees
///
/// Covers the revenue assumptions, peak burn and runway, year 1 and year 5
/// totals, and the month-60 snapshot.
pub fn format_financial_context(data: &FinancialData, assumptions: &Assumptions) -> String {
    let empty_year = |year| AnnualSummary { year, revenue: 0.0, net_income: 0.0, cash: 0.0 };
    let year1 = data.year(1).cloned().unwrap_or_else(|| empty_year(1));
    let year5 = data.year(5).cloned().unwrap_or_else(|| empty_year(5));
    let (latest_mrr, latest_net_income, latest_cash) = data
        .final_month()
        .map(|m: &MonthlyData| (m.mrr, m.net_income, m.cash))
        .unwrap_or((0.0, 0.0, 0.0));

    let runway = match data.kpis.runway_months {
        Runway::Unbounded => "Infinite".to_string(),
        Runway::Months(m) => format!("{} months", m),
    };

    format!(
        "
--- FINANCIAL MODEL CONTEXT ---
Here is a summary of the current 5-year financial model. Use this data to answer the user's question.

ASSUMPTIONS:
- Initial MRR: ${initial_mrr}
- Monthly Growth Rate: {growth}
- Churn Rate: {churn}
- COGS Percentage: {cogs}

KEY PERFORMANCE INDICATORS (KPIs):
- Peak Monthly Burn: {peak_burn}
- Current Runway: {runway}

FINANCIAL HIGHLIGHTS:
- Year 1 Revenue: {y1_revenue}
- Year 1 Net Income: {y1_net_income}
- Year 5 Revenue: {y5_revenue}
- Year 5 Net Income: {y5_net_income}
- Cash balance at end of Year 5: {y5_cash}

LATEST MONTH DATA (Month 60):
- MRR: {latest_mrr}
- Net Income: {latest_net_income}
- Ending Cash: {latest_cash}
--- END OF CONTEXT ---
",
        initial_mrr = format_amount(assumptions.initial_monthly_revenue, 3),
        growth = format_percent(assumptions.monthly_growth_rate),
        churn = format_percent(assumptions.churn_rate),
        cogs = format_percent(assumptions.cogs_percentage),
        peak_burn = dollars(data.kpis.peak_burn.abs()),
        runway = runway,
        y1_revenue = dollars(year1.revenue),
        y1_net_income = dollars(year1.net_income),
        y5_revenue = dollars(year5.revenue),
        y5_net_income = dollars(year5.net_income),
        y5_cash = dollars(year5.cash),
        latest_mrr = dollars(latest_mrr),
        latest_net_income = dollars(latest_net_income),
        latest_cash = dollars(latest_cash),
    )
}

/// Context block followed by the user's question
pub fn build_prompt(question: &str, data: &FinancialData, assumptions: &Assumptions) -> String {
    format!(
        "{}\n\nUser Question: \"{}\"\n\nAnswer:",
        format_financial_context(data, assumptions),
        question
    )
}
