//! Display formatting, statement tables, KPI cards and CSV export
//!
//! Nothing here feeds back into the engine; these are views over a
//! finished `FinancialData`.

use std::io::Write;

use serde::Serialize;
use thiserror::Error;

use crate::projection::{FinancialData, MonthlyData, Runway};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Compact currency for the statement table: `-$1.5M`, `$12.3K`, `$950`
pub fn format_compact_currency(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{}${:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}${:.1}K", sign, abs / 1_000.0)
    } else {
        format!("{}${:.0}", sign, abs)
    }
}

/// Currency for dashboard cards and chart axes: `$1.25M`, `$12.3K`, `$950`
///
/// Negative values keep their sign after the `$`: `$-24.0K`.
pub fn format_chart_currency(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}

/// Grouped amount with at most `max_fraction_digits` decimals, trailing zeros dropped
///
/// `format_amount(1234567.891, 0)` is `1,234,568`.
pub fn format_amount(value: f64, max_fraction_digits: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    let fixed = format!("{:.*}", max_fraction_digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.trim_end_matches('0').to_string()),
        None => (fixed.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Ratio as a one-decimal percentage: `0.1` is `10.0%`
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Granularity of the statement table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementView {
    #[default]
    Annual,
    Monthly,
}

impl std::str::FromStr for StatementView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "annual" | "yearly" => Ok(StatementView::Annual),
            "monthly" => Ok(StatementView::Monthly),
            other => Err(format!("unknown view: {}", other)),
        }
    }
}

/// Visual weight of a statement row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Header,
    Subtotal,
    /// Section title with no values
    Section,
    Detail,
}

#[derive(Debug, Clone)]
pub struct StatementRow {
    pub label: &'static str,
    pub style: RowStyle,
    pub values: Vec<f64>,
}

/// Column headings: `M1`..`M60` or `Year 1`..`Year 5`
pub fn statement_headers(data: &FinancialData, view: StatementView) -> Vec<String> {
    match view {
        StatementView::Monthly => data.monthly.iter().map(|m| format!("M{}", m.month)).collect(),
        StatementView::Annual => data.annual.iter().map(|a| format!("Year {}", a.year)).collect(),
    }
}

/// Rows of the model table
///
/// Expense detail and the cash-flow block only appear in the monthly view.
pub fn statement_rows(data: &FinancialData, view: StatementView) -> Vec<StatementRow> {
    let monthly = |f: fn(&MonthlyData) -> f64| data.monthly.iter().map(f).collect::<Vec<f64>>();
    let row = |label, style, values| StatementRow { label, style, values };

    match view {
        StatementView::Annual => {
            let revenue: Vec<f64> = data.annual.iter().map(|a| a.revenue).collect();
            let net_income: Vec<f64> = data.annual.iter().map(|a| a.net_income).collect();
            let cash: Vec<f64> = data.annual.iter().map(|a| a.cash).collect();
            // COGS and gross profit are summed from the months of each year
            let cogs: Vec<f64> = data
                .annual
                .iter()
                .map(|a| data.monthly.iter().filter(|m| m.year == a.year).map(|m| m.cogs).sum())
                .collect();
            let gross_profit: Vec<f64> = data
                .annual
                .iter()
                .map(|a| data.monthly.iter().filter(|m| m.year == a.year).map(|m| m.gross_profit).sum())
                .collect();

            vec![
                row("Revenue", RowStyle::Header, revenue),
                row("COGS", RowStyle::Subtotal, cogs),
                row("Gross Profit", RowStyle::Subtotal, gross_profit),
                row("Net Income", RowStyle::Header, net_income),
                row("Ending Cash", RowStyle::Header, cash),
            ]
        }
        StatementView::Monthly => vec![
            row("Revenue", RowStyle::Header, monthly(|m| m.revenue)),
            row("COGS", RowStyle::Subtotal, monthly(|m| m.cogs)),
            row("Gross Profit", RowStyle::Subtotal, monthly(|m| m.gross_profit)),
            row("Operating Expenses", RowStyle::Section, Vec::new()),
            row("  Marketing", RowStyle::Detail, monthly(|m| m.marketing)),
            row("  Sales", RowStyle::Detail, monthly(|m| m.sales_expense)),
            row("  Development", RowStyle::Detail, monthly(|m| m.dev_expense)),
            row("  G&A", RowStyle::Detail, monthly(|m| m.g_and_a_expense)),
            row("Total Operating Expenses", RowStyle::Subtotal, monthly(|m| m.total_operating_expense)),
            row("Net Income", RowStyle::Header, monthly(|m| m.net_income)),
            row("Cash Flow", RowStyle::Section, Vec::new()),
            row("  Cash Flow from Ops", RowStyle::Detail, monthly(|m| m.cash_flow_from_ops)),
            row("  Cash Flow from Financing", RowStyle::Detail, monthly(|m| m.cash_flow_from_financing)),
            row("Net Cash Flow", RowStyle::Subtotal, monthly(|m| m.net_cash_flow)),
            row("Ending Cash", RowStyle::Header, monthly(|m| m.cash)),
        ],
    }
}

/// Fixed-width text rendering of the statement table
pub fn render_statement(data: &FinancialData, view: StatementView) -> String {
    let headers = statement_headers(data, view);
    let rows = statement_rows(data, view);
    let label_width = rows.iter().map(|r| r.label.len()).max().unwrap_or(6).max(6);
    let col_width = 10;

    let mut out = String::new();
    out.push_str(&format!("{:<label_width$}", "Metric"));
    for h in &headers {
        out.push_str(&format!(" {:>col_width$}", h));
    }
    out.push('\n');
    out.push_str(&"-".repeat(label_width + headers.len() * (col_width + 1)));
    out.push('\n');

    for row in &rows {
        out.push_str(&format!("{:<label_width$}", row.label));
        if row.style == RowStyle::Section {
            for _ in &headers {
                out.push_str(&format!(" {:>col_width$}", "-"));
            }
        } else {
            for v in &row.values {
                out.push_str(&format!(" {:>col_width$}", format_compact_currency(*v)));
            }
        }
        out.push('\n');
    }

    out
}

/// Headline cards of the reports dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiCards {
    pub final_arr: String,
    pub ending_cash: String,
    pub peak_burn: String,
    pub runway: String,
}

impl KpiCards {
    pub fn from_data(data: &FinancialData) -> Self {
        let final_arr = data.final_month().map(|m| m.arr).unwrap_or(0.0);
        let ending_cash = data.year(5).map(|a| a.cash).unwrap_or(0.0);

        Self {
            final_arr: format_chart_currency(final_arr),
            ending_cash: format_chart_currency(ending_cash),
            peak_burn: format_chart_currency(data.kpis.peak_burn),
            runway: match data.kpis.runway_months {
                Runway::Unbounded => "Positive".to_string(),
                Runway::Months(m) => format!("{} Months", m),
            },
        }
    }

    /// (title, value) pairs in display order
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("ARR (Year 5)", self.final_arr.as_str()),
            ("Ending Cash (Year 5)", self.ending_cash.as_str()),
            ("Peak Monthly Burn", self.peak_burn.as_str()),
            ("Current Runway", self.runway.as_str()),
        ]
    }
}

/// One point of the revenue/net income and cash balance charts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub name: String,
    pub revenue: f64,
    pub net_income: f64,
    pub ending_cash: f64,
}

pub fn chart_series(data: &FinancialData) -> Vec<ChartPoint> {
    data.monthly
        .iter()
        .map(|m| ChartPoint {
            name: format!("M{}", m.month),
            revenue: m.revenue,
            net_income: m.net_income,
            ending_cash: m.cash,
        })
        .collect()
}

/// Write every monthly row as CSV with a header
pub fn write_monthly_csv<W: Write>(data: &FinancialData, writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in &data.monthly {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
