//! Core projection engine for the 60-month forecast

use log::debug;

use crate::assumptions::{Assumptions, BusinessType};
use super::cashflows::{FinancialData, MonthlyData, MONTHS_TO_FORECAST};
use super::model::{RevenueModel, SaasRevenueModel};
use super::state::ProjectionState;

/// Project a SaaS business
///
/// Pure and deterministic: the same assumptions always give the same result.
pub fn compute(assumptions: &Assumptions) -> FinancialData {
    ProjectionEngine::new(assumptions.clone()).run()
}

/// Main projection engine
pub struct ProjectionEngine {
    assumptions: Assumptions,
    model: Box<dyn RevenueModel>,
}

impl ProjectionEngine {
    /// Create an engine using the SaaS revenue model
    pub fn new(assumptions: Assumptions) -> Self {
        Self {
            assumptions,
            model: Box::new(SaasRevenueModel),
        }
    }

    /// Create an engine using the revenue model of a business type
    pub fn for_business(business_type: BusinessType, assumptions: Assumptions) -> Self {
        Self {
            assumptions,
            model: business_type.revenue_model(),
        }
    }

    /// Swap the revenue model
    pub fn with_model(mut self, model: Box<dyn RevenueModel>) -> Self {
        self.model = model;
        self
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Run the full forecast
    pub fn run(&self) -> FinancialData {
        let mut state = ProjectionState::from_assumptions(&self.assumptions);
        let mut monthly = Vec::with_capacity(MONTHS_TO_FORECAST as usize);

        for _month in 1..=MONTHS_TO_FORECAST {
            state.advance_month();
            let row = self.calculate_month(&state);
            state.close_month(row.revenue, row.cash);
            monthly.push(MonthlyData {
                cumulative_revenue: state.cumulative_revenue,
                ..row
            });
        }

        let data = FinancialData::from_monthly(monthly);
        debug!(
            "{} projection: final MRR {:.2}, final cash {:.2}, peak burn {:.2}, runway {}",
            self.model.name(),
            data.final_month().map(|m| m.mrr).unwrap_or(0.0),
            data.final_month().map(|m| m.cash).unwrap_or(0.0),
            data.kpis.peak_burn,
            data.kpis.runway_months,
        );
        data
    }

    /// Figures for the state's current month; cumulative revenue is filled in by the caller
    fn calculate_month(&self, state: &ProjectionState) -> MonthlyData {
        let a = &self.assumptions;

        // Revenue
        let revenue = self.model.next_revenue(state.previous_revenue, a);

        // Expenses
        let cogs = revenue * a.cogs_percentage;
        let gross_profit = revenue - cogs;

        let marketing = a.marketing_spend;
        let sales_expense = a.sales_expense();
        let dev_expense = a.dev_expense();
        let g_and_a_expense = a.g_and_a_expense();
        let total_operating_expense = marketing + sales_expense + dev_expense + g_and_a_expense;

        // P&L
        let net_income = gross_profit - total_operating_expense;

        // Cash flow: operations are taken as net income, no working-capital adjustment
        let cash_flow_from_ops = net_income;
        let cash_flow_from_financing = if f64::from(state.month) == a.fundraising_month {
            a.fundraising_amount
        } else {
            0.0
        };
        let net_cash_flow = cash_flow_from_ops + cash_flow_from_financing;

        // Balance sheet
        let cash = state.previous_cash + net_cash_flow;

        MonthlyData {
            month: state.month,
            year: state.year,
            revenue,
            cogs,
            gross_profit,
            marketing,
            sales_expense,
            dev_expense,
            g_and_a_expense,
            total_operating_expense,
            net_income,
            cash_flow_from_ops,
            cash_flow_from_financing,
            net_cash_flow,
            cash,
            mrr: revenue,
            arr: revenue * 12.0,
            cumulative_revenue: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::AssumptionsUpdate;
    use crate::projection::Runway;
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn flat_assumptions() -> Assumptions {
        Assumptions {
            initial_monthly_revenue: 1_000.0,
            monthly_growth_rate: 0.0,
            churn_rate: 0.0,
            cogs_percentage: 0.0,
            marketing_spend: 0.0,
            sales_team_size: 0.0,
            salesperson_salary: 0.0,
            dev_team_size: 0.0,
            dev_salary: 0.0,
            g_and_a_team_size: 0.0,
            g_and_a_salary: 0.0,
            initial_cash: 50_000.0,
            fundraising_amount: 0.0,
            fundraising_month: 12.0,
        }
    }

    fn burn_assumptions() -> Assumptions {
        Assumptions {
            initial_monthly_revenue: 1_000.0,
            monthly_growth_rate: 0.0,
            churn_rate: 0.0,
            cogs_percentage: 0.0,
            marketing_spend: 5_000.0,
            dev_team_size: 2.0,
            dev_salary: 10_000.0,
            initial_cash: 10_000.0,
            fundraising_amount: 0.0,
            ..flat_assumptions()
        }
    }

    #[test]
    fn test_horizon() {
        let data = compute(&Assumptions::saas_template());

        assert_eq!(data.monthly.len(), 60);
        assert_eq!(data.annual.len(), 5);
        for (i, row) in data.monthly.iter().enumerate() {
            assert_eq!(row.month, i as u32 + 1);
            assert_eq!(row.year, i as u32 / 12 + 1);
        }
        for (i, year) in data.annual.iter().enumerate() {
            assert_eq!(year.year, i as u32 + 1);
        }
    }

    #[test]
    fn test_deterministic() {
        let assumptions = Assumptions::saas_template();
        assert_eq!(compute(&assumptions), compute(&assumptions));
    }

    #[test]
    fn test_first_month_of_template() {
        let data = compute(&Assumptions::saas_template());
        let m1 = &data.monthly[0];

        assert_relative_eq!(m1.revenue, 10_780.0, epsilon = 1e-9);
        assert_relative_eq!(m1.cogs, 2_156.0, epsilon = 1e-9);
        assert_relative_eq!(m1.gross_profit, 8_624.0, epsilon = 1e-9);
        assert_eq!(m1.total_operating_expense, 3_000.0 + 14_000.0 + 30_000.0 + 8_000.0);
        assert_relative_eq!(m1.net_income, 8_624.0 - 55_000.0, epsilon = 1e-9);
        assert_eq!(m1.cash_flow_from_ops, m1.net_income);
        assert_eq!(m1.cash_flow_from_financing, 0.0);
        assert_relative_eq!(m1.cash, 250_000.0 + m1.net_income, epsilon = 1e-9);
        assert_eq!(m1.mrr, m1.revenue);
        assert_eq!(m1.arr, m1.revenue * 12.0);
        assert_eq!(m1.cumulative_revenue, m1.revenue);
    }

    #[test]
    fn test_cash_chain() {
        let assumptions = Assumptions::saas_template();
        let data = compute(&assumptions);

        assert_eq!(data.monthly[0].cash, assumptions.initial_cash + data.monthly[0].net_cash_flow);
        for pair in data.monthly.windows(2) {
            assert_eq!(pair[1].cash, pair[0].cash + pair[1].net_cash_flow);
        }
    }

    #[test]
    fn test_cumulative_revenue_running_total() {
        let data = compute(&Assumptions::saas_template());
        let mut running = 0.0;
        for row in &data.monthly {
            running += row.revenue;
            assert_eq!(row.cumulative_revenue, running);
        }
    }

    #[test]
    fn test_annual_rollups() {
        let data = compute(&Assumptions::saas_template());

        for (y, year) in data.annual.iter().enumerate() {
            let months = &data.monthly[y * 12..(y + 1) * 12];
            let revenue: f64 = months.iter().map(|m| m.revenue).sum();
            let net_income: f64 = months.iter().map(|m| m.net_income).sum();

            assert_relative_eq!(year.revenue, revenue, max_relative = 1e-12);
            assert_relative_eq!(year.net_income, net_income, max_relative = 1e-12);
            assert_eq!(year.cash, data.monthly[(y + 1) * 12 - 1].cash);
        }
    }

    #[test]
    fn test_fundraising_lands_in_exact_month() {
        let assumptions = Assumptions::saas_template();
        let data = compute(&assumptions);

        let funded: Vec<u32> = data
            .monthly
            .iter()
            .filter(|m| m.cash_flow_from_financing != 0.0)
            .map(|m| m.month)
            .collect();
        assert_eq!(funded, vec![12]);
        assert_eq!(data.monthly[11].cash_flow_from_financing, 500_000.0);
    }

    #[test]
    fn test_fundraising_outside_horizon_never_lands() {
        for month in [0.0, -3.0, 61.0] {
            let assumptions = Assumptions {
                fundraising_month: month,
                ..Assumptions::saas_template()
            };
            let data = compute(&assumptions);
            assert!(data.monthly.iter().all(|m| m.cash_flow_from_financing == 0.0));
        }
    }

    #[test]
    fn test_fractional_or_nan_fundraising_month_never_lands() {
        for month in [12.5, 0.999, f64::NAN] {
            let assumptions = Assumptions {
                fundraising_month: month,
                ..Assumptions::saas_template()
            };
            let data = compute(&assumptions);
            assert!(data.monthly.iter().all(|m| m.cash_flow_from_financing == 0.0));
        }

        let mut update = AssumptionsUpdate::new();
        update.set_input("fundraisingMonth", "12.5").unwrap();
        let data = compute(&Assumptions::saas_template().merge(&update));
        assert!(data.monthly.iter().all(|m| m.cash_flow_from_financing == 0.0));

        let update = AssumptionsUpdate::from_json_str(r#"{"fundraisingMonth": 12.5}"#).unwrap();
        assert_eq!(update.fundraising_month, Some(12.5));
    }

    #[test]
    fn test_flat_business() {
        let assumptions = flat_assumptions();
        let data = compute(&assumptions);

        for row in &data.monthly {
            assert_eq!(row.revenue, 1_000.0);
            assert_eq!(row.net_income, 1_000.0);
            assert_eq!(row.cash, assumptions.initial_cash + 1_000.0 * row.month as f64);
        }
        assert_eq!(data.kpis.peak_burn, 0.0);
        assert_eq!(data.kpis.runway_months, Runway::Unbounded);
    }

    #[test]
    fn test_immediate_fundraising() {
        let assumptions = Assumptions {
            fundraising_month: 1.0,
            fundraising_amount: 500_000.0,
            initial_cash: 100_000.0,
            ..Assumptions::saas_template()
        };
        let data = compute(&assumptions);
        let m1 = &data.monthly[0];

        assert_eq!(m1.cash_flow_from_financing, 500_000.0);
        assert_relative_eq!(m1.cash, 100_000.0 + m1.net_income + 500_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pure_burn_uses_final_month_snapshot() {
        let data = compute(&burn_assumptions());

        // Revenue 1,000 against 25,000 of costs every month
        for row in &data.monthly {
            assert_eq!(row.net_cash_flow, -24_000.0);
        }
        assert_eq!(data.kpis.peak_burn, -24_000.0);

        // Cash is long gone by month 60, so the snapshot reports zero
        let last = data.final_month().unwrap();
        assert!(last.cash <= 0.0);
        assert_eq!(data.kpis.runway_months, Runway::Months(0));
    }

    #[test]
    fn test_runway_counts_from_month_sixty() {
        // Enough cash that month 60 is still positive while burning
        let assumptions = Assumptions {
            initial_cash: 2_000_000.0,
            ..burn_assumptions()
        };
        let data = compute(&assumptions);
        let last = data.final_month().unwrap();

        assert_eq!(last.cash, 2_000_000.0 - 24_000.0 * 60.0);
        let expected = (last.cash / last.net_cash_flow.abs()).floor() as u64;
        assert_eq!(data.kpis.runway_months, Runway::Months(expected));
        assert_eq!(expected, 23);
    }

    #[test]
    fn test_recovery_after_dip_reports_unbounded() {
        // Early burn into negative cash, then a raise late in the horizon
        let assumptions = Assumptions {
            initial_monthly_revenue: 20_000.0,
            monthly_growth_rate: 0.08,
            churn_rate: 0.0,
            initial_cash: 10_000.0,
            fundraising_amount: 1_000_000.0,
            fundraising_month: 30.0,
            ..Assumptions::saas_template()
        };
        let data = compute(&assumptions);

        assert!(data.monthly.iter().any(|m| m.cash < 0.0));
        let last = data.final_month().unwrap();
        assert!(last.cash > 0.0 && last.net_cash_flow >= 0.0);
        assert_eq!(data.kpis.runway_months, Runway::Unbounded);
        assert!(data.kpis.peak_burn < 0.0);
    }

    #[test]
    fn test_nan_propagates() {
        let assumptions = Assumptions {
            monthly_growth_rate: f64::NAN,
            ..Assumptions::saas_template()
        };
        let data = compute(&assumptions);

        assert!(data.monthly.iter().all(|m| m.revenue.is_nan() && m.cash.is_nan()));
        assert!(data.annual.iter().all(|a| a.revenue.is_nan()));
        assert_eq!(data.kpis.peak_burn, 0.0);
        assert_eq!(data.kpis.runway_months, Runway::Unbounded);
    }

    #[test]
    fn test_custom_revenue_model() {
        struct Flat;
        impl RevenueModel for Flat {
            fn name(&self) -> &'static str {
                "flat"
            }
            fn next_revenue(&self, previous_revenue: f64, _assumptions: &Assumptions) -> f64 {
                previous_revenue
            }
        }

        let data = ProjectionEngine::new(Assumptions::saas_template())
            .with_model(Box::new(Flat))
            .run();
        assert!(data.monthly.iter().all(|m| m.revenue == 10_000.0));
    }

    #[test]
    fn test_every_business_type_projects_like_saas() {
        let expected = compute(&Assumptions::saas_template());
        for business_type in BusinessType::ALL {
            let data = ProjectionEngine::for_business(business_type, Assumptions::saas_template()).run();
            assert_eq!(data, expected);
        }
    }

    fn arbitrary_assumptions(
        revenue: u32,
        growth_bp: u32,
        churn_bp: u32,
        cogs_bp: u32,
        headcount: u32,
        cash: u32,
        raise: u32,
        raise_month: i64,
    ) -> Assumptions {
        Assumptions {
            initial_monthly_revenue: revenue as f64,
            monthly_growth_rate: growth_bp as f64 / 10_000.0,
            churn_rate: churn_bp as f64 / 10_000.0,
            cogs_percentage: cogs_bp as f64 / 10_000.0,
            dev_team_size: headcount as f64,
            initial_cash: cash as f64,
            fundraising_amount: raise as f64,
            fundraising_month: raise_month as f64,
            ..Assumptions::saas_template()
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_series_shape_and_cash_chain_hold(
            revenue in 0u32..200_000,
            growth_bp in 0u32..2_000,
            churn_bp in 0u32..1_000,
            cogs_bp in 0u32..10_000,
            headcount in 0u32..20,
            cash in 0u32..5_000_000,
            raise in 0u32..10_000_000,
            raise_month in -5i64..70
        ) {
            let assumptions = arbitrary_assumptions(
                revenue, growth_bp, churn_bp, cogs_bp, headcount, cash, raise, raise_month,
            );
            let data = compute(&assumptions);

            prop_assert_eq!(data.monthly.len(), 60);
            prop_assert_eq!(data.annual.len(), 5);
            prop_assert_eq!(&data, &compute(&assumptions));

            let mut previous_cash = assumptions.initial_cash;
            for (i, m) in data.monthly.iter().enumerate() {
                prop_assert_eq!(m.month as usize, i + 1);
                prop_assert_eq!(m.year as usize, i / 12 + 1);
                prop_assert_eq!(m.cash_flow_from_ops, m.net_income);
                prop_assert_eq!(m.cash, previous_cash + m.net_cash_flow);
                prop_assert_eq!(m.arr, m.mrr * 12.0);
                previous_cash = m.cash;
            }

            for summary in &data.annual {
                let months = &data.monthly[(summary.year as usize - 1) * 12..summary.year as usize * 12];
                let revenue: f64 = months.iter().map(|m| m.revenue).sum();
                assert_relative_eq!(summary.revenue, revenue, max_relative = 1e-9);
                prop_assert_eq!(summary.cash, months[11].cash);
            }
        }

        #[test]
        fn prop_fundraising_lands_once_inside_horizon(
            raise in 1u32..10_000_000,
            raise_month in -5i64..70
        ) {
            let assumptions = arbitrary_assumptions(10_000, 500, 200, 2_000, 2, 500_000, raise, raise_month);
            let data = compute(&assumptions);

            let funded: Vec<_> = data
                .monthly
                .iter()
                .filter(|m| m.cash_flow_from_financing != 0.0)
                .map(|m| m.month as i64)
                .collect();
            if (1..=60).contains(&raise_month) {
                prop_assert_eq!(funded, vec![raise_month]);
            } else {
                prop_assert!(funded.is_empty());
            }
        }

        #[test]
        fn prop_kpis_follow_final_month(
            revenue in 0u32..200_000,
            growth_bp in 0u32..2_000,
            churn_bp in 0u32..1_000,
            headcount in 0u32..20,
            cash in 0u32..5_000_000
        ) {
            let assumptions = arbitrary_assumptions(revenue, growth_bp, churn_bp, 2_000, headcount, cash, 0, 0);
            let data = compute(&assumptions);
            let last = &data.monthly[59];

            prop_assert!(data.kpis.peak_burn <= 0.0);
            prop_assert!(data.monthly.iter().all(|m| m.net_cash_flow >= data.kpis.peak_burn));

            match data.kpis.runway_months {
                Runway::Unbounded => {
                    prop_assert!(last.cash > 0.0 && last.net_cash_flow >= 0.0);
                }
                Runway::Months(0) => {
                    prop_assert!(last.cash <= 0.0 || last.cash < last.net_cash_flow.abs());
                }
                Runway::Months(m) => {
                    prop_assert!(last.net_cash_flow < 0.0 && last.cash > 0.0);
                    prop_assert_eq!(m, (last.cash / last.net_cash_flow.abs()).floor() as u64);
                }
            }
        }
    }
}
