//! Values carried from one forecast month to the next

use crate::assumptions::Assumptions;
use super::cashflows::MONTHS_PER_YEAR;

/// Running state of the monthly recurrence
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Current month (1-indexed, 0 before the first month)
    pub month: u32,

    /// Forecast year of the current month (1-indexed)
    pub year: u32,

    /// Revenue of the prior month (initial revenue before month 1)
    pub previous_revenue: f64,

    /// Ending cash of the prior month (initial cash before month 1)
    pub previous_cash: f64,

    /// Revenue summed over every month processed so far
    pub cumulative_revenue: f64,
}

impl ProjectionState {
    /// State before the first forecast month
    pub fn from_assumptions(assumptions: &Assumptions) -> Self {
        Self {
            month: 0,
            year: 1,
            previous_revenue: assumptions.initial_monthly_revenue,
            previous_cash: assumptions.initial_cash,
            cumulative_revenue: 0.0,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.month += 1;
        self.year = year_of(self.month);
    }

    /// Record the month's results so the next month can build on them
    pub fn close_month(&mut self, revenue: f64, cash: f64) {
        self.previous_revenue = revenue;
        self.previous_cash = cash;
        self.cumulative_revenue += revenue;
    }
}

/// Forecast year of a 1-indexed month
pub fn year_of(month: u32) -> u32 {
    month.div_ceil(MONTHS_PER_YEAR).max(1)
}
