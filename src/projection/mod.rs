//! Projection engine for the five-year monthly forecast

mod state;
mod engine;
mod cashflows;
mod model;

pub use state::{ProjectionState, year_of};
pub use engine::{compute, ProjectionEngine};
pub use cashflows::{
    annual_summaries, runway_from, AnnualSummary, FinancialData, Kpis, MonthlyData,
    ProjectionSummary, Runway, MONTHS_PER_YEAR, MONTHS_TO_FORECAST,
};
pub use model::{RevenueModel, SaasRevenueModel};
