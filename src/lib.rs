//! Startup Model - five-year financial projections for an early-stage SaaS business
//!
//! This library provides:
//! - The monthly projection engine (revenue, costs, cash) over a 60-month horizon
//! - Annual roll-ups and headline KPIs (peak burn, runway)
//! - Assumption templates, partial updates and file loaders
//! - Statement tables, dashboard cards and CSV export
//! - An AI advisor that answers questions using the projected numbers
//! - Batch and sensitivity scenario runs

pub mod assumptions;
pub mod projection;
pub mod report;
pub mod advisor;
pub mod session;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{Assumptions, AssumptionsUpdate, BusinessType};
pub use projection::{compute, FinancialData, MonthlyData, AnnualSummary, Kpis, Runway, ProjectionEngine};
pub use advisor::{Advisor, AdvisorConfig, GeminiClient};
pub use session::{ModelSession, ChatMessage};
pub use scenario::ScenarioRunner;
