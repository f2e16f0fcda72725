//! Business assumptions driving the projection, plus templates and partial updates

mod fields;
pub mod loader;

pub use fields::{FieldDescriptor, FieldKind, FieldSection, FIELDS, find_field, parse_field_input};
pub use loader::AssumptionsError;

use serde::{Deserialize, Serialize};

/// Business model selected for the forecast
///
/// Only the SaaS recurrence exists today; every variant resolves to the SaaS
/// template and revenue model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BusinessType {
    #[default]
    SaaS,
    Ecommerce,
    Marketplace,
    Services,
    Hardware,
    Retail,
    Other,
}

impl BusinessType {
    pub const ALL: [BusinessType; 7] = [
        BusinessType::SaaS,
        BusinessType::Ecommerce,
        BusinessType::Marketplace,
        BusinessType::Services,
        BusinessType::Hardware,
        BusinessType::Retail,
        BusinessType::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BusinessType::SaaS => "SaaS",
            BusinessType::Ecommerce => "Ecommerce",
            BusinessType::Marketplace => "Marketplace",
            BusinessType::Services => "Services",
            BusinessType::Hardware => "Hardware",
            BusinessType::Retail => "Retail",
            BusinessType::Other => "Other",
        }
    }
}

impl std::str::FromStr for BusinessType {
    type Err = AssumptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusinessType::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AssumptionsError::UnknownBusinessType(s.to_string()))
    }
}

impl std::fmt::Display for BusinessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs for one projection run
///
/// Rates are decimal fractions (0.10 = 10%). Nothing here is validated:
/// negative or zero values flow through the recurrence unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    // Revenue
    /// Revenue basis for month 1 (growth and churn apply on top of it)
    pub initial_monthly_revenue: f64,
    /// Month-over-month growth, applied before churn
    pub monthly_growth_rate: f64,
    /// Fraction of revenue lost each month
    pub churn_rate: f64,

    // Costs
    /// Cost of goods sold as a fraction of revenue
    pub cogs_percentage: f64,
    /// Fixed monthly marketing spend
    pub marketing_spend: f64,
    pub sales_team_size: f64,
    pub salesperson_salary: f64,
    pub dev_team_size: f64,
    pub dev_salary: f64,
    #[serde(rename = "gAndATeamSize")]
    pub g_and_a_team_size: f64,
    #[serde(rename = "gAndASalary")]
    pub g_and_a_salary: f64,

    // Fundraising
    /// Cash balance before month 1
    pub initial_cash: f64,
    /// One-time cash injection
    pub fundraising_amount: f64,
    /// 1-indexed month in which the injection lands; only an exact match lands
    pub fundraising_month: f64,
}

impl Assumptions {
    /// Starting point for a SaaS business
    pub fn saas_template() -> Self {
        Self {
            initial_monthly_revenue: 10_000.0,
            monthly_growth_rate: 0.10, // 10%
            churn_rate: 0.02,          // 2%

            cogs_percentage: 0.20, // 20%
            marketing_spend: 3_000.0,
            sales_team_size: 2.0,
            salesperson_salary: 7_000.0,
            dev_team_size: 3.0,
            dev_salary: 10_000.0,
            g_and_a_team_size: 1.0,
            g_and_a_salary: 8_000.0,

            initial_cash: 250_000.0,
            fundraising_amount: 500_000.0,
            fundraising_month: 12.0,
        }
    }

    /// Template for a business type
    pub fn template_for(_business_type: BusinessType) -> Self {
        // Every business type starts from the SaaS template until other
        // revenue models exist.
        Self::saas_template()
    }

    /// Return a new record with the provided fields overridden
    pub fn merge(&self, update: &AssumptionsUpdate) -> Self {
        Self {
            initial_monthly_revenue: update.initial_monthly_revenue.unwrap_or(self.initial_monthly_revenue),
            monthly_growth_rate: update.monthly_growth_rate.unwrap_or(self.monthly_growth_rate),
            churn_rate: update.churn_rate.unwrap_or(self.churn_rate),
            cogs_percentage: update.cogs_percentage.unwrap_or(self.cogs_percentage),
            marketing_spend: update.marketing_spend.unwrap_or(self.marketing_spend),
            sales_team_size: update.sales_team_size.unwrap_or(self.sales_team_size),
            salesperson_salary: update.salesperson_salary.unwrap_or(self.salesperson_salary),
            dev_team_size: update.dev_team_size.unwrap_or(self.dev_team_size),
            dev_salary: update.dev_salary.unwrap_or(self.dev_salary),
            g_and_a_team_size: update.g_and_a_team_size.unwrap_or(self.g_and_a_team_size),
            g_and_a_salary: update.g_and_a_salary.unwrap_or(self.g_and_a_salary),
            initial_cash: update.initial_cash.unwrap_or(self.initial_cash),
            fundraising_amount: update.fundraising_amount.unwrap_or(self.fundraising_amount),
            fundraising_month: update.fundraising_month.unwrap_or(self.fundraising_month),
        }
    }

    pub fn sales_expense(&self) -> f64 {
        self.sales_team_size * self.salesperson_salary
    }

    pub fn dev_expense(&self) -> f64 {
        self.dev_team_size * self.dev_salary
    }

    pub fn g_and_a_expense(&self) -> f64 {
        self.g_and_a_team_size * self.g_and_a_salary
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::saas_template()
    }
}

/// Subset of assumption fields to override
///
/// Fields left as `None` keep their prior value when merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssumptionsUpdate {
    pub initial_monthly_revenue: Option<f64>,
    pub monthly_growth_rate: Option<f64>,
    pub churn_rate: Option<f64>,
    pub cogs_percentage: Option<f64>,
    pub marketing_spend: Option<f64>,
    pub sales_team_size: Option<f64>,
    pub salesperson_salary: Option<f64>,
    pub dev_team_size: Option<f64>,
    pub dev_salary: Option<f64>,
    #[serde(rename = "gAndATeamSize")]
    pub g_and_a_team_size: Option<f64>,
    #[serde(rename = "gAndASalary")]
    pub g_and_a_salary: Option<f64>,
    pub initial_cash: Option<f64>,
    pub fundraising_amount: Option<f64>,
    pub fundraising_month: Option<f64>,
}

impl AssumptionsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Set one field by name (camelCase or snake_case), value already in ratio units
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), AssumptionsError> {
        let field = find_field(name).ok_or_else(|| AssumptionsError::UnknownField(name.to_string()))?;
        match field.name {
            "initialMonthlyRevenue" => self.initial_monthly_revenue = Some(value),
            "monthlyGrowthRate" => self.monthly_growth_rate = Some(value),
            "churnRate" => self.churn_rate = Some(value),
            "cogsPercentage" => self.cogs_percentage = Some(value),
            "marketingSpend" => self.marketing_spend = Some(value),
            "salesTeamSize" => self.sales_team_size = Some(value),
            "salespersonSalary" => self.salesperson_salary = Some(value),
            "devTeamSize" => self.dev_team_size = Some(value),
            "devSalary" => self.dev_salary = Some(value),
            "gAndATeamSize" => self.g_and_a_team_size = Some(value),
            "gAndASalary" => self.g_and_a_salary = Some(value),
            "initialCash" => self.initial_cash = Some(value),
            "fundraisingAmount" => self.fundraising_amount = Some(value),
            "fundraisingMonth" => self.fundraising_month = Some(value),
            other => return Err(AssumptionsError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Parse a raw form input for a field and set it
    ///
    /// Percentage fields are entered as percentages and stored as ratios.
    pub fn set_input(&mut self, name: &str, raw: &str) -> Result<(), AssumptionsError> {
        let field = find_field(name).ok_or_else(|| AssumptionsError::UnknownField(name.to_string()))?;
        let value = parse_field_input(field, raw)?;
        self.set(field.name, value)
    }

    /// Layer another update on top of this one; fields set in `other` win
    pub fn combine(&self, other: &AssumptionsUpdate) -> AssumptionsUpdate {
        AssumptionsUpdate {
            initial_monthly_revenue: other.initial_monthly_revenue.or(self.initial_monthly_revenue),
            monthly_growth_rate: other.monthly_growth_rate.or(self.monthly_growth_rate),
            churn_rate: other.churn_rate.or(self.churn_rate),
            cogs_percentage: other.cogs_percentage.or(self.cogs_percentage),
            marketing_spend: other.marketing_spend.or(self.marketing_spend),
            sales_team_size: other.sales_team_size.or(self.sales_team_size),
            salesperson_salary: other.salesperson_salary.or(self.salesperson_salary),
            dev_team_size: other.dev_team_size.or(self.dev_team_size),
            dev_salary: other.dev_salary.or(self.dev_salary),
            g_and_a_team_size: other.g_and_a_team_size.or(self.g_and_a_team_size),
            g_and_a_salary: other.g_and_a_salary.or(self.g_and_a_salary),
            initial_cash: other.initial_cash.or(self.initial_cash),
            fundraising_amount: other.fundraising_amount.or(self.fundraising_amount),
            fundraising_month: other.fundraising_month.or(self.fundraising_month),
        }
    }
}
