//! Editable assumption fields: labels, grouping and input conversion

use super::AssumptionsError;

/// How a field is entered and displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Money amount, shown with a `$` prefix
    Currency,
    /// Entered as a percentage, stored as a ratio
    Percentage,
    /// Plain number (headcount, month)
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSection {
    RevenueDrivers,
    CostsAndExpenses,
    CashAndFundraising,
}

impl FieldSection {
    pub fn title(&self) -> &'static str {
        match self {
            FieldSection::RevenueDrivers => "Revenue Drivers",
            FieldSection::CostsAndExpenses => "Costs & Expenses",
            FieldSection::CashAndFundraising => "Cash & Fundraising",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDescriptor {
    /// camelCase name, matches the serialized key
    pub name: &'static str,
    pub label: &'static str,
    pub section: FieldSection,
    pub kind: FieldKind,
    pub step: f64,
}

const fn field(
    name: &'static str,
    label: &'static str,
    section: FieldSection,
    kind: FieldKind,
    step: f64,
) -> FieldDescriptor {
    FieldDescriptor { name, label, section, kind, step }
}

use FieldKind::{Currency, Number, Percentage};
use FieldSection::{CashAndFundraising, CostsAndExpenses, RevenueDrivers};

/// All editable fields in display order
pub static FIELDS: [FieldDescriptor; 14] = [
    field("initialMonthlyRevenue", "Initial Monthly Revenue", RevenueDrivers, Currency, 1000.0),
    field("monthlyGrowthRate", "Monthly Growth Rate", RevenueDrivers, Percentage, 0.1),
    field("churnRate", "Monthly Churn Rate", RevenueDrivers, Percentage, 0.1),
    field("cogsPercentage", "COGS (% of Revenue)", CostsAndExpenses, Percentage, 0.1),
    field("marketingSpend", "Monthly Marketing Spend", CostsAndExpenses, Currency, 500.0),
    field("salesTeamSize", "Sales Team Size", CostsAndExpenses, Number, 1.0),
    field("salespersonSalary", "Avg Monthly Sales Salary", CostsAndExpenses, Currency, 500.0),
    field("devTeamSize", "Dev Team Size", CostsAndExpenses, Number, 1.0),
    field("devSalary", "Avg Monthly Dev Salary", CostsAndExpenses, Currency, 500.0),
    field("gAndATeamSize", "G&A Team Size", CostsAndExpenses, Number, 1.0),
    field("gAndASalary", "Avg Monthly G&A Salary", CostsAndExpenses, Currency, 500.0),
    field("initialCash", "Initial Cash Balance", CashAndFundraising, Currency, 10000.0),
    field("fundraisingAmount", "Fundraising Amount", CashAndFundraising, Currency, 50000.0),
    field("fundraisingMonth", "Fundraising Month (1-60)", CashAndFundraising, Number, 1.0),
];

/// Look up a field by camelCase or snake_case name
pub fn find_field(name: &str) -> Option<&'static FieldDescriptor> {
    let wanted: String = name.trim().chars().filter(|c| *c != '_').collect();
    FIELDS.iter().find(|f| f.name.eq_ignore_ascii_case(&wanted))
}

/// Convert raw user input into the stored value
///
/// Empty input is zero. Percentage fields are divided by 100.
pub fn parse_field_input(field: &FieldDescriptor, raw: &str) -> Result<f64, AssumptionsError> {
    let trimmed = raw.trim().trim_end_matches('%').trim_start_matches('$').replace(',', "");
    let value = if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse::<f64>().map_err(|_| AssumptionsError::InvalidNumber {
            field: field.name.to_string(),
            value: raw.to_string(),
        })?
    };

    Ok(match field.kind {
        FieldKind::Percentage => value / 100.0,
        FieldKind::Currency | FieldKind::Number => value,
    })
}
