//! Revenue models keyed by business type

use crate::assumptions::{Assumptions, BusinessType};

/// Month-over-month revenue step for one kind of business
pub trait RevenueModel: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Revenue for the next month given the prior month's revenue
    fn next_revenue(&self, previous_revenue: f64, assumptions: &Assumptions) -> f64;
}

/// Subscription revenue: compound growth, then churn on the grown amount
#[derive(Debug, Clone, Copy, Default)]
pub struct SaasRevenueModel;

impl RevenueModel for SaasRevenueModel {
    fn name(&self) -> &'static str {
        "SaaS"
    }

    fn next_revenue(&self, previous_revenue: f64, assumptions: &Assumptions) -> f64 {
        let gross_new_revenue = previous_revenue * (1.0 + assumptions.monthly_growth_rate);
        let churned_revenue = gross_new_revenue * assumptions.churn_rate;
        gross_new_revenue - churned_revenue
    }
}

impl BusinessType {
    /// Revenue model used to project this business type
    pub fn revenue_model(&self) -> Box<dyn RevenueModel> {
        match self {
            // Only the subscription recurrence is implemented
            BusinessType::SaaS
            | BusinessType::Ecommerce
            | BusinessType::Marketplace
            | BusinessType::Services
            | BusinessType::Hardware
            | BusinessType::Retail
            | BusinessType::Other => Box::new(SaasRevenueModel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_saas_growth_then_churn() {
        let assumptions = Assumptions::saas_template();
        let next = SaasRevenueModel.next_revenue(10_000.0, &assumptions);

        // 10,000 * 1.10 = 11,000; 2% churn of 11,000 = 220
        assert_relative_eq!(next, 10_780.0, epsilon = 1e-9);
    }

    #[test]
    fn test_full_churn_wipes_revenue() {
        let assumptions = Assumptions {
            churn_rate: 1.0,
            ..Assumptions::saas_template()
        };
        assert_eq!(SaasRevenueModel.next_revenue(10_000.0, &assumptions), 0.0);
    }

    #[test]
    fn test_all_business_types_resolve_to_saas() {
        for t in BusinessType::ALL {
            assert_eq!(t.revenue_model().name(), "SaaS");
        }
    }
}
