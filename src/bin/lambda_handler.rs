//! AWS Lambda handler for running projections
//!
//! Accepts a partial set of assumptions as JSON, merges it over the template
//! for the requested business type and returns the full projection with its
//! summary and dashboard cards.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use serde::{Deserialize, Serialize};

use startup_model::projection::ProjectionSummary;
use startup_model::report::KpiCards;
use startup_model::{Assumptions, AssumptionsUpdate, BusinessType, FinancialData, ProjectionEngine};

/// Input for one projection
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectionRequest {
    /// Template to start from (every type currently uses SaaS)
    pub business_type: BusinessType,

    /// Fields to override; anything missing keeps the template value
    pub assumptions: AssumptionsUpdate,
}

/// Output from the projection
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResponse {
    pub business_type: BusinessType,
    pub assumptions: Assumptions,
    pub summary: ProjectionSummary,
    pub kpi_cards: KpiCards,
    pub data: FinancialData,
    pub execution_time_us: u64,
}

fn project(request: ProjectionRequest) -> ProjectionResponse {
    let start = std::time::Instant::now();

    let assumptions = Assumptions::template_for(request.business_type).merge(&request.assumptions);
    let data = ProjectionEngine::for_business(request.business_type, assumptions.clone()).run();

    ProjectionResponse {
        business_type: request.business_type,
        summary: data.summary(),
        kpi_cards: KpiCards::from_data(&data),
        assumptions,
        data,
        execution_time_us: start.elapsed().as_micros() as u64,
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<ProjectionRequest>) -> Result<ProjectionResponse, Error> {
    let (request, context) = event.into_parts();
    info!("Projection request {} for {}", context.request_id, request.business_type);
    Ok(project(request))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_uses_template() {
        let request: ProjectionRequest = serde_json::from_str("{}").unwrap();
        let response = project(request);

        assert_eq!(response.assumptions, Assumptions::saas_template());
        assert_eq!(response.data.monthly.len(), 60);
        assert_eq!(response.summary.total_months, 60);
    }

    #[test]
    fn test_partial_request_merges() {
        let request: ProjectionRequest = serde_json::from_str(
            r#"{"businessType": "Retail", "assumptions": {"fundraisingMonth": 1, "fundraisingAmount": 100000}}"#,
        )
        .unwrap();
        let response = project(request);

        assert_eq!(response.business_type, BusinessType::Retail);
        assert_eq!(response.data.monthly[0].cash_flow_from_financing, 100_000.0);
        assert_eq!(response.assumptions.churn_rate, 0.02);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["data"]["kpis"]["runwayMonths"].is_string() || json["data"]["kpis"]["runwayMonths"].is_object());
    }
}
