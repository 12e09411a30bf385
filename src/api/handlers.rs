use crate::api::{failure_response, panic_detail, AppState};
use crate::config::states::select_codes;
use crate::domain::model::{AggregationError, AggregationResult, EmploymentRow};
use crate::utils::error::CensusError;
use crate::utils::validation::validate_quarter;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct EmploymentQuery {
    pub quarter: Option<String>,
    pub states: Option<String>,
    #[serde(rename = "breakdownSex")]
    pub breakdown_sex: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Vec<EmploymentRow>,
    pub errors: Vec<AggregationError>,
    pub has_errors: bool,
}

impl From<AggregationResult> for EmploymentResponse {
    fn from(result: AggregationResult) -> Self {
        let has_errors = result.has_errors();
        let message = result
            .failed_all()
            .then(|| "Upstream aggregation failed".to_string());

        Self {
            message,
            data: result.rows,
            errors: result.errors,
            has_errors,
        }
    }
}

impl IntoResponse for CensusError {
    fn into_response(self) -> Response {
        match &self {
            CensusError::InvalidQuarter { .. } => {
                let reason = self.user_friendly_message();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "message": reason,
                        "errors": { "quarter": [reason] },
                    })),
                )
                    .into_response()
            }
            _ => {
                tracing::error!(error = %self, "employment.index.failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "data": { "message": "Failed to load employment data" } })),
                )
                    .into_response()
            }
        }
    }
}

/// Accepts the usual HTML-form spellings of a checked box.
pub fn parse_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "on" | "yes")
    )
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_states(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "data": state.states.as_slice() }))
}

pub async fn list_employments(
    State(state): State<AppState>,
    Query(query): Query<EmploymentQuery>,
) -> Result<Response, CensusError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("employment_request", %request_id);

    async move {
        let started_at = Instant::now();

        tracing::info!(
            quarter = query.quarter.as_deref(),
            states_param = query.states.as_deref().unwrap_or("ALL"),
            breakdown_sex = query.breakdown_sex.as_deref(),
            "employment.index.started"
        );

        let quarter = query.quarter.as_deref().map(str::trim).unwrap_or_default();
        if quarter.is_empty() {
            return Err(CensusError::InvalidQuarter {
                value: String::new(),
                reason: "The quarter field is required.".to_string(),
            });
        }
        validate_quarter(quarter)?;

        let breakdown = parse_flag(query.breakdown_sex.as_deref());
        let codes = select_codes(&state.states, query.states.as_deref());

        let summary = state.service.get_employment_summary(&codes, quarter, breakdown);
        let outcome = AssertUnwindSafe(summary).catch_unwind().await;

        let duration_ms = started_at.elapsed().as_millis() as u64;
        let state_count = codes.len();

        let result = match outcome {
            Ok(result) => result,
            Err(cause) => {
                tracing::error!(
                    state_count,
                    duration_ms,
                    error = panic_detail(cause.as_ref()),
                    "employment.index.failed"
                );
                return Ok(failure_response());
            }
        };
        let error_count = result.errors.len();

        let status = if result.failed_all() {
            tracing::error!(state_count, error_count, duration_ms, "employment.index.failed_all");
            StatusCode::BAD_GATEWAY
        } else if result.has_errors() {
            tracing::warn!(
                state_count,
                error_count,
                duration_ms,
                "employment.index.completed_with_errors"
            );
            StatusCode::OK
        } else {
            tracing::info!(state_count, duration_ms, "employment.index.succeeded");
            StatusCode::OK
        };

        Ok((status, Json(EmploymentResponse::from(result))).into_response())
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Breakdown, SexSegment};

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("1")));
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("TRUE")));
        assert!(parse_flag(Some("on")));
        assert!(parse_flag(Some("yes")));
        assert!(!parse_flag(Some("0")));
        assert!(!parse_flag(Some("false")));
        assert!(!parse_flag(Some("")));
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_response_flags_total_failure() {
        let result = AggregationResult {
            rows: vec![],
            errors: vec![AggregationError {
                state_code: "01".to_string(),
                sex: Some(SexSegment::Male),
                message: "Census API error: 500".to_string(),
            }],
        };

        let response = EmploymentResponse::from(result);
        assert_eq!(response.message.as_deref(), Some("Upstream aggregation failed"));
        assert!(response.has_errors);
    }

    #[test]
    fn test_response_with_rows_has_no_message() {
        let result = AggregationResult {
            rows: vec![EmploymentRow {
                state_code: "06".to_string(),
                state_name: "California".to_string(),
                male: Breakdown::Absent,
                female: Breakdown::Absent,
                total: Some(25),
            }],
            errors: vec![],
        };

        let json = serde_json::to_value(EmploymentResponse::from(result)).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["hasErrors"], false);
        assert_eq!(json["data"][0]["stateName"], "California");
    }
}
