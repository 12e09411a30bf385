use crate::domain::model::{FetchOutcome, FetchRequest, OutcomeMap};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;

/// Statistic selector for beginning-of-quarter employment.
const EMPLOYMENT_STATISTIC: &str = "Emp";

/// Issues every planned Census request concurrently and classifies each
/// response on its own. A failed call never affects the others.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_in_flight: usize,
}

impl BatchExecutor {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: None,
            max_in_flight: usize::MAX,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::new(client, config.census_base_url())
            .with_api_key(config.census_api_key().map(str::to_string))
            .with_max_in_flight(config.concurrent_requests()))
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Caps simultaneous upstream calls. Every request still runs.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Runs the whole plan and returns one outcome per (area, segment).
    ///
    /// Dropping the returned future abandons every in-flight call.
    pub async fn execute(&self, plan: Vec<FetchRequest>) -> OutcomeMap {
        if plan.is_empty() {
            return HashMap::new();
        }

        let limit = self.max_in_flight.min(plan.len());

        stream::iter(plan)
            .map(|request| async move {
                let outcome = self.fetch_one(&request).await;
                (request.key(), outcome)
            })
            .buffer_unordered(limit)
            .collect()
            .await
    }

    async fn fetch_one(&self, request: &FetchRequest) -> FetchOutcome {
        let state_code = request.area_code.as_str();
        let quarter = request.quarter.as_str();
        let sex = request.segment.query_code();

        tracing::debug!(state_code, quarter, sex, "employment.fetch.request");

        let mut query = vec![
            ("get", EMPLOYMENT_STATISTIC.to_string()),
            ("for", format!("state:{}", state_code)),
            ("time", quarter.to_string()),
            ("sex", sex.to_string()),
        ];
        if let Some(key) = &self.api_key {
            query.push(("key", key.clone()));
        }

        let response = match self.client.get(&self.base_url).query(&query).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    state_code,
                    quarter,
                    sex,
                    message = %e,
                    "employment.fetch.failed_connection"
                );
                return FetchOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                state_code,
                quarter,
                sex,
                status = status.as_u16(),
                "employment.fetch.failed_status"
            );
            return FetchOutcome::Failed(format!("Census API error: {}", status.as_u16()));
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    state_code,
                    quarter,
                    sex,
                    message = %e,
                    "employment.fetch.failed_connection"
                );
                return FetchOutcome::Failed(e.to_string());
            }
        };

        // The Census API answers "no data" with 204 and an empty body.
        let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

        match extract_employment(&payload) {
            Some(value) => {
                tracing::debug!(state_code, quarter, sex, value, "employment.fetch.response");
                FetchOutcome::Value(value)
            }
            None => {
                tracing::warn!(state_code, quarter, sex, "employment.fetch.empty_payload");
                FetchOutcome::Value(0)
            }
        }
    }
}

/// Reads the count out of a `[[header...], [value, ...]]` payload.
///
/// Returns `None` when there is no data row at all. A data row whose first
/// cell is missing or not numeric counts as zero.
pub fn extract_employment(payload: &Value) -> Option<u64> {
    let row = payload.get(1).filter(|row| !row.is_null())?;
    Some(row.get(0).map(coerce_count).unwrap_or(0))
}

fn coerce_count(cell: &Value) -> u64 {
    let value = match cell {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|v| v.min(i64::MAX as u64) as i64))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .unwrap_or(0)
        }
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    };
    value.max(0) as u64
}
