use crate::core::assembler::assemble;
use crate::core::executor::BatchExecutor;
use crate::core::planner::plan;
use crate::domain::model::{AggregationResult, AreaCode, StateInfo};
use crate::domain::ports::{ConfigProvider, EmploymentService};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Plans, fetches and assembles an employment summary for a set of states.
pub struct EmploymentAggregator {
    executor: BatchExecutor,
    names: HashMap<AreaCode, String>,
}

impl EmploymentAggregator {
    pub fn new(executor: BatchExecutor, states: &[StateInfo]) -> Self {
        let names = states
            .iter()
            .map(|s| (s.code.clone(), s.name.clone()))
            .collect();
        Self { executor, names }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let executor = BatchExecutor::from_config(config)?;
        Ok(Self::new(executor, config.states()))
    }

    pub async fn get_employment_summary(
        &self,
        area_codes: &[AreaCode],
        quarter: &str,
        breakdown: bool,
    ) -> AggregationResult {
        let state_count = area_codes.len();

        tracing::info!(
            quarter,
            state_count,
            breakdown_sex = breakdown,
            "employment.summary.fetch_started"
        );

        let requests = plan(area_codes, quarter, breakdown);
        let outcomes = self.executor.execute(requests).await;
        let result = assemble(area_codes, &self.names, &outcomes, breakdown);

        let error_count = result.errors.len();
        let has_errors = result.has_errors();
        let has_data = result.has_rows();

        if has_data {
            tracing::info!(
                quarter,
                state_count,
                breakdown_sex = breakdown,
                error_count,
                has_errors,
                has_data,
                "employment.summary.fetch_succeeded"
            );
        } else if has_errors {
            tracing::error!(
                quarter,
                state_count,
                breakdown_sex = breakdown,
                error_count,
                has_errors,
                has_data,
                "employment.summary.fetch_failed_all"
            );
        } else {
            tracing::info!(quarter, state_count, "employment.summary.fetch_empty");
        }

        result
    }
}

#[async_trait]
impl EmploymentService for EmploymentAggregator {
    async fn get_employment_summary(
        &self,
        area_codes: &[AreaCode],
        quarter: &str,
        breakdown: bool,
    ) -> AggregationResult {
        EmploymentAggregator::get_employment_summary(self, area_codes, quarter, breakdown).await
    }
}
