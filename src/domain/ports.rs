use crate::domain::model::{AggregationResult, AreaCode, StateInfo};
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn census_base_url(&self) -> &str;
    fn census_api_key(&self) -> Option<&str>;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn states(&self) -> &[StateInfo];
}

/// Entry point the HTTP layer calls into; lets handlers be tested without
/// an upstream.
#[async_trait]
pub trait EmploymentService: Send + Sync {
    async fn get_employment_summary(
        &self,
        area_codes: &[AreaCode],
        quarter: &str,
        breakdown: bool,
    ) -> AggregationResult;
}
