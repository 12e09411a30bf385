pub mod aggregator;
pub mod assembler;
pub mod executor;
pub mod planner;

pub use crate::domain::model::{
    AggregationError, AggregationResult, AreaCode, EmploymentRow, FetchOutcome, FetchRequest,
    OutcomeMap, SexSegment,
};
pub use crate::domain::ports::{ConfigProvider, EmploymentService};
pub use crate::utils::error::Result;
