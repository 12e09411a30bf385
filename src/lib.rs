pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::CliConfig;
pub use crate::core::{aggregator::EmploymentAggregator, executor::BatchExecutor};
pub use crate::domain::model::{
    AggregationError, AggregationResult, EmploymentRow, SexSegment, StateInfo,
};
pub use crate::utils::error::{CensusError, Result};
