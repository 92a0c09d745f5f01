pub mod config;
pub mod error;
pub mod planner;
pub mod platform;
pub mod utils;

pub use config::{GlobalConfig, ReportConfig, RunConfig, RunOrder};
pub use error::{ExperimentError, ExperimentErrorKind, Result};
pub use planner::PlannerExecutor;
pub use utils::{format_duration, is_executable};
