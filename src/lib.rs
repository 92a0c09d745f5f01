pub mod core;
pub mod experiment;
pub mod parse;
pub mod parser;
pub mod report;
pub mod run;

pub use crate::core::GlobalConfig;
pub use crate::core::error::{ExperimentError, Result};
pub use crate::parser::{AttributeType, AttributeValue, LogParser, ParseOutcome};
