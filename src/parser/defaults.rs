//! The standard attribute set for planner run logs.

use super::{AttributeType, LogParser};
use crate::core::Result;

/// Build the default parser: domain-abstraction metrics plus the usual
/// search statistics printed by the planner at the end of a run.
pub fn planner_parser() -> Result<LogParser> {
    let mut parser = LogParser::new();

    parser.add_pattern(
        "Num AbstractStates",
        r"#Abstract States: (\d+)",
        AttributeType::Int,
    )?;
    parser.add_pattern(
        "Num CEGAR Loop Iterations",
        r"#CEGAR Loop Iterations: (\d+)",
        AttributeType::Int,
    )?;
    parser.add_pattern(
        "Precalculation-Time",
        r"Time for precalculation of heuristic-values: (\d+(?:\.\d+)?)s",
        AttributeType::Float,
    )?;

    parser.add_pattern("Expansions", r"Expanded (\d+) state", AttributeType::Int)?;
    parser.add_pattern("Evaluations", r"Evaluated (\d+) state", AttributeType::Int)?;
    parser.add_pattern("Generated", r"Generated (\d+) state", AttributeType::Int)?;
    parser.add_pattern("Plan-Cost", r"Plan cost: (\d+)", AttributeType::Int)?;
    parser.add_pattern(
        "Search-Time",
        r"Search time: (\d+(?:\.\d+)?)s",
        AttributeType::Float,
    )?;
    parser.add_pattern(
        "Total-Time",
        r"Total time: (\d+(?:\.\d+)?)s",
        AttributeType::Float,
    )?;
    parser.add_pattern("Peak-Memory", r"Peak memory: (\d+) KB", AttributeType::Int)?;

    Ok(parser)
}
