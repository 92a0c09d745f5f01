//! Extraction of named numeric attributes from planner run logs.
//!
//! Planner output is free text with occasional fixed-format lines
//! announcing metrics (`#Abstract States: 1234`, `Total time: 0.53s`).
//! A [`LogParser`] holds an ordered registry of independent regex
//! extractors, one per attribute, and scans a log once per attribute.
//! Attributes are extracted independently: a missing or malformed line
//! for one never blocks extraction of the others.

pub mod defaults;

use std::{collections::BTreeMap, fmt};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::error::{ExperimentErrorKind, Result};

/// The declared type of an attribute's captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Int,
    Float,
}

/// A parsed attribute value. Serializes as a plain JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Int(i64),
    Float(f64),
}

impl AttributeValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            AttributeValue::Int(v) => *v as f64,
            AttributeValue::Float(v) => *v,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One attribute definition: immutable after registration.
#[derive(Debug, Clone)]
struct AttributePattern {
    name: String,
    regex: Regex,
    ty: AttributeType,
}

/// A capture that matched but failed to convert to the declared type.
///
/// This signals malformed run output and is surfaced to the caller,
/// distinct from "attribute absent" (pattern did not match at all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeError {
    pub attribute: String,
    pub captured: String,
    pub reason: String,
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attribute '{}': could not convert '{}': {}",
            self.attribute, self.captured, self.reason
        )
    }
}

/// The result of parsing one run log: extracted values plus any
/// per-attribute conversion failures. Both can be non-empty at once
/// (partial success).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub values: BTreeMap<String, AttributeValue>,
    pub errors: Vec<AttributeError>,
}

impl ParseOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Registry of attribute extractors. Build it up with [`add_pattern`],
/// then share it freely: parsing holds no mutable state, so one parser
/// can serve many runs, concurrently if desired.
///
/// [`add_pattern`]: LogParser::add_pattern
#[derive(Debug, Clone, Default)]
pub struct LogParser {
    patterns: Vec<AttributePattern>,
}

impl LogParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one attribute definition.
    ///
    /// The pattern must contain exactly one capture group; anything else
    /// is rejected here rather than at parse time. Registering a name
    /// twice replaces the earlier definition in place (last registration
    /// wins, position in registration order is kept).
    pub fn add_pattern(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        ty: AttributeType,
    ) -> Result<()> {
        let name = name.into();

        let regex = Regex::new(pattern).map_err(|e| ExperimentErrorKind::InvalidPattern {
            name: name.clone(),
            reason: e.to_string(),
        })?;

        // captures_len counts the implicit whole-match group 0
        let group_count = regex.captures_len() - 1;
        if group_count != 1 {
            return Err(ExperimentErrorKind::InvalidPattern {
                name,
                reason: format!("expected exactly one capture group, found {group_count}"),
            }
            .into());
        }

        let definition = AttributePattern { name, regex, ty };

        if let Some(existing) = self
            .patterns
            .iter_mut()
            .find(|p| p.name == definition.name)
        {
            *existing = definition;
        } else {
            self.patterns.push(definition);
        }

        Ok(())
    }

    /// Number of registered attribute definitions.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Scan `text` for each registered pattern, in registration order,
    /// taking the first occurrence only.
    ///
    /// A pattern that does not match leaves its attribute absent; that is
    /// not an error. A capture that fails conversion to the declared type
    /// is recorded in [`ParseOutcome::errors`] and extraction continues
    /// with the remaining attributes.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for pattern in &self.patterns {
            let Some(captures) = pattern.regex.captures(text) else {
                continue;
            };

            let Some(group) = captures.get(1) else {
                // Optional group that did not participate in the match
                outcome.errors.push(AttributeError {
                    attribute: pattern.name.clone(),
                    captured: String::new(),
                    reason: "capture group did not participate in match".to_string(),
                });
                continue;
            };

            let raw = group.as_str();
            let converted = match pattern.ty {
                AttributeType::Int => raw
                    .parse::<i64>()
                    .map(AttributeValue::Int)
                    .map_err(|e| e.to_string()),
                AttributeType::Float => raw
                    .parse::<f64>()
                    .map(AttributeValue::Float)
                    .map_err(|e| e.to_string()),
            };

            match converted {
                Ok(value) => {
                    outcome.values.insert(pattern.name.clone(), value);
                }
                Err(reason) => {
                    outcome.errors.push(AttributeError {
                        attribute: pattern.name.clone(),
                        captured: raw.to_string(),
                        reason,
                    });
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abstract_states_parser() -> LogParser {
        let mut parser = LogParser::new();
        parser
            .add_pattern(
                "Num AbstractStates",
                r"#Abstract States: (\d+)",
                AttributeType::Int,
            )
            .unwrap();
        parser
    }

    #[test]
    fn extracts_integer_attribute() {
        let parser = abstract_states_parser();
        let outcome = parser.parse("something\n#Abstract States: 42\nelse\n");

        assert!(outcome.is_clean());
        assert_eq!(
            outcome.values.get("Num AbstractStates"),
            Some(&AttributeValue::Int(42))
        );
    }

    #[test]
    fn extracts_float_attribute() {
        let mut parser = LogParser::new();
        parser
            .add_pattern(
                "Precalculation-Time",
                r"Time for precalculation of heuristic-values: (\d+(?:\.\d+)?)s",
                AttributeType::Float,
            )
            .unwrap();

        let outcome = parser.parse("Time for precalculation of heuristic-values: 1.25s\n");

        assert!(outcome.is_clean());
        assert_eq!(
            outcome.values.get("Precalculation-Time"),
            Some(&AttributeValue::Float(1.25))
        );
    }

    #[test]
    fn missing_pattern_is_not_an_error() {
        let parser = abstract_states_parser();
        let outcome = parser.parse("nothing interesting in this log\n");

        assert!(outcome.values.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn conversion_failure_is_surfaced() {
        let mut parser = LogParser::new();
        // A loose pattern that can capture non-numeric text
        parser
            .add_pattern(
                "Num AbstractStates",
                r"#Abstract States: (\S+)",
                AttributeType::Int,
            )
            .unwrap();

        let outcome = parser.parse("#Abstract States: abc\n");

        assert!(outcome.values.is_empty());
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].attribute, "Num AbstractStates");
        assert_eq!(outcome.errors[0].captured, "abc");
    }

    #[test]
    fn malformed_attribute_does_not_block_others() {
        let mut parser = LogParser::new();
        parser
            .add_pattern(
                "Num AbstractStates",
                r"#Abstract States: (\S+)",
                AttributeType::Int,
            )
            .unwrap();
        parser
            .add_pattern(
                "Precalculation-Time",
                r"Time for precalculation of heuristic-values: (\d+(?:\.\d+)?)s",
                AttributeType::Float,
            )
            .unwrap();

        let log = "#Abstract States: garbage\n\
                   Time for precalculation of heuristic-values: 0.53s\n";
        let outcome = parser.parse(log);

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(
            outcome.values.get("Precalculation-Time"),
            Some(&AttributeValue::Float(0.53))
        );
    }

    #[test]
    fn parsing_is_idempotent() {
        let parser = abstract_states_parser();
        let log = "#Abstract States: 7\n";

        assert_eq!(parser.parse(log), parser.parse(log));
    }

    #[test]
    fn first_match_only() {
        let parser = abstract_states_parser();
        let outcome = parser.parse("#Abstract States: 1\n#Abstract States: 2\n");

        assert_eq!(
            outcome.values.get("Num AbstractStates"),
            Some(&AttributeValue::Int(1))
        );
    }

    #[test]
    fn last_registration_wins() {
        let mut parser = abstract_states_parser();
        parser
            .add_pattern(
                "Num AbstractStates",
                r"#States: (\d+)",
                AttributeType::Int,
            )
            .unwrap();

        assert_eq!(parser.len(), 1);

        let outcome = parser.parse("#Abstract States: 1\n#States: 2\n");
        assert_eq!(
            outcome.values.get("Num AbstractStates"),
            Some(&AttributeValue::Int(2))
        );
    }

    #[test]
    fn rejects_wrong_capture_group_count() {
        let mut parser = LogParser::new();

        let no_groups = parser.add_pattern("a", r"#Abstract States: \d+", AttributeType::Int);
        assert!(no_groups.is_err());

        let two_groups = parser.add_pattern("b", r"(\d+) of (\d+)", AttributeType::Int);
        assert!(two_groups.is_err());

        let invalid = parser.add_pattern("c", r"(unclosed", AttributeType::Int);
        assert!(invalid.is_err());

        assert!(parser.is_empty());
    }
}
