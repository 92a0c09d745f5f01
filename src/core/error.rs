//! Error types for plab.

use std::{fmt, path::PathBuf};
use thiserror::Error;

/// The wrapper for the error kind, with an optional hint.
#[derive(Debug)]
pub struct ExperimentError {
    kind: ExperimentErrorKind,
    hint: Option<String>,
}

/// All types of errors that can occur in plab.
#[derive(Error, Debug)]
pub enum ExperimentErrorKind {
    #[error(
        "Planner executable not found. Please provide it explicitly with --planner-path or set DOWNWARD_REPO"
    )]
    PlannerNotFound,

    #[error("Planner executable not found at provided path: {path}")]
    PlannerNotFoundAtPath { path: PathBuf },

    #[error("Benchmarks directory does not exist: {path}")]
    BenchmarksDirNotFound { path: PathBuf },

    #[error("Task '{task}' not found at: {path}")]
    TaskNotFound { task: String, path: PathBuf },

    #[error("Invalid task name: {task}. Expected 'domain:problem.pddl'")]
    InvalidTaskName { task: String },

    #[error("Experiment file does not exist: {path}")]
    ExperimentFileNotFound { path: PathBuf },

    #[error("Experiment defines no configurations")]
    NoConfigs,

    #[error("Experiment defines no suite tasks")]
    NoTasks,

    #[error("Duplicate configuration name: {name}")]
    DuplicateConfigName { name: String },

    #[error("Configuration name must not be empty")]
    EmptyConfigName,

    #[error("Invalid pattern for attribute '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("No run directories found under: {path}")]
    NoRunsFound { path: PathBuf },

    #[error("Expected data file not found at: {path}")]
    DataFileNotFound { path: PathBuf },

    #[error("Configuration '{name}' not present in results")]
    ConfigNotFound { name: String },

    #[error("Attribute '{name}' not present in any run")]
    AttributeNotFound { name: String },

    #[error("Scatter plots need exactly two configurations, got {count}")]
    NotEnoughConfigs { count: usize },

    #[error("Progress bar template error: {0}")]
    ProgressBarError(#[from] indicatif::style::TemplateError),

    #[error("Template render error: {0}")]
    TemplateRenderError(#[from] handlebars::RenderError),

    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::TemplateError),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Glob pattern error: {0}")]
    GlobPatternError(#[from] glob::PatternError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Chart generation error: {0}")]
    ChartGenerationError(#[from] charming::EchartsError),

    #[error("Configuration error: {0}")]
    FigmentError(#[from] Box<figment::Error>),
}

impl ExperimentError {
    /// Attaches a hint to the error
    pub fn with_hint(mut self, hint: Option<impl Into<String>>) -> Self {
        if let Some(hint) = hint {
            self.hint = Some(hint.into());
        }
        self
    }
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint_text) = &self.hint {
            write!(f, " ({hint_text})")?;
        }

        Ok(())
    }
}

impl std::error::Error for ExperimentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Convert any error with a kind conversion into ExperimentError
impl<E> From<E> for ExperimentError
where
    ExperimentErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        ExperimentError {
            kind: ExperimentErrorKind::from(error),
            hint: None,
        }
    }
}

impl From<figment::Error> for ExperimentErrorKind {
    fn from(error: figment::Error) -> Self {
        ExperimentErrorKind::FigmentError(Box::new(error))
    }
}

/// A convenient result type for plab
pub type Result<T> = std::result::Result<T, ExperimentError>;
