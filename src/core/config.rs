//! Configuration layering for plab.
//!
//! Values are resolved with the priority: CLI arguments > environment
//! variables (`PLAB_*`, `__` separates section from field) > config file
//! (TOML) > defaults. The figment built here carries the file and
//! environment layers; CLI overrides are applied by the subcommands.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::core::error::{ExperimentErrorKind, Result};

/// Execution order of the (config x task) schedule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum RunOrder {
    /// All tasks of one config before the next config: A,A,B,B
    #[default]
    Grouped,
    /// Alternating configs: A,B,A,B
    Sequential,
    /// Shuffled schedule
    Random,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub planner_path: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub benchmarks_dir: Option<PathBuf>,
    pub processes: usize,
    pub timeout: Option<u64>,
    pub run_order: RunOrder,
    pub output: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            benchmarks_dir: None,
            processes: 2,
            timeout: None,
            run_order: RunOrder::default(),
            output: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub width: u32,
    pub height: u32,
    pub scatter_attribute: String,
    pub template_path: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            scatter_attribute: "Total-Time".to_string(),
            template_path: None,
        }
    }
}

/// Build the file + environment layers from an explicit config file.
/// The file must exist; an empty file is fine.
pub fn create_figment_from_file(path: &Path) -> Result<Figment> {
    if !path.exists() {
        return Err(ExperimentErrorKind::DataFileNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    Ok(Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("PLAB_").split("__")))
}

/// Build the default layers: `./plab.toml` if present, then environment.
pub fn create_figment(explicit_file: Option<&Path>) -> Result<Figment> {
    if let Some(path) = explicit_file {
        return create_figment_from_file(path);
    }

    let default_file = PathBuf::from("plab.toml");
    let mut figment = Figment::new();
    if default_file.exists() {
        figment = figment.merge(Toml::file(default_file));
    }

    Ok(figment.merge(Env::prefixed("PLAB_").split("__")))
}

fn extract_section<T>(figment: &Figment, section: &str) -> Result<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    let merged = Figment::from(Serialized::defaults(T::default())).merge(figment.focus(section));
    let value = merged.extract().map_err(ExperimentErrorKind::from)?;
    Ok(value)
}

impl GlobalConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        extract_section(figment, "global")
    }
}

impl RunConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        extract_section(figment, "run")
    }
}

impl ReportConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        extract_section(figment, "report")
    }
}
