//! Per-run property files.
//!
//! Every run directory holds the raw planner log (`run.log`) and a flat
//! `properties.json`: run metadata recorded by the runner merged with the
//! attributes extracted from the log. The report and parse commands work
//! entirely from these files.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    core::error::{ExperimentErrorKind, Result},
    parser::{AttributeError, AttributeValue},
};

pub const LOG_FILE: &str = "run.log";
pub const PROPERTIES_FILE: &str = "properties.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunProperties {
    pub config: String,
    pub task: String,
    pub exit_code: Option<i32>,
    /// 1 when the planner solved the task, 0 otherwise
    pub coverage: u32,
    pub wall_time_s: f64,
    pub timed_out: bool,
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<AttributeError>,
}

impl RunProperties {
    pub fn save(&self, run_dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(run_dir.join(PROPERTIES_FILE), json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// All `properties.json` files beneath `<output>/runs/`.
pub fn find_properties_files(output_dir: &Path) -> Result<Vec<PathBuf>> {
    find_run_files(output_dir, PROPERTIES_FILE)
}

/// All `run.log` files beneath `<output>/runs/`.
pub fn find_run_logs(output_dir: &Path) -> Result<Vec<PathBuf>> {
    find_run_files(output_dir, LOG_FILE)
}

fn find_run_files(output_dir: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    let pattern = output_dir.join("runs").join("*").join("*").join(file_name);

    let mut files: Vec<PathBuf> = glob::glob(pattern.to_string_lossy().as_ref())?
        .filter_map(std::result::Result::ok)
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ExperimentErrorKind::NoRunsFound {
            path: output_dir.to_path_buf(),
        }
        .into());
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn properties_roundtrip_through_run_dir() {
        let dir = TempDir::new().unwrap();
        let run_dir = dir.path().join("runs").join("cfg").join("task");
        fs::create_dir_all(&run_dir).unwrap();

        let mut attributes = BTreeMap::new();
        attributes.insert("Plan-Cost".to_string(), AttributeValue::Int(23));

        let props = RunProperties {
            config: "cfg".to_string(),
            task: "gripper:prob01.pddl".to_string(),
            exit_code: Some(0),
            coverage: 1,
            wall_time_s: 0.4,
            timed_out: false,
            attributes,
            parse_errors: Vec::new(),
        };
        props.save(&run_dir).unwrap();

        let files = find_properties_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);

        let loaded = RunProperties::load(&files[0]).unwrap();
        assert_eq!(loaded.config, "cfg");
        assert_eq!(
            loaded.attributes.get("Plan-Cost"),
            Some(&AttributeValue::Int(23))
        );
    }

    #[test]
    fn empty_output_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(find_properties_files(dir.path()).is_err());
    }
}
