//! Experiment definitions: named search configurations crossed with a
//! benchmark suite.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use figment::{
    Figment,
    providers::{Format, Toml},
};
use serde::{Deserialize, Serialize};

use crate::core::error::{ExperimentErrorKind, Result};

/// One experimental condition: a name plus the argument bundle passed to
/// the planner, e.g. `["--search", "astar(domain_abstraction(max_states=1024))"]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub name: String,
    pub args: Vec<String>,
}

/// A batch definition loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experiment {
    pub name: String,
    pub configs: Vec<SearchConfig>,
    pub suite: Vec<String>,
}

impl Experiment {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ExperimentErrorKind::ExperimentFileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let experiment: Experiment = Figment::from(Toml::file(path))
            .extract()
            .map_err(ExperimentErrorKind::from)?;
        experiment.validate()?;

        Ok(experiment)
    }

    fn validate(&self) -> Result<()> {
        if self.configs.is_empty() {
            return Err(ExperimentErrorKind::NoConfigs.into());
        }
        if self.suite.is_empty() {
            return Err(ExperimentErrorKind::NoTasks.into());
        }

        let mut seen = HashSet::new();
        for config in &self.configs {
            if config.name.is_empty() {
                return Err(ExperimentErrorKind::EmptyConfigName.into());
            }
            if !seen.insert(config.name.as_str()) {
                return Err(ExperimentErrorKind::DuplicateConfigName {
                    name: config.name.clone(),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// A resolved benchmark task.
#[derive(Debug, Clone)]
pub struct Task {
    /// The suite entry, e.g. `gripper:prob01.pddl`
    pub name: String,
    pub problem_file: PathBuf,
    pub domain_file: Option<PathBuf>,
}

/// Resolve `domain:problem.pddl` suite entries beneath the benchmarks
/// directory. Every referenced problem file must exist.
pub fn resolve_suite(suite: &[String], benchmarks_dir: &Path) -> Result<Vec<Task>> {
    if !benchmarks_dir.is_dir() {
        return Err(ExperimentErrorKind::BenchmarksDirNotFound {
            path: benchmarks_dir.to_path_buf(),
        }
        .into());
    }

    let mut tasks = Vec::with_capacity(suite.len());

    for entry in suite {
        let Some((domain, problem)) = entry.split_once(':') else {
            return Err(ExperimentErrorKind::InvalidTaskName {
                task: entry.clone(),
            }
            .into());
        };

        if domain.is_empty() || problem.is_empty() {
            return Err(ExperimentErrorKind::InvalidTaskName {
                task: entry.clone(),
            }
            .into());
        }

        let problem_file = benchmarks_dir.join(domain).join(problem);
        if !problem_file.is_file() {
            return Err(ExperimentErrorKind::TaskNotFound {
                task: entry.clone(),
                path: problem_file,
            }
            .into());
        }

        // Shared domain.pddl next to the problem, when the domain uses one
        let domain_file = benchmarks_dir.join(domain).join("domain.pddl");
        let domain_file = domain_file.is_file().then_some(domain_file);

        tasks.push(Task {
            name: entry.clone(),
            problem_file,
            domain_file,
        });
    }

    tracing::info!("Resolved {} suite tasks", tasks.len());
    for task in &tasks {
        tracing::debug!("  - {}", task.name);
    }

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_experiment(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("experiment.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_a_valid_experiment() {
        let dir = TempDir::new().unwrap();
        let path = write_experiment(
            dir.path(),
            r#"
name = "statecap-splitcomp"
suite = ["gripper:prob01.pddl"]

[[configs]]
name = "daPrecomp-1024"
args = ["--search", "astar(domain_abstraction(precalculation=true, max_states=1024))"]

[[configs]]
name = "daOTF-4000"
args = ["--search", "astar(domain_abstraction(precalculation=false, max_states=4000))"]
"#,
        );

        let experiment = Experiment::load(&path).unwrap();
        assert_eq!(experiment.name, "statecap-splitcomp");
        assert_eq!(experiment.configs.len(), 2);
        assert_eq!(experiment.configs[0].name, "daPrecomp-1024");
        assert_eq!(experiment.suite, vec!["gripper:prob01.pddl"]);
    }

    #[test]
    fn rejects_duplicate_config_names() {
        let dir = TempDir::new().unwrap();
        let path = write_experiment(
            dir.path(),
            r#"
name = "dup"
suite = ["gripper:prob01.pddl"]

[[configs]]
name = "same"
args = ["--search", "astar(blind())"]

[[configs]]
name = "same"
args = ["--search", "astar(lmcut())"]
"#,
        );

        assert!(Experiment::load(&path).is_err());
    }

    #[test]
    fn rejects_empty_config_name() {
        let dir = TempDir::new().unwrap();
        let path = write_experiment(
            dir.path(),
            r#"
name = "unnamed"
suite = ["gripper:prob01.pddl"]

[[configs]]
name = ""
args = ["--search", "astar(blind())"]
"#,
        );

        let err = Experiment::load(&path).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn rejects_empty_configs_and_suite() {
        let dir = TempDir::new().unwrap();

        let no_configs = write_experiment(
            dir.path(),
            r#"
name = "empty"
suite = ["gripper:prob01.pddl"]
configs = []
"#,
        );
        assert!(Experiment::load(&no_configs).is_err());
    }

    #[test]
    fn resolves_suite_tasks_with_domain_file() {
        let dir = TempDir::new().unwrap();
        let gripper = dir.path().join("gripper");
        fs::create_dir_all(&gripper).unwrap();
        fs::write(gripper.join("prob01.pddl"), "(define (problem p))").unwrap();
        fs::write(gripper.join("domain.pddl"), "(define (domain gripper))").unwrap();

        let tasks = resolve_suite(&["gripper:prob01.pddl".to_string()], dir.path()).unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "gripper:prob01.pddl");
        assert!(tasks[0].domain_file.is_some());
    }

    #[test]
    fn missing_task_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("gripper")).unwrap();

        let result = resolve_suite(&["gripper:nope.pddl".to_string()], dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn invalid_task_name_is_an_error() {
        let dir = TempDir::new().unwrap();

        assert!(resolve_suite(&["no-colon.pddl".to_string()], dir.path()).is_err());
    }
}
