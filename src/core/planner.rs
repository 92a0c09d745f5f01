//! The wrapper for the planner binary.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};
use tokio::{process::Command, time::Instant};

use crate::core::{
    Result,
    error::{ExperimentError, ExperimentErrorKind},
    is_executable, platform,
};

pub struct PlannerExecutor {
    executable_path: PathBuf,
}

/// Everything needed for one planner invocation on one task.
pub struct PlannerRunSpec<'a> {
    pub domain_file: Option<&'a Path>,
    pub problem_file: &'a Path,
    pub args: &'a [String],
    pub timeout: Option<Duration>,
}

/// Captured outcome of one planner invocation. A non-zero exit code is
/// data, not an error: unsolvable tasks and resource limits are normal
/// outcomes in a batch.
pub struct PlannerRunOutput {
    pub log: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub wall_time: Duration,
}

impl PlannerExecutor {
    pub fn new(executable_path: PathBuf) -> Self {
        Self { executable_path }
    }

    /// Find the binary and create a PlannerExecutor with that path
    pub fn discover(explicit_path: Option<PathBuf>) -> Result<Self> {
        let path = Self::find_executable(explicit_path)?;
        Ok(Self::new(path))
    }

    /// Find the binary
    pub fn find_executable(explicit_path: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit_path {
            if path.exists() && path.is_file() {
                tracing::info!("Using explicit planner path: {}", path.display());
                return Ok(path);
            } else {
                let hint = if !is_executable(&path) {
                    Some("Make sure this is the path to the executable itself.")
                } else {
                    None
                };

                return Err(
                    ExperimentError::from(ExperimentErrorKind::PlannerNotFoundAtPath { path })
                        .with_hint(hint),
                );
            }
        }

        // Check conventional locations, DOWNWARD_REPO first
        let candidates = platform::get_default_planner_paths();

        for candidate in candidates {
            if candidate.exists() {
                tracing::debug!("Found planner at: {}", candidate.display());
                return Ok(candidate);
            }
        }

        Err(ExperimentErrorKind::PlannerNotFound.into())
    }

    /// Getter for the executable_path
    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// Public API for creating a command
    pub fn create_command(&self) -> Command {
        Command::new(&self.executable_path)
    }

    /// Run the planner on a single task and capture its combined output.
    pub async fn run_task(&self, spec: PlannerRunSpec<'_>) -> Result<PlannerRunOutput> {
        let mut cmd = self.create_command();

        if let Some(domain_file) = spec.domain_file {
            cmd.arg(domain_file);
        }
        cmd.arg(spec.problem_file);
        cmd.args(spec.args);

        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        // Timed-out runs drop the child future; make sure the process dies with it
        cmd.kill_on_drop(true);

        let start = Instant::now();
        let child = cmd.spawn()?;

        let output = if let Some(timeout) = spec.timeout {
            match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(output) => output?,
                Err(_) => {
                    tracing::debug!(
                        "Planner timed out after {}s on {}",
                        timeout.as_secs(),
                        spec.problem_file.display()
                    );
                    return Ok(PlannerRunOutput {
                        log: format!("plab: run timed out after {}s\n", timeout.as_secs()),
                        exit_code: None,
                        timed_out: true,
                        wall_time: start.elapsed(),
                    });
                }
            }
        } else {
            child.wait_with_output().await?
        };

        let wall_time = start.elapsed();

        let log = String::from_utf8_lossy(&output.stdout).to_string()
            + String::from_utf8_lossy(&output.stderr).as_ref();

        Ok(PlannerRunOutput {
            log,
            exit_code: output.status.code(),
            timed_out: false,
            wall_time,
        })
    }
}

/// Scan a failed run's log for messages that explain the failure.
pub fn failure_hint(log: &str) -> Option<&'static str> {
    if log.contains("Completely explored state space -- no solution!") {
        Some("The task was proven unsolvable.")
    } else if log.contains("Memory limit has been reached") || log.contains("std::bad_alloc") {
        Some("The planner ran out of memory.")
    } else if log.contains("Time limit has been reached") {
        Some("The planner hit its internal time limit.")
    } else if log.contains("Search stopped without finding a solution") {
        Some("The search space was exhausted without reaching a goal.")
    } else {
        None
    }
}
