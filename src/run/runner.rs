//! Executing the (config x task) schedule and collecting run properties.

use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use std::{
    fs,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    core::{
        PlannerExecutor, Result, RunOrder,
        planner::{self, PlannerRunSpec},
        utils,
    },
    experiment::{Experiment, Task},
    parser::LogParser,
    run::props::{LOG_FILE, RunProperties},
};

/// A single scheduled run: one config on one task.
#[derive(Debug, Clone, Copy)]
struct ExecutionJob {
    config_index: usize,
    task_index: usize,
}

pub struct ExperimentRunner {
    experiment: Experiment,
    tasks: Vec<Task>,
    planner: Arc<PlannerExecutor>,
    parser: Arc<LogParser>,
    processes: usize,
    timeout: Option<Duration>,
    run_order: RunOrder,
    output_dir: PathBuf,
}

impl ExperimentRunner {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        experiment: Experiment,
        tasks: Vec<Task>,
        planner: PlannerExecutor,
        parser: LogParser,
        processes: usize,
        timeout: Option<Duration>,
        run_order: RunOrder,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            experiment,
            tasks,
            planner: Arc::new(planner),
            parser: Arc::new(parser),
            processes: processes.max(1),
            timeout,
            run_order,
            output_dir,
        }
    }

    /// Run the whole schedule with bounded parallelism, keeping a
    /// progress bar updated. Individual run failures are logged and
    /// skipped; they never abort the batch.
    pub async fn run_all(&self, running: &Arc<AtomicBool>) -> Result<Vec<RunProperties>> {
        let schedule = self.create_execution_schedule();
        let total_jobs = schedule.len();
        let started = Instant::now();

        let progress = ProgressBar::new(total_jobs as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("=="),
        );
        progress.enable_steady_tick(Duration::from_millis(100));

        let semaphore = Arc::new(Semaphore::new(self.processes));
        let mut join_set: JoinSet<Result<RunProperties>> = JoinSet::new();

        for job in schedule {
            if !running.load(Ordering::SeqCst) {
                tracing::info!("Shutdown requested. Not scheduling further runs");
                break;
            }

            let config = self.experiment.configs[job.config_index].clone();
            let task = self.tasks[job.task_index].clone();
            let planner = self.planner.clone();
            let parser = self.parser.clone();
            let timeout = self.timeout;
            let run_dir = self
                .output_dir
                .join("runs")
                .join(utils::sanitize_component(&config.name))
                .join(utils::sanitize_component(&task.name));
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(std::io::Error::other)?;
            let progress = progress.clone();

            join_set.spawn(async move {
                let _permit = permit;
                progress.set_message(format!("{} on {}", config.name, task.name));

                let result: Result<RunProperties> = async move {
                    let spec = PlannerRunSpec {
                        domain_file: task.domain_file.as_deref(),
                        problem_file: &task.problem_file,
                        args: &config.args,
                        timeout,
                    };

                    let output = planner.run_task(spec).await?;

                    fs::create_dir_all(&run_dir)?;
                    fs::write(run_dir.join(LOG_FILE), &output.log)?;

                    let outcome = parser.parse(&output.log);
                    for error in &outcome.errors {
                        tracing::warn!("{} on {}: {error}", config.name, task.name);
                    }

                    let solved = output.exit_code == Some(0);
                    if !solved {
                        if let Some(hint) = planner::failure_hint(&output.log) {
                            tracing::warn!(
                                "{} on {} exited with {:?}: {hint}",
                                config.name,
                                task.name,
                                output.exit_code
                            );
                        }
                    }

                    let props = RunProperties {
                        config: config.name,
                        task: task.name,
                        exit_code: output.exit_code,
                        coverage: u32::from(solved),
                        wall_time_s: output.wall_time.as_secs_f64(),
                        timed_out: output.timed_out,
                        attributes: outcome.values,
                        parse_errors: outcome.errors,
                    };
                    props.save(&run_dir)?;

                    Ok(props)
                }
                .await;

                // The bar must reach len even when a run fails
                progress.inc(1);
                result
            });
        }

        let mut all_props = Vec::new();
        let mut failed = 0usize;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Ok(props)) => all_props.push(props),
                Ok(Err(e)) => {
                    failed += 1;
                    tracing::error!("Run failed: {e}");
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("Run task panicked: {e}");
                }
            }
        }

        progress.finish_with_message(format!(
            "Experiment complete in {}",
            utils::format_duration(started.elapsed())
        ));

        if failed > 0 {
            tracing::warn!("{failed} of {total_jobs} runs failed");
        }

        // Deterministic order for downstream consumers, whatever the schedule was
        all_props.sort_by(|a, b| a.config.cmp(&b.config).then_with(|| a.task.cmp(&b.task)));

        Ok(all_props)
    }

    /// Create the execution schedule based on the RunOrder
    fn create_execution_schedule(&self) -> Vec<ExecutionJob> {
        let mut schedule = Vec::new();

        match self.run_order {
            RunOrder::Grouped => {
                // A,A,A,B,B,B
                for config_index in 0..self.experiment.configs.len() {
                    for task_index in 0..self.tasks.len() {
                        schedule.push(ExecutionJob {
                            config_index,
                            task_index,
                        });
                    }
                }
            }
            RunOrder::Sequential => {
                // A,B,A,B,A,B
                for task_index in 0..self.tasks.len() {
                    for config_index in 0..self.experiment.configs.len() {
                        schedule.push(ExecutionJob {
                            config_index,
                            task_index,
                        });
                    }
                }
            }
            RunOrder::Random => {
                for config_index in 0..self.experiment.configs.len() {
                    for task_index in 0..self.tasks.len() {
                        schedule.push(ExecutionJob {
                            config_index,
                            task_index,
                        });
                    }
                }

                let mut rng = rand::rng();
                schedule.shuffle(&mut rng);
            }
        }

        tracing::debug!(
            "Created execution schedule with {} jobs using {:?} order",
            schedule.len(),
            self.run_order
        );

        schedule
    }
}
