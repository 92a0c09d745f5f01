pub mod props;
pub mod runner;

use std::{
    path::{Path, PathBuf},
    sync::{Arc, atomic::AtomicBool},
    time::Duration,
};

use crate::{
    core::{GlobalConfig, PlannerExecutor, Result, RunConfig},
    experiment::{self, Experiment},
    parser::defaults,
};

/// Where the benchmark tasks live: config, then the conventional
/// environment variable, then `./benchmarks`.
fn resolve_benchmarks_dir(run_config: &RunConfig) -> PathBuf {
    if let Some(dir) = &run_config.benchmarks_dir {
        return dir.clone();
    }
    if let Ok(dir) = std::env::var("DOWNWARD_BENCHMARKS") {
        return PathBuf::from(dir);
    }
    PathBuf::from("benchmarks")
}

pub async fn run(
    global_config: GlobalConfig,
    run_config: RunConfig,
    experiment_path: PathBuf,
    running: &Arc<AtomicBool>,
) -> Result<()> {
    tracing::info!("Starting experiment with config: {:?}", run_config);

    let experiment = Experiment::load(&experiment_path)?;
    tracing::info!(
        "Experiment '{}': {} configs, {} suite tasks",
        experiment.name,
        experiment.configs.len(),
        experiment.suite.len()
    );

    let benchmarks_dir = resolve_benchmarks_dir(&run_config);
    let tasks = experiment::resolve_suite(&experiment.suite, &benchmarks_dir)?;

    let planner = PlannerExecutor::discover(global_config.planner_path)?;
    tracing::info!("Using planner at: {}", planner.executable_path().display());

    let parser = defaults::planner_parser()?;

    let output_dir = run_config
        .output
        .clone()
        .unwrap_or_else(|| Path::new("data").join(&experiment.name));
    tracing::debug!("Output directory: {}", output_dir.display());

    let runner = runner::ExperimentRunner::new(
        experiment,
        tasks,
        planner,
        parser,
        run_config.processes,
        run_config.timeout.map(Duration::from_secs),
        run_config.run_order,
        output_dir.clone(),
    );

    let results = runner.run_all(running).await?;

    let solved: u32 = results.iter().map(|r| r.coverage).sum();
    tracing::info!("Experiment complete!");
    tracing::info!(
        "Total runs: {}, solved: {solved}, results in {}",
        results.len(),
        output_dir.display()
    );

    Ok(())
}
