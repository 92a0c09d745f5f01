//! Main binary entrypoint for the plab experiment tool.
//!
//! Parses CLI arguments, sets up logging, and dispatches to subcommands.

use clap::{Parser, Subcommand};
use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use plab::core::{
    GlobalConfig, Result, RunOrder,
    config::{self, ReportConfig, RunConfig},
    error::ExperimentErrorKind,
};
use plab::{parse, report, run};

#[derive(Parser)]
#[command(name = "plab")]
#[command(about = "Planner experiment and benchmarking tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Path to a plab.toml config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    planner_path: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an experiment: every config on every suite task
    Run {
        experiment: PathBuf,

        #[arg(long)]
        benchmarks_dir: Option<PathBuf>,

        #[arg(long, help = "Maximum number of concurrent planner processes")]
        processes: Option<usize>,

        #[arg(long, help = "Per-run wall-clock timeout in seconds")]
        timeout: Option<u64>,

        #[arg(
            long,
            help = "Execution order: grouped (A,A,B,B), sequential (A,B,A,B), or random"
        )]
        run_order: Option<RunOrder>,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Re-run attribute extraction over existing run logs
    Parse { data_dir: PathBuf },
    /// Aggregate run properties into CSV, Markdown and charts
    Report {
        data_dir: PathBuf,

        #[arg(long)]
        template_path: Option<PathBuf>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,

        #[arg(long, help = "Attribute to compare in the scatter plot")]
        scatter_attribute: Option<String>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Two config names to compare in the scatter plot (e.g. 'daOTF-4000,daPrecomp-1024')"
        )]
        scatter_configs: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let figment = config::create_figment(cli.config.as_deref())?;
    let mut global_config = GlobalConfig::from_figment(&figment)?;

    if let Some(path) = cli.planner_path {
        global_config.planner_path = Some(path);
    }
    global_config.verbose |= cli.verbose;

    if global_config.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
    }

    // Listen to CTRL+C while planner processes are running
    let needs_shutdown = matches!(cli.command, Commands::Run { .. });
    let running = Arc::new(AtomicBool::new(true));
    let shutdown_task = if needs_shutdown {
        let r = running.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for CTRL+C: {e}");
            }
            tracing::info!("Received CTRL+C. Initiating graceful shutdown...");
            r.store(false, Ordering::SeqCst);
        }))
    } else {
        None
    };

    let result = match cli.command {
        Commands::Run {
            experiment,
            benchmarks_dir,
            processes,
            timeout,
            run_order,
            output,
        } => {
            let mut run_config = RunConfig::from_figment(&figment)?;
            if let Some(dir) = benchmarks_dir {
                run_config.benchmarks_dir = Some(dir);
            }
            if let Some(processes) = processes {
                run_config.processes = processes;
            }
            if let Some(timeout) = timeout {
                run_config.timeout = Some(timeout);
            }
            if let Some(run_order) = run_order {
                run_config.run_order = run_order;
            }
            if let Some(output) = output {
                run_config.output = Some(output);
            }

            run::run(global_config, run_config, experiment, &running).await
        }

        Commands::Parse { data_dir } => parse::run(data_dir).await,

        Commands::Report {
            data_dir,
            template_path,
            width,
            height,
            scatter_attribute,
            scatter_configs,
        } => {
            let mut report_config = ReportConfig::from_figment(&figment)?;
            if let Some(template_path) = template_path {
                report_config.template_path = Some(template_path);
            }
            if let Some(width) = width {
                report_config.width = width;
            }
            if let Some(height) = height {
                report_config.height = height;
            }
            if let Some(scatter_attribute) = scatter_attribute {
                report_config.scatter_attribute = scatter_attribute;
            }

            match scatter_pair(scatter_configs) {
                Ok(pair) => report::run(report_config, data_dir, pair).await,
                Err(e) => Err(e),
            }
        }
    };

    // Await shutdown if needed
    if let Some(task) = shutdown_task {
        let interrupted = !running.load(Ordering::SeqCst);
        if interrupted {
            let _ = task.await;
            tracing::info!("Shutdown complete");
        } else {
            drop(task);
        }
    }

    // If any command results in an error, print and exit
    if let Err(e) = result {
        tracing::error!("{e}");

        std::process::exit(1);
    }

    Ok(())
}

fn scatter_pair(configs: Vec<String>) -> Result<Option<(String, String)>> {
    match &configs[..] {
        [] => Ok(None),
        [left, right] => Ok(Some((left.clone(), right.clone()))),
        _ => Err(ExperimentErrorKind::NotEnoughConfigs {
            count: configs.len(),
        }
        .into()),
    }
}
