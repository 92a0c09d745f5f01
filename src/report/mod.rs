//! Aggregation of run properties into CSV, a Markdown report and charts.

pub mod charts;
pub mod csv;
pub mod markdown;

use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use crate::{
    core::{ReportConfig, Result},
    run::props::{self, RunProperties},
};

pub async fn run(
    report_config: ReportConfig,
    output_dir: PathBuf,
    scatter_configs: Option<(String, String)>,
) -> Result<()> {
    let runs = load_runs(&output_dir)?;
    tracing::info!("Loaded {} runs from {}", runs.len(), output_dir.display());

    let attributes = attribute_names(&runs);

    csv::write_results_csv(&runs, &attributes, &output_dir)?;
    markdown::write_report(&runs, &attributes, &report_config, &output_dir)?;
    charts::generate_charts(&runs, &report_config, scatter_configs, &output_dir)?;

    tracing::info!("Report complete!");
    Ok(())
}

/// Load every properties.json beneath the output directory.
pub fn load_runs(output_dir: &std::path::Path) -> Result<Vec<RunProperties>> {
    let files = props::find_properties_files(output_dir)?;

    let mut runs = Vec::with_capacity(files.len());
    for file in files {
        runs.push(RunProperties::load(&file)?);
    }

    runs.sort_by(|a, b| a.config.cmp(&b.config).then_with(|| a.task.cmp(&b.task)));
    Ok(runs)
}

/// Union of attribute names across all runs, in stable order.
pub fn attribute_names(runs: &[RunProperties]) -> Vec<String> {
    let names: BTreeSet<&str> = runs
        .iter()
        .flat_map(|run| run.attributes.keys().map(String::as_str))
        .collect();
    names.into_iter().map(str::to_string).collect()
}

/// Per-config aggregate: coverage count plus attribute means over the
/// runs where the attribute was present.
#[derive(Debug, Clone)]
pub struct ConfigAggregate {
    pub config: String,
    pub runs: u32,
    pub coverage: u32,
    pub attribute_means: BTreeMap<String, f64>,
}

pub fn aggregate_by_config(runs: &[RunProperties]) -> Vec<ConfigAggregate> {
    let mut by_config: BTreeMap<&str, Vec<&RunProperties>> = BTreeMap::new();
    for run in runs {
        by_config.entry(run.config.as_str()).or_default().push(run);
    }

    by_config
        .into_iter()
        .map(|(config, runs)| {
            let mut sums: BTreeMap<String, (f64, u32)> = BTreeMap::new();
            for run in &runs {
                for (name, value) in &run.attributes {
                    let entry = sums.entry(name.clone()).or_insert((0.0, 0));
                    entry.0 += value.as_f64();
                    entry.1 += 1;
                }
            }

            let attribute_means = sums
                .into_iter()
                .map(|(name, (sum, count))| (name, sum / count as f64))
                .collect();

            ConfigAggregate {
                config: config.to_string(),
                runs: runs.len() as u32,
                coverage: runs.iter().map(|r| r.coverage).sum(),
                attribute_means,
            }
        })
        .collect()
}
