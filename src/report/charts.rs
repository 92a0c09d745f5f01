//! Comparison charts: per-config coverage and config-vs-config scatter.

use std::path::Path;

use charming::{
    Chart, ImageRenderer,
    component::{Axis, Grid, Title},
    element::AxisType,
    series::{Bar, Scatter},
    theme::Theme,
};

use crate::{
    core::{
        ReportConfig, Result,
        error::{ExperimentError, ExperimentErrorKind},
        utils,
    },
    report::aggregate_by_config,
    run::props::RunProperties,
};

pub fn generate_charts(
    runs: &[RunProperties],
    report_config: &ReportConfig,
    scatter_configs: Option<(String, String)>,
    output_dir: &Path,
) -> Result<()> {
    if runs.is_empty() {
        return Err(ExperimentErrorKind::NoRunsFound {
            path: output_dir.to_path_buf(),
        }
        .into());
    }

    std::fs::create_dir_all(output_dir)?;
    let mut renderer =
        ImageRenderer::new(report_config.width, report_config.height).theme(Theme::Walden);

    let coverage_chart = generate_coverage_chart(runs);
    renderer.save(&coverage_chart, output_dir.join("coverage_chart.svg"))?;

    let explicit = scatter_configs.is_some();
    match pick_scatter_configs(runs, scatter_configs) {
        Ok((left, right)) => {
            let attribute = &report_config.scatter_attribute;
            match generate_scatter_chart(runs, attribute, &left, &right) {
                Ok(chart) => {
                    let name = format!(
                        "scatter_{}_{}_vs_{}.svg",
                        utils::sanitize_component(attribute),
                        utils::sanitize_component(&left),
                        utils::sanitize_component(&right)
                    );
                    renderer.save(&chart, output_dir.join(name))?;
                }
                Err(e) if !explicit => {
                    tracing::debug!("Skipping scatter plot: {e}");
                }
                Err(e) => return Err(e),
            }
        }
        Err(e) if !explicit => {
            tracing::debug!("Skipping scatter plot: {e}");
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

fn generate_coverage_chart(runs: &[RunProperties]) -> Chart {
    let aggregates = aggregate_by_config(runs);

    let config_names: Vec<String> = aggregates.iter().map(|a| a.config.clone()).collect();
    let coverage: Vec<f64> = aggregates.iter().map(|a| f64::from(a.coverage)).collect();

    Chart::new()
        .title(Title::new().text("Coverage per configuration"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .boundary_gap(("0", "0.01")),
        )
        .y_axis(Axis::new().type_(AxisType::Category).data(config_names))
        .series(Bar::new().name("Coverage").data(coverage))
}

/// Use the explicitly requested pair, or default to the first two
/// configs in name order.
fn pick_scatter_configs(
    runs: &[RunProperties],
    explicit: Option<(String, String)>,
) -> Result<(String, String)> {
    let mut present: Vec<&str> = runs.iter().map(|r| r.config.as_str()).collect();
    present.sort_unstable();
    present.dedup();

    if let Some((left, right)) = explicit {
        for name in [&left, &right] {
            if !present.contains(&name.as_str()) {
                return Err(ExperimentErrorKind::ConfigNotFound { name: name.clone() }.into());
            }
        }
        return Ok((left, right));
    }

    if present.len() < 2 {
        return Err(ExperimentErrorKind::NotEnoughConfigs {
            count: present.len(),
        }
        .into());
    }

    Ok((present[0].to_string(), present[1].to_string()))
}

/// One point per task that has the attribute under both configs.
fn generate_scatter_chart(
    runs: &[RunProperties],
    attribute: &str,
    left: &str,
    right: &str,
) -> Result<Chart> {
    let value_for = |config: &str, task: &str| -> Option<f64> {
        runs.iter()
            .find(|r| r.config == config && r.task == task)
            .and_then(|r| r.attributes.get(attribute))
            .map(|v| v.as_f64())
    };

    let mut tasks: Vec<&str> = runs.iter().map(|r| r.task.as_str()).collect();
    tasks.sort_unstable();
    tasks.dedup();

    let points: Vec<Vec<f64>> = tasks
        .iter()
        .filter_map(|task| {
            let x = value_for(left, task)?;
            let y = value_for(right, task)?;
            Some(vec![x, y])
        })
        .collect();

    if points.is_empty() {
        return Err(ExperimentError::from(ExperimentErrorKind::AttributeNotFound {
            name: attribute.to_string(),
        })
        .with_hint(Some(format!(
            "no task has '{attribute}' under both '{left}' and '{right}'"
        ))));
    }

    Ok(Chart::new()
        .title(Title::new().text(format!("{attribute}: {left} vs {right}")))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Value).name(left))
        .y_axis(Axis::new().type_(AxisType::Value).name(right))
        .series(Scatter::new().name(attribute).data(points)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AttributeValue;
    use std::collections::BTreeMap;

    fn run_with_time(config: &str, task: &str, time: Option<f64>) -> RunProperties {
        let mut attributes = BTreeMap::new();
        if let Some(time) = time {
            attributes.insert("Total-Time".to_string(), AttributeValue::Float(time));
        }
        RunProperties {
            config: config.to_string(),
            task: task.to_string(),
            exit_code: Some(0),
            coverage: 1,
            wall_time_s: 1.0,
            timed_out: false,
            attributes,
            parse_errors: Vec::new(),
        }
    }

    #[test]
    fn scatter_pairs_only_tasks_solved_by_both() {
        let runs = vec![
            run_with_time("a", "t1", Some(1.0)),
            run_with_time("a", "t2", Some(2.0)),
            run_with_time("b", "t1", Some(1.5)),
            run_with_time("b", "t2", None),
        ];

        // t2 has no value under b, so only one point remains
        let chart = generate_scatter_chart(&runs, "Total-Time", "a", "b");
        assert!(chart.is_ok());
    }

    #[test]
    fn scatter_with_unknown_config_is_an_error() {
        let runs = vec![run_with_time("a", "t1", Some(1.0))];

        let picked = pick_scatter_configs(
            &runs,
            Some(("a".to_string(), "missing".to_string())),
        );
        assert!(picked.is_err());
    }

    #[test]
    fn default_pair_needs_two_configs() {
        let runs = vec![run_with_time("a", "t1", Some(1.0))];
        assert!(pick_scatter_configs(&runs, None).is_err());
    }
}
