//! The Markdown report, rendered with Handlebars.

use std::path::Path;

use chrono::Local;
use handlebars::Handlebars;
use serde_json::json;

use crate::{
    core::{ReportConfig, Result, platform},
    report::{ConfigAggregate, aggregate_by_config},
    run::props::RunProperties,
};

const TPL_STR: &str = "\
# Planner Experiment Results

**Platform:** {{platform}}
**Date:** {{date}}
**Runs:** {{total_runs}}

## Coverage

| Config | Runs | Coverage |
|--------|------|----------|
{{#each configs}}| {{name}} | {{runs}} | {{coverage}} |
{{/each}}

## Attribute means

Means are taken over the runs where the attribute was present.

| Config |{{#each attributes}} {{this}} |{{/each}}
|--------|{{#each attributes}}----|{{/each}}
{{#each configs}}| {{name}} |{{#each cells}} {{this}} |{{/each}}
{{/each}}
";

/// Write `report.md`: per-config coverage and attribute-mean tables.
/// The best coverage is bolded, the way one reads these tables anyway.
pub fn write_report(
    runs: &[RunProperties],
    attributes: &[String],
    report_config: &ReportConfig,
    output_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let mut handlebars = Handlebars::new();
    if let Some(template_path) = &report_config.template_path {
        handlebars.register_template_file("report", template_path)?;
    } else {
        handlebars.register_template_string("report", TPL_STR)?;
    }

    let aggregates = aggregate_by_config(runs);
    let best_coverage = aggregates.iter().map(|a| a.coverage).max().unwrap_or(0);

    let config_rows: Vec<serde_json::Value> = aggregates
        .iter()
        .map(|aggregate| config_row(aggregate, attributes, best_coverage))
        .collect();

    let data = json!({
        "platform": platform::get_os_info(),
        "date": Local::now().date_naive().to_string(),
        "total_runs": runs.len(),
        "attributes": attributes,
        "configs": config_rows,
    });

    let rendered = handlebars.render("report", &data)?;

    let path = output_dir.join("report.md");
    std::fs::write(&path, rendered)?;

    tracing::info!("Report written to {}", path.display());
    Ok(())
}

fn config_row(
    aggregate: &ConfigAggregate,
    attributes: &[String],
    best_coverage: u32,
) -> serde_json::Value {
    let cells: Vec<String> = attributes
        .iter()
        .map(|name| {
            aggregate
                .attribute_means
                .get(name)
                .map(|mean| format!("{mean:.2}"))
                .unwrap_or_else(|| "-".to_string())
        })
        .collect();

    let coverage = if aggregate.coverage == best_coverage && best_coverage > 0 {
        format!("**{}**", aggregate.coverage)
    } else {
        aggregate.coverage.to_string()
    };

    json!({
        "name": aggregate.config,
        "runs": aggregate.runs,
        "coverage": coverage,
        "cells": cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AttributeValue;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn renders_coverage_and_attribute_tables() {
        let dir = TempDir::new().unwrap();

        let mut attributes = BTreeMap::new();
        attributes.insert("Plan-Cost".to_string(), AttributeValue::Int(10));

        let runs = vec![RunProperties {
            config: "daPrecomp-1024".to_string(),
            task: "gripper:prob01.pddl".to_string(),
            exit_code: Some(0),
            coverage: 1,
            wall_time_s: 0.5,
            timed_out: false,
            attributes,
            parse_errors: Vec::new(),
        }];

        write_report(
            &runs,
            &["Plan-Cost".to_string()],
            &ReportConfig::default(),
            dir.path(),
        )
        .unwrap();

        let report = std::fs::read_to_string(dir.path().join("report.md")).unwrap();
        assert!(report.contains("# Planner Experiment Results"));
        assert!(report.contains("| daPrecomp-1024 | 1 | **1** |"));
        assert!(report.contains("10.00"));
    }
}
