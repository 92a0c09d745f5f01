//! Flat per-run CSV output.

use std::path::Path;

use crate::{core::Result, run::props::RunProperties};

/// Write `results.csv`: one row per run, metadata columns followed by
/// one column per attribute. Absent attributes stay empty.
pub fn write_results_csv(
    runs: &[RunProperties],
    attributes: &[String],
    output_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("results.csv");
    let mut writer = csv::Writer::from_path(&path)?;

    let mut header = vec![
        "config".to_string(),
        "task".to_string(),
        "exit_code".to_string(),
        "coverage".to_string(),
        "wall_time_s".to_string(),
        "timed_out".to_string(),
    ];
    header.extend(attributes.iter().cloned());
    writer.write_record(&header)?;

    for run in runs {
        let mut record = vec![
            run.config.clone(),
            run.task.clone(),
            run.exit_code.map(|c| c.to_string()).unwrap_or_default(),
            run.coverage.to_string(),
            format!("{:.3}", run.wall_time_s),
            run.timed_out.to_string(),
        ];

        for attribute in attributes {
            record.push(
                run.attributes
                    .get(attribute)
                    .map(|value| value.to_string())
                    .unwrap_or_default(),
            );
        }

        writer.write_record(&record)?;
    }

    writer.flush()?;
    tracing::info!("Results written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AttributeValue;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn writes_header_union_and_empty_cells() {
        let dir = TempDir::new().unwrap();

        let mut attributes = BTreeMap::new();
        attributes.insert("Plan-Cost".to_string(), AttributeValue::Int(23));

        let runs = vec![
            RunProperties {
                config: "a".to_string(),
                task: "gripper:prob01.pddl".to_string(),
                exit_code: Some(0),
                coverage: 1,
                wall_time_s: 0.5,
                timed_out: false,
                attributes,
                parse_errors: Vec::new(),
            },
            RunProperties {
                config: "b".to_string(),
                task: "gripper:prob01.pddl".to_string(),
                exit_code: None,
                coverage: 0,
                wall_time_s: 30.0,
                timed_out: true,
                attributes: BTreeMap::new(),
                parse_errors: Vec::new(),
            },
        ];

        write_results_csv(&runs, &["Plan-Cost".to_string()], dir.path()).unwrap();

        let content = std::fs::read_to_string(dir.path().join("results.csv")).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "config,task,exit_code,coverage,wall_time_s,timed_out,Plan-Cost"
        );
        assert_eq!(
            lines.next().unwrap(),
            "a,gripper:prob01.pddl,0,1,0.500,false,23"
        );
        assert_eq!(
            lines.next().unwrap(),
            "b,gripper:prob01.pddl,,0,30.000,true,"
        );
    }
}
