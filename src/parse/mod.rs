//! Re-running attribute extraction over existing run logs.
//!
//! Useful after extending the pattern set: the planner does not have to
//! be re-run, only the logs re-read. Run metadata recorded at execution
//! time (exit code, wall time) is preserved; the attribute section of
//! each properties file is rewritten from scratch.

use std::{fs, path::PathBuf};

use crate::{
    core::Result,
    parser::defaults,
    run::props::{self, PROPERTIES_FILE, RunProperties},
};

pub async fn run(output_dir: PathBuf) -> Result<()> {
    let parser = defaults::planner_parser()?;
    let logs = props::find_run_logs(&output_dir)?;

    tracing::info!("Re-parsing {} run logs under {}", logs.len(), output_dir.display());

    let mut updated = 0usize;
    for log_path in logs {
        let run_dir = log_path.parent().unwrap_or(&output_dir).to_path_buf();
        let properties_path = run_dir.join(PROPERTIES_FILE);

        if !properties_path.exists() {
            tracing::warn!(
                "Skipping {}: no {PROPERTIES_FILE} next to it",
                log_path.display()
            );
            continue;
        }

        let log = fs::read_to_string(&log_path)?;
        let outcome = parser.parse(&log);

        let mut properties = RunProperties::load(&properties_path)?;
        for error in &outcome.errors {
            tracing::warn!("{} on {}: {error}", properties.config, properties.task);
        }

        properties.attributes = outcome.values;
        properties.parse_errors = outcome.errors;
        properties.save(&run_dir)?;

        updated += 1;
    }

    tracing::info!("Re-parsed {updated} runs");
    Ok(())
}
