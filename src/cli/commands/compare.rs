//! Reconciliation pipeline command.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::availability::{AvailabilityService, Driver, ReferenceSet, RunSummary};
use crate::config::Config;
use crate::error::{Error, ResultExt};

/// Reference file picked up from the working directory when none is given
pub const DEFAULT_REFERENCE_FILE: &str = "aoty_dedupe.json";

/// Enrich every record from `inputs` (or stdin) and write them to stdout
pub fn cmd_compare(
    rt: &Runtime,
    config: &Config,
    inputs: &[PathBuf],
    reference: Option<&Path>,
) -> anyhow::Result<()> {
    let reference = load_reference(reference).with_context("Failed to load reference set")?;
    let service = AvailabilityService::new(&config.availability())
        .with_context("Failed to set up providers")?;
    let driver = Driver::new(&service, &reference).with_pacing(config.pacing());

    let summary = rt.block_on(async {
        let mut summary = RunSummary::default();
        let stdout = io::stdout();

        if inputs.is_empty() {
            summary += driver.run("stdin", io::stdin().lock(), stdout.lock()).await?;
            return Ok::<_, Error>(summary);
        }

        for input in inputs {
            if input.as_os_str() == "-" {
                summary += driver.run("stdin", io::stdin().lock(), stdout.lock()).await?;
                continue;
            }

            let file = File::open(input).with_context(format!("Failed to open {:?}", input))?;
            let source = input.display().to_string();
            summary += driver
                .run(&source, BufReader::new(file), stdout.lock())
                .await?;
        }
        Ok(summary)
    })?;

    tracing::info!(
        records = summary.records,
        already_known = summary.already_known,
        "Comparison complete"
    );
    Ok(())
}

/// An explicit reference file must load. The default one is optional.
fn load_reference(explicit: Option<&Path>) -> crate::error::Result<ReferenceSet> {
    match explicit {
        Some(path) => ReferenceSet::load(path),
        None => {
            let path = Path::new(DEFAULT_REFERENCE_FILE);
            if path.exists() {
                ReferenceSet::load(path)
            } else {
                tracing::debug!("No reference file at {:?}, continuing without one", path);
                Ok(ReferenceSet::empty())
            }
        }
    }
}
