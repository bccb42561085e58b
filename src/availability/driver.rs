//! Reconciliation driver: line-oriented JSON in, enriched JSON out.
//!
//! Records are processed strictly one at a time. After each record is
//! written the driver sleeps a fixed pacing delay, regardless of how long
//! the lookups took. The first error of any kind stops the run; the record
//! that caused it is never written.

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use super::domain::{AlbumRequest, Provider};
use super::reference::ReferenceSet;
use super::retry::{Sleeper, TokioSleeper};
use super::service::AvailabilityService;
use crate::error::{Error, Result};

/// Delay between records
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Totals for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records written
    pub records: usize,
    /// Records whose album was already in the reference set
    pub already_known: usize,
}

impl std::ops::AddAssign for RunSummary {
    fn add_assign(&mut self, other: Self) {
        self.records += other.records;
        self.already_known += other.already_known;
    }
}

/// Drives records from an input source through the availability service
pub struct Driver<'a> {
    service: &'a AvailabilityService,
    reference: &'a ReferenceSet,
    sleeper: Arc<dyn Sleeper>,
    pacing: Duration,
}

impl<'a> Driver<'a> {
    pub fn new(service: &'a AvailabilityService, reference: &'a ReferenceSet) -> Self {
        Self {
            service,
            reference,
            sleeper: Arc::new(TokioSleeper),
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Process every record from `input`, writing enriched records to `output`.
    ///
    /// `source` names the input in log events. Blank lines are skipped.
    pub async fn run<R, W>(&self, source: &str, input: R, mut output: W) -> Result<RunSummary>
    where
        R: BufRead,
        W: Write,
    {
        let mut summary = RunSummary::default();

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;

            let outcome = match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => self.process_line(line_no, &line, &mut output).await,
                Err(e) => Err(Error::Io(e)),
            };

            match outcome {
                Ok(known) => {
                    summary.records += 1;
                    if known {
                        summary.already_known += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(
                        source,
                        line = line_no,
                        error = %e,
                        "Error while comparing, stopping"
                    );
                    return Err(e);
                }
            }

            self.sleeper.sleep(self.pacing).await;
        }

        tracing::info!(
            source,
            records = summary.records,
            already_known = summary.already_known,
            "Finished input"
        );
        Ok(summary)
    }

    /// Enrich and write one record. Returns whether it was already known.
    async fn process_line<W: Write>(&self, line_no: usize, line: &str, output: &mut W) -> Result<bool> {
        let mut record = parse_record(line_no, line)?;
        let request = album_request(line_no, &record)?;

        let known = self.reference.contains(&request);
        if known {
            tracing::debug!(
                line = line_no,
                artist = %request.artist,
                album = %request.album,
                "Album already in reference set"
            );
        }

        let reconciled = self.service.reconcile(&request).await?;

        record.insert(
            Provider::Spotify.field_name().to_string(),
            serde_json::to_value(&reconciled.spotify)?,
        );
        record.insert(
            Provider::Rdio.field_name().to_string(),
            serde_json::to_value(&reconciled.rdio)?,
        );

        let encoded = serde_json::to_string(&Value::Object(record))?;
        writeln!(output, "{}", encoded)?;
        output.flush()?;

        tracing::info!(
            line = line_no,
            artist = %request.artist,
            album = %request.album,
            record = %encoded,
            "Enriched record"
        );
        Ok(known)
    }
}

/// Parse a line as a JSON object, keeping every field in order
fn parse_record(line_no: usize, line: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(Error::malformed(line_no, "expected a JSON object")),
        Err(e) => Err(Error::malformed(line_no, e.to_string())),
    }
}

fn album_request(line_no: usize, record: &Map<String, Value>) -> Result<AlbumRequest> {
    let field = |name: &str| {
        record
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::malformed(line_no, format!("missing string field `{}`", name)))
    };
    Ok(AlbumRequest::new(field("artist")?, field("album")?))
}
