//! Sequential fan-out and adjacent-pair comparison

use crate::client::{FetchedResponse, ResponseFetcher};
use crate::compare::{self, Difference};
use crate::config::RunnerConfig;
use crate::error::{DiffError, DiffResult};
use crate::evidence::{EvidenceStore, RunId};
use crate::filter::FieldFilter;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a run in which every adjacent pair matched
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub servers: Vec<String>,
    pub matched_pairs: usize,
}

/// Details of the first adjacent pair that disagreed
#[derive(Debug, Clone)]
pub struct MismatchReport {
    pub run_id: RunId,
    /// The earlier server in the list
    pub previous: String,
    /// The server whose response did not match `previous`
    pub current: String,
    pub differences: Vec<Difference>,
    /// Files written for this mismatch, previous server first
    pub evidence: Vec<PathBuf>,
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mismatch :")?;
        writeln!(
            f,
            "- = have in {} and not in {}",
            self.previous, self.current
        )?;
        writeln!(
            f,
            "+ = have in {} and not in {}",
            self.current, self.previous
        )?;
        write!(f, "{}", compare::render(&self.differences))?;
        for path in &self.evidence {
            writeln!(f, "saved: {}", path.display())?;
        }
        Ok(())
    }
}

/// Sends one request to every server in order and compares neighbours
///
/// Server `i` is only fetched after server `i - 1` has been fetched and
/// compared. The first pair that differs stops the run; later servers are
/// never contacted.
pub struct ComparisonRunner<F> {
    fetcher: F,
    config: RunnerConfig,
    filter: FieldFilter,
    evidence: Option<EvidenceStore>,
    run_id: RunId,
}

impl<F: ResponseFetcher> ComparisonRunner<F> {
    /// Create a runner whose run id is the current time
    pub fn new(fetcher: F, config: RunnerConfig) -> Self {
        let filter = config.filter();
        let evidence = config
            .save_bodies
            .then(|| EvidenceStore::new(config.evidence_dir.clone()));

        Self {
            fetcher,
            config,
            filter,
            evidence,
            run_id: RunId::now(),
        }
    }

    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Run the comparison for `request`
    ///
    /// Returns [`DiffError::Mismatch`] for the first pair that differs, after
    /// its evidence has been written. Any other error aborts the run as is.
    pub async fn run(&self, request: &Value) -> DiffResult<RunReport> {
        self.config.validate()?;

        info!("runID: {}", self.run_id);
        if let Some(store) = &self.evidence {
            store.ensure_dir()?;
            info!("Will save response bodies to {}", store.pattern(self.run_id));
        }

        let mut previous: Option<(&str, FetchedResponse)> = None;
        let mut matched_pairs = 0;

        for server in &self.config.servers {
            info!("Sending request to {}", server);
            let started_at = Instant::now();
            let current = self.fetcher.fetch(server, request).await?;
            info!("Got response from {} in {:?}", server, started_at.elapsed());

            if let Some((previous_server, previous_response)) = previous.take() {
                info!(
                    "Comparing responses from {} and {}",
                    previous_server, server
                );
                if !compare::equal(&previous_response.value, &current.value, &self.filter) {
                    let differences =
                        compare::diff(&previous_response.value, &current.value, &self.filter);
                    let report = self.mismatch(
                        previous_server,
                        &previous_response,
                        server,
                        &current,
                        differences,
                    )?;
                    return Err(DiffError::Mismatch(Box::new(report)));
                }

                info!("Responses from {} and {} are EQUAL", previous_server, server);
                matched_pairs += 1;
            }

            previous = Some((server.as_str(), current));
        }

        Ok(RunReport {
            run_id: self.run_id,
            servers: self.config.servers.clone(),
            matched_pairs,
        })
    }

    fn mismatch(
        &self,
        previous_server: &str,
        previous: &FetchedResponse,
        current_server: &str,
        current: &FetchedResponse,
        differences: Vec<Difference>,
    ) -> DiffResult<MismatchReport> {
        warn!(
            "Responses from {} and {} differ in {} places",
            previous_server,
            current_server,
            differences.len()
        );

        let evidence = match &self.evidence {
            Some(store) => store.persist_all(
                &[
                    (previous_server, previous.raw.as_slice()),
                    (current_server, current.raw.as_slice()),
                ],
                self.run_id,
            )?,
            None => Vec::new(),
        };

        Ok(MismatchReport {
            run_id: self.run_id,
            previous: previous_server.to_string(),
            current: current_server.to_string(),
            differences,
            evidence,
        })
    }
}
