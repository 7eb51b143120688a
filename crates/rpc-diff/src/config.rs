//! Configuration for a comparison run

use crate::error::{DiffError, DiffResult};
use crate::evidence::{host_of, DEFAULT_EVIDENCE_DIR};
use crate::filter::FieldFilter;
use std::collections::{BTreeSet, HashSet};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Overrides the evidence directory
pub const EVIDENCE_DIR_ENV: &str = "RPC_DIFF_EVIDENCE_DIR";
/// Per-request timeout in whole seconds
pub const TIMEOUT_ENV: &str = "RPC_DIFF_TIMEOUT_SECS";

/// Everything a run needs besides the request body
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Servers in comparison order
    pub servers: Vec<String>,
    /// Field names excluded from comparison at any depth
    pub ignore_fields: BTreeSet<String>,
    /// Whether mismatching bodies are written to `evidence_dir`
    pub save_bodies: bool,
    /// Directory for evidence files
    pub evidence_dir: PathBuf,
    /// Bound on each request; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            ignore_fields: BTreeSet::new(),
            save_bodies: true,
            evidence_dir: PathBuf::from(DEFAULT_EVIDENCE_DIR),
            timeout: None,
        }
    }
}

impl RunnerConfig {
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn ignore_field(mut self, field: &str) -> Self {
        self.ignore_fields.insert(field.to_string());
        self
    }

    pub fn with_evidence_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.evidence_dir = dir.into();
        self
    }

    pub fn without_saving_bodies(mut self) -> Self {
        self.save_bodies = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Filter built from `ignore_fields`
    pub fn filter(&self) -> FieldFilter {
        FieldFilter::new(self.ignore_fields.iter().cloned())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(self) -> DiffResult<Self> {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// Apply overrides using `lookup` to read variables
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> DiffResult<Self> {
        if let Some(dir) = lookup(EVIDENCE_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.evidence_dir = PathBuf::from(dir);
        }

        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DiffError::config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    TIMEOUT_ENV, secs
                ))
            })?;
            self.timeout = Some(Duration::from_secs(secs));
        }

        Ok(self)
    }

    /// Check the server list before any request is sent
    pub fn validate(&self) -> DiffResult<()> {
        if self.servers.is_empty() {
            return Err(DiffError::config("no servers given"));
        }

        let mut seen = HashSet::new();
        for server in &self.servers {
            if !seen.insert(server.as_str()) {
                return Err(DiffError::config(format!("duplicate server: {}", server)));
            }
            if self.save_bodies {
                host_of(server)?;
            }
        }

        Ok(())
    }
}
