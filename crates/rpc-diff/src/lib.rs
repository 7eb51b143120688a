//! Differential testing for JSON-RPC servers
//!
//! Sends one request body to an ordered list of servers and checks that every
//! response is structurally identical to the one before it, ignoring a
//! configurable set of field names. The first disagreement stops the run and
//! the raw bodies of both servers are written to disk.
//!
//! # Architecture
//!
//! ```text
//!  request body
//!       │
//! ┌─────▼──────────┐   (×N, in list order)
//! │ ResponseFetcher│──────────────────────┐
//! └─────┬──────────┘                      │
//!       │ previous / current              │ raw bytes
//! ┌─────▼──────────┐   on mismatch  ┌─────▼─────────┐
//! │  compare::diff │───────────────►│ EvidenceStore │
//! │  + FieldFilter │                │  bodies/*.json│
//! └────────────────┘                └───────────────┘
//! ```

pub mod client;
pub mod compare;
pub mod config;
pub mod error;
pub mod evidence;
pub mod filter;
pub mod path;
pub mod runner;

pub use client::{FetchedResponse, HttpFetcher, ResponseFetcher};
pub use compare::{diff, equal, render, DiffKind, Difference};
pub use config::RunnerConfig;
pub use error::{DiffError, DiffResult};
pub use evidence::{EvidenceStore, RunId};
pub use filter::FieldFilter;
pub use path::{PathSegment, StructuralPath};
pub use runner::{ComparisonRunner, MismatchReport, RunReport};
