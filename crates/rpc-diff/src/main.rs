//! rpc-diff
//!
//! Sends one JSON-RPC request to several servers and fails if any two
//! neighbouring servers in the list answer differently.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rpc_diff::{ComparisonRunner, DiffError, HttpFetcher, RunnerConfig};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "rpc-diff", version)]
#[command(about = "Compare JSON-RPC responses across servers")]
struct Cli {
    /// Request body, a JSON object such as
    /// '{"jsonrpc":"2.0","id":"99","method":"getBlock","params":[100955115]}'
    body: String,

    /// Server to send the request to. Repeat for each server, in comparison order
    #[arg(long = "rpc", value_name = "URL")]
    rpc: Vec<String>,

    /// Ignore this field name at any depth. Can be given multiple times
    #[arg(long = "ignore-field", value_name = "NAME")]
    ignore_field: Vec<String>,

    /// Don't save the response bodies to disk on mismatch
    #[arg(long)]
    no_save_body: bool,

    /// Directory for saved response bodies
    #[arg(long, value_name = "DIR")]
    evidence_dir: Option<PathBuf>,

    /// Give up on a server after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,
}

impl Cli {
    fn config(&self) -> Result<RunnerConfig> {
        let mut config = RunnerConfig::new(self.rpc.iter().cloned()).apply_env()?;

        for field in &self.ignore_field {
            config = config.ignore_field(field);
        }
        if self.no_save_body {
            config = config.without_saving_bodies();
        }
        if let Some(dir) = &self.evidence_dir {
            config = config.with_evidence_dir(dir);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_body(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body).context("request body is not valid JSON")?;
    if !value.is_object() {
        bail!("request body must be a JSON object");
    }
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let body = parse_body(&cli.body)?;
    println!("body:\n{}", serde_json::to_string_pretty(&body)?);

    let config = cli.config()?;
    let fetcher = HttpFetcher::new(config.timeout)?;
    let runner = ComparisonRunner::new(fetcher, config);

    match runner.run(&body).await {
        Ok(report) => {
            info!(
                "All {} servers returned equal responses ({} pairs compared)",
                report.servers.len(),
                report.matched_pairs
            );
            Ok(())
        }
        Err(DiffError::Mismatch(report)) => {
            println!("{}", report);
            bail!(
                "mismatch between {} and {} (run {})",
                report.previous,
                report.current,
                report.run_id
            )
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "rpc-diff",
            "--rpc",
            "http://a:8899",
            "--rpc",
            "http://b:8899",
            "--ignore-field",
            "blockTime",
            "--ignore-field",
            "ts",
            "--no-save-body",
            "--timeout-secs",
            "5",
            r#"{"method":"getSlot"}"#,
        ])
        .unwrap();

        assert_eq!(cli.rpc, vec!["http://a:8899", "http://b:8899"]);
        assert_eq!(cli.ignore_field, vec!["blockTime", "ts"]);
        assert!(cli.no_save_body);
        assert_eq!(cli.timeout_secs, Some(5));
    }

    #[test]
    fn test_body_is_required() {
        assert!(Cli::try_parse_from(["rpc-diff", "--rpc", "http://a"]).is_err());
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(r#"{"jsonrpc":"2.0"}"#).is_ok());
        assert!(parse_body("[1]").is_err());
        assert!(parse_body("{").is_err());
    }
}
