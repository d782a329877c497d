//! Bootstrap accounts from a YAML list
//!
//! Provisions each account in order with the configured delay between them and
//! prints a credential table. Exits non-zero only when an account could not
//! get an identity.

use agency_access::utils::logging::init_logging;
use agency_access::{AccessCore, Config, ProvisioningRequest};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "seed-accounts", about = "Provision agency accounts from a YAML list")]
struct Cli {
    /// YAML file with an `accounts` list
    accounts: PathBuf,

    /// YAML configuration file; `AGENCY_*` environment variables override it
    #[arg(long, env = "AGENCY_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    accounts: Vec<ProvisioningRequest>,
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())
        .await
        .context("loading configuration")?;
    init_logging(config.logging())?;

    let content = tokio::fs::read_to_string(&cli.accounts)
        .await
        .with_context(|| format!("reading {}", cli.accounts.display()))?;
    let seed: SeedFile = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing {}", cli.accounts.display()))?;
    info!(count = seed.accounts.len(), "seeding accounts");

    let core = AccessCore::new(config)?;
    let results = core.provisioner().provision_batch(&seed.accounts).await;

    let mut failures = 0;
    println!("{:<32} {:<20} {:<10} {}", "EMAIL", "PASSWORD", "ROLE", "RESULT");
    for (request, result) in seed.accounts.iter().zip(&results) {
        match result {
            Ok(report) => {
                if report.is_failed() {
                    failures += 1;
                }
                println!(
                    "{:<32} {:<20} {:<10} {}",
                    report.email,
                    request.password,
                    report.role,
                    report.summary()
                );
                for warning in report.warnings() {
                    eprintln!("warning: {} {} stage: {}", report.email, warning.stage, warning.detail);
                }
            }
            Err(e) => {
                failures += 1;
                println!("{:<32} {:<20} {:<10} rejected: {}", request.email, "-", request.role, e);
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} accounts failed", failures, results.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
