//! agency-access - account provisioning and role inspection CLI
//!
//! Exit status is non-zero only when a request is rejected up front or the
//! identity stage fails. Later stage failures print a warning and exit zero.

use agency_access::utils::logging::init_logging;
use agency_access::{AccessCore, Config, ProvisioningReport, ProvisioningRequest, Role};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "agency-access",
    version,
    about = "Provision agency accounts and inspect roles"
)]
struct Cli {
    /// YAML configuration file; `AGENCY_*` environment variables override it
    #[arg(long, env = "AGENCY_CONFIG")]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Provision one account
    Provision {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AGENCY_ACCOUNT_PASSWORD", hide_env_values = true)]
        password: String,
        /// Role name or profile role tag (owner, agency_manager, driver, ...)
        #[arg(long)]
        role: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Organization name for owners
        #[arg(long)]
        organization_name: Option<String>,
        /// Role of the operator creating the account; enforces the creation hierarchy
        #[arg(long)]
        acting_role: Option<Role>,
    },
    /// Load an account and print its canonical role
    Resolve {
        /// Identity id
        id: String,
    },
    /// Print the role catalog
    Roles,
    /// Delete an identity (requires the service key)
    Remove {
        /// Identity id
        id: String,
    },
}

fn print_report(report: &ProvisioningReport, password: &str) {
    println!("account:  {}", report.email);
    println!("password: {}", password);
    println!("role:     {}", report.role);
    if let Some(id) = &report.identity_id {
        println!("id:       {}", id);
    }
    for outcome in &report.outcomes {
        println!("  {:<13} {:<27} {}", outcome.stage, outcome.status, outcome.detail);
    }
    println!("state:    {}", report.state);
    println!("result:   {}", report.summary());
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())
        .await
        .context("loading configuration")?;
    init_logging(config.logging())?;
    let core = AccessCore::new(config)?;

    match cli.command {
        Command::Provision {
            email,
            password,
            role,
            full_name,
            phone,
            organization_name,
            acting_role,
        } => {
            let mut request = ProvisioningRequest::new(email, password, role);
            request.full_name = full_name;
            request.phone = phone;
            request.organization_name = organization_name;

            let report = match acting_role {
                Some(acting) => core.provisioner().provision_as(acting, &request).await?,
                None => core.provisioner().run(&request).await?,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, &request.password);
            }

            if report.is_failed() {
                return Ok(ExitCode::FAILURE);
            }
            if report.needs_follow_up() {
                for warning in report.warnings() {
                    eprintln!("warning: {} stage failed: {}", warning.stage, warning.detail);
                }
                eprintln!("warning: {} {}", report.email, report.summary());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve { id } => {
            let (account, resolution) = core.directory().resolve(&id).await?;
            let catalog = core.gate().catalog();
            let definition = catalog.definition(resolution.role);
            if cli.json {
                let value = serde_json::json!({
                    "account": account,
                    "resolution": resolution,
                    "visible_areas": definition.visible_areas,
                    "creatable_roles": definition.creatable_roles,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{} <{}>", account.display_name(), account.email);
                println!("role:      {} ({:?})", definition.label, resolution.source);
                let areas: Vec<_> = definition.visible_areas.iter().map(|a| a.as_str()).collect();
                println!("areas:     {}", areas.join(", "));
                let creatable: Vec<_> = definition.creatable_roles.iter().map(|r| r.as_str()).collect();
                println!("creates:   {}", creatable.join(", "));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Roles => {
            let catalog = core.gate().catalog();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(catalog.list_roles())?);
                return Ok(ExitCode::SUCCESS);
            }
            for definition in catalog.list_roles() {
                println!("{} [{}] - {}", definition.label, definition.role, definition.description);
                for module in definition.permissions.modules() {
                    let actions: Vec<_> = definition
                        .permissions
                        .allowed_actions(module)
                        .iter()
                        .map(|a| a.as_str())
                        .collect();
                    if !actions.is_empty() {
                        println!("  {:<10} {}", module, actions.join(", "));
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Remove { id } => {
            core.provisioner().remove_identity(&id).await?;
            info!(identity_id = %id, "identity removed");
            println!("removed {}", id);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
