//! Account provisioning workflow - main facade
//!
//! Stages run strictly in order: identity, profile, organization (owners),
//! default capabilities (after a successful organization stage). Only an
//! identity failure aborts a run. Later failures are recorded in the report
//! and nothing already committed is rolled back.

use super::directory::AccountDirectory;
use super::identity_ops::IdentityOperations;
use super::record_ops::RecordOperations;
use super::types::{
    ProvisioningReport, ProvisioningRequest, ProvisioningState, Stage, StageOutcome, StageStatus,
};
use crate::auth::rbac::{Role, RoleCatalog};
use crate::auth::resolver::RoleResolver;
use crate::config::ProvisioningConfig;
use crate::core::models::ProfileRecord;
use crate::platform::{Platform, PlatformError, Record};
use crate::utils::error::{AccessError, Result};
use crate::utils::{is_valid_email, normalize_email};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// A request that passed validation
#[derive(Debug, Clone)]
struct PreparedRequest {
    email: String,
    password: String,
    role: Role,
    full_name: Option<String>,
    phone: Option<String>,
    organization_name: String,
}

impl PreparedRequest {
    fn metadata(&self) -> Record {
        let mut metadata = Record::new();
        metadata.insert("full_name".to_string(), json!(self.full_name));
        metadata.insert("phone".to_string(), json!(self.phone));
        metadata.insert("role".to_string(), json!(self.role.as_str()));
        metadata
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Account provisioning workflow
pub struct Provisioner {
    identity_ops: IdentityOperations,
    record_ops: RecordOperations,
    platform: Platform,
    catalog: Arc<RoleCatalog>,
    resolver: RoleResolver,
    config: ProvisioningConfig,
}

impl Provisioner {
    /// Create a provisioner over a connected platform
    pub fn new(platform: Platform, catalog: Arc<RoleCatalog>, config: ProvisioningConfig) -> Self {
        Self {
            identity_ops: IdentityOperations::new(Arc::clone(&platform.identity)),
            record_ops: RecordOperations::new(Arc::clone(&platform.store)),
            resolver: RoleResolver::new(Arc::clone(&catalog)),
            platform,
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    /// Directory over the same data store
    pub fn directory(&self) -> AccountDirectory {
        AccountDirectory::new(Arc::clone(&self.platform.store), self.resolver.clone())
    }

    /// Roles the acting role may offer in a "create account" action
    pub fn creatable_roles_for(&self, acting: Role) -> Vec<Role> {
        self.catalog.creatable_roles(acting).iter().copied().collect()
    }

    /// Run on behalf of an acting role, rejecting disallowed targets before
    /// any stage runs
    pub async fn provision_as(
        &self,
        acting: Role,
        request: &ProvisioningRequest,
    ) -> Result<ProvisioningReport> {
        let target = self.resolver.parse_requested(&request.role)?;
        if let Err(e) = self.catalog.ensure_can_create(acting, target) {
            warn!(acting = %acting, target = %target, email = %request.email, "account creation rejected");
            return Err(e);
        }
        self.run(request).await
    }

    /// Run the workflow, turning an identity failure into an error
    pub async fn provision(&self, request: &ProvisioningRequest) -> Result<ProvisioningReport> {
        let report = self.run(request).await?;
        if report.is_failed() {
            let detail = report
                .outcome(Stage::Identity)
                .map(|outcome| outcome.detail.clone())
                .unwrap_or_else(|| "identity stage failed".to_string());
            return Err(AccessError::identity_failure(detail));
        }
        Ok(report)
    }

    /// Run the workflow and report every stage.
    ///
    /// Errors only for requests rejected before the first stage. A failed
    /// identity stage yields a report in the `FAILED` state.
    pub async fn run(&self, request: &ProvisioningRequest) -> Result<ProvisioningReport> {
        let prepared = self.prepare(request)?;
        let mut report = ProvisioningReport::new(&prepared.email, prepared.role);
        info!(email = %prepared.email, role = %prepared.role, "provisioning account");

        // Stage 1: identity
        let ensured = self
            .bounded(
                Stage::Identity,
                self.identity_ops.ensure_identity(
                    &prepared.email,
                    &prepared.password,
                    prepared.metadata(),
                ),
            )
            .await;
        let identity = match ensured {
            Ok((identity, status)) => {
                report.record(StageOutcome::new(
                    Stage::Identity,
                    status,
                    format!("identity {}", identity.id),
                ));
                report.identity_id = Some(identity.id.clone());
                report.advance(ProvisioningState::IdentityReady);
                identity
            }
            Err(e) => {
                error!(stage = %Stage::Identity, email = %prepared.email, error = %e, "provisioning aborted");
                report.record(StageOutcome::error(Stage::Identity, &e));
                report.advance(ProvisioningState::Failed);
                return Ok(report);
            }
        };

        // Stage 2: profile
        let profile = ProfileRecord::new(
            identity.id.clone(),
            prepared.email.clone(),
            prepared.full_name.clone(),
            prepared.phone.clone(),
            prepared.role,
        );
        match self
            .bounded(Stage::Profile, self.record_ops.upsert_profile(&profile))
            .await
        {
            Ok(_) => {
                report.record(StageOutcome::new(
                    Stage::Profile,
                    StageStatus::Ok,
                    format!("profile role '{}'", prepared.role),
                ));
                report.advance(ProvisioningState::ProfileReady);
            }
            Err(e) => {
                warn!(stage = %Stage::Profile, identity_id = %identity.id, error = %e, "stage failed");
                report.record(StageOutcome::error(Stage::Profile, &e));
            }
        }

        // Stage 3: organization
        let organization = if prepared.role == Role::Owner {
            let ensured = self
                .bounded(
                    Stage::Organization,
                    self.record_ops.ensure_organization(
                        &identity.id,
                        &prepared.organization_name,
                        Some(prepared.email.clone()),
                        prepared.phone.clone(),
                    ),
                )
                .await;
            match ensured {
                Ok(organization) => {
                    report.record(StageOutcome::new(
                        Stage::Organization,
                        StageStatus::Ok,
                        format!("organization {}", organization.id),
                    ));
                    report.advance(ProvisioningState::OrgReady);
                    Some(organization)
                }
                Err(e) => {
                    warn!(stage = %Stage::Organization, identity_id = %identity.id, error = %e, "stage failed");
                    report.record(StageOutcome::error(Stage::Organization, &e));
                    None
                }
            }
        } else {
            report.record(StageOutcome::skipped(
                Stage::Organization,
                format!("role '{}' owns no organization", prepared.role),
            ));
            None
        };

        // Stage 4: default capabilities
        match &organization {
            Some(organization) if self.config.attach_default_capabilities => {
                let attached = self
                    .bounded(
                        Stage::Capabilities,
                        self.record_ops
                            .attach_capabilities(&organization.id, &self.config.default_capabilities),
                    )
                    .await;
                match attached {
                    Ok(inserted) => report.record(StageOutcome::new(
                        Stage::Capabilities,
                        StageStatus::Ok,
                        format!("{} capabilities attached", inserted),
                    )),
                    Err(e) => {
                        warn!(stage = %Stage::Capabilities, organization_id = %organization.id, error = %e, "stage failed");
                        report.record(StageOutcome::error(Stage::Capabilities, &e));
                    }
                }
            }
            Some(_) => report.record(StageOutcome::skipped(
                Stage::Capabilities,
                "default capabilities disabled",
            )),
            None if prepared.role == Role::Owner => report.record(StageOutcome::skipped(
                Stage::Capabilities,
                "organization stage did not succeed",
            )),
            None => report.record(StageOutcome::skipped(
                Stage::Capabilities,
                "no organization",
            )),
        }

        // Read back what the stored records resolve to; earlier runs for the
        // same identity may have left signals this run did not write.
        let stored = tokio::time::timeout(
            self.config.stage_timeout(),
            self.directory().indicators(&identity.id),
        )
        .await;
        match stored {
            Ok(Ok(indicators)) => report.resolved_role = Some(self.resolver.resolve(&indicators)),
            Ok(Err(e)) => {
                warn!(identity_id = %identity.id, error = %e, "stored role could not be read back");
            }
            Err(_) => {
                warn!(identity_id = %identity.id, "timed out reading back the stored role");
            }
        }
        report.advance(ProvisioningState::Done);

        if report.needs_follow_up() {
            warn!(
                email = %prepared.email,
                identity_id = %identity.id,
                warnings = report.warnings().len(),
                "{}",
                report.summary()
            );
        } else {
            info!(email = %prepared.email, identity_id = %identity.id, "{}", report.summary());
        }
        Ok(report)
    }

    /// Provision several accounts in order, pausing between them
    pub async fn provision_batch(
        &self,
        requests: &[ProvisioningRequest],
    ) -> Vec<Result<ProvisioningReport>> {
        let mut results = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            if index > 0 && !self.config.batch_delay().is_zero() {
                tokio::time::sleep(self.config.batch_delay()).await;
            }
            let result = self.run(request).await;
            if let Err(e) = &result {
                warn!(email = %request.email, error = %e, "request rejected");
            }
            results.push(result);
        }
        results
    }

    /// Delete an identity. Cleanup tooling only.
    pub async fn remove_identity(&self, id: &str) -> Result<()> {
        self.identity_ops.delete_identity(id).await
    }

    /// Validate a request before any external call
    fn prepare(&self, request: &ProvisioningRequest) -> Result<PreparedRequest> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(AccessError::validation(format!(
                "invalid email address '{}'",
                request.email.trim()
            )));
        }
        if request.password.trim().is_empty() {
            return Err(AccessError::validation("password must not be empty"));
        }

        let role = self.resolver.parse_requested(&request.role)?;
        let full_name = non_empty(request.full_name.as_ref());
        let organization_name = non_empty(request.organization_name.as_ref()).unwrap_or_else(|| {
            format!("{} agency", full_name.as_deref().unwrap_or(&email))
        });

        Ok(PreparedRequest {
            email,
            password: request.password.clone(),
            role,
            full_name,
            phone: non_empty(request.phone.as_ref()),
            organization_name,
        })
    }

    /// Bound a stage by the configured timeout; expiry counts as a stage error
    async fn bounded<T, F>(&self, stage: Stage, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.config.stage_timeout();
        match tokio::time::timeout(limit, operation).await {
            Ok(result) => result,
            Err(_) => Err(AccessError::from_stage(stage, PlatformError::Timeout(limit))),
        }
    }
}
