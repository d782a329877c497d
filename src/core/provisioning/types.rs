//! Provisioning request, stage and report types

use crate::auth::rbac::Role;
use crate::utils::error::AccessError;
use crate::utils::mask_secret;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A request to provision one person
#[derive(Clone, Deserialize)]
pub struct ProvisioningRequest {
    pub email: String,
    pub password: String,
    /// Requested role tag: a canonical role name or a profile role tag
    pub role: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Owners only; defaults to "<full name> agency"
    #[serde(default)]
    pub organization_name: Option<String>,
}

impl ProvisioningRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: role.into(),
            full_name: None,
            phone: None,
            organization_name: None,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_organization_name(mut self, name: impl Into<String>) -> Self {
        self.organization_name = Some(name.into());
        self
    }
}

impl fmt::Debug for ProvisioningRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvisioningRequest")
            .field("email", &self.email)
            .field("password", &mask_secret(&self.password))
            .field("role", &self.role)
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .field("organization_name", &self.organization_name)
            .finish()
    }
}

/// Workflow stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Identity,
    Profile,
    Organization,
    Capabilities,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Identity,
        Stage::Profile,
        Stage::Organization,
        Stage::Capabilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Identity => "identity",
            Stage::Profile => "profile",
            Stage::Organization => "organization",
            Stage::Capabilities => "capabilities",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    /// Identity existed; its id was recovered by signing in
    RecoveredViaAuthenticate,
    Skipped,
    Error,
}

impl StageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageStatus::Ok => "ok",
            StageStatus::RecoveredViaAuthenticate => "recovered_via_authenticate",
            StageStatus::Skipped => "skipped",
            StageStatus::Error => "error",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StageStatus::Ok | StageStatus::RecoveredViaAuthenticate)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome record emitted by every stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
    pub detail: String,
    /// Error tag when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl StageOutcome {
    pub fn new(stage: Stage, status: StageStatus, detail: impl Into<String>) -> Self {
        Self {
            stage,
            status,
            detail: detail.into(),
            error_kind: None,
        }
    }

    pub fn skipped(stage: Stage, reason: impl Into<String>) -> Self {
        Self::new(stage, StageStatus::Skipped, reason)
    }

    pub fn error(stage: Stage, err: &AccessError) -> Self {
        Self {
            stage,
            status: StageStatus::Error,
            detail: err.to_string(),
            error_kind: Some(err.kind().to_string()),
        }
    }
}

/// Workflow states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProvisioningState {
    IdentityPending,
    IdentityReady,
    ProfileReady,
    OrgReady,
    Done,
    Failed,
}

impl ProvisioningState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProvisioningState::Done | ProvisioningState::Failed)
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvisioningState::IdentityPending => "IDENTITY_PENDING",
            ProvisioningState::IdentityReady => "IDENTITY_READY",
            ProvisioningState::ProfileReady => "PROFILE_READY",
            ProvisioningState::OrgReady => "ORG_READY",
            ProvisioningState::Done => "DONE",
            ProvisioningState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Report of one provisioning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningReport {
    pub email: String,
    /// Requested canonical role
    pub role: Role,
    pub identity_id: Option<String>,
    /// Role the stored records resolve to after the run, `None` when they
    /// could not be read back
    pub resolved_role: Option<Role>,
    pub state: ProvisioningState,
    /// States entered, in order
    pub history: Vec<ProvisioningState>,
    pub outcomes: Vec<StageOutcome>,
}

impl ProvisioningReport {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
            identity_id: None,
            resolved_role: None,
            state: ProvisioningState::IdentityPending,
            history: vec![ProvisioningState::IdentityPending],
            outcomes: Vec::new(),
        }
    }

    /// Enter a new state. Terminal states are final.
    pub(crate) fn advance(&mut self, state: ProvisioningState) {
        if self.state.is_terminal() {
            return;
        }
        self.state = state;
        self.history.push(state);
    }

    pub(crate) fn record(&mut self, outcome: StageOutcome) {
        self.outcomes.push(outcome);
    }

    /// Outcome of a stage, if it ran
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.outcomes.iter().find(|outcome| outcome.stage == stage)
    }

    /// Stage errors collected after the identity existed
    pub fn warnings(&self) -> Vec<&StageOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status == StageStatus::Error && outcome.stage != Stage::Identity)
            .collect()
    }

    pub fn is_failed(&self) -> bool {
        self.state == ProvisioningState::Failed
    }

    /// Whether the run finished but left something to reconcile
    pub fn needs_follow_up(&self) -> bool {
        self.state == ProvisioningState::Done
            && (!self.warnings().is_empty() || self.resolved_role != Some(self.role))
    }

    /// One-line verdict for operators
    pub fn summary(&self) -> &'static str {
        match self.state {
            ProvisioningState::Failed => "failed",
            ProvisioningState::Done if self.needs_follow_up() => {
                "created, with issues requiring follow-up"
            }
            ProvisioningState::Done => "created",
            _ => "in progress",
        }
    }
}
