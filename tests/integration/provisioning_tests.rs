//! Provisioning workflow integration tests

#[cfg(test)]
mod tests {
    use crate::common::{RequestFactory, TestPlatform};
    use agency_access::platform::{IdentityService, Record, Table};
    use agency_access::{AccessError, ProvisioningState, Role, Stage, StageStatus};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    // ==================== Scenarios ====================

    /// Owner request runs all four stages and owns exactly one organization
    #[tokio::test]
    async fn test_owner_provisioning() {
        let platform = TestPlatform::new();
        let request = RequestFactory::owner();

        let report = assert_ok!(platform.provisioner().run(&request).await);

        assert_eq!(report.state, ProvisioningState::Done);
        for stage in Stage::ALL {
            assert_eq!(report.outcome(stage).unwrap().status, StageStatus::Ok);
        }

        let id = report.identity_id.clone().unwrap();
        let profiles = platform.memory.rows(Table::Profiles);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0]["role"], "owner");
        assert_eq!(profiles[0]["email"], json!(request.email));

        let organizations = platform.memory.rows(Table::Organizations);
        assert_eq!(organizations.len(), 1);
        assert_eq!(organizations[0]["owner_id"], json!(id));
        assert_eq!(organizations[0]["contact_phone"], "+221 77 000 00 01");

        let role = platform.provisioner().directory().role_of(&id).await.unwrap();
        assert_eq!(role, Role::Owner);
    }

    /// An email that already has an identity is recovered by signing in
    #[tokio::test]
    async fn test_existing_employee_email() {
        let platform = TestPlatform::new();
        let request = RequestFactory::employee();
        let existing = platform
            .memory
            .create_identity(&request.email, &request.password, Record::new())
            .await
            .unwrap();

        let report = platform.provisioner().run(&request).await.unwrap();

        assert_eq!(
            report.outcome(Stage::Identity).unwrap().status,
            StageStatus::RecoveredViaAuthenticate
        );
        assert_eq!(
            report.outcome(Stage::Organization).unwrap().status,
            StageStatus::Skipped
        );
        assert_eq!(report.state, ProvisioningState::Done);
        assert_eq!(report.identity_id, Some(existing.id));
        assert_eq!(report.summary(), "created");
    }

    /// Two runs with the same credentials converge on the same rows
    #[tokio::test]
    async fn test_reprovisioning_same_credentials() {
        let platform = TestPlatform::new();
        let request = RequestFactory::owner();

        let first = platform.provisioner().run(&request).await.unwrap();
        let second = platform.provisioner().run(&request).await.unwrap();

        assert_eq!(first.identity_id, second.identity_id);
        assert_eq!(platform.memory.rows(Table::Profiles).len(), 1);
        assert_eq!(platform.memory.rows(Table::Organizations).len(), 1);
        assert_eq!(platform.memory.rows(Table::Capabilities).len(), 2);
    }

    /// Same email, wrong password: identity cannot be recovered
    #[tokio::test]
    async fn test_reprovisioning_with_other_password_fails() {
        let platform = TestPlatform::new();
        let request = RequestFactory::driver();
        platform.provisioner().run(&request).await.unwrap();

        let mut retry = request.clone();
        retry.password = "something-else".to_string();
        let report = platform.provisioner().run(&retry).await.unwrap();

        assert!(report.is_failed());
        assert_eq!(
            report.history,
            vec![ProvisioningState::IdentityPending, ProvisioningState::Failed]
        );
        assert!(matches!(
            platform.provisioner().provision(&retry).await,
            Err(AccessError::IdentityFailure(_))
        ));
    }

    // ==================== Partial failures ====================

    /// A rejected profile write is a warning; the identity stays
    #[tokio::test]
    async fn test_profile_rejection_is_follow_up() {
        let platform = TestPlatform::failing_on(&[Table::Profiles]);
        let report = platform
            .provisioner()
            .run(&RequestFactory::manager())
            .await
            .unwrap();

        assert_eq!(report.state, ProvisioningState::Done);
        assert_eq!(platform.memory.identity_count(), 1);
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].stage, Stage::Profile);
        assert_eq!(report.summary(), "created, with issues requiring follow-up");
    }

    /// Capability failures never unwind the organization
    #[tokio::test]
    async fn test_capability_rejection_keeps_organization() {
        let platform = TestPlatform::failing_on(&[Table::Capabilities]);
        let report = platform
            .provisioner()
            .run(&RequestFactory::owner())
            .await
            .unwrap();

        assert_eq!(report.outcome(Stage::Organization).unwrap().status, StageStatus::Ok);
        assert_eq!(
            report.outcome(Stage::Capabilities).unwrap().status,
            StageStatus::Error
        );
        assert_eq!(platform.memory.rows(Table::Organizations).len(), 1);
        assert!(report.needs_follow_up());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][3]["error_kind"], "capability_write_failure");
    }

    // ==================== Creation policy ====================

    #[tokio::test]
    async fn test_manager_cannot_create_manager() {
        let platform = TestPlatform::new();

        let err = platform
            .provisioner()
            .provision_as(Role::Manager, &RequestFactory::manager())
            .await
            .unwrap_err();

        assert!(matches!(err, AccessError::Forbidden(_)));
        assert_eq!(platform.memory.identity_count(), 0);
    }

    #[tokio::test]
    async fn test_owner_creates_staff() {
        let platform = TestPlatform::new();
        let provisioner = platform.provisioner();

        for request in [
            RequestFactory::manager(),
            RequestFactory::employee(),
            RequestFactory::driver(),
        ] {
            let report = provisioner.provision_as(Role::Owner, &request).await.unwrap();
            assert_eq!(report.state, ProvisioningState::Done);
        }
        assert_eq!(platform.memory.identity_count(), 3);
        assert!(platform.memory.rows(Table::Organizations).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected_before_identity() {
        let platform = TestPlatform::new();
        let mut request = RequestFactory::driver();
        request.role = "super_admin".to_string();

        let err = assert_err!(platform.provisioner().run(&request).await);

        assert!(matches!(err, AccessError::UnknownRole(_)));
        assert_eq!(platform.memory.identity_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_provisioning() {
        let platform = TestPlatform::new();
        let requests = vec![
            RequestFactory::owner(),
            RequestFactory::manager(),
            RequestFactory::employee(),
            RequestFactory::driver(),
        ];

        let results = platform.provisioner().provision_batch(&requests).await;

        assert!(results.iter().all(|r| r.as_ref().is_ok_and(|report| !report.is_failed())));
        assert_eq!(platform.memory.identity_count(), 4);
        assert_eq!(platform.memory.rows(Table::Profiles).len(), 4);
        assert_eq!(platform.memory.rows(Table::Organizations).len(), 1);
    }
}
