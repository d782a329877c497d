//! Role resolution and permission gate over loaded accounts

#[cfg(test)]
mod tests {
    use crate::common::{RequestFactory, TestPlatform};
    use agency_access::auth::ResolutionSource;
    use agency_access::{
        Action, Area, ControlState, Module, PermissionGate, Requirement, Role, RoleCatalog,
    };
    use serde_json::json;
    use std::sync::Arc;

    fn gate() -> PermissionGate {
        PermissionGate::new(Arc::new(RoleCatalog::agency_default()))
    }

    #[tokio::test]
    async fn test_provisioned_roles_resolve_back() {
        let platform = TestPlatform::new();
        let directory = platform.provisioner().directory();

        let cases = [
            (RequestFactory::owner(), Role::Owner),
            (RequestFactory::manager(), Role::Manager),
            (RequestFactory::employee(), Role::Employee),
            (RequestFactory::driver(), Role::Driver),
        ];
        for (request, expected) in cases {
            let report = platform.provisioner().run(&request).await.unwrap();
            let id = report.identity_id.unwrap();
            assert_eq!(directory.role_of(&id).await.unwrap(), expected);
            assert_eq!(report.resolved_role, Some(expected));
        }
    }

    #[tokio::test]
    async fn test_legacy_admin_profile_is_manager() {
        let platform = TestPlatform::new();
        let id = platform
            .insert_profile(json!({
                "id": "legacy-1",
                "email": "old.admin@agency.test",
                "employee_role": "admin"
            }))
            .await;

        let (account, resolution) = platform.provisioner().directory().resolve(&id).await.unwrap();

        assert_eq!(resolution.role, Role::Manager);
        assert_eq!(resolution.source, ResolutionSource::LegacyEmployeeRole);
        assert!(gate().can_view(&account, Area::Employees));
        assert!(!gate().can_view(&account, Area::Settings));
    }

    #[tokio::test]
    async fn test_profile_without_signals_is_employee() {
        let platform = TestPlatform::new();
        let id = platform
            .insert_profile(json!({"id": "bare-1", "email": "bare@agency.test"}))
            .await;

        let (account, resolution) = platform.provisioner().directory().resolve(&id).await.unwrap();

        assert_eq!(resolution.role, Role::Employee);
        assert_eq!(resolution.source, ResolutionSource::Fallback);
        assert!(gate().can_perform(&account, Module::Bookings, Action::Create));
        assert!(!gate().can_perform(&account, Module::Bookings, Action::Refund));
    }

    #[tokio::test]
    async fn test_ownership_beats_stored_role() {
        let platform = TestPlatform::new();
        let report = platform
            .provisioner()
            .run(&RequestFactory::owner())
            .await
            .unwrap();
        let id = report.identity_id.unwrap();

        // Downgrade the stored tag; organization ownership still decides
        platform
            .insert_profile(json!({"id": id, "email": report.email, "role": "driver"}))
            .await;

        let account = platform.provisioner().directory().load(&id).await.unwrap();
        assert_eq!(account.indicators.role.as_deref(), Some("driver"));
        assert_eq!(gate().role_of(&account), Role::Owner);
        assert!(gate().can_perform(&account, Module::Finances, Action::EditPrices));
    }

    #[tokio::test]
    async fn test_guards_for_dashboard_controls() {
        let platform = TestPlatform::new();
        let report = platform
            .provisioner()
            .run(&RequestFactory::manager())
            .await
            .unwrap();
        let account = platform
            .provisioner()
            .directory()
            .load(&report.identity_id.unwrap())
            .await
            .unwrap();
        let gate = gate();

        let edit_prices = gate.guard(&account, Requirement::Perform(Module::Finances, Action::EditPrices));
        assert_eq!(edit_prices.control_state(), ControlState::Disabled);

        let refund = gate.guard(&account, Requirement::Perform(Module::Bookings, Action::Refund));
        assert_eq!(refund.control_state(), ControlState::Enabled);

        let create_buttons: Vec<Role> = Role::ALL
            .iter()
            .copied()
            .filter(|target| gate.guard(&account, Requirement::Create(*target)).allowed())
            .collect();
        assert_eq!(create_buttons, vec![Role::Employee, Role::Driver]);

        assert!(!gate.navigation(&account).contains(&Area::Settings));
    }
}
