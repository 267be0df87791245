//! Integration tests for configured isolation flows
//!
//! Wires the department service to the in-memory repository and the context
//! providers, the way an application entry point would.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::{fs, sync::Arc};

use application::{ApplicationError, DepartmentService};
use domain::{
    DepartmentFilterScope, DepartmentId, IsolationContext, IsolationError, IsolationField,
    IsolationLevel, OrganizationId, TenantId, UserId,
};
use infrastructure::{
    AppConfig, ContextHeaderNames, Environment, HeaderContextProvider,
    InMemoryDepartmentRepository, StaticContextProvider, department_service,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn service_for(
    config: &AppConfig,
    context: IsolationContext,
    repository: &InMemoryDepartmentRepository,
) -> DepartmentService {
    department_service(
        config,
        Arc::new(StaticContextProvider::new(context)),
        Arc::new(repository.clone()),
    )
}

async fn seeded_department(
    repository: &InMemoryDepartmentRepository,
    tenant_id: TenantId,
    organization_id: OrganizationId,
    name: &str,
) -> DepartmentId {
    let admin = IsolationContext::for_organization(tenant_id, organization_id);
    service_for(&AppConfig::default(), admin, repository)
        .create_department(tenant_id, organization_id, name.to_string())
        .await
        .expect("Failed to create department")
        .record
        .id
}

fn load_config(contents: &str) -> AppConfig {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("isolation.toml");
    fs::write(&path, contents).expect("Failed to write config");
    AppConfig::load_from(&path).expect("Failed to load config")
}

// ============================================================================
// Configuration
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn file_overrides_defaults() {
        let config = load_config(
            r#"
environment = "production"

[isolation]
department_filter = "full_chain"

[isolation.headers]
tenant = "x-customer-id"

[telemetry]
log_filter = "domain=debug"
json = true
"#,
        );

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(
            config.isolation.department_filter,
            DepartmentFilterScope::FullChain
        );
        assert_eq!(config.isolation.headers.tenant, "x-customer-id");
        assert_eq!(config.isolation.headers.user, "x-user-id");
        assert_eq!(config.telemetry.log_filter, "domain=debug");
        assert!(config.telemetry.json);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = load_config("");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(
            config.isolation.department_filter,
            DepartmentFilterScope::TenantAndDepartment
        );
        assert_eq!(config.isolation.headers, ContextHeaderNames::default());
        assert_eq!(config.telemetry.log_filter, "info");
    }

    #[test]
    fn unknown_department_filter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("isolation.toml");
        fs::write(&path, "[isolation]\ndepartment_filter = \"everything\"\n").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn load_with_vars(contents: &str, pairs: &[(&str, &str)]) -> AppConfig {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("isolation.toml");
        fs::write(&path, contents).expect("Failed to write config");
        AppConfig::load_from_with_vars(&path, vars(pairs)).expect("Failed to load config")
    }

    #[test]
    fn environment_overrides_file() {
        let config = load_with_vars(
            "[isolation]\ndepartment_filter = \"tenant_and_department\"\n",
            &[
                ("TENANT_ISOLATION_ISOLATION__DEPARTMENT_FILTER", "full_chain"),
                ("TENANT_ISOLATION_ENVIRONMENT", "production"),
            ],
        );
        assert_eq!(
            config.isolation.department_filter,
            DepartmentFilterScope::FullChain
        );
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn environment_reaches_nested_keys() {
        let config = load_with_vars(
            "",
            &[
                ("TENANT_ISOLATION_ISOLATION__HEADERS__TENANT", "x-customer-id"),
                ("TENANT_ISOLATION_TELEMETRY__JSON", "true"),
            ],
        );
        assert_eq!(config.isolation.headers.tenant, "x-customer-id");
        assert_eq!(config.isolation.headers.user, "x-user-id");
        assert!(config.telemetry.json);
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let config = load_with_vars(
            "",
            &[
                ("ISOLATION__DEPARTMENT_FILTER", "full_chain"),
                ("OTHER_APP_ENVIRONMENT", "production"),
            ],
        );
        assert_eq!(
            config.isolation.department_filter,
            DepartmentFilterScope::TenantAndDepartment
        );
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(dir.path().join("absent.toml")).is_err());
    }
}

// ============================================================================
// Department flows
// ============================================================================

mod department_flow_tests {
    use super::*;

    #[tokio::test]
    async fn tenants_only_see_their_departments() {
        let repository = InMemoryDepartmentRepository::new();
        let acme = TenantId::new();
        let globex = TenantId::new();
        seeded_department(&repository, acme, OrganizationId::new(), "Sales").await;
        seeded_department(&repository, acme, OrganizationId::new(), "Support").await;
        seeded_department(&repository, globex, OrganizationId::new(), "Legal").await;

        let config = AppConfig::default();
        let acme_view = service_for(&config, IsolationContext::for_tenant(acme), &repository)
            .list_departments()
            .await
            .unwrap();
        assert_eq!(acme_view.len(), 2);
        assert!(acme_view.iter().all(|d| d.tenant_id == acme));

        let platform_view = service_for(&config, IsolationContext::platform(), &repository)
            .list_departments()
            .await
            .unwrap();
        assert_eq!(platform_view.len(), 3);
    }

    #[tokio::test]
    async fn tenant_context_cannot_create_department() {
        let repository = InMemoryDepartmentRepository::new();
        let t = TenantId::new();
        let service = service_for(&AppConfig::default(), IsolationContext::for_tenant(t), &repository);

        let err = service
            .create_department(t, OrganizationId::new(), "Sales".to_string())
            .await
            .unwrap_err();
        assert_eq!(
            err.as_isolation(),
            Some(&IsolationError::InsufficientLevel {
                current: IsolationLevel::Tenant,
                required: IsolationLevel::Organization,
                operation: "createDepartment".to_string(),
            })
        );
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn department_member_assignment_is_stamped_with_context() {
        let repository = InMemoryDepartmentRepository::new();
        let t = TenantId::new();
        let o = OrganizationId::new();
        let sales = seeded_department(&repository, t, o, "Sales").await;

        let ctx = IsolationContext::for_department(t, o, sales);
        let change = service_for(&AppConfig::default(), ctx, &repository)
            .assign_member(sales, UserId::new(), t)
            .await
            .unwrap();

        assert_eq!(change.record.version, 2);
        assert_eq!(change.record.member_ids.len(), 1);
        assert_eq!(change.events.len(), 1);
        assert_eq!(change.events[0].context, ctx);
    }

    #[tokio::test]
    async fn reassigning_a_member_changes_nothing() {
        let repository = InMemoryDepartmentRepository::new();
        let t = TenantId::new();
        let o = OrganizationId::new();
        let sales = seeded_department(&repository, t, o, "Sales").await;
        let user = UserId::new();

        let service = service_for(
            &AppConfig::default(),
            IsolationContext::for_department(t, o, sales),
            &repository,
        );
        service.assign_member(sales, user, t).await.unwrap();
        let again = service.assign_member(sales, user, t).await.unwrap();

        assert!(again.events.is_empty());
        assert_eq!(again.record.version, 2);
        assert_eq!(again.record.member_ids, vec![user]);
    }

    #[tokio::test]
    async fn foreign_user_is_cross_scope() {
        let repository = InMemoryDepartmentRepository::new();
        let t = TenantId::new();
        let o = OrganizationId::new();
        let sales = seeded_department(&repository, t, o, "Sales").await;

        let ctx = IsolationContext::for_department(t, o, sales);
        let err = service_for(&AppConfig::default(), ctx, &repository)
            .assign_member(sales, UserId::new(), TenantId::new())
            .await
            .unwrap_err();
        assert_eq!(
            err.as_isolation(),
            Some(&IsolationError::CrossScope {
                entity: "User".to_string(),
                field: IsolationField::TenantId,
                level: IsolationLevel::Tenant,
            })
        );
    }

    #[tokio::test]
    async fn other_department_sees_not_found() {
        let repository = InMemoryDepartmentRepository::new();
        let t = TenantId::new();
        let o = OrganizationId::new();
        let sales = seeded_department(&repository, t, o, "Sales").await;
        let support = seeded_department(&repository, t, o, "Support").await;

        let ctx = IsolationContext::for_department(t, o, support);
        let err = service_for(&AppConfig::default(), ctx, &repository)
            .assign_member(sales, UserId::new(), t)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[tokio::test]
    async fn full_chain_config_pins_organization() {
        let repository = InMemoryDepartmentRepository::new();
        let t = TenantId::new();
        let sales = seeded_department(&repository, t, OrganizationId::new(), "Sales").await;

        // Department id is right, organization id is not
        let ctx = IsolationContext::for_department(t, OrganizationId::new(), sales);

        let narrow = service_for(&AppConfig::default(), ctx, &repository);
        assert!(narrow.get_department(sales).await.is_ok());

        let full_chain = load_config("[isolation]\ndepartment_filter = \"full_chain\"\n");
        let strict = service_for(&full_chain, ctx, &repository);
        assert!(matches!(
            strict.get_department(sales).await,
            Err(ApplicationError::NotFound(_))
        ));
    }
}

// ============================================================================
// Header contexts
// ============================================================================

mod header_flow_tests {
    use super::*;

    fn service_from_headers(
        config: &AppConfig,
        headers: &[(&str, String)],
        repository: &InMemoryDepartmentRepository,
    ) -> DepartmentService {
        let provider = HeaderContextProvider::from_headers(
            &config.isolation.headers,
            headers.iter().map(|(k, v)| (*k, v.as_str())),
        );
        department_service(config, Arc::new(provider), Arc::new(repository.clone()))
    }

    #[tokio::test]
    async fn missing_headers_are_missing_context() {
        let repository = InMemoryDepartmentRepository::new();
        let service = service_from_headers(&AppConfig::default(), &[], &repository);

        let err = service.list_departments().await.unwrap_err();
        assert_eq!(err.as_isolation(), Some(&IsolationError::MissingContext));
    }

    #[tokio::test]
    async fn malformed_headers_are_missing_context() {
        let repository = InMemoryDepartmentRepository::new();
        let headers = [("x-tenant-id", "not-a-uuid".to_string())];
        let service = service_from_headers(&AppConfig::default(), &headers, &repository);

        let err = service.list_departments().await.unwrap_err();
        assert_eq!(err.as_isolation(), Some(&IsolationError::MissingContext));
    }

    #[tokio::test]
    async fn tenant_header_scopes_listing() {
        let repository = InMemoryDepartmentRepository::new();
        let t = TenantId::new();
        seeded_department(&repository, t, OrganizationId::new(), "Sales").await;
        seeded_department(&repository, TenantId::new(), OrganizationId::new(), "Legal").await;

        let headers = [("X-Tenant-Id", t.to_string())];
        let listed = service_from_headers(&AppConfig::default(), &headers, &repository)
            .list_departments()
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Sales");
    }
}
