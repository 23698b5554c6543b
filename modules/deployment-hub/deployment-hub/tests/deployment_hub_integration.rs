//! End-to-end tests of the deployment hub over mock tenants.
//!
//! Wires up: static directory → `DeploymentHubModule::init` with inline
//! credentials → reqwest OAuth exchange and tenant API → one `MockServer`
//! per tenant serving both its token endpoint and its API.

use std::sync::Arc;

use deployment_hub::infra::StaticDirectory;
use deployment_hub::{DeploymentHubConfig, DeploymentHubModule, StaticDirectoryConfig};
use deployment_hub_sdk::{
    ConfigurationRequest, CreateDeploymentRequest, DeploymentHubClient, DeploymentHubError,
    DeploymentStatus, Role, TeamRecord, UserRecord,
};
use httpmock::prelude::*;
use serde_json::json;
use uuid::Uuid;

const ORG: Uuid = Uuid::from_u128(0x100);
const ALPHA: Uuid = Uuid::from_u128(1);
const BETA: Uuid = Uuid::from_u128(2);
const GAMMA: Uuid = Uuid::from_u128(3);

fn credential(team: &str, server: &MockServer) -> serde_json::Value {
    json!({
        "team": team,
        "clientId": format!("{team}-client"),
        "clientSecret": format!("{team}-secret"),
        "oauthUrl": server.url("/oauth/token"),
        "apiUrl": server.url("/v2/lm"),
        "resourceGroup": "default"
    })
}

fn directory() -> StaticDirectoryConfig {
    let team = |id: Uuid, owner: &str| TeamRecord {
        id,
        name: owner.to_uppercase(),
        owner: Some(owner.to_owned()),
        group_id: None,
        organization_id: Some(ORG),
    };
    let user = |email: &str, team_id: Option<Uuid>, role: Role| UserRecord {
        email: email.to_owned(),
        team_id,
        role,
        group_id: None,
        organization_id: Some(ORG),
        metadata: serde_json::Value::Null,
    };

    let mut guest = user("guest@example.com", None, Role::Member);
    guest.metadata = json!({"ai_core_teams": ["team-beta"]});

    StaticDirectoryConfig {
        users: vec![
            user("alice@example.com", Some(ALPHA), Role::Member),
            user("boss@example.com", None, Role::Manager),
            guest,
        ],
        teams: vec![
            team(ALPHA, "team-alpha"),
            team(BETA, "team-beta"),
            team(GAMMA, "team-gamma"),
        ],
    }
}

fn hub(credentials: &[serde_json::Value]) -> Arc<dyn DeploymentHubClient> {
    let cfg = DeploymentHubConfig {
        credentials_json: Some(serde_json::Value::Array(credentials.to_vec()).to_string()),
        ..DeploymentHubConfig::default()
    };
    module(&cfg).client()
}

fn module(cfg: &DeploymentHubConfig) -> DeploymentHubModule {
    let dir = Arc::new(StaticDirectory::from_config(&directory()));
    DeploymentHubModule::init(cfg, dir.clone(), dir).unwrap()
}

fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
    let body = json!({"access_token": token, "token_type": "Bearer", "expires_in": 3600});
    server.mock(|when, then| {
        when.method(POST).path("/oauth/token");
        then.status(200).json_body(body);
    })
}

fn mock_list<'a>(
    server: &'a MockServer,
    token: &str,
    statuses: &[&str],
) -> httpmock::Mock<'a> {
    let resources: Vec<_> = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| json!({"id": format!("d{i}"), "status": status}))
        .collect();
    let body = json!({"count": resources.len(), "resources": resources});
    let bearer = format!("Bearer {token}");
    server.mock(|when, then| {
        when.method(GET)
            .path("/v2/lm/deployments")
            .header("authorization", bearer)
            .header("ai-resource-group", "default");
        then.status(200).json_body(body);
    })
}

#[tokio::test]
async fn member_lists_own_tenant_and_reuses_token() {
    let alpha = MockServer::start();
    let token = mock_token(&alpha, "tok-alpha");
    let list = mock_list(&alpha, "tok-alpha", &["RUNNING", "STOPPED"]);
    let hub = hub(&[credential("team-alpha", &alpha)]);

    let first = hub.list_deployments("alice@example.com").await.unwrap();
    let second = hub.list_deployments("alice@example.com").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.total, 2);
    assert_eq!(first.tenants.len(), 1);
    assert_eq!(first.tenants[0].tenant, "team-alpha");
    let statuses: Vec<_> = first.tenants[0].deployments.iter().map(|d| d.status).collect();
    assert_eq!(statuses, [DeploymentStatus::Running, DeploymentStatus::Stopped]);

    token.assert_calls(1);
    list.assert_calls(2);
}

#[tokio::test]
async fn manager_sees_only_credentialed_tenants() {
    let alpha = MockServer::start();
    mock_token(&alpha, "tok-alpha");
    mock_list(&alpha, "tok-alpha", &["RUNNING"]);
    let hub = hub(&[credential("team-alpha", &alpha)]);

    let result = hub.list_deployments("boss@example.com").await.unwrap();

    assert_eq!(result.total, 1);
    let names: Vec<_> = result.tenants.iter().map(|t| t.tenant.as_str()).collect();
    assert_eq!(names, ["team-alpha"]);

    let tenants = hub.accessible_tenants("boss@example.com").await.unwrap();
    assert_eq!(tenants, ["team-alpha", "team-beta", "team-gamma"]);
}

#[tokio::test]
async fn failing_tenant_is_left_out() {
    let alpha = MockServer::start();
    mock_token(&alpha, "tok-alpha");
    mock_list(&alpha, "tok-alpha", &["RUNNING", "PENDING"]);

    let beta = MockServer::start();
    mock_token(&beta, "tok-beta");
    beta.mock(|when, then| {
        when.method(GET).path("/v2/lm/deployments");
        then.status(500).body("internal error");
    });

    let gamma = MockServer::start();
    gamma.mock(|when, then| {
        when.method(POST).path("/oauth/token");
        then.status(401).body("invalid_client");
    });

    let hub = hub(&[
        credential("team-alpha", &alpha),
        credential("team-beta", &beta),
        credential("team-gamma", &gamma),
    ]);

    let result = hub.list_deployments("boss@example.com").await.unwrap();

    let names: Vec<_> = result.tenants.iter().map(|t| t.tenant.as_str()).collect();
    assert_eq!(names, ["team-alpha"]);
    assert_eq!(result.total, 2);
}

#[tokio::test]
async fn unauthorized_tenant_answer_forces_new_exchange() {
    let alpha = MockServer::start();
    let token = mock_token(&alpha, "tok-alpha");
    let rejected = alpha.mock(|when, then| {
        when.method(GET).path("/v2/lm/deployments");
        then.status(401).body("token revoked");
    });
    let hub = hub(&[credential("team-alpha", &alpha)]);

    assert!(hub.list_deployments("alice@example.com").await.unwrap().is_empty());
    assert!(hub.list_deployments("alice@example.com").await.unwrap().is_empty());

    rejected.assert_calls(2);
    token.assert_calls(2);
}

#[tokio::test]
async fn create_with_inline_configuration() {
    let alpha = MockServer::start();
    mock_token(&alpha, "tok-alpha");
    let configuration = alpha.mock(|when, then| {
        when.method(POST)
            .path("/v2/lm/configurations")
            .body_includes(r#""executableId":"exec-1""#);
        then.status(201).json_body(json!({"id": "cfg-new", "message": "Configuration created"}));
    });
    let deployment = alpha.mock(|when, then| {
        when.method(POST)
            .path("/v2/lm/deployments")
            .json_body(json!({"configurationId": "cfg-new", "ttl": "4h"}));
        then.status(202).json_body(json!({
            "id": "dep-1",
            "message": "Deployment scheduled.",
            "status": "PENDING",
            "ttl": "4h"
        }));
    });
    let hub = hub(&[credential("team-alpha", &alpha)]);

    let request = CreateDeploymentRequest::from_configuration_request(
        ConfigurationRequest {
            name: "serving".to_owned(),
            executable_id: "exec-1".to_owned(),
            scenario_id: "scen-1".to_owned(),
            parameter_bindings: Vec::new(),
        },
        Some("4h".to_owned()),
    );
    let created = hub
        .create_deployment("alice@example.com", &request)
        .await
        .unwrap();

    configuration.assert_calls(1);
    deployment.assert_calls(1);
    assert_eq!(created.id, "dep-1");
    assert_eq!(created.status, Some(DeploymentStatus::Pending));
    assert_eq!(created.ttl.as_deref(), Some("4h"));
}

#[tokio::test]
async fn rejected_configuration_stops_before_deployment() {
    let alpha = MockServer::start();
    mock_token(&alpha, "tok-alpha");
    alpha.mock(|when, then| {
        when.method(POST).path("/v2/lm/configurations");
        then.status(400).body("executable not found");
    });
    let deployment = alpha.mock(|when, then| {
        when.method(POST).path("/v2/lm/deployments");
        then.status(202).json_body(json!({"id": "dep-never"}));
    });
    let hub = hub(&[credential("team-alpha", &alpha)]);

    let request = CreateDeploymentRequest::from_configuration_request(
        ConfigurationRequest {
            name: "serving".to_owned(),
            executable_id: "missing".to_owned(),
            scenario_id: "scen-1".to_owned(),
            parameter_bindings: Vec::new(),
        },
        None,
    );
    let err = hub
        .create_deployment("alice@example.com", &request)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DeploymentHubError::ConfigurationCreationFailed {
            cause: "tenant answered HTTP 400: executable not found".to_owned()
        }
    );
    deployment.assert_calls(0);
}

#[tokio::test]
async fn invalid_request_makes_no_calls() {
    let alpha = MockServer::start();
    let token = mock_token(&alpha, "tok-alpha");
    let hub = hub(&[credential("team-alpha", &alpha)]);

    let both = CreateDeploymentRequest {
        configuration_id: Some("cfg-1".to_owned()),
        configuration_request: Some(ConfigurationRequest {
            name: "serving".to_owned(),
            executable_id: "exec-1".to_owned(),
            scenario_id: "scen-1".to_owned(),
            parameter_bindings: Vec::new(),
        }),
        ttl: None,
    };
    let err = hub
        .create_deployment("alice@example.com", &both)
        .await
        .unwrap_err();
    assert!(matches!(err, DeploymentHubError::InvalidDeploymentRequest(_)));

    let neither = CreateDeploymentRequest::default();
    let err = hub
        .create_deployment("alice@example.com", &neither)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid deployment request: either configurationId or configurationRequest must be provided"
    );

    token.assert_calls(0);
}

#[tokio::test]
async fn supplemental_only_caller_cannot_create() {
    let beta = MockServer::start();
    let token = mock_token(&beta, "tok-beta");
    let hub = hub(&[credential("team-beta", &beta)]);

    let request = CreateDeploymentRequest::from_configuration_id("cfg-1", None);
    let err = hub
        .create_deployment("guest@example.com", &request)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DeploymentHubError::UserNotAssignedToTeam {
            email: "guest@example.com".to_owned()
        }
    );
    token.assert_calls(0);
}

#[tokio::test]
async fn missing_credentials_are_reported() {
    let cfg = DeploymentHubConfig {
        credentials_env: "DEPLOYMENT_HUB_IT_SURELY_UNSET_7C21".to_owned(),
        ..DeploymentHubConfig::default()
    };
    let module = module(&cfg);

    let err = module.client().list_deployments("alice@example.com").await.unwrap_err();
    assert_eq!(err, DeploymentHubError::CredentialsNotConfigured);

    let err = module.preload_credentials().await.unwrap_err();
    assert_eq!(err, DeploymentHubError::CredentialsNotConfigured);
}

#[tokio::test]
async fn unknown_caller_is_reported() {
    let hub = hub(&[]);
    let err = hub.list_deployments("nobody@example.com").await.unwrap_err();
    assert_eq!(
        err,
        DeploymentHubError::UserNotFound {
            email: "nobody@example.com".to_owned()
        }
    );
}
