//! reqwest adapter for the per-tenant ML-platform API.

use async_trait::async_trait;
use deployment_hub_sdk::{ConfigurationRequest, CreatedDeployment, Deployment};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::TenantCredential;
use crate::domain::ports::{CreatedConfiguration, DeploymentPage, TenantApi, TenantApiError};

use super::http::{describe_send_error, error_body};

#[derive(Deserialize)]
struct DeploymentListDto {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    resources: Vec<Deployment>,
}

#[derive(Deserialize)]
struct CreatedConfigurationDto {
    id: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDeploymentDto<'a> {
    configuration_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<&'a str>,
}

/// Tenant API over HTTP with bearer auth.
pub struct HttpTenantApi {
    client: reqwest::Client,
    resource_group_header: String,
}

impl HttpTenantApi {
    /// `resource_group_header` names the header carrying the tenant's
    /// resource group. Empty disables it.
    #[must_use]
    pub fn new(client: reqwest::Client, resource_group_header: impl Into<String>) -> Self {
        Self {
            client,
            resource_group_header: resource_group_header.into(),
        }
    }

    fn request(
        &self,
        method: reqwest::Method,
        credential: &TenantCredential,
        token: &SecretString,
        path: &str,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}/{path}", credential.api_url.trim_end_matches('/'));
        let mut builder = self
            .client
            .request(method, url)
            .bearer_auth(token.expose_secret());
        if !self.resource_group_header.is_empty() && !credential.resource_group.is_empty() {
            builder = builder.header(
                self.resource_group_header.as_str(),
                credential.resource_group.as_str(),
            );
        }
        builder
    }
}

async fn send_json<T: DeserializeOwned>(
    builder: reqwest::RequestBuilder,
) -> Result<T, TenantApiError> {
    let response = builder
        .send()
        .await
        .map_err(|e| TenantApiError::Transport(describe_send_error(&e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TenantApiError::Status {
            status: status.as_u16(),
            body: error_body(response).await,
        });
    }

    response
        .json()
        .await
        .map_err(|e| TenantApiError::Decode(e.to_string()))
}

#[async_trait]
impl TenantApi for HttpTenantApi {
    #[instrument(skip_all, fields(team = %credential.team))]
    async fn list_deployments(
        &self,
        credential: &TenantCredential,
        token: &SecretString,
    ) -> Result<DeploymentPage, TenantApiError> {
        let dto: DeploymentListDto = send_json(self.request(
            reqwest::Method::GET,
            credential,
            token,
            "deployments",
        ))
        .await?;

        let count = dto.count.unwrap_or(dto.resources.len() as u64);
        debug!(count, "tenant deployments listed");
        Ok(DeploymentPage {
            count,
            deployments: dto.resources,
        })
    }

    #[instrument(skip_all, fields(team = %credential.team, name = %request.name))]
    async fn create_configuration(
        &self,
        credential: &TenantCredential,
        token: &SecretString,
        request: &ConfigurationRequest,
    ) -> Result<CreatedConfiguration, TenantApiError> {
        let dto: CreatedConfigurationDto = send_json(
            self.request(reqwest::Method::POST, credential, token, "configurations")
                .json(request),
        )
        .await?;

        Ok(CreatedConfiguration {
            id: dto.id,
            message: dto.message,
        })
    }

    #[instrument(skip_all, fields(team = %credential.team, configuration_id = %configuration_id))]
    async fn create_deployment(
        &self,
        credential: &TenantCredential,
        token: &SecretString,
        configuration_id: &str,
        ttl: Option<&str>,
    ) -> Result<CreatedDeployment, TenantApiError> {
        let body = CreateDeploymentDto {
            configuration_id,
            ttl,
        };
        send_json(
            self.request(reqwest::Method::POST, credential, token, "deployments")
                .json(&body),
        )
        .await
    }
}
