//! Azure AI Agent Service client
//!
//! Implements [`AgentService`] over the service's REST API. The project is
//! addressed by its connection string,
//! `<host>;<subscription id>;<resource group>;<project name>`, and requests
//! carry a bearer token for the `https://ml.azure.com` audience (for example
//! from `az account get-access-token --resource https://ml.azure.com`).

use crate::error::{Result, ServiceError};
use crate::service::AgentService;
use crate::types::{
    AgentSpec, HostedAgentInfo, ListPage, MessageRole, Run, Thread, ThreadMessage, ToolOutput,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_API_VERSION: &str = "2024-12-01-preview";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const PAGE_LIMIT: &str = "100";

/// Connection settings for the agent service
#[derive(Debug, Clone)]
pub struct AgentServiceConfig {
    /// Project connection string
    pub connection_string: String,

    /// Bearer token sent with every request
    pub access_token: String,

    /// `api-version` query parameter
    pub api_version: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AgentServiceConfig {
    /// Create a config with default API version and timeout
    pub fn new(connection_string: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read `PROJECT_CONNECTION_STRING` and `AZURE_AI_AGENTS_TOKEN`
    pub fn from_env() -> Result<Self> {
        let connection_string = agent_utils::required_env("PROJECT_CONNECTION_STRING")?;
        let access_token = agent_utils::required_env("AZURE_AI_AGENTS_TOKEN")?;
        let mut config = Self::new(connection_string, access_token);
        if let Some(version) = agent_utils::optional_env("AZURE_AI_AGENTS_API_VERSION") {
            config.api_version = version;
        }
        Ok(config)
    }

    /// Set the API version
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL of the project derived from the connection string
    pub fn endpoint(&self) -> Result<String> {
        let parts: Vec<&str> = self.connection_string.trim().split(';').map(str::trim).collect();
        let [host, subscription, resource_group, project] = parts.as_slice() else {
            return Err(ServiceError::InvalidConnectionString(format!(
                "expected 4 ';'-separated fields, found {}",
                parts.len()
            )));
        };
        if [host, subscription, resource_group, project]
            .iter()
            .any(|part| part.is_empty())
        {
            return Err(ServiceError::InvalidConnectionString(
                "empty field in connection string".to_string(),
            ));
        }

        let endpoint = format!(
            "https://{host}/agents/v1.0/subscriptions/{subscription}/resourceGroups/{resource_group}/providers/Microsoft.MachineLearningServices/workspaces/{project}"
        );
        url::Url::parse(&endpoint)
            .map_err(|e| ServiceError::InvalidConnectionString(e.to_string()))?;
        Ok(endpoint)
    }
}

/// REST client for the Azure AI Agent Service
pub struct AzureAgentsClient {
    client: Client,
    endpoint: String,
    api_version: String,
    access_token: String,
}

impl AzureAgentsClient {
    /// Create a client from a service configuration
    pub fn with_config(config: &AgentServiceConfig) -> Result<Self> {
        let endpoint = config.endpoint()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_version: config.api_version.clone(),
            access_token: config.access_token.clone(),
        })
    }

    /// Create a client for an explicit base URL
    ///
    /// Useful for proxies and for tests against a local mock server.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint).map_err(|e| {
            ServiceError::Configuration(format!("invalid endpoint {endpoint}: {e}"))
        })?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
        })
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.endpoint))
            .bearer_auth(&self.access_token)
            .query(&[("api-version", self.api_version.as_str())])
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ServiceError::AuthenticationFailed,
                404 => ServiceError::NotFound(body),
                429 => ServiceError::RateLimited(body),
                code => ServiceError::Api { status: code, body },
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AgentService for AzureAgentsClient {
    #[instrument(skip(self, spec), fields(agent_name = %spec.name, tool_count = spec.tools.len()))]
    async fn create_agent(&self, spec: &AgentSpec) -> Result<HostedAgentInfo> {
        let request = self
            .request(Method::POST, "assistants")
            .json(&spec.to_request_body());
        let agent: HostedAgentInfo = self.send(request).await?;
        debug!(agent_id = %agent.id, "Agent created");
        Ok(agent)
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        let request = self.request(Method::DELETE, &format!("assistants/{agent_id}"));
        let _: serde_json::Value = self.send(request).await?;
        debug!(agent_id, "Agent deleted");
        Ok(())
    }

    async fn create_thread(&self) -> Result<Thread> {
        let request = self.request(Method::POST, "threads").json(&json!({}));
        self.send(request).await
    }

    #[instrument(skip(self, content), fields(content_length = content.len()))]
    async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<ThreadMessage> {
        let request = self
            .request(Method::POST, &format!("threads/{thread_id}/messages"))
            .json(&json!({ "role": role, "content": content }));
        self.send(request).await
    }

    async fn create_run(&self, thread_id: &str, agent_id: &str) -> Result<Run> {
        let request = self
            .request(Method::POST, &format!("threads/{thread_id}/runs"))
            .json(&json!({ "assistant_id": agent_id }));
        self.send(request).await
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let request = self.request(Method::GET, &format!("threads/{thread_id}/runs/{run_id}"));
        self.send(request).await
    }

    #[instrument(skip(self, outputs), fields(output_count = outputs.len()))]
    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        let request = self
            .request(
                Method::POST,
                &format!("threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            )
            .json(&json!({ "tool_outputs": outputs }));
        self.send(request).await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let request = self.request(
            Method::POST,
            &format!("threads/{thread_id}/runs/{run_id}/cancel"),
        );
        self.send(request).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>> {
        let mut messages = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, &format!("threads/{thread_id}/messages"))
                .query(&[("order", "asc"), ("limit", PAGE_LIMIT)]);
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let page: ListPage<ThreadMessage> = self.send(request).await?;
            messages.extend(page.data);

            match (page.has_more, page.last_id) {
                (true, Some(last_id)) => after = Some(last_id),
                _ => break,
            }
        }

        Ok(messages)
    }
}
