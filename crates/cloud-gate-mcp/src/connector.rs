// cloud-gate-mcp/src/connector.rs
// ============================================================================
// Module: Cloud Connector
// Description: Explicit collaborator performing cloud provider calls.
// Purpose: Isolate provider I/O, retries, and endpoints behind one trait.
// Dependencies: async-trait, cloud-gate-config, reqwest, serde, tokio
// ============================================================================

//! ## Overview
//! [`CloudConnector`] is the single seam through which backend calls leave
//! the gateway. The production [`HttpConnector`] keeps one lazily built
//! client per service and applies the configured retry policy with
//! exponential backoff. Retry lives here and only here; the dispatcher never
//! retries. Test doubles implement the trait directly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use cloud_gate_config::ConnectorConfig;
use cloud_gate_core::OperationName;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Service Kinds
// ============================================================================

/// Backend services the connector can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Object storage buckets and objects.
    ObjectStorage,
    /// Compute clusters and resource pools.
    Compute,
    /// Identity, workspaces, and access control.
    Identity,
    /// Data catalog.
    DataCatalog,
    /// Notebooks and job scheduling.
    DataScience,
}

impl ServiceKind {
    /// Returns the URL path segment for this service.
    #[must_use]
    pub const fn path_segment(&self) -> &'static str {
        match self {
            Self::ObjectStorage => "object-storage",
            Self::Compute => "compute",
            Self::Identity => "identity",
            Self::DataCatalog => "data-catalog",
            Self::DataScience => "data-science",
        }
    }
}

// ============================================================================
// SECTION: Connector Trait
// ============================================================================

/// One backend call: target service, operation, and validated payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorCall {
    /// Target service.
    pub service: ServiceKind,
    /// Operation being performed.
    pub operation: OperationName,
    /// Validated parameter payload.
    pub payload: Value,
}

/// Performs cloud provider calls on behalf of operation handlers.
#[async_trait]
pub trait CloudConnector: Send + Sync {
    /// Executes one backend call.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError`] when the call fails after any configured
    /// retries.
    async fn call(&self, call: ConnectorCall) -> Result<Value, ConnectorError>;
}

/// Backend call failure with a transience classification.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ConnectorError {
    /// Human-readable failure description.
    pub message: String,
    /// Whether the failure is transient and worth retrying upstream.
    pub retryable: bool,
}

impl ConnectorError {
    /// Creates a permanent connector failure.
    #[must_use]
    pub fn permanent(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    /// Creates a transient connector failure.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }
}

// ============================================================================
// SECTION: HTTP Connector
// ============================================================================

/// HTTP connector with per-service clients and retry.
pub struct HttpConnector {
    /// Connector configuration: endpoint, retry, timeouts.
    config: ConnectorConfig,
    /// Lazily built per-service HTTP clients.
    clients: Mutex<BTreeMap<ServiceKind, reqwest::Client>>,
}

impl HttpConnector {
    /// Creates a connector from configuration. Clients are built on first
    /// use per service, so an unused service costs nothing.
    #[must_use]
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            config,
            clients: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the client for a service, building it on first use.
    fn client(&self, service: ServiceKind) -> Result<reqwest::Client, ConnectorError> {
        let mut clients = self
            .clients
            .lock()
            .map_err(|_| ConnectorError::permanent("connector client registry poisoned"))?;
        if let Some(client) = clients.get(&service) {
            return Ok(client.clone());
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(self.config.request_timeout_ms))
            .build()
            .map_err(|err| ConnectorError::permanent(format!("client build failed: {err}")))?;
        clients.insert(service, client.clone());
        Ok(client)
    }

    /// Builds the request URL for a call.
    fn url(&self, call: &ConnectorCall) -> String {
        let base = if self.config.endpoint.is_empty() {
            format!("https://api.{}.cloud.example.com", self.config.region)
        } else {
            self.config.endpoint.trim_end_matches('/').to_string()
        };
        format!("{base}/{}/{}", call.service.path_segment(), call.operation)
    }

    /// Performs one attempt without retry bookkeeping. Tenancy scope from
    /// configuration travels as headers, never mixed into the payload.
    async fn attempt(
        &self,
        client: &reqwest::Client,
        url: &str,
        call: &ConnectorCall,
    ) -> Result<Value, ConnectorError> {
        let mut request = client.post(url).json(&call.payload);
        for (header, value) in [
            ("x-auth-profile", &self.config.profile),
            ("x-tenancy", &self.config.tenancy),
            ("x-compartment", &self.config.compartment),
            ("x-namespace", &self.config.namespace),
        ] {
            if !value.is_empty() {
                request = request.header(header, value);
            }
        }
        let response = request.send().await.map_err(|err| {
            if err.is_timeout() || err.is_connect() {
                ConnectorError::transient(format!("backend unreachable: {err}"))
            } else {
                ConnectorError::permanent(format!("backend request failed: {err}"))
            }
        })?;
        let status = response.status();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|err| ConnectorError::permanent(format!("invalid backend json: {err}")));
        }
        let body = response.text().await.unwrap_or_default();
        let message = format!("backend returned {status}: {body}");
        if status.is_server_error() || status.as_u16() == 429 {
            Err(ConnectorError::transient(message))
        } else {
            Err(ConnectorError::permanent(message))
        }
    }
}

#[async_trait]
impl CloudConnector for HttpConnector {
    async fn call(&self, call: ConnectorCall) -> Result<Value, ConnectorError> {
        let client = self.client(call.service)?;
        let url = self.url(&call);
        let mut backoff = Duration::from_millis(self.config.backoff_ms);
        let mut last_error = ConnectorError::permanent("no attempts made");
        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                tokio::time::sleep(backoff).await;
                backoff = backoff.saturating_mul(2);
            }
            match self.attempt(&client, &url, &call).await {
                Ok(value) => return Ok(value),
                Err(err) if err.retryable => last_error = err,
                Err(err) => return Err(err),
            }
        }
        Err(last_error)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
