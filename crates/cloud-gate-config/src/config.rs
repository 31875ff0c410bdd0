// cloud-gate-config/src/config.rs
// ============================================================================
// Module: Cloud Gate Configuration
// Description: Configuration loading and validation for Cloud Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: cloud-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Unknown keys are rejected and invalid values fail closed. Module flags are
//! the documented exception: modules absent from `[modules]` are enabled, so
//! a stale configuration never hides newly shipped operations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use cloud_gate_core::ModuleFlags;
use cloud_gate_core::ModuleTag;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "cloud-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CLOUD_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default HTTP bind address.
pub(crate) const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";
/// Default handler invocation timeout in milliseconds.
pub(crate) const DEFAULT_INVOKE_TIMEOUT_MS: u64 = 30_000;
/// Minimum allowed handler invocation timeout in milliseconds.
pub(crate) const MIN_INVOKE_TIMEOUT_MS: u64 = 100;
/// Maximum allowed handler invocation timeout in milliseconds.
pub(crate) const MAX_INVOKE_TIMEOUT_MS: u64 = 600_000;
/// Default maximum serialized payload size in bytes.
pub(crate) const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;
/// Maximum allowed payload size limit in bytes.
pub(crate) const MAX_MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;
/// Default maximum inbound request size in bytes.
pub(crate) const DEFAULT_MAX_REQUEST_BYTES: usize = 1024 * 1024;
/// Maximum allowed inbound request size limit in bytes.
pub(crate) const MAX_MAX_REQUEST_BYTES: usize = 16 * 1024 * 1024;
/// Default connector retry attempts.
pub(crate) const DEFAULT_CONNECTOR_MAX_ATTEMPTS: u32 = 3;
/// Maximum allowed connector retry attempts.
pub(crate) const MAX_CONNECTOR_MAX_ATTEMPTS: u32 = 10;
/// Default connector backoff base in milliseconds.
pub(crate) const DEFAULT_CONNECTOR_BACKOFF_MS: u64 = 250;
/// Maximum allowed connector backoff base in milliseconds.
pub(crate) const MAX_CONNECTOR_BACKOFF_MS: u64 = 30_000;
/// Default connector per-request timeout in milliseconds.
pub(crate) const DEFAULT_CONNECTOR_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Minimum connector per-request timeout in milliseconds.
pub(crate) const MIN_CONNECTOR_REQUEST_TIMEOUT_MS: u64 = 100;
/// Maximum connector per-request timeout in milliseconds.
pub(crate) const MAX_CONNECTOR_REQUEST_TIMEOUT_MS: u64 = 120_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Cloud Gate configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CloudGateConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Module enablement flags; absent modules are enabled.
    #[serde(default)]
    pub modules: ModuleFlags,
    /// Dispatch limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Cloud connector configuration.
    #[serde(default)]
    pub connector: ConnectorConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl CloudGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then `CLOUD_GATE_CONFIG`, then
    /// `cloud-gate.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string without touching the
    /// filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.limits.validate()?;
        self.connector.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Returns whether a module is enabled under this configuration.
    #[must_use]
    pub fn module_enabled(&self, module: &ModuleTag) -> bool {
        self.modules.is_enabled(module)
    }
}

/// Server transport selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-free framed JSON-RPC over stdin/stdout.
    #[default]
    Stdio,
    /// JSON-RPC over HTTP POST.
    Http,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Transport the server speaks.
    #[serde(default)]
    pub transport: TransportKind,
    /// Bind address for the HTTP transport.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl ServerConfig {
    /// Validates the server section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.transport == TransportKind::Http && self.bind_addr.port() == 0 {
            return Err(ConfigError::Invalid(
                "server.bind_addr must carry an explicit port for http".to_string(),
            ));
        }
        Ok(())
    }
}

/// Dispatch limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Handler invocation timeout in milliseconds.
    #[serde(default = "default_invoke_timeout_ms")]
    pub invoke_timeout_ms: u64,
    /// Maximum serialized payload size before truncation, in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
    /// Maximum inbound request size, in bytes.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            invoke_timeout_ms: DEFAULT_INVOKE_TIMEOUT_MS,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        }
    }
}

impl LimitsConfig {
    /// Validates the limits section.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_INVOKE_TIMEOUT_MS..=MAX_INVOKE_TIMEOUT_MS).contains(&self.invoke_timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "limits.invoke_timeout_ms must be within {MIN_INVOKE_TIMEOUT_MS}..={MAX_INVOKE_TIMEOUT_MS}"
            )));
        }
        if self.max_payload_bytes == 0 || self.max_payload_bytes > MAX_MAX_PAYLOAD_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.max_payload_bytes must be within 1..={MAX_MAX_PAYLOAD_BYTES}"
            )));
        }
        if self.max_request_bytes == 0 || self.max_request_bytes > MAX_MAX_REQUEST_BYTES {
            return Err(ConfigError::Invalid(format!(
                "limits.max_request_bytes must be within 1..={MAX_MAX_REQUEST_BYTES}"
            )));
        }
        Ok(())
    }
}

/// Cloud connector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    /// Cloud region identifier, for example `us-ashburn-1`.
    #[serde(default)]
    pub region: String,
    /// Base endpoint override; empty selects the region default.
    #[serde(default)]
    pub endpoint: String,
    /// Auth profile name passed through to the backend; empty omits it.
    #[serde(default)]
    pub profile: String,
    /// Tenancy identifier passed through to the backend; empty omits it.
    #[serde(default)]
    pub tenancy: String,
    /// Compartment identifier passed through to the backend; empty omits it.
    #[serde(default)]
    pub compartment: String,
    /// Object storage namespace passed through to the backend; empty omits it.
    #[serde(default)]
    pub namespace: String,
    /// Maximum attempts per backend call, including the first.
    #[serde(default = "default_connector_max_attempts")]
    pub max_attempts: u32,
    /// Exponential backoff base in milliseconds between attempts.
    #[serde(default = "default_connector_backoff_ms")]
    pub backoff_ms: u64,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_connector_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            endpoint: String::new(),
            profile: String::new(),
            tenancy: String::new(),
            compartment: String::new(),
            namespace: String::new(),
            max_attempts: DEFAULT_CONNECTOR_MAX_ATTEMPTS,
            backoff_ms: DEFAULT_CONNECTOR_BACKOFF_MS,
            request_timeout_ms: DEFAULT_CONNECTOR_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ConnectorConfig {
    /// Validates the connector section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 || self.max_attempts > MAX_CONNECTOR_MAX_ATTEMPTS {
            return Err(ConfigError::Invalid(format!(
                "connector.max_attempts must be within 1..={MAX_CONNECTOR_MAX_ATTEMPTS}"
            )));
        }
        if self.backoff_ms > MAX_CONNECTOR_BACKOFF_MS {
            return Err(ConfigError::Invalid(format!(
                "connector.backoff_ms must not exceed {MAX_CONNECTOR_BACKOFF_MS}"
            )));
        }
        if !(MIN_CONNECTOR_REQUEST_TIMEOUT_MS..=MAX_CONNECTOR_REQUEST_TIMEOUT_MS)
            .contains(&self.request_timeout_ms)
        {
            return Err(ConfigError::Invalid(format!(
                "connector.request_timeout_ms must be within {MIN_CONNECTOR_REQUEST_TIMEOUT_MS}..={MAX_CONNECTOR_REQUEST_TIMEOUT_MS}"
            )));
        }
        if !self.endpoint.is_empty()
            && !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://"))
        {
            return Err(ConfigError::Invalid(
                "connector.endpoint must be an http(s) URL".to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSinkKind {
    /// One JSON line per event on stderr.
    #[default]
    Stderr,
    /// One JSON line per event appended to a file.
    File,
    /// Events are discarded.
    None,
}

/// Audit sink configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// File path, required when the sink is `file`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates the audit section.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.sink {
            AuditSinkKind::File => match &self.path {
                Some(path) => validate_path(path),
                None => Err(ConfigError::Invalid(
                    "audit.path is required when audit.sink is file".to_string(),
                )),
            },
            AuditSinkKind::Stderr | AuditSinkKind::None => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Default HTTP bind address.
fn default_bind_addr() -> SocketAddr {
    #[allow(clippy::expect_used, reason = "Address literal is a compile-time constant.")]
    DEFAULT_BIND_ADDR.parse().expect("default bind address is valid")
}

/// Default handler invocation timeout.
const fn default_invoke_timeout_ms() -> u64 {
    DEFAULT_INVOKE_TIMEOUT_MS
}

/// Default payload size limit.
const fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

/// Default inbound request size limit.
const fn default_max_request_bytes() -> usize {
    DEFAULT_MAX_REQUEST_BYTES
}

/// Default connector attempt count.
const fn default_connector_max_attempts() -> u32 {
    DEFAULT_CONNECTOR_MAX_ATTEMPTS
}

/// Default connector backoff base.
const fn default_connector_backoff_ms() -> u64 {
    DEFAULT_CONNECTOR_BACKOFF_MS
}

/// Default connector request timeout.
const fn default_connector_request_timeout_ms() -> u64 {
    DEFAULT_CONNECTOR_REQUEST_TIMEOUT_MS
}
