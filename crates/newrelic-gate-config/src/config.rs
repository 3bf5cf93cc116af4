// crates/newrelic-gate-config/src/config.rs
// ============================================================================
// Module: Gateway Configuration
// Description: Configuration loading, environment overrides, and validation.
// Purpose: Provide strict, fail-closed config parsing with explicit limits.
// Dependencies: newrelic-gate-core, newrelic-gate-client, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from TOML, overlaid with `NEW_RELIC_*` environment
//! variables, and validated before use. Unknown keys are rejected. Missing
//! or invalid values fail closed.
//!
//! Resolution order for the file: explicit path, then
//! `NEWRELIC_GATE_CONFIG`, then `newrelic-gate.toml` in the working
//! directory. Only the implicit default may be absent; an explicit or
//! env-provided path that does not exist is an I/O error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use newrelic_gate_client::ApiAuditSink;
use newrelic_gate_client::FileAuditSink;
use newrelic_gate_client::HttpSettings;
use newrelic_gate_client::NoopAuditSink;
use newrelic_gate_client::StderrAuditSink;
use newrelic_gate_client::settings::DEFAULT_MAX_ERROR_BODY_BYTES;
use newrelic_gate_client::settings::DEFAULT_TIMEOUT_MS;
use newrelic_gate_client::settings::DEFAULT_USER_AGENT;
use newrelic_gate_core::Credentials;
use newrelic_gate_core::Region;
use newrelic_gate_core::RegionEndpoints;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default config file name.
pub const DEFAULT_CONFIG_NAME: &str = "newrelic-gate.toml";
/// Environment variable for the config path.
pub const CONFIG_ENV_VAR: &str = "NEWRELIC_GATE_CONFIG";
/// Environment variable overriding the API key.
pub const API_KEY_ENV_VAR: &str = "NEW_RELIC_API_KEY";
/// Environment variable overriding the default account id.
pub const ACCOUNT_ID_ENV_VAR: &str = "NEW_RELIC_ACCOUNT_ID";
/// Environment variable overriding the region.
pub const REGION_ENV_VAR: &str = "NEW_RELIC_REGION";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum request timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 120_000;
/// Maximum captured error body size in bytes.
pub(crate) const MAX_ERROR_BODY_LIMIT: usize = 1024 * 1024;
/// Maximum API key length.
pub(crate) const MAX_API_KEY_LENGTH: usize = 256;
/// Maximum user agent length.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading config or opening the audit file.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Gateway Config
// ============================================================================

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Default credentials and region.
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Outbound HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Optional base URL overrides.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl GatewayConfig {
    /// Loads configuration using the default resolution rules and applies
    /// process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |name| env::var(name).ok())
    }

    /// Loads configuration, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (resolved, implicit) = resolve_path(path, &lookup)?;
        validate_path(&resolved)?;
        let mut config = if implicit && !resolved.exists() {
            Self::default()
        } else {
            Self::read_file(&resolved)?
        };
        config.apply_env(&lookup);
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Overlays `NEW_RELIC_*` variables onto the credentials section.
    ///
    /// Empty variables are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        if let Some(api_key) = read(API_KEY_ENV_VAR) {
            self.credentials.api_key = Some(api_key);
        }
        if let Some(account_id) = read(ACCOUNT_ID_ENV_VAR) {
            self.credentials.account_id = Some(account_id.trim().to_string());
        }
        if let Some(region) = read(REGION_ENV_VAR) {
            self.credentials.region = Some(region.trim().to_string());
        }
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credentials.validate()?;
        self.http.validate()?;
        self.endpoints.validate()?;
        self.audit.validate()
    }

    /// Returns the configured default credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.credentials.api_key.clone(), self.credentials.account_id.clone())
    }

    /// Returns the configured region.
    #[must_use]
    pub fn region(&self) -> Region {
        Region::parse(self.credentials.region.as_deref())
    }

    /// Returns the endpoints for `region`, with configured overrides applied.
    #[must_use]
    pub fn endpoints_for(&self, region: Region) -> RegionEndpoints {
        let resolved = region.endpoints();
        RegionEndpoints::new(
            self.endpoints.rest_base_url.clone().unwrap_or(resolved.rest_base_url),
            self.endpoints.graphql_base_url.clone().unwrap_or(resolved.graphql_base_url),
        )
    }

    /// Returns the endpoints for the configured region.
    #[must_use]
    pub fn endpoints(&self) -> RegionEndpoints {
        self.endpoints_for(self.region())
    }

    /// Returns the HTTP transport settings.
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout_ms: self.http.timeout_ms,
            user_agent: self.http.user_agent.clone(),
            max_error_body_bytes: self.http.max_error_body_bytes,
        }
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn build_audit_sink(&self) -> Result<Arc<dyn ApiAuditSink>, ConfigError> {
        match self.audit.sink {
            AuditSinkKind::Stderr => Ok(Arc::new(StderrAuditSink)),
            AuditSinkKind::None => Ok(Arc::new(NoopAuditSink)),
            AuditSinkKind::File => {
                let path = self.audit.path.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("audit.path required for file sink".to_string())
                })?;
                let sink =
                    FileAuditSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
        }
    }
}

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Default credentials section.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Default API key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Default account id (digits only).
    #[serde(default)]
    pub account_id: Option<String>,
    /// Region token (`US` or `EU`, case-insensitive).
    #[serde(default)]
    pub region: Option<String>,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("account_id", &self.account_id)
            .field("region", &self.region)
            .finish()
    }
}

impl CredentialsConfig {
    /// Validates credential defaults.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api_key) = &self.api_key {
            if api_key.len() > MAX_API_KEY_LENGTH {
                return Err(ConfigError::Invalid("credentials.api_key too long".to_string()));
            }
            if api_key.chars().any(char::is_control) {
                return Err(ConfigError::Invalid(
                    "credentials.api_key contains control characters".to_string(),
                ));
            }
        }
        if let Some(account_id) = &self.account_id {
            let trimmed = account_id.trim();
            if !trimmed.is_empty() && !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(ConfigError::Invalid(
                    "credentials.account_id must be numeric".to_string(),
                ));
            }
        }
        if let Some(region) = &self.region {
            let token = region.trim();
            if !token.eq_ignore_ascii_case("us") && !token.eq_ignore_ascii_case("eu") {
                return Err(ConfigError::Invalid(format!(
                    "credentials.region must be US or EU, got '{token}'"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: HTTP
// ============================================================================

/// Outbound HTTP section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent for outbound requests.
    pub user_agent: String,
    /// Maximum captured bytes of a failing response body.
    pub max_error_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_error_body_bytes: DEFAULT_MAX_ERROR_BODY_BYTES,
        }
    }
}

impl HttpConfig {
    /// Validates HTTP limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "http.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() {
            return Err(ConfigError::Invalid("http.user_agent must be non-empty".to_string()));
        }
        if user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid("http.user_agent too long".to_string()));
        }
        if self.max_error_body_bytes == 0 || self.max_error_body_bytes > MAX_ERROR_BODY_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "http.max_error_body_bytes must be between 1 and {MAX_ERROR_BODY_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Base URL overrides; absent fields fall back to the region hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointsConfig {
    /// REST v2 base URL, e.g. `https://staging-api.newrelic.com/v2`.
    #[serde(default)]
    pub rest_base_url: Option<String>,
    /// GraphQL base URL; `/graphql` is appended.
    #[serde(default)]
    pub graphql_base_url: Option<String>,
}

impl EndpointsConfig {
    /// Validates override URLs.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.rest_base_url {
            validate_base_url("endpoints.rest_base_url", url)?;
        }
        if let Some(url) = &self.graphql_base_url {
            validate_base_url("endpoints.graphql_base_url", url)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// Append-only JSON lines file.
    File,
    /// Discard events.
    None,
}

/// Audit section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates sink settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path required for file sink".to_string()))
            }
            (AuditSinkKind::File, Some(path)) => validate_path(path),
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path only valid for file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag is true for the implicit default.
fn resolve_path<F>(path: Option<&Path>, lookup: &F) -> Result<(PathBuf, bool), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        return Ok((path.to_path_buf(), false));
    }
    if let Some(env_path) = lookup(CONFIG_ENV_VAR).filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), false));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), true))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.trim().is_empty() {
        return Err(ConfigError::Invalid("path must be non-empty".to_string()));
    }
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

/// Validates an absolute http(s) base URL without query or fragment.
fn validate_base_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!("{field} must use http or https")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid(format!("{field} must not carry a query or fragment")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
