//! Gateway configuration loading and types.
//!
//! Configuration comes from an optional YAML file (path in `GATEWAY_CONFIG`,
//! default `./config/gateway.yaml`) with environment variable overrides on
//! top. Every field has a default, so the gateway boots with no file at all
//! — matching the original deployment model where `MAIN_DOMAIN` is the only
//! value operators routinely set.

use serde::Deserialize;
use std::path::Path;

use crate::error::{GatewayError, GatewayResult};

/// Root gateway configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub routing: RoutingConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_body_size")]
    pub max_body_size_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_size_bytes: default_max_body_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2MB
}

/// Tenant routing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Canonical main domain against which hostnames are classified.
    #[serde(default = "default_main_domain")]
    pub main_domain: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            main_domain: default_main_domain(),
        }
    }
}

fn default_main_domain() -> String {
    khatawat_tenant::DEFAULT_MAIN_DOMAIN.to_string()
}

/// Commerce backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the commerce backend's storefront API.
    #[serde(default = "default_upstream_url")]
    pub url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// API key sent as `X-Store-API-Key` on every storefront call.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_upstream_timeout(),
            health_path: default_health_path(),
            api_key: None,
        }
    }
}

fn default_upstream_url() -> String {
    // Local commerce API for development setups.
    "http://localhost:8000".to_string()
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_health_path() -> String {
    "/api/health".to_string()
}

/// Storefront response cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_max_entries(),
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_cache_max_entries() -> u64 {
    10_000
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            max_age_secs: default_max_age(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_max_age() -> u64 {
    86400
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl GatewayConfig {
    /// Load configuration: the YAML file if present, built-in defaults
    /// otherwise. Environment overrides are applied in either case.
    pub fn load() -> GatewayResult<Self> {
        let path = Self::config_path();
        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GatewayError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> GatewayResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {e}")))
    }

    /// Get the configuration file path from environment or default.
    pub fn config_path() -> String {
        std::env::var("GATEWAY_CONFIG").unwrap_or_else(|_| "./config/gateway.yaml".to_string())
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("GATEWAY_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(main_domain) = std::env::var(khatawat_tenant::MAIN_DOMAIN_ENV) {
            if !main_domain.trim().is_empty() {
                self.routing.main_domain = main_domain;
            }
        }
        if let Ok(url) = std::env::var("STOREFRONT_API_URL") {
            if !url.trim().is_empty() {
                self.upstream.url = url;
            }
        }
        if let Ok(api_key) = std::env::var("STORE_API_KEY") {
            if !api_key.trim().is_empty() {
                self.upstream.api_key = Some(api_key);
            }
        }
    }

    /// The address the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
