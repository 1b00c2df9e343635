//! Resolver configuration.
//!
//! The main domain is the single configuration value the resolver needs: it
//! is the canonical root domain against which hostnames are classified as
//! subdomain vs. custom domain. It is injected explicitly at construction so
//! resolution stays a pure function of (request, config).

use crate::error::ConfigError;

/// Fallback main domain used when no explicit value is configured.
pub const DEFAULT_MAIN_DOMAIN: &str = "khatawat.com";

/// Environment variable consulted by [`ResolverConfig::from_env`].
pub const MAIN_DOMAIN_ENV: &str = "MAIN_DOMAIN";

/// Configuration for the tenant resolver.
///
/// Built once at startup and shared read-only across requests.
///
/// # Example
///
/// ```
/// use khatawat_tenant::ResolverConfig;
///
/// let config = ResolverConfig::builder()
///     .main_domain("example-shops.com")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.main_domain(), "example-shops.com");
/// assert_eq!(config.subdomain_suffix(), ".example-shops.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    main_domain: String,
    // ".<main_domain>", precomputed so per-request suffix checks do not
    // allocate.
    subdomain_suffix: String,
}

impl ResolverConfig {
    /// Create a configuration for the given main domain.
    ///
    /// The domain is lowercased; hostname classification is
    /// case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the domain is empty or carries a leading
    /// or trailing dot.
    pub fn new(main_domain: impl Into<String>) -> Result<Self, ConfigError> {
        let main_domain = main_domain.into().trim().to_ascii_lowercase();
        if main_domain.is_empty() {
            return Err(ConfigError::EmptyMainDomain);
        }
        if main_domain.starts_with('.') || main_domain.ends_with('.') {
            return Err(ConfigError::DottedMainDomain(main_domain));
        }
        let subdomain_suffix = format!(".{main_domain}");
        Ok(Self {
            main_domain,
            subdomain_suffix,
        })
    }

    /// Create a configuration from the `MAIN_DOMAIN` environment variable,
    /// falling back to [`DEFAULT_MAIN_DOMAIN`] when unset or empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(MAIN_DOMAIN_ENV) {
            Ok(value) if !value.trim().is_empty() => Self::new(value),
            _ => Self::new(DEFAULT_MAIN_DOMAIN),
        }
    }

    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::new()
    }

    /// The canonical main domain (lowercase, no port).
    #[must_use]
    pub fn main_domain(&self) -> &str {
        &self.main_domain
    }

    /// The subdomain suffix, i.e. `".<main domain>"`.
    #[must_use]
    pub fn subdomain_suffix(&self) -> &str {
        &self.subdomain_suffix
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        // DEFAULT_MAIN_DOMAIN is a valid constant, so this cannot fail.
        Self::new(DEFAULT_MAIN_DOMAIN).unwrap_or_else(|_| Self {
            main_domain: DEFAULT_MAIN_DOMAIN.to_string(),
            subdomain_suffix: format!(".{DEFAULT_MAIN_DOMAIN}"),
        })
    }
}

/// Builder for [`ResolverConfig`].
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    main_domain: Option<String>,
}

impl ResolverConfigBuilder {
    /// Create a new builder with no values set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the main domain.
    #[must_use]
    pub fn main_domain(mut self, main_domain: impl Into<String>) -> Self {
        self.main_domain = Some(main_domain.into());
        self
    }

    /// Build the configuration, falling back to [`DEFAULT_MAIN_DOMAIN`]
    /// when no main domain was set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured main domain is invalid.
    pub fn build(self) -> Result<ResolverConfig, ConfigError> {
        match self.main_domain {
            Some(domain) => ResolverConfig::new(domain),
            None => ResolverConfig::new(DEFAULT_MAIN_DOMAIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.main_domain(), "khatawat.com");
        assert_eq!(config.subdomain_suffix(), ".khatawat.com");
    }

    #[test]
    fn test_builder_custom_domain() {
        let config = ResolverConfig::builder()
            .main_domain("example-shops.com")
            .build()
            .unwrap();
        assert_eq!(config.main_domain(), "example-shops.com");
    }

    #[test]
    fn test_builder_defaults_to_fallback() {
        let config = ResolverConfig::builder().build().unwrap();
        assert_eq!(config.main_domain(), DEFAULT_MAIN_DOMAIN);
    }

    #[test]
    fn test_main_domain_is_lowercased() {
        let config = ResolverConfig::new("Khatawat.COM").unwrap();
        assert_eq!(config.main_domain(), "khatawat.com");
    }

    #[test]
    fn test_empty_main_domain_rejected() {
        assert_eq!(
            ResolverConfig::new("  "),
            Err(ConfigError::EmptyMainDomain)
        );
    }

    #[test]
    fn test_from_env_fallback_and_override() {
        // No other test in this crate touches MAIN_DOMAIN.
        std::env::remove_var(MAIN_DOMAIN_ENV);
        let config = ResolverConfig::from_env().unwrap();
        assert_eq!(config.main_domain(), DEFAULT_MAIN_DOMAIN);

        std::env::set_var(MAIN_DOMAIN_ENV, "env-shops.com");
        let config = ResolverConfig::from_env().unwrap();
        assert_eq!(config.main_domain(), "env-shops.com");
        std::env::remove_var(MAIN_DOMAIN_ENV);
    }

    #[test]
    fn test_dotted_main_domain_rejected() {
        assert!(matches!(
            ResolverConfig::new(".khatawat.com"),
            Err(ConfigError::DottedMainDomain(_))
        ));
        assert!(matches!(
            ResolverConfig::new("khatawat.com."),
            Err(ConfigError::DottedMainDomain(_))
        ));
    }
}
