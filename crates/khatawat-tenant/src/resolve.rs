//! Tenant resolution rules.
//!
//! Classifies a request into one of four scenarios and derives the tenant
//! identifier. The rules form an ordered chain evaluated in a fixed
//! sequence; the first matching rule wins:
//!
//! 1. system-route short-circuit (regardless of host)
//! 2. custom domain
//! 3. subdomain of the main domain
//! 4. subpath on the main domain
//!
//! Each rule is a standalone function so it can be tested in isolation.
//! Resolution is pure and synchronous: it reads only the host, the path and
//! the configuration, performs no I/O, and cannot fail.

use crate::config::ResolverConfig;
use khatawat_core::StoreDomain;

/// Query parameter key under which the resolved tenant identifier is
/// republished for downstream consumers.
pub const DOMAIN_PARAM: &str = "domain";

/// First path segments that always map to application routes, never to a
/// tenant slug. Compiled in; changing the set requires a redeploy.
///
/// Matching is case-sensitive: reserved routes are lowercase by convention,
/// while tenant slugs keep their original case.
pub const RESERVED_SEGMENTS: [&str; 12] = [
    "_next",
    "api",
    "admin",
    "cart",
    "checkout",
    "thank-you",
    "products",
    "favicon.ico",
    "assets",
    "images",
    "robots.txt",
    "sitemap.xml",
];

// Paths handled by the application itself. Checked before any tenant logic,
// whatever the host.
const SYSTEM_PATH_PREFIXES: [&str; 4] = ["/_next", "/api", "/assets", "/images"];
const SYSTEM_PATHS_EXACT: [&str; 3] = ["/favicon.ico", "/robots.txt", "/sitemap.xml"];

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No tenant context: the request proceeds unchanged.
    PassThrough,

    /// A tenant was derived. `path` is `Some` only for subpath-routed
    /// requests, carrying the truncated path; host-derived tenants leave the
    /// path untouched.
    Rewrite {
        domain: StoreDomain,
        path: Option<String>,
    },
}

impl Resolution {
    /// The derived tenant identifier, if any.
    #[must_use]
    pub fn domain(&self) -> Option<&StoreDomain> {
        match self {
            Resolution::PassThrough => None,
            Resolution::Rewrite { domain, .. } => Some(domain),
        }
    }

    /// True if the request proceeds without tenant context.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        matches!(self, Resolution::PassThrough)
    }
}

/// Resolve the tenant for one request.
///
/// `host` is the raw `Host` header value (may carry a port, may be absent);
/// `path` is the request path and always begins with `/`.
#[must_use]
pub fn resolve(host: Option<&str>, path: &str, config: &ResolverConfig) -> Resolution {
    if is_system_path(path) {
        return Resolution::PassThrough;
    }

    let hostname = normalize_host(host);

    if let Some(resolution) = match_custom_domain(&hostname, config) {
        return resolution;
    }
    if let Some(resolution) = match_subdomain(&hostname, config) {
        return resolution;
    }
    if let Some(resolution) = match_subpath(&hostname, path, config) {
        return resolution;
    }

    Resolution::PassThrough
}

/// True for paths owned by the application itself (framework internals,
/// API routes, static assets). These short-circuit all tenant logic.
#[must_use]
pub fn is_system_path(path: &str) -> bool {
    SYSTEM_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
        || SYSTEM_PATHS_EXACT.contains(&path)
}

/// Strip the port suffix and lowercase. Hostnames are canonically lowercase,
/// so classification is case-insensitive. A missing header yields an empty
/// hostname, which no rule matches.
fn normalize_host(host: Option<&str>) -> String {
    host.unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Scenario: the hostname is neither the main domain nor one of its
/// subdomains, so the whole hostname names the tenant.
fn match_custom_domain(hostname: &str, config: &ResolverConfig) -> Option<Resolution> {
    if hostname.is_empty()
        || hostname == config.main_domain()
        || hostname.ends_with(config.subdomain_suffix())
    {
        return None;
    }
    let domain = StoreDomain::new(hostname).ok()?;
    Some(Resolution::Rewrite { domain, path: None })
}

/// Scenario: a subdomain of the main domain. The tenant is the hostname
/// with the `.<main domain>` suffix removed; interior dots are kept
/// (`a.b.khatawat.com` yields `a.b`).
fn match_subdomain(hostname: &str, config: &ResolverConfig) -> Option<Resolution> {
    let label = hostname.strip_suffix(config.subdomain_suffix())?;
    let domain = StoreDomain::new(label).ok()?;
    Some(Resolution::Rewrite { domain, path: None })
}

/// Scenario: main-domain host with the tenant slug as the first path
/// segment. Empty segments (duplicate slashes) are discarded before the
/// reserved-set check, and the remaining segments become the rewritten path.
fn match_subpath(hostname: &str, path: &str, config: &ResolverConfig) -> Option<Resolution> {
    if hostname != config.main_domain() || path.len() <= 1 {
        return None;
    }

    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    let first = segments.next()?;
    if RESERVED_SEGMENTS.contains(&first) {
        return None;
    }

    let rest: Vec<&str> = segments.collect();
    let rewritten = if rest.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", rest.join("/"))
    };

    let domain = StoreDomain::new(first).ok()?;
    Some(Resolution::Rewrite {
        domain,
        path: Some(rewritten),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ResolverConfig {
        ResolverConfig::default()
    }

    fn rewrite(domain: &str, path: Option<&str>) -> Resolution {
        Resolution::Rewrite {
            domain: StoreDomain::new(domain).unwrap(),
            path: path.map(String::from),
        }
    }

    #[test]
    fn test_main_domain_root_passes_through() {
        let resolution = resolve(Some("khatawat.com"), "/", &config());
        assert_eq!(resolution, Resolution::PassThrough);
    }

    #[test]
    fn test_subdomain_yields_label() {
        let resolution = resolve(Some("store1.khatawat.com"), "/products/42", &config());
        assert_eq!(resolution, rewrite("store1", None));
    }

    #[test]
    fn test_custom_domain_yields_hostname_verbatim() {
        let resolution = resolve(Some("myshop.com"), "/", &config());
        assert_eq!(resolution, rewrite("myshop.com", None));
    }

    #[test]
    fn test_subpath_truncates_path() {
        let resolution = resolve(Some("khatawat.com"), "/acme/cart", &config());
        assert_eq!(resolution, rewrite("acme", Some("/cart")));
    }

    #[test]
    fn test_subpath_slug_only_rewrites_to_root() {
        let resolution = resolve(Some("khatawat.com"), "/acme", &config());
        assert_eq!(resolution, rewrite("acme", Some("/")));
    }

    #[test]
    fn test_reserved_first_segment_passes_through() {
        let resolution = resolve(Some("khatawat.com"), "/admin/products", &config());
        assert_eq!(resolution, Resolution::PassThrough);
    }

    #[test]
    fn test_system_route_short_circuits_before_tenant_logic() {
        // Fires first, even on a host that would otherwise be a custom
        // domain or subdomain.
        for host in ["khatawat.com", "store1.khatawat.com", "myshop.com"] {
            let resolution = resolve(Some(host), "/api/orders", &config());
            assert_eq!(resolution, Resolution::PassThrough, "host {host}");
        }
    }

    #[test]
    fn test_system_routes_exact_and_prefix() {
        for path in [
            "/_next/static/chunk.js",
            "/api",
            "/assets/logo.png",
            "/images/banner.jpg",
            "/favicon.ico",
            "/robots.txt",
            "/sitemap.xml",
        ] {
            assert!(is_system_path(path), "path {path}");
        }
        // Exact-match entries do not match as prefixes.
        assert!(!is_system_path("/robots.txt.bak"));
        assert!(!is_system_path("/favicon.ico/extra"));
    }

    #[test]
    fn test_duplicate_slashes_discarded() {
        let resolution = resolve(Some("khatawat.com"), "//acme//cart", &config());
        assert_eq!(resolution, rewrite("acme", Some("/cart")));
    }

    #[test]
    fn test_slashes_only_path_passes_through() {
        let resolution = resolve(Some("khatawat.com"), "//", &config());
        assert_eq!(resolution, Resolution::PassThrough);
    }

    #[test]
    fn test_port_stripped_before_classification() {
        let resolution = resolve(Some("khatawat.com:3000"), "/acme/cart", &config());
        assert_eq!(resolution, rewrite("acme", Some("/cart")));

        let resolution = resolve(Some("store1.khatawat.com:8080"), "/", &config());
        assert_eq!(resolution, rewrite("store1", None));
    }

    #[test]
    fn test_hostname_comparison_case_insensitive() {
        let resolution = resolve(Some("Store1.KHATAWAT.com"), "/", &config());
        assert_eq!(resolution, rewrite("store1", None));

        let resolution = resolve(Some("KHATAWAT.COM"), "/", &config());
        assert_eq!(resolution, Resolution::PassThrough);
    }

    #[test]
    fn test_reserved_match_is_case_sensitive() {
        // "Admin" is not the reserved literal "admin": it resolves as a
        // tenant slug. Reserved routes are lowercase by convention.
        let resolution = resolve(Some("khatawat.com"), "/Admin/products", &config());
        assert_eq!(resolution, rewrite("Admin", Some("/products")));
    }

    #[test]
    fn test_missing_or_empty_host_passes_through() {
        assert_eq!(resolve(None, "/acme", &config()), Resolution::PassThrough);
        assert_eq!(
            resolve(Some(""), "/acme", &config()),
            Resolution::PassThrough
        );
        assert_eq!(
            resolve(Some(":8080"), "/acme", &config()),
            Resolution::PassThrough
        );
    }

    #[test]
    fn test_bare_dot_prefix_host_passes_through() {
        // ".khatawat.com" strips to an empty label: no tenant.
        let resolution = resolve(Some(".khatawat.com"), "/", &config());
        assert_eq!(resolution, Resolution::PassThrough);
    }

    #[test]
    fn test_nested_subdomain_keeps_interior_dots() {
        let resolution = resolve(Some("a.b.khatawat.com"), "/", &config());
        assert_eq!(resolution, rewrite("a.b", None));
    }

    #[test]
    fn test_custom_main_domain() {
        let config = ResolverConfig::new("example-shops.com").unwrap();
        assert_eq!(
            resolve(Some("store1.example-shops.com"), "/", &config),
            rewrite("store1", None)
        );
        // The default main domain is now just another custom domain.
        assert_eq!(
            resolve(Some("khatawat.com"), "/", &config),
            rewrite("khatawat.com", None)
        );
    }

    #[test]
    fn test_rule_match_custom_domain_rejects_main_and_subdomains() {
        let config = config();
        assert_eq!(match_custom_domain("khatawat.com", &config), None);
        assert_eq!(match_custom_domain("store1.khatawat.com", &config), None);
        assert_eq!(match_custom_domain("", &config), None);
        assert!(match_custom_domain("myshop.com", &config).is_some());
    }

    #[test]
    fn test_rule_match_subdomain_rejects_other_hosts() {
        let config = config();
        assert_eq!(match_subdomain("khatawat.com", &config), None);
        assert_eq!(match_subdomain("myshop.com", &config), None);
        assert!(match_subdomain("store1.khatawat.com", &config).is_some());
    }

    #[test]
    fn test_rule_match_subpath_requires_main_domain_host() {
        let config = config();
        assert_eq!(match_subpath("myshop.com", "/acme/cart", &config), None);
        assert_eq!(match_subpath("khatawat.com", "/", &config), None);
        assert!(match_subpath("khatawat.com", "/acme/cart", &config).is_some());
    }

    #[test]
    fn test_resolution_accessors() {
        let pass = Resolution::PassThrough;
        assert!(pass.is_pass_through());
        assert_eq!(pass.domain(), None);

        let hit = rewrite("acme", Some("/cart"));
        assert!(!hit.is_pass_through());
        assert_eq!(hit.domain().map(StoreDomain::as_str), Some("acme"));
    }
}
