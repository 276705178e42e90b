//! Host classification and the per-request routing decision
//!
//! Everything here is pure and allocation-light: one logical invocation per
//! request, no shared mutable state, no store lookups. A tenant rewrite is
//! produced without checking the registry; unknown tenants are resolved by
//! the downstream renderer.

/// How a Host header classifies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostClass {
    /// The primary domain, no tenant-identifying label
    Root,
    /// A tenant host; carries the candidate subdomain (the first label)
    Tenant(String),
}

/// The outcome of routing a single request. Produced fresh per request and
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Tenant host: handle internally at `path` without changing the
    /// externally visible URL
    Rewrite { subdomain: String, path: String },
    /// Root host, protected path, valid session
    Allow,
    /// Root host, protected path, no valid session; caller must redirect
    /// to the login path
    Deny { reason: &'static str },
    /// Root host, unprotected path: hand off to locale negotiation and
    /// continue downstream
    Delegate,
}

/// Normalize a Host header value: strip any port, lowercase.
pub fn normalize_host(host: &str) -> String {
    let host = host.split(':').next().unwrap_or(host);
    host.to_lowercase()
}

/// Classify a host as root or tenant.
///
/// Local-development hosts (containing `dev_host_label`, normally
/// "localhost") are tenant hosts when they have more than two labels, or
/// exactly two where the first label is not the dev label itself
/// ("shop.localhost"). Production-style hosts are tenant hosts when they
/// have more than two labels.
///
/// A leading `www` label is an ordinary candidate subdomain here: the
/// classifier inherits that behavior deliberately, so `www.example.com`
/// routes to tenant `www`. Special-casing it to the root host is a pending
/// product decision, not something to change silently.
///
/// Unparsable hosts (empty, or with an empty first label) classify as root.
pub fn classify(host: &str, dev_host_label: &str) -> HostClass {
    let host = normalize_host(host);
    if host.is_empty() {
        return HostClass::Root;
    }

    let labels: Vec<&str> = host.split('.').collect();
    let is_tenant = if host.contains(dev_host_label) {
        labels.len() > 2 || (labels.len() == 2 && labels[0] != dev_host_label)
    } else {
        labels.len() > 2
    };

    match labels.first() {
        Some(first) if is_tenant && !first.is_empty() => HostClass::Tenant(first.to_string()),
        _ => HostClass::Root,
    }
}

/// Produce the routing decision for one request.
///
/// `is_authenticated` is a capability supplied by the caller; it is only
/// invoked for root-host requests under the protected prefix, so tenant
/// traffic is never gated and unprotected traffic never pays for a session
/// check.
pub fn decide<F>(
    host: &str,
    path: &str,
    dev_host_label: &str,
    protected_prefix: &str,
    is_authenticated: F,
) -> RouteDecision
where
    F: FnOnce() -> bool,
{
    match classify(host, dev_host_label) {
        HostClass::Tenant(subdomain) => {
            let rewritten = format!("/s/{subdomain}{path}");
            RouteDecision::Rewrite {
                subdomain,
                path: rewritten,
            }
        }
        HostClass::Root => {
            if is_protected(path, protected_prefix) {
                if is_authenticated() {
                    RouteDecision::Allow
                } else {
                    RouteDecision::Deny {
                        reason: "unauthenticated",
                    }
                }
            } else {
                RouteDecision::Delegate
            }
        }
    }
}

/// True when `path` lies under the protected prefix. `/admin` and
/// `/admin/...` are protected; `/administrator` is not.
fn is_protected(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
