//! Host-based request routing
//!
//! Classifies every inbound request by its Host header into either the root
//! application or a tenant-scoped virtual host:
//! - Tenant hosts: shop.metashark.example -> internal rewrite to /s/shop/...
//! - Root host, protected paths: gated by the auth gate
//! - Root host, everything else: delegated onward with locale negotiation

mod cache;
mod classifier;
mod middleware;

pub use cache::ListingCache;
pub use classifier::{classify, decide, normalize_host, HostClass, RouteDecision};
pub use middleware::host_routing;
