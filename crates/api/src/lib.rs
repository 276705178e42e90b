//! Metashark API Library
//!
//! This crate contains the host-routing server components for Metashark:
//! the tenant registry, the routing classifier and interception layer, the
//! auth gate and the administrative tenant API.

pub mod auth;
pub mod config;
pub mod error;
pub mod i18n;
pub mod registry;
pub mod routes;
pub mod routing;
pub mod state;
pub mod tenants;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use routing::{HostClass, RouteDecision};
pub use state::AppState;
