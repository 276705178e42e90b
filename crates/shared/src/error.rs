//! Error taxonomy for Metashark
//!
//! Validation and conflict errors are handled at the point of occurrence and
//! converted to structured results; store-connectivity and unexpected errors
//! propagate to the request boundary, which maps them to a safe generic
//! response.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input (bad subdomain format, missing icon, malformed
    /// credentials). Recoverable locally; surfaced verbatim for form
    /// correction.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Subdomain already registered. Surfaced as a user-facing message.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid credentials or invalid/expired session. Always generic.
    #[error("Authentication failed")]
    Auth,

    /// Underlying key-value store unreachable. Not retried here.
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// True for store-connectivity failures, the only class of error the
    /// orchestration layer is allowed to retry (once).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CoreError::RegistryUnavailable(_))
    }
}
