//! Common types used across Metashark

use serde::{Deserialize, Serialize};

/// A registered tenant: a named virtual host with its own display identity.
///
/// `subdomain` is the unique registry key and is immutable once created.
/// The icon is mutable only by re-creation; no update operation exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub subdomain: String,
    /// A single glyph/emoji shown next to the tenant name.
    pub icon: String,
    /// Milliseconds since the Unix epoch, set at creation.
    pub created_at: i64,
}

/// An authenticated principal, as seen by the routing layer.
///
/// Issued by the auth gate on successful credential verification and
/// destroyed on logout or natural expiry. The gate owns all expiry policy;
/// consumers only ever see a valid session or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque user identifier.
    pub subject: String,
    pub display_name: String,
    pub email: String,
}
