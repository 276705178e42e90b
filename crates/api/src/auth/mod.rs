//! Authentication for Metashark
//!
//! The gate verifies credentials against a pluggable credential store and
//! issues signed session tokens. Routing consults it only through
//! [`AuthGate::validate`], which is a cheap decode.

pub mod gate;
pub mod password;
pub mod session;

pub use gate::{AuthGate, CredentialStore, MemoryCredentialStore, UserRecord};
pub use password::{hash_password, verify_password, PasswordError};
pub use session::{cookie_value, SessionError, SessionManager, SESSION_COOKIE};
