//! The authorization gate
//!
//! Verifies credentials against an explicit credential store supplied at
//! construction and issues session tokens. Verification failures are always
//! the same generic error; unknown identifiers and wrong secrets must not
//! be distinguishable, by message or by timing.

use std::sync::Arc;

use async_trait::async_trait;
use metashark_shared::{CoreError, Session};
use uuid::Uuid;

use super::password::{hash_password, verify_password};
use super::session::SessionManager;

/// A stored credential record
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    /// Argon2 PHC string, never a plaintext secret
    pub password_hash: String,
}

/// Where credentials live. Production storage is out of scope; the gate
/// only requires lookup by identifier.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, CoreError>;
}

/// In-memory credential store, seeded at construction (typically with the
/// configured admin account)
pub struct MemoryCredentialStore {
    users: Vec<UserRecord>,
}

impl MemoryCredentialStore {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, CoreError> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }
}

/// The authorization checkpoint
#[derive(Clone)]
pub struct AuthGate {
    store: Arc<dyn CredentialStore>,
    sessions: SessionManager,
    /// Verified instead of a real hash when the identifier is unknown, so
    /// both failure paths cost one hash comparison.
    dummy_hash: String,
}

impl AuthGate {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        sessions: SessionManager,
    ) -> Result<Self, CoreError> {
        let dummy_hash = hash_password(&Uuid::new_v4().to_string())
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        Ok(Self {
            store,
            sessions,
            dummy_hash,
        })
    }

    /// Verify credentials and issue a session.
    ///
    /// The hash comparison is computationally expensive on purpose, so it
    /// runs on the blocking pool rather than a shared latency-sensitive
    /// path.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(Session, String), CoreError> {
        let user = self.store.find_by_email(email).await?;

        let hash = user
            .as_ref()
            .map(|u| u.password_hash.clone())
            .unwrap_or_else(|| self.dummy_hash.clone());
        let password = password.to_string();

        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .map_err(|e| CoreError::Internal(e.to_string()))?;

        match user {
            Some(user) if matches => {
                let session = Session {
                    subject: user.id,
                    display_name: user.name,
                    email: user.email,
                };
                let token = self
                    .sessions
                    .issue(&session)
                    .map_err(|e| CoreError::Internal(e.to_string()))?;
                tracing::info!("session issued for {}", session.email);
                Ok((session, token))
            }
            // One generic failure for unknown identifier and wrong secret
            _ => Err(CoreError::Auth),
        }
    }

    /// Validate a session token. Boolean-ish from the router's perspective:
    /// a session or nothing, with expiry policy owned here.
    pub fn validate(&self, token: &str) -> Option<Session> {
        self.sessions.validate(token).ok()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]  // Allow unwrap() in tests for cleaner test code
mod tests {
    use super::*;

    fn gate_with_admin() -> AuthGate {
        let hash = hash_password("password123").unwrap();
        let store = MemoryCredentialStore::new(vec![UserRecord {
            id: "1".to_string(),
            email: "admin@metashark.example".to_string(),
            name: "Metashark Admin".to_string(),
            password_hash: hash,
        }]);
        let sessions = SessionManager::new("test-secret-key-at-least-32-chars!", 24);
        AuthGate::new(Arc::new(store), sessions).unwrap()
    }

    #[tokio::test]
    async fn test_authenticate_success_roundtrips_through_validate() {
        let gate = gate_with_admin();

        let (session, token) = gate
            .authenticate("admin@metashark.example", "password123")
            .await
            .unwrap();
        assert_eq!(session.subject, "1");

        let validated = gate.validate(&token).unwrap();
        assert_eq!(validated, session);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_fail_identically() {
        let gate = gate_with_admin();

        let wrong_secret = gate
            .authenticate("admin@metashark.example", "nope")
            .await
            .unwrap_err();
        let unknown_user = gate
            .authenticate("nobody@metashark.example", "password123")
            .await
            .unwrap_err();

        // Same generic failure for both, no identifier enumeration
        assert_eq!(wrong_secret.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_secret, CoreError::Auth));
        assert!(matches!(unknown_user, CoreError::Auth));
    }

    #[tokio::test]
    async fn test_validate_rejects_garbage() {
        let gate = gate_with_admin();
        assert!(gate.validate("not-a-token").is_none());
    }
}
