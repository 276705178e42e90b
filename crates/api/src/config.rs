//! Application configuration

use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub bind_address: String,
    /// Scheme used when building external tenant URLs ("http" or "https").
    pub public_protocol: String,
    /// The root domain, e.g. "metashark.example" for *.metashark.example
    /// routing. May carry a port for local development ("localhost:3000").
    pub root_domain: String,
    /// Host label that marks local-development traffic.
    pub dev_host_label: String,
    /// Path prefix guarded by the auth gate.
    pub protected_prefix: String,

    // Redis
    pub redis_url: String,

    // Authentication
    pub session_secret: String,
    pub session_expiry_hours: i64,
    pub admin_email: String,
    pub admin_name: String,
    /// Argon2 hash of the admin password. Generate with the
    /// `hash-password` binary; never store the plaintext.
    pub admin_password_hash: String,

    // Tenant listing cache
    pub listing_cache_ttl_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Server
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            public_protocol: env::var("PUBLIC_PROTOCOL").unwrap_or_else(|_| "http".to_string()),
            root_domain: env::var("ROOT_DOMAIN").unwrap_or_else(|_| "localhost:3000".to_string()),
            dev_host_label: env::var("DEV_HOST_LABEL").unwrap_or_else(|_| "localhost".to_string()),
            protected_prefix: env::var("PROTECTED_PREFIX").unwrap_or_else(|_| "/admin".to_string()),

            // Redis
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),

            // Authentication
            session_secret: {
                let secret = env::var("SESSION_SECRET")
                    .map_err(|_| ConfigError::Missing("SESSION_SECRET"))?;
                // Signing key must be cryptographically strong
                if secret.len() < 32 {
                    return Err(ConfigError::WeakSecret(
                        "SESSION_SECRET must be at least 32 characters",
                    ));
                }
                secret
            },
            session_expiry_hours: env::var("SESSION_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            admin_email: env::var("ADMIN_EMAIL").map_err(|_| ConfigError::Missing("ADMIN_EMAIL"))?,
            admin_name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),
            admin_password_hash: {
                let hash = env::var("ADMIN_PASSWORD_HASH")
                    .map_err(|_| ConfigError::Missing("ADMIN_PASSWORD_HASH"))?;
                if !hash.starts_with("$argon2") {
                    return Err(ConfigError::InvalidPasswordHash(
                        "ADMIN_PASSWORD_HASH must be an Argon2 PHC string (run the hash-password tool)",
                    ));
                }
                hash
            },

            // Tenant listing cache
            listing_cache_ttl_secs: env::var("LISTING_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
        })
    }

    /// The externally visible URL of a tenant, used for the post-create
    /// redirect.
    pub fn tenant_url(&self, subdomain: &str) -> String {
        format!("{}://{}.{}", self.public_protocol, subdomain, self.root_domain)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Weak secret: {0}")]
    WeakSecret(&'static str),
    #[error("Invalid password hash: {0}")]
    InvalidPasswordHash(&'static str),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]  // Allow unwrap() in tests for cleaner test code
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure config tests run serially (they modify shared env vars)
    static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn setup_minimal_config() {
        env::set_var(
            "SESSION_SECRET",
            "test-session-secret-at-least-32-characters",
        );
        env::set_var("ADMIN_EMAIL", "admin@metashark.example");
        env::set_var(
            "ADMIN_PASSWORD_HASH",
            "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$placeholder",
        );
    }

    fn cleanup_config() {
        env::remove_var("SESSION_SECRET");
        env::remove_var("ADMIN_EMAIL");
        env::remove_var("ADMIN_PASSWORD_HASH");
        env::remove_var("ROOT_DOMAIN");
    }

    #[test]
    fn test_config_validation() {
        let _lock = CONFIG_TEST_MUTEX.lock().unwrap();

        // Missing session secret
        cleanup_config();
        env::set_var("ADMIN_EMAIL", "admin@metashark.example");
        env::set_var(
            "ADMIN_PASSWORD_HASH",
            "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$placeholder",
        );
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("SESSION_SECRET"))
        ));

        // Weak session secret
        env::set_var("SESSION_SECRET", "short");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::WeakSecret(_))
        ));

        // Password hash must be an Argon2 PHC string
        setup_minimal_config();
        env::set_var("ADMIN_PASSWORD_HASH", "plaintext-password");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidPasswordHash(_))
        ));

        // Valid configuration with defaults
        setup_minimal_config();
        let config = Config::from_env().unwrap();
        assert_eq!(config.root_domain, "localhost:3000");
        assert_eq!(config.protected_prefix, "/admin");
        assert_eq!(config.session_expiry_hours, 24);

        cleanup_config();
    }

    #[test]
    fn test_tenant_url() {
        let _lock = CONFIG_TEST_MUTEX.lock().unwrap();

        setup_minimal_config();
        env::set_var("ROOT_DOMAIN", "metashark.example");
        let config = Config::from_env().unwrap();
        assert_eq!(config.tenant_url("shop"), "http://shop.metashark.example");

        cleanup_config();
    }
}
